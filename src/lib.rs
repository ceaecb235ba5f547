//! Contest Client - Timed Debugging Contest Front-End
//!
//! This library provides the core of a contest client in which teams fix
//! buggy programs against a countdown.
//!
//! # Features
//!
//! - Persistent countdown that survives restarts
//! - Session store with cached problems and submission progress
//! - Bounded undo/redo editor history
//! - Single and batch execution against a remote executor
//! - Local evaluation of visible test cases
//! - Final submission to the judge
//!
//! # Architecture
//!
//! The client follows a layered architecture:
//! - **Console**: line-oriented front-end (thin layer)
//! - **Services**: Business logic
//! - **Backend / Storage**: remote contracts and durable client state
//! - **Models**: Domain models

pub mod backend;
pub mod config;
pub mod console;
pub mod constants;
pub mod editor;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
pub mod storage;
pub mod test_utils;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{ClientError, ClientResult};
pub use state::AppState;
