//! Domain models
//!
//! This module contains all domain models used throughout the client.

pub mod execution;
pub mod language;
pub mod problem;
pub mod report;
pub mod session;
pub mod submission;
pub mod test_case;

pub use execution::*;
pub use language::*;
pub use problem::*;
pub use report::*;
pub use session::*;
pub use submission::*;
pub use test_case::*;
