//! Editor state for the open challenge

pub mod gate;
pub mod history;
pub mod workspace;

pub use gate::{ExecutionGate, GateGuard};
pub use history::{EditHistory, EditSource};
pub use workspace::Workspace;
