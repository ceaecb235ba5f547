//! Utility functions

pub mod deadline;
pub mod time;
pub mod validation;

pub use deadline::with_deadline;
pub use time::{format_countdown, format_duration, parse_epoch_millis};
pub use validation::{is_external_link, validate_source_code};
