//! Business logic services

pub mod clock_service;
pub mod evaluation_service;
pub mod execution_service;
pub mod session_service;
pub mod submission_service;
pub mod template_service;

pub use clock_service::{Clock, Countdown, PersistentClock, SystemClock, TickEvent};
pub use evaluation_service::EvaluationService;
pub use execution_service::ExecutionService;
pub use session_service::{SessionService, SubmissionSync};
pub use submission_service::SubmissionService;
pub use template_service::TemplateService;
