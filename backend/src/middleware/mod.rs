//! Request middleware.
//!
//! Purpose: request lifecycle concerns shared by every route: trace
//! correlation plus query and failure reporting.

pub mod error_reporter;
pub mod query_logger;
pub mod trace;

pub use error_reporter::{ErrorReporter, FailureCause};
pub use query_logger::QueryLogger;
pub use trace::Trace;
