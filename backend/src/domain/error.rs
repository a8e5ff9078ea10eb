//! Domain-level error payload.
//!
//! These errors are transport agnostic. Inbound adapters map them to HTTP
//! responses and decide which messages are safe to show to callers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::TraceId;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request is malformed or fails domain validation.
    InvalidRequest,
    /// The requested Steam user or profile does not exist.
    NotFound,
    /// An upstream dependency failed to answer.
    ServiceUnavailable,
    /// An unexpected error occurred inside the service.
    InternalError,
}

/// Error payload returned by use-cases to inbound adapters.
///
/// Captures the current [`TraceId`] on construction so responses and logs
/// can be correlated.
///
/// # Examples
/// ```
/// use workshop_stats::domain::{Error, ErrorCode};
///
/// let err = Error::not_found("Steam user not found");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// assert_eq!(err.message(), "Steam user not found");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Error {
    code: ErrorCode,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl Error {
    /// Create a new error with the current trace identifier attached.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            trace_id: TraceId::current().map(|id| id.to_string()),
            details: None,
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Correlation identifier, when one was in scope.
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Supplementary error details.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach a trace identifier to the error.
    #[must_use]
    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    /// Attach structured details to the error.
    ///
    /// # Examples
    /// ```
    /// use serde_json::json;
    /// use workshop_stats::domain::Error;
    ///
    /// let err = Error::invalid_request("bad").with_details(json!({ "field": "vanityName" }));
    /// assert!(err.details().is_some());
    /// ```
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Convenience constructor for [`ErrorCode::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::ServiceUnavailable`].
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Error {}

/// Render an error and its `source()` chain as one line.
///
/// Used for diagnostics that go to logs and the error notification channel,
/// never to HTTP callers.
///
/// # Examples
/// ```
/// use workshop_stats::domain::error_chain;
///
/// let err = std::io::Error::other("socket closed");
/// assert_eq!(error_chain(&err), "socket closed");
/// ```
pub fn error_chain(error: &(dyn std::error::Error + 'static)) -> String {
    let mut rendered = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[derive(Debug, thiserror::Error)]
    #[error("outer")]
    struct Outer {
        #[source]
        inner: std::io::Error,
    }

    #[rstest]
    #[case::invalid(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
    #[case::missing(Error::not_found("missing"), ErrorCode::NotFound)]
    #[case::upstream(Error::service_unavailable("down"), ErrorCode::ServiceUnavailable)]
    #[case::internal(Error::internal("boom"), ErrorCode::InternalError)]
    fn constructors_set_expected_code(#[case] error: Error, #[case] expected: ErrorCode) {
        assert_eq!(error.code(), expected);
    }

    #[test]
    fn serialises_with_camel_case_and_skips_empty_fields() {
        let value = serde_json::to_value(Error::not_found("missing")).expect("serialise");
        assert_eq!(value, json!({ "code": "not_found", "message": "missing" }));
    }

    #[tokio::test]
    async fn captures_trace_id_in_scope() {
        let trace_id = TraceId::generate();
        let error = TraceId::scope(trace_id, async { Error::internal("boom") }).await;
        assert_eq!(error.trace_id(), Some(trace_id.to_string().as_str()));
    }

    #[test]
    fn error_chain_joins_sources() {
        let error = Outer {
            inner: std::io::Error::other("connection reset"),
        };
        assert_eq!(error_chain(&error), "outer: connection reset");
    }
}
