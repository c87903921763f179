use awswire_core::Error;
use http::StatusCode;

/// Error returned by the service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", describe(.code, .message, .status_code))]
pub struct ApiError {
    /// Http status code of the response.
    pub status_code: u16,
    /// Error code, like `ResourceNotFoundException`. Empty when the body carried none.
    pub code: String,
    /// Error message.
    pub message: String,
    /// Request id assigned by the service.
    pub request_id: Option<String>,
}

fn describe(code: &str, message: &str, status_code: &u16) -> String {
    match (code.is_empty(), message.is_empty()) {
        (true, _) => message.to_string(),
        (false, true) => format!("{code} (status code: {status_code})"),
        (false, false) => format!("{code}: {message} (status code: {status_code})"),
    }
}

impl ApiError {
    /// Create a new api error.
    pub fn new(status_code: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status_code: status_code.as_u16(),
            code: code.into(),
            message: message.into(),
            request_id: None,
        }
    }

    /// Error built from the status alone, used when the body can't be decoded.
    pub fn from_status(status_code: StatusCode) -> Self {
        let message = match status_code.canonical_reason() {
            Some(reason) => format!("{} {reason}", status_code.as_u16()),
            None => status_code.as_u16().to_string(),
        };
        Self::new(status_code, "", message)
    }

    /// Set the request id.
    pub fn with_request_id(mut self, request_id: Option<String>) -> Self {
        self.request_id = request_id;
        self
    }

    /// Retrieve the api error carried by an [`Error`].
    pub fn from_error(err: &Error) -> Option<&ApiError> {
        err.source_ref()?.downcast_ref::<ApiError>()
    }
}
