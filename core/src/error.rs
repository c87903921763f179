use std::fmt;
use thiserror::Error;

/// Error returned by every fallible awswire operation.
///
/// `Display` prints the message only, the cause is reachable through
/// [`std::error::Error::source`] or [`Error::source_ref`].
#[derive(Error, Debug)]
#[error("{message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    #[source]
    source: Option<anyhow::Error>,
}

/// What went wrong, coarse enough to branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Credentials are missing, invalid or malformed.
    CredentialInvalid,

    /// Credentials are expired.
    CredentialExpired,

    /// Permission denied when accessing credentials.
    CredentialDenied,

    /// Request cannot be built or signed (missing uri labels, no host, etc.)
    RequestInvalid,

    /// Configuration error (missing region, malformed profile, etc.)
    ConfigInvalid,

    /// The service answered with an error response.
    ///
    /// The structured error can be fetched by downcasting the source.
    Api,

    /// Unexpected errors (network, I/O, decode failures, etc.)
    Unexpected,
}

impl Error {
    /// Create an error of `kind`.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Attach the underlying cause.
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Kind of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Get the source error if any.
    pub fn source_ref(&self) -> Option<&anyhow::Error> {
        self.source.as_ref()
    }

    /// Whether the error comes from loading or using credentials.
    pub fn is_credential_error(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::CredentialInvalid
                | ErrorKind::CredentialExpired
                | ErrorKind::CredentialDenied
        )
    }
}

impl Error {
    /// Credentials are missing or malformed.
    pub fn credential_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CredentialInvalid, message)
    }

    /// Credentials have expired.
    pub fn credential_expired(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CredentialExpired, message)
    }

    /// Credentials could not be accessed.
    pub fn credential_denied(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CredentialDenied, message)
    }

    /// The request can't be built or signed.
    pub fn request_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RequestInvalid, message)
    }

    /// Configuration is missing or malformed.
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigInvalid, message)
    }

    /// Create an api error that carries the service error as source.
    pub fn api(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::new(ErrorKind::Api, err.to_string()).with_source(err)
    }

    /// Anything else, mostly io and decode failures.
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::CredentialInvalid => "CredentialInvalid",
            ErrorKind::CredentialExpired => "CredentialExpired",
            ErrorKind::CredentialDenied => "CredentialDenied",
            ErrorKind::RequestInvalid => "RequestInvalid",
            ErrorKind::ConfigInvalid => "ConfigInvalid",
            ErrorKind::Api => "Api",
            ErrorKind::Unexpected => "Unexpected",
        };
        f.write_str(s)
    }
}

/// Result type for awswire operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Map foreign errors onto a kind, keeping them as source.
macro_rules! impl_from {
    ($($ty:ty => $ctor:ident),+ $(,)?) => {
        $(
            impl From<$ty> for Error {
                fn from(err: $ty) -> Self {
                    Self::$ctor(err.to_string()).with_source(err)
                }
            }
        )+
    };
}

impl_from! {
    anyhow::Error => unexpected,
    std::fmt::Error => unexpected,
    std::io::Error => unexpected,
    std::string::FromUtf8Error => unexpected,
    http::Error => request_invalid,
    http::header::InvalidHeaderName => request_invalid,
    http::header::InvalidHeaderValue => request_invalid,
    http::header::ToStrError => request_invalid,
    http::uri::InvalidUri => request_invalid,
    http::uri::InvalidUriParts => request_invalid,
}
