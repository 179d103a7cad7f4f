use std::fmt;
use std::io;

use http::StatusCode;
use thiserror::Error;

/// Error category derived from the HTTP status of a failed chart request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    MethodNotFound,
    Conflict,
    TooManyRequests,
    InternalServerError,
    BadGateway,
    ServiceUnavailable,
    GatewayTimeout,
    /// Any status the service does not document.
    Unknown,
}

impl ErrorKind {
    /// Look up the kind for a status code, falling back to [`ErrorKind::Unknown`].
    #[must_use]
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            405 => Self::MethodNotFound,
            409 => Self::Conflict,
            429 => Self::TooManyRequests,
            500 => Self::InternalServerError,
            502 => Self::BadGateway,
            503 => Self::ServiceUnavailable,
            504 => Self::GatewayTimeout,
            _ => Self::Unknown,
        }
    }

    /// Short type label, e.g. `"Not Found"`.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::BadRequest => "Bad Request",
            Self::Unauthorized => "Unauthorized",
            Self::Forbidden => "Forbidden",
            Self::NotFound => "Not Found",
            Self::MethodNotFound => "Method Not Found",
            Self::Conflict => "Conflict",
            Self::TooManyRequests => "Too Many Requests",
            Self::InternalServerError => "Internal Server Error",
            Self::BadGateway => "Bad Gateway",
            Self::ServiceUnavailable => "Service Unavailable",
            Self::GatewayTimeout => "Gateway Timeout",
            Self::Unknown => "Unknown Error",
        }
    }

    /// Human-readable explanation of the failure.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::BadRequest => {
                "The server could not understand the request due to invalid syntax."
            }
            Self::Unauthorized => "Authentication is needed to get requested response.",
            Self::Forbidden => {
                "Client does not have access rights to the content so server is refusing to give proper response."
            }
            Self::NotFound => "Server cannot find the requested resource.",
            Self::MethodNotFound => {
                "The request method is known by the server but has been disabled and cannot be used."
            }
            Self::Conflict => "The request conflicts with the current state of the server.",
            Self::TooManyRequests => {
                "The server has received too many requests in a given amount of time (rate limiting)."
            }
            Self::InternalServerError => {
                "The server has encountered a situation it does not know how to handle."
            }
            Self::BadGateway => {
                "The server, while acting as a gateway or proxy, received an invalid response from an inbound server."
            }
            Self::ServiceUnavailable => {
                "The server is not ready to handle the request. It may be down for maintenance or overloaded."
            }
            Self::GatewayTimeout => {
                "The server is acting as a gateway and cannot get a response in time."
            }
            Self::Unknown => "The server answered with an unexpected status.",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A failed chart request, classified by HTTP status.
///
/// Every failure of [`Chart::buffer`](crate::Chart::buffer) and friends is
/// reported through this type, including transport failures (status 500, or
/// 504 on timeout) and empty responses (status 404).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} ({status}): {message}")]
pub struct ChartError {
    status: u16,
    kind: ErrorKind,
    message: &'static str,
    raw: Option<String>,
}

impl ChartError {
    /// Build the classified error for `status`, keeping `raw` for diagnostics.
    #[must_use]
    pub fn classify(status: u16, raw: Option<String>) -> Self {
        let kind = ErrorKind::from_status(status);
        Self {
            status,
            kind,
            message: kind.message(),
            raw,
        }
    }

    pub(crate) fn from_transport(err: &reqwest::Error) -> Self {
        let status = if err.is_timeout() {
            StatusCode::GATEWAY_TIMEOUT.as_u16()
        } else {
            err.status()
                .map_or(StatusCode::INTERNAL_SERVER_ERROR.as_u16(), |status| status.as_u16())
        };
        Self::classify(status, Some(err.to_string()))
    }

    /// HTTP status code the error was classified from.
    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[must_use]
    pub fn message(&self) -> &str {
        self.message
    }

    /// Response body or transport error text, if any.
    #[must_use]
    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }
}

impl From<ConfigError> for ChartError {
    fn from(err: ConfigError) -> Self {
        Self::classify(StatusCode::BAD_REQUEST.as_u16(), Some(err.to_string()))
    }
}

impl From<io::Error> for ChartError {
    fn from(err: io::Error) -> Self {
        Self::classify(
            StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            Some(err.to_string()),
        )
    }
}

/// Errors raised while assembling client configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid base URL `{url}`: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("cannot read settings file {path}: {source}")]
    SettingsIo {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("malformed settings file {path}: {source}")]
    SettingsFormat {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Key rejected by the HMAC constructor; HMAC-SHA256 takes any key length.
    #[error("invalid signing secret: {0}")]
    InvalidSecret(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("user agent serialization error: {0}")]
    UserAgent(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_not_found() {
        let err = ChartError::classify(404, None);
        assert_eq!(err.status(), 404);
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.kind().label(), "Not Found");
        assert!(err.raw().is_none());
    }

    #[test]
    fn test_classify_documented_codes() {
        let table = [
            (400, "Bad Request"),
            (401, "Unauthorized"),
            (403, "Forbidden"),
            (405, "Method Not Found"),
            (409, "Conflict"),
            (429, "Too Many Requests"),
            (500, "Internal Server Error"),
            (502, "Bad Gateway"),
            (503, "Service Unavailable"),
            (504, "Gateway Timeout"),
        ];
        for (status, label) in table {
            let err = ChartError::classify(status, None);
            assert_eq!(err.kind().label(), label, "status {status}");
            assert_ne!(err.kind(), ErrorKind::Unknown);
        }
    }

    #[test]
    fn test_classify_unknown_status_falls_back() {
        let err = ChartError::classify(418, Some("teapot".to_owned()));
        assert_eq!(err.status(), 418);
        assert_eq!(err.kind(), ErrorKind::Unknown);
        assert_eq!(err.kind().label(), "Unknown Error");
        assert_eq!(err.raw(), Some("teapot"));
    }

    #[test]
    fn test_display_includes_label_and_status() {
        let err = ChartError::classify(429, None);
        let text = err.to_string();
        assert!(text.starts_with("Too Many Requests (429)"));
    }

    #[test]
    fn test_config_error_becomes_bad_request() {
        let err: ChartError = ConfigError::InvalidSecret("rejected".to_owned()).into();
        assert_eq!(err.status(), 400);
        assert_eq!(err.kind(), ErrorKind::BadRequest);
        assert!(err.raw().is_some_and(|raw| raw.contains("rejected")));
    }
}
