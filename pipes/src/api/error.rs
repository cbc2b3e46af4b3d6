use thiserror::Error;

use super::common::ApiErrorDetails;

/// Classification of a failed API call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    VersionConflict,
    Forbidden,
    InvalidInput,
    RateLimited,
    Transient,
}

impl ErrorKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            404 => ErrorKind::NotFound,
            409 => ErrorKind::VersionConflict,
            401 | 403 => ErrorKind::Forbidden,
            429 => ErrorKind::RateLimited,
            400..=499 => ErrorKind::InvalidInput,
            _ => ErrorKind::Transient,
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API returned error (HTTP {status}): {message}")]
    Status {
        status: u16,
        kind: ErrorKind,
        message: String,
        #[source]
        details: Option<Box<ApiErrorDetails>>,
    },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// HTTP status of the response, when the request reached the server
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Status { kind, .. } => *kind,
            ApiError::Request(_) | ApiError::Parse(_) => ErrorKind::Transient,
            ApiError::InvalidUrl(_) => ErrorKind::InvalidInput,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    pub fn is_forbidden(&self) -> bool {
        self.status() == Some(403)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_map_to_kinds() {
        assert_eq!(ErrorKind::from_status(404), ErrorKind::NotFound);
        assert_eq!(ErrorKind::from_status(409), ErrorKind::VersionConflict);
        assert_eq!(ErrorKind::from_status(401), ErrorKind::Forbidden);
        assert_eq!(ErrorKind::from_status(403), ErrorKind::Forbidden);
        assert_eq!(ErrorKind::from_status(422), ErrorKind::InvalidInput);
        assert_eq!(ErrorKind::from_status(429), ErrorKind::RateLimited);
        assert_eq!(ErrorKind::from_status(502), ErrorKind::Transient);
    }

    #[test]
    fn forbidden_means_403_only() {
        let unauthorized = ApiError::Status {
            status: 401,
            kind: ErrorKind::from_status(401),
            message: "token expired".to_string(),
            details: None,
        };
        assert_eq!(unauthorized.kind(), ErrorKind::Forbidden);
        assert!(!unauthorized.is_forbidden());
    }
}
