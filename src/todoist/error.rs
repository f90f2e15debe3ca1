//! Todoist API-specific error types.

/// Errors that can occur during Todoist API operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The access token was rejected
    #[error("Unauthorized: the access token was rejected, please login again")]
    Unauthorized,

    /// API returned an unexpected status
    #[error("API error (status {status}): {body}")]
    HttpStatus { status: u16, body: String },

    /// Response body did not have the expected shape
    #[error("Malformed API response: {0}")]
    MalformedResponse(String),

    /// HTTP request failed before a response was received
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl ApiError {
    /// Whether the caller should prompt for re-authorization.
    ///
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(error: serde_json::Error) -> Self {
        ApiError::MalformedResponse(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let error = ApiError::Unauthorized;
        assert!(error.to_string().contains("login again"));
        assert!(error.is_unauthorized());

        let error = ApiError::HttpStatus {
            status: 503,
            body: "Service Unavailable".to_string(),
        };
        let error_str = error.to_string();
        assert!(error_str.contains("503"));
        assert!(error_str.contains("Service Unavailable"));
        assert!(!error.is_unauthorized());
    }

    #[test]
    fn test_api_error_from_serde() {
        let serde_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: ApiError = serde_error.into();
        assert!(matches!(error, ApiError::MalformedResponse(_)));
    }
}
