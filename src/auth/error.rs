//! Authorization-specific error types.

/// Errors that end a login attempt. None of them are retried automatically.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The fixed callback port could not be bound
    #[error("Failed to start local callback server on port {port}: {source}")]
    PortUnavailable {
        port: u16,
        source: std::io::Error,
    },

    /// Callback carried a state parameter other than the one we issued
    #[error("Invalid state parameter in authorization callback")]
    StateMismatch,

    /// Provider redirected back with an error parameter
    #[error("Authorization error: {0}")]
    ProviderDenied(String),

    /// Callback had a valid state but no code
    #[error("Missing authorization code in callback")]
    MissingCode,

    /// Nobody completed the authorization in time
    #[error("Authorization timeout")]
    Timeout,

    /// Code could not be exchanged for a usable token
    #[error("Failed to exchange code for token: {0}")]
    TokenExchangeFailed(String),

    /// Authorize URL could not be built from the configuration
    #[error("Invalid authorize URL: {0}")]
    InvalidAuthorizeUrl(String),

    /// Callback server failed while waiting
    #[error("Callback server error: {0}")]
    Server(String),
}
