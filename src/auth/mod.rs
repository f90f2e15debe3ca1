//! OAuth authorization-code login.
//!
//! A login attempt binds the fixed loopback port, shows the authorize URL,
//! waits (bounded) for the provider to redirect back to `/callback`, and
//! exchanges the received code for an access token. The callback server is
//! torn down before `authorize` returns, whatever the outcome.

mod callback;
mod error;

pub use error::AuthError;

use crate::config::Credential;
use crate::todoist::Todoist;
use callback::CallbackServer;
use log::*;
use rand::rngs::OsRng;
use rand::RngCore;
use reqwest::Url;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;
use tokio::net::TcpListener;

pub const AUTHORIZE_URL: &str = "https://todoist.com/oauth/authorize";
pub const TOKEN_URL: &str = "https://todoist.com/oauth/access_token";
pub const DEFAULT_SCOPES: &str = "data:read_write,data:delete";
pub const CALLBACK_PORT: u16 = 47829;
pub const AUTHORIZATION_TIMEOUT: Duration = Duration::from_secs(5 * 60);

const STATE_BYTES: usize = 16;

/// Everything a login attempt needs, passed in explicitly.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub scopes: String,
    pub authorize_url: String,
    pub token_url: String,
    pub port: u16,
    pub timeout: Duration,
}

impl AuthConfig {
    /// Returns a configuration for the Todoist provider with default scopes,
    /// port and timeout.
    ///
    pub fn new(client_id: &str, client_secret: &str) -> Self {
        AuthConfig {
            client_id: client_id.to_owned(),
            client_secret: client_secret.to_owned(),
            scopes: DEFAULT_SCOPES.to_owned(),
            authorize_url: AUTHORIZE_URL.to_owned(),
            token_url: TOKEN_URL.to_owned(),
            port: CALLBACK_PORT,
            timeout: AUTHORIZATION_TIMEOUT,
        }
    }
}

/// Returns a fresh hex-encoded state nonce from the OS random source.
///
pub fn generate_state() -> String {
    let mut bytes = [0u8; STATE_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Returns the provider URL the user opens to grant access.
///
pub fn build_authorize_url(
    config: &AuthConfig,
    state: &str,
    redirect_uri: &str,
) -> Result<String, AuthError> {
    Url::parse_with_params(
        &config.authorize_url,
        [
            ("client_id", config.client_id.as_str()),
            ("scope", config.scopes.as_str()),
            ("state", state),
            ("redirect_uri", redirect_uri),
            ("response_type", "code"),
        ],
    )
    .map(|url| url.to_string())
    .map_err(|e| AuthError::InvalidAuthorizeUrl(e.to_string()))
}

/// Run a complete login attempt. `display` receives the authorize URL once
/// the callback server is listening; it is responsible for showing it.
///
pub async fn authorize<F>(config: &AuthConfig, display: F) -> Result<Credential, AuthError>
where
    F: FnOnce(&str),
{
    let state = generate_state();
    let listener = bind(config.port).await?;
    let port = listener
        .local_addr()
        .map(|addr| addr.port())
        .unwrap_or(config.port);
    let redirect_uri = format!("http://localhost:{}/callback", port);
    let authorize_url = build_authorize_url(config, &state, &redirect_uri)?;

    let mut server = CallbackServer::spawn(listener, state);
    info!("Waiting for authorization callback on port {}...", port);
    display(&authorize_url);

    let outcome = server.wait(config.timeout).await;
    server.shutdown().await;
    let code = outcome.map_err(|e| {
        warn!("Authorization attempt failed: {}", e);
        e
    })?;

    info!("Received authorization code, exchanging it for a token...");
    exchange(config, &code, &redirect_uri).await
}

async fn bind(port: u16) -> Result<TcpListener, AuthError> {
    let address = SocketAddr::from((Ipv4Addr::LOCALHOST, port));
    TcpListener::bind(address)
        .await
        .map_err(|source| AuthError::PortUnavailable { port, source })
}

async fn exchange(
    config: &AuthConfig,
    code: &str,
    redirect_uri: &str,
) -> Result<Credential, AuthError> {
    let token = Todoist::new("")
        .exchange_code_for_token(
            &config.token_url,
            code,
            redirect_uri,
            &config.client_id,
            &config.client_secret,
        )
        .await
        .map_err(|e| AuthError::TokenExchangeFailed(e.to_string()))?;

    if let Some(error) = token.error.filter(|e| !e.is_empty()) {
        return Err(AuthError::TokenExchangeFailed(format!(
            "token exchange error: {}",
            error
        )));
    }
    if token.access_token.is_empty() {
        return Err(AuthError::TokenExchangeFailed(
            "empty access token received".to_string(),
        ));
    }

    Ok(Credential {
        access_token: token.access_token,
        token_type: token.token_type,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use httpmock::MockServer;
    use serde_json::json;
    use std::collections::HashMap;
    use tokio::sync::oneshot;

    /// Returns a config pointing at the mock token endpoint and an OS-chosen port.
    ///
    pub(crate) fn test_config(server: &MockServer) -> AuthConfig {
        AuthConfig {
            token_url: server.url("/oauth/access_token"),
            port: 0,
            timeout: Duration::from_secs(10),
            ..AuthConfig::new("client-id", "client-secret")
        }
    }

    /// Returns a display callback forwarding the authorize URL query.
    ///
    pub(crate) fn capture_url() -> (
        impl FnOnce(&str),
        oneshot::Receiver<HashMap<String, String>>,
    ) {
        let (tx, rx) = oneshot::channel();
        let display = move |url: &str| {
            let query = Url::parse(url)
                .map(|u| u.query_pairs().into_owned().collect())
                .unwrap_or_default();
            let _ = tx.send(query);
        };
        (display, rx)
    }

    /// Hit the callback endpoint named in the authorize URL with extra params.
    ///
    pub(crate) fn redirect_with(
        query: oneshot::Receiver<HashMap<String, String>>,
        params: fn(&HashMap<String, String>) -> Vec<(&'static str, String)>,
    ) -> tokio::task::JoinHandle<Option<u16>> {
        tokio::spawn(async move {
            let query = query.await.ok()?;
            let redirect_uri = query.get("redirect_uri")?.clone();
            let response = reqwest::Client::new()
                .get(redirect_uri.replace("localhost", "127.0.0.1"))
                .query(&params(&query))
                .send()
                .await
                .ok()?;
            Some(response.status().as_u16())
        })
    }

    fn port_of(query: &HashMap<String, String>) -> u16 {
        query
            .get("redirect_uri")
            .and_then(|uri| Url::parse(uri).ok())
            .and_then(|url| url.port())
            .unwrap_or_default()
    }

    #[test]
    fn generate_state_is_random_hex() {
        let first = generate_state();
        let second = generate_state();
        assert_eq!(first.len(), STATE_BYTES * 2);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(hex::decode(&first).unwrap().len(), STATE_BYTES);
        assert_ne!(first, second);
    }

    #[test]
    fn build_authorize_url_encodes_parameters() {
        let config = AuthConfig::new("my id", "secret");
        let url = build_authorize_url(&config, "nonce", "http://localhost:47829/callback").unwrap();
        let parsed = Url::parse(&url).unwrap();
        let query: HashMap<String, String> = parsed.query_pairs().into_owned().collect();
        assert!(url.starts_with(AUTHORIZE_URL));
        assert_eq!(query["client_id"], "my id");
        assert_eq!(query["scope"], DEFAULT_SCOPES);
        assert_eq!(query["state"], "nonce");
        assert_eq!(query["redirect_uri"], "http://localhost:47829/callback");
        assert_eq!(query["response_type"], "code");
        assert!(!query.contains_key("client_secret"));
    }

    #[tokio::test]
    async fn authorize_success() {
        let server = MockServer::start();
        let token = server
            .mock_async(|when, then| {
                when.method("POST")
                    .path("/oauth/access_token")
                    .x_www_form_urlencoded_tuple("code", "granted-code")
                    .x_www_form_urlencoded_tuple("client_secret", "client-secret");
                then.status(200)
                    .json_body(json!({ "access_token": "secret-token", "token_type": "Bearer" }));
            })
            .await;

        let (display, query) = capture_url();
        let browser = redirect_with(query, |q| {
            vec![("state", q["state"].clone()), ("code", "granted-code".to_string())]
        });
        let credential = authorize(&test_config(&server), display).await.unwrap();

        token.assert_async().await;
        assert_eq!(credential.access_token, "secret-token");
        assert_eq!(credential.token_type, "Bearer");
        assert_eq!(browser.await.unwrap(), Some(200));
    }

    #[tokio::test]
    async fn authorize_state_mismatch() {
        let server = MockServer::start();
        let token = server
            .mock_async(|when, then| {
                when.method("POST").path("/oauth/access_token");
                then.status(200).json_body(json!({ "access_token": "never" }));
            })
            .await;

        let (display, query) = capture_url();
        let browser = redirect_with(query, |_| {
            vec![("state", "forged".to_string()), ("code", "stolen".to_string())]
        });
        let result = authorize(&test_config(&server), display).await;

        assert!(matches!(result, Err(AuthError::StateMismatch)));
        assert_eq!(token.hits_async().await, 0);
        assert_eq!(browser.await.unwrap(), Some(400));
    }

    #[tokio::test]
    async fn authorize_takes_first_of_repeated_code() {
        let server = MockServer::start();
        let token = server
            .mock_async(|when, then| {
                when.method("POST")
                    .path("/oauth/access_token")
                    .x_www_form_urlencoded_tuple("code", "first");
                then.status(200)
                    .json_body(json!({ "access_token": "secret-token", "token_type": "Bearer" }));
            })
            .await;

        let (display, query) = capture_url();
        let browser = redirect_with(query, |q| {
            vec![
                ("state", q["state"].clone()),
                ("code", "first".to_string()),
                ("code", "second".to_string()),
            ]
        });
        let credential = authorize(&test_config(&server), display).await.unwrap();

        token.assert_async().await;
        assert_eq!(credential.access_token, "secret-token");
        assert_eq!(browser.await.unwrap(), Some(200));
    }

    #[tokio::test]
    async fn authorize_access_denied_releases_port() {
        let server = MockServer::start();
        let (display, query) = capture_url();
        let (port_tx, port_rx) = oneshot::channel();
        let display = move |url: &str| {
            let query = Url::parse(url)
                .map(|u| u.query_pairs().into_owned().collect::<HashMap<_, _>>())
                .unwrap_or_default();
            let _ = port_tx.send(port_of(&query));
            display(url);
        };
        let browser = redirect_with(query, |q| {
            vec![("state", q["state"].clone()), ("error", "access_denied".to_string())]
        });

        let result = authorize(&test_config(&server), display).await;
        assert!(matches!(&result, Err(AuthError::ProviderDenied(e)) if e == "access_denied"));
        assert_eq!(browser.await.unwrap(), Some(400));

        let port = port_rx.await.unwrap();
        assert_ne!(port, 0);
        let rebound = TcpListener::bind(SocketAddr::from((Ipv4Addr::LOCALHOST, port))).await;
        assert!(rebound.is_ok());
    }

    #[tokio::test]
    async fn authorize_timeout() {
        let server = MockServer::start();
        let config = AuthConfig {
            timeout: Duration::from_millis(50),
            ..test_config(&server)
        };
        let result = authorize(&config, |_| {}).await;
        assert!(matches!(result, Err(AuthError::Timeout)));
    }

    #[tokio::test]
    async fn authorize_port_unavailable() {
        let server = MockServer::start();
        let taken = TcpListener::bind(SocketAddr::from((Ipv4Addr::LOCALHOST, 0)))
            .await
            .unwrap();
        let config = AuthConfig {
            port: taken.local_addr().unwrap().port(),
            ..test_config(&server)
        };
        let result = authorize(&config, |_| {}).await;
        assert!(matches!(result, Err(AuthError::PortUnavailable { .. })));
    }

    #[tokio::test]
    async fn authorize_empty_token() {
        let server = MockServer::start();
        server
            .mock_async(|when, then| {
                when.method("POST").path("/oauth/access_token");
                then.status(200).json_body(json!({ "access_token": "", "token_type": "Bearer" }));
            })
            .await;

        let (display, query) = capture_url();
        let _browser = redirect_with(query, |q| {
            vec![("state", q["state"].clone()), ("code", "granted-code".to_string())]
        });
        let result = authorize(&test_config(&server), display).await;
        assert!(matches!(result, Err(AuthError::TokenExchangeFailed(_))));
    }

    #[tokio::test]
    async fn authorize_provider_error_in_token_response() {
        let server = MockServer::start();
        server
            .mock_async(|when, then| {
                when.method("POST").path("/oauth/access_token");
                then.status(400).json_body(json!({ "error": "invalid_grant" }));
            })
            .await;

        let (display, query) = capture_url();
        let _browser = redirect_with(query, |q| {
            vec![("state", q["state"].clone()), ("code", "reused-code".to_string())]
        });
        let result = authorize(&test_config(&server), display).await;
        assert!(matches!(&result, Err(AuthError::TokenExchangeFailed(e)) if e.contains("invalid_grant")));
    }
}
