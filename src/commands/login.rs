use crate::auth::{authorize, AuthConfig};
use crate::config::{Credential, CredentialStore};
use crate::error::AppResult;
use log::*;

/// Run a login attempt and persist the credential it yields. Nothing is
/// written unless the whole attempt succeeds.
///
pub async fn login<F>(auth: &AuthConfig, store: &CredentialStore, display: F) -> AppResult<Credential>
where
    F: FnOnce(&str),
{
    info!("Starting login...");
    let credential = authorize(auth, display).await?;
    store.save(&credential)?;
    info!("Login successful.");
    Ok(credential)
}

/// Show the authorize URL on stdout.
///
pub fn print_authorize_url(url: &str) {
    println!("Open this URL in your browser to authorize todoist-tui:\n\n{}\n", url);
    println!("Waiting for authorization...");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::tests::{capture_url, redirect_with, test_config};
    use crate::error::{AppError, AuthError};
    use httpmock::MockServer;
    use serde_json::json;

    #[tokio::test]
    async fn login_persists_credential() {
        let server = MockServer::start();
        server
            .mock_async(|when, then| {
                when.method("POST").path("/oauth/access_token");
                then.status(200)
                    .json_body(json!({ "access_token": "fresh-token", "token_type": "Bearer" }));
            })
            .await;
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path());

        let (display, query) = capture_url();
        let _browser = redirect_with(query, |q| {
            vec![("state", q["state"].clone()), ("code", "granted".to_string())]
        });
        let credential = login(&test_config(&server), &store, display).await.unwrap();

        assert_eq!(credential.access_token, "fresh-token");
        assert_eq!(store.load().unwrap(), credential);
    }

    #[tokio::test]
    async fn login_with_mismatched_state_persists_nothing() {
        let server = MockServer::start();
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path());

        let (display, query) = capture_url();
        let _browser = redirect_with(query, |_| {
            vec![("state", "forged".to_string()), ("code", "granted".to_string())]
        });
        let result = login(&test_config(&server), &store, display).await;

        assert!(matches!(result, Err(AppError::Auth(AuthError::StateMismatch))));
        assert!(!store.path().exists());
    }
}
