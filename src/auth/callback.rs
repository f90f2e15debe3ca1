//! Local loopback server receiving the OAuth redirect.
//!
//! The server answers a single route, `/callback`. The first request decides
//! the outcome: its code or its error is handed to the waiter through one of
//! two single-slot channels, and every later request only gets a page saying
//! the login was already handled.

use super::AuthError;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Html,
    routing::get,
    Router,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Upper bound on waiting for in-flight responses during shutdown.
///
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Query parameters of the authorization-code redirect.
///
#[derive(Debug, Default)]
pub(crate) struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

impl CallbackParams {
    /// Collect the known parameters from raw query pairs. A repeated key
    /// keeps its first value.
    ///
    pub(crate) fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = CallbackParams::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "code" => &mut params.code,
                "state" => &mut params.state,
                "error" => &mut params.error,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params
    }
}

/// Decide what a callback means for the login attempt.
///
pub(crate) fn classify(params: &CallbackParams, expected_state: &str) -> Result<String, AuthError> {
    if let Some(error) = params.error.as_ref().filter(|e| !e.is_empty()) {
        return Err(AuthError::ProviderDenied(error.clone()));
    }
    if params.state.as_deref() != Some(expected_state) {
        return Err(AuthError::StateMismatch);
    }
    match params.code.as_ref().filter(|c| !c.is_empty()) {
        Some(code) => Ok(code.clone()),
        None => Err(AuthError::MissingCode),
    }
}

/// Senders for the two outcomes. `handled` flips on the first callback so
/// only one outcome is ever delivered.
///
struct Slots {
    handled: bool,
    code: Option<oneshot::Sender<String>>,
    error: Option<oneshot::Sender<AuthError>>,
}

impl Slots {
    /// Deliver an outcome unless one was already delivered. Returns whether
    /// this call was the one that decided.
    ///
    fn deliver(&mut self, outcome: Result<String, AuthError>) -> bool {
        if self.handled {
            return false;
        }
        self.handled = true;
        match outcome {
            Ok(code) => {
                if let Some(tx) = self.code.take() {
                    let _ = tx.send(code);
                }
            }
            Err(error) => {
                if let Some(tx) = self.error.take() {
                    let _ = tx.send(error);
                }
            }
        }
        true
    }
}

#[derive(Clone)]
struct CallbackContext {
    expected_state: Arc<String>,
    slots: Arc<Mutex<Slots>>,
}

/// Running callback server plus the receiving ends of its outcome channels.
///
pub(crate) struct CallbackServer {
    code_rx: oneshot::Receiver<String>,
    error_rx: oneshot::Receiver<AuthError>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl CallbackServer {
    /// Start serving `/callback` on the given listener.
    ///
    pub(crate) fn spawn(listener: TcpListener, expected_state: String) -> Self {
        let (code_tx, code_rx) = oneshot::channel();
        let (error_tx, error_rx) = oneshot::channel();
        let slots = Arc::new(Mutex::new(Slots {
            handled: false,
            code: Some(code_tx),
            error: Some(error_tx),
        }));
        let app = Router::new()
            .route("/callback", get(callback))
            .with_state(CallbackContext {
                expected_state: Arc::new(expected_state),
                slots: Arc::clone(&slots),
            });

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            let server = axum::serve(listener, app).with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            });
            if let Err(e) = server.await {
                log::error!("Callback server failed: {}", e);
                if let Ok(mut slots) = slots.lock() {
                    slots.deliver(Err(AuthError::Server(e.to_string())));
                }
            }
        });

        CallbackServer {
            code_rx,
            error_rx,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    /// Wait for the first of: a code, an error, or the timeout.
    ///
    pub(crate) async fn wait(&mut self, timeout: Duration) -> Result<String, AuthError> {
        tokio::select! {
            code = &mut self.code_rx => {
                code.map_err(|_| AuthError::Server("callback server stopped".to_string()))
            }
            error = &mut self.error_rx => {
                Err(error.unwrap_or_else(|_| AuthError::Server("callback server stopped".to_string())))
            }
            _ = tokio::time::sleep(timeout) => Err(AuthError::Timeout),
        }
    }

    /// Stop the server and wait until the listener has been released.
    ///
    pub(crate) async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(mut handle) = self.handle.take() {
            if tokio::time::timeout(SHUTDOWN_GRACE, &mut handle).await.is_err() {
                log::warn!("Callback server did not stop in time, aborting it");
                handle.abort();
                let _ = handle.await;
            }
        }
        log::debug!("Callback server stopped");
    }
}

impl Drop for CallbackServer {
    fn drop(&mut self) {
        // Reached without `shutdown` only on early return, cancellation or panic.
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

async fn callback(
    State(context): State<CallbackContext>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> (StatusCode, Html<String>) {
    let params = CallbackParams::from_pairs(pairs);
    let outcome = classify(&params, &context.expected_state);
    let response = match &outcome {
        Ok(_) => (
            StatusCode::OK,
            page("Authorization successful!", "You can close this window."),
        ),
        Err(e) => (StatusCode::BAD_REQUEST, page("Authorization failed", &e.to_string())),
    };

    let decided = match context.slots.lock() {
        Ok(mut slots) => slots.deliver(outcome),
        Err(_) => false,
    };
    if decided {
        log::debug!("Handled authorization callback");
        response
    } else {
        log::warn!("Ignoring repeated authorization callback");
        (
            StatusCode::CONFLICT,
            page(
                "Authorization already handled",
                "This login attempt has already finished. You can close this window.",
            ),
        )
    }
}

fn page(title: &str, message: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html><html><head><title>{title}</title></head>\
         <body><h1>{title}</h1><p>{message}</p></body></html>",
        title = escape(title),
        message = escape(message),
    ))
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
