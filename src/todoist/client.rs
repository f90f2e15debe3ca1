//! HTTP client for Todoist API requests.
//!
//! This module provides a low-level HTTP client wrapper for making requests
//! to the Todoist API, handling authentication, status mapping, and lenient
//! decoding of list responses.

use super::error::ApiError;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Raw list envelope. Items are decoded one by one so a single unexpected
/// entry does not discard the whole page.
///
#[derive(Deserialize)]
struct ListEnvelope {
    results: Vec<serde_json::Value>,
    #[serde(default)]
    next_cursor: Option<String>,
}

/// Makes requests to Todoist and tries to conform response data to given model.
///
pub struct Client {
    pub(crate) access_token: String,
    pub(crate) base_url: String,
    http_client: reqwest::Client,
}

impl Client {
    /// Returns a new instance for the given access token and base URL.
    ///
    pub fn new(access_token: &str, base_url: &str) -> Self {
        Client {
            access_token: access_token.to_owned(),
            base_url: base_url.trim_end_matches('/').to_owned(),
            http_client: reqwest::Client::new(),
        }
    }

    /// Return the decoded items of a list endpoint and the next page cursor.
    /// Items that fail to decode are logged and skipped.
    ///
    pub async fn list<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<(Vec<T>, Option<String>), ApiError> {
        let response = self
            .request(Method::GET, path)
            .query(params)
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        let bytes = response.bytes().await?;
        let envelope: ListEnvelope = serde_json::from_slice(&bytes).map_err(|e| {
            log::error!(
                "Failed to decode list response from {}: {}. Response body: {}",
                path,
                e,
                String::from_utf8_lossy(&bytes)
            );
            ApiError::MalformedResponse(e.to_string())
        })?;

        let total = envelope.results.len();
        let items: Vec<T> = envelope
            .results
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<T>(value) {
                Ok(item) => Some(item),
                Err(e) => {
                    log::warn!("Skipping undecodable item from {}: {}", path, e);
                    None
                }
            })
            .collect();
        log::debug!("Decoded {} of {} items from {}", items.len(), total, path);

        Ok((items, envelope.next_cursor.filter(|c| !c.is_empty())))
    }

    /// Send a POST with an optional JSON body, discarding any response body.
    ///
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<(), ApiError> {
        let mut request = self.request(Method::POST, path);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        Self::check_status(response).await?;
        Ok(())
    }

    /// Send a form-encoded POST to an absolute URL without the bearer token
    /// and decode its JSON response.
    ///
    pub async fn post_form<T: DeserializeOwned>(
        &self,
        url: &str,
        form: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let response = self.http_client.post(url).form(form).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        match serde_json::from_slice::<T>(&bytes) {
            Ok(data) => Ok(data),
            Err(_) if !status.is_success() => Err(ApiError::HttpStatus {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            }),
            Err(e) => Err(ApiError::MalformedResponse(e.to_string())),
        }
    }

    /// Build an authenticated request for an endpoint relative to the base URL.
    ///
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        log::debug!("{} {}", method, url);
        self.http_client
            .request(method, url)
            .header("Authorization", format!("Bearer {}", &self.access_token))
    }

    /// Map unauthorized and other non-success statuses to errors.
    ///
    async fn check_status(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            log::warn!("API rejected the access token");
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("Unable to read response"));
            log::error!("API request failed with status {}: {}", status, body);
            return Err(ApiError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}
