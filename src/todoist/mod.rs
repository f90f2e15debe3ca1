mod client;
mod error;
mod resource;

pub use error::ApiError;
pub use resource::*;

use client::Client;
use log::*;

pub const BASE_URL: &str = "https://api.todoist.com/api/v1";

/// Responsible for asynchronous interaction with the Todoist API including
/// transformation of response data into explicitly-defined types.
///
pub struct Todoist {
    client: Client,
}

impl Todoist {
    /// Returns a new instance for the given access token.
    ///
    pub fn new(access_token: &str) -> Todoist {
        Todoist::with_base_url(access_token, BASE_URL)
    }

    /// Returns a new instance talking to a custom API base URL.
    ///
    pub fn with_base_url(access_token: &str, base_url: &str) -> Todoist {
        debug!("Initializing Todoist client for {}...", base_url);
        Todoist {
            client: Client::new(access_token, base_url),
        }
    }

    /// Returns one page of active tasks.
    ///
    pub async fn list_tasks(&self, options: &ListTasksOptions) -> Result<TaskPage, ApiError> {
        debug!("Requesting tasks ({:?})...", options);
        let mut params = Vec::new();
        if let Some(cursor) = options.cursor.as_ref().filter(|c| !c.is_empty()) {
            params.push(("cursor", cursor.clone()));
        }
        if let Some(limit) = options.limit.filter(|l| *l > 0) {
            params.push(("limit", limit.to_string()));
        }
        let (results, next_cursor) = self.client.list::<Task>("tasks", &params).await?;
        debug!("Retrieved {} tasks", results.len());
        Ok(TaskPage {
            results,
            next_cursor,
        })
    }

    /// Returns the first page of projects.
    ///
    pub async fn list_projects(&self) -> Result<ProjectPage, ApiError> {
        debug!("Requesting projects...");
        let (results, next_cursor) = self.client.list::<Project>("projects", &[]).await?;
        debug!("Retrieved {} projects", results.len());
        Ok(ProjectPage {
            results,
            next_cursor,
        })
    }

    /// Mark a task as completed.
    ///
    pub async fn close_task(&self, task_id: &str) -> Result<(), ApiError> {
        debug!("Closing task {}...", task_id);
        self.client
            .post::<()>(&format!("tasks/{}/close", task_id), None)
            .await
    }

    /// Mark a completed task as active again.
    ///
    pub async fn reopen_task(&self, task_id: &str) -> Result<(), ApiError> {
        debug!("Reopening task {}...", task_id);
        self.client
            .post::<()>(&format!("tasks/{}/reopen", task_id), None)
            .await
    }

    /// Create a new task.
    ///
    pub async fn create_task(&self, options: &CreateTaskOptions) -> Result<(), ApiError> {
        debug!("Creating task '{}'...", options.content);
        self.client.post("tasks", Some(options)).await
    }

    /// Exchange an authorization code for an access token. This is the only
    /// call made without the bearer token.
    ///
    pub async fn exchange_code_for_token(
        &self,
        token_url: &str,
        code: &str,
        redirect_uri: &str,
        client_id: &str,
        client_secret: &str,
    ) -> Result<TokenResponse, ApiError> {
        debug!("Exchanging authorization code at {}...", token_url);
        self.client
            .post_form(
                token_url,
                &[
                    ("client_id", client_id),
                    ("client_secret", client_secret),
                    ("code", code),
                    ("redirect_uri", redirect_uri),
                ],
            )
            .await
    }

    /// Returns the projects and the first page of tasks together, the way
    /// the session loads and reloads its data.
    ///
    pub async fn snapshot(&self) -> Result<Snapshot, ApiError> {
        let projects = self.list_projects().await?;
        let tasks = self.list_tasks(&ListTasksOptions::default()).await?;
        if tasks.next_cursor.is_some() {
            info!("More tasks are available than fit on one page; showing the first page.");
        }
        Ok(Snapshot::new(tasks.results, projects.results))
    }
}
