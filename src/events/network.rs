use crate::state::{Command, Event};
use crate::todoist::{CreateTaskOptions, Todoist};
use log::*;
use std::sync::Arc;

/// Executes session commands against the API.
///
#[derive(Clone)]
pub struct Handler {
    todoist: Arc<Todoist>,
}

impl Handler {
    /// Return new instance sharing the API client.
    ///
    pub fn new(todoist: Arc<Todoist>) -> Self {
        Handler { todoist }
    }

    /// Run one command and return the event carrying its result. `Quit` has
    /// no result and is handled by the session loop itself.
    ///
    pub async fn handle(&self, command: Command) -> Option<Event> {
        debug!("Processing network command '{:?}'...", command);
        match command {
            Command::Quit => None,
            Command::Reload { generation } => Some(Event::ReloadResult {
                generation,
                result: self.todoist.snapshot().await,
            }),
            Command::ToggleDone { id, checked } => {
                let result = if checked {
                    self.todoist.reopen_task(&id).await
                } else {
                    self.todoist.close_task(&id).await
                };
                if let Err(e) = &result {
                    warn!("Toggling task {} failed: {}", id, e);
                }
                Some(Event::ToggleDoneResult {
                    id,
                    checked: !checked,
                    result,
                })
            }
            Command::CreateTask { content } => {
                let result = self
                    .todoist
                    .create_task(&CreateTaskOptions::new(content))
                    .await;
                Some(Event::CreateTaskResult(result))
            }
        }
    }
}
