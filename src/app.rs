use crate::config::{Config, Credential};
use crate::error::{AppError, AppResult};
use crate::events::network::Handler as NetworkHandler;
use crate::events::terminal;
use crate::state::{Command, Event, State};
use crate::todoist::Todoist;
use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::*;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::io::{self, stdout, Stdout};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Capacity of the session event queue.
///
const EVENT_CHANNEL_CAPACITY: usize = 64;

pub type EventSender = mpsc::Sender<Event>;
type EventReceiver = mpsc::Receiver<Event>;

/// Oversees event processing, state management, and terminal output.
///
pub struct App {
    state: State,
    network: NetworkHandler,
}

impl App {
    pub fn new(state: State, network: NetworkHandler) -> Self {
        App { state, network }
    }

    /// Start a session for the given credential. The initial snapshot must
    /// load before the terminal is touched; failing to load it ends the
    /// session with an error.
    ///
    pub async fn start(config: &Config, credential: &Credential) -> Result<()> {
        info!("Starting application...");
        let todoist = Arc::new(Todoist::new(&credential.access_token));

        info!("Fetching initial tasks and projects...");
        let snapshot = todoist.snapshot().await.map_err(AppError::from)?;
        info!(
            "Loaded {} tasks across {} projects.",
            snapshot.tasks.len(),
            snapshot.project_names.len()
        );

        let mut app = App::new(
            State::new(snapshot, config.hotkeys.clone()),
            NetworkHandler::new(todoist),
        );
        app.start_ui().await?;

        info!("Exiting application...");
        Ok(())
    }

    /// Set up the terminal, start the input thread and run the render loop on
    /// the current task. The terminal is restored however the loop ends.
    ///
    async fn start_ui(&mut self) -> Result<()> {
        debug!("Starting user interface...");
        let mut terminal = TerminalGuard::enter()?;

        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        terminal::spawn(tx.clone());
        let result = self.run(terminal.terminal(), tx, rx).await;

        terminal.restore().map_err(terminal_error)?;
        result
    }

    /// Render, wait for one event, apply it, repeat until quit.
    ///
    async fn run<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        tx: EventSender,
        mut rx: EventReceiver,
    ) -> Result<()> {
        loop {
            terminal.draw(|frame| crate::ui::render(frame, &self.state))?;
            let Some(event) = rx.recv().await else {
                debug!("Event channel closed.");
                break;
            };
            match self.state.handle(event) {
                Some(Command::Quit) => {
                    debug!("Received application exit request.");
                    break;
                }
                Some(command) => self.dispatch(command, &tx),
                None => {}
            }
        }
        Ok(())
    }

    /// Run a command on its own task and post its result back to the loop.
    ///
    fn dispatch(&self, command: Command, tx: &EventSender) {
        let network = self.network.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            if let Some(event) = network.handle(command).await {
                if tx.send(event).await.is_err() {
                    debug!("Dropping command result after session end.");
                }
            }
        });
    }
}

/// Raw-mode alternate screen that is left again on drop.
///
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    active: bool,
}

impl TerminalGuard {
    fn enter() -> AppResult<Self> {
        let mut stdout = stdout();
        enable_raw_mode().map_err(terminal_error)?;
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(terminal_error(e));
        }
        let terminal = match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => terminal,
            Err(e) => {
                let _ = execute!(io::stdout(), LeaveAlternateScreen);
                let _ = disable_raw_mode();
                return Err(terminal_error(e));
            }
        };
        // From here on a failure is undone by `Drop`.
        let mut guard = TerminalGuard {
            terminal,
            active: true,
        };
        guard.terminal.hide_cursor().map_err(terminal_error)?;
        Ok(guard)
    }

    fn terminal(&mut self) -> &mut Terminal<CrosstermBackend<Stdout>> {
        &mut self.terminal
    }

    fn restore(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()
    }
}

fn terminal_error(error: io::Error) -> AppError {
    AppError::Terminal(error.to_string())
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Reached with `active` set only on error or panic.
        if let Err(e) = self.restore() {
            error!("Failed to restore terminal: {}", e);
        }
    }
}
