use super::event::{Command, Event};
use super::form::TaskInput;
use super::navigation::{Mode, StatusMessage};
use super::tasks::{sort_tasks, visible_tasks};
use crate::config::hotkeys::{action_for, HotkeyAction, SessionHotkeys};
use crate::todoist::{ApiError, Snapshot, Task};
use crate::ui::SPINNER_FRAME_COUNT;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::*;
use std::collections::{HashMap, HashSet};

/// Houses data representative of session state.
///
/// `all_tasks` is the only task collection; the rows on screen are derived
/// from it on demand so they can never drift from it.
pub struct State {
    mode: Mode,
    all_tasks: Vec<Task>,                 // kept sorted by due date
    project_names: HashMap<String, String>, // project id -> name
    show_done: bool,
    pending: HashSet<String>, // ids with an outstanding toggle
    input: TaskInput,
    loading: bool,
    reload_generation: u64, // latest reload issued
    selected: usize, // index into the visible rows
    spinner_index: usize,
    status: Option<StatusMessage>,
    hotkeys: SessionHotkeys,
}

/// Defines default session state.
///
impl Default for State {
    fn default() -> State {
        State {
            mode: Mode::Browsing,
            all_tasks: vec![],
            project_names: HashMap::new(),
            show_done: false,
            pending: HashSet::new(),
            input: TaskInput::default(),
            loading: false,
            reload_generation: 0,
            selected: 0,
            spinner_index: 0,
            status: None,
            hotkeys: SessionHotkeys::default(),
        }
    }
}

impl State {
    /// Returns a session over an initial snapshot.
    ///
    pub fn new(snapshot: Snapshot, hotkeys: SessionHotkeys) -> State {
        let mut state = State {
            hotkeys,
            ..State::default()
        };
        state.replace_snapshot(snapshot);
        state
    }

    /// Apply one event and return the command it asks for, if any.
    ///
    pub fn handle(&mut self, event: Event) -> Option<Command> {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Tick => {
                self.advance_spinner_index();
                None
            }
            Event::ReloadResult { generation, result } => {
                if generation != self.reload_generation {
                    debug!(
                        "Dropping reload {} superseded by {}",
                        generation, self.reload_generation
                    );
                    return None;
                }
                self.loading = false;
                match result {
                    Ok(snapshot) => {
                        debug!("Reloaded {} tasks", snapshot.tasks.len());
                        self.replace_snapshot(snapshot);
                    }
                    Err(e) => self.surface_error("Failed to load tasks", &e),
                }
                None
            }
            Event::ToggleDoneResult {
                id,
                checked,
                result,
            } => {
                self.pending.remove(&id);
                match result {
                    Ok(()) => {
                        match self.all_tasks.iter_mut().find(|task| task.id == id) {
                            Some(task) => task.checked = checked,
                            None => debug!("Toggled task {} is no longer loaded", id),
                        }
                        self.clamp_selection();
                    }
                    Err(e) => self.surface_error("Failed to update task", &e),
                }
                None
            }
            Event::CreateTaskResult(result) => match result {
                Ok(()) => {
                    info!("Task created");
                    self.input.clear();
                    self.mode = Mode::Browsing;
                    self.status = Some(StatusMessage::info("Task created"));
                    Some(self.issue_reload())
                }
                Err(e) => {
                    self.surface_error("Failed to create task", &e);
                    None
                }
            },
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<Command> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(Command::Quit);
        }
        self.status = None;
        match self.mode {
            Mode::Browsing => self.handle_browsing_key(key),
            Mode::ComposingTask => self.handle_composing_key(key),
        }
    }

    fn handle_browsing_key(&mut self, key: KeyEvent) -> Option<Command> {
        match action_for(&key, &self.hotkeys.browsing)? {
            HotkeyAction::Quit => Some(Command::Quit),
            HotkeyAction::AddTask => {
                self.input.clear();
                self.mode = Mode::ComposingTask;
                None
            }
            HotkeyAction::ToggleFilter => {
                self.show_done = !self.show_done;
                self.clamp_selection();
                None
            }
            HotkeyAction::ToggleDone => self.toggle_selected(),
            HotkeyAction::Reload => self.request_reload(),
            HotkeyAction::NavigateNext => {
                self.select_next();
                None
            }
            HotkeyAction::NavigatePrev => {
                self.select_prev();
                None
            }
            HotkeyAction::Confirm | HotkeyAction::Cancel => None,
        }
    }

    fn handle_composing_key(&mut self, key: KeyEvent) -> Option<Command> {
        match action_for(&key, &self.hotkeys.composing) {
            Some(HotkeyAction::Confirm) => match self.input.content() {
                Ok(content) => Some(Command::CreateTask { content }),
                Err(e) => {
                    debug!("Ignoring confirm: {}", e);
                    None
                }
            },
            Some(HotkeyAction::Cancel) => {
                self.mode = Mode::Browsing;
                None
            }
            _ => {
                self.input.input(key);
                None
            }
        }
    }

    fn toggle_selected(&mut self) -> Option<Command> {
        let (id, checked) = self
            .visible_tasks()
            .get(self.selected)
            .map(|task| (task.id.clone(), task.checked))?;
        if !self.pending.insert(id.clone()) {
            debug!("Task {} already has a toggle in flight", id);
            return None;
        }
        Some(Command::ToggleDone { id, checked })
    }

    fn request_reload(&mut self) -> Option<Command> {
        if self.loading {
            debug!("Reload already in flight");
            return None;
        }
        Some(self.issue_reload())
    }

    /// Start a reload that supersedes any still in flight.
    ///
    fn issue_reload(&mut self) -> Command {
        self.loading = true;
        self.reload_generation += 1;
        Command::Reload {
            generation: self.reload_generation,
        }
    }

    fn replace_snapshot(&mut self, snapshot: Snapshot) {
        let mut tasks = snapshot.tasks;
        sort_tasks(&mut tasks);
        self.all_tasks = tasks;
        self.project_names = snapshot.project_names;
        self.clamp_selection();
    }

    fn surface_error(&mut self, context: &str, error: &ApiError) {
        error!("{}: {}", context, error);
        let text = if error.is_unauthorized() {
            "Not authorized, run `todoist-tui login` and try again".to_string()
        } else {
            format!("{}: {}", context, error)
        };
        self.status = Some(StatusMessage::error(text));
    }

    fn select_next(&mut self) {
        if self.selected + 1 < self.visible_tasks().len() {
            self.selected += 1;
        }
    }

    fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        let rows = self.visible_tasks().len();
        self.selected = self.selected.min(rows.saturating_sub(1));
    }

    /// Advance the spinner index.
    ///
    pub fn advance_spinner_index(&mut self) -> &mut Self {
        self.spinner_index += 1;
        if self.spinner_index >= SPINNER_FRAME_COUNT {
            self.spinner_index = 0;
        }
        self
    }

    /// Return the current spinner index.
    ///
    pub fn get_spinner_index(&self) -> &usize {
        &self.spinner_index
    }

    /// Return the rows currently on screen.
    ///
    pub fn visible_tasks(&self) -> Vec<&Task> {
        visible_tasks(&self.all_tasks, self.show_done)
    }

    pub fn all_tasks(&self) -> &[Task] {
        &self.all_tasks
    }

    pub fn project_names(&self) -> &HashMap<String, String> {
        &self.project_names
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn show_done(&self) -> bool {
        self.show_done
    }

    pub fn is_pending(&self, id: &str) -> bool {
        self.pending.contains(id)
    }

    pub fn pending(&self) -> &HashSet<String> {
        &self.pending
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn input(&self) -> &TaskInput {
        &self.input
    }

    pub fn get_status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn get_hotkeys(&self) -> &SessionHotkeys {
        &self.hotkeys
    }
}
