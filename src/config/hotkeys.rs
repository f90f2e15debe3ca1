//! Hotkey configuration management.
//!
//! Actions are bound per session mode. Bindings are written in the config
//! file as short strings such as `q`, `enter` or `ctrl+r`, and any action
//! can carry more than one key.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Represents all possible actions that can be bound to hotkeys.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HotkeyAction {
    // Browsing
    Quit,
    AddTask,
    ToggleFilter,
    ToggleDone,
    Reload,
    NavigateNext,
    NavigatePrev,

    // ComposingTask
    Confirm,
    Cancel,
}

impl HotkeyAction {
    /// Every action, in the order key lookups try them.
    ///
    pub const ALL: [HotkeyAction; 9] = [
        HotkeyAction::Quit,
        HotkeyAction::AddTask,
        HotkeyAction::ToggleFilter,
        HotkeyAction::ToggleDone,
        HotkeyAction::Reload,
        HotkeyAction::NavigateNext,
        HotkeyAction::NavigatePrev,
        HotkeyAction::Confirm,
        HotkeyAction::Cancel,
    ];
}

/// Represents a key combination (KeyCode + modifiers).
///
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Hotkey {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl Hotkey {
    pub fn new(code: KeyCode) -> Self {
        Hotkey {
            code,
            modifiers: KeyModifiers::empty(),
        }
    }

    pub fn char(c: char) -> Self {
        Hotkey::new(KeyCode::Char(c))
    }
}

impl FromStr for Hotkey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("empty hotkey".to_string());
        }
        // A trailing "+" after a "+" separator is the plus key itself.
        let (prefix, key) = if s == "+" {
            ("", "+")
        } else if let Some(stripped) = s.strip_suffix("++") {
            (stripped, "+")
        } else {
            match s.rsplit_once('+') {
                Some((mods, key)) => (mods, key),
                None => ("", s),
            }
        };

        let mut modifiers = KeyModifiers::empty();
        for part in prefix.split('+').filter(|p| !p.is_empty()) {
            match part.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                "alt" => modifiers |= KeyModifiers::ALT,
                other => return Err(format!("unknown modifier '{}' in '{}'", other, s)),
            }
        }

        let mut chars = key.chars();
        let code = match (chars.next(), chars.next()) {
            (Some(c), None) => KeyCode::Char(c),
            _ => match key.to_ascii_lowercase().as_str() {
                "enter" | "return" => KeyCode::Enter,
                "esc" | "escape" => KeyCode::Esc,
                "backspace" => KeyCode::Backspace,
                "tab" => KeyCode::Tab,
                "space" => KeyCode::Char(' '),
                "up" => KeyCode::Up,
                "down" => KeyCode::Down,
                "left" => KeyCode::Left,
                "right" => KeyCode::Right,
                "home" => KeyCode::Home,
                "end" => KeyCode::End,
                "pageup" => KeyCode::PageUp,
                "pagedown" => KeyCode::PageDown,
                "delete" => KeyCode::Delete,
                _ => return Err(format!("unknown key '{}' in '{}'", key, s)),
            },
        };
        Ok(Hotkey { code, modifiers })
    }
}

impl TryFrom<String> for Hotkey {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Hotkey> for String {
    fn from(hotkey: Hotkey) -> Self {
        hotkey.to_string()
    }
}

/// Config-file form, the inverse of `FromStr`.
///
impl fmt::Display for Hotkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            write!(f, "ctrl+")?;
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            write!(f, "shift+")?;
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            write!(f, "alt+")?;
        }
        match self.code {
            KeyCode::Char(' ') => write!(f, "space"),
            KeyCode::Char(c) => write!(f, "{}", c),
            KeyCode::Enter => write!(f, "enter"),
            KeyCode::Esc => write!(f, "esc"),
            KeyCode::Backspace => write!(f, "backspace"),
            KeyCode::Tab => write!(f, "tab"),
            KeyCode::Up => write!(f, "up"),
            KeyCode::Down => write!(f, "down"),
            KeyCode::Left => write!(f, "left"),
            KeyCode::Right => write!(f, "right"),
            KeyCode::Home => write!(f, "home"),
            KeyCode::End => write!(f, "end"),
            KeyCode::PageUp => write!(f, "pageup"),
            KeyCode::PageDown => write!(f, "pagedown"),
            KeyCode::Delete => write!(f, "delete"),
            _ => write!(f, "unknown"),
        }
    }
}

pub type Bindings = HashMap<HotkeyAction, Vec<Hotkey>>;

/// Key bindings for each session mode.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionHotkeys {
    pub browsing: Bindings,
    pub composing: Bindings,
}

impl Default for SessionHotkeys {
    fn default() -> Self {
        default_hotkeys()
    }
}

impl SessionHotkeys {
    /// Replace the default keys of every action named in the overrides. A
    /// key taken by an override is removed from the other actions of the
    /// same mode.
    ///
    pub fn with_overrides(mut self, mut overrides: HotkeyOverrides) -> Self {
        for action in HotkeyAction::ALL {
            if let Some(keys) = overrides.browsing.remove(&action) {
                rebind(&mut self.browsing, action, keys.into_vec());
            }
            if let Some(keys) = overrides.composing.remove(&action) {
                rebind(&mut self.composing, action, keys.into_vec());
            }
        }
        self
    }
}

fn rebind(bindings: &mut Bindings, action: HotkeyAction, keys: Vec<Hotkey>) {
    for (other, other_keys) in bindings.iter_mut() {
        if *other != action {
            other_keys.retain(|hotkey| !keys.contains(hotkey));
        }
    }
    bindings.insert(action, keys);
}

/// Either a single key or a list of keys in the config file.
///
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum KeyList {
    One(Hotkey),
    Many(Vec<Hotkey>),
}

impl KeyList {
    fn into_vec(self) -> Vec<Hotkey> {
        match self {
            KeyList::One(hotkey) => vec![hotkey],
            KeyList::Many(hotkeys) => hotkeys,
        }
    }
}

/// The `hotkeys` section of `config.yml`.
///
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HotkeyOverrides {
    #[serde(default)]
    pub browsing: HashMap<HotkeyAction, KeyList>,
    #[serde(default)]
    pub composing: HashMap<HotkeyAction, KeyList>,
}

/// Returns default hotkey mappings for both modes.
///
pub fn default_hotkeys() -> SessionHotkeys {
    let mut browsing = HashMap::new();
    browsing.insert(HotkeyAction::Quit, vec![Hotkey::char('q')]);
    browsing.insert(HotkeyAction::AddTask, vec![Hotkey::char('a')]);
    browsing.insert(HotkeyAction::ToggleFilter, vec![Hotkey::char('f')]);
    browsing.insert(HotkeyAction::ToggleDone, vec![Hotkey::new(KeyCode::Enter)]);
    browsing.insert(HotkeyAction::Reload, vec![Hotkey::char('r')]);
    browsing.insert(
        HotkeyAction::NavigateNext,
        vec![Hotkey::char('j'), Hotkey::new(KeyCode::Down)],
    );
    browsing.insert(
        HotkeyAction::NavigatePrev,
        vec![Hotkey::char('k'), Hotkey::new(KeyCode::Up)],
    );

    let mut composing = HashMap::new();
    composing.insert(HotkeyAction::Confirm, vec![Hotkey::new(KeyCode::Enter)]);
    composing.insert(HotkeyAction::Cancel, vec![Hotkey::new(KeyCode::Esc)]);

    SessionHotkeys {
        browsing,
        composing,
    }
}

/// Checks if a KeyEvent matches a Hotkey. Shift is ignored for character
/// keys since the character already carries the case.
///
pub fn matches_hotkey(event: &KeyEvent, hotkey: &Hotkey) -> bool {
    if event.code != hotkey.code {
        return false;
    }
    match event.code {
        KeyCode::Char(_) => {
            event.modifiers.difference(KeyModifiers::SHIFT)
                == hotkey.modifiers.difference(KeyModifiers::SHIFT)
        }
        _ => event.modifiers == hotkey.modifiers,
    }
}

/// Gets the action bound to a KeyEvent, if any. Actions are tried in
/// `HotkeyAction::ALL` order.
///
pub fn action_for(event: &KeyEvent, bindings: &Bindings) -> Option<HotkeyAction> {
    HotkeyAction::ALL.into_iter().find(|action| {
        bindings
            .get(action)
            .is_some_and(|keys| keys.iter().any(|hotkey| matches_hotkey(event, hotkey)))
    })
}

/// Builds a footer text string from hotkey configurations.
/// Actions without any bound key are left out.
///
pub fn build_footer_text(bindings: &Bindings, actions: &[(HotkeyAction, &str)]) -> String {
    let parts: Vec<String> = actions
        .iter()
        .filter_map(|(action, description)| {
            let keys = bindings.get(action).filter(|keys| !keys.is_empty())?;
            let keys: Vec<String> = keys.iter().map(format_hotkey_display).collect();
            Some(format!(" {}: {}", keys.join("/"), description))
        })
        .collect();
    parts.join(",")
}

/// Formats a hotkey for display in the footer.
///
pub fn format_hotkey_display(hotkey: &Hotkey) -> String {
    let mut parts = Vec::new();
    if hotkey.modifiers.contains(KeyModifiers::CONTROL) {
        parts.push("Ctrl");
    }
    if hotkey.modifiers.contains(KeyModifiers::SHIFT) {
        parts.push("Shift");
    }
    if hotkey.modifiers.contains(KeyModifiers::ALT) {
        parts.push("Alt");
    }

    let key_str = match &hotkey.code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Up => "↑".to_string(),
        KeyCode::Down => "↓".to_string(),
        KeyCode::Left => "←".to_string(),
        KeyCode::Right => "→".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::PageUp => "PgUp".to_string(),
        KeyCode::PageDown => "PgDn".to_string(),
        KeyCode::Delete => "Del".to_string(),
        _ => "Unknown".to_string(),
    };

    if parts.is_empty() {
        key_str
    } else {
        format!("{}+{}", parts.join("+"), key_str)
    }
}
