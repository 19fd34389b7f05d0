//! User configuration — keybindings, panel placement, initial columns.
//!
//! Stored as a simple key-value text file at
//! `$XDG_CONFIG_HOME/colvis/config.toml` (default `~/.config/colvis/config.toml`).
//! Bad values are logged and replaced by their defaults; a broken config
//! never stops the viewer from starting.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::placement::Placement;
use crate::error::ConfigError;

/// Default layer for the column panel.
pub const DEFAULT_Z_INDEX: u16 = 1350;

// ───────────────────────────────────────── actions ───────────

/// All configurable user actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveUp,
    MoveDown,
    ToggleColumns,
    ToggleRow,
    Dismiss,
    Help,
    Quit,
}

impl Action {
    /// Ordered list of all actions (used for the help popup).
    pub const ALL: &[Action] = &[
        Action::MoveUp,
        Action::MoveDown,
        Action::ToggleColumns,
        Action::ToggleRow,
        Action::Dismiss,
        Action::Help,
        Action::Quit,
    ];

    /// Human-readable label for the UI.
    pub fn label(self) -> &'static str {
        match self {
            Action::MoveUp => "Move Up",
            Action::MoveDown => "Move Down",
            Action::ToggleColumns => "Show / Hide Columns Panel",
            Action::ToggleRow => "Toggle Column",
            Action::Dismiss => "Close Panel",
            Action::Help => "Help",
            Action::Quit => "Quit",
        }
    }

    /// Key used in the config file.
    fn config_key(self) -> &'static str {
        match self {
            Action::MoveUp => "move_up",
            Action::MoveDown => "move_down",
            Action::ToggleColumns => "toggle_columns",
            Action::ToggleRow => "toggle_row",
            Action::Dismiss => "dismiss",
            Action::Help => "help",
            Action::Quit => "quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        Action::ALL.iter().copied().find(|a| a.config_key() == s)
    }
}

// ───────────────────────────────────────── key bind ──────────

/// A single key binding — key code + modifier combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Only CTRL/ALT/SHIFT are compared.
    pub fn matches(&self, event: KeyEvent) -> bool {
        let mask = KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SHIFT;
        self.code == event.code && (self.modifiers & mask) == (event.modifiers & mask)
    }

    fn modifier_prefix(&self) -> String {
        let mut s = String::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            s.push_str("Ctrl+");
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            s.push_str("Alt+");
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            s.push_str("Shift+");
        }
        s
    }

    /// User-friendly display string (e.g. `"↑"`, `"Ctrl+c"`, `"Space"`).
    pub fn display(&self) -> String {
        let key = match self.code {
            KeyCode::Up => "↑".into(),
            KeyCode::Down => "↓".into(),
            KeyCode::Left => "←".into(),
            KeyCode::Right => "→".into(),
            _ => self.key_name(),
        };
        format!("{}{key}", self.modifier_prefix())
    }

    /// Serialise to config-file format (e.g. `"Up"`, `"Ctrl+c"`).
    fn to_config_string(&self) -> String {
        format!("{}{}", self.modifier_prefix(), self.key_name())
    }

    fn key_name(&self) -> String {
        match self.code {
            KeyCode::Char(' ') => "Space".into(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Up => "Up".into(),
            KeyCode::Down => "Down".into(),
            KeyCode::Left => "Left".into(),
            KeyCode::Right => "Right".into(),
            KeyCode::Enter => "Enter".into(),
            KeyCode::Esc => "Esc".into(),
            KeyCode::Tab => "Tab".into(),
            KeyCode::Backspace => "Backspace".into(),
            KeyCode::Delete => "Delete".into(),
            KeyCode::Home => "Home".into(),
            KeyCode::End => "End".into(),
            KeyCode::PageUp => "PageUp".into(),
            KeyCode::PageDown => "PageDown".into(),
            KeyCode::F(n) => format!("F{n}"),
            other => format!("{other:?}"),
        }
    }

    /// Parse a key string like `"Ctrl+c"`, `"Alt+Up"`, `"q"`, `"Enter"`.
    fn parse(s: &str) -> Option<Self> {
        let mut modifiers = KeyModifiers::NONE;
        let parts: Vec<&str> = s.split('+').collect();
        let key_part = parts.last()?;

        for &part in &parts[..parts.len() - 1] {
            match part.to_lowercase().as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }

        let code = match key_part.to_lowercase().as_str() {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "backspace" | "bksp" => KeyCode::Backspace,
            "delete" | "del" => KeyCode::Delete,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdn" => KeyCode::PageDown,
            "space" => KeyCode::Char(' '),
            k if k.starts_with('f') && k.len() > 1 => {
                let n: u8 = k[1..].parse().ok()?;
                KeyCode::F(n)
            }
            // Keep the original case for single characters.
            _ if key_part.chars().count() == 1 => KeyCode::Char(key_part.chars().next()?),
            _ => return None,
        };

        Some(KeyBind { code, modifiers })
    }
}

// ───────────────────────────────────────── config ────────────

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bindings: HashMap<Action, Vec<KeyBind>>,
    /// Preferred panel placement relative to the trigger.
    pub placement: Placement,
    /// Layer the panel is painted and hit-tested on.
    pub z_index: u16,
    /// Columns that start hidden.
    pub hidden_columns: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bindings: Self::default_bindings(),
            placement: Placement::default(),
            z_index: DEFAULT_Z_INDEX,
            hidden_columns: Vec::new(),
        }
    }
}

impl AppConfig {
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        use Action::*;
        use KeyCode::*;
        let n = KeyModifiers::NONE;
        let mut m = HashMap::new();

        m.insert(MoveUp, vec![KeyBind::new(Up, n), KeyBind::new(Char('k'), n)]);
        m.insert(MoveDown, vec![KeyBind::new(Down, n), KeyBind::new(Char('j'), n)]);
        m.insert(ToggleColumns, vec![KeyBind::new(Char('c'), n)]);
        m.insert(ToggleRow, vec![KeyBind::new(Char(' '), n), KeyBind::new(Enter, n)]);
        m.insert(Dismiss, vec![KeyBind::new(Esc, n)]);
        m.insert(Help, vec![KeyBind::new(Char('?'), n)]);
        m.insert(Quit, vec![KeyBind::new(Char('q'), n)]);

        m
    }

    /// Find the action that matches a key event.  When several bindings
    /// match, the one with the most modifiers wins.
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        let mut best: Option<Action> = None;
        let mut best_mod_count = 0;

        for (&action, binds) in &self.bindings {
            for bind in binds {
                if bind.matches(event) {
                    let mc = bind.modifiers.bits().count_ones();
                    if best.is_none() || mc > best_mod_count {
                        best = Some(action);
                        best_mod_count = mc;
                    }
                }
            }
        }
        best
    }

    /// Format the binding list for a given action (e.g. `"↑/k"`).
    pub fn display_bindings(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => {
                binds.iter().map(|b| b.display()).collect::<Vec<_>>().join("/")
            }
            _ => "unbound".into(),
        }
    }

    fn short_binding(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => binds[0].display(),
            _ => "?".into(),
        }
    }

    /// Status-bar hint built from the current bindings.
    pub fn status_bar_hint(&self) -> String {
        format!(
            "{}: columns | {}/{}: move | {}: help | {}: quit",
            self.short_binding(Action::ToggleColumns),
            self.short_binding(Action::MoveUp),
            self.short_binding(Action::MoveDown),
            self.short_binding(Action::Help),
            self.short_binding(Action::Quit),
        )
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load config from the default path, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                let (config, problems) = Self::parse_config(&contents);
                for problem in problems {
                    tracing::warn!(path = %path.display(), "{problem}");
                }
                config
            }
            Err(source) => {
                let err = ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                };
                tracing::warn!("{err}");
                Self::default()
            }
        }
    }

    /// Parse config text.  Returns the config plus every value that had to
    /// be ignored.
    fn parse_config(s: &str) -> (Self, Vec<ConfigError>) {
        let mut config = Self::default();
        let mut problems = Vec::new();

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim().trim_matches('"');

            match key {
                "placement" => {
                    match value.parse() {
                        Ok(p) => config.placement = p,
                        Err(e) => problems.push(e),
                    }
                    continue;
                }
                "z_index" => {
                    match value.parse::<u16>() {
                        Ok(z) => config.z_index = z,
                        Err(_) => problems.push(ConfigError::InvalidNumber {
                            key: key.to_string(),
                            value: value.to_string(),
                        }),
                    }
                    continue;
                }
                "hidden_columns" => {
                    config.hidden_columns = value
                        .split(',')
                        .map(|c| c.trim().trim_matches('"').to_string())
                        .filter(|c| !c.is_empty())
                        .collect();
                    continue;
                }
                _ => {}
            }

            let Some(action) = Action::from_config_key(key) else {
                continue;
            };

            let mut parsed = Vec::new();
            for part in value.split(',') {
                let part = part.trim().trim_matches('"');
                match KeyBind::parse(part) {
                    Some(bind) => parsed.push(bind),
                    None => problems.push(ConfigError::InvalidKey {
                        action: key.to_string(),
                        value: part.to_string(),
                    }),
                }
            }
            if !parsed.is_empty() {
                config.bindings.insert(action, parsed);
            }
        }

        (config, problems)
    }

    pub fn serialise(&self) -> String {
        let mut lines = vec![
            "# colvis configuration".to_string(),
            String::new(),
            "# Column panel".to_string(),
            format!("placement = {}", self.placement),
            format!("z_index = {}", self.z_index),
            format!("hidden_columns = {}", self.hidden_columns.join(", ")),
            String::new(),
            "# Key bindings".to_string(),
            "# Format: action = Key1, Key2, ...".to_string(),
            "# Modifiers: Ctrl+, Alt+, Shift+ (prefix)".to_string(),
            "# Special keys: Up, Down, Left, Right, Enter, Esc, Tab,".to_string(),
            "#   Backspace, Delete, Home, End, PageUp, PageDown, Space, F1-F12".to_string(),
            String::new(),
        ];

        for &action in Action::ALL {
            if let Some(binds) = self.bindings.get(&action) {
                let keys: Vec<String> = binds.iter().map(|b| b.to_config_string()).collect();
                lines.push(format!("{} = {}", action.config_key(), keys.join(", ")));
            }
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

/// Return the config file path (`$XDG_CONFIG_HOME/colvis/config.toml`).
pub fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("colvis").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::placement::{Align, Side};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn defaults_match_keys() {
        let c = AppConfig::default();
        assert_eq!(c.match_key(key(KeyCode::Char('c'))), Some(Action::ToggleColumns));
        assert_eq!(c.match_key(key(KeyCode::Char(' '))), Some(Action::ToggleRow));
        assert_eq!(c.match_key(key(KeyCode::Esc)), Some(Action::Dismiss));
        assert_eq!(c.match_key(key(KeyCode::Char('x'))), None);
        assert_eq!(c.placement, Placement::BOTTOM_END);
        assert_eq!(c.z_index, DEFAULT_Z_INDEX);
    }

    #[test]
    fn parses_values_and_collects_problems() {
        let text = "\
# comment
placement = top-start
z_index = lots
hidden_columns = city, \"status\"
toggle_columns = Ctrl+o, Hyper+x
quit = Q
";
        let (c, problems) = AppConfig::parse_config(text);
        assert_eq!(c.placement, Placement { side: Side::Top, align: Align::Start });
        assert_eq!(c.z_index, DEFAULT_Z_INDEX);
        assert_eq!(c.hidden_columns, vec!["city", "status"]);
        assert_eq!(
            c.bindings[&Action::ToggleColumns],
            vec![KeyBind::new(KeyCode::Char('o'), KeyModifiers::CONTROL)]
        );
        assert_eq!(c.bindings[&Action::Quit], vec![KeyBind::new(KeyCode::Char('Q'), KeyModifiers::NONE)]);
        assert_eq!(problems.len(), 2);
        assert!(matches!(problems[0], ConfigError::InvalidNumber { .. }));
        assert!(matches!(problems[1], ConfigError::InvalidKey { ref value, .. } if value == "Hyper+x"));
    }

    #[test]
    fn bad_placement_keeps_default() {
        let (c, problems) = AppConfig::parse_config("placement = sideways\n");
        assert_eq!(c.placement, Placement::BOTTOM_END);
        assert!(matches!(problems[..], [ConfigError::InvalidPlacement(_)]));
    }

    #[test]
    fn serialise_round_trips_through_the_parser() {
        let mut c = AppConfig::default();
        c.placement = "left".parse().unwrap();
        c.z_index = 7;
        c.hidden_columns = vec!["a".into(), "b".into()];
        let (back, problems) = AppConfig::parse_config(&c.serialise());
        assert!(problems.is_empty(), "{problems:?}");
        assert_eq!(back.placement, c.placement);
        assert_eq!(back.z_index, 7);
        assert_eq!(back.hidden_columns, c.hidden_columns);
        for &action in Action::ALL {
            assert_eq!(back.bindings[&action], c.bindings[&action], "{action:?}");
        }
    }

    #[test]
    fn load_from_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let c = AppConfig::load_from(&dir.path().join("nope.toml"));
        assert!(c.hidden_columns.is_empty());
    }

    #[test]
    fn load_from_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "hidden_columns = role\n").unwrap();
        assert_eq!(AppConfig::load_from(&path).hidden_columns, vec!["role"]);
    }

    #[test]
    fn display_bindings_joins_keys() {
        let c = AppConfig::default();
        assert_eq!(c.display_bindings(Action::MoveUp), "↑/k");
        assert_eq!(c.display_bindings(Action::ToggleRow), "Space/Enter");
        assert!(c.status_bar_hint().starts_with("c: columns"));
    }
}
