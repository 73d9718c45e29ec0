//! Keyboard shortcuts for history navigation

use crate::undo::HistoryCommand;
use serde::Deserialize;

/// The parts of a key event the editor looks at.
///
/// Field names follow the DOM `KeyboardEvent` so hosts can forward events as is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct KeyChord {
    pub key: String,
    #[serde(rename = "ctrlKey")]
    pub ctrl: bool,
    /// Cmd on macOS
    #[serde(rename = "metaKey")]
    pub meta: bool,
    #[serde(rename = "shiftKey")]
    pub shift: bool,
}

impl KeyChord {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn meta(mut self) -> Self {
        self.meta = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }

    /// Ctrl/Cmd+Z undoes; Ctrl/Cmd+Y and Ctrl/Cmd+Shift+Z redo.
    pub fn command(&self) -> Option<HistoryCommand> {
        if !(self.ctrl || self.meta) {
            return None;
        }
        match self.key.to_ascii_lowercase().as_str() {
            "z" if self.shift => Some(HistoryCommand::Redo),
            "z" => Some(HistoryCommand::Undo),
            "y" => Some(HistoryCommand::Redo),
            _ => None,
        }
    }
}
