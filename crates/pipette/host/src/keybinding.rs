//! The cycling hotkey definition.
//!
//! One named, user-rebindable key is the tool's entire configuration
//! surface. The definition round-trips through a RON file so hosts can store
//! it next to their other key bindings.

use std::fs;
use std::path::Path;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or storing the key binding file.
#[derive(Debug, Error)]
pub enum KeybindingError {
    #[error("failed to read key binding file")]
    Read(#[source] std::io::Error),

    #[error("failed to write key binding file")]
    Write(#[source] std::io::Error),

    #[error("malformed key binding file")]
    Parse(#[from] ron::error::SpannedError),

    #[error("failed to encode key binding")]
    Encode(#[from] ron::Error),
}

/// User-rebindable definition of the cycling hotkey.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindingDef {
    /// Stable name registered with the host's key binding UI.
    pub name: String,
    /// Key the tool ships with.
    pub default_key: KeyCode,
    /// Currently bound key.
    pub key: KeyCode,
}

impl KeyBindingDef {
    pub const NAME: &'static str = "CyclePointerAction";

    pub fn new(name: impl Into<String>, default_key: KeyCode) -> Self {
        Self {
            name: name.into(),
            default_key,
            key: default_key,
        }
    }

    /// Rebinds the hotkey.
    pub fn rebind(&mut self, key: KeyCode) {
        self.key = key;
    }

    /// Restores the shipped default.
    pub fn reset(&mut self) {
        self.key = self.default_key;
    }

    /// Whether `event` is a press of the bound key.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        event.kind == KeyEventKind::Press && event.code == self.key
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, KeybindingError> {
        let raw = fs::read_to_string(path).map_err(KeybindingError::Read)?;
        Ok(ron::from_str(&raw)?)
    }

    pub fn store(&self, path: impl AsRef<Path>) -> Result<(), KeybindingError> {
        let raw = ron::to_string(self)?;
        fs::write(path, raw).map_err(KeybindingError::Write)
    }
}

impl Default for KeyBindingDef {
    fn default() -> Self {
        Self::new(Self::NAME, KeyCode::Char('q'))
    }
}
