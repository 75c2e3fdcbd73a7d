//! Headless keypad controller.
//!
//! Owns a [`DurationEntryBuffer`] and does everything a keypad view does
//! with it apart from drawing: forwards key events, decides which controls
//! are enabled and carries the theme id through save/restore.

use crate::config::PickerConfig;
use crate::entry::format::format_entry;
use crate::entry::{BufferSnapshot, DurationEntryBuffer, EntryMode};
use crate::error::EntryError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    Digit(u8),
    /// Click on the delete key.
    Delete,
    /// Long press on the delete key.
    Clear,
}

impl FromStr for KeyEvent {
    type Err = EntryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        if let [c] = key.as_bytes() {
            if c.is_ascii_digit() {
                return Ok(Self::Digit(c - b'0'));
            }
        }
        match key.to_ascii_lowercase().as_str() {
            "del" | "delete" | "backspace" => Ok(Self::Delete),
            "clear" | "long-delete" => Ok(Self::Clear),
            _ => Err(EntryError::UnknownKey(s.to_string())),
        }
    }
}

/// What a view needs to redraw after an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PickerView {
    pub mode: EntryMode,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: Option<u32>,
    pub total_seconds: u32,
    pub text: String,
    pub delete_enabled: bool,
    pub set_enabled: bool,
}

/// Persisted picker: the buffer snapshot plus the theme id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedPicker {
    pub mode: EntryMode,
    pub buffer: BufferSnapshot,
    #[serde(default)]
    pub theme: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Picker {
    buffer: DurationEntryBuffer,
    theme: Option<String>,
}

impl Picker {
    pub fn new(mode: EntryMode) -> Self {
        Self {
            buffer: DurationEntryBuffer::new(mode),
            theme: None,
        }
    }

    pub fn from_config(config: &PickerConfig) -> Self {
        let mut picker = Self::new(EntryMode::from_hide_seconds(config.hide_seconds));
        picker.theme = config.theme.clone();
        picker
    }

    /// Restore a saved picker under `mode`.
    ///
    /// Digits saved under another mode, or otherwise unusable, are dropped
    /// and the picker starts empty. The theme is kept either way.
    pub fn restore(mode: EntryMode, saved: Option<SavedPicker>) -> Self {
        let Some(saved) = saved else {
            return Self::new(mode);
        };

        let snapshot = if saved.mode == mode {
            Some(saved.buffer)
        } else {
            tracing::info!(saved = ?saved.mode, current = ?mode, "entry mode changed, starting empty");
            None
        };

        Self {
            buffer: DurationEntryBuffer::restore_or_empty(mode, snapshot),
            theme: saved.theme,
        }
    }

    pub fn save(&self) -> SavedPicker {
        SavedPicker {
            mode: self.buffer.mode(),
            buffer: self.buffer.snapshot(),
            theme: self.theme.clone(),
        }
    }

    pub fn buffer(&self) -> &DurationEntryBuffer {
        &self.buffer
    }

    pub fn theme(&self) -> Option<&str> {
        self.theme.as_deref()
    }

    pub fn set_theme(&mut self, theme: Option<String>) {
        self.theme = theme;
    }

    /// Apply a key event. Returns whether the entry changed.
    pub fn handle(&mut self, event: KeyEvent) -> bool {
        tracing::debug!(?event, "key event");
        match event {
            KeyEvent::Digit(d) => self.buffer.press_digit(d),
            KeyEvent::Delete => self.buffer.backspace(),
            KeyEvent::Clear => {
                self.buffer.reset();
                true
            }
        }
    }

    pub fn set_time(&mut self, hours: u32, minutes: u32, seconds: u32) {
        self.buffer.set_absolute(hours, minutes, seconds);
    }

    pub fn set_time_checked(
        &mut self,
        hours: u32,
        minutes: u32,
        seconds: u32,
    ) -> Result<(), EntryError> {
        self.buffer.set_absolute_checked(hours, minutes, seconds)
    }

    pub fn view(&self) -> PickerView {
        let b = &self.buffer;
        let seconds = b.mode().has_seconds().then(|| b.seconds());
        let has_input = !b.is_empty();
        PickerView {
            mode: b.mode(),
            hours: b.hours(),
            minutes: b.minutes(),
            seconds,
            total_seconds: b.total_seconds(),
            text: format_entry(b.hours(), b.minutes(), seconds),
            delete_enabled: has_input,
            set_enabled: has_input,
        }
    }
}
