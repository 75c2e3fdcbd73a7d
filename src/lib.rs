pub mod commands;
pub mod config;
pub mod entry;
pub mod error;
pub mod logging;
pub mod picker;
pub mod platform;
pub mod state;

pub use entry::{BufferSnapshot, DurationEntryBuffer, EntryMode};
pub use error::EntryError;
pub use picker::{KeyEvent, Picker, PickerView, SavedPicker};

use clap::ValueEnum;
use serde::Serialize;

#[derive(Clone, Copy, ValueEnum, Debug, Default, Serialize)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
