pub mod buffer;
pub mod format;

pub use buffer::{BufferSnapshot, DurationEntryBuffer, EntryMode};
