use thiserror::Error;

/// Errors raised by the fallible entry points around the digit buffer.
///
/// The keypad operations themselves never fail; these only come from
/// parsing user input, strict time setting and snapshot import.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EntryError {
    #[error("unknown key '{0}', expected 0-9, 'delete' or 'clear'")]
    UnknownKey(String),

    #[error("{field} value {value} is out of range (max {max})")]
    ComponentOutOfRange {
        field: &'static str,
        value: u32,
        max: u32,
    },

    #[error("seconds ({0}) cannot be entered when seconds are hidden")]
    SecondsUnsupported(u32),

    #[error("malformed buffer snapshot: {0}")]
    MalformedSnapshot(String),
}
