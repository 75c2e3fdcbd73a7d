//! Calculator-style digit entry for an `h:mm:ss` duration.
//!
//! Digits are pushed in from the right: typing `1`, `3`, `0` into an
//! hours/minutes/seconds buffer reads as `0h 01m 30s`. Slot 0 always holds
//! the most recent digit and the top slot holds the hours digit.

use crate::error::EntryError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Largest supported buffer width.
pub const MAX_WIDTH: usize = 5;

/// Seconds contributed by one unit at each position, counted from the top
/// slot downwards: hours, tens of minutes, minutes, tens of seconds, seconds.
const POSITION_WEIGHTS: [u32; MAX_WIDTH] = [3600, 600, 60, 10, 1];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryMode {
    /// `h:mm`, three digits.
    HoursMinutes,
    /// `h:mm:ss`, five digits.
    #[default]
    HoursMinutesSeconds,
}

impl EntryMode {
    pub fn from_hide_seconds(hide_seconds: bool) -> Self {
        if hide_seconds {
            Self::HoursMinutes
        } else {
            Self::HoursMinutesSeconds
        }
    }

    pub fn width(self) -> usize {
        match self {
            Self::HoursMinutes => 3,
            Self::HoursMinutesSeconds => 5,
        }
    }

    pub fn has_seconds(self) -> bool {
        matches!(self, Self::HoursMinutesSeconds)
    }
}

/// Exported `(digits, filled)` pair used to carry a buffer across restarts.
///
/// `filled` is the highest live index, or `-1` when nothing was entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferSnapshot {
    pub digits: Vec<u8>,
    pub filled: i8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationEntryBuffer {
    mode: EntryMode,
    digits: [u8; MAX_WIDTH],
    // Number of live digits; slots at and above `len` are zero.
    len: usize,
}

impl Default for DurationEntryBuffer {
    fn default() -> Self {
        Self::new(EntryMode::default())
    }
}

impl DurationEntryBuffer {
    pub fn new(mode: EntryMode) -> Self {
        Self {
            mode,
            digits: [0; MAX_WIDTH],
            len: 0,
        }
    }

    pub fn mode(&self) -> EntryMode {
        self.mode
    }

    pub fn width(&self) -> usize {
        self.mode.width()
    }

    /// The digit slots, most recent first. Always exactly `width()` long.
    pub fn digits(&self) -> &[u8] {
        &self.digits[..self.width()]
    }

    /// Number of digits the user has entered.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Highest live index, `None` when empty.
    pub fn filled(&self) -> Option<usize> {
        self.len.checked_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.width()
    }

    /// Push a digit in from the right.
    ///
    /// Ignored when the buffer is full, when the digit is not 0-9, and for a
    /// leading zero. Returns whether the buffer changed.
    pub fn press_digit(&mut self, digit: u8) -> bool {
        if digit > 9 {
            tracing::trace!(digit, "ignoring non-decimal digit");
            return false;
        }
        if self.is_full() {
            tracing::trace!(digit, "buffer full, ignoring digit");
            return false;
        }
        if self.is_empty() && digit == 0 {
            tracing::trace!("ignoring leading zero");
            return false;
        }

        self.digits.copy_within(0..self.len, 1);
        self.digits[0] = digit;
        self.len += 1;
        true
    }

    /// Drop the most recent digit, shifting the rest back down.
    pub fn backspace(&mut self) -> bool {
        if self.is_empty() {
            tracing::trace!("buffer empty, nothing to delete");
            return false;
        }

        self.digits.copy_within(1..self.len, 0);
        self.digits[self.len - 1] = 0;
        self.len -= 1;
        true
    }

    pub fn reset(&mut self) {
        self.digits = [0; MAX_WIDTH];
        self.len = 0;
    }

    /// Load a time directly into the digit slots.
    ///
    /// Each slot keeps only its last decimal digit, so values the width
    /// cannot hold (hours above 9, seconds in `HoursMinutes` mode) are
    /// truncated. Minutes and seconds above 59 are stored as given. Setting
    /// `0:00:00` leaves the buffer empty.
    pub fn set_absolute(&mut self, hours: u32, minutes: u32, seconds: u32) {
        if hours > 9 || minutes > 99 || seconds > 99 || (!self.mode.has_seconds() && seconds > 0) {
            tracing::debug!(hours, minutes, seconds, mode = ?self.mode, "truncating time to fit buffer");
        }

        let parts = [
            hours,
            minutes / 10,
            minutes % 10,
            seconds / 10,
            seconds % 10,
        ];

        self.digits = [0; MAX_WIDTH];
        let width = self.width();
        for (offset, value) in parts.into_iter().enumerate() {
            if let Some(index) = width.checked_sub(offset + 1) {
                self.digits[index] = (value % 10) as u8;
            }
        }

        self.len = self.digits[..width]
            .iter()
            .rposition(|&d| d != 0)
            .map_or(0, |index| index + 1);
    }

    /// Like [`set_absolute`](Self::set_absolute) but refuses anything that
    /// would be truncated or is not a wall-clock value. The buffer is left
    /// untouched on error.
    pub fn set_absolute_checked(
        &mut self,
        hours: u32,
        minutes: u32,
        seconds: u32,
    ) -> Result<(), EntryError> {
        check_range("hours", hours, 9)?;
        check_range("minutes", minutes, 59)?;
        check_range("seconds", seconds, 59)?;
        if !self.mode.has_seconds() && seconds > 0 {
            return Err(EntryError::SecondsUnsupported(seconds));
        }

        self.set_absolute(hours, minutes, seconds);
        Ok(())
    }

    pub fn hours(&self) -> u32 {
        self.from_top(1)
    }

    pub fn minutes(&self) -> u32 {
        self.from_top(2) * 10 + self.from_top(3)
    }

    pub fn seconds(&self) -> u32 {
        self.from_top(4) * 10 + self.from_top(5)
    }

    pub fn total_seconds(&self) -> u32 {
        POSITION_WEIGHTS
            .iter()
            .enumerate()
            .map(|(offset, weight)| self.from_top(offset + 1) * weight)
            .sum()
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_secs(self.total_seconds().into())
    }

    pub fn snapshot(&self) -> BufferSnapshot {
        BufferSnapshot {
            digits: self.digits().to_vec(),
            // width is at most 5, so this always fits
            filled: self.len as i8 - 1,
        }
    }

    /// Rebuild a buffer from a snapshot, falling back to an empty buffer when
    /// the snapshot is missing or does not fit `mode`.
    pub fn restore_or_empty(mode: EntryMode, snapshot: Option<BufferSnapshot>) -> Self {
        let Some(snapshot) = snapshot else {
            return Self::new(mode);
        };

        Self::try_from((mode, snapshot)).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "discarding saved digits");
            Self::new(mode)
        })
    }

    /// Digit at `offset` slots below the top (1 = hours slot). Positions that
    /// do not exist in this width read as 0.
    fn from_top(&self, offset: usize) -> u32 {
        self.width()
            .checked_sub(offset)
            .map_or(0, |index| u32::from(self.digits[index]))
    }
}

fn check_range(field: &'static str, value: u32, max: u32) -> Result<(), EntryError> {
    if value > max {
        return Err(EntryError::ComponentOutOfRange { field, value, max });
    }
    Ok(())
}

impl TryFrom<(EntryMode, BufferSnapshot)> for DurationEntryBuffer {
    type Error = EntryError;

    fn try_from((mode, snapshot): (EntryMode, BufferSnapshot)) -> Result<Self, Self::Error> {
        let width = mode.width();
        if snapshot.digits.len() != width {
            return Err(EntryError::MalformedSnapshot(format!(
                "expected {} digits, found {}",
                width,
                snapshot.digits.len()
            )));
        }
        if let Some(bad) = snapshot.digits.iter().find(|&&d| d > 9) {
            return Err(EntryError::MalformedSnapshot(format!(
                "digit {} is not 0-9",
                bad
            )));
        }
        if snapshot.filled < -1 || snapshot.filled >= width as i8 {
            return Err(EntryError::MalformedSnapshot(format!(
                "fill pointer {} outside -1..{}",
                snapshot.filled,
                width - 1
            )));
        }

        let len = (snapshot.filled + 1) as usize;
        if snapshot.digits[len..].iter().any(|&d| d != 0) {
            return Err(EntryError::MalformedSnapshot(
                "non-zero digit above fill pointer".to_string(),
            ));
        }

        let mut digits = [0; MAX_WIDTH];
        digits[..width].copy_from_slice(&snapshot.digits);
        Ok(Self { mode, digits, len })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press_all(buffer: &mut DurationEntryBuffer, digits: &[u8]) {
        for &d in digits {
            buffer.press_digit(d);
        }
    }

    #[test]
    fn test_new_buffer_is_empty() {
        let buffer = DurationEntryBuffer::new(EntryMode::HoursMinutesSeconds);
        assert!(buffer.is_empty());
        assert_eq!(buffer.filled(), None);
        assert_eq!(buffer.digits(), &[0, 0, 0, 0, 0]);
        assert_eq!(buffer.total_seconds(), 0);
    }

    #[test]
    fn test_digits_shift_in_from_right() {
        let mut buffer = DurationEntryBuffer::default();
        press_all(&mut buffer, &[1, 3, 0]);

        assert_eq!(buffer.digits(), &[0, 3, 1, 0, 0]);
        assert_eq!(buffer.filled(), Some(2));
        assert_eq!(buffer.hours(), 0);
        assert_eq!(buffer.minutes(), 1);
        assert_eq!(buffer.seconds(), 30);
        assert_eq!(buffer.total_seconds(), 90);
    }

    #[test]
    fn test_leading_zero_is_ignored() {
        let mut buffer = DurationEntryBuffer::default();
        assert!(!buffer.press_digit(0));
        assert!(buffer.is_empty());

        assert!(buffer.press_digit(4));
        assert!(buffer.press_digit(0));
        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.seconds(), 40);
    }

    #[test]
    fn test_full_buffer_ignores_presses() {
        let mut buffer = DurationEntryBuffer::default();
        press_all(&mut buffer, &[9, 8, 7, 6, 5]);
        assert!(buffer.is_full());

        assert!(!buffer.press_digit(1));
        assert!(!buffer.press_digit(0));
        assert_eq!(buffer.digits(), &[5, 6, 7, 8, 9]);
        assert_eq!(buffer.hours(), 9);
        assert_eq!(buffer.minutes(), 87);
        assert_eq!(buffer.seconds(), 65);
        assert_eq!(buffer.total_seconds(), 37685);
    }

    #[test]
    fn test_non_decimal_digit_is_ignored() {
        let mut buffer = DurationEntryBuffer::default();
        buffer.press_digit(2);
        assert!(!buffer.press_digit(10));
        assert_eq!(buffer.digits(), &[2, 0, 0, 0, 0]);
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn test_backspace_shifts_back() {
        let mut buffer = DurationEntryBuffer::default();
        press_all(&mut buffer, &[1, 2, 3]);

        assert!(buffer.backspace());
        assert_eq!(buffer.digits(), &[2, 1, 0, 0, 0]);
        assert_eq!(buffer.filled(), Some(1));

        assert!(buffer.backspace());
        assert!(buffer.backspace());
        assert!(buffer.is_empty());
        assert!(!buffer.backspace());
        assert_eq!(buffer.digits(), &[0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_press_then_backspace_restores_state() {
        let starts: [&[u8]; 4] = [&[1], &[1, 0], &[7, 0, 3], &[2, 5, 9, 1]];
        for start in starts {
            for digit in 0..=9 {
                let mut buffer = DurationEntryBuffer::default();
                press_all(&mut buffer, start);
                let before = buffer.clone();

                assert!(buffer.press_digit(digit));
                assert!(buffer.backspace());
                assert_eq!(buffer, before, "start {:?} digit {}", start, digit);
            }
        }
    }

    #[test]
    fn test_filled_tracks_press_count() {
        let mut buffer = DurationEntryBuffer::default();
        for (count, digit) in [3u8, 0, 0, 7, 1].into_iter().enumerate() {
            buffer.press_digit(digit);
            assert_eq!(buffer.filled(), Some(count));
        }
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut buffer = DurationEntryBuffer::default();
        press_all(&mut buffer, &[4, 5, 6]);
        buffer.reset();

        assert!(buffer.is_empty());
        assert_eq!(buffer.hours(), 0);
        assert_eq!(buffer.minutes(), 0);
        assert_eq!(buffer.seconds(), 0);
        assert_eq!(buffer.total_seconds(), 0);
    }

    #[test]
    fn test_hours_minutes_mode_has_no_seconds() {
        let mut buffer = DurationEntryBuffer::new(EntryMode::HoursMinutes);
        press_all(&mut buffer, &[1, 4, 5, 9]);

        assert!(buffer.is_full());
        assert_eq!(buffer.digits(), &[5, 4, 1]);
        assert_eq!(buffer.hours(), 1);
        assert_eq!(buffer.minutes(), 45);
        assert_eq!(buffer.seconds(), 0);
        assert_eq!(buffer.total_seconds(), 3600 + 45 * 60);
    }

    #[test]
    fn test_set_absolute() {
        let mut buffer = DurationEntryBuffer::default();
        buffer.set_absolute(1, 2, 3);

        assert_eq!(buffer.hours(), 1);
        assert_eq!(buffer.minutes(), 2);
        assert_eq!(buffer.seconds(), 3);
        assert_eq!(buffer.total_seconds(), 3723);
        assert_eq!(buffer.filled(), Some(4));
    }

    #[test]
    fn test_set_absolute_fill_pointer_follows_highest_digit() {
        let mut buffer = DurationEntryBuffer::default();
        buffer.set_absolute(0, 5, 0);
        assert_eq!(buffer.digits(), &[0, 0, 5, 0, 0]);
        assert_eq!(buffer.filled(), Some(2));

        // behaves as if "5", "0", "0" had been typed
        buffer.press_digit(1);
        assert_eq!(buffer.minutes(), 50);
        assert_eq!(buffer.seconds(), 1);
    }

    #[test]
    fn test_set_absolute_zero_is_empty() {
        let mut buffer = DurationEntryBuffer::default();
        buffer.press_digit(8);
        buffer.set_absolute(0, 0, 0);
        assert!(buffer.is_empty());
        assert_eq!(buffer, DurationEntryBuffer::default());
    }

    #[test]
    fn test_set_absolute_truncates() {
        let mut buffer = DurationEntryBuffer::default();
        buffer.set_absolute(12, 75, 130);
        assert_eq!(buffer.hours(), 2);
        assert_eq!(buffer.minutes(), 75);
        assert_eq!(buffer.seconds(), 30);

        let mut short = DurationEntryBuffer::new(EntryMode::HoursMinutes);
        short.set_absolute(3, 15, 45);
        assert_eq!(short.digits(), &[5, 1, 3]);
        assert_eq!(short.seconds(), 0);
        assert_eq!(short.total_seconds(), 3 * 3600 + 15 * 60);
    }

    #[test]
    fn test_set_absolute_checked_rejects_out_of_range() {
        let mut buffer = DurationEntryBuffer::default();
        buffer.press_digit(7);

        let err = buffer.set_absolute_checked(1, 60, 0).unwrap_err();
        assert_eq!(
            err,
            EntryError::ComponentOutOfRange {
                field: "minutes",
                value: 60,
                max: 59
            }
        );
        assert!(buffer.set_absolute_checked(10, 0, 0).is_err());
        assert_eq!(buffer.digits(), &[7, 0, 0, 0, 0]);

        buffer.set_absolute_checked(9, 59, 59).unwrap();
        assert_eq!(buffer.total_seconds(), 9 * 3600 + 59 * 60 + 59);
    }

    #[test]
    fn test_set_absolute_checked_without_seconds() {
        let mut buffer = DurationEntryBuffer::new(EntryMode::HoursMinutes);
        assert_eq!(
            buffer.set_absolute_checked(1, 0, 5),
            Err(EntryError::SecondsUnsupported(5))
        );
        buffer.set_absolute_checked(1, 30, 0).unwrap();
        assert_eq!(buffer.minutes(), 30);
    }

    #[test]
    fn test_snapshot_shape() {
        let mut buffer = DurationEntryBuffer::default();
        assert_eq!(
            buffer.snapshot(),
            BufferSnapshot {
                digits: vec![0; 5],
                filled: -1
            }
        );

        buffer.press_digit(4);
        buffer.press_digit(2);
        assert_eq!(
            buffer.snapshot(),
            BufferSnapshot {
                digits: vec![2, 4, 0, 0, 0],
                filled: 1
            }
        );
    }

    #[test]
    fn test_snapshot_restores_derived_values() {
        let mut buffer = DurationEntryBuffer::default();
        press_all(&mut buffer, &[3, 0, 1, 5]);
        let restored = DurationEntryBuffer::try_from((buffer.mode(), buffer.snapshot())).unwrap();

        assert_eq!(restored, buffer);
        assert_eq!(restored.total_seconds(), buffer.total_seconds());
    }

    #[test]
    fn test_malformed_snapshots_are_rejected() {
        let cases = [
            BufferSnapshot {
                digits: vec![1, 0, 0],
                filled: 0,
            },
            BufferSnapshot {
                digits: vec![12, 0, 0, 0, 0],
                filled: 0,
            },
            BufferSnapshot {
                digits: vec![1, 0, 0, 0, 0],
                filled: 5,
            },
            BufferSnapshot {
                digits: vec![1, 0, 0, 0, 0],
                filled: -2,
            },
            BufferSnapshot {
                digits: vec![1, 0, 0, 3, 0],
                filled: 0,
            },
        ];

        for snapshot in cases {
            let result = DurationEntryBuffer::try_from((EntryMode::HoursMinutesSeconds, snapshot.clone()));
            assert!(
                matches!(result, Err(EntryError::MalformedSnapshot(_))),
                "{:?} should be rejected",
                snapshot
            );
            let fallback = DurationEntryBuffer::restore_or_empty(EntryMode::HoursMinutesSeconds, Some(snapshot));
            assert!(fallback.is_empty());
        }
    }

    #[test]
    fn test_restore_missing_snapshot() {
        let buffer = DurationEntryBuffer::restore_or_empty(EntryMode::HoursMinutes, None);
        assert!(buffer.is_empty());
        assert_eq!(buffer.width(), 3);
    }

    #[test]
    fn test_as_duration() {
        let mut buffer = DurationEntryBuffer::default();
        buffer.set_absolute(0, 1, 30);
        assert_eq!(buffer.as_duration(), Duration::from_secs(90));
    }
}
