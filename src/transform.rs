//! In-place edits of a decoded pulse train.
//!
//! The pipeline applies these in a fixed order: crop, append, scale. None of
//! them reorders pulses, and each leaves `declared_length` equal to the
//! encoded size of the result.

use crate::tap::{
    needs_escape, TapImage, LONG_PULSE_MAX, LONG_PULSE_MIN, SHORT_PULSE_MAX, SHORT_PULSE_MIN,
};

/// Crop end used by the legacy command line when only `--crop-start` is given.
///
/// As a slice end it excludes the final pulse.
pub const LEGACY_CROP_END: i64 = -1;

impl TapImage {
    /// Keeps `pulses[start..end]` with Python slice semantics.
    ///
    /// Negative indices count from the end, out-of-range indices are clamped
    /// and `start >= end` leaves an empty train. `crop(0, -1)` drops the last
    /// pulse.
    pub fn crop(&mut self, start: i64, end: i64) {
        let len = self.pulses.len();
        let lo = slice_index(start, len);
        let hi = slice_index(end, len);

        if lo >= hi {
            self.pulses.clear();
        } else {
            self.pulses.truncate(hi);
            self.pulses.drain(..lo);
        }
        self.refresh_length();
    }

    /// Appends the pulses of `other` after our own.
    pub fn append(&mut self, other: TapImage) {
        self.pulses.extend(other.pulses);
        self.declared_length = self.declared_length.saturating_add(other.declared_length);
    }

    /// Multiplies every pulse by `ratio` without changing any pulse's width.
    pub fn scale(&mut self, ratio: f64) {
        for pulse in &mut self.pulses {
            *pulse = scale_pulse(*pulse, ratio);
        }
        self.refresh_length();
    }
}

fn slice_index(index: i64, len: usize) -> usize {
    let len = len as i64;
    let resolved = if index < 0 { index + len } else { index };
    resolved.clamp(0, len) as usize
}

/// Rounds half-to-even, then saturates inside the pulse's original class.
///
/// Short pulses stay within `SHORT_PULSE_MIN..=SHORT_PULSE_MAX` and long
/// pulses within `LONG_PULSE_MIN..=LONG_PULSE_MAX`. NaN lands on the lower
/// bound of the class. An escaped zero pulse stays zero.
pub fn scale_pulse(pulse: u32, ratio: f64) -> u32 {
    if pulse == 0 {
        return 0;
    }
    let scaled = (pulse as f64 * ratio).round_ties_even();

    if needs_escape(pulse) {
        if scaled > LONG_PULSE_MAX as f64 {
            LONG_PULSE_MAX
        } else if scaled >= LONG_PULSE_MIN as f64 {
            scaled as u32
        } else {
            LONG_PULSE_MIN
        }
    } else if scaled > SHORT_PULSE_MAX as f64 {
        SHORT_PULSE_MAX
    } else if scaled >= SHORT_PULSE_MIN as f64 {
        scaled as u32
    } else {
        SHORT_PULSE_MIN
    }
}
