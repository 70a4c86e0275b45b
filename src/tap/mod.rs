//! C64 TAP image model.
//!
//! A TAP file is a 20-byte header followed by a pulse stream. Each pulse is
//! either a single byte (1-255, cycle count divided by 8) or a zero escape
//! byte followed by a 24-bit big-endian literal cycle count.

mod codec;

use std::fmt;

pub use codec::{decode, encode};

pub const TAP_MAGIC: &str = "C64-TAPE-RAW";
pub const TAP_MAGIC_LEN: usize = 12;
pub const TAP_VERSION: u8 = 1;
pub const HEADER_SIZE: usize = 20;

/// Smallest single-byte value; zero is the escape marker.
pub const SHORT_PULSE_MIN: u32 = 1;
/// Largest value stored as a single byte.
pub const SHORT_PULSE_MAX: u32 = 255;
/// Smallest value that needs the escape sequence.
pub const LONG_PULSE_MIN: u32 = SHORT_PULSE_MAX + 1;
/// Largest value the 24-bit escape can carry.
pub const LONG_PULSE_MAX: u32 = 0x00FF_FFFF;

pub const ESCAPE_BYTE: u8 = 0x00;
pub const SHORT_PULSE_BYTES: u32 = 1;
pub const LONG_PULSE_BYTES: u32 = 4;

#[inline]
pub fn is_long_pulse(pulse: u32) -> bool {
    pulse > SHORT_PULSE_MAX
}

/// Zero can only come from an escape sequence and must be written as one.
#[inline]
pub fn needs_escape(pulse: u32) -> bool {
    pulse == 0 || is_long_pulse(pulse)
}

/// On-disk width of one pulse.
#[inline]
pub fn encoded_size(pulse: u32) -> u32 {
    if needs_escape(pulse) {
        LONG_PULSE_BYTES
    } else {
        SHORT_PULSE_BYTES
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    C64,
    Vic,
    C16,
    Unknown(u8),
}

impl Platform {
    pub fn name(&self) -> Option<&'static str> {
        match self {
            Platform::C64 => Some("C64"),
            Platform::Vic => Some("VIC"),
            Platform::C16 => Some("C16"),
            Platform::Unknown(_) => None,
        }
    }
}

impl From<u8> for Platform {
    fn from(raw: u8) -> Self {
        match raw {
            0 => Platform::C64,
            1 => Platform::Vic,
            2 => Platform::C16,
            other => Platform::Unknown(other),
        }
    }
}

impl From<Platform> for u8 {
    fn from(platform: Platform) -> Self {
        match platform {
            Platform::C64 => 0,
            Platform::Vic => 1,
            Platform::C16 => 2,
            Platform::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        describe(f, self.name(), u8::from(*self))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Video {
    Pal,
    Ntsc,
    Unknown(u8),
}

impl Video {
    pub fn name(&self) -> Option<&'static str> {
        match self {
            Video::Pal => Some("PAL"),
            Video::Ntsc => Some("NTSC"),
            Video::Unknown(_) => None,
        }
    }
}

impl From<u8> for Video {
    fn from(raw: u8) -> Self {
        match raw {
            0 => Video::Pal,
            1 => Video::Ntsc,
            other => Video::Unknown(other),
        }
    }
}

impl From<Video> for u8 {
    fn from(video: Video) -> Self {
        match video {
            Video::Pal => 0,
            Video::Ntsc => 1,
            Video::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for Video {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        describe(f, self.name(), u8::from(*self))
    }
}

fn describe(f: &mut fmt::Formatter<'_>, name: Option<&str>, raw: u8) -> fmt::Result {
    match name {
        Some(name) => write!(f, "{} ({})", name, raw),
        None => write!(f, "Unknown value ({})", raw),
    }
}

/// A decoded TAP file.
///
/// `declared_length` mirrors the header field. Transforms keep it equal to
/// [`TapImage::encoded_length`]; the encoder recomputes it regardless.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TapImage {
    pub magic: String,
    pub version: u8,
    pub platform: Platform,
    pub video: Video,
    pub reserved: u8,
    pub declared_length: u32,
    pub pulses: Vec<u32>,
}

impl TapImage {
    /// Builds a version 1 image around `pulses` with a consistent length.
    pub fn new(platform: Platform, video: Video, pulses: Vec<u32>) -> Self {
        let mut image = Self {
            magic: TAP_MAGIC.to_string(),
            version: TAP_VERSION,
            platform,
            video,
            reserved: 0,
            declared_length: 0,
            pulses,
        };
        image.refresh_length();
        image
    }

    /// Byte size of the pulse stream as it would be written.
    pub fn encoded_length(&self) -> u32 {
        self.pulses.iter().map(|&p| encoded_size(p)).sum()
    }

    pub fn refresh_length(&mut self) {
        self.declared_length = self.encoded_length();
    }

    pub fn pulse_count(&self) -> usize {
        self.pulses.len()
    }

    pub fn long_pulse_count(&self) -> usize {
        self.pulses.iter().filter(|&&p| is_long_pulse(p)).count()
    }
}
