use thiserror::Error;

/// Errors raised while decoding or reading a TAP image.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TapError {
    #[error("Unexpected file signature: {found:?}")]
    BadMagic { found: String },

    #[error("Only TAP version 1 is supported (found version {0})")]
    UnsupportedVersion(u8),

    #[error("Header length mismatch: {declared} not equal to actual bytes in file: {actual}")]
    LengthMismatch { declared: u32, actual: usize },

    #[error("Read of {needed} bytes at offset {offset} is out of range ({remaining} remaining)")]
    OutOfRange {
        offset: usize,
        needed: usize,
        remaining: usize,
    },
}

impl TapError {
    /// Header or length validation failed during decode.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            TapError::BadMagic { .. }
                | TapError::UnsupportedVersion(_)
                | TapError::LengthMismatch { .. }
        )
    }

    pub fn is_range_error(&self) -> bool {
        matches!(self, TapError::OutOfRange { .. })
    }
}

pub type Result<T> = std::result::Result<T, TapError>;
