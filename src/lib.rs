pub mod analysis;
pub mod cli;
pub mod cursor;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod tap;
pub mod transform;

pub use analysis::{estimate_duration, PulseHistogram};
pub use error::{Result, TapError};
pub use tap::{decode, encode, Platform, TapImage, Video};
