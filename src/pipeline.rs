//! Load, transform and write a TAP image in one pass.
//!
//! Transforms always run as crop, append, scale no matter how the options
//! were supplied. Reports go to the caller's writer and progress goes to
//! `tracing`.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::{debug, info, warn};

use crate::report::TapReport;
use crate::tap::{self, TapImage};
use crate::transform::LEGACY_CROP_END;

/// Options for a single pipeline run
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    /// TAP file to load
    pub input: PathBuf,
    /// Report the pulse histogram of the input
    pub histogram: bool,
    /// First pulse index kept by the crop
    pub crop_start: Option<i64>,
    /// Pulse index the crop stops before
    pub crop_end: Option<i64>,
    /// TAP file whose pulses are appended
    pub append: Option<PathBuf>,
    /// Pulse length ratio
    pub scale: Option<f64>,
    /// Destination for the result
    pub output: Option<PathBuf>,
    /// Emit reports as JSON lines instead of text
    pub json: bool,
}

impl PipelineOptions {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            ..Default::default()
        }
    }

    pub fn with_histogram(mut self) -> Self {
        self.histogram = true;
        self
    }

    pub fn with_crop(mut self, start: Option<i64>, end: Option<i64>) -> Self {
        self.crop_start = start;
        self.crop_end = end;
        self
    }

    pub fn with_append(mut self, path: impl Into<PathBuf>) -> Self {
        self.append = Some(path.into());
        self
    }

    pub fn with_scale(mut self, ratio: f64) -> Self {
        self.scale = Some(ratio);
        self
    }

    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    pub fn with_json(mut self) -> Self {
        self.json = true;
        self
    }

    pub fn crop_requested(&self) -> bool {
        self.crop_start.is_some() || self.crop_end.is_some()
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(ratio) = self.scale {
            if !ratio.is_finite() || ratio <= 0.0 {
                bail!("Scale ratio must be a positive number, got {}", ratio);
            }
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct PipelineOutcome {
    pub image: TapImage,
    pub bytes_written: Option<usize>,
}

pub fn run<W: Write>(options: &PipelineOptions, out: &mut W) -> Result<PipelineOutcome> {
    options.validate()?;

    let mut image = read_tap(&options.input)?;
    emit_report(out, &options.input, &image, options.histogram, options.json)?;

    if options.crop_requested() {
        let start = options.crop_start.unwrap_or(0);
        let end = match options.crop_end {
            Some(end) => end,
            None => {
                warn!(
                    "No crop end given; legacy end index {} drops the final pulse",
                    LEGACY_CROP_END
                );
                LEGACY_CROP_END
            }
        };
        info!("Cropping pulses to interval [{}, {}]", start, end);
        image.crop(start, end);
        debug!(pulses = image.pulse_count(), "Crop complete");
    }

    if let Some(path) = &options.append {
        let other = read_tap(path)?;
        emit_report(out, path, &other, false, options.json)?;
        info!("Appending {} pulses", other.pulse_count());
        image.append(other);
    }

    if let Some(ratio) = options.scale {
        info!("Scaling pulses with ratio: {:.6}", ratio);
        image.scale(ratio);
    }

    let bytes_written = match &options.output {
        Some(path) => {
            // The report shows the length the encoder is about to write.
            image.refresh_length();
            emit_report(out, path, &image, false, options.json)?;
            Some(write_tap(path, &image)?)
        }
        None => None,
    };

    Ok(PipelineOutcome {
        image,
        bytes_written,
    })
}

/// Reads and decodes a TAP file. The file is closed before decoding starts.
pub fn read_tap(path: &Path) -> Result<TapImage> {
    info!("Reading file: {}", path.display());
    let data = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let image =
        tap::decode(&data).with_context(|| format!("Failed to decode {}", path.display()))?;
    debug!(
        pulses = image.pulse_count(),
        long_pulses = image.long_pulse_count(),
        "Decoded {}",
        path.display()
    );
    Ok(image)
}

/// Encodes `image` fully before creating `path`, so failures leave no partial file.
pub fn write_tap(path: &Path, image: &TapImage) -> Result<usize> {
    info!("Writing file: {}", path.display());
    let bytes = tap::encode(image);
    fs::write(path, &bytes).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(bytes.len())
}

fn emit_report<W: Write>(
    out: &mut W,
    path: &Path,
    image: &TapImage,
    with_histogram: bool,
    json: bool,
) -> Result<()> {
    let report = TapReport::new(path.display().to_string(), image, with_histogram);
    if json {
        writeln!(out, "{}", report.to_json()?)?;
    } else {
        write!(out, "{}", report.render())?;
    }
    Ok(())
}
