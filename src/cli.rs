use clap::Parser;
use std::path::PathBuf;
use tracing::Level;

use crate::pipeline::PipelineOptions;

/// c64tap - analysis and processing of C64 TAP files
///
/// Operations run in a fixed order: crop, append, scale. The order of the
/// flags on the command line does not matter.
#[derive(Parser, Debug)]
#[command(name = "c64tap")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Analyze and process C64 TAP tape images", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// TAP file to read
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Print pulse length analysis and histogram
    #[arg(long)]
    pub hist: bool,

    /// Remove pulses before index START
    #[arg(long, value_name = "START", allow_negative_numbers = true)]
    pub crop_start: Option<i64>,

    /// Remove pulses from index END onwards (defaults to -1, dropping the last pulse)
    #[arg(long, value_name = "END", allow_negative_numbers = true)]
    pub crop_end: Option<i64>,

    /// Append pulses from another TAP file
    #[arg(long, value_name = "FILE")]
    pub append: Option<PathBuf>,

    /// Scale pulse lengths, e.g. 0.9 makes every pulse 90% as long
    #[arg(long, value_name = "RATIO")]
    pub scale: Option<f64>,

    /// Write the result to a TAP file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Print reports as JSON lines
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub fn log_level(&self) -> Level {
        if self.debug {
            Level::TRACE
        } else if self.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        }
    }

    pub fn into_options(self) -> PipelineOptions {
        PipelineOptions {
            input: self.input,
            histogram: self.hist,
            crop_start: self.crop_start,
            crop_end: self.crop_end,
            append: self.append,
            scale: self.scale,
            output: self.output,
            json: self.json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_negative_crop() {
        let cli = Cli::try_parse_from(["c64tap", "-i", "in.tap", "--crop-start", "-10"]).unwrap();
        assert_eq!(cli.crop_start, Some(-10));
        assert_eq!(cli.crop_end, None);
    }

    #[test]
    fn test_input_is_required() {
        assert!(Cli::try_parse_from(["c64tap", "--hist"]).is_err());
    }

    #[test]
    fn test_into_options() {
        let cli = Cli::try_parse_from([
            "c64tap", "--scale", "0.9", "-o", "out.tap", "-i", "in.tap", "--hist",
        ])
        .unwrap();
        assert_eq!(cli.log_level(), Level::INFO);
        let options = cli.into_options();
        assert!(options.histogram);
        assert_eq!(options.scale, Some(0.9));
        assert_eq!(options.output, Some(PathBuf::from("out.tap")));
        assert!(!options.crop_requested());
    }
}
