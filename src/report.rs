//! Human and machine readable summaries of a TAP image.

use std::fmt::Write;

use serde::Serialize;

use crate::analysis::{estimate_duration, HistogramBucket, LongPulse, PulseHistogram};
use crate::tap::TapImage;

#[derive(Debug, Clone, Serialize)]
pub struct HeaderSummary {
    pub magic: String,
    pub version: u8,
    pub platform: u8,
    pub platform_label: String,
    pub video: u8,
    pub video_label: String,
    pub reserved: u8,
    pub length_bytes: u32,
    pub pulse_count: usize,
    pub duration_secs: f64,
}

impl HeaderSummary {
    pub fn from_image(image: &TapImage) -> Self {
        Self {
            magic: image.magic.clone(),
            version: image.version,
            platform: image.platform.into(),
            platform_label: image.platform.to_string(),
            video: image.video.into(),
            video_label: image.video.to_string(),
            reserved: image.reserved,
            length_bytes: image.declared_length,
            pulse_count: image.pulse_count(),
            duration_secs: estimate_duration(image),
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "  Magic:     {}", self.magic);
        let _ = writeln!(out, "  Version:   {}", self.version);
        let _ = writeln!(out, "  Platform:  {}", self.platform_label);
        let _ = writeln!(out, "  Video:     {}", self.video_label);
        let _ = writeln!(out, "  Reserved:  {}", self.reserved);
        let _ = writeln!(
            out,
            "  Length:    {} (bytes) {} (pulses)",
            self.length_bytes, self.pulse_count
        );
        let _ = writeln!(out, "  Estimated duration: {:.2} sec", self.duration_secs);
        out
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HistogramReport {
    pub shortest: Option<u8>,
    pub longest: Option<u8>,
    pub buckets: Vec<HistogramBucket>,
    pub long_pulses: Vec<LongPulse>,
}

impl HistogramReport {
    pub fn from_histogram(histogram: &PulseHistogram) -> Self {
        Self {
            shortest: histogram.shortest(),
            longest: histogram.longest(),
            buckets: histogram.buckets(),
            long_pulses: histogram.long_pulses().to_vec(),
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();

        out.push_str("\nNormal pulses:\n");
        for bucket in &self.buckets {
            match bucket.first_index {
                Some(first) if bucket.count > 0 => {
                    let _ = writeln!(
                        out,
                        "  {:>3}:  {}  (first, index: {})",
                        bucket.value, bucket.count, first
                    );
                }
                _ => {
                    let _ = writeln!(out, "  {:>3}:  {}", bucket.value, bucket.count);
                }
            }
        }

        out.push_str("\nLong pulses:\n");
        for long in &self.long_pulses {
            let _ = writeln!(out, "  Index: {}   len: {} (raw)", long.index, long.value);
        }
        out.push('\n');
        out
    }
}

/// Everything printed for one file, in a form `serde_json` can emit.
#[derive(Debug, Clone, Serialize)]
pub struct TapReport {
    pub path: String,
    pub header: HeaderSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub histogram: Option<HistogramReport>,
}

impl TapReport {
    pub fn new(path: impl Into<String>, image: &TapImage, with_histogram: bool) -> Self {
        Self {
            path: path.into(),
            header: HeaderSummary::from_image(image),
            histogram: with_histogram
                .then(|| HistogramReport::from_histogram(&PulseHistogram::compute(image))),
        }
    }

    pub fn render(&self) -> String {
        let mut out = format!("{}:\n{}", self.path, self.header.render());
        if let Some(histogram) = &self.histogram {
            out.push_str(&histogram.render());
        }
        out
    }

    /// One line of JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tap::{Platform, Video};

    #[test]
    fn test_header_render_reports_unknown_platform() {
        let image = TapImage::new(Platform::Unknown(7), Video::Ntsc, vec![8]);
        let text = HeaderSummary::from_image(&image).render();
        assert!(text.contains("Platform:  Unknown value (7)"));
        assert!(text.contains("Video:     NTSC (1)"));
        assert!(text.contains("Length:    1 (bytes) 1 (pulses)"));
    }
}
