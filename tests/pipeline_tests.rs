//! Pipeline tests
//!
//! Drive complete runs against TAP files in a temporary directory.

use c64tap::pipeline::{self, PipelineOptions};
use c64tap::{decode, encode, Platform, TapImage, Video};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_image(dir: &TempDir, name: &str, pulses: Vec<u32>) -> PathBuf {
    let path = dir.path().join(name);
    let image = TapImage::new(Platform::C64, Video::Pal, pulses);
    fs::write(&path, encode(&image)).unwrap();
    path
}

fn run(options: &PipelineOptions) -> (pipeline::PipelineOutcome, String) {
    let mut out = Vec::new();
    let outcome = pipeline::run(options, &mut out).unwrap();
    (outcome, String::from_utf8(out).unwrap())
}

#[test]
fn test_read_only_run_reports_header() {
    let dir = TempDir::new().unwrap();
    let input = write_image(&dir, "in.tap", vec![48, 48, 300]);

    let (outcome, report) = run(&PipelineOptions::new(&input));

    assert_eq!(outcome.bytes_written, None);
    assert!(report.contains("  Magic:     C64-TAPE-RAW"));
    assert!(report.contains("  Platform:  C64 (0)"));
    assert!(report.contains("  Video:     PAL (0)"));
    assert!(report.contains("  Length:    6 (bytes) 3 (pulses)"));
    assert!(report.contains("  Estimated duration: 0.00 sec"));
}

#[test]
fn test_histogram_report_text() {
    let dir = TempDir::new().unwrap();
    let input = write_image(&dir, "in.tap", vec![48, 50, 48, 1234]);

    let (_, report) = run(&PipelineOptions::new(&input).with_histogram());

    assert!(report.contains("\nNormal pulses:\n"));
    assert!(report.contains("   48:  2  (first, index: 0)\n"));
    assert!(report.contains("   49:  0\n"));
    assert!(report.contains("   50:  1  (first, index: 1)\n"));
    assert!(report.contains("\nLong pulses:\n  Index: 3   len: 1234 (raw)\n"));
}

#[test]
fn test_fixed_order_crop_append_scale() {
    let dir = TempDir::new().unwrap();
    let input = write_image(&dir, "in.tap", vec![10, 20, 30, 40]);
    let extra = write_image(&dir, "extra.tap", vec![50, 600]);
    let output = dir.path().join("out.tap");

    let options = PipelineOptions::new(&input)
        .with_scale(2.0)
        .with_append(&extra)
        .with_crop(Some(1), Some(3))
        .with_output(&output);
    let (outcome, _) = run(&options);

    // Crop sees only the input pulses; scale sees the appended ones too.
    assert_eq!(outcome.image.pulses, vec![40, 60, 100, 1200]);
    let written = fs::read(&output).unwrap();
    assert_eq!(outcome.bytes_written, Some(written.len()));
    let reread = decode(&written).unwrap();
    assert_eq!(reread.pulses, vec![40, 60, 100, 1200]);
    assert_eq!(reread.declared_length, 7);
}

#[test]
fn test_crop_start_only_drops_last_pulse() {
    let dir = TempDir::new().unwrap();
    let input = write_image(&dir, "in.tap", vec![1, 2, 3, 4, 5]);

    let (outcome, _) = run(&PipelineOptions::new(&input).with_crop(Some(1), None));

    assert_eq!(outcome.image.pulses, vec![2, 3, 4]);
}

#[test]
fn test_no_crop_when_bounds_unset() {
    let dir = TempDir::new().unwrap();
    let input = write_image(&dir, "in.tap", vec![1, 2, 3]);

    let (outcome, _) = run(&PipelineOptions::new(&input));

    assert_eq!(outcome.image.pulses, vec![1, 2, 3]);
}

#[test]
fn test_untouched_output_is_byte_identical() {
    let dir = TempDir::new().unwrap();
    let input = write_image(&dir, "in.tap", vec![5, 255, 256, 0xFF_FFFF, 7]);
    let output = dir.path().join("copy.tap");

    run(&PipelineOptions::new(&input).with_output(&output));

    assert_eq!(fs::read(&input).unwrap(), fs::read(&output).unwrap());
}

#[test]
fn test_decode_failure_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("bad.tap");
    fs::write(&input, b"NOT-A-TAPE-FILE-AT-ALL").unwrap();
    let output = dir.path().join("out.tap");

    let mut out = Vec::new();
    let err = pipeline::run(&PipelineOptions::new(&input).with_output(&output), &mut out)
        .unwrap_err();

    assert!(format!("{:#}", err).contains("Unexpected file signature"));
    assert!(!output.exists());
}

#[test]
fn test_bad_append_file_aborts_run() {
    let dir = TempDir::new().unwrap();
    let input = write_image(&dir, "in.tap", vec![1, 2]);
    let output = dir.path().join("out.tap");
    let missing = dir.path().join("missing.tap");

    let mut out = Vec::new();
    let result = pipeline::run(
        &PipelineOptions::new(&input)
            .with_append(&missing)
            .with_output(&output),
        &mut out,
    );

    assert!(result.is_err());
    assert!(!output.exists());
}

#[test]
fn test_invalid_scale_ratio_rejected() {
    let dir = TempDir::new().unwrap();
    let input = write_image(&dir, "in.tap", vec![1, 2]);

    for ratio in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        let mut out = Vec::new();
        let options = PipelineOptions::new(&input).with_scale(ratio);
        assert!(pipeline::run(&options, &mut out).is_err());
        assert!(out.is_empty());
    }
}

#[test]
fn test_json_report_lines() {
    let dir = TempDir::new().unwrap();
    let input = write_image(&dir, "in.tap", vec![30, 30, 500]);

    let (_, report) = run(&PipelineOptions::new(&input).with_histogram().with_json());

    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(lines.len(), 1);
    let value: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(value["header"]["platform_label"], "C64 (0)");
    assert_eq!(value["header"]["pulse_count"], 3);
    assert_eq!(value["histogram"]["buckets"][0]["count"], 2);
    assert_eq!(value["histogram"]["long_pulses"][0]["value"], 500);
}

#[test]
fn test_output_report_length_matches_written_header() {
    let dir = TempDir::new().unwrap();
    let input = write_image(&dir, "in.tap", vec![10]);
    let extra = dir.path().join("extra.tap");
    let mut data = Vec::from(*b"C64-TAPE-RAW");
    data.extend_from_slice(&[1, 0, 0, 0, 4, 0, 0, 0, 0x00, 0x00, 0x00, 0x05]);
    fs::write(&extra, &data).unwrap();
    let output = dir.path().join("out.tap");

    let options = PipelineOptions::new(&input)
        .with_append(&extra)
        .with_output(&output)
        .with_json();
    let (outcome, report) = run(&options);

    let written = decode(&fs::read(&output).unwrap()).unwrap();
    assert_eq!(written.declared_length, 2);
    assert_eq!(outcome.image.declared_length, 2);
    let last: serde_json::Value = serde_json::from_str(report.lines().last().unwrap()).unwrap();
    assert_eq!(last["header"]["length_bytes"], 2);
}
