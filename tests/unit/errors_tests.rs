/*!
 * Tests for error types and their conversions
 */

use std::error::Error;
use std::io;

use videocr::errors::{AppError, ConfigError, RecognitionError};
use videocr::{FrameRange, VideoInfo};

fn video(frame_count: usize) -> VideoInfo {
    VideoInfo {
        frame_count,
        fps: 25.0,
        width: 1920,
        height: 1080,
    }
}

#[test]
fn test_frameRange_withEndBeforeStart_shouldReportFrames() {
    let error = FrameRange::resolve("0:04", Some("0:02"), &video(1000)).unwrap_err();

    assert_eq!(error, ConfigError::InvalidTimeRange { start: 100, end: 50 });
    assert!(error.to_string().contains("end frame 50"));
}

#[test]
fn test_frameRange_withBadTime_shouldReportInput() {
    let error = FrameRange::resolve("1:2:3:4", None, &video(1000)).unwrap_err();
    assert_eq!(error.to_string(), "Time data \"1:2:3:4\" does not match format \"%H:%M:%S\"");
}

#[test]
fn test_appError_fromConfigError_shouldWrap() {
    let error: AppError = ConfigError::InvalidFrameRate(0.0).into();

    assert!(matches!(error, AppError::Config(ConfigError::InvalidFrameRate(_))));
    assert!(error.to_string().starts_with("Configuration error:"));
}

#[test]
fn test_recognitionError_dumpUnreadable_shouldKeepSource() {
    let error = RecognitionError::DumpUnreadable {
        path: "frame_000001.tsv".to_string(),
        source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
    };

    assert!(error.source().is_some());
    let app_error: AppError = error.into();
    assert!(app_error.to_string().contains("frame_000001.tsv"));
}

#[test]
fn test_appError_fromIoError_shouldBeFileError() {
    let error: AppError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
    assert!(matches!(error, AppError::File(_)));
}
