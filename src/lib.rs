/*!
 * # videocr - burned-in subtitle extraction from per-frame OCR
 *
 * A Rust library that turns noisy frame-by-frame OCR output into a clean,
 * timed subtitle file.
 *
 * ## Features
 *
 * - Confidence filtering and character cleanup of raw OCR words
 * - Sliding-window subtitle boundary detection that tolerates OCR flicker
 * - Backward merge of subtitles that were split by a longer dropout
 * - SRT rendering with frame-accurate timestamps
 * - Replay of Tesseract TSV dumps as the OCR source
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `recognition`: Words, frames and text similarity
 * - `segmentation`: The aggregation engine:
 *   - `segmentation::scanner`: Boundary detection step function
 *   - `segmentation::merge`: Backward merge fold
 *   - `segmentation::engine`: Scan driver and confidence gate
 * - `subtitle_processor`: Timestamps and SRT output
 * - `extraction`: Frame source / OCR engine boundary
 * - `app_config`: Configuration management
 * - `app_controller`: Main application controller
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod extraction;
pub mod file_utils;
pub mod recognition;
pub mod segmentation;
pub mod subtitle_processor;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{get_subtitles, save_subtitles_to_file, Controller};
pub use errors::{AppError, ConfigError, RecognitionError};
pub use extraction::{FrameRange, FrameRecognizer, TsvDumpRecognizer, VideoInfo};
pub use recognition::{RecognitionData, RecognizedFrame, RecognizedWord};
pub use segmentation::{SegmentationConfig, SegmentationEngine, SubtitleCandidate};
pub use subtitle_processor::{SubtitleCollection, SubtitleEntry};
