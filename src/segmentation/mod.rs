/*!
 * Temporal aggregation of per-frame OCR output into subtitles.
 *
 * - `scanner`: sliding-window boundary detection as a step function
 * - `merge`: backward merge of neighbouring near-duplicate subtitles
 * - `candidate`: a run of frames showing one subtitle
 * - `engine`: drives the scan, applies the confidence gate and the merge
 */

pub mod candidate;
pub mod config;
pub mod engine;
pub mod merge;
pub mod scanner;

pub use candidate::SubtitleCandidate;
pub use config::SegmentationConfig;
pub use engine::SegmentationEngine;
pub use merge::merge_fold;
pub use scanner::{ScanPhase, ScanState};
