use std::ops::Range;

use log::{debug, info};

use crate::recognition::RecognizedFrame;

use super::candidate::SubtitleCandidate;
use super::config::SegmentationConfig;
use super::merge::merge_fold;
use super::scanner::{self, ScanState};

/// Turns an ordered frame sequence into subtitle candidates
#[derive(Debug, Clone)]
pub struct SegmentationEngine {
    config: SegmentationConfig,
}

impl SegmentationEngine {
    pub fn new(config: SegmentationConfig) -> Self {
        Self { config }
    }

    /// Frame ranges of the candidates that pass the confidence gate, in scan order
    ///
    /// `frames` must be sorted by ascending frame index.
    pub fn boundaries(&self, frames: &[RecognizedFrame]) -> Vec<Range<usize>> {
        let window = self.config.window;
        let mut state = ScanState::new(window);
        let mut ranges = Vec::new();

        while state.has_next(frames.len()) {
            let (next, emitted) = scanner::step(
                state,
                &frames[state.anchor],
                &frames[state.lookahead],
                window,
                self.config.frame_similarity_threshold,
            );
            if let Some(range) = emitted {
                self.gate(frames, range, &mut ranges);
            }
            state = next;
        }

        if let Some(range) = state.remainder(frames.len()) {
            self.gate(frames, range, &mut ranges);
        }

        ranges
    }

    /// Segment the frames and merge neighbouring near-duplicate subtitles
    pub fn segment<'a>(&self, frames: &'a [RecognizedFrame]) -> Vec<SubtitleCandidate<'a>> {
        let candidates = self
            .boundaries(frames)
            .into_iter()
            .map(|range| SubtitleCandidate::new(&frames[range]));

        let subtitles = merge_fold(candidates, self.config.subtitle_similarity_threshold);
        info!("Segmented {} frames into {} subtitles", frames.len(), subtitles.len());
        subtitles
    }

    fn gate(&self, frames: &[RecognizedFrame], range: Range<usize>, ranges: &mut Vec<Range<usize>>) {
        if passes_confidence_gate(&frames[range.clone()]) {
            debug!("Subtitle boundary: frames {}..{}", range.start, range.end);
            ranges.push(range);
        } else {
            debug!("Dropping low-confidence run: frames {}..{}", range.start, range.end);
        }
    }
}

/// Keep a run only if its best frame beats the mean threshold the frames were built with
///
/// Compares a summed word confidence against a per-word threshold, so most
/// runs with at least one confident word get through. Only runs where no
/// frame retained any word are reliably dropped.
pub fn passes_confidence_gate(frames: &[RecognizedFrame]) -> bool {
    if frames.is_empty() {
        return false;
    }

    let max_confidence = frames.iter().map(|f| f.confidence()).max().unwrap_or(0);
    let threshold_sum: u64 = frames.iter().map(|f| u64::from(f.conf_threshold())).sum();
    let mean_threshold = threshold_sum as f64 / frames.len() as f64;

    f64::from(max_confidence) > mean_threshold
}
