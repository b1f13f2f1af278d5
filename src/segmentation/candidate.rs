use std::fmt;

use crate::recognition::{similarity, RecognizedFrame};

/// A contiguous run of frames that shows one subtitle
///
/// Borrows its frames from the sequence the engine was given. Frames without
/// any confident word are dropped on construction, so `frames` only holds
/// frames that actually carried text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubtitleCandidate<'a> {
    frames: Vec<&'a RecognizedFrame>,
    text: &'a str,
}

impl<'a> SubtitleCandidate<'a> {
    pub fn new(frames: impl IntoIterator<Item = &'a RecognizedFrame>) -> Self {
        let frames: Vec<&'a RecognizedFrame> = frames
            .into_iter()
            .filter(|frame| frame.confidence() > 0)
            .collect();

        // First frame wins on equal confidence
        let text = frames
            .iter()
            .copied()
            .reduce(|best, frame| if frame.confidence() > best.confidence() { frame } else { best })
            .map_or("", |frame| frame.text());

        Self { frames, text }
    }

    /// Join an earlier candidate with a later one
    pub fn merged(previous: Self, next: Self) -> Self {
        Self::new(previous.frames.into_iter().chain(next.frames))
    }

    pub fn frames(&self) -> &[&'a RecognizedFrame] {
        &self.frames
    }

    /// Text of the most confident frame
    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn index_start(&self) -> usize {
        self.frames.first().map_or(0, |frame| frame.index())
    }

    pub fn index_end(&self) -> usize {
        self.frames.last().map_or(0, |frame| frame.index())
    }

    /// Partial-ratio comparison, so a cue that gained or lost a word at
    /// its edge still counts as the same subtitle
    pub fn is_similar_to(&self, other: &SubtitleCandidate<'_>, threshold: u32) -> bool {
        similarity::partial_ratio(self.text, other.text) >= threshold
    }
}

impl fmt::Display for SubtitleCandidate<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}. {}", self.index_start(), self.index_end(), self.text)
    }
}
