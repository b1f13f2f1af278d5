/*!
 * Sliding-window boundary detection as an explicit state machine.
 *
 * The scan keeps an anchor frame (first frame of the current subtitle) and a
 * lookahead frame. Every `step` compares the two and moves the lookahead on by
 * one. A run of `window` dissimilar lookahead frames is tolerated as OCR
 * flicker; one more declares a boundary, and the candidate ends `window` frames
 * before the lookahead, since those trailing frames already belong to whatever
 * comes next.
 */

use std::ops::Range;

use crate::recognition::RecognizedFrame;

/// Where the scan stands after a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    /// Lookahead matches the anchor (or the anchor is still blank)
    Scanning,
    /// Lookahead differs, tolerance is being used up
    BoundaryPending,
    /// A boundary was just declared and a range handed out
    Emitting,
}

/// Cursor state of the scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanState {
    /// First frame of the current candidate
    pub anchor: usize,
    /// Frame compared against the anchor on the next step
    pub lookahead: usize,
    /// Dissimilar frames still tolerated before a boundary
    pub bound: usize,
    pub phase: ScanPhase,
}

impl ScanState {
    pub fn new(window: usize) -> Self {
        Self {
            anchor: 0,
            lookahead: 1,
            bound: window,
            phase: ScanPhase::Scanning,
        }
    }

    /// Whether `lookahead` still points into a sequence of `len` frames
    pub fn has_next(&self, len: usize) -> bool {
        self.lookahead < len
    }

    /// Trailing range left over once the lookahead ran off the end
    ///
    /// Only handed out when at least two frames remain past the anchor.
    pub fn remainder(&self, len: usize) -> Option<Range<usize>> {
        (self.anchor + 1 < len).then(|| self.anchor..len)
    }
}

/// Advance the scan by one lookahead frame
///
/// `anchor` and `lookahead` must be the frames at `state.anchor` and
/// `state.lookahead`. Returns the next state and, when a boundary was
/// declared, the frame range of the finished candidate.
pub fn step(
    state: ScanState,
    anchor: &RecognizedFrame,
    lookahead: &RecognizedFrame,
    window: usize,
    similarity_threshold: u32,
) -> (ScanState, Option<Range<usize>>) {
    let mut next = state;
    let mut emitted = None;

    if anchor.text().is_empty() {
        // A blank frame carries no subtitle, move the anchor forward
        next.anchor = state.lookahead;
        next.phase = ScanPhase::Scanning;
    } else if anchor.is_similar_to(lookahead, similarity_threshold) {
        next.bound = window;
        next.phase = ScanPhase::Scanning;
    } else if state.bound > 0 {
        next.bound = state.bound - 1;
        next.phase = ScanPhase::BoundaryPending;
    } else {
        // The tolerance is only ever used up after `window` decrements past
        // the anchor, so the split always lands after it
        let split = state.lookahead - window;
        debug_assert!(split > state.anchor);

        emitted = Some(state.anchor..split);
        next.anchor = split;
        next.lookahead = split;
        next.bound = window;
        next.phase = ScanPhase::Emitting;
    }

    next.lookahead += 1;
    (next, emitted)
}
