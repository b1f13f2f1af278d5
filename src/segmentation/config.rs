use crate::errors::ConfigError;

// @const: Default full-ratio cutoff for two frames showing the same text
pub const DEFAULT_FRAME_SIMILARITY: u32 = 70;

// @const: Default partial-ratio cutoff for merging neighbouring subtitles
pub const DEFAULT_SUBTITLE_SIMILARITY: u32 = 90;

/// Tuning of one segmentation run
///
/// Passed to the engine on construction, so engines with different tuning can
/// run side by side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentationConfig {
    /// Dissimilar frames tolerated before a subtitle boundary
    pub window: usize,

    /// Frame-to-frame similarity cutoff (0-100)
    pub frame_similarity_threshold: u32,

    /// Subtitle-to-subtitle merge cutoff (0-100)
    pub subtitle_similarity_threshold: u32,
}

impl SegmentationConfig {
    /// Default thresholds with a half-second tolerance window
    pub fn for_frame_rate(fps: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            window: window_for_frame_rate(fps)?,
            frame_similarity_threshold: DEFAULT_FRAME_SIMILARITY,
            subtitle_similarity_threshold: DEFAULT_SUBTITLE_SIMILARITY,
        })
    }

    pub fn with_frame_similarity(mut self, threshold: u32) -> Self {
        self.frame_similarity_threshold = threshold;
        self
    }

    pub fn with_subtitle_similarity(mut self, threshold: u32) -> Self {
        self.subtitle_similarity_threshold = threshold;
        self
    }
}

/// Half a second worth of frames, rounded down
pub fn window_for_frame_rate(fps: f64) -> Result<usize, ConfigError> {
    if !fps.is_finite() || fps <= 0.0 {
        return Err(ConfigError::InvalidFrameRate(fps));
    }
    Ok((fps / 2.0).floor() as usize)
}
