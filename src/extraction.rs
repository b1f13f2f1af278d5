/*!
 * Boundary to the frame source and OCR engine.
 *
 * Decoding video and running OCR are someone else's job; this module only
 * defines the narrow interface such a collaborator implements, resolves the
 * requested time range to frames, fans recognition out over several frames
 * at once and hands the results back in strict frame order.
 */

use std::collections::BTreeMap;
use std::ops::Range;
use std::path::{Path, PathBuf};

use anyhow::Result;
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use indicatif::ProgressBar;
use log::{debug, error, warn};

use crate::errors::{ConfigError, RecognitionError};
use crate::file_utils::FileManager;
use crate::recognition::{RecognitionData, RecognizedFrame};
use crate::subtitle_processor::parse_time_to_frame_index;

/// Stream properties reported by the frame source
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoInfo {
    pub frame_count: usize,
    pub fps: f64,
    pub width: u32,
    pub height: u32,
}

/// Half-open range of frames to recognize
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRange {
    pub start: usize,
    pub end: usize,
}

impl FrameRange {
    /// Resolve `[H:]M:S[.fff]` offsets against the video
    ///
    /// An empty start means the first frame, an empty or missing end means the
    /// last one. The end is clamped to the frame count.
    pub fn resolve(time_start: &str, time_end: Option<&str>, info: &VideoInfo) -> Result<Self, ConfigError> {
        if !info.fps.is_finite() || info.fps <= 0.0 {
            return Err(ConfigError::InvalidFrameRate(info.fps));
        }

        let start = if time_start.trim().is_empty() {
            0
        } else {
            parse_time_to_frame_index(time_start, info.fps)?
        };
        let end = match time_end.map(str::trim).filter(|t| !t.is_empty()) {
            Some(time_end) => parse_time_to_frame_index(time_end, info.fps)?,
            None => info.frame_count,
        };

        if end < start {
            return Err(ConfigError::InvalidTimeRange { start, end });
        }

        let end = end.min(info.frame_count);
        Ok(Self {
            start: start.min(end),
            end,
        })
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn indices(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// A frame source paired with an OCR engine
#[async_trait]
pub trait FrameRecognizer: Send + Sync {
    /// Where the frames come from
    fn source(&self) -> &Path;

    fn info(&self) -> VideoInfo;

    /// Recognize the text on one frame
    ///
    /// `Ok(RecognitionData::NoResult)` for frames without text; `Err` only
    /// for genuine engine or I/O failures.
    async fn recognize(&self, index: usize) -> Result<RecognitionData, RecognitionError>;
}

/// Recognize every frame of `range` and return them in ascending index order
///
/// Up to `concurrency` frames are in flight at once. Any failure aborts the
/// run after all in-flight frames finished; every failure is logged and the
/// first one (by frame index) is returned.
pub async fn recognize_frames<R>(
    recognizer: &R,
    range: FrameRange,
    conf_threshold: u32,
    concurrency: usize,
    progress: &ProgressBar,
) -> Result<Vec<RecognizedFrame>, RecognitionError>
where
    R: FrameRecognizer + ?Sized,
{
    progress.set_length(range.len() as u64);

    let mut results = stream::iter(range.indices())
        .map(|index| async move {
            let result = recognizer.recognize(index).await;
            progress.inc(1);
            (index, result)
        })
        .buffer_unordered(concurrency.max(1))
        .collect::<Vec<_>>()
        .await;

    // Segmentation depends on strict temporal order
    results.sort_by_key(|(index, _)| *index);

    let mut frames = Vec::with_capacity(results.len());
    let mut first_error = None;
    for (index, result) in results {
        match result {
            Ok(data) => frames.push(RecognizedFrame::new(index, &data, conf_threshold)),
            Err(e) => {
                error!("{}", e);
                first_error.get_or_insert(e);
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => {
            debug!("Recognized {} frames", frames.len());
            Ok(frames)
        }
    }
}

/// Replays Tesseract TSV dumps, one file per frame
///
/// The frame index is the trailing number of each file stem
/// (`frame_000042.tsv` is frame 42). Frames without a dump count as frames
/// with nothing on them.
#[derive(Debug, Clone)]
pub struct TsvDumpRecognizer {
    dir: PathBuf,
    dumps: BTreeMap<usize, PathBuf>,
    info: VideoInfo,
}

impl TsvDumpRecognizer {
    pub fn open<P: AsRef<Path>>(dir: P, fps: f64, width: u32, height: u32) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        let mut dumps = BTreeMap::new();

        for path in FileManager::find_files(&dir, "tsv")? {
            let Some(index) = FileManager::frame_index_from_path(&path) else {
                warn!("Ignoring dump without a frame number: {}", path.display());
                continue;
            };
            if let Some(existing) = dumps.get(&index) {
                warn!("Frame {} has several dumps, keeping {:?} over {:?}", index, existing, path);
                continue;
            }
            dumps.insert(index, path);
        }

        let frame_count = dumps.keys().next_back().map_or(0, |last| last + 1);
        debug!("Found {} dumps covering {} frames in {}", dumps.len(), frame_count, dir.display());

        Ok(Self {
            dir,
            dumps,
            info: VideoInfo {
                frame_count,
                fps,
                width,
                height,
            },
        })
    }

    pub fn dump_count(&self) -> usize {
        self.dumps.len()
    }
}

#[async_trait]
impl FrameRecognizer for TsvDumpRecognizer {
    fn source(&self) -> &Path {
        &self.dir
    }

    fn info(&self) -> VideoInfo {
        self.info
    }

    async fn recognize(&self, index: usize) -> Result<RecognitionData, RecognitionError> {
        if index >= self.info.frame_count {
            return Err(RecognitionError::FrameOutOfRange {
                index,
                frame_count: self.info.frame_count,
            });
        }

        let Some(path) = self.dumps.get(&index) else {
            return Ok(RecognitionData::NoResult);
        };

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| RecognitionError::DumpUnreadable {
                path: path.display().to_string(),
                source,
            })?;

        Ok(RecognitionData::from_tsv(&content))
    }
}
