/*!
 * Common test utilities for the videocr test suite
 */

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use async_trait::async_trait;
use tempfile::TempDir;

use videocr::errors::RecognitionError;
use videocr::recognition::{RecognitionData, RecognizedFrame};
use videocr::{FrameRecognizer, VideoInfo};

/// Header line Tesseract writes at the top of every TSV dump
pub const TSV_HEADER: &str =
    "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext";

/// Route library logs through env_logger, once per test binary
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// One TSV word row: (block, confidence, text)
pub fn tsv_row(block: u32, confidence: i32, text: &str) -> String {
    format!("5\t1\t{}\t1\t1\t1\t10\t10\t50\t20\t{}\t{}", block, confidence, text)
}

/// Full TSV dump made of the given word rows
pub fn tsv_dump(words: &[(u32, i32, &str)]) -> String {
    let mut lines = vec![TSV_HEADER.to_string()];
    lines.extend(words.iter().map(|(block, conf, text)| tsv_row(*block, *conf, text)));
    lines.join("\n")
}

/// Writes `frame_NNNNNN.tsv` for every frame that has words
pub fn write_dumps(dir: &Path, frames: &[Vec<(u32, i32, &str)>]) -> Result<()> {
    for (index, words) in frames.iter().enumerate() {
        if !words.is_empty() {
            create_test_file(dir, &format!("frame_{:06}.tsv", index), &tsv_dump(words))?;
        }
    }
    Ok(())
}

/// Frame whose whole text was recognized at one confidence
pub fn text_frame(index: usize, text: &str, confidence: u32) -> RecognizedFrame {
    text_frame_with_threshold(index, text, confidence, 65)
}

pub fn text_frame_with_threshold(index: usize, text: &str, confidence: u32, conf_threshold: u32) -> RecognizedFrame {
    if text.is_empty() {
        RecognizedFrame::empty(index, conf_threshold)
    } else {
        RecognizedFrame::new(index, &RecognitionData::from_best_guess(text, confidence), conf_threshold)
    }
}

/// Frames built from one text per index, blank entries meaning nothing recognized
pub fn frames_from_texts(texts: &[&str], confidence: u32) -> Vec<RecognizedFrame> {
    texts
        .iter()
        .enumerate()
        .map(|(index, text)| text_frame(index, text, confidence))
        .collect()
}

/// In-memory recognizer serving canned results
pub struct MockRecognizer {
    source: PathBuf,
    info: VideoInfo,
    results: Vec<RecognitionData>,
    failing_frame: Option<usize>,
}

impl MockRecognizer {
    pub fn new(fps: f64, results: Vec<RecognitionData>) -> Self {
        Self {
            source: PathBuf::from("mock.mp4"),
            info: VideoInfo {
                frame_count: results.len(),
                fps,
                width: 1280,
                height: 720,
            },
            results,
            failing_frame: None,
        }
    }

    /// Shorthand for a best-guess text per frame, blank entries meaning no result
    pub fn from_texts(fps: f64, texts: &[&str], confidence: u32) -> Self {
        let results = texts
            .iter()
            .map(|text| {
                if text.is_empty() {
                    RecognitionData::NoResult
                } else {
                    RecognitionData::from_best_guess(*text, confidence)
                }
            })
            .collect();
        Self::new(fps, results)
    }

    pub fn failing_at(mut self, index: usize) -> Self {
        self.failing_frame = Some(index);
        self
    }
}

#[async_trait]
impl FrameRecognizer for MockRecognizer {
    fn source(&self) -> &Path {
        &self.source
    }

    fn info(&self) -> VideoInfo {
        self.info
    }

    async fn recognize(&self, index: usize) -> Result<RecognitionData, RecognitionError> {
        if self.failing_frame == Some(index) {
            return Err(RecognitionError::EngineFailed {
                index,
                message: "mock engine failure".to_string(),
            });
        }

        // Finish later frames first so ordering has to be restored
        let delay = (self.results.len().saturating_sub(index) % 3) as u64;
        tokio::time::sleep(std::time::Duration::from_millis(delay)).await;

        self.results
            .get(index)
            .cloned()
            .ok_or(RecognitionError::FrameOutOfRange {
                index,
                frame_count: self.results.len(),
            })
    }
}
