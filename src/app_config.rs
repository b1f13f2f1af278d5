use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::segmentation::config::{DEFAULT_FRAME_SIMILARITY, DEFAULT_SUBTITLE_SIMILARITY};
use crate::segmentation::SegmentationConfig;
use crate::subtitle_processor::parse_time_to_frame_index;

/// Application configuration module
/// This module handles loading, validating and saving the configuration file.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// OCR aggregation settings
    #[serde(default)]
    pub ocr: OcrConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Settings for turning per-frame OCR output into subtitles
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OcrConfig {
    /// Words below this confidence (0-100) are discarded
    #[serde(default = "default_conf_threshold")]
    pub conf_threshold: u32,

    /// Full-ratio cutoff for consecutive frames showing the same subtitle
    #[serde(default = "default_frame_similarity_threshold")]
    pub frame_similarity_threshold: u32,

    /// Partial-ratio cutoff for merging neighbouring subtitles
    #[serde(default = "default_subtitle_similarity_threshold")]
    pub subtitle_similarity_threshold: u32,

    /// Where OCR starts, `[H:]M:S[.fff]`
    #[serde(default = "default_time_start")]
    pub time_start: String,

    /// Where OCR stops; end of video when absent
    #[serde(default)]
    pub time_end: Option<String>,

    /// Frames recognized at the same time
    #[serde(default = "default_concurrent_recognitions")]
    pub concurrent_recognitions: usize,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            conf_threshold: default_conf_threshold(),
            frame_similarity_threshold: default_frame_similarity_threshold(),
            subtitle_similarity_threshold: default_subtitle_similarity_threshold(),
            time_start: default_time_start(),
            time_end: None,
            concurrent_recognitions: default_concurrent_recognitions(),
        }
    }
}

impl OcrConfig {
    /// Engine tuning for a video with the given frame rate
    pub fn segmentation_config(&self, fps: f64) -> Result<SegmentationConfig, ConfigError> {
        Ok(SegmentationConfig::for_frame_rate(fps)?
            .with_frame_similarity(self.frame_similarity_threshold)
            .with_subtitle_similarity(self.subtitle_similarity_threshold))
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<&LogLevel> for log::LevelFilter {
    fn from(level: &LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_conf_threshold() -> u32 {
    65
}

fn default_frame_similarity_threshold() -> u32 {
    DEFAULT_FRAME_SIMILARITY
}

fn default_subtitle_similarity_threshold() -> u32 {
    DEFAULT_SUBTITLE_SIMILARITY
}

fn default_time_start() -> String {
    "0:00".to_string()
}

fn default_concurrent_recognitions() -> usize {
    4
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let thresholds = [
            ("conf_threshold", self.ocr.conf_threshold),
            ("frame_similarity_threshold", self.ocr.frame_similarity_threshold),
            ("subtitle_similarity_threshold", self.ocr.subtitle_similarity_threshold),
        ];
        for (name, value) in thresholds {
            if value > 100 {
                return Err(ConfigError::ThresholdOutOfRange { name, value });
            }
        }

        // Any positive rate will do for a syntax check; blank means video start or end
        let times = std::iter::once(self.ocr.time_start.as_str()).chain(self.ocr.time_end.as_deref());
        for time in times.filter(|t| !t.trim().is_empty()) {
            parse_time_to_frame_index(time, 1.0)?;
        }

        Ok(())
    }

    /// Load the configuration file, writing a default one when it is missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let reader = BufReader::new(file);
            return serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {}", path.display()));
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write default config to file: {}", path.display()))?;

        Ok(config)
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            ocr: OcrConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
