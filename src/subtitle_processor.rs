use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::ConfigError;
use crate::file_utils::FileManager;
use crate::segmentation::SubtitleCandidate;

// @module: Subtitle timing and SRT rendering

// @const: SRT timestamp regex
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{2,}):(\d{2}):(\d{2}),(\d{3}) --> (\d{2,}):(\d{2}):(\d{2}),(\d{3})").unwrap()
});

/// Milliseconds elapsed at a frame, truncated
///
/// The elapsed time is first resolved to whole microseconds and only then cut
/// down to milliseconds, so frames landing on an exact millisecond never come
/// out one short because of float error.
pub fn frame_to_ms(frame_index: usize, fps: f64) -> u64 {
    let micros = (frame_index as f64 / fps * 1_000_000.0).round();
    (micros as u64) / 1_000
}

/// SRT timestamp (HH:MM:SS,mmm) of a frame
pub fn format_frame_timestamp(frame_index: usize, fps: f64) -> String {
    SubtitleEntry::format_timestamp(frame_to_ms(frame_index, fps))
}

/// Frame index at a `[H:]M:S[.fff]` time offset
pub fn parse_time_to_frame_index(time: &str, fps: f64) -> Result<usize, ConfigError> {
    let invalid = || ConfigError::InvalidTimeFormat(time.to_string());

    let parts = time
        .trim()
        .split(':')
        .map(|part| part.parse::<f64>().map_err(|_| invalid()))
        .collect::<Result<Vec<f64>, ConfigError>>()?;

    if parts.iter().any(|part| !part.is_finite() || *part < 0.0) {
        return Err(invalid());
    }

    let seconds = match parts.as_slice() {
        [hours, minutes, seconds] => hours * 3600.0 + minutes * 60.0 + seconds,
        [minutes, seconds] => minutes * 60.0 + seconds,
        _ => return Err(invalid()),
    };

    Ok((seconds * fps) as usize)
}

// @struct: Single subtitle entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleEntry {
    // @field: Sequence number
    pub seq_num: usize,

    // @field: Start time in ms
    pub start_time_ms: u64,

    // @field: End time in ms
    pub end_time_ms: u64,

    // @field: Subtitle text
    pub text: String,
}

impl SubtitleEntry {
    pub fn new(seq_num: usize, start_time_ms: u64, end_time_ms: u64, text: String) -> Self {
        SubtitleEntry {
            seq_num,
            start_time_ms,
            end_time_ms,
            text,
        }
    }

    /// Entry spanning a candidate's first and last frame
    pub fn from_candidate(seq_num: usize, candidate: &SubtitleCandidate<'_>, fps: f64) -> Self {
        Self::new(
            seq_num,
            frame_to_ms(candidate.index_start(), fps),
            frame_to_ms(candidate.index_end(), fps),
            candidate.text().to_string(),
        )
    }

    /// Parse an SRT timestamp to milliseconds
    pub fn parse_timestamp(timestamp: &str) -> Result<u64> {
        // Parse HH:MM:SS,mmm format
        let parts: Vec<&str> = timestamp.split(&[':', ',', '.'][..]).collect();

        if parts.len() != 4 {
            return Err(anyhow!("Invalid timestamp format: {}", timestamp));
        }

        let hours: u64 = parts[0].parse().context("Failed to parse hours")?;
        let minutes: u64 = parts[1].parse().context("Failed to parse minutes")?;
        let seconds: u64 = parts[2].parse().context("Failed to parse seconds")?;
        let millis: u64 = parts[3].parse().context("Failed to parse milliseconds")?;

        // Validate time components
        if minutes >= 60 || seconds >= 60 || millis >= 1000 {
            return Err(anyhow!("Invalid time components in timestamp: {}", timestamp));
        }

        Ok(hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + millis)
    }

    /// Convert start time to formatted SRT timestamp
    pub fn format_start_time(&self) -> String {
        Self::format_timestamp(self.start_time_ms)
    }

    /// Convert end time to formatted SRT timestamp
    pub fn format_end_time(&self) -> String {
        Self::format_timestamp(self.end_time_ms)
    }

    /// Format a timestamp in milliseconds to SRT format (HH:MM:SS,mmm)
    pub fn format_timestamp(ms: u64) -> String {
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }
}

impl fmt::Display for SubtitleEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.seq_num)?;
        writeln!(f, "{} --> {}", self.format_start_time(), self.format_end_time())?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// Timed subtitles extracted from one video
#[derive(Debug, Clone)]
pub struct SubtitleCollection {
    /// Where the frames came from
    pub source: PathBuf,

    /// Frame rate used for timing
    pub fps: f64,

    /// Entries in emission order, numbered from 0
    pub entries: Vec<SubtitleEntry>,
}

impl SubtitleCollection {
    pub fn new(source: PathBuf, fps: f64) -> Self {
        SubtitleCollection {
            source,
            fps,
            entries: Vec::new(),
        }
    }

    /// Number and time the segmented candidates
    pub fn from_candidates(source: PathBuf, fps: f64, candidates: &[SubtitleCandidate<'_>]) -> Self {
        let entries = candidates
            .iter()
            .enumerate()
            .map(|(seq_num, candidate)| SubtitleEntry::from_candidate(seq_num, candidate, fps))
            .collect();

        SubtitleCollection { source, fps, entries }
    }

    /// Concatenated SRT text of all entries
    pub fn to_srt_string(&self) -> String {
        self.entries.iter().map(|entry| entry.to_string()).collect()
    }

    /// Write subtitles to an SRT file
    pub fn write_to_srt<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        FileManager::write_to_file(path, &self.to_srt_string())?;

        debug!("Wrote {} subtitles to {}", self.entries.len(), path.display());
        Ok(())
    }

    /// Parse SRT content back into entries
    ///
    /// Sequence numbers are kept as written. Entries whose end precedes their
    /// start are skipped.
    pub fn parse_srt_string(content: &str) -> Result<Vec<SubtitleEntry>> {
        let mut entries = Vec::new();

        for block in content.replace("\r\n", "\n").split("\n\n") {
            let mut lines = block.lines().skip_while(|line| line.trim().is_empty());

            let Some(seq_line) = lines.next() else {
                continue;
            };
            let seq_num: usize = match seq_line.trim().parse() {
                Ok(num) => num,
                Err(_) => {
                    warn!("Skipping subtitle block without sequence number: {:?}", seq_line);
                    continue;
                }
            };

            let Some(caps) = lines.next().and_then(|line| TIMESTAMP_REGEX.captures(line.trim())) else {
                warn!("Skipping subtitle {} without a valid timestamp line", seq_num);
                continue;
            };
            let start_time_ms = Self::parse_timestamp_to_ms(&caps, 1)?;
            let end_time_ms = Self::parse_timestamp_to_ms(&caps, 5)?;
            if end_time_ms < start_time_ms {
                warn!("Skipping subtitle {} ending before it starts", seq_num);
                continue;
            }

            let text = lines.collect::<Vec<_>>().join("\n");
            entries.push(SubtitleEntry::new(seq_num, start_time_ms, end_time_ms, text));
        }

        Ok(entries)
    }

    /// Parse timestamp to milliseconds
    fn parse_timestamp_to_ms(caps: &regex::Captures, start_idx: usize) -> Result<u64> {
        let field = |offset: usize| -> Result<u64> {
            caps.get(start_idx + offset)
                .ok_or_else(|| anyhow!("Missing timestamp field"))?
                .as_str()
                .parse()
                .context("Failed to parse timestamp field")
        };

        Ok((field(0)? * 3600 + field(1)? * 60 + field(2)?) * 1000 + field(3)?)
    }
}

impl fmt::Display for SubtitleCollection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.to_srt_string())
    }
}
