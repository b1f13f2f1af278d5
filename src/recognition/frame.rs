/*!
 * Per-frame OCR output.
 *
 * A `RecognizedFrame` is built once from whatever the OCR engine returned for a
 * frame and never changes afterwards. Words under the confidence threshold are
 * dropped on construction, line breaks between text blocks are kept as marker
 * words, and the joined text goes through a small character cleanup that undoes
 * the most common OCR confusions.
 */

use log::trace;

use super::similarity;

// @const: Text of the marker word inserted between text blocks
pub const LINE_BREAK: &str = "\n";

// @const: Characters that are almost always OCR noise in subtitles
const NOISE_CHARS: &[char] = &[
    '<', '>', '{', '}', '[', ']', ';', '`', '@', '#', '$', '%', '^', '*', '_', '=', '~', '\\',
];

// @const: Highest confidence an OCR engine reports
pub const MAX_CONFIDENCE: u32 = 100;

// @const: Minimum column count of a Tesseract TSV word row
const TSV_WORD_COLUMNS: usize = 12;

/// A single recognized token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognizedWord {
    /// Recognition confidence, 0-100
    pub confidence: u32,

    /// Token text, or `LINE_BREAK` for a block separator
    pub text: String,
}

impl RecognizedWord {
    pub fn new(confidence: u32, text: impl Into<String>) -> Self {
        Self {
            confidence,
            text: text.into(),
        }
    }

    /// Zero-confidence separator between text blocks
    pub fn line_break() -> Self {
        Self::new(0, LINE_BREAK)
    }

    pub fn is_line_break(&self) -> bool {
        self.text == LINE_BREAK
    }
}

/// One word row reported by the OCR engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRecord {
    /// Block (paragraph) the word belongs to
    pub block: u32,

    /// Engine confidence; negative values mark rows without a word
    pub confidence: i32,

    /// Word text
    pub text: String,
}

impl LineRecord {
    pub fn new(block: u32, confidence: i32, text: impl Into<String>) -> Self {
        Self {
            block,
            confidence,
            text: text.into(),
        }
    }

    /// Parse one row of Tesseract `image_to_data` TSV output
    ///
    /// Rows with fewer than 12 columns carry no word and yield `None`, as do
    /// rows whose block or confidence column is not numeric. Fractional
    /// confidences from newer engines are truncated, and the result is
    /// clamped to -1..=100.
    pub fn from_tsv_row(row: &str) -> Option<Self> {
        let columns: Vec<&str> = row.split_whitespace().collect();
        if columns.len() < TSV_WORD_COLUMNS {
            return None;
        }

        let block = columns[2].parse::<u32>().ok()?;
        let confidence_column = columns[columns.len() - 2];
        let confidence = confidence_column
            .parse::<f64>()
            .ok()
            .filter(|c| c.is_finite())?
            .trunc()
            .clamp(-1.0, f64::from(MAX_CONFIDENCE)) as i32;
        let text = columns[columns.len() - 1];

        Some(Self::new(block, confidence, text))
    }
}

/// Raw recognition result for one frame, in one of the shapes OCR engines produce
#[derive(Debug, Clone, PartialEq)]
pub enum RecognitionData {
    /// Word rows in reading order
    LineRecords(Vec<LineRecord>),

    /// A single best-effort text with its confidence
    BestGuess {
        text: String,
        confidence: u32,
    },

    /// The engine found nothing on the frame
    NoResult,
}

impl RecognitionData {
    pub fn from_line_records(records: impl IntoIterator<Item = LineRecord>) -> Self {
        Self::LineRecords(records.into_iter().collect())
    }

    pub fn from_best_guess(text: impl Into<String>, confidence: u32) -> Self {
        Self::BestGuess {
            text: text.into(),
            confidence: confidence.min(MAX_CONFIDENCE),
        }
    }

    /// Parse a full Tesseract TSV dump (header line first)
    ///
    /// Malformed rows are skipped; a dump without word rows is still a valid,
    /// empty result.
    pub fn from_tsv(tsv: &str) -> Self {
        let records: Vec<LineRecord> = tsv
            .lines()
            .skip(1)
            .filter_map(LineRecord::from_tsv_row)
            .collect();
        Self::LineRecords(records)
    }
}

/// OCR output of one video frame
#[derive(Debug, Clone, PartialEq)]
pub struct RecognizedFrame {
    index: usize,
    words: Vec<RecognizedWord>,
    confidence: u32,
    text: String,
    conf_threshold: u32,
}

impl RecognizedFrame {
    /// Build a frame from raw recognition data
    ///
    /// Never fails: anything unusable in `data` is skipped and an unusable
    /// frame ends up with zero confidence and empty text.
    pub fn new(index: usize, data: &RecognitionData, conf_threshold: u32) -> Self {
        let words = match data {
            RecognitionData::LineRecords(records) => collect_words(records, conf_threshold),
            RecognitionData::BestGuess { text, confidence } => {
                let confidence = (*confidence).min(MAX_CONFIDENCE);
                if !text.is_empty() && confidence >= conf_threshold {
                    vec![RecognizedWord::new(confidence, text.clone())]
                } else {
                    Vec::new()
                }
            }
            RecognitionData::NoResult => Vec::new(),
        };

        let confidence = words.iter().map(|w| w.confidence).sum();
        let joined = words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let text = clean_ocr_text(&joined);

        trace!("Frame {}: confidence {}, text {:?}", index, confidence, text);

        Self {
            index,
            words,
            confidence,
            text,
            conf_threshold,
        }
    }

    /// Frame on which nothing was recognized
    pub fn empty(index: usize, conf_threshold: u32) -> Self {
        Self::new(index, &RecognitionData::NoResult, conf_threshold)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn words(&self) -> &[RecognizedWord] {
        &self.words
    }

    /// Sum of the retained words' confidences
    pub fn confidence(&self) -> u32 {
        self.confidence
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Threshold this frame was built with
    pub fn conf_threshold(&self) -> u32 {
        self.conf_threshold
    }

    /// Whether the two frames most likely show the same subtitle
    ///
    /// Frames without text never match, otherwise every pair of blank frames
    /// would look like one long subtitle.
    pub fn is_similar_to(&self, other: &RecognizedFrame, threshold: u32) -> bool {
        if self.text.is_empty() || other.text.is_empty() {
            return false;
        }
        similarity::ratio(&self.text, &other.text) >= threshold
    }
}

// Walk word rows in order, keeping confident words and one marker per block change
fn collect_words(records: &[LineRecord], conf_threshold: u32) -> Vec<RecognizedWord> {
    let mut words: Vec<RecognizedWord> = Vec::new();
    let mut block = 0;

    for record in records {
        if record.block > block {
            block = record.block;
            if words.last().is_some_and(|w| !w.is_line_break()) {
                words.push(RecognizedWord::line_break());
            }
        }

        if record.confidence < 0 || record.text.is_empty() {
            continue;
        }
        let confidence = (record.confidence as u32).min(MAX_CONFIDENCE);
        if confidence >= conf_threshold {
            words.push(RecognizedWord::new(confidence, record.text.clone()));
        }
    }

    words
}

/// Undo typical OCR character confusions
///
/// `|` becomes `I`, bracket-like and symbol noise is removed, the `" \n "`
/// produced by joining around a line-break marker collapses to `"\n"`, and
/// surrounding whitespace is trimmed.
pub fn clean_ocr_text(text: &str) -> String {
    let translated: String = text
        .chars()
        .filter(|c| !NOISE_CHARS.contains(c))
        .map(|c| if c == '|' { 'I' } else { c })
        .collect();

    translated.replace(" \n ", "\n").trim().to_string()
}
