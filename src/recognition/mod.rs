/*!
 * Recognition data model.
 *
 * This module turns raw OCR engine output into immutable per-frame values:
 * - `frame`: words, frames and the raw input shapes they are built from
 * - `similarity`: the 0-100 edit-distance scores used to compare texts
 */

pub mod frame;
pub mod similarity;

pub use frame::{clean_ocr_text, LineRecord, RecognitionData, RecognizedFrame, RecognizedWord, LINE_BREAK, MAX_CONFIDENCE};
pub use similarity::{partial_ratio, ratio};
