/*!
 * Edit-distance similarity scores on a 0-100 scale.
 *
 * `ratio` compares two whole strings, `partial_ratio` compares the shorter
 * string against its best-aligned window of the longer one. Both work on
 * characters, not bytes, so accented OCR output scores the same as ASCII.
 */

/// Full-string similarity (100 = identical)
///
/// Uses the insertion/deletion distance, so a single substituted character
/// costs two edits: `100 * (len_a + len_b - distance) / (len_a + len_b)`,
/// rounded half to even.
pub fn ratio(a: &str, b: &str) -> u32 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    ratio_chars(&a_chars, &b_chars)
}

/// Best similarity of the shorter string against any equally long window of the longer one
pub fn partial_ratio(a: &str, b: &str) -> u32 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    let (shorter, longer) = if a_chars.len() <= b_chars.len() {
        (a_chars, b_chars)
    } else {
        (b_chars, a_chars)
    };

    if shorter.is_empty() {
        return if longer.is_empty() { 100 } else { 0 };
    }

    let mut best = 0;
    for window in longer.windows(shorter.len()) {
        let score = ratio_chars(&shorter, window);
        if score == 100 {
            return 100;
        }
        best = best.max(score);
    }
    best
}

fn ratio_chars(a: &[char], b: &[char]) -> u32 {
    if a == b {
        return 100;
    }
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let total = a.len() + b.len();
    let matched = 2 * longest_common_subsequence(a, b);
    round_half_even(100 * matched, total)
}

/// Length of the longest common subsequence
///
/// `len_a + len_b - 2 * lcs` is the insertion/deletion edit distance.
fn longest_common_subsequence(a: &[char], b: &[char]) -> usize {
    // Two-row table, same layout as a Levenshtein matrix
    let mut prev_row: Vec<usize> = vec![0; b.len() + 1];
    let mut curr_row: Vec<usize> = vec![0; b.len() + 1];

    for a_char in a {
        for (j, b_char) in b.iter().enumerate() {
            curr_row[j + 1] = if a_char == b_char {
                prev_row[j] + 1
            } else {
                prev_row[j + 1].max(curr_row[j])
            };
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[b.len()]
}

fn round_half_even(numerator: usize, denominator: usize) -> u32 {
    let quotient = numerator / denominator;
    let remainder = numerator % denominator;
    let rounded = match (2 * remainder).cmp(&denominator) {
        std::cmp::Ordering::Greater => quotient + 1,
        std::cmp::Ordering::Equal if quotient % 2 == 1 => quotient + 1,
        _ => quotient,
    };
    rounded as u32
}
