use log::debug;

use super::candidate::SubtitleCandidate;

/// Fold candidates in emission order, healing subtitles that were split in two
///
/// Blank candidates are dropped. Each incoming candidate absorbs the tail of
/// the accumulator for as long as the two texts are similar, so the result
/// never contains two neighbours that would still merge.
pub fn merge_fold<'a>(
    candidates: impl IntoIterator<Item = SubtitleCandidate<'a>>,
    similarity_threshold: u32,
) -> Vec<SubtitleCandidate<'a>> {
    candidates
        .into_iter()
        .fold(Vec::new(), |merged, candidate| {
            push_merged(merged, candidate, similarity_threshold)
        })
}

/// One reducer step of `merge_fold`; only looks at the accumulator's last element
pub fn push_merged<'a>(
    mut merged: Vec<SubtitleCandidate<'a>>,
    candidate: SubtitleCandidate<'a>,
    similarity_threshold: u32,
) -> Vec<SubtitleCandidate<'a>> {
    if candidate.text().is_empty() {
        return merged;
    }

    let mut current = candidate;
    while let Some(previous) = merged.pop() {
        if !current.is_similar_to(&previous, similarity_threshold) {
            merged.push(previous);
            break;
        }
        debug!("Merging subtitle [{}] into [{}]", current, previous);
        current = SubtitleCandidate::merged(previous, current);
    }

    merged.push(current);
    merged
}
