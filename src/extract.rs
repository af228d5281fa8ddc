//! Foreign-script text extraction from lesson units.

use std::collections::BTreeSet;

use crate::catalog::LessonUnit;
use crate::config::ScriptRange;

/// Isolate the script part of a vocabulary entry such as `"ཀ(ka)"`.
///
/// When the entry has a `(` and the text before it is non-empty after
/// trimming, that text wins. Otherwise the longest run of characters inside
/// `range` is returned (leftmost on ties), or an empty string when there is
/// none, so a bare gloss like `"hello"` normalizes to nothing.
pub fn normalize_vocab_entry(entry: &str, range: ScriptRange) -> String {
    if let Some(paren) = entry.find('(') {
        let before_paren = entry[..paren].trim();
        if !before_paren.is_empty() {
            return before_paren.to_string();
        }
    }
    longest_script_run(entry, range).to_string()
}

fn longest_script_run(text: &str, range: ScriptRange) -> &str {
    // (byte start, byte end, char count)
    let mut best = (0, 0, 0);
    let mut run: Option<(usize, usize)> = None;

    for (idx, ch) in text.char_indices() {
        if range.contains(ch) {
            let (start, len) = run.unwrap_or((idx, 0));
            run = Some((start, len + 1));
        } else if let Some((start, len)) = run.take() {
            if len > best.2 {
                best = (start, idx, len);
            }
        }
    }
    if let Some((start, len)) = run {
        if len > best.2 {
            best = (start, text.len(), len);
        }
    }

    &text[best.0..best.1]
}

/// Lazily yield the script strings of one unit, in document order.
///
/// Exercise texts come first, then normalized vocabulary entries. Output is
/// trimmed and never empty but may repeat; see [`unique_sorted`].
pub fn extract_strings(
    unit: &LessonUnit,
    range: ScriptRange,
) -> impl Iterator<Item = String> + '_ {
    let from_exercises = unit
        .exercises
        .iter()
        .filter_map(|ex| ex.script_text.as_deref())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string);

    let from_vocabulary = unit
        .metadata
        .vocabulary
        .iter()
        .map(move |entry| normalize_vocab_entry(entry, range))
        .filter(|text| !text.is_empty());

    from_exercises.chain(from_vocabulary)
}

/// Deduplicate by exact value and sort by codepoint.
pub fn unique_sorted(strings: impl IntoIterator<Item = String>) -> Vec<String> {
    strings
        .into_iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
