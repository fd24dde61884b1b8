//! Heuristic key-value extraction over raw OCR text.

use std::collections::HashSet;
use std::ops::Range;

use regex::Captures;
use tracing::{debug, trace};

use crate::models::report::KeyValuePair;

use super::patterns::{INLINE_PAIR, NEXT_LINE_PAIR};

/// Ordered, case-insensitively unique key-value pairs.
pub type ExtractionResult = Vec<KeyValuePair>;

/// Default upper bound (exclusive) on key length, in characters.
pub const DEFAULT_MAX_KEY_LENGTH: usize = 30;

/// A raw pattern match before normalization.
#[derive(Debug, Clone)]
struct Candidate<'t> {
    key: &'t str,
    value: &'t str,
    span: Range<usize>,
}

impl<'t> Candidate<'t> {
    fn from_captures(caps: &Captures<'t>) -> Option<Self> {
        let whole = caps.get(0)?;
        Some(Self {
            key: caps.get(1)?.as_str(),
            value: caps.get(2)?.as_str(),
            span: whole.start()..whole.end(),
        })
    }

    fn overlaps(&self, other: &Candidate<'_>) -> bool {
        self.span.start < other.span.end && other.span.start < self.span.end
    }
}

/// Extracts "label: value" style fields from unstructured text.
///
/// Two passes run over the text: an inline pass for `key: value` and
/// `key - value` on one line, then a next-line pass for a label followed by
/// its value on the following line. The next-line pass skips over regions
/// already claimed by inline matches, so the inline reading always wins.
/// Survivors are trimmed, filtered, and deduplicated by lowercased key with
/// the first occurrence kept.
#[derive(Debug, Clone)]
pub struct KeyValueExtractor {
    max_key_length: usize,
}

impl KeyValueExtractor {
    pub fn new() -> Self {
        Self {
            max_key_length: DEFAULT_MAX_KEY_LENGTH,
        }
    }

    /// Keys with `length` characters or more are discarded.
    pub fn with_max_key_length(mut self, length: usize) -> Self {
        self.max_key_length = length;
        self
    }

    /// Extract all key-value pairs from `text`. Never fails; unstructured
    /// input yields an empty result.
    pub fn extract(&self, text: &str) -> ExtractionResult {
        let inline: Vec<Candidate<'_>> = INLINE_PAIR
            .captures_iter(text)
            .filter_map(|caps| Candidate::from_captures(&caps))
            .collect();

        let next_line = next_line_candidates(text, &inline);

        let mut seen = HashSet::new();
        let mut pairs = Vec::new();

        for candidate in inline.iter().chain(next_line.iter()) {
            let Some(pair) = self.normalize(candidate) else {
                continue;
            };
            if seen.insert(pair.key.to_lowercase()) {
                pairs.push(pair);
            }
        }

        debug!(
            "Extracted {} key-value pairs ({} inline, {} next-line candidates)",
            pairs.len(),
            inline.len(),
            next_line.len()
        );

        pairs
    }

    fn normalize(&self, candidate: &Candidate<'_>) -> Option<KeyValuePair> {
        let key = candidate
            .key
            .trim()
            .trim_end_matches(':')
            .trim_end_matches('-');
        let value = candidate.value.trim();

        if key.is_empty() || value.is_empty() {
            return None;
        }
        if key.chars().count() >= self.max_key_length {
            trace!("Discarding overlong key {:?}", key);
            return None;
        }

        Some(KeyValuePair::new(key, value))
    }
}

impl Default for KeyValueExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Next-line matches that do not overlap an inline match.
///
/// When a match overlaps an inline span, scanning resumes at the end of that
/// span, so a label directly after an inline line is still found.
fn next_line_candidates<'t>(text: &'t str, inline: &[Candidate<'t>]) -> Vec<Candidate<'t>> {
    let mut candidates = Vec::new();
    let mut pos = 0;

    while pos < text.len() {
        let Some(caps) = NEXT_LINE_PAIR.captures_at(text, pos) else {
            break;
        };
        let Some(candidate) = Candidate::from_captures(&caps) else {
            break;
        };

        match inline.iter().find(|claimed| claimed.overlaps(&candidate)) {
            Some(claimed) => {
                trace!(
                    "Next-line match {:?} shadowed by inline match {:?}",
                    candidate.span, claimed.span
                );
                pos = claimed.span.end.max(candidate.span.start + 1);
            }
            None => {
                pos = candidate.span.end;
                candidates.push(candidate);
            }
        }

        while !text.is_char_boundary(pos) {
            pos += 1;
        }
    }

    candidates
}

/// Extract key-value pairs with the default settings.
pub fn extract_key_value_pairs(text: &str) -> ExtractionResult {
    KeyValueExtractor::new().extract(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pairs(items: &[(&str, &str)]) -> ExtractionResult {
        items.iter().map(|(k, v)| KeyValuePair::new(*k, *v)).collect()
    }

    #[test]
    fn test_inline_fields() {
        let result = extract_key_value_pairs("Patient Name: John Doe\nDate: 2023-10-15");
        assert_eq!(
            result,
            pairs(&[("Patient Name", "John Doe"), ("Date", "2023-10-15")])
        );
    }

    #[test]
    fn test_empty_text() {
        assert!(extract_key_value_pairs("").is_empty());
    }

    #[test]
    fn test_first_occurrence_wins_case_insensitively() {
        let result = extract_key_value_pairs("Date: 2023-10-15\ndate: 2023-10-16");
        assert_eq!(result, pairs(&[("Date", "2023-10-15")]));
    }

    #[test]
    fn test_overlong_key_is_discarded() {
        let sentence = "The quick brown fox jumps over dogs";
        assert_eq!(sentence.chars().count(), 35);

        let result = extract_key_value_pairs(&format!("{}: value", sentence));
        assert!(result.is_empty());
    }

    #[test]
    fn test_key_length_limit_is_exclusive() {
        let key_29 = "a".repeat(29);
        let key_30 = "b".repeat(30);
        let text = format!("{}: first\n{}: second", key_29, key_30);

        let result = extract_key_value_pairs(&text);
        assert_eq!(result, vec![KeyValuePair::new(key_29, "first")]);
    }

    #[test]
    fn test_custom_key_limit() {
        let extractor = KeyValueExtractor::new().with_max_key_length(5);
        let result = extractor.extract("Name: Jane\nDiagnosis: Flu");
        assert_eq!(result, pairs(&[("Name", "Jane")]));
    }

    #[test]
    fn test_hyphen_separator() {
        let result = extract_key_value_pairs("Blood Pressure - 120/80\nHeart Rate: 72 bpm");
        assert_eq!(
            result,
            pairs(&[("Blood Pressure", "120/80"), ("Heart Rate", "72 bpm")])
        );
    }

    #[test]
    fn test_label_then_next_line() {
        let result = extract_key_value_pairs("Diagnosis\nRoutine Checkup");
        assert_eq!(result, pairs(&[("Diagnosis", "Routine Checkup")]));
    }

    #[test]
    fn test_label_directly_after_inline_line() {
        let result = extract_key_value_pairs("Patient Name: John Doe\nDiagnosis\nRoutine Checkup");
        assert_eq!(
            result,
            pairs(&[("Patient Name", "John Doe"), ("Diagnosis", "Routine Checkup")])
        );

        let result = extract_key_value_pairs(
            "Patient Name: John Doe\nDate: 2023-10-15\nDiagnosis\nRoutine Checkup",
        );
        assert_eq!(
            result,
            pairs(&[
                ("Patient Name", "John Doe"),
                ("Date", "2023-10-15"),
                ("Diagnosis", "Routine Checkup"),
            ])
        );
    }

    #[test]
    fn test_inline_and_next_line_combined() {
        let text = "MEDICAL REPORT\nPatient Name: Jane Roe\nAllergies\nPenicillin";
        let result = extract_key_value_pairs(text);

        // \s in the label also spans newlines, so the heading joins the first label
        assert_eq!(
            result,
            pairs(&[
                ("MEDICAL REPORT\nPatient Name", "Jane Roe"),
                ("Allergies", "Penicillin"),
            ])
        );
    }

    #[test]
    fn test_separator_followed_by_newline() {
        let result = extract_key_value_pairs("Name:\nJohn");
        assert_eq!(result, pairs(&[("Name", "John")]));
    }

    #[test]
    fn test_value_keeps_later_colons() {
        let result = extract_key_value_pairs("Time: 10:30 AM");
        assert_eq!(result, pairs(&[("Time", "10:30 AM")]));
    }

    #[test]
    fn test_crlf_line_endings() {
        let result = extract_key_value_pairs("Date: 2023-10-15\r\nDoctor: Dr. Smith\r\n");
        assert_eq!(
            result,
            pairs(&[("Date", "2023-10-15"), ("Doctor", "Dr. Smith")])
        );
    }

    #[test]
    fn test_unicode_labels() {
        let result = extract_key_value_pairs("Nom du patient: Zoë Müller");
        assert_eq!(result, pairs(&[("Nom du patient", "Zoë Müller")]));
    }

    #[test]
    fn test_punctuation_only_text() {
        assert!(extract_key_value_pairs("   \n\n  ::: --- \n").is_empty());
    }

    #[test]
    fn test_mock_engine_text() {
        let text = "Mock OCR result: This is a sample text extracted from the image.\n\
                    Patient Name: John Doe\n\
                    Date: 2023-10-15\n\
                    Diagnosis: Routine Checkup\n\
                    Prescription: Vitamin D 1000 IU daily";

        let result = extract_key_value_pairs(text);
        assert_eq!(
            result,
            pairs(&[
                ("Mock OCR result", "This is a sample text extracted from the image."),
                ("Patient Name", "John Doe"),
                ("Date", "2023-10-15"),
                ("Diagnosis", "Routine Checkup"),
                ("Prescription", "Vitamin D 1000 IU daily"),
            ])
        );
    }

    #[test]
    fn test_invariants_hold_on_noisy_input() {
        let inputs = [
            "",
            "no structure at all",
            "a:b:c",
            "::::\n----\n",
            "Ward 7\nBed 12\nNurse: Kim",
            "Temperature: 98.6 F\nTEMPERATURE: 99.1 F\ntemperature - 100",
            "x\ny\nz\nw",
            "Lorem ipsum dolor sit amet consectetur adipiscing: elit\nsed: do\n\n\nend",
            "\u{feff}Header\n\tTabbed:\tvalue\t\n",
        ];

        for input in inputs {
            let first = extract_key_value_pairs(input);
            let second = extract_key_value_pairs(input);
            assert_eq!(first, second, "non-deterministic output for {:?}", input);

            let mut keys = HashSet::new();
            for pair in &first {
                assert!(!pair.key.is_empty());
                assert!(pair.key.chars().count() < DEFAULT_MAX_KEY_LENGTH);
                assert!(!pair.value.is_empty());
                assert_eq!(pair.value, pair.value.trim());
                assert!(keys.insert(pair.key.to_lowercase()), "duplicate key in {:?}", input);
            }
        }
    }
}
