//! Regex patterns for key-value extraction from OCR text.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // "Patient Name: John Doe" or "Blood Pressure - 120/80"
    pub static ref INLINE_PAIR: Regex = Regex::new(
        r"(\w+(?:\s+\w+)*?)\s*[:\-]\s*([^\n]+)"
    ).unwrap();

    // Label on one line, value on the next (separator lost by OCR)
    pub static ref NEXT_LINE_PAIR: Regex = Regex::new(
        r"(\w+(?:\s+\w+)*?)\s*\n\s*([^\n]+)"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_pair_takes_shortest_label() {
        let caps = INLINE_PAIR.captures("Patient Name: John Doe").unwrap();
        assert_eq!(&caps[1], "Patient Name");
        assert_eq!(&caps[2], "John Doe");
    }

    #[test]
    fn test_inline_pair_stops_at_newline() {
        let caps = INLINE_PAIR.captures("Date - 2023-10-15\nnext").unwrap();
        assert_eq!(&caps[1], "Date");
        assert_eq!(&caps[2], "2023-10-15");
    }

    #[test]
    fn test_next_line_pair() {
        let caps = NEXT_LINE_PAIR.captures("Diagnosis\n   Routine Checkup").unwrap();
        assert_eq!(&caps[1], "Diagnosis");
        assert_eq!(&caps[2], "Routine Checkup");
    }
}
