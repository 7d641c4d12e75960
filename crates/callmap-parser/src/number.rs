//! Phone-number normalization and number-block lookup.
//!
//! Numbers appear in exports in many local and international spellings.
//! [`normalize`] folds them into one canonical numeric form with the Dutch
//! country code (`31`) so they can be compared against trunk ranges.

use log::debug;

use callmap_core::model::NumberBlockRange;

const COUNTRY_CODE: &str = "31";

/// Normalize a phone number to its canonical numeric form.
///
/// Short numbers that do not look like subscriber numbers (extensions) are
/// returned unchanged. Returns `None` when the text does not reduce to a
/// digit string.
///
/// # Examples
///
/// ```
/// use callmap_parser::number::normalize;
///
/// assert_eq!(normalize("0612345678"), Some(31612345678));
/// assert_eq!(normalize("+31 (0)6 12345678"), Some(31612345678));
/// assert_eq!(normalize("1234"), Some(1234));
/// assert_eq!(normalize("n/a"), None);
/// ```
pub fn normalize(raw: &str) -> Option<u64> {
    let cleaned: String = raw
        .replace("(0)", "")
        .chars()
        .filter(|c| !matches!(c, '+' | '*' | ' '))
        .collect();

    let digits = match cleaned.strip_prefix("00") {
        Some(rest) if is_digits(rest) => rest,
        _ => cleaned.as_str(),
    };
    if !is_digits(digits) {
        return None;
    }

    let canonical = if digits.starts_with(COUNTRY_CODE) && digits.len() >= 11 {
        digits.to_string()
    } else if digits.starts_with('0') && digits.len() == 10 {
        format!("{COUNTRY_CODE}{}", &digits[1..])
    } else if digits.len() == 9 && !digits.starts_with('0') {
        format!("{COUNTRY_CODE}{digits}")
    } else {
        digits.to_string()
    };

    canonical.parse().ok()
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

/// Number blocks of a bundle, sorted by range start.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumberBlocks {
    ranges: Vec<NumberBlockRange>,
}

impl NumberBlocks {
    /// Creates the lookup table. Ranges are sorted by start; the sort is
    /// stable, so of two ranges with the same start the earlier one wins.
    pub fn new(mut ranges: Vec<NumberBlockRange>) -> Self {
        ranges.sort_by_key(NumberBlockRange::start);
        debug!(ranges = ranges.len(); "Indexed number blocks");
        Self { ranges }
    }

    pub fn ranges(&self) -> &[NumberBlockRange] {
        &self.ranges
    }

    /// Label of the first block containing `raw` after normalization.
    ///
    /// Ranges are scanned in order; overlapping ranges resolve to the one
    /// with the lowest start.
    pub fn find_block(&self, raw: &str) -> Option<&str> {
        let number = normalize(raw)?;
        self.ranges
            .iter()
            .find(|range| range.contains(number))
            .map(NumberBlockRange::label)
    }
}
