//! ISBN clean-up and 10/13-digit equivalence.
//!
//! Spreadsheet exports mangle ISBNs in predictable ways: a trailing `.0`,
//! scientific notation, dropped leading zeros, hyphens and stray text.
//! [`normalize`] undoes those, and [`candidates`] expands a normalized value
//! into every stored form that denotes the same book.

use std::fmt;

use serde::Serialize;

/// Only 13-digit ISBNs with this prefix have a 10-character equivalent.
pub const ISBN13_PREFIX: &str = "978";

/// A cleaned identifier: ASCII digits plus `X`, usually 10 or 13 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CanonicalIsbn(String);

impl CanonicalIsbn {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CanonicalIsbn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalIsbn {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Clean a raw cell value. Returns `None` when nothing usable is left.
///
/// Lengths other than 10 or 13 are returned as-is; they simply never match
/// a stored record.
pub fn normalize(raw: &str) -> Option<CanonicalIsbn> {
    let mut s = raw.trim().to_uppercase();
    if s.is_empty() {
        return None;
    }

    if let Some(stripped) = s.strip_suffix(".0") {
        s = stripped.to_string();
    }

    if s.contains('E')
        && let Some(expanded) = expand_exponent(&s)
    {
        s = expanded;
    }

    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == 'X')
        .collect();

    let padded = match cleaned.len() {
        0 => return None,
        9 | 12 => format!("0{cleaned}"),
        _ => cleaned,
    };

    Some(CanonicalIsbn(padded))
}

/// `9.780747532699E+12` → `9780747532699`.
fn expand_exponent(s: &str) -> Option<String> {
    let value: f64 = s.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some((value as i64).to_string())
}

fn digits_to_string(digits: &[u8]) -> String {
    digits.iter().map(|d| char::from(b'0' + d)).collect()
}

fn isbn13_check_digit(d12: &[u8]) -> u8 {
    let sum: u32 = d12
        .iter()
        .enumerate()
        .map(|(i, &d)| if i % 2 == 0 { d as u32 } else { d as u32 * 3 })
        .sum();
    ((10 - (sum % 10)) % 10) as u8
}

fn isbn10_check_char(d9: &[u8]) -> char {
    let sum: u32 = d9
        .iter()
        .enumerate()
        .map(|(i, &d)| (10 - i as u32) * d as u32)
        .sum();
    match 11 - (sum % 11) {
        10 => 'X',
        11 => '0',
        check => char::from(b'0' + check as u8),
    }
}

/// 10-character ISBN → 13-digit form. The check character of the input is
/// ignored and recomputed for the new form.
pub fn to_thirteen(id10: &str) -> Option<CanonicalIsbn> {
    let bytes = id10.as_bytes();
    if bytes.len() != 10 || !bytes[..9].iter().all(u8::is_ascii_digit) {
        return None;
    }

    let mut digits: Vec<u8> = vec![9, 7, 8];
    digits.extend(bytes[..9].iter().map(|b| b - b'0'));
    let check = isbn13_check_digit(&digits);
    digits.push(check);

    Some(CanonicalIsbn(digits_to_string(&digits)))
}

/// 13-digit `978…` ISBN → 10-character form, possibly ending in `X`.
pub fn to_ten(id13: &str) -> Option<CanonicalIsbn> {
    let bytes = id13.as_bytes();
    if bytes.len() != 13 || !bytes.iter().all(u8::is_ascii_digit) || !id13.starts_with(ISBN13_PREFIX) {
        return None;
    }

    let core: Vec<u8> = bytes[3..12].iter().map(|b| b - b'0').collect();
    let mut s = digits_to_string(&core);
    s.push(isbn10_check_char(&core));

    Some(CanonicalIsbn(s))
}

/// Every identifier string that denotes the same book: the normalized value
/// and, when one exists, its equivalent in the other length. At most two
/// entries, never duplicated; the normalized value comes first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct IsbnCandidates(Vec<CanonicalIsbn>);

impl IsbnCandidates {
    /// Candidates for an already-normalized identifier.
    pub fn for_normalized(isbn: &CanonicalIsbn) -> Self {
        let converted = match isbn.len() {
            10 => to_thirteen(isbn.as_str()),
            13 => to_ten(isbn.as_str()),
            _ => None,
        };

        let mut set = vec![isbn.clone()];
        if let Some(other) = converted
            && other != *isbn
        {
            set.push(other);
        }
        Self(set)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CanonicalIsbn> {
        self.0.iter()
    }

    pub fn contains(&self, isbn: &str) -> bool {
        self.0.iter().any(|c| c.as_str() == isbn)
    }

    pub fn intersects(&self, other: &IsbnCandidates) -> bool {
        self.0.iter().any(|c| other.contains(c.as_str()))
    }

    /// Borrowed view for storage lookups.
    pub fn as_strs(&self) -> Vec<&str> {
        self.0.iter().map(CanonicalIsbn::as_str).collect()
    }
}

impl<'a> IntoIterator for &'a IsbnCandidates {
    type Item = &'a CanonicalIsbn;
    type IntoIter = std::slice::Iter<'a, CanonicalIsbn>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Normalize `raw` and expand it into its candidate set. Empty when the raw
/// value normalizes to nothing.
pub fn candidates(raw: &str) -> IsbnCandidates {
    match normalize(raw) {
        Some(isbn) => IsbnCandidates::for_normalized(&isbn),
        None => IsbnCandidates::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(raw: &str) -> Option<String> {
        normalize(raw).map(CanonicalIsbn::into_string)
    }

    #[test]
    fn philosopher_stone_round_trip() {
        let thirteen = to_thirteen("0747532699").unwrap();
        assert_eq!(thirteen.as_str(), "9780747532699");
        assert_eq!(to_ten(thirteen.as_str()).unwrap().as_str(), "0747532699");
    }

    #[test]
    fn round_trip_for_valid_isbn10s() {
        for id10 in ["0306406152", "007462542X", "0000000000", "0747532699", "0198526636"] {
            let thirteen = to_thirteen(id10).unwrap();
            assert_eq!(to_ten(thirteen.as_str()).unwrap().as_str(), id10, "{id10}");
        }
    }

    #[test]
    fn x_check_character() {
        assert_eq!(to_thirteen("007462542X").unwrap().as_str(), "9780074625422");
        assert_eq!(to_ten("9780074625422").unwrap().as_str(), "007462542X");
    }

    #[test]
    fn check_eleven_maps_to_zero() {
        assert_eq!(to_thirteen("0000000000").unwrap().as_str(), "9780000000002");
        assert_eq!(to_ten("9780000000002").unwrap().as_str(), "0000000000");
    }

    #[test]
    fn thirteen_ignores_input_check_char() {
        assert_eq!(to_thirteen("0747532690").unwrap().as_str(), "9780747532699");
    }

    #[test]
    fn malformed_inputs_do_not_convert() {
        assert!(to_thirteen("074753269").is_none());
        assert!(to_thirteen("07475X2699").is_none());
        assert!(to_thirteen("").is_none());
        assert!(to_ten("9790000000001").is_none());
        assert!(to_ten("978074753269X").is_none());
        assert!(to_ten("978074753269").is_none());
    }

    #[test]
    fn normalize_strips_punctuation_and_case() {
        assert_eq!(norm("  0-7475-3269-9 ").as_deref(), Some("0747532699"));
        assert_eq!(norm("isbn 074753269x").as_deref(), Some("074753269X"));
        assert_eq!(norm("978-0-306-40615-7").as_deref(), Some("9780306406157"));
    }

    #[test]
    fn normalize_repairs_spreadsheet_artifacts() {
        assert_eq!(norm("0747532699.0").as_deref(), Some("0747532699"));
        assert_eq!(norm("9.780747532699E+12").as_deref(), Some("9780747532699"));
        assert_eq!(norm("9.780747532699e12").as_deref(), Some("9780747532699"));
        // leading zero dropped by numeric formatting
        assert_eq!(norm("747532699").as_deref(), Some("0747532699"));
        assert_eq!(norm("747532699.0").as_deref(), Some("0747532699"));
        assert_eq!(norm("780747532699").as_deref(), Some("0780747532699"));
    }

    #[test]
    fn normalize_empty_and_odd_lengths() {
        assert_eq!(norm(""), None);
        assert_eq!(norm("   \t "), None);
        assert_eq!(norm("N/A"), None);
        assert_eq!(norm("12345").as_deref(), Some("12345"));
        // not a number, so the exponent path leaves it alone
        assert_eq!(norm("SEE 0747532699").as_deref(), Some("0747532699"));
    }

    #[test]
    fn normalize_is_idempotent() {
        let inputs = [
            "", " ", "0-7475-3269-9", "747532699", "780747532699", "9.780747532699E+12",
            "0747532699.0", "12345", "x", "1.0", "1E5", "074753269x", "97807475326991234",
        ];
        for raw in inputs {
            let once = normalize(raw);
            let twice = once.as_ref().and_then(|n| normalize(n.as_str()));
            assert_eq!(once, twice, "{raw:?}");
        }
    }

    #[test]
    fn candidates_pair_equivalent_forms() {
        let from_ten = candidates("0747532699");
        let from_thirteen = candidates("9780747532699");

        assert_eq!(from_ten.as_strs(), vec!["0747532699", "9780747532699"]);
        assert_eq!(from_thirteen.as_strs(), vec!["9780747532699", "0747532699"]);
        assert!(from_ten.intersects(&from_thirteen));
        assert!(from_thirteen.intersects(&from_ten));
    }

    #[test]
    fn candidates_symmetric_for_x_and_exported_forms() {
        assert!(candidates("007462542X").intersects(&candidates("978-0-07-462542-2")));
        assert!(candidates("747532699").intersects(&candidates("9.780747532699E+12")));
    }

    #[test]
    fn candidates_without_conversion() {
        assert_eq!(candidates("9791032305690").as_strs(), vec!["9791032305690"]);
        assert_eq!(candidates("12345").as_strs(), vec!["12345"]);
        assert!(candidates("").is_empty());
        assert!(candidates("--").is_empty());
    }

    #[test]
    fn candidates_contain_normalized_first() {
        let set = candidates(" 0-7475-3269-9 ");
        assert_eq!(set.len(), 2);
        assert!(set.contains("0747532699"));
        assert_eq!(set.iter().next().map(CanonicalIsbn::as_str), Some("0747532699"));
    }
}
