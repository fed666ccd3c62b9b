use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("valid email regex")
});

static PHONE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\+?\d[\d\-()\s]{7,}\d").expect("valid phone regex"));

static LOCATION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(New York|San Francisco|Los Angeles|Pittsburgh|Atlanta|Chicago|Boston|London|Toronto|Bangalore|Mumbai|Pune|Delhi|Paris|Berlin|Singapore|Tokyo|Sydney)\b",
    )
    .expect("valid location regex")
});

/// Phone candidates shorter than this are usually year ranges.
const MIN_PHONE_DIGITS: usize = 10;
/// Only the document header is searched for a location.
const LOCATION_SCAN_LINES: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
}

/// Heuristic contact extraction: first email, first phone-like run with enough
/// digits, first line as the name when it has 2–10 words, and a known city in
/// the header.
pub fn extract_contact_info(text: &str) -> ContactInfo {
    let email = EMAIL_REGEX.find(text).map(|m| m.as_str().to_string());

    let phone = PHONE_REGEX
        .find_iter(text)
        .map(|m| m.as_str().trim())
        .find(|candidate| {
            candidate.chars().filter(|c| c.is_ascii_digit()).count() >= MIN_PHONE_DIGITS
        })
        .map(str::to_string);

    let name = text
        .lines()
        .next()
        .map(str::trim)
        .filter(|first| (2..=10).contains(&first.split_whitespace().count()))
        .map(str::to_string);

    let location = text
        .lines()
        .take(LOCATION_SCAN_LINES)
        .find_map(|line| LOCATION_REGEX.find(line))
        .map(|m| m.as_str().to_string());

    ContactInfo {
        name,
        email,
        phone,
        location,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Ada Lovelace\n\
        ada.lovelace@example.org | +1 (412) 555-0199\n\
        Pittsburgh, PA\n\
        Experience\n\
        Robotics Engineer, Jan 2019 - Mar 2022";

    #[test]
    fn test_full_header() {
        let info = extract_contact_info(HEADER);
        assert_eq!(info.name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(info.email.as_deref(), Some("ada.lovelace@example.org"));
        assert_eq!(info.phone.as_deref(), Some("+1 (412) 555-0199"));
        assert_eq!(info.location.as_deref(), Some("Pittsburgh"));
    }

    #[test]
    fn test_single_word_first_line_is_not_a_name() {
        let info = extract_contact_info("RESUME\nsomeone@example.com");
        assert!(info.name.is_none());
    }

    #[test]
    fn test_year_range_is_not_a_phone() {
        let info = extract_contact_info("John Smith\nWorked 2019-2021 at Acme");
        assert!(info.phone.is_none());
    }

    #[test]
    fn test_location_beyond_header_is_ignored() {
        let mut text = String::from("Jane Roe\n");
        for _ in 0..12 {
            text.push_str("filler line\n");
        }
        text.push_str("Relocated to Berlin\n");
        assert!(extract_contact_info(&text).location.is_none());
    }

    #[test]
    fn test_location_is_case_insensitive() {
        let info = extract_contact_info("Jane Roe\nbased in new york");
        assert_eq!(info.location.as_deref(), Some("new york"));
    }
}
