//! Helper functions and utilities
//!
//! Field validators applied at the service boundary, plus pagination math.

use regex::Regex;
use std::sync::OnceLock;

/// Event categories accepted by the API
pub const EVENT_CATEGORIES: &[&str] = &[
    "academic",
    "social",
    "sports",
    "cultural",
    "technical",
    "workshop",
    "seminar",
    "other",
];

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap())
}

fn name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-zA-Z\s]+$").unwrap())
}

fn time_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").unwrap())
}

/// Validate email format
pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

/// Validate a person name: letters and spaces, 2..=50 characters
pub fn is_valid_name(name: &str) -> bool {
    let len = name.trim().chars().count();
    (2..=50).contains(&len) && name_regex().is_match(name.trim())
}

/// Validate a 24h "HH:MM" time-of-day string
pub fn is_valid_time_of_day(value: &str) -> bool {
    time_regex().is_match(value)
}

/// Password strength: at least 6 chars with one upper, one lower, one digit
pub fn is_strong_password(password: &str) -> bool {
    password.len() >= 6
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_digit())
}

/// Validate phone number format (basic validation)
pub fn is_valid_phone(phone: &str) -> bool {
    phone.len() >= 10
        && phone
            .chars()
            .all(|c| c.is_ascii_digit() || c == '+' || c == '-' || c == ' ')
}

/// Check that a category belongs to the accepted vocabulary
pub fn is_valid_category(category: &str) -> bool {
    EVENT_CATEGORIES.contains(&category)
}

/// Calculate pagination offset from a 1-based page number
pub fn calculate_offset(page: i64, page_size: i64) -> i64 {
    (page.max(1) - 1) * page_size
}

/// Total number of pages for a result set
pub fn total_pages(total_items: i64, page_size: i64) -> i64 {
    if page_size <= 0 {
        return 0;
    }
    (total_items + page_size - 1) / page_size
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("student@university.edu"));
        assert!(is_valid_email("a.b@c.de"));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("two@@signs.com"));
        assert!(!is_valid_email("nodot@domain"));
    }

    #[test]
    fn test_name_validation() {
        assert!(is_valid_name("Ada Lovelace"));
        assert!(!is_valid_name("A"));
        assert!(!is_valid_name("Name123"));
        assert!(!is_valid_name(&"x".repeat(51)));
    }

    #[test]
    fn test_time_of_day_validation() {
        assert!(is_valid_time_of_day("09:30"));
        assert!(is_valid_time_of_day("23:59"));
        assert!(!is_valid_time_of_day("24:00"));
        assert!(!is_valid_time_of_day("9:30"));
        assert!(!is_valid_time_of_day("12:60"));
    }

    #[test]
    fn test_password_strength() {
        assert!(is_strong_password("Abcde1"));
        assert!(!is_strong_password("abcdef"));
        assert!(!is_strong_password("ABCDEF1"));
        assert!(!is_strong_password("Ab1"));
    }

    #[test]
    fn test_category_vocabulary() {
        assert!(is_valid_category("workshop"));
        assert!(!is_valid_category("party"));
    }

    #[test]
    fn test_pagination_math() {
        assert_eq!(calculate_offset(1, 10), 0);
        assert_eq!(calculate_offset(3, 10), 20);
        assert_eq!(calculate_offset(0, 10), 0);
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
    }
}
