// File: src/patterns.rs
// Purpose: Format checks backing the pattern validators

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([a-zA-Z0-9_.\-])+@(([a-zA-Z0-9\-])+\.)+([a-zA-Z0-9]{2,4})+$").unwrap()
});

// Prefix match: anything may follow the host and port. Case folding is
// ASCII only, so `ſ` and the Kelvin sign are not letters here.
static URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i-u)^(http|https|ftp)://(([A-Z0-9][A-Z0-9_-]*)(\.[A-Z0-9][A-Z0-9_-]*)+)(:([0-9]+))?/?")
        .unwrap()
});

static NUMBER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(^-?[0-9][0-9]*\.[0-9]*$)|(^-?[0-9][0-9]*$)|(^-?\.[0-9][0-9]*$)").unwrap()
});

static INTEGER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?[0-9][0-9]*$").unwrap());

static ALPHA_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z]+$").unwrap());

static NON_WORD_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_]").unwrap());

static PHRASE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.\-()*'# :,]+$").unwrap());

// Known defect: the slashes of a pattern literal ended up inside the pattern
// text and the digit escapes were lost, so `^` sits after a literal `/` and
// nothing can match. Kept as-is until the intended format is confirmed.
pub const PHONE_PATTERN: &str = r"/^1?-?(d{3})?-?(d{2})?d-?(d{4})$/";

static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(PHONE_PATTERN).unwrap());

// Unanchored: a date anywhere in the value is accepted.
static DATE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(1[0-9]|[1-9])/([1-3][0-9]|[1-9])/((19|20)[0-9][0-9]|[0-9][0-9])").unwrap()
});

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_REGEX.is_match(value)
}

pub fn is_valid_url(value: &str) -> bool {
    URL_REGEX.is_match(value)
}

/// Decimal or integer with optional leading minus; empty passes
pub fn is_number(value: &str) -> bool {
    value.is_empty() || NUMBER_REGEX.is_match(value)
}

/// Integer with optional leading minus; empty passes
pub fn is_integer(value: &str) -> bool {
    value.is_empty() || INTEGER_REGEX.is_match(value)
}

pub fn is_alpha(value: &str) -> bool {
    ALPHA_REGEX.is_match(value)
}

pub fn is_alpha_num(value: &str) -> bool {
    !NON_WORD_REGEX.is_match(value)
}

pub fn is_phrase(value: &str) -> bool {
    value.is_empty() || PHRASE_REGEX.is_match(value)
}

pub fn is_phone(value: &str) -> bool {
    PHONE_REGEX.is_match(value)
}

pub fn is_date(value: &str) -> bool {
    DATE_REGEX.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("first.last-x@mail.example.org"));
        assert!(!is_valid_email("user@example"));
        assert!(!is_valid_email("user+tag@example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_url() {
        assert!(is_valid_url("http://example.com"));
        assert!(is_valid_url("HTTPS://Example.COM:8080/path?q=1"));
        assert!(is_valid_url("ftp://files.example.org"));
        assert!(!is_valid_url("mailto:user@example.com"));
        assert!(!is_valid_url("http://localhost"));
        assert!(!is_valid_url("example.com"));
        assert!(!is_valid_url("http://\u{17F}ite.com"));
        assert!(!is_valid_url("http://\u{212A}ey.com"));
        assert!(!is_valid_url("http\u{17F}://example.com"));
    }

    #[test]
    fn test_number_and_integer() {
        for ok in ["", "0", "-12", "3.", "3.14", "-.5"] {
            assert!(is_number(ok), "{ok:?} should be a number");
        }
        for bad in ["abc", "1e5", "--1", "1.2.3", "."] {
            assert!(!is_number(bad), "{bad:?} should not be a number");
        }
        assert!(is_integer(""));
        assert!(is_integer("-42"));
        assert!(!is_integer("4.2"));
        assert!(!is_integer("4a"));
    }

    #[test]
    fn test_alpha_and_alpha_num() {
        assert!(is_alpha("Hello"));
        assert!(!is_alpha("Hello1"));
        assert!(!is_alpha(""));
        assert!(is_alpha_num("abc_123"));
        assert!(is_alpha_num(""));
        assert!(!is_alpha_num("abc-123"));
        assert!(!is_alpha_num("two words"));
    }

    #[test]
    fn test_phrase() {
        assert!(is_phrase(""));
        assert!(is_phrase("Flat 4, (rear) #2: Smith's * 1.5-x"));
        assert!(!is_phrase("semi;colon"));
        assert!(!is_phrase("50%"));
    }

    #[test]
    fn test_phone_never_matches() {
        for value in ["555-123-4567", "1-555-123-4567", "5551234567", PHONE_PATTERN] {
            assert!(!is_phone(value));
        }
    }

    #[test]
    fn test_date() {
        assert!(is_date("12/25/2020"));
        assert!(is_date("1/1/99"));
        assert!(is_date("due 3/14/1999 noon"));
        assert!(!is_date("2020-12-25"));
        assert!(!is_date(""));
    }
}
