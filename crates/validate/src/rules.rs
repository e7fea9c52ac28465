//! Per-field format rules. Each rule is independent and pure; the
//! validator decides what a failure means (error vs warning).

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

// ── Compiled regex cache ─────────────────────────────────────────────────────

macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static Regex {
            static R: OnceLock<Regex> = OnceLock::new();
            R.get_or_init(|| Regex::new($pat).expect("invalid regex"))
        }
    };
}

re!(re_gstin, r"^[0-9]{2}[A-Z]{5}[0-9]{4}[A-Z][1-9A-Z]Z[0-9A-Z]$");
re!(re_pincode, r"^[1-9][0-9]{5}$");
re!(re_phone, r"^[6-9][0-9]{9}$");
re!(re_email, r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$");
re!(re_date_groups, r"^(\d{1,4})[/.\-](\d{1,2})[/.\-](\d{1,4})$");

// ── GSTIN ────────────────────────────────────────────────────────────────────

/// GSTIN: 2-digit state code, 5 letters, 4 digits, one letter, one
/// entity character, the literal `Z`, one checksum character. The
/// state code must be in the currently assigned range 01–38. The
/// checksum character itself is not verified.
pub fn valid_gstin(gstin: &str) -> bool {
    if !re_gstin().is_match(gstin) {
        return false;
    }
    match gstin[..2].parse::<u32>() {
        Ok(code) => (1..=38).contains(&code),
        Err(_) => false,
    }
}

// ── Pincode ──────────────────────────────────────────────────────────────────

/// Indian PIN codes are six digits and never start with zero.
pub fn valid_pincode(pincode: &str) -> bool {
    re_pincode().is_match(pincode.trim())
}

// ── Phone ────────────────────────────────────────────────────────────────────

/// Indian mobile numbers: after stripping separators and an optional
/// country-code prefix, ten digits starting with 6–9.
pub fn valid_phone(phone: &str) -> bool {
    let stripped: String = phone
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '(' | ')'))
        .collect();

    let digits = if let Some(rest) = stripped.strip_prefix("+91") {
        rest
    } else if stripped.starts_with("91") && stripped.len() > 10 {
        &stripped[2..]
    } else {
        &stripped
    };

    re_phone().is_match(digits)
}

// ── Email ────────────────────────────────────────────────────────────────────

pub fn valid_email(email: &str) -> bool {
    re_email().is_match(email.trim())
}

// ── Date ─────────────────────────────────────────────────────────────────────

/// Parse a loosely formatted date and render it as `YYYY-MM-DD`.
///
/// Disambiguation order is fixed for compatibility with upstream
/// consumers: a 4-digit leading group means year-first; otherwise
/// day-first when the first group fits a day and the second a month;
/// otherwise month-first. Ambiguous inputs like `05/06/2023` are a
/// genuine domain ambiguity and resolve day-first by that order.
/// Two-digit years map to the 1900s from 50 up and the 2000s below.
pub fn canonical_date(input: &str) -> Option<String> {
    let caps = re_date_groups().captures(input.trim())?;
    let (g1, g2, g3) = (&caps[1], &caps[2], &caps[3]);

    let (year_str, month_str, day_str) = if g1.len() == 4 {
        (g1, g2, g3)
    } else {
        let first: u32 = g1.parse().ok()?;
        let second: u32 = g2.parse().ok()?;
        if first <= 31 && second <= 12 {
            (g3, g2, g1)
        } else {
            (g3, g1, g2)
        }
    };

    let year = expand_year(year_str.parse().ok()?, year_str.len());
    let month: u32 = month_str.parse().ok()?;
    let day: u32 = day_str.parse().ok()?;

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    Some(date.format("%Y-%m-%d").to_string())
}

fn expand_year(year: i32, digits: usize) -> i32 {
    if digits == 2 {
        if year >= 50 {
            1900 + year
        } else {
            2000 + year
        }
    } else {
        year
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── GSTIN ─────────────────────────────────────────────────────────────────

    #[test]
    fn gstin_well_formed() {
        assert!(valid_gstin("27AAPFU0939F1ZV"));
        assert!(valid_gstin("07ABCDE1234F2Z5"));
    }

    #[test]
    fn gstin_rejects_bad_shapes() {
        assert!(!valid_gstin(""));
        assert!(!valid_gstin("27AAPFU0939F1Z")); // 14 chars
        assert!(!valid_gstin("27aapfu0939f1zv")); // lowercase
        assert!(!valid_gstin("27AAPFU0939F1XV")); // missing fixed Z
        assert!(!valid_gstin("27AAPFU0939F0ZV")); // entity char 0
    }

    #[test]
    fn gstin_state_code_must_be_assigned() {
        assert!(!valid_gstin("00AAPFU0939F1ZV"));
        assert!(!valid_gstin("39AAPFU0939F1ZV"));
        assert!(valid_gstin("38AAPFU0939F1ZV"));
        assert!(valid_gstin("01AAPFU0939F1ZV"));
    }

    // ── Pincode ───────────────────────────────────────────────────────────────

    #[test]
    fn pincode_six_digits_no_leading_zero() {
        assert!(valid_pincode("400001"));
        assert!(valid_pincode(" 110001 "));
        assert!(!valid_pincode("00001"));
        assert!(!valid_pincode("000001"));
        assert!(!valid_pincode("4000011"));
        assert!(!valid_pincode("40001"));
        assert!(!valid_pincode("4000O1"));
    }

    // ── Phone ─────────────────────────────────────────────────────────────────

    #[test]
    fn phone_accepts_separators_and_country_code() {
        assert!(valid_phone("9876543210"));
        assert!(valid_phone("98765 43210"));
        assert!(valid_phone("(987) 654-3210"));
        assert!(valid_phone("+91 98765 43210"));
        assert!(valid_phone("919876543210"));
    }

    #[test]
    fn phone_rejects_wrong_lengths_and_prefixes() {
        assert!(!valid_phone("5876543210")); // starts below 6
        assert!(!valid_phone("987654321")); // 9 digits
        assert!(!valid_phone("98765432100")); // 11 digits, no 91 prefix
        assert!(!valid_phone(""));
        // A bare 10-digit number starting 91 is kept intact, not
        // treated as a country code.
        assert!(valid_phone("9198765432"));
    }

    // ── Email ─────────────────────────────────────────────────────────────────

    #[test]
    fn email_shape() {
        assert!(valid_email("a.buyer@example.co.in"));
        assert!(valid_email("ops+invoices@vendor.com"));
        assert!(!valid_email("no-at-sign.example.com"));
        assert!(!valid_email("user@domain"));
        assert!(!valid_email("user@domain.c"));
    }

    // ── Date ──────────────────────────────────────────────────────────────────

    #[test]
    fn date_day_first() {
        assert_eq!(canonical_date("15/06/2023").as_deref(), Some("2023-06-15"));
        assert_eq!(canonical_date("01-02-2024").as_deref(), Some("2024-02-01"));
        assert_eq!(canonical_date("15.06.2023").as_deref(), Some("2023-06-15"));
    }

    #[test]
    fn date_year_first() {
        assert_eq!(canonical_date("2023/06/15").as_deref(), Some("2023-06-15"));
        assert_eq!(canonical_date("2023-6-5").as_deref(), Some("2023-06-05"));
    }

    #[test]
    fn date_month_first_when_day_slot_overflows() {
        // First group cannot be a day, so it must be the month.
        assert_eq!(canonical_date("06/15/2023").as_deref(), Some("2023-06-15"));
    }

    #[test]
    fn ambiguous_date_resolves_day_first() {
        assert_eq!(canonical_date("05/06/2023").as_deref(), Some("2023-06-05"));
    }

    #[test]
    fn two_digit_years_split_at_fifty() {
        assert_eq!(canonical_date("15/06/23").as_deref(), Some("2023-06-15"));
        assert_eq!(canonical_date("15/06/99").as_deref(), Some("1999-06-15"));
        assert_eq!(canonical_date("15/06/50").as_deref(), Some("1950-06-15"));
        assert_eq!(canonical_date("15/06/49").as_deref(), Some("2049-06-15"));
    }

    #[test]
    fn calendar_correctness_is_enforced() {
        assert_eq!(canonical_date("2023-13-40"), None);
        assert_eq!(canonical_date("31/04/2023"), None); // April has 30 days
        assert_eq!(canonical_date("29/02/2023"), None); // not a leap year
        assert_eq!(canonical_date("29/02/2024").as_deref(), Some("2024-02-29"));
        assert_eq!(canonical_date("29/02/1900"), None); // century, not ÷400
        assert_eq!(canonical_date("29/02/2000").as_deref(), Some("2000-02-29"));
    }

    #[test]
    fn garbage_dates_are_rejected() {
        assert_eq!(canonical_date(""), None);
        assert_eq!(canonical_date("June 15, 2023"), None);
        assert_eq!(canonical_date("15/06"), None);
        assert_eq!(canonical_date("15/06/2023/01"), None);
    }
}
