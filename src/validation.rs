//! Field-level validation rules shared by the entity write hooks and request handlers.
//!
//! Each rule returns a human-readable message on failure so it can be surfaced as a
//! user-correctable error.

use std::sync::LazyLock;

use chrono::Datelike;
use regex::Regex;

/// Phone numbers: optional `+`, optional leading `1`, then 9 to 15 digits.
#[allow(clippy::expect_used)]
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?1?\d{9,15}$").expect("static regex is valid"));

/// Earliest accepted model year.
pub const MIN_CAR_YEAR: i32 = 1900;

/// Validate an email address (non-empty local part, domain containing a dot).
///
/// # Errors
///
/// Returns a descriptive error message if the email is invalid.
pub fn email(value: &str) -> Result<(), String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("Email is required.".to_string());
    }
    if trimmed.len() > 254 {
        return Err("Email must be at most 254 characters.".to_string());
    }
    let parts: Vec<&str> = trimmed.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() || !parts[1].contains('.') {
        return Err("Enter a valid email address.".to_string());
    }
    Ok(())
}

/// Validate a username: 3-150 characters of letters, digits and `@ . + - _`.
///
/// # Errors
///
/// Returns a descriptive error message if validation fails.
pub fn username(value: &str) -> Result<(), String> {
    let length = value.chars().count();
    if length < 3 {
        return Err("Username must be at least 3 characters.".to_string());
    }
    if length > 150 {
        return Err("Username must be at most 150 characters.".to_string());
    }
    if !value
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        return Err(
            "Username may only contain letters, numbers, and @/./+/-/_ characters.".to_string(),
        );
    }
    Ok(())
}

/// Validate a phone number against `^\+?1?\d{9,15}$`.
///
/// # Errors
///
/// Returns the format hint if the number does not match.
pub fn phone(value: &str) -> Result<(), String> {
    if PHONE_RE.is_match(value) {
        Ok(())
    } else {
        Err(
            "Phone number must be entered in the format: '+999999999'. Up to 15 digits allowed."
                .to_string(),
        )
    }
}

/// Validate a model year: between 1900 and next calendar year inclusive.
///
/// # Errors
///
/// Returns a descriptive error message when out of range.
pub fn car_year(year: i32) -> Result<(), String> {
    let max = chrono::Utc::now().year() + 1;
    if (MIN_CAR_YEAR..=max).contains(&year) {
        Ok(())
    } else {
        Err(format!("Year must be between {MIN_CAR_YEAR} and {max}."))
    }
}

/// Validate that a counter-like value is not negative.
///
/// # Errors
///
/// Returns `"{field} must be non-negative."`.
pub fn non_negative<T>(field: &str, value: T) -> Result<(), String>
where
    T: PartialOrd + Default,
{
    if value < T::default() {
        return Err(format!("{field} must be non-negative."));
    }
    Ok(())
}

/// Validate a seller rating in `[0, 5]`.
///
/// # Errors
///
/// Returns a descriptive error message when out of range or not a number.
pub fn rating(value: f64) -> Result<(), String> {
    if (0.0..=5.0).contains(&value) {
        Ok(())
    } else {
        Err("Rating must be between 0 and 5.".to_string())
    }
}

/// Validate an IP address literal (IPv4 or IPv6).
///
/// # Errors
///
/// Returns a descriptive error message if the value does not parse.
pub fn ip_address(value: &str) -> Result<(), String> {
    value
        .parse::<std::net::IpAddr>()
        .map(|_| ())
        .map_err(|_| "Enter a valid IPv4 or IPv6 address.".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_pattern() {
        assert!(phone("+1234567890").is_ok());
        assert!(phone("123456789").is_ok());
        assert!(phone("+123456789012345").is_ok());
        assert!(phone("12345678").is_err());
        assert!(phone("+12-345-678-90").is_err());
        assert!(phone("").is_err());
    }

    #[test]
    fn test_email() {
        assert!(email("admin@carzone.com").is_ok());
        assert!(email("no-at-sign").is_err());
        assert!(email("user@localhost").is_err());
        assert!(email("   ").is_err());
    }

    #[test]
    fn test_username() {
        assert!(username("john_buyer").is_ok());
        assert!(username("a.b+c@d-e").is_ok());
        assert!(username("ab").is_err());
        assert!(username("has space").is_err());
    }

    #[test]
    fn test_username_length_counts_characters() {
        assert!(username("Łój").is_ok());
        assert!(username(&"é".repeat(150)).is_ok());
        assert!(username(&"é".repeat(151)).is_err());
    }

    #[test]
    fn test_car_year_bounds() {
        let next = chrono::Utc::now().year() + 1;
        assert!(car_year(1900).is_ok());
        assert!(car_year(next).is_ok());
        assert!(car_year(1899).is_err());
        assert!(car_year(next + 1).is_err());
    }

    #[test]
    fn test_non_negative() {
        assert!(non_negative("mileage", 0).is_ok());
        assert!(non_negative("mileage", -1).is_err());
        assert!(non_negative("views", 10_i64).is_ok());
    }

    #[test]
    fn test_rating() {
        assert!(rating(4.8).is_ok());
        assert!(rating(0.0).is_ok());
        assert!(rating(5.1).is_err());
        assert!(rating(f64::NAN).is_err());
    }

    #[test]
    fn test_ip_address() {
        assert!(ip_address("192.168.1.100").is_ok());
        assert!(ip_address("::1").is_ok());
        assert!(ip_address("300.1.1.1").is_err());
    }
}
