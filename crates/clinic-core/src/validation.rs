//! Field validation helpers.
//!
//! Checked at the boundary before any persistence attempt; a failed check
//! maps to a 400 response upstream.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;
use thiserror::Error;

/// A rejected input field, with a client-facing message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct ValidationError(pub String);

fn phone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^01[0-9]{9}$").expect("valid phone regex"))
}

fn national_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]{14}$").expect("valid national id regex"))
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"))
}

/// Parse an age from loosely-typed client input.
///
/// Accepts absent/null (unknown age), an integer, or a numeric string;
/// the value must fall in 0-120. Everything else is rejected.
pub fn parse_age(raw: Option<&Value>) -> Result<Option<i64>, ValidationError> {
    let value = match raw {
        None | Some(Value::Null) => return Ok(None),
        Some(v) => v,
    };

    let age = match value {
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| ValidationError("Invalid age value".into()))?,
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| ValidationError("Invalid age value".into()))?,
        _ => return Err(ValidationError("Invalid age value".into())),
    };

    if !(0..=120).contains(&age) {
        return Err(ValidationError("Invalid age value".into()));
    }
    Ok(Some(age))
}

/// Name must be 3-100 characters.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let len = name.chars().count();
    if len < 3 {
        return Err(ValidationError("Name must be at least 3 characters".into()));
    }
    if len > 100 {
        return Err(ValidationError("Name must be at most 100 characters".into()));
    }
    Ok(())
}

/// Egyptian mobile number: 01 followed by nine digits.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if phone_regex().is_match(phone) {
        Ok(())
    } else {
        Err(ValidationError(
            "Phone must be a valid Egyptian mobile number (01xxxxxxxxx)".into(),
        ))
    }
}

/// National ID must be exactly 14 digits.
pub fn validate_national_id(national_id: &str) -> Result<(), ValidationError> {
    if national_id_regex().is_match(national_id) {
        Ok(())
    } else {
        Err(ValidationError("National ID must be a 14-digit number".into()))
    }
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email_regex().is_match(email) {
        Ok(())
    } else {
        Err(ValidationError("Invalid email address".into()))
    }
}

/// Address is free text, capped at 200 characters.
pub fn validate_address(address: &str) -> Result<(), ValidationError> {
    if address.chars().count() > 200 {
        return Err(ValidationError("Address must be at most 200 characters".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_age_absent_and_null() {
        assert_eq!(parse_age(None).unwrap(), None);
        assert_eq!(parse_age(Some(&Value::Null)).unwrap(), None);
    }

    #[test]
    fn test_parse_age_number_and_string() {
        assert_eq!(parse_age(Some(&json!(42))).unwrap(), Some(42));
        assert_eq!(parse_age(Some(&json!("42"))).unwrap(), Some(42));
        assert_eq!(parse_age(Some(&json!(" 7 "))).unwrap(), Some(7));
    }

    #[test]
    fn test_parse_age_out_of_range() {
        assert!(parse_age(Some(&json!(121))).is_err());
        assert!(parse_age(Some(&json!(-1))).is_err());
        assert!(parse_age(Some(&json!("121"))).is_err());
    }

    #[test]
    fn test_parse_age_non_numeric() {
        assert!(parse_age(Some(&json!("forty"))).is_err());
        assert!(parse_age(Some(&json!(true))).is_err());
        assert!(parse_age(Some(&json!(30.5))).is_err());
    }

    #[test]
    fn test_phone_format() {
        assert!(validate_phone("01012345678").is_ok());
        assert!(validate_phone("01512345678").is_ok());
        assert!(validate_phone("0101234567").is_err()); // ten digits
        assert!(validate_phone("02012345678").is_err()); // landline prefix
        assert!(validate_phone("+201012345678").is_err());
    }

    #[test]
    fn test_national_id_format() {
        assert!(validate_national_id("12345678901234").is_ok());
        assert!(validate_national_id("1234567890123").is_err());
        assert!(validate_national_id("1234567890123a").is_err());
    }

    #[test]
    fn test_name_bounds() {
        assert!(validate_name("Ali").is_ok());
        assert!(validate_name("Al").is_err());
        assert!(validate_name(&"x".repeat(101)).is_err());
    }

    #[test]
    fn test_email() {
        assert!(validate_email("mona@example.com").is_ok());
        assert!(validate_email("not-an-email").is_err());
    }
}
