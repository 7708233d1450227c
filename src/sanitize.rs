use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

/// Trim surrounding whitespace and truncate to `max_length` characters.
/// Empty or whitespace-only input yields an empty string; never fails.
pub fn sanitize_string(text: &str, max_length: usize) -> String {
    let trimmed = text.trim();
    match trimmed.char_indices().nth(max_length) {
        Some((idx, _)) => trimmed[..idx].to_string(),
        None => trimmed.to_string(),
    }
}

pub fn validate_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex =
            Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Coerce a JSON value (number or numeric string) to f64. Parse failures
/// and out-of-range values both yield `default` — callers that need to
/// distinguish "invalid" from "default" must pre-validate.
pub fn sanitize_numeric(
    value: &Value,
    min_val: Option<f64>,
    max_val: Option<f64>,
    default: f64,
) -> f64 {
    let num = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    let Some(num) = num else {
        return default;
    };
    if let Some(min) = min_val {
        if num < min {
            return default;
        }
    }
    if let Some(max) = max_val {
        if num > max {
            return default;
        }
    }
    num
}

/// Registration password rule: 8-128 characters with at least one ASCII
/// lowercase letter, one uppercase letter, and one digit.
pub fn is_strong_password(password: &str) -> bool {
    let len = password.chars().count();
    if !(8..=128).contains(&len) {
        return false;
    }
    password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
}

pub fn is_valid_phone(phone: &str) -> bool {
    lazy_static! {
        static ref PHONE_RE: Regex = Regex::new(r"^\+?[\d\s-]{10,20}$").unwrap();
    }
    PHONE_RE.is_match(phone)
}
