//! Field checks shared by the club, court and booking inputs.

use crate::errors::AppError;

pub fn require_len(value: &str, max: usize, required: &str, too_long: &str) -> Result<(), AppError> {
    if value.is_empty() {
        return Err(AppError::validation(required));
    }
    if value.chars().count() > max {
        return Err(AppError::validation(too_long));
    }
    Ok(())
}

/// Empty strings count as "not provided".
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

pub fn is_email(s: &str) -> bool {
    match s.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && !s.chars().any(char::is_whitespace)
                && domain
                    .split_once('.')
                    .map(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
                    .unwrap_or(false)
        }
        None => false,
    }
}

pub fn optional_email(value: Option<String>) -> Result<Option<String>, AppError> {
    match non_empty(value) {
        Some(email) if !is_email(&email) => Err(AppError::validation("Invalid email address")),
        other => Ok(other),
    }
}

pub fn non_negative(value: f64, message: &str) -> Result<(), AppError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(AppError::validation(message))
    }
}
