//! Input validation utilities
//!
//! Form checks run before any request is sent; a failure is a
//! `ClientError::Validation` carrying the message shown to the user.

use common::error::{ClientError, ClientResult};
use regex::Regex;
use std::sync::OnceLock;

/// Minimum password length accepted at registration
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Validate that a required form field is filled in
pub fn validate_required(label: &str, value: &str) -> ClientResult<()> {
    if value.trim().is_empty() {
        return Err(ClientError::Validation(format!("{} is required", label)));
    }

    Ok(())
}

/// Validate email
pub fn validate_email(email: &str) -> ClientResult<()> {
    if email.is_empty() {
        return Err(ClientError::Validation("Email is required".to_string()));
    }

    if email.len() > 254 {
        return Err(ClientError::Validation(
            "Email must be at most 254 characters long".to_string(),
        ));
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err(ClientError::Validation("Invalid email format".to_string()));
    }

    Ok(())
}

/// Password composition rules, evaluated one by one for the register form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordChecklist {
    pub uppercase: bool,
    pub lowercase: bool,
    pub length: bool,
}

impl PasswordChecklist {
    pub fn check(password: &str) -> Self {
        Self {
            uppercase: password.chars().any(|c| c.is_ascii_uppercase()),
            lowercase: password.chars().any(|c| c.is_ascii_lowercase()),
            length: password.chars().count() >= MIN_PASSWORD_LENGTH,
        }
    }

    pub fn is_satisfied(&self) -> bool {
        self.uppercase && self.lowercase && self.length
    }

    /// Messages for every rule the password breaks
    pub fn failures(&self) -> Vec<&'static str> {
        let mut failures = Vec::new();
        if !self.uppercase {
            failures.push("Password must contain at least one uppercase letter");
        }
        if !self.lowercase {
            failures.push("Password must contain at least one lowercase letter");
        }
        if !self.length {
            failures.push("Password must be at least 6 characters long");
        }
        failures
    }
}

/// Validate an optional http(s) URL, such as a profile photo
pub fn validate_optional_url(label: &str, value: Option<&str>) -> ClientResult<()> {
    match value.map(str::trim) {
        None | Some("") => Ok(()),
        Some(url) if url.starts_with("http://") || url.starts_with("https://") => Ok(()),
        Some(_) => Err(ClientError::Validation(format!(
            "{} must be an http(s) URL",
            label
        ))),
    }
}

/// Validate a digits-only field and parse it as a non-negative integer
pub fn validate_non_negative_integer(label: &str, value: &str) -> ClientResult<u32> {
    let value = value.trim();
    validate_required(label, value)?;

    static DIGITS_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = DIGITS_REGEX
        .get_or_init(|| Regex::new(r"^[0-9]+$").expect("Failed to compile digits regex"));

    if !regex.is_match(value) {
        return Err(ClientError::Validation(format!(
            "{} must be a whole number",
            label
        )));
    }

    value
        .parse()
        .map_err(|_| ClientError::Validation(format!("{} is too large", label)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_checklist_reports_each_rule() {
        let checklist = PasswordChecklist::check("abc");
        assert!(!checklist.is_satisfied());
        assert_eq!(checklist.failures().len(), 2);

        assert!(PasswordChecklist::check("Abcdef").is_satisfied());
        assert_eq!(
            PasswordChecklist::check("abcdef").failures(),
            vec!["Password must contain at least one uppercase letter"]
        );
        assert!(!PasswordChecklist::check("ABCDEF").is_satisfied());
        assert!(!PasswordChecklist::check("Abcde").is_satisfied());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("amy@example.com").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("amy@").is_err());
        assert!(validate_email("not an email").is_err());
    }

    #[test]
    fn test_validate_non_negative_integer() {
        assert_eq!(validate_non_negative_integer("Fee", "160").unwrap(), 160);
        assert_eq!(validate_non_negative_integer("Fee", " 0 ").unwrap(), 0);
        assert!(validate_non_negative_integer("Fee", "").is_err());
        assert!(validate_non_negative_integer("Fee", "-5").is_err());
        assert!(validate_non_negative_integer("Fee", "12.5").is_err());
        assert!(validate_non_negative_integer("Age restriction", "99999999999").is_err());
    }

    #[test]
    fn test_non_ascii_digits_are_not_whole_numbers() {
        assert!(matches!(
            validate_non_negative_integer("Fee", "\u{661}\u{662}\u{663}"),
            Err(ClientError::Validation(msg)) if msg == "Fee must be a whole number"
        ));
    }

    #[test]
    fn test_validate_optional_url() {
        assert!(validate_optional_url("Photo URL", None).is_ok());
        assert!(validate_optional_url("Photo URL", Some("")).is_ok());
        assert!(validate_optional_url("Photo URL", Some("https://i.ibb.co/x.png")).is_ok());
        assert!(validate_optional_url("Photo URL", Some("ftp://x")).is_err());
    }
}
