use crate::api::{LoginRequest, ProfileRequest, SignupRequest};
use thiserror::Error;

const NAME_MIN: usize = 2;
const NAME_MAX: usize = 20;
const PASSWORD_MIN: usize = 2;
const PASSWORD_MAX: usize = 25;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("{field} must be between {min} and {max} characters")]
    Length {
        field: &'static str,
        min: usize,
        max: usize,
    },

    #[error("Email is invalid")]
    InvalidEmail,
}

/// All field failures of one request body, reported together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub failures: Vec<FieldError>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<String> = self.failures.iter().map(|e| e.to_string()).collect();
        write!(f, "{}", messages.join(", "))
    }
}

impl std::error::Error for ValidationError {}

pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

impl Validate for SignupRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut failures = Vec::new();
        check_length(&mut failures, "Name", &self.name, NAME_MIN, NAME_MAX);
        check_email(&mut failures, &self.email);
        check_length(&mut failures, "Password", &self.password, PASSWORD_MIN, PASSWORD_MAX);
        finish(failures)
    }
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut failures = Vec::new();
        check_email(&mut failures, &self.email);
        check_length(&mut failures, "Password", &self.password, PASSWORD_MIN, PASSWORD_MAX);
        finish(failures)
    }
}

impl Validate for ProfileRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        // Role is checked by deserialization
        let mut failures = Vec::new();
        check_length(&mut failures, "Name", &self.name, NAME_MIN, NAME_MAX);
        check_email(&mut failures, &self.email);
        finish(failures)
    }
}

fn finish(failures: Vec<FieldError>) -> Result<(), ValidationError> {
    if failures.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { failures })
    }
}

fn check_length(
    failures: &mut Vec<FieldError>,
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) {
    let len = value.chars().count();
    if len < min || len > max {
        failures.push(FieldError::Length { field, min, max });
    }
}

fn check_email(failures: &mut Vec<FieldError>, email: &str) {
    if !is_valid_email(email) {
        failures.push(FieldError::InvalidEmail);
    }
}

/// `local@domain.tld` with no whitespace and a single `@`.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2
        && labels.iter().all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_alphanumeric() || c == '-')
        })
}
