// ✉️ Email Validator - narrow, regex-free format heuristic
// Not RFC 5322: the local part may only be 1-2 characters long

use serde::Serialize;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailError {
    #[error("Email address is required.")]
    Required,

    #[error("Invalid email format: missing or misplaced \"@\" symbol.")]
    MisplacedAt,

    #[error("Invalid email format")]
    LocalPartTooLong,

    #[error("Invalid email format: missing or misplaced \".\" symbol.")]
    MisplacedDot,

    #[error("Invalid email format: no spaces allowed.")]
    ContainsSpace,
}

/// Validate an address; `None` means valid.
///
/// Rules run in order and the first failure wins. Positions are counted in
/// characters, not bytes.
pub fn validate_email(email: &str) -> Option<EmailError> {
    if email.is_empty() {
        return Some(EmailError::Required);
    }

    let chars: Vec<char> = email.chars().collect();

    let at = match chars.iter().position(|&c| c == '@') {
        None | Some(0) => return Some(EmailError::MisplacedAt),
        Some(at) if at > 2 => return Some(EmailError::LocalPartTooLong),
        Some(at) => at,
    };

    match chars.iter().rposition(|&c| c == '.') {
        Some(dot) if dot >= at + 2 && dot != chars.len() - 1 => {}
        _ => return Some(EmailError::MisplacedDot),
    }

    if chars.contains(&' ') {
        return Some(EmailError::ContainsSpace);
    }

    None
}

// ============================================================================
// FORM STATE
// ============================================================================

/// EmailForm - Input field plus the error currently on screen
///
/// Typing only re-validates once an error has been shown, so the user is not
/// nagged before the first submit.
#[derive(Debug, Clone, Default)]
pub struct EmailForm {
    pub value: String,
    pub error: Option<EmailError>,
    pub submitted: Option<String>,
}

impl EmailForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&mut self, value: impl Into<String>) {
        self.value = value.into();
        if self.error.is_some() {
            self.error = validate_email(&self.value);
        }
    }

    pub fn push(&mut self, c: char) {
        let mut value = self.value.clone();
        value.push(c);
        self.input(value);
    }

    pub fn pop(&mut self) {
        let mut value = self.value.clone();
        value.pop();
        self.input(value);
    }

    /// Validate and, when valid, record the submission
    pub fn submit(&mut self) -> Option<&str> {
        self.error = validate_email(&self.value);
        if self.error.is_some() {
            return None;
        }

        info!(email = %self.value, "form submitted");
        self.submitted = Some(self.value.clone());
        self.submitted.as_deref()
    }
}
