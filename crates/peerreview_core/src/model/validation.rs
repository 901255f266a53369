//! Input validation shared by services and repositories.
//!
//! Validation runs before any storage access; a failing check never
//! touches the database.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

/// Rejected caller input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required text field is empty or whitespace only.
    EmptyField(&'static str),
    /// Required list is empty.
    EmptyList(&'static str),
    /// A list entry is empty or whitespace only.
    BlankEntry { field: &'static str, index: usize },
    /// Value does not look like an email address.
    InvalidEmail(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "{field} cannot be empty"),
            Self::EmptyList(field) => write!(f, "{field} must contain at least one entry"),
            Self::BlankEntry { field, index } => write!(f, "{field}[{index}] cannot be blank"),
            Self::InvalidEmail(value) => write!(f, "invalid email address `{value}`"),
        }
    }
}

impl Error for ValidationError {}

/// Trims `value` and rejects it when nothing is left.
pub fn require_text<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(trimmed)
}

/// Rejects an empty list or any blank entry; returns the trimmed entries.
pub fn require_entries<'a, S: AsRef<str>>(
    field: &'static str,
    items: &'a [S],
) -> Result<Vec<&'a str>, ValidationError> {
    if items.is_empty() {
        return Err(ValidationError::EmptyList(field));
    }
    items
        .iter()
        .enumerate()
        .map(|(index, item)| match item.as_ref().trim() {
            "" => Err(ValidationError::BlankEntry { field, index }),
            trimmed => Ok(trimmed),
        })
        .collect()
}

/// Trims and checks the overall `local@domain.tld` shape of an email.
pub fn require_email<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    let trimmed = require_text(field, value)?;
    if !EMAIL_RE.is_match(trimmed) {
        return Err(ValidationError::InvalidEmail(trimmed.to_string()));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::{require_email, require_entries, require_text, ValidationError};

    #[test]
    fn require_text_trims_and_rejects_blank() {
        assert_eq!(require_text("team", "  eng ").expect("trimmed"), "eng");
        assert_eq!(
            require_text("team", "   ").expect_err("blank must fail"),
            ValidationError::EmptyField("team")
        );
    }

    #[test]
    fn require_entries_rejects_empty_list() {
        let empty: [String; 0] = [];
        assert_eq!(
            require_entries("strengths", &empty).expect_err("empty must fail"),
            ValidationError::EmptyList("strengths")
        );
        assert_eq!(
            require_entries("strengths", &[" ok ", "fine"]).expect("non-empty list"),
            vec!["ok", "fine"]
        );
    }

    #[test]
    fn require_entries_rejects_blank_entry() {
        assert_eq!(
            require_entries("strengths", &["ok", "   ", ""]).expect_err("blank must fail"),
            ValidationError::BlankEntry {
                field: "strengths",
                index: 1
            }
        );
    }

    #[test]
    fn require_email_accepts_plain_addresses() {
        assert_eq!(require_email("email", "a@x.com").expect("valid"), "a@x.com");
        assert!(matches!(
            require_email("email", "not-an-email"),
            Err(ValidationError::InvalidEmail(_))
        ));
        assert!(matches!(
            require_email("email", ""),
            Err(ValidationError::EmptyField("email"))
        ));
    }
}
