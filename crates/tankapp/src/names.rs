//! Fish name validation.
//!
//! A fish name doubles as the name of its directory under the storage root,
//! so it must be a safe path segment. Rather than escaping dangerous
//! characters, names are checked against an allow-list:
//!
//! - ASCII letters, digits, underscores (`_`) and hyphens (`-`)
//! - 1 to 128 bytes long, after trimming surrounding whitespace
//!
//! Anything else is rejected. `.`, `/`, `\` and spaces never reach the
//! filesystem.

use std::fmt;

use crate::error::TankError;

pub const MAX_NAME_LEN: usize = 128;

/// Validates `name` and returns the trimmed form used as the storage key.
///
/// # Examples
/// ```
/// use tankapp::names::sanitize_name;
///
/// assert_eq!(sanitize_name(" Nemo ").unwrap(), "Nemo");
/// assert!(sanitize_name("blue_tang-2").is_ok());
///
/// assert!(sanitize_name("").is_err());
/// assert!(sanitize_name("..").is_err());
/// assert!(sanitize_name("a/b").is_err());
/// ```
pub fn sanitize_name(name: &str) -> Result<String, TankError> {
    let trimmed = name.trim();
    validate_fish_name(trimmed)
        .map_err(|e| TankError::Validation(format!("Invalid fish name {:?}: {}", name, e)))?;
    Ok(trimmed.to_string())
}

pub fn validate_fish_name(name: &str) -> Result<(), NameError> {
    if name.is_empty() {
        return Err(NameError::Empty);
    }
    if name.len() > MAX_NAME_LEN {
        return Err(NameError::TooLong(name.len()));
    }
    match name.chars().find(|ch| !is_valid_name_char(*ch)) {
        Some(ch) => Err(NameError::InvalidCharacter(ch)),
        None => Ok(()),
    }
}

/// True when `name` could have been produced by [`sanitize_name`].
pub fn is_storage_key(name: &str) -> bool {
    validate_fish_name(name).is_ok()
}

fn is_valid_name_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '-'
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    Empty,
    TooLong(usize),
    InvalidCharacter(char),
}

impl fmt::Display for NameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameError::Empty => write!(f, "name cannot be empty"),
            NameError::TooLong(len) => {
                write!(f, "name is {} bytes long (max {})", len, MAX_NAME_LEN)
            }
            NameError::InvalidCharacter(ch) => write!(
                f,
                "name contains invalid character '{}' (only letters, digits, underscore and hyphen allowed)",
                ch
            ),
        }
    }
}

impl std::error::Error for NameError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_allow_listed_names() {
        for name in ["Nemo", "nemo", "Blue_Tang", "clown-fish", "42", "_", "-"] {
            assert!(validate_fish_name(name).is_ok(), "{}", name);
        }
    }

    #[test]
    fn rejects_path_traversal() {
        assert_eq!(validate_fish_name("."), Err(NameError::InvalidCharacter('.')));
        assert_eq!(validate_fish_name(".."), Err(NameError::InvalidCharacter('.')));
        assert_eq!(
            validate_fish_name("../etc"),
            Err(NameError::InvalidCharacter('.'))
        );
        assert_eq!(validate_fish_name("a/b"), Err(NameError::InvalidCharacter('/')));
        assert_eq!(validate_fish_name("a\\b"), Err(NameError::InvalidCharacter('\\')));
    }

    #[test]
    fn rejects_spaces_and_non_ascii() {
        assert_eq!(
            validate_fish_name("big fish"),
            Err(NameError::InvalidCharacter(' '))
        );
        assert_eq!(validate_fish_name("poisson-é"), Err(NameError::InvalidCharacter('é')));
        assert_eq!(validate_fish_name("nul\0"), Err(NameError::InvalidCharacter('\0')));
    }

    #[test]
    fn length_limits() {
        assert_eq!(validate_fish_name(""), Err(NameError::Empty));
        let longest = "a".repeat(MAX_NAME_LEN);
        assert!(validate_fish_name(&longest).is_ok());
        let too_long = "a".repeat(MAX_NAME_LEN + 1);
        assert_eq!(
            validate_fish_name(&too_long),
            Err(NameError::TooLong(MAX_NAME_LEN + 1))
        );
    }

    #[test]
    fn sanitize_trims_and_reports_validation_errors() {
        assert_eq!(sanitize_name("\tDory\n").unwrap(), "Dory");
        let err = sanitize_name("   ").unwrap_err();
        assert!(matches!(err, TankError::Validation(ref msg) if msg.contains("empty")));
        let err = sanitize_name("x.y").unwrap_err();
        assert!(err.to_string().contains("'.'"));
    }
}
