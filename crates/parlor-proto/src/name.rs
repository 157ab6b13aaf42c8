//! Username rules shared by the relay and the client.
//!
//! A username is 1 to [`MAX_NAME_LEN`] characters and may not contain
//! whitespace, the wire field separator `:`, the list delimiter `|`, or the
//! credential separator character `-`.
//!
//! # Casing
//!
//! Names keep the spelling the user typed, but every comparison goes through
//! [`fold_name`]. "Alice" and "alice" are the same registry key, and the
//! reserved [`ADMIN_NAME`] is matched the same way.

use thiserror::Error;

/// Maximum username length in characters.
pub const MAX_NAME_LEN: usize = 10;

/// The reserved administrator identity.
pub const ADMIN_NAME: &str = "admin";

/// Separates the name from the password in `adminLogin <name>--<password>`.
pub const CREDENTIAL_SEPARATOR: &str = "--";

/// Reasons a username is rejected before any registry lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    /// Empty or all-whitespace name.
    #[error("Username cannot be empty")]
    Empty,

    /// Longer than [`MAX_NAME_LEN`] characters.
    #[error("Username cannot be longer than {max} characters", max = MAX_NAME_LEN)]
    TooLong,

    /// Folds to the reserved admin name.
    #[error("Username '{0}' is reserved")]
    Reserved(String),

    /// Contains whitespace.
    #[error("Username cannot contain spaces")]
    Whitespace,

    /// Contains a character with protocol meaning.
    #[error("Username cannot contain '{0}'")]
    ForbiddenChar(char),
}

/// Fold a name to its registry key.
#[inline]
pub fn fold_name(name: &str) -> String {
    name.to_lowercase()
}

/// Whether `name` folds to the reserved admin identity.
#[inline]
pub fn is_reserved(name: &str) -> bool {
    fold_name(name) == ADMIN_NAME
}

/// Check the syntactic rules for a username.
///
/// Uniqueness is not checked here; that is the registry's job and must
/// happen under its own atomic insert.
///
/// # Examples
///
/// ```
/// use parlor_proto::{check_name, NameError};
///
/// assert!(check_name("alice").is_ok());
/// assert_eq!(check_name(""), Err(NameError::Empty));
/// assert_eq!(check_name("Admin"), Err(NameError::Reserved("Admin".into())));
/// assert_eq!(check_name("a-b"), Err(NameError::ForbiddenChar('-')));
/// ```
pub fn check_name(name: &str) -> Result<(), NameError> {
    if name.trim().is_empty() {
        return Err(NameError::Empty);
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(NameError::TooLong);
    }
    if is_reserved(name) {
        return Err(NameError::Reserved(name.to_string()));
    }
    if name.chars().any(char::is_whitespace) {
        return Err(NameError::Whitespace);
    }
    if let Some(c) = name.chars().find(|c| matches!(c, ':' | '|' | '-')) {
        return Err(NameError::ForbiddenChar(c));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_names() {
        assert!(check_name("alice").is_ok());
        assert!(check_name("Bob_2").is_ok());
        assert!(check_name("x").is_ok());
        assert!(check_name("0123456789").is_ok());
    }

    #[test]
    fn rejects_blank() {
        assert_eq!(check_name(""), Err(NameError::Empty));
        assert_eq!(check_name("   "), Err(NameError::Empty));
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        assert!(check_name("éééééééééé").is_ok());
        assert_eq!(check_name("01234567890"), Err(NameError::TooLong));
    }

    #[test]
    fn admin_is_reserved_in_any_case() {
        for n in ["admin", "ADMIN", "aDmIn"] {
            assert_eq!(check_name(n), Err(NameError::Reserved(n.to_string())));
        }
        assert!(check_name("admins").is_ok());
    }

    #[test]
    fn rejects_protocol_characters() {
        assert_eq!(check_name("a:b"), Err(NameError::ForbiddenChar(':')));
        assert_eq!(check_name("a|b"), Err(NameError::ForbiddenChar('|')));
        assert_eq!(check_name("al--ice"), Err(NameError::ForbiddenChar('-')));
        assert_eq!(check_name("al ice"), Err(NameError::Whitespace));
    }

    #[test]
    fn fold_is_case_insensitive() {
        assert_eq!(fold_name("Alice"), fold_name("aLICE"));
        assert_ne!(fold_name("alice"), fold_name("alicia"));
    }
}
