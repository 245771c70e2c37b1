//! Email address type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    /// The input is empty or only whitespace.
    #[error("email cannot be empty")]
    Empty,
    /// The input does not look like `text@text.text`.
    #[error("email must look like name@domain.tld")]
    Malformed,
}

/// An email address.
///
/// Validation is deliberately loose: the address must contain somewhere a
/// non-blank run, an `@`, and a non-blank run with a dot that has text on
/// both sides. The server performs the authoritative check.
///
/// ## Examples
///
/// ```
/// use lavender_core::Email;
///
/// assert!(Email::parse("user@example.com").is_ok());
/// assert!(Email::parse("user.name+tag@domain.co.uk").is_ok());
///
/// assert!(Email::parse("").is_err());             // empty
/// assert!(Email::parse("no-at-symbol").is_err());  // missing @
/// assert!(Email::parse("user@localhost").is_err()); // no dot in domain
/// assert!(Email::parse("user@domain.").is_err());   // nothing after the dot
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Parse an `Email` from a string.
    ///
    /// # Errors
    ///
    /// Returns [`EmailError::Empty`] for blank input and
    /// [`EmailError::Malformed`] when no `text@text.text` shape is present.
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        if s.trim().is_empty() {
            return Err(EmailError::Empty);
        }

        if has_address_shape(s) {
            Ok(Self(s.to_owned()))
        } else {
            Err(EmailError::Malformed)
        }
    }

    /// Returns the email address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Email` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Unanchored match of `\S+@\S+\.\S+`.
fn has_address_shape(s: &str) -> bool {
    s.char_indices().filter(|&(_, c)| c == '@').any(|(at, _)| {
        let (head, rest) = s.split_at(at);
        let before_ok = head.chars().next_back().is_some_and(|c| !c.is_whitespace());
        let tail = rest
            .strip_prefix('@')
            .unwrap_or(rest)
            .split(char::is_whitespace)
            .next()
            .unwrap_or_default();
        let dot_ok = tail
            .char_indices()
            .any(|(i, c)| c == '.' && i > 0 && i + 1 < tail.len());
        before_ok && dot_ok
    })
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
