//! A lightweight string-only error.

use alloc::{borrow::Cow, string::String};
use core::fmt;

/// A string-based error with no fields and no cause.
///
/// `PlainError` is the terminal node of a cause chain, and the message type
/// stored inside every [`Structured`](crate::Structured) that has one of its
/// own. It can be built in `const` context, which makes it convenient for
/// error constants:
///
/// ```
/// use erreur::PlainError;
///
/// const PERMISSION_DENIED: PlainError = PlainError::from_static("insufficient permissions");
///
/// assert_eq!(PERMISSION_DENIED.to_string(), "insufficient permissions");
/// ```
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlainError(Cow<'static, str>);

impl PlainError {
    /// Creates a new `PlainError` from anything convertible into a string.
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        Self(message.into())
    }

    /// Creates a `PlainError` from a static string without allocating.
    #[must_use]
    pub const fn from_static(message: &'static str) -> Self {
        Self(Cow::Borrowed(message))
    }

    /// Returns the message text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for PlainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PlainError").field(&self.0).finish()
    }
}

impl core::error::Error for PlainError {}

impl From<&'static str> for PlainError {
    fn from(message: &'static str) -> Self {
        Self::from_static(message)
    }
}

impl From<String> for PlainError {
    fn from(message: String) -> Self {
        Self(Cow::Owned(message))
    }
}

impl From<Cow<'static, str>> for PlainError {
    fn from(message: Cow<'static, str>) -> Self {
        Self(message)
    }
}

impl AsRef<str> for PlainError {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
