//! Cause-chain inspection.
//!
//! A cause chain is the sequence of errors reachable by calling
//! [`Error::source`] repeatedly. These helpers look for a [`Structured`]
//! anywhere in that sequence, which lets structured context survive being
//! wrapped by foreign error types.
//!
//! ```
//! use erreur::{Structured, find_structured};
//!
//! #[derive(Debug, thiserror::Error)]
//! #[error("request failed")]
//! struct RequestError(#[source] Structured);
//!
//! let err = RequestError(Structured::new("connection refused", []));
//! let found = find_structured(&err).unwrap();
//! assert_eq!(found.headline(), "connection refused");
//! ```
//!
//! A cyclic `source()` chain, which the constructors in this crate cannot
//! build, makes these helpers loop forever.

use core::{error::Error, iter::FusedIterator};

use crate::{encoder::EncoderConfig, field::ContextField, structured::Structured};

/// Iterator over an error and its successive sources.
///
/// Created by [`chain`].
#[derive(Clone, Debug)]
pub struct Chain<'a> {
    next: Option<&'a (dyn Error + 'static)>,
}

/// Returns an iterator over `error` followed by each of its sources.
///
/// ```
/// use erreur::{PlainError, Structured, chain};
///
/// let err = Structured::wrap(PlainError::from_static("inner"), "outer", []);
/// let messages: Vec<String> = chain(&err).map(|e| e.to_string()).collect();
/// assert_eq!(messages, ["outer: inner", "inner"]);
/// ```
pub fn chain<'a>(error: &'a (dyn Error + 'static)) -> Chain<'a> {
    Chain { next: Some(error) }
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a (dyn Error + 'static);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.source();
        Some(current)
    }
}

impl FusedIterator for Chain<'_> {}

/// Finds the first [`Structured`] in `error`'s cause chain, starting with
/// `error` itself.
pub fn find_structured<'a>(error: &'a (dyn Error + 'static)) -> Option<&'a Structured> {
    chain(error).find_map(|error| error.downcast_ref::<Structured>())
}

/// Returns `true` if `error` or any error in its cause chain is a
/// [`Structured`].
pub fn is_structured_chain(error: &(dyn Error + 'static)) -> bool {
    find_structured(error).is_some()
}

/// Returns a ready-to-log field for an optional error, keyed by the global
/// [`EncoderConfig::error_key`].
///
/// - `None` gives a [`skip`](ContextField::skip) field that writes nothing.
/// - If a [`Structured`] is found in the cause chain, the field nests it as
///   an object.
/// - Otherwise the field holds the error's display string.
///
/// ```
/// use erreur::{PlainError, Structured, log_field};
///
/// let err = Structured::new("connection error", erreur::fields!["code" => 1234]);
/// let field = log_field(Some(&err));
/// assert_eq!(field.key(), "error");
///
/// let field = log_field(Some(&PlainError::from_static("oops")));
/// assert_eq!(field.key(), "error");
///
/// assert!(log_field::<PlainError>(None).is_skip());
/// ```
pub fn log_field<E>(error: Option<&E>) -> ContextField
where
    E: Error + 'static,
{
    log_field_dyn(error.map(|error| error as &(dyn Error + 'static)))
}

/// Like [`log_field`], for an error trait object.
pub fn log_field_dyn(error: Option<&(dyn Error + 'static)>) -> ContextField {
    log_field_keyed(EncoderConfig::global().error_key, error)
}

/// Like [`log_field_dyn`], with an explicit key.
pub fn log_field_keyed(key: &'static str, error: Option<&(dyn Error + 'static)>) -> ContextField {
    let Some(error) = error else {
        return ContextField::skip();
    };

    match find_structured(error) {
        Some(structured) => ContextField::object(key, structured.clone()),
        None => ContextField::error(key, error),
    }
}
