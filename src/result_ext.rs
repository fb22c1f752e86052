//! Extension methods that wrap the error half of a [`Result`].
//!
//! These carry the nil-propagation rule of [`wrap`](crate::wrap) and
//! [`structure`](crate::structure) over to `Result`: an `Ok` value passes
//! through untouched, so the call can be made unconditionally after any
//! fallible operation.
//!
//! ```
//! use erreur::{PlainError, ResultExt, Structured, fields};
//!
//! fn open(path: &str) -> Result<(), PlainError> {
//!     Err(PlainError::from_static("insufficient permissions"))
//! }
//!
//! fn flush(path: &'static str) -> Result<(), Structured> {
//!     open(path).wrap_err("writing to file failed", fields!["fileName" => path])?;
//!     Ok(())
//! }
//!
//! let err = flush("someFile").unwrap_err();
//! assert_eq!(err.to_string(), "writing to file failed: insufficient permissions");
//! ```

use core::error::Error;

use crate::{field::ContextField, plain::PlainError, structured::Structured};

mod sealed {
    pub trait Sealed {}
    impl<A, E> Sealed for Result<A, E> {}
}

/// Extension trait for `Result<V, E>` where `E` is an error.
pub trait ResultExt<V, E>: sealed::Sealed {
    /// Wraps the error with a message and context fields.
    fn wrap_err<M, I>(self, message: M, fields: I) -> Result<V, Structured>
    where
        M: Into<PlainError>,
        I: IntoIterator<Item = ContextField>;

    /// Like [`wrap_err`](Self::wrap_err), computing the message and fields
    /// only when there is an error.
    fn wrap_err_with<M, I, F>(self, f: F) -> Result<V, Structured>
    where
        M: Into<PlainError>,
        I: IntoIterator<Item = ContextField>,
        F: FnOnce() -> (M, I);

    /// Annotates the error with context fields, keeping its message.
    fn structure_err<I>(self, fields: I) -> Result<V, Structured>
    where
        I: IntoIterator<Item = ContextField>;
}

impl<V, E> ResultExt<V, E> for Result<V, E>
where
    E: Error + Send + Sync + 'static,
{
    #[inline]
    fn wrap_err<M, I>(self, message: M, fields: I) -> Result<V, Structured>
    where
        M: Into<PlainError>,
        I: IntoIterator<Item = ContextField>,
    {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(Structured::wrap(e, message, fields)),
        }
    }

    #[inline]
    fn wrap_err_with<M, I, F>(self, f: F) -> Result<V, Structured>
    where
        M: Into<PlainError>,
        I: IntoIterator<Item = ContextField>,
        F: FnOnce() -> (M, I),
    {
        match self {
            Ok(v) => Ok(v),
            Err(e) => {
                let (message, fields) = f();
                Err(Structured::wrap(e, message, fields))
            }
        }
    }

    #[inline]
    fn structure_err<I>(self, fields: I) -> Result<V, Structured>
    where
        I: IntoIterator<Item = ContextField>,
    {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(Structured::structure(e, fields)),
        }
    }
}
