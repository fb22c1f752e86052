//! Commonly used items for convenient importing.
//!
//! ```rust
//! use erreur::prelude::*;
//!
//! fn divide(a: i64, b: i64) -> Result<i64, Structured> {
//!     if b == 0 {
//!         bail!("cannot divide by zero", "dividend" => a);
//!     }
//!     Ok(a / b)
//! }
//!
//! assert_eq!(divide(10, 2).unwrap(), 5);
//! assert_eq!(
//!     divide(1, 0).unwrap_err().json(),
//!     r#"{"msg":"cannot divide by zero","dividend":1}"#
//! );
//! ```

pub use crate::{
    ContextField, FieldValue, PlainError, ResultExt, Structured, bail, erreur, fields,
    find_structured, log_field,
};
