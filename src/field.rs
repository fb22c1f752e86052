//! Typed key/value context fields.
//!
//! A [`ContextField`] pairs a key with a [`FieldValue`]. Fields are attached
//! to a single [`Structured`] node and always render in the order they were
//! given.
//!
//! ```
//! use erreur::{ContextField, Structured};
//!
//! let err = Structured::new(
//!     "connection error",
//!     [
//!         ContextField::int("code", 1234),
//!         ContextField::string("addr", "example.com"),
//!     ],
//! );
//! assert_eq!(err.json(), r#"{"msg":"connection error","code":1234,"addr":"example.com"}"#);
//! ```
//!
//! The [`fields!`](crate::fields!) macro builds the same list using the
//! [`From`] conversions into [`FieldValue`]:
//!
//! ```
//! use erreur::{Structured, fields};
//!
//! let err = Structured::new("connection error", fields!["code" => 1234, "addr" => "example.com"]);
//! assert_eq!(err.own_fields().len(), 2);
//! ```

use alloc::{borrow::Cow, string::String};
use core::error::Error;

use crate::{encoder::ObjectEncoder, structured::Structured};

/// The value half of a [`ContextField`].
#[derive(Clone, Debug)]
pub enum FieldValue {
    /// Writes nothing. Used for "no error" log fields.
    Skip,
    /// A string value.
    String(Cow<'static, str>),
    /// A signed integer.
    Int(i64),
    /// An unsigned integer.
    Uint(u64),
    /// A floating point number. Non-finite values serialize as `null` in
    /// JSON.
    Float(f64),
    /// A boolean.
    Bool(bool),
    /// A nested structured error, written as a JSON object.
    Object(Structured),
}

/// A named, typed value attached to one error node.
#[derive(Clone, Debug)]
pub struct ContextField {
    key: Cow<'static, str>,
    value: FieldValue,
}

impl ContextField {
    /// Creates a field from any value convertible into a [`FieldValue`].
    pub fn new(key: impl Into<Cow<'static, str>>, value: impl Into<FieldValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Creates a string field.
    pub fn string(key: impl Into<Cow<'static, str>>, value: impl Into<Cow<'static, str>>) -> Self {
        Self::new(key, FieldValue::String(value.into()))
    }

    /// Creates a signed integer field.
    pub fn int(key: impl Into<Cow<'static, str>>, value: i64) -> Self {
        Self::new(key, FieldValue::Int(value))
    }

    /// Creates an unsigned integer field.
    pub fn uint(key: impl Into<Cow<'static, str>>, value: u64) -> Self {
        Self::new(key, FieldValue::Uint(value))
    }

    /// Creates a floating point field.
    pub fn float(key: impl Into<Cow<'static, str>>, value: f64) -> Self {
        Self::new(key, FieldValue::Float(value))
    }

    /// Creates a boolean field.
    pub fn bool(key: impl Into<Cow<'static, str>>, value: bool) -> Self {
        Self::new(key, FieldValue::Bool(value))
    }

    /// Creates a field that nests a structured error as an object.
    pub fn object(key: impl Into<Cow<'static, str>>, value: Structured) -> Self {
        Self::new(key, FieldValue::Object(value))
    }

    /// Creates a string field holding the display text of `error`.
    pub fn error(key: impl Into<Cow<'static, str>>, error: &(dyn Error + 'static)) -> Self {
        Self::new(key, FieldValue::String(Cow::Owned(alloc::format!("{error}"))))
    }

    /// Creates a field that contributes nothing when encoded.
    #[must_use]
    pub fn skip() -> Self {
        Self {
            key: Cow::Borrowed(""),
            value: FieldValue::Skip,
        }
    }

    /// The field key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The field value.
    #[must_use]
    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    /// Returns `true` if this field writes nothing when encoded.
    #[must_use]
    pub fn is_skip(&self) -> bool {
        matches!(self.value, FieldValue::Skip)
    }

    /// Writes this field into `encoder` according to its value kind.
    pub fn add_to(&self, encoder: &mut dyn ObjectEncoder) {
        let key = &*self.key;
        match &self.value {
            FieldValue::Skip => {}
            FieldValue::String(value) => encoder.add_str(key, value),
            FieldValue::Int(value) => encoder.add_i64(key, *value),
            FieldValue::Uint(value) => encoder.add_u64(key, *value),
            FieldValue::Float(value) => encoder.add_f64(key, *value),
            FieldValue::Bool(value) => encoder.add_bool(key, *value),
            FieldValue::Object(value) => encoder.add_object(key, value),
        }
    }
}

impl From<&'static str> for FieldValue {
    fn from(value: &'static str) -> Self {
        Self::String(Cow::Borrowed(value))
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::String(Cow::Owned(value))
    }
}

impl From<Cow<'static, str>> for FieldValue {
    fn from(value: Cow<'static, str>) -> Self {
        Self::String(value)
    }
}

macro_rules! impl_from_widening {
    ($variant:ident as $target:ty: $($source:ty),*) => {
        $(
            impl From<$source> for FieldValue {
                fn from(value: $source) -> Self {
                    Self::$variant(<$target>::from(value))
                }
            }
        )*
    };
}

impl_from_widening!(Int as i64: i8, i16, i32, i64);
impl_from_widening!(Uint as u64: u8, u16, u32, u64);
impl_from_widening!(Float as f64: f32, f64);

impl From<isize> for FieldValue {
    fn from(value: isize) -> Self {
        Self::Int(value as i64)
    }
}

impl From<usize> for FieldValue {
    fn from(value: usize) -> Self {
        Self::Uint(value as u64)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Structured> for FieldValue {
    fn from(value: Structured) -> Self {
        Self::Object(value)
    }
}
