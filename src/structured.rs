//! The structured error type.

use alloc::{
    borrow::Cow,
    boxed::Box,
    string::{String, ToString},
    vec::Vec,
};
use core::{error::Error, fmt};

use serde::ser::{Serialize, Serializer};
use triomphe::Arc;

use crate::{
    cause::Cause,
    chain::find_structured,
    encoder::{self, EncoderConfig, MarshalObject, ObjectEncoder, SerializeObject},
    field::ContextField,
    plain::PlainError,
};

/// An error carrying an optional message, an optional cause and an ordered
/// list of context fields.
///
/// `Structured` is a cheap handle around an immutable, reference-counted
/// node: cloning it never copies the fields and never aliases mutable state,
/// so the same value can be serialized from any number of threads at once.
///
/// # Creating structured errors
///
/// - [`Structured::new`] creates a fresh error with a message.
/// - [`Structured::wrap`] wraps an existing error with a new message.
/// - [`Structured::structure`] annotates an existing error with fields only.
///
/// The free functions [`wrap`](crate::wrap) and
/// [`structure`](crate::structure), and the [`ResultExt`](crate::ResultExt)
/// trait, accept an *optional* cause and pass "no error" straight through.
///
/// ```
/// use erreur::{PlainError, Structured, fields};
///
/// let io = PlainError::from_static("insufficient permissions");
/// let write = Structured::wrap(io, "writing to file failed", fields!["fileName" => "someFile"]);
/// let flush = Structured::wrap(write, "failed to flush db", fields!["fieldThatGoes" => "ping"]);
///
/// assert_eq!(
///     flush.to_string(),
///     "failed to flush db: writing to file failed: insufficient permissions"
/// );
/// assert_eq!(
///     flush.json(),
///     r#"{"msg":"failed to flush db","fieldThatGoes":"ping","cause":{"msg":"writing to file failed","fileName":"someFile"}}"#
/// );
/// ```
///
/// Displaying, serializing and dropping recurse once per level of the cause
/// chain, so chain depth is bounded by the stack.
#[derive(Clone)]
pub struct Structured {
    data: Arc<StructuredData>,
}

struct StructuredData {
    origin: Origin,
    fields: Vec<ContextField>,
}

/// Which of message and cause a node carries. At least one is always set.
enum Origin {
    /// Created by [`Structured::new`].
    Leaf(PlainError),
    /// Created by [`Structured::wrap`].
    Wrapped(PlainError, Cause),
    /// Created by [`Structured::structure`].
    Annotated(Cause),
}

impl Structured {
    fn from_parts(origin: Origin, fields: impl IntoIterator<Item = ContextField>) -> Self {
        Self {
            data: Arc::new(StructuredData {
                origin,
                fields: fields.into_iter().collect(),
            }),
        }
    }

    /// Creates a new structured error with the given message and fields and
    /// no cause.
    ///
    /// ```
    /// use erreur::{ContextField, Structured};
    ///
    /// let err = Structured::new("connection error", [ContextField::int("code", 1234)]);
    /// assert_eq!(err.to_string(), "connection error");
    /// assert!(err.cause().is_none());
    /// ```
    pub fn new(
        message: impl Into<PlainError>,
        fields: impl IntoIterator<Item = ContextField>,
    ) -> Self {
        Self::from_parts(Origin::Leaf(message.into()), fields)
    }

    /// Wraps `cause` with a new message and context fields.
    pub fn wrap<E>(
        cause: E,
        message: impl Into<PlainError>,
        fields: impl IntoIterator<Item = ContextField>,
    ) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self::from_parts(Origin::Wrapped(message.into(), Cause::new(cause)), fields)
    }

    /// Adds context fields to `cause` without a message of its own. The
    /// display string of the result is exactly that of `cause`.
    ///
    /// ```
    /// use erreur::{PlainError, Structured, fields};
    ///
    /// let err = Structured::structure(PlainError::from_static("timeout"), fields!["attempt" => 3]);
    /// assert_eq!(err.to_string(), "timeout");
    /// assert_eq!(err.json(), r#"{"msg":"timeout","attempt":3}"#);
    /// ```
    pub fn structure<E>(cause: E, fields: impl IntoIterator<Item = ContextField>) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self::from_parts(Origin::Annotated(Cause::new(cause)), fields)
    }

    /// Like [`Structured::wrap`], for a boxed error.
    pub fn wrap_boxed(
        cause: Box<dyn Error + Send + Sync + 'static>,
        message: impl Into<PlainError>,
        fields: impl IntoIterator<Item = ContextField>,
    ) -> Self {
        Self::from_parts(
            Origin::Wrapped(message.into(), Cause::from_boxed(cause)),
            fields,
        )
    }

    /// Like [`Structured::structure`], for a boxed error.
    pub fn structure_boxed(
        cause: Box<dyn Error + Send + Sync + 'static>,
        fields: impl IntoIterator<Item = ContextField>,
    ) -> Self {
        Self::from_parts(Origin::Annotated(Cause::from_boxed(cause)), fields)
    }

    /// The message this node was created with, if any.
    ///
    /// Returns `None` for errors created with [`Structured::structure`].
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match &self.data.origin {
            Origin::Leaf(message) | Origin::Wrapped(message, _) => Some(message.as_str()),
            Origin::Annotated(_) => None,
        }
    }

    /// The error this node wraps, if any.
    #[must_use]
    pub fn cause(&self) -> Option<&(dyn Error + 'static)> {
        match &self.data.origin {
            Origin::Leaf(_) => None,
            Origin::Wrapped(_, cause) | Origin::Annotated(cause) => Some(cause.as_error()),
        }
    }

    /// The fields attached to this node only, in insertion order.
    #[must_use]
    pub fn own_fields(&self) -> &[ContextField] {
        &self.data.fields
    }

    /// The single-node message used as `"msg"` when serializing.
    ///
    /// This is the own message if there is one, otherwise the display
    /// string of the immediate cause. Unlike [`Display`](fmt::Display), it
    /// never joins the messages of several nodes.
    ///
    /// ```
    /// use erreur::{PlainError, Structured};
    ///
    /// let inner = Structured::new("inner", []);
    /// let outer = Structured::wrap(inner, "outer", []);
    /// assert_eq!(outer.headline(), "outer");
    /// assert_eq!(outer.to_string(), "outer: inner");
    ///
    /// let annotated = Structured::structure(PlainError::from_static("leaf"), []);
    /// assert_eq!(annotated.headline(), "leaf");
    /// ```
    #[must_use]
    pub fn headline(&self) -> Cow<'_, str> {
        match &self.data.origin {
            Origin::Leaf(message) | Origin::Wrapped(message, _) => {
                Cow::Borrowed(message.as_str())
            }
            Origin::Annotated(cause) => Cow::Owned(cause.as_error().to_string()),
        }
    }

    /// Returns the fields to serialize for this node, using the global
    /// [`EncoderConfig`].
    ///
    /// This is [`own_fields`](Self::own_fields), followed by one object
    /// field under the cause key when a `Structured` can be found in the
    /// cause chain. Deeper levels stay nested inside that object; they are
    /// not merged into this list.
    ///
    /// ```
    /// use erreur::{FieldValue, Structured, fields};
    ///
    /// let inner = Structured::new("inner", fields!["code" => 1]);
    /// let outer = Structured::wrap(inner, "outer", fields!["code" => 2]);
    ///
    /// let fields = outer.fields();
    /// assert_eq!(fields.len(), 2);
    /// assert_eq!(fields[0].key(), "code");
    /// assert_eq!(fields[1].key(), "cause");
    /// assert!(matches!(fields[1].value(), FieldValue::Object(_)));
    /// ```
    #[must_use]
    pub fn fields(&self) -> Vec<ContextField> {
        self.fields_with(EncoderConfig::global())
    }

    /// Like [`fields`](Self::fields), with an explicit configuration.
    #[must_use]
    pub fn fields_with(&self, config: &EncoderConfig) -> Vec<ContextField> {
        let mut fields = Vec::with_capacity(self.data.fields.len() + 1);
        fields.extend(self.data.fields.iter().cloned());

        if let Some(nested) = self.cause().and_then(find_structured) {
            fields.push(ContextField::object(config.cause_key, nested.clone()));
        }

        fields
    }

    /// Serializes this error as a compact JSON object using the global
    /// [`EncoderConfig`].
    ///
    /// The object holds exactly the headline under `"msg"`, the fields
    /// in insertion order, and a nested `"cause"` object when a structured
    /// cause exists.
    #[must_use]
    pub fn json(&self) -> String {
        self.json_with(EncoderConfig::global())
    }

    /// Like [`json`](Self::json), with an explicit configuration.
    #[must_use]
    pub fn json_with(&self, config: &EncoderConfig) -> String {
        // Writing string keys and primitive values into a `String` cannot
        // fail.
        encoder::to_json_with(self, config).unwrap_or_default()
    }

    /// Like [`json`](Self::json), returning the raw bytes.
    #[must_use]
    pub fn json_bytes(&self) -> Vec<u8> {
        encoder::to_json_bytes_with(self, EncoderConfig::global()).unwrap_or_default()
    }

    /// Returns `true` if both handles point at the same node.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    /// Finds the first `Structured` in `error`'s cause chain. See
    /// [`find_structured`].
    ///
    /// ```
    /// use erreur::{Structured, fields};
    ///
    /// #[derive(Debug, thiserror::Error)]
    /// #[error("upload failed")]
    /// struct UploadError(#[source] Structured);
    ///
    /// let err = UploadError(Structured::new("quota exceeded", fields!["limit" => 10]));
    /// let found = Structured::find(&err).unwrap();
    /// assert_eq!(found.json(), r#"{"msg":"quota exceeded","limit":10}"#);
    /// assert!(Structured::find(&std::fmt::Error).is_none());
    /// ```
    #[must_use]
    pub fn find<'a>(error: &'a (dyn Error + 'static)) -> Option<&'a Structured> {
        find_structured(error)
    }
}

/// Wraps an optional cause with a message and fields.
///
/// Returns `None` when `cause` is `None`, so "no error" propagates instead
/// of wrapping nothing.
///
/// ```
/// use erreur::{PlainError, wrap};
///
/// assert!(wrap(None::<PlainError>, "outer", []).is_none());
///
/// let err = wrap(Some(PlainError::from_static("inner")), "outer", []).unwrap();
/// assert_eq!(err.to_string(), "outer: inner");
/// ```
pub fn wrap<E>(
    cause: Option<E>,
    message: impl Into<PlainError>,
    fields: impl IntoIterator<Item = ContextField>,
) -> Option<Structured>
where
    E: Error + Send + Sync + 'static,
{
    cause.map(|cause| Structured::wrap(cause, message, fields))
}

/// Annotates an optional cause with fields. Returns `None` when `cause` is
/// `None`.
pub fn structure<E>(
    cause: Option<E>,
    fields: impl IntoIterator<Item = ContextField>,
) -> Option<Structured>
where
    E: Error + Send + Sync + 'static,
{
    cause.map(|cause| Structured::structure(cause, fields))
}

impl MarshalObject for Structured {
    fn marshal_object(&self, encoder: &mut dyn ObjectEncoder) {
        let config = *encoder.config();
        encoder.add_str(config.message_key, &self.headline());
        for field in self.fields_with(&config) {
            field.add_to(encoder);
        }
    }
}

impl Serialize for Structured {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        SerializeObject::new(self, EncoderConfig::global()).serialize(serializer)
    }
}

impl fmt::Display for Structured {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.data.origin {
            Origin::Leaf(message) => fmt::Display::fmt(message, f),
            Origin::Wrapped(message, cause) => write!(f, "{message}: {}", cause.as_error()),
            Origin::Annotated(cause) => fmt::Display::fmt(cause.as_error(), f),
        }
    }
}

impl fmt::Debug for Structured {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("Structured");
        if let Some(message) = self.message() {
            debug.field("message", &message);
        }
        debug.field("fields", &self.data.fields);
        if let Origin::Wrapped(_, cause) | Origin::Annotated(cause) = &self.data.origin {
            debug.field("cause", cause);
        }
        debug.finish()
    }
}

impl Error for Structured {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause()
    }
}

#[cfg(test)]
mod tests {
    use alloc::{
        string::{String, ToString},
        vec,
    };

    use super::*;

    #[allow(dead_code)]
    struct NonSend(*const ());
    static_assertions::assert_not_impl_any!(NonSend: Send, Sync);

    #[test]
    fn test_structured_send_sync_clone() {
        static_assertions::assert_impl_all!(Structured: Send, Sync, Clone);
        static_assertions::assert_not_impl_any!(Structured: Copy);
    }

    #[test]
    fn test_display_variants() {
        let leaf = Structured::new("a", []);
        assert_eq!(leaf.to_string(), "a");

        let wrapped = Structured::wrap(leaf.clone(), "b", []);
        assert_eq!(wrapped.to_string(), "b: a");

        let annotated = Structured::structure(wrapped, []);
        assert_eq!(annotated.to_string(), "b: a");
    }

    #[test]
    fn test_message_absent_for_structure() {
        let err = Structured::structure(PlainError::from_static("x"), []);
        assert_eq!(err.message(), None);
        assert_eq!(err.headline(), "x");
    }

    #[test]
    fn test_clone_shares_node() {
        let err = Structured::new("shared", vec![ContextField::bool("flag", true)]);
        let copy = err.clone();
        assert!(err.ptr_eq(&copy));
        assert!(!err.ptr_eq(&Structured::new("shared", [])));
    }

    #[test]
    fn test_fields_without_cause_are_own_fields() {
        let err = Structured::new(
            "m",
            vec![ContextField::int("a", 1), ContextField::string("b", String::from("2"))],
        );
        let keys: Vec<_> = err.fields().iter().map(|f| f.key().to_string()).collect();
        assert_eq!(keys, ["a", "b"]);
    }

    #[test]
    fn test_fields_with_plain_cause_has_no_cause_field() {
        let err = Structured::wrap(PlainError::from_static("inner"), "outer", []);
        assert!(err.fields().is_empty());
    }

    #[test]
    fn test_fields_with_custom_cause_key() {
        let config = EncoderConfig::new().with_cause_key("source");
        let err = Structured::wrap(Structured::new("inner", []), "outer", []);
        let fields = err.fields_with(&config);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].key(), "source");
    }

    #[test]
    fn test_boxed_cause_is_found() {
        let boxed: Box<dyn Error + Send + Sync> = Box::new(Structured::new("inner", []));
        let err = Structured::wrap_boxed(boxed, "outer", []);
        assert_eq!(err.to_string(), "outer: inner");
        assert_eq!(err.fields().len(), 1);
    }
}
