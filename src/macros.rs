/// Builds an array of [`ContextField`](crate::ContextField)s from
/// `key => value` pairs.
///
/// Each value goes through [`FieldValue`](crate::FieldValue)'s `From`
/// conversions, so strings, integers, floats, booleans and nested
/// [`Structured`](crate::Structured) errors can be mixed freely.
///
/// ```
/// use erreur::{FieldValue, fields};
///
/// let fields = fields!["code" => 1234, "addr" => "example.com", "retry" => false];
/// assert_eq!(fields.len(), 3);
/// assert_eq!(fields[1].key(), "addr");
/// assert!(matches!(fields[2].value(), FieldValue::Bool(false)));
/// ```
#[macro_export]
macro_rules! fields {
    ($($key:expr => $value:expr),* $(,)?) => {
        [$($crate::ContextField::new($key, $value)),*]
    };
}

/// Creates a new [`Structured`](crate::Structured) error from a message and
/// optional `key => value` fields.
///
/// ```
/// use erreur::erreur;
///
/// let err = erreur!("connection error", "code" => 1234, "addr" => "example.com");
/// assert_eq!(err.json(), r#"{"msg":"connection error","code":1234,"addr":"example.com"}"#);
/// ```
#[macro_export]
macro_rules! erreur {
    ($message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::Structured::new($message, $crate::fields![$($key => $value),*])
    };
}

/// Return early with a [`Structured`](crate::Structured) error.
///
/// Takes the same arguments as [`erreur!`]. This is equivalent to writing
/// `return Err(erreur!(...).into());`
///
/// ```
/// use erreur::{Structured, bail};
///
/// fn check_port(port: u32) -> Result<u16, Structured> {
///     if port > u32::from(u16::MAX) {
///         bail!("port out of range", "port" => port);
///     }
///     Ok(port as u16)
/// }
///
/// assert_eq!(
///     check_port(70000).unwrap_err().json(),
///     r#"{"msg":"port out of range","port":70000}"#
/// );
/// ```
#[macro_export]
macro_rules! bail {
    ($($args:tt)*) => {
        return ::core::result::Result::Err($crate::erreur!($($args)*).into())
    };
}
