//! The object-encoding visitor and JSON rendering.
//!
//! Serialization is split in two halves:
//!
//! - [`ObjectEncoder`] is the visitor. It receives keyed primitive values
//!   and nested objects, in order.
//! - [`MarshalObject`] is implemented by anything that can write itself into
//!   an encoder. [`Structured`](crate::Structured) implements it by writing
//!   its headline and fields; a nested `"cause"` field calls back into the
//!   nested error's own `marshal_object`, so depth needs no special casing.
//!
//! The JSON encoder in this module drives a [`serde`] map serializer, which
//! keeps keys in the order they are written and never merges duplicates.
//!
//! # Configuration
//!
//! The key names used by the encoder live in an immutable [`EncoderConfig`].
//! A process-wide value can be installed once with
//! [`EncoderConfig::install`]; every entry point also has a variant taking
//! the config explicitly.
//!
//! ```
//! use erreur::{
//!     Structured,
//!     encoder::{self, EncoderConfig},
//! };
//!
//! let config = EncoderConfig::new().with_message_key("message");
//! let err = Structured::new("disk full", []);
//!
//! let json = encoder::to_json_with(&err, &config).unwrap();
//! assert_eq!(json, r#"{"message":"disk full"}"#);
//! ```

use alloc::{string::String, vec::Vec};
use core::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// A visitor that receives the keyed values of one object.
pub trait ObjectEncoder {
    /// The configuration this encoder was created with.
    fn config(&self) -> &EncoderConfig;

    /// Writes a string value.
    fn add_str(&mut self, key: &str, value: &str);

    /// Writes a signed integer.
    fn add_i64(&mut self, key: &str, value: i64);

    /// Writes an unsigned integer.
    fn add_u64(&mut self, key: &str, value: u64);

    /// Writes a floating point number.
    fn add_f64(&mut self, key: &str, value: f64);

    /// Writes a boolean.
    fn add_bool(&mut self, key: &str, value: bool);

    /// Writes a nested object.
    fn add_object(&mut self, key: &str, value: &dyn MarshalObject);
}

/// A type that can write itself into an [`ObjectEncoder`] as one object.
pub trait MarshalObject {
    /// Writes every key of this object into `encoder`, in order.
    fn marshal_object(&self, encoder: &mut dyn ObjectEncoder);
}

/// Key names used when encoding structured errors.
///
/// The default writes `"msg"`, `"cause"` and `"error"`, and nothing else: no
/// timestamp, level, caller or logger-name keys ever appear in an encoded
/// error.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EncoderConfig {
    /// Key of the headline message. Defaults to `"msg"`.
    pub message_key: &'static str,
    /// Key of the nested cause object. Defaults to `"cause"`.
    pub cause_key: &'static str,
    /// Key used by [`log_field`](crate::log_field). Defaults to `"error"`.
    pub error_key: &'static str,
}

static GLOBAL_CONFIG: spin::Once<EncoderConfig> = spin::Once::new();

impl EncoderConfig {
    /// The configuration used when none has been installed.
    pub const DEFAULT: Self = Self::new();

    /// Creates the default configuration.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            message_key: "msg",
            cause_key: "cause",
            error_key: "error",
        }
    }

    /// Sets the key of the headline message.
    #[must_use]
    pub const fn with_message_key(mut self, key: &'static str) -> Self {
        self.message_key = key;
        self
    }

    /// Sets the key of the nested cause object.
    #[must_use]
    pub const fn with_cause_key(mut self, key: &'static str) -> Self {
        self.cause_key = key;
        self
    }

    /// Sets the key used by [`log_field`](crate::log_field).
    #[must_use]
    pub const fn with_error_key(mut self, key: &'static str) -> Self {
        self.error_key = key;
        self
    }

    /// Installs this configuration process-wide.
    ///
    /// The global configuration can be set exactly once and is read-only
    /// afterwards. If one is already installed, returns a
    /// [`ConfigAlreadyInstalledError`] holding the rejected configuration.
    ///
    /// ```
    /// use erreur::encoder::EncoderConfig;
    ///
    /// EncoderConfig::new()
    ///     .with_error_key("err")
    ///     .install()
    ///     .expect("failed to install encoder config");
    ///
    /// assert_eq!(EncoderConfig::global().error_key, "err");
    /// assert!(EncoderConfig::new().install().is_err());
    /// ```
    pub fn install(self) -> Result<(), ConfigAlreadyInstalledError> {
        let mut installed = false;
        GLOBAL_CONFIG.call_once(|| {
            installed = true;
            self
        });

        if installed {
            Ok(())
        } else {
            Err(ConfigAlreadyInstalledError(self))
        }
    }

    /// Returns the installed configuration, or [`EncoderConfig::DEFAULT`].
    #[must_use]
    pub fn global() -> &'static Self {
        GLOBAL_CONFIG.get().unwrap_or(&Self::DEFAULT)
    }
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Error returned when installing an [`EncoderConfig`] after one is already
/// installed.
///
/// Contains the configuration that was rejected.
pub struct ConfigAlreadyInstalledError(pub EncoderConfig);

impl fmt::Debug for ConfigAlreadyInstalledError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigAlreadyInstalledError").finish()
    }
}

impl fmt::Display for ConfigAlreadyInstalledError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "an encoder config is already installed globally")
    }
}

impl core::error::Error for ConfigAlreadyInstalledError {}

/// Adapts a [`MarshalObject`] to [`serde::Serialize`] as a map.
pub struct SerializeObject<'a, T: ?Sized> {
    value: &'a T,
    config: &'a EncoderConfig,
}

impl<'a, T: MarshalObject + ?Sized> SerializeObject<'a, T> {
    /// Wraps `value` for serialization with `config`.
    pub fn new(value: &'a T, config: &'a EncoderConfig) -> Self {
        Self { value, config }
    }
}

impl<T: MarshalObject + ?Sized> Serialize for SerializeObject<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        let mut encoder = MapEncoder {
            map: &mut map,
            config: self.config,
            error: None,
        };
        self.value.marshal_object(&mut encoder);
        if let Some(error) = encoder.error {
            return Err(error);
        }
        map.end()
    }
}

/// Feeds encoder calls into a serde map, keeping the first error.
struct MapEncoder<'a, M: SerializeMap> {
    map: &'a mut M,
    config: &'a EncoderConfig,
    error: Option<M::Error>,
}

impl<M: SerializeMap> MapEncoder<'_, M> {
    fn entry<V: Serialize + ?Sized>(&mut self, key: &str, value: &V) {
        if self.error.is_some() {
            return;
        }
        if let Err(error) = self.map.serialize_entry(key, value) {
            self.error = Some(error);
        }
    }
}

impl<M: SerializeMap> ObjectEncoder for MapEncoder<'_, M> {
    fn config(&self) -> &EncoderConfig {
        self.config
    }

    fn add_str(&mut self, key: &str, value: &str) {
        self.entry(key, value);
    }

    fn add_i64(&mut self, key: &str, value: i64) {
        self.entry(key, &value);
    }

    fn add_u64(&mut self, key: &str, value: u64) {
        self.entry(key, &value);
    }

    fn add_f64(&mut self, key: &str, value: f64) {
        self.entry(key, &value);
    }

    fn add_bool(&mut self, key: &str, value: bool) {
        self.entry(key, &value);
    }

    fn add_object(&mut self, key: &str, value: &dyn MarshalObject) {
        let config = self.config;
        self.entry(key, &SerializeObject::new(value, config));
    }
}

/// Serializes `value` as a compact JSON object using `config`.
pub fn to_json_with<T>(value: &T, config: &EncoderConfig) -> serde_json::Result<String>
where
    T: MarshalObject + ?Sized,
{
    serde_json::to_string(&SerializeObject::new(value, config))
}

/// Serializes `value` as compact JSON bytes using `config`.
pub fn to_json_bytes_with<T>(value: &T, config: &EncoderConfig) -> serde_json::Result<Vec<u8>>
where
    T: MarshalObject + ?Sized,
{
    serde_json::to_vec(&SerializeObject::new(value, config))
}

/// Serializes `value` as a compact JSON object using the global config.
pub fn to_json<T>(value: &T) -> serde_json::Result<String>
where
    T: MarshalObject + ?Sized,
{
    to_json_with(value, EncoderConfig::global())
}
