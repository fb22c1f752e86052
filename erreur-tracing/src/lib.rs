#![deny(
    missing_docs,
    unsafe_code,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    unused_doc_comments
)]

//! JSON event logging for erreur structured errors.
//!
//! This crate lets a [`Structured`](erreur::Structured) error ride along on a
//! `tracing` event as a single field, and renders that field as a nested
//! JSON object instead of a flattened string.
//!
//! # How It Works
//!
//! You add [`JsonLayer`] to your tracing subscriber. It writes every event
//! as one JSON line with a level, a message, and the event's fields in the
//! order they were recorded. Fields recorded as errors go through
//! [`erreur::log_field_keyed`]:
//!
//! - a structured error (or a foreign error with one in its source chain)
//!   becomes a nested object,
//! - any other error becomes its display string,
//! - a missing error, passed through [`error_value`], writes nothing.
//!
//! # Quick Start
//!
//! ```
//! use erreur::{Structured, fields};
//! use erreur_tracing::{JsonLayer, error_value};
//! use tracing_subscriber::layer::SubscriberExt;
//!
//! let subscriber = tracing_subscriber::registry().with(JsonLayer::new());
//! tracing::subscriber::set_global_default(subscriber).expect("failed to set subscriber");
//!
//! let conn_err = Structured::new("connection error", fields!["code" => 1234, "addr" => "example.com"]);
//!
//! // [...] elsewhere in your code
//! tracing::error!(error = error_value(Some(&conn_err)), "failed to load data");
//! ```
//!
//! Output:
//! ```text
//! {"level":"error","msg":"failed to load data","error":{"msg":"connection error","code":1234,"addr":"example.com"}}
//! ```

use std::{error::Error, fmt, io};

use erreur::{ContextField, EncoderConfig, MarshalObject, ObjectEncoder, encoder};
use tracing::{
    Event, Level, Subscriber,
    field::{Field, Visit},
};
use tracing_subscriber::{
    fmt::MakeWriter,
    layer::{Context, Layer},
};

/// Turns an optional error into a `tracing` field value.
///
/// `Some` records the error through [`Visit::record_error`]; `None` records
/// nothing, so the field is simply absent from the log line.
///
/// ```
/// use erreur::Structured;
/// use erreur_tracing::error_value;
///
/// fn report(result: Result<(), Structured>) {
///     tracing::warn!(error = error_value(result.as_ref().err()), "sync finished");
/// }
/// # report(Ok(()));
/// ```
pub fn error_value<E>(error: Option<&E>) -> Option<&(dyn Error + 'static)>
where
    E: Error + 'static,
{
    error.map(|error| error as &(dyn Error + 'static))
}

/// A tracing layer that writes each event as one compact JSON line.
///
/// The line holds the level (under `"level"`, unless disabled), the message
/// under the configured message key, and then every event field in
/// recording order. Span data is not included.
///
/// Write errors are ignored.
///
/// # Examples
///
/// ```
/// use erreur::encoder::EncoderConfig;
/// use erreur_tracing::JsonLayer;
/// use tracing_subscriber::layer::SubscriberExt;
///
/// let layer = JsonLayer::new()
///     .with_writer(std::io::stderr)
///     .with_config(EncoderConfig::new().with_message_key("message"))
///     .with_level_key(None);
///
/// let _subscriber = tracing_subscriber::registry().with(layer);
/// ```
#[derive(Clone, Debug)]
pub struct JsonLayer<W = fn() -> io::Stdout> {
    make_writer: W,
    config: EncoderConfig,
    level_key: Option<&'static str>,
}

impl JsonLayer {
    /// Creates a layer writing to standard output with the global
    /// [`EncoderConfig`].
    pub fn new() -> Self {
        Self {
            make_writer: io::stdout,
            config: *EncoderConfig::global(),
            level_key: Some("level"),
        }
    }
}

impl Default for JsonLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl<W> JsonLayer<W> {
    /// Sets the writer events are written to.
    pub fn with_writer<W2>(self, make_writer: W2) -> JsonLayer<W2>
    where
        W2: for<'w> MakeWriter<'w> + 'static,
    {
        JsonLayer {
            make_writer,
            config: self.config,
            level_key: self.level_key,
        }
    }

    /// Sets the encoder configuration used for the message key and for
    /// nested errors.
    pub fn with_config(mut self, config: EncoderConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the key of the level, or `None` to leave the level out.
    pub fn with_level_key(mut self, key: Option<&'static str>) -> Self {
        self.level_key = key;
        self
    }
}

impl<S, W> Layer<S> for JsonLayer<W>
where
    S: Subscriber,
    W: for<'w> MakeWriter<'w> + 'static,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let mut record = EventRecord {
            level: self
                .level_key
                .map(|key| (key, level_name(*metadata.level()))),
            message: None,
            fields: Vec::new(),
        };
        event.record(&mut record);

        let Ok(mut line) = encoder::to_json_bytes_with(&record, &self.config) else {
            return;
        };
        line.push(b'\n');

        let mut writer = self.make_writer.make_writer_for(metadata);
        // Logging must not fail the instrumented code.
        let _ = io::Write::write_all(&mut writer, &line);
    }
}

fn level_name(level: Level) -> &'static str {
    if level == Level::ERROR {
        "error"
    } else if level == Level::WARN {
        "warn"
    } else if level == Level::INFO {
        "info"
    } else if level == Level::DEBUG {
        "debug"
    } else {
        "trace"
    }
}

/// The fields of one event, collected in recording order.
struct EventRecord {
    level: Option<(&'static str, &'static str)>,
    message: Option<String>,
    fields: Vec<ContextField>,
}

impl EventRecord {
    fn push_text(&mut self, field: &Field, text: String) {
        if field.name() == "message" {
            self.message = Some(text);
        } else {
            self.fields.push(ContextField::string(field.name(), text));
        }
    }
}

impl Visit for EventRecord {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.push_text(field, value.to_owned());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.fields.push(ContextField::int(field.name(), value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.fields.push(ContextField::uint(field.name(), value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.fields.push(ContextField::float(field.name(), value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.fields.push(ContextField::bool(field.name(), value));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn Error + 'static)) {
        self.fields
            .push(erreur::log_field_keyed(field.name(), Some(value)));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.push_text(field, format!("{value:?}"));
    }
}

impl MarshalObject for EventRecord {
    fn marshal_object(&self, encoder: &mut dyn ObjectEncoder) {
        if let Some((key, level)) = self.level {
            encoder.add_str(key, level);
        }
        let message_key = encoder.config().message_key;
        encoder.add_str(message_key, self.message.as_deref().unwrap_or_default());
        for field in &self.fields {
            field.add_to(encoder);
        }
    }
}
