//! Logging structured errors as JSON lines.
//!
//! Run with `cargo run -p erreur-tracing --example json_logging`.

use erreur::{PlainError, ResultExt, Structured, fields};
use erreur_tracing::{JsonLayer, error_value};
use tracing_subscriber::layer::SubscriberExt;

#[derive(Debug, thiserror::Error)]
#[error("request failed")]
struct RequestError(#[source] Structured);

fn write_file(file_name: &'static str) -> Result<(), Structured> {
    let result: Result<(), PlainError> = Err(PlainError::from_static("insufficient permissions"));
    result.wrap_err("writing to file failed", fields!["fileName" => file_name])
}

fn flush_db() -> Result<(), Structured> {
    write_file("someFile").wrap_err("failed to flush db", fields!["fieldThatGoes" => "ping"])
}

fn main() {
    let subscriber = tracing_subscriber::registry().with(JsonLayer::new());
    tracing::subscriber::set_global_default(subscriber).expect("failed to set subscriber");

    let conn_err = Structured::new(
        "connection error",
        fields!["code" => 1234, "addr" => "example.com"],
    );
    tracing::error!(error = error_value(Some(&conn_err)), "failed to load data");

    if let Err(err) = flush_db() {
        tracing::error!(error = error_value(Some(&err)), "failed to flush db");
    }

    let foreign = RequestError(Structured::new("timeout", fields!["after_ms" => 250u64]));
    tracing::warn!(error = error_value(Some(&foreign)), "giving up");

    tracing::info!(error = error_value(None::<&Structured>), "shutdown complete");
}
