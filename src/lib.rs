#![cfg_attr(not(doc), no_std)]
#![deny(
    missing_docs,
    unsafe_code,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    unused_doc_comments
)]
// Make docs.rs generate better docs
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Structured errors that carry their own context fields, with compact JSON
//! serialization.
//!
//! ## Overview
//!
//! Errors with contextual information are still mostly produced by
//! formatting that context into the message:
//!
//! ```text
//! error code 1234 when connecting to address example.com
//! ```
//!
//! By the time such an error reaches a structured log line, the code and
//! the address are buried in a string. This crate lets errors carry the
//! context as typed fields instead, and render it as structured data
//! wherever the error ends up:
//!
//! ```
//! use erreur::{Structured, fields};
//!
//! let conn_err = Structured::new("connection error", fields!["code" => 1234, "addr" => "example.com"]);
//!
//! // [...] elsewhere in your code
//! assert_eq!(
//!     conn_err.json(),
//!     r#"{"msg":"connection error","code":1234,"addr":"example.com"}"#
//! );
//! ```
//!
//! ## Core Concepts
//!
//! A [`Structured`] error is one node of a cause chain. Each node holds:
//! - An optional **message** of its own.
//! - An optional **cause**: any other error, which may or may not itself be
//!   a [`Structured`].
//! - An ordered list of **context fields** ([`ContextField`]) that belong to
//!   this node only.
//!
//! At least one of message and cause is always present.
//!
//! There are two views of a chain:
//!
//! - The **display string** joins every message in the chain with `": "`,
//!   like most Rust error types do: `"c: b: a"`.
//! - The **structured view** ([`Structured::fields`], [`Structured::json`])
//!   keeps every node's fields scoped to that node. A structured cause shows
//!   up as a nested `"cause"` object, so two levels can use the same key
//!   without clobbering each other.
//!
//! ```
//! use erreur::{PlainError, Structured, fields};
//!
//! let err = Structured::wrap(
//!     Structured::wrap(PlainError::from_static("inner"), "mid", fields!["f" => "1"]),
//!     "outer",
//!     fields!["g" => "2"],
//! );
//!
//! assert_eq!(err.to_string(), "outer: mid: inner");
//! assert_eq!(
//!     err.json(),
//!     r#"{"msg":"outer","g":"2","cause":{"msg":"mid","f":"1"}}"#
//! );
//! ```
//!
//! ## Propagating "no error"
//!
//! [`wrap`] and [`structure`] take an optional cause and return `None` when
//! given `None`. The [`ResultExt`] trait does the same for `Result`, so
//! wrapping can be written unconditionally after a fallible call:
//!
//! ```
//! use erreur::{ResultExt, Structured, fields};
//!
//! fn load(id: u64) -> Result<String, Structured> {
//!     let raw = std::fs::read_to_string("/nonexistent/data.json")
//!         .wrap_err("failed to load data", fields!["id" => id])?;
//!     Ok(raw)
//! }
//!
//! let err = load(7).unwrap_err();
//! assert_eq!(err.headline(), "failed to load data");
//! ```
//!
//! ## Finding structure in foreign errors
//!
//! A [`Structured`] keeps its context even when wrapped by an error type
//! from another crate, as long as that type exposes it through
//! [`Error::source`](core::error::Error::source). See the [`chain`](mod@chain) module
//! for [`find_structured`], [`is_structured_chain`] and [`log_field`].
//!
//! ## Logging
//!
//! This crate does not log. The `erreur-tracing` crate renders events from
//! the `tracing` ecosystem as JSON lines and nests structured errors inside
//! them as objects.

extern crate alloc;

#[macro_use]
mod macros;

pub mod chain;
pub mod encoder;
pub mod field;
pub mod plain;
pub mod prelude;

mod cause;
mod result_ext;
mod structured;

pub use self::{
    chain::{
        Chain, chain, find_structured, is_structured_chain, log_field, log_field_dyn,
        log_field_keyed,
    },
    encoder::{EncoderConfig, MarshalObject, ObjectEncoder},
    field::{ContextField, FieldValue},
    plain::PlainError,
    result_ext::ResultExt,
    structured::{Structured, structure, wrap},
};
