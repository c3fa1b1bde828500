//! quickbatch-core: parser for the QuickStatements-style batch command language.
//!
//! Turns a multi-line, tab-delimited script into an ordered [`Batch`] of
//! [`Command`]s. Every line is parsed on its own; a malformed line becomes an
//! error-status command and never invalidates its neighbours.
//!
//! # Public API
//!
//! - [`parse_script()`] / [`BatchParser`] -- parse a whole script
//! - [`parse_line()`] -- parse a single line into a [`ParsedLine`]
//! - [`ValueParser`] -- seam for value-token parsing; [`V1ValueParser`] is
//!   the default
//! - [`classify()`] / [`operation_for()`] -- refined operation tags
//! - [`ParserOptions`] -- trailing-field policy and parallel parsing

pub mod batch;
pub mod classify;
pub mod command;
pub mod error;
pub mod ids;
pub mod options;
pub mod parser;
pub mod script;
pub mod value;

// ── Convenience re-exports: key types ────────────────────────────────

pub use batch::{Batch, Command, CommandStatus};
pub use command::{
    Action, CommandPayload, Datatype, EntityRef, EntityType, Operation, ReferenceBlock, Snak,
    StatementCommand, TermCommand, TermKind, What,
};
pub use error::{ErrorKind, ParseError, ValueError};
pub use options::{ParserOptions, TrailingFields};
pub use value::{V1ValueParser, Value, ValueKind, ValueParser};

// ── Convenience re-exports: entry points ─────────────────────────────

pub use batch::{parse_script, BatchParser};
pub use classify::{classify, operation_for};
pub use parser::{parse_line, CommandShape, ParsedLine};
