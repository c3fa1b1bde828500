//! Line-local failures raised while parsing a batch script.
//!
//! Nothing here is fatal to a batch: the assembler turns every
//! [`ParseError`] into an error-status command and moves on.

use crate::command::{Datatype, TermKind};

/// Coarse classification of a [`ParseError`], for reporting and aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Wrong number of fields for the matched grammar.
    Shape,
    /// Malformed identifier.
    Format,
    /// Well-formed but not acceptable (datatype, entity shape, value kind).
    Domain,
    /// Raised by the value parser.
    Value,
}

/// Failure to turn a single raw value token into a typed [`Value`](crate::value::Value).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueError {
    #[error("unrecognized value `{token}`")]
    Unrecognized { token: String },

    #[error("time precision {precision} out of range 0..=14 in `{token}`")]
    TimePrecision { token: String, precision: u32 },

    #[error("coordinate out of range in `{token}`")]
    CoordinateRange { token: String },

    #[error("quantity bounds of `{token}` overflow the decimal range")]
    QuantityRange { token: String },

    #[error("invalid number `{number}` in `{token}`: {reason}")]
    Number {
        token: String,
        number: String,
        reason: String,
    },
}

/// Failure to parse one command line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("empty command statement")]
    EmptyCommand,

    #[error("{command} command must have {expected} column(s), found {found}")]
    ColumnCount {
        command: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("STATEMENT must contain at least entity, property and value, found {found} column(s)")]
    MissingStatementColumns { found: usize },

    #[error("trailing field `{key}` has no value")]
    DanglingField { key: String },

    #[error("CREATE_PROPERTY datatype `{datatype}` is not one of: {}", Datatype::allowed_list())]
    UnknownDatatype { datatype: String },

    #[error("MERGE items wrong format item1=[{item1}] item2=[{item2}]")]
    MergeFormat { item1: String, item2: String },

    #[error("statement ID `{id}` in -STATEMENT must have the form Q1234$UUID")]
    StatementIdFormat { id: String },

    #[error("invalid entity `{entity}`")]
    InvalidEntity { entity: String },

    #[error("invalid property `{property}`")]
    InvalidProperty { property: String },

    #[error("invalid qualifier property `{property}`")]
    InvalidQualifierProperty { property: String },

    #[error("invalid source `{key}`")]
    InvalidSource { key: String },

    #[error("{kind} must be a string instance")]
    TermNotString { kind: TermKind },

    #[error(transparent)]
    Value(#[from] ValueError),
}

impl ParseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::EmptyCommand
            | ParseError::ColumnCount { .. }
            | ParseError::MissingStatementColumns { .. }
            | ParseError::DanglingField { .. } => ErrorKind::Shape,
            ParseError::MergeFormat { .. }
            | ParseError::StatementIdFormat { .. }
            | ParseError::InvalidProperty { .. }
            | ParseError::InvalidQualifierProperty { .. }
            | ParseError::InvalidSource { .. } => ErrorKind::Format,
            ParseError::UnknownDatatype { .. }
            | ParseError::InvalidEntity { .. }
            | ParseError::TermNotString { .. } => ErrorKind::Domain,
            ParseError::Value(_) => ErrorKind::Value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_tokens() {
        let e = ParseError::MergeFormat {
            item1: "Qx".into(),
            item2: "Q5".into(),
        };
        assert_eq!(e.to_string(), "MERGE items wrong format item1=[Qx] item2=[Q5]");

        let e = ParseError::ColumnCount {
            command: "CREATE",
            expected: 1,
            found: 3,
        };
        assert_eq!(e.to_string(), "CREATE command must have 1 column(s), found 3");
    }

    #[test]
    fn unknown_datatype_lists_the_allowed_values() {
        let e = ParseError::UnknownDatatype {
            datatype: "bogus-type".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("bogus-type"), "{}", msg);
        assert!(msg.contains("wikibase-item"), "{}", msg);
        assert!(msg.contains("musical-notation"), "{}", msg);
        assert_eq!(e.kind(), ErrorKind::Domain);
    }

    #[test]
    fn value_errors_pass_their_message_through() {
        let e: ParseError = ValueError::Unrecognized {
            token: "???".into(),
        }
        .into();
        assert_eq!(e.to_string(), "unrecognized value `???`");
        assert_eq!(e.kind(), ErrorKind::Value);
    }
}
