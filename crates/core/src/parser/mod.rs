//! Line parser for the batch command language.
//! Each line is parsed on its own: the parser sees one field list and the
//! fixed grammar tables, never the neighbouring lines.
use crate::command::CommandPayload;
use crate::error::ParseError;
use crate::options::ParserOptions;
use crate::script;
use crate::value::ValueParser;

mod create;
mod merge;
mod statement;

// ──────────────────────────────────────────────
// Dispatch
// ──────────────────────────────────────────────

/// The grammar selected by a line's first field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandShape {
    CreateItem,
    CreateProperty,
    Merge,
    RemoveStatementById,
    /// `[-]ENTITY <tab> PROPERTY|TERM <tab> VALUE ...`
    EntityFirst,
}

impl CommandShape {
    /// Pick the grammar for `first_field` (trimmed, case-insensitive).
    pub fn of(first_field: &str) -> CommandShape {
        match first_field.trim().to_uppercase().as_str() {
            "CREATE" => CommandShape::CreateItem,
            "CREATE_PROPERTY" => CommandShape::CreateProperty,
            "MERGE" => CommandShape::Merge,
            "-STATEMENT" => CommandShape::RemoveStatementById,
            _ => CommandShape::EntityFirst,
        }
    }
}

/// A successfully parsed line.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedLine {
    pub payload: CommandPayload,
    /// Text of the trailing `/* ... */` comment, if any.
    pub summary: Option<String>,
}

/// Parse one raw script line into a structured payload.
pub fn parse_line(
    raw: &str,
    values: &dyn ValueParser,
    options: &ParserOptions,
) -> Result<ParsedLine, ParseError> {
    let (body, summary) = script::extract_comment(raw);
    let fields = script::split_fields(body);
    let payload = LineParser::new(&fields, values, options).parse()?;
    Ok(ParsedLine {
        payload,
        summary: summary.map(str::to_owned),
    })
}

// ──────────────────────────────────────────────
// Parser
// ──────────────────────────────────────────────

struct LineParser<'a> {
    fields: &'a [&'a str],
    values: &'a dyn ValueParser,
    options: &'a ParserOptions,
}

impl<'a> LineParser<'a> {
    fn new(
        fields: &'a [&'a str],
        values: &'a dyn ValueParser,
        options: &'a ParserOptions,
    ) -> Self {
        LineParser {
            fields,
            values,
            options,
        }
    }

    fn parse(&self) -> Result<CommandPayload, ParseError> {
        let first = match self.fields {
            [] => return Err(ParseError::EmptyCommand),
            [only] if only.trim().is_empty() => return Err(ParseError::EmptyCommand),
            [first, ..] => *first,
        };
        let shape = CommandShape::of(first);
        tracing::trace!(?shape, fields = self.fields.len(), "dispatching command");
        match shape {
            CommandShape::CreateItem => self.parse_create_item(),
            CommandShape::CreateProperty => self.parse_create_property(),
            CommandShape::Merge => self.parse_merge(),
            CommandShape::RemoveStatementById => self.parse_remove_statement_by_id(),
            CommandShape::EntityFirst => self.parse_entity_first(),
        }
    }

    fn expect_columns(&self, command: &'static str, expected: usize) -> Result<(), ParseError> {
        if self.fields.len() == expected {
            Ok(())
        } else {
            Err(ParseError::ColumnCount {
                command,
                expected,
                found: self.fields.len(),
            })
        }
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{Action, Datatype};
    use crate::value::V1ValueParser;

    fn parse(raw: &str) -> Result<ParsedLine, ParseError> {
        parse_line(raw, &V1ValueParser, &ParserOptions::default())
    }

    #[test]
    fn dispatch_is_case_insensitive_and_trimmed() {
        assert_eq!(CommandShape::of("create"), CommandShape::CreateItem);
        assert_eq!(CommandShape::of(" Create_Property "), CommandShape::CreateProperty);
        assert_eq!(CommandShape::of("merge"), CommandShape::Merge);
        assert_eq!(CommandShape::of("-statement"), CommandShape::RemoveStatementById);
        assert_eq!(CommandShape::of("Q42"), CommandShape::EntityFirst);
        assert_eq!(CommandShape::of("CREATEX"), CommandShape::EntityFirst);
    }

    #[test]
    fn empty_and_blank_lines_are_empty_commands() {
        assert_eq!(parse(""), Err(ParseError::EmptyCommand));
        assert_eq!(parse("   "), Err(ParseError::EmptyCommand));
        assert_eq!(parse("/* only a comment */"), Err(ParseError::EmptyCommand));
    }

    #[test]
    fn comment_becomes_summary() {
        let parsed = parse("CREATE /* note */").expect("valid line");
        assert_eq!(parsed.summary.as_deref(), Some("note"));
        assert_eq!(parsed.payload, parse("CREATE").expect("valid line").payload);
    }

    #[test]
    fn lowercase_keywords_are_accepted() {
        let parsed = parse("create_property\turl").expect("valid line");
        assert_eq!(
            parsed.payload,
            CommandPayload::CreateProperty {
                datatype: Datatype::Url
            }
        );
        assert_eq!(parsed.payload.action(), Action::Create);
    }
}
