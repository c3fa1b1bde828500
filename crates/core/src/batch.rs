//! Batch assembly: one [`Command`] per script line, in order.
//!
//! Parsing a line either succeeds or yields a [`ParseError`]; both outcomes
//! become a command at the line's index and parsing moves on. A malformed line
//! never aborts the batch, so the preview mirrors the script line for line.

use serde::{Serialize, Serializer};
use serde_json::json;

use crate::classify;
use crate::command::{Action, CommandPayload, Operation};
use crate::error::ParseError;
use crate::options::ParserOptions;
use crate::parser::{self, ParsedLine};
use crate::script;
use crate::value::{V1ValueParser, ValueParser};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandStatus {
    /// Parsed and ready for execution.
    Initial,
    /// Rejected at parse time; carries no payload.
    Error,
}

/// One script line, parsed or rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    index: usize,
    raw: String,
    summary: Option<String>,
    outcome: Result<CommandPayload, ParseError>,
}

impl Command {
    fn from_outcome(index: usize, raw: String, outcome: Result<ParsedLine, ParseError>) -> Self {
        match outcome {
            Ok(ParsedLine { payload, summary }) => Command {
                index,
                raw,
                summary,
                outcome: Ok(payload),
            },
            Err(e) => Command {
                index,
                raw,
                summary: None,
                outcome: Err(e),
            },
        }
    }

    /// Zero-based line number within the batch.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The line exactly as it appeared in the script (after shorthand folding).
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn status(&self) -> CommandStatus {
        match self.outcome {
            Ok(_) => CommandStatus::Initial,
            Err(_) => CommandStatus::Error,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }

    /// `None` for rejected lines.
    pub fn action(&self) -> Option<Action> {
        self.payload().map(CommandPayload::action)
    }

    pub fn operation(&self) -> Option<Operation> {
        self.payload().and_then(classify::operation_for)
    }

    pub fn payload(&self) -> Option<&CommandPayload> {
        self.outcome.as_ref().ok()
    }

    pub fn error(&self) -> Option<&ParseError> {
        self.outcome.as_ref().err()
    }

    pub fn error_message(&self) -> Option<String> {
        self.error().map(ToString::to_string)
    }

    pub fn to_json_value(&self) -> serde_json::Value {
        json!({
            "index": self.index,
            "raw": self.raw,
            "summary": self.summary,
            "status": self.status(),
            "action": self.action(),
            "operation": self.operation(),
            "payload": self.payload().map(CommandPayload::to_json_value),
            "error_message": self.error_message(),
        })
    }
}

impl Serialize for Command {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json_value().serialize(serializer)
    }
}

/// A named, owned, ordered sequence of commands.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    name: String,
    user: String,
    commands: Vec<Command>,
}

impl Batch {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<Command> {
        self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.commands.iter().filter(|c| !c.is_ok()).count()
    }

    pub fn has_errors(&self) -> bool {
        self.commands.iter().any(|c| !c.is_ok())
    }

    /// The executable subset, in script order.
    pub fn valid_commands(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter().filter(|c| c.is_ok())
    }

    pub fn to_json_value(&self) -> serde_json::Value {
        json!({
            "name": self.name,
            "user": self.user,
            "commands": self.commands.iter().map(Command::to_json_value).collect::<Vec<_>>(),
        })
    }
}

impl Serialize for Batch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json_value().serialize(serializer)
    }
}

// ──────────────────────────────────────────────
// Assembler
// ──────────────────────────────────────────────

/// Parses whole scripts into [`Batch`]es.
pub struct BatchParser<V = V1ValueParser> {
    values: V,
    options: ParserOptions,
}

impl BatchParser<V1ValueParser> {
    pub fn new() -> Self {
        BatchParser::with_value_parser(V1ValueParser)
    }
}

impl Default for BatchParser<V1ValueParser> {
    fn default() -> Self {
        BatchParser::new()
    }
}

impl<V: ValueParser> BatchParser<V> {
    pub fn with_value_parser(values: V) -> Self {
        BatchParser {
            values,
            options: ParserOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ParserOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Parse a single raw line as the command at `index`.
    pub fn parse_line(&self, index: usize, raw: String) -> Command {
        let outcome = parser::parse_line(&raw, &self.values, &self.options);
        if let Err(e) = &outcome {
            tracing::debug!(index, error = %e, "rejected command line");
        }
        Command::from_outcome(index, raw, outcome)
    }

    /// Parse `script` into a batch named `name` owned by `user`.
    ///
    /// Never fails: every line, including blank ones, becomes a command.
    pub fn parse(&self, name: &str, user: &str, script: &str) -> Batch {
        let lines = script::split_lines(script);
        let commands = self.parse_lines(lines);
        let batch = Batch {
            name: name.to_owned(),
            user: user.to_owned(),
            commands,
        };
        tracing::info!(
            batch = name,
            user,
            commands = batch.len(),
            errors = batch.error_count(),
            "parsed batch"
        );
        batch
    }

    #[cfg(feature = "parallel")]
    fn parse_lines(&self, lines: Vec<String>) -> Vec<Command> {
        use rayon::prelude::*;

        if self.options.parallel {
            lines
                .into_par_iter()
                .enumerate()
                .map(|(index, raw)| self.parse_line(index, raw))
                .collect()
        } else {
            self.parse_lines_sequential(lines)
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn parse_lines(&self, lines: Vec<String>) -> Vec<Command> {
        if self.options.parallel {
            tracing::debug!("built without the `parallel` feature; parsing sequentially");
        }
        self.parse_lines_sequential(lines)
    }

    fn parse_lines_sequential(&self, lines: Vec<String>) -> Vec<Command> {
        lines
            .into_iter()
            .enumerate()
            .map(|(index, raw)| self.parse_line(index, raw))
            .collect()
    }
}

/// Parse `script` with the default value parser and options.
pub fn parse_script(name: &str, user: &str, script: &str) -> Batch {
    BatchParser::new().parse(name, user, script)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_lines_are_isolated() {
        let batch = parse_script("b", "u", "CREATE\nCREATE_PROPERTY\tbogus-type\nCREATE");
        assert_eq!(batch.len(), 3);
        let statuses: Vec<_> = batch.commands().iter().map(Command::status).collect();
        assert_eq!(
            statuses,
            vec![
                CommandStatus::Initial,
                CommandStatus::Error,
                CommandStatus::Initial
            ]
        );
        assert_eq!(batch.commands()[0].operation(), Some(Operation::CreateItem));
        assert_eq!(batch.commands()[2].operation(), Some(Operation::CreateItem));
        assert_eq!(batch.error_count(), 1);
        assert_eq!(batch.valid_commands().count(), 2);
    }

    #[test]
    fn overflowing_quantity_only_rejects_its_line() {
        let script = "CREATE\nQ1\tP1082\t79228162514264337593543950335~1\nCREATE";
        for parallel in [false, true] {
            let batch = BatchParser::new()
                .with_options(ParserOptions {
                    parallel,
                    ..ParserOptions::default()
                })
                .parse("b", "u", script);
            assert_eq!(batch.len(), 3);
            assert!(batch.commands()[0].is_ok());
            assert!(batch.commands()[2].is_ok());
            let bad = &batch.commands()[1];
            assert_eq!(bad.status(), CommandStatus::Error);
            assert!(matches!(
                bad.error(),
                Some(ParseError::Value(crate::error::ValueError::QuantityRange { .. }))
            ));
        }
    }

    #[test]
    fn error_commands_have_no_action_or_payload() {
        let batch = parse_script("b", "u", "MERGE\tQ1");
        let cmd = &batch.commands()[0];
        assert_eq!(cmd.status(), CommandStatus::Error);
        assert_eq!(cmd.action(), None);
        assert_eq!(cmd.operation(), None);
        assert!(cmd.payload().is_none());
        assert!(cmd.error_message().is_some());
        assert_eq!(cmd.raw(), "MERGE\tQ1");
    }

    #[test]
    fn summary_is_kept_apart_from_the_payload() {
        let batch = parse_script("b", "u", "CREATE /* note */");
        let cmd = &batch.commands()[0];
        assert_eq!(cmd.summary(), Some("note"));
        assert_eq!(cmd.raw(), "CREATE /* note */");
        let json = cmd.to_json_value();
        assert_eq!(json["summary"], "note");
        assert!(json["payload"].get("summary").is_none());
        assert_eq!(json["payload"], json!({ "action": "create", "type": "item" }));
    }

    #[test]
    fn empty_script_is_one_empty_command() {
        let batch = parse_script("b", "u", "");
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.commands()[0].error(), Some(&ParseError::EmptyCommand));
    }

    #[test]
    fn json_shape_of_an_error_command() {
        let batch = parse_script("b", "u", "\n");
        let json = batch.to_json_value();
        assert_eq!(json["name"], "b");
        assert_eq!(json["user"], "u");
        let first = &json["commands"][0];
        assert_eq!(first["index"], 0);
        assert_eq!(first["status"], "error");
        assert!(first["action"].is_null());
        assert!(first["payload"].is_null());
        assert_eq!(first["error_message"], "empty command statement");
        assert_eq!(json["commands"][1]["index"], 1);
    }

    #[test]
    fn custom_value_parser_is_used() {
        use crate::error::ValueError;
        use crate::value::Value;

        let parser = BatchParser::with_value_parser(|token: &str| -> Result<Value, ValueError> {
            Ok(Value::String(token.to_uppercase()))
        });
        let batch = parser.parse("b", "u", "Q1\tLen\tabc");
        match batch.commands()[0].payload() {
            Some(CommandPayload::Term(t)) => {
                assert_eq!(t.value, Value::String("ABC".into()))
            }
            other => panic!("expected term, got {:?}", other),
        }
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_parse_matches_sequential() {
        let script = "CREATE\nQ1\tP31\tQ5\nbad\nMERGE\tQ9\tQ2\n-STATEMENT\tQ1$abc\n";
        let sequential = BatchParser::new().parse("b", "u", script);
        let parallel = BatchParser::new()
            .with_options(ParserOptions {
                parallel: true,
                ..ParserOptions::default()
            })
            .parse("b", "u", script);
        assert_eq!(sequential, parallel);
    }
}
