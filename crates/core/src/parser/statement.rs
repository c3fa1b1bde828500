use super::LineParser;
use crate::command::{
    Action, CommandPayload, EntityRef, ReferenceBlock, Snak, StatementCommand, TermCommand,
    TermKind,
};
use crate::error::ParseError;
use crate::ids;
use crate::options::TrailingFields;
use crate::value::Value;

/// Marker prefixed to the entity field to turn an add into a remove.
const REMOVE_MARKER: char = '-';

impl<'a> LineParser<'a> {
    /// `-STATEMENT <tab> Q1234$UUID`
    pub(super) fn parse_remove_statement_by_id(&self) -> Result<CommandPayload, ParseError> {
        self.expect_columns("-STATEMENT", 2)?;
        let id = self.fields[1].trim();
        let mut parts = id.split('$');
        let entity_id = match (parts.next(), parts.next(), parts.next()) {
            (Some(entity_id), Some(_), None) => entity_id,
            _ => return Err(ParseError::StatementIdFormat { id: id.to_owned() }),
        };
        Ok(CommandPayload::RemoveStatementById {
            id: id.to_owned(),
            entity_id: entity_id.to_owned(),
        })
    }

    /// `[-]ENTITY <tab> PROPERTY <tab> VALUE [<tab> KEY <tab> VALUE]...` or
    /// `[-]ENTITY <tab> {L,D,A,S}code <tab> "text"`.
    pub(super) fn parse_entity_first(&self) -> Result<CommandPayload, ParseError> {
        let fields = self.fields;
        if fields.len() < 3 {
            return Err(ParseError::MissingStatementColumns {
                found: fields.len(),
            });
        }

        let first = fields[0].to_uppercase();
        let first = first.trim();
        let (action, entity) = match first.strip_prefix(REMOVE_MARKER) {
            Some(rest) => (Action::Remove, rest),
            None => (Action::Add, first),
        };
        let entity_type = ids::entity_type(entity).ok_or_else(|| ParseError::InvalidEntity {
            entity: entity.to_owned(),
        })?;

        let value = self.values.parse_value(fields[2])?;

        let term_kind = fields[1].chars().next().and_then(TermKind::from_marker);
        match term_kind {
            Some(kind) if fields.len() == 3 => {
                // Term markers are single ASCII letters.
                let code = &fields[1][1..];
                Self::term(action, kind, entity, value, code)
            }
            _ => {
                let entity = EntityRef {
                    entity_type,
                    id: entity.to_owned(),
                };
                self.statement(action, entity, value)
            }
        }
    }

    fn term(
        action: Action,
        kind: TermKind,
        entity: &str,
        value: Value,
        code: &str,
    ) -> Result<CommandPayload, ParseError> {
        let text = value.as_string().ok_or(ParseError::TermNotString { kind })?;
        // Setting a sitelink to "" removes it.
        let action = if kind == TermKind::Sitelink && text.is_empty() {
            Action::Remove
        } else {
            action
        };
        Ok(CommandPayload::Term(TermCommand {
            action,
            kind,
            item: entity.to_owned(),
            value,
            code: code.to_owned(),
        }))
    }

    fn statement(
        &self,
        action: Action,
        entity: EntityRef,
        value: Value,
    ) -> Result<CommandPayload, ParseError> {
        let property = self.fields[1].trim();
        if !ids::is_valid_property_id(property) {
            return Err(ParseError::InvalidProperty {
                property: property.to_owned(),
            });
        }

        let mut qualifiers = Vec::new();
        let mut references: Vec<ReferenceBlock> = Vec::new();
        let mut block = ReferenceBlock::new();

        for pair in self.fields[3..].chunks(2) {
            let Some((key, rest)) = pair.split_first() else {
                continue;
            };
            let key = key.trim();
            let raw_value = match rest.first() {
                Some(raw_value) => raw_value.trim(),
                None if self.options.trailing_fields == TrailingFields::Lenient => {
                    tracing::debug!(key, "ignoring trailing field without value");
                    break;
                }
                None => {
                    return Err(ParseError::DanglingField {
                        key: key.to_owned(),
                    })
                }
            };
            let value = self.values.parse_value(raw_value)?;

            if key.starts_with('P') {
                if !ids::is_valid_property_id(key) {
                    return Err(ParseError::InvalidQualifierProperty {
                        property: key.to_owned(),
                    });
                }
                qualifiers.push(Snak {
                    property: key.to_owned(),
                    value,
                });
                continue;
            }

            let key = if key.starts_with(ids::NEW_REFERENCE_BLOCK) {
                if !block.is_empty() {
                    references.push(std::mem::take(&mut block));
                }
                &key[1..]
            } else {
                key
            };
            if !ids::is_valid_source_id(key) {
                return Err(ParseError::InvalidSource {
                    key: key.to_owned(),
                });
            }
            block.push(Snak {
                property: ids::source_to_property(key),
                value,
            });
        }
        if !block.is_empty() {
            references.push(block);
        }

        Ok(CommandPayload::Statement(StatementCommand {
            action,
            entity,
            property: property.to_owned(),
            value,
            qualifiers,
            references,
        }))
    }
}

#[cfg(test)]
mod tests {
    use crate::command::{Action, CommandPayload, EntityType, TermKind};
    use crate::error::ParseError;
    use crate::options::ParserOptions;
    use crate::parser::parse_line;
    use crate::value::{V1ValueParser, Value};

    fn payload(raw: &str) -> Result<CommandPayload, ParseError> {
        parse_line(raw, &V1ValueParser, &ParserOptions::default()).map(|p| p.payload)
    }

    fn lenient(raw: &str) -> Result<CommandPayload, ParseError> {
        parse_line(raw, &V1ValueParser, &ParserOptions::lenient()).map(|p| p.payload)
    }

    fn statement(raw: &str) -> crate::command::StatementCommand {
        match payload(raw) {
            Ok(CommandPayload::Statement(s)) => s,
            other => panic!("expected statement for {:?}, got {:?}", raw, other),
        }
    }

    fn term(raw: &str) -> crate::command::TermCommand {
        match payload(raw) {
            Ok(CommandPayload::Term(t)) => t,
            other => panic!("expected term for {:?}, got {:?}", raw, other),
        }
    }

    // -- remove by id -------------------------------------------

    #[test]
    fn remove_statement_by_id_splits_entity() {
        assert_eq!(
            payload("-STATEMENT\tQ100$ABCD-1234"),
            Ok(CommandPayload::RemoveStatementById {
                id: "Q100$ABCD-1234".into(),
                entity_id: "Q100".into()
            })
        );
    }

    #[test]
    fn remove_statement_by_id_needs_one_dollar() {
        for id in ["Q100", "Q100$a$b"] {
            assert_eq!(
                payload(&format!("-STATEMENT\t{}", id)),
                Err(ParseError::StatementIdFormat { id: id.into() })
            );
        }
        assert!(matches!(
            payload("-STATEMENT"),
            Err(ParseError::ColumnCount { expected: 2, .. })
        ));
    }

    // -- statements ---------------------------------------------

    #[test]
    fn add_statement() {
        let s = statement("Q42\tP31\tQ5");
        assert_eq!(s.action, Action::Add);
        assert_eq!(s.entity.id, "Q42");
        assert_eq!(s.entity.entity_type, EntityType::Item);
        assert_eq!(s.property, "P31");
        assert_eq!(s.value, Value::EntityId("Q5".into()));
        assert!(s.qualifiers.is_empty());
        assert!(s.references.is_empty());
    }

    #[test]
    fn removal_marker_and_case_folding() {
        let s = statement("-q42\tP31\tQ5");
        assert_eq!(s.action, Action::Remove);
        assert_eq!(s.entity.id, "Q42");

        let s = statement(" last \tP31\tQ5");
        assert_eq!(s.entity.id, "LAST");
        assert_eq!(s.entity.entity_type, EntityType::Item);

        let s = statement("P17\tP1659\tP30");
        assert_eq!(s.entity.entity_type, EntityType::Property);
    }

    #[test]
    fn invalid_entity_property_and_arity() {
        assert_eq!(
            payload("X1\tP31\tQ5"),
            Err(ParseError::InvalidEntity {
                entity: "X1".into()
            })
        );
        assert_eq!(
            payload("Q1\tQ31\tQ5"),
            Err(ParseError::InvalidProperty {
                property: "Q31".into()
            })
        );
        assert_eq!(
            payload("Q1\t\tQ5"),
            Err(ParseError::InvalidProperty {
                property: String::new()
            })
        );
        assert_eq!(
            payload("Q1\tP31"),
            Err(ParseError::MissingStatementColumns { found: 2 })
        );
    }

    #[test]
    fn value_errors_surface() {
        assert!(matches!(
            payload("Q1\tP31\tnot a value"),
            Err(ParseError::Value(_))
        ));
    }

    #[test]
    fn qualifiers_and_references() {
        let s = statement(
            "Q1\tP69\tQ49088\tP580\t+1994-00-00T00:00:00Z/9\tS854\t\"http://example.org\"\tP582\t+1998-00-00T00:00:00Z/9",
        );
        let quals: Vec<_> = s.qualifiers.iter().map(|q| q.property.as_str()).collect();
        assert_eq!(quals, vec!["P580", "P582"]);
        assert_eq!(s.references.len(), 1);
        assert_eq!(s.references[0][0].property, "P854");
    }

    #[test]
    fn new_block_marker_splits_references() {
        let s = statement("Q1\tP31\tQ5\tS1\t\"a\"\t!S2\t\"b\"");
        assert_eq!(s.references.len(), 2);
        assert_eq!(s.references[0].len(), 1);
        assert_eq!(s.references[0][0].property, "P1");
        assert_eq!(s.references[1].len(), 1);
        assert_eq!(s.references[1][0].property, "P2");

        let s = statement("Q1\tP31\tQ5\tS1\t\"a\"\tS2\t\"b\"");
        assert_eq!(s.references.len(), 1);
        assert_eq!(s.references[0].len(), 2);
    }

    #[test]
    fn leading_block_marker_does_not_leave_an_empty_block() {
        let s = statement("Q1\tP31\tQ5\t!S1\t\"a\"\tS2\t\"b\"\t!S3\t\"c\"");
        assert_eq!(s.references.len(), 2);
        assert!(s.references.iter().all(|b| !b.is_empty()));
        assert_eq!(s.references[0].len(), 2);
    }

    #[test]
    fn bad_qualifier_and_source_keys() {
        assert_eq!(
            payload("Q1\tP31\tQ5\tPx\tQ1"),
            Err(ParseError::InvalidQualifierProperty {
                property: "Px".into()
            })
        );
        assert_eq!(
            payload("Q1\tP31\tQ5\tX1\tQ1"),
            Err(ParseError::InvalidSource { key: "X1".into() })
        );
    }

    #[test]
    fn dangling_trailing_field_is_strict_by_default() {
        assert_eq!(
            payload("Q1\tP31\tQ5\tP580"),
            Err(ParseError::DanglingField { key: "P580".into() })
        );
        match lenient("Q1\tP31\tQ5\tP580\t+2001-01-01T00:00:00Z\tS143") {
            Ok(CommandPayload::Statement(s)) => {
                assert_eq!(s.qualifiers.len(), 1);
                assert!(s.references.is_empty());
            }
            other => panic!("expected statement, got {:?}", other),
        }
    }

    // -- terms --------------------------------------------------

    #[test]
    fn label_alias_description() {
        let t = term("Q42\tLen\t\"Douglas Adams\"");
        assert_eq!(t.kind, TermKind::Label);
        assert_eq!(t.code, "en");
        assert_eq!(t.action, Action::Add);
        assert_eq!(t.value, Value::String("Douglas Adams".into()));

        assert_eq!(term("Q42\tAde\t\"DNA\"").kind, TermKind::Alias);
        let t = term("-Q42\tDfr\t\"écrivain\"");
        assert_eq!(t.kind, TermKind::Description);
        assert_eq!(t.action, Action::Remove);
    }

    #[test]
    fn term_value_must_be_a_string() {
        assert_eq!(
            payload("Q42\tLen\tQ5"),
            Err(ParseError::TermNotString {
                kind: TermKind::Label
            })
        );
    }

    #[test]
    fn empty_sitelink_means_remove() {
        let t = term("Q42\tSenwiki\t\"Douglas Adams\"");
        assert_eq!(t.kind, TermKind::Sitelink);
        assert_eq!(t.code, "enwiki");
        assert_eq!(t.action, Action::Add);

        let t = term("Q42\tSenwiki\t\"\"");
        assert_eq!(t.action, Action::Remove);
    }

    #[test]
    fn term_markers_only_apply_to_three_columns() {
        assert_eq!(
            payload("Q42\tLen\t\"x\"\tP1\tQ1"),
            Err(ParseError::InvalidProperty {
                property: "Len".into()
            })
        );
    }
}
