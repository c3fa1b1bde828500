//! Maps a payload's (action, what, type) to its refined [`Operation`] tag.

use crate::command::{Action, CommandPayload, EntityType, Operation, TermKind, What};

/// Refined operation for a parsed payload, if its action has one.
pub fn operation_for(payload: &CommandPayload) -> Option<Operation> {
    classify(
        payload.action(),
        payload.what(),
        payload.entity_type(),
        payload.has_statement_id(),
    )
}

/// Adding terms or statements and merging carry no refined tag.
pub fn classify(
    action: Action,
    what: Option<What>,
    entity_type: Option<EntityType>,
    has_statement_id: bool,
) -> Option<Operation> {
    match (action, what, entity_type) {
        (Action::Add, Some(What::Term(TermKind::Sitelink)), _) => Some(Operation::SetSitelink),
        (Action::Remove, Some(What::Statement), _) if has_statement_id => {
            Some(Operation::RemoveStatementById)
        }
        (Action::Remove, Some(What::Statement), _) => Some(Operation::RemoveStatementByValue),
        (Action::Remove, Some(What::Term(TermKind::Sitelink)), _) => {
            Some(Operation::RemoveSitelink)
        }
        (Action::Create, _, Some(EntityType::Item)) => Some(Operation::CreateItem),
        (Action::Create, _, Some(EntityType::Property)) => Some(Operation::CreateProperty),
        _ => None,
    }
}
