//! Structured command payloads produced by the line parser.
//!
//! The JSON produced by [`CommandPayload::to_json_value`] keeps the layout the
//! batch store and the executors already read, so field names here follow
//! that wire format rather than Rust naming.

use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::{json, Map};

use crate::value::Value;

// ──────────────────────────────────────────────
// Classification enums
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Create,
    Add,
    Remove,
    Merge,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Add => "add",
            Action::Remove => "remove",
            Action::Merge => "merge",
        }
    }
}

/// Refined operation tag, a stable label for downstream executors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateItem,
    CreateProperty,
    SetSitelink,
    RemoveSitelink,
    RemoveStatementById,
    RemoveStatementByValue,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::CreateItem => "create_item",
            Operation::CreateProperty => "create_property",
            Operation::SetSitelink => "set_sitelink",
            Operation::RemoveSitelink => "remove_sitelink",
            Operation::RemoveStatementById => "remove_statement_by_id",
            Operation::RemoveStatementByValue => "remove_statement_by_value",
        }
    }
}

/// What a command touches, as the classifier sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum What {
    Statement,
    Term(TermKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityType {
    Item,
    Property,
    Lexeme,
    Form,
    Sense,
    MediaInfo,
}

impl EntityType {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityType::Item => "item",
            EntityType::Property => "property",
            EntityType::Lexeme => "lexeme",
            EntityType::Form => "form",
            EntityType::Sense => "sense",
            EntityType::MediaInfo => "mediainfo",
        }
    }
}

// `as_str` is the only spelling of each tag; serde goes through it.
macro_rules! serialize_as_str {
    ($($ty:ty),+) => {
        $(
            impl Serialize for $ty {
                fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    serializer.serialize_str(self.as_str())
                }
            }
        )+
    };
}

serialize_as_str!(Action, Operation, EntityType);

/// Term kinds addressed by the single-letter markers `L`, `D`, `A`, `S`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TermKind {
    Label,
    Description,
    Alias,
    Sitelink,
}

impl TermKind {
    pub fn from_marker(marker: char) -> Option<TermKind> {
        match marker {
            'L' => Some(TermKind::Label),
            'D' => Some(TermKind::Description),
            'A' => Some(TermKind::Alias),
            'S' => Some(TermKind::Sitelink),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TermKind::Label => "label",
            TermKind::Description => "description",
            TermKind::Alias => "alias",
            TermKind::Sitelink => "sitelink",
        }
    }
}

impl fmt::Display for TermKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ──────────────────────────────────────────────
// Property datatypes
// ──────────────────────────────────────────────

/// Datatypes accepted by `CREATE_PROPERTY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Datatype {
    CommonsMedia,
    GlobeCoordinate,
    WikibaseItem,
    WikibaseProperty,
    String,
    MonolingualText,
    ExternalId,
    Quantity,
    Time,
    Url,
    Math,
    GeoShape,
    MusicalNotation,
    TabularData,
    WikibaseLexeme,
    WikibaseForm,
    WikibaseSense,
}

impl Datatype {
    pub const ALL: [Datatype; 17] = [
        Datatype::CommonsMedia,
        Datatype::GlobeCoordinate,
        Datatype::WikibaseItem,
        Datatype::WikibaseProperty,
        Datatype::String,
        Datatype::MonolingualText,
        Datatype::ExternalId,
        Datatype::Quantity,
        Datatype::Time,
        Datatype::Url,
        Datatype::Math,
        Datatype::GeoShape,
        Datatype::MusicalNotation,
        Datatype::TabularData,
        Datatype::WikibaseLexeme,
        Datatype::WikibaseForm,
        Datatype::WikibaseSense,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Datatype::CommonsMedia => "commonsMedia",
            Datatype::GlobeCoordinate => "globe-coordinate",
            Datatype::WikibaseItem => "wikibase-item",
            Datatype::WikibaseProperty => "wikibase-property",
            Datatype::String => "string",
            Datatype::MonolingualText => "monolingualtext",
            Datatype::ExternalId => "external-id",
            Datatype::Quantity => "quantity",
            Datatype::Time => "time",
            Datatype::Url => "url",
            Datatype::Math => "math",
            Datatype::GeoShape => "geo-shape",
            Datatype::MusicalNotation => "musical-notation",
            Datatype::TabularData => "tabular-data",
            Datatype::WikibaseLexeme => "wikibase-lexeme",
            Datatype::WikibaseForm => "wikibase-form",
            Datatype::WikibaseSense => "wikibase-sense",
        }
    }

    /// Exact, case-sensitive lookup.
    pub fn from_identifier(s: &str) -> Option<Datatype> {
        Datatype::ALL.into_iter().find(|d| d.as_str() == s)
    }

    /// Comma-separated allow-list, for error messages.
    pub fn allowed_list() -> String {
        Datatype::ALL
            .iter()
            .map(|d| d.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Datatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ──────────────────────────────────────────────
// Payloads
// ──────────────────────────────────────────────

/// A (property, value) pair, used for qualifiers and reference entries.
#[derive(Debug, Clone, PartialEq)]
pub struct Snak {
    pub property: String,
    pub value: Value,
}

impl Snak {
    fn to_json_value(&self) -> serde_json::Value {
        json!({
            "property": self.property,
            "value": self.value.to_json_value(),
        })
    }
}

/// One OR-alternative reference: its entries are AND-ed together.
pub type ReferenceBlock = Vec<Snak>;

#[derive(Debug, Clone, PartialEq)]
pub struct EntityRef {
    pub entity_type: EntityType,
    pub id: String,
}

/// Add or remove a statement by value.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementCommand {
    pub action: Action,
    pub entity: EntityRef,
    pub property: String,
    pub value: Value,
    /// Empty when the line carried no qualifiers.
    pub qualifiers: Vec<Snak>,
    /// Empty when the line carried no references; never holds an empty block.
    pub references: Vec<ReferenceBlock>,
}

/// Add or remove a label, alias, description or sitelink.
#[derive(Debug, Clone, PartialEq)]
pub struct TermCommand {
    pub action: Action,
    pub kind: TermKind,
    pub item: String,
    pub value: Value,
    /// Language code, or site code for sitelinks.
    pub code: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CommandPayload {
    CreateItem,
    CreateProperty {
        datatype: Datatype,
    },
    Merge {
        item1: String,
        item2: String,
    },
    RemoveStatementById {
        id: String,
        entity_id: String,
    },
    Term(TermCommand),
    Statement(StatementCommand),
}

impl CommandPayload {
    pub fn action(&self) -> Action {
        match self {
            CommandPayload::CreateItem | CommandPayload::CreateProperty { .. } => Action::Create,
            CommandPayload::Merge { .. } => Action::Merge,
            CommandPayload::RemoveStatementById { .. } => Action::Remove,
            CommandPayload::Term(t) => t.action,
            CommandPayload::Statement(s) => s.action,
        }
    }

    pub fn what(&self) -> Option<What> {
        match self {
            CommandPayload::CreateItem
            | CommandPayload::CreateProperty { .. }
            | CommandPayload::Merge { .. } => None,
            CommandPayload::RemoveStatementById { .. } | CommandPayload::Statement(_) => {
                Some(What::Statement)
            }
            CommandPayload::Term(t) => Some(What::Term(t.kind)),
        }
    }

    /// The `type` of the payload: the created or merged entity type, or the
    /// statement subject's type. Unknown for remove-by-id and term commands.
    pub fn entity_type(&self) -> Option<EntityType> {
        match self {
            CommandPayload::CreateItem | CommandPayload::Merge { .. } => Some(EntityType::Item),
            CommandPayload::CreateProperty { .. } => Some(EntityType::Property),
            CommandPayload::Statement(s) => Some(s.entity.entity_type),
            CommandPayload::RemoveStatementById { .. } | CommandPayload::Term(_) => None,
        }
    }

    /// Whether the payload addresses a statement by its GUID.
    pub fn has_statement_id(&self) -> bool {
        matches!(self, CommandPayload::RemoveStatementById { .. })
    }

    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            CommandPayload::CreateItem => json!({ "action": "create", "type": "item" }),
            CommandPayload::CreateProperty { datatype } => json!({
                "action": "create",
                "type": "property",
                "data": datatype.as_str(),
            }),
            CommandPayload::Merge { item1, item2 } => json!({
                "action": "merge",
                "type": "item",
                "item1": item1,
                "item2": item2,
            }),
            CommandPayload::RemoveStatementById { id, entity_id } => json!({
                "action": "remove",
                "what": "statement",
                "id": id,
                "entity": { "id": entity_id },
            }),
            CommandPayload::Term(t) => {
                let code_key = if t.kind == TermKind::Sitelink {
                    "site"
                } else {
                    "language"
                };
                let mut obj = Map::new();
                obj.insert("action".into(), t.action.as_str().into());
                obj.insert("what".into(), t.kind.as_str().into());
                obj.insert("item".into(), t.item.clone().into());
                obj.insert("value".into(), t.value.to_json_value());
                obj.insert(code_key.into(), t.code.clone().into());
                serde_json::Value::Object(obj)
            }
            CommandPayload::Statement(s) => {
                let mut obj = Map::new();
                obj.insert("action".into(), s.action.as_str().into());
                obj.insert("what".into(), "statement".into());
                obj.insert(
                    "entity".into(),
                    json!({ "type": s.entity.entity_type.as_str(), "id": s.entity.id }),
                );
                obj.insert("property".into(), s.property.clone().into());
                obj.insert("value".into(), s.value.to_json_value());
                if !s.qualifiers.is_empty() {
                    let quals = s.qualifiers.iter().map(Snak::to_json_value).collect();
                    obj.insert("qualifiers".into(), serde_json::Value::Array(quals));
                }
                if !s.references.is_empty() {
                    let refs = s
                        .references
                        .iter()
                        .map(|block| {
                            serde_json::Value::Array(block.iter().map(Snak::to_json_value).collect())
                        })
                        .collect();
                    obj.insert("references".into(), serde_json::Value::Array(refs));
                }
                serde_json::Value::Object(obj)
            }
        }
    }
}

impl Serialize for CommandPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json_value().serialize(serializer)
    }
}
