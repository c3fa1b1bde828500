//! Identifier shapes: entity ids, property ids, source ids.

use std::cmp::Ordering;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::command::EntityType;

/// Placeholder for the item created by the most recent `CREATE` in the batch.
pub const LAST_ITEM: &str = "LAST";
/// Marker that opens a new OR-alternative reference block, e.g. `!S248`.
pub const NEW_REFERENCE_BLOCK: &str = "!S";

static ITEM_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^Q\d+$").expect("item id pattern"));
static PROPERTY_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^P\d+$").expect("property id pattern"));
static SOURCE_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^S\d+$").expect("source id pattern"));
static LEXEME_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^L\d+$").expect("lexeme id pattern"));
static FORM_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^L\d+-F\d+$").expect("form id pattern"));
static SENSE_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^L\d+-S\d+$").expect("sense id pattern"));
static MEDIAINFO_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^M\d+$").expect("mediainfo id pattern"));

/// Entity type implied by the shape of `id`, or `None` for anything else.
pub fn entity_type(id: &str) -> Option<EntityType> {
    if id == LAST_ITEM || ITEM_ID.is_match(id) {
        Some(EntityType::Item)
    } else if PROPERTY_ID.is_match(id) {
        Some(EntityType::Property)
    } else if LEXEME_ID.is_match(id) {
        Some(EntityType::Lexeme)
    } else if FORM_ID.is_match(id) {
        Some(EntityType::Form)
    } else if SENSE_ID.is_match(id) {
        Some(EntityType::Sense)
    } else if MEDIAINFO_ID.is_match(id) {
        Some(EntityType::MediaInfo)
    } else {
        None
    }
}

pub fn is_valid_property_id(id: &str) -> bool {
    PROPERTY_ID.is_match(id)
}

pub fn is_valid_source_id(id: &str) -> bool {
    SOURCE_ID.is_match(id)
}

/// `S248` -> `P248`. Callers validate with [`is_valid_source_id`] first.
pub fn source_to_property(source: &str) -> String {
    format!("P{}", &source[1..])
}

/// Numeric part of an id, compared by value at any length.
///
/// Holds the digits with leading zeros stripped, so ordering by length and
/// then lexically is numeric ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IdNumber<'a>(&'a str);

impl<'a> IdNumber<'a> {
    /// Canonical decimal digits, `""` for zero.
    pub fn digits(&self) -> &'a str {
        self.0
    }
}

impl Ord for IdNumber<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(other.0))
    }
}

impl PartialOrd for IdNumber<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Numeric part of an item id such as `Q42`: everything after the first
/// character, which must be ASCII digits.
pub fn numeric_suffix(id: &str) -> Option<IdNumber<'_>> {
    let mut chars = id.chars();
    chars.next()?;
    let digits = chars.as_str();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(IdNumber(digits.trim_start_matches('0')))
}
