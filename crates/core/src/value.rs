//! Typed values and the value-token parser seam.
//!
//! The line parser never looks inside a value token itself. It hands the
//! token to a [`ValueParser`] and embeds whatever typed [`Value`] comes back.
//! [`V1ValueParser`] is the default implementation of the v1 value syntax.

use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use serde_json::json;

use crate::error::ValueError;
use crate::ids;

/// Concept URI prefix for entity references inside values.
pub const ENTITY_URI_PREFIX: &str = "http://www.wikidata.org/entity/";
/// Proleptic Gregorian calendar model.
pub const GREGORIAN_CALENDAR: &str = "http://www.wikidata.org/entity/Q1985727";
/// Proleptic Julian calendar model.
pub const JULIAN_CALENDAR: &str = "http://www.wikidata.org/entity/Q1985786";
/// Earth, the default globe for coordinates.
pub const EARTH_GLOBE: &str = "http://www.wikidata.org/entity/Q2";
/// Precision assigned to `@lat/lon` coordinates.
pub const COORDINATE_PRECISION: f64 = 0.000001;
/// Day precision, used when a time token carries no `/precision`.
pub const DEFAULT_TIME_PRECISION: u32 = 9;
const MAX_TIME_PRECISION: u32 = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    EntityId,
    String,
    MonolingualText,
    Time,
    GlobeCoordinate,
    Quantity,
    SomeValue,
    NoValue,
}

impl ValueKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::EntityId => "wikibase-entityid",
            ValueKind::String => "string",
            ValueKind::MonolingualText => "monolingualtext",
            ValueKind::Time => "time",
            ValueKind::GlobeCoordinate => "globecoordinate",
            ValueKind::Quantity => "quantity",
            ValueKind::SomeValue => "somevalue",
            ValueKind::NoValue => "novalue",
        }
    }
}

/// A typed value: a kind tag plus its payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Entity id, or `LAST` for the most recently created item.
    EntityId(String),
    String(String),
    MonolingualText {
        language: String,
        text: String,
    },
    Time {
        /// Signed ISO-like timestamp, e.g. `+1967-01-17T00:00:00Z`.
        time: String,
        precision: u32,
        calendar_model: &'static str,
    },
    GlobeCoordinate {
        latitude: f64,
        longitude: f64,
        precision: f64,
        globe: &'static str,
    },
    Quantity {
        amount: Decimal,
        lower_bound: Option<Decimal>,
        upper_bound: Option<Decimal>,
        /// `"1"` for unitless quantities, else the unit's concept URI.
        unit: String,
    },
    SomeValue,
    NoValue,
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::EntityId(_) => ValueKind::EntityId,
            Value::String(_) => ValueKind::String,
            Value::MonolingualText { .. } => ValueKind::MonolingualText,
            Value::Time { .. } => ValueKind::Time,
            Value::GlobeCoordinate { .. } => ValueKind::GlobeCoordinate,
            Value::Quantity { .. } => ValueKind::Quantity,
            Value::SomeValue => ValueKind::SomeValue,
            Value::NoValue => ValueKind::NoValue,
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn to_json_value(&self) -> serde_json::Value {
        let payload = match self {
            Value::EntityId(id) => json!(id),
            Value::String(s) => json!(s),
            Value::MonolingualText { language, text } => {
                json!({ "language": language, "text": text })
            }
            Value::Time {
                time,
                precision,
                calendar_model,
            } => json!({
                "time": time,
                "precision": precision,
                "calendarmodel": calendar_model,
            }),
            Value::GlobeCoordinate {
                latitude,
                longitude,
                precision,
                globe,
            } => json!({
                "latitude": latitude,
                "longitude": longitude,
                "precision": precision,
                "globe": globe,
            }),
            Value::Quantity {
                amount,
                lower_bound,
                upper_bound,
                unit,
            } => {
                let mut obj = serde_json::Map::new();
                obj.insert("amount".into(), signed_decimal(*amount).into());
                if let Some(lower) = lower_bound {
                    obj.insert("lowerBound".into(), signed_decimal(*lower).into());
                }
                if let Some(upper) = upper_bound {
                    obj.insert("upperBound".into(), signed_decimal(*upper).into());
                }
                obj.insert("unit".into(), unit.clone().into());
                serde_json::Value::Object(obj)
            }
            Value::SomeValue => json!("somevalue"),
            Value::NoValue => json!("novalue"),
        };
        json!({ "type": self.kind().as_str(), "value": payload })
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json_value().serialize(serializer)
    }
}

/// Quantity amounts always carry an explicit sign.
fn signed_decimal(d: Decimal) -> String {
    if d.is_sign_negative() && !d.is_zero() {
        d.to_string()
    } else {
        format!("+{}", d.abs())
    }
}

// ──────────────────────────────────────────────
// Parser seam
// ──────────────────────────────────────────────

/// Turns one raw value token into a typed [`Value`].
///
/// Implementations must be stateless with respect to the token stream:
/// lines may be parsed concurrently against the same parser.
pub trait ValueParser: Send + Sync {
    fn parse_value(&self, token: &str) -> Result<Value, ValueError>;
}

impl<F> ValueParser for F
where
    F: Fn(&str) -> Result<Value, ValueError> + Send + Sync,
{
    fn parse_value(&self, token: &str) -> Result<Value, ValueError> {
        self(token)
    }
}

/// The v1 value syntax.
///
/// | token                           | kind                |
/// |---------------------------------|---------------------|
/// | `somevalue` / `novalue`         | somevalue / novalue |
/// | `Q42`, `P31`, `L1-F2`, `LAST`   | wikibase-entityid   |
/// | `"text"`                        | string              |
/// | `en:"text"`                     | monolingualtext     |
/// | `+1967-01-17T00:00:00Z/11[/J]`  | time                |
/// | `@52.5/13.4`                    | globecoordinate     |
/// | `12.5~0.5U11573`, `3[2,4]`      | quantity            |
#[derive(Debug, Clone, Copy, Default)]
pub struct V1ValueParser;

static STRING_VALUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^"(.*)"$"#).expect("string value pattern"));
static MONOLINGUAL_VALUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^([a-z][a-z0-9_-]*):"(.*)"$"#).expect("monolingual value pattern")
});
static TIME_VALUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([+-]?)(\d+-\d\d-\d\dT\d\d:\d\d:\d\dZ)(?:/(\d+))?(/J)?$")
        .expect("time value pattern")
});
static COORDINATE_VALUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^@([+-]?\d+(?:\.\d+)?)/([+-]?\d+(?:\.\d+)?)$").expect("coordinate value pattern")
});
static QUANTITY_VALUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^([+-]?\d+(?:\.\d+)?)(?:~(\d+(?:\.\d+)?)|\[([+-]?\d+(?:\.\d+)?),([+-]?\d+(?:\.\d+)?)\])?(?:U(\d+))?$",
    )
    .expect("quantity value pattern")
});

impl ValueParser for V1ValueParser {
    fn parse_value(&self, token: &str) -> Result<Value, ValueError> {
        let token = token.trim();
        match token {
            "somevalue" => return Ok(Value::SomeValue),
            "novalue" => return Ok(Value::NoValue),
            _ => {}
        }
        if ids::entity_type(token).is_some() {
            return Ok(Value::EntityId(token.to_owned()));
        }
        if let Some(c) = STRING_VALUE.captures(token) {
            return Ok(Value::String(c[1].to_owned()));
        }
        if let Some(c) = MONOLINGUAL_VALUE.captures(token) {
            return Ok(Value::MonolingualText {
                language: c[1].to_owned(),
                text: c[2].to_owned(),
            });
        }
        if let Some(c) = TIME_VALUE.captures(token) {
            return parse_time(token, &c);
        }
        if let Some(c) = COORDINATE_VALUE.captures(token) {
            return parse_coordinate(token, &c);
        }
        if let Some(c) = QUANTITY_VALUE.captures(token) {
            return parse_quantity(token, &c);
        }
        Err(ValueError::Unrecognized {
            token: token.to_owned(),
        })
    }
}

fn parse_time(token: &str, c: &regex::Captures<'_>) -> Result<Value, ValueError> {
    let sign = if &c[1] == "-" { "-" } else { "+" };
    let precision = match c.get(3) {
        Some(p) => p.as_str().parse::<u32>().map_err(|e| ValueError::Number {
            token: token.to_owned(),
            number: p.as_str().to_owned(),
            reason: e.to_string(),
        })?,
        None => DEFAULT_TIME_PRECISION,
    };
    if precision > MAX_TIME_PRECISION {
        return Err(ValueError::TimePrecision {
            token: token.to_owned(),
            precision,
        });
    }
    let calendar_model = if c.get(4).is_some() {
        JULIAN_CALENDAR
    } else {
        GREGORIAN_CALENDAR
    };
    Ok(Value::Time {
        time: format!("{}{}", sign, &c[2]),
        precision,
        calendar_model,
    })
}

fn parse_coordinate(token: &str, c: &regex::Captures<'_>) -> Result<Value, ValueError> {
    let float = |s: &str| {
        s.parse::<f64>().map_err(|e| ValueError::Number {
            token: token.to_owned(),
            number: s.to_owned(),
            reason: e.to_string(),
        })
    };
    let latitude = float(&c[1])?;
    let longitude = float(&c[2])?;
    if latitude.abs() > 90.0 || longitude.abs() > 360.0 {
        return Err(ValueError::CoordinateRange {
            token: token.to_owned(),
        });
    }
    Ok(Value::GlobeCoordinate {
        latitude,
        longitude,
        precision: COORDINATE_PRECISION,
        globe: EARTH_GLOBE,
    })
}

fn parse_quantity(token: &str, c: &regex::Captures<'_>) -> Result<Value, ValueError> {
    let decimal = |s: &str| {
        Decimal::from_str(s.trim_start_matches('+')).map_err(|e| ValueError::Number {
            token: token.to_owned(),
            number: s.to_owned(),
            reason: e.to_string(),
        })
    };
    let amount = decimal(&c[1])?;
    let (lower_bound, upper_bound) = if let Some(tol) = c.get(2) {
        let tol = decimal(tol.as_str())?;
        let overflow = || ValueError::QuantityRange {
            token: token.to_owned(),
        };
        let lower = amount.checked_sub(tol).ok_or_else(overflow)?;
        let upper = amount.checked_add(tol).ok_or_else(overflow)?;
        (Some(lower), Some(upper))
    } else if let (Some(lo), Some(hi)) = (c.get(3), c.get(4)) {
        (Some(decimal(lo.as_str())?), Some(decimal(hi.as_str())?))
    } else {
        (None, None)
    };
    let unit = match c.get(5) {
        Some(u) => format!("{}Q{}", ENTITY_URI_PREFIX, u.as_str()),
        None => "1".to_owned(),
    };
    Ok(Value::Quantity {
        amount,
        lower_bound,
        upper_bound,
        unit,
    })
}
