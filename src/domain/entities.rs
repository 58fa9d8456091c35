//! Domain entities: raw and canonical character records

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::de::{self, Deserialize, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Serialize, Serializer};
use tracing::trace;

use crate::domain::error::DomainError;

/// Placeholder stored in every text field the source record did not provide.
pub const NONE: &str = "none";

const NON_BREAKING_SPACE: char = '\u{00A0}';

/// Scalar value of a raw record field.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Text(String),
    Number(f64),
}

impl RawValue {
    /// Truthiness as the dataset authors relied on it:
    /// empty strings, zero and NaN count as "not provided".
    pub fn is_truthy(&self) -> bool {
        match self {
            RawValue::Text(s) => !s.is_empty(),
            RawValue::Number(n) => *n != 0.0 && !n.is_nan(),
        }
    }

    /// Textual form of the value; numbers render without a trailing `.0`.
    pub fn to_text(&self) -> String {
        match self {
            RawValue::Text(s) => s.clone(),
            RawValue::Number(n) => n.to_string(),
        }
    }

    /// Leading-integer parse.
    ///
    /// Text: optional whitespace, optional sign, then digits; anything after
    /// the digits is ignored (`"3.7"` → 3, `"42 hp"` → 42).
    /// Numbers are truncated toward zero.
    /// Returns `None` when no integer can be read or it overflows `i64`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            RawValue::Text(s) => leading_int_regex()
                .captures(s)
                .and_then(|caps| caps.get(1))
                .and_then(|m| m.as_str().parse::<i64>().ok()),
            RawValue::Number(n) => {
                let t = n.trunc();
                if t.is_finite() && t >= i64::MIN as f64 && t <= i64::MAX as f64 {
                    Some(t as i64)
                } else {
                    None
                }
            }
        }
    }
}

fn leading_int_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*([+-]?[0-9]+)").expect("leading integer pattern"))
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

impl From<i64> for RawValue {
    fn from(n: i64) -> Self {
        RawValue::Number(n as f64)
    }
}

/// One record as found in the source file.
///
/// Keys are sanitized on insertion: a non-breaking space becomes an ordinary
/// space, so `"Home\u{00A0}Town"` and `"Home Town"` address the same field.
/// When two keys collapse to the same name the later insertion wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    fields: HashMap<String, RawValue>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, value: impl Into<RawValue>) {
        self.fields.insert(sanitize_key(key), value.into());
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: &str, value: impl Into<RawValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.fields.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn insert_json(&mut self, key: &str, value: serde_json::Value) {
        match value {
            serde_json::Value::String(s) => self.insert(key, s),
            serde_json::Value::Number(n) => match n.as_f64() {
                Some(f) => self.insert(key, f),
                None => trace!("dropping unrepresentable number in field {:?}", key),
            },
            other => trace!("dropping non-scalar field {:?}: {}", key, other),
        }
    }
}

fn sanitize_key(key: &str) -> String {
    key.replace(NON_BREAKING_SPACE, " ")
}

impl<K: AsRef<str>, V: Into<RawValue>> FromIterator<(K, V)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = RawRecord::new();
        for (k, v) in iter {
            record.insert(k.as_ref(), v);
        }
        record
    }
}

impl<'de> Deserialize<'de> for RawRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(RawRecordVisitor)
    }
}

/// Visits fields in document order; anything that is not an object
/// yields an empty record instead of an error.
struct RawRecordVisitor;

impl<'de> Visitor<'de> for RawRecordVisitor {
    type Value = RawRecord;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a character record")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<RawRecord, A::Error> {
        let mut record = RawRecord::new();
        while let Some((key, value)) = map.next_entry::<String, serde_json::Value>()? {
            record.insert_json(&key, value);
        }
        Ok(record)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<RawRecord, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(RawRecord::new())
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<RawRecord, E> {
        Ok(RawRecord::new())
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<RawRecord, E> {
        Ok(RawRecord::new())
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<RawRecord, E> {
        Ok(RawRecord::new())
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<RawRecord, E> {
        Ok(RawRecord::new())
    }

    fn visit_str<E: de::Error>(self, _: &str) -> Result<RawRecord, E> {
        Ok(RawRecord::new())
    }

    fn visit_unit<E: de::Error>(self) -> Result<RawRecord, E> {
        Ok(RawRecord::new())
    }

    fn visit_none<E: de::Error>(self) -> Result<RawRecord, E> {
        Ok(RawRecord::new())
    }
}

/// Canonical character record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Character {
    pub name: String,
    /// Canonical settlement, or the exclusion sentinel once selection ran.
    pub location: String,
    pub race: String,
    pub gender: String,
    pub class: String,
    pub morality: String,
    pub aggression: String,
    #[serde(serialize_with = "serialize_factions")]
    pub faction: Option<Vec<String>>,
    pub skill: String,
    /// `None` when the source value was missing or not numeric.
    pub health: Option<i64>,
    pub magicka: Option<i64>,
    pub stamina: Option<i64>,
}

fn serialize_factions<S: Serializer>(
    faction: &Option<Vec<String>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match faction {
        Some(list) => list.serialize(serializer),
        None => serializer.serialize_str(NONE),
    }
}

impl Character {
    /// Value of the grouping dimension for this character.
    pub fn attribute(&self, attribute: GroupingAttribute) -> &str {
        match attribute {
            GroupingAttribute::Race => &self.race,
            GroupingAttribute::Class => &self.class,
            GroupingAttribute::Skill => &self.skill,
            GroupingAttribute::Aggression => &self.aggression,
            GroupingAttribute::Morality => &self.morality,
        }
    }

    pub fn stat(&self, stat: StatAttribute) -> Option<i64> {
        match stat {
            StatAttribute::Health => self.health,
            StatAttribute::Magicka => self.magicka,
            StatAttribute::Stamina => self.stamina,
        }
    }
}

/// Character field used as the level-2 grouping key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupingAttribute {
    Race,
    Class,
    Skill,
    Aggression,
    Morality,
}

impl GroupingAttribute {
    pub const ALL: [GroupingAttribute; 5] = [
        GroupingAttribute::Race,
        GroupingAttribute::Class,
        GroupingAttribute::Skill,
        GroupingAttribute::Aggression,
        GroupingAttribute::Morality,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            GroupingAttribute::Race => "race",
            GroupingAttribute::Class => "class",
            GroupingAttribute::Skill => "skill",
            GroupingAttribute::Aggression => "aggression",
            GroupingAttribute::Morality => "morality",
        }
    }
}

impl fmt::Display for GroupingAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupingAttribute {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| DomainError::UnknownAttribute {
                kind: "grouping",
                value: s.to_string(),
            })
    }
}

/// Numeric field carried by leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatAttribute {
    Health,
    Magicka,
    Stamina,
}

impl StatAttribute {
    pub const ALL: [StatAttribute; 3] = [
        StatAttribute::Health,
        StatAttribute::Magicka,
        StatAttribute::Stamina,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StatAttribute::Health => "health",
            StatAttribute::Magicka => "magicka",
            StatAttribute::Stamina => "stamina",
        }
    }

    /// Upper-case label used in chart titles.
    pub fn label(self) -> String {
        self.as_str().to_uppercase()
    }
}

impl fmt::Display for StatAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatAttribute {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| DomainError::UnknownAttribute {
                kind: "stat",
                value: s.to_string(),
            })
    }
}
