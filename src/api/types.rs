//! Records returned by the API.
//!
//! The API's schema is loose and changes over time, so records keep the raw
//! JSON object and expose typed accessors for the fields the UI uses.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Shown when a victim record carries no sector.
pub const SECTOR_UNKNOWN: &str = "Not informed";

/// A published victim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Victim(Map<String, Value>);

impl Victim {
  pub fn name(&self) -> &str {
    str_field(&self.0, "victim")
  }

  pub fn group(&self) -> &str {
    str_field(&self.0, "group")
  }

  /// Sector, if the record has a non-empty one.
  pub fn sector(&self) -> Option<&str> {
    Some(str_field(&self.0, "sector")).filter(|s| !s.is_empty())
  }

  pub fn attack_date(&self) -> &str {
    str_field(&self.0, "attackdate")
  }

  pub fn country(&self) -> &str {
    str_field(&self.0, "country")
  }

  /// Whether `field` holds a truthy value (see [`is_truthy`]).
  pub fn has(&self, field: &str) -> bool {
    self.0.get(field).is_some_and(is_truthy)
  }

  pub fn fields(&self) -> &Map<String, Value> {
    &self.0
  }

  /// Field/value pairs for the detail view, with the sector always present.
  pub fn detail_rows(&self) -> Vec<(String, String)> {
    let mut rows: Vec<(String, String)> = self
      .0
      .iter()
      .map(|(k, v)| (k.clone(), display_value(v)))
      .collect();

    match rows.iter_mut().find(|(k, _)| k == "sector") {
      Some((_, value)) if value.is_empty() || value == "null" => {
        *value = SECTOR_UNKNOWN.to_string();
      }
      Some(_) => {}
      None => rows.push(("sector".to_string(), SECTOR_UNKNOWN.to_string())),
    }
    rows
  }
}

/// A ransomware group as listed by `/groups`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Group(Map<String, Value>);

impl Group {
  pub fn name(&self) -> &str {
    str_field(&self.0, "name")
  }

  pub fn description(&self) -> &str {
    str_field(&self.0, "description")
  }

  /// Onion link, or "N/A" when the group has none.
  pub fn onion(&self) -> &str {
    Some(str_field(&self.0, "onion"))
      .filter(|s| !s.is_empty())
      .unwrap_or("N/A")
  }
}

/// Everything `/group/{name}` knows about a group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupDetails(Map<String, Value>);

impl GroupDetails {
  /// Accepts an object, or an array whose first element is an object.
  pub fn from_value(value: Value) -> Option<Self> {
    match value {
      Value::Object(map) => Some(Self(map)),
      Value::Array(items) => items.into_iter().find_map(|item| match item {
        Value::Object(map) => Some(Self(map)),
        _ => None,
      }),
      _ => None,
    }
  }

  pub fn rows(&self) -> Vec<(String, String)> {
    self
      .0
      .iter()
      .map(|(k, v)| (k.clone(), display_value(v)))
      .collect()
  }
}

fn str_field<'a>(map: &'a Map<String, Value>, field: &str) -> &'a str {
  map.get(field).and_then(Value::as_str).unwrap_or("")
}

/// Render a value for display: strings as-is, everything else as JSON.
pub fn display_value(value: &Value) -> String {
  match value {
    Value::String(s) => s.clone(),
    other => other.to_string(),
  }
}

/// JSON truthiness: null, false, 0, "" and empty containers are false.
pub fn is_truthy(value: &Value) -> bool {
  match value {
    Value::Null => false,
    Value::Bool(b) => *b,
    Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
    Value::String(s) => !s.is_empty(),
    Value::Array(a) => !a.is_empty(),
    Value::Object(o) => !o.is_empty(),
  }
}
