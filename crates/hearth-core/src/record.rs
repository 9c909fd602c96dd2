//! Record — one family-member entry.
//!
//! The wire shape is the one the hosted mock API speaks: camelCase keys, a
//! string `id` assigned by the store, and an `age` that may arrive as either a
//! JSON string or a number. Age is held as opaque text; nothing here parses it.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use strum::{AsRefStr, EnumIter, IntoEnumIterator};

// ─── Identifier ──────────────────────────────────────────────────────────────

/// Sentinel identifier meaning "this record does not exist remotely yet".
pub const NEW_RECORD_ID: &str = "0";

/// Store-assigned record identifier.
///
/// The default value is the sentinel [`NEW_RECORD_ID`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
  pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }

  /// The "not yet created" identifier.
  pub fn sentinel() -> Self { Self(NEW_RECORD_ID.to_owned()) }

  pub fn is_sentinel(&self) -> bool { self.0 == NEW_RECORD_ID }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl Default for RecordId {
  fn default() -> Self { Self::sentinel() }
}

impl fmt::Display for RecordId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for RecordId {
  fn from(s: &str) -> Self { Self(s.to_owned()) }
}

impl From<String> for RecordId {
  fn from(s: String) -> Self { Self(s) }
}

impl<'de> Deserialize<'de> for RecordId {
  fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
    text_or_number(d).map(Self)
  }
}

// ─── Fields ──────────────────────────────────────────────────────────────────

/// The four user-editable fields of a record, in display order.
///
/// `as_ref()` yields the wire key (`firstName`, …), which is also the suffix
/// of a rendered cell id.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, AsRefStr,
)]
#[strum(serialize_all = "camelCase")]
pub enum Field {
  FirstName,
  LastName,
  Age,
  Relationship,
}

impl Field {
  /// Column heading / input label.
  pub fn label(self) -> &'static str {
    match self {
      Field::FirstName => "First Name",
      Field::LastName => "Last Name",
      Field::Age => "Age",
      Field::Relationship => "Relationship",
    }
  }

  pub fn all() -> impl Iterator<Item = Field> { Field::iter() }
}

/// A record without identity: the create request body, and the contents of
/// the input dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordFields {
  #[serde(default)]
  pub first_name:   String,
  #[serde(default)]
  pub last_name:    String,
  #[serde(default, deserialize_with = "text_or_number")]
  pub age:          String,
  #[serde(default)]
  pub relationship: String,
}

impl RecordFields {
  pub fn get(&self, field: Field) -> &str {
    match field {
      Field::FirstName => &self.first_name,
      Field::LastName => &self.last_name,
      Field::Age => &self.age,
      Field::Relationship => &self.relationship,
    }
  }

  pub fn get_mut(&mut self, field: Field) -> &mut String {
    match field {
      Field::FirstName => &mut self.first_name,
      Field::LastName => &mut self.last_name,
      Field::Age => &mut self.age,
      Field::Relationship => &mut self.relationship,
    }
  }

  /// Attach an identity, producing a full record.
  pub fn with_id(self, id: RecordId) -> Record {
    Record {
      first_name: self.first_name,
      last_name: self.last_name,
      age: self.age,
      relationship: self.relationship,
      id,
    }
  }
}

// ─── Record ──────────────────────────────────────────────────────────────────

/// One stored family member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
  #[serde(default)]
  pub first_name:   String,
  #[serde(default)]
  pub last_name:    String,
  #[serde(default, deserialize_with = "text_or_number")]
  pub age:          String,
  #[serde(default)]
  pub relationship: String,
  pub id:           RecordId,
}

impl Record {
  pub fn get(&self, field: Field) -> &str {
    match field {
      Field::FirstName => &self.first_name,
      Field::LastName => &self.last_name,
      Field::Age => &self.age,
      Field::Relationship => &self.relationship,
    }
  }

  /// Copy out the editable part of the record.
  pub fn fields(&self) -> RecordFields {
    RecordFields {
      first_name:   self.first_name.clone(),
      last_name:    self.last_name.clone(),
      age:          self.age.clone(),
      relationship: self.relationship.clone(),
    }
  }

  /// Element id of the cell showing `field` for this record: `{id}-{field}`.
  pub fn cell_id(&self, field: Field) -> String {
    format!("{}-{}", self.id, field.as_ref())
  }
}

// ─── Loose scalars ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
  Text(String),
  Number(serde_json::Number),
}

/// Accept a JSON string or number and keep it as text.
fn text_or_number<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
  Ok(match Loose::deserialize(d)? {
    Loose::Text(s) => s,
    Loose::Number(n) => n.to_string(),
  })
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn deserialises_mockapi_shape() {
    let raw = json!({
      "firstName": "Ada",
      "lastName": "Byron",
      "age": "36",
      "relationship": "Aunt",
      "id": "7",
    });
    let record: Record = serde_json::from_value(raw).unwrap();
    assert_eq!(record.first_name, "Ada");
    assert_eq!(record.age, "36");
    assert_eq!(record.id, RecordId::new("7"));
  }

  #[test]
  fn numeric_age_and_id_are_kept_as_text() {
    let raw = json!({
      "firstName": "Ada",
      "lastName": "Byron",
      "age": 36,
      "relationship": "Aunt",
      "id": 7,
    });
    let record: Record = serde_json::from_value(raw).unwrap();
    assert_eq!(record.age, "36");
    assert_eq!(record.id.as_str(), "7");
  }

  #[test]
  fn missing_fields_default_to_empty() {
    let record: Record = serde_json::from_value(json!({ "id": "3" })).unwrap();
    assert_eq!(record.fields(), RecordFields::default());
  }

  #[test]
  fn create_body_has_no_id() {
    let fields = RecordFields {
      first_name:   "Ada".into(),
      last_name:    "Byron".into(),
      age:          "36".into(),
      relationship: "Aunt".into(),
    };
    let body = serde_json::to_value(&fields).unwrap();
    assert!(body.get("id").is_none());
    assert_eq!(body["firstName"], "Ada");
    assert_eq!(body["age"], "36");
  }

  #[test]
  fn sentinel_is_default_id() {
    assert!(RecordId::default().is_sentinel());
    assert!(RecordId::from("0").is_sentinel());
    assert!(!RecordId::from("10").is_sentinel());
  }

  #[test]
  fn cell_ids_use_wire_keys() {
    let record = RecordFields::default().with_id(RecordId::new("12"));
    let ids: Vec<_> = Field::all().map(|f| record.cell_id(f)).collect();
    assert_eq!(ids, [
      "12-firstName",
      "12-lastName",
      "12-age",
      "12-relationship"
    ]);
  }
}
