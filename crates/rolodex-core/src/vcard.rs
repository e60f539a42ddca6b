//! The contact record.
//!
//! A [`VCard`] maps [`PropertyKey`]s to [`PropertyValue`]s. It is mutated only
//! through [`VCard::set`] and [`VCard::add`]; validation and merging live in
//! [`crate::validate`] and [`crate::merge`].

use std::collections::BTreeMap;

use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::{
  Result,
  property::PropertyKey,
  value::{PropertyValue, Value},
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VCard {
  properties: BTreeMap<PropertyKey, PropertyValue>,
  changed:    bool,
}

impl VCard {
  pub fn new() -> Self { Self::default() }

  /// Store `value` under `key`, replacing whatever was there.
  ///
  /// This does not coerce multivalued keys into sequence form;
  /// [`VCard::validate`] does.
  pub fn set(&mut self, key: PropertyKey, value: impl Into<PropertyValue>) {
    self.properties.insert(key, value.into());
    self.changed = true;
  }

  /// Append `value` to a multivalued key, or set a scalar key.
  ///
  /// A multivalued key with no value yet becomes a one-element sequence; one
  /// holding a bare value is promoted to a sequence before appending.
  pub fn add(&mut self, key: PropertyKey, value: Value) {
    if key.is_multivalued() {
      match self.properties.remove(&key) {
        Some(existing) => {
          let mut values = existing.into_values();
          values.push(value);
          self.properties.insert(key, PropertyValue::Multiple(values));
        }
        None => {
          self.properties.insert(key, PropertyValue::Multiple(vec![value]));
        }
      }
    } else {
      self.properties.insert(key, PropertyValue::Single(value));
    }
    self.changed = true;
  }

  pub fn get(&self, key: PropertyKey) -> Option<&PropertyValue> {
    self.properties.get(&key)
  }

  /// All values stored under `key`; empty when the key is absent.
  pub fn values(&self, key: PropertyKey) -> &[Value] {
    match self.get(key) {
      Some(value) => value.as_slice(),
      None => &[],
    }
  }

  pub fn contains(&self, key: PropertyKey) -> bool {
    self.properties.contains_key(&key)
  }

  /// Properties in [`PropertyKey`] declaration order.
  pub fn iter(&self) -> impl Iterator<Item = (PropertyKey, &PropertyValue)> {
    self.properties.iter().map(|(k, v)| (*k, v))
  }

  pub fn len(&self) -> usize { self.properties.len() }

  pub fn is_empty(&self) -> bool { self.properties.is_empty() }

  /// The `FN` text, if it is a plain text value.
  pub fn full_name(&self) -> Option<&str> { self.text(PropertyKey::FullName) }

  /// The `UID` text, if it is a plain text value.
  pub fn uid(&self) -> Option<&str> { self.text(PropertyKey::Uid) }

  fn text(&self, key: PropertyKey) -> Option<&str> {
    self.get(key).and_then(PropertyValue::first).and_then(Value::as_text)
  }

  /// Whether [`VCard::set`] or [`VCard::add`] has run since the record was
  /// created or last marked unchanged.
  pub fn is_changed(&self) -> bool { self.changed }

  pub fn mark_unchanged(&mut self) { self.changed = false; }

  pub(crate) fn properties_mut(
    &mut self,
  ) -> &mut BTreeMap<PropertyKey, PropertyValue> {
    &mut self.properties
  }

  // ── jCard ────────────────────────────────────────────────────────────────

  /// The jCard object for this record: every permitted key, lowercased.
  pub fn to_jcard(&self) -> Result<serde_json::Value> {
    Ok(serde_json::to_value(self)?)
  }

  pub fn to_json(&self) -> Result<String> { Ok(serde_json::to_string(self)?) }
}

/// Pre-populate a record from an attribute bag. The result counts as changed
/// when the bag was non-empty.
impl FromIterator<(PropertyKey, PropertyValue)> for VCard {
  fn from_iter<I: IntoIterator<Item = (PropertyKey, PropertyValue)>>(
    iter: I,
  ) -> Self {
    let properties: BTreeMap<_, _> = iter.into_iter().collect();
    let changed = !properties.is_empty();
    Self {
      properties,
      changed,
    }
  }
}

impl Serialize for VCard {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(None)?;
    for (key, value) in self.iter().filter(|(k, _)| k.in_jcard()) {
      map.serialize_entry(key.as_str(), value)?;
    }
    map.end()
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
