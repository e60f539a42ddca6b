//! Record validation.
//!
//! Validation checks the invariants a persistable record must satisfy and
//! fills in the properties that can be generated (`UID`, `REV`). It is worth
//! running on imported records too: some exporters never write a `UID`.

use std::fmt;

use chrono::Utc;
use strum::{Display, IntoEnumIterator, IntoStaticStr};
use thiserror::Error;
use uuid::Uuid;

use crate::{
  property::PropertyKey,
  value::{Moment, PropertyValue, Value},
  vcard::VCard,
};

// ─── Error types ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum ValidationErrorKind {
  Required,
  NotAnObject,
  MissingType,
  MissingValue,
}

/// Which attribute an error refers to: a key, or one entry of a multivalued
/// key. Displays as `fn`, `tel-0`, `email-3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Locator {
  pub key:   PropertyKey,
  pub index: Option<usize>,
}

impl Locator {
  pub fn key(key: PropertyKey) -> Self { Self { key, index: None } }

  pub fn entry(key: PropertyKey, index: usize) -> Self {
    Self {
      key,
      index: Some(index),
    }
  }
}

impl fmt::Display for Locator {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.index {
      Some(i) => write!(f, "{}-{i}", self.key),
      None => write!(f, "{}", self.key),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{locator}: {kind}")]
pub struct ValidationError {
  pub locator: Locator,
  pub kind:    ValidationErrorKind,
}

/// Every problem found by one [`VCard::validate`] run, in the order found.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("vCard failed validation: {}", summary(.errors))]
pub struct ValidationErrors {
  pub errors: Vec<ValidationError>,
}

fn summary(errors: &[ValidationError]) -> String {
  errors
    .iter()
    .map(ToString::to_string)
    .collect::<Vec<_>>()
    .join(", ")
}

// ─── Validation ──────────────────────────────────────────────────────────────

impl VCard {
  /// Check this record and generate missing properties, in place.
  ///
  /// In order: `FN` must be present; multivalued keys are coerced into
  /// sequence form; every `TEL` and `EMAIL` entry must be a typed value with
  /// a type and a value; a `UID` is generated if absent; a `REV` is generated
  /// if absent. Generation happens whether or not errors were found and never
  /// replaces an existing value.
  pub fn validate(&mut self) -> Result<(), ValidationErrors> {
    let mut errors = Vec::new();

    if !self.contains(PropertyKey::FullName) {
      errors.push(ValidationError {
        locator: Locator::key(PropertyKey::FullName),
        kind:    ValidationErrorKind::Required,
      });
    }

    let properties = self.properties_mut();
    for key in PropertyKey::iter().filter(|k| k.is_multivalued()) {
      if let Some(value) = properties.remove(&key) {
        properties.insert(key, PropertyValue::Multiple(value.into_values()));
      }
    }

    for key in PropertyKey::iter().filter(|k| k.requires_type()) {
      for (index, value) in self.values(key).iter().enumerate() {
        if let Some(kind) = check_typed_entry(value) {
          errors.push(ValidationError {
            locator: Locator::entry(key, index),
            kind,
          });
        }
      }
    }

    if !self.contains(PropertyKey::Uid) {
      self.add(PropertyKey::Uid, Value::Text(generate_uid()));
    }

    if !self.contains(PropertyKey::Revision) {
      self.add(PropertyKey::Revision, Moment::from_instant(Utc::now()).into());
    }

    if errors.is_empty() {
      Ok(())
    } else {
      Err(ValidationErrors { errors })
    }
  }
}

fn check_typed_entry(value: &Value) -> Option<ValidationErrorKind> {
  let Value::Typed(typed) = value else {
    return Some(ValidationErrorKind::NotAnObject);
  };
  if typed.types.iter().all(|t| t.is_empty()) {
    Some(ValidationErrorKind::MissingType)
  } else if typed.value.is_empty() {
    Some(ValidationErrorKind::MissingValue)
  } else {
    None
  }
}

/// A random UUID in the `urn:uuid:` namespace (RFC 6350 §6.7.6).
pub fn generate_uid() -> String { Uuid::new_v4().urn().to_string() }

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;
  use crate::value::{DateAndOrTime, TypedValue};

  fn named(name: &str) -> VCard {
    let mut card = VCard::new();
    card.add(PropertyKey::FullName, name.into());
    card
  }

  #[test]
  fn missing_full_name_is_required() {
    let mut card = VCard::new();
    let err = card.validate().unwrap_err();
    assert_eq!(err.errors, [ValidationError {
      locator: Locator::key(PropertyKey::FullName),
      kind:    ValidationErrorKind::Required,
    }]);
    assert_eq!(err.errors[0].to_string(), "fn: required");
  }

  #[test]
  fn generates_uid_and_rev_without_touching_other_properties() {
    let mut card = named("John Doe");
    card.add(PropertyKey::Note, "met at the conference".into());
    card.validate().unwrap();

    let uid = card.uid().unwrap();
    assert!(uid.starts_with("urn:uuid:"), "{uid}");
    assert!(Uuid::parse_str(&uid["urn:uuid:".len()..]).is_ok());

    let Some(Value::DateAndOrTime(DateAndOrTime::Moment(rev))) =
      card.get(PropertyKey::Revision).and_then(PropertyValue::first)
    else {
      panic!("expected a generated REV moment");
    };
    let rev = rev.to_string();
    assert_eq!(rev.len(), "19700101T000000Z".len());
    assert!(!rev.contains(['-', ':', '.']), "{rev}");

    assert_eq!(card.full_name(), Some("John Doe"));
    assert_eq!(card.values(PropertyKey::Note), [Value::from(
      "met at the conference"
    )]);
    assert_eq!(card.len(), 4);
  }

  #[test]
  fn never_overwrites_existing_uid_or_rev() {
    let mut card = named("Alice");
    card.add(PropertyKey::Uid, "urn:uuid:fixed".into());
    card.add(PropertyKey::Revision, "20240101T000000Z".into());
    card.validate().unwrap();
    assert_eq!(card.uid(), Some("urn:uuid:fixed"));
    assert_eq!(
      card.get(PropertyKey::Revision).and_then(PropertyValue::first),
      Some(&Value::from("20240101T000000Z"))
    );
  }

  #[test]
  fn coerces_bare_multivalued_value_into_sequence() {
    let mut card = named("Alice");
    card.set(PropertyKey::Title, Value::from("Engineer"));
    card.validate().unwrap();
    assert_eq!(
      card.get(PropertyKey::Title),
      Some(&PropertyValue::Multiple(vec![Value::from("Engineer")]))
    );
  }

  #[test]
  fn typed_entries_are_checked_per_key() {
    let mut card = named("Alice");
    card.add(PropertyKey::Telephone, "+15555550100".into());
    card.add(
      PropertyKey::Telephone,
      TypedValue::new("").with_type("voice").into(),
    );
    card.add(PropertyKey::Email, TypedValue::new("alice@example.com").into());

    let err = card.validate().unwrap_err();
    let found: Vec<_> = err
      .errors
      .iter()
      .map(|e| (e.locator.to_string(), e.kind))
      .collect();
    assert_eq!(found, [
      ("tel-0".to_string(), ValidationErrorKind::NotAnObject),
      ("tel-1".to_string(), ValidationErrorKind::MissingValue),
      ("email-0".to_string(), ValidationErrorKind::MissingType),
    ]);
    // generation still ran
    assert!(card.uid().is_some());
    assert!(card.contains(PropertyKey::Revision));
  }

  #[test]
  fn error_kinds_display_kebab_case() {
    assert_eq!(ValidationErrorKind::NotAnObject.to_string(), "not-an-object");
    assert_eq!(ValidationErrorKind::MissingType.to_string(), "missing-type");
  }
}
