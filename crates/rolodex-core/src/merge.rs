//! Combining two records that describe the same entity (RFC 6350 §7).

use crate::{
  Error, Result,
  property::PropertyKey,
  value::PropertyValue,
  vcard::VCard,
};

impl VCard {
  /// Merge `self` with `other` into a new record; neither input is touched.
  ///
  /// A key present on one side only is copied as is. A key present on both
  /// sides with equal values keeps one copy; a single value and a
  /// one-element sequence holding it count as equal. A key whose values differ
  /// becomes a sequence holding `self`'s values followed by `other`'s.
  ///
  /// The result is not validated.
  ///
  /// # Errors
  ///
  /// [`Error::UidMismatch`] when both records carry a `UID` and they differ.
  pub fn merge(&self, other: &VCard) -> Result<VCard> {
    if let (Some(left), Some(right)) =
      (self.get(PropertyKey::Uid), other.get(PropertyKey::Uid))
      && left.as_slice() != right.as_slice()
    {
      return Err(Error::UidMismatch {
        left:  uid_text(left),
        right: uid_text(right),
      });
    }

    let mut merged = VCard::new();
    let mut keys: Vec<PropertyKey> =
      self.iter().chain(other.iter()).map(|(k, _)| k).collect();
    keys.sort();
    keys.dedup();

    for key in keys {
      let value = match (self.get(key), other.get(key)) {
        (Some(left), Some(right)) if left.as_slice() == right.as_slice() => {
          left.clone()
        }
        (Some(left), Some(right)) => {
          let mut values = left.clone().into_values();
          values.extend(right.clone().into_values());
          PropertyValue::Multiple(values)
        }
        (Some(only), None) | (None, Some(only)) => only.clone(),
        (None, None) => continue,
      };
      merged.set(key, value);
    }

    Ok(merged)
  }
}

fn uid_text(value: &PropertyValue) -> String {
  value
    .first()
    .and_then(|v| v.as_text())
    .map_or_else(|| format!("{value:?}"), str::to_string)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
