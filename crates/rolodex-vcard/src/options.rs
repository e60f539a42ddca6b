//! Parser configuration.

use serde::Deserialize;

/// What to do when `BEGIN` arrives while a card is still open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NestedBegin {
  /// Report a diagnostic, drop the unfinished card and start a new one.
  #[default]
  Discard,
  /// Abort parsing with [`crate::Error::NestedBegin`].
  Reject,
}

/// Runtime parser configuration.
///
/// Deserialisable so that an embedding application can keep it in its own
/// config file; every field has a default.
///
/// ```toml
/// nested_begin     = "reject"
/// default_tel_type = "cell"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
  pub nested_begin:      NestedBegin,
  /// `TYPE` assigned to a `TEL` that has none.
  pub default_tel_type:  String,
  /// Store properties whose raw value is empty instead of skipping them.
  pub keep_empty_values: bool,
}

impl Default for ParseOptions {
  fn default() -> Self {
    Self {
      nested_begin:      NestedBegin::default(),
      default_tel_type:  "voice".to_string(),
      keep_empty_values: false,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_fields_fall_back_to_defaults() {
    let options: ParseOptions =
      serde_json::from_str(r#"{ "nested_begin": "reject" }"#).unwrap();
    assert_eq!(options.nested_begin, NestedBegin::Reject);
    assert_eq!(options.default_tel_type, "voice");
    assert!(!options.keep_empty_values);
  }
}
