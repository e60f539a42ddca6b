//! The closed set of vCard properties a [`crate::VCard`] can hold.
//!
//! Every table the parser and validator consult (cardinality, which keys need
//! a `TYPE`, which keys appear in jCard output) is an exhaustive `match` on
//! [`PropertyKey`], so adding a key forces every table to be revisited.

use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

// ─── Keys ────────────────────────────────────────────────────────────────────

/// A property name from RFC 6350 §6.
///
/// Parses case-insensitively from the vCard property name (`"TEL"`, `"tel"`)
/// and displays as the lowercase jCard key.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Display,
  EnumIter,
  EnumString,
  IntoStaticStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum PropertyKey {
  /// `FN` (§6.2.1).
  #[strum(serialize = "fn")]
  FullName,
  /// `N` (§6.2.2).
  #[strum(serialize = "n")]
  Name,
  Nickname,
  Photo,
  #[strum(serialize = "bday")]
  Birthday,
  Anniversary,
  Gender,
  #[strum(serialize = "adr")]
  Address,
  #[strum(serialize = "tel")]
  Telephone,
  Email,
  Impp,
  #[strum(serialize = "lang")]
  Language,
  #[strum(serialize = "tz")]
  Timezone,
  Geo,
  Title,
  Role,
  Logo,
  #[strum(serialize = "org")]
  Organization,
  Member,
  Related,
  Categories,
  Note,
  #[strum(serialize = "prodid")]
  ProductId,
  #[strum(serialize = "rev")]
  Revision,
  Sound,
  Uid,
  Url,
  Kind,
  Version,
}

/// How many values a property may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
  /// At most one value; a second assignment replaces the first.
  Scalar,
  /// An ordered sequence; assignments append.
  Multivalued,
}

impl PropertyKey {
  /// The lowercase jCard key, e.g. `"tel"`.
  pub fn as_str(self) -> &'static str { self.into() }

  pub fn cardinality(self) -> Cardinality {
    use PropertyKey::*;
    match self {
      Address | Telephone | Email | Impp | Language | Geo | Title | Role
      | Logo | Organization | Member | Related | Categories | Note | Url => {
        Cardinality::Multivalued
      }
      FullName | Name | Nickname | Photo | Birthday | Anniversary | Gender
      | Timezone | ProductId | Revision | Sound | Uid | Kind | Version => {
        Cardinality::Scalar
      }
    }
  }

  pub fn is_multivalued(self) -> bool {
    self.cardinality() == Cardinality::Multivalued
  }

  /// Keys whose entries must be typed compounds with a non-empty `TYPE` and
  /// value to pass validation.
  pub fn requires_type(self) -> bool {
    matches!(self, PropertyKey::Telephone | PropertyKey::Email)
  }

  /// Whether the key is emitted by [`crate::VCard::to_jcard`]. `VERSION`
  /// describes the encoding, not the contact, and is left out.
  pub fn in_jcard(self) -> bool { !matches!(self, PropertyKey::Version) }
}

// ─── Well-known TYPE values ──────────────────────────────────────────────────

/// `TYPE` values for `TEL` (§6.4.1).
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, AsRefStr, Display, EnumIter, EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TelType {
  Text,
  Voice,
  Fax,
  Cell,
  Video,
  Pager,
  Textphone,
}

/// `TYPE` values for `RELATED` (§6.6.6).
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, AsRefStr, Display, EnumIter, EnumString,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum RelatedType {
  Contact,
  Acquaintance,
  Friend,
  Met,
  CoWorker,
  Colleague,
  CoResident,
  Neighbor,
  Child,
  Parent,
  Sibling,
  Spouse,
  Kin,
  Muse,
  Crush,
  Date,
  Sweetheart,
  Me,
  Agent,
  Emergency,
}

/// Common `TYPE` values for `EMAIL`. RFC 6350 defines none beyond `work` and
/// `home`; `internet` is what most exporters emit.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, AsRefStr, Display, EnumIter, EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum EmailType {
  Work,
  Home,
  Internet,
}

/// `TYPE` values for `LANG`.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, AsRefStr, Display, EnumIter, EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LangType {
  Work,
  Home,
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::str::FromStr;

  use strum::IntoEnumIterator;

  use super::*;

  #[test]
  fn keys_parse_case_insensitively() {
    assert_eq!(PropertyKey::from_str("TEL").unwrap(), PropertyKey::Telephone);
    assert_eq!(PropertyKey::from_str("fn").unwrap(), PropertyKey::FullName);
    assert_eq!(PropertyKey::from_str("Bday").unwrap(), PropertyKey::Birthday);
    assert!(PropertyKey::from_str("X-FOO").is_err());
  }

  #[test]
  fn every_key_round_trips_through_its_name() {
    for key in PropertyKey::iter() {
      assert_eq!(PropertyKey::from_str(key.as_str()).unwrap(), key);
      assert_eq!(key.to_string(), key.as_str());
    }
  }

  #[test]
  fn multivalued_table() {
    for key in [
      PropertyKey::Email,
      PropertyKey::Telephone,
      PropertyKey::Geo,
      PropertyKey::Title,
      PropertyKey::Role,
      PropertyKey::Logo,
      PropertyKey::Organization,
      PropertyKey::Member,
      PropertyKey::Related,
      PropertyKey::Categories,
      PropertyKey::Note,
    ] {
      assert!(key.is_multivalued(), "{key} should be multivalued");
    }
    for key in [
      PropertyKey::FullName,
      PropertyKey::Uid,
      PropertyKey::Revision,
      PropertyKey::Nickname,
    ] {
      assert_eq!(key.cardinality(), Cardinality::Scalar);
    }
  }

  #[test]
  fn related_types_are_kebab_case() {
    assert_eq!(RelatedType::CoWorker.as_ref(), "co-worker");
    assert_eq!(
      RelatedType::from_str("CO-RESIDENT").unwrap(),
      RelatedType::CoResident
    );
    assert_eq!(TelType::iter().count(), 7);
  }
}
