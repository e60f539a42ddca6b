//! Typed property values.
//!
//! Each [`crate::PropertyKey`] carries exactly one shape of [`Value`]. The
//! serde representations follow jCard so that [`crate::VCard::to_jcard`] is a
//! plain `serde_json::to_value`.

use std::fmt;

use chrono::{
  DateTime, Datelike, NaiveDate, SubsecRound, TimeDelta, Timelike, Utc,
};
use serde::{Serialize, Serializer};

// ─── Temporal ────────────────────────────────────────────────────────────────

/// A signed offset from UTC with minute precision (RFC 6350 §4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UtcOffset {
  seconds: i32,
}

impl UtcOffset {
  pub const UTC: Self = Self { seconds: 0 };

  /// Build an offset from its sign and magnitude. Returns `None` when the
  /// hours exceed 23 or the minutes exceed 59.
  pub fn from_hm(negative: bool, hours: u32, minutes: u32) -> Option<Self> {
    if hours > 23 || minutes > 59 {
      return None;
    }
    let magnitude = (hours * 3600 + minutes * 60) as i32;
    Some(Self {
      seconds: if negative { -magnitude } else { magnitude },
    })
  }

  pub fn seconds(self) -> i32 { self.seconds }

  pub fn as_duration(self) -> TimeDelta {
    TimeDelta::seconds(i64::from(self.seconds))
  }
}

impl fmt::Display for UtcOffset {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let sign = if self.seconds < 0 { '-' } else { '+' };
    let magnitude = self.seconds.unsigned_abs();
    write!(f, "{sign}{:02}{:02}", magnitude / 3600, magnitude % 3600 / 60)
  }
}

impl Serialize for UtcOffset {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}

/// The date components present in a `date-and-or-time` value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateParts {
  pub year:  Option<i32>,
  pub month: Option<u32>,
  pub day:   Option<u32>,
}

/// The time components present in a `date-and-or-time` value, plus its UTC
/// designator if one was given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeParts {
  pub hour:   Option<u32>,
  pub minute: Option<u32>,
  pub second: Option<u32>,
  pub offset: Option<UtcOffset>,
}

/// A point in time that may be missing some of its components.
///
/// The components that were actually given are kept alongside the instant
/// they resolve to. Missing components resolve against
/// 1970-01-01T00:00:00Z, and a UTC offset shifts the instant by its signed
/// amount, so `14:00+02:00` resolves to 16:00Z.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Moment {
  date:    DateParts,
  time:    TimeParts,
  instant: DateTime<Utc>,
}

impl Moment {
  /// Resolve `date` and `time` into a moment. Returns `None` when a component
  /// is out of range (month 13, February 30th, minute 60).
  pub fn from_parts(date: DateParts, time: TimeParts) -> Option<Self> {
    let day = NaiveDate::from_ymd_opt(
      date.year.unwrap_or(1970),
      date.month.unwrap_or(1),
      date.day.unwrap_or(1),
    )?;
    let local = day.and_hms_opt(
      time.hour.unwrap_or(0),
      time.minute.unwrap_or(0),
      time.second.unwrap_or(0),
    )?;
    let shift = time.offset.map_or(TimeDelta::zero(), UtcOffset::as_duration);
    let instant = local.and_utc().checked_add_signed(shift)?;
    Some(Self {
      date,
      time,
      instant,
    })
  }

  /// A fully specified moment in UTC, truncated to whole seconds.
  pub fn from_instant(at: DateTime<Utc>) -> Self {
    let instant = at.trunc_subsecs(0);
    Self {
      date: DateParts {
        year:  Some(instant.year()),
        month: Some(instant.month()),
        day:   Some(instant.day()),
      },
      time: TimeParts {
        hour:   Some(instant.hour()),
        minute: Some(instant.minute()),
        second: Some(instant.second()),
        offset: Some(UtcOffset::UTC),
      },
      instant,
    }
  }

  pub fn instant(&self) -> DateTime<Utc> { self.instant }

  pub fn date(&self) -> &DateParts { &self.date }

  pub fn time(&self) -> &TimeParts { &self.time }
}

/// Renders the resolved instant as a compact ISO 8601 basic-format
/// timestamp, e.g. `19961022T140000Z`.
impl fmt::Display for Moment {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.instant.format("%Y%m%dT%H%M%SZ"))
  }
}

impl Serialize for Moment {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}

/// `BDAY`, `ANNIVERSARY` and `REV` values (RFC 6350 §4.3.4).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DateAndOrTime {
  Moment(Moment),
  /// `VALUE=text`, e.g. "circa 1800".
  Text(String),
}

// ─── Compound values ─────────────────────────────────────────────────────────

/// A value tagged with its `TYPE` list and optional `PREF` rank (`TEL`,
/// `EMAIL`, `IMPP`, `LANG`, `RELATED`, `ADR`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TypedValue {
  #[serde(rename = "type", skip_serializing_if = "Vec::is_empty")]
  pub types: Vec<String>,
  /// Preference rank; 1 is most preferred.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub pref:  Option<u8>,
  pub value: String,
}

impl TypedValue {
  pub fn new(value: impl Into<String>) -> Self {
    Self {
      value: value.into(),
      ..Self::default()
    }
  }

  pub fn with_type(mut self, ty: impl Into<String>) -> Self {
    self.types.push(ty.into());
    self
  }

  pub fn with_pref(mut self, pref: u8) -> Self {
    self.pref = Some(pref);
    self
  }

  /// Case-insensitive membership test, e.g. `has_type(TelType::Cell)`.
  pub fn has_type(&self, ty: impl AsRef<str>) -> bool {
    let ty = ty.as_ref();
    self.types.iter().any(|t| t.eq_ignore_ascii_case(ty))
  }
}

/// The five components of `N` (§6.2.2). Empty components are omitted from
/// jCard output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StructuredName {
  #[serde(rename = "family-name", skip_serializing_if = "Vec::is_empty")]
  pub family:     Vec<String>,
  #[serde(rename = "given-name", skip_serializing_if = "Vec::is_empty")]
  pub given:      Vec<String>,
  #[serde(rename = "additional-name", skip_serializing_if = "Vec::is_empty")]
  pub additional: Vec<String>,
  #[serde(rename = "honorific-prefix", skip_serializing_if = "Vec::is_empty")]
  pub prefix:     Vec<String>,
  #[serde(rename = "honorific-suffix", skip_serializing_if = "Vec::is_empty")]
  pub suffix:     Vec<String>,
}

impl StructuredName {
  /// The component at `index` in `N` order (family, given, additional,
  /// prefix, suffix).
  pub fn component_mut(&mut self, index: usize) -> Option<&mut Vec<String>> {
    match index {
      0 => Some(&mut self.family),
      1 => Some(&mut self.given),
      2 => Some(&mut self.additional),
      3 => Some(&mut self.prefix),
      4 => Some(&mut self.suffix),
      _ => None,
    }
  }
}

/// The sex component of `GENDER` (§6.2.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
  Male,
  Female,
  Other,
}

impl Sex {
  /// `M`, `F` and `O` map to a sex; `N`, `U` and anything else record none.
  pub fn from_code(code: &str) -> Option<Self> {
    match code {
      c if c.eq_ignore_ascii_case("M") => Some(Self::Male),
      c if c.eq_ignore_ascii_case("F") => Some(Self::Female),
      c if c.eq_ignore_ascii_case("O") => Some(Self::Other),
      _ => None,
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Gender {
  /// `None` when unspecified.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub sex:      Option<Sex>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub identity: Option<String>,
}

/// `ORG` (§6.6.4).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Organization {
  #[serde(rename = "organization-name")]
  pub name: String,
  #[serde(rename = "organization-unit", skip_serializing_if = "Option::is_none")]
  pub unit: Option<String>,
}

/// `TZ` (§6.5.1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Timezone {
  Name(String),
  UtcOffset(UtcOffset),
}

// ─── Value ───────────────────────────────────────────────────────────────────

/// One value of one property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
  Text(String),
  TextList(Vec<String>),
  DateAndOrTime(DateAndOrTime),
  Typed(TypedValue),
  Name(StructuredName),
  Gender(Gender),
  Org(Organization),
  Timezone(Timezone),
}

impl Value {
  pub fn as_text(&self) -> Option<&str> {
    match self {
      Self::Text(s) => Some(s),
      _ => None,
    }
  }

  pub fn as_typed(&self) -> Option<&TypedValue> {
    match self {
      Self::Typed(t) => Some(t),
      _ => None,
    }
  }
}

impl From<&str> for Value {
  fn from(s: &str) -> Self { Self::Text(s.to_string()) }
}

impl From<String> for Value {
  fn from(s: String) -> Self { Self::Text(s) }
}

impl From<TypedValue> for Value {
  fn from(t: TypedValue) -> Self { Self::Typed(t) }
}

impl From<Moment> for Value {
  fn from(m: Moment) -> Self { Self::DateAndOrTime(DateAndOrTime::Moment(m)) }
}

/// What a record stores under one key: a bare value, or a sequence.
///
/// Multivalued keys always hold [`PropertyValue::Multiple`] once the record
/// has been validated; a bare value can only get there through
/// [`crate::VCard::set`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
  Single(Value),
  Multiple(Vec<Value>),
}

impl PropertyValue {
  pub fn as_slice(&self) -> &[Value] {
    match self {
      Self::Single(v) => std::slice::from_ref(v),
      Self::Multiple(vs) => vs,
    }
  }

  pub fn into_values(self) -> Vec<Value> {
    match self {
      Self::Single(v) => vec![v],
      Self::Multiple(vs) => vs,
    }
  }

  pub fn is_sequence(&self) -> bool { matches!(self, Self::Multiple(_)) }

  pub fn first(&self) -> Option<&Value> { self.as_slice().first() }
}

impl From<Value> for PropertyValue {
  fn from(v: Value) -> Self { Self::Single(v) }
}

impl From<Vec<Value>> for PropertyValue {
  fn from(vs: Vec<Value>) -> Self { Self::Multiple(vs) }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use chrono::TimeZone;
  use serde_json::json;

  use super::*;

  #[test]
  fn missing_components_default_to_epoch() {
    let m = Moment::from_parts(
      DateParts {
        year:  None,
        month: Some(10),
        day:   Some(22),
      },
      TimeParts::default(),
    )
    .unwrap();
    assert_eq!(m.instant(), Utc.with_ymd_and_hms(1970, 10, 22, 0, 0, 0).unwrap());
    assert_eq!(m.date().year, None);
  }

  #[test]
  fn offset_shifts_instant_by_its_sign() {
    let m = Moment::from_parts(
      DateParts {
        year:  Some(1996),
        month: Some(10),
        day:   Some(22),
      },
      TimeParts {
        hour:   Some(14),
        minute: Some(0),
        second: Some(0),
        offset: UtcOffset::from_hm(false, 2, 0),
      },
    )
    .unwrap();
    assert_eq!(
      m.instant(),
      Utc.with_ymd_and_hms(1996, 10, 22, 16, 0, 0).unwrap()
    );
  }

  #[test]
  fn out_of_range_components_do_not_resolve() {
    let feb_30 = DateParts {
      year:  Some(2001),
      month: Some(2),
      day:   Some(30),
    };
    assert!(Moment::from_parts(feb_30, TimeParts::default()).is_none());
    let minute_60 = TimeParts {
      minute: Some(60),
      ..TimeParts::default()
    };
    assert!(Moment::from_parts(DateParts::default(), minute_60).is_none());
  }

  #[test]
  fn moment_displays_compact_basic_format() {
    let at = Utc.with_ymd_and_hms(2024, 6, 1, 9, 5, 7).unwrap();
    assert_eq!(Moment::from_instant(at).to_string(), "20240601T090507Z");
  }

  #[test]
  fn utc_offset_display() {
    assert_eq!(UtcOffset::from_hm(true, 5, 30).unwrap().to_string(), "-0530");
    assert_eq!(UtcOffset::UTC.to_string(), "+0000");
    assert!(UtcOffset::from_hm(false, 24, 0).is_none());
  }

  #[test]
  fn typed_value_jcard_shape() {
    let tel = TypedValue::new("+1-555-0100").with_type("cell").with_pref(1);
    assert_eq!(
      serde_json::to_value(Value::Typed(tel)).unwrap(),
      json!({ "type": ["cell"], "pref": 1, "value": "+1-555-0100" })
    );
    let impp = TypedValue::new("xmpp:alice@example.com");
    assert_eq!(
      serde_json::to_value(&impp).unwrap(),
      json!({ "value": "xmpp:alice@example.com" })
    );
  }

  #[test]
  fn name_and_gender_jcard_shape() {
    let name = StructuredName {
      family: vec!["Public".into()],
      given: vec!["John".into()],
      suffix: vec!["Esq.".into()],
      ..StructuredName::default()
    };
    assert_eq!(
      serde_json::to_value(&name).unwrap(),
      json!({
        "family-name": ["Public"],
        "given-name": ["John"],
        "honorific-suffix": ["Esq."],
      })
    );
    let gender = Gender {
      sex:      Some(Sex::Female),
      identity: None,
    };
    assert_eq!(serde_json::to_value(&gender).unwrap(), json!({ "sex": "female" }));
  }

  #[test]
  fn timezone_jcard_shape() {
    let tz = Timezone::UtcOffset(UtcOffset::from_hm(true, 5, 0).unwrap());
    assert_eq!(serde_json::to_value(&tz).unwrap(), json!({ "utc-offset": "-0500" }));
    let tz = Timezone::Name("Europe/Berlin".into());
    assert_eq!(serde_json::to_value(&tz).unwrap(), json!({ "name": "Europe/Berlin" }));
  }

  #[test]
  fn has_type_ignores_case() {
    let tel = TypedValue::new("1").with_type("CELL");
    assert!(tel.has_type(crate::property::TelType::Cell));
    assert!(!tel.has_type("fax"));
  }
}
