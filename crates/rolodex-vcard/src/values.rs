//! Value interpreters: raw property text → typed [`Value`].

use rolodex_core::{
  DateAndOrTime, Gender, Organization, PropertyKey, Sex, StructuredName,
  Timezone, TypedValue, Value,
};

use crate::{
  datetime::{parse_date_and_or_time, parse_utc_offset},
  error::DiagnosticKind,
  lexer::Attributes,
  options::ParseOptions,
};

/// Interpret the raw value of one property.
///
/// `Ok(None)` means there is nothing to store; an `Err` is reported by the
/// caller and the property is dropped.
pub(crate) fn interpret(
  key: PropertyKey,
  attributes: &Attributes,
  raw: &str,
  options: &ParseOptions,
) -> Result<Option<Value>, DiagnosticKind> {
  let raw = match key {
    PropertyKey::Related => related_target(attributes, raw),
    _ => raw,
  };
  if raw.is_empty() && !options.keep_empty_values {
    tracing::debug!(property = key.as_str(), "Skipping empty value");
    return Ok(None);
  }

  let value = match key {
    PropertyKey::FullName
    | PropertyKey::Photo
    | PropertyKey::Geo
    | PropertyKey::Title
    | PropertyKey::Role
    | PropertyKey::Logo
    | PropertyKey::Member
    | PropertyKey::Note
    | PropertyKey::ProductId
    | PropertyKey::Sound
    | PropertyKey::Uid
    | PropertyKey::Version
    | PropertyKey::Url
    | PropertyKey::Kind => Value::Text(raw.to_string()),

    PropertyKey::Nickname | PropertyKey::Categories => {
      Value::TextList(split_escaped(raw, ',').map(str::to_string).collect())
    }

    PropertyKey::Birthday | PropertyKey::Anniversary | PropertyKey::Revision => {
      Value::DateAndOrTime(date_and_or_time(key, attributes, raw)?)
    }

    PropertyKey::Name => Value::Name(parse_name(raw)),
    PropertyKey::Gender => Value::Gender(parse_gender(raw)),
    PropertyKey::Organization => Value::Org(parse_org(raw)),

    PropertyKey::Telephone => {
      let mut tel = typed(attributes, raw);
      if tel.types.is_empty() && !options.default_tel_type.is_empty() {
        tel.types.push(options.default_tel_type.clone());
      }
      Value::Typed(tel)
    }
    PropertyKey::Email | PropertyKey::Language | PropertyKey::Address => {
      Value::Typed(typed(attributes, raw))
    }
    PropertyKey::Impp => Value::Typed(TypedValue::new(raw)),
    PropertyKey::Related => Value::Typed(typed(attributes, raw)),

    PropertyKey::Timezone => Value::Timezone(parse_timezone(attributes, raw)?),
  };
  Ok(Some(value))
}

fn date_and_or_time(
  key: PropertyKey,
  attributes: &Attributes,
  raw: &str,
) -> Result<DateAndOrTime, DiagnosticKind> {
  if attributes.is("VALUE", "text") {
    return Ok(DateAndOrTime::Text(raw.to_string()));
  }
  if let Some(calscale) = attributes.first("CALSCALE")
    && !calscale.eq_ignore_ascii_case("gregorian")
  {
    return Err(DiagnosticKind::UnsupportedCalendar {
      property: key.as_str().to_string(),
      calscale: calscale.to_string(),
    });
  }
  match parse_date_and_or_time(raw.trim()) {
    Some(moment) => Ok(DateAndOrTime::Moment(moment)),
    None => Err(DiagnosticKind::InvalidDateTime {
      property: key.as_str().to_string(),
      value:    raw.to_string(),
    }),
  }
}

fn typed(attributes: &Attributes, value: &str) -> TypedValue {
  TypedValue {
    types: attributes.types(),
    pref:  attributes.pref(),
    value: value.to_string(),
  }
}

/// `RELATED` carries its value in a `VALUE` attribute unless that attribute
/// names a data type.
fn related_target<'a>(attributes: &'a Attributes, raw: &'a str) -> &'a str {
  attributes
    .first("VALUE")
    .filter(|v| !is_value_type_name(v))
    .unwrap_or(raw)
}

/// `VALUE` names a data type (`VALUE=uri`) rather than carrying the value.
fn is_value_type_name(v: &str) -> bool {
  v.eq_ignore_ascii_case("uri") || v.eq_ignore_ascii_case("text")
}

fn parse_name(raw: &str) -> StructuredName {
  let mut name = StructuredName::default();
  for (index, segment) in split_escaped(raw, ';').enumerate() {
    let Some(component) = name.component_mut(index) else {
      break;
    };
    if segment.is_empty() {
      continue;
    }
    component.extend(split_escaped(segment, ',').map(str::to_string));
  }
  name
}

fn parse_gender(raw: &str) -> Gender {
  let mut segments = split_escaped(raw, ';');
  let sex = segments.next().and_then(|s| Sex::from_code(s.trim()));
  let identity = segments
    .next()
    .filter(|s| !s.is_empty())
    .map(str::to_string);
  Gender { sex, identity }
}

fn parse_org(raw: &str) -> Organization {
  let mut segments = split_escaped(raw, ';');
  Organization {
    name: segments.next().unwrap_or_default().to_string(),
    unit: segments
      .next()
      .filter(|s| !s.is_empty())
      .map(str::to_string),
  }
}

fn parse_timezone(
  attributes: &Attributes,
  raw: &str,
) -> Result<Timezone, DiagnosticKind> {
  if !attributes.is("VALUE", "utc-offset") {
    return Ok(Timezone::Name(raw.to_string()));
  }
  parse_utc_offset(raw.trim())
    .map(Timezone::UtcOffset)
    .ok_or_else(|| DiagnosticKind::InvalidUtcOffset(raw.to_string()))
}

/// Split on `sep`, skipping separators preceded by a backslash. The pieces
/// keep their escapes.
fn split_escaped(s: &str, sep: char) -> impl Iterator<Item = &str> {
  let mut rest = Some(s);
  std::iter::from_fn(move || {
    let current = rest?;
    let mut escaped = false;
    for (i, c) in current.char_indices() {
      if escaped {
        escaped = false;
      } else if c == '\\' {
        escaped = true;
      } else if c == sep {
        rest = Some(&current[i + c.len_utf8()..]);
        return Some(&current[..i]);
      }
    }
    rest = None;
    Some(current)
  })
}
