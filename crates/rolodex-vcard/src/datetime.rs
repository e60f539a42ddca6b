//! The `date-and-or-time` grammar (RFC 6350 §4.3, ISO 8601 basic format).
//!
//! Accepted forms:
//!
//! | date       | time       |
//! |------------|------------|
//! | `YYYYMMDD` | `HHMMSS`   |
//! | `YYYY-MM`  | `HHMM`     |
//! | `YYYY`     | `HH`       |
//! | `--MMDD`   | `--MMSS`   |
//! | `---DD`    | `---SS`    |
//!
//! Every time form may carry a `Z` or `±HH[MM]` designator.

use rolodex_core::{DateParts, Moment, TimeParts, UtcOffset};

/// Parse a `date-and-or-time` value. A leading `T` means time only, no `T`
/// means date only, and otherwise both halves are parsed independently.
pub(crate) fn parse_date_and_or_time(input: &str) -> Option<Moment> {
  if !input.is_ascii() {
    return None;
  }
  let (date, time) = match input.find('T') {
    Some(0) => (DateParts::default(), parse_time(&input[1..])?),
    Some(i) => (parse_date(&input[..i])?, parse_time(&input[i + 1..])?),
    None => (parse_date(input)?, TimeParts::default()),
  };
  Moment::from_parts(date, time)
}

fn parse_date(input: &str) -> Option<DateParts> {
  if let Some(rest) = input.strip_prefix("---") {
    return Some(DateParts {
      day: Some(digits(rest, 2)?),
      ..DateParts::default()
    });
  }
  if let Some(rest) = input.strip_prefix("--") {
    return Some(DateParts {
      month: Some(digits(rest.get(..2)?, 2)?),
      day: Some(digits(rest.get(2..)?, 2)?),
      ..DateParts::default()
    });
  }
  let year = digits(input.get(..4)?, 4)? as i32;
  let rest = input.get(4..)?;
  let (month, day) = match rest.len() {
    0 => (None, None),
    3 => (Some(digits(rest.strip_prefix('-')?, 2)?), None),
    4 => (Some(digits(&rest[..2], 2)?), Some(digits(&rest[2..], 2)?)),
    _ => return None,
  };
  Some(DateParts {
    year: Some(year),
    month,
    day,
  })
}

fn parse_time(input: &str) -> Option<TimeParts> {
  let (dashes, rest) = if let Some(rest) = input.strip_prefix("---") {
    (3, rest)
  } else if let Some(rest) = input.strip_prefix("--") {
    (2, rest)
  } else {
    (0, input)
  };

  let (body, zone) = match rest.find(['Z', '+', '-']) {
    Some(i) => rest.split_at(i),
    None => (rest, ""),
  };
  let offset = match zone {
    "" => None,
    "Z" => Some(UtcOffset::UTC),
    zone => Some(parse_utc_offset(zone)?),
  };

  let mut time = TimeParts {
    offset,
    ..TimeParts::default()
  };
  match (dashes, body.len()) {
    (3, 2) => time.second = Some(digits(body, 2)?),
    (2, 4) => {
      time.minute = Some(digits(&body[..2], 2)?);
      time.second = Some(digits(&body[2..], 2)?);
    }
    (0, 2) => time.hour = Some(digits(body, 2)?),
    (0, 4) => {
      time.hour = Some(digits(&body[..2], 2)?);
      time.minute = Some(digits(&body[2..], 2)?);
    }
    (0, 6) => {
      time.hour = Some(digits(&body[..2], 2)?);
      time.minute = Some(digits(&body[2..4], 2)?);
      time.second = Some(digits(&body[4..], 2)?);
    }
    _ => return None,
  }
  Some(time)
}

/// `±HH` or `±HHMM`.
pub(crate) fn parse_utc_offset(input: &str) -> Option<UtcOffset> {
  if !input.is_ascii() {
    return None;
  }
  let negative = match input.chars().next()? {
    '+' => false,
    '-' => true,
    _ => return None,
  };
  let rest = &input[1..];
  let (hours, minutes) = match rest.len() {
    2 => (digits(rest, 2)?, 0),
    4 => (digits(&rest[..2], 2)?, digits(&rest[2..], 2)?),
    _ => return None,
  };
  UtcOffset::from_hm(negative, hours, minutes)
}

/// Exactly `len` ASCII digits.
fn digits(s: &str, len: usize) -> Option<u32> {
  if s.len() != len || !s.bytes().all(|b| b.is_ascii_digit()) {
    return None;
  }
  s.parse().ok()
}
