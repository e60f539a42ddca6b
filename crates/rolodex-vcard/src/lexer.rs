//! Content-line lexer: one logical line → (key, attributes, raw value).
//!
//! The lexer is a small state machine over a single character cursor:
//!
//! ```text
//!   Key ──';'──▶ AttrName ──'='──▶ AttrValue
//!    │              │ ▲  ';'          │  │ ';'
//!    │              │ └───────────────┘  │
//!    └─────':'──────┴──────':'───────────┴──▶ Value
//! ```
//!
//! Reaching `Value` ends lexing; the rest of the line is the raw value, with
//! no character treated specially.

use std::{borrow::Cow, collections::BTreeMap};

use crate::error::DiagnosticKind;

// ─── Attributes ──────────────────────────────────────────────────────────────

/// Property parameters, keyed by uppercased name. Each value is the
/// comma-split list given for that name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Attributes(BTreeMap<String, Vec<String>>);

impl Attributes {
  pub fn get(&self, name: &str) -> Option<&[String]> {
    self.0.get(name).map(Vec::as_slice)
  }

  pub fn first(&self, name: &str) -> Option<&str> {
    self.get(name).and_then(|vs| vs.first()).map(String::as_str)
  }

  /// Whether the first value of `name` equals `expected`, ignoring case.
  pub fn is(&self, name: &str, expected: &str) -> bool {
    self.first(name).is_some_and(|v| v.eq_ignore_ascii_case(expected))
  }

  /// `TYPE` values, empty entries dropped.
  pub fn types(&self) -> Vec<String> {
    self
      .get("TYPE")
      .unwrap_or_default()
      .iter()
      .filter(|t| !t.is_empty())
      .cloned()
      .collect()
  }

  /// `PREF` as a rank in 1..=255; anything else is ignored.
  pub fn pref(&self) -> Option<u8> {
    self
      .first("PREF")
      .and_then(|p| p.trim().parse::<u8>().ok())
      .filter(|p| *p > 0)
  }

  /// Repeated parameters accumulate into one list.
  pub fn insert(&mut self, name: String, values: Vec<String>) {
    self.0.entry(name).or_default().extend(values);
  }

  /// A vCard 2.1 parameter without `=`: `PREF` sets the rank to 1, anything
  /// else is a `TYPE`.
  fn push_floating(&mut self, token: String) {
    if token.is_empty() {
      return;
    }
    if token.eq_ignore_ascii_case("PREF") {
      self.0.insert("PREF".to_string(), vec!["1".to_string()]);
    } else {
      self.insert("TYPE".to_string(), vec![token]);
    }
  }
}

// ─── Statement ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Statement {
  /// Uppercased property name with any group prefix removed.
  pub key:        String,
  pub attributes: Attributes,
  pub value:      String,
}

// ─── State machine ───────────────────────────────────────────────────────────

#[derive(Debug)]
enum State {
  Key,
  AttrName,
  AttrValue {
    name:   String,
    values: Vec<String>,
    quoted: bool,
  },
  Value,
}

struct Lexer {
  state:      State,
  token:      String,
  key:        String,
  attributes: Attributes,
}

impl Lexer {
  fn new() -> Self {
    Self {
      state:      State::Key,
      token:      String::new(),
      key:        String::new(),
      attributes: Attributes::default(),
    }
  }

  fn step(&mut self, c: char) {
    match &mut self.state {
      State::AttrValue { quoted, .. } if c == '"' => {
        *quoted = !*quoted;
        return;
      }
      State::AttrValue { quoted: true, .. } => {
        self.token.push(c);
        return;
      }
      _ => {}
    }

    match c {
      ':' => {
        self.end_group();
        self.state = State::Value;
      }
      ';' => {
        self.end_group();
        self.state = State::AttrName;
      }
      '=' if matches!(self.state, State::AttrName) => {
        let name = std::mem::take(&mut self.token).trim().to_ascii_uppercase();
        self.state = State::AttrValue {
          name,
          values: Vec::new(),
          quoted: false,
        };
      }
      ',' if matches!(self.state, State::AttrValue { .. }) => {
        let token = std::mem::take(&mut self.token);
        if let State::AttrValue { values, .. } = &mut self.state {
          values.push(token);
        }
      }
      _ => self.token.push(c),
    }
  }

  /// Close the key or attribute group being collected.
  fn end_group(&mut self) {
    let token = std::mem::take(&mut self.token);
    match std::mem::replace(&mut self.state, State::AttrName) {
      State::Key => self.key = token,
      State::AttrName => self.attributes.push_floating(token.trim().to_string()),
      State::AttrValue {
        name, mut values, ..
      } => {
        values.push(token);
        self.attributes.insert(name, values);
      }
      State::Value => {}
    }
  }

  fn finish(self, value: &str) -> Statement {
    let key = match self.key.split_once('.') {
      Some((_group, name)) => name,
      None => &self.key,
    };
    Statement {
      key:        key.trim().to_ascii_uppercase(),
      attributes: self.attributes,
      value:      value.to_string(),
    }
  }
}

/// Lex one logical line.
///
/// Fails with [`DiagnosticKind::MissingValue`] when the line has no `:`.
pub(crate) fn lex(line: &str) -> Result<Statement, DiagnosticKind> {
  let line = decode_line(line);
  let mut lexer = Lexer::new();
  for (i, c) in line.char_indices() {
    lexer.step(c);
    if matches!(lexer.state, State::Value) {
      return Ok(lexer.finish(&line[i + c.len_utf8()..]));
    }
  }
  Err(DiagnosticKind::MissingValue(line.into_owned()))
}

// ─── Quoted-printable ────────────────────────────────────────────────────────

const QP_MARKER: &str = "ENCODING=QUOTED-PRINTABLE";

/// Strip the quoted-printable marker from the parameter section and decode
/// the value. Lines without the marker are returned untouched.
fn decode_line(line: &str) -> Cow<'_, str> {
  let params_end = line.find(':').unwrap_or(line.len());
  let Some(pos) = line[..params_end].to_ascii_uppercase().find(QP_MARKER)
  else {
    return Cow::Borrowed(line);
  };
  let head = &line[..pos];
  let tail = &line[pos + QP_MARKER.len()..];
  match tail.find(':') {
    Some(colon) => Cow::Owned(format!(
      "{head}{}:{}",
      &tail[..colon],
      decode_quoted_printable(&tail[colon + 1..])
    )),
    None => Cow::Owned(format!("{head}{tail}")),
  }
}

/// Decode `=XX` escapes into bytes, read the result as UTF-8. A trailing `=`
/// is a soft line break and is dropped; any other `=` not followed by two hex
/// digits is kept literally.
pub(crate) fn decode_quoted_printable(s: &str) -> String {
  let bytes = s.as_bytes();
  let mut result: Vec<u8> = Vec::with_capacity(bytes.len());
  let mut i = 0;
  while i < bytes.len() {
    if bytes[i] == b'=' {
      if i + 1 == bytes.len() {
        break;
      }
      if let (Some(hi), Some(lo)) =
        (hex_digit(bytes.get(i + 1)), hex_digit(bytes.get(i + 2)))
      {
        result.push((hi << 4) | lo);
        i += 3;
        continue;
      }
    }
    result.push(bytes[i]);
    i += 1;
  }
  String::from_utf8_lossy(&result).into_owned()
}

fn hex_digit(byte: Option<&u8>) -> Option<u8> {
  byte
    .and_then(|b| char::from(*b).to_digit(16))
    .map(|d| d as u8)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
