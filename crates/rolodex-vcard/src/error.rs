//! Error and diagnostic types for the rolodex-vcard parser.
//!
//! Almost nothing in a vCard stream is fatal. Problems local to one line or
//! one property become a [`Diagnostic`]; the offending line or property is
//! left out and parsing continues.

use thiserror::Error;

/// A fatal parse error.
#[derive(Debug, Error)]
pub enum Error {
  /// `BEGIN` arrived while a card was still open and
  /// [`crate::NestedBegin::Reject`] is configured.
  #[error("line {line}: BEGIN inside an unterminated card opened on line {opened_at}")]
  NestedBegin { line: usize, opened_at: usize },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A non-fatal problem, tagged with the physical line it started on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {kind}")]
pub struct Diagnostic {
  pub line: usize,
  pub kind: DiagnosticKind,
}

/// Log `kind` and append it to `diagnostics`.
pub(crate) fn report(
  diagnostics: &mut Vec<Diagnostic>,
  line: usize,
  kind: DiagnosticKind,
) {
  let diagnostic = Diagnostic { line, kind };
  tracing::warn!("{diagnostic}");
  diagnostics.push(diagnostic);
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiagnosticKind {
  /// A blank or lone-whitespace physical line.
  #[error("malformed line: {0:?}")]
  MalformedLine(String),

  #[error("continuation line with nothing to continue: {0:?}")]
  OrphanContinuation(String),

  #[error("content line without ':' separator: {0:?}")]
  MissingValue(String),

  #[error("unknown property: {0}")]
  UnknownProperty(String),

  #[error("invalid date/time in {property}: {value:?}")]
  InvalidDateTime { property: String, value: String },

  #[error("unsupported CALSCALE {calscale:?} in {property}")]
  UnsupportedCalendar { property: String, calscale: String },

  #[error("invalid UTC offset: {0:?}")]
  InvalidUtcOffset(String),

  #[error("BEGIN inside an unterminated card opened on line {opened_at}; discarding it")]
  NestedBegin { opened_at: usize },

  #[error("card opened on line {opened_at} has no END")]
  UnterminatedCard { opened_at: usize },
}
