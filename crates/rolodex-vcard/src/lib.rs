//! vCard 4.0 (RFC 6350) parser for rolodex, with vCard 2.1
//! quoted-printable support.
//!
//! Text goes through four stages: line unfolding, content-line lexing, value
//! interpretation and card assembly. Each finished card is passed to a
//! callback in document order. Problems that only affect one line or one
//! property are collected as [`Diagnostic`]s rather than failing the parse.
//!
//! # Quick start
//!
//! ```no_run
//! let input = "BEGIN:VCARD\r\nVERSION:4.0\r\nFN:Alice Smith\r\nEND:VCARD\r\n";
//! let mut names = Vec::new();
//! let diagnostics = rolodex_vcard::parse(input, |card| {
//!   names.extend(card.full_name().map(str::to_string));
//! })
//! .unwrap();
//! assert_eq!(names, ["Alice Smith"]);
//! assert!(diagnostics.is_empty());
//! ```

mod datetime;
mod dispatch;
pub mod error;
mod lexer;
pub mod options;
mod unfold;
mod values;


pub use error::{Diagnostic, DiagnosticKind, Error, Result};
pub use options::{NestedBegin, ParseOptions};
pub use rolodex_core::VCard;

use crate::dispatch::Dispatcher;

// ─── Public types ────────────────────────────────────────────────────────────

/// A vCard parser with fixed options.
#[derive(Debug, Clone, Default)]
pub struct Parser {
  options: ParseOptions,
}

/// Every card in a document, plus the diagnostics collected while parsing it.
#[derive(Debug, Clone, Default)]
pub struct ParsedDocument {
  pub cards:       Vec<VCard>,
  pub diagnostics: Vec<Diagnostic>,
}

// ─── Public API ──────────────────────────────────────────────────────────────

impl Parser {
  pub fn new(options: ParseOptions) -> Self { Self { options } }

  pub fn options(&self) -> &ParseOptions { &self.options }

  /// Parse every `BEGIN:VCARD … END:VCARD` block in `input`, calling
  /// `on_card` at each `END`.
  ///
  /// Returns the diagnostics collected along the way. Fails only when
  /// [`NestedBegin::Reject`] is configured and a `BEGIN` arrives inside an
  /// open card; cards completed before that point have already been
  /// delivered.
  #[tracing::instrument(skip(self, input, on_card), fields(input_len = input.len()))]
  pub fn parse<F>(&self, input: &str, on_card: F) -> Result<Vec<Diagnostic>>
  where
    F: FnMut(VCard),
  {
    let mut diagnostics = Vec::new();
    let lines = unfold::unfold(input, &mut diagnostics);
    let mut dispatcher = Dispatcher::new(&self.options, on_card, diagnostics);
    for line in &lines {
      dispatcher.feed(line)?;
    }
    let diagnostics = dispatcher.finish();
    tracing::debug!(diagnostics = diagnostics.len(), "Finished parsing");
    Ok(diagnostics)
  }

  /// Parse `input` and collect every card.
  pub fn parse_all(&self, input: &str) -> Result<ParsedDocument> {
    let mut cards = Vec::new();
    let diagnostics = self.parse(input, |card| cards.push(card))?;
    Ok(ParsedDocument { cards, diagnostics })
  }
}

/// Parse `input` with default options. See [`Parser::parse`].
pub fn parse<F>(input: &str, on_card: F) -> Result<Vec<Diagnostic>>
where
  F: FnMut(VCard),
{
  Parser::default().parse(input, on_card)
}

/// Parse `input` with default options and collect every card.
pub fn parse_all(input: &str) -> Result<ParsedDocument> {
  Parser::default().parse_all(input)
}
