//! Property dispatcher: routes statements into the card being built and
//! hands finished cards to the caller.

use rolodex_core::{PropertyKey, VCard};

use crate::{
  error::{Diagnostic, DiagnosticKind, Error, Result, report},
  lexer::{self, Statement},
  options::{NestedBegin, ParseOptions},
  unfold::LogicalLine,
  values,
};

enum State {
  Idle,
  Building { card: VCard, opened_at: usize },
}

pub(crate) struct Dispatcher<'a, F> {
  options:     &'a ParseOptions,
  on_card:     F,
  state:       State,
  diagnostics: Vec<Diagnostic>,
}

impl<'a, F: FnMut(VCard)> Dispatcher<'a, F> {
  pub fn new(
    options: &'a ParseOptions,
    on_card: F,
    diagnostics: Vec<Diagnostic>,
  ) -> Self {
    Self {
      options,
      on_card,
      state: State::Idle,
      diagnostics,
    }
  }

  pub fn feed(&mut self, line: &LogicalLine) -> Result<()> {
    let statement = match lexer::lex(&line.text) {
      Ok(statement) => statement,
      Err(kind) => {
        report(&mut self.diagnostics, line.line, kind);
        return Ok(());
      }
    };

    match statement.key.as_str() {
      "BEGIN" => self.begin(line.line),
      "END" => {
        self.end();
        Ok(())
      }
      _ => {
        self.property(line.line, statement);
        Ok(())
      }
    }
  }

  fn begin(&mut self, line: usize) -> Result<()> {
    if let State::Building { opened_at, .. } = self.state {
      if self.options.nested_begin == NestedBegin::Reject {
        return Err(Error::NestedBegin { line, opened_at });
      }
      report(
        &mut self.diagnostics,
        line,
        DiagnosticKind::NestedBegin { opened_at },
      );
    }
    self.state = State::Building {
      card:      VCard::new(),
      opened_at: line,
    };
    Ok(())
  }

  fn end(&mut self) {
    match std::mem::replace(&mut self.state, State::Idle) {
      State::Building { card, opened_at } => {
        tracing::debug!(opened_at, properties = card.len(), "Completed card");
        (self.on_card)(card);
      }
      State::Idle => tracing::trace!("END outside a card"),
    }
  }

  fn property(&mut self, line: usize, statement: Statement) {
    let State::Building { card, .. } = &mut self.state else {
      tracing::trace!(key = %statement.key, "Ignoring property outside a card");
      return;
    };

    let Ok(key) = statement.key.parse::<PropertyKey>() else {
      report(
        &mut self.diagnostics,
        line,
        DiagnosticKind::UnknownProperty(statement.key),
      );
      return;
    };

    match values::interpret(
      key,
      &statement.attributes,
      &statement.value,
      self.options,
    ) {
      Ok(Some(value)) => card.add(key, value),
      Ok(None) => {}
      Err(kind) => report(&mut self.diagnostics, line, kind),
    }
  }

  /// Close out the stream and return everything reported along the way.
  pub fn finish(mut self) -> Vec<Diagnostic> {
    if let State::Building { opened_at, .. } = self.state {
      report(
        &mut self.diagnostics,
        opened_at,
        DiagnosticKind::UnterminatedCard { opened_at },
      );
    }
    self.diagnostics
  }
}
