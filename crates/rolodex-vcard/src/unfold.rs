//! Line reassembly: physical lines → logical content lines.
//!
//! Handles RFC 6350 §3.2 folding (a line starting with whitespace continues
//! the previous one) and vCard 2.1 quoted-printable soft line breaks (a
//! trailing `=` joins the next physical line verbatim). CRLF and bare LF
//! terminators are both accepted.

use crate::error::{Diagnostic, DiagnosticKind, report};

/// One unfolded content line and the physical line number it started on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LogicalLine {
  pub line: usize,
  pub text: String,
}

pub(crate) fn unfold(
  input: &str,
  diagnostics: &mut Vec<Diagnostic>,
) -> Vec<LogicalLine> {
  let mut lines: Vec<LogicalLine> = Vec::new();
  let mut current: Option<LogicalLine> = None;

  for (index, raw) in input.lines().enumerate() {
    let line = index + 1;

    if let Some(cur) = current.as_mut()
      && ends_in_soft_break(&cur.text)
    {
      cur.text.pop();
      cur.text.push_str(raw);
      continue;
    }

    match raw.chars().next() {
      Some(c) if !c.is_whitespace() => {
        if let Some(done) = current.replace(LogicalLine {
          line,
          text: raw.to_string(),
        }) {
          lines.push(done);
        }
      }
      Some(c) if raw.len() > c.len_utf8() => {
        let payload = &raw[c.len_utf8()..];
        match current.as_mut() {
          Some(cur) => cur.text.push_str(payload),
          None => report(
            diagnostics,
            line,
            DiagnosticKind::OrphanContinuation(raw.to_string()),
          ),
        }
      }
      _ => report(
        diagnostics,
        line,
        DiagnosticKind::MalformedLine(raw.to_string()),
      ),
    }
  }

  lines.extend(current);
  tracing::trace!(count = lines.len(), "Unfolded lines");
  lines
}

/// A vCard 2.1 soft line break: the line is quoted-printable encoded and ends
/// in `=`.
fn ends_in_soft_break(text: &str) -> bool {
  text.ends_with('=') && text.to_ascii_uppercase().contains("QUOTED-PRINTABLE")
}

#[cfg(test)]
mod tests {
  use super::*;

  fn texts(input: &str) -> (Vec<String>, Vec<Diagnostic>) {
    let mut diagnostics = Vec::new();
    let lines = unfold(input, &mut diagnostics)
      .into_iter()
      .map(|l| l.text)
      .collect();
    (lines, diagnostics)
  }

  #[test]
  fn splits_crlf_and_bare_lf() {
    let (lines, diagnostics) = texts("BEGIN:VCARD\r\nFN:A\nEND:VCARD\r\n");
    assert_eq!(lines, ["BEGIN:VCARD", "FN:A", "END:VCARD"]);
    assert!(diagnostics.is_empty());
  }

  #[test]
  fn folded_line_drops_one_leading_space() {
    let (lines, _) = texts("NOTE:This is a long\r\n  note\r\n\tcontinued");
    assert_eq!(lines, ["NOTE:This is a long notecontinued"]);
  }

  #[test]
  fn records_starting_line_numbers() {
    let mut diagnostics = Vec::new();
    let lines = unfold("FN:A\r\n B\r\nNOTE:x\r\n", &mut diagnostics);
    assert_eq!(lines[0].line, 1);
    assert_eq!(lines[1].line, 3);
  }

  #[test]
  fn quoted_printable_soft_break_joins_next_line() {
    let (lines, _) = texts(
      "NOTE;ENCODING=QUOTED-PRINTABLE:first=\r\nsecond=\r\nthird\r\nFN:A",
    );
    assert_eq!(lines, [
      "NOTE;ENCODING=QUOTED-PRINTABLE:firstsecondthird",
      "FN:A"
    ]);
  }

  #[test]
  fn trailing_equals_without_encoding_is_literal() {
    let (lines, _) = texts("NOTE:a=\r\nFN:b");
    assert_eq!(lines, ["NOTE:a=", "FN:b"]);
  }

  #[test]
  fn blank_and_orphan_lines_are_reported_and_skipped() {
    let (lines, diagnostics) = texts(" orphan\r\nFN:A\r\n\r\n \r\nNOTE:b");
    assert_eq!(lines, ["FN:A", "NOTE:b"]);
    let kinds: Vec<_> = diagnostics.iter().map(|d| (d.line, &d.kind)).collect();
    assert_eq!(kinds, [
      (1, &DiagnosticKind::OrphanContinuation(" orphan".into())),
      (3, &DiagnosticKind::MalformedLine(String::new())),
      (4, &DiagnosticKind::MalformedLine(" ".into())),
    ]);
  }
}
