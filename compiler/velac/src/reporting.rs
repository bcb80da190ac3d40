//! Terminal rendering for diagnostics.

use vela_diagnostic::Diagnostic;
use vela_ir::StringLookup;

/// Render one diagnostic with resolved file names.
pub fn render(diag: &Diagnostic, lookup: &impl StringLookup) -> String {
    let mut out = format!("{}[{}]: {}", diag.severity, diag.code, diag.message);
    for label in &diag.labels {
        let marker = if label.is_primary { "-->" } else { "   " };
        let file = lookup.lookup(label.loc.file);
        out.push_str(&format!(
            "\n  {marker} {file}:{}..{}  {}",
            label.loc.span.start, label.loc.span.end, label.message
        ));
    }
    for note in &diag.notes {
        out.push_str(&format!("\n  = note: {note}"));
    }
    out
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use vela_diagnostic::ErrorCode;
    use vela_ir::{SourceLoc, Span, StringInterner};

    #[test]
    fn test_render_resolves_file_and_keeps_notes() {
        let interner = StringInterner::new();
        let file = interner.intern("bindings/api.json");
        let diag = Diagnostic::error(ErrorCode::E2002)
            .with_message("`Mystery` does not resolve to a known type")
            .with_label(SourceLoc::new(file, Span::new(10, 17)), "in this parameter")
            .with_note("declare the type or qualify it with its namespace");

        let rendered = render(&diag, &interner);
        assert_eq!(
            rendered,
            "error[E2002]: `Mystery` does not resolve to a known type\n  \
             --> bindings/api.json:10..17  in this parameter\n  \
             = note: declare the type or qualify it with its namespace"
        );
    }
}
