//! Accumulating diagnostic collection with deterministic ordering.

use crate::Diagnostic;

/// Collects diagnostics across the whole pipeline.
///
/// Parallel workers each produce their own bag; the driver merges them and
/// sorts once, so repeated runs over unchanged input report diagnostics in
/// an identical order regardless of scheduling.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DiagnosticBag {
    diagnostics: Vec<Diagnostic>,
    error_count: usize,
}

impl DiagnosticBag {
    /// Create an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic.
    pub fn push(&mut self, diag: Diagnostic) {
        if diag.is_error() {
            self.error_count += 1;
        }
        self.diagnostics.push(diag);
    }

    /// Merge another bag into this one.
    pub fn merge(&mut self, other: DiagnosticBag) {
        self.error_count += other.error_count;
        self.diagnostics.extend(other.diagnostics);
    }

    /// Number of error-severity diagnostics.
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Whether any errors were recorded.
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    /// Whether the bag is empty.
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Iterate without consuming.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    /// Sort deterministically and return the diagnostics.
    ///
    /// Order: primary location (file, then span start), then error code.
    /// Diagnostics without a location sort first. Stable, so two
    /// diagnostics at the same position keep their merge order.
    pub fn into_sorted(mut self) -> Vec<Diagnostic> {
        self.diagnostics.sort_by_key(|d| {
            d.primary_loc().map_or((0, 0, d.code.as_str()), |loc| {
                (loc.file.raw(), loc.span.start, d.code.as_str())
            })
        });
        self.diagnostics
    }
}

impl Extend<Diagnostic> for DiagnosticBag {
    fn extend<T: IntoIterator<Item = Diagnostic>>(&mut self, iter: T) {
        for diag in iter {
            self.push(diag);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCode;
    use pretty_assertions::assert_eq;
    use vela_ir::{Name, SourceLoc, Span};

    fn diag_at(code: ErrorCode, start: u32) -> Diagnostic {
        Diagnostic::error(code)
            .with_message("x")
            .with_label(SourceLoc::new(Name::EMPTY, Span::new(start, start + 1)), "here")
    }

    #[test]
    fn test_counts_errors_only() {
        let mut bag = DiagnosticBag::new();
        bag.push(diag_at(ErrorCode::E3001, 0));
        bag.push(Diagnostic::warning(ErrorCode::E1004).with_message("w"));
        assert_eq!(bag.error_count(), 1);
        assert!(bag.has_errors());
    }

    #[test]
    fn test_merge_then_sort_is_deterministic() {
        let mut a = DiagnosticBag::new();
        a.push(diag_at(ErrorCode::E3001, 40));
        let mut b = DiagnosticBag::new();
        b.push(diag_at(ErrorCode::E2003, 10));

        // Merge in both orders; sorted output must agree.
        let mut left = a.clone();
        left.merge(b.clone());
        let mut right = b;
        right.merge(a);

        assert_eq!(left.into_sorted(), right.into_sorted());
    }
}
