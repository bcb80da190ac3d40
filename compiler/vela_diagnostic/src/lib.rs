//! Structured diagnostics for the Vela binding generator.
//!
//! Every failure mode in the pipeline becomes a [`Diagnostic`] value: an
//! error code, the offending declaration's location, and a human-readable
//! message. Diagnostics are *accumulated* in a [`DiagnosticBag`], never
//! thrown as control flow across member boundaries — one member's failure
//! must not block its siblings.

mod bag;
mod diagnostic;
mod error_code;

pub use bag::DiagnosticBag;
pub use diagnostic::{internal_error, Diagnostic, Label, Severity};
pub use error_code::ErrorCode;
