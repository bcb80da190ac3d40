//! Host source emission.
//!
//! Turns one extracted [`vela_model::TypeModel`] into one deterministic host
//! source fragment. Member bodies come from `vela_marshal`; this crate owns
//! layout, attributes, shells, and ordering.

pub mod emit;
pub mod writer;

pub use emit::{emit_type, EmitOutcome};
pub use writer::SourceWriter;
