//! Vela IR - core data types for the binding generator.
//!
//! This crate contains the leaf data structures every later phase consumes:
//! - Spans and source locations
//! - Interned `Name` identifiers and the sharded string interner
//! - `TypeDescriptor`, the canonical semantic type representation
//! - `Parameter`, the ordered member parameter model
//! - The raw declaration input surface (`decl` module)
//!
//! # Design Philosophy
//!
//! - **Intern everything**: selector and type-name strings become `Name(u32)`
//!   so equality and hashing are O(1) across the whole pipeline.
//! - **Build once, never mutate**: every entity here is constructed during
//!   extraction and consumed read-only by synthesis and emission.
//! - **Structural equality everywhere**: member-model caching depends on
//!   field-wise `Eq`/`Hash`, so every type derives the full set.

pub mod decl;
mod interner;
mod name;
mod param;
mod span;
mod type_desc;
mod well_known;

pub use interner::{InternError, SharedInterner, StringInterner, StringLookup};
pub use name::Name;
pub use param::{Parameter, ParameterIdentity, ParameterList};
pub use span::{SourceLoc, Span};
pub use type_desc::{Scalar, TypeDescriptor, TypeKind};
pub use well_known::WellKnownNames;
