//! Semantic member model construction.
//!
//! The extraction phase reads one type declaration at a time and produces an
//! immutable [`TypeModel`]: the enclosing binding descriptor plus one
//! [`Member`] value per bindable member. Construction never throws for
//! recoverable shape mismatches — a constructor without an export decoration
//! simply is not modeled — and fails fast only on internal invariant
//! violations.
//!
//! Members are plain values with field-wise equality (parameter local names
//! excluded), which is what makes generation a cacheable, incremental step
//! for the host build system.

mod context;
mod extract;
mod member;

pub use context::BindingContext;
pub use extract::{extract_type, ExtractionOutcome, TypeModel};
pub use member::{
    AccessorData, ConstructorData, DictionaryAccessorData, Member, MemberCommon, MethodData,
    Modifiers, PropertyData, ProtocolRequirementData,
};
