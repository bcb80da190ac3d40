//! Export and availability metadata extraction.
//!
//! Turns raw declarative decorations into the immutable metadata the
//! semantic model carries:
//!
//! - [`ExportMetadata`]: native selector, argument-ownership semantic,
//!   member-kind flags
//! - [`AvailabilitySet`]: merged platform+version support/exclusion ranges
//! - [`BindingTypeDescriptor`]: the enclosing declaration's binding kind
//!
//! Parsing is strict and fail-closed: positional arguments are matched by
//! arity against the recognized set, named arguments may only come from the
//! recognized key set, and any mismatch fails the whole decoration parse —
//! no partial metadata is ever produced.

mod args;
mod availability;
mod binding_type;
mod export;

pub use args::DecorationArgs;
pub use availability::{
    collect_availability, parse_availability, AvailabilityBuilder, AvailabilityEntry,
    AvailabilitySet, Platform, Version,
};
pub use binding_type::{
    parse_binding_type, BindingKind, BindingTypeDescriptor, ClassConfig, CtorVisibility,
};
pub use export::{
    derived_setter_selector, parse_export, parse_field, ArgumentSemantic, ExportFlags,
    ExportMetadata,
};
