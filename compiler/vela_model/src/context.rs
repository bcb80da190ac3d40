//! Explicit pipeline context.
//!
//! Everything extraction shares across declarations travels in this one
//! object — never in ambient static state — so the parallel fan-out has no
//! hidden shared mutability. The context is built once by the driver and
//! handed to workers read-only.

use rustc_hash::FxHashSet;
use vela_ir::{Name, SharedInterner, StringInterner, WellKnownNames};

/// Shared, read-only context for one generation run.
#[derive(Clone)]
pub struct BindingContext {
    interner: SharedInterner,
    well_known: WellKnownNames,
    /// Host names of declared strong-dictionary wrapper types; the
    /// dictionary synthesizer dispatches on membership here.
    strong_dictionaries: FxHashSet<Name>,
    /// Interned path of the declaration file, for diagnostic locations.
    file: Name,
}

impl BindingContext {
    /// Build the context for one declaration file.
    pub fn new(
        interner: SharedInterner,
        source_path: &str,
        strong_dictionary_names: impl IntoIterator<Item = Name>,
    ) -> Self {
        let well_known = WellKnownNames::new(&interner);
        let file = interner.intern(source_path);
        BindingContext {
            interner,
            well_known,
            strong_dictionaries: strong_dictionary_names.into_iter().collect(),
            file,
        }
    }

    /// The shared interner.
    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    /// Pre-resolved well-known names.
    pub fn well_known(&self) -> &WellKnownNames {
        &self.well_known
    }

    /// The declaration file name for diagnostic locations.
    pub fn file(&self) -> Name {
        self.file
    }

    /// Whether a host type name is a declared strong-dictionary wrapper.
    pub fn is_strong_dictionary(&self, name: Name) -> bool {
        self.strong_dictionaries.contains(&name)
    }
}
