//! End-to-end generation: load, fan out, assemble.
//!
//! One declaration is one unit of parallel work. Workers share only
//! read-only state (context, resolver, thunk registry); each produces its
//! own diagnostic bag, and assembly sorts files by type name so output is
//! deterministic regardless of scheduling.

use std::path::Path;

use rayon::prelude::*;
use tracing::{debug, info_span};
use vela_diagnostic::DiagnosticBag;
use vela_emit::emit_type;
use vela_ir::decl::ApiDescription;
use vela_ir::SharedInterner;
use vela_marshal::ThunkRegistry;
use vela_model::{extract_type, BindingContext};

use crate::error::DriverError;
use crate::resolver::ApiResolver;

/// One emitted source file.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct GeneratedFile {
    /// Fully qualified host type name.
    pub type_name: String,
    /// File name relative to the output directory.
    pub file_name: String,
    /// The rendered source text.
    pub source: String,
}

/// Everything one generation run produced.
pub struct GenerationOutput {
    /// Generated files, sorted by type name.
    pub files: Vec<GeneratedFile>,
    /// Accumulated diagnostics across all declarations.
    pub diagnostics: DiagnosticBag,
    /// The run's interner, for rendering diagnostic locations.
    pub interner: SharedInterner,
}

impl GenerationOutput {
    /// Whether any error-severity diagnostic was recorded.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }
}

/// Read and parse an API description file.
pub fn load_description(path: &Path) -> Result<ApiDescription, DriverError> {
    let text = std::fs::read_to_string(path).map_err(|source| DriverError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut description: ApiDescription =
        serde_json::from_str(&text).map_err(|source| DriverError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    if description.source_path.is_empty() {
        description.source_path = path.display().to_string();
    }
    Ok(description)
}

/// Run generation over a loaded description.
pub fn generate(description: &ApiDescription) -> GenerationOutput {
    let interner = SharedInterner::new();
    let resolver = ApiResolver::new(description, interner.clone());
    let strong_dictionaries: Vec<_> = description
        .types
        .iter()
        .filter(|decl| decl.decoration("StrongDictionary").is_some())
        .map(|decl| interner.intern(&decl.name))
        .collect();
    let ctx = BindingContext::new(
        interner.clone(),
        &description.source_path,
        strong_dictionaries,
    );
    let registry = ThunkRegistry::builtin();

    let span = info_span!("generate", types = description.types.len());
    let _enter = span.enter();

    let results: Vec<(Option<GeneratedFile>, DiagnosticBag)> = description
        .types
        .par_iter()
        .map(|decl| {
            let mut diagnostics = DiagnosticBag::new();
            let outcome = extract_type(decl, &ctx, &resolver);
            diagnostics.merge(outcome.diagnostics);
            let file = outcome.model.and_then(|model| {
                let emitted = emit_type(&model, &ctx, &registry);
                diagnostics.merge(emitted.diagnostics);
                emitted.source.map(|source| GeneratedFile {
                    type_name: decl.name.clone(),
                    file_name: format!("{}.g.cs", decl.name),
                    source,
                })
            });
            debug!(type_name = %decl.name, emitted = file.is_some(), "processed declaration");
            (file, diagnostics)
        })
        .collect();

    let mut files = Vec::new();
    let mut diagnostics = DiagnosticBag::new();
    for (file, bag) in results {
        diagnostics.merge(bag);
        files.extend(file);
    }
    files.sort_by(|a, b| a.type_name.cmp(&b.type_name));

    GenerationOutput {
        files,
        diagnostics,
        interner,
    }
}
