//! Export metadata: selector, ownership semantic, member flags.

use bitflags::bitflags;
use vela_diagnostic::{Diagnostic, ErrorCode};
use vela_ir::decl::Decoration;
use vela_ir::{Name, SourceLoc, StringInterner};

use crate::DecorationArgs;

/// Argument-ownership semantic attached to an export.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum ArgumentSemantic {
    #[default]
    None,
    Copy,
    Retain,
    Weak,
    Assign,
}

impl ArgumentSemantic {
    /// Parse from an enum constant, accepting a qualified form like
    /// `ArgumentSemantic.Copy`.
    pub fn parse(s: &str) -> Option<Self> {
        let last = s.rsplit('.').next().unwrap_or(s);
        match last {
            "None" => Some(ArgumentSemantic::None),
            "Copy" => Some(ArgumentSemantic::Copy),
            "Retain" | "Strong" => Some(ArgumentSemantic::Retain),
            "Weak" => Some(ArgumentSemantic::Weak),
            "Assign" | "UnsafeUnretained" => Some(ArgumentSemantic::Assign),
            _ => None,
        }
    }
}

bitflags! {
    /// Member-kind-specific export flags.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct ExportFlags: u32 {
        /// Synthesize an asynchronous-completion variant.
        const ASYNC = 1 << 0;
        /// Factory semantics: the selector returns a new instance.
        const FACTORY = 1 << 1;
        /// Wrap the send in native exception marshaling.
        const MARSHAL_NATIVE_EXCEPTIONS = 1 << 2;
        /// Notification-style member; feeds the event synthesizer.
        const NOTIFICATION = 1 << 3;
        /// Caller supplies a custom marshal directive.
        const CUSTOM_MARSHAL_DIRECTIVE = 1 << 4;
    }
}

impl ExportFlags {
    /// Parse a `|`-separated flag list, accepting qualified constants.
    pub fn parse(s: &str) -> Option<Self> {
        let mut flags = ExportFlags::empty();
        for part in s.split('|') {
            let last = part.trim().rsplit('.').next()?;
            match last {
                "Default" | "None" => {}
                "Async" => flags |= ExportFlags::ASYNC,
                "Factory" => flags |= ExportFlags::FACTORY,
                "MarshalNativeExceptions" => flags |= ExportFlags::MARSHAL_NATIVE_EXCEPTIONS,
                "Notification" => flags |= ExportFlags::NOTIFICATION,
                "CustomMarshalDirective" => flags |= ExportFlags::CUSTOM_MARSHAL_DIRECTIVE,
                _ => return None,
            }
        }
        Some(flags)
    }
}

/// Parsed export metadata for one member.
///
/// The selector is `None` only for members whose native binding is purely
/// value-based (dictionary-backed properties).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ExportMetadata {
    /// Interned native selector.
    pub selector: Option<Name>,
    /// Argument-ownership semantic.
    pub semantic: ArgumentSemantic,
    /// Member-kind flags.
    pub flags: ExportFlags,
    /// Location of the decoration.
    pub loc: SourceLoc,
}

impl ExportMetadata {
    /// Metadata for a value-based member with no selector.
    pub fn value_based(loc: SourceLoc) -> Self {
        ExportMetadata {
            selector: None,
            semantic: ArgumentSemantic::None,
            flags: ExportFlags::empty(),
            loc,
        }
    }
}

/// Parse an `Export` decoration.
///
/// Recognized forms: `Export("selector")` and
/// `Export("selector", ArgumentSemantic.X)`, optionally followed by a
/// `Flags` named argument. Anything else fails the whole parse.
pub fn parse_export(
    dec: &Decoration,
    file: Name,
    interner: &StringInterner,
) -> Result<ExportMetadata, Diagnostic> {
    let args = DecorationArgs::new(dec, file);
    args.check_named_keys(&["Flags"])?;

    let (selector, semantic) = match args.arity() {
        1 => (args.str_at(0)?, ArgumentSemantic::None),
        2 => {
            let sel = args.str_at(0)?;
            let raw = args.enum_at(1)?;
            let semantic = ArgumentSemantic::parse(raw).ok_or_else(|| {
                Diagnostic::error(ErrorCode::E1002)
                    .with_message(format!("`{raw}` is not an argument semantic"))
                    .with_label(args.loc(), "in this decoration")
            })?;
            (sel, semantic)
        }
        _ => return Err(args.arity_error("1 or 2")),
    };

    let flags = match args.named_enum("Flags")? {
        None => ExportFlags::empty(),
        Some(raw) => ExportFlags::parse(raw).ok_or_else(|| {
            Diagnostic::error(ErrorCode::E1002)
                .with_message(format!("`{raw}` is not a recognized flag set"))
                .with_label(args.loc(), "in this decoration")
        })?,
    };

    Ok(ExportMetadata {
        selector: Some(interner.intern(selector)),
        semantic,
        flags,
        loc: args.loc(),
    })
}

/// Parse a `Field` decoration naming a native string constant.
///
/// Recognized forms: `Field("Key")` and `Field("Key", "LibraryName")`.
/// Returns the interned key expression and optional library.
pub fn parse_field(
    dec: &Decoration,
    file: Name,
    interner: &StringInterner,
) -> Result<(Name, Option<Name>), Diagnostic> {
    let args = DecorationArgs::new(dec, file);
    args.check_named_keys(&[])?;

    match args.arity() {
        1 => Ok((interner.intern(args.str_at(0)?), None)),
        2 => Ok((
            interner.intern(args.str_at(0)?),
            Some(interner.intern(args.str_at(1)?)),
        )),
        _ => Err(args.arity_error("1 or 2")),
    }
}

/// Derive the conventional setter selector from a getter selector.
///
/// `title` becomes `setTitle:`. Used for properties whose decoration only
/// names the getter.
pub fn derived_setter_selector(getter: &str) -> String {
    let mut out = String::with_capacity(getter.len() + 4);
    out.push_str("set");
    let mut chars = getter.chars();
    if let Some(first) = chars.next() {
        out.extend(first.to_uppercase());
        out.push_str(chars.as_str());
    }
    out.push(':');
    out
}
