//! Binding-kind descriptors for enclosing type declarations.

use vela_diagnostic::{Diagnostic, ErrorCode};
use vela_ir::decl::TypeDecl;
use vela_ir::{Name, SourceLoc, StringInterner};

use crate::DecorationArgs;

/// Visibility of a synthesized constructor.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum CtorVisibility {
    #[default]
    Public,
    Protected,
    Internal,
    Private,
    /// The constructor is not emitted at all.
    Disabled,
}

impl CtorVisibility {
    /// Parse from an enum constant, accepting a qualified form.
    pub fn parse(s: &str) -> Option<Self> {
        let last = s.rsplit('.').next().unwrap_or(s);
        match last {
            "Public" => Some(CtorVisibility::Public),
            "Protected" => Some(CtorVisibility::Protected),
            "Internal" => Some(CtorVisibility::Internal),
            "Private" => Some(CtorVisibility::Private),
            "Disabled" => Some(CtorVisibility::Disabled),
            _ => None,
        }
    }
}

/// The synthesized-constructor visibility triple for class bindings.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct ClassConfig {
    /// Visibility of the parameterless `init` constructor.
    pub default_ctor: CtorVisibility,
    /// Visibility of the native-handle wrapping constructor.
    pub native_handle_ctor: CtorVisibility,
    /// Visibility of the string-coder constructor.
    pub string_ctor: CtorVisibility,
}

/// Kind-specific binding configuration for an enclosing declaration.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum BindingKind {
    /// A native class binding.
    Class(ClassConfig),
    /// A protocol definition.
    Protocol,
    /// A category extending `target`.
    Category { target: Name },
    /// A constant-backed enum, optionally an error domain.
    SmartEnum {
        error_domain: Option<Name>,
        library_name: Option<Name>,
    },
    /// A strong-dictionary wrapper over an untyped native dictionary.
    StrongDictionary,
}

/// Describes how an enclosing declaration binds to the native runtime.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct BindingTypeDescriptor {
    /// Kind-specific configuration.
    pub kind: BindingKind,
    /// Native-side name (class name, protocol name, enum prefix).
    pub native_name: Name,
    /// Location of the binding decoration.
    pub loc: SourceLoc,
}

impl BindingTypeDescriptor {
    /// Whether this declaration is a strong-dictionary wrapper.
    pub fn is_strong_dictionary(&self) -> bool {
        matches!(self.kind, BindingKind::StrongDictionary)
    }

    /// Whether this declaration is a protocol.
    pub fn is_protocol(&self) -> bool {
        matches!(self.kind, BindingKind::Protocol)
    }
}

/// Default native name: the unqualified tail of the host name.
fn default_native_name(host_name: &str) -> &str {
    host_name.rsplit('.').next().unwrap_or(host_name)
}

/// Parse the binding-kind decoration of a type declaration.
///
/// Returns `Ok(None)` when the declaration carries no recognized binding
/// decoration — such types are simply not bound, which is not an error.
pub fn parse_binding_type(
    decl: &TypeDecl,
    file: Name,
    interner: &StringInterner,
) -> Result<Option<BindingTypeDescriptor>, Diagnostic> {
    for dec in &decl.decorations {
        let args = DecorationArgs::new(dec, file);

        let kind = match dec.name.as_str() {
            "Class" => {
                args.check_named_keys(&[
                    "Name",
                    "Flags",
                    "DefaultCtorVisibility",
                    "NativeHandleCtorVisibility",
                    "StringCtorVisibility",
                ])?;
                let mut config = ClassConfig::default();
                for (key, slot) in [
                    ("DefaultCtorVisibility", &mut config.default_ctor),
                    ("NativeHandleCtorVisibility", &mut config.native_handle_ctor),
                    ("StringCtorVisibility", &mut config.string_ctor),
                ] {
                    if let Some(raw) = args.named_enum(key)? {
                        *slot = CtorVisibility::parse(raw).ok_or_else(|| {
                            Diagnostic::error(ErrorCode::E1002)
                                .with_message(format!(
                                    "`{raw}` is not a constructor visibility"
                                ))
                                .with_label(args.loc(), "in this decoration")
                        })?;
                    }
                }
                BindingKind::Class(config)
            }
            "Protocol" => {
                args.check_named_keys(&["Name"])?;
                BindingKind::Protocol
            }
            "Category" => {
                args.check_named_keys(&["Name", "CategoryType"])?;
                // The extension target must be a type; anything else is an
                // impossible declaration, not a recoverable mismatch.
                let target = match args.named_type_ref("CategoryType")? {
                    Some(t) => t,
                    None => {
                        if args.arity() != 1 {
                            return Err(args.arity_error("1"));
                        }
                        args.type_ref_at(0).map_err(|_| {
                            Diagnostic::error(ErrorCode::E2001)
                                .with_message(
                                    "category decoration must name its extension target type",
                                )
                                .with_label(args.loc(), "in this decoration")
                        })?
                    }
                };
                BindingKind::Category {
                    target: interner.intern(target),
                }
            }
            "SmartEnum" => {
                args.check_named_keys(&["Name", "ErrorDomain", "LibraryName"])?;
                BindingKind::SmartEnum {
                    error_domain: args.named_str("ErrorDomain")?.map(|s| interner.intern(s)),
                    library_name: args.named_str("LibraryName")?.map(|s| interner.intern(s)),
                }
            }
            "StrongDictionary" => {
                args.check_named_keys(&["Name"])?;
                BindingKind::StrongDictionary
            }
            _ => continue,
        };

        // Positional native name, then the `Name` key, then the host tail.
        let native_name = match args.arity() {
            0 => None,
            1 => {
                if matches!(kind, BindingKind::Category { .. }) {
                    // Category's single positional argument is its target.
                    None
                } else {
                    Some(args.str_at(0)?)
                }
            }
            _ => return Err(args.arity_error("0 or 1")),
        };
        let native_name = match native_name {
            Some(n) => n,
            None => args
                .named_str("Name")?
                .unwrap_or_else(|| default_native_name(&decl.name)),
        };

        return Ok(Some(BindingTypeDescriptor {
            kind,
            native_name: interner.intern(native_name),
            loc: args.loc(),
        }));
    }

    Ok(None)
}
