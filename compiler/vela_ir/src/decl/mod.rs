//! Raw declaration input surface.
//!
//! These types describe the *syntax shape* the extraction phase consumes: a
//! type declaration, its members, their decorations, and unresolved type
//! references. Nothing here is semantic — resolution into [`TypeDescriptor`]s
//! happens behind the [`TypeResolver`] seam so the compiler core never
//! depends on where declarations came from.
//!
//! All shapes derive serde so the driver can load an API description file
//! directly into them.

use crate::{Span, TypeDescriptor};
use serde::{Deserialize, Serialize};

/// A literal argument inside a decoration.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgValue {
    /// A string literal.
    Str(String),
    /// An integer literal.
    Int(i64),
    /// A boolean literal.
    Bool(bool),
    /// A `typeof`-style type reference.
    TypeRef(String),
    /// A named enum constant, e.g. `ArgumentSemantic.Copy`.
    EnumName(String),
}

/// A named decoration argument following the positional ones.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct NamedArg {
    pub key: String,
    pub value: ArgValue,
}

/// A declarative decoration attached to a type or member.
///
/// Decorations are parsed strictly: positional arguments by arity, then
/// named arguments from a recognized key set only.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct Decoration {
    /// Decoration name, e.g. `Export`, `Class`, `SupportedOSPlatform`.
    pub name: String,
    /// Positional constructor arguments.
    #[serde(default)]
    pub positional: Vec<ArgValue>,
    /// Named arguments after the positional ones.
    #[serde(default)]
    pub named: Vec<NamedArg>,
    /// Source position of the decoration.
    #[serde(default)]
    pub span: Span,
}

impl Decoration {
    /// Create a decoration with positional arguments only.
    pub fn new(name: impl Into<String>, positional: Vec<ArgValue>) -> Self {
        Decoration {
            name: name.into(),
            positional,
            named: Vec::new(),
            span: Span::DUMMY,
        }
    }

    /// Add a named argument.
    #[must_use]
    pub fn with_named(mut self, key: impl Into<String>, value: ArgValue) -> Self {
        self.named.push(NamedArg {
            key: key.into(),
            value,
        });
        self
    }
}

/// An unresolved type reference as it appears in declaration syntax.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct TypeRef {
    pub kind: TypeRefKind,
    /// `T?` in the surface syntax. Resolution decides whether this becomes
    /// reference nullability or a value-type `Nullable<T>` wrapper.
    #[serde(default)]
    pub nullable: bool,
}

/// Structural kind of an unresolved type reference.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeRefKind {
    /// A (possibly generic) named type.
    Named {
        name: String,
        #[serde(default)]
        args: Vec<TypeRef>,
    },
    /// An array of the element reference.
    Array(Box<TypeRef>),
}

impl TypeRef {
    /// Create a plain named reference.
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef {
            kind: TypeRefKind::Named {
                name: name.into(),
                args: Vec::new(),
            },
            nullable: false,
        }
    }

    /// Create a generic named reference.
    pub fn generic(name: impl Into<String>, args: Vec<TypeRef>) -> Self {
        TypeRef {
            kind: TypeRefKind::Named {
                name: name.into(),
                args,
            },
            nullable: false,
        }
    }

    /// Create an array reference.
    pub fn array(element: TypeRef) -> Self {
        TypeRef {
            kind: TypeRefKind::Array(Box::new(element)),
            nullable: false,
        }
    }

    /// Mark the reference nullable.
    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

/// Host-surface modifiers on a declaration.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierDecl {
    Public,
    Internal,
    Static,
    Virtual,
    Abstract,
    New,
}

/// A parameter as declared in the source surface.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct ParameterDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default)]
    pub is_by_ref: bool,
    #[serde(default)]
    pub is_params: bool,
    #[serde(default)]
    pub is_optional: bool,
    #[serde(default)]
    pub is_this: bool,
}

impl ParameterDecl {
    /// Create a plain parameter declaration.
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        ParameterDecl {
            name: name.into(),
            ty,
            is_by_ref: false,
            is_params: false,
            is_optional: false,
            is_this: false,
        }
    }
}

/// Syntactic shape of a member declaration.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberShape {
    Constructor,
    Method,
    Property,
}

/// A member declaration: shape, decorations, modifiers, parameters.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct MemberDecl {
    pub shape: MemberShape,
    /// Host member name; empty for constructors.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub decorations: Vec<Decoration>,
    #[serde(default)]
    pub modifiers: Vec<ModifierDecl>,
    #[serde(default)]
    pub parameters: Vec<ParameterDecl>,
    /// Return type for methods, property type for properties.
    #[serde(default)]
    pub return_type: Option<TypeRef>,
    /// Property accessor surface.
    #[serde(default)]
    pub has_getter: bool,
    #[serde(default)]
    pub has_setter: bool,
    #[serde(default)]
    pub span: Span,
}

impl MemberDecl {
    /// Find a decoration by name.
    pub fn decoration(&self, name: &str) -> Option<&Decoration> {
        self.decorations.iter().find(|d| d.name == name)
    }
}

/// A type declaration with its binding decorations and members.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct TypeDecl {
    /// Fully qualified host name.
    pub name: String,
    #[serde(default)]
    pub base: Option<String>,
    /// Protocols this type implements.
    #[serde(default)]
    pub protocols: Vec<String>,
    #[serde(default)]
    pub decorations: Vec<Decoration>,
    #[serde(default)]
    pub members: Vec<MemberDecl>,
    #[serde(default)]
    pub span: Span,
}

impl TypeDecl {
    /// Find a decoration by name.
    pub fn decoration(&self, name: &str) -> Option<&Decoration> {
        self.decorations.iter().find(|d| d.name == name)
    }
}

/// A complete API description: the unit of one generation run.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default, Serialize, Deserialize)]
pub struct ApiDescription {
    /// Declaration file path, interned into diagnostic locations.
    #[serde(default)]
    pub source_path: String,
    /// All declared types, protocols included.
    #[serde(default)]
    pub types: Vec<TypeDecl>,
    /// Names of declared delegate/callback types.
    #[serde(default)]
    pub delegates: Vec<String>,
}

/// Semantic resolution seam.
///
/// Answers the two questions extraction needs: what [`TypeDescriptor`] a
/// reference denotes, and what a protocol declares. Implemented by the
/// driver over the loaded [`ApiDescription`].
pub trait TypeResolver: Sync {
    /// Resolve a syntactic type reference into its semantic descriptor.
    ///
    /// Returns `None` for references the universe does not know; callers
    /// report that as a diagnostic, never as a panic.
    fn resolve(&self, ty: &TypeRef) -> Option<TypeDescriptor>;

    /// Look up a protocol declaration by fully qualified name.
    fn protocol(&self, name: &str) -> Option<&TypeDecl>;
}
