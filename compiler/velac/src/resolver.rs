//! Type resolution over a loaded API description.
//!
//! The resolver is the universe of one generation run: scalar keywords,
//! declared smart enums and delegates, declared binding types, and any
//! framework-qualified name. It answers the [`TypeResolver`] questions the
//! extraction phase asks; an unresolvable reference returns `None`, which
//! extraction reports as E2002.

use rustc_hash::{FxHashMap, FxHashSet};
use vela_ir::decl::{ApiDescription, TypeDecl, TypeRef, TypeRefKind, TypeResolver};
use vela_ir::{Scalar, SharedInterner, TypeDescriptor, TypeKind};

/// The resolution universe built once from an [`ApiDescription`].
pub struct ApiResolver {
    interner: SharedInterner,
    /// Declared smart enums with their underlying scalar.
    smart_enums: FxHashMap<String, Scalar>,
    /// Declared delegate/callback type names.
    delegates: FxHashSet<String>,
    /// Protocol declarations by fully qualified name.
    protocols: FxHashMap<String, TypeDecl>,
    /// Every declared type name, protocols included.
    declared: FxHashSet<String>,
}

impl ApiResolver {
    /// Index the description into a resolution universe.
    pub fn new(description: &ApiDescription, interner: SharedInterner) -> Self {
        let mut smart_enums = FxHashMap::default();
        let mut protocols = FxHashMap::default();
        let mut declared = FxHashSet::default();

        for decl in &description.types {
            declared.insert(decl.name.clone());
            if decl.decoration("Protocol").is_some() {
                protocols.insert(decl.name.clone(), decl.clone());
            } else if decl.decoration("SmartEnum").is_some() {
                // Flags enums carry an unsigned native underlying type.
                let underlying = if decl.decoration("Flags").is_some() {
                    Scalar::NUInt
                } else {
                    Scalar::NInt
                };
                smart_enums.insert(decl.name.clone(), underlying);
            }
        }

        ApiResolver {
            interner,
            smart_enums,
            delegates: description.delegates.iter().cloned().collect(),
            protocols,
            declared,
        }
    }

    fn resolve_named(&self, name: &str, args: &[TypeRef]) -> Option<TypeDescriptor> {
        if let Some(scalar) = scalar_keyword(name) {
            return Some(TypeDescriptor::primitive(self.interner.intern(name), scalar));
        }
        if let Some(&underlying) = self.smart_enums.get(name) {
            return Some(TypeDescriptor::smart_enum(
                self.interner.intern(name),
                underlying,
            ));
        }
        if self.delegates.contains(name) {
            return Some(TypeDescriptor::delegate(self.interner.intern(name)));
        }
        if !args.is_empty() {
            let resolved = args
                .iter()
                .map(|arg| self.resolve(arg))
                .collect::<Option<Vec<_>>>()?;
            return Some(TypeDescriptor::generic(self.interner.intern(name), resolved));
        }
        // Declared types and framework-qualified names are reference types;
        // an unqualified name the description never declared is unknown.
        if name == "string" || name == "object" || name.contains('.') || self.declared.contains(name)
        {
            return Some(TypeDescriptor::object(self.interner.intern(name)));
        }
        None
    }
}

impl TypeResolver for ApiResolver {
    fn resolve(&self, ty: &TypeRef) -> Option<TypeDescriptor> {
        let base = match &ty.kind {
            TypeRefKind::Array(element) => TypeDescriptor::array(self.resolve(element)?),
            TypeRefKind::Named { name, args } => self.resolve_named(name, args)?,
        };
        Some(with_nullability(base, ty.nullable))
    }

    fn protocol(&self, name: &str) -> Option<&TypeDecl> {
        self.protocols.get(name)
    }
}

/// `T?` means `Nullable<T>` for value types, reference nullability otherwise.
fn with_nullability(ty: TypeDescriptor, nullable: bool) -> TypeDescriptor {
    if !nullable {
        return ty;
    }
    if matches!(ty.kind, TypeKind::Primitive(_) | TypeKind::Enum(_)) {
        TypeDescriptor::nullable_wrapper(ty)
    } else {
        ty.nullable()
    }
}

fn scalar_keyword(name: &str) -> Option<Scalar> {
    match name {
        "bool" => Some(Scalar::Bool),
        "sbyte" => Some(Scalar::SByte),
        "byte" => Some(Scalar::Byte),
        "short" => Some(Scalar::Int16),
        "ushort" => Some(Scalar::UInt16),
        "int" => Some(Scalar::Int32),
        "uint" => Some(Scalar::UInt32),
        "long" => Some(Scalar::Int64),
        "ulong" => Some(Scalar::UInt64),
        "nint" => Some(Scalar::NInt),
        "nuint" => Some(Scalar::NUInt),
        "float" => Some(Scalar::Float),
        "double" => Some(Scalar::Double),
        _ => None,
    }
}
