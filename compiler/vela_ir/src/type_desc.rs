//! Canonical semantic type representation.
//!
//! `TypeDescriptor` captures what a host type *is* independent of surface
//! syntax: a scalar, a reference type, an array, a generic instantiation, a
//! nullable value wrapper, a delegate, or a constant-backed enum. Two
//! descriptors are equal iff their qualified name, kind, nullability and
//! element chain are structurally equal.
//!
//! Nullability has two independent axes and extraction must not collapse
//! them: `is_nullable` on the descriptor itself (reference nullability) and
//! the `NullableWrapper` kind (value-type `Nullable<T>`). A nullable array
//! of nullable strings carries `is_nullable` on both the array and its
//! element.

use crate::{Name, StringLookup};

/// Fixed-width scalar kinds the marshaler understands.
///
/// Width and signedness drive both ABI-category selection and the
/// dictionary accessor's numeric getter choice.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Scalar {
    Bool,
    SByte,
    Byte,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    /// Native-handle-sized signed integer.
    NInt,
    /// Native-handle-sized unsigned integer.
    NUInt,
    Float,
    Double,
}

impl Scalar {
    /// Whether the scalar is a signed integer kind.
    pub fn is_signed(self) -> bool {
        matches!(
            self,
            Scalar::SByte | Scalar::Int16 | Scalar::Int32 | Scalar::Int64 | Scalar::NInt
        )
    }

    /// Whether the scalar is pointer-sized (`nint`/`nuint`).
    pub fn is_native_sized(self) -> bool {
        matches!(self, Scalar::NInt | Scalar::NUInt)
    }

    /// Host-language keyword for this scalar.
    pub fn host_keyword(self) -> &'static str {
        match self {
            Scalar::Bool => "bool",
            Scalar::SByte => "sbyte",
            Scalar::Byte => "byte",
            Scalar::Int16 => "short",
            Scalar::UInt16 => "ushort",
            Scalar::Int32 => "int",
            Scalar::UInt32 => "uint",
            Scalar::Int64 => "long",
            Scalar::UInt64 => "ulong",
            Scalar::NInt => "nint",
            Scalar::NUInt => "nuint",
            Scalar::Float => "float",
            Scalar::Double => "double",
        }
    }
}

/// The shape of a semantic type.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeKind {
    /// A fixed-width scalar value type.
    Primitive(Scalar),
    /// A reference type (native object wrapper, host class, host string).
    Object,
    /// An array of the element type.
    Array(Box<TypeDescriptor>),
    /// A generic instantiation; arguments in declaration order.
    Generic(Vec<TypeDescriptor>),
    /// A delegate/callback type.
    Delegate,
    /// A value-type nullable wrapper around the inner descriptor.
    NullableWrapper(Box<TypeDescriptor>),
    /// A constant-backed enum with its underlying scalar.
    Enum(Scalar),
}

/// Canonical, hashable representation of a semantic type.
///
/// Immutable once built; created once per distinct type reference
/// encountered during extraction.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct TypeDescriptor {
    /// Fully qualified host name. For arrays and nullable wrappers this is
    /// the element/inner name; the composite syntax is derived on render.
    pub name: Name,
    /// Structural kind.
    pub kind: TypeKind,
    /// Reference-nullability of this position (`T?` on a reference type).
    pub is_nullable: bool,
}

impl TypeDescriptor {
    /// Create a scalar descriptor.
    pub fn primitive(name: Name, scalar: Scalar) -> Self {
        TypeDescriptor {
            name,
            kind: TypeKind::Primitive(scalar),
            is_nullable: false,
        }
    }

    /// Create a reference-type descriptor.
    pub fn object(name: Name) -> Self {
        TypeDescriptor {
            name,
            kind: TypeKind::Object,
            is_nullable: false,
        }
    }

    /// Create an array descriptor over an element.
    pub fn array(element: TypeDescriptor) -> Self {
        TypeDescriptor {
            name: element.name,
            kind: TypeKind::Array(Box::new(element)),
            is_nullable: false,
        }
    }

    /// Create a generic instantiation descriptor.
    pub fn generic(name: Name, args: Vec<TypeDescriptor>) -> Self {
        TypeDescriptor {
            name,
            kind: TypeKind::Generic(args),
            is_nullable: false,
        }
    }

    /// Create a delegate descriptor.
    pub fn delegate(name: Name) -> Self {
        TypeDescriptor {
            name,
            kind: TypeKind::Delegate,
            is_nullable: false,
        }
    }

    /// Create a value-type `Nullable<T>` wrapper.
    pub fn nullable_wrapper(inner: TypeDescriptor) -> Self {
        TypeDescriptor {
            name: inner.name,
            kind: TypeKind::NullableWrapper(Box::new(inner)),
            is_nullable: false,
        }
    }

    /// Create a constant-backed enum descriptor.
    pub fn smart_enum(name: Name, underlying: Scalar) -> Self {
        TypeDescriptor {
            name,
            kind: TypeKind::Enum(underlying),
            is_nullable: false,
        }
    }

    /// Mark this position reference-nullable.
    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.is_nullable = true;
        self
    }

    /// Element type, for arrays and nullable wrappers.
    pub fn element(&self) -> Option<&TypeDescriptor> {
        match &self.kind {
            TypeKind::Array(elem) | TypeKind::NullableWrapper(elem) => Some(elem),
            _ => None,
        }
    }

    /// Whether this is any scalar value type.
    pub fn is_primitive(&self) -> bool {
        matches!(self.kind, TypeKind::Primitive(_))
    }

    /// Whether this is a reference type (object, array, delegate, generic).
    pub fn is_reference(&self) -> bool {
        matches!(
            self.kind,
            TypeKind::Object | TypeKind::Array(_) | TypeKind::Generic(_) | TypeKind::Delegate
        )
    }

    /// Whether this is an array.
    pub fn is_array(&self) -> bool {
        matches!(self.kind, TypeKind::Array(_))
    }

    /// Whether this is a delegate/callback type.
    pub fn is_delegate(&self) -> bool {
        matches!(self.kind, TypeKind::Delegate)
    }

    /// Render the host-language syntax for this type.
    ///
    /// Used by the emitter and by diagnostics that name a member's shape.
    pub fn host_syntax(&self, lookup: &impl StringLookup) -> String {
        let mut out = String::new();
        self.render_into(lookup, &mut out);
        out
    }

    fn render_into(&self, lookup: &impl StringLookup, out: &mut String) {
        match &self.kind {
            TypeKind::Primitive(scalar) => out.push_str(scalar.host_keyword()),
            TypeKind::Object | TypeKind::Delegate | TypeKind::Enum(_) => {
                out.push_str(lookup.lookup(self.name));
            }
            TypeKind::Array(elem) => {
                elem.render_into(lookup, out);
                out.push_str("[]");
            }
            TypeKind::Generic(args) => {
                out.push_str(lookup.lookup(self.name));
                out.push('<');
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    arg.render_into(lookup, out);
                }
                out.push('>');
            }
            TypeKind::NullableWrapper(inner) => {
                inner.render_into(lookup, out);
                out.push('?');
            }
        }
        if self.is_nullable {
            out.push('?');
        }
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;
    use crate::StringInterner;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_structural_equality() {
        let interner = StringInterner::new();
        let s = interner.intern("string");

        let a = TypeDescriptor::array(TypeDescriptor::object(s).nullable()).nullable();
        let b = TypeDescriptor::array(TypeDescriptor::object(s).nullable()).nullable();
        assert_eq!(a, b);
    }

    #[test]
    fn test_nullability_axes_independent() {
        let interner = StringInterner::new();
        let s = interner.intern("string");

        // string?[]? vs string?[] — outer nullability must be distinguishable
        let outer_nullable = TypeDescriptor::array(TypeDescriptor::object(s).nullable()).nullable();
        let outer_plain = TypeDescriptor::array(TypeDescriptor::object(s).nullable());
        assert_ne!(outer_nullable, outer_plain);

        assert!(outer_nullable.is_nullable);
        assert!(outer_nullable.element().unwrap().is_nullable);
        assert!(!outer_plain.is_nullable);
        assert!(outer_plain.element().unwrap().is_nullable);
    }

    #[test]
    fn test_host_syntax_rendering() {
        let interner = StringInterner::new();
        let int_name = interner.intern("int");
        let ns_dict = interner.intern("Foundation.NSDictionary");
        let ns_str = interner.intern("Foundation.NSString");

        let int_ty = TypeDescriptor::primitive(int_name, Scalar::Int32);
        assert_eq!(int_ty.host_syntax(&interner), "int");

        let wrapped = TypeDescriptor::nullable_wrapper(int_ty.clone());
        assert_eq!(wrapped.host_syntax(&interner), "int?");

        let dict = TypeDescriptor::generic(
            ns_dict,
            vec![TypeDescriptor::object(ns_str), int_ty],
        );
        assert_eq!(
            dict.host_syntax(&interner),
            "Foundation.NSDictionary<Foundation.NSString, int>"
        );
    }

    #[test]
    fn test_nested_array_syntax() {
        let interner = StringInterner::new();
        let s = interner.intern("string");
        let ty = TypeDescriptor::array(TypeDescriptor::object(s).nullable()).nullable();
        assert_eq!(ty.host_syntax(&interner), "string?[]?");
    }
}
