//! ABI categories and the native call-thunk registry.
//!
//! The native calling convention has one thunk per concrete sequence of
//! marshaled categories; there is no generic variadic dispatch. The registry
//! holds every sequence a runtime ships a thunk for, and selection is an
//! exact match — a near miss is an unsupported signature, never a silent
//! approximation.

use rustc_hash::FxHashSet;
use vela_ir::{TypeDescriptor, TypeKind, WellKnownNames};

/// Marshaled ABI category of one value position.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum AbiCategory {
    /// Pointer-sized native handle: objects, strings, arrays, blocks.
    Handle,
    /// A scalar passed in a register.
    PrimitiveScalar,
    /// A structure passed by value (geometry types).
    StructByValue,
    /// A structure passed through a pointer.
    StructByRef,
}

impl AbiCategory {
    /// Token used in thunk names.
    fn token(self) -> &'static str {
        match self {
            AbiCategory::Handle => "IntPtr",
            AbiCategory::PrimitiveScalar => "Scalar",
            AbiCategory::StructByValue => "Struct",
            AbiCategory::StructByRef => "StructPtr",
        }
    }
}

/// Classify one value position.
///
/// `by_ref` positions always marshal through a pointer to a stack slot:
/// value types become [`AbiCategory::StructByRef`], references stay
/// [`AbiCategory::Handle`] (the slot itself is pointer-sized).
pub fn abi_category(
    ty: &TypeDescriptor,
    well_known: &WellKnownNames,
    by_ref: bool,
) -> AbiCategory {
    let base = match &ty.kind {
        TypeKind::Primitive(_) | TypeKind::Enum(_) => AbiCategory::PrimitiveScalar,
        TypeKind::Object if well_known.is_geometry(ty) => AbiCategory::StructByValue,
        TypeKind::Object
        | TypeKind::Array(_)
        | TypeKind::Generic(_)
        | TypeKind::Delegate => AbiCategory::Handle,
        TypeKind::NullableWrapper(inner) => {
            // A Nullable<T> value type never fits a register; it marshals
            // through a pointer whether or not the position is by-ref.
            return match abi_category(inner, well_known, false) {
                AbiCategory::Handle => AbiCategory::Handle,
                _ => AbiCategory::StructByRef,
            };
        }
    };
    match (by_ref, base) {
        (false, base) => base,
        (true, AbiCategory::Handle) => AbiCategory::Handle,
        (true, _) => AbiCategory::StructByRef,
    }
}

/// Return-position category; `None` is a void return.
pub fn return_category(
    ty: Option<&TypeDescriptor>,
    well_known: &WellKnownNames,
) -> Option<AbiCategory> {
    ty.map(|t| abi_category(t, well_known, false))
}

/// One thunk's exact signature: return category plus argument sequence.
///
/// Receiver and selector handles are implicit in every thunk and excluded
/// from the sequence.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ThunkSignature {
    /// `None` is a void return.
    pub ret: Option<AbiCategory>,
    pub args: Vec<AbiCategory>,
}

impl ThunkSignature {
    /// Create a signature.
    pub fn new(ret: Option<AbiCategory>, args: Vec<AbiCategory>) -> Self {
        ThunkSignature { ret, args }
    }

    /// Direct-dispatch thunk name, e.g. `IntPtr_objc_msgSend_Scalar`.
    pub fn send_name(&self) -> String {
        self.name_with("objc_msgSend")
    }

    /// Superclass-dispatch thunk name, e.g. `IntPtr_objc_msgSendSuper_Scalar`.
    pub fn send_super_name(&self) -> String {
        self.name_with("objc_msgSendSuper")
    }

    fn name_with(&self, base: &str) -> String {
        let mut name = String::new();
        name.push_str(self.ret.map_or("void", AbiCategory::token));
        name.push('_');
        name.push_str(base);
        for arg in &self.args {
            name.push('_');
            name.push_str(arg.token());
        }
        name
    }
}

/// Registry of category sequences the runtime ships thunks for.
#[derive(Clone, Debug, Default)]
pub struct ThunkRegistry {
    sequences: FxHashSet<ThunkSignature>,
}

/// Longest register-category argument sequence the builtin family covers.
const BUILTIN_MAX_ARGS: usize = 6;

impl ThunkRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The builtin thunk family.
    ///
    /// Covers every sequence of up to [`BUILTIN_MAX_ARGS`] register-category
    /// arguments (`Handle`, `PrimitiveScalar`), plus the struct shapes the
    /// geometry and by-ref marshalers produce: one struct position anywhere
    /// in an otherwise register-category sequence.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        let returns: [Option<AbiCategory>; 4] = [
            None,
            Some(AbiCategory::Handle),
            Some(AbiCategory::PrimitiveScalar),
            Some(AbiCategory::StructByValue),
        ];
        let register = [AbiCategory::Handle, AbiCategory::PrimitiveScalar];
        let structs = [AbiCategory::StructByValue, AbiCategory::StructByRef];

        let mut register_seqs: Vec<Vec<AbiCategory>> = vec![Vec::new()];
        for len in 1..=BUILTIN_MAX_ARGS {
            let prev: Vec<Vec<AbiCategory>> = register_seqs
                .iter()
                .filter(|s| s.len() == len - 1)
                .cloned()
                .collect();
            for seq in prev {
                for cat in register {
                    let mut next = seq.clone();
                    next.push(cat);
                    register_seqs.push(next);
                }
            }
        }

        for ret in returns {
            for seq in &register_seqs {
                registry.register(ThunkSignature::new(ret, seq.clone()));
                // One struct position, at any slot of the sequence.
                for slot in 0..=seq.len() {
                    for st in structs {
                        let mut with_struct = seq.clone();
                        with_struct.insert(slot, st);
                        registry.register(ThunkSignature::new(ret, with_struct));
                    }
                }
            }
        }
        registry
    }

    /// Register one sequence.
    pub fn register(&mut self, signature: ThunkSignature) {
        self.sequences.insert(signature);
    }

    /// Exact-match lookup.
    pub fn contains(&self, signature: &ThunkSignature) -> bool {
        self.sequences.contains(signature)
    }

    /// Number of registered sequences.
    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    /// Whether no sequences are registered.
    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use vela_ir::{Scalar, SharedInterner};

    #[test]
    fn test_thunk_names() {
        let sig = ThunkSignature::new(
            Some(AbiCategory::Handle),
            vec![AbiCategory::Handle, AbiCategory::PrimitiveScalar],
        );
        assert_eq!(sig.send_name(), "IntPtr_objc_msgSend_IntPtr_Scalar");
        assert_eq!(sig.send_super_name(), "IntPtr_objc_msgSendSuper_IntPtr_Scalar");

        let void_sig = ThunkSignature::new(None, vec![]);
        assert_eq!(void_sig.send_name(), "void_objc_msgSend");
    }

    #[test]
    fn test_builtin_covers_register_sequences() {
        let registry = ThunkRegistry::builtin();
        assert!(registry.contains(&ThunkSignature::new(Some(AbiCategory::Handle), vec![])));
        assert!(registry.contains(&ThunkSignature::new(
            None,
            vec![AbiCategory::Handle; BUILTIN_MAX_ARGS],
        )));
        assert!(registry.contains(&ThunkSignature::new(
            Some(AbiCategory::StructByValue),
            vec![AbiCategory::PrimitiveScalar, AbiCategory::StructByRef],
        )));
    }

    #[test]
    fn test_builtin_rejects_double_struct() {
        let registry = ThunkRegistry::builtin();
        assert!(!registry.contains(&ThunkSignature::new(
            None,
            vec![AbiCategory::StructByValue, AbiCategory::StructByValue],
        )));
    }

    #[test]
    fn test_category_classification() {
        let interner = SharedInterner::new();
        let well_known = vela_ir::WellKnownNames::new(&interner);

        let int_ty = TypeDescriptor::primitive(interner.intern("int"), Scalar::Int32);
        assert_eq!(
            abi_category(&int_ty, &well_known, false),
            AbiCategory::PrimitiveScalar
        );

        let view = TypeDescriptor::object(interner.intern("UIKit.UIView"));
        assert_eq!(abi_category(&view, &well_known, false), AbiCategory::Handle);
        // A by-ref object slot is still pointer-sized.
        assert_eq!(abi_category(&view, &well_known, true), AbiCategory::Handle);

        let rect = TypeDescriptor::object(interner.intern("CoreGraphics.CGRect"));
        assert_eq!(
            abi_category(&rect, &well_known, false),
            AbiCategory::StructByValue
        );
        assert_eq!(
            abi_category(&rect, &well_known, true),
            AbiCategory::StructByRef
        );

        let nullable_rect = TypeDescriptor::nullable_wrapper(rect);
        assert_eq!(
            abi_category(&nullable_rect, &well_known, false),
            AbiCategory::StructByRef
        );
    }
}
