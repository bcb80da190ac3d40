//! Pre-resolved names the synthesis phases special-case.

use crate::{Name, StringInterner, TypeDescriptor, TypeKind};

/// Interned names for the types the marshaler and dictionary synthesizer
/// dispatch on. Built once per run from the shared interner.
#[derive(Copy, Clone, Debug)]
pub struct WellKnownNames {
    pub string: Name,
    pub ns_object: Name,
    pub ns_string: Name,
    pub ns_dictionary: Name,
    pub ns_array: Name,
    pub ns_number: Name,
    pub ns_error: Name,
    pub cg_rect: Name,
    pub cg_size: Name,
    pub cg_point: Name,
}

impl WellKnownNames {
    /// Resolve all well-known names against the interner.
    pub fn new(interner: &StringInterner) -> Self {
        WellKnownNames {
            string: interner.intern("string"),
            ns_object: interner.intern("Foundation.NSObject"),
            ns_string: interner.intern("Foundation.NSString"),
            ns_dictionary: interner.intern("Foundation.NSDictionary"),
            ns_array: interner.intern("Foundation.NSArray"),
            ns_number: interner.intern("Foundation.NSNumber"),
            ns_error: interner.intern("Foundation.NSError"),
            cg_rect: interner.intern("CoreGraphics.CGRect"),
            cg_size: interner.intern("CoreGraphics.CGSize"),
            cg_point: interner.intern("CoreGraphics.CGPoint"),
        }
    }

    /// Whether the descriptor is the host `string` type.
    pub fn is_host_string(&self, ty: &TypeDescriptor) -> bool {
        matches!(ty.kind, TypeKind::Object) && ty.name == self.string
    }

    /// Whether the descriptor is the native string object wrapper.
    pub fn is_native_string(&self, ty: &TypeDescriptor) -> bool {
        matches!(ty.kind, TypeKind::Object) && ty.name == self.ns_string
    }

    /// Whether the descriptor is the native dictionary (generic or not).
    pub fn is_native_dictionary(&self, ty: &TypeDescriptor) -> bool {
        matches!(ty.kind, TypeKind::Object | TypeKind::Generic(_)) && ty.name == self.ns_dictionary
    }

    /// Whether the descriptor is one of the geometry value types.
    pub fn is_geometry(&self, ty: &TypeDescriptor) -> bool {
        ty.name == self.cg_rect || ty.name == self.cg_size || ty.name == self.cg_point
    }
}
