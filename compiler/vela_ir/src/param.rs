//! Ordered member parameter model.

use crate::{Name, TypeDescriptor};
use smallvec::SmallVec;

/// Parameter list storage; most members have at most four parameters.
pub type ParameterList = SmallVec<[Parameter; 4]>;

/// A single member parameter.
///
/// `position` is the ground truth for emission order; conversion-safety
/// reordering in the marshaler always interleaves back to it.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Parameter {
    /// Zero-based declaration position.
    pub position: u32,
    /// Resolved semantic type.
    pub ty: TypeDescriptor,
    /// Local parameter name. Excluded from member identity; see
    /// [`Parameter::identity`].
    pub name: Name,
    /// `out`/`ref` parameter, marshaled through a stack slot.
    pub is_by_ref: bool,
    /// Variadic `params` tail parameter.
    pub is_params: bool,
    /// Has a default value in the host surface.
    pub is_optional: bool,
    /// Receiver of an extension-style binding member.
    pub is_this: bool,
    /// Trampoline type name for delegate-typed parameters, synthesized at
    /// extraction so later phases never re-derive it.
    pub block_proxy: Option<Name>,
}

impl Parameter {
    /// Create a plain parameter.
    pub fn new(position: u32, ty: TypeDescriptor, name: Name) -> Self {
        Parameter {
            position,
            ty,
            name,
            is_by_ref: false,
            is_params: false,
            is_optional: false,
            is_this: false,
            block_proxy: None,
        }
    }

    /// Mark as `out`/`ref`.
    #[must_use]
    pub fn by_ref(mut self) -> Self {
        self.is_by_ref = true;
        self
    }

    /// Mark as a variadic tail.
    #[must_use]
    pub fn params(mut self) -> Self {
        self.is_params = true;
        self
    }

    /// Mark as optional.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.is_optional = true;
        self
    }

    /// Mark as the extension-style receiver.
    #[must_use]
    pub fn this(mut self) -> Self {
        self.is_this = true;
        self
    }

    /// Attach a delegate trampoline type name.
    #[must_use]
    pub fn with_block_proxy(mut self, proxy: Name) -> Self {
        self.block_proxy = Some(proxy);
        self
    }

    /// Name-excluded view used for member equality and hashing.
    ///
    /// Two members built from declarations that differ only in parameter
    /// local names must compare equal; caching keys are built over this
    /// view, never over the full `Parameter`.
    pub fn identity(&self) -> ParameterIdentity<'_> {
        ParameterIdentity {
            position: self.position,
            ty: &self.ty,
            is_by_ref: self.is_by_ref,
            is_params: self.is_params,
            is_optional: self.is_optional,
            is_this: self.is_this,
            block_proxy: self.block_proxy,
        }
    }
}

/// Borrowed identity view of a [`Parameter`] with the local name excluded.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ParameterIdentity<'a> {
    pub position: u32,
    pub ty: &'a TypeDescriptor,
    pub is_by_ref: bool,
    pub is_params: bool,
    pub is_optional: bool,
    pub is_this: bool,
    pub block_proxy: Option<Name>,
}
