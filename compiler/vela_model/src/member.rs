//! The semantic member model: one closed sum type over member kinds.
//!
//! Every consumer pattern-matches [`Member`] exhaustively, so adding a kind
//! is a compile-time-checked exercise. Equality and hashing deliberately
//! exclude parameter local names and source locations: two members built
//! from textually different but semantically identical declarations compare
//! equal, which is the contract caching and incremental generation rely on.

use std::hash::{Hash, Hasher};

use bitflags::bitflags;
use vela_ir::{Name, ParameterList, SourceLoc, TypeDescriptor};
use vela_meta::{ArgumentSemantic, AvailabilitySet, ExportMetadata};

bitflags! {
    /// Host-surface modifiers carried on a member.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct Modifiers: u16 {
        const PUBLIC = 1 << 0;
        const INTERNAL = 1 << 1;
        const STATIC = 1 << 2;
        const VIRTUAL = 1 << 3;
        const ABSTRACT = 1 << 4;
        const NEW = 1 << 5;
    }
}

/// Fields shared by every member kind.
#[derive(Clone, Debug)]
pub struct MemberCommon {
    /// Fully qualified host name of the declaring type.
    pub declaring_type: Name,
    /// Merged availability across the member and all of its sources.
    pub availability: AvailabilitySet,
    /// Parsed export metadata.
    pub export: ExportMetadata,
    /// Host-surface modifiers.
    pub modifiers: Modifiers,
    /// Ordered parameters; position is the emission ground truth.
    pub parameters: ParameterList,
    /// Declaration location. Excluded from equality.
    pub loc: SourceLoc,
}

impl MemberCommon {
    /// The native selector, if the member has one.
    pub fn selector(&self) -> Option<Name> {
        self.export.selector
    }

    /// Whether the member is static.
    pub fn is_static(&self) -> bool {
        self.modifiers.contains(Modifiers::STATIC)
    }
}

// Equality reflects semantics: parameter names and source locations are
// excluded, everything else participates field-wise.
impl PartialEq for MemberCommon {
    fn eq(&self, other: &Self) -> bool {
        self.declaring_type == other.declaring_type
            && self.availability == other.availability
            && self.export.selector == other.export.selector
            && self.export.semantic == other.export.semantic
            && self.export.flags == other.export.flags
            && self.modifiers == other.modifiers
            && self.parameters.len() == other.parameters.len()
            && self
                .parameters
                .iter()
                .zip(&other.parameters)
                .all(|(a, b)| a.identity() == b.identity())
    }
}

impl Eq for MemberCommon {}

impl Hash for MemberCommon {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.declaring_type.hash(state);
        self.availability.hash(state);
        self.export.selector.hash(state);
        self.export.semantic.hash(state);
        self.export.flags.hash(state);
        self.modifiers.hash(state);
        for param in &self.parameters {
            param.identity().hash(state);
        }
    }
}

/// A modeled constructor.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ConstructorData {
    pub common: MemberCommon,
    /// True when this constructor was embedded from a protocol declaration
    /// rather than declared explicitly. Protocol-derived constructors lose
    /// to explicit ones with the same selector.
    pub protocol_derived: bool,
}

/// A modeled method.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct MethodData {
    pub common: MemberCommon,
    /// Host member name.
    pub name: Name,
    /// Return type; `None` is void.
    pub return_type: Option<TypeDescriptor>,
    /// Trampoline type name when the return type is a delegate.
    pub return_delegate_proxy: Option<Name>,
}

/// One property accessor's native binding.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct AccessorData {
    pub selector: Name,
    pub semantic: ArgumentSemantic,
}

/// A modeled selector-backed property.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct PropertyData {
    pub common: MemberCommon,
    pub name: Name,
    pub ty: TypeDescriptor,
    pub getter: Option<AccessorData>,
    pub setter: Option<AccessorData>,
    /// Trampoline type name when the property type is a delegate.
    pub delegate_proxy: Option<Name>,
}

/// A protocol requirement embedded by value into an implementing type.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ProtocolRequirementData {
    pub common: MemberCommon,
    pub name: Name,
    /// Required (vs optional) in the protocol.
    pub required: bool,
    /// Property-shaped requirement (vs method-shaped).
    pub is_property: bool,
    /// Return type for method-shaped, property type for property-shaped.
    pub return_type: Option<TypeDescriptor>,
}

/// A strong-dictionary accessor property.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct DictionaryAccessorData {
    pub common: MemberCommon,
    pub name: Name,
    pub ty: TypeDescriptor,
    /// Interned native key constant expression.
    pub key: Name,
    /// Library the key constant lives in, when not the default.
    pub key_library: Option<Name>,
}

/// A semantic binding member.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Member {
    Constructor(ConstructorData),
    Method(MethodData),
    Property(PropertyData),
    ProtocolRequirement(ProtocolRequirementData),
    DictionaryAccessor(DictionaryAccessorData),
}

impl Member {
    /// Shared fields of any kind.
    pub fn common(&self) -> &MemberCommon {
        match self {
            Member::Constructor(data) => &data.common,
            Member::Method(data) => &data.common,
            Member::Property(data) => &data.common,
            Member::ProtocolRequirement(data) => &data.common,
            Member::DictionaryAccessor(data) => &data.common,
        }
    }

    /// Host member name; `Name::EMPTY` for constructors.
    pub fn name(&self) -> Name {
        match self {
            Member::Constructor(_) => Name::EMPTY,
            Member::Method(data) => data.name,
            Member::Property(data) => data.name,
            Member::ProtocolRequirement(data) => data.name,
            Member::DictionaryAccessor(data) => data.name,
        }
    }

    /// The native selector, if any.
    pub fn selector(&self) -> Option<Name> {
        self.common().selector()
    }

    /// Kind label for diagnostics.
    pub fn kind_label(&self) -> &'static str {
        match self {
            Member::Constructor(_) => "constructor",
            Member::Method(_) => "method",
            Member::Property(_) => "property",
            Member::ProtocolRequirement(_) => "protocol requirement",
            Member::DictionaryAccessor(_) => "dictionary accessor",
        }
    }
}
