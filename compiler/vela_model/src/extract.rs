//! Per-declaration extraction into the semantic member model.
//!
//! `extract_type` is the unit of the parallel fan-out: it reads one type
//! declaration, parses its binding and availability decorations, models every
//! bindable member, and embeds protocol requirements by value. A failure in
//! one member becomes a diagnostic; sibling members proceed.

use smallvec::SmallVec;
use tracing::debug;
use vela_diagnostic::{internal_error, Diagnostic, DiagnosticBag, ErrorCode};
use vela_ir::decl::{
    MemberDecl, MemberShape, ModifierDecl, TypeDecl, TypeRef, TypeRefKind, TypeResolver,
};
use vela_ir::{Name, Parameter, ParameterList, SourceLoc, TypeDescriptor};
use vela_meta::{
    collect_availability, derived_setter_selector, parse_binding_type, parse_export, parse_field,
    AvailabilityBuilder, AvailabilitySet, BindingKind, BindingTypeDescriptor, ExportMetadata,
};

use crate::{
    AccessorData, BindingContext, ConstructorData, DictionaryAccessorData, Member, MemberCommon,
    MethodData, Modifiers, PropertyData, ProtocolRequirementData,
};

/// The immutable semantic model of one bound type.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct TypeModel {
    /// Fully qualified host name.
    pub host_name: Name,
    /// Host base type, if declared.
    pub base: Option<Name>,
    /// The enclosing declaration's binding descriptor.
    pub binding: BindingTypeDescriptor,
    /// Type-level availability (already merged into each member's set).
    pub availability: AvailabilitySet,
    /// Modeled members in declaration order; the emitter sorts.
    pub members: Vec<Member>,
}

/// Result of extracting one declaration: a model when the declaration was
/// bindable and well-formed, plus any diagnostics either way.
#[derive(Debug, Default)]
pub struct ExtractionOutcome {
    pub model: Option<TypeModel>,
    pub diagnostics: DiagnosticBag,
}

/// Extract the semantic model for one type declaration.
pub fn extract_type(
    decl: &TypeDecl,
    ctx: &BindingContext,
    resolver: &dyn TypeResolver,
) -> ExtractionOutcome {
    let mut outcome = ExtractionOutcome::default();

    let binding = match parse_binding_type(decl, ctx.file(), ctx.interner()) {
        Ok(Some(binding)) => binding,
        Ok(None) => return outcome,
        Err(diag) => {
            outcome.diagnostics.push(diag);
            return outcome;
        }
    };

    // Fail-closed: a malformed decoration aborts this whole declaration.
    let mut availability = AvailabilityBuilder::new();
    if let Err(diag) = collect_availability(&decl.decorations, ctx.file(), &mut availability) {
        outcome.diagnostics.push(diag);
        return outcome;
    }
    let type_availability = availability.build();

    debug!(type_name = %decl.name, kind = ?binding.kind, "extracting type");

    let mut extractor = Extractor {
        decl,
        ctx,
        resolver,
        host_name: ctx.interner().intern(&decl.name),
        binding: &binding,
        type_availability: type_availability.clone(),
        members: Vec::new(),
        diagnostics: DiagnosticBag::new(),
    };

    extractor.extract_members();
    extractor.embed_protocols();

    let Extractor {
        members,
        diagnostics,
        host_name,
        ..
    } = extractor;
    outcome.diagnostics = diagnostics;
    outcome.model = Some(TypeModel {
        host_name,
        base: decl.base.as_deref().map(|b| ctx.interner().intern(b)),
        binding,
        availability: type_availability,
        members,
    });
    outcome
}

struct Extractor<'a> {
    decl: &'a TypeDecl,
    ctx: &'a BindingContext,
    resolver: &'a dyn TypeResolver,
    host_name: Name,
    binding: &'a BindingTypeDescriptor,
    type_availability: AvailabilitySet,
    members: Vec<Member>,
    diagnostics: DiagnosticBag,
}

impl<'a> Extractor<'a> {
    fn extract_members(&mut self) {
        let decl = self.decl;
        for member in &decl.members {
            let result = match (&self.binding.kind, member.shape) {
                (BindingKind::StrongDictionary, MemberShape::Property) => {
                    self.try_dictionary_accessor(member)
                }
                (BindingKind::Protocol, MemberShape::Method | MemberShape::Property) => {
                    self.try_protocol_requirement(member)
                }
                (_, MemberShape::Constructor) => self.try_constructor(member),
                (_, MemberShape::Method) => self.try_method(member),
                (_, MemberShape::Property) => self.try_property(member),
            };
            match result {
                Ok(Some(modeled)) => self.members.push(modeled),
                Ok(None) => {}
                Err(diag) => self.diagnostics.push(diag),
            }
        }
    }

    fn loc_of(&self, member: &MemberDecl) -> SourceLoc {
        SourceLoc::new(self.ctx.file(), member.span)
    }

    /// Merge availability from the member's decorations, the enclosing
    /// type, and (for embedded requirements) the protocol's decorations.
    fn member_availability(
        &self,
        member: &MemberDecl,
        protocol: Option<&TypeDecl>,
    ) -> Result<AvailabilitySet, Diagnostic> {
        let mut builder = AvailabilityBuilder::new();
        collect_availability(&member.decorations, self.ctx.file(), &mut builder)?;
        if let Some(proto) = protocol {
            collect_availability(&proto.decorations, self.ctx.file(), &mut builder)?;
        }
        builder.add_set(&self.type_availability);
        Ok(builder.build())
    }

    fn resolve_type(&self, ty: &TypeRef, loc: SourceLoc) -> Result<TypeDescriptor, Diagnostic> {
        self.resolver.resolve(ty).ok_or_else(|| {
            Diagnostic::error(ErrorCode::E2002)
                .with_message(format!(
                    "cannot resolve type reference `{}`",
                    type_ref_display(ty)
                ))
                .with_label(loc, "in this member")
        })
    }

    /// Synthesized trampoline type name for a delegate position.
    fn proxy_name(&self, member_name: &str, param_name: Option<&str>) -> Name {
        let owner = self.decl.name.rsplit('.').next().unwrap_or(&self.decl.name);
        let name = match param_name {
            Some(param) => format!(
                "Trampolines.{owner}{member_name}{}Proxy",
                capitalize(param)
            ),
            None => format!("Trampolines.{owner}{member_name}Proxy"),
        };
        self.ctx.interner().intern(&name)
    }

    /// Resolve the declared parameter list in declaration order.
    ///
    /// Receiver parameters must come first; anything else is an internal
    /// invariant violation, not a recoverable mismatch.
    fn resolve_parameters(
        &self,
        member: &MemberDecl,
        member_label: &str,
    ) -> Result<ParameterList, Diagnostic> {
        let loc = self.loc_of(member);
        let mut parameters: ParameterList = SmallVec::new();
        for (index, decl) in member.parameters.iter().enumerate() {
            if decl.is_this && index != 0 {
                return Err(internal_error(
                    loc,
                    format!(
                        "receiver parameter `{}` is not first in `{}`",
                        decl.name, member.name
                    ),
                ));
            }
            let ty = self.resolve_type(&decl.ty, loc)?;
            #[expect(
                clippy::cast_possible_truncation,
                reason = "parameter counts are tiny"
            )]
            let mut param = Parameter::new(index as u32, ty, self.ctx.interner().intern(&decl.name));
            if decl.is_by_ref {
                param = param.by_ref();
            }
            if decl.is_params {
                param = param.params();
            }
            if decl.is_optional {
                param = param.optional();
            }
            if decl.is_this {
                param = param.this();
            }
            if param.ty.is_delegate() {
                param = param.with_block_proxy(self.proxy_name(member_label, Some(&decl.name)));
            }
            parameters.push(param);
        }
        Ok(parameters)
    }

    fn common_for(
        &self,
        member: &MemberDecl,
        export: ExportMetadata,
        protocol: Option<&TypeDecl>,
        member_label: &str,
    ) -> Result<MemberCommon, Diagnostic> {
        Ok(MemberCommon {
            declaring_type: self.host_name,
            availability: self.member_availability(member, protocol)?,
            export,
            modifiers: modifiers_from(&member.modifiers),
            parameters: self.resolve_parameters(member, member_label)?,
            loc: self.loc_of(member),
        })
    }

    /// Model a constructor; a constructor without an export decoration is
    /// simply not bound.
    fn try_constructor(&self, member: &MemberDecl) -> Result<Option<Member>, Diagnostic> {
        let Some(dec) = member.decoration("Export") else {
            return Ok(None);
        };
        let export = parse_export(dec, self.ctx.file(), self.ctx.interner())?;
        let common = self.common_for(member, export, None, "Ctor")?;
        Ok(Some(Member::Constructor(ConstructorData {
            common,
            protocol_derived: false,
        })))
    }

    fn try_method(&self, member: &MemberDecl) -> Result<Option<Member>, Diagnostic> {
        let Some(dec) = member.decoration("Export") else {
            return Ok(None);
        };
        let export = parse_export(dec, self.ctx.file(), self.ctx.interner())?;
        let common = self.common_for(member, export, None, &member.name)?;
        let return_type = match &member.return_type {
            None => None,
            Some(ty) => Some(self.resolve_type(ty, self.loc_of(member))?),
        };
        let return_delegate_proxy = return_type
            .as_ref()
            .filter(|ty| ty.is_delegate())
            .map(|_| self.proxy_name(&member.name, None));
        Ok(Some(Member::Method(MethodData {
            common,
            name: self.ctx.interner().intern(&member.name),
            return_type,
            return_delegate_proxy,
        })))
    }

    fn try_property(&self, member: &MemberDecl) -> Result<Option<Member>, Diagnostic> {
        let Some(dec) = member.decoration("Export") else {
            return Ok(None);
        };
        let export = parse_export(dec, self.ctx.file(), self.ctx.interner())?;
        let loc = self.loc_of(member);
        let Some(ty_ref) = &member.return_type else {
            return Err(internal_error(
                loc,
                format!("property `{}` has no declared type", member.name),
            ));
        };
        let ty = self.resolve_type(ty_ref, loc)?;
        let Some(getter_selector) = export.selector else {
            return Err(internal_error(
                loc,
                format!("property `{}` export parsed without a selector", member.name),
            ));
        };

        let getter = member.has_getter.then_some(AccessorData {
            selector: getter_selector,
            semantic: export.semantic,
        });
        let setter = member
            .has_setter
            .then(|| {
                let getter_str = self.ctx.interner().lookup(getter_selector);
                let derived = derived_setter_selector(getter_str);
                AccessorData {
                    selector: self.ctx.interner().intern(&derived),
                    semantic: export.semantic,
                }
            });

        let delegate_proxy = ty
            .is_delegate()
            .then(|| self.proxy_name(&member.name, None));

        let common = self.common_for(member, export, None, &member.name)?;
        Ok(Some(Member::Property(PropertyData {
            common,
            name: self.ctx.interner().intern(&member.name),
            ty,
            getter,
            setter,
            delegate_proxy,
        })))
    }

    /// Model a strong-dictionary accessor; a property without a `Field`
    /// decoration is simply not bound.
    fn try_dictionary_accessor(&self, member: &MemberDecl) -> Result<Option<Member>, Diagnostic> {
        let Some(dec) = member.decoration("Field") else {
            return Ok(None);
        };
        let (key, key_library) = parse_field(dec, self.ctx.file(), self.ctx.interner())?;
        let loc = self.loc_of(member);
        let Some(ty_ref) = &member.return_type else {
            return Err(internal_error(
                loc,
                format!("dictionary accessor `{}` has no declared type", member.name),
            ));
        };
        let ty = self.resolve_type(ty_ref, loc)?;
        let common = self.common_for(
            member,
            ExportMetadata::value_based(loc),
            None,
            &member.name,
        )?;
        Ok(Some(Member::DictionaryAccessor(DictionaryAccessorData {
            common,
            name: self.ctx.interner().intern(&member.name),
            ty,
            key,
            key_library,
        })))
    }

    /// Model a protocol's own requirement declaration.
    fn try_protocol_requirement(&self, member: &MemberDecl) -> Result<Option<Member>, Diagnostic> {
        let Some(dec) = member.decoration("Export") else {
            return Ok(None);
        };
        let export = parse_export(dec, self.ctx.file(), self.ctx.interner())?;
        let common = self.common_for(member, export, None, &member.name)?;
        let return_type = match &member.return_type {
            None => None,
            Some(ty) => Some(self.resolve_type(ty, self.loc_of(member))?),
        };
        Ok(Some(Member::ProtocolRequirement(ProtocolRequirementData {
            common,
            name: self.ctx.interner().intern(&member.name),
            required: member.modifiers.contains(&ModifierDecl::Abstract),
            is_property: member.shape == MemberShape::Property,
            return_type,
        })))
    }

    /// Embed every implemented protocol's declarations by value.
    fn embed_protocols(&mut self) {
        if !matches!(self.binding.kind, BindingKind::Class(_)) {
            return;
        }
        let decl = self.decl;
        for proto_name in &decl.protocols {
            let Some(proto) = self.resolver.protocol(proto_name) else {
                self.diagnostics.push(
                    Diagnostic::error(ErrorCode::E2002)
                        .with_message(format!("unknown protocol `{proto_name}`"))
                        .with_label(
                            SourceLoc::new(self.ctx.file(), decl.span),
                            "implemented by this type",
                        ),
                );
                continue;
            };
            for member in &proto.members {
                let result = match member.shape {
                    MemberShape::Constructor => self.embed_protocol_constructor(proto, member),
                    MemberShape::Method | MemberShape::Property => {
                        self.embed_protocol_requirement(proto, member)
                    }
                };
                if let Err(diag) = result {
                    self.diagnostics.push(diag);
                }
            }
        }
    }

    /// Embed a protocol factory constructor, suppressing it when the class
    /// explicitly declares a constructor for the same selector.
    fn embed_protocol_constructor(
        &mut self,
        proto: &TypeDecl,
        member: &MemberDecl,
    ) -> Result<(), Diagnostic> {
        let Some(dec) = member.decoration("Export") else {
            return Ok(());
        };
        let export = parse_export(dec, self.ctx.file(), self.ctx.interner())?;
        let selector = export.selector;

        let existing = self.members.iter().find_map(|m| match m {
            Member::Constructor(data) if data.common.export.selector == selector => Some(data),
            _ => None,
        });
        if let Some(existing) = existing {
            if existing.protocol_derived {
                let candidate = ConstructorData {
                    common: self.protocol_common(proto, member, export)?,
                    protocol_derived: true,
                };
                if *existing != candidate {
                    return Err(Diagnostic::error(ErrorCode::E2003)
                        .with_message(format!(
                            "protocols declare conflicting constructors for selector `{}`",
                            selector.map_or("", |s| self.ctx.interner().lookup_static(s))
                        ))
                        .with_label(candidate.common.loc, "conflicting declaration")
                        .with_secondary_label(existing.common.loc, "first declared here"));
                }
            }
            // Explicit constructor wins; identical protocol-derived
            // duplicates collapse silently.
            return Ok(());
        }

        let data = ConstructorData {
            common: self.protocol_common(proto, member, export)?,
            protocol_derived: true,
        };
        self.members.push(Member::Constructor(data));
        Ok(())
    }

    fn embed_protocol_requirement(
        &mut self,
        proto: &TypeDecl,
        member: &MemberDecl,
    ) -> Result<(), Diagnostic> {
        let Some(dec) = member.decoration("Export") else {
            return Ok(());
        };
        let export = parse_export(dec, self.ctx.file(), self.ctx.interner())?;
        let common = self.protocol_common(proto, member, export)?;
        let return_type = match &member.return_type {
            None => None,
            Some(ty) => Some(self.resolve_type(ty, self.loc_of(member))?),
        };
        self.members
            .push(Member::ProtocolRequirement(ProtocolRequirementData {
                common,
                name: self.ctx.interner().intern(&member.name),
                required: member.modifiers.contains(&ModifierDecl::Abstract),
                is_property: member.shape == MemberShape::Property,
                return_type,
            }));
        Ok(())
    }

    /// Common fields for an embedded protocol member: declared by the
    /// implementing class, availability merged across all three sources.
    fn protocol_common(
        &self,
        proto: &TypeDecl,
        member: &MemberDecl,
        export: ExportMetadata,
    ) -> Result<MemberCommon, Diagnostic> {
        let mut common = self.common_for(member, export, Some(proto), &member.name)?;
        common.declaring_type = self.host_name;
        Ok(common)
    }
}

fn modifiers_from(decls: &[ModifierDecl]) -> Modifiers {
    let mut modifiers = Modifiers::empty();
    for decl in decls {
        modifiers |= match decl {
            ModifierDecl::Public => Modifiers::PUBLIC,
            ModifierDecl::Internal => Modifiers::INTERNAL,
            ModifierDecl::Static => Modifiers::STATIC,
            ModifierDecl::Virtual => Modifiers::VIRTUAL,
            ModifierDecl::Abstract => Modifiers::ABSTRACT,
            ModifierDecl::New => Modifiers::NEW,
        };
    }
    modifiers
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

fn type_ref_display(ty: &TypeRef) -> String {
    let mut out = String::new();
    render_type_ref(ty, &mut out);
    out
}

fn render_type_ref(ty: &TypeRef, out: &mut String) {
    match &ty.kind {
        TypeRefKind::Named { name, args } => {
            out.push_str(name);
            if !args.is_empty() {
                out.push('<');
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    render_type_ref(arg, out);
                }
                out.push('>');
            }
        }
        TypeRefKind::Array(elem) => {
            render_type_ref(elem, out);
            out.push_str("[]");
        }
    }
    if ty.nullable {
        out.push('?');
    }
}

#[cfg(test)]
mod tests;
