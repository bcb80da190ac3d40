//! Per-type host source rendering.
//!
//! One [`TypeModel`] in, one source fragment out. Members render in a
//! stable string order (declaring type, member name, selector) so repeated
//! runs over unchanged input are byte-identical regardless of how the
//! driver scheduled extraction. A member whose invocation cannot be
//! selected becomes a diagnostic; its siblings still render.

use tracing::debug;
use vela_diagnostic::DiagnosticBag;
use vela_ir::{Name, Parameter, TypeDescriptor};
use vela_marshal::{
    select_getter, select_invocation, select_setter, synthesize_accessor, synthesize_event,
    EventShape, HostStmt, InvocationPlan, ThunkRegistry,
};
use vela_meta::{
    AvailabilityEntry, AvailabilitySet, BindingKind, ClassConfig, CtorVisibility, ExportFlags,
    ExportMetadata,
};
use vela_model::{
    BindingContext, DictionaryAccessorData, Member, Modifiers, PropertyData,
    ProtocolRequirementData, TypeModel,
};

use crate::writer::SourceWriter;

/// Result of emitting one type: the source fragment (absent when the type
/// shell itself could not be produced) plus any member diagnostics.
#[derive(Debug, Default)]
pub struct EmitOutcome {
    pub source: Option<String>,
    pub diagnostics: DiagnosticBag,
}

/// Render one bound type to host source.
pub fn emit_type(
    model: &TypeModel,
    ctx: &BindingContext,
    registry: &ThunkRegistry,
) -> EmitOutcome {
    let mut emitter = Emitter {
        ctx,
        registry,
        w: SourceWriter::new(),
        diagnostics: DiagnosticBag::new(),
        pending_event_args: Vec::new(),
    };
    emitter.emit(model);
    let Emitter {
        w, diagnostics, ..
    } = emitter;
    EmitOutcome {
        source: Some(w.finish()),
        diagnostics,
    }
}

/// Members in emission order: declaring type, member name, selector, all
/// compared as strings so the order never depends on interning order.
fn sorted_members<'a>(model: &'a TypeModel, ctx: &BindingContext) -> Vec<&'a Member> {
    let mut members: Vec<&Member> = model.members.iter().collect();
    members.sort_by_key(|m| {
        let interner = ctx.interner();
        (
            interner.lookup_static(m.common().declaring_type),
            interner.lookup_static(m.name()),
            m.selector().map_or("", |s| interner.lookup_static(s)),
        )
    });
    members
}

struct Emitter<'a> {
    ctx: &'a BindingContext,
    registry: &'a ThunkRegistry,
    w: SourceWriter,
    diagnostics: DiagnosticBag,
    /// Event args types rendered after the type body, in member order.
    pending_event_args: Vec<(String, Vec<(String, String)>)>,
}

impl<'a> Emitter<'a> {
    fn emit(&mut self, model: &TypeModel) {
        let interner = self.ctx.interner();
        let host_name = interner.lookup_static(model.host_name);
        let (namespace, tail) = split_host_name(host_name);
        debug!(type_name = host_name, "emitting type");

        self.w.line("// <auto-generated />");
        self.w.blank();
        self.w.open(&format!("namespace {namespace}"));

        for attr in availability_attributes(&model.availability) {
            self.w.line(&attr);
        }
        match &model.binding.kind {
            BindingKind::Class(config) => self.emit_class(model, tail, *config),
            BindingKind::Protocol => self.emit_protocol(model, tail),
            BindingKind::Category { target } => self.emit_category(model, tail, *target),
            BindingKind::SmartEnum {
                error_domain,
                library_name,
            } => self.emit_smart_enum(model, tail, *error_domain, *library_name),
            BindingKind::StrongDictionary => self.emit_strong_dictionary(model, tail),
        }

        let pending = std::mem::take(&mut self.pending_event_args);
        for (type_name, fields) in pending {
            self.w.blank();
            self.emit_event_args_type(&type_name, &fields);
        }

        self.w.close();
    }

    fn emit_class(&mut self, model: &TypeModel, tail: &str, config: ClassConfig) {
        let base = model
            .base
            .map_or("Foundation.NSObject", |b| self.ctx.interner().lookup_static(b));
        self.w
            .line(&format!("[Register(\"{}\")]", self.native_name(model)));
        self.w.open(&format!("public partial class {tail} : {base}"));

        self.emit_synthesized_ctors(model, tail, config);

        let members = sorted_members(model, self.ctx);
        for member in members {
            self.w.blank();
            match member {
                Member::Constructor(data) => {
                    self.emit_constructor(member, tail, &data.common.parameters);
                }
                Member::Method(data) => self.emit_method(
                    member,
                    self.ctx.interner().lookup_static(data.name),
                    &data.common.parameters,
                    data.return_type.as_ref(),
                ),
                Member::Property(data) => self.emit_property(data),
                Member::ProtocolRequirement(data) => self.emit_requirement_body(member, data),
                Member::DictionaryAccessor(data) => self.emit_dictionary_accessor(data),
            }
        }

        self.w.close();
    }

    fn emit_protocol(&mut self, model: &TypeModel, tail: &str) {
        self.w
            .line(&format!("[Protocol(\"{}\")]", self.native_name(model)));
        self.w.open(&format!("public partial interface {tail}"));
        let members = sorted_members(model, self.ctx);
        for member in members {
            let Member::ProtocolRequirement(data) = member else {
                continue;
            };
            self.w.blank();
            if data.required {
                self.w.line("[Abstract]");
            }
            self.emit_member_attributes(member.common().export, &member.common().availability);
            let name = self.ctx.interner().lookup_static(data.name);
            if data.is_property {
                let ty = data
                    .return_type
                    .as_ref()
                    .map_or_else(|| "void".to_owned(), |t| t.host_syntax(self.ctx.interner()));
                self.w.line(&format!("{ty} {name} {{ get; }}"));
            } else {
                let ret = data
                    .return_type
                    .as_ref()
                    .map_or_else(|| "void".to_owned(), |t| t.host_syntax(self.ctx.interner()));
                let sig = self.parameter_signature(&data.common.parameters, false);
                self.w.line(&format!("{ret} {name}({sig});"));
            }
        }
        self.w.close();
    }

    fn emit_category(&mut self, model: &TypeModel, tail: &str, target: Name) {
        let target_name = self.ctx.interner().lookup_static(target);
        self.w.line(&format!(
            "[Category(typeof({target_name}))]"
        ));
        self.w.open(&format!("public static partial class {tail}"));
        let members = sorted_members(model, self.ctx);
        for member in members {
            let Member::Method(data) = member else {
                continue;
            };
            self.w.blank();
            self.emit_method(
                member,
                self.ctx.interner().lookup_static(data.name),
                &data.common.parameters,
                data.return_type.as_ref(),
            );
        }
        self.w.close();
    }

    fn emit_smart_enum(
        &mut self,
        model: &TypeModel,
        tail: &str,
        error_domain: Option<Name>,
        library_name: Option<Name>,
    ) {
        self.w
            .open(&format!("public static partial class {tail}Extensions"));
        if let Some(domain) = error_domain {
            let domain = self.ctx.interner().lookup_static(domain);
            let library = library_name
                .map_or("__Internal", |l| self.ctx.interner().lookup_static(l));
            self.w.line(&format!(
                "[Field(\"{domain}\", \"{library}\")]"
            ));
            self.w.line(&format!(
                "public static NSString ErrorDomain => Dlfcn.GetStringConstant(Libraries.{library}.Handle, \"{domain}\")!;"
            ));
        }
        let members = sorted_members(model, self.ctx);
        for member in members {
            let Member::Method(data) = member else {
                continue;
            };
            self.w.blank();
            self.emit_method(
                member,
                self.ctx.interner().lookup_static(data.name),
                &data.common.parameters,
                data.return_type.as_ref(),
            );
        }
        self.w.close();
    }

    fn emit_strong_dictionary(&mut self, model: &TypeModel, tail: &str) {
        self.w
            .open(&format!("public partial class {tail} : DictionaryContainer"));
        self.w
            .line(&format!("public {tail}() : base(new NSMutableDictionary()) {{ }}"));
        self.w.blank();
        self.w
            .line(&format!("public {tail}(NSDictionary dictionary) : base(dictionary) {{ }}"));
        let members = sorted_members(model, self.ctx);
        for member in members {
            let Member::DictionaryAccessor(data) = member else {
                continue;
            };
            self.w.blank();
            self.emit_dictionary_accessor(data);
        }
        self.w.close();
    }

    fn emit_synthesized_ctors(&mut self, model: &TypeModel, tail: &str, config: ClassConfig) {
        let has_explicit_init = model.members.iter().any(|m| {
            matches!(m, Member::Constructor(_))
                && m.selector()
                    .is_some_and(|s| self.ctx.interner().lookup(s) == "init")
        });
        if !has_explicit_init {
            if let Some(vis) = visibility_keyword(config.default_ctor) {
                self.w.line("[Export(\"init\")]");
                self.w.open(&format!("{vis} {tail}() : base(NSObjectFlag.Empty)"));
                self.w.line(
                    "InitializeHandle(Messaging.IntPtr_objc_msgSend(this.Handle, \
                     Selector.GetHandle(\"init\")));",
                );
                self.w.close();
                self.w.blank();
            }
        }
        if let Some(vis) = visibility_keyword(config.native_handle_ctor) {
            self.w
                .line(&format!("{vis} {tail}(NativeHandle handle) : base(handle) {{ }}"));
        }
    }

    fn emit_constructor(&mut self, member: &Member, tail: &str, parameters: &[Parameter]) {
        let plan = match select_invocation(member, self.ctx, self.registry) {
            Ok(plan) => plan,
            Err(diag) => {
                self.diagnostics.push(diag);
                return;
            }
        };
        let common = member.common();
        self.emit_member_attributes(common.export, &common.availability);
        let sig = self.parameter_signature(parameters, false);
        let vis = modifier_keywords(common.modifiers, true);
        self.w
            .open(&format!("{vis}{tail}({sig}) : base(NSObjectFlag.Empty)"));
        self.emit_statements(&plan.prologue);
        let interner = self.ctx.interner();
        self.w.line(&format!(
            "InitializeHandle(IsDirectBinding ? {} : {});",
            plan.send.render(interner),
            plan.send_super.render(interner)
        ));
        self.emit_statements(&plan.epilogue);
        self.w.close();
    }

    fn emit_method(
        &mut self,
        member: &Member,
        name: &str,
        parameters: &[Parameter],
        return_type: Option<&TypeDescriptor>,
    ) {
        let plan = match select_invocation(member, self.ctx, self.registry) {
            Ok(plan) => plan,
            Err(diag) => {
                self.diagnostics.push(diag);
                return;
            }
        };
        let common = member.common();
        let is_extension = parameters.iter().any(|p| p.is_this);
        self.emit_member_attributes(common.export, &common.availability);
        let ret = return_type.map_or_else(
            || "void".to_owned(),
            |t| t.host_syntax(self.ctx.interner()),
        );
        let modifiers = if is_extension {
            "public static ".to_owned()
        } else {
            modifier_keywords(common.modifiers, false)
        };
        let sig = self.parameter_signature(parameters, is_extension);
        self.w.open(&format!("{modifiers}{ret} {name}({sig})"));
        self.emit_invocation_body(&plan, common.is_static() || is_extension);
        self.w.close();
    }

    fn emit_property(&mut self, data: &PropertyData) {
        let interner = self.ctx.interner();
        let name = interner.lookup_static(data.name);
        let ty = data.ty.host_syntax(interner);
        let modifiers = modifier_keywords(data.common.modifiers, false);
        for attr in availability_attributes(&data.common.availability) {
            self.w.line(&attr);
        }
        self.w.open(&format!("{modifiers}{ty} {name}"));

        match select_getter(data, self.ctx, self.registry) {
            Err(diag) => self.diagnostics.push(diag),
            Ok(plan) => {
                if let Some(getter) = data.getter {
                    self.w.line(&format!(
                        "[Export(\"{}\"{})]",
                        interner.lookup_static(getter.selector),
                        semantic_suffix(getter.semantic)
                    ));
                }
                self.w.open("get");
                self.emit_invocation_body(&plan, data.common.is_static());
                self.w.close();
            }
        }
        match select_setter(data, self.ctx, self.registry) {
            Err(diag) => self.diagnostics.push(diag),
            Ok(None) => {}
            Ok(Some(plan)) => {
                if let Some(setter) = data.setter {
                    self.w.line(&format!(
                        "[Export(\"{}\"{})]",
                        interner.lookup_static(setter.selector),
                        semantic_suffix(setter.semantic)
                    ));
                }
                self.w.open("set");
                self.emit_invocation_body(&plan, data.common.is_static());
                self.w.close();
            }
        }
        self.w.close();
    }

    /// A protocol requirement embedded in a class renders as a virtual
    /// member; notification-flagged requirements also get an event surface.
    fn emit_requirement_body(&mut self, member: &Member, data: &ProtocolRequirementData) {
        let name = self.ctx.interner().lookup_static(data.name);
        self.emit_method(
            member,
            name,
            &data.common.parameters,
            data.return_type.as_ref(),
        );
        if data
            .common
            .export
            .flags
            .contains(ExportFlags::NOTIFICATION)
        {
            self.w.blank();
            self.emit_event_surface(data, name);
        }
    }

    fn emit_event_surface(&mut self, data: &ProtocolRequirementData, name: &str) {
        let shape = match synthesize_event(data, None, self.ctx) {
            Ok(shape) => shape,
            Err(diag) => {
                self.diagnostics.push(diag);
                return;
            }
        };
        let interner = self.ctx.interner();
        match shape {
            EventShape::Empty => {
                self.w
                    .line(&format!("public event EventHandler? {name}Event;"));
                self.w.blank();
                self.w.open(&format!("internal void Raise{name}()"));
                self.w
                    .line(&format!("{name}Event?.Invoke(this, EventArgs.Empty);"));
                self.w.close();
            }
            EventShape::Verbatim(param) => {
                let ty = param.ty.host_syntax(interner);
                let param_name = interner.lookup_static(param.name);
                self.w.line(&format!(
                    "public event EventHandler<{ty}>? {name}Event;"
                ));
                self.w.blank();
                self.w
                    .open(&format!("internal void Raise{name}({ty} {param_name})"));
                self.w.line(&format!(
                    "{name}Event?.Invoke(this, {param_name});"
                ));
                self.w.close();
            }
            EventShape::ArgsType {
                type_name, fields, ..
            } => {
                let params: Vec<(String, String)> = fields
                    .iter()
                    .map(|f| (f.name.clone(), f.ty.host_syntax(interner)))
                    .collect();
                self.w.line(&format!(
                    "public event EventHandler<{type_name}>? {name}Event;"
                ));
                self.w.blank();
                let sig: Vec<String> = params
                    .iter()
                    .map(|(field, ty)| format!("{ty} {}", lower_first(field)))
                    .collect();
                self.w.open(&format!(
                    "internal void Raise{name}({})",
                    sig.join(", ")
                ));
                let args: Vec<String> =
                    params.iter().map(|(field, _)| lower_first(field)).collect();
                self.w.line(&format!(
                    "{name}Event?.Invoke(this, new {type_name}({}));",
                    args.join(", ")
                ));
                self.w.close();
                self.pending_event_args.push((type_name, params));
            }
        }
    }

    fn emit_event_args_type(&mut self, type_name: &str, fields: &[(String, String)]) {
        self.w
            .open(&format!("public partial class {type_name} : EventArgs"));
        let sig: Vec<String> = fields
            .iter()
            .map(|(field, ty)| format!("{ty} {}", lower_first(field)))
            .collect();
        self.w
            .open(&format!("public {type_name}({})", sig.join(", ")));
        for (field, _) in fields {
            self.w
                .line(&format!("{field} = {};", lower_first(field)));
        }
        self.w.close();
        for (field, ty) in fields {
            self.w.blank();
            self.w.line(&format!("public {ty} {field} {{ get; set; }}"));
        }
        self.w.close();
    }

    fn emit_dictionary_accessor(&mut self, data: &DictionaryAccessorData) {
        let pair = match synthesize_accessor(data, self.ctx) {
            Ok(pair) => pair,
            Err(diag) => {
                self.diagnostics.push(diag);
                return;
            }
        };
        let interner = self.ctx.interner();
        let name = interner.lookup_static(data.name);
        let ty = data.ty.host_syntax(interner);
        for attr in availability_attributes(&data.common.availability) {
            self.w.line(&attr);
        }
        self.w.open(&format!("public {ty} {name}"));
        self.w
            .line(&format!("get => {};", pair.getter.render(interner)));
        self.w
            .line(&format!("set => {};", pair.setter.render(interner)));
        self.w.close();
    }

    fn emit_invocation_body(&mut self, plan: &InvocationPlan, direct_only: bool) {
        let interner = self.ctx.interner();
        self.emit_statements(&plan.prologue);
        match (&plan.result, direct_only) {
            (None, true) => {
                self.w.line(&format!("{};", plan.send.render(interner)));
            }
            (None, false) => {
                self.w.open("if (IsDirectBinding)");
                self.w.line(&format!("{};", plan.send.render(interner)));
                self.w.close();
                self.w.open("else");
                self.w
                    .line(&format!("{};", plan.send_super.render(interner)));
                self.w.close();
            }
            (Some(_), true) => {
                self.w
                    .line(&format!("var ret__ = {};", plan.send.render(interner)));
            }
            (Some(_), false) => {
                self.w.line(&format!(
                    "var ret__ = IsDirectBinding ? {} : {};",
                    plan.send.render(interner),
                    plan.send_super.render(interner)
                ));
            }
        }
        self.emit_statements(&plan.epilogue);
        if let Some(result) = &plan.result {
            self.w.line(&format!("return {};", result.render(interner)));
        }
    }

    fn emit_statements(&mut self, statements: &[HostStmt]) {
        for stmt in statements {
            self.w.line(&stmt.render(self.ctx.interner()));
        }
    }

    fn emit_member_attributes(&mut self, export: ExportMetadata, availability: &AvailabilitySet) {
        for attr in availability_attributes(availability) {
            self.w.line(&attr);
        }
        if let Some(selector) = export.selector {
            self.w.line(&format!(
                "[Export(\"{}\"{})]",
                self.ctx.interner().lookup_static(selector),
                semantic_suffix(export.semantic)
            ));
        }
    }

    fn parameter_signature(&self, parameters: &[Parameter], extension: bool) -> String {
        let interner = self.ctx.interner();
        let mut parts = Vec::new();
        for param in parameters {
            if param.is_this && !extension {
                continue;
            }
            let mut part = String::new();
            if param.is_this {
                part.push_str("this ");
            }
            if param.is_by_ref {
                part.push_str("ref ");
            }
            if param.is_params {
                part.push_str("params ");
            }
            part.push_str(&param.ty.host_syntax(interner));
            part.push(' ');
            part.push_str(interner.lookup_static(param.name));
            parts.push(part);
        }
        parts.join(", ")
    }

    fn native_name(&self, model: &TypeModel) -> &'static str {
        self.ctx.interner().lookup_static(model.binding.native_name)
    }
}

/// Guard attributes in the set's canonical entry order.
fn availability_attributes(availability: &AvailabilitySet) -> Vec<String> {
    availability
        .entries()
        .iter()
        .map(|entry| {
            let AvailabilityEntry {
                platform,
                version,
                supported,
            } = entry;
            let attr = if *supported {
                "SupportedOSPlatform"
            } else {
                "UnsupportedOSPlatform"
            };
            match version {
                None => format!("[{attr}(\"{}\")]", platform.token()),
                Some(v) => format!("[{attr}(\"{}{v}\")]", platform.token()),
            }
        })
        .collect()
}

fn semantic_suffix(semantic: vela_meta::ArgumentSemantic) -> &'static str {
    use vela_meta::ArgumentSemantic;
    match semantic {
        ArgumentSemantic::None => "",
        ArgumentSemantic::Copy => ", ArgumentSemantic.Copy",
        ArgumentSemantic::Retain => ", ArgumentSemantic.Retain",
        ArgumentSemantic::Weak => ", ArgumentSemantic.Weak",
        ArgumentSemantic::Assign => ", ArgumentSemantic.Assign",
    }
}

fn modifier_keywords(modifiers: Modifiers, constructor: bool) -> String {
    let mut out = String::new();
    if modifiers.contains(Modifiers::INTERNAL) {
        out.push_str("internal ");
    } else {
        out.push_str("public ");
    }
    if constructor {
        return out;
    }
    if modifiers.contains(Modifiers::STATIC) {
        out.push_str("static ");
    } else if modifiers.contains(Modifiers::ABSTRACT) {
        out.push_str("abstract ");
    } else if modifiers.contains(Modifiers::VIRTUAL) {
        out.push_str("virtual ");
    }
    if modifiers.contains(Modifiers::NEW) {
        out.push_str("new ");
    }
    out
}

fn visibility_keyword(visibility: CtorVisibility) -> Option<&'static str> {
    match visibility {
        CtorVisibility::Public => Some("public"),
        CtorVisibility::Protected => Some("protected"),
        CtorVisibility::Internal => Some("internal"),
        CtorVisibility::Private => Some("private"),
        CtorVisibility::Disabled => None,
    }
}

fn split_host_name(host_name: &str) -> (&str, &str) {
    match host_name.rsplit_once('.') {
        Some((namespace, tail)) => (namespace, tail),
        None => ("Bindings", host_name),
    }
}

fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().chain(chars).collect(),
    }
}
