//! Invocation selection: thunk matching, argument marshaling, conversion
//! ordering.
//!
//! For each selector-backed member this produces an [`InvocationPlan`]: the
//! direct and superclass-qualified send expressions over the exact-match
//! thunk, the conversion locals that must run before the call, and the
//! writebacks that run after it. Conversion statements are ordered by
//! conversion safety; the call expression always lists arguments in
//! declaration order.

use smallvec::SmallVec;
use tracing::debug;
use vela_diagnostic::{internal_error, Diagnostic, ErrorCode};
use vela_ir::{Name, Parameter, SourceLoc, TypeDescriptor, TypeKind};
use vela_model::{BindingContext, Member, MemberCommon, PropertyData};

use crate::abi::{abi_category, return_category, AbiCategory, ThunkRegistry, ThunkSignature};
use crate::expr::{HostExpr, HostStmt};

/// Marshaling plan for one argument position.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ArgPlan {
    /// Declaration position.
    pub position: u32,
    /// ABI category in the thunk sequence.
    pub category: AbiCategory,
    /// Expression at the call site, in declaration order.
    pub call_expr: HostExpr,
    /// Conversion local, emitted in conversion-safety order.
    pub conversion: Option<HostStmt>,
    /// Post-call writeback for by-ref positions.
    pub writeback: Option<HostStmt>,
    /// Needs a native-handle validity check before any side-effecting
    /// conversion runs.
    pub requires_null_check: bool,
    /// Has a potentially side-effecting implicit conversion.
    pub has_custom_conversion: bool,
}

/// A complete invocation plan for one member.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct InvocationPlan {
    /// The matched thunk signature.
    pub signature: ThunkSignature,
    /// Direct-dispatch call expression.
    pub send: HostExpr,
    /// Superclass-qualified call expression.
    pub send_super: HostExpr,
    /// Conversion locals in conversion-safety order, receiver first.
    pub prologue: Vec<HostStmt>,
    /// By-ref writebacks in declaration order.
    pub epilogue: Vec<HostStmt>,
    /// Declaration positions in conversion-safety order.
    pub conversion_order: Vec<u32>,
    /// Result unmarshaling over the raw `ret__` value; `None` is void.
    pub result: Option<HostExpr>,
}

/// Select the invocation for a selector-backed member.
pub fn select_invocation(
    member: &Member,
    ctx: &BindingContext,
    registry: &ThunkRegistry,
) -> Result<InvocationPlan, Diagnostic> {
    match member {
        Member::Constructor(data) => {
            plan_send(ctx, registry, &data.common, None, None, "constructor", true)
        }
        Member::Method(data) => plan_send(
            ctx,
            registry,
            &data.common,
            data.return_type.as_ref(),
            data.return_delegate_proxy,
            ctx.interner().lookup(data.name),
            false,
        ),
        Member::ProtocolRequirement(data) => plan_send(
            ctx,
            registry,
            &data.common,
            data.return_type.as_ref(),
            None,
            ctx.interner().lookup(data.name),
            false,
        ),
        Member::Property(data) => select_getter(data, ctx, registry),
        Member::DictionaryAccessor(data) => Err(internal_error(
            data.common.loc,
            "dictionary accessors are value-based and have no invocation",
        )),
    }
}

/// Select the getter invocation for a selector-backed property.
pub fn select_getter(
    property: &PropertyData,
    ctx: &BindingContext,
    registry: &ThunkRegistry,
) -> Result<InvocationPlan, Diagnostic> {
    let Some(getter) = property.getter else {
        return Err(internal_error(
            property.common.loc,
            "property has no getter accessor",
        ));
    };
    plan_selector(
        ctx,
        registry,
        &property.common,
        getter.selector,
        &[],
        Some(&property.ty),
        property.delegate_proxy,
        ctx.interner().lookup(property.name),
        false,
    )
}

/// Select the setter invocation for a selector-backed property.
///
/// Returns `Ok(None)` for read-only properties.
pub fn select_setter(
    property: &PropertyData,
    ctx: &BindingContext,
    registry: &ThunkRegistry,
) -> Result<Option<InvocationPlan>, Diagnostic> {
    let Some(setter) = property.setter else {
        return Ok(None);
    };
    let mut value = Parameter::new(0, property.ty.clone(), ctx.interner().intern("value"));
    if let Some(proxy) = property.delegate_proxy {
        if property.ty.is_delegate() {
            value = value.with_block_proxy(proxy);
        }
    }
    plan_selector(
        ctx,
        registry,
        &property.common,
        setter.selector,
        std::slice::from_ref(&value),
        None,
        None,
        ctx.interner().lookup(property.name),
        false,
    )
    .map(Some)
}

fn plan_send(
    ctx: &BindingContext,
    registry: &ThunkRegistry,
    common: &MemberCommon,
    return_type: Option<&TypeDescriptor>,
    return_proxy: Option<Name>,
    member_label: &str,
    is_constructor: bool,
) -> Result<InvocationPlan, Diagnostic> {
    let Some(selector) = common.export.selector else {
        return Err(internal_error(
            common.loc,
            format!("`{member_label}` has export metadata without a selector"),
        ));
    };
    plan_selector(
        ctx,
        registry,
        common,
        selector,
        &common.parameters,
        return_type,
        return_proxy,
        member_label,
        is_constructor,
    )
}

#[expect(
    clippy::too_many_arguments,
    reason = "One internal planning entry shared by every member kind"
)]
fn plan_selector(
    ctx: &BindingContext,
    registry: &ThunkRegistry,
    common: &MemberCommon,
    selector: Name,
    parameters: &[Parameter],
    return_type: Option<&TypeDescriptor>,
    return_proxy: Option<Name>,
    member_label: &str,
    is_constructor: bool,
) -> Result<InvocationPlan, Diagnostic> {
    let well_known = ctx.well_known();

    // An extension-style receiver marshals as the send target, not as a
    // thunk argument.
    let receiver = parameters.iter().find(|p| p.is_this);
    let mut args: SmallVec<[ArgPlan; 4]> = SmallVec::new();
    for param in parameters.iter().filter(|p| !p.is_this) {
        args.push(plan_argument(ctx, param));
    }

    // Constructor sends return the instance handle; there is no host
    // result to convert because the handle initializes `this`.
    let ret = if is_constructor {
        Some(AbiCategory::Handle)
    } else {
        return_category(return_type, well_known)
    };
    let signature = ThunkSignature::new(ret, args.iter().map(|a| a.category).collect());
    if !registry.contains(&signature) {
        return Err(unsupported_signature(
            common.loc,
            member_label,
            &signature,
        ));
    }
    debug!(member = member_label, thunk = %signature.send_name(), "selected thunk");

    let conversion_order = conversion_order(&args);

    let mut prologue = Vec::new();
    let receiver_expr = match receiver {
        Some(this_param) => {
            let this_name = ctx.interner().lookup(this_param.name);
            // The receiver's validity check always runs first.
            prologue.push(HostStmt::Local {
                ty: "var".into(),
                name: format!("{this_name}__handle"),
                init: Some(non_null_handle(this_name)),
            });
            HostExpr::raw(format!("{this_name}__handle"))
        }
        None if common.is_static() => HostExpr::raw("class_ptr"),
        None => HostExpr::raw("this").member("Handle"),
    };
    let super_receiver_expr = match receiver {
        Some(this_param) => {
            let this_name = ctx.interner().lookup(this_param.name);
            HostExpr::raw(format!("{this_name}__handle"))
        }
        None if common.is_static() => HostExpr::raw("class_ptr"),
        None => HostExpr::raw("this").member("SuperHandle"),
    };
    for &position in &conversion_order {
        if let Some(arg) = args.iter().find(|a| a.position == position) {
            if let Some(stmt) = &arg.conversion {
                prologue.push(stmt.clone());
            }
        }
    }

    let epilogue: Vec<HostStmt> = args
        .iter()
        .filter_map(|a| a.writeback.clone())
        .collect();

    let selector_expr = HostExpr::raw("Selector").member("GetHandle").call(vec![
        HostExpr::Str(ctx.interner().lookup(selector).to_owned()),
    ]);

    let build_call = |thunk: String, recv: HostExpr| {
        let mut call_args = vec![recv, selector_expr.clone()];
        call_args.extend(args.iter().map(|a| a.call_expr.clone()));
        HostExpr::raw("Messaging").member(thunk).call(call_args)
    };
    let send = build_call(signature.send_name(), receiver_expr);
    let send_super = build_call(signature.send_super_name(), super_receiver_expr);

    let result = if is_constructor {
        None
    } else {
        return_type.map(|ty| unmarshal_result(ctx, ty, return_proxy))
    };

    Ok(InvocationPlan {
        signature,
        send,
        send_super,
        prologue,
        epilogue,
        conversion_order,
        result,
    })
}

/// Declaration positions ordered by `(requires_null_check,
/// has_custom_conversion)` rank, ties broken by position.
fn conversion_order(args: &[ArgPlan]) -> Vec<u32> {
    let mut order: Vec<u32> = args.iter().map(|a| a.position).collect();
    order.sort_by_key(|&position| {
        let arg = args
            .iter()
            .find(|a| a.position == position)
            .map_or((false, false), |a| {
                (a.requires_null_check, a.has_custom_conversion)
            });
        let rank = match arg {
            (false, false) => 0u8,
            (true, false) => 1,
            (false, true) => 2,
            (true, true) => 3,
        };
        (rank, position)
    });
    order
}

fn plan_argument(ctx: &BindingContext, param: &Parameter) -> ArgPlan {
    let interner = ctx.interner();
    let well_known = ctx.well_known();
    let name = interner.lookup(param.name).to_owned();
    let category = abi_category(&param.ty, well_known, param.is_by_ref);

    if param.is_by_ref {
        return by_ref_argument(ctx, param, &name, category);
    }

    let (call_expr, conversion, requires_null_check, has_custom_conversion) = match &param.ty.kind {
        TypeKind::Primitive(_) => (HostExpr::raw(&name), None, false, false),
        TypeKind::Enum(scalar) => {
            let local = format!("{name}__value");
            let cast = if scalar.is_signed() { "nint" } else { "nuint" };
            let conversion = HostStmt::Local {
                ty: "var".into(),
                name: local.clone(),
                init: Some(HostExpr::Cast(cast.into(), Box::new(HostExpr::raw(&name)))),
            };
            (HostExpr::raw(local), Some(conversion), false, true)
        }
        TypeKind::Object if well_known.is_geometry(&param.ty) => {
            (HostExpr::raw(&name), None, false, false)
        }
        TypeKind::Object if well_known.is_host_string(&param.ty) => {
            let local = format!("{name}__str");
            let conversion = HostStmt::Local {
                ty: "var".into(),
                name: local.clone(),
                init: Some(
                    HostExpr::raw("CFString")
                        .member("CreateNative")
                        .call(vec![HostExpr::raw(&name)]),
                ),
            };
            (
                HostExpr::raw(local),
                Some(conversion),
                !param.ty.is_nullable,
                true,
            )
        }
        TypeKind::Array(_) => {
            let local = format!("{name}__handle");
            let conversion = HostStmt::Local {
                ty: "var".into(),
                name: local.clone(),
                init: Some(
                    HostExpr::raw("NSArray")
                        .member("FromNSObjects")
                        .call(vec![HostExpr::raw(&name)])
                        .member("Handle"),
                ),
            };
            (
                HostExpr::raw(local),
                Some(conversion),
                !param.ty.is_nullable,
                true,
            )
        }
        TypeKind::Delegate => {
            let local = format!("{name}__block");
            let proxy = param
                .block_proxy
                .map_or_else(|| "Trampolines".to_owned(), |p| interner.lookup(p).to_owned());
            let conversion = HostStmt::Local {
                ty: "var".into(),
                name: local.clone(),
                init: Some(
                    HostExpr::raw(proxy)
                        .member("CreateBlock")
                        .call(vec![HostExpr::raw(&name)]),
                ),
            };
            (
                HostExpr::raw(local),
                Some(conversion),
                !param.ty.is_nullable,
                true,
            )
        }
        TypeKind::Object | TypeKind::Generic(_) => {
            let local = format!("{name}__handle");
            let init = if param.ty.is_nullable {
                HostExpr::raw(&name).member("GetHandle").call(vec![])
            } else {
                non_null_handle(&name)
            };
            let conversion = HostStmt::Local {
                ty: "var".into(),
                name: local.clone(),
                init: Some(init),
            };
            (
                HostExpr::raw(local),
                Some(conversion),
                !param.ty.is_nullable,
                false,
            )
        }
        TypeKind::NullableWrapper(_) => {
            // Nullable value types marshal as a pointer to the declared
            // binding itself.
            (HostExpr::Ref(Box::new(HostExpr::raw(&name))), None, false, false)
        }
    };

    ArgPlan {
        position: param.position,
        category,
        call_expr,
        conversion,
        writeback: None,
        requires_null_check,
        has_custom_conversion,
    }
}

fn by_ref_argument(
    ctx: &BindingContext,
    param: &Parameter,
    name: &str,
    category: AbiCategory,
) -> ArgPlan {
    let slot = format!("{name}__slot");
    let (slot_ty, writeback_value) = match &param.ty.kind {
        TypeKind::Primitive(scalar) => (
            scalar.host_keyword().to_owned(),
            HostExpr::raw(&slot),
        ),
        TypeKind::Enum(scalar) => {
            let cast = if scalar.is_signed() { "nint" } else { "nuint" };
            (
                cast.to_owned(),
                HostExpr::Cast(
                    param.ty.host_syntax(ctx.interner()),
                    Box::new(HostExpr::raw(&slot)),
                ),
            )
        }
        TypeKind::Object if ctx.well_known().is_geometry(&param.ty) => (
            param.ty.host_syntax(ctx.interner()),
            HostExpr::raw(&slot),
        ),
        // Reference slots convert back through the runtime's object table.
        _ => (
            "NativeHandle".to_owned(),
            HostExpr::raw("Runtime")
                .member(format!(
                    "GetNSObject<{}>",
                    param.ty.host_syntax(ctx.interner())
                ))
                .call(vec![HostExpr::raw(&slot)]),
        ),
    };

    ArgPlan {
        position: param.position,
        category,
        call_expr: HostExpr::Ref(Box::new(HostExpr::raw(&slot))),
        conversion: Some(HostStmt::Local {
            ty: slot_ty,
            name: slot,
            init: None,
        }),
        writeback: Some(HostStmt::Assign {
            target: HostExpr::raw(name),
            value: writeback_value,
        }),
        requires_null_check: false,
        has_custom_conversion: false,
    }
}

fn unmarshal_result(
    ctx: &BindingContext,
    ty: &TypeDescriptor,
    return_proxy: Option<Name>,
) -> HostExpr {
    let well_known = ctx.well_known();
    let raw = HostExpr::raw("ret__");
    match &ty.kind {
        TypeKind::Primitive(_) => raw,
        TypeKind::Enum(_) => HostExpr::Cast(ty.host_syntax(ctx.interner()), Box::new(raw)),
        TypeKind::Object if well_known.is_geometry(ty) => raw,
        TypeKind::Object if well_known.is_host_string(ty) => HostExpr::raw("CFString")
            .member("FromHandle")
            .call(vec![raw]),
        TypeKind::Array(elem) => HostExpr::raw("CFArray")
            .member(format!(
                "ArrayFromHandle<{}>",
                elem.host_syntax(ctx.interner())
            ))
            .call(vec![raw]),
        TypeKind::Delegate => {
            let proxy = return_proxy.map_or_else(
                || "Trampolines".to_owned(),
                |p| ctx.interner().lookup(p).to_owned(),
            );
            HostExpr::raw(proxy).member("CreateDelegate").call(vec![raw])
        }
        TypeKind::Object | TypeKind::Generic(_) | TypeKind::NullableWrapper(_) => {
            HostExpr::raw("Runtime")
                .member(format!("GetNSObject<{}>", ty.host_syntax(ctx.interner())))
                .call(vec![raw])
        }
    }
}

fn non_null_handle(name: &str) -> HostExpr {
    HostExpr::raw(name)
        .member("GetNonNullHandle")
        .call(vec![HostExpr::raw(format!("nameof({name})"))])
}

#[cold]
fn unsupported_signature(
    loc: SourceLoc,
    member_label: &str,
    signature: &ThunkSignature,
) -> Diagnostic {
    Diagnostic::error(ErrorCode::E3001)
        .with_message(format!(
            "no native call thunk matches `{member_label}` (wanted `{}`)",
            signature.send_name()
        ))
        .with_label(loc, "in this member")
        .with_note("the runtime ships one thunk per exact category sequence")
}
