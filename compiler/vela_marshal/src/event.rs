//! Event-argument shape synthesis for notification-style members.

use vela_diagnostic::{Diagnostic, ErrorCode};
use vela_ir::{Name, Parameter, SourceLoc, TypeDescriptor};
use vela_model::{BindingContext, ProtocolRequirementData};

/// A caller-supplied event-argument shape override.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ExplicitShape {
    /// Host name of the args type.
    pub type_name: Name,
    /// Field names, positionally matched to the member's parameters.
    pub fields: Vec<Name>,
    pub loc: SourceLoc,
}

/// One field of an event-argument type.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct EventField {
    /// Host field name.
    pub name: String,
    pub ty: TypeDescriptor,
}

/// The resolved event-argument shape for one notification member.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum EventShape {
    /// No payload; the wrapper raises with `EventArgs.Empty`.
    Empty,
    /// A single non-receiver parameter passes through verbatim.
    Verbatim(Parameter),
    /// A named args type with fields in parameter order.
    ArgsType {
        type_name: String,
        fields: Vec<EventField>,
        /// False when the type came from an explicit override.
        synthesized: bool,
    },
}

/// Derive the event-argument shape for a notification-style requirement.
pub fn synthesize_event(
    member: &ProtocolRequirementData,
    explicit: Option<&ExplicitShape>,
    ctx: &BindingContext,
) -> Result<EventShape, Diagnostic> {
    let payload: Vec<&Parameter> = member
        .common
        .parameters
        .iter()
        .filter(|p| !p.is_this)
        .collect();

    if let Some(shape) = explicit {
        if shape.fields.len() < payload.len() {
            return Err(Diagnostic::error(ErrorCode::E4001)
                .with_message(format!(
                    "event shape `{}` names {} fields but `{}` has {} parameters",
                    ctx.interner().lookup(shape.type_name),
                    shape.fields.len(),
                    ctx.interner().lookup(member.name),
                    payload.len()
                ))
                .with_label(shape.loc, "supplied shape")
                .with_secondary_label(member.common.loc, "for this member"));
        }
        let fields = payload
            .iter()
            .zip(&shape.fields)
            .map(|(param, field)| EventField {
                name: ctx.interner().lookup(*field).to_owned(),
                ty: param.ty.clone(),
            })
            .collect();
        return Ok(EventShape::ArgsType {
            type_name: ctx.interner().lookup(shape.type_name).to_owned(),
            fields,
            synthesized: false,
        });
    }

    match payload.as_slice() {
        [] => Ok(EventShape::Empty),
        [single] => Ok(EventShape::Verbatim((*single).clone())),
        many => {
            let fields = many
                .iter()
                .map(|param| EventField {
                    name: capitalize(ctx.interner().lookup(param.name)),
                    ty: param.ty.clone(),
                })
                .collect();
            Ok(EventShape::ArgsType {
                type_name: format!("{}EventArgs", ctx.interner().lookup(member.name)),
                fields,
                synthesized: true,
            })
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}
