//! Strong-dictionary accessor synthesis.
//!
//! Maps a declared host property type plus a native string-constant key to
//! the getter/setter expressions over the strong-dictionary base helpers.
//! Dispatch is total over every shape extraction can produce; the only
//! intentional fallback is the opaque cast for unrecognized object wrapper
//! types, which are supported without per-type registration. Anything else
//! unmatched is a generator defect and fails fast as a diagnostic.

use vela_diagnostic::{internal_error, Diagnostic};
use vela_ir::{Scalar, TypeDescriptor, TypeKind};
use vela_model::{BindingContext, DictionaryAccessorData};

use crate::expr::HostExpr;

/// Synthesized getter/setter expression pair for one accessor.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct AccessorPair {
    pub getter: HostExpr,
    pub setter: HostExpr,
}

/// Synthesize the accessor body expressions for a dictionary-backed
/// property.
pub fn synthesize_accessor(
    data: &DictionaryAccessorData,
    ctx: &BindingContext,
) -> Result<AccessorPair, Diagnostic> {
    let key = key_expr(data, ctx);
    dispatch(&data.ty, data, ctx, &key)
}

fn key_expr(data: &DictionaryAccessorData, ctx: &BindingContext) -> HostExpr {
    let key = ctx.interner().lookup(data.key);
    match data.key_library {
        None => HostExpr::raw(key),
        Some(library) => {
            HostExpr::raw(ctx.interner().lookup(library)).member(key.to_owned())
        }
    }
}

fn dispatch(
    ty: &TypeDescriptor,
    data: &DictionaryAccessorData,
    ctx: &BindingContext,
    key: &HostExpr,
) -> Result<AccessorPair, Diagnostic> {
    let well_known = ctx.well_known();
    let value = HostExpr::raw("value");

    let pair = match &ty.kind {
        // Nullable wrappers read and write through the inner shape; the
        // getters already return nullable values.
        TypeKind::NullableWrapper(inner) => return dispatch(inner, data, ctx, key),

        TypeKind::Primitive(Scalar::Bool) => AccessorPair {
            getter: get("GetBoolValue", key),
            setter: set("SetBooleanValue", key, value),
        },
        TypeKind::Primitive(scalar) => AccessorPair {
            getter: get(numeric_getter(*scalar), key),
            setter: set("SetNumberValue", key, value),
        },
        TypeKind::Enum(scalar) => {
            // Smart enums read their underlying native-sized value.
            let getter_name = if scalar.is_signed() {
                "GetNIntValue"
            } else {
                "GetNUIntValue"
            };
            AccessorPair {
                getter: get(getter_name, key),
                setter: set("SetNumberValue", key, value),
            }
        }

        TypeKind::Object if well_known.is_host_string(ty) => AccessorPair {
            getter: get("GetStringValue", key),
            setter: set("SetStringValue", key, value),
        },
        // The setter accepts the wrapped representation either way.
        TypeKind::Object if well_known.is_native_string(ty) => AccessorPair {
            getter: get("GetNSStringValue", key),
            setter: set("SetStringValue", key, value),
        },
        TypeKind::Object if ty.name == well_known.cg_rect => AccessorPair {
            getter: get("GetCGRectValue", key),
            setter: set("SetCGRectValue", key, value),
        },
        TypeKind::Object if ty.name == well_known.cg_size => AccessorPair {
            getter: get("GetCGSizeValue", key),
            setter: set("SetCGSizeValue", key, value),
        },
        TypeKind::Object if ty.name == well_known.cg_point => AccessorPair {
            getter: get("GetCGPointValue", key),
            setter: set("SetCGPointValue", key, value),
        },

        TypeKind::Object | TypeKind::Generic(_) if well_known.is_native_dictionary(ty) => {
            let getter = match &ty.kind {
                TypeKind::Generic(args) => HostExpr::raw("GetNSDictionary").generic_call(
                    args.iter()
                        .map(|a| a.host_syntax(ctx.interner()))
                        .collect(),
                    vec![key.clone()],
                ),
                _ => get("GetNSDictionary", key),
            };
            AccessorPair {
                getter,
                setter: set("SetNativeValue", key, value),
            }
        }

        TypeKind::Object if ctx.is_strong_dictionary(ty.name) => {
            let wrapper = ty.host_syntax(ctx.interner());
            let wrapper_plain = wrapper.trim_end_matches('?').to_owned();
            AccessorPair {
                getter: HostExpr::raw("GetStrongDictionary").generic_call(
                    vec![wrapper_plain.clone()],
                    vec![
                        key.clone(),
                        HostExpr::Lambda(
                            "dict".into(),
                            Box::new(HostExpr::New(
                                wrapper_plain,
                                vec![HostExpr::raw("dict")],
                            )),
                        ),
                    ],
                ),
                setter: set("SetNativeValue", key, value),
            }
        }

        TypeKind::Array(elem) => {
            let conversion = element_conversion(elem, data, ctx)?;
            AccessorPair {
                getter: HostExpr::raw("GetArray").generic_call(
                    vec![elem.host_syntax(ctx.interner())],
                    vec![
                        key.clone(),
                        HostExpr::Lambda("handle".into(), Box::new(conversion)),
                    ],
                ),
                setter: set("SetArrayValue", key, value),
            }
        }

        // Arbitrary native wrapper types are supported without per-type
        // registration through the opaque cast.
        TypeKind::Object => AccessorPair {
            getter: HostExpr::AsCast(
                Box::new(HostExpr::Index(
                    Box::new(HostExpr::raw("Dictionary")),
                    Box::new(key.clone()),
                )),
                ty.host_syntax(ctx.interner()),
            ),
            setter: set("SetNativeValue", key, value),
        },

        TypeKind::Generic(_) | TypeKind::Delegate => {
            return Err(internal_error(
                data.common.loc,
                format!(
                    "no dictionary accessor rule for shape `{}`",
                    ty.host_syntax(ctx.interner())
                ),
            ));
        }
    };
    Ok(pair)
}

/// Element conversion for `GetArray<T>`: native handle to host element,
/// mirroring the scalar dispatch.
fn element_conversion(
    elem: &TypeDescriptor,
    data: &DictionaryAccessorData,
    ctx: &BindingContext,
) -> Result<HostExpr, Diagnostic> {
    let well_known = ctx.well_known();
    let handle = HostExpr::raw("handle");
    let number = |accessor: &str| {
        HostExpr::raw("NSNumber")
            .member("FromHandle")
            .call(vec![HostExpr::raw("handle")])
            .member(accessor.to_owned())
    };

    Ok(match &elem.kind {
        TypeKind::NullableWrapper(inner) => element_conversion(inner, data, ctx)?,
        TypeKind::Primitive(scalar) => number(number_accessor(*scalar)),
        TypeKind::Enum(scalar) => {
            let raw = number(if scalar.is_signed() {
                "NIntValue"
            } else {
                "NUIntValue"
            });
            HostExpr::Cast(elem.host_syntax(ctx.interner()), Box::new(raw))
        }
        TypeKind::Object if well_known.is_host_string(elem) => HostExpr::raw("CFString")
            .member("FromHandle")
            .call(vec![handle]),
        TypeKind::Object | TypeKind::Generic(_) => HostExpr::raw("Runtime")
            .member(format!(
                "GetNSObject<{}>",
                elem.host_syntax(ctx.interner())
            ))
            .call(vec![handle]),
        TypeKind::Array(_) | TypeKind::Delegate => {
            return Err(internal_error(
                data.common.loc,
                format!(
                    "no array element conversion for shape `{}`",
                    elem.host_syntax(ctx.interner())
                ),
            ));
        }
    })
}

fn get(name: &str, key: &HostExpr) -> HostExpr {
    HostExpr::raw(name).call(vec![key.clone()])
}

fn set(name: &str, key: &HostExpr, value: HostExpr) -> HostExpr {
    HostExpr::raw(name).call(vec![key.clone(), value])
}

/// Width/signedness-specific numeric getter.
fn numeric_getter(scalar: Scalar) -> &'static str {
    match scalar {
        Scalar::Bool => "GetBoolValue",
        Scalar::SByte => "GetSByteValue",
        Scalar::Byte => "GetByteValue",
        Scalar::Int16 => "GetShortValue",
        Scalar::UInt16 => "GetUShortValue",
        Scalar::Int32 => "GetIntValue",
        Scalar::UInt32 => "GetUIntValue",
        Scalar::Int64 => "GetLongValue",
        Scalar::UInt64 => "GetULongValue",
        Scalar::NInt => "GetNIntValue",
        Scalar::NUInt => "GetNUIntValue",
        Scalar::Float => "GetFloatValue",
        Scalar::Double => "GetDoubleValue",
    }
}

/// `NSNumber` accessor for an array element scalar.
fn number_accessor(scalar: Scalar) -> &'static str {
    match scalar {
        Scalar::Bool => "BoolValue",
        Scalar::SByte => "SByteValue",
        Scalar::Byte => "ByteValue",
        Scalar::Int16 => "Int16Value",
        Scalar::UInt16 => "UInt16Value",
        Scalar::Int32 => "Int32Value",
        Scalar::UInt32 => "UInt32Value",
        Scalar::Int64 => "Int64Value",
        Scalar::UInt64 => "UInt64Value",
        Scalar::NInt => "NIntValue",
        Scalar::NUInt => "NUIntValue",
        Scalar::Float => "FloatValue",
        Scalar::Double => "DoubleValue",
    }
}

#[cfg(test)]
mod tests;
