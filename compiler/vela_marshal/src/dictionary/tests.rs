#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use pretty_assertions::assert_eq;
use smallvec::smallvec;
use vela_ir::{Scalar, SharedInterner, SourceLoc, TypeDescriptor};
use vela_meta::{AvailabilitySet, ExportMetadata};
use vela_model::{BindingContext, DictionaryAccessorData, MemberCommon, Modifiers};

use super::*;

fn accessor(
    interner: &SharedInterner,
    ty: TypeDescriptor,
    key: &str,
    library: Option<&str>,
) -> DictionaryAccessorData {
    DictionaryAccessorData {
        common: MemberCommon {
            declaring_type: interner.intern("AVFoundation.AVVideoSettings"),
            availability: AvailabilitySet::empty(),
            export: ExportMetadata::value_based(SourceLoc::SYNTHESIZED),
            modifiers: Modifiers::PUBLIC,
            parameters: smallvec![],
            loc: SourceLoc::SYNTHESIZED,
        },
        name: interner.intern("Value"),
        ty,
        key: interner.intern(key),
        key_library: library.map(|l| interner.intern(l)),
    }
}

fn context(interner: &SharedInterner) -> BindingContext {
    let wrapper = interner.intern("AVFoundation.AVVideoCompressionSettings");
    BindingContext::new(interner.clone(), "api.json", [wrapper])
}

fn rendered(
    interner: &SharedInterner,
    ctx: &BindingContext,
    ty: TypeDescriptor,
) -> (String, String) {
    let data = accessor(interner, ty, "AVVideoCodecKey", None);
    let pair = synthesize_accessor(&data, ctx).unwrap();
    (pair.getter.render(&**interner), pair.setter.render(&**interner))
}

#[test]
fn test_string_pair() {
    let interner = SharedInterner::new();
    let ctx = context(&interner);
    let ty = TypeDescriptor::object(interner.intern("string")).nullable();
    let (getter, setter) = rendered(&interner, &ctx, ty);
    assert_eq!(getter, "GetStringValue(AVVideoCodecKey)");
    assert_eq!(setter, "SetStringValue(AVVideoCodecKey, value)");
}

#[test]
fn test_native_string_is_asymmetric() {
    let interner = SharedInterner::new();
    let ctx = context(&interner);
    let ty = TypeDescriptor::object(interner.intern("Foundation.NSString"));
    let (getter, setter) = rendered(&interner, &ctx, ty);
    assert_eq!(getter, "GetNSStringValue(AVVideoCodecKey)");
    assert_eq!(setter, "SetStringValue(AVVideoCodecKey, value)");
}

#[test]
fn test_bool_and_numeric_getters() {
    let interner = SharedInterner::new();
    let ctx = context(&interner);

    let bool_ty = TypeDescriptor::primitive(interner.intern("bool"), Scalar::Bool);
    let (getter, setter) = rendered(&interner, &ctx, bool_ty);
    assert_eq!(getter, "GetBoolValue(AVVideoCodecKey)");
    assert_eq!(setter, "SetBooleanValue(AVVideoCodecKey, value)");

    let float_ty = TypeDescriptor::primitive(interner.intern("float"), Scalar::Float);
    let (getter, setter) = rendered(&interner, &ctx, float_ty);
    assert_eq!(getter, "GetFloatValue(AVVideoCodecKey)");
    assert_eq!(setter, "SetNumberValue(AVVideoCodecKey, value)");

    // Nullable wrappers read through the inner shape.
    let nullable_int = TypeDescriptor::nullable_wrapper(TypeDescriptor::primitive(
        interner.intern("int"),
        Scalar::Int32,
    ));
    let (getter, _) = rendered(&interner, &ctx, nullable_int);
    assert_eq!(getter, "GetIntValue(AVVideoCodecKey)");
}

#[test]
fn test_geometry_pairs() {
    let interner = SharedInterner::new();
    let ctx = context(&interner);
    let rect = TypeDescriptor::object(interner.intern("CoreGraphics.CGRect"));
    let (getter, setter) = rendered(&interner, &ctx, rect);
    assert_eq!(getter, "GetCGRectValue(AVVideoCodecKey)");
    assert_eq!(setter, "SetCGRectValue(AVVideoCodecKey, value)");
}

#[test]
fn test_native_dictionary_generic_and_plain() {
    let interner = SharedInterner::new();
    let ctx = context(&interner);

    let plain = TypeDescriptor::object(interner.intern("Foundation.NSDictionary"));
    let (getter, setter) = rendered(&interner, &ctx, plain);
    assert_eq!(getter, "GetNSDictionary(AVVideoCodecKey)");
    assert_eq!(setter, "SetNativeValue(AVVideoCodecKey, value)");

    let generic = TypeDescriptor::generic(
        interner.intern("Foundation.NSDictionary"),
        vec![
            TypeDescriptor::object(interner.intern("Foundation.NSString")),
            TypeDescriptor::object(interner.intern("Foundation.NSObject")),
        ],
    );
    let (getter, _) = rendered(&interner, &ctx, generic);
    assert_eq!(
        getter,
        "GetNSDictionary<Foundation.NSString, Foundation.NSObject>(AVVideoCodecKey)"
    );
}

#[test]
fn test_strong_dictionary_wrapper_lambda() {
    let interner = SharedInterner::new();
    let ctx = context(&interner);
    let wrapper =
        TypeDescriptor::object(interner.intern("AVFoundation.AVVideoCompressionSettings"));
    let (getter, setter) = rendered(&interner, &ctx, wrapper);
    assert_eq!(
        getter,
        "GetStrongDictionary<AVFoundation.AVVideoCompressionSettings>(AVVideoCodecKey, \
         (dict) => new AVFoundation.AVVideoCompressionSettings(dict))"
    );
    assert_eq!(setter, "SetNativeValue(AVVideoCodecKey, value)");
}

#[test]
fn test_smart_enum_by_signedness() {
    let interner = SharedInterner::new();
    let ctx = context(&interner);

    let signed = TypeDescriptor::smart_enum(interner.intern("AVFoundation.AVCaptureMode"), Scalar::NInt);
    let (getter, setter) = rendered(&interner, &ctx, signed);
    assert_eq!(getter, "GetNIntValue(AVVideoCodecKey)");
    assert_eq!(setter, "SetNumberValue(AVVideoCodecKey, value)");

    let unsigned =
        TypeDescriptor::smart_enum(interner.intern("AVFoundation.AVCaptureFlags"), Scalar::NUInt);
    let (getter, _) = rendered(&interner, &ctx, unsigned);
    assert_eq!(getter, "GetNUIntValue(AVVideoCodecKey)");
}

#[test]
fn test_array_with_element_conversion() {
    let interner = SharedInterner::new();
    let ctx = context(&interner);

    let strings = TypeDescriptor::array(TypeDescriptor::object(interner.intern("string")));
    let (getter, setter) = rendered(&interner, &ctx, strings);
    assert_eq!(
        getter,
        "GetArray<string>(AVVideoCodecKey, (handle) => CFString.FromHandle(handle))"
    );
    assert_eq!(setter, "SetArrayValue(AVVideoCodecKey, value)");

    let floats = TypeDescriptor::array(TypeDescriptor::primitive(
        interner.intern("float"),
        Scalar::Float,
    ));
    let (getter, _) = rendered(&interner, &ctx, floats);
    assert_eq!(
        getter,
        "GetArray<float>(AVVideoCodecKey, (handle) => NSNumber.FromHandle(handle).FloatValue)"
    );
}

#[test]
fn test_unknown_wrapper_falls_back_to_cast() {
    let interner = SharedInterner::new();
    let ctx = context(&interner);
    let wrapper = TypeDescriptor::object(interner.intern("AVFoundation.AVOutputSettings"));
    let (getter, setter) = rendered(&interner, &ctx, wrapper.clone().nullable());
    assert_eq!(
        getter,
        "Dictionary[AVVideoCodecKey] as AVFoundation.AVOutputSettings?"
    );
    assert_eq!(setter, "SetNativeValue(AVVideoCodecKey, value)");
}

#[test]
fn test_unreachable_shape_is_internal_defect() {
    let interner = SharedInterner::new();
    let ctx = context(&interner);
    let data = accessor(
        &interner,
        TypeDescriptor::delegate(interner.intern("System.Action")),
        "AVVideoCodecKey",
        None,
    );
    let err = synthesize_accessor(&data, &ctx).unwrap_err();
    assert!(err.code.is_internal());
}

#[test]
fn test_key_library_qualifies_constant() {
    let interner = SharedInterner::new();
    let ctx = context(&interner);
    let data = accessor(
        &interner,
        TypeDescriptor::object(interner.intern("string")),
        "AVVideoCodecKey",
        Some("AVFoundation"),
    );
    let pair = synthesize_accessor(&data, &ctx).unwrap();
    assert_eq!(
        pair.getter.render(&*interner),
        "GetStringValue(AVFoundation.AVVideoCodecKey)"
    );
}

#[test]
fn test_dispatch_is_total_over_extractable_shapes() {
    let interner = SharedInterner::new();
    let ctx = context(&interner);

    let mut shapes = vec![
        TypeDescriptor::object(interner.intern("string")),
        TypeDescriptor::object(interner.intern("Foundation.NSString")),
        TypeDescriptor::object(interner.intern("Foundation.NSDictionary")),
        TypeDescriptor::object(interner.intern("CoreGraphics.CGRect")),
        TypeDescriptor::object(interner.intern("CoreGraphics.CGSize")),
        TypeDescriptor::object(interner.intern("CoreGraphics.CGPoint")),
        TypeDescriptor::object(interner.intern("AVFoundation.AVVideoCompressionSettings")),
        TypeDescriptor::object(interner.intern("AVFoundation.AVAudioSettings")),
        TypeDescriptor::smart_enum(interner.intern("AVFoundation.AVCaptureMode"), Scalar::NInt),
    ];
    for scalar in [
        Scalar::Bool,
        Scalar::SByte,
        Scalar::Byte,
        Scalar::Int16,
        Scalar::UInt16,
        Scalar::Int32,
        Scalar::UInt32,
        Scalar::Int64,
        Scalar::UInt64,
        Scalar::NInt,
        Scalar::NUInt,
        Scalar::Float,
        Scalar::Double,
    ] {
        shapes.push(TypeDescriptor::primitive(interner.intern("n"), scalar));
    }
    let arrays: Vec<TypeDescriptor> = shapes
        .iter()
        .map(|s| TypeDescriptor::array(s.clone()))
        .collect();
    shapes.extend(arrays);
    let nullables: Vec<TypeDescriptor> = shapes
        .iter()
        .map(|s| {
            if s.is_reference() {
                s.clone().nullable()
            } else {
                TypeDescriptor::nullable_wrapper(s.clone())
            }
        })
        .collect();
    shapes.extend(nullables);

    for shape in shapes {
        let data = accessor(&interner, shape.clone(), "Key", None);
        let result = synthesize_accessor(&data, &ctx);
        assert!(
            result.is_ok(),
            "no accessor for shape {}",
            shape.host_syntax(&*interner)
        );
    }
}
