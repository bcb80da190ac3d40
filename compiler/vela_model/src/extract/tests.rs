#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use pretty_assertions::assert_eq;
use vela_diagnostic::ErrorCode;
use vela_ir::decl::{
    ArgValue, Decoration, MemberDecl, MemberShape, ModifierDecl, ParameterDecl, TypeDecl, TypeRef,
    TypeRefKind, TypeResolver,
};
use vela_ir::{Scalar, SharedInterner, Span, TypeDescriptor, TypeKind};
use vela_meta::{AvailabilityEntry, BindingKind, Platform, Version};

use super::*;
use crate::{BindingContext, Member};

/// Table-driven resolver over a small fixed universe.
struct TestResolver {
    interner: SharedInterner,
    protocols: Vec<TypeDecl>,
}

impl TestResolver {
    fn new(interner: SharedInterner) -> Self {
        TestResolver {
            interner,
            protocols: Vec::new(),
        }
    }

    fn with_protocol(mut self, proto: TypeDecl) -> Self {
        self.protocols.push(proto);
        self
    }
}

impl TypeResolver for TestResolver {
    fn resolve(&self, ty: &TypeRef) -> Option<TypeDescriptor> {
        let desc = match &ty.kind {
            TypeRefKind::Named { name, args } if args.is_empty() => match name.as_str() {
                "int" => TypeDescriptor::primitive(self.interner.intern("int"), Scalar::Int32),
                "bool" => TypeDescriptor::primitive(self.interner.intern("bool"), Scalar::Bool),
                "string" => TypeDescriptor::object(self.interner.intern("string")),
                other if other.contains('.') => {
                    TypeDescriptor::object(self.interner.intern(other))
                }
                _ => return None,
            },
            TypeRefKind::Named { .. } => return None,
            TypeRefKind::Array(elem) => TypeDescriptor::array(self.resolve(elem)?),
        };
        Some(match (ty.nullable, desc.is_primitive()) {
            (true, true) => TypeDescriptor::nullable_wrapper(desc),
            (true, false) => desc.nullable(),
            (false, _) => desc,
        })
    }

    fn protocol(&self, name: &str) -> Option<&TypeDecl> {
        self.protocols.iter().find(|p| p.name == name)
    }
}

fn export(selector: &str) -> Decoration {
    Decoration::new("Export", vec![ArgValue::Str(selector.into())])
}

fn method(name: &str, decorations: Vec<Decoration>, parameters: Vec<ParameterDecl>) -> MemberDecl {
    MemberDecl {
        shape: MemberShape::Method,
        name: name.into(),
        decorations,
        modifiers: vec![ModifierDecl::Public],
        parameters,
        return_type: None,
        has_getter: false,
        has_setter: false,
        span: Span::DUMMY,
    }
}

fn ctor(decorations: Vec<Decoration>, parameters: Vec<ParameterDecl>) -> MemberDecl {
    MemberDecl {
        shape: MemberShape::Constructor,
        name: String::new(),
        decorations,
        modifiers: vec![ModifierDecl::Public],
        parameters,
        return_type: None,
        has_getter: false,
        has_setter: false,
        span: Span::DUMMY,
    }
}

fn class_decl(name: &str, members: Vec<MemberDecl>) -> TypeDecl {
    TypeDecl {
        name: name.into(),
        base: None,
        protocols: Vec::new(),
        decorations: vec![Decoration::new("Class", vec![])],
        members,
        span: Span::DUMMY,
    }
}

fn context(interner: &SharedInterner) -> BindingContext {
    BindingContext::new(interner.clone(), "api.json", [])
}

#[test]
fn test_exported_method_is_modeled() {
    let interner = SharedInterner::new();
    let ctx = context(&interner);
    let resolver = TestResolver::new(interner.clone());

    let decl = class_decl(
        "UIKit.UIView",
        vec![method(
            "RemoveFromSuperview",
            vec![export("removeFromSuperview")],
            vec![],
        )],
    );

    let outcome = extract_type(&decl, &ctx, &resolver);
    assert!(!outcome.diagnostics.has_errors());
    let model = outcome.model.unwrap();
    assert_eq!(model.members.len(), 1);
    let Member::Method(data) = &model.members[0] else {
        panic!("expected method");
    };
    assert_eq!(interner.lookup(data.name), "RemoveFromSuperview");
    assert_eq!(
        data.common.export.selector,
        Some(interner.intern("removeFromSuperview"))
    );
    assert_eq!(data.common.declaring_type, interner.intern("UIKit.UIView"));
}

#[test]
fn test_member_without_export_is_skipped() {
    let interner = SharedInterner::new();
    let ctx = context(&interner);
    let resolver = TestResolver::new(interner.clone());

    let decl = class_decl("UIKit.UIView", vec![method("Helper", vec![], vec![])]);

    let outcome = extract_type(&decl, &ctx, &resolver);
    assert!(!outcome.diagnostics.has_errors());
    assert!(outcome.model.unwrap().members.is_empty());
}

#[test]
fn test_undecorated_type_is_not_bound() {
    let interner = SharedInterner::new();
    let ctx = context(&interner);
    let resolver = TestResolver::new(interner.clone());

    let decl = TypeDecl {
        name: "Helpers.Internal".into(),
        base: None,
        protocols: Vec::new(),
        decorations: Vec::new(),
        members: Vec::new(),
        span: Span::DUMMY,
    };

    let outcome = extract_type(&decl, &ctx, &resolver);
    assert!(outcome.model.is_none());
    assert!(outcome.diagnostics.is_empty());
}

#[test]
fn test_nullable_array_of_nullable_strings_keeps_both_axes() {
    let interner = SharedInterner::new();
    let ctx = context(&interner);
    let resolver = TestResolver::new(interner.clone());

    let param = ParameterDecl::new(
        "titles",
        TypeRef::array(TypeRef::named("string").nullable()).nullable(),
    );
    let decl = class_decl(
        "UIKit.UISegmentedControl",
        vec![method("SetTitles", vec![export("setTitles:")], vec![param])],
    );

    let outcome = extract_type(&decl, &ctx, &resolver);
    let model = outcome.model.unwrap();
    let Member::Method(data) = &model.members[0] else {
        panic!("expected method");
    };
    let ty = &data.common.parameters[0].ty;
    assert!(ty.is_nullable);
    let TypeKind::Array(elem) = &ty.kind else {
        panic!("expected array");
    };
    assert!(elem.is_nullable);
    assert_eq!(ty.host_syntax(&*interner), "string?[]?");
}

#[test]
fn test_unresolved_type_reports_and_continues() {
    let interner = SharedInterner::new();
    let ctx = context(&interner);
    let resolver = TestResolver::new(interner.clone());

    let bad = method(
        "SetShape",
        vec![export("setShape:")],
        vec![ParameterDecl::new("shape", TypeRef::named("Mystery"))],
    );
    let good = method("Reload", vec![export("reload")], vec![]);
    let decl = class_decl("UIKit.UITableView", vec![bad, good]);

    let outcome = extract_type(&decl, &ctx, &resolver);
    assert_eq!(outcome.diagnostics.error_count(), 1);
    let diag = outcome.diagnostics.iter().next().unwrap();
    assert_eq!(diag.code, ErrorCode::E2002);
    // The failing member is dropped; its sibling still binds.
    let model = outcome.model.unwrap();
    assert_eq!(model.members.len(), 1);
}

#[test]
fn test_type_availability_merges_into_member() {
    let interner = SharedInterner::new();
    let ctx = context(&interner);
    let resolver = TestResolver::new(interner.clone());

    let mut decl = class_decl(
        "UIKit.UIWindowScene",
        vec![method(
            "RequestGeometryUpdate",
            vec![
                export("requestGeometryUpdateWithPreferences:"),
                Decoration::new(
                    "SupportedOSPlatform",
                    vec![ArgValue::Str("ios16.0".into())],
                ),
            ],
            vec![],
        )],
    );
    decl.decorations.push(Decoration::new(
        "SupportedOSPlatform",
        vec![ArgValue::Str("ios13.0".into())],
    ));

    let outcome = extract_type(&decl, &ctx, &resolver);
    let model = outcome.model.unwrap();
    // The stricter member floor survives the merge with the type floor.
    assert_eq!(
        model.members[0].common().availability.entries(),
        &[AvailabilityEntry::supported(
            Platform::Ios,
            Some(Version::new(16, 0, 0))
        )]
    );
    assert_eq!(
        model.availability.entries(),
        &[AvailabilityEntry::supported(
            Platform::Ios,
            Some(Version::new(13, 0, 0))
        )]
    );
}

#[test]
fn test_explicit_constructor_suppresses_protocol_derived() {
    let interner = SharedInterner::new();
    let ctx = context(&interner);

    let coder_param = ParameterDecl::new("coder", TypeRef::named("Foundation.NSCoder"));
    let proto = TypeDecl {
        name: "Foundation.INSCoding".into(),
        base: None,
        protocols: Vec::new(),
        decorations: vec![Decoration::new("Protocol", vec![])],
        members: vec![ctor(
            vec![export("initWithCoder:")],
            vec![coder_param.clone()],
        )],
        span: Span::DUMMY,
    };
    let resolver = TestResolver::new(interner.clone()).with_protocol(proto);

    let mut decl = class_decl(
        "UIKit.UIView",
        vec![ctor(vec![export("initWithCoder:")], vec![coder_param])],
    );
    decl.protocols.push("Foundation.INSCoding".into());

    let outcome = extract_type(&decl, &ctx, &resolver);
    assert!(!outcome.diagnostics.has_errors());
    let model = outcome.model.unwrap();
    let ctors: Vec<_> = model
        .members
        .iter()
        .filter_map(|m| match m {
            Member::Constructor(data) => Some(data),
            _ => None,
        })
        .collect();
    assert_eq!(ctors.len(), 1);
    assert!(!ctors[0].protocol_derived);
}

#[test]
fn test_conflicting_protocol_constructors_report_duplicate() {
    let interner = SharedInterner::new();
    let ctx = context(&interner);

    let proto_with = |name: &str, param: ParameterDecl| TypeDecl {
        name: name.into(),
        base: None,
        protocols: Vec::new(),
        decorations: vec![Decoration::new("Protocol", vec![])],
        members: vec![ctor(vec![export("initWithValue:")], vec![param])],
        span: Span::DUMMY,
    };
    let resolver = TestResolver::new(interner.clone())
        .with_protocol(proto_with(
            "Demo.IFirst",
            ParameterDecl::new("value", TypeRef::named("int")),
        ))
        .with_protocol(proto_with(
            "Demo.ISecond",
            ParameterDecl::new("value", TypeRef::named("string")),
        ));

    let mut decl = class_decl("Demo.Widget", vec![]);
    decl.protocols.push("Demo.IFirst".into());
    decl.protocols.push("Demo.ISecond".into());

    let outcome = extract_type(&decl, &ctx, &resolver);
    assert_eq!(outcome.diagnostics.error_count(), 1);
    let diag = outcome.diagnostics.iter().next().unwrap();
    assert_eq!(diag.code, ErrorCode::E2003);
    // The first embedding survives.
    let model = outcome.model.unwrap();
    assert_eq!(model.members.len(), 1);
}

#[test]
fn test_identical_protocol_constructors_collapse_silently() {
    let interner = SharedInterner::new();
    let ctx = context(&interner);

    let proto_named = |name: &str| TypeDecl {
        name: name.into(),
        base: None,
        protocols: Vec::new(),
        decorations: vec![Decoration::new("Protocol", vec![])],
        members: vec![ctor(
            vec![export("initWithFrame:")],
            vec![ParameterDecl::new("frame", TypeRef::named("int"))],
        )],
        span: Span::DUMMY,
    };
    let resolver = TestResolver::new(interner.clone())
        .with_protocol(proto_named("Demo.IFirst"))
        .with_protocol(proto_named("Demo.ISecond"));

    let mut decl = class_decl("Demo.Widget", vec![]);
    decl.protocols.push("Demo.IFirst".into());
    decl.protocols.push("Demo.ISecond".into());

    let outcome = extract_type(&decl, &ctx, &resolver);
    assert!(!outcome.diagnostics.has_errors());
    assert_eq!(outcome.model.unwrap().members.len(), 1);
}

#[test]
fn test_protocol_requirements_embed_into_class() {
    let interner = SharedInterner::new();
    let ctx = context(&interner);

    let mut required = method("ScrollViewDidScroll", vec![export("scrollViewDidScroll:")], vec![
        ParameterDecl::new("scrollView", TypeRef::named("UIKit.UIScrollView")),
    ]);
    required.modifiers.push(ModifierDecl::Abstract);
    let optional = method("ScrollViewDidZoom", vec![export("scrollViewDidZoom:")], vec![
        ParameterDecl::new("scrollView", TypeRef::named("UIKit.UIScrollView")),
    ]);

    let proto = TypeDecl {
        name: "UIKit.IUIScrollViewDelegate".into(),
        base: None,
        protocols: Vec::new(),
        decorations: vec![Decoration::new("Protocol", vec![])],
        members: vec![required, optional],
        span: Span::DUMMY,
    };
    let resolver = TestResolver::new(interner.clone()).with_protocol(proto);

    let mut decl = class_decl("Demo.ScrollObserver", vec![]);
    decl.protocols.push("UIKit.IUIScrollViewDelegate".into());

    let outcome = extract_type(&decl, &ctx, &resolver);
    assert!(!outcome.diagnostics.has_errors());
    let model = outcome.model.unwrap();
    let reqs: Vec<_> = model
        .members
        .iter()
        .filter_map(|m| match m {
            Member::ProtocolRequirement(data) => Some(data),
            _ => None,
        })
        .collect();
    assert_eq!(reqs.len(), 2);
    assert!(reqs[0].required);
    assert!(!reqs[1].required);
    // Embedded requirements belong to the implementing class.
    assert_eq!(
        reqs[0].common.declaring_type,
        interner.intern("Demo.ScrollObserver")
    );
}

#[test]
fn test_strong_dictionary_field_accessor() {
    let interner = SharedInterner::new();
    let ctx = context(&interner);
    let resolver = TestResolver::new(interner.clone());

    let accessor = MemberDecl {
        shape: MemberShape::Property,
        name: "Codec".into(),
        decorations: vec![Decoration::new(
            "Field",
            vec![
                ArgValue::Str("AVVideoCodecKey".into()),
                ArgValue::Str("AVFoundation".into()),
            ],
        )],
        modifiers: vec![ModifierDecl::Public],
        parameters: Vec::new(),
        return_type: Some(TypeRef::named("string").nullable()),
        has_getter: true,
        has_setter: true,
        span: Span::DUMMY,
    };
    let plain = MemberDecl {
        shape: MemberShape::Property,
        name: "Unrelated".into(),
        decorations: Vec::new(),
        modifiers: vec![ModifierDecl::Public],
        parameters: Vec::new(),
        return_type: Some(TypeRef::named("int")),
        has_getter: true,
        has_setter: false,
        span: Span::DUMMY,
    };
    let decl = TypeDecl {
        name: "AVFoundation.AVVideoSettings".into(),
        base: None,
        protocols: Vec::new(),
        decorations: vec![Decoration::new("StrongDictionary", vec![])],
        members: vec![accessor, plain],
        span: Span::DUMMY,
    };

    let outcome = extract_type(&decl, &ctx, &resolver);
    assert!(!outcome.diagnostics.has_errors());
    let model = outcome.model.unwrap();
    assert!(matches!(model.binding.kind, BindingKind::StrongDictionary));
    assert_eq!(model.members.len(), 1);
    let Member::DictionaryAccessor(data) = &model.members[0] else {
        panic!("expected dictionary accessor");
    };
    assert_eq!(interner.lookup(data.key), "AVVideoCodecKey");
    assert_eq!(data.key_library, Some(interner.intern("AVFoundation")));
    assert_eq!(data.common.export.selector, None);
}

#[test]
fn test_property_derives_setter_selector() {
    let interner = SharedInterner::new();
    let ctx = context(&interner);
    let resolver = TestResolver::new(interner.clone());

    let prop = MemberDecl {
        shape: MemberShape::Property,
        name: "Title".into(),
        decorations: vec![export("title")],
        modifiers: vec![ModifierDecl::Public],
        parameters: Vec::new(),
        return_type: Some(TypeRef::named("string").nullable()),
        has_getter: true,
        has_setter: true,
        span: Span::DUMMY,
    };
    let decl = class_decl("UIKit.UIButton", vec![prop]);

    let outcome = extract_type(&decl, &ctx, &resolver);
    let model = outcome.model.unwrap();
    let Member::Property(data) = &model.members[0] else {
        panic!("expected property");
    };
    assert_eq!(
        data.getter.map(|a| a.selector),
        Some(interner.intern("title"))
    );
    assert_eq!(
        data.setter.map(|a| a.selector),
        Some(interner.intern("setTitle:"))
    );
}

#[test]
fn test_delegate_parameter_gets_block_proxy() {
    let interner = SharedInterner::new();
    let ctx = context(&interner);

    struct DelegateResolver {
        inner: TestResolver,
    }
    impl TypeResolver for DelegateResolver {
        fn resolve(&self, ty: &TypeRef) -> Option<TypeDescriptor> {
            if let TypeRefKind::Named { name, .. } = &ty.kind {
                if name == "System.Action" {
                    return Some(TypeDescriptor::delegate(
                        self.inner.interner.intern("System.Action"),
                    ));
                }
            }
            self.inner.resolve(ty)
        }
        fn protocol(&self, name: &str) -> Option<&TypeDecl> {
            self.inner.protocol(name)
        }
    }
    let resolver = DelegateResolver {
        inner: TestResolver::new(interner.clone()),
    };

    let decl = class_decl(
        "UIKit.UIView",
        vec![method(
            "Animate",
            vec![export("animateWithDuration:animations:")],
            vec![
                ParameterDecl::new("duration", TypeRef::named("int")),
                ParameterDecl::new("animations", TypeRef::named("System.Action")),
            ],
        )],
    );

    let outcome = extract_type(&decl, &ctx, &resolver);
    let model = outcome.model.unwrap();
    let Member::Method(data) = &model.members[0] else {
        panic!("expected method");
    };
    let proxy = data.common.parameters[1].block_proxy.unwrap();
    assert_eq!(
        interner.lookup(proxy),
        "Trampolines.UIViewAnimateAnimationsProxy"
    );
    assert_eq!(data.common.parameters[0].block_proxy, None);
}
