//! Positional-then-named decoration argument parser.
//!
//! Operates over the generic key/value bag a [`Decoration`] carries,
//! independent of any specific metadata representation. All accessors
//! produce a [`Diagnostic`] on mismatch so callers can stay fail-closed.

use vela_diagnostic::{Diagnostic, ErrorCode};
use vela_ir::decl::{ArgValue, Decoration};
use vela_ir::{Name, SourceLoc};

/// Typed view over one decoration's arguments.
pub struct DecorationArgs<'a> {
    dec: &'a Decoration,
    loc: SourceLoc,
}

impl<'a> DecorationArgs<'a> {
    /// Wrap a decoration, recording the file its spans belong to.
    pub fn new(dec: &'a Decoration, file: Name) -> Self {
        DecorationArgs {
            dec,
            loc: SourceLoc::new(file, dec.span),
        }
    }

    /// The decoration's source location.
    pub fn loc(&self) -> SourceLoc {
        self.loc
    }

    /// Number of positional arguments.
    pub fn arity(&self) -> usize {
        self.dec.positional.len()
    }

    /// Fail the parse because the arity is not in the recognized set.
    pub fn arity_error(&self, recognized: &str) -> Diagnostic {
        Diagnostic::error(ErrorCode::E1001)
            .with_message(format!(
                "`{}` takes {} positional argument(s), found {}",
                self.dec.name,
                recognized,
                self.arity()
            ))
            .with_label(self.loc, "in this decoration")
    }

    /// Positional string argument at `idx`.
    pub fn str_at(&self, idx: usize) -> Result<&'a str, Diagnostic> {
        match self.dec.positional.get(idx) {
            Some(ArgValue::Str(s)) => Ok(s),
            other => Err(self.kind_error(idx, "a string literal", other)),
        }
    }

    /// Positional enum-constant argument at `idx`.
    pub fn enum_at(&self, idx: usize) -> Result<&'a str, Diagnostic> {
        match self.dec.positional.get(idx) {
            Some(ArgValue::EnumName(s)) => Ok(s),
            other => Err(self.kind_error(idx, "an enum constant", other)),
        }
    }

    /// Positional type-reference argument at `idx`.
    pub fn type_ref_at(&self, idx: usize) -> Result<&'a str, Diagnostic> {
        match self.dec.positional.get(idx) {
            Some(ArgValue::TypeRef(s)) => Ok(s),
            other => Err(self.kind_error(idx, "a type reference", other)),
        }
    }

    /// Verify every named key is in the recognized set.
    ///
    /// Any unrecognized key fails the whole parse — strict fail-closed
    /// policy, not best-effort.
    pub fn check_named_keys(&self, recognized: &[&str]) -> Result<(), Diagnostic> {
        for arg in &self.dec.named {
            if !recognized.contains(&arg.key.as_str()) {
                return Err(Diagnostic::error(ErrorCode::E1003)
                    .with_message(format!(
                        "unrecognized named argument `{}` on `{}`",
                        arg.key, self.dec.name
                    ))
                    .with_label(self.loc, "in this decoration")
                    .with_note(format!("recognized keys are: {}", recognized.join(", "))));
            }
        }
        Ok(())
    }

    /// Named string argument, if present.
    pub fn named_str(&self, key: &str) -> Result<Option<&'a str>, Diagnostic> {
        match self.named_value(key) {
            None => Ok(None),
            Some(ArgValue::Str(s)) => Ok(Some(s)),
            Some(other) => Err(self.named_kind_error(key, "a string literal", other)),
        }
    }

    /// Named enum-constant argument, if present.
    pub fn named_enum(&self, key: &str) -> Result<Option<&'a str>, Diagnostic> {
        match self.named_value(key) {
            None => Ok(None),
            Some(ArgValue::EnumName(s)) => Ok(Some(s)),
            Some(other) => Err(self.named_kind_error(key, "an enum constant", other)),
        }
    }

    /// Named type-reference argument, if present.
    pub fn named_type_ref(&self, key: &str) -> Result<Option<&'a str>, Diagnostic> {
        match self.named_value(key) {
            None => Ok(None),
            Some(ArgValue::TypeRef(s)) => Ok(Some(s)),
            Some(other) => Err(self.named_kind_error(key, "a type reference", other)),
        }
    }

    /// Raw named value, if present.
    pub fn named_value(&self, key: &str) -> Option<&'a ArgValue> {
        self.dec
            .named
            .iter()
            .find(|arg| arg.key == key)
            .map(|arg| &arg.value)
    }

    fn kind_error(&self, idx: usize, expected: &str, found: Option<&ArgValue>) -> Diagnostic {
        Diagnostic::error(ErrorCode::E1002)
            .with_message(format!(
                "argument {} of `{}` must be {}, found {}",
                idx,
                self.dec.name,
                expected,
                describe(found)
            ))
            .with_label(self.loc, "in this decoration")
    }

    fn named_kind_error(&self, key: &str, expected: &str, found: &ArgValue) -> Diagnostic {
        Diagnostic::error(ErrorCode::E1002)
            .with_message(format!(
                "named argument `{}` of `{}` must be {}, found {}",
                key,
                self.dec.name,
                expected,
                describe(Some(found))
            ))
            .with_label(self.loc, "in this decoration")
    }
}

fn describe(value: Option<&ArgValue>) -> &'static str {
    match value {
        None => "nothing",
        Some(ArgValue::Str(_)) => "a string literal",
        Some(ArgValue::Int(_)) => "an integer literal",
        Some(ArgValue::Bool(_)) => "a boolean literal",
        Some(ArgValue::TypeRef(_)) => "a type reference",
        Some(ArgValue::EnumName(_)) => "an enum constant",
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;
    use vela_ir::decl::Decoration;
    use vela_ir::Name;

    #[test]
    fn test_positional_access() {
        let dec = Decoration::new("Export", vec![ArgValue::Str("init".into())]);
        let args = DecorationArgs::new(&dec, Name::EMPTY);
        assert_eq!(args.arity(), 1);
        assert_eq!(args.str_at(0).unwrap(), "init");
        assert!(args.str_at(1).is_err());
    }

    #[test]
    fn test_wrong_kind_fails() {
        let dec = Decoration::new("Export", vec![ArgValue::Int(3)]);
        let args = DecorationArgs::new(&dec, Name::EMPTY);
        let err = args.str_at(0).unwrap_err();
        assert_eq!(err.code, ErrorCode::E1002);
    }

    #[test]
    fn test_unrecognized_named_key_fails_closed() {
        let dec = Decoration::new("Class", vec![ArgValue::Str("UIView".into())])
            .with_named("Nmae", ArgValue::Str("typo".into()));
        let args = DecorationArgs::new(&dec, Name::EMPTY);
        let err = args.check_named_keys(&["Name", "Flags"]).unwrap_err();
        assert_eq!(err.code, ErrorCode::E1003);
    }

    #[test]
    fn test_named_lookup() {
        let dec = Decoration::new("SmartEnum", vec![])
            .with_named("ErrorDomain", ArgValue::Str("AVError".into()));
        let args = DecorationArgs::new(&dec, Name::EMPTY);
        assert_eq!(args.named_str("ErrorDomain").unwrap(), Some("AVError"));
        assert_eq!(args.named_str("LibraryName").unwrap(), None);
    }
}
