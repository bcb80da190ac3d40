use std::fmt;

/// Error codes for all generator diagnostics.
///
/// Format: E#### where the first digit indicates the phase:
/// - E1xxx: Decoration parse errors (malformed declarations)
/// - E2xxx: Semantic model errors
/// - E3xxx: Marshaling/invocation errors
/// - E4xxx: Caller configuration errors
/// - E9xxx: Internal generator errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Decoration parse errors (E1xxx)
    /// Positional argument arity not in the recognized set
    E1001,
    /// Decoration argument has the wrong kind
    E1002,
    /// Unrecognized named argument key
    E1003,
    /// Malformed platform version string
    E1004,

    // Semantic model errors (E2xxx)
    /// Category decoration names a non-type argument
    E2001,
    /// Type reference does not resolve to a known descriptor
    E2002,
    /// Duplicate declarations collide on the same native selector
    E2003,

    // Marshaling errors (E3xxx)
    /// No native call thunk for the member's marshaled shape
    E3001,

    // Configuration errors (E4xxx)
    /// Supplied event-argument shape names fewer fields than parameters
    E4001,

    // Internal errors (E9xxx)
    /// Internal invariant violation; the run continues for other members
    E9001,
}

impl ErrorCode {
    /// String form of the code.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E3001 => "E3001",
            ErrorCode::E4001 => "E4001",
            ErrorCode::E9001 => "E9001",
        }
    }

    /// Short description for `--explain`-style output.
    pub fn description(self) -> &'static str {
        match self {
            ErrorCode::E1001 => "decoration has an unrecognized number of positional arguments",
            ErrorCode::E1002 => "decoration argument has the wrong kind",
            ErrorCode::E1003 => "decoration names an unrecognized named argument",
            ErrorCode::E1004 => "platform version string is malformed",
            ErrorCode::E2001 => "category decoration does not name a type",
            ErrorCode::E2002 => "type reference does not resolve to a known type",
            ErrorCode::E2003 => "two declarations bind the same native selector",
            ErrorCode::E3001 => "no native call thunk matches the member's marshaled signature",
            ErrorCode::E4001 => "event-argument shape names fewer fields than the member has",
            ErrorCode::E9001 => "internal generator invariant violated",
        }
    }

    /// Whether this is a strict fail-closed decoration parse error.
    ///
    /// These abort modeling of the whole declaration; everything else is
    /// isolated to the single member.
    pub fn is_decoration_error(self) -> bool {
        matches!(
            self,
            ErrorCode::E1001 | ErrorCode::E1002 | ErrorCode::E1003 | ErrorCode::E1004
        )
    }

    /// Whether this is an internal generator error.
    pub fn is_internal(self) -> bool {
        matches!(self, ErrorCode::E9001)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_as_str() {
        assert_eq!(ErrorCode::E1003.to_string(), "E1003");
        assert_eq!(ErrorCode::E9001.to_string(), "E9001");
    }

    #[test]
    fn test_phase_predicates() {
        assert!(ErrorCode::E1001.is_decoration_error());
        assert!(!ErrorCode::E3001.is_decoration_error());
        assert!(ErrorCode::E9001.is_internal());
    }
}
