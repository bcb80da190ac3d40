//! Platform availability sets.
//!
//! Availability accumulates across a member's own decorations, its enclosing
//! type's decorations, and — for class members realizing a protocol
//! requirement — the requirement's decorations. The merge keeps, per
//! platform, the most restrictive combination: a member can never claim
//! availability wider than any of its sources.

use std::fmt;

use vela_diagnostic::{Diagnostic, ErrorCode};
use vela_ir::decl::Decoration;
use vela_ir::Name;

use crate::DecorationArgs;

/// Platforms the generator understands.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum Platform {
    Ios,
    MacOs,
    TvOs,
    MacCatalyst,
}

impl Platform {
    const ALL: [Platform; 4] = [
        Platform::Ios,
        Platform::MacOs,
        Platform::TvOs,
        Platform::MacCatalyst,
    ];

    /// Guard-attribute token, e.g. `ios` in `[SupportedOSPlatform("ios14.0")]`.
    pub fn token(self) -> &'static str {
        match self {
            Platform::Ios => "ios",
            Platform::MacOs => "macos",
            Platform::TvOs => "tvos",
            Platform::MacCatalyst => "maccatalyst",
        }
    }

    /// Parse a platform token.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ios" => Some(Platform::Ios),
            "macos" => Some(Platform::MacOs),
            "tvos" => Some(Platform::TvOs),
            "maccatalyst" => Some(Platform::MacCatalyst),
            _ => None,
        }
    }

    fn index(self) -> usize {
        match self {
            Platform::Ios => 0,
            Platform::MacOs => 1,
            Platform::TvOs => 2,
            Platform::MacCatalyst => 3,
        }
    }
}

/// A dotted platform version.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Version {
    pub major: u16,
    pub minor: u16,
    pub patch: u16,
}

impl Version {
    /// Create a version.
    pub const fn new(major: u16, minor: u16, patch: u16) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }

    /// Parse `14`, `14.0` or `14.0.1`.
    pub fn parse(s: &str) -> Option<Self> {
        let mut parts = s.split('.');
        let major = parts.next()?.parse().ok()?;
        let minor = match parts.next() {
            None => 0,
            Some(p) => p.parse().ok()?,
        };
        let patch = match parts.next() {
            None => 0,
            Some(p) => p.parse().ok()?,
        };
        if parts.next().is_some() {
            return None;
        }
        Some(Version {
            major,
            minor,
            patch,
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.patch > 0 {
            write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
        } else {
            write!(f, "{}.{}", self.major, self.minor)
        }
    }
}

/// One support or exclusion range.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct AvailabilityEntry {
    pub platform: Platform,
    /// Minimum version for supported entries; first unsupported version for
    /// exclusions. `None` means the whole platform.
    pub version: Option<Version>,
    pub supported: bool,
}

impl AvailabilityEntry {
    /// A supported range starting at `version`.
    pub fn supported(platform: Platform, version: Option<Version>) -> Self {
        AvailabilityEntry {
            platform,
            version,
            supported: true,
        }
    }

    /// An exclusion starting at `version` (whole platform when `None`).
    pub fn unsupported(platform: Platform, version: Option<Version>) -> Self {
        AvailabilityEntry {
            platform,
            version,
            supported: false,
        }
    }
}

/// Per-platform accumulated state inside the builder.
#[derive(Copy, Clone, Default)]
struct PlatformState {
    /// Effective minimum supported version; inner `None` = no floor.
    supported: Option<Option<Version>>,
    /// Effective first unsupported version; inner `None` = whole platform.
    unsupported: Option<Option<Version>>,
}

impl PlatformState {
    fn add_supported(&mut self, version: Option<Version>) {
        // Most restrictive floor wins: the highest minimum version.
        self.supported = Some(match self.supported {
            None => version,
            Some(existing) => match (existing, version) {
                (None, v) | (v, None) => v,
                (Some(a), Some(b)) => Some(a.max(b)),
            },
        });
    }

    fn add_unsupported(&mut self, version: Option<Version>) {
        // Most restrictive exclusion wins: the lowest cutoff, with a
        // whole-platform exclusion dominating any versioned one.
        self.unsupported = Some(match self.unsupported {
            None => version,
            Some(existing) => match (existing, version) {
                (None, _) | (_, None) => None,
                (Some(a), Some(b)) => Some(a.min(b)),
            },
        });
    }
}

/// Monotonic builder for [`AvailabilitySet`].
#[derive(Clone, Default)]
pub struct AvailabilityBuilder {
    platforms: [PlatformState; 4],
}

impl AvailabilityBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one entry, merging with anything already recorded for its
    /// platform.
    pub fn add(&mut self, entry: AvailabilityEntry) {
        let state = &mut self.platforms[entry.platform.index()];
        if entry.supported {
            state.add_supported(entry.version);
        } else {
            state.add_unsupported(entry.version);
        }
    }

    /// Add every entry of an existing set.
    pub fn add_set(&mut self, set: &AvailabilitySet) {
        for entry in set.entries() {
            self.add(*entry);
        }
    }

    /// Finish, producing the canonical set.
    pub fn build(self) -> AvailabilitySet {
        let mut entries = Vec::new();
        for platform in Platform::ALL {
            let state = self.platforms[platform.index()];
            if let Some(version) = state.supported {
                entries.push(AvailabilityEntry::supported(platform, version));
            }
            if let Some(version) = state.unsupported {
                entries.push(AvailabilityEntry::unsupported(platform, version));
            }
        }
        AvailabilitySet { entries }
    }
}

/// A merged, order-independent set of platform support/exclusion ranges.
///
/// Entries are kept in canonical order (platform, supported-before-
/// unsupported), so derived equality is set equality and repeated builds
/// from the same sources are identical.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct AvailabilitySet {
    entries: Vec<AvailabilityEntry>,
}

impl AvailabilitySet {
    /// The empty set: available everywhere.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Canonical entries.
    pub fn entries(&self) -> &[AvailabilityEntry] {
        &self.entries
    }

    /// Whether no constraints are recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merge two sets, keeping the most restrictive combination per
    /// platform. `merge(a, a) == a`.
    pub fn merge(&self, other: &AvailabilitySet) -> AvailabilitySet {
        let mut builder = AvailabilityBuilder::new();
        builder.add_set(self);
        builder.add_set(other);
        builder.build()
    }
}

/// Parse one availability decoration, if the decoration is one.
///
/// Returns `Ok(None)` for decorations that are not availability
/// decorations; the caller tries other interpretations.
pub fn parse_availability(
    dec: &Decoration,
    file: Name,
) -> Result<Option<AvailabilityEntry>, Diagnostic> {
    let supported = match dec.name.as_str() {
        "SupportedOSPlatform" => true,
        "UnsupportedOSPlatform" => false,
        _ => return Ok(None),
    };

    let args = DecorationArgs::new(dec, file);
    args.check_named_keys(&[])?;
    if args.arity() != 1 {
        return Err(args.arity_error("1"));
    }
    let raw = args.str_at(0)?;

    let split = raw
        .char_indices()
        .find(|(_, c)| c.is_ascii_digit())
        .map_or(raw.len(), |(i, _)| i);
    let (platform_raw, version_raw) = raw.split_at(split);

    let platform = Platform::parse(platform_raw).ok_or_else(|| {
        Diagnostic::error(ErrorCode::E1002)
            .with_message(format!("`{platform_raw}` is not a recognized platform"))
            .with_label(args.loc(), "in this decoration")
    })?;

    let version = if version_raw.is_empty() {
        None
    } else {
        Some(Version::parse(version_raw).ok_or_else(|| {
            Diagnostic::error(ErrorCode::E1004)
                .with_message(format!("`{version_raw}` is not a valid platform version"))
                .with_label(args.loc(), "in this decoration")
        })?)
    };

    Ok(Some(AvailabilityEntry {
        platform,
        version,
        supported,
    }))
}

/// Accumulate every availability decoration in a list into a builder.
///
/// Fails closed on the first malformed decoration.
pub fn collect_availability(
    decorations: &[Decoration],
    file: Name,
    builder: &mut AvailabilityBuilder,
) -> Result<(), Diagnostic> {
    for dec in decorations {
        if let Some(entry) = parse_availability(dec, file)? {
            builder.add(entry);
        }
    }
    Ok(())
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use vela_ir::decl::ArgValue;

    fn sup(platform: Platform, version: &str) -> AvailabilityEntry {
        AvailabilityEntry::supported(platform, Some(Version::parse(version).unwrap()))
    }

    #[test]
    fn test_parse_supported_with_version() {
        let dec = Decoration::new("SupportedOSPlatform", vec![ArgValue::Str("ios14.0".into())]);
        let entry = parse_availability(&dec, Name::EMPTY).unwrap().unwrap();
        assert_eq!(entry.platform, Platform::Ios);
        assert_eq!(entry.version, Some(Version::new(14, 0, 0)));
        assert!(entry.supported);
    }

    #[test]
    fn test_parse_unsupported_whole_platform() {
        let dec = Decoration::new("UnsupportedOSPlatform", vec![ArgValue::Str("tvos".into())]);
        let entry = parse_availability(&dec, Name::EMPTY).unwrap().unwrap();
        assert_eq!(entry.platform, Platform::TvOs);
        assert_eq!(entry.version, None);
        assert!(!entry.supported);
    }

    #[test]
    fn test_parse_rejects_bad_version() {
        let dec = Decoration::new(
            "SupportedOSPlatform",
            vec![ArgValue::Str("ios14.0.0.0".into())],
        );
        let err = parse_availability(&dec, Name::EMPTY).unwrap_err();
        assert_eq!(err.code, ErrorCode::E1004);
    }

    #[test]
    fn test_non_availability_decoration_is_skipped() {
        let dec = Decoration::new("Export", vec![ArgValue::Str("init".into())]);
        assert_eq!(parse_availability(&dec, Name::EMPTY).unwrap(), None);
    }

    #[test]
    fn test_merge_keeps_most_restrictive_floor() {
        let mut a = AvailabilityBuilder::new();
        a.add(sup(Platform::Ios, "13.0"));
        let a = a.build();

        let mut b = AvailabilityBuilder::new();
        b.add(sup(Platform::Ios, "15.1"));
        let b = b.build();

        let merged = a.merge(&b);
        assert_eq!(merged.entries(), &[sup(Platform::Ios, "15.1")]);
        // Narrower set wins regardless of merge order.
        assert_eq!(b.merge(&a), merged);
    }

    #[test]
    fn test_merge_whole_platform_exclusion_dominates() {
        let mut a = AvailabilityBuilder::new();
        a.add(AvailabilityEntry::unsupported(
            Platform::MacOs,
            Some(Version::new(12, 0, 0)),
        ));
        let a = a.build();

        let mut b = AvailabilityBuilder::new();
        b.add(AvailabilityEntry::unsupported(Platform::MacOs, None));
        let b = b.build();

        let merged = a.merge(&b);
        assert_eq!(
            merged.entries(),
            &[AvailabilityEntry::unsupported(Platform::MacOs, None)]
        );
    }

    #[test]
    fn test_set_equality_is_order_independent() {
        let mut a = AvailabilityBuilder::new();
        a.add(sup(Platform::Ios, "14.0"));
        a.add(sup(Platform::MacOs, "11.0"));

        let mut b = AvailabilityBuilder::new();
        b.add(sup(Platform::MacOs, "11.0"));
        b.add(sup(Platform::Ios, "14.0"));

        assert_eq!(a.build(), b.build());
    }

    fn arb_entry() -> impl Strategy<Value = AvailabilityEntry> {
        (
            prop_oneof![
                Just(Platform::Ios),
                Just(Platform::MacOs),
                Just(Platform::TvOs),
                Just(Platform::MacCatalyst),
            ],
            proptest::option::of((0u16..30, 0u16..10).prop_map(|(maj, min)| Version::new(maj, min, 0))),
            any::<bool>(),
        )
            .prop_map(|(platform, version, supported)| AvailabilityEntry {
                platform,
                version,
                supported,
            })
    }

    proptest! {
        #[test]
        fn prop_merge_idempotent(entries in proptest::collection::vec(arb_entry(), 0..8)) {
            let mut builder = AvailabilityBuilder::new();
            for entry in &entries {
                builder.add(*entry);
            }
            let set = builder.build();
            prop_assert_eq!(set.merge(&set), set);
        }

        #[test]
        fn prop_merge_commutative(
            left in proptest::collection::vec(arb_entry(), 0..8),
            right in proptest::collection::vec(arb_entry(), 0..8),
        ) {
            let build = |entries: &[AvailabilityEntry]| {
                let mut builder = AvailabilityBuilder::new();
                for entry in entries {
                    builder.add(*entry);
                }
                builder.build()
            };
            let a = build(&left);
            let b = build(&right);
            prop_assert_eq!(a.merge(&b), b.merge(&a));
        }
    }
}
