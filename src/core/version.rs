//! Local version synthesis
//!
//! Composes the deterministic local version identifier that encodes the
//! build provenance of a wheel: build date, toolkit version, framework
//! version, C++11 ABI flag, and the short source revision.
//!
//! The rendered grammar is a stability contract. Consumers select a
//! compatible wheel by parsing this exact token order:
//!
//! ```text
//! <date>.cu<toolkit>torch<framework>cxx11abi<ABI>.<revision>
//! ```

use std::fmt;

use chrono::Utc;

/// C++11 ABI flag compiled into the installed framework.
///
/// Rendered as `TRUE`/`FALSE` inside the local version identifier.
/// Wheels are only binary-compatible with a framework built with the
/// same flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AbiFlag {
    /// Framework was built with the C++11 ABI
    True,
    /// Framework was built with the pre-C++11 ABI, or the flag is unknown
    #[default]
    False,
}

impl AbiFlag {
    /// Parse a boolean-like token printed by the framework introspection.
    ///
    /// Accepts the common renderings (`True`, `TRUE`, `1`, ...). Returns
    /// `None` for anything unrecognized so the caller can degrade
    /// explicitly.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim() {
            "True" | "TRUE" | "true" | "1" => Some(Self::True),
            "False" | "FALSE" | "false" | "0" => Some(Self::False),
            _ => None,
        }
    }
}

impl fmt::Display for AbiFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::True => write!(f, "TRUE"),
            Self::False => write!(f, "FALSE"),
        }
    }
}

/// Strip every `.` from a dotted version string.
///
/// Total and idempotent: `"12.8"` becomes `"128"`, `"2.8.0"` becomes
/// `"280"`, and a string without dots passes through unchanged.
pub fn normalize_version(version: &str) -> String {
    version.chars().filter(|c| *c != '.').collect()
}

/// Current UTC calendar date as an 8-digit `YYYYMMDD` string.
pub fn build_date_utc() -> String {
    Utc::now().format("%Y%m%d").to_string()
}

/// Deterministic local version identifier.
///
/// For a fixed `(toolkit, framework, abi, revision)` tuple and calendar
/// day the rendered identifier is byte-identical across computations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalVersion {
    /// Build date, `YYYYMMDD`
    date: String,
    /// Toolkit version with dots stripped (e.g. "128")
    toolkit: String,
    /// Framework version with dots stripped (e.g. "280")
    framework: String,
    /// C++11 ABI flag of the installed framework
    abi: AbiFlag,
    /// Short source revision hash (6 hex characters)
    revision: String,
}

impl LocalVersion {
    /// Compose an identifier from raw (still dotted) version strings.
    pub fn new(
        date: impl Into<String>,
        toolkit_version: &str,
        framework_version: &str,
        abi: AbiFlag,
        revision: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            toolkit: normalize_version(toolkit_version),
            framework: normalize_version(framework_version),
            abi,
            revision: revision.into(),
        }
    }

    /// Compose an identifier dated with the current UTC day.
    pub fn for_today(
        toolkit_version: &str,
        framework_version: &str,
        abi: AbiFlag,
        revision: impl Into<String>,
    ) -> Self {
        Self::new(
            build_date_utc(),
            toolkit_version,
            framework_version,
            abi,
            revision,
        )
    }

    /// The short source revision this identifier encodes.
    pub fn revision(&self) -> &str {
        &self.revision
    }

    /// The build date this identifier encodes.
    pub fn date(&self) -> &str {
        &self.date
    }
}

impl fmt::Display for LocalVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.cu{}torch{}cxx11abi{}.{}",
            self.date, self.toolkit, self.framework, self.abi, self.revision
        )
    }
}

/// Check that an identifier is a legal local version segment.
///
/// The packaging ecosystem restricts local version segments to
/// `[A-Za-z0-9.]`; anything else must be rejected before it reaches a
/// wheel filename.
pub fn is_valid_local_segment(identifier: &str) -> bool {
    !identifier.is_empty()
        && identifier
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // ============================================
    // Unit Tests
    // ============================================

    #[test]
    fn test_normalize_strips_dots() {
        assert_eq!(normalize_version("12.8"), "128");
        assert_eq!(normalize_version("2.8.0"), "280");
        assert_eq!(normalize_version("13.0"), "130");
    }

    #[test]
    fn test_normalize_without_dots_is_identity() {
        assert_eq!(normalize_version("128"), "128");
        assert_eq!(normalize_version(""), "");
    }

    #[test]
    fn test_abi_flag_rendering() {
        assert_eq!(AbiFlag::True.to_string(), "TRUE");
        assert_eq!(AbiFlag::False.to_string(), "FALSE");
    }

    #[test]
    fn test_abi_flag_parses_python_bool() {
        assert_eq!(AbiFlag::from_token("True"), Some(AbiFlag::True));
        assert_eq!(AbiFlag::from_token("False\n"), Some(AbiFlag::False));
        assert_eq!(AbiFlag::from_token("1"), Some(AbiFlag::True));
        assert_eq!(AbiFlag::from_token("maybe"), None);
        assert_eq!(AbiFlag::from_token(""), None);
    }

    #[test]
    fn test_abi_flag_defaults_to_false() {
        assert_eq!(AbiFlag::default(), AbiFlag::False);
    }

    #[test]
    fn test_identifier_grammar() {
        let local = LocalVersion::new("20251015", "12.8", "2.8.0", AbiFlag::True, "abc123");
        assert_eq!(
            local.to_string(),
            "20251015.cu128torch280cxx11abiTRUE.abc123"
        );
    }

    #[test]
    fn test_identifier_with_false_abi() {
        let local = LocalVersion::new("20260101", "13.0", "2.9.0", AbiFlag::False, "deadbe");
        assert_eq!(
            local.to_string(),
            "20260101.cu130torch290cxx11abiFALSE.deadbe"
        );
    }

    #[test]
    fn test_identifier_is_deterministic() {
        let a = LocalVersion::new("20251015", "12.8", "2.8.0", AbiFlag::True, "abc123");
        let b = LocalVersion::new("20251015", "12.8", "2.8.0", AbiFlag::True, "abc123");
        assert_eq!(a, b);
        assert_eq!(a.to_string(), b.to_string());
    }

    #[test]
    fn test_build_date_shape() {
        let date = build_date_utc();
        assert_eq!(date.len(), 8);
        assert!(date.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_local_segment_validation() {
        assert!(is_valid_local_segment(
            "20251015.cu128torch280cxx11abiTRUE.abc123"
        ));
        assert!(!is_valid_local_segment("2025_1015.cu128"));
        assert!(!is_valid_local_segment("cu128+extra"));
        assert!(!is_valid_local_segment(""));
    }

    // ============================================
    // Property-Based Tests
    // ============================================

    /// Strategy for dotted version strings of the form `\d+(\.\d+)*`
    fn dotted_version_strategy() -> impl Strategy<Value = String> {
        proptest::collection::vec(0u32..100, 1..4).prop_map(|parts| {
            parts
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(".")
        })
    }

    fn revision_strategy() -> impl Strategy<Value = String> {
        "[0-9a-f]{6}"
    }

    fn abi_strategy() -> impl Strategy<Value = AbiFlag> {
        prop_oneof![Just(AbiFlag::True), Just(AbiFlag::False)]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Normalization is total: dotted digits in, only digits out.
        #[test]
        fn prop_normalize_yields_digits(version in dotted_version_strategy()) {
            let normalized = normalize_version(&version);
            prop_assert!(normalized.chars().all(|c| c.is_ascii_digit()));
        }

        /// Normalization is idempotent.
        #[test]
        fn prop_normalize_idempotent(version in dotted_version_strategy()) {
            let once = normalize_version(&version);
            let twice = normalize_version(&once);
            prop_assert_eq!(once, twice);
        }

        /// No information loss beyond the separators.
        #[test]
        fn prop_normalize_preserves_digits(version in dotted_version_strategy()) {
            let expected: String = version.chars().filter(|c| c.is_ascii_digit()).collect();
            prop_assert_eq!(normalize_version(&version), expected);
        }

        /// Repeated synthesis with fixed inputs is byte-identical.
        #[test]
        fn prop_identifier_deterministic(
            toolkit in dotted_version_strategy(),
            framework in dotted_version_strategy(),
            abi in abi_strategy(),
            revision in revision_strategy(),
        ) {
            let a = LocalVersion::new("20251015", &toolkit, &framework, abi, revision.clone());
            let b = LocalVersion::new("20251015", &toolkit, &framework, abi, revision);
            prop_assert_eq!(a.to_string(), b.to_string());
        }

        /// Every synthesized identifier is a legal local version segment.
        #[test]
        fn prop_identifier_is_valid_segment(
            toolkit in dotted_version_strategy(),
            framework in dotted_version_strategy(),
            abi in abi_strategy(),
            revision in revision_strategy(),
        ) {
            let local = LocalVersion::new("20251015", &toolkit, &framework, abi, revision);
            prop_assert!(is_valid_local_segment(&local.to_string()));
        }
    }
}
