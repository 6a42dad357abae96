//! Test utilities for property-based testing
//!
//! This module provides generators and helpers for proptest.

#[cfg(test)]
pub mod generators {
    use proptest::prelude::*;

    /// Generate a dotted version string like "12.8" or "2.8.0"
    pub fn dotted_version() -> impl Strategy<Value = String> {
        proptest::collection::vec(0u32..100, 1..4).prop_map(|parts| {
            parts
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(".")
        })
    }

    /// Generate a short revision hash (6 hex characters)
    pub fn short_revision() -> impl Strategy<Value = String> {
        "[0-9a-f]{6}"
    }

    /// Generate an 8-digit build date
    pub fn build_date() -> impl Strategy<Value = String> {
        (2020u32..2100, 1u32..13, 1u32..29)
            .prop_map(|(year, month, day)| format!("{year}{month:02}{day:02}"))
    }

    /// Generate an escaped wheel distribution name
    pub fn distribution_name() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9_]{0,20}".prop_filter("Name must not be empty", |s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::generators::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn test_dotted_version_generator(version in dotted_version()) {
            prop_assert!(version.split('.').all(|part| part.parse::<u32>().is_ok()));
        }

        #[test]
        fn test_short_revision_generator(revision in short_revision()) {
            prop_assert_eq!(revision.len(), 6);
            prop_assert!(revision.chars().all(|c| c.is_ascii_hexdigit()));
        }

        #[test]
        fn test_build_date_generator(date in build_date()) {
            prop_assert_eq!(date.len(), 8);
            prop_assert!(date.chars().all(|c| c.is_ascii_digit()));
        }
    }
}
