//! Effective cleanup table: built-in defaults merged with the project's own.
//!
//! Merge rule, per package key:
//! - present in both: user paths first, then default paths (no de-duplication;
//!   removal is idempotent so a repeated path is harmless);
//! - present in one source: passed through unchanged.
//!
//! The merged map is built on first use and cached for the resolver's lifetime.

use std::cell::OnceCell;
use std::collections::BTreeMap;

use crate::core::config::UserCleanupTable;
use crate::core::defaults::{DEFAULT_CLEANUP, DefaultTable};

/// Package name → paths (relative to the package directory) to remove.
pub type CleanupMap = BTreeMap<String, Vec<String>>;

/// Answers "which paths should be removed from this package?".
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    defaults: DefaultTable,
    user: UserCleanupTable,
    merged: OnceCell<CleanupMap>,
}

impl ConfigResolver {
    /// Resolver over the built-in defaults and the given user table.
    #[must_use]
    pub fn new(user: UserCleanupTable) -> Self {
        Self::with_defaults(DEFAULT_CLEANUP, user)
    }

    /// Resolver over an explicit default table.
    #[must_use]
    pub fn with_defaults(defaults: DefaultTable, user: UserCleanupTable) -> Self {
        Self {
            defaults,
            user,
            merged: OnceCell::new(),
        }
    }

    /// The full merged map, built once and then reused.
    pub fn all_cleanup_paths(&self) -> &CleanupMap {
        self.merged.get_or_init(|| merge(self.defaults, &self.user))
    }

    /// Paths configured for `package`.
    ///
    /// Exact key match first; otherwise the first key equal ignoring case
    /// (Composer reports `mikey179/vfsstream` for the `mikey179/vfsStream`
    /// entry). Unknown packages get an empty list.
    pub fn paths_for_package(&self, package: &str) -> Vec<String> {
        self.resolve_key(package)
            .and_then(|key| self.all_cleanup_paths().get(key))
            .cloned()
            .unwrap_or_default()
    }

    /// The merged-map key `package` resolves to, using the same exact-then-
    /// case-insensitive rule as [`Self::paths_for_package`].
    pub fn resolve_key(&self, package: &str) -> Option<&str> {
        let map = self.all_cleanup_paths();
        if let Some((key, _)) = map.get_key_value(package) {
            return Some(key.as_str());
        }
        let wanted = package.to_lowercase();
        map.keys()
            .find(|key| key.to_lowercase() == wanted)
            .map(String::as_str)
    }

    /// True when neither defaults nor user configuration name any package.
    pub fn is_unconfigured(&self) -> bool {
        self.all_cleanup_paths().is_empty()
    }

    /// Number of packages in the merged map.
    pub fn package_count(&self) -> usize {
        self.all_cleanup_paths().len()
    }
}

fn merge(defaults: DefaultTable, user: &UserCleanupTable) -> CleanupMap {
    let mut merged = user.clone();
    for (package, paths) in defaults {
        merged
            .entry((*package).to_string())
            .or_default()
            .extend(paths.iter().map(|p| (*p).to_string()));
    }
    merged
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const TWO_PACKAGES: DefaultTable = &[("acme/pkg", &["a", "b"]), ("acme/Other", &["docs"])];
    const MIXED_CASE: DefaultTable = &[("Acme/Pkg", &["upper"])];

    fn user(entries: &[(&str, &[&str])]) -> UserCleanupTable {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.iter().map(|p| (*p).to_string()).collect()))
            .collect()
    }

    #[test]
    fn user_paths_precede_defaults() {
        let resolver = ConfigResolver::with_defaults(TWO_PACKAGES, user(&[("acme/pkg", &["c"])]));
        assert_eq!(resolver.paths_for_package("acme/pkg"), vec!["c", "a", "b"]);
    }

    #[test]
    fn duplicates_are_kept() {
        let resolver = ConfigResolver::with_defaults(TWO_PACKAGES, user(&[("acme/pkg", &["a"])]));
        assert_eq!(resolver.paths_for_package("acme/pkg"), vec!["a", "a", "b"]);
    }

    #[test]
    fn keys_from_one_source_pass_through() {
        let resolver =
            ConfigResolver::with_defaults(TWO_PACKAGES, user(&[("acme/mine", &["fixtures"])]));
        let map = resolver.all_cleanup_paths();
        assert_eq!(map.len(), 3);
        assert_eq!(map["acme/mine"], vec!["fixtures"]);
        assert_eq!(map["acme/Other"], vec!["docs"]);
    }

    #[test]
    fn lookup_falls_back_to_case_insensitive_match() {
        let resolver = ConfigResolver::new(UserCleanupTable::new());
        assert_eq!(
            resolver.paths_for_package("mikey179/vfsstream"),
            vec!["src/test"]
        );
        assert_eq!(
            resolver.paths_for_package("MIKEY179/VFSSTREAM"),
            vec!["src/test"]
        );
    }

    #[test]
    fn exact_match_wins_over_case_variant() {
        let resolver = ConfigResolver::with_defaults(MIXED_CASE, user(&[("acme/pkg", &["lower"])]));
        assert_eq!(resolver.paths_for_package("acme/pkg"), vec!["lower"]);
        assert_eq!(resolver.paths_for_package("Acme/Pkg"), vec!["upper"]);
    }

    #[test]
    fn unknown_package_is_empty() {
        let resolver = ConfigResolver::new(UserCleanupTable::new());
        assert!(resolver.paths_for_package("nobody/nothing").is_empty());
        assert!(resolver.paths_for_package("").is_empty());
    }

    #[test]
    fn unconfigured_only_when_both_sources_empty() {
        assert!(!ConfigResolver::new(UserCleanupTable::new()).is_unconfigured());
        assert!(ConfigResolver::with_defaults(&[], UserCleanupTable::new()).is_unconfigured());
        assert!(
            !ConfigResolver::with_defaults(&[], user(&[("acme/pkg", &["tests"])]))
                .is_unconfigured()
        );
    }

    #[test]
    fn keys_resolve_exactly_then_ignoring_case() {
        let resolver = ConfigResolver::with_defaults(TWO_PACKAGES, UserCleanupTable::new());
        assert_eq!(resolver.resolve_key("acme/Other"), Some("acme/Other"));
        assert_eq!(resolver.resolve_key("ACME/other"), Some("acme/Other"));
        assert_eq!(resolver.resolve_key("acme/missing"), None);
    }

    #[test]
    fn merged_map_is_built_once() {
        let resolver = ConfigResolver::new(UserCleanupTable::new());
        let first: *const CleanupMap = resolver.all_cleanup_paths();
        let second: *const CleanupMap = resolver.all_cleanup_paths();
        assert!(std::ptr::eq(first, second));
        assert_eq!(resolver.package_count(), DEFAULT_CLEANUP.len());
    }

    proptest! {
        #[test]
        fn unconfigured_names_resolve_to_nothing(name in "[a-z0-9]{1,12}/[a-z0-9-]{1,12}") {
            let resolver = ConfigResolver::with_defaults(TWO_PACKAGES, UserCleanupTable::new());
            prop_assume!(!resolver.all_cleanup_paths().keys().any(|k| k.eq_ignore_ascii_case(&name)));
            prop_assert!(resolver.paths_for_package(&name).is_empty());
        }

        #[test]
        fn any_casing_of_a_default_key_resolves(idx in 0..DEFAULT_CLEANUP.len(), flips in proptest::collection::vec(any::<bool>(), 64)) {
            let (key, paths) = DEFAULT_CLEANUP[idx];
            let mangled: String = key
                .chars()
                .zip(flips.iter().cycle())
                .map(|(c, &up)| if up { c.to_ascii_uppercase() } else { c.to_ascii_lowercase() })
                .collect();
            let resolver = ConfigResolver::new(UserCleanupTable::new());
            let expected: Vec<String> = paths.iter().map(|p| (*p).to_string()).collect();
            prop_assert_eq!(resolver.paths_for_package(&mangled), expected);
        }

        #[test]
        fn merge_is_user_then_default(user_paths in proptest::collection::vec("[a-z]{1,8}", 0..5)) {
            let table: UserCleanupTable =
                std::iter::once(("acme/pkg".to_string(), user_paths.clone())).collect();
            let resolver = ConfigResolver::with_defaults(TWO_PACKAGES, table);
            let mut expected = user_paths;
            expected.extend(["a".to_string(), "b".to_string()]);
            prop_assert_eq!(resolver.paths_for_package("acme/pkg"), expected);
        }
    }
}
