//! Cleanup executor: removes configured subdirectories from installed packages.
//!
//! Per package, at most once per executor (packages are tracked by their
//! configured key, so case variants of one name count as the same package):
//! 1. skip (with an info event) if the package was already handled;
//! 2. mark it handled before touching the filesystem;
//! 3. refuse package names that would leave the vendor root, then skip
//!    silently if `vendor_root/<package>` is not a directory;
//! 4. for each configured path, remove the directory if present, otherwise
//!    note that it does not exist;
//! 5. emit a blank separator.
//!
//! Filesystem failures never propagate: they become `RemovalFailed` events and
//! entries in the [`CleanupReport`], and the run moves on.

#![allow(missing_docs)]

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::cleanup::resolver::ConfigResolver;
use crate::core::errors::{CleanupError, Result};
use crate::core::paths::is_contained_relative;
use crate::logger::{CleanupEvent, EventSink};

/// Knobs for the executor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// Report what would be removed without removing it.
    pub dry_run: bool,
}

/// One directory that could not be removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemovalFailure {
    pub package: String,
    pub path: String,
    pub error_code: String,
    pub error: String,
}

/// Running totals for one executor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanupReport {
    pub dry_run: bool,
    /// Packages whose directory existed and whose paths were processed.
    pub packages_cleaned: usize,
    /// Requests for packages already handled earlier in the run.
    pub packages_already_cleaned: usize,
    /// Configured packages with no directory under the vendor root.
    pub packages_absent: usize,
    /// Directories removed (or, in a dry run, that would have been).
    pub directories_removed: usize,
    pub paths_missing: usize,
    pub paths_rejected: usize,
    pub failures: Vec<RemovalFailure>,
}

impl CleanupReport {
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty() || self.paths_rejected > 0
    }
}

/// Removes configured paths from package directories under a vendor root.
///
/// The set of handled packages lives on the executor, so two executors are
/// two independent runs.
pub struct CleanupExecutor<S: EventSink> {
    resolver: ConfigResolver,
    sink: S,
    config: ExecutorConfig,
    cleaned: HashSet<String>,
    report: CleanupReport,
}

impl<S: EventSink> CleanupExecutor<S> {
    pub fn new(resolver: ConfigResolver, sink: S, config: ExecutorConfig) -> Self {
        Self {
            resolver,
            sink,
            config,
            cleaned: HashSet::new(),
            report: CleanupReport {
                dry_run: config.dry_run,
                ..CleanupReport::default()
            },
        }
    }

    /// Clean every package in the merged configuration.
    pub fn clean_all(&mut self, vendor_root: &Path) {
        if self.resolver.is_unconfigured() {
            self.sink.emit(&CleanupEvent::Unconfigured);
            return;
        }
        let keys: Vec<String> = self.resolver.all_cleanup_paths().keys().cloned().collect();
        for key in keys {
            self.sanitize(vendor_root, &key, &key);
        }
    }

    /// Clean one package, if it has configured paths.
    ///
    /// `package` names the installed directory; the configuration entry it
    /// resolves to (possibly differing in case) is what is marked as handled.
    pub fn clean_package(&mut self, vendor_root: &Path, package: &str) {
        let Some(key) = self.resolver.resolve_key(package).map(str::to_string) else {
            return;
        };
        if self.resolver.all_cleanup_paths().get(&key).is_none_or(Vec::is_empty) {
            return;
        }
        self.sanitize(vendor_root, &key, package);
    }

    /// Whether `package`, or the configuration entry it resolves to, has been
    /// handled during this run.
    pub fn is_cleaned(&self, package: &str) -> bool {
        self.resolver
            .resolve_key(package)
            .is_some_and(|key| self.cleaned.contains(key))
            || self.cleaned.contains(package)
    }

    pub fn report(&self) -> &CleanupReport {
        &self.report
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consume the executor, returning the sink and the final report.
    pub fn finish(self) -> (S, CleanupReport) {
        (self.sink, self.report)
    }

    /// `key` is the configuration entry; `package` is the installed name.
    fn sanitize(&mut self, vendor_root: &Path, key: &str, package: &str) {
        if self.cleaned.contains(key) {
            self.report.packages_already_cleaned += 1;
            self.sink.emit(&CleanupEvent::AlreadyCleaned {
                package: package.to_string(),
            });
            return;
        }
        self.cleaned.insert(key.to_string());

        let dir = match package_dir(vendor_root, package) {
            Ok(dir) => dir,
            Err(e) => {
                self.reject(&e);
                return;
            }
        };
        if !dir.is_dir() {
            // Not installed here, e.g. a platform-specific dependency.
            self.report.packages_absent += 1;
            return;
        }

        self.report.packages_cleaned += 1;
        self.sink.emit(&CleanupEvent::PackageStarted {
            package: package.to_string(),
        });

        let paths = self
            .resolver
            .all_cleanup_paths()
            .get(key)
            .cloned()
            .unwrap_or_default();
        for path in &paths {
            self.clean_path(&dir, package, path);
        }

        self.sink.emit(&CleanupEvent::PackageFinished {
            package: package.to_string(),
        });
    }

    fn reject(&mut self, err: &CleanupError) {
        if let CleanupError::UnsafePath { package, path } = err {
            self.report.paths_rejected += 1;
            self.sink.emit(&CleanupEvent::PathRejected {
                package: package.clone(),
                path: path.clone(),
            });
        }
    }

    fn clean_path(&mut self, package_dir: &Path, package: &str, path: &str) {
        let target = match contained_join(package_dir, package, path) {
            Ok(target) => target,
            Err(e) => {
                self.reject(&e);
                return;
            }
        };
        if !target.is_dir() {
            // Changed upstream, or a --prefer-dist archive without it.
            self.report.paths_missing += 1;
            self.sink.emit(&CleanupEvent::PathMissing {
                package: package.to_string(),
                target: target.display().to_string(),
            });
            return;
        }

        if self.config.dry_run {
            self.report.directories_removed += 1;
            self.sink.emit(&CleanupEvent::WouldRemove {
                package: package.to_string(),
                path: path.to_string(),
            });
            return;
        }

        match remove_tree(&target) {
            Ok(()) => {
                self.report.directories_removed += 1;
                self.sink.emit(&CleanupEvent::DirectoryRemoved {
                    package: package.to_string(),
                    path: path.to_string(),
                });
            }
            Err(e) => {
                let failure = RemovalFailure {
                    package: package.to_string(),
                    path: path.to_string(),
                    error_code: e.code().to_string(),
                    error: e.to_string(),
                };
                self.sink.emit(&CleanupEvent::RemovalFailed {
                    package: failure.package.clone(),
                    path: failure.path.clone(),
                    error_code: failure.error_code.clone(),
                    error: failure.error.clone(),
                });
                self.report.failures.push(failure);
            }
        }
    }
}

/// Recursively remove `path`. A symlink is unlinked, never followed.
fn remove_tree(path: &Path) -> Result<()> {
    let meta = fs::symlink_metadata(path).map_err(|e| CleanupError::io(path, e))?;
    if meta.file_type().is_symlink() {
        fs::remove_file(path)
            .or_else(|_| fs::remove_dir(path))
            .map_err(|e| CleanupError::io(path, e))?;
    } else {
        fs::remove_dir_all(path).map_err(|e| CleanupError::io(path, e))?;
    }

    if fs::symlink_metadata(path).is_ok() {
        return Err(CleanupError::Runtime {
            details: format!("path still exists after removal: {}", path.display()),
        });
    }
    Ok(())
}

/// Directory a package is installed in.
///
/// The name must be a relative path that stays below `vendor_root`; an
/// absolute or `..`-climbing name is refused with [`CleanupError::UnsafePath`].
pub fn package_dir(vendor_root: &Path, package: &str) -> Result<PathBuf> {
    contained_join(vendor_root, package, package)
}

fn contained_join(base: &Path, package: &str, rel: &str) -> Result<PathBuf> {
    if !is_contained_relative(rel) {
        return Err(CleanupError::UnsafePath {
            package: package.to_string(),
            path: rel.to_string(),
        });
    }
    Ok(base.join(rel))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::UserCleanupTable;
    use crate::core::defaults::DefaultTable;
    use crate::logger::MemorySink;

    const NO_DEFAULTS: DefaultTable = &[];

    fn table(entries: &[(&str, &[&str])]) -> UserCleanupTable {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.iter().map(|p| (*p).to_string()).collect()))
            .collect()
    }

    fn executor(entries: &[(&str, &[&str])]) -> CleanupExecutor<MemorySink> {
        CleanupExecutor::new(
            ConfigResolver::with_defaults(NO_DEFAULTS, table(entries)),
            MemorySink::new(),
            ExecutorConfig::default(),
        )
    }

    fn make_dirs(root: &Path, rels: &[&str]) {
        for rel in rels {
            fs::create_dir_all(root.join(rel)).unwrap();
            fs::write(root.join(rel).join("keep.txt"), "x").unwrap();
        }
    }

    #[test]
    fn removes_listed_dirs_and_notes_missing_ones() {
        let vendor = tempfile::tempdir().unwrap();
        make_dirs(
            vendor.path(),
            &["example/pkg/tests", "example/pkg/docs", "example/pkg/src"],
        );

        let mut exec = executor(&[("example/pkg", &["tests", "docs", "missing"])]);
        exec.clean_package(vendor.path(), "example/pkg");

        let pkg = vendor.path().join("example/pkg");
        assert!(!pkg.join("tests").exists());
        assert!(!pkg.join("docs").exists());
        assert!(pkg.join("src").exists(), "unlisted dirs survive");

        let sink = exec.sink();
        let removed: Vec<&CleanupEvent> = sink.of_kind("directory_removed").collect();
        assert_eq!(removed.len(), 2);
        assert_eq!(sink.of_kind("path_missing").count(), 1);
        assert_eq!(sink.of_kind("removal_failed").count(), 0);
        assert_eq!(
            sink.events().last(),
            Some(&CleanupEvent::PackageFinished {
                package: "example/pkg".to_string()
            })
        );

        let report = exec.report();
        assert_eq!(report.directories_removed, 2);
        assert_eq!(report.paths_missing, 1);
        assert!(!report.has_failures());
    }

    #[test]
    fn second_call_is_a_no_op() {
        let vendor = tempfile::tempdir().unwrap();
        make_dirs(vendor.path(), &["example/pkg/tests"]);

        let mut exec = executor(&[("example/pkg", &["tests"])]);
        exec.clean_package(vendor.path(), "example/pkg");
        assert!(exec.is_cleaned("example/pkg"));

        // Recreate the directory: a second pass must not touch it.
        make_dirs(vendor.path(), &["example/pkg/tests"]);
        exec.sink_mut().clear();
        exec.clean_package(vendor.path(), "example/pkg");

        assert!(vendor.path().join("example/pkg/tests").exists());
        assert_eq!(
            exec.sink().events(),
            &[CleanupEvent::AlreadyCleaned {
                package: "example/pkg".to_string()
            }]
        );
        assert_eq!(exec.report().packages_already_cleaned, 1);
    }

    #[test]
    fn case_variant_request_is_resolved() {
        let vendor = tempfile::tempdir().unwrap();
        make_dirs(vendor.path(), &["mikey179/vfsstream/src/test"]);

        let mut exec = CleanupExecutor::new(
            ConfigResolver::new(UserCleanupTable::new()),
            MemorySink::new(),
            ExecutorConfig::default(),
        );
        exec.clean_package(vendor.path(), "mikey179/vfsstream");

        assert!(!vendor.path().join("mikey179/vfsstream/src/test").exists());
        assert!(vendor.path().join("mikey179/vfsstream/src").exists());
    }

    #[test]
    fn absent_package_dir_is_silent_but_marked() {
        let vendor = tempfile::tempdir().unwrap();
        let mut exec = executor(&[("example/pkg", &["tests"])]);
        exec.clean_package(vendor.path(), "example/pkg");

        assert!(exec.sink().events().is_empty());
        assert!(exec.is_cleaned("example/pkg"));
        assert_eq!(exec.report().packages_absent, 1);
    }

    #[test]
    fn unconfigured_package_is_untouched() {
        let vendor = tempfile::tempdir().unwrap();
        make_dirs(vendor.path(), &["other/pkg/tests"]);

        let mut exec = executor(&[("example/pkg", &["tests"])]);
        exec.clean_package(vendor.path(), "other/pkg");

        assert!(vendor.path().join("other/pkg/tests").exists());
        assert!(!exec.is_cleaned("other/pkg"));
        assert!(exec.sink().events().is_empty());
    }

    #[test]
    fn files_are_not_directories() {
        let vendor = tempfile::tempdir().unwrap();
        make_dirs(vendor.path(), &["example/pkg"]);
        let file = vendor.path().join("example/pkg/tests");
        fs::write(&file, "not a dir").unwrap();

        let mut exec = executor(&[("example/pkg", &["tests"])]);
        exec.clean_package(vendor.path(), "example/pkg");

        assert!(file.exists());
        assert_eq!(exec.sink().of_kind("path_missing").count(), 1);
    }

    #[test]
    fn escaping_paths_are_rejected() {
        let vendor = tempfile::tempdir().unwrap();
        make_dirs(vendor.path(), &["example/pkg/tests", "example/sibling"]);

        let mut exec = executor(&[("example/pkg", &["../sibling", "", "tests"])]);
        exec.clean_package(vendor.path(), "example/pkg");

        assert!(vendor.path().join("example/sibling").exists());
        assert!(vendor.path().join("example/pkg").exists());
        assert!(!vendor.path().join("example/pkg/tests").exists());
        assert_eq!(exec.sink().of_kind("path_rejected").count(), 2);
        assert!(exec.report().has_failures());
    }

    #[test]
    fn escaping_package_names_are_rejected() {
        let root = tempfile::tempdir().unwrap();
        let vendor = root.path().join("vendor");
        let outside = root.path().join("outside");
        make_dirs(&vendor, &["example/pkg"]);
        make_dirs(&outside, &["tests"]);

        let absolute = outside.to_string_lossy().to_string();
        let mut exec = executor(&[
            (absolute.as_str(), &["tests"]),
            ("../outside", &["tests"]),
        ]);
        exec.clean_all(&vendor);

        assert!(outside.join("tests").exists());
        assert_eq!(exec.sink().of_kind("path_rejected").count(), 2);
        assert!(
            exec.sink()
                .of_kind("path_rejected")
                .all(|e| e.package().is_some_and(|p| p == absolute || p == "../outside"))
        );
        assert_eq!(exec.report().paths_rejected, 2);
        assert_eq!(exec.report().packages_cleaned, 0);
        assert!(exec.report().has_failures());
    }

    #[test]
    fn case_variant_then_clean_all_cleans_once() {
        let vendor = tempfile::tempdir().unwrap();
        make_dirs(vendor.path(), &["mikey179/vfsstream/src/test"]);

        let mut exec = CleanupExecutor::new(
            ConfigResolver::new(UserCleanupTable::new()),
            MemorySink::new(),
            ExecutorConfig::default(),
        );
        exec.clean_package(vendor.path(), "mikey179/vfsstream");
        assert!(exec.is_cleaned("mikey179/vfsStream"));
        assert!(exec.is_cleaned("mikey179/vfsstream"));

        exec.clean_all(vendor.path());

        let report = exec.report();
        assert_eq!(report.packages_already_cleaned, 1);
        assert_eq!(report.packages_cleaned, 1);
        assert_eq!(report.directories_removed, 1);
        assert_eq!(
            exec.sink()
                .of_kind("already_cleaned")
                .filter_map(CleanupEvent::package)
                .collect::<Vec<_>>(),
            vec!["mikey179/vfsStream"]
        );
    }

    #[test]
    fn dry_run_keeps_directories() {
        let vendor = tempfile::tempdir().unwrap();
        make_dirs(vendor.path(), &["example/pkg/tests"]);

        let mut exec = CleanupExecutor::new(
            ConfigResolver::with_defaults(NO_DEFAULTS, table(&[("example/pkg", &["tests"])])),
            MemorySink::new(),
            ExecutorConfig { dry_run: true },
        );
        exec.clean_package(vendor.path(), "example/pkg");

        assert!(vendor.path().join("example/pkg/tests").exists());
        assert_eq!(exec.sink().of_kind("would_remove").count(), 1);
        let (_, report) = exec.finish();
        assert!(report.dry_run);
        assert_eq!(report.directories_removed, 1);
    }

    #[test]
    fn duplicate_paths_are_harmless() {
        let vendor = tempfile::tempdir().unwrap();
        make_dirs(vendor.path(), &["example/pkg/tests"]);

        let mut exec = executor(&[("example/pkg", &["tests", "tests"])]);
        exec.clean_package(vendor.path(), "example/pkg");

        assert_eq!(exec.sink().of_kind("directory_removed").count(), 1);
        assert_eq!(exec.sink().of_kind("path_missing").count(), 1);
        assert!(!exec.report().has_failures());
    }

    #[test]
    fn clean_all_visits_every_configured_package() {
        let vendor = tempfile::tempdir().unwrap();
        make_dirs(vendor.path(), &["a/one/tests", "b/two/docs"]);

        let mut exec = executor(&[("a/one", &["tests"]), ("b/two", &["docs"]), ("c/absent", &["x"])]);
        exec.clean_all(vendor.path());

        assert!(!vendor.path().join("a/one/tests").exists());
        assert!(!vendor.path().join("b/two/docs").exists());
        let report = exec.report();
        assert_eq!(report.packages_cleaned, 2);
        assert_eq!(report.packages_absent, 1);

        // A later per-package event for the same run is deduplicated.
        exec.clean_package(vendor.path(), "a/one");
        assert_eq!(exec.report().packages_already_cleaned, 1);
    }

    #[test]
    fn clean_all_with_nothing_configured_says_so() {
        let vendor = tempfile::tempdir().unwrap();
        let mut exec = executor(&[]);
        exec.clean_all(vendor.path());
        assert_eq!(exec.sink().events(), &[CleanupEvent::Unconfigured]);
    }

    #[test]
    fn separate_executors_do_not_share_state() {
        let vendor = tempfile::tempdir().unwrap();
        make_dirs(vendor.path(), &["example/pkg/tests"]);

        let mut first = executor(&[("example/pkg", &["tests"])]);
        first.clean_package(vendor.path(), "example/pkg");

        make_dirs(vendor.path(), &["example/pkg/tests"]);
        let mut second = executor(&[("example/pkg", &["tests"])]);
        second.clean_package(vendor.path(), "example/pkg");

        assert!(!vendor.path().join("example/pkg/tests").exists());
        assert_eq!(second.report().directories_removed, 1);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_dir_is_unlinked_not_followed() {
        let vendor = tempfile::tempdir().unwrap();
        let outside = tempfile::tempdir().unwrap();
        fs::write(outside.path().join("precious.txt"), "keep").unwrap();
        make_dirs(vendor.path(), &["example/pkg"]);
        std::os::unix::fs::symlink(outside.path(), vendor.path().join("example/pkg/docs")).unwrap();

        let mut exec = executor(&[("example/pkg", &["docs"])]);
        exec.clean_package(vendor.path(), "example/pkg");

        assert!(fs::symlink_metadata(vendor.path().join("example/pkg/docs")).is_err());
        assert!(outside.path().join("precious.txt").exists());
        assert_eq!(exec.report().directories_removed, 1);
    }

    #[test]
    fn package_dir_joins_vendor_and_name() {
        assert_eq!(
            package_dir(Path::new("/srv/vendor"), "acme/widget").unwrap(),
            Path::new("/srv/vendor/acme/widget")
        );
        for name in ["/srv/other", "../outside", "acme/../../outside", ""] {
            let err = package_dir(Path::new("/srv/vendor"), name).unwrap_err();
            assert_eq!(err.code(), "VC-2001", "{name}");
        }
    }
}
