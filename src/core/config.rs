//! Root project configuration: `composer.json` + env var overrides + defaults.
//!
//! Two things are read from the root manifest:
//! - `extra."drupal-core-vendor-cleanup"`, the user cleanup table;
//! - `config."vendor-dir"`, where installed packages live.

#![allow(missing_docs)]

use std::collections::BTreeMap;
use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::core::errors::{CleanupError, Result};
use crate::core::paths::resolve_against;

/// Key under the manifest's `extra` section holding the user cleanup table.
pub const CLEANUP_EXTRA_KEY: &str = "drupal-core-vendor-cleanup";

/// Manifest file name when `COMPOSER` is not set.
pub const DEFAULT_MANIFEST: &str = "composer.json";

/// Vendor directory when neither the manifest nor the environment names one.
pub const DEFAULT_VENDOR_DIR: &str = "vendor";

/// Environment variable naming an alternative manifest file.
pub const MANIFEST_ENV: &str = "COMPOSER";

/// Environment variable overriding the vendor directory.
pub const VENDOR_DIR_ENV: &str = "COMPOSER_VENDOR_DIR";

/// User cleanup table after normalization: every value is a list of paths.
pub type UserCleanupTable = BTreeMap<String, Vec<String>>;

/// The subset of the root package manifest this tool cares about.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct RootPackage {
    pub name: Option<String>,
    pub extra: Map<String, Value>,
    pub config: Map<String, Value>,
}

/// A user-supplied path entry: either one path or a list of them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PathSpec {
    One(String),
    Many(Vec<String>),
}

impl From<PathSpec> for Vec<String> {
    fn from(spec: PathSpec) -> Self {
        match spec {
            PathSpec::One(path) => vec![path],
            PathSpec::Many(paths) => paths,
        }
    }
}

impl RootPackage {
    /// Read and parse the manifest at `path`.
    ///
    /// A missing manifest is an error: without it there is no project to clean.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(CleanupError::MissingConfig {
                path: path.to_path_buf(),
            });
        }
        let raw = fs::read_to_string(path).map_err(|source| CleanupError::io(path, source))?;
        Self::from_json_str(&raw)
    }

    /// Parse manifest JSON.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| CleanupError::ConfigParse {
            context: "composer.json",
            details: e.to_string(),
        })
    }

    /// The user cleanup table, with scalar values normalized to one-element lists.
    ///
    /// An absent (or `null`) section yields an empty table. Values that are
    /// neither a string nor a list of strings are rejected.
    pub fn cleanup_table(&self) -> Result<UserCleanupTable> {
        let section = match self.extra.get(CLEANUP_EXTRA_KEY) {
            None | Some(Value::Null) => return Ok(UserCleanupTable::new()),
            Some(Value::Object(section)) => section,
            Some(other) => {
                return Err(CleanupError::InvalidConfig {
                    details: format!(
                        "extra.{CLEANUP_EXTRA_KEY} must be a mapping of package names, found {}",
                        json_kind(other)
                    ),
                });
            }
        };

        let mut table = UserCleanupTable::new();
        for (package, value) in section {
            let spec = PathSpec::deserialize(value).map_err(|_| CleanupError::InvalidConfig {
                details: format!(
                    "extra.{CLEANUP_EXTRA_KEY}.\"{package}\" must be a path string or a list of \
                     path strings, found {}",
                    json_kind(value)
                ),
            })?;
            table.insert(package.clone(), spec.into());
        }
        Ok(table)
    }

    /// `config."vendor-dir"` from the manifest, if set to a non-empty string.
    pub fn vendor_dir(&self) -> Option<&str> {
        self.config
            .get("vendor-dir")
            .and_then(Value::as_str)
            .filter(|dir| !dir.is_empty())
    }
}

/// Everything a cleanup run needs to know about the project on disk.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    pub project_dir: PathBuf,
    pub manifest_path: PathBuf,
    pub root: RootPackage,
    pub vendor_dir: PathBuf,
}

impl ProjectContext {
    /// Load the project rooted at `project_dir`, honoring `COMPOSER` and
    /// `COMPOSER_VENDOR_DIR`. `vendor_override` (a CLI flag) wins over both.
    pub fn load(project_dir: &Path, vendor_override: Option<&Path>) -> Result<Self> {
        Self::load_with_env(
            project_dir,
            vendor_override,
            env::var_os(MANIFEST_ENV),
            env::var_os(VENDOR_DIR_ENV),
        )
    }

    /// [`Self::load`] with the environment supplied explicitly.
    pub fn load_with_env(
        project_dir: &Path,
        vendor_override: Option<&Path>,
        manifest_env: Option<OsString>,
        vendor_env: Option<OsString>,
    ) -> Result<Self> {
        let manifest_path = manifest_path(project_dir, manifest_env);
        let root = RootPackage::load(&manifest_path)?;
        let vendor_dir = resolve_vendor_dir(project_dir, vendor_override, vendor_env, &root);
        Ok(Self {
            project_dir: project_dir.to_path_buf(),
            manifest_path,
            root,
            vendor_dir,
        })
    }
}

/// Manifest location: `$COMPOSER` (relative to the project) or `composer.json`.
pub fn manifest_path(project_dir: &Path, manifest_env: Option<OsString>) -> PathBuf {
    let name = manifest_env
        .filter(|value| !value.is_empty())
        .map_or_else(|| PathBuf::from(DEFAULT_MANIFEST), PathBuf::from);
    resolve_against(project_dir, &name)
}

/// Vendor directory, highest priority first: explicit override, environment,
/// manifest `config."vendor-dir"`, then `vendor`.
pub fn resolve_vendor_dir(
    project_dir: &Path,
    vendor_override: Option<&Path>,
    vendor_env: Option<OsString>,
    root: &RootPackage,
) -> PathBuf {
    let chosen = vendor_override
        .map(Path::to_path_buf)
        .or_else(|| vendor_env.filter(|v| !v.is_empty()).map(PathBuf::from))
        .or_else(|| root.vendor_dir().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_VENDOR_DIR));
    resolve_against(project_dir, &chosen)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list containing non-string values",
        Value::Object(_) => "a mapping",
    }
}
