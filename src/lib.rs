#![forbid(unsafe_code)]

//! Vendor Cleanup prunes test suites, docs and demos from installed
//! Composer packages.
//!
//! Two pieces do the work:
//! 1. [`cleanup::resolver::ConfigResolver`] merges the built-in cleanup table
//!    with the root project's `extra."drupal-core-vendor-cleanup"` table.
//! 2. [`cleanup::executor::CleanupExecutor`] removes the configured
//!    directories from each package, at most once per package per run.
//!
//! # Library usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use vendor_cleanup::prelude::*;
//!
//! # fn main() -> vendor_cleanup::core::errors::Result<()> {
//! let project = ProjectContext::load(Path::new("."), None)?;
//! let resolver = ConfigResolver::new(project.root.cleanup_table()?);
//! let mut executor = CleanupExecutor::new(resolver, MemorySink::new(), ExecutorConfig::default());
//! executor.clean_all(&project.vendor_dir);
//! println!("{} directories removed", executor.report().directories_removed);
//! # Ok(())
//! # }
//! ```

pub mod prelude;

pub mod cleanup;
pub mod core;
pub mod logger;
