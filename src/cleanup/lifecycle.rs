//! Composer lifecycle events and how each one drives the executor.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::cleanup::executor::CleanupExecutor;
use crate::core::errors::CleanupError;
use crate::logger::EventSink;

/// Script events the tool is hooked into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    /// A single package was installed.
    PostPackageInstall,
    /// A single package was updated.
    PostPackageUpdate,
    /// `composer install` finished.
    PostInstallCmd,
    /// `composer update` finished.
    PostUpdateCmd,
}

impl LifecycleEvent {
    /// Every event, in lifecycle order.
    pub const ALL: [Self; 4] = [
        Self::PostPackageInstall,
        Self::PostPackageUpdate,
        Self::PostInstallCmd,
        Self::PostUpdateCmd,
    ];

    /// Composer's name for the event.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PostPackageInstall => "post-package-install",
            Self::PostPackageUpdate => "post-package-update",
            Self::PostInstallCmd => "post-install-cmd",
            Self::PostUpdateCmd => "post-update-cmd",
        }
    }

    /// Whether the event is about individual packages rather than the whole run.
    #[must_use]
    pub const fn is_per_package(self) -> bool {
        matches!(self, Self::PostPackageInstall | Self::PostPackageUpdate)
    }

    /// Drive `executor` for this event.
    ///
    /// Per-package events clean exactly the named packages; command events
    /// clean every configured package. A per-package event without names is a
    /// usage error.
    pub fn dispatch<S: EventSink>(
        self,
        executor: &mut CleanupExecutor<S>,
        vendor_root: &Path,
        packages: &[String],
    ) -> Result<(), CleanupError> {
        if self.is_per_package() {
            if packages.is_empty() {
                return Err(CleanupError::InvalidConfig {
                    details: format!("{} requires at least one package name", self.as_str()),
                });
            }
            for package in packages {
                executor.clean_package(vendor_root, package);
            }
        } else {
            executor.clean_all(vendor_root);
        }
        Ok(())
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LifecycleEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|event| event.as_str() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|e| e.as_str()).collect();
                format!("unknown event '{s}' (expected one of: {})", known.join(", "))
            })
    }
}
