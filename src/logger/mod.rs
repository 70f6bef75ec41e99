//! Cleanup event model and the sinks that render it.
//!
//! The executor emits one [`CleanupEvent`] per outcome. Each event carries a
//! fixed [`Level`]; sinks decide what to show:
//! - [`console::ConsoleSink`] filters by level and renders colored text;
//! - [`jsonl::JsonlWriter`] appends every event as one JSON line;
//! - [`MemorySink`] keeps events in memory for callers that inspect them.
//!
//! Levels per event (see [`CleanupEvent::level`]):
//!
//! | Level | Events |
//! |---|---|
//! | error | `RemovalFailed`, `PathRejected` |
//! | normal | `Unconfigured`, `WouldRemove` |
//! | verbose | `AlreadyCleaned`, `PackageStarted`, `DirectoryRemoved`, `PackageFinished` |
//! | very verbose | `PathMissing` |
//!
//! `AlreadyCleaned` is informational and sits with the per-package progress
//! lines at verbose, so lifecycle hooks that overlap stay silent by default.

#![allow(missing_docs)]

pub mod console;
pub mod jsonl;

use serde::{Deserialize, Serialize};

/// How loud an event is. Ordered from always-visible to trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    /// Shown even in quiet mode.
    Error,
    Normal,
    Verbose,
    VeryVerbose,
}

impl Level {
    /// Map a `-v` count (and `-q`) to the most verbose level shown.
    #[must_use]
    pub const fn from_flags(verbose: u8, quiet: bool) -> Self {
        if quiet {
            return Self::Error;
        }
        match verbose {
            0 => Self::Normal,
            1 => Self::Verbose,
            _ => Self::VeryVerbose,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Normal => "normal",
            Self::Verbose => "verbose",
            Self::VeryVerbose => "very_verbose",
        }
    }
}

/// Something that happened during a cleanup run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CleanupEvent {
    /// Nothing is configured at all; the run does nothing.
    Unconfigured,
    /// The package was already handled earlier in this run.
    AlreadyCleaned { package: String },
    /// Cleanup of an installed package begins.
    PackageStarted { package: String },
    DirectoryRemoved { package: String, path: String },
    /// Dry run: the directory exists and would have been removed.
    WouldRemove { package: String, path: String },
    RemovalFailed {
        package: String,
        path: String,
        error_code: String,
        error: String,
    },
    /// `target` is the full path that was looked for.
    PathMissing { package: String, target: String },
    /// The configured path would leave the package directory.
    PathRejected { package: String, path: String },
    /// Blank separator after a package's paths.
    PackageFinished { package: String },
}

impl CleanupEvent {
    /// Display level of this event.
    #[must_use]
    pub const fn level(&self) -> Level {
        match self {
            Self::RemovalFailed { .. } | Self::PathRejected { .. } => Level::Error,
            Self::Unconfigured | Self::WouldRemove { .. } => Level::Normal,
            Self::AlreadyCleaned { .. }
            | Self::PackageStarted { .. }
            | Self::DirectoryRemoved { .. }
            | Self::PackageFinished { .. } => Level::Verbose,
            Self::PathMissing { .. } => Level::VeryVerbose,
        }
    }

    /// Stable snake_case event name, as serialized.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Unconfigured => "unconfigured",
            Self::AlreadyCleaned { .. } => "already_cleaned",
            Self::PackageStarted { .. } => "package_started",
            Self::DirectoryRemoved { .. } => "directory_removed",
            Self::WouldRemove { .. } => "would_remove",
            Self::RemovalFailed { .. } => "removal_failed",
            Self::PathMissing { .. } => "path_missing",
            Self::PathRejected { .. } => "path_rejected",
            Self::PackageFinished { .. } => "package_finished",
        }
    }

    /// Package the event is about, if any.
    #[must_use]
    pub fn package(&self) -> Option<&str> {
        match self {
            Self::Unconfigured => None,
            Self::AlreadyCleaned { package }
            | Self::PackageStarted { package }
            | Self::DirectoryRemoved { package, .. }
            | Self::WouldRemove { package, .. }
            | Self::RemovalFailed { package, .. }
            | Self::PathMissing { package, .. }
            | Self::PathRejected { package, .. }
            | Self::PackageFinished { package } => Some(package),
        }
    }

    /// Plain-text rendering without styling.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Unconfigured => "No packages are configured for cleanup.".to_string(),
            Self::AlreadyCleaned { package } => {
                format!("Package {package} was already sanitized during this run.")
            }
            Self::PackageStarted { package } => format!("Package cleanup for {package}"),
            Self::DirectoryRemoved { path, .. } => format!("Removing directory '{path}'"),
            Self::WouldRemove { package, path } => {
                format!("Would remove directory '{path}' in package {package}")
            }
            Self::RemovalFailed {
                package,
                path,
                error,
                ..
            } => format!("Failure removing directory '{path}' in package {package}: {error}"),
            Self::PathMissing { target, .. } => format!("Directory '{target}' does not exist."),
            Self::PathRejected { package, path } => {
                format!("Refusing unsafe path '{path}' for package {package}.")
            }
            Self::PackageFinished { .. } => String::new(),
        }
    }
}

/// Receiver of cleanup events.
pub trait EventSink {
    fn emit(&mut self, event: &CleanupEvent);
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    fn emit(&mut self, event: &CleanupEvent) {
        (**self).emit(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn emit(&mut self, event: &CleanupEvent) {
        (**self).emit(event);
    }
}

impl<S: EventSink> EventSink for Option<S> {
    fn emit(&mut self, event: &CleanupEvent) {
        if let Some(sink) = self {
            sink.emit(event);
        }
    }
}

/// Fan out to two sinks.
impl<A: EventSink, B: EventSink> EventSink for (A, B) {
    fn emit(&mut self, event: &CleanupEvent) {
        self.0.emit(event);
        self.1.emit(event);
    }
}

/// Collects events in order.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    events: Vec<CleanupEvent>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> &[CleanupEvent] {
        &self.events
    }

    /// Events of one kind, in emission order.
    pub fn of_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a CleanupEvent> + 'a {
        self.events.iter().filter(move |e| e.kind() == kind)
    }

    /// Events visible at `max` verbosity.
    pub fn visible_at(&self, max: Level) -> impl Iterator<Item = &CleanupEvent> + '_ {
        self.events.iter().filter(move |e| e.level() <= max)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for MemorySink {
    fn emit(&mut self, event: &CleanupEvent) {
        self.events.push(event.clone());
    }
}
