//! Human-readable console output with a verbosity threshold.

#![allow(missing_docs)]

use std::io::{self, Write};

use colored::Colorize;

use super::{CleanupEvent, EventSink, Level};

/// Writes events at or below `max_level` to `out`, one line each.
///
/// Write errors are swallowed: losing console output must never stop a
/// cleanup run.
pub struct ConsoleSink<W: Write> {
    out: W,
    max_level: Level,
    color: bool,
}

impl ConsoleSink<io::Stdout> {
    /// Console sink on stdout.
    #[must_use]
    pub fn stdout(max_level: Level, color: bool) -> Self {
        Self::new(io::stdout(), max_level, color)
    }
}

impl ConsoleSink<io::Stderr> {
    /// Console sink on stderr, used when stdout carries machine output.
    #[must_use]
    pub fn stderr(max_level: Level, color: bool) -> Self {
        Self::new(io::stderr(), max_level, color)
    }
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W, max_level: Level, color: bool) -> Self {
        Self {
            out,
            max_level,
            color,
        }
    }

    /// Recover the writer, e.g. to inspect a buffer in tests.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn render(&self, event: &CleanupEvent) -> String {
        let indent = match event {
            CleanupEvent::Unconfigured | CleanupEvent::PackageFinished { .. } => "",
            CleanupEvent::AlreadyCleaned { .. } | CleanupEvent::PackageStarted { .. } => "    ",
            _ => "      ",
        };
        if !self.color {
            return format!("{indent}{}", event.message());
        }

        let styled = match event {
            CleanupEvent::PackageStarted { package } => {
                format!("Package cleanup for {}", package.yellow())
            }
            CleanupEvent::AlreadyCleaned { package } => format!(
                "Package {} was already sanitized during this run.",
                package.yellow()
            ),
            CleanupEvent::DirectoryRemoved { .. } | CleanupEvent::WouldRemove { .. } => {
                event.message().green().to_string()
            }
            CleanupEvent::RemovalFailed {
                package,
                path,
                error,
                ..
            } => format!(
                "{} in package {}: {error}",
                format!("Failure removing directory '{path}'").red().bold(),
                package.yellow()
            ),
            CleanupEvent::PathRejected { .. } => event.message().red().bold().to_string(),
            CleanupEvent::PathMissing { .. } => event.message().yellow().to_string(),
            CleanupEvent::Unconfigured | CleanupEvent::PackageFinished { .. } => event.message(),
        };
        format!("{indent}{styled}")
    }
}

impl<W: Write> EventSink for ConsoleSink<W> {
    fn emit(&mut self, event: &CleanupEvent) {
        if event.level() > self.max_level {
            return;
        }
        let line = self.render(event);
        let _ = writeln!(self.out, "{line}");
    }
}
