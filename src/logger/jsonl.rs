//! JSONL activity log: one self-contained JSON object per cleanup event.
//!
//! Lines are assembled in memory and written with a single `write_all`, so a
//! concurrent reader never sees half a line. If the file cannot be opened or
//! written, output degrades to stderr with a `[VC-JSONL]` prefix, then to
//! silent discard. Logging failures never abort a run.

#![allow(missing_docs)]

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{CleanupEvent, EventSink, Level};

/// A single JSONL log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// RFC 3339 UTC timestamp with milliseconds.
    pub ts: String,
    pub level: Level,
    /// Event payload, flattened (`event`, `package`, `path`, ...).
    #[serde(flatten)]
    pub event: CleanupEvent,
    /// Rendered human message.
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub message: String,
}

impl LogEntry {
    /// Stamp `event` with the current UTC time.
    pub fn new(event: &CleanupEvent) -> Self {
        Self {
            ts: format_utc_now(),
            level: event.level(),
            event: event.clone(),
            message: event.message(),
        }
    }
}

/// Degradation state of the writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriterState {
    File,
    Stderr,
    Discard,
}

/// Append-only JSONL writer.
pub struct JsonlWriter {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
    state: WriterState,
    lines_written: u64,
}

impl JsonlWriter {
    /// Open (creating parents as needed) `path` for appending.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (writer, state) = match open_append(&path) {
            Ok(file) => (Some(BufWriter::new(file)), WriterState::File),
            Err(e) => {
                let _ = writeln!(
                    io::stderr(),
                    "[VC-JSONL] cannot open {}: {e}; logging to stderr",
                    path.display()
                );
                (None, WriterState::Stderr)
            }
        };
        Self {
            path,
            writer,
            state,
            lines_written: 0,
        }
    }

    /// Write one entry as a single line.
    pub fn write_entry(&mut self, entry: &LogEntry) {
        let line = match serde_json::to_string(entry) {
            Ok(json) => format!("{json}\n"),
            Err(e) => {
                let _ = writeln!(io::stderr(), "[VC-JSONL] serialize error: {e}");
                return;
            }
        };
        self.write_line(&line);
    }

    pub fn flush(&mut self) {
        if let Some(w) = self.writer.as_mut() {
            let _ = w.flush();
        }
    }

    /// Current degradation state.
    pub fn state(&self) -> &'static str {
        match self.state {
            WriterState::File => "file",
            WriterState::Stderr => "stderr",
            WriterState::Discard => "discard",
        }
    }

    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }

    fn write_line(&mut self, line: &str) {
        match self.state {
            WriterState::File => {
                let ok = self
                    .writer
                    .as_mut()
                    .is_some_and(|w| w.write_all(line.as_bytes()).is_ok());
                if ok {
                    self.lines_written += 1;
                } else {
                    let _ = writeln!(
                        io::stderr(),
                        "[VC-JSONL] write to {} failed; logging to stderr",
                        self.path.display()
                    );
                    self.writer = None;
                    self.state = WriterState::Stderr;
                    self.write_line(line);
                }
            }
            WriterState::Stderr => {
                if write!(io::stderr(), "[VC-JSONL] {line}").is_ok() {
                    self.lines_written += 1;
                } else {
                    self.state = WriterState::Discard;
                }
            }
            WriterState::Discard => {}
        }
    }
}

impl EventSink for JsonlWriter {
    fn emit(&mut self, event: &CleanupEvent) {
        self.write_entry(&LogEntry::new(event));
    }
}

impl Drop for JsonlWriter {
    fn drop(&mut self) {
        self.flush();
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

fn format_utc_now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
