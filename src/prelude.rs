//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use vendor_cleanup::prelude::*;
//! ```

// Core
pub use crate::core::config::{ProjectContext, RootPackage, UserCleanupTable};
pub use crate::core::errors::{CleanupError, Result};

// Cleanup
pub use crate::cleanup::executor::{CleanupExecutor, CleanupReport, ExecutorConfig};
pub use crate::cleanup::lifecycle::LifecycleEvent;
pub use crate::cleanup::resolver::{CleanupMap, ConfigResolver};

// Logging
pub use crate::logger::console::ConsoleSink;
pub use crate::logger::jsonl::JsonlWriter;
pub use crate::logger::{CleanupEvent, EventSink, Level, MemorySink};
