//! Vendor cleanup: configuration merge, per-package removal, lifecycle dispatch.

pub mod executor;
pub mod lifecycle;
pub mod resolver;
