//! Stats sources for the uninverted field value cache.
//!
//! A source is the read-only view this crate has of the process-wide field
//! cache. It answers two questions: how many entries are cached (cheap) and
//! what every entry looks like right now (expensive).

pub mod entry;
pub mod registry;
pub mod snapshot;
pub mod traits;
