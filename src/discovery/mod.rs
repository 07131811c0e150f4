//! File discovery and scanning

mod scanner;

pub use scanner::{scan, DiscoveredFile};
