//! CSV loading for income tax slab tables.

pub mod loader;

pub use loader::{SlabRecord, SlabTableLoader, SlabTableLoaderError};
