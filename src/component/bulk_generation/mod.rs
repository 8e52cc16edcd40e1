//! Parallel mosaic generation over a whole directory.

mod main;

pub use main::{BatchReport, BulkGenerator, GenerationFailure};
