//! Core components of the triage workflow
//!
//! Each submodule owns one stage; [`Workspace`] ties them together for front ends.

pub mod bulk_generation;
pub mod catalog;
pub mod mosaic_generator;
pub mod quarantine;
pub mod review_session;
pub mod workspace;

pub use bulk_generation::{BatchReport, BulkGenerator, GenerationFailure};
pub use catalog::{CatalogStore, ThumbnailRecord};
pub use mosaic_generator::{GeneratedMosaic, GenerationOutcome, MosaicGenerator, MosaicSpec};
pub use quarantine::{QuarantineExecutor, QuarantineFailure, QuarantineReport, QuarantinedEntry};
pub use review_session::{ReviewEntry, ReviewSession};
pub use workspace::Workspace;
