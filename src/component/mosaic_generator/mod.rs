//! Mosaic generation: sample K frames of a video and tile them into one JPEG.
//!
//! Stages:
//! A. probe duration and size
//! B. pick evenly spaced sample points
//! C. decode each point, repeating the last good frame on failure
//! D. tile row-major into a rows x cols grid
//! E. write through a temp file and rename into place

mod composer;
mod main;
mod sampler;

pub use composer::{CellSize, compose_mosaic, fit_to_cell};
pub use main::{GeneratedMosaic, GenerationOutcome, MosaicGenerator, MosaicSpec};
pub use sampler::sample_points;
