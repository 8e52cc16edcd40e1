//! Durable catalog of generated mosaics.

mod store;

pub use store::{CatalogStore, ThumbnailRecord};
