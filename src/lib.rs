//! Catalog Tools - trading card catalog site utilities
//!
//! Batch utilities for maintaining the card catalog website: converts CSV
//! card/set/image metadata into the JSON consumed by the static site and
//! repairs card image paths against the on-disk image tree.

pub mod check;
pub mod convert;
pub mod error;
pub mod images;
pub mod merge;
pub mod normalize;
pub mod pack_art;
pub mod reconcile;
pub mod records;

pub use error::{CatalogError, Result};
pub use images::{ImageLocator, ImageRef};
pub use records::{CardRecord, SetRecord};
