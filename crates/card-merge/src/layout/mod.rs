//! Layout calculation modules for card merging
//!
//! This module handles the geometry between a card description and the page:
//! - Layout documents (editor JSON with a repeater area)
//! - Card geometry (bounding box, rows and columns per page)
//! - Slot grids (where each card instance lands)
//! - Card templates (what each instance draws, relative to its slot)

mod document;
mod geometry;
mod slots;
mod template;
mod types;

pub use geometry::*;
pub use slots::*;
pub use template::*;
pub use types::*;
