//! Per-page slot grids
//!
//! A slot grid is computed once per merge and reused for every page. Slots
//! are handed out in fill order: row by row, left to right within a row.

use crate::types::PageSpec;
use crate::units::px_to_mm;

use super::{
    GRID_ROW_INSET_MM, GridGeometry, GridPosition, Layout, Rect, RepeatGeometry, Slot,
};

/// Source of card slots for one page
pub trait SlotGridBuilder {
    /// Cards placed on a full page
    fn items_per_page(&self) -> usize;

    /// Slot at `index` in fill order, for `index < items_per_page()`
    fn slot(&self, index: usize) -> Slot;

    /// All slots of a page in fill order
    fn slots(&self) -> impl Iterator<Item = Slot> + '_
    where
        Self: Sized,
    {
        (0..self.items_per_page()).map(move |i| self.slot(i))
    }
}

// =============================================================================
// Grid Mode
// =============================================================================

/// Full-width stacked rows, materialized up front
#[derive(Debug, Clone, PartialEq)]
pub struct RowSlots {
    slots: Vec<Slot>,
}

impl RowSlots {
    pub fn new(page: &PageSpec, geometry: &GridGeometry) -> Self {
        let slots = (0..geometry.rows)
            .take(geometry.items_per_page)
            .map(|row| Slot {
                rect: Rect::new(
                    page.margin_mm,
                    page.margin_mm + row as f32 * geometry.row_height_mm + GRID_ROW_INSET_MM,
                    geometry.usable_width_mm,
                    geometry.row_height_mm - 2.0 * GRID_ROW_INSET_MM,
                ),
                pos: GridPosition::new(row, 0),
            })
            .collect();
        Self { slots }
    }

    pub fn as_slice(&self) -> &[Slot] {
        &self.slots
    }
}

impl SlotGridBuilder for RowSlots {
    fn items_per_page(&self) -> usize {
        self.slots.len()
    }

    fn slot(&self, index: usize) -> Slot {
        self.slots[index]
    }
}

// =============================================================================
// Free-form Mode
// =============================================================================

/// Card box tiled across the repeater area, computed per index
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RepeatSlots {
    /// Repeater area origin in editor pixels
    origin_px: (f32, f32),
    geometry: RepeatGeometry,
}

impl RepeatSlots {
    pub fn new(layout: &Layout, geometry: &RepeatGeometry) -> Self {
        Self {
            origin_px: (layout.repeater.left, layout.repeater.top),
            geometry: *geometry,
        }
    }

    /// Page-space slot for a grid position
    pub fn slot_at(&self, pos: GridPosition) -> Slot {
        let card = &self.geometry.card;
        let (left, top) = self.origin_px;
        Slot {
            rect: Rect::new(
                px_to_mm(left + pos.col as f32 * card.width),
                px_to_mm(top + pos.row as f32 * card.height),
                px_to_mm(card.width),
                px_to_mm(card.height),
            ),
            pos,
        }
    }
}

impl SlotGridBuilder for RepeatSlots {
    fn items_per_page(&self) -> usize {
        self.geometry.items_per_page()
    }

    fn slot(&self, index: usize) -> Slot {
        let cols = self.geometry.cols;
        self.slot_at(GridPosition::new(index / cols, index % cols))
    }
}
