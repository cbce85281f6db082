use crate::layout::{Layout, resolve_grid, resolve_repeat};
use crate::options::GridOptions;
use crate::types::*;
use serde::Serialize;

/// Page and slot counts for a merge, known before rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MergeStatistics {
    pub records: usize,
    /// Cards on a full page
    pub items_per_page: usize,
    pub pages: usize,
    /// Unused slots on the last page
    pub blank_slots: usize,
}

/// Calculate statistics for `record_count` records at `items_per_page` cards per page
pub fn calculate_statistics(record_count: usize, items_per_page: usize) -> Result<MergeStatistics> {
    if items_per_page == 0 {
        return Err(MergeError::InvalidLayout(
            "items per page must be at least 1".to_string(),
        ));
    }

    let pages = record_count.div_ceil(items_per_page);
    Ok(MergeStatistics {
        records: record_count,
        items_per_page,
        pages,
        blank_slots: pages * items_per_page - record_count,
    })
}

/// Statistics for a grid-mode merge
pub fn grid_statistics(record_count: usize, options: &GridOptions) -> Result<MergeStatistics> {
    options.validate()?;
    let geometry = resolve_grid(&options.page, options.items_per_page)?;
    calculate_statistics(record_count, geometry.items_per_page)
}

/// Statistics for a free-form layout merge
pub fn layout_statistics(record_count: usize, layout: &Layout) -> Result<MergeStatistics> {
    let geometry = resolve_repeat(layout)?;
    calculate_statistics(record_count, geometry.items_per_page())
}
