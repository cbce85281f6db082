pub mod fit;
pub mod images;
pub mod layout;
mod merge;
mod options;
mod paginate;
mod records;
pub mod render;
mod stats;
mod types;
pub mod units;

pub use fit::{ImageFit, fit};
pub use images::{ImageCache, ImageSource};
pub use layout::{CardTemplate, Layout, SlotGridBuilder};
pub use merge::{merge_grid, merge_layout, render_grid, render_layout};
pub use options::*;
pub use paginate::{MergeReport, RenderJob, paginate};
pub use records::{RecordSet, field_value, load_records, read_records};
pub use render::{Background, CardCanvas, PdfCanvas};
pub use stats::{MergeStatistics, calculate_statistics, grid_statistics, layout_statistics};
pub use types::*;
