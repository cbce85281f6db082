//! Pagination driver
//!
//! Walks the record set in input order, opening pages as needed and handing
//! each record to the card renderer in slot order.

use crate::images::ImageSource;
use crate::layout::{CardTemplate, SlotGridBuilder};
use crate::render::{Background, CardCanvas, render_card};
use crate::types::{MergeError, Record, Result};

/// Everything one merge needs, borrowed for the length of the pass
pub struct RenderJob<'a, G> {
    pub records: &'a [Record],
    pub slots: &'a G,
    pub template: &'a CardTemplate,
    pub background: Option<&'a Background>,
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    /// Used by elements without their own font size
    pub font_size_pt: f32,
}

/// Aggregate outcome of a merge
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeReport {
    pub pages: usize,
    pub cards: usize,
    pub images_skipped: usize,
    /// One line per skipped image
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageState {
    Start,
    AddPage,
    FillSlots,
    Done,
}

/// Render every record of `job` onto `canvas`.
///
/// Fails before touching the canvas when the slot grid is empty. Image
/// failures are counted in the report and never stop the pass.
pub fn paginate<G, C, I>(job: &RenderJob<'_, G>, canvas: &mut C, images: &mut I) -> Result<MergeReport>
where
    G: SlotGridBuilder,
    C: CardCanvas + ?Sized,
    I: ImageSource + ?Sized,
{
    let items_per_page = job.slots.items_per_page();
    if items_per_page == 0 {
        return Err(MergeError::InvalidLayout(
            "layout has no card slots".to_string(),
        ));
    }

    let mut report = MergeReport::default();
    let mut cursor = 0;
    let mut state = PageState::Start;

    while state != PageState::Done {
        state = match state {
            PageState::Start => {
                if job.records.is_empty() {
                    PageState::Done
                } else {
                    PageState::AddPage
                }
            }
            PageState::AddPage => {
                canvas.add_page(job.page_width_mm, job.page_height_mm)?;
                if let Some(background) = job.background {
                    canvas.stamp_background(background)?;
                }
                report.pages += 1;
                log::debug!("Page {} starts at record {}", report.pages, cursor + 1);
                PageState::FillSlots
            }
            PageState::FillSlots => {
                for slot in job.slots.slots() {
                    let Some(record) = job.records.get(cursor) else {
                        break;
                    };
                    let outcome = render_card(
                        canvas,
                        images,
                        job.template,
                        record,
                        &slot,
                        job.font_size_pt,
                    )?;
                    cursor += 1;
                    report.cards += 1;
                    report.images_skipped += outcome.skipped_images.len();
                    report.warnings.extend(
                        outcome
                            .skipped_images
                            .iter()
                            .map(|e| format!("record {}: {}", cursor, e)),
                    );
                }
                if cursor < job.records.len() {
                    PageState::AddPage
                } else {
                    PageState::Done
                }
            }
            PageState::Done => PageState::Done,
        };
    }

    Ok(report)
}
