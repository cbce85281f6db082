//! Merge entry points for both modes
//!
//! Each merge resolves geometry and the background before the first page,
//! renders in one blocking pass and writes the output only when the pass
//! succeeds.

use crate::layout::{
    CardTemplate, GRID_ROW_INSET_MM, Layout, RepeatSlots, RowSlots, SlotGridBuilder, resolve_grid,
    resolve_repeat,
};
use crate::options::{GridOptions, MergeOptions};
use crate::paginate::{MergeReport, RenderJob, paginate};
use crate::records::RecordSet;
use crate::render::{Background, PdfCanvas};
use crate::types::Result;
use std::path::Path;

/// Merge `records` into fixed-grid rows and write the PDF to `output_path`
pub async fn merge_grid(
    records: &RecordSet,
    options: &GridOptions,
    output_path: impl AsRef<Path>,
) -> Result<MergeReport> {
    let records = records.clone();
    let options = options.clone();
    let output_path = output_path.as_ref().to_owned();

    // Rendering is CPU-bound and fetches images with blocking I/O
    let (bytes, report) =
        tokio::task::spawn_blocking(move || render_grid(&records, &options)).await??;

    tokio::fs::write(&output_path, bytes).await?;
    log::info!(
        "Wrote {} cards on {} pages to {}",
        report.cards,
        report.pages,
        output_path.display()
    );
    Ok(report)
}

/// Merge `records` through a free-form layout and write the PDF to `output_path`
pub async fn merge_layout(
    records: &RecordSet,
    layout: &Layout,
    options: &MergeOptions,
    output_path: impl AsRef<Path>,
) -> Result<MergeReport> {
    let records = records.clone();
    let layout = layout.clone();
    let options = options.clone();
    let output_path = output_path.as_ref().to_owned();

    let (bytes, report) =
        tokio::task::spawn_blocking(move || render_layout(&records, &layout, &options)).await??;

    tokio::fs::write(&output_path, bytes).await?;
    log::info!(
        "Wrote {} cards on {} pages to {}",
        report.cards,
        report.pages,
        output_path.display()
    );
    Ok(report)
}

/// Render a grid-mode document in memory
pub fn render_grid(records: &RecordSet, options: &GridOptions) -> Result<(Vec<u8>, MergeReport)> {
    options.validate()?;
    let geometry = resolve_grid(&options.page, options.items_per_page)?;
    let slots = RowSlots::new(&options.page, &geometry);
    let template = CardTemplate::for_grid(
        geometry.usable_width_mm,
        geometry.row_height_mm - 2.0 * GRID_ROW_INSET_MM,
        &options.fields(&records.headers),
        options.merge.font_size_pt,
    );
    log::debug!(
        "Grid: {} rows of {:.1}mm, {} cards per page",
        geometry.rows,
        geometry.row_height_mm,
        geometry.items_per_page
    );

    let (page_width_mm, page_height_mm) = options.page.dimensions_mm();
    render(records, &slots, &template, &options.merge, page_width_mm, page_height_mm)
}

/// Render a free-form layout document in memory
pub fn render_layout(
    records: &RecordSet,
    layout: &Layout,
    options: &MergeOptions,
) -> Result<(Vec<u8>, MergeReport)> {
    options.validate()?;
    let geometry = resolve_repeat(layout)?;
    let slots = RepeatSlots::new(layout, &geometry);
    let template = CardTemplate::for_layout(layout, &geometry.card);

    let (page_width_mm, page_height_mm) = layout.page.dimensions_mm();
    render(records, &slots, &template, options, page_width_mm, page_height_mm)
}

fn render<G: SlotGridBuilder>(
    records: &RecordSet,
    slots: &G,
    template: &CardTemplate,
    options: &MergeOptions,
    page_width_mm: f32,
    page_height_mm: f32,
) -> Result<(Vec<u8>, MergeReport)> {
    let background = options.background.as_ref().map(Background::open).transpose()?;
    if let Some(background) = &background {
        let (width_px, height_px) = background.dimensions_px();
        log::debug!(
            "Background {} ({}x{}px)",
            background.path().display(),
            width_px,
            height_px
        );
    }

    // Temporary downloads live as long as this cache
    let mut images = options.image_cache();
    let mut canvas = PdfCanvas::new(&options.title);

    let job = RenderJob {
        records: &records.records,
        slots,
        template,
        background: background.as_ref(),
        page_width_mm,
        page_height_mm,
        font_size_pt: options.font_size_pt,
    };
    let report = paginate(&job, &mut canvas, &mut images)?;
    log::debug!("{} distinct remote images requested", images.remote_count());

    if report.images_skipped > 0 {
        log::warn!("{} images were left out", report.images_skipped);
    }
    Ok((canvas.finish(), report))
}
