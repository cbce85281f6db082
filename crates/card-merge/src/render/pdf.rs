use printpdf::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::types::{ImageError, MergeError, Result};

use super::{Background, CardCanvas, ImageDraw, TextBlock};
use crate::layout::line_height_mm;
use crate::units::pt_to_mm;

/// Baseline offset from the top of a line, as a share of the font size
const ASCENT_RATIO: f32 = 0.8;

/// Images are placed at 72 DPI so one pixel is one point before scaling
const IMAGE_DPI: f32 = 72.0;

struct OpenPage {
    width_mm: f32,
    height_mm: f32,
    ops: Vec<Op>,
}

/// An image embedded once and reused on every page that draws it
#[derive(Clone)]
struct EmbeddedImage {
    id: XObjectId,
    width_px: usize,
    height_px: usize,
}

/// printpdf-backed canvas producing the merged document
pub struct PdfCanvas {
    doc: PdfDocument,
    page: Option<OpenPage>,
    images: HashMap<PathBuf, std::result::Result<EmbeddedImage, String>>,
    pages_finished: usize,
}

impl PdfCanvas {
    pub fn new(title: &str) -> Self {
        Self {
            doc: PdfDocument::new(title),
            page: None,
            images: HashMap::new(),
            pages_finished: 0,
        }
    }

    /// Pages started so far
    pub fn page_count(&self) -> usize {
        self.pages_finished + usize::from(self.page.is_some())
    }

    /// Close the last page and serialize the document
    pub fn finish(mut self) -> Vec<u8> {
        self.flush_page();
        let mut warnings = Vec::new();
        let bytes = self.doc.save(&PdfSaveOptions::default(), &mut warnings);
        for warning in &warnings {
            log::debug!("printpdf: {:?}", warning);
        }
        bytes
    }

    fn flush_page(&mut self) {
        if let Some(page) = self.page.take() {
            self.doc.pages.push(PdfPage::new(
                Mm(page.width_mm),
                Mm(page.height_mm),
                page.ops,
            ));
            self.pages_finished += 1;
        }
    }

    fn embed(&mut self, path: &Path) -> std::result::Result<EmbeddedImage, String> {
        if let Some(cached) = self.images.get(path) {
            return cached.clone();
        }

        let embedded = std::fs::read(path)
            .map_err(|e| e.to_string())
            .and_then(|bytes| {
                let mut warnings = Vec::new();
                RawImage::decode_from_bytes(&bytes, &mut warnings)
            })
            .map(|image| EmbeddedImage {
                width_px: image.width,
                height_px: image.height,
                id: self.doc.add_image(&image),
            });
        self.images.insert(path.to_path_buf(), embedded.clone());
        embedded
    }

    fn current_page(&mut self) -> Result<&mut OpenPage> {
        self.page
            .as_mut()
            .ok_or_else(|| MergeError::Pdf("drawing before the first page".to_string()))
    }

    /// Place an embedded image with its top-left corner at (x, y) mm
    fn place(
        &mut self,
        image: &EmbeddedImage,
        x_mm: f32,
        y_mm: f32,
        width_mm: f32,
        height_mm: f32,
    ) -> Result<()> {
        let page = self.current_page()?;
        let bottom_mm = page.height_mm - y_mm - height_mm;
        page.ops.push(Op::UseXobject {
            id: image.id.clone(),
            transform: XObjectTransform {
                translate_x: Some(Mm(x_mm).into_pt()),
                translate_y: Some(Mm(bottom_mm).into_pt()),
                scale_x: Some(Mm(width_mm).into_pt().0 / image.width_px as f32),
                scale_y: Some(Mm(height_mm).into_pt().0 / image.height_px as f32),
                dpi: Some(IMAGE_DPI),
                ..Default::default()
            },
        });
        Ok(())
    }
}

impl CardCanvas for PdfCanvas {
    fn add_page(&mut self, width_mm: f32, height_mm: f32) -> Result<()> {
        self.flush_page();
        self.page = Some(OpenPage {
            width_mm,
            height_mm,
            ops: Vec::new(),
        });
        Ok(())
    }

    fn stamp_background(&mut self, background: &Background) -> Result<()> {
        let image = self
            .embed(background.path())
            .map_err(|e| MergeError::Background(format!("{}: {}", background.path().display(), e)))?;
        let (width_mm, height_mm) = {
            let page = self.current_page()?;
            (page.width_mm, page.height_mm)
        };
        self.place(&image, 0.0, 0.0, width_mm, height_mm)
    }

    fn draw_text(&mut self, block: &TextBlock) -> Result<()> {
        let page = self.current_page()?;
        let line_height = line_height_mm(block.font_size_pt);
        let ascent = pt_to_mm(block.font_size_pt) * ASCENT_RATIO;

        page.ops.push(Op::StartTextSection);
        page.ops.push(Op::SetFontSizeBuiltinFont {
            size: Pt(block.font_size_pt),
            font: BuiltinFont::Helvetica,
        });
        for (i, line) in block.lines.iter().enumerate() {
            let baseline_mm = block.y_mm + ascent + i as f32 * line_height;
            page.ops.push(Op::SetTextMatrix {
                matrix: TextMatrix::Translate(
                    Mm(block.x_mm).into_pt(),
                    Mm(page.height_mm - baseline_mm).into_pt(),
                ),
            });
            page.ops.push(Op::WriteTextBuiltinFont {
                items: vec![TextItem::Text(line.clone())],
                font: BuiltinFont::Helvetica,
            });
        }
        page.ops.push(Op::EndTextSection);
        Ok(())
    }

    fn draw_image(&mut self, draw: &ImageDraw) -> std::result::Result<(), ImageError> {
        let unreadable = |reason: String| ImageError::Unreadable {
            reference: draw.path.display().to_string(),
            reason,
        };
        let image = self.embed(&draw.path).map_err(unreadable)?;
        self.place(&image, draw.x_mm, draw.y_mm, draw.width_mm, draw.height_mm)
            .map_err(|e| unreadable(e.to_string()))
    }
}
