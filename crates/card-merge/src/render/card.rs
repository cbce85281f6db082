//! Rendering one record into one slot

use crate::fit::fit;
use crate::images::ImageSource;
use crate::layout::{Binding, CardTemplate, ElementKind, Slot, TemplateElement};
use crate::records::field_value;
use crate::types::{ImageError, Record, Result};

use super::text::{bullet_lines, clip_lines, wrap_text};
use super::{CardCanvas, ImageDraw, TextBlock};

/// What happened while drawing a single card
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardOutcome {
    pub images_drawn: usize,
    /// One entry per image left out of the card
    pub skipped_images: Vec<ImageError>,
}

fn resolve<'a>(binding: Option<&'a Binding>, record: &'a Record) -> &'a str {
    match binding {
        Some(Binding::Literal(value)) => value.as_str(),
        Some(Binding::Field(field)) => field_value(record, field),
        None => "",
    }
}

/// Draw every template element for `record` inside `slot`.
///
/// Image problems are collected in the outcome and never fail the card;
/// canvas errors on text do.
pub fn render_card<C, I>(
    canvas: &mut C,
    images: &mut I,
    template: &CardTemplate,
    record: &Record,
    slot: &Slot,
    default_font_size_pt: f32,
) -> Result<CardOutcome>
where
    C: CardCanvas + ?Sized,
    I: ImageSource + ?Sized,
{
    let mut outcome = CardOutcome::default();

    for element in &template.elements {
        let value = resolve(element.binding.as_ref(), record);
        match element.kind {
            ElementKind::Text | ElementKind::StaticText => {
                let font_size_pt = element.font_size_pt.unwrap_or(default_font_size_pt);
                draw_text(canvas, element, slot, value, font_size_pt)?;
            }
            ElementKind::Image => {
                if value.trim().is_empty() {
                    continue;
                }
                match draw_image(canvas, images, element, slot, value) {
                    Ok(()) => outcome.images_drawn += 1,
                    Err(e) => {
                        log::warn!("Skipping image in slot {:?}: {}", slot.pos, e);
                        outcome.skipped_images.push(e);
                    }
                }
            }
            ElementKind::Frame => {}
        }
    }

    Ok(outcome)
}

fn draw_text<C: CardCanvas + ?Sized>(
    canvas: &mut C,
    element: &TemplateElement,
    slot: &Slot,
    value: &str,
    font_size_pt: f32,
) -> Result<()> {
    let rect = &element.rect;
    let lines = if element.bullets {
        bullet_lines(value, rect.width, font_size_pt)
    } else {
        wrap_text(value, rect.width, font_size_pt)
    };
    if lines.is_empty() {
        return Ok(());
    }

    canvas.draw_text(&TextBlock {
        x_mm: slot.rect.x + rect.x,
        y_mm: slot.rect.y + rect.y,
        width_mm: rect.width,
        height_mm: rect.height,
        font_size_pt,
        lines: clip_lines(lines, rect.height, font_size_pt),
    })
}

fn draw_image<C, I>(
    canvas: &mut C,
    images: &mut I,
    element: &TemplateElement,
    slot: &Slot,
    reference: &str,
) -> std::result::Result<(), ImageError>
where
    C: CardCanvas + ?Sized,
    I: ImageSource + ?Sized,
{
    let path = images.materialize(reference)?;
    let (width_px, height_px) = images.probe(&path)?;

    let rect = &element.rect;
    let placement = fit(rect.width, rect.height, width_px as f32, height_px as f32).map_err(
        |_| ImageError::Unreadable {
            reference: reference.to_string(),
            reason: format!("image reports {}x{}", width_px, height_px),
        },
    )?;

    canvas.draw_image(&ImageDraw {
        path,
        x_mm: slot.rect.x + rect.x + placement.offset_x,
        y_mm: slot.rect.y + rect.y + placement.offset_y,
        width_mm: placement.draw_width,
        height_mm: placement.draw_height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{GridPosition, Rect};
    use crate::render::Background;
    use std::path::{Path, PathBuf};

    #[derive(Default)]
    struct Recorder {
        texts: Vec<TextBlock>,
        images: Vec<ImageDraw>,
    }

    impl CardCanvas for Recorder {
        fn add_page(&mut self, _: f32, _: f32) -> Result<()> {
            Ok(())
        }
        fn stamp_background(&mut self, _: &Background) -> Result<()> {
            Ok(())
        }
        fn draw_text(&mut self, block: &TextBlock) -> Result<()> {
            self.texts.push(block.clone());
            Ok(())
        }
        fn draw_image(&mut self, image: &ImageDraw) -> std::result::Result<(), ImageError> {
            self.images.push(image.clone());
            Ok(())
        }
    }

    /// Every reference is a 200x100 image, except "broken"
    struct FakeImages;

    impl ImageSource for FakeImages {
        fn materialize(&mut self, reference: &str) -> std::result::Result<PathBuf, ImageError> {
            if reference.starts_with("http") {
                return Err(ImageError::FetchFailed {
                    url: reference.to_string(),
                    reason: "offline".to_string(),
                });
            }
            Ok(PathBuf::from(reference))
        }
        fn probe(&self, path: &Path) -> std::result::Result<(u32, u32), ImageError> {
            if path == Path::new("broken") {
                return Ok((0, 0));
            }
            Ok((200, 100))
        }
    }

    fn element(kind: ElementKind, binding: Binding, rect: Rect) -> TemplateElement {
        TemplateElement {
            kind,
            binding: Some(binding),
            rect,
            font_size_pt: None,
            bullets: false,
        }
    }

    fn slot() -> Slot {
        Slot {
            rect: Rect::new(10.0, 20.0, 100.0, 50.0),
            pos: GridPosition::new(0, 0),
        }
    }

    fn template() -> CardTemplate {
        CardTemplate {
            elements: vec![
                element(
                    ElementKind::Text,
                    Binding::Field("name".to_string()),
                    Rect::new(0.0, 0.0, 60.0, 10.0),
                ),
                element(
                    ElementKind::Image,
                    Binding::Field("photo".to_string()),
                    Rect::new(60.0, 0.0, 40.0, 40.0),
                ),
            ],
        }
    }

    fn record(pairs: &[(&str, &str)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_text_and_fitted_image() {
        let mut canvas = Recorder::default();
        let rec = record(&[("name", "Widget"), ("photo", "widget.png")]);
        let outcome =
            render_card(&mut canvas, &mut FakeImages, &template(), &rec, &slot(), 10.0).unwrap();

        assert_eq!(outcome.images_drawn, 1);
        assert_eq!(canvas.texts.len(), 1);
        assert_eq!(canvas.texts[0].lines, vec!["Widget"]);
        assert_eq!((canvas.texts[0].x_mm, canvas.texts[0].y_mm), (10.0, 20.0));

        // 2:1 image in a 40x40 box: 40x20, centered vertically
        let img = &canvas.images[0];
        assert_eq!(img.path, PathBuf::from("widget.png"));
        assert!((img.width_mm - 40.0).abs() < 1e-4);
        assert!((img.height_mm - 20.0).abs() < 1e-4);
        assert!((img.x_mm - 70.0).abs() < 1e-4);
        assert!((img.y_mm - 30.0).abs() < 1e-4);
    }

    #[test]
    fn test_unreadable_image_keeps_text() {
        let mut canvas = Recorder::default();
        let rec = record(&[("name", "Widget"), ("photo", "broken")]);
        let outcome =
            render_card(&mut canvas, &mut FakeImages, &template(), &rec, &slot(), 10.0).unwrap();

        assert_eq!(outcome.images_drawn, 0);
        assert_eq!(outcome.skipped_images.len(), 1);
        assert!(canvas.images.is_empty());
        assert_eq!(canvas.texts.len(), 1);
    }

    #[test]
    fn test_failed_fetch_is_skipped() {
        let mut canvas = Recorder::default();
        let rec = record(&[("name", "Widget"), ("photo", "https://example.com/w.png")]);
        let outcome =
            render_card(&mut canvas, &mut FakeImages, &template(), &rec, &slot(), 10.0).unwrap();
        assert!(matches!(
            outcome.skipped_images[0],
            ImageError::FetchFailed { .. }
        ));
        assert_eq!(canvas.texts.len(), 1);
    }

    #[test]
    fn test_missing_fields_render_nothing() {
        let mut canvas = Recorder::default();
        let outcome = render_card(
            &mut canvas,
            &mut FakeImages,
            &template(),
            &Record::new(),
            &slot(),
            10.0,
        )
        .unwrap();
        assert_eq!(outcome, CardOutcome::default());
        assert!(canvas.texts.is_empty());
        assert!(canvas.images.is_empty());
    }

    #[test]
    fn test_bullets_and_literals() {
        let mut list = element(
            ElementKind::Text,
            Binding::Field("features".to_string()),
            Rect::new(0.0, 10.0, 100.0, 30.0),
        );
        list.bullets = true;
        let label = element(
            ElementKind::StaticText,
            Binding::Literal("Price".to_string()),
            Rect::new(0.0, 40.0, 50.0, 10.0),
        );
        let template = CardTemplate {
            elements: vec![list, label],
        };

        let mut canvas = Recorder::default();
        let rec = record(&[("features", "Fast|Light")]);
        render_card(&mut canvas, &mut FakeImages, &template, &rec, &slot(), 10.0).unwrap();

        assert_eq!(canvas.texts[0].lines, vec!["- Fast", "- Light"]);
        assert_eq!(canvas.texts[1].lines, vec!["Price"]);
    }
}
