//! Card templates: what to draw inside each slot, relative to its origin

use crate::units::{pt_to_mm, px_to_mm};

use super::{Binding, CardTemplate, ElementKind, Layout, Rect, TemplateElement};

/// Record field rendered as a bulleted list
pub const FEATURES_FIELD: &str = "features";

/// Line height as a multiple of the font size
pub const LINE_HEIGHT_FACTOR: f32 = 1.2;

/// Horizontal gap between a grid card's image and its text (mm)
const GRID_GAP_MM: f32 = 3.0;

/// Title font size relative to the body font
const GRID_TITLE_SCALE: f32 = 1.4;

/// Share of the text column given to field labels
const GRID_LABEL_SHARE: f32 = 0.35;

/// Height of one text line in mm
pub fn line_height_mm(font_size_pt: f32) -> f32 {
    pt_to_mm(font_size_pt) * LINE_HEIGHT_FACTOR
}

/// Which record fields a grid card shows
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GridFields {
    pub title: Option<String>,
    pub image: Option<String>,
    pub features: Option<String>,
    /// Remaining fields, one labeled line each
    pub body: Vec<String>,
}

impl CardTemplate {
    /// Template for a free-form layout, offset from the card box origin.
    ///
    /// `card` is the box returned by `card_box`, in editor pixels.
    pub fn for_layout(layout: &Layout, card: &Rect) -> Self {
        let elements = layout
            .elements
            .iter()
            .filter(|e| e.kind != ElementKind::Frame)
            .map(|e| TemplateElement {
                kind: e.kind,
                binding: e.binding.clone(),
                rect: Rect::new(
                    px_to_mm(e.left - card.x),
                    px_to_mm(e.top - card.y),
                    px_to_mm(e.width),
                    px_to_mm(e.height),
                ),
                font_size_pt: e.font_size_pt,
                bullets: matches!(
                    &e.binding,
                    Some(Binding::Field(f)) if f.eq_ignore_ascii_case(FEATURES_FIELD)
                ),
            })
            .collect();
        Self { elements }
    }

    /// Template for one grid-mode row slot of `width` x `height` mm.
    ///
    /// Image on the left, then title, features and labeled fields top to bottom
    /// while vertical space lasts.
    pub fn for_grid(width: f32, height: f32, fields: &GridFields, font_size_pt: f32) -> Self {
        let mut elements = Vec::new();

        let text_x = match &fields.image {
            Some(field) => {
                let image_width = height.min(width / 3.0);
                elements.push(TemplateElement {
                    kind: ElementKind::Image,
                    binding: Some(Binding::Field(field.clone())),
                    rect: Rect::new(0.0, 0.0, image_width, height),
                    font_size_pt: None,
                    bullets: false,
                });
                image_width + GRID_GAP_MM
            }
            None => 0.0,
        };
        let text_width = width - text_x;
        if text_width <= 0.0 {
            return Self { elements };
        }

        let mut y = 0.0;
        if let Some(field) = &fields.title {
            let title_size = font_size_pt * GRID_TITLE_SCALE;
            let title_height = line_height_mm(title_size);
            elements.push(TemplateElement {
                kind: ElementKind::Text,
                binding: Some(Binding::Field(field.clone())),
                rect: Rect::new(text_x, y, text_width, title_height),
                font_size_pt: Some(title_size),
                bullets: false,
            });
            y += title_height;
        }

        let line_height = line_height_mm(font_size_pt);
        if let Some(field) = &fields.features {
            // Up to half of what is left below the title
            let features_height = ((height - y) / 2.0).max(line_height);
            elements.push(TemplateElement {
                kind: ElementKind::Text,
                binding: Some(Binding::Field(field.clone())),
                rect: Rect::new(text_x, y, text_width, features_height),
                font_size_pt: Some(font_size_pt),
                bullets: true,
            });
            y += features_height;
        }

        let label_width = text_width * GRID_LABEL_SHARE;
        for field in &fields.body {
            if y + line_height > height {
                break;
            }
            elements.push(TemplateElement {
                kind: ElementKind::StaticText,
                binding: Some(Binding::Literal(format!("{}:", field))),
                rect: Rect::new(text_x, y, label_width, line_height),
                font_size_pt: Some(font_size_pt),
                bullets: false,
            });
            elements.push(TemplateElement {
                kind: ElementKind::Text,
                binding: Some(Binding::Field(field.clone())),
                rect: Rect::new(text_x + label_width, y, text_width - label_width, line_height),
                font_size_pt: Some(font_size_pt),
                bullets: false,
            });
            y += line_height;
        }

        Self { elements }
    }
}
