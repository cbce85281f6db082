//! Saved layout documents
//!
//! A design is stored as editor JSON: a page block plus a flat list of
//! positioned objects. One object is tagged as the repeater area, the rest
//! make up the card.

use serde::Deserialize;
use std::path::Path;

use crate::types::{MergeError, Orientation, PageSpec, PaperSize, Result};
use crate::units::px_to_pt;

use super::{Binding, CardElement, ElementKind, Layout, RepeaterArea};

const REPEATER_AREA: &str = "repeaterArea";
const CARD_FRAME: &str = "card";
const IMAGE: &str = "image";

#[derive(Debug, Deserialize)]
struct LayoutDocument {
    #[serde(default)]
    page: PageEntry,
    #[serde(default)]
    objects: Vec<LayoutObject>,
}

#[derive(Debug, Deserialize)]
struct PageEntry {
    #[serde(default)]
    size: PaperSize,
    #[serde(default)]
    orient: OrientCode,
}

impl Default for PageEntry {
    fn default() -> Self {
        Self {
            size: PaperSize::A4,
            orient: OrientCode::P,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
enum OrientCode {
    #[default]
    #[serde(alias = "portrait", alias = "Portrait")]
    P,
    #[serde(alias = "landscape", alias = "Landscape")]
    L,
}

impl From<OrientCode> for Orientation {
    fn from(code: OrientCode) -> Self {
        match code {
            OrientCode::P => Orientation::Portrait,
            OrientCode::L => Orientation::Landscape,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutObject {
    #[serde(rename = "type", default)]
    object_type: Option<String>,
    left: f32,
    top: f32,
    width: f32,
    height: f32,
    #[serde(default = "unit_scale")]
    scale_x: f32,
    #[serde(default = "unit_scale")]
    scale_y: f32,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    font_size: Option<f32>,
    #[serde(default)]
    meta: ObjectMeta,
}

#[derive(Debug, Default, Deserialize)]
struct ObjectMeta {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    bind: Option<String>,
    #[serde(rename = "static", default)]
    static_text: Option<String>,
    #[serde(default)]
    cols: Option<i64>,
    #[serde(default)]
    rows: Option<i64>,
}

fn unit_scale() -> f32 {
    1.0
}

impl LayoutObject {
    fn is_repeater(&self) -> bool {
        self.meta.kind.as_deref() == Some(REPEATER_AREA)
    }

    fn is_image(&self) -> bool {
        self.object_type.as_deref() == Some(IMAGE) || self.meta.kind.as_deref() == Some(IMAGE)
    }

    fn width(&self) -> f32 {
        self.width * self.scale_x
    }

    fn height(&self) -> f32 {
        self.height * self.scale_y
    }

    fn into_repeater(self) -> Result<RepeaterArea> {
        let (width, height) = (self.width(), self.height());
        if width <= 0.0 || height <= 0.0 {
            return Err(MergeError::InvalidLayout(format!(
                "repeater area has no extent ({}x{})",
                width, height
            )));
        }
        Ok(RepeaterArea {
            left: self.left,
            top: self.top,
            width,
            height,
            explicit_cols: self.meta.cols.map(|c| c.max(0) as usize),
            explicit_rows: self.meta.rows.map(|r| r.max(0) as usize),
        })
    }

    fn into_element(self) -> CardElement {
        let binding = if let Some(literal) = self.meta.static_text.clone() {
            Some(Binding::Literal(literal))
        } else if let Some(field) = self.meta.bind.clone() {
            Some(Binding::Field(field))
        } else {
            self.text.clone().map(Binding::Literal)
        };

        let kind = if self.is_image() {
            ElementKind::Image
        } else if self.meta.kind.as_deref() == Some(CARD_FRAME) {
            ElementKind::Frame
        } else {
            match binding {
                Some(Binding::Field(_)) => ElementKind::Text,
                Some(Binding::Literal(_)) => ElementKind::StaticText,
                None => ElementKind::Frame,
            }
        };

        CardElement {
            kind,
            left: self.left,
            top: self.top,
            width: self.width(),
            height: self.height(),
            binding,
            font_size_pt: self.font_size.map(px_to_pt),
        }
    }
}

impl LayoutDocument {
    fn into_layout(self) -> Result<Layout> {
        let page = PageSpec {
            size: self.page.size,
            orientation: self.page.orient.into(),
            // Free-form positions are absolute on the page
            margin_mm: 0.0,
        };

        let (repeaters, others): (Vec<_>, Vec<_>) =
            self.objects.into_iter().partition(LayoutObject::is_repeater);

        let mut repeaters = repeaters.into_iter();
        let repeater = match (repeaters.next(), repeaters.next()) {
            (Some(area), None) => area.into_repeater()?,
            (None, _) => {
                return Err(MergeError::InvalidLayout(
                    "layout has no repeater area".to_string(),
                ));
            }
            (Some(_), Some(_)) => {
                return Err(MergeError::InvalidLayout(
                    "layout has more than one repeater area".to_string(),
                ));
            }
        };

        if others.is_empty() {
            return Err(MergeError::InvalidLayout(
                "layout has no card elements".to_string(),
            ));
        }

        Ok(Layout {
            page,
            elements: others.into_iter().map(LayoutObject::into_element).collect(),
            repeater,
        })
    }
}

impl Layout {
    /// Parse and validate a layout from editor JSON
    pub fn from_json_str(json: &str) -> Result<Self> {
        let doc: LayoutDocument = serde_json::from_str(json)?;
        doc.into_layout()
    }

    /// Load a layout from a JSON file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        tokio::task::spawn_blocking(move || {
            let doc: LayoutDocument = serde_json::from_slice(&bytes)?;
            doc.into_layout()
        })
        .await?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "page": {"size": "A5", "orient": "L"},
        "objects": [
            {"left": 10, "top": 20, "width": 300, "height": 200,
             "meta": {"type": "repeaterArea", "cols": 3}},
            {"left": 10, "top": 20, "width": 100, "height": 50,
             "meta": {"type": "card"}},
            {"left": 15, "top": 25, "width": 80, "height": 10,
             "text": "{{name}}", "fontSize": 16, "meta": {"bind": "name"}},
            {"type": "image", "left": 15, "top": 40, "width": 20, "height": 10,
             "scaleX": 2, "meta": {"bind": "photo"}},
            {"left": 60, "top": 40, "width": 30, "height": 10,
             "text": "Price", "meta": {}}
        ]
    }"#;

    #[test]
    fn test_parse_sample_layout() {
        let layout = Layout::from_json_str(SAMPLE).unwrap();

        assert_eq!(layout.page.size, PaperSize::A5);
        assert_eq!(layout.page.orientation, Orientation::Landscape);
        assert_eq!(layout.repeater.width, 300.0);
        assert_eq!(layout.repeater.explicit_cols, Some(3));
        assert_eq!(layout.repeater.explicit_rows, None);
        assert_eq!(layout.elements.len(), 4);

        let kinds: Vec<ElementKind> = layout.elements.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ElementKind::Frame,
                ElementKind::Text,
                ElementKind::Image,
                ElementKind::StaticText
            ]
        );

        let name = &layout.elements[1];
        assert_eq!(name.binding, Some(Binding::Field("name".to_string())));
        assert!((name.font_size_pt.unwrap() - 12.0).abs() < 1e-4);

        // scaleX is folded into the width
        assert_eq!(layout.elements[2].width, 40.0);
        assert_eq!(
            layout.elements[3].binding,
            Some(Binding::Literal("Price".to_string()))
        );
    }

    #[test]
    fn test_static_wins_over_bind() {
        let json = r#"{"page": {"size": "A4", "orient": "P"}, "objects": [
            {"left": 0, "top": 0, "width": 100, "height": 100, "meta": {"type": "repeaterArea"}},
            {"left": 0, "top": 0, "width": 10, "height": 10,
             "meta": {"bind": "name", "static": "Fixed"}}
        ]}"#;
        let layout = Layout::from_json_str(json).unwrap();
        assert_eq!(layout.elements[0].kind, ElementKind::StaticText);
        assert_eq!(
            layout.elements[0].binding,
            Some(Binding::Literal("Fixed".to_string()))
        );
    }

    #[test]
    fn test_missing_repeater_area() {
        let json = r#"{"page": {"size": "A4", "orient": "P"}, "objects": [
            {"left": 0, "top": 0, "width": 10, "height": 10, "meta": {"bind": "name"}}
        ]}"#;
        match Layout::from_json_str(json) {
            Err(MergeError::InvalidLayout(msg)) => assert!(msg.contains("no repeater area")),
            other => panic!("Expected InvalidLayout, got {:?}", other),
        }
    }

    #[test]
    fn test_two_repeater_areas() {
        let json = r#"{"objects": [
            {"left": 0, "top": 0, "width": 10, "height": 10, "meta": {"type": "repeaterArea"}},
            {"left": 0, "top": 0, "width": 10, "height": 10, "meta": {"type": "repeaterArea"}},
            {"left": 0, "top": 0, "width": 10, "height": 10, "meta": {"bind": "name"}}
        ]}"#;
        assert!(matches!(
            Layout::from_json_str(json),
            Err(MergeError::InvalidLayout(_))
        ));
    }

    #[test]
    fn test_repeater_without_card() {
        let json = r#"{"objects": [
            {"left": 0, "top": 0, "width": 10, "height": 10, "meta": {"type": "repeaterArea"}}
        ]}"#;
        assert!(matches!(
            Layout::from_json_str(json),
            Err(MergeError::InvalidLayout(_))
        ));
    }

    #[test]
    fn test_negative_explicit_count_becomes_zero() {
        let json = r#"{"objects": [
            {"left": 0, "top": 0, "width": 10, "height": 10,
             "meta": {"type": "repeaterArea", "cols": -2, "rows": 4}},
            {"left": 0, "top": 0, "width": 5, "height": 5, "meta": {"bind": "name"}}
        ]}"#;
        let layout = Layout::from_json_str(json).unwrap();
        assert_eq!(layout.repeater.explicit_cols, Some(0));
        assert_eq!(layout.repeater.explicit_rows, Some(4));
        // Page defaults to A4 portrait with no margin
        assert_eq!(layout.page.size, PaperSize::A4);
        assert_eq!(layout.page.margin_mm, 0.0);
    }
}
