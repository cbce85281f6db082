//! Layout data types for card placement
//!
//! Editor-side types (`CardElement`, `RepeaterArea`, `Layout`) are in pixels.
//! Everything placed on a page (`Slot`, `TemplateElement`) is in millimeters.

use crate::types::PageSpec;

/// A rectangle with a top-left origin
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// X position (left edge)
    pub x: f32,
    /// Y position (top edge)
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge x coordinate
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge y coordinate
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// What a card element draws
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// Text resolved from a record field
    Text,
    /// Literal text, identical on every card
    StaticText,
    /// Image whose path or URL comes from the binding
    Image,
    /// Decoration that only shapes the card bounds
    Frame,
}

/// Where an element's content comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    /// Value of the named record field
    Field(String),
    /// Fixed value
    Literal(String),
}

/// One positioned element of the card template, in editor pixels
#[derive(Debug, Clone, PartialEq)]
pub struct CardElement {
    pub kind: ElementKind,
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    pub binding: Option<Binding>,
    /// Font size in points, when the editor set one
    pub font_size_pt: Option<f32>,
}

impl CardElement {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.left, self.top, self.width, self.height)
    }
}

/// The region card instances tile inside, in editor pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RepeaterArea {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    pub explicit_cols: Option<usize>,
    pub explicit_rows: Option<usize>,
}

/// A validated free-form layout.
///
/// Holds exactly one repeater area and at least one card element.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub page: PageSpec,
    pub elements: Vec<CardElement>,
    pub repeater: RepeaterArea,
}

/// Position within the slot grid (row, column)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPosition {
    /// Row index (0 = top row)
    pub row: usize,
    /// Column index (0 = leftmost column)
    pub col: usize,
}

impl GridPosition {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// One card instance's placement region on a page, in mm
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    pub rect: Rect,
    pub pos: GridPosition,
}

/// A card element positioned relative to the slot origin, in mm
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateElement {
    pub kind: ElementKind,
    pub binding: Option<Binding>,
    pub rect: Rect,
    pub font_size_pt: Option<f32>,
    /// Render the value as one bulleted line per item
    pub bullets: bool,
}

/// The drawable part of a card
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CardTemplate {
    pub elements: Vec<TemplateElement>,
}
