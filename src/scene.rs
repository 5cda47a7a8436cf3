//! Drawable description of a game frame.
//!
//! Games build a [`Scene`] in their own logical units (pixels for the
//! continuous games, cells for the grid games); `ui::canvas` scales it to
//! whatever terminal area is available.

use ratatui::style::Color;

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Filled rectangle, top-left anchored.
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Color,
    },
    Circle {
        cx: f32,
        cy: f32,
        r: f32,
        color: Color,
    },
    /// One cell of a grid scene. `col`/`row` are in scene units.
    Cell {
        col: u16,
        row: u16,
        color: Color,
        label: Option<String>,
        highlight: bool,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct HudItem {
    pub label: String,
    pub value: String,
    pub color: Color,
}

impl HudItem {
    pub fn new(label: impl Into<String>, value: impl ToString, color: Color) -> Self {
        Self {
            label: label.into(),
            value: value.to_string(),
            color,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Neutral,
    Good,
    Bad,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Banner {
    pub title: String,
    pub subtitle: String,
    pub tone: Tone,
}

impl Banner {
    pub fn new(title: impl Into<String>, subtitle: impl Into<String>, tone: Tone) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
            tone,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: f32,
    pub height: f32,
    pub background: Color,
    pub shapes: Vec<Shape>,
    pub hud: Vec<HudItem>,
    pub banner: Option<Banner>,
    pub help: &'static str,
}

impl Scene {
    pub fn new(width: f32, height: f32, background: Color) -> Self {
        Self {
            width,
            height,
            background,
            shapes: Vec::new(),
            hud: Vec::new(),
            banner: None,
            help: "",
        }
    }

    pub fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.shapes.push(Shape::Rect { x, y, w, h, color });
    }

    pub fn circle(&mut self, cx: f32, cy: f32, r: f32, color: Color) {
        self.shapes.push(Shape::Circle { cx, cy, r, color });
    }

    pub fn cell(
        &mut self,
        col: u16,
        row: u16,
        color: Color,
        label: Option<String>,
        highlight: bool,
    ) {
        self.shapes.push(Shape::Cell {
            col,
            row,
            color,
            label,
            highlight,
        });
    }

    pub fn hud(&mut self, label: impl Into<String>, value: impl ToString, color: Color) {
        self.hud.push(HudItem::new(label, value, color));
    }

    pub fn banner(&mut self, title: impl Into<String>, subtitle: impl Into<String>, tone: Tone) {
        self.banner = Some(Banner::new(title, subtitle, tone));
    }
}
