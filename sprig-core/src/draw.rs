//! The per-frame draw primitive batch and the collaborator traits that
//! consume it.
//!
//! Widget calls append shapes during the frame; the host's renderer takes
//! the whole batch once per frame and rasterizes it. Submission order is
//! paint order for shapes sharing a depth value.

use glam::{Vec2, Vec4, vec2};

use crate::geom::Rect;

/// A single draw primitive.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        depth: f32,
        color: Vec4,
    },
    Rect {
        rect: Rect,
        depth: f32,
        color: Vec4,
    },
    TexturedRect {
        rect: Rect,
        uv: [Vec2; 2],
        depth: f32,
        tint: Vec4,
    },
    Polygon {
        points: Vec<Vec2>,
        depth: f32,
        color: Vec4,
    },
    Text {
        text: String,
        rect: Rect,
        size: f32,
        color: Vec4,
        centered: bool,
        depth: f32,
    },
}

/// Ordered batch of shapes built during widget calls and handed to the
/// renderer once per frame.
///
/// The backing store grows on demand; [`DrawList::clear`] keeps the
/// allocation so steady-state frames never touch the heap. Degenerate
/// geometry (non-positive rects, polygons with fewer than three points)
/// is skipped at push time without drawing.
#[derive(Default)]
pub struct DrawList {
    shapes: Vec<Shape>,
}

impl DrawList {
    /// Creates an empty draw list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the shapes submitted so far, in paint order.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Returns the number of shapes in the batch.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Returns `true` if nothing has been submitted this frame.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Clears the batch for the next frame, keeping its capacity.
    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    /// Appends a line segment.
    pub fn push_line(&mut self, from: Vec2, to: Vec2, width: f32, depth: f32, color: Vec4) {
        if width <= 0.0 {
            return;
        }
        self.shapes.push(Shape::Line {
            from,
            to,
            width,
            depth,
            color,
        });
    }

    /// Appends a filled rectangle. Non-positive rects are skipped.
    pub fn push_rect(&mut self, rect: Rect, depth: f32, color: Vec4) {
        if !rect.is_positive() {
            return;
        }
        self.shapes.push(Shape::Rect { rect, depth, color });
    }

    /// Appends the four edges of a rectangle as lines. Non-positive rects
    /// are skipped.
    pub fn push_rect_outline(&mut self, rect: Rect, width: f32, depth: f32, color: Vec4) {
        if !rect.is_positive() {
            return;
        }
        let min = rect.min();
        let max = rect.max();
        self.push_line(min, vec2(max.x, min.y), width, depth, color);
        self.push_line(vec2(max.x, min.y), max, width, depth, color);
        self.push_line(max, vec2(min.x, max.y), width, depth, color);
        self.push_line(vec2(min.x, max.y), min, width, depth, color);
    }

    /// Appends a textured rectangle. Non-positive rects are skipped.
    pub fn push_textured_rect(&mut self, rect: Rect, uv: [Vec2; 2], depth: f32, tint: Vec4) {
        if !rect.is_positive() {
            return;
        }
        self.shapes.push(Shape::TexturedRect {
            rect,
            uv,
            depth,
            tint,
        });
    }

    /// Appends a filled convex polygon. Polygons with fewer than three
    /// points are skipped.
    pub fn push_polygon(&mut self, points: Vec<Vec2>, depth: f32, color: Vec4) {
        if points.len() < 3 {
            return;
        }
        self.shapes.push(Shape::Polygon {
            points,
            depth,
            color,
        });
    }

    /// Appends a text draw request. Empty strings and non-positive
    /// destination rects are skipped.
    pub fn push_text(
        &mut self,
        text: &str,
        rect: Rect,
        size: f32,
        color: Vec4,
        centered: bool,
        depth: f32,
    ) {
        if text.is_empty() || !rect.is_positive() {
            return;
        }
        self.shapes.push(Shape::Text {
            text: text.to_string(),
            rect,
            size,
            color,
            centered,
            depth,
        });
    }
}

/// Renderer collaborator: receives the finished shape batch once per frame.
pub trait PaintTarget {
    /// Consumes the batch in paint order.
    fn submit(&mut self, shapes: &[Shape]);
}

/// Text measurement collaborator: sizes a string before any drawing occurs.
pub trait TextMetrics {
    /// Returns the rendered width and height of `text` at the given size.
    fn measure(&self, text: &str, size: f32) -> Vec2;
}

/// Fixed-aspect metrics for monospaced bitmap fonts.
///
/// `aspect` is the glyph width over the glyph height; the default matches
/// a 7x12 pixel glyph cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonoMetrics {
    pub aspect: f32,
}

impl Default for MonoMetrics {
    fn default() -> Self {
        Self { aspect: 7.0 / 12.0 }
    }
}

impl TextMetrics for MonoMetrics {
    fn measure(&self, text: &str, size: f32) -> Vec2 {
        let mut lines = 0usize;
        let mut max_chars = 0usize;
        for line in text.split('\n') {
            lines += 1;
            max_chars = max_chars.max(line.chars().count());
        }
        vec2(max_chars as f32 * size * self.aspect, lines as f32 * size)
    }
}
