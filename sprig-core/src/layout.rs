//! Row-based layout cursor for panels built strictly top to bottom.
//!
//! A panel declares rows; each row splits the panel width into a fixed
//! number of items of a fixed height. Placing a widget advances the
//! cursor rightward by one item; declaring the next row returns the
//! cursor to the panel's left edge and drops it below everything placed
//! so far.

use glam::{Vec2, vec2};

use crate::{context::UIContext, geom::Rect};

/// The current placement cursor and the active row's sizing rules.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LayoutCursor {
    /// Top-left corner of the next item.
    pub at: Vec2,
    /// Size of each item in the active row.
    pub item_size: Vec2,
    /// Cursor delta applied after each placed item.
    pub advance: Vec2,
}

impl UIContext {
    /// Starts laying out a panel covering `rect`. Resets the cursor to the
    /// panel origin and the accumulated minimum bounding rect to zero.
    pub fn begin_panel(&mut self, rect: Rect) {
        self.panel = rect;
        self.cursor = LayoutCursor {
            at: rect.pos,
            item_size: Vec2::ZERO,
            advance: Vec2::ZERO,
        };
        self.min_rect = Rect::new(rect.pos, Vec2::ZERO);
        self.prev_item_rect = Rect::new(rect.pos, Vec2::ZERO);
    }

    /// Declares a row of `items` equally wide cells of the given height.
    ///
    /// The row's height accumulates into the panel's minimum bounding rect
    /// even if no widget is ever placed in it, and `min_width` raises the
    /// minimum width the host should clamp panel resizing to.
    pub fn begin_row(&mut self, items: u32, height: f32, min_width: f32) {
        let items = if items == 0 {
            log::warn!("begin_row called with zero items; clamping to one");
            1
        } else {
            items
        };

        self.cursor.at = vec2(
            self.panel.pos.x,
            self.panel.pos.y + self.min_rect.size.y,
        );
        self.cursor.item_size = vec2(self.panel.size.x / items as f32, height);
        self.cursor.advance = vec2(self.cursor.item_size.x, 0.0);

        self.min_rect.size.y += height;
        self.min_rect.size.x = self.min_rect.size.x.max(min_width);
    }

    /// The cell the next placed widget will occupy.
    pub fn row_item_rect(&self) -> Rect {
        Rect::new(self.cursor.at, self.cursor.item_size)
    }

    /// Records the current cell as the previous item rect and advances the
    /// cursor by the row's delta. Returns the cell that was placed.
    pub fn place(&mut self) -> Rect {
        let rect = self.row_item_rect();
        self.prev_item_rect = rect;
        self.cursor.at += self.cursor.advance;
        rect
    }

    /// Records an explicitly positioned widget (such as a grab handle)
    /// without advancing the row cursor.
    pub(crate) fn place_at(&mut self, rect: Rect) {
        self.prev_item_rect = rect;
    }

    /// The accumulated minimum bounding rect of the panel built this frame.
    /// Hosts clamp panel resizing against it.
    pub fn min_rect(&self) -> Rect {
        self.min_rect
    }

    /// The rect recorded by the most recent placement.
    pub fn prev_item_rect(&self) -> Rect {
        self.prev_item_rect
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{draw::MonoMetrics, input::PointerState, theme::Theme};
    use glam::vec2;

    fn ctx() -> UIContext {
        UIContext::new(Theme::default(), Box::new(MonoMetrics::default()))
    }

    #[test]
    fn test_row_accumulation_without_placements() {
        let mut ui = ctx();
        ui.begin_frame(PointerState::default());
        ui.begin_panel(Rect::new(vec2(0.0, 0.0), vec2(400.0, 600.0)));

        let heights = [48.0, 32.0, 20.0];
        let mut prefix = 0.0;
        for h in heights {
            ui.begin_row(1, h, 150.0);
            // Each row starts at the prefix sum of the preceding heights.
            assert_eq!(ui.row_item_rect().pos.y, prefix);
            prefix += h;
        }
        assert_eq!(ui.min_rect().size.y, 48.0 + 32.0 + 20.0);
        assert_eq!(ui.min_rect().size.x, 150.0);
    }

    #[test]
    fn test_three_items_split_the_panel_width() {
        let mut ui = ctx();
        ui.begin_frame(PointerState::default());
        ui.begin_panel(Rect::new(vec2(0.0, 0.0), vec2(400.0, 600.0)));
        ui.begin_row(3, 48.0, 100.0);

        let third = 400.0 / 3.0;
        for i in 0..3 {
            let cell = ui.place();
            assert_eq!(cell.pos, vec2(i as f32 * third, 0.0));
            assert_eq!(cell.size, vec2(third, 48.0));
            assert_eq!(ui.prev_item_rect(), cell);
        }
    }

    #[test]
    fn test_new_row_returns_to_left_edge() {
        let mut ui = ctx();
        ui.begin_frame(PointerState::default());
        ui.begin_panel(Rect::new(vec2(50.0, 10.0), vec2(200.0, 400.0)));

        ui.begin_row(2, 30.0, 0.0);
        ui.place();
        ui.place();
        ui.begin_row(2, 30.0, 0.0);
        assert_eq!(ui.row_item_rect().pos, vec2(50.0, 40.0));
    }

    #[test]
    fn test_zero_items_is_clamped_not_fatal() {
        let mut ui = ctx();
        ui.begin_frame(PointerState::default());
        ui.begin_panel(Rect::new(vec2(0.0, 0.0), vec2(120.0, 100.0)));
        ui.begin_row(0, 24.0, 0.0);
        assert_eq!(ui.row_item_rect().size, vec2(120.0, 24.0));
    }
}
