//! The immediate-mode widget entry points.
//!
//! Every widget call is the same composition: allocate an id, resolve a
//! rect from the layout engine, run the interaction state machine, enqueue
//! draw primitives for the computed state, advance the cursor.

use glam::{Vec2, Vec4, vec2};

use crate::{
    context::{Behavior, Interaction, UIContext},
    geom::Rect,
};

impl UIContext {
    fn fill_color(&self, interaction: Interaction) -> Vec4 {
        if interaction.held {
            self.theme.button_pressed
        } else if interaction.hovered {
            self.theme.button_hover
        } else {
            self.theme.button
        }
    }

    /// Draws static text in the next row cell.
    pub fn label(&mut self, text: &str) {
        let rect = self.row_item_rect().shrunk(self.theme.padding);
        self.place();
        if !rect.is_positive() {
            return;
        }
        let depth = self.depth();
        self.draw.push_text(
            text,
            rect,
            self.theme.text_size,
            self.theme.text,
            self.theme.text_centered,
            depth,
        );
    }

    /// A push button in the next row cell. Returns `true` on the frame it
    /// was clicked.
    pub fn button(&mut self, text: &str) -> bool {
        let id = self.next_id();
        let rect = self.row_item_rect().shrunk(self.theme.padding);
        let interaction = self.interact(id, rect, Behavior::Click);
        self.place();

        if rect.is_positive() {
            let fill = self.fill_color(interaction);
            let depth = self.depth();
            self.draw.push_rect(rect, depth, fill);
            self.draw
                .push_rect_outline(rect, 1.0, depth, self.theme.outline);
            self.draw.push_text(
                text,
                rect,
                self.theme.text_size,
                self.theme.text,
                self.theme.text_centered,
                depth,
            );
        }

        interaction.clicked
    }

    /// A checkbox with a trailing label. Toggles `checked` on click and
    /// returns `true` on the frame it changed.
    pub fn checkbox(&mut self, text: &str, checked: &mut bool) -> bool {
        let id = self.next_id();
        let rect = self.row_item_rect().shrunk(self.theme.padding);
        let interaction = self.interact(id, rect, Behavior::Click);
        self.place();

        if interaction.clicked {
            *checked = !*checked;
        }

        if rect.is_positive() {
            let depth = self.depth();
            let fill = self.fill_color(interaction);
            let box_rect = Rect::new(rect.pos, Vec2::splat(rect.size.y));
            self.draw.push_rect(box_rect, depth, fill);
            self.draw
                .push_rect_outline(box_rect, 1.0, depth, self.theme.outline);
            if *checked {
                self.draw
                    .push_rect(box_rect.shrunk(3.0), depth, self.theme.text);
            }
            let label_rect = Rect::new(
                vec2(box_rect.max().x + self.theme.padding, rect.pos.y),
                vec2(
                    rect.size.x - box_rect.size.x - self.theme.padding,
                    rect.size.y,
                ),
            );
            self.draw.push_text(
                text,
                label_rect,
                self.theme.text_size,
                self.theme.text,
                false,
                depth,
            );
        }

        interaction.clicked
    }

    /// A horizontal slider bound to `value` over `[min, max]`. Returns
    /// `true` on frames the value changed.
    pub fn slider(&mut self, value: &mut f32, min: f32, max: f32) -> bool {
        let id = self.next_id();
        let rect = self.row_item_rect().shrunk(self.theme.padding);
        let interaction = self.interact(id, rect, Behavior::Grab);
        self.place();

        let mut changed = false;
        if interaction.dragged && rect.size.x > 0.0 {
            let t = ((self.pointer().position.x - rect.pos.x) / rect.size.x).clamp(0.0, 1.0);
            let next = min + t * (max - min);
            if next != *value {
                *value = next;
                changed = true;
            }
        }
        *value = value.clamp(min, max);

        if rect.is_positive() {
            let depth = self.depth();
            self.draw.push_rect(rect, depth, self.theme.background);
            self.draw
                .push_rect_outline(rect, 1.0, depth, self.theme.outline);

            let span = max - min;
            let t = if span > 0.0 { (*value - min) / span } else { 0.0 };
            let knob_w = (rect.size.y * 0.6).min(rect.size.x);
            let knob = Rect::new(
                vec2(rect.pos.x + t * (rect.size.x - knob_w), rect.pos.y),
                vec2(knob_w, rect.size.y),
            );
            let fill = self.fill_color(interaction);
            self.draw.push_rect(knob, depth, fill);
        }

        changed
    }

    /// A free-positioned drag handle. While captured, returns the origin
    /// the dragged rect should move to; the caller owns the position and
    /// applies the delta itself.
    pub fn grab_handle(&mut self, rect: Rect) -> Option<Vec2> {
        let id = self.next_id();
        let interaction = self.interact(id, rect, Behavior::Grab);
        self.place_at(rect);

        if rect.is_positive() {
            let depth = self.depth();
            let fill = self.fill_color(interaction);
            self.draw.push_rect(rect, depth, fill);
        }

        interaction.dragged.then(|| self.drag_position())
    }

    /// Begins a plain panel: lays out and draws its background and outline.
    pub fn panel(&mut self, rect: Rect) {
        self.begin_panel(rect);
        if rect.is_positive() {
            let depth = self.depth();
            self.draw.push_rect(rect, depth, self.theme.background);
            self.draw
                .push_rect_outline(rect, 1.0, depth, self.theme.outline);
        }
    }

    /// Begins a titled window panel with a draggable header strip.
    ///
    /// While the header is being dragged, returns the origin the host
    /// should move the window to next frame; the core never owns the
    /// window position.
    pub fn window(&mut self, title: &str, rect: Rect) -> Option<Vec2> {
        self.panel(rect);

        let header_height = self.theme.text_size + self.theme.padding * 2.0;
        let header = Rect::new(rect.pos, vec2(rect.size.x, header_height));

        let id = self.next_id();
        let interaction = self.interact(id, header, Behavior::Grab);
        self.place_at(header);

        if header.is_positive() {
            let depth = self.depth();
            let fill = self.fill_color(interaction);
            self.draw.push_rect(header, depth, fill);
            self.draw.push_text(
                title,
                header.shrunk(self.theme.padding),
                self.theme.text_size,
                self.theme.text,
                self.theme.text_centered,
                depth,
            );
        }

        // The header occupies vertical space: rows start below it and the
        // panel cannot be resized smaller than it.
        self.min_rect.size.y += header_height;

        interaction.dragged.then(|| self.drag_position())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        draw::{MonoMetrics, Shape},
        input::PointerState,
        theme::Theme,
    };
    use glam::vec2;

    fn ctx() -> UIContext {
        UIContext::new(Theme::default(), Box::new(MonoMetrics::default()))
    }

    fn rect_shapes(ui: &UIContext) -> Vec<Rect> {
        ui.draw_list()
            .shapes()
            .iter()
            .filter_map(|s| match s {
                Shape::Rect { rect, .. } => Some(*rect),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_three_buttons_fill_a_row() {
        let mut ui = ctx();
        let padding = ui.theme.padding;
        ui.begin_frame(PointerState::default());
        ui.begin_panel(Rect::new(vec2(0.0, 0.0), vec2(400.0, 600.0)));
        ui.begin_row(3, 48.0, 100.0);
        ui.button("A");
        ui.button("B");
        ui.button("C");

        let rects = rect_shapes(&ui);
        assert_eq!(rects.len(), 3);
        let third = 400.0 / 3.0;
        for (i, rect) in rects.iter().enumerate() {
            assert_eq!(rect.pos, vec2(i as f32 * third + padding, padding));
            assert_eq!(rect.size, vec2(third - padding * 2.0, 48.0 - padding * 2.0));
        }
    }

    #[test]
    fn test_button_click_through_the_api() {
        let mut ui = ctx();
        let mut clicks = 0;
        let frames = [
            (vec2(30.0, 20.0), false),
            (vec2(30.0, 20.0), true),
            (vec2(30.0, 20.0), false),
            (vec2(30.0, 20.0), false),
        ];
        for (pos, down) in frames {
            ui.begin_frame(PointerState::new(pos, down));
            ui.begin_panel(Rect::new(vec2(0.0, 0.0), vec2(200.0, 100.0)));
            ui.begin_row(1, 40.0, 0.0);
            if ui.button("Press me") {
                clicks += 1;
            }
            ui.draw.clear();
        }
        assert_eq!(clicks, 1);
    }

    #[test]
    fn test_checkbox_toggles_on_click() {
        let mut ui = ctx();
        let mut checked = false;
        let frames = [
            (vec2(10.0, 10.0), false),
            (vec2(10.0, 10.0), true),
            (vec2(10.0, 10.0), false),
        ];
        for (pos, down) in frames {
            ui.begin_frame(PointerState::new(pos, down));
            ui.begin_panel(Rect::new(vec2(0.0, 0.0), vec2(200.0, 100.0)));
            ui.begin_row(1, 24.0, 0.0);
            ui.checkbox("enabled", &mut checked);
            ui.draw.clear();
        }
        assert!(checked);
    }

    #[test]
    fn test_slider_tracks_the_pointer() {
        let mut ui = ctx();
        let mut value = 0.0f32;
        let mut changed_frames = 0;
        // Track rect is (4, 4) to (96, 16): x = 50 is its midpoint.
        let frames = [
            (vec2(50.0, 10.0), false),
            (vec2(50.0, 10.0), true),
            (vec2(96.0, 10.0), true),
        ];
        for (pos, down) in frames {
            ui.begin_frame(PointerState::new(pos, down));
            ui.begin_panel(Rect::new(vec2(0.0, 0.0), vec2(100.0, 40.0)));
            ui.begin_row(1, 20.0, 0.0);
            if ui.slider(&mut value, 0.0, 1.0) {
                changed_frames += 1;
            }
            ui.draw.clear();
        }
        assert_eq!(changed_frames, 2);
        assert_eq!(value, 1.0);
    }

    #[test]
    fn test_grab_handle_reports_drag_origin() {
        let handle = Rect::new(vec2(30.0, 20.0), vec2(16.0, 16.0));
        let mut ui = ctx();
        let mut reported = None;
        let frames = [
            (vec2(34.0, 25.0), false),
            (vec2(34.0, 25.0), true),
            (vec2(134.0, 75.0), true),
        ];
        for (pos, down) in frames {
            ui.begin_frame(PointerState::new(pos, down));
            reported = ui.grab_handle(handle);
            ui.draw.clear();
        }
        // Origin follows the pointer with the press offset preserved.
        assert_eq!(reported, Some(vec2(130.0, 70.0)));
    }

    #[test]
    fn test_window_header_reserves_space() {
        let mut ui = ctx();
        ui.begin_frame(PointerState::default());
        let rect = Rect::new(vec2(20.0, 20.0), vec2(300.0, 200.0));
        let drag = ui.window("Tools", rect);
        assert_eq!(drag, None);

        let header_height = ui.theme.text_size + ui.theme.padding * 2.0;
        assert_eq!(ui.min_rect().size.y, header_height);

        // The first row lands below the header.
        ui.begin_row(1, 30.0, 0.0);
        assert_eq!(ui.row_item_rect().pos, vec2(20.0, 20.0 + header_height));
    }

    #[test]
    fn test_degenerate_cell_skips_drawing_but_advances() {
        let mut ui = ctx();
        ui.begin_frame(PointerState::default());
        ui.begin_panel(Rect::new(vec2(0.0, 0.0), vec2(6.0, 100.0)));
        // Cell shrunk by padding collapses to a non-positive rect.
        ui.begin_row(1, 6.0, 0.0);
        ui.button("X");
        assert!(ui.draw_list().is_empty());
        assert_eq!(ui.prev_item_rect().size, vec2(6.0, 6.0));
    }
}
