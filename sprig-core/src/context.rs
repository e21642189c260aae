//! The immediate-mode UI context: widget identity, hot/active interaction
//! state and the per-frame lifecycle.
//!
//! Widgets do not persist between frames. The only state that survives a
//! frame is the `hot` and `active` widget id plus the grab offset; every
//! widget call recomputes its own interaction result from those by
//! allocating the same id it got last frame (identity is call order).

use glam::Vec2;

use crate::{
    draw::{DrawList, PaintTarget, TextMetrics},
    geom::Rect,
    input::PointerState,
    layout::LayoutCursor,
    theme::Theme,
};

/// Identity of a widget invocation within a frame.
///
/// Ids are handed out in call order from a per-frame counter, so a widget
/// is "the Nth interactive call this frame". Reordering or conditionally
/// skipping calls therefore shifts identity across frames; callers that
/// hide widgets some frames get shifted hot/active tracking for the calls
/// after them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WidgetId(pub(crate) u32);

impl WidgetId {
    /// The null sentinel: no widget.
    pub const NONE: WidgetId = WidgetId(0);

    /// Returns `true` if this is the null sentinel.
    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }
}

/// Per-widget interaction result, recomputed every frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Interaction {
    /// The pointer is over the widget and nothing else holds capture.
    pub hovered: bool,
    /// The widget was pressed and released while hovered.
    pub clicked: bool,
    /// The widget holds capture (press happened on it, release not yet seen).
    pub held: bool,
    /// The widget is a grab-style widget currently being dragged.
    pub dragged: bool,
}

/// How a widget holds capture between press and release.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Behavior {
    /// Reports a click only when the release happens while still hovered.
    Click,
    /// Reports a continuous drag while captured, even when the pointer
    /// leaves the widget's rect.
    Grab,
}

/// Explicit, instance-owned state for one immediate-mode UI.
///
/// Constructed once at startup, reset once per frame via
/// [`UIContext::begin_frame`], mutated by every widget call, and flushed
/// by [`UIContext::render`]. The whole context belongs to the UI-update
/// phase of a single frame; there is no cross-frame pipelining.
pub struct UIContext {
    pub theme: Theme,
    metrics: Box<dyn TextMetrics>,

    hot: WidgetId,
    active: WidgetId,
    current_max_id: u32,

    pointer: PointerState,
    pointer_was_down: bool,
    pointer_pressed: bool,
    pointer_released: bool,
    grab_offset: Vec2,

    depth: f32,
    pub(crate) cursor: LayoutCursor,
    pub(crate) panel: Rect,
    pub(crate) min_rect: Rect,
    pub(crate) prev_item_rect: Rect,
    pub(crate) draw: DrawList,
}

impl UIContext {
    /// Creates a new context with the given theme and text measurement
    /// collaborator.
    pub fn new(theme: Theme, metrics: Box<dyn TextMetrics>) -> Self {
        Self {
            theme,
            metrics,
            hot: WidgetId::NONE,
            active: WidgetId::NONE,
            current_max_id: WidgetId::NONE.0,
            pointer: PointerState::default(),
            pointer_was_down: false,
            pointer_pressed: false,
            pointer_released: false,
            grab_offset: Vec2::ZERO,
            depth: 0.0,
            cursor: LayoutCursor::default(),
            panel: Rect::default(),
            min_rect: Rect::default(),
            prev_item_rect: Rect::default(),
            draw: DrawList::new(),
        }
    }

    /// Starts a new frame: resets widget ids, the layout cursor and the
    /// per-frame counters, and derives press/release edges from the
    /// previous frame's button level.
    pub fn begin_frame(&mut self, pointer: PointerState) {
        self.pointer_pressed = pointer.down && !self.pointer_was_down;
        self.pointer_released = !pointer.down && self.pointer_was_down;
        self.pointer_was_down = pointer.down;
        self.pointer = pointer;

        self.current_max_id = WidgetId::NONE.0;
        self.cursor = LayoutCursor::default();
        self.panel = Rect::default();
        self.min_rect = Rect::default();
        self.prev_item_rect = Rect::default();
    }

    /// Hands the finished shape batch to the renderer and clears it.
    ///
    /// Also drops hot/active ids that were never allocated this frame: a
    /// widget whose call vanished can no longer clear itself, and must
    /// not hold capture forever.
    pub fn render(&mut self, target: &mut impl PaintTarget) {
        if self.hot.0 > self.current_max_id {
            self.hot = WidgetId::NONE;
        }
        if self.active.0 > self.current_max_id {
            log::debug!("active widget {} vanished this frame", self.active.0);
            self.active = WidgetId::NONE;
        }
        target.submit(self.draw.shapes());
        self.draw.clear();
    }

    /// Allocates the next widget id for this frame.
    ///
    /// Must be called exactly once per interactive widget invocation,
    /// before that widget touches hot/active state.
    pub fn next_id(&mut self) -> WidgetId {
        self.current_max_id += 1;
        WidgetId(self.current_max_id)
    }

    /// Runs the interaction state machine for a widget occupying `rect`.
    pub fn interact(&mut self, id: WidgetId, rect: Rect, behavior: Behavior) -> Interaction {
        let inside = rect.contains(self.pointer.position);
        let mut clicked = false;
        let mut dragged = false;

        if self.active == id {
            match behavior {
                Behavior::Click => {
                    if self.pointer_released {
                        // Release must happen while still hovering to count.
                        clicked = self.hot == id;
                        self.active = WidgetId::NONE;
                    }
                }
                Behavior::Grab => {
                    // Drag continues even if the pointer left the rect.
                    dragged = true;
                    if self.pointer_released {
                        self.active = WidgetId::NONE;
                    }
                }
            }
        } else if self.hot == id && self.pointer_pressed {
            self.active = id;
            if behavior == Behavior::Grab {
                // Snapshot the offset between the rect origin and the press
                // position so the dragged rect does not snap to the pointer.
                self.grab_offset = rect.pos - self.pointer.position;
                dragged = true;
            }
        }

        if inside {
            // Never steal hotness from another captured widget; the captured
            // widget itself may re-acquire it after the pointer returns.
            if self.active.is_none() || self.active == id {
                self.hot = id;
            }
        } else if self.hot == id {
            self.hot = WidgetId::NONE;
        }

        Interaction {
            hovered: self.hot == id,
            clicked,
            held: self.active == id,
            dragged,
        }
    }

    /// Returns the origin a grab-style widget should be moved to this
    /// frame: the pointer position plus the offset snapshot taken at
    /// press time.
    pub fn drag_position(&self) -> Vec2 {
        self.pointer.position + self.grab_offset
    }

    /// The widget currently eligible to receive a press.
    pub fn hot(&self) -> WidgetId {
        self.hot
    }

    /// The widget currently holding capture.
    pub fn active(&self) -> WidgetId {
        self.active
    }

    /// This frame's pointer snapshot.
    pub fn pointer(&self) -> PointerState {
        self.pointer
    }

    /// Measures text via the context's measurement collaborator.
    pub fn measure(&self, text: &str, size: f32) -> Vec2 {
        self.metrics.measure(text, size)
    }

    /// Sets the depth written into subsequently pushed shapes.
    pub fn set_depth(&mut self, depth: f32) {
        self.depth = depth;
    }

    /// The depth written into subsequently pushed shapes.
    pub fn depth(&self) -> f32 {
        self.depth
    }

    /// Read access to this frame's shape batch.
    pub fn draw_list(&self) -> &DrawList {
        &self.draw
    }
}
