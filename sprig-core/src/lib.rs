//! The core of the Sprig UI toolkit. This crate contains the platform-free
//! immediate-mode machinery: widget identity and hot/active interaction
//! tracking, the row layout engine, the semantic-sizing widget tree, the
//! per-frame draw batch and the widget entry points.
//!
//! Windowing, input polling, rasterization and text shaping live with the
//! host; the core talks to them through [`PointerState`], [`PaintTarget`]
//! and [`TextMetrics`] once per frame. The whole context is single
//! threaded and frame synchronous: reset, widget calls, render, repeat.

pub mod context;
pub mod draw;
pub mod geom;
pub mod input;
pub mod layout;
pub mod theme;
pub mod tree;
pub mod widgets;

pub use context::{Behavior, Interaction, UIContext, WidgetId};
pub use draw::{DrawList, MonoMetrics, PaintTarget, Shape, TextMetrics};
pub use geom::Rect;
pub use input::PointerState;
pub use layout::LayoutCursor;
pub use theme::Theme;
pub use tree::{Node, NodeDesc, NodeFlags, Size, SizeKind, WidgetTree};
