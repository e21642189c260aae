//! Retained widget tree with semantic sizing.
//!
//! The tree variant keeps a hierarchy for one frame: hosts rebuild it
//! every frame, but the nodes live in an array-backed arena whose slots
//! are recycled in place (child lists cleared, never freed), so
//! steady-state frames allocate nothing. Sizes are declared semantically
//! per axis and resolved to concrete rects by three ordered passes.

use glam::Vec2;

use crate::{
    context::{Behavior, Interaction, UIContext},
    draw::{DrawList, TextMetrics},
    geom::Rect,
    theme::Theme,
};

/// Sentinel index for "no node".
pub const NIL: u32 = u32::MAX;

/// Horizontal axis index into per-axis arrays.
pub const AXIS_X: usize = 0;
/// Vertical axis index into per-axis arrays.
pub const AXIS_Y: usize = 1;

/// How one axis of a node's size is determined.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SizeKind {
    /// Unsized; left untouched by the resolver.
    #[default]
    Null,
    /// A fixed pixel value.
    Pixels,
    /// The measured size of the node's text.
    TextContent,
    /// A fraction of the parent's resolved size.
    PercentOfParent,
    /// The sum of the children's resolved sizes.
    ChildrenSum,
}

/// Semantic size for one axis.
///
/// `strictness` records how unwilling the node is to give this size up
/// when space runs out; it is carried for hosts and future conflict
/// resolution and is not consumed by the resolver.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub kind: SizeKind,
    pub value: f32,
    pub strictness: f32,
}

impl Size {
    /// A fixed size in pixels.
    pub fn pixels(value: f32) -> Self {
        Self {
            kind: SizeKind::Pixels,
            value,
            strictness: 1.0,
        }
    }

    /// Sized to fit the node's text.
    pub fn text() -> Self {
        Self {
            kind: SizeKind::TextContent,
            value: 0.0,
            strictness: 1.0,
        }
    }

    /// A fraction of the parent's size on the same axis.
    pub fn percent(fraction: f32) -> Self {
        Self {
            kind: SizeKind::PercentOfParent,
            value: fraction,
            strictness: 0.0,
        }
    }

    /// The sum of the children's sizes on the same axis.
    pub fn children_sum() -> Self {
        Self {
            kind: SizeKind::ChildrenSum,
            value: 0.0,
            strictness: 0.0,
        }
    }
}

/// Per-node draw and interaction switches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NodeFlags {
    pub clickable: bool,
    pub draw_background: bool,
    pub draw_border: bool,
    pub draw_text: bool,
    /// Recorded for hosts; the core does not implement scrolling.
    pub scrollable: bool,
}

/// Declarative description of a node handed to [`WidgetTree::add_child`].
#[derive(Clone, Copy, Debug)]
pub struct NodeDesc<'a> {
    pub width: Size,
    pub height: Size,
    /// Per-axis factor by which this node advances its parent's layout
    /// cursor; the default flows children top to bottom.
    pub advance: [f32; 2],
    pub flags: NodeFlags,
    pub text: &'a str,
}

impl Default for NodeDesc<'_> {
    fn default() -> Self {
        Self {
            width: Size::default(),
            height: Size::default(),
            advance: [0.0, 1.0],
            flags: NodeFlags::default(),
            text: "",
        }
    }
}

/// One widget record in the arena.
#[derive(Clone, Debug)]
pub struct Node {
    pub semantic_size: [Size; 2],
    pub advance: [f32; 2],
    pub flags: NodeFlags,
    pub text: String,
    pub rect: Rect,
    pub interaction: Interaction,
    parent: u32,
    children: Vec<u32>,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            semantic_size: [Size::default(); 2],
            advance: [0.0, 1.0],
            flags: NodeFlags::default(),
            text: String::new(),
            rect: Rect::default(),
            interaction: Interaction::default(),
            parent: NIL,
            children: Vec::new(),
        }
    }
}

impl Node {
    /// The node's parent index, or [`NIL`] for the root.
    pub fn parent(&self) -> u32 {
        self.parent
    }

    /// The node's children, in declaration order.
    pub fn children(&self) -> &[u32] {
        &self.children
    }
}

/// Arena-backed widget tree rebuilt once per frame.
#[derive(Default)]
pub struct WidgetTree {
    nodes: Vec<Node>,
    live: usize,
    root: u32,
}

impl WidgetTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            live: 0,
            root: NIL,
        }
    }

    /// Starts a new frame with a root node covering `viewport`. Previously
    /// live slots are recycled in place.
    pub fn begin(&mut self, viewport: Rect) -> u32 {
        for node in &mut self.nodes[..self.live] {
            node.children.clear();
        }
        self.live = 0;

        let root = self.alloc();
        let node = &mut self.nodes[root as usize];
        node.semantic_size = [
            Size::pixels(viewport.size.x),
            Size::pixels(viewport.size.y),
        ];
        node.rect = viewport;
        self.root = root;
        root
    }

    fn alloc(&mut self) -> u32 {
        if self.live < self.nodes.len() {
            // Recycle the slot: reset everything but keep the child list's
            // allocation (it was cleared in `begin`).
            let node = &mut self.nodes[self.live];
            node.semantic_size = [Size::default(); 2];
            node.advance = [0.0, 1.0];
            node.flags = NodeFlags::default();
            node.text.clear();
            node.rect = Rect::default();
            node.interaction = Interaction::default();
            node.parent = NIL;
        } else {
            self.nodes.push(Node::default());
        }
        let idx = self.live as u32;
        self.live += 1;
        idx
    }

    /// Adds a child node under `parent`. Rejects indices that are not live
    /// this frame.
    pub fn add_child(&mut self, parent: u32, desc: NodeDesc) -> Result<u32, String> {
        if parent as usize >= self.live {
            return Err(format!("invalid parent node index {parent}"));
        }
        let idx = self.alloc();
        let node = &mut self.nodes[idx as usize];
        node.semantic_size = [desc.width, desc.height];
        node.advance = desc.advance;
        node.flags = desc.flags;
        node.text.push_str(desc.text);
        node.parent = parent;
        self.nodes[parent as usize].children.push(idx);
        Ok(idx)
    }

    /// The root node index of the current frame, or [`NIL`] before the
    /// first [`WidgetTree::begin`].
    pub fn root(&self) -> u32 {
        self.root
    }

    /// The number of live nodes this frame.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Returns `true` if no nodes are live this frame.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Returns the node at `idx` if it is live this frame.
    pub fn node(&self, idx: u32) -> Option<&Node> {
        if (idx as usize) < self.live {
            self.nodes.get(idx as usize)
        } else {
            None
        }
    }

    /// Resolves every node's rect in three ordered passes: static sizes,
    /// percent-of-parent (top-down), children-sum (bottom-up).
    pub fn resolve(&mut self, metrics: &dyn TextMetrics, text_size: f32) {
        if self.root == NIL {
            return;
        }
        self.resolve_static(self.root, metrics, text_size);
        self.resolve_percent(self.root);
        self.resolve_children_sum(self.root);
    }

    /// Static pass: fixed and text-fit sizes, and positions for every
    /// child from the parent's running layout cursor. Axes that resolve in
    /// a later pass contribute their current size (zero) to the advance.
    fn resolve_static(&mut self, idx: u32, metrics: &dyn TextMetrics, text_size: f32) {
        let origin = self.nodes[idx as usize].rect.pos;
        let mut cursor = Vec2::ZERO;

        for i in 0..self.nodes[idx as usize].children.len() {
            let child = self.nodes[idx as usize].children[i];
            let measured = {
                let node = &self.nodes[child as usize];
                match (
                    node.semantic_size[AXIS_X].kind,
                    node.semantic_size[AXIS_Y].kind,
                ) {
                    (SizeKind::TextContent, _) | (_, SizeKind::TextContent) => {
                        metrics.measure(&node.text, text_size)
                    }
                    _ => Vec2::ZERO,
                }
            };

            let node = &mut self.nodes[child as usize];
            for axis in 0..2 {
                match node.semantic_size[axis].kind {
                    SizeKind::Pixels => node.rect.size[axis] = node.semantic_size[axis].value,
                    SizeKind::TextContent => node.rect.size[axis] = measured[axis],
                    _ => {}
                }
            }
            node.rect.pos = origin + cursor;
            cursor.x += node.rect.size.x * node.advance[AXIS_X];
            cursor.y += node.rect.size.y * node.advance[AXIS_Y];

            self.resolve_static(child, metrics, text_size);
        }
    }

    /// Percent pass: a percent-typed axis reads its parent's resolved
    /// size, unless the parent is children-sum-typed on that axis — that
    /// combination would be a circular read and is excluded.
    fn resolve_percent(&mut self, idx: u32) {
        for i in 0..self.nodes[idx as usize].children.len() {
            let child = self.nodes[idx as usize].children[i];
            for axis in 0..2 {
                let excluded =
                    self.nodes[idx as usize].semantic_size[axis].kind == SizeKind::ChildrenSum;
                let node = &self.nodes[child as usize];
                if node.semantic_size[axis].kind == SizeKind::PercentOfParent && !excluded {
                    let size = self.nodes[idx as usize].rect.size[axis]
                        * self.nodes[child as usize].semantic_size[axis].value;
                    self.nodes[child as usize].rect.size[axis] = size;
                }
            }
            self.resolve_percent(child);
        }
    }

    /// Children-sum pass: resolved bottom-up so nested sums see final
    /// child sizes.
    fn resolve_children_sum(&mut self, idx: u32) {
        for i in 0..self.nodes[idx as usize].children.len() {
            let child = self.nodes[idx as usize].children[i];
            self.resolve_children_sum(child);
        }
        for axis in 0..2 {
            if self.nodes[idx as usize].semantic_size[axis].kind == SizeKind::ChildrenSum {
                let mut sum = 0.0;
                for i in 0..self.nodes[idx as usize].children.len() {
                    let child = self.nodes[idx as usize].children[i];
                    sum += self.nodes[child as usize].rect.size[axis];
                }
                self.nodes[idx as usize].rect.size[axis] = sum;
            }
        }
    }

    /// Runs the shared interaction state machine over every clickable
    /// node, in tree order. Tree order is also paint order, so later
    /// (topmost) nodes win hit-testing.
    pub fn run_interactions(&mut self, ui: &mut UIContext) {
        if self.root == NIL {
            return;
        }
        self.interact_node(self.root, ui);
    }

    fn interact_node(&mut self, idx: u32, ui: &mut UIContext) {
        if self.nodes[idx as usize].flags.clickable {
            let id = ui.next_id();
            let rect = self.nodes[idx as usize].rect;
            self.nodes[idx as usize].interaction = ui.interact(id, rect, Behavior::Click);
        }
        for i in 0..self.nodes[idx as usize].children.len() {
            let child = self.nodes[idx as usize].children[i];
            self.interact_node(child, ui);
        }
    }

    /// Walks the tree in paint order and emits shapes for each node's
    /// flags into `draw`.
    pub fn paint(&self, draw: &mut DrawList, theme: &Theme, depth: f32) {
        if self.root == NIL {
            return;
        }
        self.paint_node(self.root, draw, theme, depth);
    }

    fn paint_node(&self, idx: u32, draw: &mut DrawList, theme: &Theme, depth: f32) {
        let node = &self.nodes[idx as usize];
        if node.flags.draw_background {
            let fill = if node.flags.clickable {
                if node.interaction.held {
                    theme.button_pressed
                } else if node.interaction.hovered {
                    theme.button_hover
                } else {
                    theme.button
                }
            } else {
                theme.background
            };
            draw.push_rect(node.rect, depth, fill);
        }
        if node.flags.draw_border {
            draw.push_rect_outline(node.rect, 1.0, depth, theme.outline);
        }
        if node.flags.draw_text {
            draw.push_text(
                &node.text,
                node.rect,
                theme.text_size,
                theme.text,
                theme.text_centered,
                depth,
            );
        }
        for &child in &node.children {
            self.paint_node(child, draw, theme, depth);
        }
    }
}

impl UIContext {
    /// Paints `tree` into this context's shape batch using the context's
    /// theme and current depth.
    pub fn paint_tree(&mut self, tree: &WidgetTree) {
        let depth = self.depth();
        tree.paint(&mut self.draw, &self.theme, depth);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::MonoMetrics;
    use glam::vec2;

    fn metrics() -> MonoMetrics {
        MonoMetrics { aspect: 0.5 }
    }

    fn viewport() -> Rect {
        Rect::new(vec2(0.0, 0.0), vec2(200.0, 100.0))
    }

    #[test]
    fn test_static_pass_stacks_children() {
        let mut tree = WidgetTree::new();
        let root = tree.begin(viewport());
        let a = tree
            .add_child(
                root,
                NodeDesc {
                    width: Size::pixels(80.0),
                    height: Size::pixels(30.0),
                    ..NodeDesc::default()
                },
            )
            .unwrap();
        let b = tree
            .add_child(
                root,
                NodeDesc {
                    width: Size::pixels(60.0),
                    height: Size::pixels(20.0),
                    ..NodeDesc::default()
                },
            )
            .unwrap();
        tree.resolve(&metrics(), 10.0);

        assert_eq!(tree.node(a).unwrap().rect, Rect::new(vec2(0.0, 0.0), vec2(80.0, 30.0)));
        assert_eq!(tree.node(b).unwrap().rect, Rect::new(vec2(0.0, 30.0), vec2(60.0, 20.0)));
    }

    #[test]
    fn test_text_content_uses_the_metrics_collaborator() {
        let mut tree = WidgetTree::new();
        let root = tree.begin(viewport());
        let label = tree
            .add_child(
                root,
                NodeDesc {
                    width: Size::text(),
                    height: Size::text(),
                    text: "hello",
                    ..NodeDesc::default()
                },
            )
            .unwrap();
        tree.resolve(&metrics(), 10.0);

        // 5 chars * 10px * 0.5 aspect wide, one 10px line tall.
        assert_eq!(tree.node(label).unwrap().rect.size, vec2(25.0, 10.0));
    }

    #[test]
    fn test_percent_of_parent_resolves_top_down() {
        let mut tree = WidgetTree::new();
        let root = tree.begin(viewport());
        let half = tree
            .add_child(
                root,
                NodeDesc {
                    width: Size::percent(0.5),
                    height: Size::percent(0.25),
                    ..NodeDesc::default()
                },
            )
            .unwrap();
        let nested = tree
            .add_child(
                half,
                NodeDesc {
                    width: Size::percent(0.5),
                    height: Size::pixels(5.0),
                    ..NodeDesc::default()
                },
            )
            .unwrap();
        tree.resolve(&metrics(), 10.0);

        assert_eq!(tree.node(half).unwrap().rect.size, vec2(100.0, 25.0));
        assert_eq!(tree.node(nested).unwrap().rect.size, vec2(50.0, 5.0));
    }

    #[test]
    fn test_children_sum_resolves_bottom_up() {
        let mut tree = WidgetTree::new();
        let root = tree.begin(viewport());
        let list = tree
            .add_child(
                root,
                NodeDesc {
                    width: Size::pixels(100.0),
                    height: Size::children_sum(),
                    ..NodeDesc::default()
                },
            )
            .unwrap();
        let inner = tree
            .add_child(
                list,
                NodeDesc {
                    width: Size::pixels(100.0),
                    height: Size::children_sum(),
                    ..NodeDesc::default()
                },
            )
            .unwrap();
        for h in [10.0, 15.0] {
            tree.add_child(
                inner,
                NodeDesc {
                    width: Size::pixels(100.0),
                    height: Size::pixels(h),
                    ..NodeDesc::default()
                },
            )
            .unwrap();
        }
        tree.add_child(
            list,
            NodeDesc {
                width: Size::pixels(100.0),
                height: Size::pixels(30.0),
                ..NodeDesc::default()
            },
        )
        .unwrap();
        tree.resolve(&metrics(), 10.0);

        assert_eq!(tree.node(inner).unwrap().rect.size.y, 25.0);
        assert_eq!(tree.node(list).unwrap().rect.size.y, 55.0);
    }

    #[test]
    fn test_children_sum_excludes_percent_children() {
        let mut tree = WidgetTree::new();
        let root = tree.begin(viewport());
        let list = tree
            .add_child(
                root,
                NodeDesc {
                    width: Size::pixels(100.0),
                    height: Size::children_sum(),
                    ..NodeDesc::default()
                },
            )
            .unwrap();
        let circular = tree
            .add_child(
                list,
                NodeDesc {
                    width: Size::pixels(100.0),
                    // Percent of a children-sum parent: excluded, stays 0.
                    height: Size::percent(0.5),
                    ..NodeDesc::default()
                },
            )
            .unwrap();
        let fixed = tree
            .add_child(
                list,
                NodeDesc {
                    width: Size::pixels(100.0),
                    height: Size::pixels(40.0),
                    ..NodeDesc::default()
                },
            )
            .unwrap();
        tree.resolve(&metrics(), 10.0);

        assert_eq!(tree.node(circular).unwrap().rect.size.y, 0.0);
        assert_eq!(tree.node(fixed).unwrap().rect.size.y, 40.0);
        assert_eq!(tree.node(list).unwrap().rect.size.y, 40.0);

        // Percent on the other axis is unaffected by the exclusion.
        let mut tree = WidgetTree::new();
        let root = tree.begin(viewport());
        let list = tree
            .add_child(
                root,
                NodeDesc {
                    width: Size::pixels(100.0),
                    height: Size::children_sum(),
                    ..NodeDesc::default()
                },
            )
            .unwrap();
        let child = tree
            .add_child(
                list,
                NodeDesc {
                    width: Size::percent(0.5),
                    height: Size::pixels(10.0),
                    ..NodeDesc::default()
                },
            )
            .unwrap();
        tree.resolve(&metrics(), 10.0);
        assert_eq!(tree.node(child).unwrap().rect.size.x, 50.0);
    }

    #[test]
    fn test_slots_are_recycled_between_frames() {
        let mut tree = WidgetTree::new();
        let root = tree.begin(viewport());
        for _ in 0..4 {
            tree.add_child(
                root,
                NodeDesc {
                    width: Size::pixels(10.0),
                    height: Size::pixels(10.0),
                    text: "old",
                    ..NodeDesc::default()
                },
            )
            .unwrap();
        }
        assert_eq!(tree.len(), 5);

        let root = tree.begin(viewport());
        assert_eq!(tree.len(), 1);
        let child = tree
            .add_child(root, NodeDesc { text: "new", ..NodeDesc::default() })
            .unwrap();
        assert_eq!(tree.node(child).unwrap().text, "new");
        assert!(tree.node(root).unwrap().children().len() == 1);
        // Stale indices from the previous frame are not live.
        assert!(tree.node(4).is_none());
    }

    #[test]
    fn test_add_child_rejects_dead_parent() {
        let mut tree = WidgetTree::new();
        tree.begin(viewport());
        assert!(tree.add_child(7, NodeDesc::default()).is_err());
    }

    #[test]
    fn test_clickable_node_runs_the_state_machine() {
        use crate::{input::PointerState, theme::Theme};

        let mut ui = UIContext::new(Theme::default(), Box::new(MonoMetrics::default()));
        let mut tree = WidgetTree::new();
        let mut clicked = false;

        for down in [false, true, false] {
            ui.begin_frame(PointerState::new(vec2(10.0, 10.0), down));
            let root = tree.begin(viewport());
            let button = tree
                .add_child(
                    root,
                    NodeDesc {
                        width: Size::pixels(50.0),
                        height: Size::pixels(20.0),
                        flags: NodeFlags {
                            clickable: true,
                            draw_background: true,
                            draw_border: true,
                            ..NodeFlags::default()
                        },
                        text: "ok",
                        ..NodeDesc::default()
                    },
                )
                .unwrap();
            tree.resolve(&metrics(), 10.0);
            tree.run_interactions(&mut ui);
            clicked = tree.node(button).unwrap().interaction.clicked;
        }
        assert!(clicked);

        ui.paint_tree(&tree);
        assert!(!ui.draw_list().is_empty());
    }
}
