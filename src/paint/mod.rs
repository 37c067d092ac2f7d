//! # Paint Order & Hit Testing
//!
//! The engine never draws. This module is the hand-off to whoever does:
//! it orders resolved boxes for painting, hands their rectangles to a
//! [`Renderer`], and answers "which box is under this point".

use serde::Serialize;

use crate::layout::LayoutBox;
use crate::queue::Queue;
use crate::style::Display;
use crate::tree::{NodeId, Tree};

/// A resolved rectangle in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Something that can draw a filled rectangle. Implemented by host
/// renderers; `background` is the box's opaque paint value, if any.
pub trait Renderer {
    fn draw_rect(&mut self, rect: Rect, background: Option<&str>);
}

/// Boxes in paint order: breadth-first, hidden subtrees skipped, then
/// stable-sorted by ascending z-index. Later entries paint on top.
pub fn paint_order(tree: &Tree<LayoutBox>) -> Vec<NodeId> {
    let mut order = Vec::with_capacity(tree.len());
    let mut queue = Queue::new();
    queue.enqueue(tree.root());

    while let Some(id) = queue.dequeue() {
        if tree[id].style.display == Display::None {
            continue;
        }
        order.push(id);
        for child in tree.children(id) {
            queue.enqueue(child);
        }
    }

    order.sort_by_key(|id| tree[*id].geometry.z_index);
    order
}

/// Paint every visible box, bottom-most first.
pub fn paint<R: Renderer + ?Sized>(tree: &Tree<LayoutBox>, renderer: &mut R) {
    for id in paint_order(tree) {
        let node = &tree[id];
        let g = node.geometry;
        renderer.draw_rect(
            Rect {
                x: g.x,
                y: g.y,
                width: g.width,
                height: g.height,
            },
            node.style.background_color.as_deref(),
        );
    }
}

/// The top-most painted box containing the point, edges inclusive.
pub fn hit_test(tree: &Tree<LayoutBox>, x: f64, y: f64) -> Option<NodeId> {
    paint_order(tree)
        .into_iter()
        .rev()
        .find(|id| tree[*id].geometry.contains(x, y))
}

/// A draw call, as recorded by [`DisplayList`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawRect {
    #[serde(flatten)]
    pub rect: Rect,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
}

/// A renderer that records draw calls instead of drawing.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DisplayList {
    pub commands: Vec<DrawRect>,
}

impl Renderer for DisplayList {
    fn draw_rect(&mut self, rect: Rect, background: Option<&str>) {
        self.commands.push(DrawRect {
            rect,
            background: background.map(str::to_string),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{LayoutEngine, Viewport};
    use crate::style::{BoxStyle, Dimension, Position};

    fn square(id: &str, size: f64, z_index: Option<i32>) -> LayoutBox {
        LayoutBox::with_id(
            id,
            BoxStyle {
                width: Some(Dimension::Px(size)),
                height: Some(Dimension::Px(size)),
                z_index,
                background_color: Some(id.to_string()),
                ..Default::default()
            },
        )
    }

    fn laid_out() -> (Tree<LayoutBox>, NodeId, NodeId, NodeId) {
        let mut tree = Tree::new(square("base", 100.0, None));
        let root = tree.root();
        let low = tree.append(root, square("low", 50.0, None));
        let overlay = tree.append(
            root,
            LayoutBox::with_id(
                "overlay",
                BoxStyle {
                    position: Position::Absolute,
                    width: Some(Dimension::Px(30.0)),
                    height: Some(Dimension::Px(30.0)),
                    z_index: Some(3),
                    ..Default::default()
                },
            ),
        );
        let hidden = tree.append(
            root,
            LayoutBox::with_id(
                "hidden",
                BoxStyle {
                    display: Display::None,
                    ..Default::default()
                },
            ),
        );
        tree.append(hidden, square("under-hidden", 10.0, Some(9)));

        let tree = LayoutEngine::new(Viewport::new(200.0, 200.0))
            .calculate(tree)
            .unwrap();
        (tree, root, low, overlay)
    }

    #[test]
    fn paint_order_sorts_by_z_and_skips_hidden_subtrees() {
        let (tree, root, low, overlay) = laid_out();
        let order = paint_order(&tree);
        assert_eq!(order, vec![tree.root(), root, low, overlay]);
    }

    #[test]
    fn hit_test_picks_top_most_box() {
        let (tree, root, low, overlay) = laid_out();
        assert_eq!(hit_test(&tree, 10.0, 10.0), Some(overlay));
        assert_eq!(hit_test(&tree, 40.0, 40.0), Some(low));
        assert_eq!(hit_test(&tree, 80.0, 80.0), Some(root));
        assert_eq!(hit_test(&tree, 150.0, 150.0), Some(tree.root()));
        assert_eq!(hit_test(&tree, 500.0, 500.0), None);
    }

    #[test]
    fn display_list_records_rects_in_paint_order() {
        let (tree, ..) = laid_out();
        let mut list = DisplayList::default();
        paint(&tree, &mut list);

        assert_eq!(list.commands.len(), 4);
        assert_eq!(list.commands[0].background.as_deref(), Some("transparent"));
        assert_eq!(list.commands[1].background.as_deref(), Some("base"));
        let top = &list.commands[3];
        assert_eq!(top.rect, Rect { x: 0.0, y: 0.0, width: 30.0, height: 30.0 });
        assert_eq!(top.background, None);
    }
}
