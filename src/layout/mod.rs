//! # Three-Pass Layout Engine
//!
//! Turns a tree of [`BoxStyle`] inputs into concrete pixel geometry.
//!
//! ## Why three passes
//!
//! Sizes flow in both directions. A content-sized box needs its children's
//! sizes, while a percentage or flexed child needs its parent's. No single
//! walk can satisfy both, so the engine makes three:
//!
//! 1. **Enumerate** (breadth-first, top-down). Record every box below the
//!    viewport root in level order and reset its geometry.
//! 2. **Measure** (the record replayed from the back, deepest boxes first).
//!    Explicit pixel sizes win; auto sizes are summed (main axis) or maxed
//!    (cross axis) from relatively positioned children that already have a
//!    size, plus padding and gaps.
//! 3. **Resolve** (level order again, ancestors before children). Each box
//!    settles its own percentages, offsets and `alignSelf` against its final
//!    parent, then sizes and places its own children: flex shares, justify,
//!    `alignItems`. Geometry is rounded to whole pixels last.
//!
//! Traversal order is part of the contract: pass 3 reads a parent's geometry
//! only after the parent's own turn has finished, and writes a child's only
//! before the child's turn begins.
//!
//! Measurement has a blind spot: children sized only by flex or percentage
//! contribute nothing in pass 2, so a parent holding only such children
//! measures to its padding.

pub mod flex;

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;
use crate::queue::Queue;
use crate::style::*;
use crate::tree::{NodeId, Tree};

const AXES: [Axis; 2] = [Axis::Horizontal, Axis::Vertical];

/// Size of the host surface. Only used to size the synthetic root.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

/// Resolved geometry of a box, in absolute viewport coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Geometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub z_index: i32,
}

impl Geometry {
    /// x or y.
    pub fn pos(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }

    pub fn pos_mut(&mut self, axis: Axis) -> &mut f64 {
        match axis {
            Axis::Horizontal => &mut self.x,
            Axis::Vertical => &mut self.y,
        }
    }

    /// width or height.
    pub fn size(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    pub fn size_mut(&mut self, axis: Axis) -> &mut f64 {
        match axis {
            Axis::Horizontal => &mut self.width,
            Axis::Vertical => &mut self.height,
        }
    }

    /// Edges are inclusive.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.x <= x && x <= self.x + self.width && self.y <= y && y <= self.y + self.height
    }

    fn round(&mut self) {
        self.x = self.x.round();
        self.y = self.y.round();
        self.width = self.width.round();
        self.height = self.height.round();
    }
}

/// One node of the layout tree: the caller's input plus the engine's output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutBox {
    /// Caller-chosen name, carried into errors and snapshots.
    pub id: Option<String>,
    pub style: BoxStyle,
    pub geometry: Geometry,
}

impl LayoutBox {
    pub fn new(style: BoxStyle) -> Self {
        Self {
            id: None,
            style,
            geometry: Geometry::default(),
        }
    }

    pub fn with_id(id: impl Into<String>, style: BoxStyle) -> Self {
        Self {
            id: Some(id.into()),
            style,
            geometry: Geometry::default(),
        }
    }

    fn label(&self, node: NodeId) -> String {
        self.id.clone().unwrap_or_else(|| node.to_string())
    }
}

/// Computes geometry for whole trees. Holds no state between calls.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    viewport: Viewport,
}

impl LayoutEngine {
    pub fn new(viewport: Viewport) -> Self {
        Self { viewport }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Lay out `tree` and return it wrapped under a viewport-sized root.
    ///
    /// Every call recomputes the full tree from a zero baseline. On error the
    /// tree is dropped; there is no partial result.
    pub fn calculate(&self, tree: Tree<LayoutBox>) -> Result<Tree<LayoutBox>, LayoutError> {
        let mut tree = tree.wrap(self.root_box());

        let record = enumerate(&mut tree)?;
        log::debug!("pass 1: enumerated {} boxes", record.len());

        let sized = measure(&mut tree, record)?;
        log::debug!("pass 2: measured {} boxes", sized.len());

        resolve(&mut tree, sized)?;
        log::debug!(
            "pass 3: resolved layout in a {}x{} viewport",
            self.viewport.width,
            self.viewport.height
        );

        Ok(tree)
    }

    fn root_box(&self) -> LayoutBox {
        let Viewport { width, height } = self.viewport;
        LayoutBox {
            id: None,
            style: BoxStyle {
                width: Some(Dimension::Px(width)),
                height: Some(Dimension::Px(height)),
                background_color: Some("transparent".to_string()),
                ..Default::default()
            },
            geometry: Geometry {
                width,
                height,
                ..Default::default()
            },
        }
    }
}

// ── Pass 1: enumerate ───────────────────────────────────────────

fn enumerate(tree: &mut Tree<LayoutBox>) -> Result<Queue<NodeId>, LayoutError> {
    let mut frontier = Queue::new();
    let mut record = Queue::with_capacity(tree.len());

    frontier.enqueue(tree.root());
    while !frontier.is_empty() {
        let id = frontier
            .dequeue()
            .ok_or(LayoutError::TraversalInvariant("frontier queue empty during enumeration"))?;

        let mut next = tree.first_child(id);
        while let Some(child) = next {
            tree[child].geometry = Geometry::default();
            frontier.enqueue(child);
            record.enqueue(child);
            next = tree.next_sibling(child);
        }
    }

    Ok(record)
}

// ── Pass 2: intrinsic sizes, bottom-up ──────────────────────────

fn measure(
    tree: &mut Tree<LayoutBox>,
    mut record: Queue<NodeId>,
) -> Result<Queue<NodeId>, LayoutError> {
    let mut sized = Queue::with_capacity(record.len());

    while !record.is_empty() {
        let id = record
            .dequeue_back()
            .ok_or(LayoutError::TraversalInvariant("record queue empty during measurement"))?;

        for axis in AXES {
            if let Some(size) = intrinsic_size(tree, id, axis) {
                *tree[id].geometry.size_mut(axis) = size;
            }
        }
        sized.enqueue(id);
    }

    Ok(sized)
}

/// Size of `id` along `axis` as far as it is known bottom-up, or `None` for
/// percentages, which wait for pass 3.
fn intrinsic_size(tree: &Tree<LayoutBox>, id: NodeId, axis: Axis) -> Option<f64> {
    let style = &tree[id].style;
    match style.size(axis) {
        Some(Dimension::Px(v)) => return Some(v),
        Some(Dimension::Percent(_)) => return None,
        None => {}
    }

    let along_main = style.flex_direction.main_axis() == axis;
    let mut content = 0.0_f64;
    let mut relative = 0_usize;

    for child in tree.children(id) {
        let child = &tree[child];
        if !child.style.is_relative() {
            continue;
        }
        relative += 1;

        let known = child.geometry.size(axis) != 0.0
            || matches!(child.style.size(axis), Some(Dimension::Px(_)));
        if !known {
            continue;
        }

        let outer = child.geometry.size(axis) + child.style.margin.sum(axis);
        content = if along_main {
            content + outer
        } else {
            content.max(outer)
        };
    }

    let gaps = if along_main {
        relative.saturating_sub(1) as f64 * style.gap
    } else {
        0.0
    };

    Some(content + style.padding.sum(axis) + gaps)
}

// ── Pass 3: flex, offsets, placement, top-down ──────────────────

fn resolve(tree: &mut Tree<LayoutBox>, mut sized: Queue<NodeId>) -> Result<(), LayoutError> {
    // `sized` holds reverse level order; popping the back walks it top-down.
    while !sized.is_empty() {
        let id = sized
            .dequeue_back()
            .ok_or(LayoutError::TraversalInvariant("sized queue empty during resolution"))?;
        resolve_node(tree, id)?;
    }
    Ok(())
}

fn resolve_node(tree: &mut Tree<LayoutBox>, id: NodeId) -> Result<(), LayoutError> {
    let parent_id = tree
        .parent(id)
        .ok_or(LayoutError::TraversalInvariant("recorded box has no parent"))?;
    let parent = tree[parent_id].geometry;
    let parent_direction = tree[parent_id].style.flex_direction;
    let parent_padding = tree[parent_id].style.padding;

    if let Some(flex) = tree[id].style.flex {
        if flex < 0.0 {
            return Err(LayoutError::InvalidFlex {
                node: tree[id].label(id),
                flex,
            });
        }
    }

    // The box itself, against its now-final parent.
    {
        let node = &mut tree[id];
        for axis in AXES {
            if let Some(d @ Dimension::Percent(_)) = node.style.size(axis) {
                *node.geometry.size_mut(axis) = d.resolve(parent.size(axis));
            }
            apply_offsets(node, &parent, axis);
        }

        // An explicit `alignSelf: stretch` overrides a declared cross size.
        if let (false, Some(align)) = (node.style.is_absolute(), node.style.align_self) {
            let cross = parent_direction.cross_axis();
            align_on_cross(&mut node.geometry, true, align, &parent, &parent_padding, cross);
        }
    }

    let children: Vec<NodeId> = tree.children(id).collect();
    let own = tree[id].geometry;
    for &child in &children {
        let child = &mut tree[child];
        for axis in AXES {
            if let Some(d @ Dimension::Percent(_)) = child.style.size(axis) {
                *child.geometry.size_mut(axis) = d.resolve(own.size(axis));
            }
        }
    }

    let node = &mut tree[id];
    node.geometry.z_index = node.style.z_index.unwrap_or(parent.z_index);

    let direction = node.style.flex_direction;
    let justify = node.style.justify_content;
    let align_items = node.style.align_items;
    let padding = node.style.padding;
    let margin = node.style.margin;
    let gap = node.style.gap;
    let main = direction.main_axis();
    let cross = direction.cross_axis();

    // Flex: fixed children consume space, flexed children share the rest.
    let mut fixed = 0.0_f64;
    let mut total_flex = 0.0_f64;
    let mut flexed = 0_usize;
    let mut relative = 0_usize;
    // The space-* modes spread free space over placed children only.
    let mut placed_size = 0.0_f64;
    let mut placed = 0_usize;
    for &child in &children {
        let child = &tree[child];
        if !child.style.is_relative() {
            continue;
        }
        relative += 1;
        match child.style.flex {
            Some(f) => {
                total_flex += f;
                flexed += 1;
            }
            None => fixed += child.geometry.size(main),
        }
        if child.style.is_in_flow() {
            placed += 1;
            placed_size += child.geometry.size(main);
        }
    }

    let (available, count) = if justify.distributes_space() {
        (own.size(main) - placed_size - padding.sum(main), placed)
    } else {
        let fixed_gaps = relative.saturating_sub(1) as f64 * gap;
        (own.size(main) - fixed - padding.sum(main) - fixed_gaps, relative)
    };

    if flexed > 0 && !justify.distributes_space() {
        if total_flex == 0.0 {
            log::warn!(
                "{}: flexed children have a total flex of 0 and collapse",
                tree[id].label(id)
            );
        }
        for &child in &children {
            let child = &mut tree[child];
            if let (true, Some(f)) = (child.style.is_relative(), child.style.flex) {
                *child.geometry.size_mut(main) = flex::flex_share(f, total_flex, available);
            }
        }
    }

    // Margin offset, applied once.
    let own = {
        let g = &mut tree[id].geometry;
        g.x += margin.left;
        g.y += margin.top;
        *g
    };

    // Main-axis placement.
    let distribution = flex::distribute(justify, available, count, gap);
    let mut cursor = own.pos(main) + padding.start(main) + distribution.leading;
    let cross_start = own.pos(cross) + padding.start(cross);
    for &child in &children {
        let child = &mut tree[child];
        if !child.style.is_in_flow() {
            continue;
        }
        *child.geometry.pos_mut(main) = cursor;
        *child.geometry.pos_mut(cross) = cross_start;
        cursor += child.geometry.size(main) + distribution.between;
    }

    // Cross-axis alignment. Children with their own `alignSelf` align
    // themselves in their own turn.
    for &child in &children {
        let child = &mut tree[child];
        if !child.style.is_relative() || child.style.align_self.is_some() {
            continue;
        }
        let auto_size = child.style.size(cross).is_none();
        align_on_cross(&mut child.geometry, auto_size, align_items, &own, &padding, cross);
    }

    let node = &mut tree[id];
    node.geometry.round();
    log::trace!("{} -> {:?}", node.label(id), node.geometry);

    Ok(())
}

/// Apply `left`/`right` (or `top`/`bottom`) offsets along `axis`.
///
/// Priority: both edges with an auto size span the parent; otherwise the
/// start edge, then the end edge. Absolute boxes are placed from the parent's
/// edges, relative boxes are shifted from their flow position. An absolute
/// box without offsets sits at the parent's origin.
fn apply_offsets(node: &mut LayoutBox, parent: &Geometry, axis: Axis) {
    let parent_pos = parent.pos(axis);
    let parent_size = parent.size(axis);
    let (start, end) = node.style.offsets(axis);
    let start = start.map(|d| d.resolve(parent_size));
    let end = end.map(|d| d.resolve(parent_size));
    let absolute = node.style.is_absolute();
    let auto_size = node.style.size(axis).is_none();
    let g = &mut node.geometry;

    match (start, end) {
        (Some(s), Some(e)) if auto_size => {
            *g.pos_mut(axis) = parent_pos + s;
            *g.size_mut(axis) = parent_size - s - e;
        }
        (Some(s), _) => {
            if absolute {
                *g.pos_mut(axis) = parent_pos + s;
            } else {
                *g.pos_mut(axis) += s;
            }
        }
        (None, Some(e)) => {
            if absolute {
                *g.pos_mut(axis) = parent_pos + parent_size - e - g.size(axis);
            } else {
                *g.pos_mut(axis) -= e;
            }
        }
        (None, None) => {
            if absolute {
                *g.pos_mut(axis) = parent_pos;
            }
        }
    }
}

/// Align `item` on the cross axis of `container`.
///
/// The item is expected at the container's padded cross start; center and
/// flex-end shift it from there, so relative offsets already applied survive.
/// Stretch resizes only when `auto_size` is set.
fn align_on_cross(
    item: &mut Geometry,
    auto_size: bool,
    align: AlignItems,
    container: &Geometry,
    padding: &Edges,
    cross: Axis,
) {
    if align == AlignItems::Stretch && auto_size {
        *item.size_mut(cross) =
            flex::stretched_size(container.size(cross), padding.start(cross), padding.end(cross));
    }

    let start = container.pos(cross) + padding.start(cross);
    if let Some(target) = flex::cross_position(
        align,
        container.pos(cross),
        container.size(cross),
        padding.end(cross),
        item.size(cross),
    ) {
        *item.pos_mut(cross) += target - start;
    }
}

// ── Serializable layout snapshot (for renderers / dev tools) ────

/// Flat, breadth-first snapshot of a laid-out tree.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutInfo {
    pub viewport: Viewport,
    pub boxes: Vec<BoxInfo>,
}

/// One resolved box. `parent` indexes into [`LayoutInfo::boxes`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxInfo {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub z_index: i32,
    pub display: Display,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

impl LayoutInfo {
    /// Snapshot every box of a laid-out tree, root first.
    pub fn from_tree(tree: &Tree<LayoutBox>, viewport: Viewport) -> Self {
        let mut boxes = Vec::with_capacity(tree.len());
        let mut queue = Queue::new();
        queue.enqueue((tree.root(), None));

        while let Some((id, parent)) = queue.dequeue() {
            let index = boxes.len();
            let node = &tree[id];
            boxes.push(BoxInfo {
                index,
                parent,
                id: node.id.clone(),
                x: node.geometry.x,
                y: node.geometry.y,
                width: node.geometry.width,
                height: node.geometry.height,
                z_index: node.geometry.z_index,
                display: node.style.display,
                background_color: node.style.background_color.clone(),
            });
            for child in tree.children(id) {
                queue.enqueue((child, Some(index)));
            }
        }

        LayoutInfo { viewport, boxes }
    }

    /// Find a box by its caller-assigned id.
    pub fn find(&self, id: &str) -> Option<&BoxInfo> {
        self.boxes.iter().find(|b| b.id.as_deref() == Some(id))
    }
}
