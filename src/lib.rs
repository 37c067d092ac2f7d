//! # Boxflow
//!
//! A tree-based box layout engine: a simplified flexbox that turns a
//! declarative tree of boxes into concrete pixel geometry.
//!
//! Callers describe each box (size, flex weight, padding, margin, gap,
//! offsets, alignment, justification) and get back the same tree with every
//! box's position, size and stacking order filled in. Boxflow never draws;
//! a renderer consumes the result.
//!
//! ## Architecture
//!
//! ```text
//! Input (JSON/API)
//!       ↓
//!   [model]     Document tree: ids, styles, children
//!       ↓
//!   [tree]      Arena-backed ordered tree
//!       ↓
//!   [layout]    Three passes: enumerate, measure, resolve
//!       ↓
//!   [paint]     Paint order, hit testing, renderer hand-off
//! ```

pub mod error;
pub mod layout;
pub mod model;
pub mod paint;
pub mod queue;
pub mod style;
pub mod tree;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::{Error, LayoutError, TreeError};
pub use layout::{Geometry, LayoutBox, LayoutEngine, LayoutInfo, Viewport};
pub use tree::{NodeId, Tree};

use model::Document;

/// Lay out `tree` in a viewport of the given size.
///
/// The result is rooted at a synthetic viewport box whose only child is the
/// root of `tree`.
pub fn calculate(tree: Tree<LayoutBox>, viewport: Viewport) -> Result<Tree<LayoutBox>, LayoutError> {
    LayoutEngine::new(viewport).calculate(tree)
}

/// Lay out a document and return a flat snapshot of the result.
pub fn layout_document(document: Document) -> Result<LayoutInfo, LayoutError> {
    let viewport = document.viewport;
    let tree = calculate(document.root.into_tree(), viewport)?;
    Ok(LayoutInfo::from_tree(&tree, viewport))
}

/// Lay out a document described as JSON.
///
/// `viewport` overrides the document's own viewport when given.
pub fn layout_json(json: &str, viewport: Option<Viewport>) -> Result<LayoutInfo, Error> {
    let mut document: Document = serde_json::from_str(json)?;
    if let Some(viewport) = viewport {
        document.viewport = viewport;
    }
    Ok(layout_document(document)?)
}
