//! # Flex Layout Utilities
//!
//! Helper functions for the flex steps of the placement pass. The pass
//! itself lives in the engine's `resolve_node`; this module holds the
//! arithmetic: flex shares, main-axis space distribution, and cross-axis
//! alignment.

use crate::style::{AlignItems, JustifyContent};

/// Share of `available` main-axis space for a child with weight `flex`.
///
/// A zero total gives every flexed child nothing rather than NaN.
pub fn flex_share(flex: f64, total_flex: f64, available: f64) -> f64 {
    if total_flex <= 0.0 {
        return 0.0;
    }
    flex / total_flex * available
}

/// How free main-axis space is laid out around in-flow children.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Distribution {
    /// Offset of the first child from the padded content origin.
    pub leading: f64,
    /// Space between consecutive children.
    pub between: f64,
}

/// Compute leading space and inter-child spacing for `justify`.
///
/// `available` is the leftover main-axis space (fixed gaps already removed
/// for the non space-* modes), `count` the number of in-flow children and
/// `gap` the container's fixed gap.
pub fn distribute(justify: JustifyContent, available: f64, count: usize, gap: f64) -> Distribution {
    let slots = match justify {
        JustifyContent::SpaceBetween => count as f64 - 1.0,
        JustifyContent::SpaceAround => count as f64,
        JustifyContent::SpaceEvenly => count as f64 + 1.0,
        JustifyContent::FlexStart => {
            return Distribution {
                leading: 0.0,
                between: gap,
            }
        }
        JustifyContent::Center => {
            return Distribution {
                leading: available / 2.0,
                between: gap,
            }
        }
        JustifyContent::FlexEnd => {
            return Distribution {
                leading: available,
                between: gap,
            }
        }
    };

    if slots <= 0.0 {
        if count > 0 {
            log::warn!("{justify:?} with {count} child(ren) has no slots to distribute into");
        }
        return Distribution {
            leading: 0.0,
            between: 0.0,
        };
    }

    let between = available / slots;
    let leading = match justify {
        JustifyContent::SpaceAround => between / 2.0,
        JustifyContent::SpaceEvenly => between,
        _ => 0.0,
    };
    Distribution { leading, between }
}

/// Cross-axis position of an item aligned inside a container, or `None`
/// when the alignment keeps the item at the padded start.
///
/// Center ignores padding; flex-end stops at the trailing padding.
pub fn cross_position(
    align: AlignItems,
    container_pos: f64,
    container_size: f64,
    padding_end: f64,
    item_size: f64,
) -> Option<f64> {
    match align {
        AlignItems::Center => Some(container_pos + container_size / 2.0 - item_size / 2.0),
        AlignItems::FlexEnd => Some(container_pos + container_size - item_size - padding_end),
        AlignItems::FlexStart | AlignItems::Stretch => None,
    }
}

/// Cross size of a stretched item: the container's content box.
pub fn stretched_size(container_size: f64, padding_start: f64, padding_end: f64) -> f64 {
    container_size - padding_start - padding_end
}
