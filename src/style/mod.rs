//! # Box Style
//!
//! The declarative input for one box: sizing, flex weight, box model,
//! positioning, and the container properties that govern its children.
//! This is the subset of flexbox the engine understands, nothing more.
//!
//! Every field has a default, so a style deserialized from `{}` is a
//! relatively positioned, content-sized row container with no padding,
//! margin or gap.

use serde::{Deserialize, Serialize};

use crate::error::PercentageError;

/// The complete set of layout inputs for a box.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BoxStyle {
    // ── Sizing ─────────────────────────────────────────────────
    /// Explicit width. `None` derives the width from content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<Dimension>,
    /// Explicit height. `None` derives the height from content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<Dimension>,
    /// Share of the parent's leftover main-axis space. Must not be negative.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flex: Option<f64>,

    // ── Box Model ──────────────────────────────────────────────
    pub padding: Edges,
    pub margin: Edges,
    /// Spacing between consecutive children along the main axis.
    pub gap: f64,

    // ── Positioning ────────────────────────────────────────────
    pub position: Position,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<Dimension>,

    // ── Flex Container ─────────────────────────────────────────
    pub flex_direction: FlexDirection,
    pub justify_content: JustifyContent,
    pub align_items: AlignItems,

    // ── Flex Item ──────────────────────────────────────────────
    /// Overrides the parent's `align_items` for this box.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align_self: Option<AlignItems>,

    // ── Stacking & Paint ───────────────────────────────────────
    /// Explicit stacking order. Inherited from the parent when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i32>,
    pub display: Display,
    /// Opaque paint data, passed through untouched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

impl BoxStyle {
    /// Declared size along `axis`.
    pub fn size(&self, axis: Axis) -> Option<Dimension> {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// Start and end offsets along `axis`: (left, right) or (top, bottom).
    pub fn offsets(&self, axis: Axis) -> (Option<Dimension>, Option<Dimension>) {
        match axis {
            Axis::Horizontal => (self.left, self.right),
            Axis::Vertical => (self.top, self.bottom),
        }
    }

    pub fn is_absolute(&self) -> bool {
        self.position == Position::Absolute
    }

    /// Takes part in normal-flow sizing and placement.
    pub fn is_relative(&self) -> bool {
        self.position == Position::Relative
    }

    /// Flow placement skips absolute and hidden boxes.
    pub fn is_in_flow(&self) -> bool {
        self.is_relative() && self.display != Display::None
    }
}

/// A length: either pixels or a fraction of the parent's resolved size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DimensionRepr", into = "DimensionRepr")]
pub enum Dimension {
    Px(f64),
    /// Fraction of the parent size (`"50%"` is `Percent(0.5)`).
    Percent(f64),
}

impl Dimension {
    /// Resolve against the parent's size on the same axis.
    pub fn resolve(&self, parent_size: f64) -> f64 {
        match self {
            Dimension::Px(v) => *v,
            Dimension::Percent(fraction) => fraction * parent_size,
        }
    }

    /// The pixel value, if this is not a percentage.
    pub fn px(&self) -> Option<f64> {
        match self {
            Dimension::Px(v) => Some(*v),
            Dimension::Percent(_) => None,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum DimensionRepr {
    Number(f64),
    Text(String),
}

impl TryFrom<DimensionRepr> for Dimension {
    type Error = PercentageError;

    fn try_from(repr: DimensionRepr) -> Result<Self, Self::Error> {
        match repr {
            DimensionRepr::Number(v) => Ok(Dimension::Px(v)),
            DimensionRepr::Text(s) => parse_percentage(&s).map(Dimension::Percent),
        }
    }
}

impl From<Dimension> for DimensionRepr {
    fn from(d: Dimension) -> Self {
        match d {
            Dimension::Px(v) => DimensionRepr::Number(v),
            Dimension::Percent(fraction) => DimensionRepr::Text(format!("{}%", fraction * 100.0)),
        }
    }
}

/// Parse `"<number>%"` into a fraction: `"50%"` → `0.5`.
///
/// Whitespace around the value is ignored. Out-of-range values such as
/// `"150%"` or `"-10%"` are accepted and resolve to degenerate geometry.
pub fn parse_percentage(input: &str) -> Result<f64, PercentageError> {
    let err = || PercentageError {
        input: input.to_string(),
    };
    let number = input.trim().strip_suffix('%').ok_or_else(err)?;
    let value: f64 = number.trim_end().parse().map_err(|_| err())?;
    if !value.is_finite() {
        return Err(err());
    }
    Ok(value / 100.0)
}

/// Layout axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlexDirection {
    #[default]
    Row,
    Column,
}

impl FlexDirection {
    pub fn main_axis(self) -> Axis {
        match self {
            FlexDirection::Row => Axis::Horizontal,
            FlexDirection::Column => Axis::Vertical,
        }
    }

    pub fn cross_axis(self) -> Axis {
        match self {
            FlexDirection::Row => Axis::Vertical,
            FlexDirection::Column => Axis::Horizontal,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JustifyContent {
    #[default]
    FlexStart,
    Center,
    FlexEnd,
    SpaceBetween,
    SpaceAround,
    SpaceEvenly,
}

impl JustifyContent {
    /// The space-* modes redistribute free space as gaps instead of
    /// growing flexed children.
    pub fn distributes_space(self) -> bool {
        matches!(
            self,
            JustifyContent::SpaceBetween | JustifyContent::SpaceAround | JustifyContent::SpaceEvenly
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlignItems {
    #[default]
    FlexStart,
    Center,
    FlexEnd,
    Stretch,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    #[default]
    Relative,
    Absolute,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Display {
    #[default]
    Flex,
    None,
}

/// Edge values (top, right, bottom, left) used for margin and padding.
///
/// Deserializes from a single number (all sides) or an object with any
/// subset of sides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "EdgesRepr")]
pub struct Edges {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Edges {
    pub fn uniform(v: f64) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    pub fn symmetric(vertical: f64, horizontal: f64) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }

    /// Left or top.
    pub fn start(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.left,
            Axis::Vertical => self.top,
        }
    }

    /// Right or bottom.
    pub fn end(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.right,
            Axis::Vertical => self.bottom,
        }
    }

    pub fn sum(&self, axis: Axis) -> f64 {
        self.start(axis) + self.end(axis)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EdgesRepr {
    Uniform(f64),
    Sides(EdgeSides),
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct EdgeSides {
    top: f64,
    right: f64,
    bottom: f64,
    left: f64,
}

impl From<EdgesRepr> for Edges {
    fn from(repr: EdgesRepr) -> Self {
        match repr {
            EdgesRepr::Uniform(v) => Edges::uniform(v),
            EdgesRepr::Sides(s) => Edges {
                top: s.top,
                right: s.right,
                bottom: s.bottom,
                left: s.left,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_strings_become_fractions() {
        assert_eq!(parse_percentage("50%"), Ok(0.5));
        assert_eq!(parse_percentage(" 12.5 % "), Ok(0.125));
        assert_eq!(parse_percentage("150%"), Ok(1.5));
        assert!(parse_percentage("50").is_err());
        assert!(parse_percentage("%").is_err());
        assert!(parse_percentage("abc%").is_err());
        assert!(parse_percentage("inf%").is_err());
    }

    #[test]
    fn dimension_from_number_or_percent() {
        let px: Dimension = serde_json::from_str("120").unwrap();
        assert_eq!(px, Dimension::Px(120.0));
        let pct: Dimension = serde_json::from_str("\"25%\"").unwrap();
        assert_eq!(pct, Dimension::Percent(0.25));
        assert!(serde_json::from_str::<Dimension>("\"wide\"").is_err());
    }

    #[test]
    fn dimension_resolves_against_parent() {
        assert_eq!(Dimension::Px(40.0).resolve(999.0), 40.0);
        assert_eq!(Dimension::Percent(0.5).resolve(200.0), 100.0);
        assert_eq!(Dimension::Percent(0.5).px(), None);
    }

    #[test]
    fn empty_style_uses_defaults() {
        let style: BoxStyle = serde_json::from_str("{}").unwrap();
        assert_eq!(style, BoxStyle::default());
        assert_eq!(style.flex_direction, FlexDirection::Row);
        assert_eq!(style.position, Position::Relative);
        assert_eq!(style.display, Display::Flex);
        assert!(style.is_in_flow());
    }

    #[test]
    fn style_fields_are_camel_case_with_kebab_values() {
        let style: BoxStyle = serde_json::from_str(
            r#"{
                "width": "50%",
                "height": 30,
                "flexDirection": "column",
                "justifyContent": "space-between",
                "alignItems": "stretch",
                "alignSelf": "flex-end",
                "position": "absolute",
                "zIndex": 4,
                "display": "none",
                "backgroundColor": "hotpink"
            }"#,
        )
        .unwrap();
        assert_eq!(style.width, Some(Dimension::Percent(0.5)));
        assert_eq!(style.height, Some(Dimension::Px(30.0)));
        assert_eq!(style.flex_direction, FlexDirection::Column);
        assert_eq!(style.justify_content, JustifyContent::SpaceBetween);
        assert_eq!(style.align_items, AlignItems::Stretch);
        assert_eq!(style.align_self, Some(AlignItems::FlexEnd));
        assert!(style.is_absolute());
        assert!(!style.is_in_flow());
        assert_eq!(style.z_index, Some(4));
        assert_eq!(style.background_color.as_deref(), Some("hotpink"));
    }

    #[test]
    fn edges_accept_number_or_partial_object() {
        let all: Edges = serde_json::from_str("8").unwrap();
        assert_eq!(all, Edges::uniform(8.0));
        let some: Edges = serde_json::from_str(r#"{ "left": 4, "top": 2 }"#).unwrap();
        assert_eq!(some.left, 4.0);
        assert_eq!(some.top, 2.0);
        assert_eq!(some.right, 0.0);
        assert_eq!(some.sum(Axis::Horizontal), 4.0);
        assert_eq!(some.start(Axis::Vertical), 2.0);
    }

    #[test]
    fn main_and_cross_axes() {
        assert_eq!(FlexDirection::Row.main_axis(), Axis::Horizontal);
        assert_eq!(FlexDirection::Row.cross_axis(), Axis::Vertical);
        assert_eq!(FlexDirection::Column.main_axis(), Axis::Vertical);
        assert!(JustifyContent::SpaceAround.distributes_space());
        assert!(!JustifyContent::Center.distributes_space());
    }
}
