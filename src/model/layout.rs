//! Layout semantics attached to container annotations.

use serde::{Deserialize, Serialize};

/// Layout role of an annotation.
///
/// Only `Box`, `Flex` and `Grid` annotations are containers; plain widgets
/// keep `None` and may not hold children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutType {
    /// Leaf widget, no containment role.
    #[default]
    None,
    /// Plain container without layout logic.
    Box,
    /// Flexbox container.
    Flex,
    /// Grid container.
    Grid,
}

impl LayoutType {
    /// Whether this layout role allows children.
    pub fn is_container(self) -> bool {
        !matches!(self, LayoutType::None)
    }

    /// Display name for UI pickers.
    pub fn name(self) -> &'static str {
        match self {
            LayoutType::None => "None",
            LayoutType::Box => "Box",
            LayoutType::Flex => "Flex",
            LayoutType::Grid => "Grid",
        }
    }

    /// All layout roles, in picker order.
    pub fn all() -> &'static [LayoutType] {
        &[
            LayoutType::None,
            LayoutType::Box,
            LayoutType::Flex,
            LayoutType::Grid,
        ]
    }
}

/// Main-axis direction of a flex container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlexDirection {
    #[default]
    Row,
    Column,
}

impl FlexDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            FlexDirection::Row => "row",
            FlexDirection::Column => "column",
        }
    }
}

/// Main-axis distribution of a flex container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlexJustify {
    #[default]
    Start,
    Center,
    End,
    Between,
    Around,
}

impl FlexJustify {
    pub fn as_str(self) -> &'static str {
        match self {
            FlexJustify::Start => "start",
            FlexJustify::Center => "center",
            FlexJustify::End => "end",
            FlexJustify::Between => "between",
            FlexJustify::Around => "around",
        }
    }
}

/// Cross-axis alignment of a flex container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlexAlign {
    #[default]
    Start,
    Center,
    End,
    Stretch,
}

impl FlexAlign {
    pub fn as_str(self) -> &'static str {
        match self {
            FlexAlign::Start => "start",
            FlexAlign::Center => "center",
            FlexAlign::End => "end",
            FlexAlign::Stretch => "stretch",
        }
    }
}

/// Flexbox settings for a `LayoutType::Flex` container.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FlexLayout {
    pub direction: FlexDirection,
    pub justify: FlexJustify,
    pub align: FlexAlign,
    /// Gap between children, in CSS pixels.
    #[serde(default)]
    pub gap: f32,
}

/// Grid settings for a `LayoutType::Grid` container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridLayout {
    pub columns: u32,
    pub rows: u32,
    /// Gap between cells, in CSS pixels.
    #[serde(default)]
    pub gap: f32,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            columns: 1,
            rows: 1,
            gap: 0.0,
        }
    }
}
