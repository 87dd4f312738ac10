//! Annotation node type and hierarchy constants.

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;
use crate::model::layout::{FlexLayout, GridLayout, LayoutType};

/// Unique identifier for an annotation.
pub type AnnotationId = u32;

/// Maximum number of ancestor hops from a root (four nesting levels total).
pub const MAX_NESTING_DEPTH: usize = 3;

/// Offset applied to the root of a duplicated subtree, in its own frame.
pub const DUPLICATE_OFFSET: f32 = 0.02;

/// Border color assigned to newly created annotations.
pub const DEFAULT_ANNOTATION_COLOR: &str = "#3b82f6";

/// Component kind stamped onto new annotations until the session default
/// is changed.
pub const DEFAULT_COMPONENT_KIND: &str = "Button";

/// Canonical component kind for layout containers.
pub const CONTAINER_COMPONENT_KIND: &str = "Box";

/// A rectangular annotation in the hierarchy.
///
/// Geometry is stored relative to the immediate parent's frame (the image
/// frame for roots) and composes by translation only: width and height are
/// always the annotation's own, never scaled by ancestors.
///
/// Fields serialize in camelCase, the wire shape of the `annotations.json`
/// files the embedding editor persists and re-imports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    /// Unique identifier.
    pub id: AnnotationId,
    /// Geometry relative to the parent's frame.
    #[serde(flatten)]
    pub rect: Rect,
    /// UI component kind (free-form, e.g. "Button", "Card").
    pub component_kind: String,
    /// Free-text motion and behavior notes.
    pub motion_info: String,
    /// Border color (CSS hex).
    pub color: String,
    /// Back-reference to the parent; `None` for roots.
    pub parent_id: Option<AnnotationId>,
    /// Advisory cache of child ids. The store keeps it consistent with
    /// `parent_id` writes, but traversal re-derives children by scanning.
    #[serde(default)]
    pub children: Vec<AnnotationId>,
    /// Layout role; only box/flex/grid nodes may hold children.
    #[serde(default)]
    pub layout_type: LayoutType,
    /// Flexbox detail, read only while `layout_type` is `Flex`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flex_layout: Option<FlexLayout>,
    /// Grid detail, read only while `layout_type` is `Grid`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_layout: Option<GridLayout>,
}

impl Annotation {
    /// Create a root-level annotation with default styling.
    pub fn new(id: AnnotationId, rect: Rect, component_kind: impl Into<String>) -> Self {
        Self {
            id,
            rect,
            component_kind: component_kind.into(),
            motion_info: String::new(),
            color: DEFAULT_ANNOTATION_COLOR.to_string(),
            parent_id: None,
            children: Vec::new(),
            layout_type: LayoutType::None,
            flex_layout: None,
            grid_layout: None,
        }
    }

    /// Whether this annotation may legally hold children.
    pub fn is_container(&self) -> bool {
        self.layout_type.is_container()
    }
}
