//! Transient drag offsets for live gestures.
//!
//! While the user drags an annotation, the UI records the uncommitted delta
//! here instead of writing it into stored geometry. The coordinate engine
//! folds the offset into absolute positions for rendering and hit testing;
//! on commit the UI writes the final position through the store and clears
//! the entry. `clear_all` must also run when a gesture is abandoned
//! (pointer-up outside the surface, pointer-leave) so no annotation keeps
//! rendering at a stale offset.

use std::collections::HashMap;

use crate::geometry::Point;
use crate::model::AnnotationId;

/// Uncommitted positional deltas keyed by annotation id.
#[derive(Debug, Clone, Default)]
pub struct DragOverlay {
    offsets: HashMap<AnnotationId, Point>,
}

impl DragOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or update the live delta for an annotation.
    pub fn set(&mut self, id: AnnotationId, dx: f32, dy: f32) {
        self.offsets.insert(id, Point::new(dx, dy));
    }

    /// Current delta for an annotation, if one is registered.
    pub fn get(&self, id: AnnotationId) -> Option<Point> {
        self.offsets.get(&id).copied()
    }

    /// Drop the delta for one annotation (gesture commit).
    pub fn clear(&mut self, id: AnnotationId) -> Option<Point> {
        self.offsets.remove(&id)
    }

    /// Drop every delta (gesture end or abandonment).
    pub fn clear_all(&mut self) {
        self.offsets.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}
