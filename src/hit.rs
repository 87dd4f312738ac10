//! Point-to-annotation hit testing.

use crate::engine::CoordinateEngine;
use crate::geometry::Point;
use crate::model::AnnotationId;
use crate::overlay::DragOverlay;
use crate::store::AnnotationStore;

/// Finds the top-most annotation under a point.
///
/// Annotations are probed in reverse insertion order, so the most recently
/// created rectangle wins ties. This approximates visual z-order without an
/// explicit z-index. Rectangle boundaries count as inside.
pub struct HitTester<'a> {
    store: &'a AnnotationStore,
    engine: CoordinateEngine<'a>,
}

impl<'a> HitTester<'a> {
    pub fn new(store: &'a AnnotationStore, overlay: &'a DragOverlay) -> Self {
        Self {
            store,
            engine: CoordinateEngine::new(store, overlay),
        }
    }

    /// Id of the top-most annotation containing `point` (normalized image
    /// coordinates), or `None` when the point hits background.
    pub fn hit(&self, point: Point) -> Option<AnnotationId> {
        for &id in self.store.ids().iter().rev() {
            if let Some(abs) = self.engine.absolute_position(id) {
                if abs.contains(point) {
                    return Some(id);
                }
            }
        }
        None
    }
}
