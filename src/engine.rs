//! On-demand absolute position resolution.
//!
//! Absolute positions are recomputed from the relative-coordinate tree and
//! the transient drag overlay every time they are needed; there is no cached
//! copy of screen-space geometry that could drift out of sync with the tree.

use crate::geometry::Rect;
use crate::model::{Annotation, AnnotationId};
use crate::overlay::DragOverlay;
use crate::store::AnnotationStore;

/// Read-only view combining the committed tree with live drag offsets.
#[derive(Clone, Copy)]
pub struct CoordinateEngine<'a> {
    store: &'a AnnotationStore,
    overlay: &'a DragOverlay,
}

impl<'a> CoordinateEngine<'a> {
    pub fn new(store: &'a AnnotationStore, overlay: &'a DragOverlay) -> Self {
        Self { store, overlay }
    }

    /// Absolute position of `id` in the image frame, or `None` for unknown
    /// ids.
    ///
    /// Ancestor translations compose additively; width and height are always
    /// the annotation's own. A drag offset applies only at the root-most
    /// node of the chain, so dragging a container carries its whole subtree
    /// along without touching stored geometry.
    pub fn absolute_position(&self, id: AnnotationId) -> Option<Rect> {
        self.store.get(id).map(|annotation| self.resolve(annotation))
    }

    fn resolve(&self, annotation: &Annotation) -> Rect {
        let parent = match annotation.parent_id {
            Some(parent_id) => {
                let parent = self.store.get(parent_id);
                if parent.is_none() {
                    // A well-formed tree never produces this; hand-edited
                    // record files can. Degrade to root behavior.
                    log::warn!(
                        "Annotation {} references missing parent {parent_id}",
                        annotation.id
                    );
                }
                parent
            }
            None => None,
        };

        match parent {
            Some(parent) => {
                let origin = self.resolve(parent);
                Rect::new(
                    origin.x + annotation.rect.x,
                    origin.y + annotation.rect.y,
                    annotation.rect.w,
                    annotation.rect.h,
                )
            }
            None => match self.overlay.get(annotation.id) {
                Some(offset) => annotation.rect.translated(offset.x, offset.y),
                None => annotation.rect,
            },
        }
    }
}
