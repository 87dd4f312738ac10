//! Annotation storage and hierarchy management.
//!
//! The store is an arena of annotations keyed by id, with a separate
//! insertion-order index. Structure is carried by the `parent_id`
//! back-references; the per-node `children` lists are an advisory cache
//! that every mutating operation keeps consistent with its `parent_id`
//! writes. Mutations are synchronous and atomic with respect to the UI
//! event that triggered them: an operation either succeeds, or rejects and
//! leaves the tree untouched.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::engine::CoordinateEngine;
use crate::error::HierarchyError;
use crate::geometry::{Point, Rect};
use crate::model::{
    Annotation, AnnotationId, CONTAINER_COMPONENT_KIND, DEFAULT_COMPONENT_KIND, DUPLICATE_OFFSET,
    FlexLayout, GridLayout, LayoutType, MAX_NESTING_DEPTH,
};
use crate::overlay::DragOverlay;

/// Arena of annotations with hierarchy bookkeeping and selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationStore {
    /// All annotations, keyed by their id.
    nodes: HashMap<AnnotationId, Annotation>,
    /// Ids in insertion order; later entries render (and hit-test) on top.
    order: Vec<AnnotationId>,
    /// Counter for generating unique ids.
    next_id: AnnotationId,
    /// Component kind stamped onto new annotations.
    default_component_kind: String,
    /// Currently selected annotation.
    #[serde(skip)]
    selected_id: Option<AnnotationId>,
    /// Set when annotations or selection change. UI collaborators use it
    /// to avoid rebuilding their overlay every frame.
    #[serde(skip)]
    dirty: bool,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            order: Vec::new(),
            next_id: 1,
            default_component_kind: DEFAULT_COMPONENT_KIND.to_string(),
            selected_id: None,
            dirty: true, // Start dirty so the first overlay build happens
        }
    }

    /// Rebuild a store from a previously exported flat record array.
    ///
    /// Insertion order follows the array and the id counter resumes past
    /// the highest id present. Dangling `parent_id` references are kept
    /// as-is; the coordinate engine degrades them to root behavior.
    pub fn from_annotations(annotations: Vec<Annotation>) -> Self {
        let mut store = Self::new();
        for annotation in annotations {
            if store.nodes.contains_key(&annotation.id) {
                log::warn!(
                    "Duplicate annotation id {} in imported records, keeping the first",
                    annotation.id
                );
                continue;
            }
            store.next_id = store.next_id.max(annotation.id + 1);
            store.order.push(annotation.id);
            store.nodes.insert(annotation.id, annotation);
        }
        store
    }

    // ========================================================================
    // Change tracking and selection
    // ========================================================================

    /// Check if the store has been modified since the last `clear_dirty`.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the dirty flag. Call after rebuilding derived UI state.
    #[inline]
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Mark the store as dirty.
    #[inline]
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Select an annotation (or clear the selection with `None`).
    pub fn select(&mut self, id: Option<AnnotationId>) {
        if self.selected_id != id {
            self.selected_id = id;
            self.mark_dirty();
        }
    }

    /// The currently selected annotation id.
    pub fn selected(&self) -> Option<AnnotationId> {
        self.selected_id
    }

    /// Session default stamped onto new annotations.
    pub fn default_component_kind(&self) -> &str {
        &self.default_component_kind
    }

    /// Change the session default component kind.
    pub fn set_default_component_kind(&mut self, kind: impl Into<String>) {
        self.default_component_kind = kind.into();
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Get an annotation by id.
    pub fn get(&self, id: AnnotationId) -> Option<&Annotation> {
        self.nodes.get(&id)
    }

    /// Number of annotations in the store.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if the store holds no annotations.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Ids in insertion order.
    pub fn ids(&self) -> &[AnnotationId] {
        &self.order
    }

    /// Annotations in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Root annotations in insertion order.
    pub fn roots(&self) -> impl Iterator<Item = &Annotation> {
        self.iter().filter(|a| a.parent_id.is_none())
    }

    /// Children of `id` in insertion order, re-derived from `parent_id`.
    pub fn children_of(&self, id: AnnotationId) -> Vec<&Annotation> {
        self.iter().filter(|a| a.parent_id == Some(id)).collect()
    }

    /// Ancestor hops from `id` to its root.
    ///
    /// Unknown ids and dangling parent references count as depth 0.
    pub fn depth_of(&self, id: AnnotationId) -> usize {
        let mut depth = 0;
        let mut current = self.nodes.get(&id);
        while let Some(annotation) = current {
            match annotation.parent_id.and_then(|pid| self.nodes.get(&pid)) {
                Some(parent) => {
                    depth += 1;
                    current = Some(parent);
                }
                None => break,
            }
        }
        depth
    }

    /// Depth-annotated pre-order flattening for list display.
    ///
    /// Traversal re-derives children from `parent_id` scans, so the list
    /// shows the true structure even if a `children` cache went stale.
    pub fn hierarchical(&self) -> Vec<(&Annotation, usize)> {
        let mut result = Vec::with_capacity(self.len());
        for root in self.roots() {
            self.push_subtree(root, 0, &mut result);
        }
        result
    }

    fn push_subtree<'a>(
        &'a self,
        annotation: &'a Annotation,
        depth: usize,
        out: &mut Vec<(&'a Annotation, usize)>,
    ) {
        out.push((annotation, depth));
        for child in self.children_of(annotation.id) {
            self.push_subtree(child, depth + 1, out);
        }
    }

    /// Ids of `id` and every descendant.
    fn collect_subtree(&self, id: AnnotationId) -> Vec<AnnotationId> {
        let mut ids = vec![id];
        let mut cursor = 0;
        while cursor < ids.len() {
            let current = ids[cursor];
            cursor += 1;
            for annotation in self.iter() {
                if annotation.parent_id == Some(current) {
                    ids.push(annotation.id);
                }
            }
        }
        ids
    }

    /// Longest child chain below `id` (0 for a leaf).
    fn subtree_height(&self, id: AnnotationId) -> usize {
        self.children_of(id)
            .iter()
            .map(|child| 1 + self.subtree_height(child.id))
            .max()
            .unwrap_or(0)
    }

    // ========================================================================
    // Creation, deletion, duplication
    // ========================================================================

    /// Create a root-level annotation and select it.
    ///
    /// Geometry arrives in the image frame, which for a root is also its
    /// stored frame. The creating collaborator filters degenerate input
    /// (zero-area, off-canvas) before calling.
    pub fn add(&mut self, rect: Rect) -> AnnotationId {
        let id = self.next_id;
        self.next_id += 1;
        let annotation = Annotation::new(id, rect, self.default_component_kind.clone());
        self.nodes.insert(id, annotation);
        self.order.push(id);
        self.selected_id = Some(id);
        self.mark_dirty();
        log::debug!("Added annotation {id} at ({:.3}, {:.3})", rect.x, rect.y);
        id
    }

    /// Remove an annotation and, recursively, its whole subtree.
    ///
    /// Deleting a container always destroys its content. Unknown ids are a
    /// silent no-op. Selection clears when the selected annotation was part
    /// of the deleted subtree.
    pub fn delete(&mut self, id: AnnotationId) {
        if !self.nodes.contains_key(&id) {
            return;
        }
        let doomed = self.collect_subtree(id);

        // Prune the cache entry on the parent that survives the delete.
        let parent_id = self.nodes.get(&id).and_then(|a| a.parent_id);
        if let Some(parent_id) = parent_id {
            if let Some(parent) = self.nodes.get_mut(&parent_id) {
                parent.children.retain(|child| *child != id);
            }
        }

        for victim in &doomed {
            self.nodes.remove(victim);
        }
        self.order.retain(|kept| !doomed.contains(kept));

        if let Some(selected) = self.selected_id {
            if doomed.contains(&selected) {
                self.selected_id = None;
            }
        }
        self.mark_dirty();
        log::debug!("Deleted annotation {id} and {} descendants", doomed.len() - 1);
    }

    /// Deep-clone the subtree rooted at `id`.
    ///
    /// Every clone gets a fresh id. The clone of the root is offset by
    /// `DUPLICATE_OFFSET` in both axes of its own frame and becomes a
    /// sibling of the source; descendants keep their relative offsets.
    /// Selection moves to the cloned root. Returns `None` for unknown ids.
    pub fn duplicate(&mut self, id: AnnotationId) -> Option<AnnotationId> {
        let source = self.nodes.get(&id)?;
        let source_parent = source.parent_id;

        let mut next_id = self.next_id;
        let mut clones = Vec::new();
        let clone_root =
            self.clone_subtree(source, source_parent, DUPLICATE_OFFSET, &mut next_id, &mut clones);
        self.next_id = next_id;

        let clone_count = clones.len();
        for clone in clones {
            self.order.push(clone.id);
            self.nodes.insert(clone.id, clone);
        }
        if let Some(parent_id) = source_parent {
            if let Some(parent) = self.nodes.get_mut(&parent_id) {
                parent.children.push(clone_root);
            }
        }
        self.selected_id = Some(clone_root);
        self.mark_dirty();
        log::debug!("Duplicated annotation {id} into {clone_root} ({clone_count} nodes)");
        Some(clone_root)
    }

    fn clone_subtree(
        &self,
        source: &Annotation,
        parent_id: Option<AnnotationId>,
        offset: f32,
        next_id: &mut AnnotationId,
        clones: &mut Vec<Annotation>,
    ) -> AnnotationId {
        let new_id = *next_id;
        *next_id += 1;

        let mut clone = source.clone();
        clone.id = new_id;
        clone.parent_id = parent_id;
        clone.rect = source.rect.translated(offset, offset);
        clone.children = Vec::new();
        let slot = clones.len();
        clones.push(clone);

        let mut new_children = Vec::new();
        for child in self.children_of(source.id) {
            // Only the clone root is offset; descendants keep their frame.
            new_children.push(self.clone_subtree(child, Some(new_id), 0.0, next_id, clones));
        }
        clones[slot].children = new_children;
        new_id
    }

    // ========================================================================
    // Field updates
    // ========================================================================

    /// Update the component kind; `false` when the id is unknown.
    pub fn set_component_kind(&mut self, id: AnnotationId, kind: impl Into<String>) -> bool {
        let Some(annotation) = self.nodes.get_mut(&id) else {
            return false;
        };
        annotation.component_kind = kind.into();
        self.mark_dirty();
        true
    }

    /// Update the motion/behavior notes; `false` when the id is unknown.
    pub fn set_motion_info(&mut self, id: AnnotationId, info: impl Into<String>) -> bool {
        let Some(annotation) = self.nodes.get_mut(&id) else {
            return false;
        };
        annotation.motion_info = info.into();
        self.mark_dirty();
        true
    }

    /// Update the border color; `false` when the id is unknown.
    pub fn set_color(&mut self, id: AnnotationId, color: impl Into<String>) -> bool {
        let Some(annotation) = self.nodes.get_mut(&id) else {
            return false;
        };
        annotation.color = color.into();
        self.mark_dirty();
        true
    }

    /// Set the layout role.
    ///
    /// A non-`None` role turns the annotation into a container, which forces
    /// its component kind to the canonical "Box" in the same update: a
    /// layout container is never simultaneously a leaf widget.
    pub fn set_layout_type(&mut self, id: AnnotationId, layout: LayoutType) -> bool {
        let Some(annotation) = self.nodes.get_mut(&id) else {
            return false;
        };
        annotation.layout_type = layout;
        if layout.is_container() {
            annotation.component_kind = CONTAINER_COMPONENT_KIND.to_string();
        }
        self.mark_dirty();
        true
    }

    /// Set the flexbox detail; `false` when the id is unknown.
    pub fn set_flex_layout(&mut self, id: AnnotationId, flex: FlexLayout) -> bool {
        let Some(annotation) = self.nodes.get_mut(&id) else {
            return false;
        };
        annotation.flex_layout = Some(flex);
        self.mark_dirty();
        true
    }

    /// Set the grid detail; `false` when the id is unknown.
    pub fn set_grid_layout(&mut self, id: AnnotationId, grid: GridLayout) -> bool {
        let Some(annotation) = self.nodes.get_mut(&id) else {
            return false;
        };
        annotation.grid_layout = Some(grid);
        self.mark_dirty();
        true
    }

    // ========================================================================
    // Geometry commits
    // ========================================================================

    /// Origin of the frame `id`'s geometry is stored in: the parent's
    /// absolute position, or the image origin for roots and dangling
    /// parent references. `None` when `id` itself is unknown.
    fn parent_frame_origin(&self, id: AnnotationId, overlay: &DragOverlay) -> Option<Point> {
        let annotation = self.nodes.get(&id)?;
        let origin = match annotation.parent_id {
            Some(parent_id) => CoordinateEngine::new(self, overlay)
                .absolute_position(parent_id)
                .map(|r| Point::new(r.x, r.y))
                .unwrap_or_default(),
            None => Point::default(),
        };
        Some(origin)
    }

    /// Commit an absolute position produced by a drag gesture.
    ///
    /// The value is converted into the parent's frame using the parent's
    /// absolute position at commit time (live drag offsets included), so a
    /// parent that itself moved during the same gesture sequence is
    /// accounted for. Returns `false` for unknown ids.
    pub fn update_position(
        &mut self,
        id: AnnotationId,
        abs_x: f32,
        abs_y: f32,
        overlay: &DragOverlay,
    ) -> bool {
        let Some(origin) = self.parent_frame_origin(id, overlay) else {
            return false;
        };
        let Some(annotation) = self.nodes.get_mut(&id) else {
            return false;
        };
        annotation.rect.x = abs_x - origin.x;
        annotation.rect.y = abs_y - origin.y;
        self.mark_dirty();
        true
    }

    /// Commit an absolute position and size from a resize gesture.
    ///
    /// Same frame conversion as `update_position`; width and height are
    /// stored as given, since size never scales through ancestors.
    pub fn update_size(&mut self, id: AnnotationId, abs: Rect, overlay: &DragOverlay) -> bool {
        let Some(origin) = self.parent_frame_origin(id, overlay) else {
            return false;
        };
        let Some(annotation) = self.nodes.get_mut(&id) else {
            return false;
        };
        annotation.rect = Rect::new(abs.x - origin.x, abs.y - origin.y, abs.w, abs.h);
        self.mark_dirty();
        true
    }

    // ========================================================================
    // Reparenting
    // ========================================================================

    /// Move `child` under a new parent, or detach it to root with `None`.
    ///
    /// The child's absolute position is captured once before the move and
    /// re-expressed in the new parent's frame, so the rectangle never jumps
    /// when its coordinate frame changes. Validation failures leave the
    /// tree untouched.
    pub fn reparent(
        &mut self,
        child: AnnotationId,
        new_parent: Option<AnnotationId>,
        overlay: &DragOverlay,
    ) -> Result<(), HierarchyError> {
        if new_parent == Some(child) {
            return Err(HierarchyError::SelfParent { id: child });
        }
        if !self.nodes.contains_key(&child) {
            return Err(HierarchyError::NotFound { id: child });
        }
        if let Some(parent_id) = new_parent {
            let Some(parent) = self.nodes.get(&parent_id) else {
                return Err(HierarchyError::NotFound { id: parent_id });
            };
            if !parent.is_container() {
                return Err(HierarchyError::NotAContainer { id: parent_id });
            }
            if self.collect_subtree(child).contains(&parent_id) {
                return Err(HierarchyError::CycleAttempt {
                    child,
                    parent: parent_id,
                });
            }
            // The whole moved subtree must stay within the nesting limit.
            let landing_depth = self.depth_of(parent_id) + 1 + self.subtree_height(child);
            if landing_depth > MAX_NESTING_DEPTH {
                return Err(HierarchyError::DepthExceeded {
                    max: MAX_NESTING_DEPTH,
                });
            }
        }

        // Capture the pre-move absolute position once.
        let (abs, new_origin) = {
            let engine = CoordinateEngine::new(self, overlay);
            let abs = engine
                .absolute_position(child)
                .ok_or(HierarchyError::NotFound { id: child })?;
            let origin = match new_parent {
                Some(parent_id) => engine
                    .absolute_position(parent_id)
                    .map(|r| Point::new(r.x, r.y))
                    .unwrap_or_default(),
                None => Point::default(),
            };
            (abs, origin)
        };

        let old_parent = self.nodes.get(&child).and_then(|a| a.parent_id);
        if let Some(annotation) = self.nodes.get_mut(&child) {
            annotation.rect = Rect::new(abs.x - new_origin.x, abs.y - new_origin.y, abs.w, abs.h);
            annotation.parent_id = new_parent;
        }
        if let Some(old_id) = old_parent {
            if let Some(parent) = self.nodes.get_mut(&old_id) {
                parent.children.retain(|c| *c != child);
            }
        }
        if let Some(new_id) = new_parent {
            if let Some(parent) = self.nodes.get_mut(&new_id) {
                parent.children.push(child);
            }
        }
        self.mark_dirty();
        log::debug!("Reparented annotation {child} under {new_parent:?}");
        Ok(())
    }
}

impl Default for AnnotationStore {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Rect {
        Rect::new(x, y, w, h)
    }

    /// Add a root annotation and give it a containment role.
    fn container(store: &mut AnnotationStore, r: Rect) -> AnnotationId {
        let id = store.add(r);
        store.set_layout_type(id, LayoutType::Box);
        id
    }

    fn abs_of(store: &AnnotationStore, id: AnnotationId) -> Rect {
        CoordinateEngine::new(store, &DragOverlay::new())
            .absolute_position(id)
            .unwrap()
    }

    #[test]
    fn test_add_defaults_and_selection() {
        let mut store = AnnotationStore::new();
        let id = store.add(rect(0.1, 0.2, 0.3, 0.4));

        let annotation = store.get(id).unwrap();
        assert_eq!(annotation.component_kind, DEFAULT_COMPONENT_KIND);
        assert_eq!(annotation.layout_type, LayoutType::None);
        assert!(annotation.parent_id.is_none());
        assert_eq!(store.selected(), Some(id));
    }

    #[test]
    fn test_add_uses_session_default_kind() {
        let mut store = AnnotationStore::new();
        store.set_default_component_kind("Card");
        let id = store.add(rect(0.0, 0.0, 0.1, 0.1));
        assert_eq!(store.get(id).unwrap().component_kind, "Card");
    }

    #[test]
    fn test_delete_cascades_to_descendants() {
        let mut store = AnnotationStore::new();
        let overlay = DragOverlay::new();
        let root = container(&mut store, rect(0.0, 0.0, 0.9, 0.9));
        let child = container(&mut store, rect(0.1, 0.1, 0.5, 0.5));
        let grandchild = store.add(rect(0.2, 0.2, 0.1, 0.1));
        let sibling = store.add(rect(0.7, 0.7, 0.1, 0.1));
        store.reparent(child, Some(root), &overlay).unwrap();
        store.reparent(grandchild, Some(child), &overlay).unwrap();

        store.delete(root);

        assert_eq!(store.len(), 1);
        assert!(store.get(sibling).is_some());
        assert!(store.get(root).is_none());
        assert!(store.get(child).is_none());
        assert!(store.get(grandchild).is_none());
        // No orphan keeps pointing at a deleted node.
        assert!(store.iter().all(|a| a.parent_id.is_none()));
    }

    #[test]
    fn test_delete_clears_descendant_selection() {
        let mut store = AnnotationStore::new();
        let overlay = DragOverlay::new();
        let root = container(&mut store, rect(0.0, 0.0, 0.9, 0.9));
        let child = store.add(rect(0.1, 0.1, 0.2, 0.2));
        store.reparent(child, Some(root), &overlay).unwrap();
        store.select(Some(child));

        store.delete(root);
        assert_eq!(store.selected(), None);
    }

    #[test]
    fn test_delete_prunes_parent_children_cache() {
        let mut store = AnnotationStore::new();
        let overlay = DragOverlay::new();
        let root = container(&mut store, rect(0.0, 0.0, 0.9, 0.9));
        let child = store.add(rect(0.1, 0.1, 0.2, 0.2));
        store.reparent(child, Some(root), &overlay).unwrap();

        store.delete(child);
        assert!(store.get(root).unwrap().children.is_empty());
    }

    #[test]
    fn test_delete_unknown_is_noop() {
        let mut store = AnnotationStore::new();
        store.add(rect(0.0, 0.0, 0.1, 0.1));
        store.delete(999);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_duplicate_subtree() {
        let mut store = AnnotationStore::new();
        let overlay = DragOverlay::new();
        let root = container(&mut store, rect(0.1, 0.1, 0.5, 0.5));
        let child = store.add(rect(0.15, 0.15, 0.2, 0.2));
        store.reparent(child, Some(root), &overlay).unwrap();
        let before = store.len();

        let clone_root = store.duplicate(root).unwrap();

        // One clone per source node, all with fresh ids.
        assert_eq!(store.len(), before + 2);
        assert!(clone_root != root && clone_root != child);
        assert_eq!(store.selected(), Some(clone_root));

        // Clone root shifted by the fixed offset in its own frame.
        let original_abs = abs_of(&store, root);
        let clone_abs = abs_of(&store, clone_root);
        assert!((clone_abs.x - original_abs.x - DUPLICATE_OFFSET).abs() < 1e-6);
        assert!((clone_abs.y - original_abs.y - DUPLICATE_OFFSET).abs() < 1e-6);

        // Descendants keep their relative offsets from the cloned parent.
        let clone_children = store.children_of(clone_root);
        assert_eq!(clone_children.len(), 1);
        let cloned_child = clone_children[0];
        let source_child = store.get(child).unwrap();
        assert_eq!(cloned_child.rect, source_child.rect);
        assert_eq!(cloned_child.parent_id, Some(clone_root));

        // The children cache was rebuilt from the fresh id mapping.
        assert_eq!(store.get(clone_root).unwrap().children, vec![cloned_child.id]);
    }

    #[test]
    fn test_duplicate_child_is_sibling_of_source() {
        let mut store = AnnotationStore::new();
        let overlay = DragOverlay::new();
        let root = container(&mut store, rect(0.0, 0.0, 0.9, 0.9));
        let child = store.add(rect(0.1, 0.1, 0.2, 0.2));
        store.reparent(child, Some(root), &overlay).unwrap();

        let clone = store.duplicate(child).unwrap();

        assert_eq!(store.get(clone).unwrap().parent_id, Some(root));
        // The shared parent's cache lists both siblings.
        assert_eq!(store.get(root).unwrap().children, vec![child, clone]);
    }

    #[test]
    fn test_duplicate_unknown_returns_none() {
        let mut store = AnnotationStore::new();
        assert!(store.duplicate(42).is_none());
    }

    #[test]
    fn test_set_layout_type_forces_container_kind() {
        let mut store = AnnotationStore::new();
        let id = store.add(rect(0.0, 0.0, 0.3, 0.3));
        assert_eq!(store.get(id).unwrap().component_kind, DEFAULT_COMPONENT_KIND);

        store.set_layout_type(id, LayoutType::Flex);
        let annotation = store.get(id).unwrap();
        assert_eq!(annotation.layout_type, LayoutType::Flex);
        assert_eq!(annotation.component_kind, CONTAINER_COMPONENT_KIND);

        // Clearing the role keeps whatever kind is set.
        store.set_layout_type(id, LayoutType::None);
        assert_eq!(store.get(id).unwrap().component_kind, CONTAINER_COMPONENT_KIND);
    }

    #[test]
    fn test_update_position_converts_to_parent_frame() {
        let mut store = AnnotationStore::new();
        let overlay = DragOverlay::new();
        let root = container(&mut store, rect(0.2, 0.2, 0.6, 0.6));
        let child = store.add(rect(0.3, 0.3, 0.1, 0.1));
        store.reparent(child, Some(root), &overlay).unwrap();

        store.update_position(child, 0.5, 0.5, &overlay);

        let stored = store.get(child).unwrap().rect;
        assert!((stored.x - 0.3).abs() < 1e-6);
        assert!((stored.y - 0.3).abs() < 1e-6);
        let abs = abs_of(&store, child);
        assert!((abs.x - 0.5).abs() < 1e-6 && (abs.y - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_update_position_uses_parent_at_commit_time() {
        let mut store = AnnotationStore::new();
        let overlay = DragOverlay::new();
        let root = container(&mut store, rect(0.2, 0.2, 0.6, 0.6));
        let child = store.add(rect(0.3, 0.3, 0.1, 0.1));
        store.reparent(child, Some(root), &overlay).unwrap();

        // The parent is mid-drag when the child commit arrives.
        let mut live = DragOverlay::new();
        live.set(root, 0.1, 0.1);
        store.update_position(child, 0.5, 0.5, &live);

        // Relative value subtracts the parent's *live* position (0.3, 0.3).
        let stored = store.get(child).unwrap().rect;
        assert!((stored.x - 0.2).abs() < 1e-6);
        assert!((stored.y - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_update_size_stores_own_extent() {
        let mut store = AnnotationStore::new();
        let overlay = DragOverlay::new();
        let root = container(&mut store, rect(0.1, 0.1, 0.8, 0.8));
        let child = store.add(rect(0.2, 0.2, 0.2, 0.2));
        store.reparent(child, Some(root), &overlay).unwrap();

        store.update_size(child, rect(0.3, 0.4, 0.25, 0.15), &overlay);

        let stored = store.get(child).unwrap().rect;
        assert!((stored.x - 0.2).abs() < 1e-6);
        assert!((stored.y - 0.3).abs() < 1e-6);
        assert!((stored.w - 0.25).abs() < 1e-6);
        assert!((stored.h - 0.15).abs() < 1e-6);
    }

    #[test]
    fn test_reparent_preserves_absolute_position() {
        let mut store = AnnotationStore::new();
        let overlay = DragOverlay::new();
        let root = container(&mut store, rect(0.1, 0.1, 0.5, 0.5));
        let free = store.add(rect(0.0, 0.0, 0.2, 0.2));

        store.reparent(free, Some(root), &overlay).unwrap();

        // Stored geometry is re-expressed in the parent's frame...
        let stored = store.get(free).unwrap().rect;
        assert!((stored.x + 0.1).abs() < 1e-6);
        assert!((stored.y + 0.1).abs() < 1e-6);
        assert!((stored.w - 0.2).abs() < 1e-6);

        // ...and the absolute position did not move.
        let abs = abs_of(&store, free);
        assert!(abs.x.abs() < 1e-6 && abs.y.abs() < 1e-6);
        assert_eq!(store.get(free).unwrap().parent_id, Some(root));
        assert_eq!(store.get(root).unwrap().children, vec![free]);
    }

    #[test]
    fn test_reparent_detach_to_root_preserves_absolute() {
        let mut store = AnnotationStore::new();
        let overlay = DragOverlay::new();
        let root = container(&mut store, rect(0.1, 0.1, 0.5, 0.5));
        let child = store.add(rect(0.3, 0.3, 0.2, 0.2));
        store.reparent(child, Some(root), &overlay).unwrap();
        let abs_before = abs_of(&store, child);

        store.reparent(child, None, &overlay).unwrap();

        let annotation = store.get(child).unwrap();
        assert!(annotation.parent_id.is_none());
        assert_eq!(annotation.rect, abs_before);
        assert!(store.get(root).unwrap().children.is_empty());
    }

    #[test]
    fn test_reparent_into_self_is_rejected() {
        let mut store = AnnotationStore::new();
        let overlay = DragOverlay::new();
        let id = container(&mut store, rect(0.1, 0.1, 0.5, 0.5));
        let before = store.get(id).unwrap().clone();

        let err = store.reparent(id, Some(id), &overlay).unwrap_err();
        assert_eq!(err, HierarchyError::SelfParent { id });
        assert_eq!(store.get(id).unwrap(), &before);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_reparent_into_own_descendant_is_rejected() {
        let mut store = AnnotationStore::new();
        let overlay = DragOverlay::new();
        let root = container(&mut store, rect(0.0, 0.0, 0.9, 0.9));
        let child = container(&mut store, rect(0.1, 0.1, 0.5, 0.5));
        store.reparent(child, Some(root), &overlay).unwrap();

        let err = store.reparent(root, Some(child), &overlay).unwrap_err();
        assert_eq!(
            err,
            HierarchyError::CycleAttempt {
                child: root,
                parent: child
            }
        );
        // Tree unchanged.
        assert_eq!(store.get(root).unwrap().parent_id, None);
        assert_eq!(store.get(child).unwrap().parent_id, Some(root));
    }

    #[test]
    fn test_reparent_into_non_container_is_rejected() {
        let mut store = AnnotationStore::new();
        let overlay = DragOverlay::new();
        let widget = store.add(rect(0.0, 0.0, 0.5, 0.5));
        let other = store.add(rect(0.5, 0.5, 0.2, 0.2));

        let err = store.reparent(other, Some(widget), &overlay).unwrap_err();
        assert_eq!(err, HierarchyError::NotAContainer { id: widget });
        assert!(store.get(other).unwrap().parent_id.is_none());
    }

    #[test]
    fn test_reparent_unknown_ids_are_rejected() {
        let mut store = AnnotationStore::new();
        let overlay = DragOverlay::new();
        let id = container(&mut store, rect(0.0, 0.0, 0.5, 0.5));

        assert_eq!(
            store.reparent(999, Some(id), &overlay).unwrap_err(),
            HierarchyError::NotFound { id: 999 }
        );
        assert_eq!(
            store.reparent(id, Some(999), &overlay).unwrap_err(),
            HierarchyError::NotFound { id: 999 }
        );
    }

    #[test]
    fn test_reparent_depth_limit() {
        let mut store = AnnotationStore::new();
        let overlay = DragOverlay::new();
        let level0 = container(&mut store, rect(0.0, 0.0, 0.9, 0.9));
        let level1 = container(&mut store, rect(0.01, 0.01, 0.8, 0.8));
        let level2 = container(&mut store, rect(0.02, 0.02, 0.7, 0.7));
        let level3 = container(&mut store, rect(0.03, 0.03, 0.6, 0.6));
        store.reparent(level1, Some(level0), &overlay).unwrap();
        store.reparent(level2, Some(level1), &overlay).unwrap();
        store.reparent(level3, Some(level2), &overlay).unwrap();
        assert_eq!(store.depth_of(level3), 3);

        // A fifth level would sit at depth 4.
        let extra = store.add(rect(0.04, 0.04, 0.1, 0.1));
        let err = store.reparent(extra, Some(level3), &overlay).unwrap_err();
        assert_eq!(
            err,
            HierarchyError::DepthExceeded {
                max: MAX_NESTING_DEPTH
            }
        );
        assert!(store.get(extra).unwrap().parent_id.is_none());
    }

    #[test]
    fn test_reparent_depth_limit_counts_subtree_height() {
        let mut store = AnnotationStore::new();
        let overlay = DragOverlay::new();
        let level0 = container(&mut store, rect(0.0, 0.0, 0.9, 0.9));
        let level1 = container(&mut store, rect(0.01, 0.01, 0.8, 0.8));
        let level2 = container(&mut store, rect(0.02, 0.02, 0.7, 0.7));
        store.reparent(level1, Some(level0), &overlay).unwrap();
        store.reparent(level2, Some(level1), &overlay).unwrap();

        // A subtree of height 1 cannot land at depth 3.
        let tall = container(&mut store, rect(0.5, 0.5, 0.3, 0.3));
        let leaf = store.add(rect(0.55, 0.55, 0.1, 0.1));
        store.reparent(leaf, Some(tall), &overlay).unwrap();
        let err = store.reparent(tall, Some(level2), &overlay).unwrap_err();
        assert_eq!(
            err,
            HierarchyError::DepthExceeded {
                max: MAX_NESTING_DEPTH
            }
        );

        // A plain leaf still fits there.
        let single = store.add(rect(0.6, 0.6, 0.05, 0.05));
        store.reparent(single, Some(level2), &overlay).unwrap();
        assert_eq!(store.depth_of(single), 3);
    }

    #[test]
    fn test_depth_stays_within_limit_after_operations() {
        let mut store = AnnotationStore::new();
        let overlay = DragOverlay::new();
        let a = container(&mut store, rect(0.0, 0.0, 0.9, 0.9));
        let b = container(&mut store, rect(0.01, 0.01, 0.8, 0.8));
        let c = container(&mut store, rect(0.02, 0.02, 0.7, 0.7));
        let d = store.add(rect(0.03, 0.03, 0.1, 0.1));
        store.reparent(b, Some(a), &overlay).unwrap();
        store.reparent(c, Some(b), &overlay).unwrap();
        store.reparent(d, Some(c), &overlay).unwrap();
        store.duplicate(b);
        store.delete(d);
        let _ = store.reparent(c, Some(a), &overlay);

        for (annotation, depth) in store.hierarchical() {
            assert!(depth <= MAX_NESTING_DEPTH, "annotation {} too deep", annotation.id);
            assert!(store.depth_of(annotation.id) <= MAX_NESTING_DEPTH);
        }
    }

    #[test]
    fn test_hierarchical_is_preorder_with_depths() {
        let mut store = AnnotationStore::new();
        let overlay = DragOverlay::new();
        let root_a = container(&mut store, rect(0.0, 0.0, 0.4, 0.4));
        let child_a = store.add(rect(0.05, 0.05, 0.1, 0.1));
        let root_b = store.add(rect(0.5, 0.5, 0.3, 0.3));
        store.reparent(child_a, Some(root_a), &overlay).unwrap();

        let flat: Vec<(AnnotationId, usize)> = store
            .hierarchical()
            .into_iter()
            .map(|(a, depth)| (a.id, depth))
            .collect();
        assert_eq!(flat, vec![(root_a, 0), (child_a, 1), (root_b, 0)]);
    }

    #[test]
    fn test_from_annotations_resumes_id_counter() {
        let annotations = vec![
            Annotation::new(3, rect(0.0, 0.0, 0.1, 0.1), "Button"),
            Annotation::new(7, rect(0.2, 0.2, 0.1, 0.1), "Card"),
        ];
        let mut store = AnnotationStore::from_annotations(annotations);
        assert_eq!(store.len(), 2);

        let fresh = store.add(rect(0.4, 0.4, 0.1, 0.1));
        assert_eq!(fresh, 8);
    }

    #[test]
    fn test_from_annotations_skips_duplicate_ids() {
        let annotations = vec![
            Annotation::new(1, rect(0.0, 0.0, 0.1, 0.1), "Button"),
            Annotation::new(1, rect(0.5, 0.5, 0.1, 0.1), "Card"),
        ];
        let store = AnnotationStore::from_annotations(annotations);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(1).unwrap().component_kind, "Button");
    }
}
