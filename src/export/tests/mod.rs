//! Tests for the export pipeline.


use crate::geometry::Rect;
use crate::model::{AnnotationId, FlexLayout, GridLayout, LayoutType};
use crate::overlay::DragOverlay;
use crate::store::AnnotationStore;

/// Store with a flex root holding a button and a grid container holding a
/// card, plus a free-standing root widget.
pub(crate) fn create_sample_tree() -> (AnnotationStore, Vec<AnnotationId>) {
    let mut store = AnnotationStore::new();
    let overlay = DragOverlay::new();

    let root = store.add(Rect::new(0.1, 0.1, 0.8, 0.6));
    store.set_layout_type(root, LayoutType::Flex);
    store.set_flex_layout(
        root,
        FlexLayout {
            gap: 16.0,
            ..FlexLayout::default()
        },
    );
    store.set_motion_info(root, "fades in on load");

    let button = store.add(Rect::new(0.15, 0.15, 0.2, 0.1));
    store.set_component_kind(button, "Button");
    store.reparent(button, Some(root), &overlay).unwrap();

    let grid = store.add(Rect::new(0.4, 0.15, 0.4, 0.4));
    store.set_layout_type(grid, LayoutType::Grid);
    store.set_grid_layout(
        grid,
        GridLayout {
            columns: 3,
            rows: 2,
            gap: 8.0,
        },
    );
    store.reparent(grid, Some(root), &overlay).unwrap();

    let card = store.add(Rect::new(0.45, 0.2, 0.1, 0.1));
    store.set_component_kind(card, "Card");
    store.reparent(card, Some(grid), &overlay).unwrap();

    let loose = store.add(Rect::new(0.0, 0.8, 0.3, 0.15));
    store.set_component_kind(loose, "Input");

    (store, vec![root, button, grid, card, loose])
}
