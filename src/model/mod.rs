//! Data model for the annotation hierarchy.

mod annotation;
mod layout;

pub use annotation::{
    Annotation, AnnotationId, CONTAINER_COMPONENT_KIND, DEFAULT_ANNOTATION_COLOR,
    DEFAULT_COMPONENT_KIND, DUPLICATE_OFFSET, MAX_NESTING_DEPTH,
};
pub use layout::{FlexAlign, FlexDirection, FlexJustify, FlexLayout, GridLayout, LayoutType};
