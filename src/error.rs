//! Error types for hierarchy mutations.

use thiserror::Error;

use crate::model::AnnotationId;

/// Structural violations reported by tree mutations.
///
/// A rejected operation leaves the tree exactly as it was; the error carries
/// the explanation surfaced to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HierarchyError {
    /// An annotation cannot become its own parent.
    #[error("annotation {id} cannot be its own parent")]
    SelfParent {
        /// The annotation that was offered to itself
        id: AnnotationId,
    },

    /// The operation referenced an id that is not in the tree.
    #[error("annotation not found: {id}")]
    NotFound {
        /// The missing annotation id
        id: AnnotationId,
    },

    /// Only nodes with a box, flex or grid layout may hold children.
    #[error("annotation {id} is not a layout container (box, flex or grid)")]
    NotAContainer {
        /// The candidate parent without a containment role
        id: AnnotationId,
    },

    /// The candidate parent sits inside the subtree that is being moved.
    #[error("annotation {parent} is a descendant of {child}; reparenting would create a cycle")]
    CycleAttempt {
        /// The annotation being moved
        child: AnnotationId,
        /// The candidate parent found inside the moved subtree
        parent: AnnotationId,
    },

    /// The move would push part of the subtree past the nesting limit.
    #[error("nesting depth limit of {max} ancestor levels exceeded")]
    DepthExceeded {
        /// The maximum number of ancestor hops from a root
        max: usize,
    },
}
