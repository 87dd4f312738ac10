//! Project state: one reference image and its annotation forest.

use serde::{Deserialize, Serialize};

use crate::export::records;
use crate::export::report::{self, ReportOptions};
use crate::store::AnnotationStore;

/// Fallback image name used in reports when no reference is set.
const UNNAMED_IMAGE: &str = "image.png";

/// A single-image annotation project.
///
/// The image itself is owned by the embedding application; the core keeps
/// only an opaque reference, used as the display name in the report heading.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Project {
    /// Opaque reference to the active image.
    pub image: Option<String>,
    /// The annotation forest.
    pub annotations: AnnotationStore,
}

impl Project {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a project over the given reference image.
    pub fn with_image(image: impl Into<String>) -> Self {
        Self {
            image: Some(image.into()),
            annotations: AnnotationStore::new(),
        }
    }

    /// Render the Markdown implementation request for this project.
    pub fn export_report(&self, options: &ReportOptions) -> String {
        let image = self.image.as_deref().unwrap_or(UNNAMED_IMAGE);
        report::render(&self.annotations, image, options)
    }

    /// Serialize the flat annotation records.
    pub fn export_records(&self) -> Result<String, serde_json::Error> {
        records::to_json(&self.annotations)
    }
}
