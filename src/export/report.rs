//! Markdown hierarchy report generation.
//!
//! Renders the annotation tree into the implementation-request document the
//! user hands to a code generator: a heading, a recursively nested section
//! per annotation, and a requirements boilerplate that the embedding
//! application may replace with its own template.

use crate::model::{Annotation, FlexDirection, LayoutType};
use crate::store::AnnotationStore;

/// Default implementation-requirements boilerplate appended to every report.
///
/// Callers override it through `ReportOptions`; whatever is supplied is
/// interpolated verbatim after the annotation list.
pub const DEFAULT_REQUIREMENTS: &str = "## Implementation Requirements

1. **Component hierarchy**: build the component structure following the annotation hierarchy above.
2. **Layout containers**:
   - **Box**: a plain container element. It may hold children but carries no layout logic of its own
   - **Flex**: a flexbox layout. Follow the direction, alignment and gap settings
   - **Grid**: a CSS grid layout. Follow the column count, row count and gap settings
   - Regular components (Button, Input, ...) have no children
   - Always place child elements inside their parent element
3. **Accessibility**: include ARIA attributes, keyboard navigation and screen reader support.
4. **Styling**:
   - Use Tailwind CSS
   - Support responsive layouts
   - Implement the motion effects specified in the annotations
   - Apply flexbox/grid properties according to the annotation details
5. **File structure**:
   - Place components in the `components/` folder
   - Place pages in the `app/` folder
   - Place utility functions in the `lib/` folder

## Notes

- Annotation coordinates describe relative placement; the hierarchy takes precedence over exact pixel positions
- Mirror the parent/child relations in the actual DOM structure
- Only layout containers (Box/Flex/Grid) may hold child elements
- Follow the flexbox/grid settings recorded on each annotation
- When motion information is given, implement the interaction it describes
- Implement every component in a reusable way
";

/// Options for report generation.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Requirements section, interpolated verbatim after the hierarchy.
    pub requirements: String,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            requirements: DEFAULT_REQUIREMENTS.to_string(),
        }
    }
}

impl ReportOptions {
    /// Create options with the default requirements boilerplate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the requirements boilerplate.
    pub fn requirements(mut self, text: impl Into<String>) -> Self {
        self.requirements = text.into();
        self
    }
}

/// Render the full report for the committed tree.
pub fn render(store: &AnnotationStore, image_name: &str, options: &ReportOptions) -> String {
    log::info!("Rendering hierarchy report for {} annotations", store.len());

    let mut sections = Vec::new();
    for (index, root) in store.roots().enumerate() {
        let mut section = String::new();
        render_node(&mut section, store, root, 0, index);
        sections.push(section);
    }
    let list = sections.join("\n");

    format!(
        "# UI Implementation Request\n\
         \n\
         ## Reference Image\n\
         File name: {image_name}\n\
         \n\
         ## Annotation List (Hierarchy)\n\
         \n\
         The annotations below describe the position and nesting of UI elements in the reference image. Coordinates are fractions (0-1) of the image width and height.\n\
         Parent/child relations express the intended DOM structure and the nesting of layout containers.\n\
         \n\
         {list}\n\
         {requirements}",
        requirements = options.requirements,
    )
}

fn render_node(
    out: &mut String,
    store: &AnnotationStore,
    annotation: &Annotation,
    depth: usize,
    index: usize,
) {
    let indent = "  ".repeat(depth);
    let label = if depth == 0 { "Root" } else { "Child" };

    out.push_str(&format!(
        "{indent}### {label} element {} (ID: {})\n",
        index + 1,
        annotation.id
    ));
    out.push_str(&format!(
        "{indent}- **Component kind**: {}\n",
        annotation.component_kind
    ));
    render_layout(out, &indent, annotation);
    out.push_str(&format!("{indent}- **Position**:\n"));
    out.push_str(&format!(
        "{indent}  - X: {:.1}% (from the left edge)\n",
        annotation.rect.x * 100.0
    ));
    out.push_str(&format!(
        "{indent}  - Y: {:.1}% (from the top edge)\n",
        annotation.rect.y * 100.0
    ));
    out.push_str(&format!(
        "{indent}  - Width: {:.1}%\n",
        annotation.rect.w * 100.0
    ));
    out.push_str(&format!(
        "{indent}  - Height: {:.1}%\n",
        annotation.rect.h * 100.0
    ));
    let motion = if annotation.motion_info.is_empty() {
        "unspecified"
    } else {
        &annotation.motion_info
    };
    out.push_str(&format!("{indent}- **Motion / behavior**: {motion}\n"));
    if let Some(parent_id) = annotation.parent_id {
        out.push_str(&format!("{indent}- **Parent ID**: {parent_id}\n"));
    }
    if !annotation.children.is_empty() {
        out.push_str(&format!(
            "{indent}- **Child count**: {}\n",
            annotation.children.len()
        ));

        out.push_str(&format!("\n{indent}#### Child elements:\n"));
        // Sibling order comes from the children cache, so repeated export
        // of the same tree stays stable.
        for (child_index, child_id) in annotation.children.iter().enumerate() {
            if let Some(child) = store.get(*child_id) {
                out.push('\n');
                render_node(out, store, child, depth + 1, child_index);
            }
        }
    }
}

fn render_layout(out: &mut String, indent: &str, annotation: &Annotation) {
    match annotation.layout_type {
        LayoutType::Box => {
            out.push_str(&format!(
                "{indent}- **Layout**: Box (container element, children allowed)\n"
            ));
        }
        LayoutType::Flex => {
            // Detail blocks render only while the matching settings exist;
            // stale data left behind by a role change is never read.
            if let Some(flex) = annotation.flex_layout {
                let direction = match flex.direction {
                    FlexDirection::Row => "horizontal (row)",
                    FlexDirection::Column => "vertical (column)",
                };
                out.push_str(&format!("{indent}- **Layout**: Flexbox\n"));
                out.push_str(&format!("{indent}  - Direction: {direction}\n"));
                out.push_str(&format!(
                    "{indent}  - Main-axis alignment: {}\n",
                    flex.justify.as_str()
                ));
                out.push_str(&format!(
                    "{indent}  - Cross-axis alignment: {}\n",
                    flex.align.as_str()
                ));
                out.push_str(&format!("{indent}  - Gap: {}px\n", flex.gap));
            }
        }
        LayoutType::Grid => {
            if let Some(grid) = annotation.grid_layout {
                out.push_str(&format!("{indent}- **Layout**: Grid\n"));
                out.push_str(&format!("{indent}  - Columns: {}\n", grid.columns));
                out.push_str(&format!("{indent}  - Rows: {}\n", grid.rows));
                out.push_str(&format!("{indent}  - Gap: {}px\n", grid.gap));
            }
        }
        LayoutType::None => {}
    }
}
