//! Export pipeline: Markdown hierarchy report and flat JSON records.
//!
//! Export operates on the committed tree only; drag overlays are never
//! involved, since a gesture is always committed before an export fires.
//! Output is deterministic: the same tree (same node set, same fields, same
//! sibling order) serializes to byte-identical text and structurally
//! identical JSON.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use uimark::export::{records, report, ReportOptions};
//!
//! let text = report::render(&store, "mockup.png", &ReportOptions::default());
//! let json = records::to_json(&store)?;
//! ```

pub mod records;
pub mod report;

#[cfg(test)]
mod tests;

pub use report::{DEFAULT_REQUIREMENTS, ReportOptions};
