//! skillcheck-report: Rendering of assessment reports.
//!
//! Text, markdown and JSON rendering live on `AssessmentReport` in
//! skillcheck-core; this crate adds the self-contained HTML page.

pub mod html;

pub use html::{generate_html, write_html_report};
