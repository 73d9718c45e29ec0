//! Render output: display list, diff protocol and HTML

mod diff;
mod display;
pub mod excerpt;
mod html;

pub use diff::{RenderDiff, RenderPatch};
pub use display::{Control, DisplayItem, DisplayList, DisplayPage, RenderMode};
pub use html::{export_document, page_html, sanitize_fragment};
