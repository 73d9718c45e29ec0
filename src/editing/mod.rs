//! Editing model: section operations, edit commands and shortcuts

mod day_ops;
pub mod ids;
mod operation;
mod shortcut;

pub use ids::fresh_section_id;
pub use operation::{
    CoverEdit, EditResult, FieldEdit, PageEdit, PolicyEdit, SectionOp, SectionSpec,
};
pub use shortcut::KeyChord;
