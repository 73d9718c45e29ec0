//! Edit commands and results

use crate::document::{
    CoverPage, DayPage, IconTag, Meal, Page, PageContent, PolicyBlock, PolicyPage, SectionId,
    SectionKey, SectionRef, ThankYouField, ThankYouPage,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use smallvec::SmallVec;
use tracing::warn;

/// Target and new value of a scalar or row edit on a day page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "field", rename_all = "camelCase")]
pub enum FieldEdit {
    Destination {
        value: String,
    },
    /// Row `index` of a fixed section; `index == len` appends a row.
    Detail {
        key: SectionKey,
        index: usize,
        html: String,
    },
    Meal {
        meal: Meal,
        selected: bool,
    },
    Heading {
        key: SectionKey,
        heading: String,
    },
    UploadedImage {
        image: Option<String>,
    },
    DynamicHeading {
        id: SectionId,
        heading: String,
    },
    /// Row `index` of a dynamic section; `index == len` appends a row.
    DynamicDetail {
        id: SectionId,
        index: usize,
        html: String,
    },
    DynamicImage {
        id: SectionId,
        image: Option<String>,
    },
}

/// Parameters of a section added from the section tray.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionSpec {
    #[serde(rename = "type")]
    pub kind: IconTag,
    #[serde(default)]
    pub icon: Option<IconTag>,
    #[serde(default)]
    pub heading: String,
}

impl SectionSpec {
    pub fn new(kind: IconTag, heading: impl Into<String>) -> Self {
        Self {
            kind,
            icon: None,
            heading: heading.into(),
        }
    }

    /// A picture-only section.
    pub fn image() -> Self {
        Self::new(IconTag::Image, "")
    }

    pub fn with_icon(mut self, icon: IconTag) -> Self {
        self.icon = Some(icon);
        self
    }
}

/// An atomic day-page operation
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum SectionOp {
    SetField { edit: FieldEdit },
    ToggleMeal { meal: Meal },
    AddDynamicSection { spec: SectionSpec },
    RemoveSection { section: SectionRef },
    DuplicateSection { section: SectionRef },
    Reorder { active: SectionRef, over: SectionRef },
    ChangeIcon {
        section: SectionRef,
        icon: IconTag,
        heading: String,
    },
}

/// Edits of the cover page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum CoverEdit {
    SetBackground { image: Option<String> },
}

/// Edits reported by the policy page's block editor.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum PolicyEdit {
    SetTitle { title: String },
    /// Raw block-editor output; unknown blocks are dropped.
    ReplaceBlocks { blocks: Value },
}

/// An edit addressed to a single page. The variant must match the page's
/// kind; a mismatch is ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "page", content = "edit", rename_all = "camelCase")]
pub enum PageEdit {
    Cover(CoverEdit),
    Day(SectionOp),
    Policy(PolicyEdit),
    ThankYou { field: ThankYouField, value: String },
    /// Whole-page data pushed by a page component.
    Replace(Value),
}

/// Result of applying an edit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditResult {
    /// Whether the page differs from before the edit
    pub changed: bool,
    /// Sections the edit touched
    pub affected_sections: SmallVec<[SectionRef; 2]>,
    /// Sections the edit created
    pub created_sections: SmallVec<[SectionId; 1]>,
}

impl EditResult {
    pub fn unchanged() -> Self {
        Self::default()
    }

    /// Check if anything changed
    pub fn has_changes(&self) -> bool {
        self.changed
    }
}

impl PageEdit {
    /// Apply to `page`, producing the new page and what changed.
    pub fn apply(&self, page: &Page) -> (Page, EditResult) {
        let mut next = page.clone();
        let mut result = EditResult::default();

        match (self, &page.content) {
            (PageEdit::Day(op), PageContent::Day(day)) => {
                let (day, day_result) = op.apply(day);
                next.content = PageContent::Day(day);
                result = day_result;
            }
            (PageEdit::Cover(edit), PageContent::Cover(cover)) => {
                next.content = PageContent::Cover(edit.apply(cover));
            }
            (PageEdit::Policy(edit), PageContent::Policy(policy)) => {
                next.content = PageContent::Policy(edit.apply(policy));
            }
            (PageEdit::ThankYou { field, value }, PageContent::ThankYou(thank_you)) => {
                let mut updated: ThankYouPage = thank_you.clone();
                *updated.field_mut(*field) = value.clone();
                next.content = PageContent::ThankYou(updated);
            }
            (PageEdit::Replace(raw), _) => {
                next = page.renormalize(raw);
            }
            (edit, content) => {
                warn!(page = %page.id, kind = %content.kind(), ?edit, "edit does not apply to this page kind");
                return (next, EditResult::unchanged());
            }
        }

        result.changed = next != *page;
        (next, result)
    }
}

impl SectionOp {
    /// Apply to a day page without mutating it.
    pub fn apply(&self, day: &DayPage) -> (DayPage, EditResult) {
        let mut result = EditResult::default();
        let next = match self {
            SectionOp::SetField { edit } => {
                result.affected_sections.extend(edit.section());
                day.set_field(edit)
            }
            SectionOp::ToggleMeal { meal } => day.toggle_meal(*meal),
            SectionOp::AddDynamicSection { spec } => {
                let next = day.add_dynamic_section(spec);
                if let Some(SectionRef::Dynamic(id)) = next.all_sections_order.last() {
                    if day.dynamic_section(id).is_none() {
                        result.created_sections.push(id.clone());
                        result.affected_sections.push(SectionRef::Dynamic(id.clone()));
                    }
                }
                next
            }
            SectionOp::RemoveSection { section } => {
                result.affected_sections.push(section.clone());
                day.remove_section(section)
            }
            SectionOp::DuplicateSection { section } => {
                let next = day.duplicate_section(section);
                if let Some(created) = next
                    .dynamic_sections
                    .iter()
                    .find(|s| day.dynamic_section(&s.id).is_none())
                {
                    result.created_sections.push(created.id.clone());
                    result.affected_sections.push(SectionRef::Dynamic(created.id.clone()));
                }
                next
            }
            SectionOp::Reorder { active, over } => {
                result.affected_sections.push(active.clone());
                day.reorder(active, over)
            }
            SectionOp::ChangeIcon {
                section,
                icon,
                heading,
            } => {
                result.affected_sections.push(section.clone());
                day.change_icon(section, *icon, heading)
            }
        };

        result.changed = next != *day;
        if !result.changed {
            result.affected_sections.clear();
            result.created_sections.clear();
        }
        (next, result)
    }
}

impl FieldEdit {
    /// The section this edit lands in, if any.
    pub fn section(&self) -> Option<SectionRef> {
        match self {
            FieldEdit::Detail { key, .. } | FieldEdit::Heading { key, .. } => {
                Some(SectionRef::Main(*key))
            }
            FieldEdit::DynamicHeading { id, .. }
            | FieldEdit::DynamicDetail { id, .. }
            | FieldEdit::DynamicImage { id, .. } => Some(SectionRef::Dynamic(id.clone())),
            FieldEdit::Destination { .. } | FieldEdit::Meal { .. } | FieldEdit::UploadedImage { .. } => {
                None
            }
        }
    }
}

impl CoverEdit {
    pub fn apply(&self, cover: &CoverPage) -> CoverPage {
        let mut next = cover.clone();
        match self {
            CoverEdit::SetBackground { image } => {
                next.background_image = image.clone().filter(|s| !s.is_empty());
            }
        }
        next
    }
}

impl PolicyEdit {
    pub fn apply(&self, policy: &PolicyPage) -> PolicyPage {
        match self {
            PolicyEdit::SetTitle { title } => PolicyPage {
                title: title.clone(),
                blocks: policy.blocks.clone(),
            },
            PolicyEdit::ReplaceBlocks { blocks } => PolicyPage {
                title: policy.title.clone(),
                blocks: crate::document::coerce::list(Some(blocks))
                    .into_iter()
                    .filter_map(PolicyBlock::from_value)
                    .collect(),
            },
        }
    }
}
