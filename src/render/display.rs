//! Display list: render-ready representation of pages
//!
//! Edit and preview share one builder. The mode only decides whether empty
//! content and editing controls are emitted; ordering and visibility come
//! from the page itself in both modes.

use crate::document::{
    day_number, DayPage, IconTag, Meal, OrderedSection, Page, PageContent, PageId, PageKind,
    PolicyBlock, PolicyPage, SectionBody, SectionRef, ThankYouField, ThankYouPage,
};
use crate::render::excerpt::{excerpt, is_blank};
use serde::Serialize;

const DYNAMIC_PLACEHOLDER: &str = "Enter details";
const EXCERPT_GRAPHEMES: usize = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    #[default]
    Edit,
    /// Read-only rendering used for preview and print
    Preview,
}

impl RenderMode {
    pub fn is_edit(self) -> bool {
        self == RenderMode::Edit
    }
}

/// Editing affordance attached to an item; never emitted in preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Control {
    DragHandle,
    ChangeIcon,
    Duplicate,
    Remove,
    AddRow,
    Upload,
}

impl Control {
    pub fn action(self) -> &'static str {
        match self {
            Control::DragHandle => "drag",
            Control::ChangeIcon => "change-icon",
            Control::Duplicate => "duplicate",
            Control::Remove => "remove",
            Control::AddRow => "add-row",
            Control::Upload => "upload",
        }
    }
}

const SECTION_CONTROLS: &[Control] = &[
    Control::DragHandle,
    Control::ChangeIcon,
    Control::Duplicate,
    Control::Remove,
    Control::AddRow,
];
const IMAGE_CONTROLS: &[Control] = &[
    Control::DragHandle,
    Control::Upload,
    Control::Duplicate,
    Control::Remove,
];

/// A display item to render
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "item", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum DisplayItem {
    CoverBackground {
        image: Option<String>,
    },
    DayHeader {
        day_number: usize,
        destination: String,
    },
    /// Day banner picture
    Banner {
        image: Option<String>,
    },
    Meals {
        meals: Vec<(Meal, bool)>,
    },
    /// A fixed or dynamic section with rich-text rows
    Section {
        section: SectionRef,
        icon: IconTag,
        heading: String,
        /// Stored HTML, rendered verbatim
        rows: Vec<String>,
        placeholder: Option<&'static str>,
        controls: &'static [Control],
    },
    ImageSection {
        section: SectionRef,
        image: Option<String>,
        controls: &'static [Control],
    },
    /// Picker for adding sections
    AddSectionTray {
        options: Vec<IconTag>,
    },
    PolicyTitle {
        text: String,
    },
    PolicyBlock {
        block: PolicyBlock,
    },
    PolicyPlaceholder,
    ThankYouField {
        field: ThankYouField,
        text: String,
    },
}

impl DisplayItem {
    /// The section this item draws, if any
    pub fn section(&self) -> Option<&SectionRef> {
        match self {
            DisplayItem::Section { section, .. } | DisplayItem::ImageSection { section, .. } => {
                Some(section)
            }
            _ => None,
        }
    }

    /// Whether the item exists only while editing.
    pub fn is_editor_only(&self) -> bool {
        matches!(
            self,
            DisplayItem::AddSectionTray { .. } | DisplayItem::PolicyPlaceholder
        )
    }
}

/// Display list for a single page
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayPage {
    pub page_id: PageId,
    pub kind: PageKind,
    /// 1-based position in the collection
    pub page_number: usize,
    pub day_number: Option<usize>,
    /// Short plain-text summary for the page navigator
    pub excerpt: String,
    pub items: Vec<DisplayItem>,
}

impl DisplayPage {
    /// Build the display list of `pages[index]`.
    pub fn build(pages: &[Page], index: usize, mode: RenderMode) -> Option<Self> {
        let page = pages.get(index)?;
        let day = day_number(pages, index);
        let items = match &page.content {
            PageContent::Cover(cover) => cover_items(cover.background_image.as_ref(), mode),
            PageContent::Day(content) => day_items(content, day.unwrap_or(0), mode),
            PageContent::Policy(policy) => policy_items(policy, mode),
            PageContent::ThankYou(thank_you) => thank_you_items(thank_you, mode),
        };

        Some(Self {
            page_id: page.id.clone(),
            kind: page.kind(),
            page_number: index + 1,
            day_number: day,
            excerpt: page_excerpt(page),
            items,
        })
    }

    /// Sections in the order they are drawn
    pub fn sections(&self) -> impl Iterator<Item = &SectionRef> {
        self.items.iter().filter_map(DisplayItem::section)
    }
}

/// Complete display list for rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayList {
    pub version: u64,
    pub mode: RenderMode,
    pub pages: Vec<DisplayPage>,
}

impl DisplayList {
    /// Build the display list of every page
    pub fn build(pages: &[Page], mode: RenderMode, version: u64) -> Self {
        Self {
            version,
            mode,
            pages: (0..pages.len())
                .filter_map(|index| DisplayPage::build(pages, index, mode))
                .collect(),
        }
    }

    pub fn page(&self, id: &PageId) -> Option<&DisplayPage> {
        self.pages.iter().find(|p| &p.page_id == id)
    }
}

fn cover_items(background: Option<&String>, mode: RenderMode) -> Vec<DisplayItem> {
    if background.is_none() && !mode.is_edit() {
        return Vec::new();
    }
    vec![DisplayItem::CoverBackground {
        image: background.cloned(),
    }]
}

fn day_items(day: &DayPage, number: usize, mode: RenderMode) -> Vec<DisplayItem> {
    let edit = mode.is_edit();
    let mut items = vec![DisplayItem::DayHeader {
        day_number: number,
        destination: day.destination.clone(),
    }];

    if edit || day.uploaded_image.is_some() {
        items.push(DisplayItem::Banner {
            image: day.uploaded_image.clone(),
        });
    }

    let meals: Vec<(Meal, bool)> = Meal::ALL
        .into_iter()
        .map(|meal| (meal, day.meal_selections.get(meal)))
        .filter(|(_, selected)| edit || *selected)
        .collect();
    if !meals.is_empty() {
        items.push(DisplayItem::Meals { meals });
    }

    for section in day.ordered_sections() {
        let item = match section {
            OrderedSection::Main(key) => section_item(
                SectionRef::Main(key),
                day.icons[key],
                &day.section_headings[key],
                &day.details[key],
                key.placeholder(),
                mode,
            ),
            OrderedSection::Dynamic(dynamic) => match &dynamic.body {
                SectionBody::Image(image) => {
                    if image.is_none() && !edit {
                        None
                    } else {
                        Some(DisplayItem::ImageSection {
                            section: SectionRef::Dynamic(dynamic.id.clone()),
                            image: image.clone(),
                            controls: controls(IMAGE_CONTROLS, mode),
                        })
                    }
                }
                SectionBody::Details(entries) => {
                    let rows: Vec<String> = entries.iter().map(|e| e.value.clone()).collect();
                    section_item(
                        SectionRef::Dynamic(dynamic.id.clone()),
                        dynamic.icon,
                        &dynamic.heading,
                        &rows,
                        DYNAMIC_PLACEHOLDER,
                        mode,
                    )
                }
            },
        };
        items.extend(item);
    }

    if edit {
        items.push(DisplayItem::AddSectionTray {
            options: IconTag::PICKER.iter().copied().chain([IconTag::Image]).collect(),
        });
    }
    items
}

fn section_item(
    section: SectionRef,
    icon: IconTag,
    heading: &str,
    rows: &[String],
    placeholder: &'static str,
    mode: RenderMode,
) -> Option<DisplayItem> {
    let rows: Vec<String> = if mode.is_edit() {
        rows.to_vec()
    } else {
        rows.iter().filter(|row| !is_blank(row)).cloned().collect()
    };
    if rows.is_empty() && !mode.is_edit() {
        return None;
    }
    Some(DisplayItem::Section {
        section,
        icon,
        heading: heading.to_string(),
        rows,
        placeholder: mode.is_edit().then_some(placeholder),
        controls: controls(SECTION_CONTROLS, mode),
    })
}

fn policy_items(policy: &PolicyPage, mode: RenderMode) -> Vec<DisplayItem> {
    let mut items = Vec::new();
    if mode.is_edit() || !policy.title.trim().is_empty() {
        items.push(DisplayItem::PolicyTitle {
            text: policy.title.clone(),
        });
    }
    items.extend(
        policy
            .blocks
            .iter()
            .filter(|block| mode.is_edit() || !block.is_empty())
            .map(|block| DisplayItem::PolicyBlock {
                block: block.clone(),
            }),
    );
    if mode.is_edit() && policy.blocks.is_empty() {
        items.push(DisplayItem::PolicyPlaceholder);
    }
    items
}

fn thank_you_items(page: &ThankYouPage, mode: RenderMode) -> Vec<DisplayItem> {
    const FIELDS: [ThankYouField; 5] = [
        ThankYouField::ThankYouTitle,
        ThankYouField::ThankYouMessage,
        ThankYouField::PhoneNumber,
        ThankYouField::EmailAddress,
        ThankYouField::WebsiteOrInstagram,
    ];
    FIELDS
        .into_iter()
        .filter(|field| mode.is_edit() || !page.field(*field).trim().is_empty())
        .map(|field| DisplayItem::ThankYouField {
            field,
            text: page.field(field).to_string(),
        })
        .collect()
}

fn controls(set: &'static [Control], mode: RenderMode) -> &'static [Control] {
    if mode.is_edit() {
        set
    } else {
        &[]
    }
}

/// Navigator summary: destination and first rows for day pages, the title
/// elsewhere.
fn page_excerpt(page: &Page) -> String {
    let source = match &page.content {
        PageContent::Day(day) => {
            let mut parts = vec![day.destination.clone()];
            parts.extend(day.ordered_sections().filter_map(|section| match section {
                OrderedSection::Main(key) => day.details[key].first().cloned(),
                OrderedSection::Dynamic(dynamic) => {
                    dynamic.details().and_then(|d| d.first()).map(|e| e.value.clone())
                }
            }));
            parts.join(" ")
        }
        PageContent::Policy(policy) => policy.title.clone(),
        PageContent::ThankYou(thank_you) => thank_you.thank_you_title.clone(),
        PageContent::Cover(_) => String::new(),
    };
    let text = excerpt(&source, EXCERPT_GRAPHEMES);
    if text.is_empty() {
        page.kind().title().to_string()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{normalize_pages, PageIdAllocator, SectionKey};
    use serde_json::json;

    fn pages() -> Vec<Page> {
        normalize_pages(
            &json!([
                {"id": 1, "type": "cover"},
                {"id": 2, "type": "day", "destination": "Goa",
                 "arrivalDetails": ["<p>Flight at 10am</p>"],
                 "activityDetails": ["<p><br></p>"],
                 "mealSelections": {"breakfast": true},
                 "dynamicSections": [{"id": "pic", "type": "Image"}],
                 "allSectionsOrder": ["main_activity", "pic", "main_arrival", "main_transport", "main_drop"]},
                {"id": 3, "type": "day"},
                {"id": 4, "type": "policy"}
            ]),
            &mut PageIdAllocator::new(),
        )
    }

    #[test]
    fn test_edit_mode_shows_everything_in_order() {
        let page = DisplayPage::build(&pages(), 1, RenderMode::Edit).unwrap();
        assert_eq!(page.day_number, Some(1));
        let order: Vec<String> = page.sections().map(|s| s.to_string()).collect();
        assert_eq!(
            order,
            vec!["main_activity", "pic", "main_arrival", "main_transport", "main_drop"]
        );
        assert!(page.items.iter().any(DisplayItem::is_editor_only));
    }

    #[test]
    fn test_preview_omits_empty_content() {
        let page = DisplayPage::build(&pages(), 1, RenderMode::Preview).unwrap();
        let order: Vec<&SectionRef> = page.sections().collect();
        assert_eq!(order, vec![&SectionRef::Main(SectionKey::Arrival)]);
        assert!(page.items.contains(&DisplayItem::Meals {
            meals: vec![(Meal::Breakfast, true)]
        }));
        assert!(!page.items.iter().any(|item| matches!(item, DisplayItem::Banner { .. })));
        for item in &page.items {
            if let DisplayItem::Section { controls, placeholder, .. } = item {
                assert!(controls.is_empty());
                assert!(placeholder.is_none());
            }
        }
    }

    #[test]
    fn test_preview_and_edit_share_order() {
        let pages = pages();
        let edit = DisplayPage::build(&pages, 1, RenderMode::Edit).unwrap();
        let preview = DisplayPage::build(&pages, 1, RenderMode::Preview).unwrap();
        let edit_order: Vec<&SectionRef> = edit.sections().collect();
        let mut shown = preview.sections();
        let mut next = shown.next();
        for section in edit_order {
            if Some(section) == next {
                next = shown.next();
            }
        }
        assert!(next.is_none(), "preview order must be a subsequence of edit order");
    }

    #[test]
    fn test_day_numbers_and_excerpts() {
        let list = DisplayList::build(&pages(), RenderMode::Preview, 7);
        assert_eq!(list.version, 7);
        assert_eq!(list.pages[2].day_number, Some(2));
        assert_eq!(list.pages[3].day_number, None);
        assert_eq!(list.pages[1].excerpt, "Goa Flight at 10am");
        assert_eq!(list.pages[0].excerpt, "FRONT PAGE");
        assert!(list.pages[0].items.is_empty());
    }

    #[test]
    fn test_empty_policy_placeholder_in_edit_only() {
        let pages = pages();
        let edit = DisplayPage::build(&pages, 3, RenderMode::Edit).unwrap();
        assert!(edit.items.contains(&DisplayItem::PolicyPlaceholder));
        let preview = DisplayPage::build(&pages, 3, RenderMode::Preview).unwrap();
        assert!(!preview.items.contains(&DisplayItem::PolicyPlaceholder));
    }
}
