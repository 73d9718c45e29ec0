//! Day page model and its normalization from raw page data

use super::coerce;
use super::section::{
    DetailEntry, DynamicSection, IconTag, SectionBody, SectionId, SectionKey, SectionMap,
    SectionRef, MAIN_PREFIX,
};
use crate::editing::ids::fresh_section_id;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::ops::{Index, IndexMut};
use tracing::{debug, warn};

/// Page-data keys consumed by [`DayPage::from_object`].
pub(crate) const KNOWN_KEYS: &[&str] = &[
    "destination",
    "arrivalDetails",
    "transportDetails",
    "transferDetails",
    "activityDetails",
    "dropDetails",
    "uploadedImage",
    "mealSelections",
    "icons",
    "sectionHeadings",
    "visibleSections",
    "dynamicSections",
    "sectionOrder",
    "allSectionsOrder",
];

/// Meals that can be ticked on a day page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Meal {
    Breakfast,
    Lunch,
    Dinner,
}

impl Meal {
    pub const ALL: [Meal; 3] = [Meal::Breakfast, Meal::Lunch, Meal::Dinner];

    pub fn as_str(self) -> &'static str {
        match self {
            Meal::Breakfast => "breakfast",
            Meal::Lunch => "lunch",
            Meal::Dinner => "dinner",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Meal::Breakfast => "Breakfast",
            Meal::Lunch => "Lunch",
            Meal::Dinner => "Dinner",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MealSelections {
    pub breakfast: bool,
    pub lunch: bool,
    pub dinner: bool,
}

impl MealSelections {
    pub fn get(&self, meal: Meal) -> bool {
        match meal {
            Meal::Breakfast => self.breakfast,
            Meal::Lunch => self.lunch,
            Meal::Dinner => self.dinner,
        }
    }

    pub fn set(&mut self, meal: Meal, selected: bool) {
        match meal {
            Meal::Breakfast => self.breakfast = selected,
            Meal::Lunch => self.lunch = selected,
            Meal::Dinner => self.dinner = selected,
        }
    }
}

/// Rich-text rows of the four fixed sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailLists {
    pub arrival_details: Vec<String>,
    pub transport_details: Vec<String>,
    pub activity_details: Vec<String>,
    pub drop_details: Vec<String>,
}

impl Default for DetailLists {
    fn default() -> Self {
        Self {
            arrival_details: vec![String::new()],
            transport_details: vec![String::new()],
            activity_details: vec![String::new()],
            drop_details: vec![String::new()],
        }
    }
}

impl Index<SectionKey> for DetailLists {
    type Output = Vec<String>;

    fn index(&self, key: SectionKey) -> &Vec<String> {
        match key {
            SectionKey::Arrival => &self.arrival_details,
            SectionKey::Transport => &self.transport_details,
            SectionKey::Activity => &self.activity_details,
            SectionKey::Drop => &self.drop_details,
        }
    }
}

impl IndexMut<SectionKey> for DetailLists {
    fn index_mut(&mut self, key: SectionKey) -> &mut Vec<String> {
        match key {
            SectionKey::Arrival => &mut self.arrival_details,
            SectionKey::Transport => &mut self.transport_details,
            SectionKey::Activity => &mut self.activity_details,
            SectionKey::Drop => &mut self.drop_details,
        }
    }
}

/// Canonical content of a `day` page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPage {
    pub destination: String,
    #[serde(flatten)]
    pub details: DetailLists,
    /// Banner picture for the page (data-URI).
    pub uploaded_image: Option<String>,
    pub meal_selections: MealSelections,
    pub icons: SectionMap<IconTag>,
    pub section_headings: SectionMap<String>,
    /// Soft-delete flags for the fixed sections.
    pub visible_sections: SectionMap<bool>,
    pub dynamic_sections: Vec<DynamicSection>,
    /// The single order governing rendering and dragging of every section.
    pub all_sections_order: Vec<SectionRef>,
}

impl Default for DayPage {
    fn default() -> Self {
        Self {
            destination: String::new(),
            details: DetailLists::default(),
            uploaded_image: None,
            meal_selections: MealSelections::default(),
            icons: SectionMap::from_fn(SectionKey::default_icon),
            section_headings: SectionMap::from_fn(|key| key.default_heading().to_string()),
            visible_sections: SectionMap::from_fn(|_| true),
            dynamic_sections: Vec::new(),
            all_sections_order: SectionKey::ALL.into_iter().map(SectionRef::Main).collect(),
        }
    }
}

impl DayPage {
    /// Build the canonical page from raw page data.
    ///
    /// Never fails: every field is coerced to its expected shape, legacy
    /// shapes are migrated, and the section order is repaired so that every
    /// entry resolves and no entry repeats.
    pub fn from_object(raw: &Map<String, Value>) -> Self {
        let details = DetailLists {
            arrival_details: coerce::text_rows(raw.get("arrivalDetails")),
            transport_details: coerce::text_rows(
                raw.get("transportDetails")
                    .or_else(|| raw.get("transferDetails")),
            ),
            activity_details: coerce::text_rows(raw.get("activityDetails")),
            drop_details: coerce::text_rows(raw.get("dropDetails")),
        };
        if !raw.contains_key("transportDetails") && raw.contains_key("transferDetails") {
            debug!("migrating transferDetails to transportDetails");
        }

        let meals = coerce::object(raw.get("mealSelections"));
        let mut meal_selections = MealSelections::default();
        for meal in Meal::ALL {
            let selected = meals.and_then(|m| m.get(meal.as_str()));
            meal_selections.set(meal, coerce::flag(selected, false));
        }

        let icons_raw = coerce::object(raw.get("icons"));
        let icons = SectionMap::from_fn(|key| {
            keyed(icons_raw, key)
                .and_then(Value::as_str)
                .and_then(IconTag::parse)
                .unwrap_or_else(|| key.default_icon())
        });

        let headings_raw = coerce::object(raw.get("sectionHeadings"));
        let section_headings = SectionMap::from_fn(|key| match keyed(headings_raw, key) {
            Some(value) => coerce::text(Some(value)),
            None => key.default_heading().to_string(),
        });

        let visible_raw = coerce::object(raw.get("visibleSections"));
        let mut visible_sections =
            SectionMap::from_fn(|key| coerce::flag(keyed(visible_raw, key), true));

        let dynamic_sections = read_dynamic_sections(raw.get("dynamicSections"));

        let all_sections_order = match raw.get("allSectionsOrder") {
            Some(order) if !order.is_null() => {
                resolve_order(coerce::list(Some(order)), &visible_sections, &dynamic_sections)
            }
            _ => seed_order(raw.get("sectionOrder"), &visible_sections, &dynamic_sections),
        };

        // A fixed section outside the order is never rendered; keep the flag honest.
        for key in SectionKey::ALL {
            if visible_sections[key] && !all_sections_order.contains(&SectionRef::Main(key)) {
                debug!(section = %key, "fixed section missing from order, hiding it");
                visible_sections[key] = false;
            }
        }

        Self {
            destination: coerce::text(raw.get("destination")),
            details,
            uploaded_image: coerce::optional_text(raw.get("uploadedImage")),
            meal_selections,
            icons,
            section_headings,
            visible_sections,
            dynamic_sections,
            all_sections_order,
        }
    }

    pub fn dynamic_section(&self, id: &SectionId) -> Option<&DynamicSection> {
        self.dynamic_sections.iter().find(|s| &s.id == id)
    }

    pub(crate) fn dynamic_index(&self, id: &SectionId) -> Option<usize> {
        self.dynamic_sections.iter().position(|s| &s.id == id)
    }

    pub fn order_index(&self, section: &SectionRef) -> Option<usize> {
        self.all_sections_order.iter().position(|r| r == section)
    }

    /// Whether an order entry names something that would render.
    pub fn resolves(&self, section: &SectionRef) -> bool {
        match section {
            SectionRef::Main(key) => self.visible_sections[*key],
            SectionRef::Dynamic(id) => self.dynamic_section(id).is_some(),
        }
    }

    /// Sections in display order, paired with what they refer to.
    pub fn ordered_sections(&self) -> impl Iterator<Item = OrderedSection<'_>> {
        self.all_sections_order
            .iter()
            .filter_map(move |entry| match entry {
                SectionRef::Main(key) if self.visible_sections[*key] => {
                    Some(OrderedSection::Main(*key))
                }
                SectionRef::Main(_) => None,
                SectionRef::Dynamic(id) => self.dynamic_section(id).map(OrderedSection::Dynamic),
            })
    }
}

/// A section resolved from the unified order.
#[derive(Debug, Clone, Copy)]
pub enum OrderedSection<'a> {
    Main(SectionKey),
    Dynamic(&'a DynamicSection),
}

/// Look up a per-section map entry, honoring the legacy key spelling.
fn keyed(map: Option<&Map<String, Value>>, key: SectionKey) -> Option<&Value> {
    let map = map?;
    map.get(key.as_str())
        .or_else(|| key.legacy_name().and_then(|legacy| map.get(legacy)))
}

fn read_dynamic_sections(raw: Option<&Value>) -> Vec<DynamicSection> {
    let mut sections: Vec<DynamicSection> = Vec::new();
    let mut seen: FxHashSet<SectionId> = FxHashSet::default();

    for item in coerce::list(raw) {
        let Some(obj) = item.as_object() else {
            warn!("skipping dynamic section that is not an object");
            continue;
        };

        let id = match coerce::identifier(obj.get("id")).map(SectionId) {
            Some(id) if !seen.contains(&id) && !id.as_str().starts_with(MAIN_PREFIX) => id,
            other => {
                let id = fresh_section_id(&seen);
                debug!(previous = ?other, assigned = %id, "assigning id to dynamic section");
                id
            }
        };
        seen.insert(id.clone());

        let kind = obj
            .get("type")
            .and_then(Value::as_str)
            .and_then(IconTag::parse)
            .unwrap_or(IconTag::Custom);
        let icon = obj
            .get("icon")
            .and_then(Value::as_str)
            .and_then(IconTag::parse)
            .unwrap_or(kind);
        let body = if kind == IconTag::Image {
            SectionBody::Image(coerce::optional_text(obj.get("image")))
        } else {
            SectionBody::Details(coerce::detail_entries(obj.get("details")))
        };

        sections.push(DynamicSection {
            id,
            kind,
            icon,
            heading: coerce::text(obj.get("heading")),
            body,
        });
    }

    sections
}

/// Keep the resolvable, first-seen entries of a stored order and append any
/// dynamic section the order forgot.
fn resolve_order(
    entries: Vec<&Value>,
    visible: &SectionMap<bool>,
    dynamic: &[DynamicSection],
) -> Vec<SectionRef> {
    let mut order: Vec<SectionRef> = Vec::with_capacity(entries.len());
    let mut seen: FxHashSet<SectionRef> = FxHashSet::default();

    for entry in entries {
        let Some(section) = coerce::identifier(Some(entry)).as_deref().and_then(SectionRef::parse) else {
            warn!(?entry, "dropping unparseable section order entry");
            continue;
        };
        let resolves = match &section {
            SectionRef::Main(key) => visible[*key],
            SectionRef::Dynamic(id) => dynamic.iter().any(|s| &s.id == id),
        };
        if !resolves {
            debug!(section = %section, "dropping dangling section order entry");
            continue;
        }
        if seen.insert(section.clone()) {
            order.push(section);
        }
    }

    for section in dynamic {
        let entry = SectionRef::Dynamic(section.id.clone());
        if seen.insert(entry.clone()) {
            debug!(section = %entry, "appending dynamic section missing from order");
            order.push(entry);
        }
    }

    order
}

/// Default order for documents without `allSectionsOrder`: the visible fixed
/// sections (in legacy `sectionOrder` order when present) then every dynamic section.
fn seed_order(
    legacy: Option<&Value>,
    visible: &SectionMap<bool>,
    dynamic: &[DynamicSection],
) -> Vec<SectionRef> {
    let keys: Vec<SectionKey> = match legacy {
        Some(value) if !value.is_null() => coerce::list(Some(value))
            .into_iter()
            .filter_map(Value::as_str)
            .filter_map(SectionKey::parse)
            .collect(),
        _ => SectionKey::ALL.to_vec(),
    };

    let mut order: Vec<SectionRef> = Vec::new();
    for key in keys {
        let entry = SectionRef::Main(key);
        if visible[key] && !order.contains(&entry) {
            order.push(entry);
        }
    }
    order.extend(dynamic.iter().map(|s| SectionRef::Dynamic(s.id.clone())));
    order
}

/// Convert fixed-section rows into dynamic-section records.
pub(crate) fn rows_to_entries(rows: &[String]) -> Vec<DetailEntry> {
    rows.iter().map(|row| DetailEntry::new(row.clone())).collect()
}
