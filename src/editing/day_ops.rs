//! Day-page section operations
//!
//! Every operation takes the page by reference and returns a new page. Ids
//! that do not resolve, indices past the end and similar stale gestures fall
//! through to an unchanged copy.

use super::ids::fresh_section_id;
use super::operation::{FieldEdit, SectionSpec};
use crate::document::{
    rows_to_entries, DayPage, DetailEntry, DynamicSection, IconTag, Meal, SectionBody, SectionId,
    SectionKey, SectionRef,
};
use tracing::{debug, trace};

impl DayPage {
    /// Set one scalar or row field.
    pub fn set_field(&self, edit: &FieldEdit) -> DayPage {
        let mut next = self.clone();
        match edit {
            FieldEdit::Destination { value } => next.destination = value.clone(),
            FieldEdit::Detail { key, index, html } => {
                set_row(&mut next.details[*key], *index, html.clone());
            }
            FieldEdit::Meal { meal, selected } => next.meal_selections.set(*meal, *selected),
            FieldEdit::Heading { key, heading } => next.section_headings[*key] = heading.clone(),
            FieldEdit::UploadedImage { image } => {
                next.uploaded_image = image.clone().filter(|s| !s.is_empty());
            }
            FieldEdit::DynamicHeading { id, heading } => {
                if let Some(section) = next.dynamic_section_mut(id) {
                    section.heading = heading.clone();
                }
            }
            FieldEdit::DynamicDetail { id, index, html } => {
                match next.dynamic_section_mut(id).map(|s| &mut s.body) {
                    Some(SectionBody::Details(rows)) => {
                        set_row(rows, *index, DetailEntry::new(html.clone()));
                    }
                    Some(SectionBody::Image(_)) => debug!(section = %id, "image section has no detail rows"),
                    None => {}
                }
            }
            FieldEdit::DynamicImage { id, image } => {
                if let Some(SectionBody::Image(slot)) = next.dynamic_section_mut(id).map(|s| &mut s.body) {
                    *slot = image.clone().filter(|s| !s.is_empty());
                }
            }
        }
        next
    }

    pub fn toggle_meal(&self, meal: Meal) -> DayPage {
        let mut next = self.clone();
        next.meal_selections.set(meal, !self.meal_selections.get(meal));
        next
    }

    /// Append a new dynamic section and put it last in the order.
    pub fn add_dynamic_section(&self, spec: &SectionSpec) -> DayPage {
        let mut next = self.clone();
        let id = fresh_section_id(self.dynamic_sections.iter().map(|s| &s.id));
        let body = if spec.kind == IconTag::Image {
            SectionBody::Image(None)
        } else {
            SectionBody::empty_details()
        };

        trace!(section = %id, kind = %spec.kind, "adding dynamic section");
        next.dynamic_sections.push(DynamicSection {
            id: id.clone(),
            kind: spec.kind,
            icon: spec.icon.unwrap_or(spec.kind),
            heading: spec.heading.clone(),
            body,
        });
        next.all_sections_order.push(SectionRef::Dynamic(id));
        next
    }

    /// Hide a fixed section (clearing its rows) or delete a dynamic one.
    pub fn remove_section(&self, section: &SectionRef) -> DayPage {
        let mut next = self.clone();
        match section {
            SectionRef::Main(key) => {
                if !self.visible_sections[*key] {
                    return next;
                }
                next.visible_sections[*key] = false;
                next.details[*key] = vec![String::new()];
            }
            SectionRef::Dynamic(id) => {
                let Some(index) = self.dynamic_index(id) else {
                    return next;
                };
                next.dynamic_sections.remove(index);
            }
        }
        next.all_sections_order.retain(|entry| entry != section);
        next
    }

    /// Copy a section and place the copy right after it.
    ///
    /// Fixed sections are copied into a new dynamic section carrying their
    /// current icon, heading and rows; the fixed section stays as it is.
    pub fn duplicate_section(&self, section: &SectionRef) -> DayPage {
        let mut next = self.clone();
        let id = fresh_section_id(self.dynamic_sections.iter().map(|s| &s.id));

        let (copy, dynamic_at) = match section {
            SectionRef::Dynamic(source) => {
                let Some(index) = self.dynamic_index(source) else {
                    return next;
                };
                let mut copy = self.dynamic_sections[index].clone();
                copy.id = id.clone();
                (copy, index + 1)
            }
            SectionRef::Main(key) => {
                if !self.visible_sections[*key] {
                    return next;
                }
                (self.fixed_as_dynamic(*key, id.clone()), self.dynamic_sections_before(section))
            }
        };

        debug!(source = %section, copy = %id, "duplicating section");
        next.dynamic_sections.insert(dynamic_at, copy);
        match self.order_index(section) {
            Some(pos) => next.all_sections_order.insert(pos + 1, SectionRef::Dynamic(id)),
            None => next.all_sections_order.push(SectionRef::Dynamic(id)),
        }
        next
    }

    /// Move `active` to the position of `over`, shifting the entries between.
    pub fn reorder(&self, active: &SectionRef, over: &SectionRef) -> DayPage {
        let mut next = self.clone();
        if active == over {
            return next;
        }
        let (Some(from), Some(to)) = (self.order_index(active), self.order_index(over)) else {
            debug!(%active, %over, "ignoring reorder of section not in order");
            return next;
        };

        let moved = next.all_sections_order.remove(from);
        next.all_sections_order.insert(to, moved);
        next
    }

    /// Set a section's icon and heading together.
    pub fn change_icon(&self, section: &SectionRef, icon: IconTag, heading: &str) -> DayPage {
        let mut next = self.clone();
        match section {
            SectionRef::Main(key) => {
                if self.visible_sections[*key] {
                    next.icons[*key] = icon;
                    next.section_headings[*key] = heading.to_string();
                }
            }
            SectionRef::Dynamic(id) => match next.dynamic_section_mut(id) {
                Some(target) if !target.is_image() => {
                    target.icon = icon;
                    target.heading = heading.to_string();
                }
                _ => {}
            },
        }
        next
    }

    fn dynamic_section_mut(&mut self, id: &SectionId) -> Option<&mut DynamicSection> {
        self.dynamic_sections.iter_mut().find(|s| &s.id == id)
    }

    /// Heading shown for a fixed section, falling back to its default when blank.
    pub fn heading_for(&self, key: SectionKey) -> &str {
        let heading = self.section_headings[key].as_str();
        if heading.trim().is_empty() {
            key.default_heading()
        } else {
            heading
        }
    }

    fn fixed_as_dynamic(&self, key: SectionKey, id: SectionId) -> DynamicSection {
        DynamicSection {
            id,
            kind: self.icons[key],
            icon: self.icons[key],
            heading: self.heading_for(key).to_string(),
            body: SectionBody::Details(rows_to_entries(&self.details[key])),
        }
    }

    /// Number of dynamic sections ordered before `section`.
    fn dynamic_sections_before(&self, section: &SectionRef) -> usize {
        let end = self
            .order_index(section)
            .unwrap_or(self.all_sections_order.len());
        self.all_sections_order[..end]
            .iter()
            .filter(|entry| matches!(entry, SectionRef::Dynamic(_)))
            .count()
            .min(self.dynamic_sections.len())
    }
}

/// Overwrite row `index`, or append when `index` is one past the end.
fn set_row<T>(rows: &mut Vec<T>, index: usize, value: T) {
    if index < rows.len() {
        rows[index] = value;
    } else if index == rows.len() {
        rows.push(value);
    } else {
        debug!(index, len = rows.len(), "ignoring edit past the last row");
    }
}
