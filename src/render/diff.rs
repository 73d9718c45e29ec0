//! Page-level render diff for incremental host updates

use crate::document::PageId;
use crate::render::{DisplayList, DisplayPage};
use rustc_hash::FxHashMap;
use serde::Serialize;

/// A single patch operation for the renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum RenderPatch {
    /// Remove a page that no longer exists
    RemovePage { page_id: PageId },
    /// Insert a new page at `index`
    InsertPage { index: usize, page: DisplayPage },
    /// Move a surviving page to `index`
    MovePage { page_id: PageId, index: usize },
    /// Redraw a page whose content changed
    UpdatePage { page: DisplayPage },
}

/// Complete render diff to send to renderer
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RenderDiff {
    pub version: u64,
    pub patches: Vec<RenderPatch>,
}

impl RenderDiff {
    /// Create empty diff
    pub fn new(version: u64) -> Self {
        Self {
            version,
            patches: Vec::new(),
        }
    }

    /// Compute the patches turning `previous` into `current`.
    ///
    /// Removals come first, then inserts and moves in current order, then
    /// updates.
    pub fn between(previous: &DisplayList, current: &DisplayList) -> Self {
        let mut diff = RenderDiff::new(current.version);

        let prev_pages: FxHashMap<&PageId, &DisplayPage> =
            previous.pages.iter().map(|p| (&p.page_id, p)).collect();
        let curr_ids: FxHashMap<&PageId, usize> = current
            .pages
            .iter()
            .enumerate()
            .map(|(i, p)| (&p.page_id, i))
            .collect();

        for page in &previous.pages {
            if !curr_ids.contains_key(&page.page_id) {
                diff.add_patch(RenderPatch::RemovePage {
                    page_id: page.page_id.clone(),
                });
            }
        }

        // Surviving pages in their previous relative order
        let mut survivors: Vec<&PageId> = previous
            .pages
            .iter()
            .map(|p| &p.page_id)
            .filter(|id| curr_ids.contains_key(id))
            .collect();

        let mut updates = Vec::new();
        for (index, page) in current.pages.iter().enumerate() {
            match prev_pages.get(&page.page_id) {
                None => {
                    survivors.insert(index.min(survivors.len()), &page.page_id);
                    diff.add_patch(RenderPatch::InsertPage {
                        index,
                        page: page.clone(),
                    });
                }
                Some(prev) => {
                    if survivors.get(index) != Some(&&page.page_id) {
                        if let Some(from) = survivors.iter().position(|id| *id == &page.page_id) {
                            let id = survivors.remove(from);
                            survivors.insert(index.min(survivors.len()), id);
                        }
                        diff.add_patch(RenderPatch::MovePage {
                            page_id: page.page_id.clone(),
                            index,
                        });
                    }
                    if *prev != page {
                        updates.push(RenderPatch::UpdatePage { page: page.clone() });
                    }
                }
            }
        }

        diff.patches.extend(updates);
        diff
    }

    /// Add a patch
    pub fn add_patch(&mut self, patch: RenderPatch) {
        self.patches.push(patch);
    }

    /// Check if there are any patches
    pub fn has_patches(&self) -> bool {
        !self.patches.is_empty()
    }

    /// Get patch count
    pub fn patch_count(&self) -> usize {
        self.patches.len()
    }

    /// Pages the host must redraw or create
    pub fn touched_pages(&self) -> impl Iterator<Item = &PageId> {
        self.patches.iter().filter_map(|patch| match patch {
            RenderPatch::InsertPage { page, .. } | RenderPatch::UpdatePage { page } => {
                Some(&page.page_id)
            }
            RenderPatch::MovePage { .. } | RenderPatch::RemovePage { .. } => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{normalize_pages, PageIdAllocator};
    use crate::render::RenderMode;
    use serde_json::json;

    fn list(raw: serde_json::Value) -> DisplayList {
        let pages = normalize_pages(&raw, &mut PageIdAllocator::new());
        DisplayList::build(&pages, RenderMode::Preview, 1)
    }

    #[test]
    fn test_render_diff() {
        let mut diff = RenderDiff::new(1);
        assert!(!diff.has_patches());

        diff.add_patch(RenderPatch::RemovePage {
            page_id: PageId::Numeric(1),
        });
        assert!(diff.has_patches());
        assert_eq!(diff.patch_count(), 1);
    }

    #[test]
    fn test_identical_lists_have_no_patches() {
        let raw = json!([{"id": 1, "type": "cover"}, {"id": 2, "type": "day"}]);
        assert!(!RenderDiff::between(&list(raw.clone()), &list(raw)).has_patches());
    }

    #[test]
    fn test_content_change_updates_one_page() {
        let before = list(json!([{"id": 1, "type": "day"}, {"id": 2, "type": "day"}]));
        let after = list(json!([
            {"id": 1, "type": "day"},
            {"id": 2, "type": "day", "destination": "Goa"}
        ]));
        let diff = RenderDiff::between(&before, &after);
        let touched: Vec<&PageId> = diff.touched_pages().collect();
        assert_eq!(touched, vec![&PageId::Numeric(2)]);
    }

    #[test]
    fn test_insert_and_remove() {
        let before = list(json!([{"id": 1, "type": "cover"}, {"id": 2, "type": "policy"}]));
        let after = list(json!([{"id": 1, "type": "cover"}, {"id": 3, "type": "thankyou"}]));
        let diff = RenderDiff::between(&before, &after);
        assert_eq!(
            diff.patches[0],
            RenderPatch::RemovePage {
                page_id: PageId::Numeric(2)
            }
        );
        assert!(matches!(diff.patches[1], RenderPatch::InsertPage { index: 1, .. }));
        assert_eq!(diff.patch_count(), 2);
    }

    #[test]
    fn test_move_renumbers_days() {
        let before = list(json!([{"id": 1, "type": "day"}, {"id": 2, "type": "day"}]));
        let after = list(json!([{"id": 2, "type": "day"}, {"id": 1, "type": "day"}]));
        let diff = RenderDiff::between(&before, &after);
        assert!(diff
            .patches
            .contains(&RenderPatch::MovePage {
                page_id: PageId::Numeric(2),
                index: 0
            }));
        // Both pages changed their day number and page number.
        assert_eq!(diff.touched_pages().count(), 2);
    }
}
