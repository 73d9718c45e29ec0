//! Property-based invariant tests for day-page normalization and section
//! operations.
//!
//! 1. Normalizing already-normalized page data changes nothing.
//! 2. Every order entry resolves and none repeats.
//! 3. Reorder keeps the multiset of order entries.
//! 4. Reorder with an absent or identical entry is a no-op.
//! 5. Duplicate inserts exactly one entry, right after the source.

use itinerary_editor::document::{Page, PageIdAllocator};
use itinerary_editor::{DayPage, SectionRef};
use proptest::prelude::*;
use serde_json::{json, Map, Value};

// ── Helpers ─────────────────────────────────────────────────────────────

const ORDER_POOL: &[&str] = &[
    "main_arrival",
    "main_transport",
    "main_activity",
    "main_drop",
    "main_bogus",
    "d0",
    "d1",
    "d2",
    "ghost",
];

fn text_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        "[a-z <>/]{0,12}".prop_map(Value::String),
        any::<i32>().prop_map(|n| json!(n)),
    ]
}

fn rows_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        text_strategy(),
        prop::collection::vec(text_strategy(), 0..4).prop_map(Value::Array),
    ]
}

fn dynamic_section_strategy() -> impl Strategy<Value = Value> {
    (
        prop::option::of(prop_oneof![Just("d0"), Just("d1"), Just("d2"), Just("main_x")]),
        prop_oneof![Just("Custom"), Just("Hotel"), Just("Image"), Just("Bogus")],
        text_strategy(),
        prop_oneof![
            rows_strategy(),
            prop::collection::vec(text_strategy().prop_map(|v| json!({"value": v})), 0..3)
                .prop_map(Value::Array),
        ],
    )
        .prop_map(|(id, kind, heading, details)| {
            let mut section = Map::new();
            if let Some(id) = id {
                section.insert("id".into(), json!(id));
            }
            section.insert("type".into(), json!(kind));
            section.insert("heading".into(), heading);
            section.insert("details".into(), details);
            Value::Object(section)
        })
}

fn day_strategy() -> impl Strategy<Value = Value> {
    (
        text_strategy(),
        rows_strategy(),
        rows_strategy(),
        prop::array::uniform4(any::<bool>()),
        prop::array::uniform3(prop::option::of(any::<bool>())),
        prop::collection::vec(dynamic_section_strategy(), 0..4),
        prop::option::of(prop::collection::vec(prop::sample::select(ORDER_POOL), 0..8)),
    )
        .prop_map(|(destination, arrival, transfer, visible, meals, dynamic, order)| {
            let mut page = json!({
                "id": 1,
                "type": "day",
                "destination": destination,
                "arrivalDetails": arrival,
                "transferDetails": transfer,
                "visibleSections": {
                    "arrival": visible[0],
                    "transport": visible[1],
                    "activity": visible[2],
                    "drop": visible[3]
                },
                "mealSelections": {
                    "breakfast": meals[0],
                    "lunch": meals[1],
                    "dinner": meals[2]
                },
                "dynamicSections": dynamic
            });
            if let Some(order) = order {
                page["allSectionsOrder"] = json!(order);
            }
            page
        })
}

fn normalize(raw: &Value) -> Page {
    Page::normalize(raw, &mut PageIdAllocator::new()).expect("day pages always normalize")
}

fn day(raw: &Value) -> DayPage {
    normalize(raw).as_day().cloned().expect("normalized as a day page")
}

fn sorted(order: &[SectionRef]) -> Vec<String> {
    let mut names: Vec<String> = order.iter().map(ToString::to_string).collect();
    names.sort();
    names
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Normalization is idempotent
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn normalize_idempotent(raw in day_strategy()) {
        let once = normalize(&raw);
        let twice = normalize(&once.to_value());
        prop_assert_eq!(&twice, &once, "renormalizing changed the page for {}", raw);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Order entries resolve and are unique
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn order_resolves_without_duplicates(raw in day_strategy()) {
        let page = day(&raw);
        for entry in &page.all_sections_order {
            prop_assert!(page.resolves(entry), "dangling entry {}", entry);
        }
        let names = sorted(&page.all_sections_order);
        let mut unique = names.clone();
        unique.dedup();
        prop_assert_eq!(names, unique);
        for section in &page.dynamic_sections {
            prop_assert!(page.order_index(&SectionRef::Dynamic(section.id.clone())).is_some());
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3-4. Reorder is an array move over the same entries
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn reorder_preserves_entries(
        raw in day_strategy(),
        active in prop::sample::select(ORDER_POOL),
        over in prop::sample::select(ORDER_POOL),
    ) {
        let page = day(&raw);
        let (Some(active), Some(over)) = (SectionRef::parse(active), SectionRef::parse(over)) else {
            return Ok(());
        };
        let next = page.reorder(&active, &over);
        prop_assert_eq!(sorted(&next.all_sections_order), sorted(&page.all_sections_order));

        match (page.order_index(&active), page.order_index(&over)) {
            (Some(_), Some(to)) if active != over => {
                prop_assert_eq!(next.order_index(&active), Some(to));
            }
            _ => prop_assert_eq!(next, page),
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Duplicate inserts one entry after the source
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn duplicate_inserts_one_entry_after_source(raw in day_strategy(), pick in any::<prop::sample::Index>()) {
        let page = day(&raw);
        prop_assume!(!page.all_sections_order.is_empty());
        let position = pick.index(page.all_sections_order.len());
        let source = page.all_sections_order[position].clone();

        let next = page.duplicate_section(&source);
        prop_assert_eq!(next.all_sections_order.len(), page.all_sections_order.len() + 1);
        prop_assert_eq!(next.dynamic_sections.len(), page.dynamic_sections.len() + 1);
        prop_assert_eq!(&next.all_sections_order[position], &source);

        let copy = &next.all_sections_order[position + 1];
        prop_assert!(!page.all_sections_order.contains(copy));
        prop_assert!(next.resolves(copy));
    }
}
