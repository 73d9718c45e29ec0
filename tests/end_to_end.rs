//! Full editing session on a day page through the container

use itinerary_editor::{
    EditorConfig, IconTag, ItineraryEditor, Meal, PageEdit, PageId, SectionKey, SectionOp,
    SectionRef, SectionSpec,
};
use serde_json::{json, Value};

const DAY: PageId = PageId::Numeric(2);

fn editor() -> ItineraryEditor {
    ItineraryEditor::with_pages(
        &json!([
            {"id": 1, "type": "cover"},
            {"id": 2, "type": "day", "destination": "Jaipur", "arrivalDetails": ["Flight at 10am"]}
        ]),
        EditorConfig::default(),
    )
}

fn day_json(editor: &ItineraryEditor) -> Value {
    editor.page(&DAY).unwrap().to_value()
}

fn without(mut value: Value, keys: &[&str]) -> Value {
    let obj = value.as_object_mut().unwrap();
    for key in keys {
        obj.remove(*key);
    }
    value
}

#[test]
fn test_day_page_session() {
    let mut editor = editor();

    // Add a custom section.
    let result = editor
        .apply(
            &DAY,
            &PageEdit::Day(SectionOp::AddDynamicSection {
                spec: SectionSpec::new(IconTag::Custom, "Visa Notes"),
            }),
        )
        .unwrap();
    assert!(result.changed);
    let new_id = result.created_sections[0].clone();
    let day = editor.page(&DAY).unwrap().as_day().unwrap().clone();
    assert_eq!(day.all_sections_order.last(), Some(&SectionRef::Dynamic(new_id)));
    assert_eq!(day.dynamic_sections[0].heading, "Visa Notes");

    // Toggle breakfast: nothing else changes.
    let before = day_json(&editor);
    editor.apply(&DAY, &PageEdit::Day(SectionOp::ToggleMeal { meal: Meal::Breakfast }));
    let after = day_json(&editor);
    assert_eq!(after["mealSelections"]["breakfast"], json!(true));
    assert_eq!(without(before, &["mealSelections"]), without(after, &["mealSelections"]));

    // Delete the arrival section.
    let pre_delete = editor.page(&DAY).unwrap().clone();
    let arrival = SectionRef::Main(SectionKey::Arrival);
    editor.apply(&DAY, &PageEdit::Day(SectionOp::RemoveSection { section: arrival.clone() }));
    let deleted = day_json(&editor);
    assert_eq!(deleted["visibleSections"]["arrival"], json!(false));
    assert_eq!(deleted["arrivalDetails"], json!([""]));
    assert!(!deleted["allSectionsOrder"]
        .as_array()
        .unwrap()
        .contains(&json!("main_arrival")));

    // Undo restores visibility, details and order position exactly.
    assert!(editor.undo());
    let restored = editor.page(&DAY).unwrap();
    assert_eq!(restored, &pre_delete);
    let day = restored.as_day().unwrap();
    assert!(day.visible_sections.arrival);
    assert_eq!(day.details.arrival_details, vec!["Flight at 10am"]);
    assert_eq!(day.order_index(&arrival), Some(0));
}

#[test]
fn test_serialized_page_reloads_identically() {
    let mut editor = editor();
    editor.apply(
        &DAY,
        &PageEdit::Day(SectionOp::DuplicateSection {
            section: SectionRef::Main(SectionKey::Arrival),
        }),
    );
    editor.apply(
        &DAY,
        &PageEdit::Day(SectionOp::AddDynamicSection {
            spec: SectionSpec::image(),
        }),
    );

    let saved = editor.to_value();
    let reloaded = ItineraryEditor::with_pages(&saved, EditorConfig::default());
    assert_eq!(reloaded.pages(), editor.pages());
    assert_eq!(reloaded.to_value(), saved);
}

#[test]
fn test_edits_arrive_as_json() {
    let mut editor = editor();
    let edit: PageEdit = serde_json::from_value(json!({
        "page": "day",
        "edit": {"op": "setField", "edit": {"field": "destination", "value": "Udaipur"}}
    }))
    .unwrap();
    assert!(editor.apply(&DAY, &edit).unwrap().changed);
    assert_eq!(day_json(&editor)["destination"], json!("Udaipur"));

    let reorder: PageEdit = serde_json::from_value(json!({
        "page": "day",
        "edit": {"op": "reorder", "active": "main_drop", "over": "main_arrival"}
    }))
    .unwrap();
    editor.apply(&DAY, &reorder);
    assert_eq!(day_json(&editor)["allSectionsOrder"][0], json!("main_drop"));
}

#[test]
fn test_legacy_page_is_migrated() {
    let editor = ItineraryEditor::with_pages(
        &json!([{
            "id": 7,
            "type": "day",
            "transferDetails": "Cab to hotel",
            "dynamicSections": [{"id": "d1", "type": "Hotel", "heading": "Stay", "details": "Taj"}],
            "customFlag": 3
        }]),
        EditorConfig::default(),
    );
    let page = editor.page(&PageId::Numeric(7)).unwrap().to_value();
    assert_eq!(page["transportDetails"], json!(["Cab to hotel"]));
    assert!(page.get("transferDetails").is_none());
    assert_eq!(page["dynamicSections"][0]["details"], json!([{"value": "Taj"}]));
    assert_eq!(page["customFlag"], json!(3));
}
