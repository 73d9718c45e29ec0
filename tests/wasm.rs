//! Browser tests for the WASM facade (`wasm-pack test --headless --firefox`)
#![cfg(target_arch = "wasm32")]

use itinerary_editor::WasmItineraryEditor;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn editor() -> WasmItineraryEditor {
    let mut editor = WasmItineraryEditor::new(None).unwrap();
    editor
        .load_pages(r#"[{"id": 1, "type": "cover"}, {"id": 2, "type": "day", "destination": "Goa"}]"#)
        .unwrap();
    editor
}

#[wasm_bindgen_test]
fn test_edit_undo_redo() {
    let mut editor = editor();
    let edit = r#"{"page": "day", "edit": {"op": "toggleMeal", "meal": "lunch"}}"#;
    let result = editor.apply_edit("2", edit).unwrap();
    assert!(result.contains(r#""changed":true"#));
    assert!(editor.can_undo());

    assert_eq!(editor.handle_key(r#"{"key": "z", "ctrlKey": true}"#).unwrap().as_deref(), Some("undo"));
    assert!(editor.pages_json().contains(r#""lunch":false"#));
    assert!(editor.redo());
    assert!(editor.pages_json().contains(r#""lunch":true"#));
}

#[wasm_bindgen_test]
fn test_two_phase_restoration() {
    let mut editor = editor();
    editor.insert_page("thankyou", None).unwrap();
    assert!(editor.begin_undo());
    assert!(editor.is_restoring());
    assert!(!editor.begin_undo());
    editor.complete_restoration();
    assert!(editor.can_redo());
}

#[wasm_bindgen_test]
fn test_export_surface() {
    let mut editor = editor();
    assert!(editor.render_diff_json().unwrap().contains("insertPage"));
    assert!(editor.export_html().contains(r#"data-page-id="2""#));
    assert!(editor.pdf_request_json().contains(r#""printBackground":true"#));
    assert!(editor.validate_upload("image/gif", 10.0).is_err());
}
