//! WASM bindings for the itinerary editor
//!
//! Page data, edits and display lists cross the boundary as JSON strings.

use crate::config::EditorConfig;
use crate::document::{PageId, PageKind};
use crate::editing::{KeyChord, PageEdit};
use crate::export::PdfExporter;
use crate::render::RenderMode;
use crate::undo::HistoryCommand;
use crate::ItineraryEditor;
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Initialize panic hook for better error messages
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// WASM-exposed editor wrapper
#[wasm_bindgen]
pub struct WasmItineraryEditor {
    editor: ItineraryEditor,
}

#[wasm_bindgen]
impl WasmItineraryEditor {
    /// Create an editor, optionally from a JSON configuration
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<WasmItineraryEditor, JsError> {
        let config = match config_json.as_deref() {
            Some(json) if !json.trim().is_empty() => EditorConfig::from_json_str(json)?,
            _ => EditorConfig::default(),
        };
        Ok(Self {
            editor: ItineraryEditor::new(config),
        })
    }

    /// Load the host page collection; returns the normalized pages
    #[wasm_bindgen(js_name = loadPages)]
    pub fn load_pages(&mut self, pages_json: &str) -> Result<String, JsError> {
        let raw: serde_json::Value = serde_json::from_str(pages_json)?;
        self.editor.load_pages(&raw);
        Ok(self.editor.to_value().to_string())
    }

    #[wasm_bindgen(js_name = pagesJson)]
    pub fn pages_json(&self) -> String {
        self.editor.to_value().to_string()
    }

    /// Accept whole-page data from a page component
    #[wasm_bindgen(js_name = updatePage)]
    pub fn update_page(&mut self, page_id: &str, page_json: &str) -> Result<bool, JsError> {
        let id = parse_page_id(page_id)?;
        let raw: serde_json::Value = serde_json::from_str(page_json)?;
        let result = self
            .editor
            .update_page(&id, &raw)
            .ok_or_else(|| unknown_page(page_id))?;
        Ok(result.changed)
    }

    /// Apply a serialized `PageEdit`; returns the edit result as JSON
    #[wasm_bindgen(js_name = applyEdit)]
    pub fn apply_edit(&mut self, page_id: &str, edit_json: &str) -> Result<String, JsError> {
        let id = parse_page_id(page_id)?;
        let edit: PageEdit = serde_json::from_str(edit_json)?;
        let result = self.editor.apply(&id, &edit).ok_or_else(|| unknown_page(page_id))?;
        Ok(to_json(&result)?)
    }

    /// Insert an empty page; returns its id
    #[wasm_bindgen(js_name = insertPage)]
    pub fn insert_page(&mut self, kind: &str, index: Option<usize>) -> Result<String, JsError> {
        let kind = PageKind::parse(kind).ok_or_else(|| JsError::new(&format!("unknown page type: {kind}")))?;
        Ok(self.editor.insert_page(kind, index).to_string())
    }

    #[wasm_bindgen(js_name = removePage)]
    pub fn remove_page(&mut self, page_id: &str) -> Result<bool, JsError> {
        Ok(self.editor.remove_page(&parse_page_id(page_id)?))
    }

    #[wasm_bindgen(js_name = movePage)]
    pub fn move_page(&mut self, from: usize, to: usize) -> bool {
        self.editor.move_page(from, to)
    }

    /// Undo and finish restoration immediately
    pub fn undo(&mut self) -> bool {
        self.editor.undo()
    }

    /// Redo and finish restoration immediately
    pub fn redo(&mut self) -> bool {
        self.editor.redo()
    }

    /// Start an undo; the host calls `completeRestoration` once pages have re-rendered
    #[wasm_bindgen(js_name = beginUndo)]
    pub fn begin_undo(&mut self) -> bool {
        self.editor.begin_undo().is_some()
    }

    #[wasm_bindgen(js_name = beginRedo)]
    pub fn begin_redo(&mut self) -> bool {
        self.editor.begin_redo().is_some()
    }

    #[wasm_bindgen(js_name = completeRestoration)]
    pub fn complete_restoration(&mut self) {
        self.editor.complete_restoration();
    }

    #[wasm_bindgen(js_name = canUndo)]
    pub fn can_undo(&self) -> bool {
        self.editor.can_undo()
    }

    #[wasm_bindgen(js_name = canRedo)]
    pub fn can_redo(&self) -> bool {
        self.editor.can_redo()
    }

    #[wasm_bindgen(js_name = isRestoring)]
    pub fn is_restoring(&self) -> bool {
        self.editor.is_restoring()
    }

    /// Handle a key event; returns "undo", "redo" or nothing
    #[wasm_bindgen(js_name = handleKey)]
    pub fn handle_key(&mut self, chord_json: &str) -> Result<Option<String>, JsError> {
        let chord: KeyChord = serde_json::from_str(chord_json)?;
        Ok(self.editor.handle_shortcut(&chord).map(|command| match command {
            HistoryCommand::Undo => "undo".to_string(),
            HistoryCommand::Redo => "redo".to_string(),
        }))
    }

    /// Display list for every page (`preview` selects the read-only variant)
    #[wasm_bindgen(js_name = displayListJson)]
    pub fn display_list_json(&self, preview: bool) -> Result<String, JsError> {
        Ok(to_json(&self.editor.display_list(mode(preview)))?)
    }

    /// Page patches since the previous call
    #[wasm_bindgen(js_name = renderDiffJson)]
    pub fn render_diff_json(&mut self) -> Result<String, JsError> {
        Ok(to_json(&self.editor.render_diff())?)
    }

    #[wasm_bindgen(js_name = pageHtml)]
    pub fn page_html(&self, page_id: &str, preview: bool) -> Result<String, JsError> {
        self.editor
            .page_html(&parse_page_id(page_id)?, mode(preview))
            .ok_or_else(|| unknown_page(page_id))
    }

    #[wasm_bindgen(js_name = exportHtml)]
    pub fn export_html(&self) -> String {
        self.editor.export_html()
    }

    /// The request body the host posts to the PDF service
    #[wasm_bindgen(js_name = pdfRequestJson)]
    pub fn pdf_request_json(&self) -> String {
        let exporter = PdfExporter::new(self.editor.config().pdf.clone());
        exporter.build_request(self.editor.export_html()).to_value().to_string()
    }

    #[wasm_bindgen(js_name = pdfApiUrl)]
    pub fn pdf_api_url(&self) -> String {
        self.editor.config().pdf.api_url.clone()
    }

    /// Check an image before reading it; throws with the user-facing message
    #[wasm_bindgen(js_name = validateUpload)]
    pub fn validate_upload(&self, mime: &str, size: f64) -> Result<(), JsError> {
        Ok(self.editor.validate_upload(mime, size.max(0.0) as u64)?)
    }
}

fn mode(preview: bool) -> RenderMode {
    if preview {
        RenderMode::Preview
    } else {
        RenderMode::Edit
    }
}

fn parse_page_id(raw: &str) -> Result<PageId, JsError> {
    PageId::parse(raw).ok_or_else(|| unknown_page(raw))
}

fn unknown_page(raw: &str) -> JsError {
    JsError::from(crate::EditorError::UnknownPage(raw.to_string()))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string(value)
}
