//! Itinerary editor: the document-state and history core of a multi-page
//! travel itinerary editor
//!
//! This crate provides:
//! - A tolerant page model (cover, day, policy, thank-you pages) with a single
//!   unified section order per day page
//! - Pure section operations producing new page data
//! - Whole-document snapshot undo/redo with a restoration protocol
//! - Edit and preview display lists, HTML serialization and the PDF export contract

pub mod config;
pub mod document;
pub mod editing;
pub mod error;
pub mod export;
pub mod render;
pub mod undo;
pub mod wasm;

// Re-export WASM types for direct use
pub use wasm::WasmItineraryEditor;

// Re-export primary types
pub use config::EditorConfig;
pub use document::{
    DayPage, DynamicSection, IconTag, Meal, Page, PageContent, PageId, PageKind, SectionId,
    SectionKey, SectionRef,
};
pub use editing::{EditResult, FieldEdit, KeyChord, PageEdit, SectionOp, SectionSpec};
pub use error::EditorError;
pub use render::{DisplayItem, DisplayList, DisplayPage, RenderDiff, RenderMode, RenderPatch};
pub use undo::{HistoryCommand, HistoryManager, HistorySnapshot};

use document::{normalize_pages, pages_to_value, PageIdAllocator};
use export::{PdfDocument, PdfExporter, Transport};
use rustc_hash::FxHashMap;
use serde_json::Value;
use tracing::{debug, info, warn};

/// A page widget that keeps its own buffered state (such as a block editor).
///
/// The container drives it during undo/redo: buffered content is flushed and
/// thrown away, then the widget re-renders from the restored page.
pub trait SubEditor {
    /// Flush pending content. Whatever is returned is discarded.
    fn flush(&mut self) -> Option<Value> {
        None
    }

    /// Re-render from restored page data.
    fn restore(&mut self, page: &Page);
}

/// An undo or redo whose snapshot has been applied to the page collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Restoration {
    pub command: HistoryCommand,
    /// Pages in the restored collection, in order
    pub pages: Vec<PageId>,
}

/// The container owning the page collection and its history
pub struct ItineraryEditor {
    pages: Vec<Page>,
    history: HistoryManager,
    page_ids: PageIdAllocator,
    sub_editors: FxHashMap<PageId, Box<dyn SubEditor>>,
    config: EditorConfig,
    version: u64,
    /// Display list last handed out by [`ItineraryEditor::render_diff`]
    rendered: Option<DisplayList>,
}

impl Default for ItineraryEditor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl ItineraryEditor {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            pages: Vec::new(),
            history: HistoryManager::new(config.history.capacity),
            page_ids: PageIdAllocator::new(),
            sub_editors: FxHashMap::default(),
            config,
            version: 0,
            rendered: None,
        }
    }

    /// Create an editor holding the given host page collection
    pub fn with_pages(raw: &Value, config: EditorConfig) -> Self {
        let mut editor = Self::new(config);
        editor.load_pages(raw);
        editor
    }

    /// Replace the page collection with host data.
    ///
    /// The first non-empty collection seeds the history; later ones are
    /// recorded like any other edit.
    pub fn load_pages(&mut self, raw: &Value) -> &[Page] {
        self.pages = normalize_pages(raw, &mut self.page_ids);
        info!(pages = self.pages.len(), "loaded pages");
        if !self.history.initialize(&self.pages) {
            self.history.record(&self.pages);
        }
        self.version += 1;
        &self.pages
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page(&self, id: &PageId) -> Option<&Page> {
        self.pages.iter().find(|p| &p.id == id)
    }

    pub fn page_index(&self, id: &PageId) -> Option<usize> {
        self.pages.iter().position(|p| &p.id == id)
    }

    /// The collection in the host's JSON shape
    pub fn to_value(&self) -> Value {
        pages_to_value(&self.pages)
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    /// Incremented on every change to the collection
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Apply an edit to one page and record the result.
    ///
    /// Returns `None` when no page has that id.
    pub fn apply(&mut self, page_id: &PageId, edit: &PageEdit) -> Option<EditResult> {
        let index = self.page_index(page_id)?;
        let (page, result) = edit.apply(&self.pages[index]);
        if result.changed {
            self.pages[index] = page;
            self.commit();
        }
        Some(result)
    }

    /// Accept whole-page data pushed by a page component.
    pub fn update_page(&mut self, page_id: &PageId, raw: &Value) -> Option<EditResult> {
        self.apply(page_id, &PageEdit::Replace(raw.clone()))
    }

    /// Insert a new empty page at `at` (clamped; `None` appends).
    pub fn insert_page(&mut self, kind: PageKind, at: Option<usize>) -> PageId {
        let id = self.page_ids.allocate();
        let index = at.unwrap_or(self.pages.len()).min(self.pages.len());
        debug!(page = %id, %kind, index, "inserting page");
        self.pages.insert(index, Page::new(id.clone(), kind));
        self.commit();
        id
    }

    pub fn remove_page(&mut self, page_id: &PageId) -> bool {
        let Some(index) = self.page_index(page_id) else {
            return false;
        };
        self.pages.remove(index);
        self.sub_editors.remove(page_id);
        self.commit();
        true
    }

    /// Move the page at `from` to `to`, shifting the pages between.
    pub fn move_page(&mut self, from: usize, to: usize) -> bool {
        if from == to || from >= self.pages.len() || to >= self.pages.len() {
            return false;
        }
        let page = self.pages.remove(from);
        self.pages.insert(to, page);
        self.commit();
        true
    }

    fn commit(&mut self) {
        self.version += 1;
        self.history.record(&self.pages);
    }

    /// Undo and finish the restoration in one step.
    pub fn undo(&mut self) -> bool {
        self.step(HistoryCommand::Undo)
    }

    /// Redo and finish the restoration in one step.
    pub fn redo(&mut self) -> bool {
        self.step(HistoryCommand::Redo)
    }

    pub fn step(&mut self, command: HistoryCommand) -> bool {
        let restored = self.begin_restoration(command).is_some();
        if restored {
            self.complete_restoration();
        }
        restored
    }

    pub fn begin_undo(&mut self) -> Option<Restoration> {
        self.begin_restoration(HistoryCommand::Undo)
    }

    pub fn begin_redo(&mut self) -> Option<Restoration> {
        self.begin_restoration(HistoryCommand::Redo)
    }

    /// Apply the previous/next snapshot to every page.
    ///
    /// Sub-editors are flushed first and their output dropped, then the
    /// snapshot replaces the collection and each sub-editor re-renders from
    /// it. History stays in `Restoring` until
    /// [`ItineraryEditor::complete_restoration`]; until then edits still
    /// update pages but are not recorded, and further undo/redo is ignored.
    pub fn begin_restoration(&mut self, command: HistoryCommand) -> Option<Restoration> {
        if self.history.is_restoring() {
            warn!(?command, "restoration already in flight");
            return None;
        }
        let movable = match command {
            HistoryCommand::Undo => self.history.can_undo(),
            HistoryCommand::Redo => self.history.can_redo(),
        };
        if !movable {
            return None;
        }

        for (page, editor) in self.sub_editors.iter_mut() {
            if editor.flush().is_some() {
                debug!(%page, "discarded buffered sub-editor content");
            }
        }

        let snapshot = self.history.step(command)?;
        self.pages = snapshot.pages().to_vec();
        for page in &self.pages {
            self.page_ids.observe(&page.id);
        }
        self.version += 1;

        for page in &self.pages {
            if let Some(editor) = self.sub_editors.get_mut(&page.id) {
                editor.restore(page);
            }
        }

        Some(Restoration {
            command,
            pages: self.pages.iter().map(|p| p.id.clone()).collect(),
        })
    }

    /// Signal that every page has re-rendered from the restored snapshot.
    pub fn complete_restoration(&mut self) {
        self.history.finish_restoration();
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn is_restoring(&self) -> bool {
        self.history.is_restoring()
    }

    /// Run the history command bound to `chord`, if any.
    pub fn handle_shortcut(&mut self, chord: &KeyChord) -> Option<HistoryCommand> {
        let command = chord.command()?;
        self.step(command).then_some(command)
    }

    pub fn register_sub_editor(&mut self, page_id: PageId, editor: Box<dyn SubEditor>) {
        self.sub_editors.insert(page_id, editor);
    }

    pub fn unregister_sub_editor(&mut self, page_id: &PageId) -> Option<Box<dyn SubEditor>> {
        self.sub_editors.remove(page_id)
    }

    /// Build display list for every page
    pub fn display_list(&self, mode: RenderMode) -> DisplayList {
        DisplayList::build(&self.pages, mode, self.version)
    }

    /// Edit-mode changes since the previous call.
    pub fn render_diff(&mut self) -> RenderDiff {
        let current = self.display_list(RenderMode::Edit);
        let previous = self
            .rendered
            .take()
            .unwrap_or_else(|| DisplayList::build(&[], RenderMode::Edit, 0));
        let diff = RenderDiff::between(&previous, &current);
        self.rendered = Some(current);
        diff
    }

    pub fn page_html(&self, page_id: &PageId, mode: RenderMode) -> Option<String> {
        let index = self.page_index(page_id)?;
        render::DisplayPage::build(&self.pages, index, mode).map(|page| render::page_html(&page))
    }

    /// The print document: every page's preview fragment wrapped for the renderer.
    pub fn export_html(&self) -> String {
        let fragments: FxHashMap<PageId, String> = self
            .display_list(RenderMode::Preview)
            .pages
            .iter()
            .map(|page| (page.page_id.clone(), render::page_html(page)))
            .collect();
        render::export_document(&self.pages, &fragments)
    }

    /// Render the collection to PDF through the host's transport.
    pub fn export_pdf<T: Transport + ?Sized>(&self, transport: &mut T) -> Result<PdfDocument, EditorError> {
        let exporter = PdfExporter::new(self.config.pdf.clone());
        Ok(exporter.generate(transport, self.export_html())?)
    }

    /// Check an image before the host reads it.
    pub fn validate_upload(&self, mime: &str, size: u64) -> Result<(), EditorError> {
        Ok(export::validate_image(&self.config.upload, mime, size)?)
    }
}
