//! Designer host: element store + canvas session + placement tool.
//!
//! This is the layer the form and the canvas both talk to. It owns the
//! store, forwards snapshots to the session after every store change, and
//! writes committed geometry back when the session reports a finished
//! gesture.

use crate::input::{InputEvent, Modifiers};
use crate::session::{CanvasSession, Signal};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::tools::{PlaceTool, ToolKind};
use pd_core::{
    CanvasConfig, CanvasSize, Color, DesignDocument, DocumentError, Element, ElementDraft,
    ElementId, ElementPatch, ElementStore, ImportReport, StoreError,
};
use pd_render::{Frame, Viewport};

pub struct Designer {
    store: ElementStore,
    session: CanvasSession,
    tool: PlaceTool,
}

impl Designer {
    pub fn new(config: CanvasConfig) -> Self {
        let viewport = Viewport::new(config.width, config.height);
        Self {
            store: ElementStore::with_min_size(config.min_size),
            session: CanvasSession::mount(&config, viewport),
            tool: PlaceTool::new(),
        }
    }

    pub fn store(&self) -> &ElementStore {
        &self.store
    }

    pub fn session(&self) -> &CanvasSession {
        &self.session
    }

    pub fn elements(&self) -> &[Element] {
        self.store.elements()
    }

    pub fn selection(&self) -> Option<ElementId> {
        self.session.selection()
    }

    pub fn tool(&self) -> ToolKind {
        self.tool.kind()
    }

    // ─── Form operations ─────────────────────────────────────────────────

    /// "Add Element": store the draft as-is and show it.
    pub fn add_element(&mut self, draft: ElementDraft) -> ElementId {
        let id = self.store.add(draft);
        self.sync();
        id
    }

    /// Arm click-to-place: the next pointer-down on empty canvas drops the
    /// draft with its top-left corner under the pointer.
    pub fn arm(&mut self, draft: ElementDraft) {
        self.tool.arm(draft);
    }

    pub fn disarm(&mut self) {
        self.tool.disarm();
    }

    /// # Errors
    /// `UnknownElement` for a missing id; validation errors for bad geometry.
    pub fn update_element(
        &mut self,
        id: ElementId,
        patch: ElementPatch,
    ) -> Result<&Element, StoreError> {
        self.store.update(id, patch)?;
        self.sync();
        self.store.get(id).ok_or(StoreError::UnknownElement(id))
    }

    pub fn remove_element(&mut self, id: ElementId) -> Option<Element> {
        let removed = self.store.remove(id)?;
        self.sync();
        Some(removed)
    }

    /// Remove the selected element, if any.
    pub fn delete_selected(&mut self) -> Option<Element> {
        let id = self.session.selection()?;
        self.remove_element(id)
    }

    /// "Clear Canvas": drop every element. Ids keep counting.
    pub fn clear(&mut self) {
        self.store.clear();
        self.sync();
    }

    /// Select an element from outside the canvas. Unknown ids are ignored.
    pub fn select(&mut self, id: Option<ElementId>) -> Vec<Signal> {
        self.session.select(id)
    }

    pub fn set_background(&mut self, color: Color) {
        self.session.set_background(color);
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.session.resize(Viewport::new(width, height));
    }

    // ─── Document ────────────────────────────────────────────────────────

    fn canvas_size(&self) -> CanvasSize {
        let vp = self.session.camera().viewport();
        CanvasSize {
            width: vp.width,
            height: vp.height,
        }
    }

    pub fn document(&self) -> DesignDocument {
        DesignDocument::from_store(self.canvas_size(), &self.store)
    }

    /// # Errors
    /// `Json` if serialization fails.
    pub fn export_json(&self) -> Result<String, DocumentError> {
        self.document().to_json()
    }

    /// Replace the current design with an exported document. Bad records
    /// are skipped and listed in the report.
    ///
    /// # Errors
    /// `Json` when the text is not a design document at all.
    pub fn import_json(&mut self, json: &str) -> Result<ImportReport, DocumentError> {
        let doc = DesignDocument::from_json(json)?;
        self.store.clear();
        let report = doc.import_into(&mut self.store);
        for (index, reason) in &report.skipped {
            log::warn!("import: record {index} skipped: {reason}");
        }
        self.sync();
        Ok(report)
    }

    // ─── Canvas ──────────────────────────────────────────────────────────

    /// Route a host input event. Pointer events go to the session (or the
    /// armed placement); committed geometry is written back to the store.
    pub fn handle_input(&mut self, event: &InputEvent) -> Vec<Signal> {
        match event {
            InputEvent::Key { key, modifiers } => self.handle_key(key, *modifiers).1,
            InputEvent::PointerDown { position, .. }
                if self.tool.armed().is_some() && self.session.hit_test(*position).is_none() =>
            {
                self.place(*position)
            }
            _ => {
                let signals = self.session.pointer(event);
                self.write_back(signals)
            }
        }
    }

    /// Resolve and apply a keyboard shortcut, returning it with the signals
    /// it caused (a selection cleared by Escape, Delete or clear). Export is
    /// returned for the host to act on (it needs somewhere to put the file).
    pub fn handle_key(
        &mut self,
        key: &str,
        modifiers: Modifiers,
    ) -> (Option<ShortcutAction>, Vec<Signal>) {
        let Some(action) = ShortcutMap::resolve(
            key,
            modifiers.ctrl,
            modifiers.shift,
            modifiers.alt,
            modifiers.meta,
        ) else {
            return (None, Vec::new());
        };
        log::debug!("shortcut: {key} → {}", action.name());
        let signals = match action {
            ShortcutAction::Arm(kind) => {
                self.tool.arm(ElementDraft::new(kind));
                Vec::new()
            }
            ShortcutAction::Deselect => {
                self.tool.disarm();
                self.session.select(None)
            }
            ShortcutAction::DeleteSelected => match self.session.selection() {
                Some(id) if self.store.remove(id).is_some() => self.sync(),
                _ => Vec::new(),
            },
            ShortcutAction::ClearCanvas => {
                self.store.clear();
                self.sync()
            }
            ShortcutAction::Export => Vec::new(),
        };
        (Some(action), signals)
    }

    /// Next frame, or `None` after teardown.
    pub fn render(&mut self) -> Option<Frame> {
        self.session.tick()
    }

    pub fn teardown(&mut self) {
        self.session.teardown();
    }

    fn place(&mut self, screen: kurbo::Point) -> Vec<Signal> {
        let doc = self.session.screen_to_document(screen);
        let Some(draft) = self.tool.place_at(doc) else {
            return Vec::new();
        };
        let id = self.store.add(draft);
        log::debug!("designer: placed {id} at ({}, {})", doc.x, doc.y);
        let mut signals = self.sync();
        signals.extend(self.session.select(Some(id)));
        signals
    }

    fn write_back(&mut self, signals: Vec<Signal>) -> Vec<Signal> {
        let mut committed = false;
        for signal in &signals {
            if let Signal::Commit(update) = signal {
                match self.store.commit(*update) {
                    Ok(_) => committed = true,
                    Err(e) => log::warn!("designer: write-back of {} failed: {e}", update.id),
                }
            }
        }
        if !committed {
            return signals;
        }
        // Hand the acknowledged geometry back so the shapes come clean.
        let mut signals = signals;
        signals.extend(self.sync());
        signals
    }

    fn sync(&mut self) -> Vec<Signal> {
        self.session.set_elements(self.store.elements())
    }
}
