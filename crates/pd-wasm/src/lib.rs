//! WASM bridge for Prompt Designer: exposes the element store and the canvas
//! session to the browser page.
//!
//! Compiled via `wasm-pack build --target web`. Every method that reports
//! something back returns a JSON string so the page never has to know about
//! Rust types.

mod render2d;

use pd_core::{
    Bounds, CanvasConfig, ColorChoice, DesignDocument, ElementDraft, ElementId, ElementKind,
    ElementPatch, ElementRecord, ElementStore,
};
use pd_editor::{Designer, InputEvent, Modifiers, Signal};
use render2d::CanvasTheme;
use serde::Deserialize;
use serde_json::{Value, json};
use wasm_bindgen::prelude::*;
use web_sys::CanvasRenderingContext2d;

/// The page-facing designer.
///
/// Owns one `Designer` (store + mounted canvas session). The form calls the
/// element methods; the `<canvas>` listeners call the pointer and key
/// methods; `requestAnimationFrame` calls `render`.
#[wasm_bindgen]
pub struct PdCanvas {
    designer: Designer,
    /// Dark mode flag. `false` = light (default), `true` = dark.
    dark_mode: bool,
}

#[wasm_bindgen]
impl PdCanvas {
    /// Create a designer with a canvas of the given size and default styling.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64) -> Self {
        console_error_panic_hook_setup();
        let config = CanvasConfig {
            width,
            height,
            ..CanvasConfig::default()
        };
        Self {
            designer: Designer::new(config),
            dark_mode: false,
        }
    }

    /// Create a designer from a JSON `CanvasConfig`.
    #[wasm_bindgen(js_name = fromConfig)]
    pub fn from_config(json: &str) -> Result<PdCanvas, JsValue> {
        console_error_panic_hook_setup();
        let config = CanvasConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self {
            designer: Designer::new(config),
            dark_mode: false,
        })
    }

    // ─── Canvas surface ──────────────────────────────────────────────────

    /// Draw the current frame. Returns `false` once the canvas is torn down.
    pub fn render(&mut self, ctx: &CanvasRenderingContext2d) -> bool {
        let Some(frame) = self.designer.render() else {
            return false;
        };
        let theme = if self.dark_mode {
            CanvasTheme::dark()
        } else {
            CanvasTheme::light()
        };
        render2d::render_frame(ctx, &frame, &theme);
        true
    }

    pub fn set_theme(&mut self, is_dark: bool) {
        self.dark_mode = is_dark;
    }

    /// Resize the drawing surface (CSS pixels).
    pub fn resize(&mut self, width: f64, height: f64) {
        self.designer.resize(width, height);
    }

    /// Set the canvas fill from a hex string. Returns `false` for a bad color.
    pub fn set_background(&mut self, hex: &str) -> bool {
        match pd_core::Color::from_hex(hex) {
            Some(color) => {
                self.designer.set_background(color);
                true
            }
            None => false,
        }
    }

    /// Stop rendering and drop input. Further `render` calls return `false`.
    pub fn teardown(&mut self) {
        self.designer.teardown();
    }

    // ─── Pointer input ───────────────────────────────────────────────────

    /// Returns a JSON signal summary, see [`signals_json`].
    pub fn handle_pointer_down(
        &mut self,
        x: f64,
        y: f64,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> String {
        let mods = modifiers(shift, ctrl, alt, meta);
        let signals = self
            .designer
            .handle_input(&InputEvent::from_pointer_down(x, y, mods));
        signals_json(&signals)
    }

    pub fn handle_pointer_move(
        &mut self,
        x: f64,
        y: f64,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> String {
        let mods = modifiers(shift, ctrl, alt, meta);
        let signals = self
            .designer
            .handle_input(&InputEvent::from_pointer_move(x, y, mods));
        signals_json(&signals)
    }

    pub fn handle_pointer_up(
        &mut self,
        x: f64,
        y: f64,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> String {
        let mods = modifiers(shift, ctrl, alt, meta);
        let signals = self
            .designer
            .handle_input(&InputEvent::from_pointer_up(x, y, mods));
        signals_json(&signals)
    }

    // ─── Keyboard Shortcut API ───────────────────────────────────────────

    /// Handle a keyboard event. Returns a JSON string:
    /// `{"changed":bool, "action":"<action_name>", "tool":"<tool_name>"}`,
    /// plus `"selection"` when the key changed it (see [`signals_json`]).
    ///
    /// `"export"` is reported but not acted on; the page calls
    /// `export_json` and saves the file itself.
    pub fn handle_key(
        &mut self,
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
    ) -> String {
        let before = self.designer.elements().len();
        let (action, signals) = self
            .designer
            .handle_key(key, modifiers(shift, ctrl, alt, meta));
        let mut reply = signals_reply(&signals);
        let changed = self.designer.elements().len() != before;
        reply.insert("changed".into(), Value::Bool(changed));
        reply.insert(
            "action".into(),
            Value::from(action.map_or("none", |a| a.name())),
        );
        reply.insert("tool".into(), Value::from(self.designer.tool().name()));
        Value::Object(reply).to_string()
    }

    // ─── Element form ────────────────────────────────────────────────────

    /// "Add Element". `color` is a scheme name or hex; empty means default.
    /// Returns `{"ok":true,"id":"element-<n>"}` or `{"ok":false,"error":"..."}`.
    #[allow(clippy::too_many_arguments)]
    pub fn add_element(
        &mut self,
        kind: &str,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        text: &str,
        options_text: &str,
        color: &str,
    ) -> String {
        let draft = match form_draft(kind, text, options_text, color) {
            Ok(draft) => draft.at(x, y).sized(width, height),
            Err(e) => return error_json(e),
        };
        let id = self.designer.add_element(draft);
        json!({ "ok": true, "id": id.to_string() }).to_string()
    }

    /// Arm click-to-place for `kind`; the next click on empty canvas drops
    /// it there. Returns `false` for an unknown kind.
    pub fn arm(&mut self, kind: &str, text: &str, options_text: &str, color: &str) -> bool {
        match form_draft(kind, text, options_text, color) {
            Ok(draft) => {
                self.designer.arm(draft);
                true
            }
            Err(e) => {
                log::warn!("arm: {e}");
                false
            }
        }
    }

    pub fn disarm(&mut self) {
        self.designer.disarm();
    }

    /// Apply a JSON patch from the property form:
    /// `{"x","y","width","height","text","options","color"}`, all optional.
    /// Returns the updated record, or `{"ok":false,"error":"..."}`.
    pub fn update_element(&mut self, id: &str, patch_json: &str) -> String {
        let id: ElementId = match id.parse() {
            Ok(id) => id,
            Err(e) => return error_json(e),
        };
        let Some(current) = self.designer.store().get(id).map(|el| el.bounds) else {
            return error_json(format!("{id}: no such element"));
        };
        let patch = match serde_json::from_str::<FormPatch>(patch_json)
            .map_err(|e| e.to_string())
            .and_then(|p| p.into_patch(current).map_err(|e| e.to_string()))
        {
            Ok(patch) => patch,
            Err(e) => return error_json(e),
        };
        match self.designer.update_element(id, patch) {
            Ok(el) => json!({ "ok": true, "element": ElementRecord::from_element(el) }).to_string(),
            Err(e) => error_json(e),
        }
    }

    pub fn remove_element(&mut self, id: &str) -> bool {
        id.parse::<ElementId>()
            .ok()
            .and_then(|id| self.designer.remove_element(id))
            .is_some()
    }

    /// Delete the selected element. Returns true if one was deleted.
    pub fn delete_selected(&mut self) -> bool {
        self.designer.delete_selected().is_some()
    }

    /// "Clear Canvas".
    pub fn clear(&mut self) {
        self.designer.clear();
    }

    /// Select an element by id (e.g. from a list in the form). Empty clears.
    pub fn select(&mut self, id: &str) -> String {
        let id = id.parse::<ElementId>().ok();
        signals_json(&self.designer.select(id))
    }

    /// Currently selected element id, or empty string.
    pub fn get_selected_id(&self) -> String {
        self.designer
            .selection()
            .map(|id| id.to_string())
            .unwrap_or_default()
    }

    /// All elements as a JSON array of export records.
    pub fn get_elements_json(&self) -> String {
        let records: Vec<ElementRecord> = self
            .designer
            .elements()
            .iter()
            .map(ElementRecord::from_element)
            .collect();
        serde_json::to_string(&records).unwrap_or_else(|_| "[]".to_string())
    }

    // ─── Document ────────────────────────────────────────────────────────

    /// The design document (pretty JSON), for "Export".
    pub fn export_json(&self) -> String {
        match self.designer.export_json() {
            Ok(json) => json,
            Err(e) => error_json(e),
        }
    }

    /// Replace the design with an exported document.
    /// Returns `{"ok":true,"imported":n,"skipped":[{"index":i,"error":"..."}]}`.
    pub fn import_json(&mut self, json: &str) -> String {
        match self.designer.import_json(json) {
            Ok(report) => json!({
                "ok": true,
                "imported": report.imported.len(),
                "skipped": skipped_json(&report.skipped),
            })
            .to_string(),
            Err(e) => error_json(e),
        }
    }
}

// ─── Form helpers ────────────────────────────────────────────────────────

fn modifiers(shift: bool, ctrl: bool, alt: bool, meta: bool) -> Modifiers {
    Modifiers {
        shift,
        ctrl,
        alt,
        meta,
    }
}

fn form_draft(
    kind: &str,
    text: &str,
    options_text: &str,
    color: &str,
) -> Result<ElementDraft, pd_core::ElementError> {
    let kind: ElementKind = kind.parse()?;
    let mut draft = ElementDraft::new(kind);
    if !text.is_empty() {
        draft = draft.with_text(text);
    }
    if !options_text.is_empty() {
        draft = draft.with_options_text(options_text);
    }
    if !color.is_empty() {
        draft = draft.with_color(ColorChoice::parse(color)?);
    }
    Ok(draft)
}

/// Property-form edit as the page sends it.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FormPatch {
    x: Option<f64>,
    y: Option<f64>,
    width: Option<f64>,
    height: Option<f64>,
    text: Option<String>,
    options: Option<Vec<String>>,
    color: Option<String>,
}

impl FormPatch {
    fn into_patch(self, current: Bounds) -> Result<ElementPatch, pd_core::ElementError> {
        let moved = self.x.is_some() || self.y.is_some();
        let sized = self.width.is_some() || self.height.is_some();
        let bounds = (moved || sized).then(|| {
            Bounds::new(
                self.x.unwrap_or(current.x),
                self.y.unwrap_or(current.y),
                self.width.unwrap_or(current.width),
                self.height.unwrap_or(current.height),
            )
        });
        let color = self.color.as_deref().map(ColorChoice::parse).transpose()?;
        Ok(ElementPatch {
            bounds,
            text: self.text,
            options: self.options,
            color,
        })
    }
}

// ─── JSON replies ────────────────────────────────────────────────────────

/// Fold session signals into one reply:
/// `{"changed":bool,"cursor":css|null,"selection":id|null|absent,"commits":[...]}`.
///
/// `selection` is only present when it changed; `null` then means cleared.
fn signals_json(signals: &[Signal]) -> String {
    Value::Object(signals_reply(signals)).to_string()
}

fn signals_reply(signals: &[Signal]) -> serde_json::Map<String, Value> {
    let mut reply = serde_json::Map::new();
    let mut commits = Vec::new();
    let mut skipped = Vec::new();
    let mut cursor = Value::Null;
    for signal in signals {
        match signal {
            Signal::Commit(update) => commits.push(json!({
                "id": update.id.to_string(),
                "x": update.bounds.x,
                "y": update.bounds.y,
                "width": update.bounds.width,
                "height": update.bounds.height,
            })),
            Signal::Selection(id) => {
                let id = id.map_or(Value::Null, |id| Value::String(id.to_string()));
                reply.insert("selection".into(), id);
            }
            Signal::Cursor(c) => cursor = Value::String(c.css().to_string()),
            Signal::Skipped(s) => skipped.push(json!({
                "index": s.index,
                "id": s.id.to_string(),
                "error": s.reason.to_string(),
            })),
            Signal::Frame(_) => {}
        }
    }
    reply.insert("changed".into(), Value::Bool(!commits.is_empty()));
    reply.insert("cursor".into(), cursor);
    reply.insert("commits".into(), Value::Array(commits));
    if !skipped.is_empty() {
        reply.insert("skipped".into(), Value::Array(skipped));
    }
    reply
}

fn skipped_json(skipped: &[(usize, pd_core::ElementError)]) -> Value {
    skipped
        .iter()
        .map(|(index, reason)| json!({ "index": index, "error": reason.to_string() }))
        .collect()
}

fn error_json(e: impl std::fmt::Display) -> String {
    json!({ "ok": false, "error": e.to_string() }).to_string()
}

/// Set up a panic hook that logs to the browser console.
fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("PD WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

// ─── Standalone validation (no canvas needed) ────────────────────────────

/// Check an exported document without loading it.
/// Returns `{"ok":true,"valid":n,"skipped":[...]}` or `{"ok":false,"error":"..."}`.
#[wasm_bindgen]
pub fn validate_document(json: &str) -> String {
    match DesignDocument::from_json(json) {
        Ok(doc) => {
            let report = doc.import_into(&mut ElementStore::new());
            json!({
                "ok": true,
                "valid": report.imported.len(),
                "skipped": skipped_json(&report.skipped),
            })
            .to_string()
        }
        Err(e) => error_json(e),
    }
}
