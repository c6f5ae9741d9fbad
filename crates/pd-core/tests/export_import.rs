//! Integration tests: store → design document → JSON → store.
//!
//! Exercises the full `pd-core` pipeline the way the form layer uses it:
//! drafts in, exported JSON out, and a lenient re-import.

use pd_core::*;
use pretty_assertions::assert_eq;

const CANVAS: CanvasSize = CanvasSize {
    width: 1000.0,
    height: 600.0,
};

fn sample_store() -> ElementStore {
    let mut store = ElementStore::new();
    store.add(ElementDraft::new(ElementKind::Window).at(0.0, 0.0).sized(1000.0, 600.0));
    store.add(
        ElementDraft::new(ElementKind::Button)
            .at(100.0, 100.0)
            .sized(200.0, 80.0)
            .with_text("Sign in")
            .with_color(ColorChoice::Scheme(ColorScheme::Ocean)),
    );
    store.add(
        ElementDraft::new(ElementKind::Dropdown)
            .at(400.0, 120.0)
            .with_options_text("Small\nMedium\nLarge"),
    );
    store
}

#[test]
fn export_then_import_preserves_elements() {
    let store = sample_store();
    let json = DesignDocument::from_store(CANVAS, &store).to_json().unwrap();

    let doc = DesignDocument::from_json(&json).unwrap();
    assert_eq!(doc.canvas, CANVAS);

    let mut reloaded = ElementStore::new();
    let report = doc.import_into(&mut reloaded);
    assert!(report.skipped.is_empty(), "{:?}", report.skipped);
    assert_eq!(reloaded.elements(), store.elements());
}

#[test]
fn export_is_pretty_printed() {
    let json = DesignDocument::from_store(CANVAS, &sample_store())
        .to_json()
        .unwrap();
    assert!(json.starts_with("{\n  \"canvas\""), "{json}");
    assert!(json.contains("\"type\": \"Dropdown\""));
    assert!(json.contains("\"Medium\""));
}

#[test]
fn import_skips_bad_records_and_continues_ids() {
    let json = r##"{
      "canvas": { "width": 1000, "height": 600 },
      "elements": [
        { "id": "element-4", "type": "Button", "x": 10, "y": 10, "width": 120, "height": 60, "text": "Go", "options": [] },
        { "id": "element-5", "type": "Slider", "x": 10, "y": 10, "width": 120, "height": 60 },
        { "id": "element-6", "type": "Window", "x": 10, "width": 120, "height": 60 },
        { "id": "element-7", "type": "Window", "x": 0, "y": 0, "width": 300, "height": 200, "color": "#zzzzzz" },
        { "id": "element-4", "type": "Sidebar", "x": 0, "y": 0, "width": 200, "height": 600 }
      ]
    }"##;
    let mut store = ElementStore::new();
    let report = DesignDocument::from_json(json).unwrap().import_into(&mut store);

    assert_eq!(report.imported, vec![ElementId::from_raw(4)]);
    let reasons: Vec<(usize, ElementError)> = report.skipped;
    assert_eq!(
        reasons,
        vec![
            (1, ElementError::UnknownKind("Slider".into())),
            (2, ElementError::MissingField("y")),
            (3, ElementError::InvalidColor("#zzzzzz".into())),
            (4, ElementError::DuplicateId(ElementId::from_raw(4))),
        ]
    );

    // New elements continue after the largest imported id
    let next = store.add(ElementDraft::new(ElementKind::SelectBox));
    assert_eq!(next.to_string(), "element-5");
}

#[test]
fn original_export_without_colors_loads() {
    // Documents written before colors existed have no "color" key
    let json = r#"{
      "canvas": { "width": 1000, "height": 600 },
      "elements": [
        { "id": "element-0", "type": "Text Input", "x": 100, "y": 100, "width": 200, "height": 200, "text": "New Text Input", "options": [] }
      ]
    }"#;
    let mut store = ElementStore::new();
    let report = DesignDocument::from_json(json).unwrap().import_into(&mut store);
    assert_eq!(report.imported.len(), 1);
    let el = &store.elements()[0];
    assert_eq!(el.kind, ElementKind::TextInput);
    assert_eq!(el.text, "New Text Input");
    assert_eq!(el.color, ColorScheme::Default.fill(ElementKind::TextInput));
}
