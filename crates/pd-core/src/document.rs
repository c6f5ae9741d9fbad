//! The exported design document.
//!
//! ```json
//! {
//!   "canvas": { "width": 1000, "height": 600 },
//!   "elements": [
//!     { "id": "element-0", "type": "Button", "x": 100, "y": 100,
//!       "width": 200, "height": 80, "text": "OK", "options": [],
//!       "color": "#42A5F5" }
//!   ]
//! }
//! ```
//!
//! Import is lenient per record: a record with a missing field or a bad
//! value is reported and skipped, the rest of the document still loads.

use crate::error::{DocumentError, ElementError};
use crate::id::ElementId;
use crate::model::*;
use crate::store::ElementStore;
use serde::{Deserialize, Serialize};

/// Canvas dimensions recorded in the document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

/// One element as it appears in the JSON document.
///
/// Every field is optional on input so that a single malformed record can
/// be reported instead of failing the whole document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementRecord {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl ElementRecord {
    pub fn from_element(element: &Element) -> Self {
        Self {
            id: Some(element.id.to_string()),
            kind: Some(element.kind.display_name().to_string()),
            x: Some(element.bounds.x),
            y: Some(element.bounds.y),
            width: Some(element.bounds.width),
            height: Some(element.bounds.height),
            text: element.text.clone(),
            options: element.options.to_vec(),
            color: Some(element.color.to_hex()),
        }
    }

    /// Convert back into an element.
    ///
    /// # Errors
    /// `MissingField` for absent id/type/geometry, `InvalidId`,
    /// `UnknownKind`, `InvalidColor`, or the element's validation error.
    pub fn into_element(self) -> Result<Element, ElementError> {
        let id: ElementId = self.id.ok_or(ElementError::MissingField("id"))?.parse()?;
        let kind: ElementKind = self.kind.ok_or(ElementError::MissingField("type"))?.parse()?;
        let bounds = Bounds::new(
            self.x.ok_or(ElementError::MissingField("x"))?,
            self.y.ok_or(ElementError::MissingField("y"))?,
            self.width.ok_or(ElementError::MissingField("width"))?,
            self.height.ok_or(ElementError::MissingField("height"))?,
        );
        let color = match self.color {
            Some(hex) => Color::from_hex(&hex).ok_or(ElementError::InvalidColor(hex))?,
            None => ColorScheme::Default.fill(kind),
        };
        let mut element = Element {
            id,
            kind,
            bounds,
            text: self.text,
            options: self.options.into_iter().collect(),
            color,
        };
        element.normalize_fields();
        element.validate()?;
        Ok(element)
    }
}

/// The whole exported design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignDocument {
    pub canvas: CanvasSize,
    pub elements: Vec<ElementRecord>,
}

/// Outcome of loading a document into a store.
#[derive(Debug, Default)]
pub struct ImportReport {
    pub imported: Vec<ElementId>,
    /// `(record index, reason)` for every record that was not loaded.
    pub skipped: Vec<(usize, ElementError)>,
}

impl DesignDocument {
    pub fn from_elements(canvas: CanvasSize, elements: &[Element]) -> Self {
        Self {
            canvas,
            elements: elements.iter().map(ElementRecord::from_element).collect(),
        }
    }

    pub fn from_store(canvas: CanvasSize, store: &ElementStore) -> Self {
        Self::from_elements(canvas, store.elements())
    }

    /// Pretty-printed JSON (two-space indent).
    ///
    /// # Errors
    /// Only if serialization itself fails.
    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// # Errors
    /// `Json` when the text is not a design document at all.
    pub fn from_json(text: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Append every valid record to `store`, reporting the rest.
    pub fn import_into(self, store: &mut ElementStore) -> ImportReport {
        let mut report = ImportReport::default();
        for (index, record) in self.elements.into_iter().enumerate() {
            match record.into_element().and_then(|el| store.insert(el)) {
                Ok(id) => report.imported.push(id),
                Err(reason) => {
                    log::warn!("import: skipping record {index}: {reason}");
                    report.skipped.push((index, reason));
                }
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn record_field_names_match_export_format() {
        let mut store = ElementStore::new();
        store.add(
            ElementDraft::new(ElementKind::Button)
                .at(100.0, 100.0)
                .sized(200.0, 80.0)
                .with_text("OK"),
        );
        let doc = DesignDocument::from_store(
            CanvasSize {
                width: 1000.0,
                height: 600.0,
            },
            &store,
        );
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "canvas": { "width": 1000.0, "height": 600.0 },
                "elements": [{
                    "id": "element-0",
                    "type": "Button",
                    "x": 100.0,
                    "y": 100.0,
                    "width": 200.0,
                    "height": 80.0,
                    "text": "OK",
                    "options": [],
                    "color": "#42A5F5"
                }]
            })
        );
    }

    #[test]
    fn missing_field_is_reported() {
        let record = ElementRecord {
            id: Some("element-3".into()),
            kind: Some("Button".into()),
            x: Some(0.0),
            y: None,
            width: Some(60.0),
            height: Some(60.0),
            ..Default::default()
        };
        assert_eq!(
            record.into_element().unwrap_err(),
            ElementError::MissingField("y")
        );
    }

    #[test]
    fn color_defaults_to_scheme_when_absent() {
        let record = ElementRecord {
            id: Some("element-0".into()),
            kind: Some("Sidebar".into()),
            x: Some(0.0),
            y: Some(0.0),
            width: Some(200.0),
            height: Some(600.0),
            ..Default::default()
        };
        let el = record.into_element().unwrap();
        assert_eq!(el.color, ColorScheme::Default.fill(ElementKind::Sidebar));
    }

    #[test]
    fn not_a_document() {
        assert!(matches!(
            DesignDocument::from_json("[1, 2, 3]"),
            Err(DocumentError::Json(_))
        ));
    }
}
