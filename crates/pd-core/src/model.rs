//! Element data model for Prompt Designer documents.
//!
//! A design is a flat, ordered list of `Element` records: rectangular
//! placeholders for UI widgets in document coordinates (origin top-left,
//! y growing downward). Elements are immutable snapshots exchanged between
//! the form layer, the store, and the canvas engine. Geometry produced by
//! direct manipulation comes back as a `GeometryUpdate`.

use crate::error::ElementError;
use crate::id::ElementId;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

/// Smallest width or height an element may have, in document units.
pub const MIN_ELEMENT_SIZE: f64 = 50.0;

// ─── Colors ──────────────────────────────────────────────────────────────

/// RGBA color. Stored as 4 × f32 [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Helper to parse a single hex digit.
fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const WHITE: Color = Color::rgb8(0xFF, 0xFF, 0xFF);
    pub const BLACK: Color = Color::rgb8(0x00, 0x00, 0x00);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from 8-bit channels.
    pub const fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
    }

    /// Parse a hex color string: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`.
    /// The string may optionally start with `#`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let digits = hex
            .bytes()
            .map(hex_val)
            .collect::<Option<SmallVec<[u8; 8]>>>()?;

        let channel = |i: usize| -> f32 {
            match digits.len() {
                3 | 4 => f32::from(digits[i] * 17) / 255.0,
                _ => f32::from(digits[2 * i] << 4 | digits[2 * i + 1]) / 255.0,
            }
        };

        match digits.len() {
            3 | 6 => Some(Self::rgba(channel(0), channel(1), channel(2), 1.0)),
            4 | 8 => Some(Self::rgba(channel(0), channel(1), channel(2), channel(3))),
            _ => None,
        }
    }

    /// 8-bit channels, rounded.
    pub fn to_rgba8(&self) -> [u8; 4] {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    /// Emit as shortest valid hex string (`#RRGGBB` when opaque).
    pub fn to_hex(&self) -> String {
        let [r, g, b, a] = self.to_rgba8();
        if a == 255 {
            format!("#{r:02X}{g:02X}{b:02X}")
        } else {
            format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
        }
    }
}

// ─── Element kinds ───────────────────────────────────────────────────────

/// The placeholder widget types a user can place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    Window,
    Sidebar,
    Button,
    #[serde(rename = "Text Input")]
    TextInput,
    Dropdown,
    #[serde(rename = "Select Box")]
    SelectBox,
}

impl ElementKind {
    pub const ALL: [ElementKind; 6] = [
        ElementKind::Window,
        ElementKind::Sidebar,
        ElementKind::Button,
        ElementKind::TextInput,
        ElementKind::Dropdown,
        ElementKind::SelectBox,
    ];

    /// Name used in the exported document and on captions.
    pub fn display_name(self) -> &'static str {
        match self {
            ElementKind::Window => "Window",
            ElementKind::Sidebar => "Sidebar",
            ElementKind::Button => "Button",
            ElementKind::TextInput => "Text Input",
            ElementKind::Dropdown => "Dropdown",
            ElementKind::SelectBox => "Select Box",
        }
    }

    /// Whether the `text` field is meaningful for this kind.
    pub fn supports_label(self) -> bool {
        matches!(self, ElementKind::Button | ElementKind::TextInput)
    }

    /// Whether the `options` field is meaningful for this kind.
    pub fn supports_options(self) -> bool {
        matches!(self, ElementKind::Dropdown)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ElementKind {
    type Err = ElementError;

    /// Accepts display names (`"Text Input"`) as well as compact forms
    /// (`"text_input"`, `"textinput"`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "window" => Ok(ElementKind::Window),
            "sidebar" => Ok(ElementKind::Sidebar),
            "button" => Ok(ElementKind::Button),
            "textinput" | "input" => Ok(ElementKind::TextInput),
            "dropdown" => Ok(ElementKind::Dropdown),
            "selectbox" | "select" => Ok(ElementKind::SelectBox),
            _ => Err(ElementError::UnknownKind(s.to_string())),
        }
    }
}

// ─── Color schemes ───────────────────────────────────────────────────────

/// A named palette assigning a fill to every element kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorScheme {
    #[default]
    Default,
    Ocean,
    Forest,
    Sunset,
    Monochrome,
}

impl ColorScheme {
    pub const ALL: [ColorScheme; 5] = [
        ColorScheme::Default,
        ColorScheme::Ocean,
        ColorScheme::Forest,
        ColorScheme::Sunset,
        ColorScheme::Monochrome,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ColorScheme::Default => "Default",
            ColorScheme::Ocean => "Ocean",
            ColorScheme::Forest => "Forest",
            ColorScheme::Sunset => "Sunset",
            ColorScheme::Monochrome => "Monochrome",
        }
    }

    /// Case-insensitive lookup by name.
    pub fn by_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Fill for `kind` under this scheme.
    pub fn fill(self, kind: ElementKind) -> Color {
        // Window, Sidebar, Button, Text Input, Dropdown, Select Box
        let palette: [Color; 6] = match self {
            ColorScheme::Default => [
                Color::rgb8(0xEC, 0xEF, 0xF1),
                Color::rgb8(0xCF, 0xD8, 0xDC),
                Color::rgb8(0x42, 0xA5, 0xF5),
                Color::rgb8(0xFF, 0xFF, 0xFF),
                Color::rgb8(0xE3, 0xF2, 0xFD),
                Color::rgb8(0xF5, 0xF5, 0xF5),
            ],
            ColorScheme::Ocean => [
                Color::rgb8(0xE0, 0xF7, 0xFA),
                Color::rgb8(0xB2, 0xEB, 0xF2),
                Color::rgb8(0x00, 0x97, 0xA7),
                Color::rgb8(0xF1, 0xFC, 0xFD),
                Color::rgb8(0x80, 0xDE, 0xEA),
                Color::rgb8(0x4D, 0xD0, 0xE1),
            ],
            ColorScheme::Forest => [
                Color::rgb8(0xE8, 0xF5, 0xE9),
                Color::rgb8(0xC8, 0xE6, 0xC9),
                Color::rgb8(0x38, 0x8E, 0x3C),
                Color::rgb8(0xF6, 0xFB, 0xF6),
                Color::rgb8(0xA5, 0xD6, 0xA7),
                Color::rgb8(0x81, 0xC7, 0x84),
            ],
            ColorScheme::Sunset => [
                Color::rgb8(0xFF, 0xF3, 0xE0),
                Color::rgb8(0xFF, 0xE0, 0xB2),
                Color::rgb8(0xF4, 0x51, 0x1E),
                Color::rgb8(0xFF, 0xF8, 0xF1),
                Color::rgb8(0xFF, 0xCC, 0x80),
                Color::rgb8(0xFF, 0xB7, 0x4D),
            ],
            ColorScheme::Monochrome => [
                Color::rgb8(0xFA, 0xFA, 0xFA),
                Color::rgb8(0xE0, 0xE0, 0xE0),
                Color::rgb8(0x42, 0x42, 0x42),
                Color::rgb8(0xFF, 0xFF, 0xFF),
                Color::rgb8(0xEE, 0xEE, 0xEE),
                Color::rgb8(0xBD, 0xBD, 0xBD),
            ],
        };
        let slot = ElementKind::ALL
            .iter()
            .position(|k| *k == kind)
            .unwrap_or_default();
        palette[slot]
    }
}

/// How the form layer picked an element's fill.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ColorChoice {
    Scheme(ColorScheme),
    Explicit(Color),
}

impl Default for ColorChoice {
    fn default() -> Self {
        ColorChoice::Scheme(ColorScheme::Default)
    }
}

impl ColorChoice {
    pub fn resolve(self, kind: ElementKind) -> Color {
        match self {
            ColorChoice::Scheme(scheme) => scheme.fill(kind),
            ColorChoice::Explicit(color) => color,
        }
    }

    /// Parse a form value: a scheme name or a hex color.
    pub fn parse(value: &str) -> Result<Self, ElementError> {
        if let Some(scheme) = ColorScheme::by_name(value) {
            return Ok(ColorChoice::Scheme(scheme));
        }
        Color::from_hex(value)
            .map(ColorChoice::Explicit)
            .ok_or_else(|| ElementError::InvalidColor(value.to_string()))
    }
}

// ─── Geometry ────────────────────────────────────────────────────────────

/// Axis-aligned rectangle in document coordinates (top-left origin, y down).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px <= self.right() && py >= self.y && py <= self.bottom()
    }

    /// Equality within `eps` on every component. Geometry that went through
    /// the world-space transform and back is compared with this.
    pub fn approx_eq(&self, other: &Bounds, eps: f64) -> bool {
        (self.x - other.x).abs() <= eps
            && (self.y - other.y).abs() <= eps
            && (self.width - other.width).abs() <= eps
            && (self.height - other.height).abs() <= eps
    }

    /// Grow width/height up to `min`, keeping the top-left corner.
    pub fn clamped_to_min(self, min: f64) -> Self {
        Self {
            width: self.width.max(min),
            height: self.height.max(min),
            ..self
        }
    }
}

// ─── Elements ────────────────────────────────────────────────────────────

/// A placed design unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub id: ElementId,
    pub kind: ElementKind,
    pub bounds: Bounds,
    /// Label text; only used by Button and Text Input.
    pub text: String,
    /// Dropdown entries, in display order; only used by Dropdown.
    pub options: SmallVec<[String; 4]>,
    pub color: Color,
}

impl Element {
    /// Build an element from a form draft, normalising kind-dependent fields
    /// and raising the size to `min_size`.
    pub fn from_draft(id: ElementId, draft: ElementDraft, min_size: f64) -> Self {
        let kind = draft.kind;
        let mut element = Self {
            id,
            kind,
            bounds: draft.bounds.clamped_to_min(min_size),
            text: draft.text,
            options: draft.options,
            color: draft.color.resolve(kind),
        };
        element.normalize_fields();
        element
    }

    /// Drop `text`/`options` that do not apply to this element's kind.
    pub fn normalize_fields(&mut self) {
        if !self.kind.supports_label() {
            self.text.clear();
        }
        if !self.kind.supports_options() {
            self.options.clear();
        }
    }

    /// Check that the record can safely become a shape.
    ///
    /// # Errors
    /// `NonFinite` for NaN/infinite coordinates, `NonPositiveSize` for a
    /// zero or negative width/height.
    pub fn validate(&self) -> Result<(), ElementError> {
        let b = &self.bounds;
        for (field, v) in [
            ("x", b.x),
            ("y", b.y),
            ("width", b.width),
            ("height", b.height),
        ] {
            if !v.is_finite() {
                return Err(ElementError::NonFinite { id: self.id, field });
            }
        }
        if b.width <= 0.0 || b.height <= 0.0 {
            return Err(ElementError::NonPositiveSize {
                id: self.id,
                width: b.width,
                height: b.height,
            });
        }
        Ok(())
    }

    /// Caption shown on the canvas for this element.
    pub fn caption(&self) -> &'static str {
        self.kind.display_name()
    }
}

/// What the property form produces when the user clicks "Add Element".
#[derive(Debug, Clone, PartialEq)]
pub struct ElementDraft {
    pub kind: ElementKind,
    pub bounds: Bounds,
    pub text: String,
    pub options: SmallVec<[String; 4]>,
    pub color: ColorChoice,
}

impl ElementDraft {
    /// A draft with the form's defaults: at (100, 100), 200×200,
    /// `"New <Kind>"` label, three placeholder options, default scheme.
    pub fn new(kind: ElementKind) -> Self {
        let text = if kind.supports_label() {
            format!("New {kind}")
        } else {
            String::new()
        };
        let options = if kind.supports_options() {
            ["Option 1", "Option 2", "Option 3"]
                .into_iter()
                .map(String::from)
                .collect()
        } else {
            SmallVec::new()
        };
        Self {
            kind,
            bounds: Bounds::new(100.0, 100.0, 200.0, 200.0),
            text,
            options,
            color: ColorChoice::default(),
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.bounds.x = x;
        self.bounds.y = y;
        self
    }

    pub fn sized(mut self, width: f64, height: f64) -> Self {
        self.bounds.width = width;
        self.bounds.height = height;
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    /// Options from a multi-line text area, one per non-blank line.
    pub fn with_options_text(self, text: &str) -> Self {
        let lines: Vec<String> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect();
        self.with_options(lines)
    }

    pub fn with_color(mut self, color: ColorChoice) -> Self {
        self.color = color;
        self
    }
}

/// Final geometry of a drag/resize, flushed back to the store on pointer-up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryUpdate {
    pub id: ElementId,
    pub bounds: Bounds,
}

/// Partial update from the property form. `None` fields are untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementPatch {
    pub bounds: Option<Bounds>,
    pub text: Option<String>,
    pub options: Option<Vec<String>>,
    pub color: Option<ColorChoice>,
}
