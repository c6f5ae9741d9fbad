//! Scene → backend-neutral frame.
//!
//! The renderer flattens the scene into a list of screen-space draw
//! commands. Backends (Vello in `paint`, Canvas2D in the wasm crate) only
//! have to know how to clear, fill, stroke, and place text.

use crate::camera::Camera;
use crate::scene::{Scene, Shape};
use kurbo::{Point, Rect};
use pd_core::{CanvasConfig, Color, ElementId, ElementKind};

/// Horizontal text anchoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

/// One drawing operation, in screen pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Clear {
        color: Color,
    },
    FillRect {
        rect: Rect,
        color: Color,
        radius: f64,
    },
    StrokeRect {
        rect: Rect,
        color: Color,
        width: f64,
        radius: f64,
    },
    /// `origin` is the baseline start (`Left`) or baseline middle (`Center`).
    Text {
        text: String,
        origin: Point,
        size: f64,
        color: Color,
        align: TextAlign,
    },
}

/// A complete frame, ready for any backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub width: f64,
    pub height: f64,
    pub commands: Vec<DrawCmd>,
}

impl Frame {
    /// Text commands only; handy for backends without a font stack.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCmd::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

// ─── Theme ───────────────────────────────────────────────────────────────────

/// Colors and sizes used for chrome around the element fills.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderStyle {
    pub background: Color,
    pub border: Color,
    pub handle: Color,
    pub selection: Color,
    pub text: Color,
    pub muted_text: Color,
    pub caption_size: f64,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self::from_config(&CanvasConfig::default())
    }
}

impl RenderStyle {
    pub fn from_config(config: &CanvasConfig) -> Self {
        Self {
            background: config.background,
            border: config.border_color,
            handle: config.handle_color,
            selection: config.selection_color,
            text: Color::rgb8(0x21, 0x21, 0x21),
            muted_text: Color::rgb8(0x9E, 0x9E, 0x9E),
            caption_size: config.caption_size,
        }
    }
}

const CORNER_RADIUS: f64 = 4.0;
const INNER_PADDING: f64 = 8.0;
const TITLE_BAR_HEIGHT: f64 = 24.0;

// ─── Renderer ────────────────────────────────────────────────────────────────

/// Turns a `Scene` into a `Frame`.
#[derive(Debug, Clone)]
pub struct Renderer {
    camera: Camera,
    style: RenderStyle,
}

impl Renderer {
    pub fn new(camera: Camera, style: RenderStyle) -> Self {
        Self { camera, style }
    }

    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
    }

    pub fn set_background(&mut self, color: Color) {
        self.style.background = color;
    }

    pub fn style(&self) -> &RenderStyle {
        &self.style
    }

    /// Draw the scene back-to-front. The hovered shape gets a faint outline,
    /// the selected shape a strong one. Every shape's handles go on a final
    /// layer above all shapes, in paint order, matching what hit testing
    /// can grab.
    pub fn render(
        &self,
        scene: &Scene,
        selected: Option<ElementId>,
        hovered: Option<ElementId>,
    ) -> Frame {
        let vp = self.camera.viewport();
        let mut cmds = vec![DrawCmd::Clear {
            color: self.style.background,
        }];

        for shape in scene.shapes() {
            self.draw_shape(shape, &mut cmds);
        }

        if let Some(shape) = hovered
            .filter(|h| Some(*h) != selected)
            .and_then(|id| scene.get(id))
        {
            cmds.push(DrawCmd::StrokeRect {
                rect: self
                    .camera
                    .world_rect_to_screen(shape.center(), shape.size()),
                color: self.style.handle,
                width: 1.0,
                radius: CORNER_RADIUS,
            });
        }

        if let Some(shape) = selected.and_then(|id| scene.get(id)) {
            cmds.push(DrawCmd::StrokeRect {
                rect: self
                    .camera
                    .world_rect_to_screen(shape.center(), shape.size()),
                color: self.style.selection,
                width: 2.0,
                radius: CORNER_RADIUS,
            });
        }

        for shape in scene.shapes() {
            self.draw_handles(shape, selected == Some(shape.id), &mut cmds);
        }

        log::trace!("render: {} shape(s), {} command(s)", scene.len(), cmds.len());
        Frame {
            width: vp.width,
            height: vp.height,
            commands: cmds,
        }
    }

    fn draw_shape(&self, shape: &Shape, cmds: &mut Vec<DrawCmd>) {
        let rect = self
            .camera
            .world_rect_to_screen(shape.center(), shape.size());
        cmds.push(DrawCmd::FillRect {
            rect,
            color: shape.color,
            radius: CORNER_RADIUS,
        });
        cmds.push(DrawCmd::StrokeRect {
            rect,
            color: self.style.border,
            width: 1.0,
            radius: CORNER_RADIUS,
        });

        self.draw_detail(shape, rect, cmds);

        let anchor = self.camera.world_to_screen(shape.caption().anchor);
        cmds.push(DrawCmd::Text {
            text: shape.caption().text.clone(),
            origin: Point::new(anchor.x, anchor.y + self.style.caption_size),
            size: self.style.caption_size,
            color: self.style.muted_text,
            align: TextAlign::Left,
        });
    }

    /// Kind-specific placeholder detail inside the shape.
    fn draw_detail(&self, shape: &Shape, rect: Rect, cmds: &mut Vec<DrawCmd>) {
        let size = self.style.caption_size;
        let inner = rect.inset(-INNER_PADDING);
        let baseline = |r: Rect| r.center().y + size * 0.35;

        match shape.kind {
            ElementKind::Window => {
                let bar = Rect::new(
                    rect.x0,
                    rect.y0,
                    rect.x1,
                    rect.y0 + TITLE_BAR_HEIGHT.min(rect.height() / 4.0),
                );
                cmds.push(DrawCmd::FillRect {
                    rect: bar,
                    color: shade(shape.color, 0.9),
                    radius: 0.0,
                });
            }
            ElementKind::Sidebar => {
                let stripe = Rect::new(rect.x1 - 3.0, rect.y0, rect.x1, rect.y1);
                cmds.push(DrawCmd::FillRect {
                    rect: stripe,
                    color: shade(shape.color, 0.85),
                    radius: 0.0,
                });
            }
            ElementKind::Button => {
                let face = centered_strip(inner, size * 2.4);
                cmds.push(DrawCmd::FillRect {
                    rect: face,
                    color: shade(shape.color, 0.85),
                    radius: CORNER_RADIUS,
                });
                cmds.push(DrawCmd::Text {
                    text: shape.text.clone(),
                    origin: Point::new(face.center().x, baseline(face)),
                    size,
                    color: Color::WHITE,
                    align: TextAlign::Center,
                });
            }
            ElementKind::TextInput => {
                let field = centered_strip(inner, size * 2.2);
                self.boxed_field(field, cmds);
                cmds.push(DrawCmd::Text {
                    text: shape.text.clone(),
                    origin: Point::new(field.x0 + INNER_PADDING, baseline(field)),
                    size,
                    color: self.style.muted_text,
                    align: TextAlign::Left,
                });
            }
            ElementKind::Dropdown => {
                let field = centered_strip(inner, size * 2.2);
                self.boxed_field(field, cmds);
                if let Some(first) = shape.options.first() {
                    cmds.push(DrawCmd::Text {
                        text: first.clone(),
                        origin: Point::new(field.x0 + INNER_PADDING, baseline(field)),
                        size,
                        color: self.style.text,
                        align: TextAlign::Left,
                    });
                }
                self.chevron(field, cmds);
            }
            ElementKind::SelectBox => {
                let field = centered_strip(inner, size * 2.2);
                self.boxed_field(field, cmds);
                self.chevron(field, cmds);
            }
        }
    }

    fn boxed_field(&self, field: Rect, cmds: &mut Vec<DrawCmd>) {
        cmds.push(DrawCmd::FillRect {
            rect: field,
            color: Color::WHITE,
            radius: 2.0,
        });
        cmds.push(DrawCmd::StrokeRect {
            rect: field,
            color: self.style.border,
            width: 1.0,
            radius: 2.0,
        });
    }

    fn chevron(&self, field: Rect, cmds: &mut Vec<DrawCmd>) {
        let size = self.style.caption_size;
        cmds.push(DrawCmd::Text {
            text: "▾".to_string(),
            origin: Point::new(field.x1 - INNER_PADDING - size / 2.0, field.center().y + size * 0.35),
            size,
            color: self.style.text,
            align: TextAlign::Center,
        });
    }

    fn draw_handles(&self, shape: &Shape, selected: bool, cmds: &mut Vec<DrawCmd>) {
        let edge = if selected {
            self.style.selection
        } else {
            self.style.border
        };
        for handle in shape.handles() {
            let r = self
                .camera
                .world_rect_to_screen(handle.center, (handle.size, handle.size).into());
            cmds.push(DrawCmd::FillRect {
                rect: r,
                color: self.style.handle,
                radius: 0.0,
            });
            cmds.push(DrawCmd::StrokeRect {
                rect: r,
                color: edge,
                width: 1.0,
                radius: 0.0,
            });
        }
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// A horizontally full, vertically centered strip of at most `height`.
fn centered_strip(r: Rect, height: f64) -> Rect {
    let h = height.min(r.height().max(0.0));
    let cy = r.center().y;
    Rect::new(r.x0, cy - h / 2.0, r.x1.max(r.x0), cy + h / 2.0)
}

/// Darken (factor < 1) a color, keeping alpha.
fn shade(c: Color, factor: f32) -> Color {
    Color::rgba(c.r * factor, c.g * factor, c.b * factor, c.a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Viewport;
    use pd_core::{Element, ElementDraft, MIN_ELEMENT_SIZE};

    fn setup(kind: ElementKind, draft: impl FnOnce(ElementDraft) -> ElementDraft) -> (Scene, Renderer) {
        let camera = Camera::orthographic(Viewport::new(1000.0, 600.0));
        let el = Element::from_draft(
            ElementId::from_raw(0),
            draft(ElementDraft::new(kind).at(100.0, 100.0).sized(200.0, 80.0)),
            MIN_ELEMENT_SIZE,
        );
        let mut scene = Scene::new();
        scene.push(Shape::from_element(&el, &camera, 10.0));
        (scene, Renderer::new(camera, RenderStyle::default()))
    }

    #[test]
    fn frame_starts_with_clear() {
        let (scene, renderer) = setup(ElementKind::Window, |d| d);
        let frame = renderer.render(&scene, None, None);
        assert_eq!(frame.width, 1000.0);
        assert!(matches!(frame.commands[0], DrawCmd::Clear { color } if color == Color::WHITE));
    }

    #[test]
    fn shape_fill_is_in_screen_space() {
        let (scene, renderer) = setup(ElementKind::Window, |d| d);
        let frame = renderer.render(&scene, None, None);
        assert!(matches!(
            frame.commands[1],
            DrawCmd::FillRect { rect, .. } if rect == Rect::new(100.0, 100.0, 300.0, 180.0)
        ));
    }

    #[test]
    fn button_draws_label_and_caption() {
        let (scene, renderer) = setup(ElementKind::Button, |d| d.with_text("Sign in"));
        let frame = renderer.render(&scene, None, None);
        let texts: Vec<&str> = frame.texts().collect();
        assert_eq!(texts, ["Sign in", "Button"]);
    }

    #[test]
    fn dropdown_shows_first_option_and_chevron() {
        let (scene, renderer) = setup(ElementKind::Dropdown, |d| d.with_options(["Small", "Large"]));
        let frame = renderer.render(&scene, None, None);
        let texts: Vec<&str> = frame.texts().collect();
        assert_eq!(texts, ["Small", "▾", "Dropdown"]);
    }

    #[test]
    fn every_shape_draws_its_handles() {
        let (scene, renderer) = setup(ElementKind::Sidebar, |d| d);
        let frame = renderer.render(&scene, None, None);
        let handle_fills = frame
            .commands
            .iter()
            .filter(|c| {
                matches!(c, DrawCmd::FillRect { rect, .. }
                    if rect.width() == 10.0 && rect.height() == 10.0)
            })
            .count();
        assert_eq!(handle_fills, 8);
        // W handle is drawn last, centered on the left edge midpoint
        assert!(matches!(
            frame.commands.last(),
            Some(DrawCmd::StrokeRect { rect, color, .. })
                if *rect == Rect::new(95.0, 135.0, 105.0, 145.0)
                    && *color == renderer.style().border
        ));
    }

    #[test]
    fn selection_adds_outline_and_highlights_handles() {
        let (scene, renderer) = setup(ElementKind::Sidebar, |d| d);
        let plain = renderer.render(&scene, None, None).commands.len();
        let selected = renderer.render(&scene, Some(ElementId::from_raw(0)), None);
        assert_eq!(selected.commands.len(), plain + 1);
        assert!(matches!(
            selected.commands.last(),
            Some(DrawCmd::StrokeRect { color, .. }) if *color == renderer.style().selection
        ));
    }

    #[test]
    fn unknown_selection_is_ignored() {
        let (scene, renderer) = setup(ElementKind::SelectBox, |d| d);
        let a = renderer.render(&scene, None, None);
        let b = renderer.render(&scene, Some(ElementId::from_raw(42)), None);
        assert_eq!(a, b);
    }

    #[test]
    fn hover_outline_only_when_not_selected() {
        let (scene, renderer) = setup(ElementKind::Window, |d| d);
        let id = ElementId::from_raw(0);
        let plain = renderer.render(&scene, None, None).commands.len();
        assert_eq!(renderer.render(&scene, None, Some(id)).commands.len(), plain + 1);
        assert_eq!(
            renderer.render(&scene, Some(id), Some(id)),
            renderer.render(&scene, Some(id), None)
        );
    }
}
