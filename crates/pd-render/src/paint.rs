//! Frame → Vello drawing commands.
//!
//! Replays a `Frame` into a Vello scene: fills and strokes as rounded
//! rects; text is logged only.

use crate::frame::{DrawCmd, Frame};
use kurbo::{Affine, Rect, RoundedRect, Stroke as KurboStroke};
use peniko::{Color, Fill};
use vello::Scene;

/// Paint a frame into a Vello scene.
///
/// Call once per frame with a freshly-cleared `Scene`.
/// The caller presents the scene via wgpu.
pub fn paint_frame(scene: &mut Scene, frame: &Frame) {
    for cmd in &frame.commands {
        match cmd {
            DrawCmd::Clear { color } => {
                let full = Rect::new(0.0, 0.0, frame.width, frame.height);
                scene.fill(Fill::NonZero, Affine::IDENTITY, to_peniko(*color), None, &full);
            }
            DrawCmd::FillRect {
                rect,
                color,
                radius,
            } => {
                let shape: RoundedRect = rect.to_rounded_rect(*radius);
                scene.fill(Fill::NonZero, Affine::IDENTITY, to_peniko(*color), None, &shape);
            }
            DrawCmd::StrokeRect {
                rect,
                color,
                width,
                radius,
            } => {
                let shape: RoundedRect = rect.to_rounded_rect(*radius);
                let stroke = KurboStroke::new(*width);
                scene.stroke(&stroke, Affine::IDENTITY, to_peniko(*color), None, &shape);
            }
            DrawCmd::Text { text, origin, .. } => {
                log::trace!("TEXT {:?} at ({}, {})", text, origin.x, origin.y);
                // Glyph runs need a font context; the Canvas2D backend draws text.
            }
        }
    }
}

fn to_peniko(c: pd_core::Color) -> Color {
    let [r, g, b, a] = c.to_rgba8();
    Color::from_rgba8(r, g, b, a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{Camera, Viewport};
    use crate::frame::{RenderStyle, Renderer};
    use crate::scene::{Scene as ShapeScene, Shape};
    use pd_core::{Element, ElementDraft, ElementId, ElementKind, MIN_ELEMENT_SIZE};

    #[test]
    fn paints_without_gpu() {
        let camera = Camera::orthographic(Viewport::default());
        let el = Element::from_draft(
            ElementId::from_raw(0),
            ElementDraft::new(ElementKind::Dropdown),
            MIN_ELEMENT_SIZE,
        );
        let mut shapes = ShapeScene::new();
        shapes.push(Shape::from_element(&el, &camera, 10.0));
        let frame = Renderer::new(camera, RenderStyle::default()).render(&shapes, Some(el.id), None);

        let mut scene = Scene::new();
        paint_frame(&mut scene, &frame);
        assert_eq!(to_peniko(pd_core::Color::WHITE).components, [1.0; 4]);
    }
}
