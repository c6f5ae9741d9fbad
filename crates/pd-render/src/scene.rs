//! The live shape scene: one world-space `Shape` per element.
//!
//! Shapes carry their own resize handles and caption so that every
//! decoration moves with the shape through a single geometry setter.
//! During a drag or resize a shape's geometry is ahead of the store;
//! the `dirty` flag marks that state until the store catches up.

use crate::camera::Camera;
use kurbo::{Point, Rect, Size, Vec2};
use pd_core::{Bounds, Color, Element, ElementId, ElementKind};
use std::collections::HashMap;

// ─── Handles ─────────────────────────────────────────────────────────────────

/// One of the eight resize grips around a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    Nw,
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
}

impl HandleKind {
    pub const ALL: [HandleKind; 8] = [
        HandleKind::Nw,
        HandleKind::N,
        HandleKind::Ne,
        HandleKind::E,
        HandleKind::Se,
        HandleKind::S,
        HandleKind::Sw,
        HandleKind::W,
    ];

    /// World-space direction `(x, y)` with y up; each component is −1, 0 or 1.
    ///
    /// A zero component means the handle leaves that axis alone.
    pub fn direction(self) -> (f64, f64) {
        match self {
            HandleKind::Nw => (-1.0, 1.0),
            HandleKind::N => (0.0, 1.0),
            HandleKind::Ne => (1.0, 1.0),
            HandleKind::E => (1.0, 0.0),
            HandleKind::Se => (1.0, -1.0),
            HandleKind::S => (0.0, -1.0),
            HandleKind::Sw => (-1.0, -1.0),
            HandleKind::W => (-1.0, 0.0),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            HandleKind::Nw => "nw",
            HandleKind::N => "n",
            HandleKind::Ne => "ne",
            HandleKind::E => "e",
            HandleKind::Se => "se",
            HandleKind::S => "s",
            HandleKind::Sw => "sw",
            HandleKind::W => "w",
        }
    }
}

/// A square resize grip, positioned in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    pub kind: HandleKind,
    pub center: Point,
    pub size: f64,
}

impl Handle {
    pub fn rect(&self) -> Rect {
        Rect::from_center_size(self.center, (self.size, self.size))
    }

    /// Inclusive containment test in world space.
    pub fn contains(&self, p: Point) -> bool {
        contains_inclusive(self.rect(), p)
    }
}

/// Label decoration drawn in the shape's top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct Caption {
    pub text: String,
    /// World-space anchor (top-left of the text box).
    pub anchor: Point,
}

/// Caption inset from the shape's top-left corner.
const CAPTION_INSET: f64 = 6.0;

pub(crate) fn contains_inclusive(r: Rect, p: Point) -> bool {
    p.x >= r.x0 && p.x <= r.x1 && p.y >= r.y0 && p.y <= r.y1
}

// ─── Shapes ──────────────────────────────────────────────────────────────────

/// World-space rendition of one element.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub id: ElementId,
    pub kind: ElementKind,
    pub color: Color,
    pub text: String,
    pub options: Vec<String>,
    center: Point,
    size: Size,
    handle_size: f64,
    handles: [Handle; 8],
    caption: Caption,
    dirty: bool,
}

impl Shape {
    /// Build a shape, its handles and its caption from an element.
    pub fn from_element(element: &Element, camera: &Camera, handle_size: f64) -> Self {
        let (center, size) = camera.document_to_world(&element.bounds);
        let mut shape = Self {
            id: element.id,
            kind: element.kind,
            color: element.color,
            text: element.text.clone(),
            options: element.options.to_vec(),
            center,
            size,
            handle_size,
            handles: HandleKind::ALL.map(|kind| Handle {
                kind,
                center,
                size: handle_size,
            }),
            caption: Caption {
                text: element.caption().to_string(),
                anchor: center,
            },
            dirty: false,
        };
        shape.layout_decorations();
        shape
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// World-space rectangle.
    pub fn rect(&self) -> Rect {
        Rect::from_center_size(self.center, self.size)
    }

    pub fn handles(&self) -> &[Handle; 8] {
        &self.handles
    }

    pub fn handle(&self, kind: HandleKind) -> &Handle {
        // ALL order is the storage order.
        let slot = HandleKind::ALL
            .iter()
            .position(|k| *k == kind)
            .unwrap_or_default();
        &self.handles[slot]
    }

    pub fn caption(&self) -> &Caption {
        &self.caption
    }

    /// True while the shape holds geometry the store has not yet accepted.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Inclusive containment test in world space.
    pub fn contains(&self, p: Point) -> bool {
        contains_inclusive(self.rect(), p)
    }

    /// Geometry change from direct manipulation. Marks the shape dirty.
    pub fn set_geometry(&mut self, center: Point, size: Size) {
        self.center = center;
        self.size = size;
        self.dirty = true;
        self.layout_decorations();
    }

    /// Geometry change coming from the store. Leaves the shape clean.
    pub fn adopt_geometry(&mut self, center: Point, size: Size) {
        self.center = center;
        self.size = size;
        self.dirty = false;
        self.layout_decorations();
    }

    /// Shift the shape and its decorations without touching the dirty flag.
    pub fn translate(&mut self, offset: Vec2) {
        self.center += offset;
        for h in &mut self.handles {
            h.center += offset;
        }
        self.caption.anchor += offset;
    }

    /// Copy non-geometric properties from an element.
    pub fn apply_properties(&mut self, element: &Element) {
        self.kind = element.kind;
        self.color = element.color;
        self.text.clone_from(&element.text);
        self.options = element.options.to_vec();
        element.caption().clone_into(&mut self.caption.text);
    }

    /// Current geometry as a document rectangle.
    pub fn document_bounds(&self, camera: &Camera) -> Bounds {
        camera.world_to_document(self.center, self.size)
    }

    fn layout_decorations(&mut self) {
        let hw = self.size.width / 2.0;
        let hh = self.size.height / 2.0;
        for h in &mut self.handles {
            let (dx, dy) = h.kind.direction();
            h.center = Point::new(self.center.x + dx * hw, self.center.y + dy * hh);
            h.size = self.handle_size;
        }
        self.caption.anchor = Point::new(
            self.center.x - hw + CAPTION_INSET,
            self.center.y + hh - CAPTION_INSET,
        );
    }
}

// ─── Scene ───────────────────────────────────────────────────────────────────

/// All live shapes, keyed by element id, with paint order alongside.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    shapes: HashMap<ElementId, Shape>,
    /// Back-to-front; the last id is topmost.
    order: Vec<ElementId>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.shapes.contains_key(&id)
    }

    pub fn get(&self, id: ElementId) -> Option<&Shape> {
        self.shapes.get(&id)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Shape> {
        self.shapes.get_mut(&id)
    }

    /// Ids back-to-front.
    pub fn order(&self) -> &[ElementId] {
        &self.order
    }

    /// Shapes back-to-front.
    pub fn shapes(&self) -> impl DoubleEndedIterator<Item = &Shape> {
        self.order.iter().filter_map(|id| self.shapes.get(id))
    }

    /// Paint-order index of `id`, 0 for the bottom shape.
    pub fn depth(&self, id: ElementId) -> Option<usize> {
        self.order.iter().position(|o| *o == id)
    }

    /// Every handle of every shape, back-to-front.
    pub fn handles(&self) -> impl Iterator<Item = (ElementId, &Handle)> {
        self.shapes()
            .flat_map(|s| s.handles().iter().map(move |h| (s.id, h)))
    }

    /// Add a shape on top. Replaces any shape with the same id.
    pub fn push(&mut self, shape: Shape) {
        let id = shape.id;
        if self.shapes.insert(id, shape).is_some() {
            self.order.retain(|o| *o != id);
        }
        self.order.push(id);
    }

    /// Take a shape out, dropping its handles and caption with it.
    pub fn remove(&mut self, id: ElementId) -> Option<Shape> {
        let shape = self.shapes.remove(&id)?;
        self.order.retain(|o| *o != id);
        Some(shape)
    }

    /// Move every shape by `offset` (viewport resize).
    pub fn translate_all(&mut self, offset: Vec2) {
        for shape in self.shapes.values_mut() {
            shape.translate(offset);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Viewport;
    use pd_core::{ElementDraft, MIN_ELEMENT_SIZE};

    fn element(raw: u64) -> Element {
        Element::from_draft(
            ElementId::from_raw(raw),
            ElementDraft::new(ElementKind::Button)
                .at(100.0, 100.0)
                .sized(200.0, 80.0),
            MIN_ELEMENT_SIZE,
        )
    }

    fn camera() -> Camera {
        Camera::orthographic(Viewport::new(1000.0, 600.0))
    }

    #[test]
    fn shape_from_element_places_handles() {
        let shape = Shape::from_element(&element(0), &camera(), 10.0);
        assert_eq!(shape.center(), Point::new(-300.0, 160.0));
        assert_eq!(shape.handle(HandleKind::Nw).center, Point::new(-400.0, 200.0));
        assert_eq!(shape.handle(HandleKind::Se).center, Point::new(-200.0, 120.0));
        assert_eq!(shape.handle(HandleKind::E).center, Point::new(-200.0, 160.0));
        assert_eq!(shape.caption().text, "Button");
        assert_eq!(shape.caption().anchor, Point::new(-394.0, 194.0));
        assert!(!shape.is_dirty());
    }

    #[test]
    fn set_geometry_moves_decorations_and_dirties() {
        let mut shape = Shape::from_element(&element(0), &camera(), 10.0);
        shape.set_geometry(Point::new(0.0, 0.0), Size::new(100.0, 50.0));
        assert!(shape.is_dirty());
        assert_eq!(shape.handle(HandleKind::Ne).center, Point::new(50.0, 25.0));
        assert_eq!(shape.handle(HandleKind::S).center, Point::new(0.0, -25.0));

        shape.adopt_geometry(Point::new(10.0, 10.0), Size::new(100.0, 50.0));
        assert!(!shape.is_dirty());
        assert_eq!(shape.handle(HandleKind::W).center, Point::new(-40.0, 10.0));
    }

    #[test]
    fn translate_carries_everything() {
        let mut shape = Shape::from_element(&element(0), &camera(), 10.0);
        let before = shape.clone();
        shape.translate(Vec2::new(-100.0, 100.0));
        assert_eq!(shape.center(), before.center() + Vec2::new(-100.0, 100.0));
        for (a, b) in shape.handles().iter().zip(before.handles()) {
            assert_eq!(a.center, b.center + Vec2::new(-100.0, 100.0));
        }
        assert_eq!(
            shape.caption().anchor,
            before.caption().anchor + Vec2::new(-100.0, 100.0)
        );
    }

    #[test]
    fn document_bounds_roundtrip() {
        let cam = camera();
        let el = element(0);
        let shape = Shape::from_element(&el, &cam, 10.0);
        assert_eq!(shape.document_bounds(&cam), el.bounds);
    }

    #[test]
    fn containment_is_inclusive() {
        let shape = Shape::from_element(&element(0), &camera(), 10.0);
        assert!(shape.contains(Point::new(-400.0, 200.0)));
        assert!(shape.contains(Point::new(-200.0, 120.0)));
        assert!(!shape.contains(Point::new(-199.9, 120.0)));
    }

    #[test]
    fn scene_push_and_remove_keep_order() {
        let cam = camera();
        let mut scene = Scene::new();
        for raw in 0..3 {
            scene.push(Shape::from_element(&element(raw), &cam, 10.0));
        }
        assert_eq!(scene.handles().count(), 24);
        assert_eq!(scene.depth(ElementId::from_raw(2)), Some(2));

        let removed = scene.remove(ElementId::from_raw(1)).unwrap();
        assert_eq!(removed.id, ElementId::from_raw(1));
        assert_eq!(scene.handles().count(), 16);
        assert_eq!(
            scene.order(),
            &[ElementId::from_raw(0), ElementId::from_raw(2)]
        );
    }
}
