//! Orthographic camera and the coordinate spaces it connects.
//!
//! Three spaces are in play:
//!
//! - **Screen**: canvas pixels, origin top-left, y down. Document
//!   coordinates (the exported `x`/`y`) are the same space.
//! - **NDC**: normalized device coordinates, each axis in `[-1, 1]`, y up.
//! - **World**: where shapes live and hit testing happens, origin at the
//!   canvas center, y up.
//!
//! The camera's projection bounds are re-derived from the viewport on every
//! resize so that one pixel is one world unit. Screen → world is therefore
//! an affine scale + offset, cached as a `kurbo::Affine`.

use kurbo::{Affine, Point, Rect, Size, Vec2};
use pd_core::Bounds;

/// The canvas viewport in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 600.0,
        }
    }
}

impl Viewport {
    /// Degenerate sizes are raised to one pixel so the projection stays invertible.
    pub fn new(width: f64, height: f64) -> Self {
        let sane = |v: f64| if v.is_finite() { v.max(1.0) } else { 1.0 };
        Self {
            width: sane(width),
            height: sane(height),
        }
    }
}

/// A ray cast from the camera into the scene, along −z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// World-space x/y of the ray. Orthographic, so every ray is parallel.
    pub origin: Point,
    /// Depth the ray starts at (the camera plane).
    pub origin_z: f64,
}

impl Ray {
    /// Distance travelled before crossing the plane at `z`, if it lies ahead.
    pub fn distance_to(&self, z: f64) -> Option<f64> {
        let d = self.origin_z - z;
        (d >= 0.0).then_some(d)
    }
}

/// Orthographic camera looking down −z at the canvas plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    viewport: Viewport,
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
    screen_to_world: Affine,
    world_to_screen: Affine,
}

impl Camera {
    /// Depth of the camera plane. Everything drawable sits below it.
    pub const EYE_Z: f64 = 1000.0;

    /// A camera whose bounds match `viewport` one-to-one.
    pub fn orthographic(viewport: Viewport) -> Self {
        let half_w = viewport.width / 2.0;
        let half_h = viewport.height / 2.0;
        let mut camera = Self {
            viewport,
            left: -half_w,
            right: half_w,
            top: half_h,
            bottom: -half_h,
            screen_to_world: Affine::IDENTITY,
            world_to_screen: Affine::IDENTITY,
        };
        camera.update_projection();
        camera
    }

    /// Recompute bounds for a new viewport.
    ///
    /// Returns the world-space translation that keeps document-anchored
    /// geometry in place: anything positioned from document coordinates must
    /// be moved by this vector.
    pub fn resize(&mut self, viewport: Viewport) -> Vec2 {
        let before = self.screen_to_world(Point::ZERO);
        *self = Self::orthographic(viewport);
        let after = self.screen_to_world(Point::ZERO);
        log::debug!(
            "camera: resize to {}x{}, world shift {:?}",
            viewport.width,
            viewport.height,
            after - before
        );
        after - before
    }

    fn update_projection(&mut self) {
        let (w, h) = (self.viewport.width, self.viewport.height);
        let sx = (self.right - self.left) / w;
        let sy = (self.top - self.bottom) / h;
        // Composed directly rather than via NDC so that 1:1 bounds map
        // integer pixels to integer world units without rounding.
        self.screen_to_world = Affine::new([sx, 0.0, 0.0, -sy, self.left, self.top]);
        self.world_to_screen = Affine::new([
            1.0 / sx,
            0.0,
            0.0,
            -1.0 / sy,
            -self.left / sx,
            self.top / sy,
        ]);
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// `(left, right, top, bottom)` projection bounds in world units.
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        (self.left, self.right, self.top, self.bottom)
    }

    /// Screen pixel → normalized device coordinates.
    pub fn screen_to_ndc(&self, p: Point) -> Point {
        Point::new(
            p.x / self.viewport.width * 2.0 - 1.0,
            1.0 - p.y / self.viewport.height * 2.0,
        )
    }

    /// Normalized device coordinates → world (inverse orthographic projection).
    pub fn ndc_to_world(&self, p: Point) -> Point {
        Point::new(
            p.x * (self.right - self.left) / 2.0 + (self.right + self.left) / 2.0,
            p.y * (self.top - self.bottom) / 2.0 + (self.top + self.bottom) / 2.0,
        )
    }

    /// Screen pixel → world. Equivalent to `ndc_to_world(screen_to_ndc(p))`.
    pub fn screen_to_world(&self, p: Point) -> Point {
        self.screen_to_world * p
    }

    pub fn world_to_screen(&self, p: Point) -> Point {
        self.world_to_screen * p
    }

    /// The picking ray under a screen pixel.
    pub fn ray(&self, screen: Point) -> Ray {
        Ray {
            origin: self.screen_to_world(screen),
            origin_z: Self::EYE_Z,
        }
    }

    /// Document rectangle → world-space `(center, size)`.
    pub fn document_to_world(&self, b: &Bounds) -> (Point, Size) {
        let center = Point::new(b.x + b.width / 2.0, b.y + b.height / 2.0);
        (self.screen_to_world(center), Size::new(b.width, b.height))
    }

    /// World-space `(center, size)` → document rectangle.
    pub fn world_to_document(&self, center: Point, size: Size) -> Bounds {
        let c = self.world_to_screen(center);
        Bounds::new(
            c.x - size.width / 2.0,
            c.y - size.height / 2.0,
            size.width,
            size.height,
        )
    }

    /// World-space `(center, size)` → screen rectangle for drawing.
    pub fn world_rect_to_screen(&self, center: Point, size: Size) -> Rect {
        Rect::from_center_size(self.world_to_screen(center), size)
    }
}
