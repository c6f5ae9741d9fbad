//! Hit testing: screen point → shape or handle lookup.
//!
//! Casts the camera's picking ray through the scene. Shapes sit on the
//! canvas plane, raised slightly by paint order; handles float on a layer
//! above every shape. Intersections come back nearest first, so the
//! topmost thing under the pointer wins.

use crate::camera::{Camera, Ray};
use crate::scene::{HandleKind, Scene};
use kurbo::Point;
use pd_core::ElementId;

/// Depth band the shapes are spread over, bottom to top of paint order.
pub const SHAPE_LAYER_SPAN: f64 = 100.0;
/// Depth of the handle layer. Must stay above the shape band and, together
/// with it, below `Camera::EYE_Z`.
pub const HANDLE_LAYER_Z: f64 = 500.0;

/// Depth of the shape at `depth` in a scene of `count` shapes. Always inside
/// `[0, SHAPE_LAYER_SPAN)`, however many shapes there are.
pub fn shape_z(depth: usize, count: usize) -> f64 {
    SHAPE_LAYER_SPAN * depth as f64 / count.max(1) as f64
}

/// What the pointer is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Handle { id: ElementId, handle: HandleKind },
    Shape(ElementId),
}

impl HitTarget {
    pub fn id(&self) -> ElementId {
        match *self {
            HitTarget::Handle { id, .. } | HitTarget::Shape(id) => id,
        }
    }
}

/// One ray/object crossing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    pub target: HitTarget,
    pub distance: f64,
}

/// Every shape and handle the ray passes through, nearest first.
pub fn raycast(scene: &Scene, ray: &Ray) -> Vec<Intersection> {
    let mut hits = Vec::new();
    let count = scene.len();
    for (depth, shape) in scene.shapes().enumerate() {
        let z = shape_z(depth, count);
        if shape.contains(ray.origin)
            && let Some(distance) = ray.distance_to(z)
        {
            hits.push(Intersection {
                target: HitTarget::Shape(shape.id),
                distance,
            });
        }
        let handle_z = HANDLE_LAYER_Z + z;
        for handle in shape.handles() {
            if handle.contains(ray.origin)
                && let Some(distance) = ray.distance_to(handle_z)
            {
                hits.push(Intersection {
                    target: HitTarget::Handle {
                        id: shape.id,
                        handle: handle.kind,
                    },
                    distance,
                });
            }
        }
    }
    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    hits
}

/// The topmost target under a screen pixel, handles before shapes.
/// Returns `None` over empty canvas.
pub fn hit_test(scene: &Scene, camera: &Camera, screen: Point) -> Option<HitTarget> {
    let hits = raycast(scene, &camera.ray(screen));
    let first_handle = hits
        .iter()
        .find(|h| matches!(h.target, HitTarget::Handle { .. }));
    first_handle.or_else(|| hits.first()).map(|h| h.target)
}
