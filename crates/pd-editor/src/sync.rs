//! Scene reconciler: element snapshots → live shapes.
//!
//! Runs whenever the element layer hands the canvas a new snapshot. Shapes
//! are keyed by element id so an unrelated change never tears down a shape
//! that is being dragged:
//!
//! - **New id**: a shape is built at the element's committed geometry with
//!   its eight handles and caption.
//! - **Below the floor**: width and height under `min_size` are raised to
//!   it, top-left corner fixed, so a resize never starts from a size the
//!   interaction engine would snap.
//! - **Known id**: color, text, options and caption follow the element.
//!   Geometry follows the element only while the shape is clean; a dirty
//!   shape keeps its live geometry until the element catches up with it.
//! - **Missing id**: the shape is dropped together with its decorations.

use pd_core::{Bounds, Element, ElementError, ElementId};
use pd_render::{Camera, Scene, Shape};
use std::collections::HashSet;

/// Tolerance for "the element now holds the shape's live geometry".
pub const GEOMETRY_EPSILON: f64 = 1e-6;

/// An element that could not become a shape.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedElement {
    /// Position in the snapshot.
    pub index: usize,
    pub id: ElementId,
    pub reason: ElementError,
}

/// What a reconcile pass did, by id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcileReport {
    pub added: Vec<ElementId>,
    pub updated: Vec<ElementId>,
    pub removed: Vec<ElementId>,
    pub skipped: Vec<SkippedElement>,
}

impl ReconcileReport {
    pub fn is_noop(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.skipped.is_empty()
    }
}

/// Bring `previous` in line with `elements`.
///
/// Paint order in the returned scene follows the snapshot order.
pub fn reconcile(
    mut previous: Scene,
    elements: &[Element],
    camera: &Camera,
    handle_size: f64,
    min_size: f64,
) -> (Scene, ReconcileReport) {
    let mut next = Scene::new();
    let mut report = ReconcileReport::default();
    let mut seen = HashSet::with_capacity(elements.len());

    for (index, element) in elements.iter().enumerate() {
        if let Err(reason) = element.validate() {
            log::warn!("reconcile: skipping {} at {index}: {reason}", element.id);
            report.skipped.push(SkippedElement {
                index,
                id: element.id,
                reason,
            });
            continue;
        }
        if !seen.insert(element.id) {
            log::warn!("reconcile: skipping duplicate {} at {index}", element.id);
            report.skipped.push(SkippedElement {
                index,
                id: element.id,
                reason: ElementError::DuplicateId(element.id),
            });
            continue;
        }

        let bounds = element.bounds.clamped_to_min(min_size);
        if bounds != element.bounds {
            log::debug!("reconcile: {} raised to the {min_size} floor", element.id);
        }

        match previous.remove(element.id) {
            Some(mut shape) => {
                shape.apply_properties(element);
                sync_geometry(&mut shape, &bounds, camera);
                next.push(shape);
                report.updated.push(element.id);
            }
            None => {
                let mut shape = Shape::from_element(element, camera, handle_size);
                if bounds != element.bounds {
                    let (center, size) = camera.document_to_world(&bounds);
                    shape.adopt_geometry(center, size);
                }
                next.push(shape);
                report.added.push(element.id);
            }
        }
    }

    // Whatever is left was not in the snapshot.
    report.removed = previous.order().to_vec();

    log::debug!(
        "reconcile: +{} ~{} -{} skipped {}",
        report.added.len(),
        report.updated.len(),
        report.removed.len(),
        report.skipped.len()
    );
    (next, report)
}

fn sync_geometry(shape: &mut Shape, bounds: &Bounds, camera: &Camera) {
    if shape.is_dirty() {
        // Live geometry wins until the element layer acknowledges it.
        if shape
            .document_bounds(camera)
            .approx_eq(bounds, GEOMETRY_EPSILON)
        {
            log::trace!("reconcile: {} acknowledged", shape.id);
            shape.mark_clean();
        }
        return;
    }
    let (center, size) = camera.document_to_world(bounds);
    if shape.center() != center || shape.size() != size {
        shape.adopt_geometry(center, size);
    }
}
