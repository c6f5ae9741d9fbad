//! Interaction engine: the pointer state machine for the canvas.
//!
//! ```text
//!            down on shape            up
//!   Idle ───────────────────▶ Dragging ──────▶ Idle  (commit)
//!     │      down on handle           up
//!     └─────────────────────▶ Resizing ──────▶ Idle  (commit)
//! ```
//!
//! All geometry is computed in world space. Shapes are mutated live while
//! a gesture is in flight; the element layer only hears about it on
//! pointer-up, through a `GeometryUpdate`.

use kurbo::{Point, Size, Vec2};
use pd_core::{ElementId, GeometryUpdate, MIN_ELEMENT_SIZE};
use pd_render::{Camera, HandleKind, HitTarget, Scene, hit_test};

/// Cursor affordance shown over the canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Cursor {
    #[default]
    Default,
    Move,
    NwResize,
    NeResize,
    SwResize,
    SeResize,
    NResize,
    SResize,
    WResize,
    EResize,
}

impl Cursor {
    pub fn for_handle(handle: HandleKind) -> Self {
        match handle {
            HandleKind::Nw => Cursor::NwResize,
            HandleKind::N => Cursor::NResize,
            HandleKind::Ne => Cursor::NeResize,
            HandleKind::E => Cursor::EResize,
            HandleKind::Se => Cursor::SeResize,
            HandleKind::S => Cursor::SResize,
            HandleKind::Sw => Cursor::SwResize,
            HandleKind::W => Cursor::WResize,
        }
    }

    fn for_hit(hit: Option<HitTarget>) -> Self {
        match hit {
            Some(HitTarget::Handle { handle, .. }) => Cursor::for_handle(handle),
            Some(HitTarget::Shape(_)) => Cursor::Move,
            None => Cursor::Default,
        }
    }

    /// CSS `cursor` value.
    pub fn css(self) -> &'static str {
        match self {
            Cursor::Default => "default",
            Cursor::Move => "move",
            Cursor::NwResize => "nw-resize",
            Cursor::NeResize => "ne-resize",
            Cursor::SwResize => "sw-resize",
            Cursor::SeResize => "se-resize",
            Cursor::NResize => "n-resize",
            Cursor::SResize => "s-resize",
            Cursor::WResize => "w-resize",
            Cursor::EResize => "e-resize",
        }
    }
}

/// Where the pointer state machine is.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum InteractionState {
    #[default]
    Idle,
    Dragging {
        id: ElementId,
        /// `shape center − pointer` at pointer-down, in world units.
        offset: Vec2,
    },
    Resizing {
        id: ElementId,
        handle: HandleKind,
        anchor_center: Point,
        anchor_size: Size,
        anchor_pointer: Point,
    },
}

impl InteractionState {
    pub fn active_id(&self) -> Option<ElementId> {
        match *self {
            InteractionState::Idle => None,
            InteractionState::Dragging { id, .. } | InteractionState::Resizing { id, .. } => {
                Some(id)
            }
        }
    }
}

/// What one pointer event produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionOutput {
    /// Set when the cursor affordance changed.
    pub cursor: Option<Cursor>,
    /// Final geometry of a finished gesture.
    pub commit: Option<GeometryUpdate>,
    /// Set when the selection changed; holds the new selection.
    pub selection: Option<Option<ElementId>>,
}

/// The pointer state machine plus selection and hover.
#[derive(Debug, Clone)]
pub struct InteractionEngine {
    state: InteractionState,
    selection: Option<ElementId>,
    hovered: Option<ElementId>,
    cursor: Cursor,
    min_size: f64,
}

impl Default for InteractionEngine {
    fn default() -> Self {
        Self::new(MIN_ELEMENT_SIZE)
    }
}

impl InteractionEngine {
    pub fn new(min_size: f64) -> Self {
        Self {
            state: InteractionState::Idle,
            selection: None,
            hovered: None,
            cursor: Cursor::Default,
            min_size,
        }
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn selection(&self) -> Option<ElementId> {
        self.selection
    }

    pub fn hovered(&self) -> Option<ElementId> {
        self.hovered
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Replace the selection. Returns true if it changed.
    pub fn select(&mut self, id: Option<ElementId>) -> bool {
        let changed = self.selection != id;
        self.selection = id;
        changed
    }

    // ─── Pointer events ──────────────────────────────────────────────────

    pub fn pointer_down(
        &mut self,
        scene: &Scene,
        camera: &Camera,
        screen: Point,
    ) -> InteractionOutput {
        let mut out = InteractionOutput::default();
        if self.state != InteractionState::Idle {
            // A pointer-up went missing; finish the old gesture first.
            out.commit = self.finish(scene, camera);
        }

        let pointer = camera.screen_to_world(screen);
        let hit = hit_test(scene, camera, screen);
        log::trace!("pointer down {screen:?} → world {pointer:?} hit {hit:?}");

        match hit {
            Some(HitTarget::Handle { id, handle }) => {
                if let Some(shape) = scene.get(id) {
                    self.state = InteractionState::Resizing {
                        id,
                        handle,
                        anchor_center: shape.center(),
                        anchor_size: shape.size(),
                        anchor_pointer: pointer,
                    };
                    log::debug!("interaction: resize {id} from {}", handle.name());
                }
            }
            Some(HitTarget::Shape(id)) => {
                if let Some(shape) = scene.get(id) {
                    self.state = InteractionState::Dragging {
                        id,
                        offset: shape.center() - pointer,
                    };
                    log::debug!("interaction: drag {id}");
                }
            }
            None => {}
        }

        let target = hit.map(|h| h.id());
        if self.select(target) {
            out.selection = Some(target);
        }
        self.hovered = target;
        out.cursor = self.set_cursor(Cursor::for_hit(hit));
        out
    }

    pub fn pointer_move(
        &mut self,
        scene: &mut Scene,
        camera: &Camera,
        screen: Point,
    ) -> InteractionOutput {
        let mut out = InteractionOutput::default();
        let pointer = camera.screen_to_world(screen);

        match self.state {
            InteractionState::Idle => {
                let hit = hit_test(scene, camera, screen);
                self.hovered = hit.map(|h| h.id());
                out.cursor = self.set_cursor(Cursor::for_hit(hit));
            }
            InteractionState::Dragging { id, offset } => {
                let Some(shape) = scene.get_mut(id) else {
                    self.abandon(id);
                    out.cursor = self.set_cursor(Cursor::Default);
                    return out;
                };
                let size = shape.size();
                shape.set_geometry(pointer + offset, size);
            }
            InteractionState::Resizing {
                id,
                handle,
                anchor_center,
                anchor_size,
                anchor_pointer,
            } => {
                let Some(shape) = scene.get_mut(id) else {
                    self.abandon(id);
                    out.cursor = self.set_cursor(Cursor::Default);
                    return out;
                };
                let (center, size) = resize_geometry(
                    handle,
                    anchor_center,
                    anchor_size,
                    pointer - anchor_pointer,
                    self.min_size,
                );
                shape.set_geometry(center, size);
            }
        }
        out
    }

    pub fn pointer_up(&mut self, scene: &Scene, camera: &Camera, screen: Point) -> InteractionOutput {
        let mut out = InteractionOutput::default();
        if self.state == InteractionState::Idle {
            return out;
        }
        out.commit = self.finish(scene, camera);

        let hit = hit_test(scene, camera, screen);
        self.hovered = hit.map(|h| h.id());
        out.cursor = self.set_cursor(Cursor::for_hit(hit));
        out
    }

    // ─── Scene changes ───────────────────────────────────────────────────

    /// Drop references to shapes that no longer exist. An in-flight gesture
    /// on a vanished shape is abandoned without a commit.
    pub fn retain_existing(&mut self, scene: &Scene) -> InteractionOutput {
        let mut out = InteractionOutput::default();
        if let Some(id) = self.state.active_id()
            && !scene.contains(id)
        {
            self.abandon(id);
            out.cursor = self.set_cursor(Cursor::Default);
        }
        if let Some(id) = self.hovered
            && !scene.contains(id)
        {
            self.hovered = None;
        }
        if let Some(id) = self.selection
            && !scene.contains(id)
        {
            self.selection = None;
            out.selection = Some(None);
        }
        out
    }

    /// Keep in-flight anchors in step with a world-frame shift.
    pub fn translate_anchors(&mut self, offset: Vec2) {
        if let InteractionState::Resizing {
            anchor_center,
            anchor_pointer,
            ..
        } = &mut self.state
        {
            *anchor_center += offset;
            *anchor_pointer += offset;
        }
        // Dragging stores a center−pointer offset, which a uniform shift leaves alone.
    }

    fn finish(&mut self, scene: &Scene, camera: &Camera) -> Option<GeometryUpdate> {
        let id = self.state.active_id()?;
        self.state = InteractionState::Idle;
        let Some(shape) = scene.get(id) else {
            log::debug!("interaction: {id} vanished before release, nothing to commit");
            return None;
        };
        let bounds = shape.document_bounds(camera);
        log::debug!(
            "interaction: commit {id} ({}, {}) {}x{}",
            bounds.x,
            bounds.y,
            bounds.width,
            bounds.height
        );
        Some(GeometryUpdate { id, bounds })
    }

    fn abandon(&mut self, id: ElementId) {
        log::debug!("interaction: {id} vanished mid-gesture, back to idle");
        self.state = InteractionState::Idle;
    }

    fn set_cursor(&mut self, cursor: Cursor) -> Option<Cursor> {
        (self.cursor != cursor).then(|| {
            self.cursor = cursor;
            cursor
        })
    }
}

/// New `(center, size)` for a resize gesture.
///
/// `delta` is the pointer's world-space travel since pointer-down. Each axis
/// the handle controls grows by twice the travel along its direction, floored
/// at `min_size`, and the center moves by half the growth so the opposite
/// edge stays put.
pub fn resize_geometry(
    handle: HandleKind,
    anchor_center: Point,
    anchor_size: Size,
    delta: Vec2,
    min_size: f64,
) -> (Point, Size) {
    let (xdir, ydir) = handle.direction();
    let mut center = anchor_center;
    let mut size = anchor_size;
    if xdir != 0.0 {
        size.width = (anchor_size.width + xdir * delta.x * 2.0).max(min_size);
        center.x = anchor_center.x + xdir * (size.width - anchor_size.width) / 2.0;
    }
    if ydir != 0.0 {
        size.height = (anchor_size.height + ydir * delta.y * 2.0).max(min_size);
        center.y = anchor_center.y + ydir * (size.height - anchor_size.height) / 2.0;
    }
    (center, size)
}
