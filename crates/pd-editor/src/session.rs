//! Canvas session: the single owner of camera, scene, interaction and renderer.
//!
//! A session is mounted with a config and a viewport and lives until
//! `teardown`. Two producers feed it: the render tick and the pointer
//! stream. Both arrive as `SessionEvent`s and are applied in order through
//! `dispatch`; a host that produces events on another thread can queue them
//! on a `std::sync::mpsc` channel and hand the receiver to `drain`.
//!
//! The session never touches the element store. It receives snapshots
//! through `SessionEvent::Elements` and reports finished gestures as
//! `Signal::Commit`.

use crate::input::InputEvent;
use crate::interaction::{Cursor, InteractionEngine, InteractionOutput, InteractionState};
use crate::sync::{SkippedElement, reconcile};
use kurbo::Point;
use pd_core::{CanvasConfig, Color, Element, ElementId, GeometryUpdate};
use pd_render::{Camera, Frame, HitTarget, RenderStyle, Renderer, Scene, Viewport, hit_test};
use std::sync::mpsc::Receiver;

/// Everything a session can be told.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Pointer(InputEvent),
    Resize(Viewport),
    Elements(Vec<Element>),
    Background(Color),
    Tick,
    Teardown,
}

/// Everything a session reports back.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    Cursor(Cursor),
    /// Final geometry of a drag/resize, for the element store.
    Commit(GeometryUpdate),
    Skipped(SkippedElement),
    Selection(Option<ElementId>),
    Frame(Frame),
}

pub struct CanvasSession {
    camera: Camera,
    scene: Scene,
    engine: InteractionEngine,
    renderer: Renderer,
    handle_size: f64,
    min_size: f64,
    mounted: bool,
}

impl CanvasSession {
    /// Create a live session for `viewport`.
    pub fn mount(config: &CanvasConfig, viewport: Viewport) -> Self {
        let camera = Camera::orthographic(viewport);
        log::debug!("session: mount {}x{}", viewport.width, viewport.height);
        Self {
            camera,
            scene: Scene::new(),
            engine: InteractionEngine::new(config.min_size),
            renderer: Renderer::new(camera, RenderStyle::from_config(config)),
            handle_size: config.handle_size,
            min_size: config.min_size,
            mounted: true,
        }
    }

    /// End the session. Shapes are released; later events are ignored and
    /// ticks produce no frame.
    pub fn teardown(&mut self) {
        if self.mounted {
            log::debug!("session: teardown with {} shape(s)", self.scene.len());
        }
        self.mounted = false;
        self.scene = Scene::new();
        self.engine = InteractionEngine::default();
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn state(&self) -> &InteractionState {
        self.engine.state()
    }

    pub fn selection(&self) -> Option<ElementId> {
        self.engine.selection()
    }

    pub fn cursor(&self) -> Cursor {
        self.engine.cursor()
    }

    /// Screen pixel → document point (same axes as the exported `x`/`y`).
    pub fn screen_to_document(&self, screen: Point) -> Point {
        screen
    }

    /// What is under a screen pixel, handles first.
    pub fn hit_test(&self, screen: Point) -> Option<HitTarget> {
        hit_test(&self.scene, &self.camera, screen)
    }

    // ─── Event loop ──────────────────────────────────────────────────────

    /// Apply one event. Returns the signals it produced, in order.
    pub fn dispatch(&mut self, event: SessionEvent) -> Vec<Signal> {
        if !self.mounted {
            log::trace!("session: ignoring {event:?} after teardown");
            return Vec::new();
        }
        match event {
            SessionEvent::Pointer(input) => self.pointer(&input),
            SessionEvent::Resize(viewport) => {
                self.resize(viewport);
                Vec::new()
            }
            SessionEvent::Elements(elements) => self.set_elements(&elements),
            SessionEvent::Background(color) => {
                self.renderer.set_background(color);
                Vec::new()
            }
            SessionEvent::Tick => self.tick().map(Signal::Frame).into_iter().collect(),
            SessionEvent::Teardown => {
                self.teardown();
                Vec::new()
            }
        }
    }

    /// Apply every event currently queued on `rx`, in arrival order.
    /// Stops early once the session is torn down.
    pub fn drain(&mut self, rx: &Receiver<SessionEvent>) -> Vec<Signal> {
        let mut signals = Vec::new();
        for event in rx.try_iter() {
            signals.extend(self.dispatch(event));
            if !self.mounted {
                break;
            }
        }
        signals
    }

    /// Reconcile the scene against a new element snapshot.
    pub fn set_elements(&mut self, elements: &[Element]) -> Vec<Signal> {
        if !self.mounted {
            return Vec::new();
        }
        let previous = std::mem::take(&mut self.scene);
        let (scene, report) = reconcile(
            previous,
            elements,
            &self.camera,
            self.handle_size,
            self.min_size,
        );
        self.scene = scene;

        let mut signals: Vec<Signal> = report.skipped.into_iter().map(Signal::Skipped).collect();
        let out = self.engine.retain_existing(&self.scene);
        push_output(&mut signals, out);
        signals
    }

    /// Re-derive the camera for a new viewport and shift everything in
    /// world space so document geometry is unchanged.
    pub fn resize(&mut self, viewport: Viewport) {
        if !self.mounted {
            return;
        }
        let shift = self.camera.resize(viewport);
        self.scene.translate_all(shift);
        self.engine.translate_anchors(shift);
        self.renderer.set_camera(self.camera);
    }

    pub fn set_background(&mut self, color: Color) {
        self.renderer.set_background(color);
    }

    /// Change the selection from outside the pointer stream.
    pub fn select(&mut self, id: Option<ElementId>) -> Vec<Signal> {
        let id = id.filter(|id| self.scene.contains(*id));
        if self.engine.select(id) {
            vec![Signal::Selection(id)]
        } else {
            Vec::new()
        }
    }

    /// Route a pointer event through the interaction engine. Key events are
    /// the host's business and are ignored here.
    pub fn pointer(&mut self, input: &InputEvent) -> Vec<Signal> {
        if !self.mounted {
            return Vec::new();
        }
        let out = match *input {
            InputEvent::PointerDown { position, .. } => {
                self.engine.pointer_down(&self.scene, &self.camera, position)
            }
            InputEvent::PointerMove { position, .. } => {
                self.engine
                    .pointer_move(&mut self.scene, &self.camera, position)
            }
            InputEvent::PointerUp { position, .. } => {
                self.engine.pointer_up(&self.scene, &self.camera, position)
            }
            InputEvent::Key { .. } => return Vec::new(),
        };
        let mut signals = Vec::new();
        push_output(&mut signals, out);
        signals
    }

    /// Produce a frame, or `None` once the session is torn down.
    pub fn tick(&mut self) -> Option<Frame> {
        self.mounted.then(|| {
            self.renderer
                .render(&self.scene, self.engine.selection(), self.engine.hovered())
        })
    }
}

fn push_output(signals: &mut Vec<Signal>, out: InteractionOutput) {
    if let Some(update) = out.commit {
        signals.push(Signal::Commit(update));
    }
    if let Some(selection) = out.selection {
        signals.push(Signal::Selection(selection));
    }
    if let Some(cursor) = out.cursor {
        signals.push(Signal::Cursor(cursor));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifiers;
    use pd_core::{Bounds, ElementDraft, ElementKind, MIN_ELEMENT_SIZE};
    use std::sync::mpsc;

    fn button(raw: u64) -> Element {
        Element::from_draft(
            ElementId::from_raw(raw),
            ElementDraft::new(ElementKind::Button)
                .at(100.0, 100.0)
                .sized(200.0, 80.0),
            MIN_ELEMENT_SIZE,
        )
    }

    fn mounted() -> CanvasSession {
        let mut session =
            CanvasSession::mount(&CanvasConfig::default(), Viewport::new(1000.0, 600.0));
        session.set_elements(&[button(0)]);
        session
    }

    fn down(x: f64, y: f64) -> SessionEvent {
        SessionEvent::Pointer(InputEvent::from_pointer_down(x, y, Modifiers::NONE))
    }

    fn moved(x: f64, y: f64) -> SessionEvent {
        SessionEvent::Pointer(InputEvent::from_pointer_move(x, y, Modifiers::NONE))
    }

    fn up(x: f64, y: f64) -> SessionEvent {
        SessionEvent::Pointer(InputEvent::from_pointer_up(x, y, Modifiers::NONE))
    }

    #[test]
    fn drag_emits_selection_cursor_and_commit() {
        let mut session = mounted();
        let a = ElementId::from_raw(0);
        assert_eq!(
            session.dispatch(down(150.0, 120.0)),
            vec![Signal::Selection(Some(a)), Signal::Cursor(Cursor::Move)]
        );
        assert!(session.dispatch(moved(200.0, 150.0)).is_empty());
        let signals = session.dispatch(up(200.0, 150.0));
        assert_eq!(
            signals[0],
            Signal::Commit(GeometryUpdate {
                id: a,
                bounds: Bounds::new(150.0, 130.0, 200.0, 80.0),
            })
        );
    }

    #[test]
    fn ticks_stop_after_teardown() {
        let mut session = mounted();
        assert!(matches!(
            session.dispatch(SessionEvent::Tick).as_slice(),
            [Signal::Frame(_)]
        ));
        session.dispatch(SessionEvent::Teardown);
        assert!(session.tick().is_none());
        assert!(session.dispatch(SessionEvent::Tick).is_empty());
        assert!(session.dispatch(down(150.0, 120.0)).is_empty());
        assert!(!session.is_mounted());
    }

    #[test]
    fn skipped_elements_are_signalled() {
        let mut session = mounted();
        let mut bad = button(1);
        bad.bounds.height = -1.0;
        let signals = session.dispatch(SessionEvent::Elements(vec![button(0), bad]));
        assert!(matches!(
            signals.as_slice(),
            [Signal::Skipped(SkippedElement { index: 1, .. })]
        ));
        assert_eq!(session.scene().len(), 1);
    }

    #[test]
    fn clearing_mid_drag_abandons_gesture() {
        let mut session = mounted();
        session.dispatch(down(150.0, 120.0));
        session.dispatch(moved(180.0, 120.0));
        let signals = session.dispatch(SessionEvent::Elements(Vec::new()));
        assert!(signals.contains(&Signal::Selection(None)));
        assert_eq!(*session.state(), InteractionState::Idle);
        let signals = session.dispatch(up(180.0, 120.0));
        assert!(!signals.iter().any(|s| matches!(s, Signal::Commit(_))));
    }

    #[test]
    fn resize_preserves_document_geometry() {
        let mut session = mounted();
        let a = ElementId::from_raw(0);
        let cam_before = *session.camera();
        let before = session.scene().get(a).unwrap().document_bounds(&cam_before);

        session.dispatch(SessionEvent::Resize(Viewport::new(1400.0, 900.0)));
        let after = session
            .scene()
            .get(a)
            .unwrap()
            .document_bounds(session.camera());
        assert_eq!(before, after);

        // The same screen pixel still hits the shape
        assert_eq!(
            session.hit_test(Point::new(150.0, 120.0)),
            Some(HitTarget::Shape(a))
        );
    }

    #[test]
    fn resize_during_resize_gesture_keeps_anchors() {
        let mut session = mounted();
        session.dispatch(down(300.0, 180.0));
        session.dispatch(SessionEvent::Resize(Viewport::new(1200.0, 800.0)));
        session.dispatch(moved(320.0, 190.0));
        let signals = session.dispatch(up(320.0, 190.0));
        assert_eq!(
            signals[0],
            Signal::Commit(GeometryUpdate {
                id: ElementId::from_raw(0),
                bounds: Bounds::new(100.0, 100.0, 240.0, 100.0),
            })
        );
    }

    #[test]
    fn drain_applies_queued_events_in_order() {
        let mut session = mounted();
        let (tx, rx) = mpsc::channel();
        let producer = std::thread::spawn(move || {
            for event in [
                down(150.0, 120.0),
                moved(160.0, 120.0),
                up(160.0, 120.0),
                SessionEvent::Tick,
            ] {
                tx.send(event).unwrap();
            }
        });
        producer.join().unwrap();

        let signals = session.drain(&rx);
        let commit_at = signals
            .iter()
            .position(|s| matches!(s, Signal::Commit(_)))
            .unwrap();
        let frame_at = signals
            .iter()
            .position(|s| matches!(s, Signal::Frame(_)))
            .unwrap();
        assert!(commit_at < frame_at);
    }

    #[test]
    fn drain_stops_at_teardown() {
        let mut session = mounted();
        let (tx, rx) = mpsc::channel();
        tx.send(SessionEvent::Teardown).unwrap();
        tx.send(SessionEvent::Tick).unwrap();
        assert!(session.drain(&rx).is_empty());
        // The tick after teardown is left on the queue
        assert_eq!(rx.try_recv(), Ok(SessionEvent::Tick));
    }

    #[test]
    fn external_select_ignores_unknown_ids() {
        let mut session = mounted();
        assert!(session.select(Some(ElementId::from_raw(9))).is_empty());
        assert_eq!(
            session.select(Some(ElementId::from_raw(0))),
            vec![Signal::Selection(Some(ElementId::from_raw(0)))]
        );
    }
}
