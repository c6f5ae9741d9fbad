//! Integration tests: all eight resize handles through the canvas session.
//!
//! Every handle is dragged 10px outward. The axes it controls grow by twice
//! the travel and the opposite edge stays where it was.

use pd_core::*;
use pd_editor::*;
use pd_render::{HandleKind, HitTarget, Viewport};

const A: Bounds = Bounds::new(100.0, 100.0, 200.0, 80.0);

fn session_with_a() -> (CanvasSession, ElementId) {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut store = ElementStore::new();
    let id = store.add(
        ElementDraft::new(ElementKind::TextInput)
            .at(A.x, A.y)
            .sized(A.width, A.height),
    );
    let mut session = CanvasSession::mount(&CanvasConfig::default(), Viewport::new(1000.0, 600.0));
    session.set_elements(store.elements());
    (session, id)
}

/// Screen position of a handle and its outward direction in screen axes.
fn grip(handle: HandleKind) -> ((f64, f64), (f64, f64)) {
    let (cx, cy) = (A.x + A.width / 2.0, A.y + A.height / 2.0);
    let (hw, hh) = (A.width / 2.0, A.height / 2.0);
    let (xdir, ydir) = handle.direction();
    // World y is up, screen y is down
    ((cx + xdir * hw, cy - ydir * hh), (xdir, -ydir))
}

fn drag_handle(handle: HandleKind, travel: f64) -> Bounds {
    let (mut session, id) = session_with_a();
    let ((x, y), (ox, oy)) = grip(handle);
    assert_eq!(
        session.hit_test(kurbo::Point::new(x, y)),
        Some(HitTarget::Handle { id, handle })
    );

    let (tx, ty) = (x + ox * travel, y + oy * travel);
    session.dispatch(SessionEvent::Pointer(InputEvent::from_pointer_down(x, y, Modifiers::NONE)));
    session.dispatch(SessionEvent::Pointer(InputEvent::from_pointer_move(tx, ty, Modifiers::NONE)));
    let signals =
        session.dispatch(SessionEvent::Pointer(InputEvent::from_pointer_up(tx, ty, Modifiers::NONE)));

    signals
        .into_iter()
        .find_map(|s| match s {
            Signal::Commit(update) => Some(update.bounds),
            _ => None,
        })
        .unwrap_or_else(|| panic!("{handle:?}: no commit"))
}

#[test]
fn each_handle_grows_its_axes_and_pins_the_opposite_edge() {
    for handle in HandleKind::ALL {
        let (_, (ox, oy)) = grip(handle);
        let b = drag_handle(handle, 10.0);

        let expected = Bounds::new(
            if ox < 0.0 { A.x - 20.0 } else { A.x },
            if oy < 0.0 { A.y - 20.0 } else { A.y },
            A.width + 20.0 * ox.abs(),
            A.height + 20.0 * oy.abs(),
        );
        assert_eq!(b, expected, "{handle:?}");

        // The edge opposite each controlled side is untouched
        if ox > 0.0 {
            assert_eq!(b.x, A.x, "{handle:?} moved the left edge");
        }
        if ox < 0.0 {
            assert_eq!(b.right(), A.right(), "{handle:?} moved the right edge");
        }
        if oy > 0.0 {
            assert_eq!(b.y, A.y, "{handle:?} moved the top edge");
        }
        if oy < 0.0 {
            assert_eq!(b.bottom(), A.bottom(), "{handle:?} moved the bottom edge");
        }
    }
}

#[test]
fn each_handle_clamps_inward_drags() {
    for handle in HandleKind::ALL {
        let (_, (ox, oy)) = grip(handle);
        let b = drag_handle(handle, -500.0);
        if ox != 0.0 {
            assert_eq!(b.width, MIN_ELEMENT_SIZE, "{handle:?}");
        } else {
            assert_eq!(b.width, A.width, "{handle:?}");
        }
        if oy != 0.0 {
            assert_eq!(b.height, MIN_ELEMENT_SIZE, "{handle:?}");
        } else {
            assert_eq!(b.height, A.height, "{handle:?}");
        }
    }
}

#[test]
fn sub_floor_element_resizes_from_the_floor() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut el = Element::from_draft(
        ElementId::from_raw(0),
        ElementDraft::new(ElementKind::Button)
            .at(100.0, 100.0)
            .sized(200.0, 80.0),
        MIN_ELEMENT_SIZE,
    );
    // A host snapshot that bypassed the store's floor
    el.bounds.width = 30.0;
    let mut session = CanvasSession::mount(&CanvasConfig::default(), Viewport::new(1000.0, 600.0));
    assert!(session.set_elements(&[el.clone()]).is_empty());

    // E handle of the raised 50-wide shape, pressed and released in place
    let (x, y) = (150.0, 140.0);
    assert_eq!(
        session.hit_test(kurbo::Point::new(x, y)),
        Some(HitTarget::Handle {
            id: el.id,
            handle: HandleKind::E
        })
    );
    let before = session.scene().get(el.id).unwrap().center();
    for event in [
        InputEvent::from_pointer_down(x, y, Modifiers::NONE),
        InputEvent::from_pointer_move(x, y, Modifiers::NONE),
    ] {
        session.dispatch(SessionEvent::Pointer(event));
    }
    assert_eq!(session.scene().get(el.id).unwrap().center(), before);

    let signals =
        session.dispatch(SessionEvent::Pointer(InputEvent::from_pointer_up(x, y, Modifiers::NONE)));
    assert!(signals.contains(&Signal::Commit(GeometryUpdate {
        id: el.id,
        bounds: Bounds::new(100.0, 100.0, 50.0, 80.0),
    })));
}
