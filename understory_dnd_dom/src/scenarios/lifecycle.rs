// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::task::{Poll, Waker};

use understory_dnd::event::PointerInfo;
use understory_dnd::options::InputModes;
use understory_dnd::{Callbacks, DndState, DragDropConfig, DragDropOptions, DropZone};

use super::{Board, Card, card};
use crate::NodeId;

#[test]
fn detach_is_idempotent_and_dropping_the_handle_detaches() {
    let b = Board::new();
    let source = b.source(0);
    let zone = b.zone(b.done, "done");
    assert_eq!(b.doc.total_listeners(), 2);
    assert!(b.doc.is_draggable(b.cards[0]));

    source.detach();
    source.detach();
    zone.detach();
    zone.detach();
    assert!(!source.is_attached());
    assert!(!zone.is_attached());
    assert_eq!(b.doc.total_listeners(), 0);

    {
        let _scoped = b.source(1);
        assert_eq!(b.doc.listener_count(b.cards[1]), 1);
    }
    assert_eq!(b.doc.total_listeners(), 0);
    b.doc.pointer_down(PointerInfo::touch(1), b.center(b.cards[1]));
    assert!(b.is_idle());
}

#[test]
fn unchanged_update_mid_drag_is_invisible() {
    let b = Board::new();
    let source = b.source(0);
    let done = b.zone(b.done, "done");

    let mut drag = b
        .doc
        .start_native_drag(b.cards[0], b.center(b.cards[0]))
        .expect("card is draggable");
    source.update(b.source_options(0));
    done.update(b.zone_options("done"));
    assert!(source.is_active());
    assert!(b.ctx.is_dragging());

    assert!(drag.move_to(b.center(b.done)));
    done.update(b.zone_options("done"));
    assert!(done.is_hovering());
    assert_eq!(drag.release().dropped_on, Some(b.done));
    assert_eq!(
        b.events(),
        ["card0:start", "done:enter", "done:drop Some(0)", "card0:end"]
    );
    assert!(!b.doc.has_class(b.cards[0], "dragging"));
}

#[test]
fn disabled_source_never_starts() {
    let b = Board::new();
    let source = b.source_with(
        0,
        b.source_options(0)
            .disabled(true)
            .input(InputModes::all()),
    );
    assert!(!b.doc.is_draggable(b.cards[0]));
    assert!(
        b.doc
            .start_native_drag(b.cards[0], b.center(b.cards[0]))
            .is_none()
    );
    b.doc.pointer_down(PointerInfo::MOUSE, b.center(b.cards[0]));
    b.doc.pointer_up(PointerInfo::MOUSE, b.center(b.cards[0]));
    b.doc.pointer_down(PointerInfo::touch(2), b.center(b.cards[0]));
    b.doc.pointer_up(PointerInfo::touch(2), b.center(b.cards[0]));
    assert!(b.is_idle());
    assert!(b.events().is_empty());

    source.update(b.source_options(0));
    assert!(b.doc.is_draggable(b.cards[0]));
    let drag = b
        .doc
        .start_native_drag(b.cards[0], b.center(b.cards[0]))
        .expect("re-enabled card drags");
    drag.release();
    assert_eq!(b.events(), ["card0:start", "card0:end"]);
}

#[test]
fn async_drop_finishes_after_the_session_ends() {
    let b = Board::new();
    let _source = b.source(0);
    let gate = Rc::new(Cell::new(false));
    let waiting: Rc<RefCell<Option<Waker>>> = Rc::default();
    let saved: Rc<Cell<Option<u32>>> = Rc::default();

    let (g, w, s) = (gate.clone(), waiting.clone(), saved.clone());
    let callbacks = Callbacks::new().on_drop_async(move |state: &DndState<Card, NodeId>| {
        let gate = g.clone();
        let waiting = w.clone();
        let saved = s.clone();
        let id = state.dragged_item.as_ref().map(|c| c.id);
        async move {
            std::future::poll_fn(|cx| {
                if gate.get() {
                    Poll::Ready(())
                } else {
                    *waiting.borrow_mut() = Some(cx.waker().clone());
                    Poll::Pending
                }
            })
            .await;
            saved.set(id);
        }
    });
    let _zone: DropZone<_, Card> = DropZone::attach(
        b.doc.clone(),
        &b.ctx,
        b.done,
        DragDropOptions::new("done").callbacks(callbacks),
    );

    let mut drag = b
        .doc
        .start_native_drag(b.cards[0], b.center(b.cards[0]))
        .expect("card is draggable");
    assert!(drag.move_to(b.center(b.done)));
    assert_eq!(drag.release().dropped_on, Some(b.done));
    assert!(b.is_idle());
    assert_eq!(b.doc.pending_futures(), 1);
    assert_eq!(saved.get(), None);

    // Unrelated events do not finish it.
    b.doc.pointer_move(PointerInfo::MOUSE, b.center(b.todo));
    assert_eq!(b.doc.pending_futures(), 1);

    gate.set(true);
    let waker = waiting.borrow_mut().take().expect("drop future is parked");
    waker.wake();
    b.doc.checkpoint();
    assert_eq!(b.doc.pending_futures(), 0);
    assert_eq!(saved.get(), Some(0));
}

#[test]
fn removing_and_detaching_a_dragging_source_abandons_the_session() {
    let b = Board::new();
    let source = b.source(0);
    let done = b.zone(b.done, "done");

    let mut drag = b
        .doc
        .start_native_drag(b.cards[0], b.center(b.cards[0]))
        .expect("card is draggable");
    assert!(drag.move_to(b.center(b.done)));
    assert!(done.is_hovering());

    assert_eq!(b.doc.remove(b.cards[0]), 2);
    source.detach();
    assert!(b.is_idle());
    assert!(!source.is_active());
    // The zone forgets the hover on the next drag start; its leave still
    // balances the counter meanwhile.
    drag.leave_document();
    assert!(!done.is_hovering());
    assert!(!b.doc.has_class(b.done, "drag-over"));
    assert!(!b.events().iter().any(|e| e == "card0:end"));
}

#[test]
fn options_load_from_json_config() {
    let b = Board::new();
    let config = DragDropConfig::from_json(
        r#"{
            "container": "todo",
            "attributes": { "draggingClass": "lifted shadow" },
            "interactive": ["button", "[contenteditable]"],
            "input": "NATIVE | POINTER"
        }"#,
    )
    .expect("valid config");
    let options: DragDropOptions<Card, NodeId> = DragDropOptions::from_config(config)
        .drag_data(card(0))
        .callbacks(b.callbacks("card0"));
    let _source = b.source_with(0, options);

    b.doc
        .pointer_down(PointerInfo::MOUSE, b.center(b.handles[0]))
        .expect("button is hit");
    assert!(b.is_idle());

    b.doc.pointer_down(PointerInfo::MOUSE, b.center(b.cards[0]));
    assert!(b.doc.has_class(b.cards[0], "lifted"));
    assert!(b.doc.has_class(b.cards[0], "shadow"));
    assert!(!b.doc.has_class(b.cards[0], "dragging"));
    b.doc.pointer_up(PointerInfo::MOUSE, b.center(b.cards[0]));
    assert_eq!(b.doc.class_list(b.cards[0]), ["card"]);
    assert!(b.is_idle());

    assert!(DragDropConfig::from_json(r#"{ "container": "  " }"#).is_err());
}
