// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::cell::Cell;
use std::rc::Rc;

use kurbo::Point;
use understory_dnd::event::{EventKind, EventKinds, InputEvent, PointerInfo};
use understory_dnd::host::DndHost;
use understory_dnd::options::InputModes;
use understory_dnd::transfer::{DataTransfer, DropEffect, PAYLOAD_FORMAT};

use super::{Board, card};
use crate::{DragOutcome, NodeId};

#[test]
fn card_moves_between_lists() {
    let b = Board::new();
    let _source = b.source(0);
    let todo = b.zone(b.todo, "todo");
    let done = b.zone(b.done, "done");

    let mut drag = b
        .doc
        .start_native_drag(b.cards[0], b.center(b.cards[0]))
        .expect("card is draggable");
    assert!(b.doc.has_class(b.cards[0], "dragging"));
    b.ctx.with_state(|s| {
        assert!(s.is_dragging);
        assert_eq!(s.source_container, "todo");
        assert_eq!(s.dragged_item, Some(card(0)));
    });
    let payload: serde_json::Value =
        serde_json::from_str(drag.transfer().get_data(PAYLOAD_FORMAT).unwrap_or_default())
            .expect("payload is JSON");
    assert_eq!(payload, serde_json::json!({ "id": 0, "title": "task 0" }));

    assert!(drag.move_to(b.center(b.cards[0])));
    assert!(todo.is_hovering());
    assert!(b.doc.has_class(b.todo, "drag-over"));

    assert!(drag.move_to(b.center(b.done)));
    assert!(!todo.is_hovering());
    assert!(done.is_hovering());
    assert!(!b.doc.has_class(b.todo, "drag-over"));
    assert!(b.doc.has_class(b.done, "drag-over"));
    // The list left last must not clear the target the new list just set.
    b.ctx.with_state(|s| {
        assert_eq!(s.target_container.as_deref(), Some("done"));
        assert_eq!(s.drag_over_element, Some(b.done));
    });

    let outcome = drag.release();
    assert_eq!(
        outcome,
        DragOutcome {
            dropped_on: Some(b.done),
            effect: DropEffect::Move,
        }
    );
    assert!(b.is_idle());
    assert!(!b.doc.has_class(b.cards[0], "dragging"));
    assert!(!b.doc.has_class(b.done, "drag-over"));
    assert_eq!(
        b.events(),
        [
            "card0:start",
            "todo:enter",
            "done:enter",
            "todo:leave",
            "done:drop Some(0)",
            "card0:end",
        ]
    );
}

#[test]
fn release_outside_any_list_ends_without_drop() {
    let b = Board::new();
    let _source = b.source(0);
    let _done = b.zone(b.done, "done");

    let mut drag = b
        .doc
        .start_native_drag(b.cards[0], b.center(b.cards[0]))
        .expect("card is draggable");
    assert!(drag.move_to(b.center(b.done)));
    // The gap between the lists is plain body.
    assert!(!drag.move_to(Point::new(200., 150.)));
    b.ctx.with_state(|s| {
        assert!(s.is_dragging);
        assert_eq!(s.target_container, None);
        assert_eq!(s.drag_over_element, None);
    });

    let outcome = drag.release();
    assert_eq!(outcome.dropped_on, None);
    assert_eq!(outcome.effect, DropEffect::None);
    assert!(b.is_idle());
    assert_eq!(
        b.events(),
        ["card0:start", "done:enter", "done:leave", "card0:end"]
    );
}

#[test]
fn leaving_the_document_clears_the_target() {
    let b = Board::new();
    let _source = b.source(1);
    let done = b.zone(b.done, "done");

    let mut drag = b
        .doc
        .start_native_drag(b.cards[1], b.center(b.cards[1]))
        .expect("card is draggable");
    assert!(drag.move_to(b.center(b.done)));
    assert!(!drag.move_to(Point::new(900., 900.)));
    assert_eq!(drag.current(), None);
    assert!(!done.is_hovering());
    assert_eq!(b.ctx.snapshot().target_container, None);
    assert_eq!(drag.release().dropped_on, None);
}

#[test]
fn moving_across_descendants_keeps_one_hover() {
    let b = Board::new();
    let _source = b.source(0);
    let todo = b.zone(b.todo, "todo");

    let mut drag = b
        .doc
        .start_native_drag(b.cards[0], b.center(b.cards[0]))
        .expect("card is draggable");
    let path = [
        b.center(b.cards[0]),
        b.center(b.handles[0]),
        b.center(b.cards[1]),
        Point::new(95., 280.),
        b.center(b.handles[2]),
        b.center(b.cards[2]),
    ];
    for at in path {
        assert!(drag.move_to(at), "drop refused at {at:?}");
        assert!(b.doc.has_class(b.todo, "drag-over"), "hover lost at {at:?}");
        assert_eq!(todo.depth(), 1, "unbalanced at {at:?}");
    }
    assert_eq!(b.ctx.snapshot().drag_over_element, Some(b.cards[2]));
    assert_eq!(b.count("todo:enter"), 1);
    assert_eq!(b.count("todo:leave"), 0);

    drag.release();
    assert_eq!(b.events().last().map(String::as_str), Some("card0:end"));
    assert!(!b.doc.has_class(b.todo, "drag-over"));
}

#[test]
fn lost_dragend_does_not_block_the_next_drag() {
    let b = Board::new();
    let first = b.source(0);
    let second = b.source(1);
    let done = b.zone(b.done, "done");

    {
        let mut drag = b
            .doc
            .start_native_drag(b.cards[0], b.center(b.cards[0]))
            .expect("card is draggable");
        assert!(drag.move_to(b.center(b.done)));
        // Abandoned here: the platform never sends dragend.
    }
    assert!(b.ctx.is_dragging());
    assert!(first.is_active());
    assert!(done.is_hovering());

    let mut drag = b
        .doc
        .start_native_drag(b.cards[1], b.center(b.cards[1]))
        .expect("card is draggable");
    assert!(!first.is_active());
    assert!(second.is_active());
    assert!(!b.doc.has_class(b.cards[0], "dragging"));
    assert!(b.doc.has_class(b.cards[1], "dragging"));
    assert!(!done.is_hovering());
    assert!(!b.doc.has_class(b.done, "drag-over"));
    b.ctx.with_state(|s| {
        assert_eq!(s.dragged_item, Some(card(1)));
        assert_eq!(s.target_container, None);
    });

    // A late dragend from the abandoned drag changes nothing.
    b.doc.dispatch(
        InputEvent::new(EventKind::DragEnd, b.cards[0]).with_data_transfer(DataTransfer::new()),
    );
    assert_eq!(b.ctx.snapshot().dragged_item, Some(card(1)));

    assert!(drag.move_to(b.center(b.done)));
    assert_eq!(drag.release().dropped_on, Some(b.done));
    assert!(b.is_idle());
    assert_eq!(b.count("done:drop Some(1)"), 1);
    assert_eq!(b.count("card0:end"), 0);
    assert_eq!(b.count("card1:end"), 1);
}

#[test]
fn press_on_interactive_child_does_not_drag() {
    let b = Board::new();
    let _source = b.source(0);

    let handle = b.handles[0];
    assert!(b.doc.start_native_drag(handle, b.center(handle)).is_none());
    assert!(b.is_idle());
    assert!(b.events().is_empty());
    assert!(!b.doc.has_class(b.cards[0], "dragging"));

    // The card body still drags.
    let drag = b
        .doc
        .start_native_drag(b.cards[0], b.center(b.cards[0]))
        .expect("card body is not excluded");
    assert!(b.ctx.is_dragging());
    drag.release();
    assert!(b.is_idle());
}

#[test]
fn malformed_payload_still_drops_with_the_session_item() {
    let b = Board::new();
    let _source = b.source(2);
    let _done = b.zone(b.done, "done");
    // Registered after the source, so it runs after the payload is written.
    b.doc.listen(
        &b.cards[2],
        EventKinds::DRAG_START,
        Rc::new(|ev: &mut InputEvent<NodeId>| {
            if let Some(dt) = ev.data_transfer.as_mut() {
                dt.set_data(PAYLOAD_FORMAT, "{not json");
            }
        }),
    );

    let mut drag = b
        .doc
        .start_native_drag(b.cards[2], b.center(b.cards[2]))
        .expect("card is draggable");
    assert_eq!(drag.transfer().get_data(PAYLOAD_FORMAT), Some("{not json"));
    assert!(drag.move_to(b.center(b.done)));
    assert_eq!(drag.release().dropped_on, Some(b.done));
    assert_eq!(b.count("done:drop Some(2)"), 1);
    assert!(b.is_idle());
}

#[test]
fn disabled_zone_refuses_the_drop() {
    let b = Board::new();
    let _source = b.source(0);
    let done = b.zone(b.done, "done");
    done.update(b.zone_options("done").disabled(true));

    let mut drag = b
        .doc
        .start_native_drag(b.cards[0], b.center(b.cards[0]))
        .expect("card is draggable");
    assert!(!drag.move_to(b.center(b.done)));
    assert!(!done.is_hovering());
    assert!(!b.doc.has_class(b.done, "drag-over"));
    assert_eq!(drag.release().dropped_on, None);
    assert_eq!(b.events(), ["card0:start", "card0:end"]);
}

#[test]
fn native_drag_on_a_pointer_enabled_card_starts_once() {
    let b = Board::new();
    let _source = b.source_with(
        0,
        b.source_options(0)
            .input(InputModes::NATIVE | InputModes::POINTER),
    );
    let _done = b.zone(b.done, "done");
    let cancels = Rc::new(Cell::new(0_u32));
    let seen = cancels.clone();
    b.doc.listen(
        &b.cards[0],
        EventKinds::POINTER_CANCEL,
        Rc::new(move |_: &mut InputEvent<NodeId>| seen.set(seen.get() + 1)),
    );
    let mouse = PointerInfo::MOUSE;

    let mut drag = b
        .doc
        .start_native_drag(b.cards[0], b.center(b.cards[0]))
        .expect("card is draggable");
    // The native drag took over the press: it was cancelled and uncaptured.
    assert_eq!(cancels.get(), 1);
    assert_eq!(b.doc.captured(mouse.id), None);
    assert!(b.doc.has_class(b.cards[0], "dragging"));
    assert_eq!(
        drag.transfer().get_data(PAYLOAD_FORMAT),
        Some(r#"{"id":0,"title":"task 0"}"#)
    );

    assert!(drag.move_to(b.center(b.done)));
    assert_eq!(drag.release().dropped_on, Some(b.done));
    assert!(b.is_idle());
    assert_eq!(b.doc.captured(mouse.id), None);
    assert_eq!(
        b.events(),
        ["card0:start", "done:enter", "done:drop Some(0)", "card0:end"]
    );

    // A later press elsewhere is not routed to the old card.
    b.doc
        .pointer_down(mouse, b.center(b.cards[1]))
        .expect("card is hit");
    assert!(b.is_idle());
    assert!(!b.doc.has_class(b.cards[0], "dragging"));
    assert_eq!(b.count("card0:start"), 1);
}
