// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Vec2;
use understory_dnd::event::PointerInfo;
use understory_dnd::options::InputModes;

use super::Board;

#[test]
fn mouse_drag_moves_card_between_lists() {
    let b = Board::new();
    let source = b.source_with(0, b.source_options(0).input(InputModes::POINTER));
    let todo = b.zone(b.todo, "todo");
    let done = b.zone(b.done, "done");
    let mouse = PointerInfo::MOUSE;

    b.doc
        .pointer_down(mouse, b.center(b.cards[0]))
        .expect("card is hit");
    assert!(b.ctx.is_dragging());
    assert_eq!(b.doc.captured(mouse.id), Some(b.cards[0]));
    assert!(b.doc.has_class(b.cards[0], "dragging"));

    // The pointer was already inside the list when the drag started; the
    // first move counts as the enter.
    b.doc.pointer_move(mouse, b.center(b.cards[1]));
    assert!(todo.is_hovering());
    assert_eq!(b.ctx.snapshot().drag_over_element, Some(b.cards[1]));

    b.doc.pointer_move(mouse, b.center(b.done));
    assert!(!todo.is_hovering());
    assert!(done.is_hovering());
    b.ctx.with_state(|s| {
        assert_eq!(s.target_container.as_deref(), Some("done"));
        assert_eq!(s.drag_over_element, Some(b.done));
    });
    let track = source.pointer_track().expect("pointer drags are tracked");
    assert_eq!(
        track.total_offset(),
        b.center(b.done) - b.center(b.cards[0])
    );

    b.doc.pointer_up(mouse, b.center(b.done));
    assert!(b.is_idle());
    assert_eq!(b.doc.captured(mouse.id), None);
    assert!(!b.doc.has_class(b.cards[0], "dragging"));
    assert!(!b.doc.has_class(b.done, "drag-over"));
    // Zones handle the release before the source ends the session.
    assert_eq!(
        b.events(),
        [
            "card0:start",
            "todo:enter",
            "todo:leave",
            "done:enter",
            "done:drop Some(0)",
            "card0:end",
        ]
    );
}

#[test]
fn mouse_is_ignored_unless_pointer_input_is_enabled() {
    let b = Board::new();
    let _source = b.source(0);
    b.doc.pointer_down(PointerInfo::MOUSE, b.center(b.cards[0]));
    assert!(b.is_idle());
    assert_eq!(b.doc.captured(PointerInfo::MOUSE.id), None);
}

#[test]
fn touch_over_is_debounced_on_the_virtual_clock() {
    let b = Board::new();
    let _source = b.source(0);
    let done = b.zone(b.done, "done");
    let touch = PointerInfo::touch(9);

    let down = b
        .doc
        .pointer_down(touch, b.center(b.cards[0]))
        .expect("card is hit");
    assert!(down.default_prevented, "touch start must not scroll");

    let over_done = b.center(b.done);
    b.doc.pointer_move(touch, over_done);
    b.doc.pointer_move(touch, over_done + Vec2::new(5., 5.));
    b.doc.pointer_move(touch, over_done + Vec2::new(10., 10.));
    assert!(done.is_hovering());
    assert_eq!(b.doc.pending_timers(), 1);
    assert_eq!(b.count("done:over"), 0);

    b.doc.advance(99);
    assert_eq!(b.count("done:over"), 0);
    b.doc.advance(1);
    assert_eq!(b.count("done:over"), 1);
    assert_eq!(b.doc.pending_timers(), 0);

    // A pending over is cancelled by the drop.
    b.doc.pointer_move(touch, over_done);
    assert_eq!(b.doc.pending_timers(), 1);
    let up = b.doc.pointer_up(touch, over_done).expect("list is hit");
    assert!(up.default_prevented);
    assert_eq!(b.doc.pending_timers(), 0);
    assert_eq!(b.count("done:drop Some(0)"), 1);
    assert!(b.is_idle());
    assert!(b.doc.hovered_path(touch.id).is_empty());
    assert!(!done.is_hovering());
}

#[test]
fn cancelled_pointer_ends_without_drop() {
    let b = Board::new();
    let _source = b.source_with(0, b.source_options(0).input(InputModes::POINTER));
    let _done = b.zone(b.done, "done");
    let pen = PointerInfo::pen(3);

    b.doc.pointer_down(pen, b.center(b.cards[0]));
    b.doc.pointer_move(pen, b.center(b.done));
    b.doc.pointer_cancel(pen, b.center(b.done));
    assert!(b.is_idle());
    assert_eq!(b.doc.captured(pen.id), None);
    assert_eq!(
        b.events(),
        ["card0:start", "done:enter", "done:leave", "card0:end"]
    );
}

#[test]
fn second_touch_on_a_dragging_card_is_ignored() {
    let b = Board::new();
    let source = b.source(0);
    let first = PointerInfo::touch(4);
    let second = PointerInfo::touch(5);

    b.doc.pointer_down(first, b.center(b.cards[0]));
    b.doc.pointer_down(second, b.center(b.cards[0]));
    assert_eq!(b.doc.captured(first.id), Some(b.cards[0]));
    assert_eq!(b.doc.captured(second.id), None);
    assert_eq!(b.count("card0:start"), 1);

    // Lifting the extra finger does not end the drag.
    b.doc.pointer_up(second, b.center(b.cards[0]));
    assert!(b.ctx.is_dragging());
    assert!(source.is_active());

    b.doc.pointer_up(first, b.center(b.cards[0]));
    assert!(b.is_idle());
    assert_eq!(b.count("card0:end"), 1);
}

#[test]
fn starting_on_a_button_is_excluded_for_pointers_too() {
    let b = Board::new();
    let _source = b.source(0);
    b.doc
        .pointer_down(PointerInfo::touch(1), b.center(b.handles[0]));
    assert!(b.is_idle());
    assert!(b.events().is_empty());
}
