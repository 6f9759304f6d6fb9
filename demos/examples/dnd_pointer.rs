// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer and touch drags on the same board.
//!
//! The mouse drag shows pointer capture: the card keeps receiving the
//! pointer's events while the pointer is over another list. The touch drag
//! shows the debounced over callback: several moves in quick succession
//! produce one call once the virtual clock moves on.
//!
//! Run:
//! - `cargo run -p understory_dnd_demos --example dnd_pointer`

use std::cell::Cell;
use std::rc::Rc;

use kurbo::{Point, Rect, Vec2};
use understory_dnd::event::PointerInfo;
use understory_dnd::options::InputModes;
use understory_dnd::{Callbacks, DndContext, DndState, DragDropOptions, DragSource, DropZone};
use understory_dnd_dom::{Document, ElementData, NodeId};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let doc = Document::new();
    let body = doc.insert(
        None,
        ElementData::new("body").with_bounds(Rect::new(0., 0., 400., 300.)),
    );
    let left = doc.insert(
        Some(body),
        ElementData::new("ul").with_bounds(Rect::new(0., 0., 190., 300.)),
    );
    let right = doc.insert(
        Some(body),
        ElementData::new("ul").with_bounds(Rect::new(210., 0., 400., 300.)),
    );
    let card = doc.insert(
        Some(left),
        ElementData::new("li").with_bounds(Rect::new(10., 10., 180., 50.)),
    );

    let ctx: DndContext<String, NodeId> = DndContext::new();
    let source = DragSource::attach(
        doc.clone(),
        &ctx,
        card,
        DragDropOptions::new("left")
            .drag_data("card-1".to_string())
            .input(InputModes::POINTER | InputModes::TOUCH)
            .dragging_class("dragging lifted"),
    );

    let overs = Rc::new(Cell::new(0_u32));
    let drops = Rc::new(Cell::new(0_u32));
    let (o, d) = (overs.clone(), drops.clone());
    let _zone = DropZone::attach(
        doc.clone(),
        &ctx,
        right,
        DragDropOptions::new("right").callbacks(
            Callbacks::new()
                .on_drag_over(move |_: &DndState<String, NodeId>| o.set(o.get() + 1))
                .on_drop(move |s: &DndState<String, NodeId>| {
                    println!("dropped {:?}", s.dragged_item);
                    d.set(d.get() + 1);
                }),
        ),
    );

    println!("== Mouse ==");
    let mouse = PointerInfo::MOUSE;
    doc.pointer_down(mouse, Point::new(40., 30.));
    println!("captured by card: {}", doc.captured(mouse.id) == Some(card));
    doc.pointer_move(mouse, Point::new(300., 100.));
    doc.pointer_move(mouse, Point::new(310., 110.));
    if let Some(track) = source.pointer_track() {
        println!("offset from press: {:?}", track.total_offset());
    }
    println!("over calls (mouse, immediate): {}", overs.get());
    doc.pointer_up(mouse, Point::new(310., 110.));

    log::info!("mouse drag done, {} drop(s)", drops.get());

    println!("== Touch ==");
    overs.set(0);
    let finger = PointerInfo::touch(7);
    doc.pointer_down(finger, Point::new(40., 30.));
    let mut at = Point::new(300., 100.);
    for _ in 0..5 {
        doc.pointer_move(finger, at);
        at += Vec2::new(4., 4.);
        doc.advance(16);
    }
    println!("over calls after 5 moves at 16ms: {}", overs.get());
    doc.advance(100);
    println!("over calls after the debounce: {}", overs.get());
    doc.pointer_up(finger, at);

    assert_eq!(drops.get(), 2);
    assert_eq!(overs.get(), 1);
    assert!(ctx.with_state(|s| s.is_cleared()));
    println!("session cleared, t={}ms", doc.now_ms());
}
