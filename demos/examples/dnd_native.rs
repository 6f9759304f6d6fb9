// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A two-list task board driven by native drag events.
//!
//! A card is dragged from "todo" over its own list, then into "done", and
//! dropped. The drop callback moves the element in the document, the way an
//! application would update its model.
//!
//! Run:
//! - `RUST_LOG=trace cargo run -p understory_dnd_demos --example dnd_native`

use std::rc::Rc;

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use understory_dnd::{Callbacks, DndContext, DndState, DragDropOptions, DragSource, DropZone};
use understory_dnd_dom::{Document, ElementData, NodeId};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct Task {
    id: u32,
    title: String,
}

fn list(doc: &Document, parent: NodeId, id: &str, x: f64) -> NodeId {
    doc.insert(
        Some(parent),
        ElementData::new("ul")
            .with_id(id)
            .with_bounds(Rect::new(x, 0., x + 190., 300.)),
    )
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();

    let doc = Document::new();
    let body = doc.insert(
        None,
        ElementData::new("body").with_bounds(Rect::new(0., 0., 400., 300.)),
    );
    let todo = list(&doc, body, "todo", 0.);
    let done = list(&doc, body, "done", 210.);

    let ctx: DndContext<Task, NodeId> = DndContext::new();
    let tasks = [(1, "write docs"), (2, "review patch")];
    let mut sources = Vec::new();
    for (top, (id, title)) in [10., 60.].into_iter().zip(tasks) {
        let card = doc.insert(
            Some(todo),
            ElementData::new("li")
                .with_class("card")
                .with_bounds(Rect::new(10., top, 180., top + 40.)),
        );
        let task = Task {
            id,
            title: title.into(),
        };
        let options = DragDropOptions::new("todo")
            .drag_data(task)
            .callbacks(
                Callbacks::new()
                    .on_drag_start(|s: &DndState<Task, NodeId>| {
                        println!("start   {:?} from `{}`", s.dragged_item, s.source_container);
                    })
                    .on_drag_end(|_| println!("end")),
            )
            .interactive(["button", "[contenteditable]"]);
        sources.push(DragSource::attach(doc.clone(), &ctx, card, options));
    }

    let on_drop = {
        let doc = Rc::downgrade(&doc);
        move |s: &DndState<Task, NodeId>| {
            println!(
                "drop    {:?} into `{}`",
                s.dragged_item,
                s.target_container.as_deref().unwrap_or("?")
            );
            if let Some(doc) = doc.upgrade()
                && let Some(task) = &s.dragged_item
            {
                let moved = doc.insert(
                    Some(done),
                    ElementData::new("li")
                        .with_class("card")
                        .with_attr("data-task", &task.id.to_string()),
                );
                println!("        inserted {moved} under {done}");
            }
        }
    };
    let zone_callbacks = |name: &'static str| {
        Callbacks::new()
            .on_drag_enter(move |_: &DndState<Task, NodeId>| println!("enter   `{name}`"))
            .on_drag_leave(move |_: &DndState<Task, NodeId>| println!("leave   `{name}`"))
    };
    let _todo_zone = DropZone::attach(
        doc.clone(),
        &ctx,
        todo,
        DragDropOptions::new("todo").callbacks(zone_callbacks("todo")),
    );
    let _done_zone = DropZone::attach(
        doc.clone(),
        &ctx,
        done,
        DragDropOptions::new("done").callbacks(zone_callbacks("done").on_drop(on_drop)),
    );

    let card = *sources[0].element();
    let Some(mut drag) = doc.start_native_drag(card, Point::new(50., 30.)) else {
        println!("drag did not start");
        return;
    };
    println!("classes on card: {:?}", doc.class_list(card));
    drag.move_to(Point::new(50., 80.));
    println!("classes on todo: {:?}", doc.class_list(todo));
    drag.move_to(Point::new(300., 150.));
    println!("classes on done: {:?}", doc.class_list(done));
    let outcome = drag.release();
    log::info!("native drag finished: {outcome:?}");
    println!("outcome: {outcome:?}");

    assert_eq!(outcome.dropped_on, Some(done));
    assert_eq!(doc.children(done).len(), 1);
    assert!(ctx.with_state(|s| s.is_cleared()));
}
