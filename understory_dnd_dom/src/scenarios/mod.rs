// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end drag scenarios on a two-list board.
//!
//! ```text
//! body (0,0)-(400,300)
//! ├── ul#todo (0,0)-(190,300)
//! │   ├── li.card (10,10)-(180,50)      └── button (140,15)-(175,45)
//! │   ├── li.card (10,60)-(180,100)     └── button
//! │   └── li.card (10,110)-(180,150)    └── button
//! └── ul#done (210,0)-(400,300)
//! ```

mod lifecycle;
mod native;
mod pointer;

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use understory_dnd::{Callbacks, DndContext, DndState, DragDropOptions, DragSource, DropZone};

use crate::{Document, ElementData, NodeId};

pub(crate) type Log = Rc<RefCell<Vec<String>>>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct Card {
    pub(crate) id: u32,
    pub(crate) title: String,
}

pub(crate) fn card(id: u32) -> Card {
    Card {
        id,
        title: format!("task {id}"),
    }
}

pub(crate) struct Board {
    pub(crate) doc: Rc<Document>,
    pub(crate) ctx: DndContext<Card, NodeId>,
    pub(crate) todo: NodeId,
    pub(crate) done: NodeId,
    pub(crate) cards: Vec<NodeId>,
    pub(crate) handles: Vec<NodeId>,
    pub(crate) log: Log,
}

impl Board {
    pub(crate) fn new() -> Self {
        let doc = Document::new();
        let body = doc.insert(
            None,
            ElementData::new("body").with_bounds(Rect::new(0., 0., 400., 300.)),
        );
        let todo = doc.insert(
            Some(body),
            ElementData::new("ul")
                .with_id("todo")
                .with_bounds(Rect::new(0., 0., 190., 300.)),
        );
        let done = doc.insert(
            Some(body),
            ElementData::new("ul")
                .with_id("done")
                .with_bounds(Rect::new(210., 0., 400., 300.)),
        );
        let mut cards = Vec::new();
        let mut handles = Vec::new();
        for i in 0..3_u32 {
            let top = 10. + 50. * f64::from(i);
            let li = doc.insert(
                Some(todo),
                ElementData::new("li")
                    .with_class("card")
                    .with_bounds(Rect::new(10., top, 180., top + 40.)),
            );
            let button = doc.insert(
                Some(li),
                ElementData::new("button").with_bounds(Rect::new(140., top + 5., 175., top + 35.)),
            );
            cards.push(li);
            handles.push(button);
        }
        Self {
            doc,
            ctx: DndContext::new(),
            todo,
            done,
            cards,
            handles,
            log: Log::default(),
        }
    }

    /// Callbacks that append `"{who}:{event}"` to the log.
    ///
    /// They also check the state each callback is handed: every source
    /// drags out of "todo", a zone named `who` is the target while it is
    /// entered, and the session is still live when the source ends.
    pub(crate) fn callbacks(&self, who: &str) -> Callbacks<Card, NodeId> {
        let entry = |event: &'static str| {
            let log = self.log.clone();
            let who = who.to_string();
            move |s: &DndState<Card, NodeId>| {
                assert!(s.holds_invariants(), "{who}:{event} saw {s:?}");
                log.borrow_mut().push(format!("{who}:{event}"));
            }
        };
        let (start, enter, end) = (entry("start"), entry("enter"), entry("end"));
        let log = self.log.clone();
        let zone = who.to_string();
        let dropper = who.to_string();
        Callbacks::new()
            .on_drag_start(move |s: &DndState<Card, NodeId>| {
                assert!(s.is_dragging);
                assert_eq!(s.source_container, "todo");
                start(s);
            })
            .on_drag_enter(move |s: &DndState<Card, NodeId>| {
                assert_eq!(s.target_container.as_deref(), Some(zone.as_str()));
                enter(s);
            })
            .on_drag_over(entry("over"))
            .on_drag_leave(entry("leave"))
            .on_drop(move |s: &DndState<Card, NodeId>| {
                let id = s.dragged_item.as_ref().map(|c| c.id);
                log.borrow_mut().push(format!("{dropper}:drop {id:?}"));
            })
            .on_drag_end(move |s: &DndState<Card, NodeId>| {
                assert!(s.is_dragging, "session cleared before the end callback");
                end(s);
            })
    }

    /// Options for card `i`: its payload, logging callbacks, buttons excluded.
    pub(crate) fn source_options(&self, i: usize) -> DragDropOptions<Card, NodeId> {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "The board has three cards."
        )]
        let id = i as u32;
        DragDropOptions::new("todo")
            .drag_data(card(id))
            .callbacks(self.callbacks(&format!("card{i}")))
            .interactive(["button"])
    }

    pub(crate) fn source(&self, i: usize) -> DragSource<Document, Card> {
        self.source_with(i, self.source_options(i))
    }

    pub(crate) fn source_with(
        &self,
        i: usize,
        options: DragDropOptions<Card, NodeId>,
    ) -> DragSource<Document, Card> {
        DragSource::attach(self.doc.clone(), &self.ctx, self.cards[i], options)
    }

    pub(crate) fn zone_options(&self, container: &str) -> DragDropOptions<Card, NodeId> {
        DragDropOptions::new(container).callbacks(self.callbacks(container))
    }

    pub(crate) fn zone(&self, element: NodeId, container: &str) -> DropZone<Document, Card> {
        DropZone::attach(
            self.doc.clone(),
            &self.ctx,
            element,
            self.zone_options(container),
        )
    }

    pub(crate) fn center(&self, node: NodeId) -> Point {
        self.doc
            .element(node)
            .map(|d| d.bounds.center())
            .unwrap_or_default()
    }

    /// Logged callbacks, without the repeating `over` entries.
    pub(crate) fn events(&self) -> Vec<String> {
        self.log
            .borrow()
            .iter()
            .filter(|e| !e.ends_with(":over"))
            .cloned()
            .collect()
    }

    pub(crate) fn count(&self, entry: &str) -> usize {
        self.log.borrow().iter().filter(|e| *e == entry).count()
    }

    pub(crate) fn is_idle(&self) -> bool {
        self.ctx.with_state(|s| s.is_cleared())
    }
}
