// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Behavior configuration: container, payload, callbacks, class names.
//!
//! ## Overview
//!
//! [`DragDropOptions`] is the full configuration of one attached behavior.
//! Both [`DragSource`](crate::source::DragSource) and
//! [`DropZone`](crate::zone::DropZone) take the same type; each reads the
//! fields that concern it.
//!
//! The plain-data part is split out as [`DragDropConfig`] so hosts can load it
//! declaratively (for example from JSON) and combine it with callbacks and a
//! payload at attach time:
//!
//! ```
//! use understory_dnd::options::{DragDropConfig, DragDropOptions, InputModes};
//!
//! let config = DragDropConfig::from_json(
//!     r#"{
//!         "container": "backlog",
//!         "attributes": { "draggingClass": "lifted shadow" },
//!         "interactive": ["button", ".no-drag"],
//!         "input": "NATIVE | TOUCH"
//!     }"#,
//! )
//! .unwrap();
//! let options: DragDropOptions<u32, ()> = DragDropOptions::from_config(config).drag_data(7);
//!
//! assert_eq!(options.container, "backlog");
//! assert_eq!(options.attributes.dragging_class.iter().collect::<Vec<_>>(), ["lifted", "shadow"]);
//! assert_eq!(options.attributes.drag_over_class.to_string(), "drag-over");
//! assert_eq!(options.input, InputModes::NATIVE | InputModes::TOUCH);
//! ```
//!
//! Callbacks are optional; an absent callback means the step that would call
//! it is skipped.

use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::state::DndState;

/// Default class applied to a source while it is being dragged.
pub const DEFAULT_DRAGGING_CLASS: &str = "dragging";

/// Default class applied to a drop zone while it is hovered.
pub const DEFAULT_DRAG_OVER_CLASS: &str = "drag-over";

/// A space separated list of class names.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ClassNames(Vec<String>);

impl ClassNames {
    /// Split `list` on ASCII whitespace, dropping empty entries.
    pub fn parse(list: &str) -> Self {
        Self(list.split_ascii_whitespace().map(String::from).collect())
    }

    /// Iterate the class names.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.iter().map(String::as_str)
    }

    /// Returns `true` if the list names no class.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for ClassNames {
    fn from(list: &str) -> Self {
        Self::parse(list)
    }
}

impl From<String> for ClassNames {
    fn from(list: String) -> Self {
        Self::parse(&list)
    }
}

impl From<ClassNames> for String {
    fn from(names: ClassNames) -> Self {
        names.0.join(" ")
    }
}

impl core::fmt::Display for ClassNames {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (i, name) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(name)?;
        }
        Ok(())
    }
}

/// Class names toggled by the behaviors.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Attributes {
    /// Applied to a source between drag start and drag end.
    pub dragging_class: ClassNames,
    /// Applied to a drop zone while it is hovered.
    pub drag_over_class: ClassNames,
}

impl Default for Attributes {
    fn default() -> Self {
        Self {
            dragging_class: ClassNames::parse(DEFAULT_DRAGGING_CLASS),
            drag_over_class: ClassNames::parse(DEFAULT_DRAG_OVER_CLASS),
        }
    }
}

bitflags::bitflags! {
    /// Input families allowed to start a drag on a source.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct InputModes: u8 {
        /// Native drag events (`dragstart` and friends).
        const NATIVE  = 0b0000_0001;
        /// Mouse and pen pointers.
        const POINTER = 0b0000_0010;
        /// Touch pointers.
        const TOUCH   = 0b0000_0100;
    }
}

impl Default for InputModes {
    fn default() -> Self {
        Self::NATIVE | Self::TOUCH
    }
}

/// Callback receiving a read-only view of the session.
pub type StateCallback<T, E> = Rc<dyn Fn(&DndState<T, E>)>;

/// Future returned by an asynchronous drop callback.
pub type DropFuture = Pin<Box<dyn Future<Output = ()>>>;

/// The drop callback, synchronous or asynchronous.
pub enum DropHandler<T, E> {
    /// Runs to completion inside the drop event.
    Immediate(StateCallback<T, E>),
    /// Returns a future that the host drives to completion.
    Deferred(Rc<dyn Fn(&DndState<T, E>) -> DropFuture>),
}

impl<T, E> Clone for DropHandler<T, E> {
    fn clone(&self) -> Self {
        match self {
            Self::Immediate(f) => Self::Immediate(f.clone()),
            Self::Deferred(f) => Self::Deferred(f.clone()),
        }
    }
}

impl<T, E> core::fmt::Debug for DropHandler<T, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Immediate(_) => f.write_str("Immediate(..)"),
            Self::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

/// Lifecycle callbacks. Each is optional.
pub struct Callbacks<T, E> {
    on_drag_start: Option<StateCallback<T, E>>,
    on_drag_enter: Option<StateCallback<T, E>>,
    on_drag_leave: Option<StateCallback<T, E>>,
    on_drag_over: Option<StateCallback<T, E>>,
    on_drop: Option<DropHandler<T, E>>,
    on_drag_end: Option<StateCallback<T, E>>,
}

impl<T, E> Default for Callbacks<T, E> {
    fn default() -> Self {
        Self {
            on_drag_start: None,
            on_drag_enter: None,
            on_drag_leave: None,
            on_drag_over: None,
            on_drop: None,
            on_drag_end: None,
        }
    }
}

impl<T, E> Clone for Callbacks<T, E> {
    fn clone(&self) -> Self {
        Self {
            on_drag_start: self.on_drag_start.clone(),
            on_drag_enter: self.on_drag_enter.clone(),
            on_drag_leave: self.on_drag_leave.clone(),
            on_drag_over: self.on_drag_over.clone(),
            on_drop: self.on_drop.clone(),
            on_drag_end: self.on_drag_end.clone(),
        }
    }
}

impl<T, E> core::fmt::Debug for Callbacks<T, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Callbacks")
            .field("on_drag_start", &self.on_drag_start.is_some())
            .field("on_drag_enter", &self.on_drag_enter.is_some())
            .field("on_drag_leave", &self.on_drag_leave.is_some())
            .field("on_drag_over", &self.on_drag_over.is_some())
            .field("on_drop", &self.on_drop)
            .field("on_drag_end", &self.on_drag_end.is_some())
            .finish()
    }
}

impl<T, E> Callbacks<T, E> {
    /// No callbacks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Called on the source after the session is published.
    pub fn on_drag_start(mut self, f: impl Fn(&DndState<T, E>) + 'static) -> Self {
        self.on_drag_start = Some(Rc::new(f));
        self
    }

    /// Called on a zone when it becomes hovered.
    pub fn on_drag_enter(mut self, f: impl Fn(&DndState<T, E>) + 'static) -> Self {
        self.on_drag_enter = Some(Rc::new(f));
        self
    }

    /// Called on a zone when it stops being hovered.
    pub fn on_drag_leave(mut self, f: impl Fn(&DndState<T, E>) + 'static) -> Self {
        self.on_drag_leave = Some(Rc::new(f));
        self
    }

    /// Called on a zone for every over event.
    pub fn on_drag_over(mut self, f: impl Fn(&DndState<T, E>) + 'static) -> Self {
        self.on_drag_over = Some(Rc::new(f));
        self
    }

    /// Called on a zone when the payload is dropped on it.
    pub fn on_drop(mut self, f: impl Fn(&DndState<T, E>) + 'static) -> Self {
        self.on_drop = Some(DropHandler::Immediate(Rc::new(f)));
        self
    }

    /// Asynchronous variant of [`Callbacks::on_drop`].
    ///
    /// The returned future is handed to the host's local executor; the session
    /// keeps its payload until the source's end handler runs.
    pub fn on_drop_async<F>(mut self, f: impl Fn(&DndState<T, E>) -> F + 'static) -> Self
    where
        T: 'static,
        E: 'static,
        F: Future<Output = ()> + 'static,
    {
        self.on_drop = Some(DropHandler::Deferred(Rc::new(
            move |state: &DndState<T, E>| -> DropFuture { Box::pin(f(state)) },
        )));
        self
    }

    /// Called on the source before the session is cleared.
    pub fn on_drag_end(mut self, f: impl Fn(&DndState<T, E>) + 'static) -> Self {
        self.on_drag_end = Some(Rc::new(f));
        self
    }

    pub(crate) fn emit_drag_start(&self, state: &DndState<T, E>) {
        if let Some(f) = &self.on_drag_start {
            f(state);
        }
    }

    pub(crate) fn emit_drag_enter(&self, state: &DndState<T, E>) {
        if let Some(f) = &self.on_drag_enter {
            f(state);
        }
    }

    pub(crate) fn emit_drag_leave(&self, state: &DndState<T, E>) {
        if let Some(f) = &self.on_drag_leave {
            f(state);
        }
    }

    pub(crate) fn emit_drag_over(&self, state: &DndState<T, E>) {
        if let Some(f) = &self.on_drag_over {
            f(state);
        }
    }

    /// Run the drop callback; an asynchronous one yields its future.
    pub(crate) fn emit_drop(&self, state: &DndState<T, E>) -> Option<DropFuture> {
        match &self.on_drop {
            Some(DropHandler::Immediate(f)) => {
                f(state);
                None
            }
            Some(DropHandler::Deferred(f)) => Some(f(state)),
            None => None,
        }
    }

    pub(crate) fn emit_drag_end(&self, state: &DndState<T, E>) {
        if let Some(f) = &self.on_drag_end {
            f(state);
        }
    }
}

/// Configuration of one attached behavior.
#[derive(Clone)]
pub struct DragDropOptions<T, E> {
    /// Payload carried when dragging from a source.
    pub drag_data: Option<T>,
    /// Logical container this element belongs to.
    pub container: String,
    /// When set, the behavior ignores interaction starts (sources) or
    /// enter/over/drop (zones).
    pub disabled: bool,
    /// Lifecycle callbacks.
    pub callbacks: Callbacks<T, E>,
    /// Class names toggled on the element.
    pub attributes: Attributes,
    /// Selectors of descendants that must not start a drag.
    pub interactive: Vec<String>,
    /// Input families allowed to start a drag.
    pub input: InputModes,
}

impl<T: core::fmt::Debug, E> core::fmt::Debug for DragDropOptions<T, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DragDropOptions")
            .field("drag_data", &self.drag_data)
            .field("container", &self.container)
            .field("disabled", &self.disabled)
            .field("callbacks", &self.callbacks)
            .field("attributes", &self.attributes)
            .field("interactive", &self.interactive)
            .field("input", &self.input)
            .finish()
    }
}

impl<T, E> DragDropOptions<T, E> {
    /// Options for `container` with every other field at its default.
    pub fn new(container: impl Into<String>) -> Self {
        Self {
            drag_data: None,
            container: container.into(),
            disabled: false,
            callbacks: Callbacks::new(),
            attributes: Attributes::default(),
            interactive: Vec::new(),
            input: InputModes::default(),
        }
    }

    /// Options from a declarative config, without payload or callbacks.
    pub fn from_config(config: DragDropConfig) -> Self {
        Self {
            drag_data: None,
            container: config.container,
            disabled: config.disabled,
            callbacks: Callbacks::new(),
            attributes: config.attributes,
            interactive: config.interactive,
            input: config.input,
        }
    }

    /// The plain-data part of these options.
    pub fn config(&self) -> DragDropConfig {
        DragDropConfig {
            container: self.container.clone(),
            disabled: self.disabled,
            attributes: self.attributes.clone(),
            interactive: self.interactive.clone(),
            input: self.input,
        }
    }

    /// Set the payload.
    pub fn drag_data(mut self, data: T) -> Self {
        self.drag_data = Some(data);
        self
    }

    /// Set the disabled flag.
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Set the callbacks.
    pub fn callbacks(mut self, callbacks: Callbacks<T, E>) -> Self {
        self.callbacks = callbacks;
        self
    }

    /// Set both class lists.
    pub fn attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Set the class list applied while dragging.
    pub fn dragging_class(mut self, list: &str) -> Self {
        self.attributes.dragging_class = ClassNames::parse(list);
        self
    }

    /// Set the class list applied while hovered.
    pub fn drag_over_class(mut self, list: &str) -> Self {
        self.attributes.drag_over_class = ClassNames::parse(list);
        self
    }

    /// Set the selectors of descendants that must not start a drag.
    pub fn interactive<I, S>(mut self, selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.interactive = selectors.into_iter().map(Into::into).collect();
        self
    }

    /// Set the input families allowed to start a drag.
    pub fn input(mut self, modes: InputModes) -> Self {
        self.input = modes;
        self
    }

    /// Value of the element's native draggable flag under these options.
    pub fn native_draggable(&self) -> bool {
        !self.disabled && self.input.contains(InputModes::NATIVE)
    }
}

/// Errors raised while loading a [`DragDropConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The text is not a valid config document.
    #[error("invalid drag-and-drop config: {0}")]
    Json(#[from] serde_json::Error),
    /// `container` is empty or whitespace.
    #[error("drag-and-drop config is missing a container identifier")]
    MissingContainer,
}

/// Plain-data part of [`DragDropOptions`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragDropConfig {
    /// Logical container identifier (required).
    pub container: String,
    /// Disabled flag.
    #[serde(default)]
    pub disabled: bool,
    /// Class names.
    #[serde(default)]
    pub attributes: Attributes,
    /// Selectors of descendants that must not start a drag.
    #[serde(default)]
    pub interactive: Vec<String>,
    /// Input families allowed to start a drag.
    #[serde(default)]
    pub input: InputModes,
}

impl DragDropConfig {
    /// Parse and validate a JSON config document.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the config names a container.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.container.trim().is_empty() {
            return Err(ConfigError::MissingContainer);
        }
        Ok(())
    }
}
