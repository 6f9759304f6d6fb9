// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Native transfer channel: the data carried alongside a native drag.
//!
//! ## Overview
//!
//! A [`DataTransfer`] maps format strings to text items and records the allowed
//! and chosen effects. The drag source writes its payload as the JSON text of
//! `drag_data` under [`PAYLOAD_FORMAT`]; the drop zone reads it back on drop.
//!
//! ```
//! use understory_dnd::transfer::{DataTransfer, PAYLOAD_FORMAT};
//!
//! let mut dt = DataTransfer::new();
//! dt.write_payload(&serde_json::json!({ "id": 7 })).unwrap();
//! assert_eq!(dt.get_data(PAYLOAD_FORMAT), Some(r#"{"id":7}"#));
//!
//! let back: Option<serde_json::Value> = dt.read_payload().unwrap();
//! assert_eq!(back, Some(serde_json::json!({ "id": 7 })));
//! ```

use std::collections::BTreeMap;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Format under which the serialized payload travels.
pub const PAYLOAD_FORMAT: &str = "text/plain";

/// Effects a drag source permits.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum EffectAllowed {
    /// Nothing was declared.
    #[default]
    Uninitialized,
    /// No drop is allowed.
    None,
    /// Copy only.
    Copy,
    /// Link only.
    Link,
    /// Move only.
    Move,
    /// Copy or move.
    CopyMove,
    /// Any effect.
    All,
}

/// Effect chosen by the drop target.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DropEffect {
    /// No drop.
    #[default]
    None,
    /// Copy the payload.
    Copy,
    /// Link to the payload.
    Link,
    /// Move the payload.
    Move,
}

/// Errors raised by the transfer channel.
#[derive(Debug, Error)]
pub enum TransferError {
    /// The payload could not be serialized to JSON.
    #[error("failed to serialize drag payload: {0}")]
    Serialize(#[source] serde_json::Error),
    /// The transfer item is not valid JSON for the expected payload type.
    #[error("malformed drag payload in `{format}`: {source}")]
    Parse {
        /// Format the item was read from.
        format: &'static str,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

/// Serialize a payload to the text carried by the transfer channel.
pub fn encode_payload<T: Serialize + ?Sized>(value: &T) -> Result<String, TransferError> {
    serde_json::to_string(value).map_err(TransferError::Serialize)
}

/// Parse the text carried by the transfer channel.
pub fn decode_payload<T: DeserializeOwned>(text: &str) -> Result<T, TransferError> {
    serde_json::from_str(text).map_err(|source| TransferError::Parse {
        format: PAYLOAD_FORMAT,
        source,
    })
}

/// Items and effects carried by a native drag.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DataTransfer {
    items: BTreeMap<String, String>,
    /// Effects permitted by the source.
    pub effect_allowed: EffectAllowed,
    /// Effect chosen by the current target.
    pub drop_effect: DropEffect,
}

impl DataTransfer {
    /// Create an empty transfer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `data` under `format`, replacing any previous item.
    pub fn set_data(&mut self, format: &str, data: &str) {
        self.items.insert(format.into(), data.into());
    }

    /// Item stored under `format`, if any.
    pub fn get_data(&self, format: &str) -> Option<&str> {
        self.items.get(format).map(String::as_str)
    }

    /// Remove every item.
    pub fn clear_data(&mut self) {
        self.items.clear();
    }

    /// Formats currently carried, in sorted order.
    pub fn types(&self) -> impl Iterator<Item = &str> + '_ {
        self.items.keys().map(String::as_str)
    }

    /// A copy with the same formats and effects but empty item contents.
    ///
    /// This is what enter/over/leave handlers of a native drag get to see:
    /// they may inspect which formats are offered but not read them.
    pub fn protected_view(&self) -> Self {
        Self {
            items: self
                .items
                .keys()
                .map(|k| (k.clone(), String::new()))
                .collect(),
            effect_allowed: self.effect_allowed,
            drop_effect: self.drop_effect,
        }
    }

    /// Serialize `value` and store it under [`PAYLOAD_FORMAT`].
    pub fn write_payload<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), TransferError> {
        let text = encode_payload(value)?;
        self.set_data(PAYLOAD_FORMAT, &text);
        Ok(())
    }

    /// Parse the item under [`PAYLOAD_FORMAT`].
    ///
    /// Returns `Ok(None)` when no such item is carried.
    pub fn read_payload<T: DeserializeOwned>(&self) -> Result<Option<T>, TransferError> {
        self.get_data(PAYLOAD_FORMAT)
            .map(decode_payload::<T>)
            .transpose()
    }
}
