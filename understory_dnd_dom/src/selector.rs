// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compound selectors: enough of the selector grammar for interactive
//! exclusions and queries.
//!
//! Supported: type (`button`), universal (`*`), id (`#save`), class
//! (`.no-drag`), attribute presence (`[contenteditable]`) and equality
//! (`[type=checkbox]`, `[data-x="a b"]`), compounds of those
//! (`input.small[type=text]`), and comma separated lists. Combinators
//! (descendant, child, sibling) and pseudo-classes are rejected.
//!
//! ```
//! use understory_dnd_dom::{ElementData, Selector};
//!
//! let sel: Selector = "button, [contenteditable], input.small".parse().unwrap();
//! assert!(sel.matches(&ElementData::new("button")));
//! assert!(sel.matches(&ElementData::new("div").with_attr("contenteditable", "true")));
//! assert!(!sel.matches(&ElementData::new("input")));
//! ```

use core::str::FromStr;

use thiserror::Error;

use crate::types::ElementData;

/// Errors raised while parsing a selector.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SelectorError {
    /// The selector, or one entry of a list, is empty.
    #[error("empty selector")]
    Empty,
    /// A character that cannot start or continue a simple selector.
    #[error("unexpected `{ch}` at offset {offset}")]
    Unexpected {
        /// Offending character.
        ch: char,
        /// Byte offset in the full selector text.
        offset: usize,
    },
    /// A combinator or pseudo-class, which this grammar does not support.
    #[error("unsupported selector syntax at offset {offset}")]
    Unsupported {
        /// Byte offset in the full selector text.
        offset: usize,
    },
    /// A `[` without its `]`, or a quoted value without its closing quote.
    #[error("unterminated attribute selector starting at offset {offset}")]
    Unterminated {
        /// Byte offset of the opening bracket.
        offset: usize,
    },
    /// `#`, `.` or `[` not followed by a name.
    #[error("missing name at offset {offset}")]
    MissingName {
        /// Byte offset where the name was expected.
        offset: usize,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum AttrTest {
    Present(String),
    Equals(String, String),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrTest>,
}

impl Compound {
    fn matches(&self, el: &ElementData) -> bool {
        self.tag.as_ref().is_none_or(|t| *t == el.tag)
            && self.id.as_ref().is_none_or(|id| el.id.as_ref() == Some(id))
            && self.classes.iter().all(|c| el.has_class(c))
            && self.attrs.iter().all(|a| match a {
                AttrTest::Present(name) => attr(el, name).is_some(),
                AttrTest::Equals(name, value) => attr(el, name) == Some(value.as_str()),
            })
    }
}

fn attr<'a>(el: &'a ElementData, name: &str) -> Option<&'a str> {
    match name {
        "id" => el.id.as_deref(),
        "draggable" => el.draggable.then_some("true"),
        _ => el.attributes.get(name).map(String::as_str),
    }
}

/// A parsed selector list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selector {
    alternatives: Vec<Compound>,
}

impl Selector {
    /// Parse `text`.
    pub fn parse(text: &str) -> Result<Self, SelectorError> {
        let mut alternatives = Vec::new();
        for (offset, part) in split_list(text) {
            let lead = part.len() - part.trim_start().len();
            let trimmed = part.trim();
            if trimmed.is_empty() {
                return Err(SelectorError::Empty);
            }
            alternatives.push(parse_compound(trimmed, offset + lead)?);
        }
        Ok(Self { alternatives })
    }

    /// Returns `true` if any entry of the list matches `el`.
    pub fn matches(&self, el: &ElementData) -> bool {
        self.alternatives.iter().any(|c| c.matches(el))
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Split a selector list on the commas outside brackets and quotes, keeping
/// each entry's byte offset.
fn split_list(text: &str) -> Vec<(usize, &str)> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_brackets = false;
    let mut quote = None;
    for (i, c) in text.char_indices() {
        match (quote, c) {
            (Some(q), _) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') if in_brackets => quote = Some(c),
            (None, '[') => in_brackets = true,
            (None, ']') => in_brackets = false,
            (None, ',') if !in_brackets => {
                parts.push((start, &text[start..i]));
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push((start, &text[start..]));
    parts
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

struct Cursor<'a> {
    text: &'a str,
    pos: usize,
    base: usize,
}

impl Cursor<'_> {
    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn at(&self) -> usize {
        self.base + self.pos
    }

    fn name(&mut self) -> Result<String, SelectorError> {
        let start = self.pos;
        while self.peek().is_some_and(is_name_char) {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(SelectorError::MissingName { offset: self.at() });
        }
        Ok(self.text[start..self.pos].to_string())
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn attribute(&mut self) -> Result<AttrTest, SelectorError> {
        let open = self.at();
        self.pos += 1; // '['
        self.skip_ws();
        let name = self.name()?;
        self.skip_ws();
        match self.peek() {
            Some(']') => {
                self.pos += 1;
                Ok(AttrTest::Present(name))
            }
            Some('=') => {
                self.pos += 1;
                self.skip_ws();
                let value = match self.peek() {
                    Some(q @ ('"' | '\'')) => {
                        self.pos += 1;
                        let rest = &self.text[self.pos..];
                        let end = rest
                            .find(q)
                            .ok_or(SelectorError::Unterminated { offset: open })?;
                        let value = rest[..end].to_string();
                        self.pos += end + 1;
                        value
                    }
                    _ => self.name()?,
                };
                self.skip_ws();
                if self.peek() != Some(']') {
                    return Err(SelectorError::Unterminated { offset: open });
                }
                self.pos += 1;
                Ok(AttrTest::Equals(name, value))
            }
            None => Err(SelectorError::Unterminated { offset: open }),
            Some(ch) => Err(SelectorError::Unexpected {
                ch,
                offset: self.at(),
            }),
        }
    }
}

fn parse_compound(text: &str, base: usize) -> Result<Compound, SelectorError> {
    let mut cur = Cursor { text, pos: 0, base };
    let mut out = Compound::default();
    match cur.peek() {
        Some('*') => cur.pos += 1,
        Some(c) if is_name_char(c) => out.tag = Some(cur.name()?.to_ascii_lowercase()),
        _ => {}
    }
    while let Some(c) = cur.peek() {
        match c {
            '#' => {
                cur.pos += 1;
                out.id = Some(cur.name()?);
            }
            '.' => {
                cur.pos += 1;
                out.classes.push(cur.name()?);
            }
            '[' => out.attrs.push(cur.attribute()?),
            ' ' | '\t' | '\n' | '>' | '+' | '~' | ':' => {
                return Err(SelectorError::Unsupported { offset: cur.at() });
            }
            ch => {
                return Err(SelectorError::Unexpected {
                    ch,
                    offset: cur.at(),
                });
            }
        }
    }
    Ok(out)
}
