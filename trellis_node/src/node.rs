// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render output nodes.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;

use crate::{Element, Key, Portal};

/// A foreign payload carried through the tree untouched, unless a policy maps
/// it into something renderable.
#[derive(Clone)]
pub struct Opaque(Rc<dyn Any>);

impl Opaque {
    /// Wrap a value.
    pub fn new<T: Any>(value: T) -> Self {
        Self(Rc::new(value))
    }

    /// Borrow the payload as `T`, if it is one.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }
}

impl PartialEq for Opaque {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl core::fmt::Debug for Opaque {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Opaque(..)")
    }
}

/// A render output value.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Node {
    /// Nothing.
    #[default]
    Empty,
    /// Text.
    Text(Rc<str>),
    /// Number.
    Number(f64),
    /// Foreign payload.
    Opaque(Opaque),
    /// Ordered sequence of nodes.
    List(Vec<Node>),
    /// Element snapshot.
    Element(Rc<Element>),
    /// Portal into an external mount target.
    Portal(Rc<Portal>),
}

impl Node {
    /// Returns `true` for [`Node::Empty`].
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// The element, if this node is one.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(e) => Some(e),
            _ => None,
        }
    }

    /// List key of an element or portal node.
    pub fn key(&self) -> Option<&Key> {
        match self {
            Self::Element(e) => e.key.as_ref(),
            Self::Portal(p) => p.key.as_ref(),
            _ => None,
        }
    }

    /// Leaf nodes in document order, with all nesting of lists removed and
    /// empty nodes skipped.
    pub fn flatten(&self) -> Vec<Self> {
        let mut out = Vec::new();
        self.flatten_into(&mut out);
        out
    }

    fn flatten_into(&self, out: &mut Vec<Self>) {
        match self {
            Self::Empty => {}
            Self::List(items) => items.iter().for_each(|n| n.flatten_into(out)),
            other => out.push(other.clone()),
        }
    }
}

impl From<Element> for Node {
    fn from(e: Element) -> Self {
        Self::Element(Rc::new(e))
    }
}

impl From<Portal> for Node {
    fn from(p: Portal) -> Self {
        Self::Portal(Rc::new(p))
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Self::Text(s.into())
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Self::Text(s.into())
    }
}

impl From<f64> for Node {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<Vec<Self>> for Node {
    fn from(items: Vec<Self>) -> Self {
        Self::List(items)
    }
}
