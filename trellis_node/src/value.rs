// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Attribute values and the ordered attribute map.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;

use crate::Node;

/// A dynamically typed attribute value.
///
/// `Undefined` is a real value: an attribute that is present with an
/// `Undefined` value is distinct from an absent attribute. See
/// [`Attrs::contains`].
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    /// Present but without a value.
    #[default]
    Undefined,
    /// Explicit null.
    Null,
    /// Boolean.
    Bool(bool),
    /// Number.
    Number(f64),
    /// String.
    Str(Rc<str>),
    /// Ordered list of values.
    List(Vec<Value>),
    /// Nested attribute map.
    Attrs(Attrs),
    /// A render output node.
    Node(Node),
    /// A callable.
    Func(Func),
}

impl Value {
    /// Truthiness as understood by markup authors: `Undefined`, `Null`,
    /// `false`, `0`, `NaN` and the empty string are falsy, everything else is
    /// truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Undefined | Self::Null => false,
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::Str(s) => !s.is_empty(),
            Self::List(_) | Self::Attrs(_) | Self::Node(_) | Self::Func(_) => true,
        }
    }

    /// Returns the string payload, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the boolean payload, if any.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the callable payload, if any.
    pub fn as_func(&self) -> Option<&Func> {
        match self {
            Self::Func(f) => Some(f),
            _ => None,
        }
    }

    /// Returns the node payload, if any.
    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Self::Node(n) => Some(n),
            _ => None,
        }
    }

    /// Returns the attribute map payload, if any.
    pub fn as_attrs(&self) -> Option<&Attrs> {
        match self {
            Self::Attrs(a) => Some(a),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(n.into())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s.into())
    }
}

impl From<Node> for Value {
    fn from(n: Node) -> Self {
        Self::Node(n)
    }
}

impl From<Attrs> for Value {
    fn from(a: Attrs) -> Self {
        Self::Attrs(a)
    }
}

impl From<Func> for Value {
    fn from(f: Func) -> Self {
        Self::Func(f)
    }
}

impl From<Vec<Self>> for Value {
    fn from(items: Vec<Self>) -> Self {
        Self::List(items)
    }
}

/// A shared callable stored in an attribute.
///
/// Two `Func`s are equal only if they are the same allocation.
#[derive(Clone)]
pub struct Func(Rc<dyn Fn(&[Value]) -> Value>);

impl Func {
    /// Wrap a closure.
    pub fn new(f: impl Fn(&[Value]) -> Value + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Invoke the callable.
    pub fn call(&self, args: &[Value]) -> Value {
        (self.0)(args)
    }
}

impl PartialEq for Func {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl core::fmt::Debug for Func {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Func(..)")
    }
}

/// Ordered attribute map.
///
/// Insertion order is preserved, and replacing an existing attribute keeps its
/// position. Lookups are linear; elements carry a handful of attributes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Attrs {
    entries: Vec<(Rc<str>, Value)>,
}

impl Attrs {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no attributes.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if `name` is present, whatever its value.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(k, _)| &**k == name)
    }

    /// Value of `name`, if present.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find_map(|(k, v)| (&**k == name).then_some(v))
    }

    /// Insert or replace `name`, returning the previous value.
    pub fn insert(&mut self, name: impl Into<Rc<str>>, value: impl Into<Value>) -> Option<Value> {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some((_, slot)) => Some(core::mem::replace(slot, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    /// Remove `name`, returning its value if it was present.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let idx = self.entries.iter().position(|(k, _)| &**k == name)?;
        Some(self.entries.remove(idx).1)
    }

    /// Chainable [`Attrs::insert`].
    #[must_use]
    pub fn with(mut self, name: impl Into<Rc<str>>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Iterate over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (&**k, v))
    }
}

impl<K: Into<Rc<str>>, V: Into<Value>> FromIterator<(K, V)> for Attrs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Self::new();
        for (k, v) in iter {
            attrs.insert(k, v);
        }
        attrs
    }
}
