// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Elements, their props, list keys and imperative bindings.

use alloc::rc::Rc;
use alloc::string::ToString;
use alloc::vec::Vec;
use core::cell::RefCell;

use crate::{Attrs, Component, Node, Value};

/// Stable identity of an item among its siblings.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(Rc<str>);

impl Key {
    /// The key as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Self(s.into())
    }
}

impl From<alloc::string::String> for Key {
    fn from(s: alloc::string::String) -> Self {
        Self(s.into())
    }
}

impl From<usize> for Key {
    fn from(n: usize) -> Self {
        Self(n.to_string().into())
    }
}

impl core::fmt::Display for Key {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Imperative binding target ("ref") attached to an element.
///
/// Bindings compare by identity.
#[derive(Clone, Default)]
pub struct Binding(Rc<RefCell<Value>>);

impl Binding {
    /// A fresh, unset binding.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value in the binding.
    pub fn set(&self, value: impl Into<Value>) {
        *self.0.borrow_mut() = value.into();
    }

    /// Current value of the binding.
    pub fn get(&self) -> Value {
        self.0.borrow().clone()
    }
}

impl PartialEq for Binding {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl core::fmt::Debug for Binding {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("Binding").field(&self.0.borrow()).finish()
    }
}

/// Properties of an element: attributes plus children.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Props {
    /// Attributes, including directive attributes until a policy strips them.
    pub attrs: Attrs,
    /// Child nodes.
    pub children: Vec<Node>,
}

impl Props {
    /// Empty props.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attribute value, if present.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attrs.get(name)
    }
}

/// What an element instantiates.
#[derive(Clone, Debug, PartialEq)]
pub enum ElementType {
    /// A literal markup tag such as `"div"`.
    Tag(Rc<str>),
    /// A grouping element that renders only its children.
    Fragment,
    /// A component.
    Component(Component),
}

impl ElementType {
    /// The component, if this is a component element.
    pub fn component(&self) -> Option<&Component> {
        match self {
            Self::Component(c) => Some(c),
            Self::Tag(_) | Self::Fragment => None,
        }
    }

    /// The tag name, if this is a markup element.
    pub fn tag(&self) -> Option<&str> {
        match self {
            Self::Tag(t) => Some(t),
            Self::Component(_) | Self::Fragment => None,
        }
    }
}

bitflags::bitflags! {
    /// Host bookkeeping flags on an element.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ElementFlags: u8 {
        /// Sibling keys were already validated; hosts skip their key
        /// uniqueness warning for this element.
        const KEY_VALIDATED = 0b0000_0001;
    }
}

/// An immutable snapshot of an element.
///
/// Decoration never mutates an element in place; it builds new ones.
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    /// Tag, fragment or component.
    pub ty: ElementType,
    /// Attributes and children.
    pub props: Props,
    /// Optional list key.
    pub key: Option<Key>,
    /// Optional imperative binding.
    pub binding: Option<Binding>,
    /// Host bookkeeping flags.
    pub flags: ElementFlags,
}

impl Element {
    /// An element of the given type with no props.
    pub fn new(ty: ElementType) -> Self {
        Self {
            ty,
            props: Props::new(),
            key: None,
            binding: None,
            flags: ElementFlags::empty(),
        }
    }

    /// A markup element.
    pub fn tag(name: &str) -> Self {
        Self::new(ElementType::Tag(name.into()))
    }

    /// A fragment.
    pub fn fragment() -> Self {
        Self::new(ElementType::Fragment)
    }

    /// An element instantiating `component`.
    pub fn component(component: &Component) -> Self {
        Self::new(ElementType::Component(component.clone()))
    }

    /// Set an attribute.
    #[must_use]
    pub fn with_attr(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.props.attrs.insert(name, value);
        self
    }

    /// Append a child.
    #[must_use]
    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.props.children.push(child.into());
        self
    }

    /// Append several children.
    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.props.children.extend(children);
        self
    }

    /// Set the list key.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<Key>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Set the imperative binding.
    #[must_use]
    pub fn with_binding(mut self, binding: &Binding) -> Self {
        self.binding = Some(binding.clone());
        self
    }

    /// Attribute value, if present.
    pub fn attr(&self, name: &str) -> Option<&Value> {
        self.props.attrs.get(name)
    }

    /// Child nodes.
    pub fn children(&self) -> &[Node] {
        &self.props.children
    }
}

/// Where a portal's content is mounted, outside the parent hierarchy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MountTarget(Rc<str>);

impl MountTarget {
    /// A mount target identified by name.
    pub fn new(name: &str) -> Self {
        Self(name.into())
    }

    /// The target's name.
    pub fn name(&self) -> &str {
        &self.0
    }
}

/// Content rendered into an external mount target.
#[derive(Clone, Debug, PartialEq)]
pub struct Portal {
    /// Portal content.
    pub content: Node,
    /// Mount target.
    pub target: MountTarget,
    /// Optional list key.
    pub key: Option<Key>,
}
