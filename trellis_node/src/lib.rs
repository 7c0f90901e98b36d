// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Node: the declarative component tree that Trellis decorates.
//!
//! This crate models render output the way declarative UI libraries produce it:
//!
//! - [`Node`]: one render output value. Nothing, a leaf (text, number, opaque
//!   payload), an ordered list, an [`Element`], or a [`Portal`].
//! - [`Element`]: an immutable snapshot of a tag, fragment or component
//!   instantiation, with [`Props`] (attributes plus children), an optional list
//!   [`Key`] and an optional imperative [`Binding`].
//! - [`Component`]: a cheap, identity-compared handle over a [`ComponentKind`]:
//!   a plain render function, a reference-forwarding or memoization wrapper
//!   around another component, or a traditional stateful component. The shape is
//!   decided when the component is built and matched on everywhere else.
//! - [`DecorationMarker`]: metadata a decorated component carries back to the
//!   component it was produced from.
//!
//! Render functions return [`RenderResult`]; failures are [`RenderError`]s and
//! propagate to whoever invoked the render.
//!
//! ## Minimal example
//!
//! ```rust
//! use trellis_node::{Component, Element, Node, render};
//!
//! let hello = Component::function("Hello", |props, _| {
//!     Ok(Element::tag("p").with_children(props.children.clone()).into())
//! });
//! let tree: Node = Element::component(&hello).with_child("world").into();
//! let html = render::to_markup(&render::expand(&tree).unwrap());
//! assert_eq!(html, "<p>world</p>");
//! ```
//!
//! The [`render`] module is a reference renderer for tests and demos, not a
//! host runtime: it performs no reconciliation, memoization or state.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod component;
mod element;
mod error;
mod node;
pub mod render;
mod value;

pub use component::{
    CompareFn, Component, ComponentId, ComponentKind, DecorationMarker, Markers, RenderFn,
    StatefulRender,
};
pub use element::{Binding, Element, ElementFlags, ElementType, Key, MountTarget, Portal, Props};
pub use error::{RenderError, RenderResult};
pub use node::{Node, Opaque};
pub use value::{Attrs, Func, Value};
