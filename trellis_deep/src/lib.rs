// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Deep: decorate a component and everything it renders.
//!
//! ## Overview
//!
//! Wrapping a component normally only affects the children passed to it. A
//! [`Policy`] applied with [`Registry::wrap`] instead reaches every element
//! the component renders, including elements rendered by components nested at
//! any depth: each nested component met while walking the output is itself
//! wrapped with the same policy, so the decoration spreads as the tree
//! renders.
//!
//! ## Pieces
//!
//! - [`classify`] and [`rewrap`] look through forward-ref and memo wrappers
//!   to the render function underneath and restore them afterwards,
//!   comparators included. Stateful components are never decorated.
//! - [`Registry`] owns the identity cache. For a fixed component and policy
//!   id decoration happens once; later calls return the same component.
//! - [`extract`] implements the directive protocol: declared `x-` attributes
//!   are captured by presence (not truthiness) and always stripped.
//! - [`Registry::walk`] rebuilds a render output under a policy. Lists keep
//!   their order and length, portals keep their target and key, leaves pass
//!   through, and elements keep their key and binding. A [`KeyStrategy`]
//!   decides how rewritten children are laid out.
//! - [`ReloadBridge`] replays policy history onto freshly loaded component
//!   bodies during live reload.
//!
//! ## Re-entrancy
//!
//! Every decorated component carries a [`DecorationMarker`] chain back to the
//! component it came from. The walker skips elements whose component is
//! already decorated under the current policy id, and [`Registry::wrap`]
//! returns such components as they are. This is what keeps composed policies
//! and re-walked output from recursing forever.
//!
//! ## Example
//!
//! ```rust
//! use std::rc::Rc;
//! use trellis_deep::{Policy, Registry};
//! use trellis_node::{Component, Element, render};
//!
//! let loud = Rc::new(
//!     Policy::new("loud")
//!         .with_directive("x-loud")
//!         .with_map_element(|mut el, _| {
//!             el.props.attrs.insert("class", "loud");
//!             Ok(el.into())
//!         }),
//! );
//!
//! let label = Component::function("Label", |_, _| {
//!     Ok(Element::tag("b").with_attr("x-loud", true).with_child("hi").into())
//! });
//! let card = {
//!     let label = label.clone();
//!     Component::function("Card", move |_, _| {
//!         Ok(Element::tag("div").with_child(Element::component(&label)).into())
//!     })
//! };
//!
//! let registry = Registry::new();
//! let decorated = registry.wrap(&card, &loud);
//! let out = render::expand(&Element::component(&decorated).into()).unwrap();
//! assert_eq!(render::to_markup(&out), "<div><b class=\"loud\">hi</b></div>");
//! ```
//!
//! Everything is single-threaded: components, registries and bridges are
//! `Rc`-based and use `RefCell` internally, never holding a borrow across a
//! policy callback.
//!
//! [`DecorationMarker`]: trellis_node::DecorationMarker
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod directive;
mod keys;
mod policy;
mod registry;
mod reload;
mod shape;
mod walk;
mod wrap;

pub use directive::{Extracted, extract};
pub use policy::{
    Activation, Directive, DirectiveNames, FilterFn, InvokeRenderFn, KeyStrategy, MapChildrenFn,
    MapComponentFn, MapElementFn, MapNodeFn, Policy,
};
pub use registry::{DecorationRecord, Registry};
pub use reload::{ReloadBridge, ReloadHost};
pub use shape::{Classified, WrapperShape, WrapperStack, classify, rewrap};
