// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Directives: ready-made policies for [`trellis_deep`].
//!
//! Each module builds a [`Policy`](trellis_deep::Policy) from an options
//! struct with `policy(&options)` and offers `apply(&registry, &component,
//! &options)` as a shortcut for [`Registry::wrap`](trellis_deep::Registry::wrap).
//!
//! | Module | Directive | Default id |
//! |---|---|---|
//! | [`if_else`] | `x-if`, `x-else-if`, `x-else` | `ifElse` |
//! | [`classes`] | `x-tw`, `x-clsx` | `tw`, `clsx` |
//! | [`transpose`] | `x-transpose` (plus an optional custom one) | `transpose` |
//! | [`on_children`] | `x-on-children` | `onChildren` |
//! | [`href`] | none, acts on `<a href>` | `hrefHandler` |
//! | [`hoc`] | none, maps components | `hoc` |
//! | [`error_fallback`] | `x-error-fallback` | `errorFallback` |
//!
//! Policies compose: apply several to the same root and each reaches the
//! whole tree. The id is what keeps them apart, so two instances of the same
//! plug-in with different options need different ids.
//!
//! ```rust
//! use trellis_deep::Registry;
//! use trellis_directives::{classes, if_else};
//! use trellis_node::{Component, Element, render};
//!
//! let badge = Component::function("Badge", |_, _| {
//!     Ok(Element::tag("span")
//!         .with_child(Element::tag("b").with_attr("x-if", false).with_child("new"))
//!         .with_child(Element::tag("i").with_attr("x-else", true).with_attr("x-tw", "muted"))
//!         .into())
//! });
//!
//! let registry = Registry::new();
//! let root = registry.root(
//!     vec![Element::component(&badge).into()],
//!     &[
//!         if_else::policy(&if_else::IfElseOptions::default()),
//!         classes::policy(&classes::ClassOptions::tw()),
//!     ],
//! );
//! let html = render::to_markup(&render::expand(&root.into()).unwrap());
//! assert_eq!(html, "<span><i class=\"muted\"></i></span>");
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod classes;
pub mod error_fallback;
pub mod hoc;
pub mod href;
pub mod if_else;
pub mod on_children;
pub mod transpose;
