// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Applying an ordinary component-to-component function everywhere.

use alloc::rc::Rc;

use trellis_deep::{MapComponentFn, Policy, Registry};
use trellis_node::Component;

/// Options for [`policy`].
#[derive(Clone)]
pub struct HocOptions {
    /// Policy id. Defaults to `"hoc"`.
    pub id: Rc<str>,
    /// The function applied to every decorated component.
    pub hoc: MapComponentFn,
}

impl HocOptions {
    /// Options applying `hoc` under the id `"hoc"`.
    pub fn new(hoc: impl Fn(Component) -> Component + 'static) -> Self {
        Self {
            id: "hoc".into(),
            hoc: Rc::new(hoc),
        }
    }

    /// Use a different policy id. Distinct functions need distinct ids.
    #[must_use]
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.into();
        self
    }
}

impl core::fmt::Debug for HocOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HocOptions")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

/// A policy handing every decorated component to `options.hoc`.
pub fn policy(options: &HocOptions) -> Rc<Policy> {
    let hoc = options.hoc.clone();
    Rc::new(Policy::new(options.id.clone()).with_map_component(move |component| hoc(component)))
}

/// Decorate `component` and everything it renders with `options.hoc`.
pub fn apply(registry: &Registry, component: &Component, options: &HocOptions) -> Component {
    registry.wrap(component, &policy(options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_node::{Element, Node, render};

    fn sectioned(inner: Component) -> Component {
        Component::function("Sectioned", move |props, binding| {
            let output = inner.render(props, binding)?;
            Ok(Element::tag("section").with_child(output).into())
        })
    }

    #[test]
    fn hoc_reaches_nested_components() {
        let leaf = Component::function("Leaf", |_, _| Ok("leaf".into()));
        let leaf_el = leaf.clone();
        let branch = Component::function("Branch", move |_, _| {
            Ok(Node::from(Element::component(&leaf_el)))
        });
        let registry = Registry::new();
        let root = apply(&registry, &branch, &HocOptions::new(sectioned).with_id("sectioned"));
        let html = render::to_markup(&render::expand(&Element::component(&root).into()).unwrap());
        assert_eq!(html, "<section><section>leaf</section></section>");
        assert_eq!(root.display_name(), "sectioned(Branch)");
    }
}
