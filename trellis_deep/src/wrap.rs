// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Producing decorated components.

use alloc::format;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;

use tracing::debug;
use trellis_node::{Binding, Component, DecorationMarker, Props, RenderFn, RenderResult};

use crate::policy::Policy;
use crate::registry::{DecorationRecord, Registry};
use crate::shape::{Classified, classify, rewrap};

impl Registry {
    /// Decorate `component` with `policy`.
    ///
    /// The decorated component renders the original render function (or hands
    /// it to the policy's `invoke_render`), walks the output under the policy
    /// and restores any forward-ref and memo wrappers found around the
    /// original. The result is cached: wrapping the same component with the
    /// same policy id again returns the same component, as does wrapping a
    /// component that is already decorated under that id.
    ///
    /// Stateful components are returned unchanged.
    pub fn wrap(&self, component: &Component, policy: &Rc<Policy>) -> Component {
        if let Some(record) = self.lookup(component, policy.id()) {
            debug!(
                policy = policy.id(),
                component = %record.marker.display_name,
                "decoration cache hit"
            );
            return record.decorated.clone();
        }
        if component.is_decorated_by(policy.id()) {
            return component.clone();
        }
        let Classified::Render { render, stack } = classify(component) else {
            return component.clone();
        };

        let hoc_render = Component::from_render_fn(None, self.decorated_render(render, policy));
        let rewrapped = rewrap(hoc_render.clone(), &stack);
        let decorated = match policy.map_component() {
            Some(map) => map(rewrapped),
            None => rewrapped,
        };

        // Marker chain is outermost first; names read in application order.
        let mut chain: Vec<Rc<str>> = component.markers().map(|m| m.policy_id.clone()).collect();
        chain.reverse();
        chain.push(policy.id_rc());
        let policy_chain: String = chain.join(" < ");
        let base = base_component(component);
        let base_name: Rc<str> = base.display_name().into();
        let marker = Rc::new(DecorationMarker {
            policy_id: policy.id_rc(),
            original: component.clone(),
            display_name: format!("{policy_chain}({base_name})").into(),
            policy_chain: policy_chain.into(),
            base_name,
        });
        hoc_render.set_marker(marker.clone());
        if !decorated.ptr_eq(component) {
            decorated.set_marker(marker.clone());
        }
        debug!(
            policy = policy.id(),
            component = %marker.display_name,
            wrappers = stack.len(),
            "decorated component"
        );

        let record = self.store(DecorationRecord {
            original: component.clone(),
            decorated: decorated.clone(),
            policy: policy.clone(),
            marker,
        });
        if let Some(bridge) = self.reload() {
            bridge.schedule(base, record);
        }
        decorated
    }

    fn decorated_render(&self, render: Component, policy: &Rc<Policy>) -> RenderFn {
        let registry = self.downgrade();
        let policy = policy.clone();
        Rc::new(move |props: &Props, binding: Option<&Binding>| -> RenderResult {
            let output = match policy.invoke_render() {
                Some(invoke) => invoke(&render, props, binding)?,
                None => render.render(props, binding)?,
            };
            // Records outlive renders in practice; a dropped registry only
            // loses caching, not decoration.
            let registry = Self::upgrade(&registry).unwrap_or_default();
            registry.walk(&policy, &output)
        })
    }
}

/// The undecorated component at the end of `component`'s marker chain.
pub(crate) fn base_component(component: &Component) -> Component {
    component
        .markers()
        .last()
        .map_or_else(|| component.clone(), |marker| marker.original.clone())
}
