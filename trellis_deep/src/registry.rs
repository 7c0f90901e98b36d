// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The decoration registry: identity cache plus optional live-reload bridge.

use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::RefCell;

use hashbrown::HashMap;
use trellis_node::{Component, ComponentId, DecorationMarker, Element, Node};

use crate::policy::Policy;
use crate::reload::ReloadBridge;

/// What one decoration produced.
///
/// Created once per (component, policy id) and never mutated afterwards. A
/// later decoration of the same component under a different id supersedes it.
#[derive(Debug)]
pub struct DecorationRecord {
    /// The component that was decorated.
    pub original: Component,
    /// The decorated component handed back by [`Registry::wrap`].
    pub decorated: Component,
    /// The policy that produced it.
    pub policy: Rc<Policy>,
    /// Marker attached to the decorated component.
    pub marker: Rc<DecorationMarker>,
}

impl DecorationRecord {
    /// Display name of the undecorated base component.
    pub fn base_name(&self) -> &str {
        &self.marker.base_name
    }
}

pub(crate) struct RegistryInner {
    records: RefCell<HashMap<ComponentId, Rc<DecorationRecord>>>,
    reload: Option<ReloadBridge>,
}

/// Owner of every decoration record.
///
/// Records are keyed by the identity of the component that was decorated and
/// live as long as the registry. Cloning is cheap and shares the records.
///
/// ```rust
/// use std::rc::Rc;
/// use trellis_deep::{Policy, Registry};
/// use trellis_node::{Component, Node};
///
/// let registry = Registry::new();
/// let policy = Rc::new(Policy::new("noop"));
/// let row = Component::function("Row", |_, _| Ok(Node::Empty));
///
/// let decorated = registry.wrap(&row, &policy);
/// assert!(registry.wrap(&row, &policy).ptr_eq(&decorated));
/// assert_eq!(decorated.display_name(), "noop(Row)");
/// ```
#[derive(Clone)]
pub struct Registry(Rc<RegistryInner>);

impl Registry {
    /// An empty registry without live-reload support.
    pub fn new() -> Self {
        Self::from_parts(None)
    }

    /// An empty registry reporting every fresh decoration to `bridge`.
    pub fn with_reload(bridge: ReloadBridge) -> Self {
        Self::from_parts(Some(bridge))
    }

    fn from_parts(reload: Option<ReloadBridge>) -> Self {
        Self(Rc::new(RegistryInner {
            records: RefCell::new(HashMap::new()),
            reload,
        }))
    }

    /// The record for `component` if its latest decoration used `policy_id`.
    pub fn lookup(&self, component: &Component, policy_id: &str) -> Option<Rc<DecorationRecord>> {
        self.0
            .records
            .borrow()
            .get(&component.id())
            .filter(|record| record.policy.id() == policy_id)
            .cloned()
    }

    /// Store `record` under the identity of its original component, replacing
    /// any earlier record for that component.
    pub fn store(&self, record: DecorationRecord) -> Rc<DecorationRecord> {
        let record = Rc::new(record);
        self.0
            .records
            .borrow_mut()
            .insert(record.original.id(), record.clone());
        record
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.0.records.borrow().len()
    }

    /// Returns `true` if nothing has been decorated yet.
    pub fn is_empty(&self) -> bool {
        self.0.records.borrow().is_empty()
    }

    /// The live-reload bridge, if the registry was built with one.
    pub fn reload(&self) -> Option<&ReloadBridge> {
        self.0.reload.as_ref()
    }

    /// Root element applying a stack of policies to arbitrary content.
    ///
    /// `children` are returned by a passthrough component which is wrapped by
    /// each policy in order, so the first policy ends up innermost.
    pub fn root(&self, children: Vec<Node>, policies: &[Rc<Policy>]) -> Element {
        let passthrough =
            Component::function("Children", move |_, _| Ok(Node::List(children.clone())));
        let decorated = policies
            .iter()
            .fold(passthrough, |component, policy| self.wrap(&component, policy));
        Element::component(&decorated)
    }

    pub(crate) fn downgrade(&self) -> Weak<RegistryInner> {
        Rc::downgrade(&self.0)
    }

    pub(crate) fn upgrade(inner: &Weak<RegistryInner>) -> Option<Self> {
        inner.upgrade().map(Self)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for Registry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Registry")
            .field("records", &self.len())
            .field("reload", &self.0.reload.is_some())
            .finish()
    }
}
