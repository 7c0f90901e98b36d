// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Live-reload bridge.
//!
//! During development a host may load a fresh body for a component under a
//! stable external id. The bridge remembers which policies were applied to
//! each id so it can replay the same stack onto the fresh body, and tells the
//! host about every decorated component so it can be tracked under a
//! composite id.
//!
//! Registration with the host is deferred: decoration only queues it, and the
//! host drains the queue with [`ReloadBridge::flush`] once the synchronous
//! render pass is done.

use alloc::format;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use hashbrown::{HashMap, HashSet};
use tracing::{error, warn};
use trellis_node::{Component, ComponentId};

use crate::policy::Policy;
use crate::registry::{DecorationRecord, Registry};

/// The host side of live reload.
pub trait ReloadHost {
    /// Track `component` under the external id `id`.
    fn register(&self, component: &Component, id: &str);
}

struct Pending {
    base: Component,
    record: Rc<DecorationRecord>,
    replaying: bool,
}

#[derive(Default)]
struct BridgeState {
    host: RefCell<Option<Rc<dyn ReloadHost>>>,
    ids: RefCell<HashMap<ComponentId, (Component, Vec<Rc<str>>)>>,
    history: RefCell<HashMap<Rc<str>, Vec<Rc<Policy>>>>,
    replaying: Cell<bool>,
    pending: RefCell<Vec<Pending>>,
    reported: RefCell<HashSet<ComponentId>>,
}

/// Policy history per external component id.
///
/// Cloning is cheap and shares the state.
#[derive(Clone, Default)]
pub struct ReloadBridge(Rc<BridgeState>);

impl ReloadBridge {
    /// A bridge with no host installed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the host that receives registrations.
    pub fn install(&self, host: Rc<dyn ReloadHost>) {
        *self.0.host.borrow_mut() = Some(host);
    }

    /// Returns `true` once a host is installed.
    pub fn is_installed(&self) -> bool {
        self.0.host.borrow().is_some()
    }

    /// Returns `true` while a policy history is being replayed.
    pub fn is_replaying(&self) -> bool {
        self.0.replaying.get()
    }

    /// Record that `component` was loaded under `id`.
    ///
    /// Every policy previously applied under `id` is applied again to
    /// `component`, in the original order, and the host is told about the
    /// component itself. Returns the fully decorated component.
    pub fn register(&self, registry: &Registry, component: &Component, id: &str) -> Component {
        let id: Rc<str> = id.into();
        self.0
            .ids
            .borrow_mut()
            .entry(component.id())
            .or_insert_with(|| (component.clone(), Vec::new()))
            .1
            .push(id.clone());
        let policies = self
            .0
            .history
            .borrow_mut()
            .entry(id.clone())
            .or_default()
            .clone();

        self.0.replaying.set(true);
        let decorated = policies
            .iter()
            .fold(component.clone(), |current, policy| registry.wrap(&current, policy));
        self.0.replaying.set(false);

        let host = self.0.host.borrow().clone();
        match host {
            Some(host) => host.register(component, &id),
            None => error!(id = &*id, "reload bridge used before a host was installed"),
        }
        decorated
    }

    pub(crate) fn schedule(&self, base: Component, record: Rc<DecorationRecord>) {
        self.0.pending.borrow_mut().push(Pending {
            base,
            record,
            replaying: self.is_replaying(),
        });
    }

    /// Number of registrations waiting for [`ReloadBridge::flush`].
    pub fn pending_len(&self) -> usize {
        self.0.pending.borrow().len()
    }

    /// Deliver queued registrations to the host.
    ///
    /// Each decorated component is registered under the first external id of
    /// its base component, suffixed with its policy chain. Components whose
    /// base was never registered are reported once and dropped. Without a
    /// host the queue is discarded. Returns the number of registrations made.
    pub fn flush(&self) -> usize {
        let pending = core::mem::take(&mut *self.0.pending.borrow_mut());
        if pending.is_empty() {
            return 0;
        }
        let Some(host) = self.0.host.borrow().clone() else {
            error!(
                dropped = pending.len(),
                "reload bridge flushed before a host was installed"
            );
            return 0;
        };

        let mut registered = 0;
        for entry in pending {
            let id = self
                .0
                .ids
                .borrow()
                .get(&entry.base.id())
                .and_then(|(_, ids)| ids.first().cloned());
            let Some(id) = id else {
                if self.0.reported.borrow_mut().insert(entry.base.id()) {
                    warn!(
                        component = %entry.base.display_name(),
                        "no reload id known for component"
                    );
                }
                continue;
            };
            if !entry.replaying
                && let Some(history) = self.0.history.borrow_mut().get_mut(&id)
            {
                history.push(entry.record.policy.clone());
            }
            let composite = format!("{id} {}", entry.record.marker.policy_chain);
            host.register(&entry.record.decorated, &composite);
            registered += 1;
        }
        registered
    }

    /// Policies applied so far under `id`, in application order.
    pub fn history(&self, id: &str) -> Vec<Rc<Policy>> {
        self.0.history.borrow().get(id).cloned().unwrap_or_default()
    }
}

impl core::fmt::Debug for ReloadBridge {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ReloadBridge")
            .field("installed", &self.is_installed())
            .field("ids", &self.0.history.borrow().len())
            .field("pending", &self.pending_len())
            .field("replaying", &self.is_replaying())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::{String, ToString};
    use trellis_node::{Element, Node, render};

    #[derive(Default)]
    struct Recorder(RefCell<Vec<String>>);

    impl ReloadHost for Recorder {
        fn register(&self, _: &Component, id: &str) {
            self.0.borrow_mut().push(id.to_string());
        }
    }

    fn setup() -> (ReloadBridge, Registry, Rc<Recorder>) {
        let bridge = ReloadBridge::new();
        let host = Rc::new(Recorder::default());
        bridge.install(host.clone());
        let registry = Registry::with_reload(bridge.clone());
        (bridge, registry, host)
    }

    fn body(text: &'static str) -> Component {
        Component::function("Card", move |_, _| Ok(Element::tag("p").with_child(text).into()))
    }

    fn tagging(id: &str) -> Rc<Policy> {
        let attr: Rc<str> = id.into();
        Rc::new(Policy::new(id).with_map_element(move |mut el, _| {
            el.props.attrs.insert(attr.clone(), true);
            Ok(el.into())
        }))
    }

    #[test]
    fn decorations_are_recorded_and_replayed_in_order() {
        let (bridge, registry, host) = setup();
        let first = body("v1");
        bridge.register(&registry, &first, "card.rs#Card");

        let a = registry.wrap(&first, &tagging("a"));
        registry.wrap(&a, &tagging("b"));
        assert_eq!(bridge.pending_len(), 2);
        assert_eq!(bridge.flush(), 2);
        let ids: Vec<_> = bridge.history("card.rs#Card").iter().map(|p| p.id().to_string()).collect();
        assert_eq!(ids, ["a", "b"]);

        let second = body("v2");
        let replayed = bridge.register(&registry, &second, "card.rs#Card");
        assert_eq!(replayed.display_name(), "a < b(Card)");
        let html = render::to_markup(&render::expand(&Element::component(&replayed).into()).unwrap());
        assert_eq!(html, "<p a b>v2</p>");

        assert_eq!(bridge.flush(), 2);
        assert_eq!(bridge.history("card.rs#Card").len(), 2, "replays do not grow the history");
        assert_eq!(
            *host.0.borrow(),
            [
                "card.rs#Card",
                "card.rs#Card a",
                "card.rs#Card a < b",
                "card.rs#Card",
                "card.rs#Card a",
                "card.rs#Card a < b",
            ]
        );
    }

    #[test]
    fn unknown_components_are_skipped() {
        let (bridge, registry, host) = setup();
        let stray = body("stray");
        registry.wrap(&stray, &tagging("a"));
        registry.wrap(&stray, &tagging("b"));
        assert_eq!(bridge.flush(), 0);
        assert!(host.0.borrow().is_empty());
        assert_eq!(bridge.pending_len(), 0, "unresolved registrations are not retried");
    }

    #[test]
    fn unknown_components_are_reported_once() {
        let (bridge, registry, _) = setup();
        let stray = body("stray");
        registry.wrap(&stray, &tagging("a"));
        registry.wrap(&stray, &tagging("b"));
        assert_eq!(bridge.flush(), 0);
        registry.wrap(&stray, &tagging("c"));
        assert_eq!(bridge.flush(), 0);

        let reported = bridge.0.reported.borrow();
        assert_eq!(reported.len(), 1, "three misses, one diagnostic");
        assert!(reported.contains(&stray.id()));
    }

    #[test]
    fn flushing_without_a_host_discards_the_queue() {
        let bridge = ReloadBridge::new();
        let registry = Registry::with_reload(bridge.clone());
        registry.wrap(&body("x"), &tagging("a"));
        assert!(!bridge.is_installed());
        assert_eq!(bridge.flush(), 0);
        assert_eq!(bridge.pending_len(), 0);
    }

    #[test]
    fn nested_decorations_are_queued_during_render() {
        let (bridge, registry, _) = setup();
        let leaf = body("leaf");
        let leaf_el = leaf.clone();
        let parent = Component::function("Parent", move |_, _| {
            Ok(Node::from(Element::component(&leaf_el)))
        });
        bridge.register(&registry, &leaf, "leaf.rs#Leaf");
        let root = registry.wrap(&parent, &tagging("a"));
        render::expand(&Element::component(&root).into()).unwrap();
        assert_eq!(bridge.pending_len(), 2, "parent and nested leaf");
        assert_eq!(bridge.flush(), 1, "only the registered leaf resolves");
        assert_eq!(bridge.history("leaf.rs#Leaf").len(), 1);
    }
}
