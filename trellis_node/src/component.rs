// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Component handles, wrapper conventions and decoration markers.

use alloc::rc::Rc;
use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;
use core::cell::RefCell;

use crate::{Binding, Props, RenderResult};

/// Render function of a function component: props plus an optional
/// imperative binding in, render output out.
pub type RenderFn = Rc<dyn Fn(&Props, Option<&Binding>) -> RenderResult>;

/// Equality comparator of a memoization wrapper: returns `true` when the old
/// and new props should be treated as equal.
pub type CompareFn = Rc<dyn Fn(&Props, &Props) -> bool>;

/// A traditional stateful (object-style) component.
///
/// These are rendered by hosts but never decorated.
pub trait StatefulRender {
    /// Render the component for the given props.
    fn render(&self, props: &Props) -> RenderResult;
}

/// Shape of a component, decided once at construction.
#[derive(Clone)]
pub enum ComponentKind {
    /// A plain render function.
    Function(RenderFn),
    /// Reference-forwarding wrapper: the element's binding is handed to the
    /// inner component.
    ForwardRef(Component),
    /// Memoization wrapper with an optional custom comparator.
    Memo {
        /// Wrapped component.
        inner: Component,
        /// Custom props comparator, if any.
        compare: Option<CompareFn>,
    },
    /// Traditional stateful component.
    Stateful(Rc<dyn StatefulRender>),
}

impl core::fmt::Debug for ComponentKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Function(_) => f.write_str("Function"),
            Self::ForwardRef(inner) => f.debug_tuple("ForwardRef").field(inner).finish(),
            Self::Memo { inner, compare } => f
                .debug_struct("Memo")
                .field("inner", inner)
                .field("custom_compare", &compare.is_some())
                .finish(),
            Self::Stateful(_) => f.write_str("Stateful"),
        }
    }
}

/// Metadata attached to a decorated component, linking it back to the
/// component it was produced from and to the policy that produced it.
///
/// Following [`DecorationMarker::original`] repeatedly walks the chain of
/// decorations back to the undecorated base component.
#[derive(Clone, Debug)]
pub struct DecorationMarker {
    /// Id of the policy that produced the decorated component.
    pub policy_id: Rc<str>,
    /// The component that was decorated.
    pub original: Component,
    /// Display name of the undecorated base component.
    pub base_name: Rc<str>,
    /// Policy ids in application order, for example `"a < b"`.
    pub policy_chain: Rc<str>,
    /// Composite diagnostic name, for example `"a < b(Row)"`.
    pub display_name: Rc<str>,
}

/// Stable identity of a component allocation.
///
/// Distinct components with identical bodies have distinct ids.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ComponentId(usize);

struct ComponentInner {
    kind: ComponentKind,
    name: Option<Rc<str>>,
    marker: RefCell<Option<Rc<DecorationMarker>>>,
}

/// Shared handle to a component.
///
/// Cloning is cheap and preserves identity; equality is identity.
#[derive(Clone)]
pub struct Component(Rc<ComponentInner>);

impl Component {
    fn with_kind(name: Option<&str>, kind: ComponentKind) -> Self {
        Self(Rc::new(ComponentInner {
            kind,
            name: name.map(Into::into),
            marker: RefCell::new(None),
        }))
    }

    /// A named function component.
    pub fn function(
        name: &str,
        render: impl Fn(&Props, Option<&Binding>) -> RenderResult + 'static,
    ) -> Self {
        Self::with_kind(Some(name), ComponentKind::Function(Rc::new(render)))
    }

    /// A function component from an existing render function.
    pub fn from_render_fn(name: Option<&str>, render: RenderFn) -> Self {
        Self::with_kind(name, ComponentKind::Function(render))
    }

    /// Wrap `inner` in the reference-forwarding convention.
    pub fn forward_ref(inner: Self) -> Self {
        Self::with_kind(None, ComponentKind::ForwardRef(inner))
    }

    /// Wrap `inner` in the memoization convention with shallow props equality.
    pub fn memo(inner: Self) -> Self {
        Self::memo_with(inner, None)
    }

    /// Wrap `inner` in the memoization convention with an optional comparator.
    pub fn memo_with(inner: Self, compare: Option<CompareFn>) -> Self {
        Self::with_kind(None, ComponentKind::Memo { inner, compare })
    }

    /// A traditional stateful component.
    pub fn stateful(name: &str, component: impl StatefulRender + 'static) -> Self {
        Self::with_kind(Some(name), ComponentKind::Stateful(Rc::new(component)))
    }

    /// The component's shape.
    pub fn kind(&self) -> &ComponentKind {
        &self.0.kind
    }

    /// Identity of this component.
    pub fn id(&self) -> ComponentId {
        ComponentId(Rc::as_ptr(&self.0).addr())
    }

    /// Returns `true` if both handles refer to the same component.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Explicit name given at construction, if any.
    pub fn name(&self) -> Option<&str> {
        self.0.name.as_deref()
    }

    /// Name for diagnostics.
    ///
    /// Resolves, in order: the decoration marker's composite name, the
    /// explicit name, the name of the component inside a forward-ref or memo
    /// wrapper, and finally `"UnknownComponentName"`.
    pub fn display_name(&self) -> String {
        if let Some(marker) = self.marker() {
            return marker.display_name.to_string();
        }
        if let Some(name) = self.name() {
            return name.to_string();
        }
        match self.kind() {
            ComponentKind::ForwardRef(inner) | ComponentKind::Memo { inner, .. } => {
                inner.display_name()
            }
            ComponentKind::Function(_) | ComponentKind::Stateful(_) => {
                "UnknownComponentName".to_string()
            }
        }
    }

    /// Display name of the undecorated base component.
    pub fn base_name(&self) -> String {
        match self.marker() {
            Some(marker) => marker.base_name.to_string(),
            None => self.display_name(),
        }
    }

    /// Decoration marker attached to this component, if any.
    pub fn marker(&self) -> Option<Rc<DecorationMarker>> {
        self.0.marker.borrow().clone()
    }

    /// Attach a decoration marker, replacing any previous one.
    pub fn set_marker(&self, marker: Rc<DecorationMarker>) {
        *self.0.marker.borrow_mut() = Some(marker);
    }

    /// Iterate over the chain of decoration markers, outermost first.
    pub fn markers(&self) -> Markers {
        Markers {
            visited: vec![self.id()],
            next: self.marker(),
        }
    }

    /// Returns `true` if any marker in the chain carries `policy_id`.
    pub fn is_decorated_by(&self, policy_id: &str) -> bool {
        self.markers().any(|m| &*m.policy_id == policy_id)
    }

    /// Returns `true` if rendering this component hands the element's binding
    /// to the render function.
    pub fn forwards_binding(&self) -> bool {
        match self.kind() {
            ComponentKind::ForwardRef(_) => true,
            ComponentKind::Memo { inner, .. } => inner.forwards_binding(),
            ComponentKind::Function(_) | ComponentKind::Stateful(_) => false,
        }
    }

    /// Invoke the component, looking through wrapper conventions.
    pub fn render(&self, props: &Props, binding: Option<&Binding>) -> RenderResult {
        match self.kind() {
            ComponentKind::Function(render) => render(props, binding),
            ComponentKind::ForwardRef(inner) | ComponentKind::Memo { inner, .. } => {
                inner.render(props, binding)
            }
            ComponentKind::Stateful(component) => component.render(props),
        }
    }
}

impl PartialEq for Component {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Component {}

impl core::fmt::Debug for Component {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Component")
            .field("name", &self.display_name())
            .field("kind", self.kind())
            .finish_non_exhaustive()
    }
}

/// Iterator over a component's decoration markers. See [`Component::markers`].
///
/// Ends at the first marker whose original was already visited, so a chain
/// that loops back on itself is still finite.
#[derive(Debug)]
pub struct Markers {
    visited: Vec<ComponentId>,
    next: Option<Rc<DecorationMarker>>,
}

impl Iterator for Markers {
    type Item = Rc<DecorationMarker>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        let original = current.original.id();
        if !self.visited.contains(&original) {
            self.visited.push(original);
            self.next = current.original.marker();
        }
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Node;

    fn leaf(name: &str) -> Component {
        Component::function(name, |_, _| Ok(Node::Empty))
    }

    #[test]
    fn identity_not_value() {
        let a = leaf("Same");
        let b = leaf("Same");
        assert_ne!(a.id(), b.id());
        assert_eq!(a.id(), a.clone().id());
        assert_ne!(a, b);
    }

    #[test]
    fn display_name_looks_through_wrappers() {
        let inner = leaf("Inner");
        let wrapped = Component::memo(Component::forward_ref(inner));
        assert_eq!(wrapped.display_name(), "Inner");
        assert!(wrapped.forwards_binding());
        let render: RenderFn = Rc::new(|_: &Props, _: Option<&Binding>| -> RenderResult {
            Ok(Node::Empty)
        });
        let anonymous = Component::from_render_fn(None, render);
        assert_eq!(anonymous.display_name(), "UnknownComponentName");
    }

    #[test]
    fn marker_chain_is_walked_to_the_base() {
        let base = leaf("Base");
        let first = leaf("first");
        first.set_marker(Rc::new(DecorationMarker {
            policy_id: "a".into(),
            original: base.clone(),
            base_name: "Base".into(),
            policy_chain: "a".into(),
            display_name: "a(Base)".into(),
        }));
        let second = leaf("second");
        second.set_marker(Rc::new(DecorationMarker {
            policy_id: "b".into(),
            original: first.clone(),
            base_name: "Base".into(),
            policy_chain: "a < b".into(),
            display_name: "a < b(Base)".into(),
        }));
        let ids: alloc::vec::Vec<_> = second.markers().map(|m| m.policy_id.clone()).collect();
        assert_eq!(ids.len(), 2);
        assert!(second.is_decorated_by("a"));
        assert!(second.is_decorated_by("b"));
        assert!(!base.is_decorated_by("a"));
        assert_eq!(second.display_name(), "a < b(Base)");
        assert_eq!(second.base_name(), "Base");
    }

    #[test]
    fn self_referencing_marker_terminates() {
        let c = leaf("Loop");
        c.set_marker(Rc::new(DecorationMarker {
            policy_id: "p".into(),
            original: c.clone(),
            base_name: "Loop".into(),
            policy_chain: "p".into(),
            display_name: "p(Loop)".into(),
        }));
        assert_eq!(c.markers().count(), 1);
    }

    fn mark(component: &Component, policy_id: &str, original: &Component) {
        component.set_marker(Rc::new(DecorationMarker {
            policy_id: policy_id.into(),
            original: original.clone(),
            base_name: "Base".into(),
            policy_chain: policy_id.into(),
            display_name: policy_id.into(),
        }));
    }

    #[test]
    fn loop_below_the_start_terminates() {
        let top = leaf("Top");
        let x = leaf("X");
        let y = leaf("Y");
        mark(&top, "r", &x);
        mark(&x, "p", &y);
        mark(&y, "q", &x);
        let ids: alloc::vec::Vec<_> = top.markers().map(|m| m.policy_id.clone()).collect();
        assert_eq!(ids.len(), 3, "each component in the loop is visited once");
        assert!(!top.is_decorated_by("missing"), "lookups through a loop return");
        assert!(top.is_decorated_by("q"));
    }
}
