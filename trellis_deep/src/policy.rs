// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decoration policies.
//!
//! A [`Policy`] is an id plus optional callbacks. The id is the idempotency
//! key: decorating the same component twice with policies sharing an id yields
//! the same decorated component, and an element already decorated under an id
//! is never decorated under it again.
//!
//! Callbacks that can fail return [`RenderResult`]; failures are not caught by
//! the engine and surface from the render that triggered them.

use alloc::rc::Rc;
use alloc::vec::Vec;

use smallvec::SmallVec;
use trellis_node::{Binding, Component, Element, Node, Props, RenderResult, Value};

/// Predicate deciding whether the walker visits a node at all.
pub type FilterFn = Rc<dyn Fn(&Node) -> bool>;
/// Replaces a node before it is walked.
pub type MapNodeFn = Rc<dyn Fn(&Node) -> RenderResult>;
/// Rewrites an element's walked children (always handed over as a list).
pub type MapChildrenFn = Rc<dyn Fn(Node) -> RenderResult>;
/// Produces the final node for a rebuilt element.
pub type MapElementFn = Rc<dyn Fn(Element, Directive) -> RenderResult>;
/// Invokes an unwrapped render function in place of a direct call.
pub type InvokeRenderFn = Rc<dyn Fn(&Component, &Props, Option<&Binding>) -> RenderResult>;
/// Substitutes the fully re-wrapped decorated component.
pub type MapComponentFn = Rc<dyn Fn(Component) -> Component>;

/// How children gathered from several transformation stages are turned back
/// into an element's child list without sibling key collisions.
///
/// Every strategy preserves the explicit keys of keyed children.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum KeyStrategy {
    /// Flatten one level and spread, reproducing the original child layout.
    #[default]
    Spread,
    /// The host's child-mapping idiom: flatten fully, drop empty nodes and
    /// give key-less elements synthetic positional keys.
    HostMapping,
    /// Spread like [`KeyStrategy::Spread`] and flag the rebuilt element and its
    /// element children as key-validated so hosts skip their key check.
    PreValidated,
}

/// When a policy with directives runs its element callback.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Activation {
    /// Only when at least one configured directive is present on the element.
    #[default]
    Present,
    /// On every element; directives are still stripped when present.
    Always,
}

/// Directive value(s) handed to [`Policy::with_map_element`] callbacks.
#[derive(Clone, Debug, PartialEq)]
pub enum Directive {
    /// The policy declares no directives.
    None,
    /// The policy declares a single directive; its captured value, which is
    /// [`Value::Undefined`] when absent.
    One(Value),
    /// The policy declares a list of directives; captured values in order.
    Many(Vec<Value>),
}

impl Directive {
    /// The single captured value, for single-directive policies.
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::One(v) => Some(v),
            Self::None | Self::Many(_) => None,
        }
    }

    /// All captured values in declaration order.
    pub fn values(&self) -> &[Value] {
        match self {
            Self::None => &[],
            Self::One(v) => core::slice::from_ref(v),
            Self::Many(vs) => vs,
        }
    }
}

/// Directive names declared by a policy.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum DirectiveNames {
    /// No directives.
    #[default]
    None,
    /// A single directive name; callbacks receive [`Directive::One`].
    One(Rc<str>),
    /// A list of names; callbacks receive [`Directive::Many`].
    Many(SmallVec<[Rc<str>; 2]>),
}

impl DirectiveNames {
    /// Names in declaration order.
    pub fn as_slice(&self) -> &[Rc<str>] {
        match self {
            Self::None => &[],
            Self::One(name) => core::slice::from_ref(name),
            Self::Many(names) => names,
        }
    }

    /// Returns `true` if no names are declared.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// A decoration behavior: an id plus optional callbacks.
///
/// Build with [`Policy::new`] and the `with_*` methods, then share it as an
/// `Rc<Policy>`:
///
/// ```rust
/// use std::rc::Rc;
/// use trellis_deep::{KeyStrategy, Policy};
///
/// let policy = Rc::new(
///     Policy::new("upper")
///         .with_directive("x-upper")
///         .with_key_strategy(KeyStrategy::HostMapping)
///         .with_map_element(|mut el, directive| {
///             el.props.attrs.insert("data-upper", directive.value().cloned().unwrap_or_default());
///             Ok(el.into())
///         }),
/// );
/// assert_eq!(policy.id(), "upper");
/// ```
#[derive(Clone)]
pub struct Policy {
    id: Rc<str>,
    directives: DirectiveNames,
    activation: Activation,
    key_strategy: KeyStrategy,
    filter_nodes: Option<FilterFn>,
    map_node: Option<MapNodeFn>,
    map_children: Option<MapChildrenFn>,
    map_element: Option<MapElementFn>,
    invoke_render: Option<InvokeRenderFn>,
    map_component: Option<MapComponentFn>,
}

impl Policy {
    /// A policy with no callbacks.
    pub fn new(id: impl Into<Rc<str>>) -> Self {
        Self {
            id: id.into(),
            directives: DirectiveNames::None,
            activation: Activation::Present,
            key_strategy: KeyStrategy::Spread,
            filter_nodes: None,
            map_node: None,
            map_children: None,
            map_element: None,
            invoke_render: None,
            map_component: None,
        }
    }

    /// Declare a single directive attribute.
    #[must_use]
    pub fn with_directive(mut self, name: &str) -> Self {
        self.directives = DirectiveNames::One(name.into());
        self
    }

    /// Declare a list of directive attributes.
    #[must_use]
    pub fn with_directives<'a>(mut self, names: impl IntoIterator<Item = &'a str>) -> Self {
        self.directives = DirectiveNames::Many(names.into_iter().map(Into::into).collect());
        self
    }

    /// Set the directive activation mode.
    #[must_use]
    pub fn with_activation(mut self, activation: Activation) -> Self {
        self.activation = activation;
        self
    }

    /// Set the key reconciliation strategy.
    #[must_use]
    pub fn with_key_strategy(mut self, strategy: KeyStrategy) -> Self {
        self.key_strategy = strategy;
        self
    }

    /// Skip nodes the predicate rejects.
    #[must_use]
    pub fn with_filter_nodes(mut self, f: impl Fn(&Node) -> bool + 'static) -> Self {
        self.filter_nodes = Some(Rc::new(f));
        self
    }

    /// Replace nodes before walking them.
    #[must_use]
    pub fn with_map_node(mut self, f: impl Fn(&Node) -> RenderResult + 'static) -> Self {
        self.map_node = Some(Rc::new(f));
        self
    }

    /// Rewrite every element's walked children.
    #[must_use]
    pub fn with_map_children(mut self, f: impl Fn(Node) -> RenderResult + 'static) -> Self {
        self.map_children = Some(Rc::new(f));
        self
    }

    /// Produce the final node for every rebuilt element.
    #[must_use]
    pub fn with_map_element(
        mut self,
        f: impl Fn(Element, Directive) -> RenderResult + 'static,
    ) -> Self {
        self.map_element = Some(Rc::new(f));
        self
    }

    /// Take over invocation of the undecorated render function.
    #[must_use]
    pub fn with_invoke_render(
        mut self,
        f: impl Fn(&Component, &Props, Option<&Binding>) -> RenderResult + 'static,
    ) -> Self {
        self.invoke_render = Some(Rc::new(f));
        self
    }

    /// Substitute the decorated component once it has its wrapper shape back.
    #[must_use]
    pub fn with_map_component(mut self, f: impl Fn(Component) -> Component + 'static) -> Self {
        self.map_component = Some(Rc::new(f));
        self
    }

    /// The policy id.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub(crate) fn id_rc(&self) -> Rc<str> {
        self.id.clone()
    }

    /// Declared directive names.
    pub fn directive_names(&self) -> &DirectiveNames {
        &self.directives
    }

    /// Directive activation mode.
    pub fn activation(&self) -> Activation {
        self.activation
    }

    /// Key reconciliation strategy.
    pub fn key_strategy(&self) -> KeyStrategy {
        self.key_strategy
    }

    pub(crate) fn filter_nodes(&self) -> Option<&FilterFn> {
        self.filter_nodes.as_ref()
    }

    pub(crate) fn map_node(&self) -> Option<&MapNodeFn> {
        self.map_node.as_ref()
    }

    pub(crate) fn map_children(&self) -> Option<&MapChildrenFn> {
        self.map_children.as_ref()
    }

    pub(crate) fn map_element(&self) -> Option<&MapElementFn> {
        self.map_element.as_ref()
    }

    pub(crate) fn invoke_render(&self) -> Option<&InvokeRenderFn> {
        self.invoke_render.as_ref()
    }

    pub(crate) fn map_component(&self) -> Option<&MapComponentFn> {
        self.map_component.as_ref()
    }
}

impl core::fmt::Debug for Policy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Policy")
            .field("id", &self.id)
            .field("directives", &self.directives)
            .field("activation", &self.activation)
            .field("key_strategy", &self.key_strategy)
            .finish_non_exhaustive()
    }
}
