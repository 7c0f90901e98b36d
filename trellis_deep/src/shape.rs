// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wrapper-shape classification.
//!
//! Reference-forwarding and memoization wrappers are peeled off (outermost
//! first) so the engine can decorate the render function underneath, and put
//! back (innermost first) around the decorated render function afterwards.

use smallvec::SmallVec;
use trellis_node::{CompareFn, Component, ComponentKind};

/// One peeled wrapper.
#[derive(Clone)]
pub enum WrapperShape {
    /// Reference-forwarding wrapper.
    ForwardRef,
    /// Memoization wrapper, with its custom comparator if it had one.
    Memo(Option<CompareFn>),
}

impl core::fmt::Debug for WrapperShape {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ForwardRef => f.write_str("ForwardRef"),
            Self::Memo(compare) => f
                .debug_struct("Memo")
                .field("custom_compare", &compare.is_some())
                .finish(),
        }
    }
}

/// Wrapper stack, outermost first.
pub type WrapperStack = SmallVec<[WrapperShape; 2]>;

/// Result of [`classify`].
#[derive(Debug)]
pub enum Classified {
    /// A render function, found under zero or more wrappers.
    Render {
        /// The plain function component underneath the wrappers.
        render: Component,
        /// Peeled wrappers, outermost first.
        stack: WrapperStack,
    },
    /// A traditional stateful component (possibly under wrappers). Never
    /// decorated.
    Stateful,
}

/// Peel wrapper shapes off `component` until reaching a render function or a
/// stateful component.
pub fn classify(component: &Component) -> Classified {
    let mut stack = WrapperStack::new();
    let mut current = component.clone();
    loop {
        let next = match current.kind() {
            ComponentKind::Function(_) => {
                return Classified::Render {
                    render: current,
                    stack,
                };
            }
            ComponentKind::Stateful(_) => return Classified::Stateful,
            ComponentKind::ForwardRef(inner) => {
                stack.push(WrapperShape::ForwardRef);
                inner.clone()
            }
            ComponentKind::Memo { inner, compare } => {
                stack.push(WrapperShape::Memo(compare.clone()));
                inner.clone()
            }
        };
        current = next;
    }
}

/// Re-apply `stack` (outermost first, as returned by [`classify`]) around
/// `render`.
pub fn rewrap(render: Component, stack: &[WrapperShape]) -> Component {
    stack
        .iter()
        .rev()
        .fold(render, |inner, shape| match shape {
            WrapperShape::ForwardRef => Component::forward_ref(inner),
            WrapperShape::Memo(compare) => Component::memo_with(inner, compare.clone()),
        })
}
