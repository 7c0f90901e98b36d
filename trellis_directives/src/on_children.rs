// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-child attributes with `x-on-children`.
//!
//! The directive value is a [`Func`](trellis_node::Func) called with each
//! child's index that returns an attribute map (or nothing). The returned
//! attributes are merged into that child when it is an element.

use alloc::rc::Rc;
use alloc::vec::Vec;

use trellis_deep::{Policy, Registry};
use trellis_node::{Component, Node, RenderError, Value};

/// The directive.
pub const ON_CHILDREN: &str = "x-on-children";

/// Options for [`policy`].
#[derive(Clone, Debug)]
pub struct OnChildrenOptions {
    /// Policy id. Defaults to `"onChildren"`.
    pub id: Rc<str>,
}

impl Default for OnChildrenOptions {
    fn default() -> Self {
        Self {
            id: "onChildren".into(),
        }
    }
}

/// The per-child attribute policy.
pub fn policy(options: &OnChildrenOptions) -> Rc<Policy> {
    Rc::new(
        Policy::new(options.id.clone())
            .with_directive(ON_CHILDREN)
            .with_map_element(|mut el, directive| {
                let Some(callback) = directive.value().and_then(Value::as_func) else {
                    return Ok(el.into());
                };
                let children = core::mem::take(&mut el.props.children);
                el.props.children = children
                    .into_iter()
                    .enumerate()
                    .map(|(index, child)| {
                        let Node::Element(child) = child else {
                            return Ok(child);
                        };
                        let extra = callback.call(&[Value::Number(index as f64)]);
                        let mut child = Rc::unwrap_or_clone(child);
                        match extra {
                            Value::Attrs(attrs) => {
                                for (name, value) in attrs.iter() {
                                    child.props.attrs.insert(name, value.clone());
                                }
                            }
                            Value::Undefined | Value::Null => {}
                            _ => {
                                return Err(RenderError::InvalidDirective {
                                    directive: ON_CHILDREN.into(),
                                    expected: "a function returning attributes",
                                });
                            }
                        }
                        Ok(child.into())
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(el.into())
            }),
    )
}

/// Decorate `component` with the per-child attribute policy.
pub fn apply(registry: &Registry, component: &Component, options: &OnChildrenOptions) -> Component {
    registry.wrap(component, &policy(options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_node::{Attrs, Element, Func, render};

    #[test]
    fn children_receive_indexed_attributes() {
        let stripes = Func::new(|args| {
            let odd = args.first().is_some_and(|i| matches!(i, Value::Number(n) if n % 2.0 == 1.0));
            Attrs::new().with("class", if odd { "odd" } else { "even" }).into()
        });
        let tree: Node = Element::tag("ul")
            .with_attr(ON_CHILDREN, stripes)
            .with_child(Element::tag("li"))
            .with_child("text")
            .with_child(Element::tag("li"))
            .into();
        let registry = Registry::new();
        let out = registry.walk(&policy(&OnChildrenOptions::default()), &tree).unwrap();
        assert_eq!(
            render::to_markup(&out),
            "<ul><li class=\"even\"></li>text<li class=\"even\"></li></ul>"
        );
    }

    #[test]
    fn falsy_directive_leaves_children_alone() {
        let tree: Node = Element::tag("ul")
            .with_attr(ON_CHILDREN, false)
            .with_child(Element::tag("li"))
            .into();
        let registry = Registry::new();
        let out = registry.walk(&policy(&OnChildrenOptions::default()), &tree).unwrap();
        assert_eq!(render::to_markup(&out), "<ul><li></li></ul>");
    }
}
