// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Conditional rendering with `x-if`, `x-else-if` and `x-else`.
//!
//! Conditions chain across consecutive siblings of one element, in document
//! order. A branch that is not taken is replaced by an empty fragment that
//! keeps the branch's key, so sibling positions stay stable between renders.
//!
//! An `x-else-if` or `x-else` with no `x-if` or `x-else-if` before it among
//! its siblings fails the render with [`RenderError::DirectiveOrder`].

use alloc::rc::Rc;
use alloc::string::ToString;
use alloc::vec::Vec;

use trellis_deep::{Policy, Registry};
use trellis_node::{Component, Element, Node, RenderError, RenderResult};

/// Attribute opening a chain.
pub const IF: &str = "x-if";
/// Attribute continuing a chain with another condition.
pub const ELSE_IF: &str = "x-else-if";
/// Attribute closing a chain.
pub const ELSE: &str = "x-else";

/// Options for [`policy`].
#[derive(Clone, Debug)]
pub struct IfElseOptions {
    /// Policy id. Defaults to `"ifElse"`.
    pub id: Rc<str>,
}

impl Default for IfElseOptions {
    fn default() -> Self {
        Self { id: "ifElse".into() }
    }
}

/// Where a chain of conditions stands after a sibling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Chain {
    /// No open chain.
    Idle,
    /// A branch was taken; later branches are dropped.
    Taken,
    /// No branch taken yet.
    Pending,
}

/// The conditional rendering policy.
pub fn policy(options: &IfElseOptions) -> Rc<Policy> {
    let id = options.id.clone();
    Rc::new(Policy::new(options.id.clone()).with_map_children(move |children| select(&id, children)))
}

/// Decorate `component` with the conditional rendering policy.
pub fn apply(registry: &Registry, component: &Component, options: &IfElseOptions) -> Component {
    registry.wrap(component, &policy(options))
}

fn select(id: &str, children: Node) -> RenderResult {
    let Node::List(items) = children else {
        return Ok(children);
    };
    let mut state = Chain::Idle;
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        let mut element = match item {
            Node::Element(element) => Rc::unwrap_or_clone(element),
            other => {
                out.push(other);
                continue;
            }
        };
        let condition = element.props.attrs.remove(IF);
        let else_if = element.props.attrs.remove(ELSE_IF);
        let otherwise = element.props.attrs.remove(ELSE);

        let keep = if let Some(value) = condition {
            let taken = value.is_truthy();
            state = if taken { Chain::Taken } else { Chain::Pending };
            taken
        } else if let Some(value) = else_if {
            let taken = state == Chain::Pending && value.is_truthy();
            state = match state {
                Chain::Idle => return Err(misplaced(id, ELSE_IF)),
                Chain::Taken => Chain::Taken,
                Chain::Pending if value.is_truthy() => Chain::Taken,
                Chain::Pending => Chain::Pending,
            };
            taken
        } else if otherwise.is_some() {
            if state == Chain::Idle {
                return Err(misplaced(id, ELSE));
            }
            let taken = state == Chain::Pending;
            state = Chain::Idle;
            taken
        } else {
            state = Chain::Idle;
            true
        };

        if keep {
            out.push(element.into());
        } else {
            let mut placeholder = Element::fragment();
            placeholder.key = element.key;
            out.push(placeholder.into());
        }
    }
    Ok(Node::List(out))
}

fn misplaced(id: &str, directive: &str) -> RenderError {
    RenderError::DirectiveOrder {
        policy: id.to_string(),
        directive: directive.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;
    use trellis_node::{Value, render};

    fn cell() -> Component {
        Component::function("Cell", |props, _| {
            Ok(Element::tag("td").with_children(props.children.clone()).into())
        })
    }

    fn row(flag: bool) -> Component {
        let cell = cell();
        Component::function("Row", move |_, _| {
            Ok(Element::tag("tr")
                .with_child(Element::component(&cell).with_attr(IF, flag).with_child("A"))
                .with_child(Element::component(&cell).with_attr(ELSE, true).with_child("B"))
                .with_child(Element::component(&cell).with_child("C"))
                .into())
        })
    }

    fn render_row(flag: bool) -> String {
        let registry = Registry::new();
        let root = apply(&registry, &row(flag), &IfElseOptions::default());
        render::to_markup(&render::expand(&Element::component(&root).into()).unwrap())
    }

    #[test]
    fn only_the_taken_branch_renders() {
        assert_eq!(render_row(true), "<tr><td>A</td><td>C</td></tr>");
        assert_eq!(render_row(false), "<tr><td>B</td><td>C</td></tr>");
    }

    #[test]
    fn else_if_chains() {
        let pick = |first: bool, second: bool| {
            let children = Node::List(alloc::vec![
                Element::tag("a").with_attr(IF, first).into(),
                Element::tag("b").with_attr(ELSE_IF, second).into(),
                Element::tag("c").with_attr(ELSE, true).into(),
            ]);
            let out = select("ifElse", children).unwrap();
            render::to_markup(&out)
        };
        assert_eq!(pick(true, true), "<a></a>");
        assert_eq!(pick(false, true), "<b></b>");
        assert_eq!(pick(false, false), "<c></c>");
    }

    #[test]
    fn directives_are_stripped_and_keys_kept() {
        let children = Node::List(alloc::vec![
            Element::tag("a").with_attr(IF, false).with_key("first").into(),
            Element::tag("b").with_attr(ELSE, Value::Undefined).with_key("second").into(),
        ]);
        let Node::List(out) = select("ifElse", children).unwrap() else {
            panic!("children stay a list");
        };
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].key().map(|k| k.as_str()), Some("first"));
        let kept = out[1].as_element().unwrap();
        assert!(kept.props.attrs.is_empty(), "x-else is removed");
        assert_eq!(kept.key.as_ref().map(|k| k.as_str()), Some("second"));
    }

    #[test]
    fn orphan_else_is_an_error() {
        let children = Node::List(alloc::vec![
            Element::tag("p").into(),
            Element::tag("q").with_attr(ELSE_IF, true).into(),
        ]);
        let err = select("ifElse", children).unwrap_err();
        assert_eq!(
            err.to_string(),
            "\"ifElse: x-else-if\" found on an element, but the previous element has no \"x-if\" or \"x-else-if\""
        );
    }

    #[test]
    fn misplaced_else_fails_the_render() {
        let cell = cell();
        let broken = Component::function("Broken", move |_, _| {
            Ok(Element::tag("tr")
                .with_child(Element::component(&cell).with_attr(ELSE, true))
                .into())
        });
        let registry = Registry::new();
        let root = apply(&registry, &broken, &IfElseOptions::default());
        let err = render::expand(&Element::component(&root).into()).unwrap_err();
        assert!(matches!(err, RenderError::DirectiveOrder { ref directive, .. } if directive == ELSE));
    }
}
