// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A minimal reference renderer.
//!
//! Real hosts reconcile, memoize and keep state. This renderer does none of
//! that: [`expand`] invokes every component once, depth first, and returns a
//! tree made only of tags, fragments, portals and leaves. [`to_markup`] prints
//! such a tree in a compact markup form. Both exist so that decoration can be
//! observed end to end in tests and demos.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write;

use crate::{Element, ElementType, Node, Portal, RenderResult, Value};

/// Render `node`, invoking components until only host nodes remain.
pub fn expand(node: &Node) -> RenderResult {
    match node {
        Node::List(items) => items
            .iter()
            .map(expand)
            .collect::<Result<Vec<_>, _>>()
            .map(Node::List),
        Node::Portal(portal) => Ok(Node::Portal(Rc::new(Portal {
            content: expand(&portal.content)?,
            target: portal.target.clone(),
            key: portal.key.clone(),
        }))),
        Node::Element(element) => match &element.ty {
            ElementType::Component(component) => {
                let binding = component
                    .forwards_binding()
                    .then_some(element.binding.as_ref())
                    .flatten();
                let output = component.render(&element.props, binding)?;
                expand(&output)
            }
            ElementType::Tag(_) | ElementType::Fragment => {
                let children = element
                    .children()
                    .iter()
                    .map(expand)
                    .collect::<Result<Vec<_>, _>>()?;
                let mut expanded = Element::clone(element);
                expanded.props.children = children;
                Ok(expanded.into())
            }
        },
        Node::Empty | Node::Text(_) | Node::Number(_) | Node::Opaque(_) => Ok(node.clone()),
    }
}

/// Print a tree as markup.
///
/// Scalar attributes are printed; callables, nodes and nested maps are not.
/// Fragments print only their children, components print as `<Name>` with the
/// component's display name.
pub fn to_markup(node: &Node) -> String {
    let mut out = String::new();
    write_node(&mut out, node);
    out
}

fn write_node(out: &mut String, node: &Node) {
    match node {
        Node::Empty => {}
        Node::Text(text) => out.push_str(text),
        Node::Number(n) => {
            let _ = write!(out, "{n}");
        }
        Node::Opaque(_) => out.push_str("[opaque]"),
        Node::List(items) => items.iter().for_each(|n| write_node(out, n)),
        Node::Portal(portal) => {
            let _ = write!(out, "<#portal {}>", portal.target.name());
            write_node(out, &portal.content);
            out.push_str("</#portal>");
        }
        Node::Element(element) => write_element(out, element),
    }
}

fn write_element(out: &mut String, element: &Element) {
    let name = match &element.ty {
        ElementType::Fragment => {
            element.children().iter().for_each(|n| write_node(out, n));
            return;
        }
        ElementType::Tag(tag) => String::from(&**tag),
        ElementType::Component(component) => component.display_name(),
    };
    out.push('<');
    out.push_str(&name);
    for (attr, value) in element.props.attrs.iter() {
        match value {
            Value::Bool(true) => {
                let _ = write!(out, " {attr}");
            }
            Value::Str(s) => {
                let _ = write!(out, " {attr}=\"{s}\"");
            }
            Value::Number(n) => {
                let _ = write!(out, " {attr}=\"{n}\"");
            }
            _ => {}
        }
    }
    out.push('>');
    element.children().iter().for_each(|n| write_node(out, n));
    out.push_str("</");
    out.push_str(&name);
    out.push('>');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Binding, Component, MountTarget};

    #[test]
    fn components_expand_to_host_nodes() {
        let greeting = Component::function("Greeting", |props, _| {
            let who = props.get("who").and_then(Value::as_str).unwrap_or("nobody");
            Ok(Element::tag("span").with_child(alloc::format!("hi {who}")).into())
        });
        let tree: Node = Element::tag("div")
            .with_attr("class", "root")
            .with_child(Element::component(&greeting).with_attr("who", "you"))
            .into();
        let expanded = expand(&tree).unwrap();
        assert_eq!(to_markup(&expanded), "<div class=\"root\"><span>hi you</span></div>");
    }

    #[test]
    fn forward_ref_receives_binding() {
        let inner = Component::function("Input", |_, binding| {
            if let Some(b) = binding {
                b.set("mounted");
            }
            Ok(Element::tag("input").into())
        });
        let forwarded = Component::forward_ref(inner.clone());
        let binding = Binding::new();
        expand(&Element::component(&forwarded).with_binding(&binding).into()).unwrap();
        assert_eq!(binding.get(), Value::from("mounted"));

        let plain = Binding::new();
        expand(&Element::component(&inner).with_binding(&plain).into()).unwrap();
        assert_eq!(plain.get(), Value::Undefined, "plain components never see the binding");
    }

    #[test]
    fn portals_and_fragments_print_their_content() {
        let tree: Node = Element::fragment()
            .with_child(Portal {
                content: "inside".into(),
                target: MountTarget::new("modal"),
                key: None,
            })
            .with_child(3.0)
            .into();
        assert_eq!(to_markup(&tree), "<#portal modal>inside</#portal>3");
    }
}
