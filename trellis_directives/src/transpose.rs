// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Replacing an element with a node built around it, with `x-transpose`.
//!
//! The `x-transpose` value is a [`Func`](trellis_node::Func) called with the
//! element (as a [`Value::Node`]) that returns the replacement node. A custom
//! directive and render function can be configured instead; the render
//! function then receives the element and the custom directive's value.
//!
//! The replacement takes over the element's key, and has no key when the
//! element had none.

use alloc::rc::Rc;

use trellis_deep::{Policy, Registry};
use trellis_node::{Component, Element, Node, RenderError, RenderResult, Value};

/// The built-in directive.
pub const TRANSPOSE: &str = "x-transpose";

/// Renders the replacement for an element from a custom directive value.
pub type TransposeFn = Rc<dyn Fn(Element, &Value) -> RenderResult>;

/// A custom directive handled alongside `x-transpose`.
#[derive(Clone)]
pub struct CustomTranspose {
    /// Directive name.
    pub directive: Rc<str>,
    /// Render function used for every transposed element.
    pub render: TransposeFn,
}

impl core::fmt::Debug for CustomTranspose {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CustomTranspose")
            .field("directive", &self.directive)
            .finish_non_exhaustive()
    }
}

/// Options for [`policy`].
#[derive(Clone, Debug)]
pub struct TransposeOptions {
    /// Policy id. Defaults to `"transpose"`.
    pub id: Rc<str>,
    /// Optional custom directive.
    pub custom: Option<CustomTranspose>,
}

impl Default for TransposeOptions {
    fn default() -> Self {
        Self {
            id: "transpose".into(),
            custom: None,
        }
    }
}

impl TransposeOptions {
    /// Also act on `directive`, rendering replacements with `render`.
    #[must_use]
    pub fn with_custom(
        mut self,
        directive: &str,
        render: impl Fn(Element, &Value) -> RenderResult + 'static,
    ) -> Self {
        self.custom = Some(CustomTranspose {
            directive: directive.into(),
            render: Rc::new(render),
        });
        self
    }
}

/// The transpose policy.
pub fn policy(options: &TransposeOptions) -> Rc<Policy> {
    let custom = options.custom.clone();
    let mut names = alloc::vec![TRANSPOSE];
    if let Some(custom) = &custom {
        names.push(&custom.directive);
    }
    let policy = Policy::new(options.id.clone()).with_directives(names);
    Rc::new(policy.with_map_element(move |el, directive| {
        let values = directive.values();
        let key = el.key.clone();
        let replacement = match &custom {
            Some(custom) => (custom.render)(el, values.get(1).unwrap_or(&Value::Undefined))?,
            None => transpose_with(el, values.first().unwrap_or(&Value::Undefined))?,
        };
        Ok(match replacement {
            Node::Element(wrapper) => {
                let mut wrapper = Rc::unwrap_or_clone(wrapper);
                wrapper.key = key;
                wrapper.into()
            }
            other => other,
        })
    }))
}

fn transpose_with(el: Element, value: &Value) -> RenderResult {
    let Some(func) = value.as_func() else {
        return Err(invalid());
    };
    match func.call(&[Value::Node(el.into())]) {
        Value::Node(node) => Ok(node),
        Value::Str(text) => Ok(Node::Text(text)),
        Value::Undefined | Value::Null => Ok(Node::Empty),
        _ => Err(invalid()),
    }
}

fn invalid() -> RenderError {
    RenderError::InvalidDirective {
        directive: TRANSPOSE.into(),
        expected: "a function returning a node",
    }
}

/// Decorate `component` with the transpose policy.
pub fn apply(registry: &Registry, component: &Component, options: &TransposeOptions) -> Component {
    registry.wrap(component, &policy(options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_node::{Func, render};

    fn framed() -> Func {
        Func::new(|args| {
            let inner = args.first().and_then(Value::as_node).cloned().unwrap_or_default();
            Value::Node(Element::tag("figure").with_child(inner).into())
        })
    }

    #[test]
    fn element_is_wrapped_and_key_moves_out() {
        let registry = Registry::new();
        let tree: Node = Element::tag("img")
            .with_key("hero")
            .with_attr(TRANSPOSE, framed())
            .into();
        let out = registry.walk(&policy(&TransposeOptions::default()), &tree).unwrap();
        assert_eq!(render::to_markup(&out), "<figure><img></img></figure>");
        let figure = out.as_element().unwrap();
        assert_eq!(figure.key.as_ref().map(|k| k.as_str()), Some("hero"));
        assert!(figure.children()[0].as_element().unwrap().attr(TRANSPOSE).is_none());
    }

    #[test]
    fn keyless_element_leaves_the_replacement_keyless() {
        let keyed_wrapper = Func::new(|args| {
            let inner = args.first().and_then(Value::as_node).cloned().unwrap_or_default();
            Value::Node(Element::tag("figure").with_key("inner").with_child(inner).into())
        });
        let registry = Registry::new();
        let tree: Node = Element::tag("img").with_attr(TRANSPOSE, keyed_wrapper).into();
        let out = registry.walk(&policy(&TransposeOptions::default()), &tree).unwrap();
        assert_eq!(out.as_element().unwrap().key, None);
    }

    #[test]
    fn custom_directive_uses_the_render_function() {
        let options = TransposeOptions::default().with_custom("x-badge", |el, value| {
            let label = value.as_str().unwrap_or("?");
            Ok(Element::tag("span").with_child(el).with_child(label).into())
        });
        let registry = Registry::new();
        let tree: Node = Element::tag("b").with_attr("x-badge", "new").into();
        let out = registry.walk(&policy(&options), &tree).unwrap();
        assert_eq!(render::to_markup(&out), "<span><b></b>new</span>");
    }

    #[test]
    fn non_function_values_are_rejected() {
        let registry = Registry::new();
        let tree: Node = Element::tag("img").with_attr(TRANSPOSE, true).into();
        let err = registry
            .walk(&policy(&TransposeOptions::default()), &tree)
            .unwrap_err();
        assert!(matches!(err, RenderError::InvalidDirective { .. }));
    }
}
