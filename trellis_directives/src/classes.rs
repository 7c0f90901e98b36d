// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Class composition with `x-tw` and `x-clsx`.
//!
//! The directive value is composed with the element's existing class
//! attribute, directive first, following [`clsx`] rules.

use alloc::rc::Rc;
use alloc::string::String;

use trellis_deep::{Policy, Registry};
use trellis_node::{Component, Value};

/// Options for [`policy`].
#[derive(Clone, Debug)]
pub struct ClassOptions {
    /// Policy id.
    pub id: Rc<str>,
    /// Directive attribute carrying extra classes.
    pub directive: Rc<str>,
    /// Class attribute composed into.
    pub attr: Rc<str>,
}

impl ClassOptions {
    /// `x-tw` under the id `"tw"`, meant for utility class strings.
    pub fn tw() -> Self {
        Self {
            id: "tw".into(),
            directive: "x-tw".into(),
            attr: "class".into(),
        }
    }

    /// `x-clsx` under the id `"clsx"`, accepting any [`clsx`] input.
    pub fn clsx() -> Self {
        Self {
            id: "clsx".into(),
            directive: "x-clsx".into(),
            attr: "class".into(),
        }
    }

    /// Use a different policy id.
    #[must_use]
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.into();
        self
    }
}

impl Default for ClassOptions {
    fn default() -> Self {
        Self::tw()
    }
}

/// Flatten a class value into a space separated class string.
///
/// Strings and non-zero numbers are used as they are, lists are flattened
/// recursively and attribute maps contribute the names of their truthy
/// entries. Falsy values and anything else are skipped.
///
/// ```rust
/// use trellis_directives::classes::clsx;
/// use trellis_node::{Attrs, Value};
///
/// let flags = Attrs::new().with("active", true).with("hidden", false);
/// let value = Value::List(vec!["btn".into(), Value::Null, flags.into(), 2.into()]);
/// assert_eq!(clsx(&value), "btn active 2");
/// ```
pub fn clsx(value: &Value) -> String {
    let mut out = String::new();
    push_classes(&mut out, value);
    out
}

fn push_classes(out: &mut String, value: &Value) {
    match value {
        Value::Str(s) if !s.is_empty() => push_class(out, s),
        Value::Number(n) if value.is_truthy() => push_class(out, &alloc::format!("{n}")),
        Value::List(items) => items.iter().for_each(|item| push_classes(out, item)),
        Value::Attrs(flags) => flags
            .iter()
            .filter(|(_, on)| on.is_truthy())
            .for_each(|(name, _)| push_class(out, name)),
        _ => {}
    }
}

fn push_class(out: &mut String, class: &str) {
    if !out.is_empty() {
        out.push(' ');
    }
    out.push_str(class);
}

/// The class composition policy.
pub fn policy(options: &ClassOptions) -> Rc<Policy> {
    let attr = options.attr.clone();
    Rc::new(
        Policy::new(options.id.clone())
            .with_directive(&options.directive)
            .with_map_element(move |mut el, directive| {
                let existing = el.props.attrs.get(&attr).cloned().unwrap_or_default();
                let composed = clsx(&Value::List(alloc::vec![
                    directive.value().cloned().unwrap_or_default(),
                    existing,
                ]));
                if composed.is_empty() {
                    el.props.attrs.remove(&attr);
                } else {
                    el.props.attrs.insert(attr.clone(), composed);
                }
                Ok(el.into())
            }),
    )
}

/// Decorate `component` with the class composition policy.
pub fn apply(registry: &Registry, component: &Component, options: &ClassOptions) -> Component {
    registry.wrap(component, &policy(options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use trellis_node::{Attrs, Element, Node, render};

    #[test]
    fn clsx_skips_falsy_values() {
        let value = Value::List(vec![
            "".into(),
            0.into(),
            false.into(),
            Value::Undefined,
            Value::List(vec!["a".into(), Value::List(vec!["b".into()])]),
        ]);
        assert_eq!(clsx(&value), "a b");
        assert_eq!(clsx(&Value::Number(1.5)), "1.5");
    }

    #[test]
    fn tw_puts_the_directive_first() {
        let card = Component::function("Card", |_, _| {
            Ok(Element::tag("p")
                .with_attr("x-tw", "text-red")
                .with_attr("class", "px-2")
                .into())
        });
        let registry = Registry::new();
        let root = apply(&registry, &card, &ClassOptions::tw());
        let out = render::expand(&Element::component(&root).into()).unwrap();
        assert_eq!(render::to_markup(&out), "<p class=\"text-red px-2\"></p>");
    }

    #[test]
    fn clsx_directive_accepts_flag_maps() {
        let registry = Registry::new();
        let policy = policy(&ClassOptions::clsx());
        let flags = Attrs::new().with("on", true).with("off", Value::Null);
        let tree: Node = Element::tag("li").with_attr("x-clsx", flags).into();
        let out = registry.walk(&policy, &tree).unwrap();
        let li = out.as_element().unwrap();
        assert_eq!(li.attr("class").and_then(Value::as_str), Some("on"));
        assert!(!li.props.attrs.contains("x-clsx"));
    }

    #[test]
    fn empty_composition_drops_the_attribute() {
        let registry = Registry::new();
        let tree: Node = Element::tag("i").with_attr("x-tw", false).into();
        let out = registry.walk(&policy(&ClassOptions::tw()), &tree).unwrap();
        assert!(out.as_element().unwrap().props.attrs.is_empty());
    }
}
