// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render error fallbacks.
//!
//! Every decorated component's render function is called inside an error
//! check. When it fails the error is logged and a fallback node is rendered
//! in its place, so one broken component does not take the whole tree down.
//!
//! The `x-error-fallback` attribute on a component element picks the
//! fallback for that component:
//!
//! - `true` (or absent) uses the default fallback,
//! - a node is rendered as it is,
//! - a [`Func`](trellis_node::Func) is called with the component's base name
//!   and its returned node is rendered.
//!
//! With [`ErrorFallbackOptions::for_all`] turned off only components whose
//! element carries the attribute are guarded.

use alloc::format;
use alloc::rc::Rc;

use tracing::warn;
use trellis_deep::{Policy, Registry};
use trellis_node::{Component, Element, ElementType, Node, Props, Value};

/// The directive.
pub const ERROR_FALLBACK: &str = "x-error-fallback";

/// Builds a fallback node from a component name.
pub type FallbackFn = Rc<dyn Fn(&str) -> Node>;

/// Options for [`policy`].
#[derive(Clone)]
pub struct ErrorFallbackOptions {
    /// Policy id. Defaults to `"errorFallback"`.
    pub id: Rc<str>,
    /// Guard every decorated component, not only those with the attribute.
    /// Defaults to `true`.
    pub for_all: bool,
    /// Fallback used when the attribute does not name one.
    pub default_fallback: FallbackFn,
}

impl Default for ErrorFallbackOptions {
    fn default() -> Self {
        Self {
            id: "errorFallback".into(),
            for_all: true,
            default_fallback: Rc::new(default_fallback),
        }
    }
}

impl ErrorFallbackOptions {
    /// Guard only components whose element carries the attribute.
    #[must_use]
    pub fn with_for_all(mut self, for_all: bool) -> Self {
        self.for_all = for_all;
        self
    }

    /// Replace the default fallback.
    #[must_use]
    pub fn with_default_fallback(mut self, fallback: impl Fn(&str) -> Node + 'static) -> Self {
        self.default_fallback = Rc::new(fallback);
        self
    }
}

impl core::fmt::Debug for ErrorFallbackOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ErrorFallbackOptions")
            .field("id", &self.id)
            .field("for_all", &self.for_all)
            .finish_non_exhaustive()
    }
}

/// `<div>[{name} error]</div>`
pub fn default_fallback(name: &str) -> Node {
    Element::tag("div")
        .with_attr("class", "error-fallback")
        .with_child(format!("[{name} error]"))
        .into()
}

fn fallback_for(name: &str, directive: Option<&Value>, default: &FallbackFn) -> Node {
    match directive {
        Some(Value::Node(node)) => node.clone(),
        Some(Value::Func(func)) => match func.call(&[Value::Str(name.into())]) {
            Value::Node(node) => node,
            Value::Str(text) => Node::Text(text),
            _ => default(name),
        },
        _ => default(name),
    }
}

/// The error fallback policy.
pub fn policy(options: &ErrorFallbackOptions) -> Rc<Policy> {
    let for_all = options.for_all;
    let default = options.default_fallback.clone();
    let policy = Policy::new(options.id.clone())
        .with_invoke_render(move |render, props, binding| {
            let directive = props.get(ERROR_FALLBACK).cloned();
            let stripped;
            let props = if directive.is_some() {
                stripped = strip(props);
                &stripped
            } else {
                props
            };
            if directive.is_none() && !for_all {
                return render.render(props, binding);
            }
            match render.render(props, binding) {
                Ok(node) => Ok(node),
                Err(error) => {
                    let name = render.base_name();
                    warn!(component = %name, %error, "render failed, using fallback");
                    Ok(fallback_for(&name, directive.as_ref(), &default))
                }
            }
        })
        .with_map_element(|mut el, _| {
            // Only component renders read the attribute.
            if !matches!(el.ty, ElementType::Component(_)) {
                el.props.attrs.remove(ERROR_FALLBACK);
            }
            Ok(el.into())
        });
    Rc::new(policy)
}

/// Decorate `component` with the error fallback policy.
pub fn apply(registry: &Registry, component: &Component, options: &ErrorFallbackOptions) -> Component {
    registry.wrap(component, &policy(options))
}

fn strip(props: &Props) -> Props {
    let mut props = props.clone();
    props.attrs.remove(ERROR_FALLBACK);
    props
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;
    use alloc::string::String;
    use trellis_node::{Func, RenderError, render};

    fn broken() -> Component {
        Component::function("Chart", |_, _| Err(RenderError::Failed("no data".into())))
    }

    fn page(chart: &Component, fallback: Option<Value>) -> Component {
        let chart = chart.clone();
        Component::function("Page", move |_, _| {
            let mut el = Element::component(&chart);
            if let Some(fallback) = &fallback {
                el = el.with_attr(ERROR_FALLBACK, fallback.clone());
            }
            Ok(Element::tag("main").with_child(el).with_child("rest").into())
        })
    }

    fn render_page(page: &Component, options: &ErrorFallbackOptions) -> Result<String, RenderError> {
        let registry = Registry::new();
        let root = apply(&registry, page, options);
        render::expand(&Element::component(&root).into()).map(|n| render::to_markup(&n))
    }

    #[test]
    fn failing_component_renders_default_fallback() {
        let html = render_page(&page(&broken(), None), &ErrorFallbackOptions::default()).unwrap();
        assert_eq!(
            html,
            "<main><div class=\"error-fallback\">[Chart error]</div>rest</main>"
        );
    }

    #[test]
    fn directive_picks_the_fallback() {
        let node = Value::Node(Element::tag("em").with_child("offline").into());
        let html = render_page(&page(&broken(), Some(node)), &ErrorFallbackOptions::default());
        assert_eq!(html.unwrap(), "<main><em>offline</em>rest</main>");

        let named = Func::new(|args| {
            let name = args.first().and_then(Value::as_str).unwrap_or_default();
            Value::Str(format!("{name} is down").into())
        });
        let html = render_page(&page(&broken(), Some(named.into())), &ErrorFallbackOptions::default());
        assert_eq!(html.unwrap(), "<main>Chart is downrest</main>");
    }

    #[test]
    fn opt_in_mode_only_guards_marked_components() {
        let options = ErrorFallbackOptions::default().with_for_all(false);
        let err = render_page(&page(&broken(), None), &options).unwrap_err();
        assert_eq!(err, RenderError::Failed("no data".into()));

        let html = render_page(&page(&broken(), Some(true.into())), &options).unwrap();
        assert!(html.contains("[Chart error]"));
    }

    #[test]
    fn render_function_never_sees_the_directive() {
        let seen = Component::function("Seen", |props, _| {
            Ok(Node::from(props.attrs.len() as f64))
        });
        let html = render_page(&page(&seen, Some(true.into())), &ErrorFallbackOptions::default());
        assert_eq!(html.unwrap(), "<main>0rest</main>");
    }

    #[test]
    fn markup_elements_lose_the_directive() {
        let registry = Registry::new();
        let tree: Node = Element::tag("p").with_attr(ERROR_FALLBACK, true).into();
        let out = registry
            .walk(&policy(&ErrorFallbackOptions::default()), &tree)
            .unwrap();
        assert!(out.as_element().unwrap().props.attrs.is_empty());
    }
}
