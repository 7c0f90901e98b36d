// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Client side navigation for links.
//!
//! Every `<a>` element with an `href` gets an `on_click` handler that calls a
//! navigate callback with the link target, unless it already has a handler.
//! By default only relative links are handled: anything starting with `//`
//! or `scheme://` is left to the host.

use alloc::rc::Rc;

use trellis_deep::{Policy, Registry};
use trellis_node::{Component, Func, Value};

/// Attribute receiving the click handler.
pub const ON_CLICK: &str = "on_click";

/// Navigation callback.
pub type NavigateFn = Rc<dyn Fn(&str)>;

/// Options for [`policy`].
#[derive(Clone)]
pub struct HrefOptions {
    /// Policy id. Defaults to `"hrefHandler"`.
    pub id: Rc<str>,
    /// Called with the link target when a handled link is clicked.
    pub navigate: NavigateFn,
    /// Only handle relative links. Defaults to `true`.
    pub only_relative: bool,
}

impl HrefOptions {
    /// Options calling `navigate` for relative links.
    pub fn new(navigate: impl Fn(&str) + 'static) -> Self {
        Self {
            id: "hrefHandler".into(),
            navigate: Rc::new(navigate),
            only_relative: true,
        }
    }

    /// Use a different policy id.
    #[must_use]
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.into();
        self
    }

    /// Handle absolute links too.
    #[must_use]
    pub fn with_only_relative(mut self, only_relative: bool) -> Self {
        self.only_relative = only_relative;
        self
    }
}

impl core::fmt::Debug for HrefOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HrefOptions")
            .field("id", &self.id)
            .field("only_relative", &self.only_relative)
            .finish_non_exhaustive()
    }
}

/// Returns `true` for `//host/...` and `scheme://...` targets.
pub fn is_absolute(href: &str) -> bool {
    let rest = match href.split_once(':') {
        Some((scheme, rest))
            if !scheme.is_empty()
                && scheme.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') =>
        {
            rest
        }
        _ => href,
    };
    rest.starts_with("//")
}

/// The link handling policy.
pub fn policy(options: &HrefOptions) -> Rc<Policy> {
    let navigate = options.navigate.clone();
    let only_relative = options.only_relative;
    Rc::new(Policy::new(options.id.clone()).with_map_element(move |mut el, _| {
        let href = match el.attr("href").and_then(Value::as_str) {
            Some(href) if el.ty.tag() == Some("a") => href,
            _ => return Ok(el.into()),
        };
        if (only_relative && is_absolute(href)) || el.props.attrs.contains(ON_CLICK) {
            return Ok(el.into());
        }
        let href: Rc<str> = href.into();
        let navigate = navigate.clone();
        let handler = Func::new(move |_| {
            navigate(&href);
            Value::Bool(false)
        });
        el.props.attrs.insert(ON_CLICK, handler);
        Ok(el.into())
    }))
}

/// Decorate `component` with the link handling policy.
pub fn apply(registry: &Registry, component: &Component, options: &HrefOptions) -> Component {
    registry.wrap(component, &policy(options))
}
