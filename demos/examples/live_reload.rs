// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Replaying decorations onto a reloaded component.
//!
//! A toy host stands in for a development server. It loads two versions of
//! the same `Card` component under one external id. The policies applied to
//! the first version are replayed onto the second, and every decorated
//! component is reported to the host under a composite id.
//!
//! Run:
//! - `cargo run -p trellis_demos --example live_reload`

use std::cell::RefCell;
use std::rc::Rc;

use tracing::info;
use trellis_deep::{Registry, ReloadBridge, ReloadHost};
use trellis_directives::{classes, error_fallback};
use trellis_node::{Component, Element, Node, RenderError, render};

#[derive(Default)]
struct ConsoleHost {
    ids: RefCell<Vec<String>>,
}

impl ReloadHost for ConsoleHost {
    fn register(&self, component: &Component, id: &str) {
        info!(id, component = %component.display_name(), "host registered");
        self.ids.borrow_mut().push(id.to_owned());
    }
}

fn card(version: u32) -> Component {
    Component::function("Card", move |_, _| {
        if version == 0 {
            return Err(RenderError::Failed("card is not ready".into()));
        }
        Ok(Element::tag("div")
            .with_attr("x-tw", "card")
            .with_child(format!("card v{version}"))
            .into())
    })
}

fn show(registry: &Registry, component: &Component) -> Result<String, RenderError> {
    let out = render::expand(&Node::from(Element::component(component)))?;
    if let Some(bridge) = registry.reload() {
        bridge.flush();
    }
    Ok(render::to_markup(&out))
}

fn main() -> Result<(), RenderError> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .init();

    let host = Rc::new(ConsoleHost::default());
    let bridge = ReloadBridge::new();
    bridge.install(host.clone());
    let registry = Registry::with_reload(bridge.clone());

    let tw = classes::policy(&classes::ClassOptions::tw());
    let fallback = error_fallback::policy(&error_fallback::ErrorFallbackOptions::default());

    // First load: the application decorates the card itself.
    let v1 = bridge.register(&registry, &card(1), "card.rs#Card");
    let v1 = registry.wrap(&registry.wrap(&v1, &tw), &fallback);
    println!("v1: {}", show(&registry, &v1)?);

    // The host reloads the module. Both policies come back without the
    // application doing anything.
    let v2 = bridge.register(&registry, &card(2), "card.rs#Card");
    println!("v2: {}", show(&registry, &v2)?);

    // A broken edit renders the fallback instead of failing the page.
    let v0 = bridge.register(&registry, &card(0), "card.rs#Card");
    println!("v0: {}", show(&registry, &v0)?);

    println!("\nhost ids:");
    for id in host.ids.borrow().iter() {
        println!("  {id}");
    }
    Ok(())
}
