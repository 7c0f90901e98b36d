// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Conditional branches and class composition applied to a whole tree.
//!
//! This example shows how to combine:
//! - `trellis_directives::if_else` for `x-if` / `x-else` branches,
//! - `trellis_directives::classes` for `x-tw` class names,
//! - `trellis_deep::Registry::root` to decorate everything under a root.
//!
//! The `Row` component never mentions either policy. Its children are
//! decorated because the root is.
//!
//! Run:
//! - `cargo run -p trellis_demos --example row_if_else`

use trellis_deep::Registry;
use trellis_directives::{classes, if_else};
use trellis_node::{Component, Element, Node, RenderError, render};

fn cell(text: &str) -> Element {
    Element::tag("td").with_child(text)
}

fn row(flag: bool) -> Component {
    Component::function("Row", move |_, _| {
        Ok(Element::tag("tr")
            .with_child(cell("A").with_attr("x-if", flag).with_attr("x-tw", "yes"))
            .with_child(cell("B").with_attr("x-else", true).with_attr("x-tw", "no"))
            .with_child(cell("C"))
            .into())
    })
}

fn table(flag: bool) -> Component {
    let row = row(flag);
    Component::function("Table", move |_, _| {
        Ok(Element::tag("table")
            .with_child(Element::component(&row).with_key("r1"))
            .into())
    })
}

fn main() -> Result<(), RenderError> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_target(false)
        .init();

    let policies = [
        if_else::policy(&if_else::IfElseOptions::default()),
        classes::policy(&classes::ClassOptions::tw()),
    ];

    for flag in [true, false] {
        let registry = Registry::new();
        let root = registry.root(vec![Element::component(&table(flag)).into()], &policies);
        let html = render::to_markup(&render::expand(&Node::from(root))?);
        println!("\n== flag = {flag} ==");
        println!("{html}");
        println!("decorations cached: {}", registry.len());
    }

    // A dangling `x-else` is reported instead of rendered.
    let broken = Component::function("Broken", |_, _| {
        Ok(Element::tag("p")
            .with_child(Element::tag("span").with_attr("x-else", true))
            .into())
    });
    let registry = Registry::new();
    let root = registry.root(vec![Element::component(&broken).into()], &policies);
    match render::expand(&Node::from(root)) {
        Ok(node) => println!("\nunexpected: {}", render::to_markup(&node)),
        Err(error) => println!("\n== misplaced directive ==\n{error}"),
    }
    Ok(())
}
