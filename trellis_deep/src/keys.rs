// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Turning walked children back into a child list.

use alloc::format;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use trellis_node::{Element, ElementFlags, Key, Node};

use crate::policy::KeyStrategy;

impl KeyStrategy {
    /// Child list for an element whose walked children are `walked`, plus the
    /// flags to add to the element itself.
    pub(crate) fn reconcile(self, walked: Node) -> (Vec<Node>, ElementFlags) {
        match self {
            Self::Spread => (spread(walked), ElementFlags::empty()),
            Self::HostMapping => {
                let mut out = Vec::new();
                for (index, item) in spread(walked).into_iter().enumerate() {
                    map_with_keys(item, "", index, &mut out);
                }
                (out, ElementFlags::empty())
            }
            Self::PreValidated => {
                let children = spread(walked)
                    .into_iter()
                    .map(|child| match child {
                        Node::Element(el) if !el.flags.contains(ElementFlags::KEY_VALIDATED) => {
                            let mut el = Element::clone(&el);
                            el.flags |= ElementFlags::KEY_VALIDATED;
                            el.into()
                        }
                        other => other,
                    })
                    .collect();
                (children, ElementFlags::KEY_VALIDATED)
            }
        }
    }
}

fn spread(walked: Node) -> Vec<Node> {
    match walked {
        Node::List(items) => items,
        Node::Empty => Vec::new(),
        other => vec![other],
    }
}

// Key-less elements and portals get `.{path}` where the path joins positions
// through nested lists with `:`. Explicit keys are kept unless they start with
// `.`, in which case they move under `.$` so they never meet a synthetic key.
fn map_with_keys(node: Node, prefix: &str, index: usize, out: &mut Vec<Node>) {
    let segment: String = if prefix.is_empty() {
        format!("{index}")
    } else {
        format!("{prefix}:{index}")
    };
    match node {
        Node::Empty => {}
        Node::List(items) => {
            for (i, item) in items.into_iter().enumerate() {
                map_with_keys(item, &segment, i, out);
            }
        }
        Node::Element(el) => match host_key(el.key.as_ref(), &segment) {
            Some(key) => {
                let mut el = Element::clone(&el);
                el.key = Some(key);
                out.push(el.into());
            }
            None => out.push(Node::Element(el)),
        },
        Node::Portal(portal) => match host_key(portal.key.as_ref(), &segment) {
            Some(key) => {
                let mut portal = trellis_node::Portal::clone(&portal);
                portal.key = Some(key);
                out.push(Node::Portal(Rc::new(portal)));
            }
            None => out.push(Node::Portal(portal)),
        },
        other => out.push(other),
    }
}

/// Replacement key under [`KeyStrategy::HostMapping`], or `None` to keep the
/// explicit key as it is.
fn host_key(explicit: Option<&Key>, segment: &str) -> Option<Key> {
    match explicit {
        None => Some(Key::from(format!(".{segment}"))),
        Some(key) if key.as_str().starts_with('.') => Some(Key::from(format!(".${key}"))),
        Some(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn keyed(key: &str) -> Node {
        Element::tag("li").with_key(key).into()
    }

    #[test]
    fn spread_removes_one_level_only() {
        let nested = Node::List(vec![keyed("a"), Node::List(vec![keyed("b")])]);
        let (children, flags) = KeyStrategy::Spread.reconcile(nested);
        assert_eq!(children.len(), 2);
        assert!(matches!(children[1], Node::List(_)));
        assert!(flags.is_empty());
        assert!(KeyStrategy::Spread.reconcile(Node::Empty).0.is_empty());
        assert_eq!(KeyStrategy::Spread.reconcile("x".into()).0.len(), 1);
    }

    #[test]
    fn host_mapping_flattens_and_keys_keyless_elements() {
        let nested = Node::List(vec![
            keyed("a"),
            Node::Empty,
            Node::List(vec![Element::tag("li").into(), "text".into()]),
            Element::tag("li").into(),
        ]);
        let (children, _) = KeyStrategy::HostMapping.reconcile(nested);
        let keys: Vec<Option<&str>> = children.iter().map(|n| n.key().map(Key::as_str)).collect();
        assert_eq!(keys, [Some("a"), Some(".2:0"), None, Some(".3")]);
    }

    #[test]
    fn host_mapping_keeps_dotted_user_keys_apart_from_synthetic_ones() {
        let children = Node::List(vec![keyed(".1"), Element::tag("li").into(), keyed(".$.1")]);
        let (children, _) = KeyStrategy::HostMapping.reconcile(children);
        let keys: Vec<&str> = children.iter().filter_map(|n| n.key().map(Key::as_str)).collect();
        assert_eq!(keys, [".$.1", ".1", ".$.$.1"]);
        let mut unique = keys.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), keys.len(), "sibling keys must not collide");
    }

    #[test]
    fn pre_validated_marks_parent_and_children() {
        let (children, flags) =
            KeyStrategy::PreValidated.reconcile(Node::List(vec![keyed("a"), keyed("b")]));
        assert!(flags.contains(ElementFlags::KEY_VALIDATED));
        assert!(children.iter().all(|c| c
            .as_element()
            .is_some_and(|e| e.flags.contains(ElementFlags::KEY_VALIDATED))));
    }
}
