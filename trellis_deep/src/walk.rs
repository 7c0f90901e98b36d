// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The tree walker.
//!
//! Walking never mutates its input. Every element that is touched is rebuilt
//! from its snapshot, keeping key and binding.

use alloc::rc::Rc;
use alloc::vec::Vec;

use tracing::trace;
use trellis_node::{Element, ElementType, Node, Portal, Props, RenderError, RenderResult};

use crate::directive::extract;
use crate::policy::{Activation, Directive, Policy};
use crate::registry::Registry;

impl Registry {
    /// Decorate `node`, a render output of any shape, under `policy`.
    ///
    /// Nested components are replaced by their decorated counterparts from
    /// this registry, so the policy reaches every depth of the tree as it
    /// renders. Elements whose component was already decorated under the
    /// policy id are returned as they are.
    pub fn walk(&self, policy: &Rc<Policy>, node: &Node) -> RenderResult {
        Walker {
            registry: self,
            policy,
        }
        .node(node)
    }
}

struct Walker<'a> {
    registry: &'a Registry,
    policy: &'a Rc<Policy>,
}

impl Walker<'_> {
    fn node(&self, node: &Node) -> RenderResult {
        if let Some(filter) = self.policy.filter_nodes()
            && !filter(node)
        {
            return Ok(node.clone());
        }
        let mapped;
        let node = match self.policy.map_node() {
            Some(map) => {
                mapped = map(node)?;
                &mapped
            }
            None => node,
        };
        match node {
            Node::Empty | Node::Text(_) | Node::Number(_) | Node::Opaque(_) => Ok(node.clone()),
            Node::List(items) => self.list(items).map(Node::List),
            Node::Portal(portal) => Ok(Portal {
                content: self.node(&portal.content)?,
                target: portal.target.clone(),
                key: portal.key.clone(),
            }
            .into()),
            Node::Element(element) => self.element(node, element),
        }
    }

    fn list(&self, items: &[Node]) -> Result<Vec<Node>, RenderError> {
        items.iter().map(|item| self.node(item)).collect()
    }

    fn element(&self, node: &Node, element: &Element) -> RenderResult {
        if let Some(component) = element.ty.component()
            && component.is_decorated_by(self.policy.id())
        {
            trace!(
                policy = self.policy.id(),
                component = %component.display_name(),
                "element already decorated"
            );
            return Ok(node.clone());
        }

        let walked = Node::List(self.list(element.children())?);
        let children = match self.policy.map_children() {
            Some(map) => map(walked)?,
            None => walked,
        };
        let (children, flags) = self.policy.key_strategy().reconcile(children);

        let ty = match &element.ty {
            ElementType::Component(component) => {
                ElementType::Component(self.registry.wrap(component, self.policy))
            }
            other => other.clone(),
        };
        let mut rebuilt = Element {
            ty,
            props: Props {
                attrs: element.props.attrs.clone(),
                children,
            },
            key: element.key.clone(),
            binding: element.binding.clone(),
            flags: element.flags | flags,
        };

        let directive = match extract(&rebuilt.props.attrs, self.policy.directive_names()) {
            Some(extracted) => {
                rebuilt.props.attrs = extracted.attrs;
                if !extracted.present && self.policy.activation() == Activation::Present {
                    return Ok(rebuilt.into());
                }
                extracted.directive
            }
            None => Directive::None,
        };

        match self.policy.map_element() {
            Some(map) => map(rebuilt, directive),
            None => Ok(rebuilt.into()),
        }
    }
}
