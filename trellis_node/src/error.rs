// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors raised while rendering a component tree.

use alloc::string::String;

/// Error produced by a render function or by a policy callback during a render.
///
/// Decoration never swallows these: they travel up through the walker and the
/// decorated render function to whichever host invoked the render.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    /// A chained conditional directive was used without an opener among its
    /// preceding siblings.
    ///
    /// This is a markup authoring mistake, not a recoverable condition.
    #[error(
        "\"{policy}: {directive}\" found on an element, but the previous element has no \"x-if\" or \"x-else-if\""
    )]
    DirectiveOrder {
        /// Id of the policy that detected the misuse.
        policy: String,
        /// The offending directive name.
        directive: String,
    },
    /// A directive carried a value of the wrong shape.
    #[error("directive \"{directive}\" expects {expected}")]
    InvalidDirective {
        /// Directive name.
        directive: String,
        /// Human readable description of the accepted value.
        expected: &'static str,
    },
    /// A render function failed.
    #[error("render failed: {0}")]
    Failed(String),
}

/// Result of rendering a component or of a fallible policy callback.
pub type RenderResult = Result<crate::Node, RenderError>;
