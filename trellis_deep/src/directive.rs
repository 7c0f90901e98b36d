// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Directive extraction.

use alloc::vec::Vec;

use trellis_node::{Attrs, Value};

use crate::policy::{Directive, DirectiveNames};

/// Directive values pulled out of an attribute map.
#[derive(Clone, Debug, PartialEq)]
pub struct Extracted {
    /// Whether any declared directive key was present (whatever its value).
    pub present: bool,
    /// Captured values, shaped for the policy callback.
    pub directive: Directive,
    /// The attributes with every declared directive removed.
    pub attrs: Attrs,
}

/// Extract the directives named by `names` from `attrs`.
///
/// Presence, not truthiness, is what counts: a directive set to `false` or
/// [`Value::Undefined`] is present. Absent directives are captured as
/// [`Value::Undefined`]. Declared names are removed from the returned
/// attributes whether or not they were present.
///
/// Returns `None` when no directives are declared.
pub fn extract(attrs: &Attrs, names: &DirectiveNames) -> Option<Extracted> {
    if names.is_empty() {
        return None;
    }
    let mut stripped = attrs.clone();
    let mut present = false;
    let mut values = Vec::with_capacity(names.as_slice().len());
    for name in names.as_slice() {
        match stripped.remove(name) {
            Some(value) => {
                present = true;
                values.push(value);
            }
            None => values.push(Value::Undefined),
        }
    }
    let directive = match names {
        DirectiveNames::One(_) => Directive::One(values.pop().unwrap_or_default()),
        DirectiveNames::Many(_) | DirectiveNames::None => Directive::Many(values),
    };
    Some(Extracted {
        present,
        directive,
        attrs: stripped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use smallvec::smallvec;

    #[test]
    fn false_and_undefined_count_as_present() {
        let names = DirectiveNames::One("x-if".into());
        for value in [Value::Bool(false), Value::Undefined] {
            let attrs = Attrs::new().with("x-if", value.clone()).with("id", "a");
            let out = extract(&attrs, &names).unwrap();
            assert!(out.present);
            assert_eq!(out.directive, Directive::One(value));
            assert!(!out.attrs.contains("x-if"));
            assert!(out.attrs.contains("id"));
        }
    }

    #[test]
    fn absent_is_not_present() {
        let names = DirectiveNames::One("x-tw".into());
        let out = extract(&Attrs::new().with("class", "a"), &names).unwrap();
        assert!(!out.present);
        assert_eq!(out.directive, Directive::One(Value::Undefined));
    }

    #[test]
    fn many_names_capture_in_declaration_order() {
        let names = DirectiveNames::Many(smallvec!["x-a".into(), "x-b".into()]);
        let attrs = Attrs::new().with("x-b", 2).with("keep", true);
        let out = extract(&attrs, &names).unwrap();
        assert!(out.present);
        assert_eq!(out.directive, Directive::Many(vec![Value::Undefined, Value::from(2)]));
        assert_eq!(out.attrs, Attrs::new().with("keep", true));
    }

    #[test]
    fn no_names_means_no_extraction() {
        assert!(extract(&Attrs::new(), &DirectiveNames::None).is_none());
    }
}
