// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Per-member behaviour for decoded variants.
//!
//! The state-history format wraps most records in single-purpose variants
//! (`transaction_trace` -> `transaction_trace_v0`, ...) so that new versions
//! can be added later. Those members carry no information beyond which shape
//! follows, so the registry unwraps them and the caller sees the inner record
//! directly. Members without an entry keep their tag as a
//! [`DecodedValue::Tagged`] pair.

use crate::types::DecodedValue;
use std::collections::HashMap;

/// Wrapper members of the state-history trace schema.
pub const STATE_HISTORY_WRAPPERS: &[&str] = &[
    "action_receipt_v0",
    "action_trace_v0",
    "action_trace_v1",
    "partial_transaction_v0",
    "transaction_trace_v0",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantBehavior {
    /// Drop the member name and return the inner value.
    Unwrap,
    /// Return `{member, value}`.
    Tagged,
}

#[derive(Debug, Clone)]
pub struct VariantRegistry {
    behaviors: HashMap<String, VariantBehavior>,
}

impl VariantRegistry {
    /// A registry that tags every member.
    pub fn empty() -> Self {
        Self {
            behaviors: HashMap::new(),
        }
    }

    /// A registry unwrapping [`STATE_HISTORY_WRAPPERS`].
    pub fn state_history() -> Self {
        let mut registry = Self::empty();
        for member in STATE_HISTORY_WRAPPERS {
            registry.register(*member, VariantBehavior::Unwrap);
        }
        registry
    }

    pub fn register(&mut self, member: impl Into<String>, behavior: VariantBehavior) -> &mut Self {
        self.behaviors.insert(member.into(), behavior);
        self
    }

    pub fn behavior(&self, member: &str) -> VariantBehavior {
        self.behaviors
            .get(member)
            .copied()
            .unwrap_or(VariantBehavior::Tagged)
    }

    pub fn resolve(&self, member: &str, inner: DecodedValue) -> DecodedValue {
        match self.behavior(member) {
            VariantBehavior::Unwrap => inner,
            VariantBehavior::Tagged => DecodedValue::tagged(member, inner),
        }
    }
}

impl Default for VariantRegistry {
    fn default() -> Self {
        Self::state_history()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registered_wrappers_unwrap() {
        let registry = VariantRegistry::default();
        for member in STATE_HISTORY_WRAPPERS {
            let inner = DecodedValue::record([("x", DecodedValue::UInt(1))]);
            assert_eq!(registry.resolve(member, inner.clone()), inner);
        }
    }

    #[test]
    fn test_unregistered_member_is_tagged() {
        let registry = VariantRegistry::default();
        let resolved = registry.resolve("block_header_v1", DecodedValue::UInt(1));
        assert_eq!(
            resolved,
            DecodedValue::Tagged {
                member: "block_header_v1".to_string(),
                value: Box::new(DecodedValue::UInt(1)),
            }
        );
    }

    #[test]
    fn test_register_new_wrapper() {
        let mut registry = VariantRegistry::empty();
        assert_eq!(registry.behavior("action_trace_v2"), VariantBehavior::Tagged);

        registry.register("action_trace_v2", VariantBehavior::Unwrap);
        assert_eq!(
            registry.resolve("action_trace_v2", DecodedValue::Bool(true)),
            DecodedValue::Bool(true)
        );
    }
}
