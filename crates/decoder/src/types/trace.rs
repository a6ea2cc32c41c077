// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Trace-level types shared by the store, the pipeline and the binary.

use super::DecodedValue;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Raw trace bytes as supplied by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTrace {
    pub block_num: u32,
    pub block_time: DateTime<Utc>,
    pub data: Vec<u8>,
}

/// Key of a trace in the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TraceKey {
    /// Hex transaction id.
    TransactionId(String),
    /// Monotonic trace sequence number.
    Sequence(u64),
}

impl fmt::Display for TraceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceKey::TransactionId(id) => write!(f, "trx_id={}", id),
            TraceKey::Sequence(seq) => write!(f, "seq={}", seq),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedTraceResult {
    pub block_num: u32,
    pub block_time: DateTime<Utc>,
    pub trace: DecodedValue,
}

/// One action found inside a decoded trace, before its payload is decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRef {
    pub account: String,
    pub action_name: String,
    pub raw_data: Vec<u8>,
}

impl ActionRef {
    /// Reads an `action` record (`account`, `name`, `data`). Returns `None`
    /// when the record does not have that shape, which includes an action
    /// whose `data` was already decoded.
    pub fn from_action(act: &DecodedValue) -> Option<Self> {
        Some(Self {
            account: act.field("account")?.as_str()?.to_string(),
            action_name: act.field("name")?.as_str()?.to_string(),
            raw_data: act.field("data")?.as_bytes()?.to_vec(),
        })
    }
}

/// Collects every action of a decoded `transaction_trace`, including those of
/// a nested `failed_dep_trace`.
pub fn collect_actions(trace: &DecodedValue) -> Vec<ActionRef> {
    let mut out = Vec::new();
    collect_into(trace, &mut out);
    out
}

fn collect_into(trace: &DecodedValue, out: &mut Vec<ActionRef>) {
    if let Some(action_traces) = trace.field("action_traces").and_then(|v| v.as_sequence()) {
        out.extend(
            action_traces
                .iter()
                .filter_map(|at| at.field("act"))
                .filter_map(ActionRef::from_action),
        );
    }
    if let Some(nested) = trace.field("failed_dep_trace")
        && !nested.is_null()
    {
        collect_into(nested, out);
    }
}

/// Calls `f` with every `act` record of a decoded `transaction_trace`, in the
/// same order as [`collect_actions`].
pub fn for_each_action_mut<F>(trace: &mut DecodedValue, f: &mut F)
where
    F: FnMut(&mut DecodedValue),
{
    if let Some(action_traces) = trace
        .field_mut("action_traces")
        .and_then(|v| v.as_sequence_mut())
    {
        for action_trace in action_traces.iter_mut() {
            if let Some(act) = action_trace.field_mut("act") {
                f(act);
            }
        }
    }
    if let Some(nested) = trace.field_mut("failed_dep_trace")
        && !nested.is_null()
    {
        for_each_action_mut(nested, f);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn act(account: &str, name: &str, data: &[u8]) -> DecodedValue {
        DecodedValue::record([
            ("account", DecodedValue::from(account)),
            ("name", DecodedValue::from(name)),
            ("authorization", DecodedValue::Sequence(vec![])),
            ("data", DecodedValue::Bytes(data.to_vec())),
        ])
    }

    fn trace(acts: Vec<DecodedValue>, failed_dep: DecodedValue) -> DecodedValue {
        DecodedValue::record([
            (
                "action_traces",
                DecodedValue::Sequence(
                    acts.into_iter()
                        .map(|a| DecodedValue::record([("act", a)]))
                        .collect(),
                ),
            ),
            ("failed_dep_trace", failed_dep),
        ])
    }

    #[test]
    fn test_collect_actions_includes_failed_dep_trace() {
        let inner = trace(vec![act("carol", "burn", &[3])], DecodedValue::Null);
        let outer = trace(
            vec![act("alice", "transfer", &[1]), act("bob", "issue", &[2])],
            inner,
        );

        let actions = collect_actions(&outer);
        let accounts: Vec<_> = actions.iter().map(|a| a.account.as_str()).collect();
        assert_eq!(accounts, vec!["alice", "bob", "carol"]);
        assert_eq!(actions[2].raw_data, vec![3]);
    }

    #[test]
    fn test_decoded_action_is_not_collected() {
        let mut decoded = act("alice", "transfer", &[1]);
        *decoded.field_mut("data").unwrap() = DecodedValue::record([("memo", "hi".into())]);
        assert!(ActionRef::from_action(&decoded).is_none());
    }

    #[test]
    fn test_for_each_action_mut_visits_all() {
        let inner = trace(vec![act("carol", "burn", &[3])], DecodedValue::Null);
        let mut outer = trace(vec![act("alice", "transfer", &[1])], inner);

        let mut seen = Vec::new();
        for_each_action_mut(&mut outer, &mut |act| {
            seen.push(act.field("account").and_then(|v| v.as_str()).unwrap().to_string());
            *act.field_mut("data").unwrap() = DecodedValue::Null;
        });

        assert_eq!(seen, vec!["alice", "carol"]);
        assert!(collect_actions(&outer).is_empty());
    }
}
