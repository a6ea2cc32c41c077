// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

pub mod trace;
pub mod value;

pub use trace::{ActionRef, DecodedTraceResult, RawTrace, TraceKey};
pub use value::DecodedValue;
