// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Concurrency utilities for running futures with controlled parallelism.

use futures::stream::{FuturesUnordered, StreamExt};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Runs every task with at most `max_concurrent` of them in flight, and
/// waits for all of them.
///
/// Results come back in input order. A failing task does not stop the
/// others; callers decide what to do with errors once everything settled.
pub async fn join_with_concurrency<F, O>(
    max_concurrent: usize,
    tasks: impl IntoIterator<Item = F>,
) -> Vec<O>
where
    F: Future<Output = O>,
{
    let semaphore = Arc::new(Semaphore::new(max_concurrent.max(1)));
    let mut futs = FuturesUnordered::new();

    for (idx, task) in tasks.into_iter().enumerate() {
        let sem = semaphore.clone();
        futs.push(async move {
            let _permit = sem.acquire().await.expect("semaphore closed unexpectedly");
            (idx, task.await)
        });
    }

    let mut indexed_results = Vec::with_capacity(futs.len());
    while let Some(result) = futs.next().await {
        indexed_results.push(result);
    }
    indexed_results.sort_by_key(|(idx, _)| *idx);
    indexed_results.into_iter().map(|(_, val)| val).collect()
}
