// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Deduplicating cache in front of the [`SchemaResolver`].
//!
//! Settled resolutions are indexed per account by block span: a lookup at
//! height `h` that found a schema published at `p` answers every height in
//! `[p, h]`, and a lookup at `h` that found nothing answers `[0, h]`.
//! Concurrent requests for the same `(account, block)` share a single
//! in-flight resolution. Failed resolutions are never cached.
//!
//! A cache can be scoped to a single trace decode (unbounded, dropped with
//! the call) or shared across calls, in which case it is bounded by the
//! number of accounts it retains and evicts the oldest account first.
//!
//! [`SchemaCache::invalidate`] and [`SchemaCache::clear`] bump a generation
//! counter; a resolution that was in flight across the bump is handed to its
//! waiters but not settled.

use crate::resolver::{ResolveError, Resolution, SchemaResolver};
use crate::store::SchemaStore;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tokio::sync::OnceCell;

type InFlightKey = (String, u32);
type InFlightMap = HashMap<InFlightKey, InFlight>;

struct InFlight {
    cell: Arc<OnceCell<Resolution>>,
    waiters: usize,
}

/// Membership of one caller in an in-flight resolution. The entry is removed
/// once the cell settles or the last waiter leaves, including by
/// cancellation.
struct InFlightGuard<'a> {
    in_flight: &'a Mutex<InFlightMap>,
    key: InFlightKey,
    cell: Arc<OnceCell<Resolution>>,
}

impl<'a> InFlightGuard<'a> {
    fn join(in_flight: &'a Mutex<InFlightMap>, key: InFlightKey) -> Self {
        let cell = {
            let mut map = in_flight.lock().unwrap_or_else(PoisonError::into_inner);
            let entry = map.entry(key.clone()).or_insert_with(|| InFlight {
                cell: Arc::new(OnceCell::new()),
                waiters: 0,
            });
            entry.waiters += 1;
            Arc::clone(&entry.cell)
        };
        Self {
            in_flight,
            key,
            cell,
        }
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        let mut map = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(entry) = map.get_mut(&self.key) else {
            return;
        };
        // Replaced after an invalidate; the newer entry has its own waiters.
        if !Arc::ptr_eq(&entry.cell, &self.cell) {
            return;
        }
        entry.waiters = entry.waiters.saturating_sub(1);
        if entry.waiters == 0 || self.cell.initialized() {
            map.remove(&self.key);
        }
    }
}

/// Snapshot of the counters that `invalidate` and `clear` bump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Generation {
    epoch: u64,
    account: u64,
}

#[derive(Debug, Clone)]
struct Span {
    from: u32,
    to: u32,
    resolution: Resolution,
}

impl Span {
    fn contains(&self, block_num: u32) -> bool {
        self.from <= block_num && block_num <= self.to
    }
}

#[derive(Debug, Default)]
struct SettledIndex {
    spans: HashMap<String, Vec<Span>>,
    /// Accounts in insertion order, oldest first.
    order: VecDeque<String>,
    /// Per-account invalidation counters.
    generations: HashMap<String, u64>,
    /// Bumped by `clear`.
    epoch: u64,
}

impl SettledIndex {
    fn lookup(&self, account: &str, block_num: u32) -> Option<Resolution> {
        self.spans
            .get(account)?
            .iter()
            .find(|span| span.contains(block_num))
            .map(|span| span.resolution.clone())
    }

    fn generation(&self, account: &str) -> Generation {
        Generation {
            epoch: self.epoch,
            account: self.generations.get(account).copied().unwrap_or(0),
        }
    }

    fn insert(&mut self, account: &str, block_num: u32, resolution: &Resolution) {
        let from = resolution.published_at().unwrap_or(0);
        if !self.spans.contains_key(account) {
            self.order.push_back(account.to_string());
        }
        let spans = self.spans.entry(account.to_string()).or_default();

        let published_at = resolution.published_at();
        match spans
            .iter_mut()
            .find(|span| span.from == from && span.resolution.published_at() == published_at)
        {
            Some(span) => span.to = span.to.max(block_num),
            None => spans.push(Span {
                from,
                to: block_num,
                resolution: resolution.clone(),
            }),
        }
    }

    fn evict_to(&mut self, capacity: usize) -> usize {
        let mut evicted = 0;
        while self.spans.len() > capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            if self.spans.remove(&oldest).is_some() {
                evicted += 1;
            }
        }
        evicted
    }

    fn remove(&mut self, account: &str) -> bool {
        *self.generations.entry(account.to_string()).or_default() += 1;
        self.order.retain(|a| a != account);
        self.spans.remove(account).is_some()
    }
}

pub struct SchemaCache<S> {
    resolver: SchemaResolver<S>,
    settled: RwLock<SettledIndex>,
    in_flight: Mutex<InFlightMap>,
    /// Maximum number of accounts retained; `None` for an unbounded cache.
    capacity: Option<usize>,
}

impl<S: SchemaStore> SchemaCache<S> {
    /// Unbounded cache, meant to live for a single trace decode.
    pub fn new(resolver: SchemaResolver<S>) -> Self {
        Self::with_capacity(resolver, None)
    }

    /// Cache retaining at most `capacity` accounts, meant to be shared.
    pub fn bounded(resolver: SchemaResolver<S>, capacity: usize) -> Self {
        Self::with_capacity(resolver, Some(capacity))
    }

    fn with_capacity(resolver: SchemaResolver<S>, capacity: Option<usize>) -> Self {
        Self {
            resolver,
            settled: RwLock::new(SettledIndex::default()),
            in_flight: Mutex::new(HashMap::new()),
            capacity,
        }
    }

    pub fn resolver(&self) -> &SchemaResolver<S> {
        &self.resolver
    }

    /// Settled resolution covering `(account, block_num)`, without resolving.
    pub fn get(&self, account: &str, block_num: u32) -> Option<Resolution> {
        self.settled
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .lookup(account, block_num)
    }

    pub async fn get_or_resolve(
        &self,
        account: &str,
        block_num: u32,
    ) -> Result<Resolution, ResolveError> {
        if let Some(hit) = self.get(account, block_num) {
            return Ok(hit);
        }

        let guard = InFlightGuard::join(&self.in_flight, (account.to_string(), block_num));

        guard
            .cell
            .get_or_try_init(|| async {
                let generation = {
                    let settled = self.settled.read().unwrap_or_else(PoisonError::into_inner);
                    // Another request may have settled a covering span since
                    // the first check.
                    if let Some(hit) = settled.lookup(account, block_num) {
                        return Ok(hit);
                    }
                    settled.generation(account)
                };
                let resolution = self.resolver.resolve(account, block_num).await?;
                self.settle(account, block_num, &resolution, generation);
                Ok::<_, ResolveError>(resolution)
            })
            .await
            .cloned()
    }

    fn settle(
        &self,
        account: &str,
        block_num: u32,
        resolution: &Resolution,
        generation: Generation,
    ) {
        let mut settled = self.settled.write().unwrap_or_else(PoisonError::into_inner);
        if settled.generation(account) != generation {
            tracing::debug!(account, block_num, "Schema cache invalidated during resolution");
            return;
        }
        settled.insert(account, block_num, resolution);
        if let Some(capacity) = self.capacity {
            let evicted = settled.evict_to(capacity);
            if evicted > 0 {
                tracing::debug!(evicted, capacity, "Evicted accounts from schema cache");
            }
        }
    }

    /// Drops every settled resolution for `account`. Returns whether the
    /// account was cached.
    pub fn invalidate(&self, account: &str) -> bool {
        let removed = self
            .settled
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(account);
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|(pending, _), _| pending != account);
        removed
    }

    pub fn clear(&self) {
        {
            let mut settled = self.settled.write().unwrap_or_else(PoisonError::into_inner);
            let epoch = settled.epoch.wrapping_add(1);
            *settled = SettledIndex {
                epoch,
                ..SettledIndex::default()
            };
        }
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Number of accounts with at least one settled resolution.
    pub fn len(&self) -> usize {
        self.settled
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .spans
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[cfg(test)]
    fn in_flight_len(&self) -> usize {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
