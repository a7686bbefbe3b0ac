//! Memoized structural equality.
//!
//! Passes that deduplicate or rewrite large trees compare the same pairs of
//! shared subtrees over and over. `EqualityCache` remembers the outcome per
//! unordered pair of node identities so each pair is computed once.
//!
//! The cache only changes the cost of a comparison, never its result:
//! nodes are immutable and identities are never reused, so a stored outcome
//! stays valid for as long as both nodes exist.
//!
//! Lookup order for `equals(a, b)`:
//! 1. same allocation -> equal
//! 2. different structural hash or different kind -> not equal
//! 3. cached outcome for the pair
//! 4. `a`'s `structurally_equals(b)`, then store the outcome
//!
//! The cache is sharded, each shard behind its own `RwLock`, so concurrent
//! passes can read and insert without a global lock. The process-wide
//! instance additionally evicts a pair when either node is dropped. It keeps
//! a partner index, sharded by node id, listing the live nodes each node has
//! a pair with. Dropping a node removes its pairs and its id from every
//! surviving partner's list, so the index only holds live nodes.

use crate::node::{Node, NodeId};
use rustc_hash::{FxHashMap, FxHasher};
use smallvec::SmallVec;
use std::hash::{Hash, Hasher};
use std::sync::{
    LazyLock, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard,
};

#[cfg(feature = "cache-metrics")]
use std::sync::atomic::{AtomicU64, Ordering};

const DEFAULT_SHARDS: usize = 16;

static GLOBAL: LazyLock<EqualityCache> = LazyLock::new(|| EqualityCache {
    tracks_lifetimes: true,
    ..EqualityCache::new()
});

/// Unordered pair of node identities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct PairKey(NodeId, NodeId);

impl PairKey {
    fn new(a: NodeId, b: NodeId) -> Self {
        if a <= b { PairKey(a, b) } else { PairKey(b, a) }
    }
}

type Shard = RwLock<FxHashMap<PairKey, bool>>;

type Partners = SmallVec<[NodeId; 4]>;
type PartnerShard = Mutex<FxHashMap<NodeId, Partners>>;

/// Snapshot of cache counters. Counters stay zero unless the
/// `cache-metrics` feature is enabled; `entries` is always live.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub entries: usize,
}

#[cfg(feature = "cache-metrics")]
#[derive(Debug, Default)]
struct Metrics {
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

#[derive(Debug)]
pub struct EqualityCache {
    shards: Box<[Shard]>,
    /// Set only for the global instance, which nodes notify on drop.
    tracks_lifetimes: bool,
    /// Live pair partners per node. Filled only when `tracks_lifetimes`.
    partners: Box<[PartnerShard]>,
    #[cfg(feature = "cache-metrics")]
    metrics: Metrics,
}

impl EqualityCache {
    /// A fresh cache, e.g. scoped to one compiler pass.
    pub fn new() -> Self {
        Self::with_shards(DEFAULT_SHARDS)
    }

    /// A fresh cache with `shards` lock shards, rounded up to a power of two.
    pub fn with_shards(shards: usize) -> Self {
        let shards = shards.max(1).next_power_of_two();
        Self {
            shards: (0..shards).map(|_| Shard::default()).collect(),
            tracks_lifetimes: false,
            partners: (0..shards).map(|_| PartnerShard::default()).collect(),
            #[cfg(feature = "cache-metrics")]
            metrics: Metrics::default(),
        }
    }

    /// The process-wide cache used by `Node::equals` and `PartialEq`.
    pub fn global() -> &'static EqualityCache {
        &GLOBAL
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    pub fn equals(&self, a: &Node, b: &Node) -> bool {
        if a.ptr_eq(b) {
            return true;
        }
        if a.structural_hash() != b.structural_hash() || a.kind() != b.kind() {
            return false;
        }
        let key = PairKey::new(a.id(), b.id());
        if let Some(outcome) = self.lookup(key) {
            log::trace!("equality cache hit for ({}, {})", key.0, key.1);
            #[cfg(feature = "cache-metrics")]
            self.metrics.hits.fetch_add(1, Ordering::Relaxed);
            return outcome;
        }
        log::trace!("equality cache miss for ({}, {})", key.0, key.1);
        #[cfg(feature = "cache-metrics")]
        self.metrics.misses.fetch_add(1, Ordering::Relaxed);

        let outcome = a.op().structurally_equals(b, self);
        self.store(key, a, b, outcome);
        outcome
    }

    /// Cached outcome for the pair, if one has been computed.
    pub fn cached(&self, a: &Node, b: &Node) -> Option<bool> {
        self.lookup(PairKey::new(a.id(), b.id()))
    }

    pub fn len(&self) -> usize {
        self.shards.iter().map(|shard| read(shard).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(|shard| read(shard).is_empty())
    }

    pub fn clear(&self) {
        for shard in self.shards.iter() {
            write(shard).clear();
        }
        for shard in self.partners.iter() {
            lock(shard).clear();
        }
        log::debug!("equality cache cleared");
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            #[cfg(feature = "cache-metrics")]
            hits: self.metrics.hits.load(Ordering::Relaxed),
            #[cfg(feature = "cache-metrics")]
            misses: self.metrics.misses.load(Ordering::Relaxed),
            #[cfg(feature = "cache-metrics")]
            evictions: self.metrics.evictions.load(Ordering::Relaxed),
            entries: self.len(),
            ..CacheStats::default()
        }
    }

    /// Drop every pair involving `id`, and `id` from each partner's list.
    /// Called when a node that entered this cache is dropped.
    pub(crate) fn evict(&self, id: NodeId) {
        let Some(partners) = lock(self.partner_shard(id)).remove(&id) else {
            return;
        };
        for partner in partners {
            let key = PairKey::new(id, partner);
            if write(self.shard(key)).remove(&key).is_some() {
                log::trace!("equality cache evicted ({}, {})", key.0, key.1);
                #[cfg(feature = "cache-metrics")]
                self.metrics.evictions.fetch_add(1, Ordering::Relaxed);
            }
            let mut index = lock(self.partner_shard(partner));
            if let Some(list) = index.get_mut(&partner) {
                list.retain(|other| *other != id);
                if list.is_empty() {
                    index.remove(&partner);
                }
            }
        }
    }

    /// Number of live partners `id` has a pair with.
    #[cfg(test)]
    fn partner_count(&self, id: NodeId) -> usize {
        lock(self.partner_shard(id)).get(&id).map_or(0, |list| list.len())
    }

    fn lookup(&self, key: PairKey) -> Option<bool> {
        read(self.shard(key)).get(&key).copied()
    }

    fn store(&self, key: PairKey, a: &Node, b: &Node, outcome: bool) {
        let inserted = write(self.shard(key)).insert(key, outcome).is_none();
        // a racing thread may have stored the same pair first
        if self.tracks_lifetimes && inserted {
            self.link(a, b.id());
            self.link(b, a.id());
        }
    }

    fn link(&self, node: &Node, partner: NodeId) {
        node.mark_cached();
        lock(self.partner_shard(node.id()))
            .entry(node.id())
            .or_default()
            .push(partner);
    }

    fn partner_shard(&self, id: NodeId) -> &PartnerShard {
        let mut hasher = FxHasher::default();
        id.hash(&mut hasher);
        let index = hasher.finish() as usize & (self.partners.len() - 1);
        &self.partners[index]
    }

    fn shard(&self, key: PairKey) -> &Shard {
        let mut hasher = FxHasher::default();
        key.hash(&mut hasher);
        let index = hasher.finish() as usize & (self.shards.len() - 1);
        &self.shards[index]
    }
}

impl Default for EqualityCache {
    fn default() -> Self {
        Self::new()
    }
}

// Stored outcomes stay correct even if a writer panicked mid-insert.
fn read(shard: &Shard) -> RwLockReadGuard<'_, FxHashMap<PairKey, bool>> {
    shard.read().unwrap_or_else(PoisonError::into_inner)
}

fn write(shard: &Shard) -> RwLockWriteGuard<'_, FxHashMap<PairKey, bool>> {
    shard.write().unwrap_or_else(PoisonError::into_inner)
}

fn lock(shard: &PartnerShard) -> MutexGuard<'_, FxHashMap<NodeId, Partners>> {
    shard.lock().unwrap_or_else(PoisonError::into_inner)
}
