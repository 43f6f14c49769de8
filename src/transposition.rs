//! Fixed-size, shared, lock-free [Transposition Table].
//!
//! The table caches search results for positions keyed by a 64-bit
//! fingerprint so that a tree search can recognize positions reached through
//! different move orders. All worker threads share one table and access it
//! without locks: every entry is a single [`AtomicU64`] read and written
//! with [`Ordering::Relaxed`], so an entry can never be observed torn, and
//! two writers racing on the same slot resolve by last-write-wins. A lost
//! update costs at most a missed cache hit or a suboptimal replacement.
//!
//! Entries live in clusters of [`CLUSTER_SIZE`] sharing one table index,
//! sized so a cluster never crosses a cache line. Replacement inside a full
//! cluster keeps the entry with the highest `depth - 8 * age`, where age is
//! the number of search generations since the entry was last touched.
//!
//! [Transposition Table]: https://www.chessprogramming.org/Transposition_Table

use std::alloc::{alloc_zeroed, dealloc, handle_alloc_error, Layout};
use std::ptr::NonNull;
use std::sync::atomic::{AtomicU64, Ordering};
use std::{mem, ptr, slice, thread};

use crate::core::{Bound, Depth, Key, Move, Value};

/// Number of entries sharing one table index.
pub const CLUSTER_SIZE: usize = 4;

const CACHE_LINE_SIZE: usize = 64;

/// Entries the occupancy estimator samples; see
/// [`TranspositionTable::hashfull`].
const HASHFULL_SAMPLE: usize = 1000;

/// The generation counter lives in the high 6 bits of the packed
/// generation+bound byte, so it advances in steps of 4 and the low 2 bits
/// stay free for [`Bound`].
const GENERATION_DELTA: u8 = 4;

/// Counter modulus (256) plus the bound bits, so the masked subtraction in
/// [`relative_age`] stays correct after the 8-bit counter wraps.
const GENERATION_CYCLE: u32 = 255 + GENERATION_DELTA as u32;

const GENERATION_MASK: u8 = 0xFC;

// Packed entry layout, least significant bits first.
const MOVE_SHIFT: u32 = 16;
const VALUE_SHIFT: u32 = 32;
const DEPTH_SHIFT: u32 = 48;
const GEN_BOUND_SHIFT: u32 = 56;

const MOVE_FIELD: u64 = 0xFFFF << MOVE_SHIFT;
const GEN_BOUND_FIELD: u64 = 0xFF << GEN_BOUND_SHIFT;

const fn pack(key16: u16, move16: u16, value: Value, depth: Depth, gen_bound: u8) -> u64 {
    key16 as u64
        | (move16 as u64) << MOVE_SHIFT
        | (value as u16 as u64) << VALUE_SHIFT
        | (depth as u64) << DEPTH_SHIFT
        | (gen_bound as u64) << GEN_BOUND_SHIFT
}

const fn key16_of(data: u64) -> u16 {
    data as u16
}

const fn move_of(data: u64) -> u16 {
    (data >> MOVE_SHIFT) as u16
}

const fn value_of(data: u64) -> Value {
    (data >> VALUE_SHIFT) as u16 as i16
}

const fn depth_of(data: u64) -> Depth {
    (data >> DEPTH_SHIFT) as u8
}

const fn gen_bound_of(data: u64) -> u8 {
    (data >> GEN_BOUND_SHIFT) as u8
}

const fn bound_bits_of(data: u64) -> u8 {
    gen_bound_of(data) & Bound::EXACT.bits()
}

/// An entry with a zero partial key and no bound has never been written,
/// which is what makes a plain zero-fill a valid bulk clear.
const fn is_empty_data(data: u64) -> bool {
    key16_of(data) == 0 && bound_bits_of(data) == 0
}

/// Cyclic distance from the current generation to the entry's stored one,
/// in steps of [`GENERATION_DELTA`]. The bound bits packed next to the
/// stored generation are masked out of the result.
const fn relative_age(gen_bound: u8, generation: u8) -> u32 {
    (GENERATION_CYCLE + generation as u32 - gen_bound as u32) & GENERATION_MASK as u32
}

/// Replacement worth of an entry: depth discounted by 8 per generation the
/// entry has not been touched. The least worthy entry of a full cluster is
/// the victim.
const fn replace_value(data: u64, generation: u8) -> i32 {
    depth_of(data) as i32 - relative_age(gen_bound_of(data), generation) as i32 * 2
}

/// One cached search result, packed into 64 bits:
///
/// | bits  | field                                          |
/// |-------|------------------------------------------------|
/// | 0-15  | high 16 bits of the position fingerprint       |
/// | 16-31 | best move (opaque handle, 0 = none)            |
/// | 32-47 | score                                          |
/// | 48-55 | depth in plies                                 |
/// | 56-63 | bound kind (low 2 bits) + generation (high 6)  |
///
/// The partial key is an in-cluster discriminator, not a full-key
/// comparison: two positions colliding on the top 16 bits are
/// indistinguishable, which the search layer accepts as part of the cache
/// contract.
#[derive(Debug, Default)]
pub struct Entry {
    data: AtomicU64,
}

impl Entry {
    fn load(&self) -> u64 {
        self.data.load(Ordering::Relaxed)
    }

    /// High 16 bits of the fingerprint that last populated this entry.
    #[must_use]
    pub fn key16(&self) -> u16 {
        key16_of(self.load())
    }

    /// Best move cached for the position, [`Move::NONE`] if unknown.
    #[must_use]
    pub fn best_move(&self) -> Move {
        Move::from_raw(move_of(self.load()))
    }

    /// Cached score.
    #[must_use]
    pub fn value(&self) -> Value {
        value_of(self.load())
    }

    /// Depth in plies at which the cached result was computed.
    #[must_use]
    pub fn depth(&self) -> Depth {
        depth_of(self.load())
    }

    /// How the cached score relates to the true one; empty for an entry
    /// that was never populated.
    #[must_use]
    pub fn bound(&self) -> Bound {
        Bound::from_bits_truncate(bound_bits_of(self.load()))
    }

    /// Returns `true` if this entry has never been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        is_empty_data(self.load())
    }

    /// Updates the entry in place with a freshly computed result.
    ///
    /// The previously stored move survives when the caller has no new one
    /// for the same position. The remaining fields are only overwritten when
    /// the slot held a different position, the new result is not drastically
    /// shallower than the cached one, or the new score is exact: a deep
    /// bound is not discarded for a much shallower one just because of
    /// index contention.
    ///
    /// `generation` must come from [`TranspositionTable::generation`] of the
    /// owning table.
    pub fn save(
        &self,
        key: Key,
        value: Value,
        bound: Bound,
        depth: Depth,
        best_move: Move,
        generation: u8,
    ) {
        debug_assert_eq!(generation & Bound::EXACT.bits(), 0);

        let data = self.load();
        let key16 = (key >> 48) as u16;
        let mut next = data;

        // Preserve any existing move for the same position.
        if !best_move.is_none() || key16 != key16_of(data) {
            next = (next & !MOVE_FIELD) | u64::from(best_move.raw()) << MOVE_SHIFT;
        }

        // Overwrite less valuable entries.
        if key16 != key16_of(data)
            || i32::from(depth) > i32::from(depth_of(data)) - 4
            || bound == Bound::EXACT
        {
            next = pack(key16, move_of(next), value, depth, generation | bound.bits());
        }

        if next != data {
            self.data.store(next, Ordering::Relaxed);
        }
    }
}

/// Entries sharing one table index. Two clusters fit a 64-byte cache line
/// exactly, so a probe touches a single line.
#[repr(C, align(32))]
struct Cluster {
    entries: [Entry; CLUSTER_SIZE],
}

const _: () = assert!(mem::size_of::<Entry>() == 8);
const _: () = assert!(mem::size_of::<Cluster>() == 32);
const _: () = assert!(CACHE_LINE_SIZE % mem::size_of::<Cluster>() == 0);
const _: () = assert!(HASHFULL_SAMPLE % CLUSTER_SIZE == 0);

/// Owner of the raw cache-line-aligned block backing the table. The
/// `&[Cluster]` views handed out by [`TranspositionTable`] are derived from
/// it and never outlive it.
struct Allocation {
    ptr: NonNull<Cluster>,
    layout: Layout,
}

impl Allocation {
    /// Allocates a zeroed, cache-line-aligned array of `clusters` clusters.
    ///
    /// Allocation failure is fatal: the table is load-bearing for search and
    /// a partial table has no usable meaning, so there is no degraded mode
    /// to fall back to.
    fn zeroed(clusters: usize) -> Self {
        debug_assert!(clusters > 0);
        let layout = Layout::from_size_align(
            clusters.saturating_mul(mem::size_of::<Cluster>()),
            CACHE_LINE_SIZE,
        )
        .expect("cluster array exceeds the address space");
        // SAFETY: `layout` has non-zero size.
        let block = unsafe { alloc_zeroed(layout) };
        let Some(ptr) = NonNull::new(block.cast::<Cluster>()) else {
            handle_alloc_error(layout);
        };
        Self { ptr, layout }
    }

    /// Owns no memory; stands in while a replacement block is requested.
    const fn empty() -> Self {
        Self {
            ptr: NonNull::dangling(),
            // SAFETY: the alignment is a non-zero power of two.
            layout: unsafe { Layout::from_size_align_unchecked(0, CACHE_LINE_SIZE) },
        }
    }
}

impl Drop for Allocation {
    fn drop(&mut self) {
        if self.layout.size() != 0 {
            // SAFETY: the block was allocated with exactly this layout.
            unsafe { dealloc(self.ptr.as_ptr().cast::<u8>(), self.layout) };
        }
    }
}

// SAFETY: the entries behind the pointer are only ever accessed through
// `AtomicU64`, and freeing or replacing the block requires `&mut
// TranspositionTable`.
unsafe impl Send for Allocation {}
unsafe impl Sync for Allocation {}

/// Shared transposition table.
///
/// Probing and saving take `&self` and are safe to call from many search
/// threads at once. Lifecycle operations ([`Self::resize`], [`Self::clear`],
/// [`Self::new_search`]) take `&mut self`: an exclusive borrow cannot be
/// obtained while any search thread still holds a reference, which is
/// exactly the "wait until the search is finished" precondition those
/// operations require.
pub struct TranspositionTable {
    table: Allocation,
    cluster_count: usize,
    /// Search age; the high 6 bits advance once per [`Self::new_search`],
    /// the low 2 bits stay zero so the counter combines directly with the
    /// bound bits of saved entries.
    generation8: u8,
}

impl Default for TranspositionTable {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SIZE_MB)
    }
}

impl TranspositionTable {
    /// Default memory budget in megabytes.
    pub const DEFAULT_SIZE_MB: usize = 16;

    /// Creates a table sized to the given megabyte budget, all entries
    /// empty.
    ///
    /// The entry array consumes the largest multiple of the cluster size
    /// that fits the budget.
    ///
    /// # Panics
    ///
    /// Panics if `megabytes` is zero. Terminates the process if the
    /// allocation itself fails.
    #[must_use]
    pub fn new(megabytes: usize) -> Self {
        assert!(megabytes > 0, "table budget must be at least one megabyte");
        let cluster_count =
            megabytes.saturating_mul(1024 * 1024) / mem::size_of::<Cluster>();
        Self {
            table: Allocation::zeroed(cluster_count),
            cluster_count,
            generation8: 0,
        }
    }

    /// Replaces the backing array with one sized to a new megabyte budget
    /// and zeroes it with `threads` workers. All cached entries are lost.
    ///
    /// Requires `&mut self`: callers must stop the search before resizing,
    /// and the borrow checker turns that protocol into a compile-time
    /// guarantee.
    ///
    /// # Panics
    ///
    /// Panics if `megabytes` is zero. Terminates the process if the
    /// allocation fails.
    pub fn resize(&mut self, megabytes: usize, threads: usize) {
        assert!(megabytes > 0, "table budget must be at least one megabyte");
        // Release the previous block before requesting the replacement so
        // peak usage never holds both tables.
        self.table = Allocation::empty();
        self.cluster_count = 0;

        let cluster_count =
            megabytes.saturating_mul(1024 * 1024) / mem::size_of::<Cluster>();
        self.table = Allocation::zeroed(cluster_count);
        self.cluster_count = cluster_count;
        self.clear(threads);
    }

    /// Zeroes every entry in place, splitting the array into `threads`
    /// contiguous ranges cleared concurrently. The call returns only after
    /// every worker has finished.
    ///
    /// `threads` is normally the configured search-thread count; zero is
    /// treated as one.
    pub fn clear(&mut self, threads: usize) {
        let threads = threads.max(1);
        let stride = self.cluster_count / threads;
        // SAFETY: `&mut self` guarantees no probes are in flight, and the
        // pointer is valid for `cluster_count` clusters.
        let mut rest =
            unsafe { slice::from_raw_parts_mut(self.table.ptr.as_ptr(), self.cluster_count) };

        thread::scope(|scope| {
            for index in 0..threads {
                // The last range absorbs the division remainder so the
                // whole array is covered exactly once.
                let len = if index == threads - 1 { rest.len() } else { stride };
                let (range, tail) = mem::take(&mut rest).split_at_mut(len);
                rest = tail;
                let _ = scope.spawn(move || {
                    // SAFETY: this worker has exclusive access to `range`,
                    // and all-zero bits are a valid (empty) entry.
                    unsafe { ptr::write_bytes(range.as_mut_ptr(), 0, range.len()) };
                });
            }
        });
    }

    /// Advances the search age. Called by the coordinating thread once
    /// before each new search root; entries saved earlier lose replacement
    /// worth from this point on.
    pub fn new_search(&mut self) {
        self.generation8 = self.generation8.wrapping_add(GENERATION_DELTA);
    }

    /// Current generation, to be passed to [`Entry::save`].
    #[must_use]
    pub const fn generation(&self) -> u8 {
        self.generation8
    }

    /// Number of entries in the table.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.cluster_count * CLUSTER_SIZE
    }

    /// Looks up `key` and returns an entry together with a hit flag.
    ///
    /// On a hit (or an empty slot in the key's cluster) the returned entry
    /// had its stored generation refreshed, so probing alone protects an
    /// entry from replacement for another generation. When the cluster is
    /// full of other positions, the least valuable entry is returned as the
    /// replacement victim with `found == false`.
    ///
    /// Callers are expected to [`Entry::save`] the search result into the
    /// returned entry either way; the save policy decides what actually
    /// gets written.
    #[must_use]
    pub fn probe(&self, key: Key) -> (&Entry, bool) {
        let cluster = &self.clusters()[self.cluster_index(key)];
        let key16 = (key >> 48) as u16;

        for entry in &cluster.entries {
            let data = entry.data.load(Ordering::Relaxed);
            if key16_of(data) == 0 || key16_of(data) == key16 {
                // Refresh the stored generation, keeping the bound bits.
                let refreshed = (data & !GEN_BOUND_FIELD)
                    | u64::from(self.generation8 | bound_bits_of(data)) << GEN_BOUND_SHIFT;
                entry.data.store(refreshed, Ordering::Relaxed);
                return (entry, !is_empty_data(data));
            }
        }

        let mut victim = &cluster.entries[0];
        let mut worth = replace_value(victim.data.load(Ordering::Relaxed), self.generation8);
        for entry in &cluster.entries[1..] {
            let candidate = replace_value(entry.data.load(Ordering::Relaxed), self.generation8);
            if candidate < worth {
                victim = entry;
                worth = candidate;
            }
        }
        (victim, false)
    }

    /// Hints the processor to pull the cluster for `key` into cache ahead
    /// of a probe. Has no observable effect.
    #[inline]
    pub fn prefetch(&self, key: Key) {
        #[cfg(target_arch = "x86_64")]
        // SAFETY: prefetching is a hint without memory effects.
        unsafe {
            use std::arch::x86_64::{_mm_prefetch, _MM_HINT_T0};
            let cluster = &self.clusters()[self.cluster_index(key)];
            _mm_prefetch(ptr::from_ref(cluster).cast::<i8>(), _MM_HINT_T0);
        }
        #[cfg(not(target_arch = "x86_64"))]
        let _ = key;
    }

    /// Estimates table occupancy in parts per thousand, as reported through
    /// the UCI `hashfull` field: the number of entries among the first 1000
    /// that are populated and belong to the current generation.
    ///
    /// The sample is the first 1000 entries of the array, not a spread
    /// across the whole table. Advisory only; never affects the search.
    #[must_use]
    pub fn hashfull(&self) -> usize {
        self.clusters()
            .iter()
            .take(HASHFULL_SAMPLE / CLUSTER_SIZE)
            .flat_map(|cluster| cluster.entries.iter())
            .filter(|entry| {
                let data = entry.data.load(Ordering::Relaxed);
                !is_empty_data(data) && (gen_bound_of(data) & GENERATION_MASK) == self.generation8
            })
            .count()
    }

    fn clusters(&self) -> &[Cluster] {
        // SAFETY: the allocation is valid for `cluster_count` clusters for
        // the lifetime of `self`, and entries are interior-atomic.
        unsafe { slice::from_raw_parts(self.table.ptr.as_ptr(), self.cluster_count) }
    }

    /// Maps a fingerprint to a cluster index: a fixed-point multiplication
    /// of the low 32 key bits against the cluster count, which spreads
    /// uniform keys evenly without restricting the table to power-of-two
    /// sizes and leaves the high 16 bits independent for the in-cluster
    /// partial key.
    fn cluster_index(&self, key: Key) -> usize {
        ((u64::from(key as u32) * self.cluster_count as u64) >> 32) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds a key that lands in the given cluster with the given partial
    /// key, inverting the fixed-point index mapping.
    fn key_in_cluster(table: &TranspositionTable, cluster: usize, key16: u16) -> Key {
        let clusters = (table.capacity() / CLUSTER_SIZE) as u64;
        let low = ((cluster as u64) << 32).div_ceil(clusters);
        assert!(low < 1 << 32);
        let key = u64::from(key16) << 48 | low;
        assert_eq!(table.cluster_index(key), cluster);
        key
    }

    #[test]
    fn zeroed_entry_is_empty() {
        let entry = Entry::default();
        assert!(entry.is_empty());
        assert_eq!(entry.bound(), Bound::empty());
        assert_eq!(entry.best_move(), Move::NONE);
        assert_eq!(entry.depth(), 0);
        assert_eq!(entry.value(), 0);
    }

    #[test]
    fn save_packs_all_fields() {
        let entry = Entry::default();
        let key = 0xABCD_1234_5678_9000;
        entry.save(key, -64, Bound::EXACT, 42, Move::from_raw(0x1A2B), 8);

        assert!(!entry.is_empty());
        assert_eq!(entry.key16(), 0xABCD);
        assert_eq!(entry.value(), -64);
        assert_eq!(entry.bound(), Bound::EXACT);
        assert_eq!(entry.depth(), 42);
        assert_eq!(entry.best_move(), Move::from_raw(0x1A2B));
    }

    #[test]
    fn save_preserves_move_for_same_position() {
        let entry = Entry::default();
        let key = 0x1111_0000_0000_0000;
        entry.save(key, 10, Bound::LOWER, 8, Move::from_raw(0x0042), 0);

        // A re-search of the same position without a best move keeps the
        // known good one.
        entry.save(key, 20, Bound::LOWER, 9, Move::NONE, 0);
        assert_eq!(entry.best_move(), Move::from_raw(0x0042));
        assert_eq!(entry.depth(), 9);
        assert_eq!(entry.value(), 20);
    }

    #[test]
    fn save_replaces_move_for_different_position() {
        let entry = Entry::default();
        entry.save(0x1111_0000_0000_0000, 10, Bound::LOWER, 8, Move::from_raw(0x0042), 0);

        // A different position claiming the slot brings its own move, even
        // if that move is "none".
        entry.save(0x2222_0000_0000_0000, 5, Bound::UPPER, 3, Move::NONE, 0);
        assert_eq!(entry.key16(), 0x2222);
        assert_eq!(entry.best_move(), Move::NONE);
        assert_eq!(entry.depth(), 3);
    }

    #[test]
    fn save_keeps_much_deeper_result() {
        let entry = Entry::default();
        let key = 0x1111_0000_0000_0000;
        entry.save(key, 10, Bound::LOWER, 10, Move::NONE, 0);

        // Drastically shallower result for the same position: dropped.
        entry.save(key, 99, Bound::LOWER, 5, Move::NONE, 0);
        assert_eq!(entry.depth(), 10);
        assert_eq!(entry.value(), 10);

        // Depth within 4 plies of the cached one: taken.
        entry.save(key, 77, Bound::UPPER, 7, Move::NONE, 0);
        assert_eq!(entry.depth(), 7);
        assert_eq!(entry.value(), 77);
    }

    #[test]
    fn exact_result_always_overwrites() {
        let entry = Entry::default();
        let key = 0x1111_0000_0000_0000;
        entry.save(key, 10, Bound::LOWER, 20, Move::NONE, 0);

        entry.save(key, -3, Bound::EXACT, 2, Move::NONE, 0);
        assert_eq!(entry.bound(), Bound::EXACT);
        assert_eq!(entry.depth(), 2);
        assert_eq!(entry.value(), -3);
    }

    #[test]
    fn probe_miss_then_hit() {
        let table = TranspositionTable::new(1);
        let key = key_in_cluster(&table, 17, 0x9D39);

        let (entry, found) = table.probe(key);
        assert!(!found);
        entry.save(key, 91, Bound::EXACT, 12, Move::from_raw(0x1A2B), table.generation());

        let (entry, found) = table.probe(key);
        assert!(found);
        assert_eq!(entry.key16(), 0x9D39);
        assert_eq!(entry.value(), 91);
        assert_eq!(entry.depth(), 12);
        assert_eq!(entry.bound(), Bound::EXACT);
    }

    #[test]
    fn victim_is_the_shallowest_of_a_full_cluster() {
        let table = TranspositionTable::new(1);
        let cluster = 3;
        for (key16, depth) in [(1, 10), (2, 4), (3, 12), (4, 11)] {
            let key = key_in_cluster(&table, cluster, key16);
            let (entry, found) = table.probe(key);
            assert!(!found);
            entry.save(key, 0, Bound::LOWER, depth, Move::NONE, table.generation());
        }

        let fresh = key_in_cluster(&table, cluster, 9);
        let (victim, found) = table.probe(fresh);
        assert!(!found);
        assert_eq!(victim.depth(), 4);
        victim.save(fresh, 0, Bound::LOWER, 6, Move::NONE, table.generation());

        let (_, found) = table.probe(key_in_cluster(&table, cluster, 2));
        assert!(!found, "the shallowest entry was evicted");
        let (_, found) = table.probe(key_in_cluster(&table, cluster, 1));
        assert!(found, "deeper entries survived");
    }

    #[test]
    fn aging_discounts_untouched_entries() {
        let mut table = TranspositionTable::new(1);
        let cluster = 5;
        let stale = key_in_cluster(&table, cluster, 1);
        let (entry, _) = table.probe(stale);
        entry.save(stale, 0, Bound::LOWER, 12, Move::NONE, table.generation());

        // Two searches pass without touching the entry: 16 points of
        // replacement worth gone, more than its depth advantage.
        table.new_search();
        table.new_search();
        for (key16, depth) in [(2, 5), (3, 30), (4, 30)] {
            let key = key_in_cluster(&table, cluster, key16);
            let (entry, _) = table.probe(key);
            entry.save(key, 0, Bound::LOWER, depth, Move::NONE, table.generation());
        }

        let (victim, found) = table.probe(key_in_cluster(&table, cluster, 9));
        assert!(!found);
        assert_eq!(victim.depth(), 12, "the stale deep entry is the victim");
    }

    #[test]
    fn probing_refreshes_the_stored_generation() {
        let mut table = TranspositionTable::new(1);
        let cluster = 7;
        let protected = key_in_cluster(&table, cluster, 1);
        let (entry, _) = table.probe(protected);
        entry.save(protected, 0, Bound::LOWER, 12, Move::NONE, table.generation());

        table.new_search();
        table.new_search();
        for (key16, depth) in [(2, 5), (3, 30), (4, 30)] {
            let key = key_in_cluster(&table, cluster, key16);
            let (entry, _) = table.probe(key);
            entry.save(key, 0, Bound::LOWER, depth, Move::NONE, table.generation());
        }

        // A probe hit re-stamps the entry with the current generation, so
        // the shallow fresh entry becomes the victim instead.
        let (_, found) = table.probe(protected);
        assert!(found);
        let (victim, found) = table.probe(key_in_cluster(&table, cluster, 9));
        assert!(!found);
        assert_eq!(victim.depth(), 5);
    }

    #[test]
    fn generation_counter_wraps() {
        let mut table = TranspositionTable::new(1);
        for _ in 0..70 {
            table.new_search();
        }
        assert_eq!(table.generation(), 24);
        assert_eq!(table.generation() & Bound::EXACT.bits(), 0);

        let key = key_in_cluster(&table, 11, 0x0BAD);
        let (entry, _) = table.probe(key);
        entry.save(key, 1, Bound::UPPER, 3, Move::NONE, table.generation());
        let (_, found) = table.probe(key);
        assert!(found);
    }

    #[test]
    fn relative_age_survives_counter_wrap() {
        // Entry stamped just before the 8-bit counter wrapped, probed just
        // after: one generation apart, not 63.
        let stamped = 252 | Bound::LOWER.bits();
        assert_eq!(relative_age(stamped, 0), u32::from(GENERATION_DELTA));
        assert_eq!(relative_age(stamped, 252), 0);
    }

    #[test]
    fn hashfull_counts_current_generation_only() {
        let mut table = TranspositionTable::new(1);
        assert_eq!(table.hashfull(), 0);

        for key16 in 1..=3 {
            let key = key_in_cluster(&table, 0, key16);
            let (entry, _) = table.probe(key);
            entry.save(key, 0, Bound::EXACT, 5, Move::NONE, table.generation());
        }
        assert_eq!(table.hashfull(), 3);

        table.new_search();
        assert_eq!(table.hashfull(), 0, "previous-generation entries do not count");
    }

    #[test]
    fn cluster_fits_cache_line() {
        assert_eq!(mem::size_of::<Entry>(), 8);
        assert_eq!(mem::size_of::<Cluster>(), 32);
        assert_eq!(CACHE_LINE_SIZE % mem::size_of::<Cluster>(), 0);
    }
}
