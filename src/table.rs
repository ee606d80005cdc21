//! The core fixed-capacity open-addressing table.
//!
//! This module provides [`ProbeTable`], which stores values in a flat slice
//! of `2^bits` tagged slots and resolves collisions by linear probing: a
//! value's probe sequence starts at `hash & mask` and advances one slot at a
//! time, wrapping modulo capacity. The table never grows.
//!
//! Like the crate's set type but one level down, operations here are
//! hash-explicit: the caller supplies both the hash value and an equality
//! predicate. This keeps the table independent of any hasher and lets tests
//! drive probe chains deterministically.
//!
//! # Removal and tombstones
//!
//! Removing a value does not empty its slot. Values inserted after it may sit
//! further along the same probe chain, and an empty slot would terminate
//! searches for them early. Instead the slot becomes a tombstone: transparent
//! to searches, reusable by inserts, and never converted back to empty short
//! of [`ProbeTable::clear`].

use std::fmt::Debug;
use std::iter::FusedIterator;
use std::mem;
use std::slice;

use crate::error::CapacityExceeded;
use crate::error::CursorError;
use crate::error::InvalidBits;

/// Smallest accepted `bits` parameter (capacity 4).
pub const MIN_BITS: u32 = 2;

/// Largest accepted `bits` parameter (capacity 2^31).
///
/// The cap keeps the starting index inside the non-negative range of a 31-bit
/// hash, which is the addressing contract this table preserves.
pub const MAX_BITS: u32 = 31;

/// One table cell.
///
/// A cell starts `Empty`, becomes `Occupied` on insert, and becomes
/// `Tombstone` on removal. `Tombstone` and `Empty` cells are both writable by
/// inserts, but only `Empty` terminates a search.
#[derive(Clone)]
enum Slot<V> {
    Empty,
    Tombstone,
    Occupied(V),
}

impl<V> Slot<V> {
    fn value(&self) -> Option<&V> {
        match self {
            Slot::Occupied(value) => Some(value),
            Slot::Empty | Slot::Tombstone => None,
        }
    }

    fn is_occupied(&self) -> bool {
        matches!(self, Slot::Occupied(_))
    }

    /// Replaces an occupied slot with a tombstone, returning its value.
    fn bury(&mut self) -> Option<V> {
        match mem::replace(self, Slot::Tombstone) {
            Slot::Occupied(value) => Some(value),
            other => {
                *self = other;
                None
            }
        }
    }
}

/// A fixed-capacity open-addressing table with linear probing.
///
/// `ProbeTable<V>` stores values of type `V` in `2^bits` slots allocated once
/// at construction. Every operation takes the value's precomputed `u64` hash
/// and an equality predicate; see [`ProbeSet`](crate::ProbeSet) for the
/// hasher-aware wrapper.
///
/// # Performance characteristics
///
/// - `find`: expected O(1) at low load factor, worst case O(capacity).
/// - `insert`: same as `find`; fails with [`CapacityExceeded`] only when
///   every slot holds a live value.
/// - `remove`: O(capacity) — the scan covers a full wrap and does not stop at
///   empty slots.
///
/// # Example
///
/// ```rust
/// use probe_set::table::Entry;
/// use probe_set::table::ProbeTable;
///
/// let mut table: ProbeTable<&str> = ProbeTable::with_bits(3)?;
///
/// match table.entry(17, |v| *v == "alice")? {
///     Entry::Vacant(slot) => {
///         slot.insert("alice");
///     }
///     Entry::Occupied(_) => unreachable!("fresh table"),
/// }
/// assert!(table.find(17, |v| *v == "alice").is_some());
/// assert_eq!(table.remove(17, |v| *v == "alice"), Some("alice"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct ProbeTable<V> {
    slots: Box<[Slot<V>]>,
    mask: usize,
    bits: u32,
    len: usize,
}

impl<V> ProbeTable<V> {
    /// Creates an empty table with `2^bits` slots.
    ///
    /// Fails with [`InvalidBits`] unless `bits` is in
    /// [`MIN_BITS`]`..=`[`MAX_BITS`]. The allocation happens here and is the
    /// only one the table ever makes.
    pub fn with_bits(bits: u32) -> Result<Self, InvalidBits> {
        if !(MIN_BITS..=MAX_BITS).contains(&bits) {
            return Err(InvalidBits { bits });
        }
        let capacity = 1usize << bits;
        Ok(Self {
            slots: (0..capacity).map(|_| Slot::Empty).collect(),
            mask: capacity - 1,
            bits,
            len: 0,
        })
    }

    /// Returns the number of live values in the table.
    ///
    /// Tombstones do not count, so `len` can be far below the number of
    /// non-empty slots after heavy churn.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the table holds no live values.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the total slot count, `2^bits`.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the `bits` parameter the table was constructed with.
    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// First probe position for a value with the given hash.
    ///
    /// `mask` never reaches above bit 30, so the low-bits selection also
    /// discards the sign bit of a 31-bit hash.
    fn start_index(&self, hash: u64) -> usize {
        (hash as usize) & self.mask
    }

    /// Finds the live value matching `eq`, probing from the hash's starting
    /// index.
    ///
    /// The scan walks occupied and tombstoned slots alike and stops at the
    /// first empty slot (a miss) or after one full wrap of the table.
    pub fn find(&self, hash: u64, mut eq: impl FnMut(&V) -> bool) -> Option<&V> {
        let start = self.start_index(hash);
        let mut index = start;
        loop {
            match &self.slots[index] {
                Slot::Empty => return None,
                Slot::Occupied(existing) if eq(existing) => return Some(existing),
                Slot::Occupied(_) | Slot::Tombstone => {
                    index = (index + 1) & self.mask;
                    if index == start {
                        return None;
                    }
                }
            }
        }
    }

    /// Walks the probe chain for `hash` and reports where an insert of a
    /// matching value would land.
    ///
    /// Returns [`Entry::Occupied`] when an occupied slot matching `eq`
    /// terminates the scan, [`Entry::Vacant`] at the first empty or
    /// tombstoned slot otherwise, and [`CapacityExceeded`] when the probe
    /// wrapped the whole table through live values. The table is not
    /// modified until [`VacantEntry::insert`] is called.
    ///
    /// The duplicate scan stops at the first empty or tombstoned slot. An
    /// equal value sitting past a tombstone on the same chain is not seen,
    /// so a remove-then-insert sequence can produce two equal live values.
    /// This behavior is kept deliberately for compatibility; see
    /// [`ProbeSet::insert`](crate::ProbeSet::insert) for the caller-facing
    /// discussion.
    pub fn entry(
        &mut self,
        hash: u64,
        eq: impl FnMut(&V) -> bool,
    ) -> Result<Entry<'_, V>, CapacityExceeded> {
        match self.probe_for_insert(hash, eq)? {
            Probe::Present(index) => Ok(Entry::Occupied(OccupiedEntry { table: self, index })),
            Probe::Writable(index) => Ok(Entry::Vacant(VacantEntry { table: self, index })),
        }
    }

    /// Probe scan shared by [`entry`](Self::entry); borrows the table only
    /// immutably so the entry types can take the mutable borrow afterwards.
    fn probe_for_insert(
        &self,
        hash: u64,
        mut eq: impl FnMut(&V) -> bool,
    ) -> Result<Probe, CapacityExceeded> {
        let start = self.start_index(hash);
        let mut index = start;
        loop {
            match &self.slots[index] {
                Slot::Occupied(existing) if eq(existing) => return Ok(Probe::Present(index)),
                Slot::Occupied(_) => {
                    index = (index + 1) & self.mask;
                    if index == start {
                        return Err(CapacityExceeded {
                            capacity: self.capacity(),
                        });
                    }
                }
                Slot::Empty | Slot::Tombstone => return Ok(Probe::Writable(index)),
            }
        }
    }

    /// Removes and returns the live value matching `eq`, leaving a tombstone
    /// in its slot.
    ///
    /// The scan starts at the hash's starting index and covers one full wrap
    /// of the table. Unlike [`find`](Self::find), it does not stop at empty
    /// slots, so a miss always costs O(capacity). Probe chains of other
    /// values are unaffected: the tombstone keeps them traversable.
    pub fn remove(&mut self, hash: u64, mut eq: impl FnMut(&V) -> bool) -> Option<V> {
        let start = self.start_index(hash);
        let mut index = start;
        loop {
            if self.slots[index].value().is_some_and(&mut eq) {
                let value = self.slots[index].bury();
                debug_assert!(value.is_some());
                self.len -= 1;
                return value;
            }
            index = (index + 1) & self.mask;
            if index == start {
                return None;
            }
        }
    }

    /// Resets every slot to empty, dropping all live values and tombstones.
    ///
    /// This is the construction state: the allocation is kept, and probe
    /// chains start from scratch.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = Slot::Empty;
        }
        self.len = 0;
    }

    /// Returns an iterator over the live values in slot order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            slots: self.slots.iter(),
            remaining: self.len,
        }
    }

    /// Returns a cursor over the live values that supports removing the last
    /// yielded value mid-traversal.
    ///
    /// The cursor borrows the table mutably, so no other access can overlap
    /// its lifetime. Its target element count is snapshotted here and not
    /// re-read: removals through the cursor shrink [`len`](Self::len) but
    /// never the number of elements the cursor will yield.
    pub fn cursor(&mut self) -> Cursor<'_, V> {
        let target = self.len;
        Cursor {
            table: self,
            index: 0,
            yielded: 0,
            target,
            last: None,
        }
    }
}

/// Outcome of an insert-oriented probe scan.
enum Probe {
    /// An occupied slot matching the predicate terminated the scan.
    Present(usize),
    /// First empty or tombstoned slot on the chain.
    Writable(usize),
}

/// A view into a single probe-chain position of a [`ProbeTable`], returned by
/// [`ProbeTable::entry`].
pub enum Entry<'a, V> {
    /// The chain holds no matching value; the entry points at the slot an
    /// insert would write.
    Vacant(VacantEntry<'a, V>),
    /// A matching value terminated the probe scan.
    Occupied(OccupiedEntry<'a, V>),
}

/// A writable probe-chain position with no matching value.
pub struct VacantEntry<'a, V> {
    table: &'a mut ProbeTable<V>,
    index: usize,
}

impl<'a, V> VacantEntry<'a, V> {
    /// Writes `value` into the slot and returns a mutable reference to it.
    ///
    /// The slot was empty or tombstoned when the entry was created; either
    /// way it becomes occupied and the table's `len` grows by one.
    pub fn insert(self, value: V) -> &'a mut V {
        self.table.slots[self.index] = Slot::Occupied(value);
        self.table.len += 1;
        match &mut self.table.slots[self.index] {
            Slot::Occupied(value) => value,
            // Written one line up.
            _ => unreachable!(),
        }
    }
}

/// A probe-chain position holding a value that matched the entry's predicate.
pub struct OccupiedEntry<'a, V> {
    table: &'a mut ProbeTable<V>,
    index: usize,
}

impl<V> OccupiedEntry<'_, V> {
    /// Returns a reference to the matched value.
    pub fn get(&self) -> &V {
        match self.table.slots[self.index].value() {
            Some(value) => value,
            // An occupied entry always points at a live slot.
            None => unreachable!(),
        }
    }

    /// Removes the matched value from the table, leaving a tombstone.
    pub fn remove(self) -> V {
        match self.table.slots[self.index].bury() {
            Some(value) => {
                self.table.len -= 1;
                value
            }
            // An occupied entry always points at a live slot.
            None => unreachable!(),
        }
    }
}

impl<V> Clone for ProbeTable<V>
where
    V: Clone,
{
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            mask: self.mask,
            bits: self.bits,
            len: self.len,
        }
    }
}

impl<V> Debug for ProbeTable<V>
where
    V: Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProbeTable")
            .field("bits", &self.bits)
            .field("len", &self.len)
            .field("values", &DebugValues(self))
            .finish()
    }
}

struct DebugValues<'a, V>(&'a ProbeTable<V>);

impl<V> Debug for DebugValues<'_, V>
where
    V: Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.0.iter()).finish()
    }
}

/// An iterator over the live values of a [`ProbeTable`], in slot order.
pub struct Iter<'a, V> {
    slots: slice::Iter<'a, Slot<V>>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        for slot in self.slots.by_ref() {
            if let Slot::Occupied(value) = slot {
                self.remaining -= 1;
                return Some(value);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<V> FusedIterator for Iter<'_, V> {}

/// A consuming iterator over the live values of a [`ProbeTable`].
pub struct IntoIter<V> {
    slots: std::vec::IntoIter<Slot<V>>,
    remaining: usize,
}

impl<V> Iterator for IntoIter<V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        for slot in self.slots.by_ref() {
            if let Slot::Occupied(value) = slot {
                self.remaining -= 1;
                return Some(value);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for IntoIter<V> {}

impl<V> IntoIterator for ProbeTable<V> {
    type Item = V;
    type IntoIter = IntoIter<V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            remaining: self.len,
            slots: self.slots.into_vec().into_iter(),
        }
    }
}

impl<'a, V> IntoIterator for &'a ProbeTable<V> {
    type Item = &'a V;
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A forward-only cursor over a [`ProbeTable`] that supports removing the
/// last yielded value.
///
/// Created by [`ProbeTable::cursor`]. The cursor yields each value that was
/// live when it was created, in slot order, and tombstones a value on
/// [`remove`](Self::remove) without disturbing its own traversal: the removal
/// target always sits behind the scan position.
pub struct Cursor<'a, V> {
    table: &'a mut ProbeTable<V>,
    index: usize,
    yielded: usize,
    target: usize,
    last: Option<usize>,
}

impl<V> Cursor<'_, V> {
    /// Returns `true` while the cursor has values left to yield.
    ///
    /// The target count was snapshotted when the cursor was created;
    /// removals through the cursor do not shrink it.
    pub fn has_next(&self) -> bool {
        self.yielded < self.target
    }

    /// Yields a reference to the next live value in slot order.
    ///
    /// Fails with [`CursorError::Exhausted`] once every value counted at
    /// creation has been yielded. The returned reference borrows the cursor,
    /// so it must be dropped (or copied out) before the next cursor call.
    pub fn next(&mut self) -> Result<&V, CursorError> {
        if !self.has_next() {
            return Err(CursorError::Exhausted);
        }
        while self.index < self.table.slots.len() {
            let index = self.index;
            self.index += 1;
            if self.table.slots[index].is_occupied() {
                self.last = Some(index);
                self.yielded += 1;
                if let Some(value) = self.table.slots[index].value() {
                    return Ok(value);
                }
            }
        }
        // Unreachable while the cursor holds the only borrow of the table;
        // kept as an error rather than a panic.
        Err(CursorError::Exhausted)
    }

    /// Removes the last value yielded by [`next`](Self::next) from the table,
    /// returning it.
    ///
    /// The slot becomes a tombstone and the table's `len` shrinks by one; the
    /// cursor's yielded count and target are unaffected. Fails with
    /// [`CursorError::NothingToRemove`] when no yield is pending: before the
    /// first `next`, or twice in a row without an intervening `next`.
    pub fn remove(&mut self) -> Result<V, CursorError> {
        let index = self.last.take().ok_or(CursorError::NothingToRemove)?;
        match self.table.slots[index].bury() {
            Some(value) => {
                self.table.len -= 1;
                Ok(value)
            }
            None => Err(CursorError::NothingToRemove),
        }
    }
}
