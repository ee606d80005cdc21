//! A fixed-capacity hash set over the open-addressing [`ProbeTable`].
//!
//! This module provides [`ProbeSet`], which pairs the table with a
//! [`BuildHasher`] and exposes a standard set interface. Capacity is chosen
//! at construction as `2^bits` elements and never changes.

use std::fmt::Debug;
use std::hash::BuildHasher;
use std::hash::Hash;

use crate::error::CapacityExceeded;
use crate::error::CursorError;
use crate::error::InvalidBits;
use crate::table;
use crate::table::Entry;
use crate::table::ProbeTable;

/// Default hasher builder for [`ProbeSet`].
pub type DefaultHashBuilder = foldhash::fast::RandomState;

/// A fixed-capacity hash set using open addressing with linear probing.
///
/// `ProbeSet<T, S>` stores values of type `T` where `T: Hash + Eq`, hashing
/// them with a configurable hasher builder `S`. Storage is a single flat
/// allocation of `2^bits` slots made at construction; the set never grows,
/// and inserting into a full table is an error rather than a resize.
///
/// Removal leaves a tombstone in the vacated slot so probe chains built
/// before the removal stay searchable. Tombstones are reused by later
/// inserts but only [`clear`](Self::clear) returns slots to the empty state,
/// so heavy insert/remove churn lengthens probe chains over time. Size the
/// set so its expected population stays well under capacity.
///
/// # Example
///
/// ```rust
/// use probe_set::ProbeSet;
///
/// let mut set: ProbeSet<u32> = ProbeSet::with_bits(4)?;
/// assert_eq!(set.capacity(), 16);
///
/// assert!(set.insert(7)?);
/// assert!(!set.insert(7)?);
/// assert!(set.contains(&7));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct ProbeSet<T, S = DefaultHashBuilder> {
    table: ProbeTable<T>,
    hash_builder: S,
}

impl<T, S> ProbeSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    /// Creates an empty set with `2^bits` slots and the given hasher builder.
    ///
    /// Fails with [`InvalidBits`] unless `bits` is in
    /// [`MIN_BITS`](crate::table::MIN_BITS)`..=`[`MAX_BITS`](crate::table::MAX_BITS).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_set::DefaultHashBuilder;
    /// use probe_set::ProbeSet;
    ///
    /// let set: ProbeSet<i32, _> = ProbeSet::with_bits_and_hasher(5, DefaultHashBuilder::default())?;
    /// assert_eq!(set.capacity(), 32);
    ///
    /// assert!(ProbeSet::<i32, DefaultHashBuilder>::with_bits_and_hasher(40, Default::default()).is_err());
    /// # Ok::<(), probe_set::InvalidBits>(())
    /// ```
    pub fn with_bits_and_hasher(bits: u32, hash_builder: S) -> Result<Self, InvalidBits> {
        Ok(Self {
            table: ProbeTable::with_bits(bits)?,
            hash_builder,
        })
    }

    /// Returns the number of elements in the set.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_set::ProbeSet;
    ///
    /// let mut set: ProbeSet<i32> = ProbeSet::with_bits(4)?;
    /// assert_eq!(set.len(), 0);
    /// set.insert(1)?;
    /// assert_eq!(set.len(), 1);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the set contains no elements.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_set::ProbeSet;
    ///
    /// let mut set: ProbeSet<i32> = ProbeSet::with_bits(4)?;
    /// assert!(set.is_empty());
    /// set.insert(1)?;
    /// assert!(!set.is_empty());
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the fixed capacity of the set, `2^bits`.
    ///
    /// Unlike growable sets, this is a hard limit: once `len() == capacity()`
    /// the next insert of a missing element fails.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns the `bits` parameter the set was constructed with.
    pub fn bits(&self) -> u32 {
        self.table.bits()
    }

    /// Removes all elements, resetting every slot to empty.
    ///
    /// This is the only operation that clears tombstones; it restores the
    /// set to its freshly constructed state while keeping the allocation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_set::ProbeSet;
    ///
    /// let mut set: ProbeSet<i32> = ProbeSet::with_bits(4)?;
    /// set.insert(1)?;
    /// set.clear();
    /// assert!(set.is_empty());
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Adds a value to the set.
    ///
    /// Returns `Ok(true)` if the value was newly inserted and `Ok(false)` if
    /// the set already contained it. Fails with [`CapacityExceeded`] if the
    /// probe wrapped the whole table through live elements — that is, the
    /// table is full and the value is not present.
    ///
    /// # Duplicates after deletion
    ///
    /// The duplicate scan stops at the first empty or tombstoned slot on the
    /// value's probe chain. If an equal element sits further along the chain
    /// past a tombstone, it is not seen and a second copy is inserted. This is
    /// deliberate compatibility behavior, locked in by a regression test;
    /// it only arises for elements whose probe chains crossed a later
    /// removal.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_set::ProbeSet;
    ///
    /// let mut set: ProbeSet<i32> = ProbeSet::with_bits(4)?;
    /// assert_eq!(set.insert(37)?, true);
    /// assert_eq!(set.insert(37)?, false);
    /// assert_eq!(set.len(), 1);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn insert(&mut self, value: T) -> Result<bool, CapacityExceeded> {
        let hash = self.hash_builder.hash_one(&value);
        match self.table.entry(hash, |v| v == &value)? {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(value);
                Ok(true)
            }
        }
    }

    /// Returns `true` if the set contains a value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_set::ProbeSet;
    ///
    /// let mut set: ProbeSet<i32> = ProbeSet::with_bits(4)?;
    /// set.insert(1)?;
    /// assert!(set.contains(&1));
    /// assert!(!set.contains(&2));
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn contains(&self, value: &T) -> bool {
        self.get(value).is_some()
    }

    /// Returns a reference to the element equal to `value`, if any.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_set::ProbeSet;
    ///
    /// let mut set: ProbeSet<i32> = ProbeSet::with_bits(4)?;
    /// set.insert(42)?;
    /// assert_eq!(set.get(&42), Some(&42));
    /// assert_eq!(set.get(&1), None);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn get(&self, value: &T) -> Option<&T> {
        let hash = self.hash_builder.hash_one(value);
        self.table.find(hash, |v| v == value)
    }

    /// Removes a value from the set. Returns whether the value was present.
    ///
    /// The vacated slot becomes a tombstone, so probe chains of other
    /// elements are unaffected. A miss costs a full-capacity scan: removal
    /// probes one complete wrap of the table rather than stopping at the
    /// first empty slot.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_set::ProbeSet;
    ///
    /// let mut set: ProbeSet<i32> = ProbeSet::with_bits(4)?;
    /// set.insert(1)?;
    /// assert_eq!(set.remove(&1), true);
    /// assert_eq!(set.remove(&1), false);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn remove(&mut self, value: &T) -> bool {
        self.take(value).is_some()
    }

    /// Removes and returns the element equal to `value`, if any.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_set::ProbeSet;
    ///
    /// let mut set: ProbeSet<String> = ProbeSet::with_bits(4)?;
    /// set.insert("carol".to_string())?;
    /// assert_eq!(set.take(&"carol".to_string()), Some("carol".to_string()));
    /// assert_eq!(set.take(&"carol".to_string()), None);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn take(&mut self, value: &T) -> Option<T> {
        let hash = self.hash_builder.hash_one(value);
        self.table.remove(hash, |v| v == value)
    }

    /// Returns an iterator over the elements of the set.
    ///
    /// Order is slot order: deterministic for a fixed construction and
    /// mutation history, but dependent on the hasher's seed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_set::ProbeSet;
    ///
    /// let mut set: ProbeSet<i32> = ProbeSet::with_bits(4)?;
    /// set.insert(1)?;
    /// set.insert(2)?;
    ///
    /// assert_eq!(set.iter().count(), 2);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns a cursor over the set that supports removing the last yielded
    /// element mid-traversal.
    ///
    /// The cursor borrows the set mutably for its lifetime, so the set
    /// cannot be touched through any other path while it exists. The number
    /// of elements the cursor will yield is fixed at creation; removals
    /// through the cursor shrink [`len`](Self::len) but not that count.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_set::ProbeSet;
    ///
    /// let mut set: ProbeSet<u32> = ProbeSet::with_bits(4)?;
    /// for i in 0..6 {
    ///     set.insert(i)?;
    /// }
    ///
    /// let mut cursor = set.cursor();
    /// while cursor.has_next() {
    ///     if *cursor.next()? % 2 == 0 {
    ///         cursor.remove()?;
    ///     }
    /// }
    /// assert_eq!(set.len(), 3);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn cursor(&mut self) -> Cursor<'_, T> {
        Cursor {
            inner: self.table.cursor(),
        }
    }
}

impl<T, S> ProbeSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher + Default,
{
    /// Creates an empty set with `2^bits` slots and the default hasher
    /// builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_set::ProbeSet;
    ///
    /// let set: ProbeSet<i32> = ProbeSet::with_bits(2)?;
    /// assert_eq!(set.capacity(), 4);
    /// # Ok::<(), probe_set::InvalidBits>(())
    /// ```
    pub fn with_bits(bits: u32) -> Result<Self, InvalidBits> {
        Self::with_bits_and_hasher(bits, S::default())
    }
}

impl<T, S> Clone for ProbeSet<T, S>
where
    T: Clone,
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            hash_builder: self.hash_builder.clone(),
        }
    }
}

impl<T, S> Debug for ProbeSet<T, S>
where
    T: Debug + Hash + Eq,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, S> PartialEq for ProbeSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter().all(|v| other.contains(v))
    }
}

impl<T, S> Eq for ProbeSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
}

/// An iterator over the elements of a [`ProbeSet`].
pub struct Iter<'a, T> {
    inner: table::Iter<'a, T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> std::iter::FusedIterator for Iter<'_, T> {}

/// A consuming iterator over the elements of a [`ProbeSet`].
pub struct IntoIter<T> {
    inner: table::IntoIter<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T, S> IntoIterator for ProbeSet<T, S> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.table.into_iter(),
        }
    }
}

impl<'a, T, S> IntoIterator for &'a ProbeSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A forward-only cursor over a [`ProbeSet`] that supports removing the last
/// yielded element. Created by [`ProbeSet::cursor`].
pub struct Cursor<'a, T> {
    inner: table::Cursor<'a, T>,
}

impl<T> Cursor<'_, T> {
    /// Returns `true` while the cursor has elements left to yield.
    pub fn has_next(&self) -> bool {
        self.inner.has_next()
    }

    /// Yields a reference to the next element.
    ///
    /// Fails with [`CursorError::Exhausted`] once every element counted at
    /// the cursor's creation has been yielded.
    pub fn next(&mut self) -> Result<&T, CursorError> {
        self.inner.next()
    }

    /// Removes the last yielded element from the set, returning it.
    ///
    /// Fails with [`CursorError::NothingToRemove`] if no yield is pending:
    /// before the first [`next`](Self::next), or twice in a row without an
    /// intervening `next`.
    pub fn remove(&mut self) -> Result<T, CursorError> {
        self.inner.remove()
    }
}
