//! B-Tree based ordered multi-index
//!
//! Maps an ordered key to every value stored under it. Range views
//! (`sub_range`, `head_range`, `tail_range`) share the backing tree with
//! the index they were taken from and cost one `Arc` clone plus a walk
//! over the entries in range to count them. Views of views narrow the
//! window further.
//!
//! Writes go through `Arc::make_mut`: an index whose tree is still shared
//! with live views copies the tree before changing it, so views keep the
//! contents they were created with.

use crate::graph::KeyRange;
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;

/// Sorted, duplicate-key tolerant index
#[derive(Debug)]
pub struct MultiIndex<K, T> {
    /// Key -> values stored under it, in insertion order
    store: Arc<BTreeMap<K, Vec<T>>>,

    /// Window of keys visible through this index
    range: KeyRange<K>,

    /// Number of values inside the window
    len: usize,
}

impl<K: Clone, T> Clone for MultiIndex<K, T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            range: self.range.clone(),
            len: self.len,
        }
    }
}

impl<K, T> Default for MultiIndex<K, T> {
    fn default() -> Self {
        Self {
            store: Arc::new(BTreeMap::new()),
            range: KeyRange::unbounded(),
            len: 0,
        }
    }
}

impl<K: Ord + Clone, T: Clone + PartialEq> MultiIndex<K, T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key`
    ///
    /// Returns false when the value is already stored under that key or
    /// when the key falls outside this index's window.
    pub fn put(&mut self, key: K, value: T) -> bool {
        if !self.range.contains(&key) || self.contains_value(&key, &value) {
            return false;
        }
        Arc::make_mut(&mut self.store)
            .entry(key)
            .or_default()
            .push(value);
        self.len += 1;
        true
    }

    /// Remove one value stored under `key`
    pub fn remove(&mut self, key: &K, value: &T) -> bool {
        if !self.contains_value(key, value) {
            return false;
        }
        let store = Arc::make_mut(&mut self.store);
        if let Some(values) = store.get_mut(key) {
            values.retain(|v| v != value);
            if values.is_empty() {
                store.remove(key);
            }
        }
        self.len -= 1;
        true
    }

    /// Remove every value stored under `key`
    pub fn remove_key(&mut self, key: &K) -> Vec<T> {
        if !self.contains_key(key) {
            return Vec::new();
        }
        let removed = Arc::make_mut(&mut self.store)
            .remove(key)
            .unwrap_or_default();
        self.len -= removed.len();
        removed
    }

    /// Drop every entry inside the window
    pub fn clear(&mut self) {
        if self.is_empty() {
            return;
        }
        let keys: Vec<K> = self.keys().cloned().collect();
        let store = Arc::make_mut(&mut self.store);
        for key in &keys {
            store.remove(key);
        }
        self.len = 0;
    }
}

impl<K: Ord + Clone, T> MultiIndex<K, T> {
    /// Values stored under `key`, empty if the key is absent or outside the window
    pub fn get(&self, key: &K) -> &[T] {
        if !self.range.contains(key) {
            return &[];
        }
        self.store.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains_key(&self, key: &K) -> bool {
        !self.get(key).is_empty()
    }

    pub fn contains_value(&self, key: &K, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.get(key).iter().any(|v| v == value)
    }

    pub fn first_key(&self) -> Option<&K> {
        self.span().next().map(|(k, _)| k)
    }

    pub fn last_key(&self) -> Option<&K> {
        self.span().next_back().map(|(k, _)| k)
    }

    pub fn first_entry(&self) -> Option<(&K, &[T])> {
        self.span().next().map(|(k, v)| (k, v.as_slice()))
    }

    pub fn last_entry(&self) -> Option<(&K, &[T])> {
        self.span().next_back().map(|(k, v)| (k, v.as_slice()))
    }

    /// View of `[lo, hi)`
    pub fn sub_range(&self, lo: K, hi: K) -> Self {
        self.restrict(&KeyRange::between(lo, hi))
    }

    /// View of every key below `hi`
    pub fn head_range(&self, hi: K) -> Self {
        self.restrict(&KeyRange::below(hi))
    }

    /// View of every key at or above `lo`
    pub fn tail_range(&self, lo: K) -> Self {
        self.restrict(&KeyRange::at_least(lo))
    }

    /// View of this index narrowed to `range`
    pub fn restrict(&self, range: &KeyRange<K>) -> Self {
        let range = self.range.intersect(range);
        let mut view = Self {
            store: Arc::clone(&self.store),
            range,
            len: 0,
        };
        view.len = view.span().map(|(_, values)| values.len()).sum();
        view
    }

    /// Window of keys visible through this index
    pub fn range(&self) -> &KeyRange<K> {
        &self.range
    }

    /// Number of values in the window
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of distinct keys in the window
    pub fn key_count(&self) -> usize {
        self.span().count()
    }

    /// Distinct keys in ascending order
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + '_ {
        self.span().map(|(k, _)| k)
    }

    /// Keys with their values, in ascending key order
    pub fn entries(&self) -> impl DoubleEndedIterator<Item = (&K, &[T])> + '_ {
        self.span().map(|(k, v)| (k, v.as_slice()))
    }

    /// Every `(key, value)` pair in ascending key order
    pub fn iter(&self) -> impl Iterator<Item = (&K, &T)> + '_ {
        self.span()
            .flat_map(|(k, values)| values.iter().map(move |v| (k, v)))
    }

    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.span().flat_map(|(_, values)| values.iter())
    }

    /// True when this index and `other` read the same tree
    pub fn shares_storage(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.store, &other.store)
    }

    fn span(&self) -> btree_map::Range<'_, K, Vec<T>> {
        match (&self.range.lower, &self.range.upper) {
            // BTreeMap::range panics on inverted bounds
            (Some(lo), Some(hi)) if lo > hi => self
                .store
                .range::<K, _>((Bound::Included(lo), Bound::Excluded(lo))),
            _ => self.store.range::<K, _>(self.range.as_bounds()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MultiIndex<i32, &'static str> {
        let mut index = MultiIndex::new();
        index.put(1, "a");
        index.put(2, "b");
        index.put(2, "c");
        index.put(4, "d");
        index.put(7, "e");
        index
    }

    #[test]
    fn test_multi_index_ops() {
        let mut index = sample();
        assert_eq!(index.len(), 5);
        assert_eq!(index.key_count(), 4);
        assert_eq!(index.get(&2), &["b", "c"]);
        assert!(index.get(&3).is_empty());

        // Same value under the same key is rejected
        assert!(!index.put(2, "b"));
        assert_eq!(index.len(), 5);

        assert!(index.remove(&2, &"b"));
        assert!(!index.remove(&2, &"b"));
        assert_eq!(index.get(&2), &["c"]);

        assert_eq!(index.remove_key(&2), vec!["c"]);
        assert!(!index.contains_key(&2));
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_first_and_last() {
        let index = sample();
        assert_eq!(index.first_key(), Some(&1));
        assert_eq!(index.last_key(), Some(&7));
        assert_eq!(index.last_entry(), Some((&7, &["e"][..])));

        let empty: MultiIndex<i32, &str> = MultiIndex::new();
        assert_eq!(empty.first_key(), None);
        assert_eq!(empty.last_entry(), None);
    }

    #[test]
    fn test_ranges_are_half_open() {
        let index = sample();

        let sub = index.sub_range(2, 7);
        assert_eq!(sub.len(), 3);
        assert_eq!(sub.first_key(), Some(&2));
        assert_eq!(sub.last_key(), Some(&4));
        assert!(sub.get(&7).is_empty());
        assert!(sub.shares_storage(&index));

        assert_eq!(index.head_range(2).len(), 1);
        assert_eq!(index.tail_range(2).len(), 4);
    }

    #[test]
    fn test_views_of_views_intersect() {
        let index = sample();
        let outer = index.sub_range(2, 8);
        let inner = outer.sub_range(0, 5);
        assert_eq!(inner.range(), &KeyRange::between(2, 5));
        assert_eq!(inner.values().copied().collect::<Vec<_>>(), vec!["b", "c", "d"]);

        let tail = outer.tail_range(4);
        assert_eq!(tail.keys().copied().collect::<Vec<_>>(), vec![4, 7]);
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let index = sample();
        let view = index.sub_range(5, 2);
        assert!(view.is_empty());
        assert_eq!(view.first_key(), None);
        assert_eq!(view.iter().count(), 0);
    }

    #[test]
    fn test_put_outside_window_is_rejected() {
        let index = sample();
        let mut view = index.sub_range(2, 5);
        assert!(!view.put(9, "z"));
        assert!(view.put(3, "z"));
        assert_eq!(view.len(), 4);
    }

    #[test]
    fn test_views_keep_snapshot_after_parent_write() {
        let mut index = sample();
        let view = index.tail_range(0);
        index.put(5, "f");
        index.remove(&1, &"a");

        assert_eq!(index.len(), 5);
        assert_eq!(view.len(), 5);
        assert!(view.contains_key(&1));
        assert!(!view.contains_key(&5));
        assert!(!view.shares_storage(&index));
    }

    #[test]
    fn test_clear_only_touches_window() {
        let mut index = sample();
        let mut view = index.sub_range(2, 5);
        view.clear();
        assert!(view.is_empty());
        assert_eq!(index.len(), 5);

        index.clear();
        assert!(index.is_empty());
    }
}
