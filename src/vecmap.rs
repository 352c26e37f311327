//! An insertion-ordered map backed by a [`Vec`] of pairs, used for BEVE objects.
//!
//! Objects on the wire are a sequence of `key value` pairs in whatever order the writer
//! chose, and decoding has to hand that order back. Lookups are linear, which is fine for
//! the small member counts objects usually have.
//!
//! # Example
//!
//! ```
//! use beve::vecmap::VecMap;
//!
//! let mut vm = VecMap::new();
//! vm.insert("b", 1);
//! vm.insert("a", 2);
//!
//! // insertion order, not key order
//! let keys: Vec<_> = vm.keys().collect();
//! assert_eq!(keys, vec![&"b", &"a"]);
//!
//! // inserting an existing key replaces the value in place
//! assert_eq!(vm.insert("b", 3), Some(1));
//! assert_eq!(vm.get(&"b"), Some(&3));
//! assert_eq!(vm.len(), 2);
//! ```

use std::{
    collections::{BTreeMap, HashMap},
    hash::*,
    iter::FromIterator,
    slice::Iter,
    vec::IntoIter,
};

#[derive(Clone, Debug, PartialEq, Default)]
/// A map implemented as a [`Vec`] of pairs in insertion order.
///
/// See also: [module level documentation](`crate::vecmap`).
pub struct VecMap<K, V>(Vec<(K, V)>);

impl<K, V> VecMap<K, V> {
    /// Creates an empty [`VecMap`].
    pub fn new() -> Self { VecMap(Vec::new()) }

    /// Creates an empty [`VecMap`] with room for `cap` entries.
    pub fn with_capacity(cap: usize) -> Self { VecMap(Vec::with_capacity(cap)) }

    /// Wraps pairs as they are, without checking for duplicate keys.
    ///
    /// The decoder uses this so that a wire object is reproduced exactly.
    pub fn from_pairs_unchecked(v: Vec<(K, V)>) -> Self { VecMap(v) }

    /// Returns length.
    pub fn len(&self) -> usize { self.0.len() }

    /// Indicates whether the [`VecMap`] is empty.
    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    /// Returns an [`Iter`] of the key value pairs.
    pub fn iter(&self) -> Iter<(K, V)> { self.0.iter() }

    /// Iterates over the keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &K> { self.0.iter().map(|(k, _)| k) }

    /// Iterates over the values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &V> { self.0.iter().map(|(_, v)| v) }

    /// The pairs as a slice.
    pub fn as_slice(&self) -> &[(K, V)] { &self.0 }

    /// Consumes the map, returning its pairs.
    pub fn into_vec(self) -> Vec<(K, V)> { self.0 }

    /// Transforms every value, keeping keys and order.
    pub fn map_values<W, F: FnMut(V) -> W>(self, mut f: F) -> VecMap<K, W> {
        VecMap(self.0.into_iter().map(|(k, v)| (k, f(v))).collect())
    }
}

impl<K: PartialEq, V> VecMap<K, V> {
    /// Inserts a pair, returning the previous value if the key was present. A replaced
    /// key keeps its original position.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => Some(std::mem::replace(v, value)),
            None => {
                self.0.push((key, value));
                None
            }
        }
    }

    /// Looks up a key.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: PartialEq<Q>,
        Q: ?Sized,
    {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Removes a key, shifting later entries down.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: PartialEq<Q>,
        Q: ?Sized,
    {
        let pos = self.0.iter().position(|(k, _)| k == key)?;
        Some(self.0.remove(pos).1)
    }

    /// Indicates whether a key is present.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: PartialEq<Q>,
        Q: ?Sized,
    {
        self.get(key).is_some()
    }
}

impl<K: Ord + Clone, V> VecMap<K, V> {
    /// The keys, sorted.
    pub fn sorted_keys(&self) -> Vec<K> {
        let mut keys: Vec<K> = self.keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl<K: Eq + Hash, V> VecMap<K, V> {
    /// Consumes a [`VecMap`], producing a [`HashMap`] from the entries.
    pub fn into_hashmap<S: BuildHasher + Default>(self) -> HashMap<K, V, S> {
        self.into_iter().collect()
    }
}

impl<K: PartialEq, V> From<Vec<(K, V)>> for VecMap<K, V> {
    fn from(v: Vec<(K, V)>) -> Self { Self::from_iter(v) }
}

impl<K: Ord, V> From<BTreeMap<K, V>> for VecMap<K, V> {
    fn from(bt: BTreeMap<K, V>) -> Self { VecMap(bt.into_iter().collect()) }
}

impl<K: Ord, V, S: BuildHasher> From<HashMap<K, V, S>> for VecMap<K, V> {
    /// Hash maps have no meaningful order, so the keys are sorted to keep encoding
    /// deterministic.
    fn from(hm: HashMap<K, V, S>) -> Self {
        let mut v: Vec<(K, V)> = hm.into_iter().collect();
        v.sort_unstable_by(|(k1, _), (k2, _)| k1.cmp(k2));
        VecMap(v)
    }
}

impl<K, V> IntoIterator for VecMap<K, V> {
    type IntoIter = IntoIter<(K, V)>;
    type Item = (K, V);

    fn into_iter(self) -> IntoIter<(K, V)> { self.0.into_iter() }
}

impl<'a, K, V> IntoIterator for &'a VecMap<K, V> {
    type IntoIter = Iter<'a, (K, V)>;
    type Item = &'a (K, V);

    fn into_iter(self) -> Iter<'a, (K, V)> { self.0.iter() }
}

impl<K: PartialEq, V> FromIterator<(K, V)> for VecMap<K, V> {
    /// Later duplicates replace earlier values, keeping the first position.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> VecMap<K, V> {
        let mut vm = VecMap::new();
        for (k, v) in iter {
            vm.insert(k, v);
        }
        vm
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicates_collapse() {
        let vm: VecMap<&str, u8> = vec![("x", 1), ("y", 2), ("x", 3)].into();
        assert_eq!(vm.as_slice(), &[("x", 3), ("y", 2)]);
    }

    #[test]
    fn remove_keeps_order() {
        let mut vm: VecMap<String, u8> = VecMap::new();
        vm.insert("c".to_string(), 1);
        vm.insert("a".to_string(), 2);
        vm.insert("b".to_string(), 3);
        assert_eq!(vm.remove("a"), Some(2));
        assert_eq!(vm.keys().cloned().collect::<Vec<_>>(), vec!["c", "b"]);
        assert_eq!(vm.sorted_keys(), vec!["b".to_string(), "c".to_string()]);
        assert!(!vm.contains_key("a"));
    }

    #[test]
    fn hashmap_is_sorted() {
        let mut hm = HashMap::new();
        hm.insert(3u8, ());
        hm.insert(1u8, ());
        hm.insert(2u8, ());
        let vm = VecMap::from(hm);
        assert_eq!(vm.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    }
}
