use std::{
    collections::{HashMap, HashSet},
    hash::BuildHasherDefault,
};

use hashers::fx_hash::FxHasher;

/// A HashMap keyed with [`FxHasher`]. Keys here are grid cells and indices, never user input.
pub(crate) type FxHashMap<K, V> = HashMap<K, V, BuildHasherDefault<FxHasher>>;

/// A HashSet keyed with [`FxHasher`].
pub(crate) type FxHashSet<T> = HashSet<T, BuildHasherDefault<FxHasher>>;

/// Collects a batch of indices into a set for O(1) membership checks during removal.
pub(crate) fn index_set(indices: &[usize]) -> FxHashSet<usize> {
    let mut set =
        FxHashSet::with_capacity_and_hasher(indices.len(), BuildHasherDefault::<FxHasher>::default());
    set.extend(indices.iter().copied());
    set
}
