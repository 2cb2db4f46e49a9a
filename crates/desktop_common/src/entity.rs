//! The entity-keyed reducer pattern: one pure function applied across every
//! entry of a keyed map, replacing only the entries for which it returns a
//! new value. Windows, shortcuts and minefield tiles all reduce this way.

use std::collections::BTreeMap;

/// Applies `f` to every `(key, value)` pair, replacing an entry only when `f`
/// returns `Some(replacement)`.
pub fn map_entities<K, V>(map: &mut BTreeMap<K, V>, mut f: impl FnMut(&K, &V) -> Option<V>) {
    for (key, value) in map.iter_mut() {
        if let Some(next) = f(key, value) {
            *value = next;
        }
    }
}

/// Same as [`map_entities`], but the caller derives a read-only context from
/// the whole map first; the per-entity pass then only sees its own entry plus
/// that shared context. This is the shape cross-entity reducers (z-order
/// recomputation, flood fill) use to stay single-writer per entity.
pub fn map_entities_with<K, V, C>(
    map: &mut BTreeMap<K, V>,
    precompute: impl FnOnce(&BTreeMap<K, V>) -> C,
    mut f: impl FnMut(&K, &V, &C) -> Option<V>,
) {
    let context = precompute(map);
    for (key, value) in map.iter_mut() {
        if let Some(next) = f(key, value, &context) {
            *value = next;
        }
    }
}
