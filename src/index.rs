use rustc_hash::FxHashMap;
use std::borrow::Borrow;
use std::hash::Hash;

/// Native paper id -> dense index assigned at parse time.
///
/// Append-only while a dump is being read, read-only once resolution starts.
pub struct IdMapping<K> {
    id_to_idx: FxHashMap<K, u32>,
}

impl<K: Eq + Hash> IdMapping<K> {
    pub fn new() -> Self {
        Self {
            id_to_idx: FxHashMap::default(),
        }
    }

    /// Maps `id` to `idx`, returning the index it previously pointed at.
    pub fn assign(&mut self, id: K, idx: u32) -> Option<u32> {
        self.id_to_idx.insert(id, idx)
    }

    pub fn resolve<Q>(&self, id: &Q) -> Option<u32>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.id_to_idx.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.id_to_idx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_idx.is_empty()
    }
}

impl<K: Eq + Hash> Default for IdMapping<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash> FromIterator<(K, u32)> for IdMapping<K> {
    fn from_iter<I: IntoIterator<Item = (K, u32)>>(iter: I) -> Self {
        Self {
            id_to_idx: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_mapping(ids: Vec<(&str, u32)>) -> IdMapping<String> {
        ids.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }

    #[test]
    fn resolve_known_id() {
        let mapping = make_mapping(vec![("53e99784b7602d9701f3e13e", 0), ("abc", 1)]);
        assert_eq!(mapping.resolve("53e99784b7602d9701f3e13e"), Some(0));
        assert_eq!(mapping.resolve("abc"), Some(1));
    }

    #[test]
    fn resolve_unknown_id() {
        let mapping = make_mapping(vec![("abc", 0)]);
        assert_eq!(mapping.resolve("xyz"), None);
    }

    #[test]
    fn resolve_case_sensitive() {
        let mapping = make_mapping(vec![("Abc", 0)]);
        assert_eq!(mapping.resolve("Abc"), Some(0));
        assert_eq!(mapping.resolve("abc"), None);
    }

    #[test]
    fn assign_returns_previous_index() {
        let mut mapping = IdMapping::new();
        assert_eq!(mapping.assign(42u64, 0), None);
        assert_eq!(mapping.assign(42u64, 3), Some(0));
        assert_eq!(mapping.resolve(&42), Some(3));
        assert_eq!(mapping.len(), 1);
    }

    #[test]
    fn empty_mapping() {
        let mapping: IdMapping<u64> = IdMapping::new();
        assert!(mapping.is_empty());
        assert_eq!(mapping.resolve(&0), None);
    }
}
