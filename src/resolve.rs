use crate::index::IdMapping;
use crate::models::{Edge, RawReference};
use std::fmt::Debug;
use std::hash::Hash;
use tracing::{debug, info, warn};

/// Outcome of mapping raw references onto paper indices.
#[derive(Debug, Default)]
pub struct Resolution {
    pub edges: Vec<Edge>,
    pub skipped: u64,
}

/// Rewrites every `(citing id, cited id)` pair into `(citing index, cited index)`.
///
/// Pairs with an endpoint that never appeared as a primary record are dropped
/// and counted in [`Resolution::skipped`].
pub fn resolve_references<K>(raw: &[RawReference<K>], mapping: &IdMapping<K>) -> Resolution
where
    K: Eq + Hash + Debug,
{
    let mut edges = Vec::with_capacity(raw.len());
    let mut skipped = 0u64;

    for reference in raw {
        match (mapping.resolve(&reference.citing), mapping.resolve(&reference.cited)) {
            (Some(src), Some(dst)) => edges.push((src, dst)),
            _ => {
                debug!(
                    citing = ?reference.citing,
                    cited = ?reference.cited,
                    "Skipping unresolved reference"
                );
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        warn!(
            resolved = edges.len(),
            skipped = skipped,
            "References point outside the parsed dump"
        );
    } else {
        info!(resolved = edges.len(), "All references resolved");
    }

    Resolution { edges, skipped }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> Vec<RawReference<String>> {
        pairs
            .iter()
            .map(|(a, b)| RawReference {
                citing: a.to_string(),
                cited: b.to_string(),
            })
            .collect()
    }

    fn mapping(ids: &[&str]) -> IdMapping<String> {
        ids.iter()
            .enumerate()
            .map(|(i, id)| (id.to_string(), i as u32))
            .collect()
    }

    #[test]
    fn resolves_known_pairs() {
        let result = resolve_references(&raw(&[("b", "a"), ("c", "a")]), &mapping(&["a", "b", "c"]));
        assert_eq!(result.edges, vec![(1, 0), (2, 0)]);
        assert_eq!(result.skipped, 0);
    }

    #[test]
    fn skips_unknown_target() {
        let result = resolve_references(&raw(&[("b", "a"), ("b", "zzz")]), &mapping(&["a", "b"]));
        assert_eq!(result.edges, vec![(1, 0)]);
        assert_eq!(result.skipped, 1);
    }

    #[test]
    fn skips_unknown_source() {
        let result = resolve_references(&raw(&[("zzz", "a")]), &mapping(&["a"]));
        assert!(result.edges.is_empty());
        assert_eq!(result.skipped, 1);
    }

    #[test]
    fn keeps_duplicates_and_self_loops() {
        let result = resolve_references(
            &raw(&[("a", "a"), ("b", "a"), ("b", "a")]),
            &mapping(&["a", "b"]),
        );
        assert_eq!(result.edges, vec![(0, 0), (1, 0), (1, 0)]);
    }

    #[test]
    fn integer_ids() {
        let ids: IdMapping<u64> = [(100u64, 0u32), (200, 1)].into_iter().collect();
        let refs = vec![RawReference {
            citing: 200u64,
            cited: 100u64,
        }];
        let result = resolve_references(&refs, &ids);
        assert_eq!(result.edges, vec![(1, 0)]);
    }

    #[test]
    fn empty_input() {
        let result = resolve_references(&raw(&[]), &mapping(&[]));
        assert!(result.edges.is_empty());
        assert_eq!(result.skipped, 0);
    }
}
