use crate::graph::{CitationGraph, PetCitationGraph};
use anyhow::Result;
use std::path::Path;
use tracing::{info, warn};

/// Reduced graph for quick experiments: the subgraph induced by the first
/// `size` papers. Sizes past the paper count keep the whole graph.
pub fn light_graph(graph: &PetCitationGraph, size: usize) -> PetCitationGraph {
    let size = size.min(graph.vertex_count());
    let light = graph.induced_prefix(size);
    info!(
        vertices = light.vertex_count(),
        edges = light.edge_count(),
        "Light graph extracted"
    );
    light
}

/// Builds and saves the light graph. Failures are logged and reported as
/// `false` so they never abort a run whose main outputs are already on disk.
pub fn dump_light_graph(graph: &PetCitationGraph, size: usize, path: &Path) -> bool {
    match save_light(graph, size, path) {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, path = ?path, "Failed to write light graph");
            false
        }
    }
}

fn save_light(graph: &PetCitationGraph, size: usize, path: &Path) -> Result<()> {
    light_graph(graph, size).save(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Paper, ParsedDataset};
    use tempfile::TempDir;

    fn graph(n: usize, edges: Vec<(u32, u32)>) -> PetCitationGraph {
        let mut data = ParsedDataset::new();
        for _ in 0..n {
            data.push_paper(Paper::default());
        }
        data.references = edges;
        crate::graph::build_graph(&data).unwrap()
    }

    #[test]
    fn keeps_only_prefix_edges() {
        let g = graph(5, vec![(0, 1), (4, 0), (1, 2), (3, 1)]);
        let light = light_graph(&g, 3);
        assert_eq!(light.vertex_count(), 3);
        assert_eq!(light.edges(), vec![(0, 1), (1, 2)]);
        assert!(light.edges().iter().all(|&(a, b)| a < 3 && b < 3));
    }

    #[test]
    fn oversized_request_keeps_everything() {
        let g = graph(2, vec![(1, 0)]);
        let light = light_graph(&g, 100);
        assert_eq!(light.vertex_count(), 2);
        assert_eq!(light.edge_count(), 1);
    }

    #[test]
    fn dump_writes_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("light.bin");
        assert!(dump_light_graph(&graph(3, vec![(2, 0)]), 2, &path));
        assert!(path.exists());
    }

    #[test]
    fn dump_failure_is_not_fatal() {
        let dir = TempDir::new().unwrap();
        // a regular file where a directory is expected
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"x").unwrap();
        let path = blocker.join("light.bin");
        assert!(!dump_light_graph(&graph(3, vec![]), 2, &path));
    }
}
