//! Directed citation graph with typed per-vertex attributes, backed by petgraph.

use crate::config::GRAPH_VERSION;
use crate::models::{Edge, Paper, ParsedDataset};
use anyhow::{bail, Context, Result};
use bincode::Options;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueType {
    String,
    Int,
}

/// Declared type of every paper attribute attached to the graph.
pub const VALUE_TYPES: [(&str, ValueType); 5] = [
    ("title", ValueType::String),
    ("authors", ValueType::String),
    ("venue", ValueType::String),
    ("year", ValueType::Int),
    ("abstract", ValueType::String),
];

pub fn declared_type(name: &str) -> Option<ValueType> {
    VALUE_TYPES
        .iter()
        .find(|(attr, _)| *attr == name)
        .map(|(_, ty)| *ty)
}

/// One value per vertex, ordered by vertex index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeValues {
    String(Vec<String>),
    Int(Vec<i64>),
}

impl AttributeValues {
    pub fn value_type(&self) -> ValueType {
        match self {
            AttributeValues::String(_) => ValueType::String,
            AttributeValues::Int(_) => ValueType::Int,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            AttributeValues::String(v) => v.len(),
            AttributeValues::Int(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn truncated(&self, len: usize) -> Self {
        match self {
            AttributeValues::String(v) => AttributeValues::String(v[..len.min(v.len())].to_vec()),
            AttributeValues::Int(v) => AttributeValues::Int(v[..len.min(v.len())].to_vec()),
        }
    }
}

/// The operations the pipeline needs from a graph backend.
pub trait CitationGraph {
    fn add_vertices(&mut self, count: usize);

    /// Adds one edge per pair. Parallel edges and self-loops are kept.
    fn add_edges(&mut self, edges: &[Edge]) -> Result<()>;

    fn set_vertex_attribute(&mut self, name: &str, values: AttributeValues) -> Result<()>;

    fn save(&self, path: &Path) -> Result<()>;

    fn vertex_count(&self) -> usize;

    fn edge_count(&self) -> usize;
}

/// Vertex weight is the paper index, so `NodeIndex::new(i)` is paper `i`.
#[derive(Debug, Default)]
pub struct PetCitationGraph {
    graph: DiGraph<u32, ()>,
    attributes: BTreeMap<String, AttributeValues>,
}

#[derive(Serialize)]
struct GraphFileSer<'a> {
    version: u32,
    vertex_count: u32,
    edges: Vec<Edge>,
    attributes: &'a BTreeMap<String, AttributeValues>,
}

#[derive(Deserialize)]
struct GraphFileDe {
    version: u32,
    vertex_count: u32,
    edges: Vec<Edge>,
    attributes: BTreeMap<String, AttributeValues>,
}

impl PetCitationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Edges as `(citing, cited)` in insertion order.
    pub fn edges(&self) -> Vec<Edge> {
        self.graph
            .edge_references()
            .map(|e| (e.source().index() as u32, e.target().index() as u32))
            .collect()
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeValues> {
        self.attributes.get(name)
    }

    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    /// Papers cited by `idx`.
    pub fn cited_by(&self, idx: u32) -> Vec<u32> {
        let mut out: Vec<u32> = self
            .graph
            .neighbors(NodeIndex::new(idx as usize))
            .map(|n| n.index() as u32)
            .collect();
        // petgraph walks outgoing edges newest first
        out.reverse();
        out
    }

    /// Subgraph induced by the first `size` vertices, attributes included.
    pub fn induced_prefix(&self, size: usize) -> Self {
        let graph = self
            .graph
            .filter_map(|n, w| (n.index() < size).then_some(*w), |_, e| Some(*e));
        let attributes = self
            .attributes
            .iter()
            .map(|(name, values)| (name.clone(), values.truncated(size)))
            .collect();
        Self { graph, attributes }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file_size = fs::metadata(path)
            .with_context(|| format!("Graph file does not exist: {:?}", path))?
            .len();
        let file = File::open(path).with_context(|| format!("Failed to open graph file: {:?}", path))?;
        let reader = BufReader::with_capacity(256 * 1024, file);

        let options = bincode::options().with_limit(file_size.saturating_add(1024));
        let stored: GraphFileDe = options
            .deserialize_from(reader)
            .with_context(|| format!("Failed to deserialize graph: {:?}", path))?;

        if stored.version != GRAPH_VERSION {
            bail!(
                "Graph file version {} does not match expected {}",
                stored.version,
                GRAPH_VERSION
            );
        }

        let mut graph = Self::new();
        graph.add_vertices(stored.vertex_count as usize);
        graph.add_edges(&stored.edges)?;
        for (name, values) in stored.attributes {
            graph.set_vertex_attribute(&name, values)?;
        }

        info!(
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            "Graph loaded"
        );
        Ok(graph)
    }
}

impl CitationGraph for PetCitationGraph {
    fn add_vertices(&mut self, count: usize) {
        let start = self.graph.node_count();
        self.graph.reserve_nodes(count);
        for idx in start..start + count {
            self.graph.add_node(idx as u32);
        }
    }

    fn add_edges(&mut self, edges: &[Edge]) -> Result<()> {
        let n = self.graph.node_count();
        self.graph.reserve_edges(edges.len());
        for &(src, dst) in edges {
            if src as usize >= n || dst as usize >= n {
                bail!("Edge ({}, {}) out of range for {} vertices", src, dst, n);
            }
            self.graph
                .add_edge(NodeIndex::new(src as usize), NodeIndex::new(dst as usize), ());
        }
        Ok(())
    }

    fn set_vertex_attribute(&mut self, name: &str, values: AttributeValues) -> Result<()> {
        if let Some(expected) = declared_type(name) {
            if values.value_type() != expected {
                bail!(
                    "Attribute {} expects {:?} values, got {:?}",
                    name,
                    expected,
                    values.value_type()
                );
            }
        }
        if values.len() != self.graph.node_count() {
            bail!(
                "Attribute {} has {} values for {} vertices",
                name,
                values.len(),
                self.graph.node_count()
            );
        }
        debug!(attribute = name, "Vertex attribute set");
        self.attributes.insert(name.to_string(), values);
        Ok(())
    }

    /// Writes to a temp file first, then renames over `path`.
    fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }

        let stored = GraphFileSer {
            version: GRAPH_VERSION,
            vertex_count: self.graph.node_count() as u32,
            edges: self.edges(),
            attributes: &self.attributes,
        };

        let tmp_path = path.with_extension("bin.tmp");
        let written = File::create(&tmp_path)
            .with_context(|| format!("Failed to create temp graph file: {:?}", tmp_path))
            .and_then(|file| write_graph_file(BufWriter::new(file), &stored))
            .and_then(|()| {
                fs::rename(&tmp_path, path)
                    .with_context(|| format!("Failed to rename temp graph file to: {:?}", path))
            });

        if let Err(e) = written {
            if tmp_path.exists() {
                if let Err(rm) = fs::remove_file(&tmp_path) {
                    warn!(error = %rm, path = ?tmp_path, "Failed to remove temp graph file");
                }
            }
            return Err(e);
        }

        info!(
            vertices = self.vertex_count(),
            edges = self.edge_count(),
            path = ?path,
            "Graph saved"
        );
        Ok(())
    }

    fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

/// Serializes and flushes, so a failed final write is reported instead of
/// being lost when the writer is dropped.
fn write_graph_file<W: Write>(mut writer: W, stored: &GraphFileSer<'_>) -> Result<()> {
    bincode::DefaultOptions::new()
        .serialize_into(&mut writer, stored)
        .context("Failed to serialize graph")?;
    writer.flush().context("Failed to flush graph file")?;
    Ok(())
}

/// One vertex per paper, one edge per resolved reference.
pub fn build_graph(data: &ParsedDataset) -> Result<PetCitationGraph> {
    let mut graph = PetCitationGraph::new();
    graph.add_vertices(data.paper_count());
    graph.add_edges(&data.references)?;
    info!(
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        "Citation graph built"
    );
    Ok(graph)
}

/// Attaches every `VALUE_TYPES` attribute, authors joined with `,`.
pub fn annotate<G: CitationGraph>(graph: &mut G, papers: &[Paper]) -> Result<()> {
    graph.set_vertex_attribute("title", strings(papers, |p| p.title.clone()))?;
    graph.set_vertex_attribute("authors", strings(papers, |p| p.authors.join(",")))?;
    graph.set_vertex_attribute("venue", strings(papers, |p| p.venue.clone()))?;
    graph.set_vertex_attribute(
        "year",
        AttributeValues::Int(papers.iter().map(|p| i64::from(p.year)).collect()),
    )?;
    graph.set_vertex_attribute("abstract", strings(papers, |p| p.abstract_text.clone()))?;
    Ok(())
}

fn strings(papers: &[Paper], f: impl Fn(&Paper) -> String) -> AttributeValues {
    AttributeValues::String(papers.iter().map(f).collect())
}
