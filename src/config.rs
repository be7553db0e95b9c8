/// Data directory used when no `--data-path` is given
pub const DEFAULT_DATA_DIR: &str = ".data";

/// Directory (under the data path) holding the V10 JSON-lines dump
pub const V10_DIR: &str = "dblp-ref";

/// File (under the data path) holding the V8 tagged-text dump
pub const V8_FILE: &str = "citation-acm-v8.txt";

/// Raw dataset file names
pub const PAPERS_FILE: &str = "papers";
pub const PAPERS_ID_FILE: &str = "papers_id";
pub const FIRST_AUTHORS_FILE: &str = "first_authors";
pub const COLLABORATION_AUTHORS_FILE: &str = "collaboration_authors";
pub const REFERENCES_FILE: &str = "references_flat";

/// Persisted graph file names
pub const GRAPH_FILE: &str = "citation_graph.bin";
pub const LIGHT_GRAPH_FILE: &str = "citation_graph_light.bin";

/// Bump when the on-disk graph layout changes
pub const GRAPH_VERSION: u32 = 1;

/// Number of characters before the id on a V8 `#index` line
pub const V8_ID_OFFSET: usize = 6;

/// Progress update interval (tick every N records)
pub const PROGRESS_INTERVAL: u64 = 1000;
