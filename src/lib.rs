//! citenet: citation-network dump preprocessing
//!
//! This crate turns the DBLP (V10) and ACM (V8) citation-network dumps into a
//! normalized dataset and a directed citation graph:
//!
//! 1. **Parse** -- Stream the dump, assign every paper a dense index, build the
//!    first-author and collaboration indices, and collect references by native id
//! 2. **Resolve** -- Map references onto paper indices; references to papers
//!    outside the dump are skipped and counted
//! 3. **Persist raw data** (optional) -- JSON blobs for papers and authors, a
//!    headerless CSV for references
//! 4. **Build the graph** -- One vertex per paper, one edge per reference, typed
//!    vertex attributes; optionally saved along with a reduced "light" subgraph
//!
//! # Key Modules
//!
//! - [`v10`] -- JSON-lines directory reader
//! - [`v8`] -- Tagged-line text reader with an explicit record accumulator
//! - [`index`] -- Native id to paper index mapping
//! - [`resolve`] -- Reference resolution with skip-and-count policy
//! - [`graph`] -- `CitationGraph` trait and its petgraph implementation
//! - [`light`] -- Reduced subgraph for quick experiments
//! - [`raw`] -- Raw dataset writer/reader, including `net_struct` mode
//! - [`pipeline`] -- Orchestration of the selected dumps
//! - [`models`] -- Core data types (Paper, ParsedDataset)
//! - [`stats`] -- Parse and resolution counters
//! - [`error`] -- Configuration errors
//! - [`config`] -- File names and other constants
//!
//! # Example Usage
//!
//! ```bash
//! # Both dumps under ./.data, graph only
//! citenet preprocess
//!
//! # V10 only, also dump the raw dataset and a 1000-paper light graph
//! citenet preprocess --data-path /data/citations --no-v8 --raw --light 1000
//!
//! # Summarize a raw dataset without loading paper metadata
//! citenet inspect --dir /data/citations/v10 --net-struct
//! ```

pub mod config;
pub mod error;
pub mod graph;
pub mod index;
pub mod light;
pub mod models;
pub mod pipeline;
pub mod raw;
pub mod resolve;
pub mod stats;
pub mod v10;
pub mod v8;
