//! On-disk layout of a normalized dataset:
//!
//! - `papers` -- JSON object, paper index -> paper
//! - `papers_id` -- one paper index per line
//! - `first_authors`, `collaboration_authors` -- JSON object, author -> paper indices
//! - `references_flat` -- headerless CSV, one `citing,cited` row per edge

use crate::config::{
    COLLABORATION_AUTHORS_FILE, FIRST_AUTHORS_FILE, PAPERS_FILE, PAPERS_ID_FILE, REFERENCES_FILE,
};
use crate::models::{AuthorIndex, Edge, Paper, ParsedDataset};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::info;

/// A dataset read back from disk. The metadata fields are `None` when it was
/// loaded in `net_struct` mode.
#[derive(Debug, Default, PartialEq)]
pub struct RawData {
    pub keys: Vec<u32>,
    pub references: Vec<Edge>,
    pub papers: Option<BTreeMap<u32, Paper>>,
    pub first_authors: Option<AuthorIndex>,
    pub collaboration_authors: Option<AuthorIndex>,
}

pub fn write_raw(dir: &Path, data: &ParsedDataset) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create directory: {:?}", dir))?;

    let papers: BTreeMap<u32, &Paper> = data
        .papers
        .iter()
        .enumerate()
        .map(|(idx, paper)| (idx as u32, paper))
        .collect();
    write_json(&dir.join(PAPERS_FILE), &papers)?;

    let ids_path = dir.join(PAPERS_ID_FILE);
    let mut ids = BufWriter::new(
        File::create(&ids_path).with_context(|| format!("Failed to create: {:?}", ids_path))?,
    );
    for idx in papers.keys() {
        writeln!(ids, "{}", idx)?;
    }
    ids.flush()?;

    write_json(&dir.join(FIRST_AUTHORS_FILE), &data.first_authors)?;
    write_json(&dir.join(COLLABORATION_AUTHORS_FILE), &data.collaboration_authors)?;

    let refs_path = dir.join(REFERENCES_FILE);
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(BufWriter::with_capacity(
            128 * 1024,
            File::create(&refs_path).with_context(|| format!("Failed to create: {:?}", refs_path))?,
        ));
    for edge in &data.references {
        writer.serialize(edge)?;
    }
    writer.flush()?;

    info!(
        papers = papers.len(),
        references = data.references.len(),
        dir = ?dir,
        "Raw dataset written"
    );
    Ok(())
}

/// Loads a dataset written by [`write_raw`]. With `net_struct` only the
/// paper indices and references are read.
pub fn load_raw(dir: &Path, net_struct: bool) -> Result<RawData> {
    let ids_path = dir.join(PAPERS_ID_FILE);
    let ids_file =
        File::open(&ids_path).with_context(|| format!("Failed to open: {:?}", ids_path))?;
    let mut keys = Vec::new();
    for (line_no, line) in BufReader::new(ids_file).lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let idx = line
            .parse::<u32>()
            .with_context(|| format!("Invalid paper index on line {} of {:?}", line_no + 1, ids_path))?;
        keys.push(idx);
    }

    let refs_path = dir.join(REFERENCES_FILE);
    let mut reader = csv::ReaderBuilder::new().has_headers(false).from_reader(BufReader::new(
        File::open(&refs_path).with_context(|| format!("Failed to open: {:?}", refs_path))?,
    ));
    let mut references = Vec::new();
    for row in reader.deserialize() {
        let edge: Edge = row.with_context(|| format!("Invalid reference row in {:?}", refs_path))?;
        references.push(edge);
    }

    let mut raw = RawData {
        keys,
        references,
        ..RawData::default()
    };

    if !net_struct {
        raw.papers = Some(read_json(&dir.join(PAPERS_FILE))?);
        raw.first_authors = Some(read_json(&dir.join(FIRST_AUTHORS_FILE))?);
        raw.collaboration_authors = Some(read_json(&dir.join(COLLABORATION_AUTHORS_FILE))?);
    }

    info!(
        papers = raw.keys.len(),
        references = raw.references.len(),
        net_struct,
        "Raw dataset loaded"
    );
    Ok(raw)
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create: {:?}", path))?;
    let mut writer = BufWriter::with_capacity(128 * 1024, file);
    serde_json::to_writer(&mut writer, value)
        .with_context(|| format!("Failed to serialize: {:?}", path))?;
    writer.flush()?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).with_context(|| format!("Failed to open: {:?}", path))?;
    serde_json::from_reader(BufReader::with_capacity(128 * 1024, file))
        .with_context(|| format!("Failed to parse: {:?}", path))
}
