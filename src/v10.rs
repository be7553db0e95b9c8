//! Reader for the DBLP-style V10 dump: a directory of JSON-lines files,
//! one paper per line.

use crate::config::PROGRESS_INTERVAL;
use crate::index::IdMapping;
use crate::models::{Paper, ParsedDataset, RawReference};
use crate::resolve::resolve_references;
use anyhow::{bail, Context, Result};
use indicatif::ProgressBar;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// One line of a V10 file. Only `id` is mandatory; nulls and missing keys
/// fall back to empty values.
#[derive(Debug, Deserialize)]
pub struct V10Record {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub authors: Option<Vec<String>>,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default, rename = "abstract")]
    pub abstract_text: Option<String>,
    #[serde(default)]
    pub references: Option<Vec<String>>,
}

impl V10Record {
    fn into_parts(self) -> (String, Paper, Vec<String>) {
        let paper = Paper {
            title: self.title.unwrap_or_default(),
            authors: self.authors.unwrap_or_default(),
            venue: self.venue.unwrap_or_default(),
            year: self.year.unwrap_or(0),
            abstract_text: self.abstract_text.unwrap_or_default(),
        };
        (self.id, paper, self.references.unwrap_or_default())
    }
}

/// Parses every file below `dir` (recursively, in path order) and resolves
/// the references against the ids found.
pub fn parse_v10(dir: &Path) -> Result<ParsedDataset> {
    if !dir.is_dir() {
        bail!("V10 dump directory does not exist: {:?}", dir);
    }

    let files = collect_files(dir)?;
    info!(files = files.len(), dir = ?dir, "Parsing V10 dump");

    let mut data = ParsedDataset::new();
    let mut ids: IdMapping<String> = IdMapping::new();
    let mut raw_refs: Vec<RawReference<String>> = Vec::new();
    let pb = ProgressBar::new_spinner();

    for path in &files {
        read_file(path, &mut data, &mut ids, &mut raw_refs, &pb)?;
    }

    pb.finish_and_clear();

    let resolution = resolve_references(&raw_refs, &ids);
    data.stats.raw_references = raw_refs.len() as u64;
    data.stats.resolved_references = resolution.edges.len() as u64;
    data.stats.skipped_references = resolution.skipped;
    data.references = resolution.edges;

    info!(
        papers = data.paper_count(),
        references = data.references.len(),
        skipped = data.stats.skipped_references,
        malformed = data.stats.malformed_records,
        "V10 dump parsed"
    );

    Ok(data)
}

fn read_file(
    path: &Path,
    data: &mut ParsedDataset,
    ids: &mut IdMapping<String>,
    raw_refs: &mut Vec<RawReference<String>>,
    pb: &ProgressBar,
) -> Result<()> {
    let file = File::open(path).with_context(|| format!("Failed to open V10 file: {:?}", path))?;
    let reader = BufReader::new(file);
    debug!(file = ?path, "Reading V10 file");

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {} of {:?}", line_no + 1, path))?;
        if line.trim().is_empty() {
            continue;
        }

        let record: V10Record = match serde_json::from_str(&line) {
            Ok(r) => r,
            Err(e) => {
                warn!(file = ?path, line = line_no + 1, error = %e, "Skipping malformed V10 record");
                data.stats.inc_malformed();
                continue;
            }
        };

        let (id, paper, references) = record.into_parts();
        let idx = data.push_paper(paper);

        for cited in references {
            raw_refs.push(RawReference {
                citing: id.clone(),
                cited,
            });
        }

        if let Some(previous) = ids.assign(id, idx) {
            debug!(previous, current = idx, "Duplicate V10 id, keeping newest");
            data.stats.inc_duplicate_ids();
        }

        if u64::from(idx) % PROGRESS_INTERVAL == 0 {
            pb.tick();
        }
    }

    Ok(())
}

/// All regular files below `dir`, sorted so the index assignment is stable
/// across platforms. Symlinks are not followed.
fn collect_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to walk directory: {:?}", dir))?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}
