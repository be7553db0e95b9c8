//! Reader for the ACM-style V8 dump: a single text file where each field of a
//! record sits on its own `#<tag>` line and a plain line closes the record.
//!
//! ```text
//! #*Title
//! #@Alice,Bob
//! #t2020
//! #cVenue
//! #index17
//! #%3
//! #!Abstract
//!
//! ```

use crate::config::{PROGRESS_INTERVAL, V8_ID_OFFSET};
use crate::index::IdMapping;
use crate::models::{Paper, ParsedDataset, RawReference};
use crate::resolve::resolve_references;
use anyhow::{Context, Result};
use indicatif::ProgressBar;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{info, warn};

/// Fields of the record currently being read.
///
/// Reset to `Accumulator::default()` after every finalize: no id, empty
/// strings, no authors, year 0.
#[derive(Debug, Default)]
struct Accumulator {
    id: Option<u64>,
    paper: Paper,
    /// At least one tag line has been seen since the last reset.
    touched: bool,
}

impl Accumulator {
    fn take(&mut self) -> Paper {
        std::mem::take(self).paper
    }
}

struct V8Parser {
    data: ParsedDataset,
    ids: IdMapping<u64>,
    raw_refs: Vec<RawReference<u64>>,
    current: Accumulator,
}

impl V8Parser {
    fn new() -> Self {
        Self {
            data: ParsedDataset::new(),
            ids: IdMapping::new(),
            raw_refs: Vec::new(),
            current: Accumulator::default(),
        }
    }

    fn feed(&mut self, line: &str, line_no: usize) {
        let line = line.trim_end_matches('\r');
        let mut chars = line.chars();

        if chars.next() != Some('#') {
            self.finalize();
            return;
        }

        let Some(tag) = chars.next() else {
            return;
        };
        let value = chars.as_str();
        self.current.touched = true;

        match tag {
            '*' => self.current.paper.title = value.to_string(),
            '@' => self.current.paper.authors = split_authors(value),
            't' => match value.trim().parse::<i32>() {
                Ok(year) => self.current.paper.year = year,
                Err(_) => self.malformed(line_no, "year", value),
            },
            'c' => self.current.paper.venue = value.to_string(),
            'i' => match line.get(V8_ID_OFFSET..).map(str::trim).map(str::parse::<u64>) {
                Some(Ok(id)) => {
                    self.current.id = Some(id);
                    if self.ids.assign(id, self.data.next_index()).is_some() {
                        self.data.stats.inc_duplicate_ids();
                    }
                }
                _ => self.malformed(line_no, "id", line),
            },
            '%' => match (self.current.id, value.trim().parse::<u64>()) {
                (Some(citing), Ok(cited)) => self.raw_refs.push(RawReference { citing, cited }),
                _ => self.malformed(line_no, "reference", value),
            },
            '!' => self.current.paper.abstract_text = value.to_string(),
            _ => {}
        }
    }

    fn finalize(&mut self) {
        if !self.current.touched {
            return;
        }
        let paper = self.current.take();
        self.data.push_paper(paper);
    }

    fn malformed(&mut self, line_no: usize, field: &str, value: &str) {
        warn!(line = line_no, field, value, "Ignoring malformed V8 field");
        self.data.stats.inc_malformed();
    }

    fn finish(mut self) -> ParsedDataset {
        self.finalize();

        let resolution = resolve_references(&self.raw_refs, &self.ids);
        self.data.stats.raw_references = self.raw_refs.len() as u64;
        self.data.stats.resolved_references = resolution.edges.len() as u64;
        self.data.stats.skipped_references = resolution.skipped;
        self.data.references = resolution.edges;
        self.data
    }
}

fn split_authors(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parses a V8 dump from any line source.
pub fn parse_v8_reader<R: BufRead>(reader: R) -> Result<ParsedDataset> {
    let mut parser = V8Parser::new();
    let pb = ProgressBar::new_spinner();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read V8 line {}", line_no + 1))?;
        parser.feed(&line, line_no + 1);
        if (line_no as u64) % PROGRESS_INTERVAL == 0 {
            pb.tick();
        }
    }

    pb.finish_and_clear();
    Ok(parser.finish())
}

/// Parses the V8 dump file at `path` and resolves its references.
pub fn parse_v8(path: &Path) -> Result<ParsedDataset> {
    let file = File::open(path).with_context(|| format!("Failed to open V8 dump at: {:?}", path))?;
    info!(file = ?path, "Parsing V8 dump");

    let data = parse_v8_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse V8 dump: {:?}", path))?;

    info!(
        papers = data.paper_count(),
        references = data.references.len(),
        skipped = data.stats.skipped_references,
        malformed = data.stats.malformed_records,
        "V8 dump parsed"
    );

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse(text: &str) -> ParsedDataset {
        parse_v8_reader(Cursor::new(text.to_string())).unwrap()
    }

    const TWO_RECORDS: &str = "#*A\n#@Alice,Bob\n#t2020\n#cConfX\n#index1\n#!Abstract1\n\n\
#*B\n#@Carol\n#t2021\n#cConfY\n#index2\n#%1\n#!Abstract2\n\n";

    #[test]
    fn two_records_with_one_citation() {
        let data = parse(TWO_RECORDS);
        assert_eq!(data.paper_count(), 2);
        assert_eq!(data.papers[0].title, "A");
        assert_eq!(data.papers[0].authors, vec!["Alice", "Bob"]);
        assert_eq!(data.papers[0].year, 2020);
        assert_eq!(data.papers[0].venue, "ConfX");
        assert_eq!(data.papers[0].abstract_text, "Abstract1");
        assert_eq!(data.papers[1].authors, vec!["Carol"]);
        assert_eq!(data.references, vec![(1, 0)]);
        assert_eq!(data.stats.skipped_references, 0);
    }

    #[test]
    fn accumulator_resets_between_records() {
        let data = parse("#*A\n#t1999\n#cV\n#!abs\n\n#*B\n\n");
        assert_eq!(data.papers[1].title, "B");
        assert_eq!(data.papers[1].year, 0);
        assert_eq!(data.papers[1].venue, "");
        assert_eq!(data.papers[1].abstract_text, "");
        assert!(data.papers[1].authors.is_empty());
    }

    #[test]
    fn repeated_separators_do_not_create_papers() {
        let data = parse("\n\n#*A\n\n\n\n#*B\n\n");
        assert_eq!(data.paper_count(), 2);
    }

    #[test]
    fn last_record_without_terminator_is_kept() {
        let data = parse("#*A\n\n#*B\n#index7");
        assert_eq!(data.paper_count(), 2);
        assert_eq!(data.papers[1].title, "B");
    }

    #[test]
    fn record_without_authors_skips_first_author() {
        let data = parse("#*Anonymous\n#index1\n\n");
        assert_eq!(data.paper_count(), 1);
        assert!(data.first_authors.is_empty());
    }

    #[test]
    fn dangling_reference_is_skipped() {
        let data = parse("#*A\n#index1\n#%1\n#%99\n\n");
        assert_eq!(data.references, vec![(0, 0)]);
        assert_eq!(data.stats.raw_references, 2);
        assert_eq!(data.stats.skipped_references, 1);
    }

    #[test]
    fn malformed_fields_keep_defaults() {
        let data = parse("#*A\n#tunknown\n#indexabc\n#%1\n\n");
        assert_eq!(data.paper_count(), 1);
        assert_eq!(data.papers[0].year, 0);
        assert!(data.references.is_empty());
        // year, id, and the reference that has no citing id
        assert_eq!(data.stats.malformed_records, 3);
    }

    #[test]
    fn crlf_lines() {
        let data = parse("#*A\r\n#@Alice, Bob\r\n#index3\r\n\r\n");
        assert_eq!(data.papers[0].title, "A");
        assert_eq!(data.papers[0].authors, vec!["Alice", "Bob"]);
        assert_eq!(data.stats.malformed_records, 0);
    }

    #[test]
    fn unknown_tags_are_ignored() {
        let data = parse("#*A\n#xsomething\n\n");
        assert_eq!(data.paper_count(), 1);
        assert_eq!(data.stats.malformed_records, 0);
    }

    #[test]
    fn split_authors_drops_empty_names() {
        assert_eq!(split_authors(""), Vec::<String>::new());
        assert_eq!(split_authors("A,,B, "), vec!["A", "B"]);
    }

    #[test]
    fn missing_file_fails() {
        assert!(parse_v8(Path::new("/nonexistent/citation-acm-v8.txt")).is_err());
    }
}
