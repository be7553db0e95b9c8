use crate::stats::ParseStats;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Author name -> indices of the papers it is attached to, in parse order.
pub type AuthorIndex = BTreeMap<String, Vec<u32>>;

/// Citing index -> cited index.
pub type Edge = (u32, u32);

/// A citation before the native ids have been mapped to indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawReference<K> {
    pub citing: K,
    pub cited: K,
}

/// One normalized citation-network record.
///
/// `year` is `0` when the dump does not carry one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paper {
    pub title: String,
    pub authors: Vec<String>,
    pub venue: String,
    pub year: i32,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
}

impl Paper {
    pub fn first_author(&self) -> Option<&str> {
        self.authors.first().map(String::as_str)
    }
}

/// Everything a single parse produces. Paper `i` lives at `papers[i]`.
#[derive(Debug, Default)]
pub struct ParsedDataset {
    pub papers: Vec<Paper>,
    pub first_authors: AuthorIndex,
    pub collaboration_authors: AuthorIndex,
    pub references: Vec<Edge>,
    pub stats: ParseStats,
}

impl ParsedDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index the next paper will receive.
    pub fn next_index(&self) -> u32 {
        self.papers.len() as u32
    }

    /// Stores the paper under the next dense index and registers its authors.
    pub fn push_paper(&mut self, paper: Paper) -> u32 {
        let idx = self.next_index();

        if let Some(first) = paper.first_author() {
            append_author(&mut self.first_authors, first, idx);
        }
        for author in &paper.authors {
            append_author(&mut self.collaboration_authors, author, idx);
        }

        self.papers.push(paper);
        self.stats.papers += 1;
        idx
    }

    pub fn paper_count(&self) -> usize {
        self.papers.len()
    }
}

fn append_author(index: &mut AuthorIndex, author: &str, idx: u32) {
    match index.get_mut(author) {
        Some(papers) => papers.push(idx),
        None => {
            index.insert(author.to_string(), vec![idx]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper(title: &str, authors: &[&str]) -> Paper {
        Paper {
            title: title.to_string(),
            authors: authors.iter().map(|a| a.to_string()).collect(),
            ..Paper::default()
        }
    }

    #[test]
    fn push_paper_assigns_dense_indices() {
        let mut data = ParsedDataset::new();
        assert_eq!(data.push_paper(paper("A", &["Alice"])), 0);
        assert_eq!(data.push_paper(paper("B", &["Bob"])), 1);
        assert_eq!(data.push_paper(paper("C", &[])), 2);
        assert_eq!(data.paper_count(), 3);
        assert_eq!(data.stats.papers, 3);
    }

    #[test]
    fn push_paper_registers_first_and_collaboration_authors() {
        let mut data = ParsedDataset::new();
        data.push_paper(paper("A", &["Alice", "Bob"]));
        data.push_paper(paper("B", &["Bob", "Alice"]));

        assert_eq!(data.first_authors["Alice"], vec![0]);
        assert_eq!(data.first_authors["Bob"], vec![1]);
        assert_eq!(data.collaboration_authors["Alice"], vec![0, 1]);
        assert_eq!(data.collaboration_authors["Bob"], vec![0, 1]);
    }

    #[test]
    fn push_paper_without_authors_skips_first_author() {
        let mut data = ParsedDataset::new();
        data.push_paper(paper("Anonymous", &[]));
        assert!(data.first_authors.is_empty());
        assert!(data.collaboration_authors.is_empty());
        assert_eq!(data.paper_count(), 1);
    }

    #[test]
    fn paper_serializes_abstract_key() {
        let p = Paper {
            abstract_text: "text".to_string(),
            ..Paper::default()
        };
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["abstract"], "text");
        assert_eq!(json["year"], 0);
    }
}
