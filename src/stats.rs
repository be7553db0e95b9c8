use serde::Serialize;

/// Counters collected while parsing and resolving a single dump
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ParseStats {
    pub papers: u64,
    pub raw_references: u64,
    pub resolved_references: u64,
    pub skipped_references: u64,
    pub malformed_records: u64,
    pub duplicate_ids: u64,
}

impl ParseStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc_malformed(&mut self) {
        self.malformed_records += 1;
    }

    pub fn inc_duplicate_ids(&mut self) {
        self.duplicate_ids += 1;
    }

    /// Share of raw references that could not be resolved, in `[0, 1]`.
    pub fn skipped_ratio(&self) -> f64 {
        if self.raw_references == 0 {
            return 0.0;
        }
        self.skipped_references as f64 / self.raw_references as f64
    }

    /// Prints the end-of-run summary table.
    pub fn print_summary(&self, label: &str) {
        println!("=== {} ===", label);
        println!("Papers parsed:       {}", self.papers);
        println!("Raw references:      {}", self.raw_references);
        println!("Resolved references: {}", self.resolved_references);
        println!(
            "Skipped references:  {} ({:.2}%)",
            self.skipped_references,
            self.skipped_ratio() * 100.0
        );
        println!("Malformed records:   {}", self.malformed_records);
        println!("Duplicate ids:       {}", self.duplicate_ids);
    }
}
