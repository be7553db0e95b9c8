use crate::config::{DEFAULT_DATA_DIR, GRAPH_FILE, LIGHT_GRAPH_FILE, V10_DIR, V8_FILE};
use crate::error::ConfigError;
use crate::graph::{annotate, build_graph, CitationGraph};
use crate::light::dump_light_graph;
use crate::models::ParsedDataset;
use crate::raw::write_raw;
use crate::stats::ParseStats;
use crate::{v10, v8};
use anyhow::Result;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpFormat {
    V10,
    V8,
}

impl DumpFormat {
    pub fn name(&self) -> &'static str {
        match self {
            DumpFormat::V10 => "v10",
            DumpFormat::V8 => "v8",
        }
    }

    /// Dump location under the data path: a directory for V10, a file for V8.
    pub fn input_path(&self, data_path: &Path) -> PathBuf {
        match self {
            DumpFormat::V10 => data_path.join(V10_DIR),
            DumpFormat::V8 => data_path.join(V8_FILE),
        }
    }

    /// Each format writes under its own directory so two runs never clash.
    pub fn output_dir(&self, data_path: &Path) -> PathBuf {
        data_path.join(self.name())
    }

    pub fn parse(&self, data_path: &Path) -> Result<ParsedDataset> {
        let input = self.input_path(data_path);
        match self {
            DumpFormat::V10 => v10::parse_v10(&input),
            DumpFormat::V8 => v8::parse_v8(&input),
        }
    }
}

impl fmt::Display for DumpFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Persist the citation graph
    pub dump_graph: bool,
    /// Persist the normalized dataset
    pub dump_raw_data: bool,
    pub v10: bool,
    pub v8: bool,
    /// Also persist the subgraph induced by the first N papers
    pub dump_light: Option<usize>,
    /// Root for every read and write; `./.data` when unset
    pub data_path: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            dump_graph: true,
            dump_raw_data: false,
            v10: true,
            v8: true,
            dump_light: None,
            data_path: None,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.v10 && !self.v8 {
            return Err(ConfigError::NoFormatSelected);
        }
        if self.dump_light == Some(0) {
            return Err(ConfigError::EmptyLightGraph);
        }
        Ok(())
    }

    pub fn data_path(&self) -> PathBuf {
        self.data_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
    }

    /// Selected formats, V10 first.
    pub fn formats(&self) -> Vec<DumpFormat> {
        let mut formats = Vec::with_capacity(2);
        if self.v10 {
            formats.push(DumpFormat::V10);
        }
        if self.v8 {
            formats.push(DumpFormat::V8);
        }
        formats
    }
}

/// What one format's run produced.
#[derive(Debug)]
pub struct RunReport {
    pub format: DumpFormat,
    pub stats: ParseStats,
    pub vertices: usize,
    pub edges: usize,
    pub raw_dir: Option<PathBuf>,
    pub graph_path: Option<PathBuf>,
    pub light_graph_path: Option<PathBuf>,
    pub duration_secs: f64,
}

/// Validates the options, then processes each selected dump independently.
pub fn run(config: &PipelineConfig) -> Result<Vec<RunReport>> {
    config.validate()?;

    let data_path = config.data_path();
    info!(data_path = ?data_path, "Starting preprocessing");

    config
        .formats()
        .into_iter()
        .map(|format| run_format(format, &data_path, config))
        .collect()
}

pub fn run_format(format: DumpFormat, data_path: &Path, config: &PipelineConfig) -> Result<RunReport> {
    let start = Instant::now();
    info!(format = %format, "Processing dump");

    let data = format.parse(data_path)?;
    let output_dir = format.output_dir(data_path);

    let raw_dir = if config.dump_raw_data {
        write_raw(&output_dir, &data)?;
        Some(output_dir.clone())
    } else {
        None
    };

    let mut graph = build_graph(&data)?;
    annotate(&mut graph, &data.papers)?;

    let graph_path = if config.dump_graph {
        let path = output_dir.join(GRAPH_FILE);
        graph.save(&path)?;
        Some(path)
    } else {
        None
    };

    let light_graph_path = config.dump_light.and_then(|size| {
        let path = output_dir.join(LIGHT_GRAPH_FILE);
        dump_light_graph(&graph, size, &path).then_some(path)
    });

    let duration_secs = start.elapsed().as_secs_f64();
    info!(format = %format, duration_secs, "Dump processed");

    Ok(RunReport {
        format,
        vertices: graph.vertex_count(),
        edges: graph.edge_count(),
        stats: data.stats,
        raw_dir,
        graph_path,
        light_graph_path,
        duration_secs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_select_both_formats() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.formats(), vec![DumpFormat::V10, DumpFormat::V8]);
        assert_eq!(config.data_path(), PathBuf::from(".data"));
    }

    #[test]
    fn no_format_is_a_config_error() {
        let config = PipelineConfig {
            v10: false,
            v8: false,
            ..PipelineConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NoFormatSelected));
    }

    #[test]
    fn zero_light_size_is_a_config_error() {
        let config = PipelineConfig {
            dump_light: Some(0),
            ..PipelineConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyLightGraph));
    }

    #[test]
    fn run_rejects_config_before_io() {
        let config = PipelineConfig {
            v10: false,
            v8: false,
            data_path: Some(PathBuf::from("/nonexistent/citenet/data")),
            ..PipelineConfig::default()
        };
        let err = run(&config).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ConfigError>(),
            Some(&ConfigError::NoFormatSelected)
        );
    }

    #[test]
    fn format_paths() {
        let base = Path::new("/data");
        assert_eq!(DumpFormat::V10.input_path(base), PathBuf::from("/data/dblp-ref"));
        assert_eq!(
            DumpFormat::V8.input_path(base),
            PathBuf::from("/data/citation-acm-v8.txt")
        );
        assert_eq!(DumpFormat::V8.output_dir(base), PathBuf::from("/data/v8"));
    }

    #[test]
    fn single_format_selection() {
        let config = PipelineConfig {
            v10: false,
            ..PipelineConfig::default()
        };
        assert_eq!(config.formats(), vec![DumpFormat::V8]);
    }
}
