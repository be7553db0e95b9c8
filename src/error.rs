use thiserror::Error;

/// Problems with the requested pipeline options, reported before any I/O.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("v10 or v8 must be selected, otherwise there is no target data to preprocess")]
    NoFormatSelected,

    #[error("light graph size must be at least 1")]
    EmptyLightGraph,
}
