use formats::WorldError;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum GlobeError {
    #[error("world data: {0}")]
    World(#[from] WorldError),
    #[error("config: {0}")]
    Config(#[from] ConfigError),
    #[error("unknown mode {0:?}, expected \"auto\" or \"manual\"")]
    UnknownMode(String),
    #[error("country index {index} out of range ({count} countries)")]
    CountryIndex { index: usize, count: usize },
}
