//! Configuration errors

use std::path::PathBuf;

use thiserror::Error;
use trust_logic::GameConfigError;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("no agents configured")]
    NoAgents,

    #[error("{0} interactive agents configured, a session has one operator")]
    MultipleOperators(usize),

    #[error(transparent)]
    Game(#[from] GameConfigError),
}
