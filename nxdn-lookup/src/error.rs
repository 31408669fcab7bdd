use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Why a load of the identifier source did not produce a usable table.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The source could not be opened or read. The previous table stays active.
    #[error("cannot open the NXDN Id lookup file - {}", path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The source was read but contained no valid records. The empty table is installed.
    #[error("no valid NXDN Ids in {}", path.display())]
    EmptyResult { path: PathBuf },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid lookup config: {0}")]
    Invalid(String),
}
