use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SkyviewError {
    #[error("Catalog alias {alias:?} is used by both {first:?} and {second:?}")]
    DuplicateAlias {
        alias: String,
        first: String,
        second: String,
    },
    #[error("Catalog entry {0:?} has an empty alias")]
    EmptyAlias(String),
    #[error("Catalog entry {0:?} has coordinates outside RA [0, 360] / Dec [-90, 90]")]
    InvalidCoordinates(String),
    #[error("Failed to read config {path}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config {path}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
    #[error("Unsupported config format")]
    ConfigFormat(#[from] common::FileExtensionError),
    #[error("Sky map widget failed to load: {0}")]
    WidgetBootstrap(String),
}

pub type Result<T> = std::result::Result<T, SkyviewError>;
