use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown axis `{0}`")]
    UnknownAxis(String),
    #[error("unknown metric `{0}`")]
    UnknownMetric(String),
    #[error("invalid configuration: {0}")]
    Configuration(String),
    #[error("missing data file {}", path.display())]
    MissingData { path: PathBuf },
    #[error("{}:{line}: {reason}", path.display())]
    Parse {
        path: PathBuf,
        line: u64,
        reason: String,
    },
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to render figure: {0}")]
    Render(String),
}

impl Error {
    /// Returns true if the error was caused by the plot request itself (and
    /// thus was detected before reading any data).
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::UnknownAxis(_)
                | Self::UnknownMetric(_)
                | Self::Configuration(_)
        )
    }
}
