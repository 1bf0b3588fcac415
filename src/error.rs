use std::path::PathBuf;

/// Errors surfaced by dataset loading, configuration and employee lookup.
///
/// The analysis itself never fails: degenerate series are skipped, not reported.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Matricule {0} non trouvé.")]
    EmployeeNotFound(String),
    #[error("dataset is missing required column `{0}`")]
    MissingColumn(&'static str),
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse dataset: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid config: {0}")]
    Config(String),
    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
    #[error("could not determine home directory")]
    HomeDir,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
