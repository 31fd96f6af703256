use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("missing shader files in {}: {}", dir.display(), missing.join(", "))]
    BackupInvalid { dir: PathBuf, missing: Vec<String> },
    #[error("shader backup is not usable, tweaks can not be applied")]
    ApplyDisabled,
    #[error("unknown shader file `{0}`")]
    UnknownShader(String),
    #[error("simulator shader directory is not configured")]
    NoShaderDir,
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
