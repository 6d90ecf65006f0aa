use thiserror::Error;

use crate::graph::CyclicDependency;
use crate::manifest::ManifestError;

#[derive(Debug, Error)]
pub enum OrdoError {
    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),
    #[error("{0}")]
    Cycle(#[from] CyclicDependency<String>),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, OrdoError>;
