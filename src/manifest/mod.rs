use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::graph::{DependencyGraph, NodeId};

pub const MANIFEST_FILE: &str = "ordo.toml";

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("manifest not found")]
    ManifestNotFound,
    #[error("manifest file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse manifest at {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("duplicate plugin '{0}'")]
    DuplicatePlugin(String),
    #[error("plugin '{plugin}' depends on unknown plugin '{dependency}'")]
    UnknownDependency { plugin: String, dependency: String },
}

pub type Result<T> = std::result::Result<T, ManifestError>;

// `[[plugin]]` array-of-tables, so declaration order survives parsing
// and the resolver's insertion-order tie-break is reproducible.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    #[serde(default, rename = "plugin")]
    pub plugins: Vec<PluginEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PluginEntry {
    pub name: String,
    #[serde(default)]
    pub depends_on: Vec<String>,
}

pub fn resolve_manifest(
    start: impl AsRef<Path>,
    override_path: Option<PathBuf>,
) -> Result<PathBuf> {
    if let Some(path) = override_path {
        return Ok(path);
    }

    if let Ok(path) = env::var("ORDO_MANIFEST") {
        return Ok(PathBuf::from(path));
    }

    for ancestor in start.as_ref().ancestors() {
        let candidate = ancestor.join(MANIFEST_FILE);
        if candidate.is_file() {
            return Ok(candidate);
        }
    }

    Err(ManifestError::ManifestNotFound)
}

pub fn load_manifest(path: &Path) -> Result<Manifest> {
    if !path.is_file() {
        return Err(ManifestError::FileNotFound(path.to_path_buf()));
    }

    let contents = std::fs::read_to_string(path)?;
    toml::from_str(&contents).map_err(|source| ManifestError::Toml {
        path: path.to_path_buf(),
        source,
    })
}

// Validates names up front: the graph core treats a dangling reference
// as a caller bug, so it must never see one from here.
pub fn build_graph(manifest: &Manifest) -> Result<DependencyGraph<String>> {
    let mut graph = DependencyGraph::new();
    let mut handles: HashMap<&str, NodeId> = HashMap::new();

    for entry in &manifest.plugins {
        if handles.contains_key(entry.name.as_str()) {
            return Err(ManifestError::DuplicatePlugin(entry.name.clone()));
        }
        let handle = graph.add_node(entry.name.clone());
        handles.insert(entry.name.as_str(), handle);
    }

    for entry in &manifest.plugins {
        let from = handles[entry.name.as_str()];
        for dependency in &entry.depends_on {
            let to = handles.get(dependency.as_str()).copied().ok_or_else(|| {
                ManifestError::UnknownDependency {
                    plugin: entry.name.clone(),
                    dependency: dependency.clone(),
                }
            })?;
            graph.add_edge(from, to);
        }
    }

    Ok(graph)
}
