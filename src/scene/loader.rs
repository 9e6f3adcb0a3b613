//! Loader für Asset-Repräsentationen und ein Cache darüber.

use super::representation::Representation;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Fehler beim Laden einer Repräsentation. Wird geloggt, nie an Commands gemeldet.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Für das Asset existiert keine Repräsentation
    #[error("Keine Repräsentation für Asset '{0}'")]
    NotFound(String),
    /// Datei nicht lesbar
    #[error("Repräsentation nicht lesbar: {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Datei kein gültiges JSON
    #[error("Repräsentation fehlerhaft: {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Quelle für Asset-Repräsentationen.
pub trait RepresentationLoader {
    /// Lädt die Repräsentation für `asset_name`.
    fn load(&self, asset_name: &str) -> Result<Representation, LoadError>;
}

/// Loader mit fest hinterlegten Repräsentationen (Tests, eingebaute Assets).
#[derive(Debug, Clone, Default)]
pub struct InMemoryLoader {
    entries: HashMap<String, Representation>,
}

impl InMemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hinterlegt eine Repräsentation (Builder).
    pub fn with(mut self, asset_name: impl Into<String>, representation: Representation) -> Self {
        self.insert(asset_name, representation);
        self
    }

    pub fn insert(&mut self, asset_name: impl Into<String>, representation: Representation) {
        self.entries.insert(asset_name.into(), representation);
    }
}

impl RepresentationLoader for InMemoryLoader {
    fn load(&self, asset_name: &str) -> Result<Representation, LoadError> {
        self.entries
            .get(asset_name)
            .cloned()
            .ok_or_else(|| LoadError::NotFound(asset_name.to_string()))
    }
}

/// Lädt `<root>/<assetName>.json` (Asset-Familie als Unterverzeichnis).
#[derive(Debug, Clone)]
pub struct DirectoryLoader {
    root: PathBuf,
}

impl DirectoryLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Dateipfad der Repräsentation eines Assets.
    pub fn path_for(&self, asset_name: &str) -> PathBuf {
        self.root.join(format!("{asset_name}.json"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl RepresentationLoader for DirectoryLoader {
    fn load(&self, asset_name: &str) -> Result<Representation, LoadError> {
        let path = self.path_for(asset_name);
        let content = std::fs::read_to_string(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                LoadError::NotFound(asset_name.to_string())
            } else {
                LoadError::Io {
                    path: path.clone(),
                    source,
                }
            }
        })?;
        serde_json::from_str(&content).map_err(|source| LoadError::Parse { path, source })
    }
}

/// Cache erfolgreich geladener Repräsentationen.
///
/// Fehlschläge werden nicht gecacht; ein erneuter Request lädt erneut.
pub struct RepresentationCache {
    loader: Box<dyn RepresentationLoader>,
    entries: HashMap<String, Arc<Representation>>,
}

impl RepresentationCache {
    pub fn new(loader: Box<dyn RepresentationLoader>) -> Self {
        Self {
            loader,
            entries: HashMap::new(),
        }
    }

    /// Liefert die Repräsentation aus dem Cache oder lädt sie.
    pub fn get_or_load(&mut self, asset_name: &str) -> Result<Arc<Representation>, LoadError> {
        if let Some(hit) = self.entries.get(asset_name) {
            return Ok(Arc::clone(hit));
        }
        let representation = Arc::new(self.loader.load(asset_name)?);
        log::debug!(
            "Repräsentation geladen: {} ({} Elemente)",
            asset_name,
            representation.element_count()
        );
        self.entries
            .insert(asset_name.to_string(), Arc::clone(&representation));
        Ok(representation)
    }

    /// Bereits geladene Repräsentation (ohne Laden).
    pub fn get(&self, asset_name: &str) -> Option<Arc<Representation>> {
        self.entries.get(asset_name).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
