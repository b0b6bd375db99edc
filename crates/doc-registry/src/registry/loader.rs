use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use super::domain::InheritableField;
use super::seed::seed_records;
use super::service::RegistrySnapshot;
use super::store::{DocumentStore, LoadDiagnostic};

/// Error raised when the primary document source cannot be read.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} is not a JSON array of documents: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("document source unavailable: {0}")]
    Unavailable(String),
}

/// Backing store the registry pulls its raw records from.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    fn describe(&self) -> String;

    async fn fetch(&self) -> Result<Vec<Value>, SourceError>;
}

/// JSON array of document records on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DocumentSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<Vec<Value>, SourceError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| SourceError::Io {
                path: self.path.clone(),
                source,
            })?;
        serde_json::from_str(&raw).map_err(|source| SourceError::Parse {
            path: self.path.clone(),
            source,
        })
    }
}

/// Fixed in-memory records.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    records: Vec<Value>,
}

impl StaticSource {
    pub fn new(records: Vec<Value>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl DocumentSource for StaticSource {
    fn describe(&self) -> String {
        format!("{} in-memory records", self.records.len())
    }

    async fn fetch(&self) -> Result<Vec<Value>, SourceError> {
        Ok(self.records.clone())
    }
}

/// Which data the current snapshot was built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LoadMode {
    Unloaded,
    Primary,
    /// Built-in seed data after the primary source failed.
    Degraded { reason: String },
}

impl LoadMode {
    pub fn is_degraded(&self) -> bool {
        matches!(self, LoadMode::Degraded { .. })
    }
}

/// Summary of one load attempt.
#[derive(Debug, Clone, Serialize)]
pub struct LoadReport {
    pub generation: u64,
    pub mode: LoadMode,
    pub documents: usize,
    pub rejected: Vec<LoadDiagnostic>,
    /// A newer load started before this one finished; its result was discarded.
    pub superseded: bool,
}

/// Owner of the current document snapshot.
///
/// Readers take an `Arc` of the snapshot and never observe a half-built index. Each
/// [`load`](DocumentRegistry::load) builds its store off to the side and swaps it in only if
/// no newer load has started meanwhile.
pub struct DocumentRegistry<S> {
    source: S,
    inherited_fields: Arc<[InheritableField]>,
    current: RwLock<Arc<RegistrySnapshot>>,
    issued: AtomicU64,
}

impl<S> DocumentRegistry<S>
where
    S: DocumentSource,
{
    pub fn new(source: S, inherited_fields: Vec<InheritableField>) -> Self {
        let inherited_fields: Arc<[InheritableField]> = inherited_fields.into();
        let empty = RegistrySnapshot::new(
            DocumentStore::default(),
            LoadMode::Unloaded,
            0,
            inherited_fields.clone(),
            Vec::new(),
        );

        Self {
            source,
            inherited_fields,
            current: RwLock::new(Arc::new(empty)),
            issued: AtomicU64::new(0),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Consistent view of the documents as of the last committed load.
    pub fn snapshot(&self) -> Arc<RegistrySnapshot> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.snapshot().mode() != &LoadMode::Unloaded
    }

    /// Fetch from the source (falling back to the seed) and publish the result.
    pub async fn load(&self) -> LoadReport {
        let generation = self.issued.fetch_add(1, Ordering::AcqRel) + 1;

        let (records, mode) = match self.source.fetch().await {
            Ok(records) => (records, LoadMode::Primary),
            Err(err) => {
                warn!(
                    source = %self.source.describe(),
                    error = %err,
                    "document source unavailable; serving built-in seed"
                );
                (
                    seed_records(),
                    LoadMode::Degraded {
                        reason: err.to_string(),
                    },
                )
            }
        };

        let (store, rejected) = DocumentStore::load(records);
        let documents = store.len();

        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let superseded = self.issued.load(Ordering::Acquire) != generation;
        if superseded {
            info!(generation, "newer load started; discarding this result");
        } else {
            info!(
                generation,
                documents,
                rejected = rejected.len(),
                degraded = mode.is_degraded(),
                "document registry loaded"
            );
            *current = Arc::new(RegistrySnapshot::new(
                store,
                mode.clone(),
                generation,
                self.inherited_fields.clone(),
                rejected.clone(),
            ));
        }

        LoadReport {
            generation,
            mode,
            documents,
            rejected,
            superseded,
        }
    }
}
