//! Retrieval pre-filter over the profile corpus.
//!
//! The corpus is a directory of `{profile_id}.txt` documents. [`CorpusIndex`] owns the
//! current index handle: a rebuild produces a fresh immutable handle which is swapped
//! in once ready, and the previous one is released when its last reader lets go.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use mingle_core::{MingleError, Profile};
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

const VECTOR_DIM: usize = 256;

/// An immutable, queryable index.
pub trait IndexHandle: Send + Sync {
    /// Source paths of the best matching documents, most similar first.
    fn query(&self, text: &str, top_k: usize) -> Result<Vec<PathBuf>, MingleError>;

    fn document_count(&self) -> usize;
}

#[async_trait]
pub trait IndexBuilder: Send + Sync {
    async fn build(&self, corpus_dir: &Path) -> Result<Arc<dyn IndexHandle>, MingleError>;
}

#[async_trait]
pub trait Prefilter: Send + Sync {
    /// Candidate profile ids ordered by similarity. Empty when nothing is indexed.
    async fn candidate_ids(&self, query: &str, top_k: usize) -> Result<Vec<String>, MingleError>;
}

pub struct CorpusIndex {
    corpus_dir: PathBuf,
    builder: Box<dyn IndexBuilder>,
    current: RwLock<Option<Arc<dyn IndexHandle>>>,
    rebuild_lock: Mutex<()>,
}

impl CorpusIndex {
    pub fn new(corpus_dir: impl Into<PathBuf>, builder: Box<dyn IndexBuilder>) -> Self {
        Self {
            corpus_dir: corpus_dir.into(),
            builder,
            current: RwLock::new(None),
            rebuild_lock: Mutex::new(()),
        }
    }

    pub fn corpus_dir(&self) -> &Path {
        &self.corpus_dir
    }

    pub fn is_loaded(&self) -> bool {
        self.handle().is_some()
    }

    fn handle(&self) -> Option<Arc<dyn IndexHandle>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Builds a new index from the corpus directory and swaps it in. On failure the
    /// previous index stays in service.
    pub async fn rebuild(&self) -> Result<usize, MingleError> {
        let _guard = self.rebuild_lock.lock().await;

        tokio::fs::create_dir_all(&self.corpus_dir).await?;
        let fresh = match self.builder.build(&self.corpus_dir).await {
            Ok(handle) => handle,
            Err(e) => {
                warn!(
                    "RETRIEVAL: Rebuild of {} failed, keeping previous index: {}",
                    self.corpus_dir.display(),
                    e
                );
                return Err(e);
            }
        };

        let documents = fresh.document_count();
        let previous = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(fresh);
        drop(previous);

        info!("RETRIEVAL: Index ready with {} document(s)", documents);
        Ok(documents)
    }

    /// Writes (or overwrites) the corpus document for `profile` and rebuilds the index.
    /// The document is kept even when the rebuild fails.
    pub async fn sync_profile(&self, profile: &Profile) -> Result<PathBuf, MingleError> {
        let id = profile.id.trim();
        if id.is_empty() || id == "." || id == ".." || id.contains(['/', '\\']) {
            return Err(MingleError::ParseError(format!("invalid profile id '{}'", profile.id)));
        }

        tokio::fs::create_dir_all(&self.corpus_dir).await?;
        let path = self.corpus_dir.join(format!("{id}.txt"));
        tokio::fs::write(&path, corpus_document(profile)).await?;
        info!("RETRIEVAL: Wrote {}", path.display());

        if let Err(e) = self.rebuild().await {
            warn!("RETRIEVAL: Profile {} saved but index not refreshed: {}", id, e);
        }
        Ok(path)
    }
}

#[async_trait]
impl Prefilter for CorpusIndex {
    async fn candidate_ids(&self, query: &str, top_k: usize) -> Result<Vec<String>, MingleError> {
        let Some(handle) = self.handle() else {
            debug!("RETRIEVAL: No index loaded");
            return Ok(Vec::new());
        };
        let paths = handle.query(query, top_k)?;
        Ok(ids_from_paths(&paths))
    }
}

pub fn corpus_document(profile: &Profile) -> String {
    format!("{}\nLinkedIn: {}\n", profile.to_text(), profile.linkedin_url)
}

/// File stems in hit order, first occurrence wins.
fn ids_from_paths(paths: &[PathBuf]) -> Vec<String> {
    let mut seen = HashSet::new();
    paths
        .iter()
        .filter_map(|p| p.file_stem())
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|id| seen.insert(id.clone()))
        .collect()
}

pub fn embed_text(text: &str) -> Vec<f32> {
    let mut vector = vec![0.0_f32; VECTOR_DIM];

    for token in text
        .split(|ch: char| !ch.is_alphanumeric() && ch != '_')
        .filter(|token| token.len() >= 3)
    {
        let token = token.to_lowercase();
        let digest = Sha256::digest(token.as_bytes());
        let idx = u16::from_le_bytes([digest[0], digest[1]]) as usize % VECTOR_DIM;
        let sign = if digest[2] % 2 == 0 { 1.0 } else { -1.0 };
        vector[idx] += sign;
    }

    let norm = vector.iter().map(|value| value * value).sum::<f32>().sqrt();
    if norm > 0.0 {
        for value in &mut vector {
            *value /= norm;
        }
    }

    vector
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Hashed bag-of-words index over the corpus `.txt` files.
pub struct HashedIndex {
    documents: Vec<(PathBuf, Vec<f32>)>,
}

impl IndexHandle for HashedIndex {
    fn query(&self, text: &str, top_k: usize) -> Result<Vec<PathBuf>, MingleError> {
        let needle = embed_text(text);
        let mut scored: Vec<(f32, &PathBuf)> = self
            .documents
            .iter()
            .map(|(path, vector)| (cosine(&needle, vector), path))
            .filter(|(score, _)| *score > 0.0)
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        Ok(scored.into_iter().take(top_k).map(|(_, path)| path.clone()).collect())
    }

    fn document_count(&self) -> usize {
        self.documents.len()
    }
}

impl Drop for HashedIndex {
    fn drop(&mut self) {
        debug!("RETRIEVAL: Disposing index with {} document(s)", self.documents.len());
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HashedIndexBuilder;

#[async_trait]
impl IndexBuilder for HashedIndexBuilder {
    async fn build(&self, corpus_dir: &Path) -> Result<Arc<dyn IndexHandle>, MingleError> {
        let mut entries = tokio::fs::read_dir(corpus_dir)
            .await
            .map_err(|e| MingleError::Retrieval(format!("{}: {}", corpus_dir.display(), e)))?;

        let mut paths = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "txt") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut documents = Vec::with_capacity(paths.len());
        for path in paths {
            let text = tokio::fs::read_to_string(&path).await?;
            documents.push((path, embed_text(&text)));
        }

        Ok(Arc::new(HashedIndex { documents }))
    }
}
