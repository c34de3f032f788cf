use crate::models::Point;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::RwLock;

/// Errors that can occur with the point store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// On-disk document layout
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(default)]
    cafes: Vec<Point>,
}

/// JSON-file backed store of cafes
///
/// The whole collection is held in memory and the file is rewritten on
/// every mutation. A mutation only becomes visible once its file write has
/// succeeded. Readers get a snapshot clone, so ranking never holds the lock.
pub struct PointStore {
    path: PathBuf,
    points: RwLock<Vec<Point>>,
}

impl PointStore {
    /// Open a store, starting empty if the file does not exist yet
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        let points = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice::<StoreDocument>(&bytes)?.cafes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("Store file {} not found, starting empty", path.display());
                Vec::new()
            }
            Err(e) => {
                return Err(StoreError::IoError {
                    path: path.display().to_string(),
                    source: e,
                })
            }
        };

        tracing::debug!("Loaded {} cafes from {}", points.len(), path.display());

        Ok(Self {
            path,
            points: RwLock::new(points),
        })
    }

    /// Snapshot of every stored cafe
    pub async fn all(&self) -> Vec<Point> {
        self.points.read().await.clone()
    }

    /// Store a new cafe, assigning it a fresh id
    ///
    /// Ids are the current Unix time in milliseconds, bumped past the
    /// largest existing id when two inserts land in the same millisecond.
    pub async fn insert<F>(&self, build: F) -> Result<Point, StoreError>
    where
        F: FnOnce(i64) -> Point,
    {
        let mut points = self.points.write().await;

        let now = chrono::Utc::now().timestamp_millis();
        let max_id = points.iter().map(|p| p.id).max().unwrap_or(i64::MIN);
        let id = now.max(max_id.saturating_add(1));

        let point = build(id);
        let mut next = points.clone();
        next.push(point.clone());
        self.persist(&next).await?;
        *points = next;

        tracing::debug!("Stored cafe {} ({})", point.id, point.name);
        Ok(point)
    }

    /// Remove every cafe with the given id, returning whether any was removed
    pub async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let mut points = self.points.write().await;
        let next: Vec<Point> = points.iter().filter(|p| p.id != id).cloned().collect();
        let removed = next.len() != points.len();

        self.persist(&next).await?;
        *points = next;
        Ok(removed)
    }

    /// Replace cafes with matching ids and append the rest
    ///
    /// Returns the number of newly added cafes.
    pub async fn upsert_many(&self, incoming: Vec<Point>) -> Result<usize, StoreError> {
        let mut points = self.points.write().await;
        let mut next = points.clone();
        let mut inserted = 0;

        for point in incoming {
            match next.iter_mut().find(|p| p.id == point.id) {
                Some(existing) => *existing = point,
                None => {
                    next.push(point);
                    inserted += 1;
                }
            }
        }

        self.persist(&next).await?;
        *points = next;
        Ok(inserted)
    }

    async fn persist(&self, points: &[Point]) -> Result<(), StoreError> {
        let document = StoreDocument {
            cafes: points.to_vec(),
        };
        let json = serde_json::to_vec_pretty(&document)?;

        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| StoreError::IoError {
                path: self.path.display().to_string(),
                source: e,
            })
    }
}
