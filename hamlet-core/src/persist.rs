//! Save games and the autosave gate.
//!
//! The controller snapshots the whole [`GameState`] through the
//! [`PersistenceGate`] before every redraw, so the last screen a player saw
//! always matches what is on disk. Autosave is best effort: a failed write is
//! logged and reported, never fatal.

use crate::location::LocationId;
use crate::world::GameState;
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

/// Errors from persistence operations.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

/// Current save file version.
pub const SAVE_VERSION: u32 = 1;

// ============================================================================
// Save format
// ============================================================================

/// A saved game with all state needed to resume play.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedGame {
    /// Save format version for compatibility checking.
    pub version: u32,

    /// When the save was created.
    pub saved_at: String,

    /// The complete game state.
    pub state: GameState,

    /// Metadata about the save.
    pub metadata: SaveMetadata,
}

/// Metadata about the save file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveMetadata {
    /// Player character name.
    pub player_name: String,

    /// Location the player was in.
    pub location: LocationId,

    /// Accepted turns so far.
    pub turn_count: u64,

    /// In-game day.
    pub day: u32,

    /// When the save was created (duplicated from parent for peek access).
    #[serde(default)]
    pub saved_at: String,
}

impl SavedGame {
    pub fn new(state: GameState) -> Self {
        let saved_at = timestamp_now();
        let metadata = SaveMetadata {
            player_name: state.player.name.clone(),
            location: state.cursor.current_location(),
            turn_count: state.cursor.turn_count(),
            day: state.world.day,
            saved_at: saved_at.clone(),
        };

        Self {
            version: SAVE_VERSION,
            saved_at,
            state,
            metadata,
        }
    }

    /// Save to a JSON file.
    pub async fn save_json(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).await?;
        Ok(())
    }

    /// Load from a JSON file.
    pub async fn load_json(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let content = fs::read_to_string(path).await?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, PersistError> {
        let saved: Self = serde_json::from_str(content)?;
        check_version(saved.version)?;
        Ok(saved)
    }

    /// Read a save's metadata without deserializing the full state.
    pub async fn peek_metadata(path: impl AsRef<Path>) -> Result<SaveMetadata, PersistError> {
        let content = fs::read_to_string(path).await?;

        #[derive(Deserialize)]
        struct Partial {
            version: u32,
            metadata: SaveMetadata,
        }

        let partial: Partial = serde_json::from_str(&content)?;
        check_version(partial.version)?;
        Ok(partial.metadata)
    }
}

fn check_version(found: u32) -> Result<(), PersistError> {
    if found != SAVE_VERSION {
        return Err(PersistError::VersionMismatch {
            expected: SAVE_VERSION,
            found,
        });
    }
    Ok(())
}

/// Information about a save file.
#[derive(Debug, Clone)]
pub struct SaveInfo {
    /// Path to the save file.
    pub path: PathBuf,

    /// Save metadata.
    pub metadata: SaveMetadata,
}

/// List all readable saves in a directory, sorted by player name.
///
/// A missing directory is created and yields an empty list.
pub async fn list_saves(dir: impl AsRef<Path>) -> Result<Vec<SaveInfo>, PersistError> {
    let mut saves = Vec::new();

    let dir_path = dir.as_ref();
    if !dir_path.exists() {
        fs::create_dir_all(dir_path).await?;
        return Ok(saves);
    }

    let mut entries = fs::read_dir(dir_path).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().map(|e| e == "json").unwrap_or(false) {
            if let Ok(metadata) = SavedGame::peek_metadata(&path).await {
                saves.push(SaveInfo { path, metadata });
            }
        }
    }

    saves.sort_by(|a, b| a.metadata.player_name.cmp(&b.metadata.player_name));
    Ok(saves)
}

/// Autosave file for a player.
pub fn auto_save_path(base_dir: impl AsRef<Path>, player_name: &str) -> PathBuf {
    let sanitized = player_name
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect::<String>();
    base_dir.as_ref().join(format!("{sanitized}_autosave.json"))
}

/// Seconds since the Unix epoch, as a string.
fn timestamp_now() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}", now.as_secs())
}

// ============================================================================
// Autosave
// ============================================================================

/// Durable storage for game snapshots.
pub trait Persistence: Send {
    fn persist(&mut self, state: &GameState) -> Result<(), PersistError>;
}

/// Writes each snapshot as a [`SavedGame`] JSON file, atomically.
#[derive(Debug, Clone)]
pub struct JsonSaveStore {
    path: PathBuf,
}

impl JsonSaveStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Persistence for JsonSaveStore {
    fn persist(&mut self, state: &GameState) -> Result<(), PersistError> {
        let saved = SavedGame::new(state.clone());
        let content = serde_json::to_string_pretty(&saved)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        // The previous save stays intact until the rename.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Best-effort autosave in front of a [`Persistence`] backend.
pub struct PersistenceGate {
    store: Box<dyn Persistence>,
    failures: u32,
}

impl PersistenceGate {
    pub fn new(store: impl Persistence + 'static) -> Self {
        Self {
            store: Box::new(store),
            failures: 0,
        }
    }

    /// Snapshot `state`. Returns false (after logging) if the write failed.
    pub fn snapshot(&mut self, state: &GameState) -> bool {
        match self.store.persist(state) {
            Ok(()) => true,
            Err(e) => {
                self.failures += 1;
                warn!("Autosave failed ({} so far): {e}", self.failures);
                false
            }
        }
    }

    /// Failed snapshots since the gate was created.
    pub fn failures(&self) -> u32 {
        self.failures
    }
}
