//! JSON file storage implementation.
//!
//! Stores each goal as a JSON file under the data directory and keeps small
//! per-object meta markers (version + updatedAt) next to them.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use goalboard_core::{MacroGoal, MacroGoalId, MicroGoal, MicroGoalId};
use super::{Storage, Result};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, warn};

const MACRO_GOALS: &str = "macro_goals";
const MICRO_GOALS: &str = "micro_goals";

/// File-based JSON storage backend.
pub struct JsonStorage {
    root: PathBuf,
    pending: Arc<Mutex<bool>>,
}

impl JsonStorage {
    /// Open storage rooted at `root`, creating the data and meta
    /// directories if they are missing.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        fs::create_dir_all(root.join(MACRO_GOALS)).await?;
        fs::create_dir_all(root.join(MICRO_GOALS)).await?;

        fs::create_dir_all(root.join("meta").join(MACRO_GOALS)).await?;
        fs::create_dir_all(root.join("meta").join(MICRO_GOALS)).await?;

        debug!(root = %root.display(), "Opened JSON storage");

        Ok(Self {
            root,
            pending: Arc::new(Mutex::new(false)),
        })
    }

    /// Whether writes happened since the last commit or rollback.
    pub async fn has_pending_changes(&self) -> bool {
        *self.pending.lock().await
    }

    fn macro_goal_path(&self, id: MacroGoalId) -> PathBuf {
        self.root.join(MACRO_GOALS).join(format!("{}.json", id))
    }

    fn micro_goal_path(&self, id: MicroGoalId) -> PathBuf {
        self.root.join(MICRO_GOALS).join(format!("{}.json", id))
    }

    fn meta_path(&self, kind: &str, id: &str) -> PathBuf {
        self.root.join("meta").join(kind).join(format!("{}.meta.json", id))
    }

    async fn set_pending(&self) {
        *self.pending.lock().await = true;
    }

    /// Read and increment per-object version, return new version.
    async fn bump_version(&self, kind: &str, id: &str) -> Result<u64> {
        let path = self.meta_path(kind, id);
        let mut version = 0u64;
        if let Ok(s) = fs::read_to_string(&path).await {
            if let Ok(json) = serde_json::from_str::<serde_json::Value>(&s) {
                if let Some(v) = json.get("version").and_then(|v| v.as_u64()) {
                    version = v;
                }
            }
        }
        version += 1;
        let meta = serde_json::json!({"version": version, "updatedAt": chrono::Utc::now()});
        fs::write(&path, serde_json::to_string_pretty(&meta)?.as_bytes()).await?;
        Ok(version)
    }

    async fn remove(&self, kind: &str, path: &Path, id: &str) -> Result<()> {
        remove_if_exists(path).await?;
        remove_if_exists(&self.meta_path(kind, id)).await?;
        self.set_pending().await;
        Ok(())
    }
}

#[async_trait::async_trait]
impl Storage for JsonStorage {
    async fn save_macro_goal(&mut self, goal: &MacroGoal) -> Result<()> {
        let path = self.macro_goal_path(goal.id);
        let json = serde_json::to_string_pretty(goal)?;
        fs::write(&path, json.as_bytes()).await?;

        let version = self.bump_version(MACRO_GOALS, &goal.id.to_string()).await?;
        debug!(id = %goal.id, version, "Saved macro goal");

        self.set_pending().await;
        Ok(())
    }

    async fn load_macro_goal(&self, id: MacroGoalId) -> Result<Option<MacroGoal>> {
        read_json(&self.macro_goal_path(id)).await
    }

    async fn list_macro_goals(&self) -> Result<Vec<MacroGoal>> {
        let mut goals: Vec<MacroGoal> = list_dir(&self.root.join(MACRO_GOALS)).await?;
        goals.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(goals)
    }

    async fn delete_macro_goal(&mut self, id: MacroGoalId) -> Result<()> {
        let path = self.macro_goal_path(id);
        self.remove(MACRO_GOALS, &path, &id.to_string()).await
    }

    async fn save_micro_goal(&mut self, goal: &MicroGoal) -> Result<()> {
        let path = self.micro_goal_path(goal.id);
        let json = serde_json::to_string_pretty(goal)?;
        fs::write(&path, json.as_bytes()).await?;

        let version = self.bump_version(MICRO_GOALS, &goal.id.to_string()).await?;
        debug!(id = %goal.id, version, "Saved micro goal");

        self.set_pending().await;
        Ok(())
    }

    async fn load_micro_goal(&self, id: MicroGoalId) -> Result<Option<MicroGoal>> {
        read_json(&self.micro_goal_path(id)).await
    }

    async fn list_micro_goals(&self) -> Result<Vec<MicroGoal>> {
        let mut goals: Vec<MicroGoal> = list_dir(&self.root.join(MICRO_GOALS)).await?;
        goals.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(goals)
    }

    async fn delete_micro_goal(&mut self, id: MicroGoalId) -> Result<()> {
        let path = self.micro_goal_path(id);
        self.remove(MICRO_GOALS, &path, &id.to_string()).await
    }

    async fn commit(&mut self, message: &str) -> Result<()> {
        // No VCS behind this store; commit just clears pending state.
        debug!(commit_message = message, "Commit");
        *self.pending.lock().await = false;
        Ok(())
    }

    async fn rollback(&mut self) -> Result<()> {
        *self.pending.lock().await = false;
        Ok(())
    }
}

async fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match fs::read_to_string(path).await {
        Ok(json) => {
            let value = serde_json::from_str(&json)?;
            Ok(Some(value))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn list_dir<T: serde::de::DeserializeOwned>(dir: &Path) -> Result<Vec<T>> {
    let mut items = Vec::new();
    let mut rd = fs::read_dir(dir).await?;
    while let Some(entry) = rd.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }
        match read_json(&path).await {
            Ok(Some(item)) => items.push(item),
            Ok(None) => {}
            Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable record"),
        }
    }
    Ok(items)
}
