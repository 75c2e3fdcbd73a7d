use crate::picker::SavedPicker;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct State {
    pub version: String,
    /// Unreadable picker payloads load as `None` instead of failing the file.
    #[serde(default, deserialize_with = "lenient_picker")]
    pub picker: Option<SavedPicker>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for State {
    fn default() -> Self {
        Self {
            version: "1.0.0".to_string(),
            picker: None,
            updated_at: None,
        }
    }
}

fn lenient_picker<'de, D>(deserializer: D) -> Result<Option<SavedPicker>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<serde_json::Value>::deserialize(deserializer)? else {
        return Ok(None);
    };

    match serde_json::from_value(raw) {
        Ok(picker) => Ok(Some(picker)),
        Err(e) => {
            tracing::warn!(error = %e, "discarding unreadable saved picker");
            Ok(None)
        }
    }
}

impl State {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).context("Failed to read state file")?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_json::from_str(&content).context("Failed to parse state JSON")
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self).context("Failed to serialize state")?;

        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write to temp file then rename so readers never see half a file
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, content)?;
        fs::rename(&temp_path, path)?;

        Ok(())
    }

    pub fn store_picker(&mut self, picker: SavedPicker) {
        self.picker = Some(picker);
        self.updated_at = Some(Utc::now());
    }
}

/// The on-disk state file together with the lock file guarding it.
#[derive(Debug, Clone)]
pub struct StateFile {
    lock_path: PathBuf,
    state_path: PathBuf,
}

impl StateFile {
    pub fn new(lock_path: impl Into<PathBuf>, state_path: impl Into<PathBuf>) -> Self {
        Self {
            lock_path: lock_path.into(),
            state_path: state_path.into(),
        }
    }

    /// `state.lock` and `state.json` inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join("state.lock"), dir.join("state.json"))
    }

    pub fn state_path(&self) -> &Path {
        &self.state_path
    }

    /// Read without locking. Used by read-only commands.
    pub fn read(&self) -> Result<State> {
        State::load(&self.state_path)
    }

    /// Run `f` on the state while holding the exclusive lock. The state is
    /// written back only when `f` succeeds.
    pub fn update<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut State) -> Result<R>,
    {
        let lock = self.acquire()?;

        let mut state = State::load(&self.state_path)?;
        let result = f(&mut state);
        if result.is_ok() {
            state.save(&self.state_path)?;
        }

        lock.unlock().context("Failed to unlock")?;
        result
    }

    fn acquire(&self) -> Result<File> {
        if let Some(parent) = self.lock_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.lock_path)
            .with_context(|| format!("Failed to open lock file {}", self.lock_path.display()))?;

        file.lock_exclusive().context("Failed to acquire lock")?;
        Ok(file)
    }
}
