//! State kept between `flatswaps` runs.
//!
//! Stored as JSON next to the database. A missing file is the same as a
//! fresh state; a corrupt one is an error so progress is never silently
//! dropped.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use swap_core::checklist::ChecklistProgress;
use swap_core::samples::CURRENT_USER_ID;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppState {
    /// User the commands act for.
    pub user_id: String,
    /// Email of the last account created with `signup`.
    pub email: Option<String>,
    pub checklist: ChecklistProgress,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            user_id: CURRENT_USER_ID.to_string(),
            email: None,
            checklist: ChecklistProgress::new(),
        }
    }
}

impl AppState {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no saved state, starting fresh");
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read state file '{}'", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("Corrupt state file '{}'", path.display()))
    }

    pub fn save(
        &self,
        path: &Path,
    ) -> Result<()> {
        let text = serde_json::to_string_pretty(self).context("Failed to serialize state")?;
        std::fs::write(path, text)
            .with_context(|| format!("Failed to write state file '{}'", path.display()))
    }
}
