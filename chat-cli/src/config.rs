//! Profile management for chat-cli.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Backend profile stored locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    /// Backend base URL.
    pub api_base: String,
    /// Acting user id.
    pub user_id: String,
    /// Human-readable display name.
    pub display_name: String,
    /// When the profile was created (unix seconds).
    pub created_at: u64,
}

impl ProfileConfig {
    /// Create a new profile.
    pub fn new(api_base: &str, user_id: &str, display_name: &str) -> Self {
        Self {
            api_base: api_base.to_string(),
            user_id: user_id.to_string(),
            display_name: display_name.to_string(),
            created_at: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_secs(),
        }
    }

    /// Load the profile from a directory.
    pub async fn load(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join("profile.json");
        let contents = tokio::fs::read_to_string(&path)
            .await
            .context("Profile not initialized. Run 'chat-cli init' first.")?;
        serde_json::from_str(&contents).context("Invalid profile")
    }

    /// Save the profile to a directory.
    pub async fn save(&self, data_dir: &Path) -> Result<()> {
        let path = data_dir.join("profile.json");
        let contents = serde_json::to_string_pretty(self)?;
        tokio::fs::write(&path, contents)
            .await
            .context("Failed to save profile")?;
        Ok(())
    }

    /// Check if a profile exists.
    pub async fn exists(data_dir: &Path) -> bool {
        data_dir.join("profile.json").exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn profile_roundtrip() {
        let dir = tempdir().unwrap();
        let profile = ProfileConfig::new("https://api.example", "u1", "Alice");
        profile.save(dir.path()).await.unwrap();

        assert!(ProfileConfig::exists(dir.path()).await);
        let loaded = ProfileConfig::load(dir.path()).await.unwrap();
        assert_eq!(loaded.api_base, "https://api.example");
        assert_eq!(loaded.user_id, "u1");
        assert_eq!(loaded.display_name, "Alice");
    }

    #[tokio::test]
    async fn load_without_init_fails_with_hint() {
        let dir = tempdir().unwrap();
        let err = ProfileConfig::load(dir.path()).await.unwrap_err();
        assert!(err.to_string().contains("chat-cli init"));
    }
}
