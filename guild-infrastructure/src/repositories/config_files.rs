use std::path::Path;

use async_trait::async_trait;
use tokio::fs;

use guild_domain::{ConfigRepository, GuildSettings};

use crate::utils::write_atomic;

pub struct ConfigFileRepository;

impl ConfigFileRepository {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConfigFileRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfigRepository for ConfigFileRepository {
    async fn load_guild_settings(&self, path: &str) -> anyhow::Result<Vec<GuildSettings>> {
        if !Path::new(path).exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(path).await?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        let settings: Vec<GuildSettings> = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    async fn save_guild_settings(&self, path: &str, settings: &[GuildSettings]) -> anyhow::Result<()> {
        let content = serde_yaml::to_string(settings)?;
        write_atomic(Path::new(path), content.as_bytes()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use guild_domain::ChallengeItemConfig;

    #[tokio::test]
    async fn test_settings_round_trip_through_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("guild_settings.yaml");
        let path = path.to_string_lossy().to_string();
        let repo = ConfigFileRepository::new();

        assert!(repo.load_guild_settings(&path).await.unwrap().is_empty());

        let mut settings = GuildSettings::new("ember", 6000);
        settings.challenge_items.push(ChallengeItemConfig {
            name: "Maple Log".to_string(),
            initial_quantity: 1340,
        });
        repo.save_guild_settings(&path, std::slice::from_ref(&settings)).await.unwrap();

        let loaded = repo.load_guild_settings(&path).await.unwrap();
        assert_eq!(loaded, vec![settings]);
    }

    #[tokio::test]
    async fn test_missing_threshold_uses_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("guild_settings.yaml");
        tokio::fs::write(&path, "- guild_id: ember\n").await.unwrap();

        let loaded = ConfigFileRepository::new()
            .load_guild_settings(&path.to_string_lossy())
            .await
            .unwrap();
        assert_eq!(loaded[0].donation_threshold, 5000);
        assert!(loaded[0].challenge_items.is_empty());
    }
}
