//! File-backed storage for members, daily records and the price cache.
//!
//! Layout under `data_dir`:
//!
//! ```text
//! price_cache.json
//! <guild>/members.json
//! <guild>/logs/<YYYY-MM-DD>.json
//! ```
//!
//! Writes go through one async mutex so read-modify-write cycles from
//! concurrent requests cannot interleave.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

use guild_domain::{
    CachedPrice, DailyActivityRecord, DailyLogRepository, ItemKey, Member, MemberRepository,
    PriceCacheRepository,
};

use crate::utils::write_atomic;

pub struct JsonFileStore {
    data_dir: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    fn guild_dir(&self, guild_id: &str) -> PathBuf {
        self.data_dir.join(safe_segment(guild_id))
    }

    fn members_path(&self, guild_id: &str) -> PathBuf {
        self.guild_dir(guild_id).join("members.json")
    }

    fn logs_dir(&self, guild_id: &str) -> PathBuf {
        self.guild_dir(guild_id).join("logs")
    }

    fn log_path(&self, guild_id: &str, date: &str) -> PathBuf {
        self.logs_dir(guild_id).join(format!("{}.json", safe_segment(date)))
    }

    fn price_cache_path(&self) -> PathBuf {
        self.data_dir.join("price_cache.json")
    }
}

/// Keeps ids usable as a single path component.
fn safe_segment(value: &str) -> String {
    let cleaned: String = value
        .trim()
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
                ch
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "_".to_string()
    } else {
        cleaned
    }
}

async fn read_json<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Ok(T::default());
    }
    let content = fs::read(path).await?;
    if content.is_empty() {
        return Ok(T::default());
    }
    Ok(serde_json::from_slice(&content)?)
}

async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let content = serde_json::to_vec_pretty(value)?;
    write_atomic(path, &content).await
}

#[async_trait]
impl MemberRepository for JsonFileStore {
    async fn list_members(&self, guild_id: &str) -> Result<Vec<Member>> {
        read_json(&self.members_path(guild_id)).await
    }

    async fn upsert_members(&self, members: &[Member]) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut by_guild: HashMap<&str, Vec<&Member>> = HashMap::new();
        for member in members {
            by_guild.entry(member.guild_id.as_str()).or_default().push(member);
        }
        for (guild_id, updates) in by_guild {
            let path = self.members_path(guild_id);
            let mut roster: Vec<Member> = read_json(&path).await?;
            for update in updates {
                match roster.iter_mut().find(|m| m.ign == update.ign) {
                    Some(existing) => *existing = update.clone(),
                    None => roster.push(update.clone()),
                }
            }
            roster.sort_by(|a, b| a.ign.to_lowercase().cmp(&b.ign.to_lowercase()));
            write_json(&path, &roster).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl DailyLogRepository for JsonFileStore {
    async fn upsert_records(&self, records: &[DailyActivityRecord]) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut by_file: HashMap<PathBuf, Vec<&DailyActivityRecord>> = HashMap::new();
        for record in records {
            by_file
                .entry(self.log_path(&record.guild_id, &record.date))
                .or_default()
                .push(record);
        }
        for (path, updates) in by_file {
            let mut stored: Vec<DailyActivityRecord> = read_json(&path).await?;
            for update in updates {
                match stored.iter_mut().find(|r| r.ign == update.ign) {
                    Some(existing) => *existing = update.clone(),
                    None => stored.push(update.clone()),
                }
            }
            debug!("writing {} records to {}", stored.len(), path.display());
            write_json(&path, &stored).await?;
        }
        Ok(())
    }

    async fn get_record(&self, guild_id: &str, date: &str, ign: &str) -> Result<Option<DailyActivityRecord>> {
        let stored: Vec<DailyActivityRecord> = read_json(&self.log_path(guild_id, date)).await?;
        let wanted = ign.trim();
        Ok(stored.into_iter().find(|r| r.ign == wanted))
    }

    async fn list_records(&self, guild_id: &str, from: &str, to: &str) -> Result<Vec<DailyActivityRecord>> {
        let dir = self.logs_dir(guild_id);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut dates = Vec::new();
        let mut entries = fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().to_string();
            if let Some(date) = name.strip_suffix(".json") {
                if date >= from && date <= to {
                    dates.push(date.to_string());
                }
            }
        }
        dates.sort();

        let mut records = Vec::new();
        for date in dates {
            let mut day: Vec<DailyActivityRecord> = read_json(&self.log_path(guild_id, &date)).await?;
            records.append(&mut day);
        }
        Ok(records)
    }

    async fn ping(&self) -> Result<()> {
        fs::create_dir_all(&self.data_dir).await?;
        let metadata = fs::metadata(&self.data_dir).await?;
        if metadata.permissions().readonly() {
            anyhow::bail!("data_dir {} is read-only", self.data_dir.display());
        }
        Ok(())
    }
}

#[async_trait]
impl PriceCacheRepository for JsonFileStore {
    async fn get_prices(&self, keys: &[ItemKey]) -> Result<HashMap<ItemKey, CachedPrice>> {
        let cache: HashMap<String, CachedPrice> = read_json(&self.price_cache_path()).await?;
        Ok(keys
            .iter()
            .filter_map(|key| cache.get(key.as_str()).map(|price| (key.clone(), price.clone())))
            .collect())
    }

    async fn put_prices(&self, prices: &[CachedPrice]) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let path = self.price_cache_path();
        let mut cache: HashMap<String, CachedPrice> = read_json(&path).await?;
        for price in prices {
            cache.insert(ItemKey::from_name(&price.item_key).0, price.clone());
        }
        write_json(&path, &cache).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ign: &str, date: &str, total_gold: i64) -> DailyActivityRecord {
        DailyActivityRecord {
            id: format!("{}-{}", ign, date),
            guild_id: "ember".to_string(),
            ign: ign.to_string(),
            date: date.to_string(),
            raids: 1,
            challenge_gold: total_gold,
            deposits_gold: 0,
            total_gold,
            donations: Vec::new(),
            meets_gold_requirement: total_gold >= 5000,
            meets_item_requirement: false,
            manual_override: None,
            met_requirement: total_gold >= 5000,
            updated_at: 0,
        }
    }

    #[tokio::test]
    async fn test_records_upsert_by_exact_ign() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());

        store
            .upsert_records(&[record("Alice", "2024-03-09", 100), record("Bob", "2024-03-09", 200)])
            .await
            .unwrap();
        store.upsert_records(&[record("Alice", "2024-03-09", 9000)]).await.unwrap();
        store.upsert_records(&[record("alice", "2024-03-09", 50)]).await.unwrap();

        let alice = store.get_record("ember", "2024-03-09", " Alice ").await.unwrap().unwrap();
        assert_eq!(alice.total_gold, 9000);
        let lower = store.get_record("ember", "2024-03-09", "alice").await.unwrap().unwrap();
        assert_eq!(lower.total_gold, 50);
        assert!(store.get_record("ember", "2024-03-09", "ALICE").await.unwrap().is_none());
        let day = store.list_records("ember", "2024-03-09", "2024-03-09").await.unwrap();
        assert_eq!(day.len(), 3);
    }

    #[tokio::test]
    async fn test_list_records_respects_range() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        store
            .upsert_records(&[
                record("Alice", "2024-03-01", 1),
                record("Alice", "2024-03-05", 2),
                record("Alice", "2024-03-10", 3),
            ])
            .await
            .unwrap();

        let records = store.list_records("ember", "2024-03-02", "2024-03-10").await.unwrap();
        let dates: Vec<&str> = records.iter().map(|r| r.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-03-05", "2024-03-10"]);
        assert!(store.list_records("other", "2024-01-01", "2024-12-31").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_members_and_prices_persist() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());

        let mut ann = Member::new("ember", "Ann", "2024-03-01");
        store.upsert_members(std::slice::from_ref(&ann)).await.unwrap();
        ann.active = false;
        store.upsert_members(&[ann, Member::new("ember", "Ben", "2024-03-02")]).await.unwrap();
        let roster = store.list_members("ember").await.unwrap();
        assert_eq!(roster.len(), 2);
        assert!(!roster[0].active);

        store
            .put_prices(&[CachedPrice {
                item_key: "Maple Log".to_string(),
                price: 12,
                updated_at: 1,
            }])
            .await
            .unwrap();
        let prices = store
            .get_prices(&[ItemKey::from_name("maple log"), ItemKey::from_name("iron ore")])
            .await
            .unwrap();
        assert_eq!(prices.len(), 1);
        assert_eq!(prices[&ItemKey::from_name("Maple Log")].price, 12);
    }

    #[test]
    fn test_safe_segment() {
        assert_eq!(safe_segment("../etc"), "___etc");
        assert_eq!(safe_segment(" ember-2 "), "ember-2");
        assert_eq!(safe_segment(""), "_");
    }
}
