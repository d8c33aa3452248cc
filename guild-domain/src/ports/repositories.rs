use async_trait::async_trait;
use std::collections::HashMap;

use crate::entities::{CachedPrice, DailyActivityRecord, GuildSettings, Member};
use crate::value_objects::ItemKey;

#[async_trait]
pub trait MemberRepository: Send + Sync {
    async fn list_members(&self, guild_id: &str) -> anyhow::Result<Vec<Member>>;
    async fn upsert_members(&self, members: &[Member]) -> anyhow::Result<()>;
}

#[async_trait]
pub trait DailyLogRepository: Send + Sync {
    /// Records are keyed by guild, date and exact IGN.
    async fn upsert_records(&self, records: &[DailyActivityRecord]) -> anyhow::Result<()>;
    async fn get_record(
        &self,
        guild_id: &str,
        date: &str,
        ign: &str,
    ) -> anyhow::Result<Option<DailyActivityRecord>>;
    async fn list_records(
        &self,
        guild_id: &str,
        from: &str,
        to: &str,
    ) -> anyhow::Result<Vec<DailyActivityRecord>>;
    async fn ping(&self) -> anyhow::Result<()>;
}

#[async_trait]
pub trait PriceCacheRepository: Send + Sync {
    async fn get_prices(&self, keys: &[ItemKey]) -> anyhow::Result<HashMap<ItemKey, CachedPrice>>;
    async fn put_prices(&self, prices: &[CachedPrice]) -> anyhow::Result<()>;
}

#[async_trait]
pub trait ConfigRepository: Send + Sync {
    async fn load_guild_settings(&self, path: &str) -> anyhow::Result<Vec<GuildSettings>>;
    async fn save_guild_settings(&self, path: &str, settings: &[GuildSettings]) -> anyhow::Result<()>;
}
