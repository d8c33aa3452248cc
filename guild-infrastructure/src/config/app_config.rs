use std::env;
use std::path::Path;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use guild_domain::{AccessToken, Role, RuntimeConfig, DEFAULT_DONATION_THRESHOLD};

use crate::config::validation::validate_access_tokens;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub default_guild_id: String,
    pub access_tokens: Vec<AccessToken>,
    pub data_dir: String,
    pub settings_path: String,
    pub report_dir: String,
    pub public_base_url: String,
    pub log_dir: Option<String>,
    pub market_api_url: Option<String>,
    pub market_api_key: Option<String>,
    pub price_cache_ttl_hours: u64,
    pub price_lookup_delay_ms: u64,
    pub default_donation_threshold: i64,
    pub inactivity_days: u32,
    pub webhook_url: Option<String>,
    pub webhook_template: Option<String>,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
    pub report_hour: u32,
    pub report_minute: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3240".to_string(),
            default_guild_id: "default".to_string(),
            access_tokens: Vec::new(),
            data_dir: "./data".to_string(),
            settings_path: "./guild_settings.yaml".to_string(),
            report_dir: "./reports".to_string(),
            public_base_url: "http://127.0.0.1:3240".to_string(),
            log_dir: None,
            market_api_url: None,
            market_api_key: None,
            price_cache_ttl_hours: 24,
            price_lookup_delay_ms: 250,
            default_donation_threshold: DEFAULT_DONATION_THRESHOLD,
            inactivity_days: 3,
            webhook_url: None,
            webhook_template: None,
            max_body_bytes: 2 * 1024 * 1024,
            request_timeout_seconds: 15,
            report_hour: 23,
            report_minute: 30,
        }
    }
}

impl AppConfig {
    pub async fn load() -> Result<Self> {
        let path = env::var("GUILD_CONFIG").unwrap_or_else(|_| "./config.toml".to_string());
        let file_path = Path::new(&path);
        let base_dir = file_path.parent();
        let mut config = if file_path.exists() {
            let content = fs::read_to_string(file_path).await?;
            toml::from_str(&content)?
        } else {
            warn!("{} not found, using defaults", path);
            AppConfig::default()
        };
        config.apply_env_overrides();
        config.resolve_paths(base_dir);
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn normalize(&mut self) {
        self.default_guild_id = self.default_guild_id.trim().to_string();
        if self.default_guild_id.is_empty() {
            self.default_guild_id = "default".to_string();
        }
        self.log_dir = blank_to_none(self.log_dir.take());
        self.market_api_url = blank_to_none(self.market_api_url.take())
            .map(|url| url.trim_end_matches('/').to_string());
        self.market_api_key = blank_to_none(self.market_api_key.take());
        self.webhook_url = blank_to_none(self.webhook_url.take());
        self.webhook_template = blank_to_none(self.webhook_template.take());
        if self.default_donation_threshold <= 0 {
            self.default_donation_threshold = DEFAULT_DONATION_THRESHOLD;
        }
        if self.inactivity_days == 0 {
            self.inactivity_days = 1;
        }
        for token in &mut self.access_tokens {
            token.token = token.token.trim().to_string();
            token.user_id = token.user_id.trim().to_string();
            token.guild_id = blank_to_none(token.guild_id.take());
        }
    }

    fn resolve_paths(&mut self, base_dir: Option<&Path>) {
        let Some(base) = base_dir else {
            return;
        };
        self.data_dir = resolve_path(base, &self.data_dir);
        self.settings_path = resolve_path(base, &self.settings_path);
        self.report_dir = resolve_path(base, &self.report_dir);
        if let Some(log_dir) = &self.log_dir {
            self.log_dir = Some(resolve_path(base, log_dir));
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.bind_addr
            .parse::<std::net::SocketAddr>()
            .map_err(|err| anyhow!("invalid bind_addr: {}", err))?;
        if self.public_base_url.trim().is_empty() {
            return Err(anyhow!("public_base_url must not be empty"));
        }
        if self.data_dir.trim().is_empty() || self.settings_path.trim().is_empty() {
            return Err(anyhow!("data_dir and settings_path must not be empty"));
        }
        if self.max_body_bytes == 0 {
            return Err(anyhow!("max_body_bytes must be greater than 0"));
        }
        if self.report_hour > 23 || self.report_minute > 59 {
            return Err(anyhow!("report_hour or report_minute out of range"));
        }
        validate_access_tokens(&self.access_tokens)
    }

    pub fn to_runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            bind_addr: self.bind_addr.clone(),
            default_guild_id: self.default_guild_id.clone(),
            access_tokens: self.access_tokens.clone(),
            data_dir: self.data_dir.clone(),
            settings_path: self.settings_path.clone(),
            report_dir: self.report_dir.clone(),
            public_base_url: self.public_base_url.clone(),
            market_api_url: self.market_api_url.clone(),
            market_api_key: self.market_api_key.clone(),
            price_cache_ttl_hours: self.price_cache_ttl_hours,
            price_lookup_delay_ms: self.price_lookup_delay_ms,
            default_donation_threshold: self.default_donation_threshold,
            inactivity_days: self.inactivity_days,
            webhook_url: self.webhook_url.clone(),
            webhook_template: self.webhook_template.clone(),
            max_body_bytes: self.max_body_bytes,
            request_timeout_seconds: self.request_timeout_seconds,
            report_hour: self.report_hour,
            report_minute: self.report_minute,
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = env::var("GUILD_BIND_ADDR") {
            self.bind_addr = value;
        }
        if let Ok(value) = env::var("GUILD_DEFAULT_GUILD_ID") {
            self.default_guild_id = value;
        }
        if let Ok(value) = env::var("GUILD_ACCESS_TOKENS") {
            self.access_tokens = parse_env_tokens(&value);
        }
        if let Ok(value) = env::var("GUILD_DATA_DIR") {
            self.data_dir = value;
        }
        if let Ok(value) = env::var("GUILD_SETTINGS_PATH") {
            self.settings_path = value;
        }
        if let Ok(value) = env::var("GUILD_REPORT_DIR") {
            self.report_dir = value;
        }
        if let Ok(value) = env::var("GUILD_PUBLIC_BASE_URL") {
            self.public_base_url = value;
        }
        if let Ok(value) = env::var("GUILD_LOG_DIR") {
            self.log_dir = Some(value);
        }
        if let Ok(value) = env::var("GUILD_MARKET_API_URL") {
            self.market_api_url = Some(value);
        }
        if let Ok(value) = env::var("GUILD_MARKET_API_KEY") {
            self.market_api_key = Some(value);
        }
        if let Ok(value) = env::var("GUILD_PRICE_CACHE_TTL_HOURS") {
            self.price_cache_ttl_hours = value.parse().unwrap_or(self.price_cache_ttl_hours);
        }
        if let Ok(value) = env::var("GUILD_PRICE_LOOKUP_DELAY_MS") {
            self.price_lookup_delay_ms = value.parse().unwrap_or(self.price_lookup_delay_ms);
        }
        if let Ok(value) = env::var("GUILD_DEFAULT_DONATION_THRESHOLD") {
            self.default_donation_threshold = value.parse().unwrap_or(self.default_donation_threshold);
        }
        if let Ok(value) = env::var("GUILD_INACTIVITY_DAYS") {
            self.inactivity_days = value.parse().unwrap_or(self.inactivity_days);
        }
        if let Ok(value) = env::var("GUILD_WEBHOOK_URL") {
            self.webhook_url = Some(value);
        }
        if let Ok(value) = env::var("GUILD_WEBHOOK_TEMPLATE") {
            self.webhook_template = Some(value);
        }
        if let Ok(value) = env::var("GUILD_MAX_BODY_BYTES") {
            self.max_body_bytes = value.parse().unwrap_or(self.max_body_bytes);
        }
        if let Ok(value) = env::var("GUILD_REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds = value.parse().unwrap_or(self.request_timeout_seconds);
        }
        if let Ok(value) = env::var("GUILD_REPORT_HOUR") {
            self.report_hour = value.parse().unwrap_or(self.report_hour);
        }
        if let Ok(value) = env::var("GUILD_REPORT_MINUTE") {
            self.report_minute = value.parse().unwrap_or(self.report_minute);
        }
    }
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn resolve_path(base: &Path, value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return trimmed.to_string();
    }
    let path = Path::new(trimmed);
    if path.is_absolute() {
        trimmed.to_string()
    } else {
        base.join(path).to_string_lossy().to_string()
    }
}

/// `token:user:role[:guild]` entries separated by commas.
fn parse_env_tokens(value: &str) -> Vec<AccessToken> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| {
            let mut parts = entry.splitn(4, ':');
            let token = parts.next()?.trim().to_string();
            let user_id = parts.next()?.trim().to_string();
            let role = Role::from(parts.next().unwrap_or("member"));
            let guild_id = parts.next().map(|guild| guild.trim().to_string());
            Some(AccessToken {
                token,
                user_id,
                role,
                guild_id,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_fills_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            default_guild_id = "ember"
            market_api_url = "https://market.example/api/"

            [[access_tokens]]
            token = "abc"
            user_id = "lead"
            role = "admin"
            "#,
        )
        .unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:3240");
        assert_eq!(config.price_cache_ttl_hours, 24);
        assert_eq!(config.access_tokens[0].role, Role::Admin);

        let mut config = config;
        config.normalize();
        assert_eq!(config.market_api_url.as_deref(), Some("https://market.example/api"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_normalize_drops_blank_optionals() {
        let mut config = AppConfig {
            webhook_url: Some("  ".to_string()),
            log_dir: Some(String::new()),
            default_donation_threshold: -1,
            ..AppConfig::default()
        };
        config.normalize();
        assert_eq!(config.webhook_url, None);
        assert_eq!(config.log_dir, None);
        assert_eq!(config.default_donation_threshold, DEFAULT_DONATION_THRESHOLD);
    }

    #[test]
    fn test_validate_rejects_bad_schedule() {
        let config = AppConfig {
            report_hour: 24,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_env_tokens() {
        let tokens = parse_env_tokens("a1:ann:officer, b2:ben:admin:ember ,broken");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].role, Role::Officer);
        assert_eq!(tokens[0].guild_id, None);
        assert_eq!(tokens[1].guild_id.as_deref(), Some("ember"));
    }

    #[test]
    fn test_resolve_path_keeps_absolute() {
        let base = Path::new("/etc/guild");
        assert_eq!(resolve_path(base, "/var/data"), "/var/data");
        assert_eq!(resolve_path(base, "data"), "/etc/guild/data");
    }
}
