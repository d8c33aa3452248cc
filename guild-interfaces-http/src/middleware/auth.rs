use std::io::Read;

use anyhow::Result;
use axum::http::HeaderMap;
use flate2::read::GzDecoder;
use serde::de::DeserializeOwned;

use guild_application::{AppState, RequestContext};
use guild_domain::{Role, RuntimeConfig};

use crate::error::HttpError;

pub const GUILD_HEADER: &str = "X-Guild-Id";

/// Resolves the caller from the bearer token. With no tokens configured the
/// service runs open and every caller is an anonymous admin.
pub fn resolve_context(config: &RuntimeConfig, headers: &HeaderMap) -> Option<RequestContext> {
    let requested_guild = headers
        .get(GUILD_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string);

    if config.access_tokens.is_empty() {
        let guild_id = requested_guild.unwrap_or_else(|| config.default_guild_id.clone());
        return Some(RequestContext::new("anonymous", guild_id, Role::Admin));
    }

    let bearer = extract_bearer(headers)?;
    let token = config.access_tokens.iter().find(|token| token.token == bearer)?;
    let guild_id = match (&token.guild_id, requested_guild) {
        (Some(bound), Some(requested)) if *bound != requested => return None,
        (Some(bound), _) => bound.clone(),
        (None, Some(requested)) => requested,
        (None, None) => config.default_guild_id.clone(),
    };
    Some(RequestContext::new(token.user_id.clone(), guild_id, token.role))
}

pub fn authorize(state: &AppState, headers: &HeaderMap) -> Result<RequestContext, HttpError> {
    resolve_context(&state.config, headers).ok_or(HttpError::Unauthorized)
}

/// Decodes a JSON body, inflating it first when sent with gzip encoding.
pub fn parse_json_body<T: DeserializeOwned>(headers: &HeaderMap, body: &[u8]) -> Result<T> {
    let content = maybe_gunzip(headers, body)?;
    Ok(serde_json::from_str(&content)?)
}

pub fn maybe_gunzip(headers: &HeaderMap, body: &[u8]) -> Result<String> {
    if let Some(encoding) = headers.get("Content-Encoding") {
        if encoding.to_str().unwrap_or("").trim().eq_ignore_ascii_case("gzip") {
            let mut decoder = GzDecoder::new(body);
            let mut out = String::new();
            decoder.read_to_string(&mut out)?;
            return Ok(out);
        }
    }
    Ok(String::from_utf8(body.to_vec())?)
}

fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let value = headers.get("Authorization")?.to_str().ok()?.trim();
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use axum::http::HeaderValue;
    use flate2::write::GzEncoder;
    use flate2::Compression;

    use guild_domain::AccessToken;

    use super::*;

    fn config(tokens: Vec<AccessToken>) -> RuntimeConfig {
        RuntimeConfig {
            bind_addr: "127.0.0.1:0".to_string(),
            default_guild_id: "ember".to_string(),
            access_tokens: tokens,
            data_dir: "./data".to_string(),
            settings_path: "./settings.yaml".to_string(),
            report_dir: "./reports".to_string(),
            public_base_url: "http://localhost".to_string(),
            market_api_url: None,
            market_api_key: None,
            price_cache_ttl_hours: 24,
            price_lookup_delay_ms: 0,
            default_donation_threshold: 5000,
            inactivity_days: 3,
            webhook_url: None,
            webhook_template: None,
            max_body_bytes: 1024,
            request_timeout_seconds: 5,
            report_hour: 0,
            report_minute: 0,
        }
    }

    fn token(value: &str, role: Role, guild_id: Option<&str>) -> AccessToken {
        AccessToken {
            token: value.to_string(),
            user_id: format!("user-{}", value),
            role,
            guild_id: guild_id.map(ToString::to_string),
        }
    }

    fn headers(bearer: Option<&str>, guild: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(bearer) = bearer {
            headers.insert("Authorization", HeaderValue::from_str(&format!("Bearer {}", bearer)).unwrap());
        }
        if let Some(guild) = guild {
            headers.insert(GUILD_HEADER, HeaderValue::from_str(guild).unwrap());
        }
        headers
    }

    #[test]
    fn test_open_mode_is_anonymous_admin() {
        let ctx = resolve_context(&config(Vec::new()), &headers(None, Some("frost"))).unwrap();
        assert_eq!(ctx.role, Role::Admin);
        assert_eq!(ctx.guild_id, "frost");
        assert_eq!(ctx.user_id, "anonymous");
    }

    #[test]
    fn test_token_resolves_role_and_guild() {
        let config = config(vec![
            token("a1", Role::Officer, None),
            token("b2", Role::Member, Some("frost")),
        ]);
        let ctx = resolve_context(&config, &headers(Some("a1"), None)).unwrap();
        assert_eq!(ctx.role, Role::Officer);
        assert_eq!(ctx.guild_id, "ember");

        let ctx = resolve_context(&config, &headers(Some("b2"), None)).unwrap();
        assert_eq!(ctx.guild_id, "frost");
        assert!(resolve_context(&config, &headers(Some("b2"), Some("ember"))).is_none());
        assert!(resolve_context(&config, &headers(Some("zz"), None)).is_none());
        assert!(resolve_context(&config, &headers(None, None)).is_none());
    }

    #[test]
    fn test_gzip_body_is_inflated() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(br#"{"text":"* Ann"}"#).unwrap();
        let body = encoder.finish().unwrap();
        let mut headers = HeaderMap::new();
        headers.insert("Content-Encoding", HeaderValue::from_static("gzip"));

        let value: serde_json::Value = parse_json_body(&headers, &body).unwrap();
        assert_eq!(value["text"], "* Ann");
        assert!(maybe_gunzip(&HeaderMap::new(), &body).is_err());
    }
}
