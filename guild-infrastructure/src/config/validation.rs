use std::collections::HashSet;

use anyhow::{anyhow, Result};

use guild_domain::AccessToken;

pub fn validate_access_tokens(tokens: &[AccessToken]) -> Result<()> {
    let mut seen = HashSet::new();
    for token in tokens {
        if token.token.trim().is_empty() {
            return Err(anyhow!("access token for '{}' is empty", token.user_id));
        }
        if token.user_id.trim().is_empty() {
            return Err(anyhow!("access token is missing user_id"));
        }
        if !seen.insert(token.token.as_str()) {
            return Err(anyhow!("duplicate access token for '{}'", token.user_id));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use guild_domain::Role;

    fn token(value: &str, user: &str) -> AccessToken {
        AccessToken {
            token: value.to_string(),
            user_id: user.to_string(),
            role: Role::Member,
            guild_id: None,
        }
    }

    #[test]
    fn test_duplicate_tokens_rejected() {
        assert!(validate_access_tokens(&[token("a", "ann"), token("b", "ben")]).is_ok());
        assert!(validate_access_tokens(&[token("a", "ann"), token("a", "ben")]).is_err());
        assert!(validate_access_tokens(&[token(" ", "ann")]).is_err());
    }
}
