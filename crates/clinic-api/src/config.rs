//! Environment-driven server configuration.

use std::env;

use crate::auth::{AuthRegistry, Role};

const DEFAULT_BIND: &str = "127.0.0.1:3001";
const DEFAULT_DB_PATH: &str = "clinic.db";

/// Server configuration read from the environment.
///
/// - `CLINIC_DB_PATH`: SQLite database file path.
/// - `CLINIC_BIND`: listen address (`host:port`).
/// - `CLINIC_API_TOKENS`: comma-separated `token:username:role` entries.
/// - `CLINIC_DOCTOR_NAME`: doctor assigned to visits created on enqueue.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    pub bind: String,
    pub tokens: Vec<TokenEntry>,
    pub doctor_name: Option<String>,
}

/// One parsed `token:username:role` credential.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenEntry {
    pub token: String,
    pub username: String,
    pub role: Role,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let db_path = env::var("CLINIC_DB_PATH").unwrap_or_else(|_| DEFAULT_DB_PATH.to_string());
        let bind = env::var("CLINIC_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string());
        let tokens = match env::var("CLINIC_API_TOKENS") {
            Ok(raw) => parse_tokens(&raw)?,
            Err(_) => Vec::new(),
        };
        let doctor_name = env::var("CLINIC_DOCTOR_NAME").ok();

        Ok(Self {
            db_path,
            bind,
            tokens,
            doctor_name,
        })
    }

    pub fn auth_registry(&self) -> AuthRegistry {
        let mut registry = AuthRegistry::new();
        for entry in &self.tokens {
            registry.register(&entry.token, &entry.username, entry.role);
        }
        registry
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid token entry '{0}', expected token:username:role")]
    InvalidTokenEntry(String),
    #[error("unknown role '{0}'")]
    UnknownRole(String),
}

fn parse_tokens(raw: &str) -> Result<Vec<TokenEntry>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_token_entry)
        .collect()
}

fn parse_token_entry(entry: &str) -> Result<TokenEntry, ConfigError> {
    let mut parts = entry.splitn(3, ':');
    let (token, username, role) = match (parts.next(), parts.next(), parts.next()) {
        (Some(t), Some(u), Some(r)) if !t.is_empty() && !u.is_empty() => (t, u, r),
        _ => return Err(ConfigError::InvalidTokenEntry(entry.to_string())),
    };
    let role = role
        .parse::<Role>()
        .map_err(|_| ConfigError::UnknownRole(role.to_string()))?;
    Ok(TokenEntry {
        token: token.to_string(),
        username: username.to_string(),
        role,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_token_list() {
        let tokens = parse_tokens("abc:alice:admin, def:bob:doctor,ghi:carol:staff").unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].username, "alice");
        assert_eq!(tokens[0].role, Role::Admin);
        assert_eq!(tokens[1].role, Role::Doctor);
        assert_eq!(tokens[2].role, Role::Staff);
    }

    #[test]
    fn test_parse_empty_list() {
        assert!(parse_tokens("").unwrap().is_empty());
        assert!(parse_tokens(" , ").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_entry_rejected() {
        assert!(parse_tokens("just-a-token").is_err());
        assert!(parse_tokens("tok:user").is_err());
        assert!(parse_tokens(":user:admin").is_err());
    }

    #[test]
    fn test_unknown_role_rejected() {
        let err = parse_tokens("tok:user:superuser").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownRole(_)));
    }
}
