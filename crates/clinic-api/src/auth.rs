//! Bearer token authentication and role checks.
//!
//! `require_auth` reads `Authorization: Bearer <token>`, resolves it against
//! the static token registry, and injects `AuthUser` into request extensions
//! for downstream handlers.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::error::ApiError;
use crate::state::AppContext;

/// Caller role attached to each API token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Doctor,
    Staff,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Doctor => "doctor",
            Role::Staff => "staff",
        }
    }

    /// Whether this role may create or modify prescriptions.
    pub fn can_prescribe(&self) -> bool {
        matches!(self, Role::Admin | Role::Doctor)
    }
}

impl FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "doctor" => Ok(Role::Doctor),
            "staff" => Ok(Role::Staff),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The authenticated caller, injected into request extensions.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub username: String,
    pub role: Role,
}

/// Static token table resolved at startup from configuration.
#[derive(Debug, Default)]
pub struct AuthRegistry {
    tokens: HashMap<String, AuthUser>,
}

impl AuthRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, token: &str, username: &str, role: Role) {
        self.tokens.insert(
            token.to_string(),
            AuthUser {
                username: username.to_string(),
                role,
            },
        );
    }

    pub fn resolve(&self, token: &str) -> Option<&AuthUser> {
        self.tokens.get(token)
    }
}

/// Require a valid bearer token on every request.
///
/// Accesses `AppContext` from request extensions (injected by the Extension
/// layer). On success the resolved `AuthUser` is available to handlers.
pub async fn require_auth(req: Request<axum::body::Body>, next: Next) -> Response {
    match require_auth_inner(req, next).await {
        Ok(resp) => resp,
        Err(err) => err.into_response(),
    }
}

async fn require_auth_inner(
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let ctx = req
        .extensions()
        .get::<AppContext>()
        .cloned()
        .ok_or_else(|| ApiError::Internal("missing app context".into()))?;

    let token = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(ApiError::Unauthorized)?;

    let user = ctx.auth.resolve(token).cloned().ok_or_else(|| {
        tracing::warn!("rejected request with unknown token");
        ApiError::Unauthorized
    })?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("Doctor".parse::<Role>().unwrap(), Role::Doctor);
        assert!("nurse".parse::<Role>().is_err());
    }

    #[test]
    fn test_prescribe_gate() {
        assert!(Role::Admin.can_prescribe());
        assert!(Role::Doctor.can_prescribe());
        assert!(!Role::Staff.can_prescribe());
    }

    #[test]
    fn test_registry_resolve() {
        let mut registry = AuthRegistry::new();
        registry.register("tok-1", "alice", Role::Doctor);

        let user = registry.resolve("tok-1").unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.role, Role::Doctor);
        assert!(registry.resolve("tok-2").is_none());
    }
}
