//! Service-level configuration loaded from environment variables.

/// Settings for the HTTP surface itself (the upstream client has its own
/// config in `completion_client`).
///
/// Environment variables:
/// - `SERVICE_AUTH_TOKEN`: when set, completion endpoints require
///   `Authorization: Bearer <token>`; when unset the gate is open.
#[derive(Debug, Clone, Default)]
pub struct ServiceConfig {
    pub auth_token: Option<String>,
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        let auth_token = std::env::var("SERVICE_AUTH_TOKEN")
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        Self { auth_token }
    }
}
