use crate::config::AppConfig;
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct LoginResponse {
    pub token: String,
    pub user: String,
}

/// Admin sessions keyed by opaque bearer token.
pub struct SessionStore {
    username: String,
    password: String,
    sessions: RwLock<HashMap<String, String>>,
    counter: AtomicU64,
}

impl SessionStore {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_credentials(&config.admin_username, &config.admin_password)
    }

    pub fn with_credentials(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            sessions: RwLock::new(HashMap::new()),
            counter: AtomicU64::new(0),
        }
    }

    /// Username matches case-insensitively; both inputs are trimmed.
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, AppError> {
        let username = request.username.trim();
        let password = request.password.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AppError::Validation("Please enter both username and password".into()));
        }
        if !username.eq_ignore_ascii_case(&self.username) || password != self.password {
            log::warn!("Rejected admin login for '{}'", username);
            return Err(AppError::Unauthorized("Invalid credentials".into()));
        }

        let token = self.issue_token(username);
        let user = display_name(&self.username);
        self.sessions.write().await.insert(token.clone(), user.clone());
        log::info!("Admin '{}' logged in", user);
        Ok(LoginResponse { token, user })
    }

    pub async fn logout(&self, token: &str) -> bool {
        let removed = self.sessions.write().await.remove(token).is_some();
        if removed {
            log::info!("Admin session ended");
        }
        removed
    }

    /// The user behind `token`, if the session is live.
    pub async fn verify(&self, token: &str) -> Result<String, AppError> {
        self.sessions
            .read()
            .await
            .get(token)
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("session expired or invalid".into()))
    }

    fn issue_token(&self, username: &str) -> String {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        let mut hasher = Sha256::new();
        hasher.update(username.as_bytes());
        hasher.update(chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default().to_le_bytes());
        hasher.update(n.to_le_bytes());
        format!("{:x}", hasher.finalize())
    }
}

fn display_name(username: &str) -> String {
    let mut chars = username.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AppError> {
    header
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Unauthorized("missing bearer token".into()))
}
