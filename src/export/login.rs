//! Login contract and the session flag

use super::Transport;
use crate::config::LoginConfig;
use crate::error::LoginError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

const LOGIN_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_REJECTION: &str = "Invalid credentials";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct LoginResponse {
    pub success: bool,
    pub message: Option<String>,
}

/// Client-side session: a flag plus the name it was set for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    username: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.username.is_some()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Post the credentials; the session is marked only on an OK response
    /// whose body says `success: true`.
    pub fn login<T: Transport + ?Sized>(
        &mut self,
        transport: &mut T,
        config: &LoginConfig,
        username: &str,
        password: &str,
    ) -> Result<(), LoginError> {
        let url = config.api_url.as_deref().ok_or(LoginError::NotConfigured)?;
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let body = serde_json::to_value(&request).unwrap_or(Value::Null);

        let response = transport.post_json(url, &body, LOGIN_TIMEOUT)?;
        let parsed: LoginResponse = response
            .json()
            .and_then(|json| serde_json::from_value(json).ok())
            .unwrap_or_default();

        if response.is_ok() && parsed.success {
            info!(username, "logged in");
            self.username = Some(username.to_string());
            Ok(())
        } else {
            debug!(status = response.status, "login rejected");
            Err(LoginError::Rejected(
                parsed
                    .message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| DEFAULT_REJECTION.to_string()),
            ))
        }
    }

    pub fn logout(&mut self) {
        self.username = None;
    }
}
