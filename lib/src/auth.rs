//! Session gate.
//!
//! The vault is unlocked with a single shared secret. A successful login
//! always hands out the same session token, there is no per-user identity,
//! no expiry and no revocation.

use crate::config;
use crate::error::{ErrorKind, Result};
use crate::{settings, Database};

/// Session token used when the configuration doesn't provide one.
pub const DEFAULT_SESSION_TOKEN: &str = "keepsake_session_token";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub theme: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Verified {
    pub valid: bool,
}

/// Immutable gate built once from configuration and shared between requests.
#[derive(Clone)]
pub struct Gate {
    secret: String,
    token: String,
}

impl std::fmt::Debug for Gate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gate").finish_non_exhaustive()
    }
}

impl Gate {
    /// Refuses to build a gate without a secret or a token.
    pub fn new(secret: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let secret = secret.into();
        let token = token.into();
        if secret.is_empty() {
            return Err(ErrorKind::Misconfigured(
                "vault password not set, provide it with `auth.password` or KEEPSAKE__AUTH__PASSWORD"
                    .to_string(),
            )
            .into());
        }
        if token.is_empty() {
            return Err(ErrorKind::Misconfigured("session token must not be empty".to_string()).into());
        }
        Ok(Self { secret, token })
    }

    pub fn from_config(config: &config::Auth) -> Result<Self> {
        Self::new(config.password.clone(), config.token.clone())
    }

    /// Checks the password and, on match, returns the session token along
    /// with the current theme.
    pub fn login(&self, password: &str, db: &Database) -> Result<LoginResponse> {
        if password != self.secret {
            tracing::debug!("login rejected");
            return Err(ErrorKind::Unauthorized.into());
        }
        let theme = settings::get_theme(db)?;
        tracing::debug!("login accepted");
        Ok(LoginResponse {
            success: true,
            token: self.token.clone(),
            theme,
        })
    }

    pub fn verify(&self, token: &str) -> Result<Verified> {
        if self.is_valid(token) {
            Ok(Verified { valid: true })
        } else {
            tracing::debug!("token verification failed");
            Err(ErrorKind::Unauthorized.into())
        }
    }

    pub fn is_valid(&self, token: &str) -> bool {
        token == self.token
    }
}
