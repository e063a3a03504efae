//! Token configuration module
//! Holds the signing secret and claim constants handed to the token service

use crate::constants::{EXPIRATION_TIME_MS, MIN_SECRET_LEN, TOKEN_AUDIENCE, TOKEN_ISSUER};
use crate::error::{LobbyError, Result};
use std::env;
use std::fmt;
use std::time::Duration;

const SECRET_VAR: &str = "LOBBY_JWT_SECRET";
const FALLBACK_SECRET_VAR: &str = "JWT_SECRET";
const TTL_VAR: &str = "LOBBY_JWT_TTL_MS";

/// Token service configuration, loaded once at startup and never mutated
#[derive(Clone)]
pub struct TokenConfig {
    /// Shared HMAC secret used to sign and verify tokens
    pub secret: String,
    /// Value written to and required in the `iss` claim
    pub issuer: String,
    /// Value written to the `aud` claim
    pub audience: String,
    /// Lifetime of an issued token
    pub ttl: Duration,
}

// The secret never reaches logs
impl fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl TokenConfig {
    /// Creates a configuration with the standard issuer, audience and TTL
    pub fn new(secret: impl Into<String>) -> Result<Self> {
        let secret = secret.into();
        Self::validate_secret(&secret, SECRET_VAR)?;

        Ok(Self {
            secret,
            issuer: TOKEN_ISSUER.to_string(),
            audience: TOKEN_AUDIENCE.to_string(),
            ttl: Duration::from_millis(EXPIRATION_TIME_MS),
        })
    }

    /// Overrides the token lifetime
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Validate that a secret meets security requirements
    fn validate_secret(secret: &str, var_name: &str) -> Result<()> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(LobbyError::Config(format!(
                "{} must be at least {} characters long",
                var_name, MIN_SECRET_LEN
            )));
        }

        // Check for placeholder values copied from docs
        let insecure_patterns = [
            "your-secret-key",
            "change-this",
            "changeme",
            "secret",
            "password",
            "12345",
        ];

        let lowered = secret.to_lowercase();
        for pattern in &insecure_patterns {
            if lowered.contains(pattern) {
                return Err(LobbyError::Config(format!(
                    "{} contains insecure pattern '{}'. Generate one with: openssl rand -base64 48",
                    var_name, pattern
                )));
            }
        }

        if secret.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(LobbyError::Config(format!(
                "{} should contain mixed characters (letters, numbers, symbols)",
                var_name
            )));
        }

        Ok(())
    }

    /// Load configuration from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup(SECRET_VAR)
            .or_else(|| lookup(FALLBACK_SECRET_VAR))
            .ok_or_else(|| {
                LobbyError::Config(format!(
                    "{} (or {}) environment variable is required. \
                     Generate one with: openssl rand -base64 48",
                    SECRET_VAR, FALLBACK_SECRET_VAR
                ))
            })?;

        let ttl_ms = match lookup(TTL_VAR) {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                LobbyError::Config(format!(
                    "{} must be a whole number of milliseconds, got '{}'",
                    TTL_VAR, raw
                ))
            })?,
            None => EXPIRATION_TIME_MS,
        };

        let ttl = Duration::from_millis(ttl_ms);
        if chrono::TimeDelta::from_std(ttl).is_err() {
            return Err(LobbyError::Config(format!(
                "{} is out of range, got {}",
                TTL_VAR, ttl_ms
            )));
        }

        let config = Self::new(secret)?.with_ttl(ttl);
        log::debug!(
            "Token configuration loaded: issuer={}, ttl={}ms",
            config.issuer,
            ttl_ms
        );
        Ok(config)
    }
}
