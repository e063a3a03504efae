use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::auth::principal::Principal;
use crate::config::TokenConfig;
use crate::constants::MAX_TOKEN_LEN;
use crate::error::{LobbyError, Result, TokenError, TokenResult};
use crate::security_logger::{log_security_event, SecurityEvent};

/// JWT Claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Issuer
    #[serde(default)]
    pub iss: String,
    /// Audience
    #[serde(default)]
    pub aud: String,
    /// Issued at (seconds since the epoch)
    pub iat: i64,
    /// Subject (username)
    pub sub: String,
    /// Authority strings granted to the subject; wire name is `AUTHORITIES_CLAIM`
    #[serde(default, rename = "authorities")]
    pub authorities: Vec<String>,
    /// Expiration time (seconds since the epoch)
    pub exp: i64,
}

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Identity recovered from a verified token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenIdentity {
    pub subject: String,
    pub authorities: Vec<String>,
    pub issued_at: i64,
    pub expires_at: i64,
}

impl TokenIdentity {
    /// A token is live only while its expiry is strictly in the future
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now.timestamp()
    }

    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.iter().any(|a| a == authority)
    }
}

impl From<Claims> for TokenIdentity {
    fn from(claims: Claims) -> Self {
        Self {
            subject: claims.sub,
            authorities: claims.authorities,
            issued_at: claims.iat,
            expires_at: claims.exp,
        }
    }
}

/// Issues and verifies HS512-signed access tokens
///
/// Verification checks the signature, the algorithm and the issuer, not expiry:
/// an expired token still verifies until [`TokenService::is_token_valid`] is
/// asked. [`crate::auth::filter::authenticate_header`] applies both in one call.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    audience: String,
    ttl: TimeDelta,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    /// Creates a token service from a loaded configuration
    pub fn new(config: &TokenConfig) -> Result<Self> {
        let ttl = TimeDelta::from_std(config.ttl).map_err(|_| {
            LobbyError::Config(format!("token TTL {:?} is out of range", config.ttl))
        })?;

        let mut validation = Validation::new(Algorithm::HS512);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_required_spec_claims(&["iss", "sub", "exp"]);
        validation.validate_exp = false;
        validation.validate_aud = false;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            ttl,
            clock: Arc::new(SystemClock),
        })
    }

    /// Replaces the time source used for issuance and expiry checks
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Signs a new token for the given principal
    pub fn issue(&self, principal: &Principal) -> TokenResult<String> {
        if principal.username.is_empty() {
            return Err(TokenError::EmptySubject);
        }

        // TTL is applied in milliseconds, the claim holds whole seconds
        let now = self.clock.now();
        let expires_at = now
            .timestamp_millis()
            .saturating_add(self.ttl.num_milliseconds())
            .div_euclid(1000);

        let claims = Claims {
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now.timestamp(),
            sub: principal.username.clone(),
            authorities: principal.authorities.iter().cloned().collect(),
            exp: expires_at,
        };

        let token = encode(&Header::new(Algorithm::HS512), &claims, &self.encoding_key)
            .map_err(TokenError::Signing)?;

        // Never hand out a token claims_of would refuse
        if token.len() > MAX_TOKEN_LEN {
            return Err(TokenError::TooLarge(token.len()));
        }

        log_security_event(&SecurityEvent::TokenIssued {
            subject: claims.sub,
            authorities: claims.authorities.len(),
        });
        Ok(token)
    }

    /// Checks signature and issuer and returns the decoded claim set
    pub fn claims_of(&self, token: &str) -> TokenResult<Claims> {
        if token.len() > MAX_TOKEN_LEN {
            let err = TokenError::TooLong(token.len());
            Self::log_failure(&err);
            return Err(err);
        }

        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                let err = TokenError::from_verification(e);
                Self::log_failure(&err);
                err
            })
    }

    /// Verifies a token and returns its subject and authorities
    pub fn verify(&self, token: &str) -> TokenResult<TokenIdentity> {
        self.claims_of(token).map(TokenIdentity::from)
    }

    /// True iff the username is non-empty and the token has not expired
    ///
    /// An empty username is `false` without looking at the token; otherwise a
    /// token that fails verification is an error, never `false`.
    pub fn is_token_valid(&self, username: &str, token: &str) -> TokenResult<bool> {
        if username.is_empty() {
            return Ok(false);
        }

        let identity = self.verify(token)?;
        if identity.is_expired_at(self.clock.now()) {
            log_security_event(&SecurityEvent::TokenExpired {
                subject: identity.subject,
            });
            return Ok(false);
        }
        Ok(true)
    }

    /// Verifies a token and returns its authorities claim
    pub fn authorities_of(&self, token: &str) -> TokenResult<Vec<String>> {
        self.verify(token).map(|identity| identity.authorities)
    }

    /// Verifies a token and returns its subject claim
    pub fn subject_of(&self, token: &str) -> TokenResult<String> {
        self.verify(token).map(|identity| identity.subject)
    }

    /// Current time according to the configured clock
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    fn log_failure(err: &TokenError) {
        log_security_event(&SecurityEvent::TokenValidationFailed {
            reason: err.kind().to_string(),
        });
    }
}
