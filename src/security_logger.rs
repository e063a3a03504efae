//! Security-focused logging for token lifecycle events
//!
//! Events are written through the `log` facade; the binary installs
//! `env_logger`, library users bring their own logger. Raw tokens and secrets
//! never appear in these lines.

/// Types of security events to track
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecurityEvent {
    TokenIssued { subject: String, authorities: usize },
    TokenValidationFailed { reason: String },
    TokenExpired { subject: String },
    AnonymousRequest { reason: String },
    ConfigurationError { component: String, error: String },
}

impl SecurityEvent {
    /// Stable event name for filtering and aggregation
    pub fn key(&self) -> &'static str {
        match self {
            SecurityEvent::TokenIssued { .. } => "token_issued",
            SecurityEvent::TokenValidationFailed { .. } => "token_validation_failed",
            SecurityEvent::TokenExpired { .. } => "token_expired",
            SecurityEvent::AnonymousRequest { .. } => "anonymous_request",
            SecurityEvent::ConfigurationError { .. } => "config_error",
        }
    }

    fn level(&self) -> log::Level {
        match self {
            SecurityEvent::TokenIssued { .. } | SecurityEvent::AnonymousRequest { .. } => {
                log::Level::Debug
            }
            SecurityEvent::TokenExpired { .. } => log::Level::Info,
            SecurityEvent::TokenValidationFailed { .. } => log::Level::Warn,
            SecurityEvent::ConfigurationError { .. } => log::Level::Error,
        }
    }
}

/// Log a security event at the level matching its severity
pub fn log_security_event(event: &SecurityEvent) {
    let level = event.level();
    match event {
        SecurityEvent::TokenIssued { subject, authorities } => {
            log::log!(level, "SECURITY: Token issued - Subject: {}, Authorities: {}", subject, authorities);
        }
        SecurityEvent::TokenValidationFailed { reason } => {
            log::log!(level, "SECURITY: Token validation failed - Reason: {}", reason);
        }
        SecurityEvent::TokenExpired { subject } => {
            log::log!(level, "SECURITY: Expired token presented - Subject: {}", subject);
        }
        SecurityEvent::AnonymousRequest { reason } => {
            log::log!(level, "SECURITY: Request left unauthenticated - Reason: {}", reason);
        }
        SecurityEvent::ConfigurationError { component, error } => {
            log::log!(level, "SECURITY: Configuration error - Component: {}, Error: {}", component, error);
        }
    }
}
