//! Lobby Auth - signed access tokens for the Workers Lobby login flow
//!
//! This library mints HS512-signed tokens carrying a username and its
//! authorities, verifies them, and reports whether they have expired.

pub mod auth;
pub mod config;
pub mod constants;
pub mod error;
pub mod security_logger;

// Re-export main components
pub use auth::{Principal, Role, TokenIdentity, TokenService};
pub use config::TokenConfig;
pub use constants::*;
pub use error::{LobbyError, Result, TokenError, TokenResult};
