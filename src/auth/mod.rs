//! Token issuance, verification and request authentication

pub mod filter;
pub mod principal;
pub mod token;

// Re-export main components
pub use filter::{authenticate_header, extract_bearer_token, issue_header};
pub use principal::{Principal, Role};
pub use token::{Claims, Clock, SystemClock, TokenIdentity, TokenService};
