//! Request authentication helpers
//!
//! Turns an `Authorization` header into a verified identity. The surrounding
//! web framework decides where that identity lives for the rest of the request.

use crate::auth::principal::Principal;
use crate::auth::token::{TokenIdentity, TokenService};
use crate::constants::{JWT_TOKEN_HEADER, TOKEN_PREFIX};
use crate::error::TokenResult;
use crate::security_logger::{log_security_event, SecurityEvent};

/// Extracts bearer token from Authorization header
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix(TOKEN_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Authenticate a request from its Authorization header
///
/// * no header, or not a bearer header: `Ok(None)`, the request stays anonymous
/// * token that fails verification: `Err`, the caller rejects the request
/// * expired token or empty subject: `Ok(None)`
/// * otherwise the verified identity
pub fn authenticate_header(
    auth_header: Option<&str>,
    tokens: &TokenService,
) -> TokenResult<Option<TokenIdentity>> {
    let Some(token) = auth_header.and_then(extract_bearer_token) else {
        log_security_event(&SecurityEvent::AnonymousRequest {
            reason: "no bearer token".to_string(),
        });
        return Ok(None);
    };

    let identity = tokens.verify(token)?;
    if identity.subject.is_empty() {
        log_security_event(&SecurityEvent::AnonymousRequest {
            reason: "empty subject".to_string(),
        });
        return Ok(None);
    }

    if identity.is_expired_at(tokens.now()) {
        log_security_event(&SecurityEvent::TokenExpired {
            subject: identity.subject,
        });
        return Ok(None);
    }

    log::debug!("Request authenticated as {}", identity.subject);
    Ok(Some(identity))
}

/// Issues a token for a freshly logged-in principal as a response header pair
pub fn issue_header(
    tokens: &TokenService,
    principal: &Principal,
) -> TokenResult<(&'static str, String)> {
    let token = tokens.issue(principal)?;
    Ok((JWT_TOKEN_HEADER, token))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(extract_bearer_token("Bearer "), None);
        assert_eq!(extract_bearer_token("Basic dXNlcjpwYXNz"), None);
        assert_eq!(extract_bearer_token("bearer abc"), None);
    }
}
