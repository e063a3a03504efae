use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use std::collections::BTreeSet;
use std::time::Duration;

use lobby_auth::auth::token::Claims;
use lobby_auth::{Principal, Role, TokenConfig, TokenError, TokenService, TOKEN_AUDIENCE, TOKEN_ISSUER};

const SECRET: &str = "k7#Qm2!vR9zL4@wX8pT1&nB6yH3^cF5s";
const OTHER_SECRET: &str = "Zp4$Ws8!Lq2@Nx6#Tv1%Rb9^Hm3&Kc7*";

fn service() -> TokenService {
    TokenService::new(&TokenConfig::new(SECRET).unwrap()).unwrap()
}

fn sign_with(claims: &serde_json::Value, secret: &str, alg: Algorithm) -> String {
    encode(&Header::new(alg), claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
}

fn far_future() -> i64 {
    chrono::Utc::now().timestamp() + 3600
}

#[test]
fn test_alice_round_trip() {
    let tokens = service();
    let principal = Principal::new("alice", ["ADMIN", "USER"]);

    let token = tokens.issue(&principal).unwrap();
    let identity = tokens.verify(&token).unwrap();

    assert_eq!(identity.subject, "alice");
    let authorities: BTreeSet<String> = identity.authorities.into_iter().collect();
    assert_eq!(authorities, principal.authorities);
}

#[test]
fn test_subject_and_authorities_accessors() {
    let tokens = service();
    let principal = Principal::from_role("bob", Role::Manager);
    let token = tokens.issue(&principal).unwrap();

    assert_eq!(tokens.subject_of(&token).unwrap(), "bob");
    let authorities: BTreeSet<String> = tokens.authorities_of(&token).unwrap().into_iter().collect();
    assert_eq!(authorities, principal.authorities);
}

#[test]
fn test_empty_authorities_round_trip() {
    let tokens = service();
    let token = tokens.issue(&Principal::new("carol", Vec::<String>::new())).unwrap();

    assert!(tokens.authorities_of(&token).unwrap().is_empty());
}

#[test]
fn test_fresh_token_is_valid() {
    let tokens = service();
    let token = tokens.issue(&Principal::new("alice", ["USER"])).unwrap();

    assert!(tokens.is_token_valid("alice", &token).unwrap());
}

#[test]
fn test_zero_ttl_token_is_expired_not_an_error() {
    let config = TokenConfig::new(SECRET).unwrap().with_ttl(Duration::ZERO);
    let tokens = TokenService::new(&config).unwrap();
    let token = tokens.issue(&Principal::new("alice", ["USER"])).unwrap();

    // Still verifies: expiry is reported only by the predicate
    assert_eq!(tokens.subject_of(&token).unwrap(), "alice");
    assert!(!tokens.is_token_valid("alice", &token).unwrap());
}

#[test]
fn test_other_secret_fails_signature() {
    let foreign = TokenService::new(&TokenConfig::new(OTHER_SECRET).unwrap()).unwrap();
    let token = foreign.issue(&Principal::new("mallory", ["ADMIN"])).unwrap();

    let err = service().verify(&token).unwrap_err();
    assert!(matches!(err, TokenError::Signature(_)), "got {:?}", err);
    assert!(err.is_invalid());
    assert!(matches!(service().is_token_valid("mallory", &token), Err(TokenError::Signature(_))));
}

#[test]
fn test_tampered_payload_fails_signature() {
    let tokens = service();
    let token = tokens.issue(&Principal::new("alice", ["USER"])).unwrap();
    let parts: Vec<&str> = token.split('.').collect();

    let mut claims: serde_json::Value =
        serde_json::from_slice(&URL_SAFE_NO_PAD.decode(parts[1]).unwrap()).unwrap();
    claims["authorities"] = serde_json::json!(["USER", "ADMIN"]);
    let forged_payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).unwrap());
    let forged = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);

    assert!(matches!(tokens.verify(&forged), Err(TokenError::Signature(_))));
}

#[test]
fn test_wrong_algorithm_fails_signature() {
    let claims = serde_json::json!({
        "iss": TOKEN_ISSUER,
        "aud": TOKEN_AUDIENCE,
        "iat": 0,
        "sub": "alice",
        "authorities": ["USER"],
        "exp": far_future(),
    });
    let token = sign_with(&claims, SECRET, Algorithm::HS256);

    assert!(matches!(service().verify(&token), Err(TokenError::Signature(_))));
}

#[test]
fn test_altered_issuer_fails() {
    let claims = serde_json::json!({
        "iss": "Someone Else",
        "aud": TOKEN_AUDIENCE,
        "iat": 0,
        "sub": "alice",
        "authorities": ["USER"],
        "exp": far_future(),
    });
    let token = sign_with(&claims, SECRET, Algorithm::HS512);

    let err = service().verify(&token).unwrap_err();
    assert!(matches!(err, TokenError::Issuer(_)), "got {:?}", err);
}

#[test]
fn test_missing_issuer_fails() {
    let claims = serde_json::json!({
        "aud": TOKEN_AUDIENCE,
        "iat": 0,
        "sub": "alice",
        "authorities": ["USER"],
        "exp": far_future(),
    });
    let token = sign_with(&claims, SECRET, Algorithm::HS512);

    let err = service().verify(&token).unwrap_err();
    assert!(matches!(err, TokenError::Issuer(_)), "got {:?}", err);
}

#[test]
fn test_missing_authorities_claim_is_empty() {
    let claims = serde_json::json!({
        "iss": TOKEN_ISSUER,
        "iat": 0,
        "sub": "alice",
        "exp": far_future(),
    });
    let token = sign_with(&claims, SECRET, Algorithm::HS512);

    assert!(service().authorities_of(&token).unwrap().is_empty());
}

#[test]
fn test_malformed_tokens() {
    let tokens = service();
    for token in ["", "invalid", "invalid.token.here", "a.b"] {
        let err = tokens.verify(token).unwrap_err();
        assert!(matches!(err, TokenError::Malformed(_)), "{:?} gave {:?}", token, err);
    }
}

#[test]
fn test_claims_of_exposes_full_claim_set() {
    let tokens = service();
    let token = tokens.issue(&Principal::new("alice", ["USER"])).unwrap();
    let claims: Claims = tokens.claims_of(&token).unwrap();

    assert_eq!(claims.iss, TOKEN_ISSUER);
    assert_eq!(claims.aud, TOKEN_AUDIENCE);
    assert_eq!(claims.sub, "alice");
    assert!(claims.exp > claims.iat);
}
