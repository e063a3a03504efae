use thiserror::Error;

/// Why a token was rejected or could not be produced.
///
/// Verification failures keep the underlying `jsonwebtoken` error as their
/// source so a bad secret, a tampered payload and a foreign issuer can be told
/// apart in diagnostics. Callers that only care about "valid or not" can use
/// [`TokenError::is_invalid`].
#[derive(Debug, Error)]
pub enum TokenError {
    // Verification errors
    #[error("Token signature cannot be verified")]
    Signature(#[source] jsonwebtoken::errors::Error),

    #[error("Token issuer is missing or not trusted")]
    Issuer(#[source] jsonwebtoken::errors::Error),

    #[error("Token cannot be parsed")]
    Malformed(#[source] jsonwebtoken::errors::Error),

    #[error("Token too long: {0} bytes")]
    TooLong(usize),

    // Issuance errors
    #[error("Token could not be signed")]
    Signing(#[source] jsonwebtoken::errors::Error),

    #[error("Cannot issue a token for an empty username")]
    EmptySubject,

    #[error("Issued token would be {0} bytes, over the accepted limit")]
    TooLarge(usize),
}

impl TokenError {
    /// Maps a verification failure from the signing library onto our tags
    pub(crate) fn from_verification(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => Self::Signature(err),
            ErrorKind::InvalidIssuer => Self::Issuer(err),
            ErrorKind::MissingRequiredClaim(claim) if claim == "iss" => Self::Issuer(err),
            _ => Self::Malformed(err),
        }
    }

    /// True for every way a presented token can fail verification
    pub fn is_invalid(&self) -> bool {
        !matches!(self, Self::Signing(_) | Self::EmptySubject | Self::TooLarge(_))
    }

    /// Short, token-free label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Signature(_) => "signature",
            Self::Issuer(_) => "issuer",
            Self::Malformed(_) => "malformed",
            Self::TooLong(_) => "too_long",
            Self::Signing(_) => "signing",
            Self::EmptySubject => "empty_subject",
            Self::TooLarge(_) => "too_large",
        }
    }
}

#[derive(Debug, Error)]
pub enum LobbyError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Usage(&'static str),
}

// Generic result type for the crate surface (configuration and binary)
pub type Result<T> = std::result::Result<T, LobbyError>;

// Result type for token operations
pub type TokenResult<T> = std::result::Result<T, TokenError>;
