// Token claim constants
pub const TOKEN_ISSUER: &str = "Workers Lobby, LLC";
pub const TOKEN_AUDIENCE: &str = "Workers Lobby Administration";
pub const AUTHORITIES_CLAIM: &str = "authorities";

// 5 days, in milliseconds
pub const EXPIRATION_TIME_MS: u64 = 432_000_000;

// Request/response header conventions
pub const TOKEN_PREFIX: &str = "Bearer ";
pub const JWT_TOKEN_HEADER: &str = "Jwt-Token";

// Input limits
pub const MIN_SECRET_LEN: usize = 32;
pub const MAX_TOKEN_LEN: usize = 4096;
