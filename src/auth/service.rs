// Authentication service - password hashing and token issuance

use crate::auth::{
    error::AuthError,
    password::PasswordService,
    token::{Claims, TokenService},
};
use crate::config::AuthConfig;

/// Stateless authentication operations
///
/// Hashing and verification are CPU-bound; async callers should run them on
/// the blocking thread pool.
pub trait AuthService: Send + Sync {
    fn generate_token(&self, email: &str, role: &str) -> Result<String, AuthError>;

    fn hash_password(&self, password: &str) -> Result<String, AuthError>;

    fn verify_password(&self, password: &str, hash: &str) -> bool;

    fn check_token(&self, token: &str) -> Result<Claims, AuthError>;
}

/// JWT + Argon2 implementation of [`AuthService`]
#[derive(Debug, Clone)]
pub struct JwtAuthService {
    tokens: TokenService,
    passwords: PasswordService,
}

impl JwtAuthService {
    pub fn new(tokens: TokenService, passwords: PasswordService) -> Self {
        Self { tokens, passwords }
    }

    pub fn from_config(config: &AuthConfig) -> Result<Self, AuthError> {
        Ok(Self::new(
            TokenService::new(config.jwt_secret.clone(), config.token_ttl_secs),
            PasswordService::from_config(config)?,
        ))
    }
}

impl AuthService for JwtAuthService {
    fn generate_token(&self, email: &str, role: &str) -> Result<String, AuthError> {
        self.tokens.generate_token(email, role)
    }

    fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        self.passwords.hash_password(password)
    }

    fn verify_password(&self, password: &str, hash: &str) -> bool {
        self.passwords.verify_password(password, hash)
    }

    fn check_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.tokens.check_token(token)
    }
}
