// Authentication module
// Provides password hashing, JWT issuance and the bearer-token guard

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod service;
pub mod token;

// Re-export commonly used types
pub use error::AuthError;
pub use middleware::{require_bearer, AuthenticatedUser};
pub use models::{Credentials, NewUser, RegisterRequest, TokenResponse, User, UserEnvelope};
pub use service::{AuthService, JwtAuthService};
pub use token::Claims;
