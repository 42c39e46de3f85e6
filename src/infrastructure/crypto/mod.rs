//! Token verification

pub mod jwt;

pub use jwt::{create_token, verify_token, AuthError, Claims, JwtConfig};
