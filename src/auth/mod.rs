//! Credential handling: password hashing and access tokens

pub mod password;
pub mod token;

pub use password::{hash_password, verify_password};
pub use token::{sign_token, verify_token, AuthError, Claims};
