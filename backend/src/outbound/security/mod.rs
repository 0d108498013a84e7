//! Password hashing and token signing adapters.

mod argon2_hasher;
mod jwt_issuer;

pub use argon2_hasher::Argon2CredentialHasher;
pub use jwt_issuer::JwtTokenIssuer;
