//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL repositories using Diesel ORM
//! - **memory**: a single-process store implementing the same repository ports
//! - **security**: Argon2 password hashing and HS256 bearer tokens
//! - **storage**: image upload storage through a `cap-std` directory handle
//!
//! Adapters translate between domain types and infrastructure representations
//! and contain no business rules.

pub mod memory;
pub mod persistence;
pub mod security;
pub mod storage;
