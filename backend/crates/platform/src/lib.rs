//! Platform Crate - Technical Infrastructure
//!
//! Shared technical foundations used by the bounded contexts:
//! - Environment configuration helpers
//! - Cryptographic utilities (HMAC-SHA256, Base64, random tokens)
//! - Password hashing (Argon2id)
//! - Cookie building and parsing
//! - Client identification (IP, User-Agent)

pub mod client;
pub mod config;
pub mod cookie;
pub mod crypto;
pub mod password;
