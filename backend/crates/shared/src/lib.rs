//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the "smallest core" of DevOverflow's vocabulary:
//! - Common error types and result aliases
//! - Typed IDs shared between the auth and votes contexts
//! - Field-keyed validation error collection
//!
//! **Design Principle**: Only include things that are "hard to change"
//! and have consistent meaning across all domains.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
pub mod validation;
