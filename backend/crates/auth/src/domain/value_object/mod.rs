//! Value Object Module

pub mod display_name;
pub mod email;
pub mod oauth_provider;
pub mod password_rules;
pub mod public_id;
pub mod user_password;
pub mod username;
