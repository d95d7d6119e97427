//! Services module - business logic and external service integrations.
//!
//! This module contains:
//! - `token`: JWT issuance and verification
//! - `blacklist`: In-memory token revocation
//! - `passphrase`: Argon2 passphrase hashing
//! - `user`, `station`, `weather`, `webhook`: Database operations per resource
//! - `smhi`: Client for official SMHI observations

pub mod blacklist;
pub mod passphrase;
pub mod smhi;
pub mod station;
pub mod token;
pub mod user;
pub mod weather;
pub mod webhook;

// Re-export commonly used types for convenience
pub use blacklist::TokenBlacklist;
pub use smhi::{Comparison, OfficialStation, SmhiClient, SmhiError};
pub use token::{Claims, TokenError, TokenKeys, TokenKind, TokenPair};
