#![no_std]

//! Shared utility library for the marketplace contracts
//!
//! This library provides the common building blocks used by the marketplace:
//! - Fee math (whole-percent rates, checked arithmetic)
//! - Time utilities (ledger clock, expiry checks)
//! - Validation utilities
//! - Storage helpers (initialization, admin)
//! - Access control patterns
//! - Notification-sink event emitters
//! - Scoped reentrancy lock

pub mod access_control;
pub mod events;
pub mod math;
pub mod reentrancy;
pub mod storage;
pub mod time;
pub mod validation;

// Re-export commonly used items
pub use access_control::AccessControl;
pub use events::MarketEvents;
pub use math::{FeeMath, FEE_BASIS};
pub use reentrancy::ReentrancyLock;
pub use storage::Storage;
pub use time::TimeUtils;
pub use validation::Validation;
