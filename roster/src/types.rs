//! Common type definitions.
//!
//! # ID Types
//!
//! Rows in the store are keyed by `SERIAL` integers, wrapped in a type alias so
//! signatures say what the integer is:
//!
//! - [`UserId`]: User record identifier, assigned by the store

// Type aliases for IDs
pub type UserId = i32;
