//! Domain types as they appear on the wire (camelCase JSON).
//!
//! The MongoDB backend keeps its own snake_case document types; see
//! [`crate::storage::mongodb::document`].

pub mod admin;
pub mod candidate;
pub mod stats;
pub mod vote;
