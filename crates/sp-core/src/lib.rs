//! # sp-core
//!
//! Core types, the quadratic-voting credit ledger, and error types for
//! Schelling Point.
//!
//! This crate provides the foundational types shared across all Schelling Point crates:
//! - The credit ledger: pure arithmetic converting a credit budget into votes
//! - The participant ballot used for optimistic vote updates
//! - Entity structs for sessions and votes
//! - Status, format, and sort enums with state machine transitions
//! - Cross-cutting error types
//! - CLI response types

pub mod ballot;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod identity;
pub mod ledger;
pub mod responses;
