//! Repository modules for sessions, votes, and the session aggregate.
//!
//! Each module adds methods to `VoteService` via `impl VoteService` blocks.

pub mod aggregate;
pub mod session;
pub mod vote;
