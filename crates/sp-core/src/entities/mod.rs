//! Entity structs for Schelling Point domain objects.
//!
//! Each entity maps to a table in the libSQL database (see `sp-db` migrations).
//! All structs derive `Serialize`, `Deserialize`, and `JsonSchema` for JSON roundtrip
//! and schema validation.

mod session;
mod vote;

pub use session::{Session, SessionTally};
pub use vote::Vote;
