pub mod session;
pub mod vote;

pub use session::SessionCommands;
pub use vote::VoteCommands;
