pub mod cost;
pub mod credits;
pub mod dispatch;
pub mod rebuild;
pub mod session;
pub mod shared;
pub mod vote;
pub mod votes;

/// How a successfully handled command should end the process.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    Done,
    /// A vote change was refused by the budget gate. Output was printed
    /// normally but the process exits non-zero.
    BudgetRejected,
}
