use thiserror::Error;

/// Errors that can occur while rating players.
#[derive(Clone, Copy, PartialEq, Debug, Error)]
pub enum RatingError {
    /// A raw value could not be interpreted as an [`Outcome`][crate::Outcome].
    #[error("invalid outcome value: {0}")]
    InvalidOutcome(f64),

    /// The estimated variance was requested for an empty set of results.
    /// Players without results must go through decay instead.
    #[error("estimated variance requires at least one result")]
    EmptyVarianceInput,

    /// The estimated variance is not a finite positive number,
    /// usually because every expected score saturated at 0 or 1.
    #[error("estimated variance is degenerate: {0}")]
    DegenerateVariance(f64),

    /// The volatility solver did not converge within the configured iteration cap.
    #[error("volatility solver did not converge within {iterations} iterations")]
    SolverNonConvergence { iterations: u32 },

    /// The same opponent appears twice in one rating period with different outcomes.
    /// The indices refer to positions in the results slice.
    #[error("opponent at index {second} conflicts with the result at index {first}")]
    DuplicateOpponentConflict { first: usize, second: usize },

    /// A match outcome names neither player, or a decisive outcome names nobody.
    #[error("match outcome cannot be resolved to either player")]
    UnknownPerspective,

    /// Both players of a match share the same identity.
    #[error("a player cannot play a match against themselves")]
    SelfMatch,
}
