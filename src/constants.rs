//! Various constants defined or recommended in [Glickman's paper](http://www.glicko.net/glicko/glicko2.pdf),
//! including defaults for [`Parameters`][crate::Parameters].

/// Default constant for converting between the original Glicko scale, and the internal Glicko-2 scale.
///
/// See also "Step 2." and "Step 8." in [Glickman's paper](http://www.glicko.net/glicko/glicko2.pdf).
pub const DEFAULT_SCALING_FACTOR: f64 = 173.7178;

/// Default reference rating as defined by "Step 1." in [Glickman's paper](http://www.glicko.net/glicko/glicko2.pdf).
/// New players start out with this rating, and it is the center of the internal scale.
pub const DEFAULT_REFERENCE_RATING: f64 = 1500.0;

/// Default start rating deviation as defined by "Step 1." in [Glickman's paper](http://www.glicko.net/glicko/glicko2.pdf).
///
/// This is also the upper bound a rating deviation gets clamped to after any update.
pub const DEFAULT_START_DEVIATION: f64 = 350.0;

/// Default start volatility as defined by "Step 1." in [Glickman's paper](http://www.glicko.net/glicko/glicko2.pdf).
pub const DEFAULT_START_VOLATILITY: f64 = 0.06;

/// Default system constant ("τ").
/// This is the value used in the worked example of [Glickman's paper](http://www.glicko.net/glicko/glicko2.pdf),
/// inside the reasonable range of `0.3` to `1.2` described by "Step 1.".
pub const DEFAULT_VOLATILITY_CHANGE: f64 = 0.5;

/// Default cutoff value for the converging loop algorithm as recommended by "Step 5.1." in [Glickman's paper](http://www.glicko.net/glicko/glicko2.pdf).
/// Higher values may result in slightly better performance at the cost of less accuracy.
pub const DEFAULT_CONVERGENCE_TOLERANCE: f64 = 0.000_001;

/// Default maximum number of iterations for the converging loop algorithm for "Step 5.4." in [Glickman's paper](http://www.glicko.net/glicko/glicko2.pdf).
/// The same cap bounds the bracket search in "Step 5.2.".
///
/// Exceeding it yields [`RatingError::SolverNonConvergence`][crate::RatingError::SolverNonConvergence].
pub const DEFAULT_MAX_ITERATIONS: u32 = 10_000;
