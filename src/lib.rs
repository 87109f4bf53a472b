//! This crate provides a stateless implementation of the [Glicko-2](https://www.glicko.net/glicko/glicko2.pdf) rating system.
//! Given a player's rating and the results of one rating period, it computes the player's new rating.
//! Players who did not play during a rating period only have their rating deviation decayed.
//!
//! The [`algorithm`] module provides the individual steps of the Glicko-2 algorithm as free functions,
//! and the [`system`] module provides the [`RatingSystem`][system::RatingSystem] handle,
//! which holds a set of [`Parameters`] and exposes the whole pipeline, including two-player matches.
//!
//! ```
//! use glicko_2_period::{GameResult, RatingSystem};
//!
//! let system = RatingSystem::default();
//!
//! let alice = system.new_player("alice");
//! let bob = system.new_player("bob");
//!
//! let [alice, bob] = system.play_match([alice, bob], &GameResult::win("alice")).unwrap();
//!
//! assert!(alice.rating().rating() > bob.rating().rating());
//! ```
//!
//! No function in this crate mutates its inputs. Callers that rate the same player more than once
//! are responsible for ordering those updates.

#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![deny(
    rustdoc::broken_intra_doc_links,
    rustdoc::private_intra_doc_links,
    rustdoc::invalid_codeblock_attributes,
    rustdoc::invalid_rust_codeblocks
)]
#![forbid(unsafe_code)]

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod algorithm;
pub mod constants;
mod error;
pub mod outcome;
pub mod player;
pub mod system;

pub use error::RatingError;
pub use outcome::{GameResult, Outcome};
pub use player::{Player, PlayerResult};
pub use system::RatingSystem;

/// Trait to convert between two types with [`Parameters`].
/// Usually used to convert between the internal rating scaling and the public Glicko rating scaling.
///
/// A blanket implementation [`FromWithParameters<T>`] for any `T` is provided.
pub trait FromWithParameters<T: ?Sized> {
    /// Performs the conversion
    fn from_with_parameters(_: T, parameters: Parameters) -> Self;
}

impl<T> FromWithParameters<T> for T {
    fn from_with_parameters(t: T, _: Parameters) -> Self {
        t
    }
}

/// Trait to convert between two types with [`Parameters`].
/// Usually used to convert between the internal rating scaling and the public Glicko rating scaling.
///
/// This trait is automatically provided for any type `T` where [`FromWithParameters<T>`] is implemented.
pub trait IntoWithParameters<T> {
    /// Performs the conversion
    fn into_with_parameters(self, parameters: Parameters) -> T;
}

impl<T, U> IntoWithParameters<U> for T
where
    U: FromWithParameters<T>,
{
    fn into_with_parameters(self, parameters: Parameters) -> U {
        U::from_with_parameters(self, parameters)
    }
}

/// A Glicko-2 skill rating on the public scale.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rating {
    rating: f64,
    deviation: f64,
    volatility: f64,
}

impl FromWithParameters<ScaledRating> for Rating {
    /// "Step 8." Converts back to the public scale.
    fn from_with_parameters(scaled: ScaledRating, parameters: Parameters) -> Self {
        let public_rating =
            scaled.rating * parameters.scaling_factor + parameters.reference_rating;
        let public_deviation = scaled.deviation * parameters.scaling_factor;

        Rating::new(public_rating, public_deviation, scaled.volatility)
    }
}

impl From<Rating> for [f64; 3] {
    fn from(rating: Rating) -> Self {
        rating.to_array()
    }
}

impl From<[f64; 3]> for Rating {
    /// See [`Rating::from_array`].
    fn from(array: [f64; 3]) -> Self {
        Rating::from_array(array)
    }
}

impl Rating {
    /// Creates a new [`Rating`] with the specified parameters.
    ///
    /// # Panics
    ///
    /// This function panics if `deviation` was < 0 or `volatility` was <= 0.
    #[must_use]
    pub fn new(rating: f64, deviation: f64, volatility: f64) -> Self {
        assert!(deviation >= 0.0, "deviation < 0: {deviation}");
        assert!(volatility > 0.0, "volatility <= 0: {volatility}");

        Rating {
            rating,
            deviation,
            volatility,
        }
    }

    /// Creates a new rating with the starting values specified in `parameters`.
    #[must_use]
    pub fn default_from_parameters(parameters: Parameters) -> Self {
        Rating::new(
            parameters.reference_rating,
            parameters.start_deviation,
            parameters.start_volatility,
        )
    }

    /// Creates a [`Rating`] from `[rating, deviation, volatility]`.
    ///
    /// # Panics
    ///
    /// This function panics under the same conditions as [`Rating::new`].
    #[must_use]
    pub fn from_array([rating, deviation, volatility]: [f64; 3]) -> Self {
        Rating::new(rating, deviation, volatility)
    }

    /// Returns `[rating, deviation, volatility]`.
    #[must_use]
    pub fn to_array(self) -> [f64; 3] {
        [self.rating, self.deviation, self.volatility]
    }

    /// The rating value.
    #[must_use]
    pub fn rating(&self) -> f64 {
        self.rating
    }

    /// The rating deviation.
    #[must_use]
    pub fn deviation(&self) -> f64 {
        self.deviation
    }

    /// The rating volatility.
    #[must_use]
    pub fn volatility(&self) -> f64 {
        self.volatility
    }
}

/// A Glicko-2 rating scaled to the internal rating scale (`μ`, `φ` and `σ`).
/// See "Step 2." and "Step 8." in [Glickmans' paper](http://www.glicko.net/glicko/glicko2.pdf).
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct ScaledRating {
    rating: f64,
    deviation: f64,
    volatility: f64,
}

impl FromWithParameters<Rating> for ScaledRating {
    /// "Step 2." Converts to the internal scale.
    fn from_with_parameters(rating: Rating, parameters: Parameters) -> Self {
        let scaled_rating =
            (rating.rating - parameters.reference_rating) / parameters.scaling_factor;
        let scaled_deviation = rating.deviation / parameters.scaling_factor;

        ScaledRating::new(scaled_rating, scaled_deviation, rating.volatility)
    }
}

impl ScaledRating {
    /// Creates a new [`ScaledRating`] with the specified parameters.
    ///
    /// # Panics
    ///
    /// This function panics if `deviation` was < 0 or `volatility` was <= 0.
    #[must_use]
    pub fn new(rating: f64, deviation: f64, volatility: f64) -> Self {
        assert!(deviation >= 0.0, "deviation < 0: {deviation}");
        assert!(volatility > 0.0, "volatility <= 0: {volatility}");

        ScaledRating {
            rating,
            deviation,
            volatility,
        }
    }

    /// The rating value `μ`.
    #[must_use]
    pub fn rating(&self) -> f64 {
        self.rating
    }

    /// The rating deviation `φ`.
    #[must_use]
    pub fn deviation(&self) -> f64 {
        self.deviation
    }

    /// The rating volatility `σ`. Volatility is not rescaled.
    #[must_use]
    pub fn volatility(&self) -> f64 {
        self.volatility
    }
}

/// The parameters used by the Glicko-2 algorithm.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Parameters {
    reference_rating: f64,
    scaling_factor: f64,
    start_deviation: f64,
    start_volatility: f64,
    volatility_change: f64,
    convergence_tolerance: f64,
    max_iterations: u32,
}

impl Parameters {
    /// Creates [`Parameters`] with the given parameters.
    ///
    /// # Arguments
    ///
    /// * `reference_rating` - The rating value a new player starts out with, and the center of the internal scale.
    /// See also [`constants::DEFAULT_REFERENCE_RATING`].
    /// * `scaling_factor` - The ratio between the public and the internal scale.
    /// See also "Step 2." in [Glickman's paper](http://www.glicko.net/glicko/glicko2.pdf) and [`constants::DEFAULT_SCALING_FACTOR`].
    /// * `start_deviation` - The rating deviation a new player starts out with.
    /// Rating deviations are never allowed to grow beyond this value. See also [`constants::DEFAULT_START_DEVIATION`].
    /// * `start_volatility` - The rating volatility a new player starts out with. See also [`constants::DEFAULT_START_VOLATILITY`].
    /// * `volatility_change` - Also called "system constant" or "τ".
    /// This constant constraints change in volatility over time.
    /// Reasonable choices are between 0.3 and 1.2.
    /// Small values prevent volatility and therefore rating from changing too much after improbable results.
    /// See also "Step 1." in [Glickman's paper](http://www.glicko.net/glicko/glicko2.pdf) and [`constants::DEFAULT_VOLATILITY_CHANGE`].
    /// * `convergence_tolerance` - The cutoff value for the converging loop algorithm in "Step 5.1." in [Glickman's paper](http://www.glicko.net/glicko/glicko2.pdf).
    /// See also [`constants::DEFAULT_CONVERGENCE_TOLERANCE`].
    /// * `max_iterations` - The iteration cap for the converging loop algorithm. See also [`constants::DEFAULT_MAX_ITERATIONS`].
    ///
    /// # Panics
    ///
    /// This function panics if `scaling_factor`, `start_deviation`, `start_volatility`, `volatility_change`,
    /// or `convergence_tolerance` was <= 0, or if `max_iterations` was 0.
    #[must_use]
    pub fn new(
        reference_rating: f64,
        scaling_factor: f64,
        start_deviation: f64,
        start_volatility: f64,
        volatility_change: f64,
        convergence_tolerance: f64,
        max_iterations: u32,
    ) -> Self {
        assert!(scaling_factor > 0.0, "scaling_factor <= 0: {scaling_factor}");
        assert!(
            start_deviation > 0.0,
            "start_deviation <= 0: {start_deviation}"
        );
        assert!(
            start_volatility > 0.0,
            "start_volatility <= 0: {start_volatility}"
        );
        assert!(
            volatility_change > 0.0,
            "volatility_change <= 0: {volatility_change}"
        );
        assert!(
            convergence_tolerance > 0.0,
            "convergence_tolerance <= 0: {convergence_tolerance}"
        );
        assert!(max_iterations > 0, "max_iterations == 0");

        Parameters {
            reference_rating,
            scaling_factor,
            start_deviation,
            start_volatility,
            volatility_change,
            convergence_tolerance,
            max_iterations,
        }
    }

    /// Creates [`Parameters`] with the same parameters as `self`, only changing the volatility change to `volatility_change`.
    ///
    /// # Panics
    ///
    /// This function panics if `volatility_change` was <= 0.
    #[must_use]
    pub fn with_volatility_change(self, volatility_change: f64) -> Self {
        assert!(
            volatility_change > 0.0,
            "volatility_change <= 0: {volatility_change}"
        );

        Parameters {
            volatility_change,
            ..self
        }
    }

    /// Creates [`Parameters`] with the same parameters as `self`, only changing the convergence tolerance to `convergence_tolerance`.
    ///
    /// # Panics
    ///
    /// This function panics if `convergence_tolerance` was <= 0.
    #[must_use]
    pub fn with_convergence_tolerance(self, convergence_tolerance: f64) -> Self {
        assert!(
            convergence_tolerance > 0.0,
            "convergence_tolerance <= 0: {convergence_tolerance}"
        );

        Parameters {
            convergence_tolerance,
            ..self
        }
    }

    /// Creates [`Parameters`] with the same parameters as `self`, only changing the iteration cap to `max_iterations`.
    ///
    /// # Panics
    ///
    /// This function panics if `max_iterations` was 0.
    #[must_use]
    pub fn with_max_iterations(self, max_iterations: u32) -> Self {
        assert!(max_iterations > 0, "max_iterations == 0");

        Parameters {
            max_iterations,
            ..self
        }
    }

    /// The rating value a new player starts out with, and the center of the internal scale.
    ///
    /// See also [`Rating::default_from_parameters`], [`constants::DEFAULT_REFERENCE_RATING`].
    #[must_use]
    pub fn reference_rating(&self) -> f64 {
        self.reference_rating
    }

    /// See also [`constants::DEFAULT_SCALING_FACTOR`].
    #[must_use]
    pub fn scaling_factor(&self) -> f64 {
        self.scaling_factor
    }

    /// The rating deviation a new player starts out with. Also the upper bound for any rating deviation.
    ///
    /// See also [`Rating::default_from_parameters`], [`constants::DEFAULT_START_DEVIATION`].
    #[must_use]
    pub fn start_deviation(&self) -> f64 {
        self.start_deviation
    }

    /// The rating volatility a new player starts out with.
    ///
    /// See also [`Rating::default_from_parameters`], [`constants::DEFAULT_START_VOLATILITY`].
    #[must_use]
    pub fn start_volatility(&self) -> f64 {
        self.start_volatility
    }

    /// `volatility_change` - Also called "system constant" or "τ".
    /// This constant constraints change in volatility over time.
    ///
    /// See also "Step 1." in [Glickman's paper](http://www.glicko.net/glicko/glicko2.pdf) and [`constants::DEFAULT_VOLATILITY_CHANGE`].
    #[must_use]
    pub fn volatility_change(&self) -> f64 {
        self.volatility_change
    }

    /// The cutoff value for the converging loop algorithm in "Step 5.1." in [Glickman's paper](http://www.glicko.net/glicko/glicko2.pdf).
    ///
    /// See also [`constants::DEFAULT_CONVERGENCE_TOLERANCE`].
    #[must_use]
    pub fn convergence_tolerance(&self) -> f64 {
        self.convergence_tolerance
    }

    /// See also [`constants::DEFAULT_MAX_ITERATIONS`].
    #[must_use]
    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }
}

impl Default for Parameters {
    /// Creates a default version of this struct with the parameters defined in [`constants`].
    fn default() -> Self {
        Parameters {
            reference_rating: constants::DEFAULT_REFERENCE_RATING,
            scaling_factor: constants::DEFAULT_SCALING_FACTOR,
            start_deviation: constants::DEFAULT_START_DEVIATION,
            start_volatility: constants::DEFAULT_START_VOLATILITY,
            volatility_change: constants::DEFAULT_VOLATILITY_CHANGE,
            convergence_tolerance: constants::DEFAULT_CONVERGENCE_TOLERANCE,
            max_iterations: constants::DEFAULT_MAX_ITERATIONS,
        }
    }
}
