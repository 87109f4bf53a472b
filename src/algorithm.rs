//! The steps of the Glicko-2 algorithm as described in [Glickman's paper](http://www.glicko.net/glicko/glicko2.pdf).
//!
//! Most functions here work on the internal scale ([`ScaledRating`]).
//! [`rate_player`] and [`decay_rating`] wrap them for ratings on the public scale.

use std::f64::consts::PI;

use tracing::{debug, trace, warn};

use crate::{IntoWithParameters, Outcome, Parameters, Rating, RatingError, ScaledRating};

/// The outcome of a game against an opponent whose rating is on the internal scale.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct ScaledPlayerResult {
    opponent: ScaledRating,
    outcome: Outcome,
}

impl ScaledPlayerResult {
    #[must_use]
    pub fn new(opponent: ScaledRating, outcome: Outcome) -> Self {
        ScaledPlayerResult { opponent, outcome }
    }

    #[must_use]
    pub fn opponent(&self) -> ScaledRating {
        self.opponent
    }

    #[must_use]
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    #[must_use]
    pub fn score(&self) -> f64 {
        self.outcome.score()
    }
}

/// The quantities of "Step 3." and "Step 4.", computed over the same set of results.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Estimates {
    estimated_variance: f64,
    improvement_sum: f64,
}

impl Estimates {
    /// `v`, the estimated variance of the player's rating based only on game outcomes.
    #[must_use]
    pub fn estimated_variance(&self) -> f64 {
        self.estimated_variance
    }

    /// `Δ`, the estimated improvement in rating.
    #[must_use]
    pub fn estimated_improvement(&self) -> f64 {
        self.estimated_variance * self.improvement_sum
    }

    /// `Σ g(φ_j)(s_j - E(μ, μ_j, φ_j))`, the sum that `Δ` and the new rating are based on.
    #[must_use]
    pub fn improvement_sum(&self) -> f64 {
        self.improvement_sum
    }
}

/// Rates a player on the public scale.
///
/// If `results` is empty, this is [`decay_rating`].
/// The new rating deviation is capped at [`Parameters::start_deviation`].
///
/// # Errors
///
/// See [`rate_player_scaled`].
pub fn rate_player(
    player_rating: Rating,
    results: &[ScaledPlayerResult],
    parameters: Parameters,
) -> Result<Rating, RatingError> {
    if results.is_empty() {
        return Ok(decay_rating(player_rating, parameters));
    }

    let new_rating: Rating =
        rate_player_scaled(player_rating.into_with_parameters(parameters), results, parameters)?
            .into_with_parameters(parameters);

    Ok(clamp_deviation(new_rating, parameters))
}

/// Closes a rating period for a player with at least one result.
///
/// # Arguments
///
/// * `player_rating` - The rating of the player **at the onset of the rating period**
/// * `results` - The results of the player that occurred in the rating period
/// * `parameters`
///
/// # Errors
///
/// Returns [`RatingError::EmptyVarianceInput`] if `results` is empty, [`RatingError::DegenerateVariance`]
/// if the results carry no information, and [`RatingError::SolverNonConvergence`] if the new volatility
/// could not be found.
pub fn rate_player_scaled(
    player_rating: ScaledRating,
    results: &[ScaledPlayerResult],
    parameters: Parameters,
) -> Result<ScaledRating, RatingError> {
    // Step 1. (initialising) doesn't apply, we have already set the starting ratings.
    // Step 3. and Step 4.
    let estimates = calculate_estimates(player_rating, results)?;

    // Step 5.
    let new_volatility = calculate_new_volatility(estimates, player_rating, parameters)?;

    // Step 6.
    let pre_rating_period_value = calculate_pre_rating_period_value(new_volatility, player_rating);

    // Step 7.
    let new_deviation = calculate_new_rating_deviation(
        pre_rating_period_value,
        estimates.estimated_variance(),
    );
    let new_rating = player_rating.rating() + new_deviation * new_deviation * estimates.improvement_sum();

    Ok(ScaledRating::new(new_rating, new_deviation, new_volatility))
}

/// Rating of a player who played no games during a rating period.
/// Only "Step 6." applies: the rating deviation grows according to the volatility,
/// up to [`Parameters::start_deviation`].
#[must_use]
pub fn decay_rating(player_rating: Rating, parameters: Parameters) -> Rating {
    let scaled: ScaledRating = player_rating.into_with_parameters(parameters);

    let new_deviation =
        calculate_pre_rating_period_value(scaled.volatility(), scaled) * parameters.scaling_factor();

    let decayed = Rating::new(
        player_rating.rating(),
        new_deviation,
        player_rating.volatility(),
    );

    debug!(
        before = player_rating.deviation(),
        after = decayed.deviation(),
        "decayed rating deviation"
    );

    clamp_deviation(decayed, parameters)
}

/// The expected score of `player_rating` against `opponent_rating`, on the public scale.
#[must_use]
pub fn expected_score(player_rating: Rating, opponent_rating: Rating, parameters: Parameters) -> f64 {
    let player: ScaledRating = player_rating.into_with_parameters(parameters);
    let opponent: ScaledRating = opponent_rating.into_with_parameters(parameters);

    calculate_e(
        calculate_g(opponent.deviation()),
        player.rating(),
        opponent.rating(),
    )
}

fn clamp_deviation(rating: Rating, parameters: Parameters) -> Rating {
    Rating::new(
        rating.rating(),
        rating.deviation().min(parameters.start_deviation()),
        rating.volatility(),
    )
}

/// Step 3. and Step 4.
///
/// # Errors
///
/// Returns [`RatingError::EmptyVarianceInput`] if `results` is empty,
/// and [`RatingError::DegenerateVariance`] if the estimated variance is not a finite positive number.
pub fn calculate_estimates(
    player_rating: ScaledRating,
    results: &[ScaledPlayerResult],
) -> Result<Estimates, RatingError> {
    if results.is_empty() {
        return Err(RatingError::EmptyVarianceInput);
    }

    let (variance_sum, improvement_sum) =
        results
            .iter()
            .fold((0.0, 0.0), |(variance_sum, improvement_sum), result| {
                let opponent_rating = result.opponent;

                let g = calculate_g(opponent_rating.deviation());
                let e = calculate_e(g, player_rating.rating(), opponent_rating.rating());

                (
                    variance_sum + g * g * e * (1.0 - e),
                    improvement_sum + g * (result.score() - e),
                )
            });

    let estimated_variance = 1.0 / variance_sum;

    if !estimated_variance.is_finite() || estimated_variance <= 0.0 {
        return Err(RatingError::DegenerateVariance(estimated_variance));
    }

    Ok(Estimates {
        estimated_variance,
        improvement_sum,
    })
}

/// `g(φ)`, which reduces the impact of games against opponents with a high rating deviation.
#[must_use]
pub fn calculate_g(deviation: f64) -> f64 {
    1.0 / f64::sqrt(1.0 + 3.0 * deviation * deviation / (PI * PI))
}

/// `E(μ, μ_j, φ_j)`, where `g` is `g(φ_j)`.
#[must_use]
pub fn calculate_e(g: f64, player_rating: f64, opponent_rating: f64) -> f64 {
    1.0 / (1.0 + f64::exp(-g * (player_rating - opponent_rating)))
}

/// Step 5.
///
/// Finds the new volatility with the Illinois algorithm.
/// Both the bracket search and the iteration are capped by [`Parameters::max_iterations`].
///
/// # Errors
///
/// Returns [`RatingError::SolverNonConvergence`] if either loop hits the cap,
/// or the iteration leaves the finite numbers.
pub fn calculate_new_volatility(
    estimates: Estimates,
    player_rating: ScaledRating,
    parameters: Parameters,
) -> Result<f64, RatingError> {
    let deviation = player_rating.deviation();
    let deviation_sq = deviation * deviation;
    let current_volatility = player_rating.volatility();

    let estimated_variance = estimates.estimated_variance();
    let estimated_improvement = estimates.estimated_improvement();
    let estimated_improvement_sq = estimated_improvement * estimated_improvement;

    let volatility_change = parameters.volatility_change();
    let max_iterations = parameters.max_iterations();

    // 1.
    let ln_volatility_sq = f64::ln(current_volatility * current_volatility);

    let f = |x: f64| {
        let x_exp = f64::exp(x);

        let tmp_1 = x_exp * (estimated_improvement_sq - deviation_sq - estimated_variance - x_exp);

        let tmp_2 = 2.0 * {
            let tmp = deviation_sq + estimated_variance + x_exp;
            tmp * tmp
        };

        let tmp_3 = x - ln_volatility_sq;

        let tmp_4 = volatility_change * volatility_change;

        tmp_1 / tmp_2 - tmp_3 / tmp_4
    };

    // 2.
    let mut a = ln_volatility_sq;

    let mut b = if estimated_improvement_sq > deviation_sq + estimated_variance {
        debug!("bracketing volatility from the estimated improvement");

        f64::ln(estimated_improvement_sq - deviation_sq - estimated_variance)
    } else {
        // (i)
        let mut k: u32 = 1;

        loop {
            // (ii)
            let estimated_b = a - f64::from(k) * volatility_change;

            if f(estimated_b) >= 0.0 {
                debug!(k, "bracketing volatility by search");

                break estimated_b;
            }

            if k >= max_iterations {
                warn!(k, "no bracket for the new volatility");

                return Err(RatingError::SolverNonConvergence { iterations: k });
            }

            k += 1;
        }
    };

    // 3.
    let mut f_a = f(a);
    let mut f_b = f(b);

    // 4.
    let mut iterations: u32 = 0;

    while f64::abs(b - a) > parameters.convergence_tolerance() {
        if iterations >= max_iterations {
            warn!(iterations, a, b, "volatility iteration did not converge");

            return Err(RatingError::SolverNonConvergence { iterations });
        }

        iterations += 1;

        // (a)
        let c = a + (a - b) * f_a / (f_b - f_a);

        if !c.is_finite() {
            warn!(iterations, a, b, "volatility iteration diverged");

            return Err(RatingError::SolverNonConvergence { iterations });
        }

        let f_c = f(c);

        // (b)
        if f_c * f_b <= 0.0 {
            a = b;
            f_a = f_b;
        } else {
            f_a /= 2.0;
        }

        // (c)
        b = c;
        f_b = f_c;

        trace!(iterations, a, b, "volatility iteration");

        // (d) checked by loop
    }

    debug!(iterations, "volatility iteration converged");

    // 5.
    Ok(f64::exp(a / 2.0))
}

/// Step 6.
#[must_use]
fn calculate_pre_rating_period_value(new_volatility: f64, player_rating: ScaledRating) -> f64 {
    f64::hypot(player_rating.deviation(), new_volatility)
}

/// Step 7.1.
#[must_use]
fn calculate_new_rating_deviation(pre_rating_period_value: f64, estimated_variance: f64) -> f64 {
    1.0 / f64::sqrt(
        1.0 / (pre_rating_period_value * pre_rating_period_value) + 1.0 / estimated_variance,
    )
}

#[cfg(test)]
mod test {
    use approx::assert_abs_diff_eq;

    use crate::{IntoWithParameters, Outcome, Parameters, Rating, RatingError, ScaledRating};

    use super::ScaledPlayerResult;

    fn paper_example() -> (Parameters, Rating, [ScaledPlayerResult; 3]) {
        let parameters = Parameters::default().with_volatility_change(0.5);

        let player = Rating::new(1500.0, 200.0, 0.06);

        // Volatility on opponents is not specified in the paper and doesn't matter in the calculation.
        let result = |rating, deviation, outcome| {
            ScaledPlayerResult::new(
                Rating::new(rating, deviation, 0.06).into_with_parameters(parameters),
                outcome,
            )
        };

        let results = [
            result(1400.0, 30.0, Outcome::Win),
            result(1550.0, 100.0, Outcome::Loss),
            result(1700.0, 300.0, Outcome::Loss),
        ];

        (parameters, player, results)
    }

    #[test]
    fn test_g_bounds() {
        assert_abs_diff_eq!(super::calculate_g(0.0), 1.0);

        for deviation in [1e-9, 0.1, 0.5, 1.0, 2.0, 10.0, 1e6] {
            let g = super::calculate_g(deviation);

            assert!(g > 0.0 && g <= 1.0, "g({deviation}) = {g}");
        }

        assert!(super::calculate_g(2.0) < super::calculate_g(1.0));
    }

    #[test]
    fn test_e_ordering() {
        let g = super::calculate_g(1.0);

        assert!(super::calculate_e(g, 0.5, -0.5) > 0.5);
        assert!(super::calculate_e(g, -0.5, 0.5) < 0.5);
        assert_abs_diff_eq!(super::calculate_e(g, 0.3, 0.3), 0.5);
    }

    #[test]
    fn test_e_symmetry() {
        let parameters = Parameters::default();

        let a = Rating::new(1500.0, 200.0, 0.06);
        let b = Rating::new(1400.0, 200.0, 0.06);

        let e_ab = super::expected_score(a, b, parameters);
        let e_ba = super::expected_score(b, a, parameters);

        assert!(e_ab > 0.5);
        assert_abs_diff_eq!(e_ab + e_ba, 1.0, epsilon = 1e-4);

        // With different deviations the expected scores don't add up to 1.
        let certain = Rating::new(1400.0, 30.0, 0.06);

        let e_ac = super::expected_score(a, certain, parameters);
        let e_ca = super::expected_score(certain, a, parameters);

        assert!(e_ac > 0.0 && e_ac < 1.0);
        assert!(e_ac + e_ca > 1.0);
    }

    /// This tests the intermediate values of the example calculation in [Glickman's paper](http://www.glicko.net/glicko/glicko2.pdf).
    #[test]
    fn test_paper_example_estimates() {
        let (parameters, player, results) = paper_example();

        let estimates =
            super::calculate_estimates(player.into_with_parameters(parameters), &results).unwrap();

        assert_abs_diff_eq!(estimates.estimated_variance(), 1.7785, epsilon = 1e-3);
        assert_abs_diff_eq!(estimates.estimated_improvement(), -0.4834, epsilon = 1e-3);
        assert_abs_diff_eq!(
            estimates.improvement_sum(),
            estimates.estimated_improvement() / estimates.estimated_variance(),
            epsilon = 1e-12
        );
    }

    /// This tests the example calculation in [Glickman's paper](http://www.glicko.net/glicko/glicko2.pdf).
    #[test]
    fn test_paper_example() {
        let (parameters, player, results) = paper_example();

        let new_rating = super::rate_player(player, &results, parameters).unwrap();

        assert_abs_diff_eq!(new_rating.rating(), 1464.06, epsilon = 0.01);
        assert_abs_diff_eq!(new_rating.deviation(), 151.52, epsilon = 0.01);
        assert_abs_diff_eq!(new_rating.volatility(), 0.05999, epsilon = 0.0001);
    }

    #[test]
    fn test_iteration_cap() {
        let (parameters, player, results) = paper_example();

        let parameters = parameters.with_max_iterations(1);

        assert_eq!(
            super::rate_player(player, &results, parameters),
            Err(RatingError::SolverNonConvergence { iterations: 1 })
        );
    }

    #[test]
    fn test_bracket_search_cap() {
        // A large system constant makes the first bracket guess fall short, so the search needs k > 1.
        let parameters = Parameters::default().with_volatility_change(5.0);

        let player = Rating::new(1500.0, 10.0, 3.0);
        let opponent: ScaledRating = Rating::new(1500.0, 10.0, 0.06).into_with_parameters(parameters);
        let results = vec![ScaledPlayerResult::new(opponent, Outcome::Draw); 50];

        assert_eq!(
            super::rate_player(player, &results, parameters.with_max_iterations(1)),
            Err(RatingError::SolverNonConvergence { iterations: 1 })
        );

        let new_rating = super::rate_player(player, &results, parameters).unwrap();

        assert_abs_diff_eq!(new_rating.rating(), 1500.0, epsilon = 1e-9);
        assert!(new_rating.volatility() < player.volatility());

        // The root stays bracketed, so the result is within the tolerance of a far tighter solve.
        let precise = super::rate_player(
            player,
            &results,
            parameters.with_convergence_tolerance(1e-12),
        )
        .unwrap();

        assert_abs_diff_eq!(
            f64::ln(new_rating.volatility().powi(2)),
            f64::ln(precise.volatility().powi(2)),
            epsilon = parameters.convergence_tolerance() + 1e-9
        );
    }

    #[test]
    fn test_loose_tolerance_stays_close() {
        let (parameters, player, results) = paper_example();

        let precise = super::rate_player(player, &results, parameters).unwrap();
        let loose =
            super::rate_player(player, &results, parameters.with_convergence_tolerance(1e-2))
                .unwrap();

        assert_abs_diff_eq!(loose.volatility(), precise.volatility(), epsilon = 1e-3);
    }

    #[test]
    fn test_surprising_win_raises_volatility() {
        let parameters = Parameters::default();

        let player = Rating::new(1500.0, 50.0, 0.06);
        let results = [ScaledPlayerResult::new(
            Rating::new(1700.0, 50.0, 0.06).into_with_parameters(parameters),
            Outcome::Win,
        )];

        // This takes the branch where the bracket comes from the estimated improvement.
        let estimates =
            super::calculate_estimates(player.into_with_parameters(parameters), &results).unwrap();
        let deviation = 50.0 / parameters.scaling_factor();
        assert!(
            estimates.estimated_improvement().powi(2)
                > deviation * deviation + estimates.estimated_variance()
        );

        let new_rating = super::rate_player(player, &results, parameters).unwrap();

        assert!(new_rating.rating() > player.rating());
        assert!(new_rating.volatility() > player.volatility());
    }

    #[test]
    fn test_empty_results() {
        let parameters = Parameters::default();
        let player: ScaledRating = Rating::new(1500.0, 200.0, 0.06).into_with_parameters(parameters);

        assert_eq!(
            super::calculate_estimates(player, &[]),
            Err(RatingError::EmptyVarianceInput)
        );
        assert_eq!(
            super::rate_player_scaled(player, &[], parameters),
            Err(RatingError::EmptyVarianceInput)
        );
    }

    #[test]
    fn test_degenerate_variance() {
        let parameters = Parameters::default();

        let player = Rating::new(1500.0, 200.0, 0.06);
        let results = [ScaledPlayerResult::new(
            Rating::new(1.0e6, 0.0, 0.06).into_with_parameters(parameters),
            Outcome::Loss,
        )];

        assert!(matches!(
            super::rate_player(player, &results, parameters),
            Err(RatingError::DegenerateVariance(_))
        ));
    }

    #[test]
    fn test_decay() {
        let parameters = Parameters::default();
        let player = Rating::new(1500.0, 200.0, 0.06);

        let decayed = super::rate_player(player, &[], parameters).unwrap();

        let deviation = 200.0 / parameters.scaling_factor();
        let expected = f64::hypot(deviation, 0.06) * parameters.scaling_factor();

        assert_abs_diff_eq!(decayed.deviation(), expected, epsilon = 1e-9);
        assert!(decayed.deviation() > player.deviation());
        assert_eq!(decayed.rating(), player.rating());
        assert_eq!(decayed.volatility(), player.volatility());
    }

    #[test]
    fn test_decay_is_capped() {
        let parameters = Parameters::default();

        let decayed = super::decay_rating(Rating::new(1800.0, 349.9, 0.5), parameters);
        assert_eq!(decayed.deviation(), 350.0);

        let decayed = super::decay_rating(Rating::new(1800.0, 350.0, 0.06), parameters);
        assert_eq!(decayed.to_array(), [1800.0, 350.0, 0.06]);
    }

    #[test]
    fn test_deviation_is_capped_after_games() {
        let parameters = Parameters::default();

        // A single draw against an unknown opponent barely informs the rating,
        // while the large volatility alone pushes the deviation past the start deviation.
        let player = Rating::new(1500.0, 350.0, 3.0);
        let results = [ScaledPlayerResult::new(
            Rating::new(1500.0, 350.0, 0.06).into_with_parameters(parameters),
            Outcome::Draw,
        )];

        let new_rating = super::rate_player(player, &results, parameters).unwrap();

        assert_eq!(new_rating.deviation(), 350.0);
        assert_eq!(new_rating.rating(), 1500.0);
        assert!(new_rating.volatility() < 3.0);
    }
}
