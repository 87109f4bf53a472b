//! The [`RatingSystem`] handle, which applies the [`algorithm`] to [`Player`]s.

use tracing::debug;

use crate::algorithm::{self, ScaledPlayerResult};
use crate::player::unique_results;
use crate::{FromWithParameters, GameResult, Parameters, Player, PlayerResult, Rating, RatingError};

/// A stateless handle holding the [`Parameters`] every computation is done with.
///
/// It does not keep track of players. Every method takes the players it needs and returns new ones.
// In this case, just system::Rating does not tell enough about the purpose of the struct in my opinion.
#[allow(clippy::module_name_repetitions)]
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct RatingSystem {
    parameters: Parameters,
}

impl RatingSystem {
    /// Creates a [`RatingSystem`] computing with `parameters`.
    #[must_use]
    pub fn new(parameters: Parameters) -> Self {
        RatingSystem { parameters }
    }

    /// The parameters every computation of this system uses.
    #[must_use]
    pub fn parameters(&self) -> Parameters {
        self.parameters
    }

    /// Creates a player with the starting values of this system.
    #[must_use]
    pub fn new_player<Id>(&self, id: Id) -> Player<Id> {
        Player::default_from_parameters(id, self.parameters)
    }

    /// Creates a player with explicit values.
    ///
    /// # Panics
    ///
    /// This function panics if `deviation` was < 0 or `volatility` was <= 0.
    #[must_use]
    pub fn player_from<Id>(&self, rating: f64, deviation: f64, volatility: f64, id: Id) -> Player<Id> {
        Player::new(id, Rating::new(rating, deviation, volatility))
    }

    /// Closes a rating period for `player`.
    ///
    /// Every entry in `results` is seen from `player`'s perspective.
    /// If `results` is empty, only the rating deviation of `player` grows, see [`RatingSystem::decay`].
    ///
    /// # Errors
    ///
    /// - [`RatingError::SelfMatch`] if `player` appears among their own opponents.
    /// - [`RatingError::DuplicateOpponentConflict`] if an opponent appears twice with different outcomes.
    /// - Any error of [`algorithm::rate_player_scaled`].
    pub fn update<Id>(
        &self,
        player: &Player<Id>,
        results: &[PlayerResult<Id>],
    ) -> Result<Player<Id>, RatingError>
    where
        Id: PartialEq + Clone,
    {
        if results
            .iter()
            .any(|result| result.opponent().id() == player.id())
        {
            return Err(RatingError::SelfMatch);
        }

        let scaled_results: Vec<ScaledPlayerResult> = unique_results(results)?
            .into_iter()
            .map(|result| ScaledPlayerResult::from_with_parameters(result, self.parameters))
            .collect();

        debug!(opponents = scaled_results.len(), "closing rating period");

        let new_rating = algorithm::rate_player(player.rating(), &scaled_results, self.parameters)?;

        Ok(player.clone().with_rating(new_rating))
    }

    /// Closes a rating period in which `player` played no games.
    #[must_use]
    pub fn decay<Id: Clone>(&self, player: &Player<Id>) -> Player<Id> {
        player
            .clone()
            .with_rating(algorithm::decay_rating(player.rating(), self.parameters))
    }

    /// Rates both players of a single game as if it was the only game in their rating period.
    ///
    /// `result` names the player it was recorded for, see [`GameResult::perspective_of`].
    /// Both players are rated against the other's rating from before the game.
    ///
    /// # Errors
    ///
    /// - [`RatingError::SelfMatch`] if both players share the same identity.
    /// - [`RatingError::UnknownPerspective`] if `result` cannot be attributed to either player.
    /// - Any error of [`RatingSystem::update`].
    pub fn play_match<Id>(
        &self,
        players: [Player<Id>; 2],
        result: &GameResult<Id>,
    ) -> Result<[Player<Id>; 2], RatingError>
    where
        Id: PartialEq + Clone,
    {
        let [first, second] = players;

        if first.id() == second.id() {
            return Err(RatingError::SelfMatch);
        }

        let first_outcome = result.perspective_of(first.id(), second.id())?;
        let second_outcome = result.perspective_of(second.id(), first.id())?;

        let new_first = self.update(&first, &[PlayerResult::new(second.clone(), first_outcome)])?;
        let new_second = self.update(&second, &[PlayerResult::new(first, second_outcome)])?;

        Ok([new_first, new_second])
    }

    /// The expected score of `player` against `opponent`.
    #[must_use]
    pub fn expected_score<Id>(&self, player: &Player<Id>, opponent: &Player<Id>) -> f64 {
        algorithm::expected_score(player.rating(), opponent.rating(), self.parameters)
    }
}
