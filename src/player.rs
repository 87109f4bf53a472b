//! Players and the results they collect over a rating period.

use std::hash::{Hash, Hasher};

use tracing::debug;

use crate::algorithm::ScaledPlayerResult;
use crate::{FromWithParameters, IntoWithParameters, Outcome, Parameters, Rating, RatingError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A [`Rating`] together with the identity of the player it belongs to.
///
/// Players are compared and hashed by their `id` only.
/// Rating a player never changes it in place, it yields a new [`Player`] with the same `id`.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Player<Id> {
    id: Id,
    rating: Rating,
}

impl<Id> Player<Id> {
    #[must_use]
    pub fn new(id: Id, rating: Rating) -> Self {
        Player { id, rating }
    }

    /// Creates a player with the starting values specified in `parameters`.
    #[must_use]
    pub fn default_from_parameters(id: Id, parameters: Parameters) -> Self {
        Player::new(id, Rating::default_from_parameters(parameters))
    }

    /// Creates a player from `[rating, deviation, volatility]`.
    ///
    /// # Panics
    ///
    /// This function panics under the same conditions as [`Rating::new`].
    #[must_use]
    pub fn from_array(array: [f64; 3], id: Id) -> Self {
        Player::new(id, Rating::from_array(array))
    }

    /// Returns `[rating, deviation, volatility]`. The identity is not part of the array.
    #[must_use]
    pub fn to_array(&self) -> [f64; 3] {
        self.rating.to_array()
    }

    #[must_use]
    pub fn id(&self) -> &Id {
        &self.id
    }

    #[must_use]
    pub fn rating(&self) -> Rating {
        self.rating
    }

    /// The same player with `rating` instead of their current rating.
    #[must_use]
    pub fn with_rating(self, rating: Rating) -> Self {
        Player { rating, ..self }
    }

    #[must_use]
    pub fn into_id(self) -> Id {
        self.id
    }
}

impl<Id: PartialEq> PartialEq for Player<Id> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<Id: Eq> Eq for Player<Id> {}

impl<Id: Hash> Hash for Player<Id> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// The outcome of a single game against `opponent`, seen from the rated player's perspective.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlayerResult<Id> {
    opponent: Player<Id>,
    outcome: Outcome,
}

impl<Id> PlayerResult<Id> {
    #[must_use]
    pub fn new(opponent: Player<Id>, outcome: Outcome) -> Self {
        PlayerResult { opponent, outcome }
    }

    #[must_use]
    pub fn opponent(&self) -> &Player<Id> {
        &self.opponent
    }

    #[must_use]
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }
}

impl<Id> FromWithParameters<&'_ PlayerResult<Id>> for ScaledPlayerResult {
    fn from_with_parameters(result: &'_ PlayerResult<Id>, parameters: Parameters) -> Self {
        ScaledPlayerResult::new(
            result.opponent.rating.into_with_parameters(parameters),
            result.outcome,
        )
    }
}

/// Returns the results with every opponent appearing at most once.
///
/// An opponent listed again with the same outcome is dropped.
///
/// # Errors
///
/// Returns [`RatingError::DuplicateOpponentConflict`] if an opponent is listed again with a different outcome.
pub fn unique_results<Id: PartialEq>(
    results: &[PlayerResult<Id>],
) -> Result<Vec<&PlayerResult<Id>>, RatingError> {
    let mut unique: Vec<(usize, &PlayerResult<Id>)> = Vec::with_capacity(results.len());

    for (second, result) in results.iter().enumerate() {
        match unique
            .iter()
            .find(|(_, seen)| seen.opponent.id == result.opponent.id)
        {
            Some(&(first, seen)) if seen.outcome != result.outcome => {
                return Err(RatingError::DuplicateOpponentConflict { first, second });
            }
            Some(_) => {
                debug!(index = second, "dropping repeated result against the same opponent");
            }
            None => unique.push((second, result)),
        }
    }

    Ok(unique.into_iter().map(|(_, result)| result).collect())
}

#[cfg(test)]
mod test {
    use std::collections::HashSet;

    use super::{unique_results, Player, PlayerResult};
    use crate::{Outcome, Parameters, Rating, RatingError};

    #[test]
    fn test_identity_equality() {
        let a = Player::new("a", Rating::new(1500.0, 200.0, 0.06));
        let a_later = Player::new("a", Rating::new(1600.0, 100.0, 0.05));
        let b = Player::new("b", Rating::new(1500.0, 200.0, 0.06));

        assert_eq!(a, a_later);
        assert_ne!(a, b);

        let set: HashSet<_> = [a, a_later, b].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_defaults() {
        let player = Player::default_from_parameters("p", Parameters::default());

        assert_eq!(player.to_array(), [1500.0, 350.0, 0.06]);
        assert_eq!(player.id(), &"p");
    }

    #[test]
    fn test_array_round_trip() {
        let player = Player::from_array([1723.4, 44.2, 0.123], "x");
        let copy = Player::from_array(player.to_array(), "x2");

        assert_eq!(copy.to_array(), [1723.4, 44.2, 0.123]);
        assert_eq!(copy.id(), &"x2");
    }

    #[test]
    fn test_unique_results() {
        let a = Player::from_array([1400.0, 30.0, 0.06], "a");
        let b = Player::from_array([1550.0, 100.0, 0.06], "b");

        let results = [
            PlayerResult::new(a.clone(), Outcome::Win),
            PlayerResult::new(b, Outcome::Loss),
            PlayerResult::new(a.clone(), Outcome::Win),
        ];
        let unique = unique_results(&results).unwrap();

        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].opponent().id(), &"a");
        assert_eq!(unique[1].opponent().id(), &"b");

        let conflicting = [
            PlayerResult::new(a.clone(), Outcome::Win),
            PlayerResult::new(a, Outcome::Draw),
        ];

        assert_eq!(
            unique_results(&conflicting),
            Err(RatingError::DuplicateOpponentConflict {
                first: 0,
                second: 1
            })
        );
    }
}
