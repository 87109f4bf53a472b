//! Game outcomes, both from a single player's perspective ([`Outcome`])
//! and tied to the player they were recorded for ([`GameResult`]).

use crate::RatingError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Score of a lost game.
pub const LOSS_SCORE: f64 = 0.0;
/// Score of a drawn game.
pub const DRAW_SCORE: f64 = 0.5;
/// Score of a won game.
pub const WIN_SCORE: f64 = 1.0;

/// The outcome of a single game from one player's perspective.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Outcome {
    Loss,
    Draw,
    Win,
}

impl Outcome {
    /// The score `s_j` used by the algorithm: `0` for a loss, `0.5` for a draw, `1` for a win.
    #[must_use]
    pub fn score(self) -> f64 {
        match self {
            Outcome::Loss => LOSS_SCORE,
            Outcome::Draw => DRAW_SCORE,
            Outcome::Win => WIN_SCORE,
        }
    }

    /// The same game seen from the opponent's side.
    #[must_use]
    pub fn invert(self) -> Self {
        match self {
            Outcome::Win => Outcome::Loss,
            Outcome::Draw => Outcome::Draw,
            Outcome::Loss => Outcome::Win,
        }
    }
}

/// Interprets `0`, `1` and `2` as [`Outcome::Loss`], [`Outcome::Draw`] and [`Outcome::Win`].
impl TryFrom<u8> for Outcome {
    type Error = RatingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Outcome::Loss),
            1 => Ok(Outcome::Draw),
            2 => Ok(Outcome::Win),
            other => Err(RatingError::InvalidOutcome(f64::from(other))),
        }
    }
}

/// Interprets a score of exactly `0`, `0.5` or `1`.
impl TryFrom<f64> for Outcome {
    type Error = RatingError;

    #[allow(clippy::float_cmp)] // Scores are exact values, not results of arithmetic.
    fn try_from(score: f64) -> Result<Self, Self::Error> {
        if score == LOSS_SCORE {
            Ok(Outcome::Loss)
        } else if score == DRAW_SCORE {
            Ok(Outcome::Draw)
        } else if score == WIN_SCORE {
            Ok(Outcome::Win)
        } else {
            Err(RatingError::InvalidOutcome(score))
        }
    }
}

impl From<Outcome> for f64 {
    fn from(outcome: Outcome) -> Self {
        outcome.score()
    }
}

/// An [`Outcome`] recorded from the perspective of one player.
///
/// If player `A` sees a game as a win, player `B` sees it as a loss.
/// A draw does not need to name a player.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GameResult<Id> {
    outcome: Outcome,
    player: Option<Id>,
}

impl<Id> GameResult<Id> {
    /// Creates a [`GameResult`] seen from `player`'s perspective, or from nobody's if `player` is [`None`].
    #[must_use]
    pub fn new(outcome: Outcome, player: Option<Id>) -> Self {
        GameResult { outcome, player }
    }

    /// `winner` won the game.
    #[must_use]
    pub fn win(winner: Id) -> Self {
        GameResult::new(Outcome::Win, Some(winner))
    }

    /// `loser` lost the game.
    #[must_use]
    pub fn loss(loser: Id) -> Self {
        GameResult::new(Outcome::Loss, Some(loser))
    }

    /// The game was drawn.
    #[must_use]
    pub fn draw() -> Self {
        GameResult::new(Outcome::Draw, None)
    }

    #[must_use]
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    #[must_use]
    pub fn player(&self) -> Option<&Id> {
        self.player.as_ref()
    }
}

impl<Id: PartialEq> GameResult<Id> {
    /// Derives the outcome from the perspective of `player`, who played against `opponent`.
    ///
    /// # Errors
    ///
    /// Returns [`RatingError::UnknownPerspective`] if the result is recorded for somebody
    /// other than `player` or `opponent` (draws included), or if a decisive result is recorded for nobody.
    pub fn perspective_of(&self, player: &Id, opponent: &Id) -> Result<Outcome, RatingError> {
        match &self.player {
            Some(id) if id == player => Ok(self.outcome),
            Some(id) if id == opponent => Ok(self.outcome.invert()),
            None if self.outcome == Outcome::Draw => Ok(Outcome::Draw),
            _ => Err(RatingError::UnknownPerspective),
        }
    }
}

#[cfg(test)]
mod test {
    use super::{GameResult, Outcome};
    use crate::RatingError;

    #[test]
    fn test_scores() {
        assert_eq!(Outcome::Loss.score(), 0.0);
        assert_eq!(Outcome::Draw.score(), 0.5);
        assert_eq!(Outcome::Win.score(), 1.0);
    }

    #[test]
    fn test_invert_is_symmetric() {
        for outcome in [Outcome::Loss, Outcome::Draw, Outcome::Win] {
            assert_eq!(outcome.invert().invert(), outcome);
            assert_eq!(outcome.score() + outcome.invert().score(), 1.0);
        }
    }

    #[test]
    fn test_invalid_outcomes() {
        assert_eq!(Outcome::try_from(2_u8), Ok(Outcome::Win));
        assert_eq!(Outcome::try_from(3_u8), Err(RatingError::InvalidOutcome(3.0)));
        assert_eq!(Outcome::try_from(0.5_f64), Ok(Outcome::Draw));
        assert_eq!(Outcome::try_from(0.75_f64), Err(RatingError::InvalidOutcome(0.75)));
        assert!(Outcome::try_from(f64::NAN).is_err());
    }

    #[test]
    fn test_perspective() {
        let win = GameResult::win("a");

        assert_eq!(win.perspective_of(&"a", &"b"), Ok(Outcome::Win));
        assert_eq!(win.perspective_of(&"b", &"a"), Ok(Outcome::Loss));
        assert_eq!(
            win.perspective_of(&"c", &"d"),
            Err(RatingError::UnknownPerspective)
        );

        let loss = GameResult::loss("a");
        assert_eq!(loss.perspective_of(&"b", &"a"), Ok(Outcome::Win));

        let draw = GameResult::<&str>::draw();
        assert_eq!(draw.perspective_of(&"a", &"b"), Ok(Outcome::Draw));
        assert_eq!(draw.perspective_of(&"b", &"a"), Ok(Outcome::Draw));

        let anonymous_win = GameResult::<&str>::new(Outcome::Win, None);
        assert_eq!(
            anonymous_win.perspective_of(&"a", &"b"),
            Err(RatingError::UnknownPerspective)
        );
    }

    #[test]
    fn test_named_draw_perspective() {
        let draw = GameResult::new(Outcome::Draw, Some("a"));

        assert_eq!(draw.perspective_of(&"a", &"b"), Ok(Outcome::Draw));
        assert_eq!(draw.perspective_of(&"b", &"a"), Ok(Outcome::Draw));

        let stranger_draw = GameResult::new(Outcome::Draw, Some("c"));
        assert_eq!(
            stranger_draw.perspective_of(&"a", &"b"),
            Err(RatingError::UnknownPerspective)
        );
    }
}
