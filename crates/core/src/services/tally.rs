//! Weighted vote tallying.

use asamblea_db::entities::{vote, VoteOption};
use serde::Serialize;

/// Per-option weighted sums for one question.
///
/// Produced by a pure fold over a vote set: deterministic, independent of
/// vote ordering, no I/O. Re-running over the same immutable vote set always
/// yields the same counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tally {
    /// Weighted sum of "A favor" votes.
    pub a_favor: i64,
    /// Weighted sum of "En contra" votes.
    pub en_contra: i64,
    /// Weighted sum of "Abstenerse" votes.
    pub abstenerse: i64,
}

impl Tally {
    /// Reduce a set of vote rows into per-option weighted sums.
    #[must_use]
    pub fn from_votes(votes: &[vote::Model]) -> Self {
        let mut tally = Self::default();
        for vote in votes {
            let weight = i64::from(vote.weight);
            match vote.option {
                VoteOption::AFavor => tally.a_favor += weight,
                VoteOption::EnContra => tally.en_contra += weight,
                VoteOption::Abstenerse => tally.abstenerse += weight,
            }
        }
        tally
    }

    /// Total weight cast across all three options.
    #[must_use]
    pub const fn total(&self) -> i64 {
        self.a_favor + self.en_contra + self.abstenerse
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asamblea_common::IdGenerator;
    use chrono::Utc;

    fn vote(option: VoteOption, weight: i32) -> vote::Model {
        let id_gen = IdGenerator::new();
        vote::Model {
            id: id_gen.generate(),
            question_id: "q1".to_string(),
            code_id: id_gen.generate(),
            option,
            weight,
            created_at: Utc::now().into(),
        }
    }

    #[test]
    fn test_empty_vote_set() {
        let tally = Tally::from_votes(&[]);
        assert_eq!(tally, Tally::default());
        assert_eq!(tally.total(), 0);
    }

    #[test]
    fn test_sums_weights_per_option() {
        let votes = vec![
            vote(VoteOption::AFavor, 1),
            vote(VoteOption::AFavor, 1),
            vote(VoteOption::EnContra, 3),
            vote(VoteOption::Abstenerse, 2),
        ];

        let tally = Tally::from_votes(&votes);
        assert_eq!(tally.a_favor, 2);
        assert_eq!(tally.en_contra, 3);
        assert_eq!(tally.abstenerse, 2);
        assert_eq!(tally.total(), 7);
    }

    #[test]
    fn test_order_independent() {
        let mut votes = vec![
            vote(VoteOption::AFavor, 2),
            vote(VoteOption::EnContra, 1),
            vote(VoteOption::Abstenerse, 5),
        ];
        let forward = Tally::from_votes(&votes);
        votes.reverse();
        let backward = Tally::from_votes(&votes);

        assert_eq!(forward, backward);
    }

    #[test]
    fn test_idempotent_over_same_set() {
        let votes = vec![vote(VoteOption::AFavor, 1), vote(VoteOption::AFavor, 1)];
        assert_eq!(Tally::from_votes(&votes), Tally::from_votes(&votes));
    }
}
