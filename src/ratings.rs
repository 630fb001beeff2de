//! Rating book
//!
//! Stores one rating per (course, account). Ratings are never updated or
//! removed; the running sum and count live on the course itself.

use odra::prelude::*;

use crate::errors::Error;
use crate::types::{constants::*, Rating};

/// Per-buyer course ratings
#[odra::module]
pub struct RatingBook {
    /// Ratings keyed by (course_id, rater)
    ratings: Mapping<(u64, Address), Rating>,
}

#[odra::module]
impl RatingBook {
    /// Store a first rating for `(course_id, rater)`
    pub fn record(&mut self, course_id: u64, rater: Address, score: u8, comment: String) -> Rating {
        if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
            self.env().revert(Error::InvalidScore);
        }
        if self.ratings.get(&(course_id, rater)).is_some() {
            self.env().revert(Error::AlreadyRated);
        }

        let rating = Rating {
            score,
            comment,
            timestamp: self.env().get_block_time(),
        };
        self.ratings.set(&(course_id, rater), rating.clone());
        rating
    }

    /// Get the rating `rater` left on `course_id`
    pub fn get_rating(&self, course_id: u64, rater: Address) -> Option<Rating> {
        self.ratings.get(&(course_id, rater))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use odra::host::{Deployer, NoArgs};

    #[test]
    fn test_score_bounds() {
        let env = odra_test::env();
        let mut book = RatingBook::deploy(&env, NoArgs);
        let rater = env.get_account(2);

        assert_eq!(
            book.try_record(1, rater, 0, "Zero".to_string()),
            Err(Error::InvalidScore.into())
        );
        assert_eq!(
            book.try_record(1, rater, 6, "Six".to_string()),
            Err(Error::InvalidScore.into())
        );
        assert_eq!(book.record(1, rater, 5, "Great!".to_string()).score, 5);
    }

    #[test]
    fn test_second_rating_is_rejected() {
        let env = odra_test::env();
        let mut book = RatingBook::deploy(&env, NoArgs);
        let rater = env.get_account(2);

        book.record(1, rater, 4, "Good course".to_string());
        assert_eq!(
            book.try_record(1, rater, 2, "Changed my mind".to_string()),
            Err(Error::AlreadyRated.into())
        );

        let stored = book.get_rating(1, rater).expect("Rating should exist");
        assert_eq!(stored.score, 4);
        assert_eq!(stored.comment, "Good course");
        assert!(book.get_rating(2, rater).is_none());
    }
}
