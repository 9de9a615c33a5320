pub mod consensus;

use crate::models::Sentiment;
use serde::Serialize;

pub use consensus::{calculate_consensus, tally};

// Vote count for one sentiment category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoteCount {
    pub sentiment: Sentiment,
    pub votes: usize,
    pub rank: usize, // 1-based, ties keep precedence order
}
