//! Consensus breakdown (pie) dataset
//!
//! Unlike the full-axis charts, a category nobody voted for is left out:
//! "no votes" is an absence, not a measured zero.

use crate::models::{Conclusion, Sentiment, SentimentPalette};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreakdownSlice {
    pub sentiment: Sentiment,
    pub name: String,
    pub value: usize,
    pub color: String,
}

pub fn consensus_breakdown(conclusion: Option<&Conclusion>, palette: &SentimentPalette) -> Vec<BreakdownSlice> {
    let Some(conclusion) = conclusion else {
        return Vec::new();
    };

    Sentiment::ALL
        .iter()
        .filter(|sentiment| conclusion.votes(**sentiment) > 0)
        .map(|sentiment| BreakdownSlice {
            sentiment: *sentiment,
            name: sentiment.title().to_string(),
            value: conclusion.votes(*sentiment),
            color: palette.color(*sentiment).to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ModelId;

    #[test]
    fn test_empty_categories_are_omitted() {
        let conclusion = Conclusion {
            positive: vec![ModelId::Vader, ModelId::NaiveBayes],
            negative: vec![ModelId::Roberta],
            final_sentiment: Some(Sentiment::Positive),
            ..Default::default()
        };

        let slices = consensus_breakdown(Some(&conclusion), &SentimentPalette::default());
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].name, "Positive");
        assert_eq!(slices[0].value, 2);
        assert_eq!(slices[0].color, "#10b981");
        assert_eq!(slices[1].sentiment, Sentiment::Negative);
        assert_eq!(slices[1].value, 1);
    }

    #[test]
    fn test_no_votes_no_slices() {
        let conclusion = Conclusion {
            excluded: ModelId::ALL.to_vec(),
            ..Default::default()
        };
        assert!(consensus_breakdown(Some(&conclusion), &SentimentPalette::default()).is_empty());
        assert!(consensus_breakdown(None, &SentimentPalette::default()).is_empty());
    }
}
