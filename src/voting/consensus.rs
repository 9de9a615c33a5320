use crate::models::{AnalysisResult, Conclusion, ModelId, Sentiment};
use crate::voting::VoteCount;
use log::{debug, info};

/// Group models by the label they reported and pick the overall sentiment.
///
/// Labels are taken as given, never recomputed from the scores. Failed
/// models, and usable ones whose label is not a known category, are listed
/// in `excluded` and do not vote. On a tie for the most
/// votes the first category in `positive > neutral > negative` wins. With
/// no usable model at all `final_sentiment` stays `None`.
pub fn calculate_consensus(result: &AnalysisResult) -> Conclusion {
    let mut conclusion = Conclusion::default();

    // Walk in canonical order so every bucket stays ordered
    for model in ModelId::ALL {
        match result.usable(model).and_then(|r| r.sentiment) {
            Some(sentiment) => conclusion.bucket_mut(sentiment).push(model),
            None => conclusion.excluded.push(model),
        }
    }

    if conclusion.total_votes() == 0 {
        info!("No usable model results, consensus has no final sentiment");
        return conclusion;
    }

    let counts = tally(&conclusion);
    conclusion.final_sentiment = counts.first().map(|count| count.sentiment);

    let tied = counts.iter().filter(|c| c.votes == counts[0].votes).count();
    if tied > 1 {
        debug!(
            "{}-way tie at {} vote(s), resolved to {:?} by precedence",
            tied, counts[0].votes, conclusion.final_sentiment
        );
    }

    conclusion
}

/// Vote counts sorted by votes, highest first. The sort is stable over
/// [`Sentiment::ALL`], which is what gives ties their precedence.
pub fn tally(conclusion: &Conclusion) -> Vec<VoteCount> {
    let mut counts: Vec<VoteCount> = Sentiment::ALL
        .iter()
        .map(|sentiment| VoteCount {
            sentiment: *sentiment,
            votes: conclusion.votes(*sentiment),
            rank: 0, // Will set after sorting
        })
        .collect();

    counts.sort_by(|a, b| b.votes.cmp(&a.votes));

    for (i, count) in counts.iter_mut().enumerate() {
        count.rank = i + 1;
    }

    counts
}
