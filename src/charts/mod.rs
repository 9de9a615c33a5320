pub mod axis;
pub mod breakdown;
pub mod detail;

use crate::models::{AnalysisResult, Conclusion, ModelMetadata, SentimentPalette};
use crate::scoring::NormalizedScores;
use serde::Serialize;

pub use axis::{
    CompositionRow, ModelComparisonRow, ProbabilityRow, RadarAxis, SeriesPoint, composition, model_comparison,
    probability_comparison, radar,
};
pub use breakdown::{BreakdownSlice, consensus_breakdown};
pub use detail::{AgreementEntry, ModelDetail, agreement, model_details};

// Every chart-ready dataset for one analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartDatasets {
    pub composition: Vec<CompositionRow>,
    pub probability: Vec<ProbabilityRow>,
    pub radar: Vec<RadarAxis>,
    pub breakdown: Vec<BreakdownSlice>,
    pub comparison: Vec<ModelComparisonRow>,
}

impl ChartDatasets {
    pub fn is_empty(&self) -> bool {
        self.composition.is_empty()
            && self.probability.is_empty()
            && self.radar.is_empty()
            && self.breakdown.is_empty()
            && self.comparison.is_empty()
    }
}

/// Build every dataset. `None` inputs mean there is no analysis to show and
/// yield empty datasets. The conclusion must already be computed, since the
/// breakdown is derived from it.
pub fn build_datasets(
    result: Option<&AnalysisResult>,
    scores: Option<&NormalizedScores>,
    conclusion: Option<&Conclusion>,
    metadata: &ModelMetadata,
    palette: &SentimentPalette,
) -> ChartDatasets {
    ChartDatasets {
        composition: composition(scores, metadata),
        probability: probability_comparison(scores, metadata),
        radar: radar(scores, metadata),
        breakdown: consensus_breakdown(conclusion, palette),
        comparison: model_comparison(result, metadata),
    }
}
