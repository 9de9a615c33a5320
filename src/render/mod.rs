//! Plain-text presenter for the terminal dashboard.

use crate::charts::{ModelDetail, SeriesPoint};
use crate::handlers::session::DashboardView;
use crate::pipeline::AnalysisView;
use std::fmt::Write;

fn percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

fn series(points: &[SeriesPoint]) -> String {
    points
        .iter()
        .map(|p| format!("{} {}", p.name, percent(p.value)))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn render_text(view: &DashboardView) -> String {
    if view.pending {
        return "Analyzing...\n".to_string();
    }
    if let Some(error) = &view.error {
        return format!("Error: {}\n", error);
    }
    if view.analysis.is_empty() {
        return String::new();
    }
    render_analysis(&view.analysis)
}

fn render_analysis(analysis: &AnalysisView) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail, results are ignored below
    let verdict = analysis
        .conclusion
        .as_ref()
        .and_then(|c| c.final_sentiment)
        .map(|s| s.as_str().to_uppercase())
        .unwrap_or_else(|| "NO RESULT".to_string());
    let _ = writeln!(out, "Final sentiment: {}", verdict);

    if !analysis.datasets.breakdown.is_empty() {
        let slices: Vec<String> = analysis
            .datasets
            .breakdown
            .iter()
            .map(|s| format!("{} {}", s.name, s.value))
            .collect();
        let _ = writeln!(out, "Votes: {}", slices.join(", "));
    }

    if !analysis.datasets.comparison.is_empty() {
        let _ = writeln!(out, "\nModel comparison");
        for row in &analysis.datasets.comparison {
            let _ = writeln!(
                out,
                "  {:<12} pos {:>6}  neu {:>6}  neg {:>6}  [{}]",
                row.name,
                percent(row.positive),
                percent(row.neutral),
                percent(row.negative),
                row.sentiment
            );
        }
    }

    if !analysis.datasets.composition.is_empty() {
        let _ = writeln!(out, "\nComposition");
        for row in &analysis.datasets.composition {
            let _ = writeln!(out, "  {:<9} {}", row.label, percent(row.value));
        }
    }

    if !analysis.datasets.probability.is_empty() {
        let _ = writeln!(out, "\nClassifier probabilities");
        for row in &analysis.datasets.probability {
            let _ = writeln!(out, "  {:<9} {}", row.label, series(&row.columns));
        }
    }

    if !analysis.datasets.radar.is_empty() {
        let _ = writeln!(out, "\nRadar");
        for axis in &analysis.datasets.radar {
            let _ = writeln!(out, "  {:<9} {}", axis.axis, series(&axis.series));
        }
    }

    let _ = writeln!(out, "\nModels");
    for detail in &analysis.details {
        out.push_str(&render_detail(detail));
    }

    let _ = writeln!(out, "\nAgreement");
    for entry in &analysis.agreement {
        let _ = writeln!(out, "  Voted {:<9} {} {}", entry.label, entry.votes, entry.models.join(", "));
    }

    out
}

fn render_detail(detail: &ModelDetail) -> String {
    let label = detail.label.as_deref().map(|l| format!(" [{}]", l)).unwrap_or_default();
    let mut out = format!("  {}{} - {}\n", detail.name, label, detail.description);

    match (&detail.error, &detail.scores) {
        (Some(error), _) => out.push_str(&format!("    Error: {}\n", error)),
        (None, Some(scores)) => {
            out.push_str(&format!(
                "    Positive {}  Neutral {}  Negative {}\n",
                percent(scores.positive),
                percent(scores.neutral),
                percent(scores.negative)
            ));
            if let Some(compound) = scores.compound {
                out.push_str(&format!("    Compound {:.3}\n", compound));
            }
        }
        (None, None) => {}
    }

    out
}
