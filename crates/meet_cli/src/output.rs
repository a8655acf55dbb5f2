//! Human-readable rendering of a search outcome.

use std::fmt::Write;

use meet_core::links::directions_url;
use meet_core::{SearchOutcome, TravelTime};

pub fn render_text(outcome: &SearchOutcome) -> String {
    let mut out = String::new();
    let summary = &outcome.summary;
    let _ = writeln!(
        out,
        "Meeting spots for \"{}\" (sorted by {})",
        summary.query, outcome.sort_preference
    );
    let _ = writeln!(
        out,
        "Search area: {} within {:.0} m",
        outcome.resolution.centroid, outcome.resolution.radius_m
    );
    for origin in &outcome.degraded_origins {
        let _ = writeln!(out, "warning: travel times unavailable for {origin}");
    }

    for (rank, result) in outcome.results.iter().enumerate() {
        let label = match (result.fairness, result.valid) {
            (Some(label), _) => format!("  [{label}]"),
            (None, true) => String::new(),
            (None, false) => "  [No route for everyone]".to_string(),
        };
        let _ = writeln!(
            out,
            "\n{:>2}. {}{}  total {}",
            rank + 1,
            result.candidate.display_name,
            label,
            TravelTime::Seconds(result.total_time_secs)
        );
        if let Some(address) = &result.candidate.formatted_address {
            let _ = writeln!(out, "    {address}");
        }
        for (origin, estimate) in outcome.resolution.origins.iter().zip(&result.per_origin_times) {
            let name = match origin.participant.label.as_str() {
                "" => origin.id().as_str(),
                label => label,
            };
            let _ = writeln!(
                out,
                "    {:<12} {:<16} {}",
                name,
                estimate.duration.to_string(),
                directions_url(origin.coordinate, result.candidate.coordinate, origin.travel_mode())
            );
        }
    }
    out
}
