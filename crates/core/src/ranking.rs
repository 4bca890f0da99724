//! Wine popularity ranking.

use crate::aggregates::RankingEntry;
use crate::grouping::WineTally;

/// Turns wine tallies into a ranked list: sorted by scan count
/// descending, ties keeping the input order (stable sort), ranks
/// assigned as 1-based positions. Deterministic for a fixed input order.
pub fn rank_wines(tallies: &[WineTally]) -> Vec<RankingEntry> {
    let mut ordered: Vec<&WineTally> = tallies.iter().collect();
    ordered.sort_by(|a, b| b.scans.cmp(&a.scans));

    ordered
        .into_iter()
        .enumerate()
        .map(|(position, tally)| RankingEntry {
            wine_id: tally.wine_id.clone(),
            wine_name: tally
                .wine_name
                .clone()
                .unwrap_or_else(|| tally.wine_id.clone()),
            scan_count: tally.scans,
            rank: (position + 1) as u32,
        })
        .collect()
}
