use crate::types::CandidateSignal;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectorStats {
    pub sector: String,
    pub count: usize,
    pub mean_score: f64,
    pub max_score: u8,
}

/// Count, mean and max score per sector, ordered by sector name.
pub fn sector_summary(signals: &[CandidateSignal]) -> Vec<SectorStats> {
    let mut by_sector: BTreeMap<&str, Vec<u8>> = BTreeMap::new();
    for s in signals {
        by_sector.entry(s.sector()).or_default().push(s.signal_score());
    }

    by_sector
        .into_iter()
        .map(|(sector, scores)| {
            let total: u32 = scores.iter().map(|&s| u32::from(s)).sum();
            let mean = total as f64 / scores.len() as f64;
            SectorStats {
                sector: sector.to_string(),
                count: scores.len(),
                mean_score: (mean * 100.0).round() / 100.0,
                max_score: scores.iter().copied().max().unwrap_or(0),
            }
        })
        .collect()
}
