use crate::types::{CandidateSignal, SignalType};
use std::collections::{HashMap, HashSet};

pub const MAX_SCORE: u32 = 100;

/// Source names are matched by case-insensitive substring; the first tier
/// that hits wins.
#[derive(Debug, Clone)]
pub struct CredibilityTier {
    pub patterns: Vec<String>,
    pub bonus: u32,
}

impl CredibilityTier {
    pub fn new(patterns: &[&str], bonus: u32) -> Self {
        Self {
            patterns: patterns.iter().map(|p| p.to_lowercase()).collect(),
            bonus,
        }
    }

    fn matches(&self, source: &str) -> bool {
        self.patterns
            .iter()
            .any(|p| source.contains(p.to_lowercase().as_str()))
    }
}

// Scoring tables:
// - Credibility tiers are ordered most credible first (regulatory/insider, then
//   options/biotech flow, then aggregated sentiment).
// - Type weights favour binary catalysts and premarket moves over sentiment.
// - Keywords each add the keyword bonus once when present in the description.

#[derive(Debug, Clone)]
pub struct ScoringConfig {
    pub credibility_tiers: Vec<CredibilityTier>,
    pub type_weights: HashMap<SignalType, u32>,
    pub hot_sectors: HashSet<String>,
    pub hot_sector_bonus: u32,
    pub keywords: Vec<String>,
    pub keyword_bonus: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        let type_weights = [
            (SignalType::FdaCatalyst, 30),
            (SignalType::PremarketMover, 30),
            (SignalType::InsiderTrading, 25),
            (SignalType::ShortSqueeze, 25),
            (SignalType::Momentum, 25),
            (SignalType::UnusualOptions, 20),
            (SignalType::AiCatalyst, 20),
            (SignalType::EnergyCatalyst, 20),
            (SignalType::SocialSentiment, 20),
            (SignalType::Trending, 20),
        ]
        .into_iter()
        .collect();

        Self {
            credibility_tiers: vec![
                CredibilityTier::new(&["sec", "quiver"], 30),
                CredibilityTier::new(&["unusual", "biotech"], 25),
                CredibilityTier::new(&["reddit"], 15),
            ],
            type_weights,
            hot_sectors: ["biotech", "technology", "energy"]
                .into_iter()
                .map(String::from)
                .collect(),
            hot_sector_bonus: 15,
            keywords: ["breakthrough", "approval", "partnership", "acquisition", "patent"]
                .into_iter()
                .map(String::from)
                .collect(),
            keyword_bonus: 10,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Scorer {
    config: ScoringConfig,
}

impl Scorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Additive score clamped to [0, 100]. Never fails on missing fields.
    pub fn score(&self, candidate: &CandidateSignal) -> u8 {
        let total = [
            self.credibility_bonus(candidate.source()),
            self.type_weight(candidate.signal_type()),
            self.sector_bonus(candidate.sector()),
            self.keyword_bonus(candidate.description().unwrap_or_default()),
        ]
        .into_iter()
        .fold(0u32, u32::saturating_add);

        total.min(MAX_SCORE) as u8
    }

    pub fn credibility_bonus(&self, source: &str) -> u32 {
        let source = source.to_lowercase();
        self.config
            .credibility_tiers
            .iter()
            .find(|tier| tier.matches(&source))
            .map_or(0, |tier| tier.bonus)
    }

    pub fn type_weight(&self, signal_type: &SignalType) -> u32 {
        self.config.type_weights.get(signal_type).copied().unwrap_or(0)
    }

    pub fn sector_bonus(&self, sector: &str) -> u32 {
        let sector = sector.trim().to_lowercase();
        let hot = self
            .config
            .hot_sectors
            .iter()
            .any(|s| s.trim().to_lowercase() == sector);
        if hot {
            self.config.hot_sector_bonus
        } else {
            0
        }
    }

    pub fn keyword_bonus(&self, description: &str) -> u32 {
        let description = description.to_lowercase();
        let hits = self
            .config
            .keywords
            .iter()
            .filter(|k| description.contains(&k.to_lowercase()))
            .count() as u32;
        hits.saturating_mul(self.config.keyword_bonus)
    }
}
