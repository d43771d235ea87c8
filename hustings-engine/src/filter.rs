//! Per-party nominee constraints applied after generation.
use std::collections::{HashMap, HashSet};

use crate::candidate::Candidate;
use crate::config::GenerationConfig;
use crate::rng::RandomSource;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartyAllocationFilter {
    conversion_rate: f64,
}

impl PartyAllocationFilter {
    #[must_use]
    pub const fn new(conversion_rate: f64) -> Self {
        Self { conversion_rate }
    }

    #[must_use]
    pub const fn from_config(config: &GenerationConfig) -> Self {
        Self::new(config.independent_conversion_rate)
    }

    /// Keep the first nominee of each party.
    ///
    /// Later nominees of an already-represented party survive as relabeled
    /// independents with the conversion rate and are dropped otherwise.
    /// Independents always pass through and order is preserved.
    pub fn dedupe(&self, candidates: Vec<Candidate>, rng: &mut dyn RandomSource) -> Vec<Candidate> {
        self.dedupe_against(&[], candidates, rng)
    }

    /// [`Self::dedupe`], treating parties already fielded by `held` as represented.
    pub fn dedupe_against(
        &self,
        held: &[Candidate],
        candidates: Vec<Candidate>,
        rng: &mut dyn RandomSource,
    ) -> Vec<Candidate> {
        let mut seen: HashSet<String> = held
            .iter()
            .filter(|c| !c.is_independent())
            .filter_map(|c| c.party_id.clone())
            .collect();
        let mut kept = Vec::with_capacity(candidates.len());
        for mut candidate in candidates {
            if candidate.is_independent() {
                kept.push(candidate);
                continue;
            }
            let party_id = candidate.party_id.clone().unwrap_or_default();
            if seen.insert(party_id) {
                kept.push(candidate);
            } else if rng.chance(self.conversion_rate) {
                candidate.relabel_independent();
                kept.push(candidate);
            } else {
                log::trace!("dropping surplus nominee {}", candidate.id());
            }
        }
        kept
    }

    /// Relabel nominees beyond `quota` per party as independents. Nobody is dropped.
    #[must_use]
    pub fn enforce_quota(&self, candidates: Vec<Candidate>, quota: usize) -> Vec<Candidate> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        candidates
            .into_iter()
            .map(|mut candidate| {
                if candidate.is_independent() {
                    return candidate;
                }
                if let Some(party_id) = candidate.party_id.clone() {
                    let count = counts.entry(party_id).or_insert(0);
                    *count += 1;
                    if *count > quota {
                        candidate.relabel_independent();
                    }
                }
                candidate
            })
            .collect()
    }
}
