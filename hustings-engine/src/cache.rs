//! Time-boxed cache shared across candidate batches.
//!
//! All partitions share one validity window that starts at the last full
//! clear. Expiry is checked at the start of each batch and clears every
//! partition together.
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::candidate::StanceVector;
use crate::constants::PARTY_STANCE_KEY_PREFIX;
use crate::ideology::IdeologyVector;
use crate::party::Party;

/// Partition sizes, template lookups and clear count, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CacheStats {
    pub ideology_entries: usize,
    pub party_fit_entries: usize,
    pub stance_templates: usize,
    pub display_names: usize,
    /// Stance template lookups served from the cache. Survives clears.
    pub hits: u64,
    /// Stance template lookups that found nothing. Survives clears.
    pub misses: u64,
    pub clears: u64,
}

#[derive(Debug, Clone)]
pub struct GenerationCache {
    ideology: HashMap<String, IdeologyVector>,
    party_fit: HashMap<String, f64>,
    stance_templates: HashMap<String, StanceVector>,
    display_names: HashSet<String>,
    ttl_millis: u64,
    last_clear_millis: Option<u64>,
    hits: u64,
    misses: u64,
    clears: u64,
}

impl GenerationCache {
    #[must_use]
    pub fn new(ttl_millis: u64) -> Self {
        Self {
            ideology: HashMap::new(),
            party_fit: HashMap::new(),
            stance_templates: HashMap::new(),
            display_names: HashSet::new(),
            ttl_millis,
            last_clear_millis: None,
            hits: 0,
            misses: 0,
            clears: 0,
        }
    }

    /// Start or renew the validity window, clearing everything once it has
    /// elapsed. Returns `true` when a clear happened.
    pub fn refresh_if_expired(&mut self, now_millis: u64) -> bool {
        let Some(last) = self.last_clear_millis else {
            self.last_clear_millis = Some(now_millis);
            return false;
        };
        if now_millis.saturating_sub(last) < self.ttl_millis {
            return false;
        }
        self.clear(now_millis);
        true
    }

    /// Drop every partition and restart the window at `now_millis`.
    pub fn clear(&mut self, now_millis: u64) {
        self.ideology.clear();
        self.party_fit.clear();
        self.stance_templates.clear();
        self.display_names.clear();
        self.last_clear_millis = Some(now_millis);
        self.clears = self.clears.saturating_add(1);
        log::debug!("generation cache cleared at {now_millis}");
    }

    /// Cache key for a party's stance template.
    #[must_use]
    pub fn stance_key(party_id: &str) -> String {
        format!("{PARTY_STANCE_KEY_PREFIX}{party_id}")
    }

    /// Look up a party's stance template, counting the hit or miss.
    pub fn stance_template(&mut self, party_id: &str) -> Option<&StanceVector> {
        let template = self.stance_templates.get(&Self::stance_key(party_id));
        if template.is_some() {
            self.hits = self.hits.saturating_add(1);
        } else {
            self.misses = self.misses.saturating_add(1);
        }
        template
    }

    pub fn store_stance_template(&mut self, party_id: &str, stances: StanceVector) {
        self.stance_templates
            .insert(Self::stance_key(party_id), stances);
    }

    /// Party ideology as seen by this window.
    pub fn ideology_for(&mut self, party: &Party) -> &IdeologyVector {
        self.ideology
            .entry(party.id.clone())
            .or_insert_with(|| party.ideology_scores.clone())
    }

    pub fn party_fit_or_insert_with(
        &mut self,
        party_id: &str,
        compute: impl FnOnce() -> f64,
    ) -> f64 {
        *self
            .party_fit
            .entry(party_id.to_string())
            .or_insert_with(compute)
    }

    /// Record a display name; `false` if it was already issued in this window.
    pub fn remember_name(&mut self, name: &str) -> bool {
        self.display_names.insert(name.to_string())
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            ideology_entries: self.ideology.len(),
            party_fit_entries: self.party_fit.len(),
            stance_templates: self.stance_templates.len(),
            display_names: self.display_names.len(),
            hits: self.hits,
            misses: self.misses,
            clears: self.clears,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populated(cache: &mut GenerationCache) {
        cache.store_stance_template("cu", StanceVector::from([("tax".to_string(), 40.0)]));
        cache.party_fit_or_insert_with("cu", || 9.0);
        cache.remember_name("Ada Moreau");
    }

    #[test]
    fn first_refresh_starts_window_without_clearing() {
        let mut cache = GenerationCache::new(300_000);
        assert!(!cache.refresh_if_expired(1_000));
        populated(&mut cache);
        assert!(!cache.refresh_if_expired(300_999));
        assert!(cache.stance_template("cu").is_some());
    }

    #[test]
    fn expiry_clears_all_partitions_together() {
        let mut cache = GenerationCache::new(300_000);
        cache.refresh_if_expired(0);
        populated(&mut cache);
        assert!(cache.refresh_if_expired(300_000));
        let stats = cache.stats();
        assert_eq!(stats.stance_templates, 0);
        assert_eq!(stats.party_fit_entries, 0);
        assert_eq!(stats.display_names, 0);
        assert_eq!(stats.clears, 1);
        // the window restarts from the clear
        assert!(!cache.refresh_if_expired(400_000));
    }

    #[test]
    fn party_fit_is_computed_once_per_window() {
        let mut cache = GenerationCache::new(1_000);
        let first = cache.party_fit_or_insert_with("cu", || 3.0);
        let second = cache.party_fit_or_insert_with("cu", || 99.0);
        assert!((first - second).abs() < f64::EPSILON);
    }

    #[test]
    fn names_are_tracked() {
        let mut cache = GenerationCache::new(1_000);
        assert!(cache.remember_name("Jo Park"));
        assert!(!cache.remember_name("Jo Park"));
        assert_eq!(cache.stats().display_names, 1);
        assert_eq!(GenerationCache::stance_key("cu"), "party_cu");
    }

    #[test]
    fn template_lookups_are_counted_across_clears() {
        let mut cache = GenerationCache::new(1_000);
        cache.refresh_if_expired(0);
        assert!(cache.stance_template("cu").is_none());
        populated(&mut cache);
        assert!(cache.stance_template("cu").is_some());
        assert!(cache.stance_template("cu").is_some());
        cache.clear(5_000);
        assert!(cache.stance_template("cu").is_none());
        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses), (2, 2));
        assert_eq!(stats.stance_templates, 0);
    }
}
