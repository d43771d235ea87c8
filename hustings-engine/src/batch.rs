//! Batch candidate generation on top of the external politician factory.
use std::collections::HashSet;

use crate::cache::GenerationCache;
use crate::candidate::{AdStrategy, BaseCandidate, Candidate};
use crate::clock::Clock;
use crate::config::{GenerationConfig, IntRange};
use crate::constants::{PARTY_FIT_POPULARITY_WEIGHT, RESIDENTS_PER_VOLUNTEER, VOLUNTEER_CEILING};
use crate::election::Incumbent;
use crate::factory::{FactoryRequest, NameGenerator, PoliticianFactory};
use crate::numbers::{i64_to_f64, i64_to_u32};
use crate::party::{Party, is_independent_party_id, sort_by_popularity};
use crate::rng::RandomSource;
use crate::stance::StanceSynthesizer;

/// Per-batch constraints passed through to the politician factory.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchOptions<'a> {
    /// Every candidate belongs to this party.
    pub force_party_id: Option<&'a str>,
    /// Every candidate runs unaffiliated.
    pub force_independent: bool,
    pub city_id: Option<&'a str>,
    pub region_id: Option<&'a str>,
}

impl<'a> BatchOptions<'a> {
    #[must_use]
    pub fn for_party(party_id: &'a str) -> Self {
        Self {
            force_party_id: Some(party_id),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn independents() -> Self {
        Self {
            force_independent: true,
            ..Self::default()
        }
    }
}

/// Generates candidates for one generation run.
///
/// A run spans every batch issued while handling a single request, and the
/// used-id set lives for the whole run: ids are unique across all batches,
/// not only within one.
pub struct CandidateBatchFactory<'e> {
    factory: &'e mut dyn PoliticianFactory,
    names: Option<&'e mut dyn NameGenerator>,
    stances: StanceSynthesizer<'e>,
    config: &'e GenerationConfig,
    cache: &'e mut GenerationCache,
    clock: &'e dyn Clock,
    rng: &'e mut dyn RandomSource,
    used_ids: HashSet<String>,
    sequence: u64,
    entity_population: Option<u64>,
}

impl<'e> CandidateBatchFactory<'e> {
    #[must_use]
    pub fn new(
        factory: &'e mut dyn PoliticianFactory,
        stances: StanceSynthesizer<'e>,
        config: &'e GenerationConfig,
        cache: &'e mut GenerationCache,
        clock: &'e dyn Clock,
        rng: &'e mut dyn RandomSource,
    ) -> Self {
        Self {
            factory,
            names: None,
            stances,
            config,
            cache,
            clock,
            rng,
            used_ids: HashSet::new(),
            sequence: 0,
            entity_population: None,
        }
    }

    /// Use a display-name generator to re-roll names already issued in this cache window.
    #[must_use]
    pub fn with_names(mut self, names: &'e mut dyn NameGenerator) -> Self {
        self.names = Some(names);
        self
    }

    /// Scale the volunteer ceiling by the electorate's population.
    #[must_use]
    pub fn with_entity_population(mut self, population: Option<u64>) -> Self {
        self.entity_population = population;
        self
    }

    #[must_use]
    pub const fn config(&self) -> &'e GenerationConfig {
        self.config
    }

    pub fn rng(&mut self) -> &mut dyn RandomSource {
        &mut *self.rng
    }

    /// Keep an externally owned id (such as the player's candidate) out of the run.
    pub fn reserve_id(&mut self, id: &str) {
        self.used_ids.insert(id.to_string());
    }

    #[must_use]
    pub fn is_used(&self, id: &str) -> bool {
        self.used_ids.contains(id)
    }

    /// Number of ids claimed so far in this run, reserved ids included.
    #[must_use]
    pub fn used_count(&self) -> usize {
        self.used_ids.len()
    }

    /// Generate `count` candidates.
    ///
    /// Unless the options force an affiliation, each candidate runs
    /// unaffiliated with the configured independent rate and otherwise takes
    /// the next party in descending popularity order, wrapping around.
    pub fn generate(
        &mut self,
        count: usize,
        country_id: &str,
        party_scope: &[Party],
        options: BatchOptions<'_>,
    ) -> Vec<Candidate> {
        self.refresh_cache();
        let ranked = sort_by_popularity(party_scope);
        let forced = options.force_party_id.and_then(|id| {
            let party = party_scope.iter().find(|p| p.id == id);
            if party.is_none() {
                log::warn!("forced party {id} is not in scope; generating independents");
            }
            party
        });
        let forced_independent = options.force_independent || options.force_party_id.is_some();

        let mut next_party = 0usize;
        let mut batch = Vec::with_capacity(count);
        for _ in 0..count {
            let affiliation = if let Some(party) = forced {
                Some(party)
            } else if forced_independent
                || ranked.is_empty()
                || self.rng.chance(self.config.independent_rate)
            {
                None
            } else {
                let party = ranked[next_party % ranked.len()];
                next_party += 1;
                Some(party)
            };
            let base = self.unique_base(country_id, party_scope, affiliation, options);
            batch.push(self.finish(base, country_id, affiliation, true));
        }
        log::debug!(
            "generated {} candidates for {country_id} ({} parties in scope)",
            batch.len(),
            party_scope.len()
        );
        batch
    }

    /// Build the candidate record for a sitting office holder.
    ///
    /// Incumbents keep their own id and name. An incumbent whose party is not
    /// in scope runs as an independent.
    pub fn incumbent(
        &mut self,
        incumbent: &Incumbent,
        country_id: &str,
        party_scope: &[Party],
    ) -> Candidate {
        self.refresh_cache();
        let party_id = incumbent.party_id.as_deref();
        let party = party_id.and_then(|id| party_scope.iter().find(|p| p.id == id));
        let out_of_scope = party.is_none() && !is_independent_party_id(party_id);
        if out_of_scope {
            log::warn!(
                "incumbent {} belongs to {} which is not in scope; running as independent",
                incumbent.id,
                party_id.unwrap_or_default()
            );
        }

        let mut base = BaseCandidate::new(incumbent.id.clone(), incumbent.name.clone());
        if self.used_ids.contains(&base.id) {
            let id = self.disambiguate(&base.id);
            log::warn!("incumbent id {} already used; issued {id}", base.id);
            base.id = id;
        }
        self.claim(&base.id);

        let mut candidate = self.finish(base, country_id, party, false);
        if party.is_none() && party_id.is_some() {
            candidate.relabel_independent();
        }
        let recognition = self.config.ranges.incumbent_name_recognition;
        candidate.name_recognition = incumbent
            .name_recognition
            .unwrap_or_else(|| self.sample_u32(recognition));
        candidate.is_incumbent = true;
        candidate
    }

    fn refresh_cache(&mut self) {
        if self.cache.refresh_if_expired(self.clock.now_millis()) {
            log::debug!("generation cache expired; rebuilding stance templates");
        }
    }

    /// Ask the factory for a record whose id is unused, regenerating with the
    /// same constraints and falling back to a deterministic suffix.
    fn unique_base(
        &mut self,
        country_id: &str,
        party_scope: &[Party],
        party: Option<&Party>,
        options: BatchOptions<'_>,
    ) -> BaseCandidate {
        let request = FactoryRequest {
            country_id,
            party_scope,
            force_party_id: party.map(|p| p.id.as_str()),
            city_id: options.city_id,
            region_id: options.region_id,
        };
        let mut base = self.factory.generate_candidate(&request, &mut *self.rng);
        let mut attempts = 0;
        while self.used_ids.contains(&base.id) && attempts < self.config.max_id_retries {
            attempts += 1;
            log::trace!("candidate id {} collided; regenerating (attempt {attempts})", base.id);
            base = self.factory.generate_candidate(&request, &mut *self.rng);
        }
        if self.used_ids.contains(&base.id) {
            let id = self.disambiguate(&base.id);
            log::warn!(
                "candidate id {} still colliding after {attempts} retries; issued {id}",
                base.id
            );
            base.id = id;
        }
        self.claim(&base.id);
        base
    }

    fn claim(&mut self, id: &str) {
        self.used_ids.insert(id.to_string());
        self.sequence = self.sequence.saturating_add(1);
    }

    fn disambiguate(&self, id: &str) -> String {
        let stamp = self.clock.now_millis();
        let mut suffixed = format!("{id}_{stamp}_{}", self.sequence);
        let mut bump = 1u32;
        while self.used_ids.contains(&suffixed) {
            suffixed = format!("{id}_{stamp}_{}_{bump}", self.sequence);
            bump = bump.saturating_add(1);
        }
        suffixed
    }

    fn finish(
        &mut self,
        base: BaseCandidate,
        country_id: &str,
        party: Option<&Party>,
        reroll_duplicate_name: bool,
    ) -> Candidate {
        let mut candidate = Candidate::from_base(base);
        if reroll_duplicate_name {
            self.ensure_distinct_name(&mut candidate, country_id);
        } else {
            self.cache.remember_name(candidate.name());
        }

        candidate.policy_stances = match party {
            Some(party) => {
                candidate.affiliate(party);
                self.stances
                    .stances_for_party(party, &mut *self.cache, &mut *self.rng)
            }
            None => self.stances.stances_random(&mut *self.rng),
        };
        self.assign_campaign_fields(&mut candidate, party);
        candidate
    }

    fn ensure_distinct_name(&mut self, candidate: &mut Candidate, country_id: &str) {
        if self.cache.remember_name(candidate.name()) {
            return;
        }
        let Some(names) = self.names.as_deref_mut() else {
            return;
        };
        for attempt in 1..=self.config.max_name_retries {
            let name = names.display_name(country_id, &mut *self.rng);
            if self.cache.remember_name(&name) {
                log::trace!("renamed {} to {name} (attempt {attempt})", candidate.name());
                candidate.base.name = name;
                return;
            }
        }
        log::debug!("keeping duplicate display name {}", candidate.name());
    }

    fn assign_campaign_fields(&mut self, candidate: &mut Candidate, party: Option<&Party>) {
        let config = self.config;
        let ranges = &config.ranges;
        let sampled_base = self.rng.next_int(ranges.base_score.min, ranges.base_score.max);
        let fit = party.map_or(0.0, |p| {
            self.cache.party_fit_or_insert_with(&p.id, || {
                p.popularity * PARTY_FIT_POPULARITY_WEIGHT
            })
        });
        candidate.base_score = i64_to_f64(sampled_base) + fit;
        candidate.name_recognition = self.sample_u32(ranges.name_recognition);
        candidate.campaign_funds = self
            .rng
            .next_int(ranges.campaign_funds.min, ranges.campaign_funds.max);
        candidate.working_hours = 0;
        candidate.max_working_hours = self.sample_u32(ranges.max_working_hours);
        candidate.campaign_hours_per_day = self.sample_u32(ranges.campaign_hours_per_day);
        candidate.campaign_hours_remaining_today = candidate.campaign_hours_per_day;
        candidate.volunteer_count = self.sample_u32(self.volunteer_range());
        candidate.current_ad_strategy = AdStrategy::default();
    }

    /// Configured volunteer range, its ceiling raised by one per
    /// 10 000 residents up to 500.
    fn volunteer_range(&self) -> IntRange {
        let configured = self.config.ranges.volunteers;
        let Some(population) = self.entity_population else {
            return configured;
        };
        let scaled = i64::try_from(population / RESIDENTS_PER_VOLUNTEER).unwrap_or(i64::MAX);
        let ceiling = scaled.min(VOLUNTEER_CEILING).max(configured.max);
        IntRange::new(configured.min, ceiling)
    }

    fn sample_u32(&mut self, range: IntRange) -> u32 {
        i64_to_u32(self.rng.next_int(range.min, range.max))
    }
}
