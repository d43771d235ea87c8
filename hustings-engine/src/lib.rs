//! Hustings Participant Engine
//!
//! Pre-election participant generation for the Hustings political-strategy
//! game. Given an election definition, the engine picks the allocation
//! strategy for its electoral system and fills it with synthetic candidates.
//! No UI, storage or tabulation lives here.

pub mod allocators;
pub mod batch;
pub mod cache;
pub mod candidate;
pub mod clock;
pub mod config;
pub mod constants;
pub mod dispatch;
pub mod election;
pub mod factory;
pub mod filter;
pub mod ideology;
pub mod numbers;
pub mod output;
pub mod party;
pub mod policy;
pub mod rng;
pub mod stance;

// Re-export commonly used types
pub use allocators::{Allocator, allocator_for, assign_polling};
pub use batch::{BatchOptions, CandidateBatchFactory};
pub use cache::{CacheStats, GenerationCache};
pub use candidate::{AdStrategy, BaseCandidate, Candidate, ElectoralStrategy, StanceVector};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{CampaignRanges, GenerationConfig, GenerationConfigError, IntRange, StanceWeights};
pub use dispatch::resolve_system;
pub use election::{
    ActiveCampaign, AllocatorKind, ElectionType, ElectoralSystem, GenerationRequest, Incumbent,
    ScoringProperties,
};
pub use factory::{
    FactoryRequest, NameGenerator, PoliticianFactory, SyntheticPoliticianFactory,
    TableNameGenerator,
};
pub use filter::PartyAllocationFilter;
pub use ideology::{IdeologyDimension, IdeologyVector};
pub use output::{
    CandidateMap, ElectoralCollegeMetadata, GenerationError, GenerationOutput, MmpParticipants,
    PartyListMap,
};
pub use party::{Party, PartyRoster};
pub use policy::{PolicyCatalog, PolicyOption, PolicyQuestion};
pub use rng::{RandomSource, ScriptedRandom, SeededRandom, derive_stream_seed};
pub use stance::StanceSynthesizer;

/// Participant generator owning its cache, randomness and clock.
///
/// The cache is private to the engine, so separate engines never observe
/// each other's stance templates. Each call to [`ParticipantEngine::generate`]
/// is one generation run with its own used-id set.
pub struct ParticipantEngine<F = SyntheticPoliticianFactory, R = SeededRandom, C = SystemClock>
where
    F: PoliticianFactory,
    R: RandomSource,
    C: Clock,
{
    factory: F,
    rng: R,
    clock: C,
    config: GenerationConfig,
    catalog: PolicyCatalog,
    cache: GenerationCache,
    names: Option<Box<dyn NameGenerator>>,
}

impl ParticipantEngine {
    /// Engine with the built-in factory and catalog, seeded from a user seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(
            SyntheticPoliticianFactory::new(),
            SeededRandom::from_user_seed(seed),
            SystemClock,
        )
    }
}

impl<F, R, C> ParticipantEngine<F, R, C>
where
    F: PoliticianFactory,
    R: RandomSource,
    C: Clock,
{
    /// Create an engine with default configuration and the built-in policy catalog.
    pub fn new(factory: F, rng: R, clock: C) -> Self {
        let config = GenerationConfig::default();
        Self {
            factory,
            rng,
            clock,
            cache: GenerationCache::new(config.cache_ttl_millis()),
            config,
            catalog: PolicyCatalog::default_catalog(),
            names: None,
        }
    }

    /// Create an engine with a custom configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Config`] if the configuration fails
    /// validation.
    pub fn with_config(
        factory: F,
        rng: R,
        clock: C,
        config: GenerationConfig,
    ) -> Result<Self, GenerationError> {
        config.validate()?;
        let mut engine = Self::new(factory, rng, clock);
        engine.cache = GenerationCache::new(config.cache_ttl_millis());
        engine.config = config;
        Ok(engine)
    }

    /// Replace the policy catalog used for stance synthesis.
    #[must_use]
    pub fn with_catalog(mut self, catalog: PolicyCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Re-roll display names already issued in the current cache window.
    #[must_use]
    pub fn with_name_generator(mut self, names: impl NameGenerator + 'static) -> Self {
        self.names = Some(Box::new(names));
        self
    }

    pub const fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub const fn catalog(&self) -> &PolicyCatalog {
        &self.catalog
    }

    pub const fn rng(&self) -> &R {
        &self.rng
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Generate the participants for one election.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::MissingElectionType` or
    /// `GenerationError::EmptyPartyScope` for requests that cannot be
    /// populated, and `GenerationError::UnsupportedSystem` when the electoral
    /// system must be handled elsewhere (see [`GenerationError::is_fallback`]).
    pub fn generate(
        &mut self,
        request: &GenerationRequest,
    ) -> Result<GenerationOutput, GenerationError> {
        let system = resolve_system(request)?;
        log::debug!(
            "dispatching {system} for {} ({} parties, {} seats)",
            request.country_id,
            request.parties_in_scope.len(),
            request.number_of_seats_to_fill
        );

        let mut batch = CandidateBatchFactory::new(
            &mut self.factory,
            StanceSynthesizer::new(&self.catalog, &self.config),
            &self.config,
            &mut self.cache,
            &self.clock,
            &mut self.rng,
        )
        .with_entity_population(request.entity_population);
        if let Some(names) = self.names.as_deref_mut() {
            batch = batch.with_names(names);
        }
        if let Some(player) = request.player_candidate_id() {
            batch.reserve_id(player);
        }

        Ok(allocator_for(system.allocator()).allocate(request, system, &mut batch))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_config_is_rejected_at_construction() {
        let config = GenerationConfig {
            independent_rate: 2.0,
            ..GenerationConfig::default()
        };
        let engine = ParticipantEngine::with_config(
            SyntheticPoliticianFactory::new(),
            SeededRandom::new(1),
            ManualClock::starting_at(0),
            config,
        );
        let Err(err) = engine else {
            panic!("expected the config to be rejected");
        };
        assert!(matches!(err, GenerationError::Config(_)));
        assert!(err.to_string().contains("independent_rate"));
    }

    #[test]
    fn failed_dispatch_leaves_cache_untouched() {
        let mut engine = ParticipantEngine::seeded(3);
        let parties = PartyRoster::default_roster().take(2);
        let request = GenerationRequest::new("STV", "IRL", parties, 3);
        let err = engine.generate(&request).unwrap_err();
        assert!(err.is_fallback());
        assert_eq!(engine.cache_stats(), CacheStats::default());
        assert_eq!(engine.rng().draws(), 0);
    }
}
