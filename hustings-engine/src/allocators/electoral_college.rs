//! Presidential races decided by an electoral college.
use super::{Allocator, assign_polling, into_map, open_parties, running_incumbents, sample_count};
use crate::batch::{BatchOptions, CandidateBatchFactory};
use crate::candidate::ElectoralStrategy;
use crate::constants::{COLLEGE_MAX_CANDIDATES, COLLEGE_MIN_CANDIDATES};
use crate::election::{ElectoralSystem, GenerationRequest};
use crate::filter::PartyAllocationFilter;
use crate::output::{ElectoralCollegeMetadata, GenerationOutput};

#[derive(Debug, Clone, Copy, Default)]
pub struct ElectoralCollegeAllocator;

/// Inclusive candidate-count bounds; the upper bound never drops below the lower.
#[must_use]
pub fn college_bounds(incumbents: usize, party_count: usize) -> (usize, usize) {
    let lower = COLLEGE_MIN_CANDIDATES.max(incumbents);
    let upper = COLLEGE_MAX_CANDIDATES
        .min(party_count.saturating_add(2))
        .max(lower);
    (lower, upper)
}

impl Allocator for ElectoralCollegeAllocator {
    fn allocate(
        &self,
        request: &GenerationRequest,
        system: ElectoralSystem,
        batch: &mut CandidateBatchFactory<'_>,
    ) -> GenerationOutput {
        let incumbents = running_incumbents(request, batch);
        let (lower, upper) = college_bounds(incumbents.len(), request.parties_in_scope.len());
        let target = sample_count(batch.rng(), lower, upper);

        let scope = open_parties(&request.parties_in_scope, &incumbents);
        let challengers = batch.generate(
            target.saturating_sub(incumbents.len()),
            &request.country_id,
            &scope,
            BatchOptions::default(),
        );
        let filter = PartyAllocationFilter::from_config(batch.config());
        let challengers = filter.dedupe_against(&incumbents, challengers, batch.rng());

        let college = &batch.config().electoral_college;
        let mut field = incumbents;
        field.extend(challengers);
        for candidate in &mut field {
            candidate.campaign_funds = candidate
                .campaign_funds
                .saturating_mul(college.funds_multiplier);
            candidate.is_presidential_candidate = true;
            candidate.electoral_strategy = Some(ElectoralStrategy::default());
        }
        assign_polling(
            &mut field,
            &request.parties_in_scope,
            &request.election_properties_for_scoring,
        );
        log::debug!(
            "{system}: {} presidential candidates (target {target} in {lower}..={upper})",
            field.len()
        );
        GenerationOutput::ElectoralCollegeCandidates {
            data: into_map(field),
            metadata: ElectoralCollegeMetadata {
                total_electoral_votes: college.total_electoral_votes,
                needed_to_win: college.needed_to_win,
            },
        }
    }
}
