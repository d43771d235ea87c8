//! Multi-member districts: MMD, SNTV, block vote and plurality-at-large.
use super::{Allocator, assign_polling, into_map, running_incumbents, sample_count};
use crate::batch::{BatchOptions, CandidateBatchFactory};
use crate::constants::{MMD_MAX_CANDIDATES, MMD_MIN_CANDIDATES};
use crate::election::{ElectoralSystem, GenerationRequest};
use crate::filter::PartyAllocationFilter;
use crate::output::GenerationOutput;

#[derive(Debug, Clone, Copy, Default)]
pub struct MultiMemberAllocator;

/// Inclusive field-size bounds for a district electing `seats` members.
#[must_use]
pub fn multi_member_bounds(seats: usize) -> (usize, usize) {
    let lower = seats.saturating_add(2).max(MMD_MIN_CANDIDATES);
    let upper = seats.saturating_mul(3).min(MMD_MAX_CANDIDATES).max(lower);
    (lower, upper)
}

/// Nominees a single party may field before the rest run as independents.
#[must_use]
pub const fn party_quota(seats: usize, party_count: usize) -> usize {
    let parties = if party_count == 0 { 1 } else { party_count };
    seats / parties + 1
}

impl Allocator for MultiMemberAllocator {
    fn allocate(
        &self,
        request: &GenerationRequest,
        system: ElectoralSystem,
        batch: &mut CandidateBatchFactory<'_>,
    ) -> GenerationOutput {
        let seats = request.seats();
        let incumbents = running_incumbents(request, batch);
        let (lower, upper) = multi_member_bounds(seats);
        let target = sample_count(batch.rng(), lower, upper).max(incumbents.len());

        let challengers = batch.generate(
            target.saturating_sub(incumbents.len()),
            &request.country_id,
            &request.parties_in_scope,
            BatchOptions::default(),
        );
        let mut field = incumbents;
        field.extend(challengers);

        let quota = party_quota(seats, request.parties_in_scope.len());
        let filter = PartyAllocationFilter::from_config(batch.config());
        let mut field = filter.enforce_quota(field, quota);
        for candidate in &mut field {
            candidate.is_mmd_candidate = true;
        }
        assign_polling(
            &mut field,
            &request.parties_in_scope,
            &request.election_properties_for_scoring,
        );
        log::debug!(
            "{system}: {} candidates for {seats} seats (quota {quota} per party)",
            field.len()
        );
        GenerationOutput::IndividualCandidates {
            system,
            data: into_map(field),
        }
    }
}
