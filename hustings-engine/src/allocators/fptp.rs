//! First-past-the-post and two-round races.
use super::{Allocator, assign_polling, into_map, open_parties, running_incumbents, sample_count};
use crate::batch::{BatchOptions, CandidateBatchFactory};
use crate::constants::{FPTP_CAP_OPEN_SEAT, FPTP_CAP_WITH_INCUMBENT};
use crate::election::{ElectoralSystem, GenerationRequest};
use crate::filter::PartyAllocationFilter;
use crate::output::GenerationOutput;

/// Single-winner races: running incumbents plus at most one nominee per party.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleWinnerAllocator;

/// Inclusive candidate-count bounds for a single-winner race.
///
/// At least every running incumbent and two contenders when two parties are
/// available; at most two more than the party count, capped at six with an
/// incumbent in the race and five for an open seat.
#[must_use]
pub fn single_winner_bounds(incumbents: usize, party_count: usize) -> (usize, usize) {
    let contenders = if party_count >= 2 { 2 } else { 1 };
    let min_total = incumbents.max(contenders);
    let cap = if incumbents > 0 {
        FPTP_CAP_WITH_INCUMBENT
    } else {
        FPTP_CAP_OPEN_SEAT
    };
    let max_total = cap.min(party_count.saturating_add(2)).max(min_total);
    (min_total, max_total)
}

impl Allocator for SingleWinnerAllocator {
    fn allocate(
        &self,
        request: &GenerationRequest,
        system: ElectoralSystem,
        batch: &mut CandidateBatchFactory<'_>,
    ) -> GenerationOutput {
        let incumbents = running_incumbents(request, batch);
        let (min_total, max_total) =
            single_winner_bounds(incumbents.len(), request.parties_in_scope.len());
        let target = sample_count(batch.rng(), min_total, max_total);

        let scope = open_parties(&request.parties_in_scope, &incumbents);
        let challengers = batch.generate(
            target.saturating_sub(incumbents.len()),
            &request.country_id,
            &scope,
            BatchOptions::default(),
        );
        let filter = PartyAllocationFilter::from_config(batch.config());
        let challengers = filter.dedupe_against(&incumbents, challengers, batch.rng());

        let mut field = incumbents;
        field.extend(challengers);
        assign_polling(
            &mut field,
            &request.parties_in_scope,
            &request.election_properties_for_scoring,
        );
        log::debug!(
            "{system}: {} candidates (target {target} in {min_total}..={max_total})",
            field.len()
        );
        GenerationOutput::IndividualCandidates {
            system,
            data: into_map(field),
        }
    }
}
