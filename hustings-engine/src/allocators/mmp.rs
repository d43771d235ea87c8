//! Mixed-member proportional elections.
use super::{Allocator, number_list};
use crate::batch::{BatchOptions, CandidateBatchFactory};
use crate::candidate::Candidate;
use crate::constants::{MMP_CONSTITUENCY_SHARE, MMP_INDEPENDENT_SHARE, MMP_LIST_MIN, MMP_LIST_SHARE};
use crate::election::{ElectoralSystem, GenerationRequest};
use crate::numbers::{i64_to_usize, round_f64_to_usize, usize_to_f64, usize_to_i64};
use crate::output::{GenerationOutput, MmpParticipants};
use crate::party::sort_by_popularity;
use crate::rng::RandomSource;

/// Party lists, per-party constituency nominees and an independent pool,
/// all drawn from one run so no id appears twice.
#[derive(Debug, Clone, Copy, Default)]
pub struct MixedMemberAllocator;

/// `(constituency, list)` seats; the list tier takes the odd seat.
#[must_use]
pub const fn mmp_seat_split(seats: usize) -> (usize, usize) {
    let constituency = seats / 2;
    (constituency, seats - constituency)
}

fn share_of(seats: usize, share: f64) -> usize {
    round_f64_to_usize(usize_to_f64(seats) * share)
}

fn party_list_size(list_seats: usize, rng: &mut dyn RandomSource) -> usize {
    let base = usize_to_i64(share_of(list_seats, MMP_LIST_SHARE));
    i64_to_usize(base + rng.next_int(-1, 1)).max(MMP_LIST_MIN)
}

fn mark_constituency(candidates: &mut [Candidate]) {
    for candidate in candidates {
        candidate.is_constituency_candidate = true;
    }
}

impl Allocator for MixedMemberAllocator {
    fn allocate(
        &self,
        request: &GenerationRequest,
        system: ElectoralSystem,
        batch: &mut CandidateBatchFactory<'_>,
    ) -> GenerationOutput {
        let (constituency_seats, list_seats) = mmp_seat_split(request.seats());
        let country = request.country_id.as_str();
        let scope = request.parties_in_scope.as_slice();
        let mut participants = MmpParticipants {
            constituency_seats,
            list_seats,
            ..MmpParticipants::default()
        };

        let per_party_locals = share_of(constituency_seats, MMP_CONSTITUENCY_SHARE).max(1);
        for party in sort_by_popularity(scope) {
            let size = party_list_size(list_seats, batch.rng());
            let nominate = BatchOptions::for_party(&party.id);
            let mut list = batch.generate(size, country, scope, nominate);
            number_list(&mut list);
            participants.party_lists.insert(party.id.clone(), list);

            let mut locals = batch.generate(per_party_locals, country, scope, nominate);
            mark_constituency(&mut locals);
            participants
                .constituency_candidates_by_party
                .insert(party.id.clone(), locals);
        }

        let pool_size = share_of(constituency_seats, MMP_INDEPENDENT_SHARE).max(1);
        let mut pool = batch.generate(pool_size, country, scope, BatchOptions::independents());
        mark_constituency(&mut pool);
        participants.independent_constituency_candidates = pool;

        log::debug!(
            "{system}: {constituency_seats}/{list_seats} seat split, {} participants",
            participants.iter().count()
        );
        GenerationOutput::MmpParticipants { data: participants }
    }
}
