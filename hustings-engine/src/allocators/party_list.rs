//! Closed party-list proportional representation.
use super::{Allocator, number_list};
use crate::batch::{BatchOptions, CandidateBatchFactory};
use crate::constants::LIST_EXTRA_MAX;
use crate::election::{ElectoralSystem, GenerationRequest};
use crate::numbers::{i64_to_usize, usize_to_i64};
use crate::output::{GenerationOutput, PartyListMap};
use crate::party::sort_by_popularity;
use crate::rng::RandomSource;

/// One ordered list per party; lists are never deduplicated.
#[derive(Debug, Clone, Copy, Default)]
pub struct PartyListAllocator;

/// Inclusive list-length bounds for a chamber of `seats`.
#[must_use]
pub const fn list_size_bounds(seats: usize) -> (usize, usize) {
    (seats / 2 + 1, seats.saturating_add(LIST_EXTRA_MAX))
}

/// List length biased slightly above the seat count.
fn list_size(seats: usize, rng: &mut dyn RandomSource) -> usize {
    let (lower, upper) = list_size_bounds(seats);
    let spread = usize_to_i64(seats / 4);
    let jitter = rng.next_int(-spread, spread + 3);
    i64_to_usize(usize_to_i64(seats) + jitter).clamp(lower, upper)
}

impl Allocator for PartyListAllocator {
    fn allocate(
        &self,
        request: &GenerationRequest,
        system: ElectoralSystem,
        batch: &mut CandidateBatchFactory<'_>,
    ) -> GenerationOutput {
        let seats = request.seats();
        let mut lists = PartyListMap::new();
        for party in sort_by_popularity(&request.parties_in_scope) {
            let size = list_size(seats, batch.rng());
            let mut members = batch.generate(
                size,
                &request.country_id,
                &request.parties_in_scope,
                BatchOptions::for_party(&party.id),
            );
            number_list(&mut members);
            log::debug!("{system}: list for {} has {size} members", party.id);
            lists.insert(party.id.clone(), members);
        }
        GenerationOutput::PartyLists { data: lists }
    }
}
