//! Per-system allocation strategies.
//!
//! Each allocator decides how many candidates or lists an election needs,
//! draws them from the run's [`CandidateBatchFactory`] and shapes the
//! envelope.
use std::collections::BTreeMap;

use crate::batch::CandidateBatchFactory;
use crate::candidate::Candidate;
use crate::constants::{POLLING_POPULARITY_WEIGHT, POLLING_RECOGNITION_WEIGHT};
use crate::election::{AllocatorKind, ElectoralSystem, GenerationRequest, ScoringProperties};
use crate::numbers::{i64_to_usize, round_tenths, usize_to_f64, usize_to_i64};
use crate::output::{CandidateMap, GenerationOutput};
use crate::party::Party;
use crate::rng::RandomSource;

mod electoral_college;
mod fptp;
mod mmd;
mod mmp;
mod party_list;

pub use electoral_college::{ElectoralCollegeAllocator, college_bounds};
pub use fptp::{SingleWinnerAllocator, single_winner_bounds};
pub use mmd::{MultiMemberAllocator, multi_member_bounds, party_quota};
pub use mmp::{MixedMemberAllocator, mmp_seat_split};
pub use party_list::{PartyListAllocator, list_size_bounds};

/// Builds the participant envelope for one family of electoral systems.
pub trait Allocator {
    fn allocate(
        &self,
        request: &GenerationRequest,
        system: ElectoralSystem,
        batch: &mut CandidateBatchFactory<'_>,
    ) -> GenerationOutput;
}

/// The allocator responsible for `kind`.
#[must_use]
pub fn allocator_for(kind: AllocatorKind) -> &'static dyn Allocator {
    match kind {
        AllocatorKind::SingleWinner => &SingleWinnerAllocator,
        AllocatorKind::ElectoralCollege => &ElectoralCollegeAllocator,
        AllocatorKind::PartyList => &PartyListAllocator,
        AllocatorKind::MixedMember => &MixedMemberAllocator,
        AllocatorKind::MultiMember => &MultiMemberAllocator,
    }
}

/// Uniform count in `[min, max]`; `max` below `min` yields `min`.
pub(crate) fn sample_count(rng: &mut dyn RandomSource, min: usize, max: usize) -> usize {
    i64_to_usize(rng.next_int(usize_to_i64(min), usize_to_i64(max)))
}

/// Candidate records for every incumbent defending the seat, in input order.
pub(crate) fn running_incumbents(
    request: &GenerationRequest,
    batch: &mut CandidateBatchFactory<'_>,
) -> Vec<Candidate> {
    request
        .running_incumbents()
        .map(|incumbent| {
            batch.incumbent(incumbent, &request.country_id, &request.parties_in_scope)
        })
        .collect()
}

/// Parties with no incumbent already standing, or the whole scope when every
/// party is covered.
pub(crate) fn open_parties(scope: &[Party], incumbents: &[Candidate]) -> Vec<Party> {
    let open: Vec<Party> = scope
        .iter()
        .filter(|party| {
            !incumbents
                .iter()
                .any(|c| c.party_id.as_deref() == Some(party.id.as_str()))
        })
        .cloned()
        .collect();
    if open.is_empty() { scope.to_vec() } else { open }
}

/// Spread 100 polling points across `candidates`.
///
/// Each candidate's weight is its base score plus half its party's
/// popularity, a fifth of its name recognition, and the incumbency bonus.
pub fn assign_polling(
    candidates: &mut [Candidate],
    parties: &[Party],
    scoring: &ScoringProperties,
) {
    let weights: Vec<f64> = candidates
        .iter()
        .map(|candidate| {
            let popularity = candidate
                .party_id
                .as_deref()
                .and_then(|id| parties.iter().find(|p| p.id == id))
                .map_or(0.0, |p| p.popularity);
            let bonus = if candidate.is_incumbent {
                scoring.incumbent_polling_bonus
            } else {
                0.0
            };
            let weight = candidate.base_score
                + popularity * POLLING_POPULARITY_WEIGHT
                + f64::from(candidate.name_recognition) * POLLING_RECOGNITION_WEIGHT
                + bonus;
            weight.max(0.0)
        })
        .collect();
    let total: f64 = weights.iter().sum();
    let even = 100.0 / usize_to_f64(candidates.len().max(1));
    for (candidate, weight) in candidates.iter_mut().zip(weights) {
        candidate.polling = if total > 0.0 {
            round_tenths(weight / total * 100.0)
        } else {
            round_tenths(even)
        };
    }
}

/// Number list members from 1 in their current order.
pub(crate) fn number_list(members: &mut [Candidate]) {
    for (position, member) in (1u32..).zip(members.iter_mut()) {
        member.list_position = Some(position);
    }
}

pub(crate) fn into_map(candidates: Vec<Candidate>) -> CandidateMap {
    candidates
        .into_iter()
        .map(|candidate| (candidate.id().to_string(), candidate))
        .collect::<BTreeMap<_, _>>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::BaseCandidate;
    use crate::ideology::IdeologyVector;
    use crate::rng::ScriptedRandom;

    fn party(id: &str, popularity: f64) -> Party {
        Party {
            id: id.to_string(),
            name: id.to_string(),
            short_name: String::new(),
            color: String::new(),
            popularity,
            ideology_scores: IdeologyVector::new(),
        }
    }

    fn candidate(id: &str, party_id: Option<&str>, base_score: f64) -> Candidate {
        let mut candidate = Candidate::from_base(BaseCandidate::new(id, id));
        candidate.party_id = party_id.map(str::to_string);
        candidate.base_score = base_score;
        candidate
    }

    #[test]
    fn polling_is_normalised_and_weighted() {
        let parties = vec![party("a", 40.0)];
        let mut field = vec![
            candidate("x", Some("a"), 30.0),
            candidate("y", None, 50.0),
        ];
        field[0].is_incumbent = true;
        assign_polling(&mut field, &parties, &ScoringProperties::default());
        // x: 30 + 20 + 5 = 55, y: 50
        assert!((field[0].polling - 52.4).abs() < 1e-9);
        assert!((field[1].polling - 47.6).abs() < 1e-9);
    }

    #[test]
    fn zero_weights_split_evenly() {
        let mut field = vec![candidate("x", None, 0.0), candidate("y", None, -5.0)];
        assign_polling(&mut field, &[], &ScoringProperties::default());
        assert!((field[0].polling - 50.0).abs() < f64::EPSILON);
        assert!((field[1].polling - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn open_parties_skip_incumbent_held_seats() {
        let scope = vec![party("a", 1.0), party("b", 1.0)];
        let held = vec![candidate("inc", Some("a"), 0.0)];
        let open = open_parties(&scope, &held);
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].id, "b");

        let all_held = vec![
            candidate("i1", Some("a"), 0.0),
            candidate("i2", Some("b"), 0.0),
        ];
        assert_eq!(open_parties(&scope, &all_held).len(), 2);
    }

    #[test]
    fn sample_count_clamps_inverted_bounds() {
        let mut rng = ScriptedRandom::constant(0.99);
        assert_eq!(sample_count(&mut rng, 4, 2), 4);
        assert_eq!(sample_count(&mut rng, 1, 3), 3);
    }

    #[test]
    fn every_kind_has_an_allocator() {
        for system in ElectoralSystem::ALL {
            let _ = allocator_for(system.allocator());
        }
    }
}
