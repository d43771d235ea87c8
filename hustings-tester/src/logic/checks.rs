//! Structural properties every generated envelope must satisfy.
use std::collections::{BTreeMap, HashSet};

use hustings_engine::allocators::{
    college_bounds, list_size_bounds, mmp_seat_split, multi_member_bounds, party_quota,
    single_winner_bounds,
};
use hustings_engine::constants::{STANCE_MAX, STANCE_MIN};
use hustings_engine::{
    AllocatorKind, Candidate, ElectoralSystem, GenerationOutput, GenerationRequest,
    MmpParticipants, PartyListMap,
};

/// Rounded polling shares may drift from 100 by this much per candidate.
const POLLING_TOLERANCE_PER_CANDIDATE: f64 = 0.06;

/// Run every applicable check and collect the violations.
pub fn check_output(
    request: &GenerationRequest,
    system: ElectoralSystem,
    output: &GenerationOutput,
) -> Vec<String> {
    let mut violations = Vec::new();
    if output.kind() != system.as_str() {
        violations.push(format!(
            "envelope kind {} does not match {system}",
            output.kind()
        ));
    }
    let candidates = output.all_candidates();
    violations.extend(check_unique_ids(&candidates));
    violations.extend(check_stances_bounded(&candidates));
    violations.extend(check_parties_in_scope(request, &candidates));

    let incumbents = request.running_incumbents().count();
    let parties = request.parties_in_scope.len();
    match (system.allocator(), output) {
        (AllocatorKind::SingleWinner, GenerationOutput::IndividualCandidates { .. }) => {
            let (_, upper) = single_winner_bounds(incumbents, parties);
            violations.extend(check_count(&candidates, incumbents.max(1), upper));
            violations.extend(check_polling(&candidates));
        }
        (
            AllocatorKind::ElectoralCollege,
            GenerationOutput::ElectoralCollegeCandidates { metadata, .. },
        ) => {
            let (_, upper) = college_bounds(incumbents, parties);
            violations.extend(check_count(&candidates, incumbents.max(1), upper));
            violations.extend(check_polling(&candidates));
            if candidates.iter().any(|c| !c.is_presidential_candidate) {
                violations.push("college candidate not flagged presidential".to_string());
            }
            if metadata.needed_to_win.saturating_mul(2) <= metadata.total_electoral_votes {
                violations.push(format!(
                    "{} of {} electoral votes is not a majority",
                    metadata.needed_to_win, metadata.total_electoral_votes
                ));
            }
        }
        (AllocatorKind::PartyList, GenerationOutput::PartyLists { data }) => {
            violations.extend(check_party_lists(request, data));
        }
        (AllocatorKind::MixedMember, GenerationOutput::MmpParticipants { data }) => {
            violations.extend(check_mmp(request, data));
        }
        (AllocatorKind::MultiMember, GenerationOutput::IndividualCandidates { .. }) => {
            let (lower, upper) = multi_member_bounds(request.seats());
            violations.extend(check_count(
                &candidates,
                lower.max(incumbents),
                upper.max(incumbents),
            ));
            violations.extend(check_quota(
                &candidates,
                party_quota(request.seats(), parties),
            ));
            if candidates.iter().any(|c| !c.is_mmd_candidate) {
                violations.push("multi-member candidate not flagged".to_string());
            }
            violations.extend(check_polling(&candidates));
        }
        (kind, _) => violations.push(format!("{kind:?} produced an unexpected envelope")),
    }
    violations
}

pub fn check_unique_ids(candidates: &[&Candidate]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut violations = Vec::new();
    for candidate in candidates {
        if !seen.insert(candidate.id()) {
            violations.push(format!("duplicate candidate id {}", candidate.id()));
        }
    }
    violations
}

pub fn check_stances_bounded(candidates: &[&Candidate]) -> Vec<String> {
    candidates
        .iter()
        .flat_map(|c| {
            c.policy_stances
                .iter()
                .filter(|(_, value)| !(STANCE_MIN..=STANCE_MAX).contains(*value))
                .map(move |(key, value)| {
                    format!("{}: stance {key} = {value} out of range", c.id())
                })
        })
        .collect()
}

/// Affiliated candidates must belong to a party in scope.
pub fn check_parties_in_scope(
    request: &GenerationRequest,
    candidates: &[&Candidate],
) -> Vec<String> {
    let scope: HashSet<&str> = request
        .parties_in_scope
        .iter()
        .map(|p| p.id.as_str())
        .collect();
    candidates
        .iter()
        .filter(|c| !c.is_independent())
        .filter_map(|c| {
            let party = c.party_id.as_deref().unwrap_or_default();
            (!scope.contains(party)).then(|| format!("{}: party {party} not in scope", c.id()))
        })
        .collect()
}

fn check_count(candidates: &[&Candidate], lower: usize, upper: usize) -> Vec<String> {
    let count = candidates.len();
    if (lower..=upper).contains(&count) {
        Vec::new()
    } else {
        vec![format!("{count} candidates outside [{lower}, {upper}]")]
    }
}

fn check_polling(candidates: &[&Candidate]) -> Vec<String> {
    if candidates.is_empty() {
        return Vec::new();
    }
    let total: f64 = candidates.iter().map(|c| c.polling).sum();
    let count = u32::try_from(candidates.len()).unwrap_or(u32::MAX);
    let tolerance = POLLING_TOLERANCE_PER_CANDIDATE * f64::from(count);
    if (total - 100.0).abs() > tolerance {
        vec![format!("polling sums to {total:.1}")]
    } else {
        Vec::new()
    }
}

fn check_quota(candidates: &[&Candidate], quota: usize) -> Vec<String> {
    let mut per_party: BTreeMap<&str, usize> = BTreeMap::new();
    for candidate in candidates.iter().filter(|c| !c.is_independent()) {
        *per_party
            .entry(candidate.party_id.as_deref().unwrap_or_default())
            .or_insert(0) += 1;
    }
    per_party
        .into_iter()
        .filter(|(_, count)| *count > quota)
        .map(|(party, count)| format!("party {party} fields {count} nominees (quota {quota})"))
        .collect()
}

fn check_list_numbering(party: &str, members: &[Candidate]) -> Option<String> {
    let numbered = members
        .iter()
        .zip(1u32..)
        .all(|(member, position)| member.list_position == Some(position));
    (!numbered).then(|| format!("list {party} is not numbered from 1"))
}

fn check_party_lists(request: &GenerationRequest, lists: &PartyListMap) -> Vec<String> {
    let mut violations = Vec::new();
    if lists.len() != request.parties_in_scope.len() {
        violations.push(format!(
            "{} lists for {} parties",
            lists.len(),
            request.parties_in_scope.len()
        ));
    }
    let (lower, upper) = list_size_bounds(request.seats());
    for (party, members) in lists {
        if !(lower..=upper).contains(&members.len()) {
            violations.push(format!(
                "list {party} has {} members outside [{lower}, {upper}]",
                members.len()
            ));
        }
        if members.iter().any(|m| m.party_id.as_deref() != Some(party.as_str())) {
            violations.push(format!("list {party} carries a foreign member"));
        }
        violations.extend(check_list_numbering(party, members));
    }
    violations
}

fn check_mmp(request: &GenerationRequest, data: &MmpParticipants) -> Vec<String> {
    let mut violations = Vec::new();
    let (constituency, list) = mmp_seat_split(request.seats());
    if data.constituency_seats + data.list_seats != request.seats()
        || (data.constituency_seats, data.list_seats) != (constituency, list)
    {
        violations.push(format!(
            "seat split {}/{} for {} seats",
            data.constituency_seats,
            data.list_seats,
            request.seats()
        ));
    }
    for (party, members) in &data.party_lists {
        if members.len() < 3 {
            violations.push(format!("MMP list {party} has only {} members", members.len()));
        }
        violations.extend(check_list_numbering(party, members));
    }
    if data.independent_constituency_candidates.is_empty() {
        violations.push("independent constituency pool is empty".to_string());
    }
    if data
        .independent_constituency_candidates
        .iter()
        .any(|c| !c.is_independent() || !c.is_constituency_candidate)
    {
        violations.push("independent pool carries a party nominee".to_string());
    }
    violations
}
