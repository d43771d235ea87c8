use std::collections::HashSet;

use hustings_engine::allocators::{college_bounds, multi_member_bounds, single_winner_bounds};
use hustings_engine::{
    ActiveCampaign, Candidate, GenerationError, GenerationOutput, GenerationRequest, Incumbent,
    ManualClock, ParticipantEngine, Party, PartyRoster, SeededRandom, SyntheticPoliticianFactory,
};

type TestEngine = ParticipantEngine<SyntheticPoliticianFactory, SeededRandom, ManualClock>;

fn engine(seed: u64) -> TestEngine {
    ParticipantEngine::new(
        SyntheticPoliticianFactory::new(),
        SeededRandom::from_user_seed(seed),
        ManualClock::starting_at(1_700_000_000_000),
    )
}

fn parties(count: usize) -> Vec<Party> {
    PartyRoster::default_roster().take(count)
}

fn incumbent(id: &str, party_id: &str, running: bool) -> Incumbent {
    Incumbent {
        id: id.to_string(),
        name: format!("Incumbent {id}"),
        party_id: Some(party_id.to_string()),
        is_actually_running: running,
        name_recognition: None,
    }
}

fn assert_ids_unique(candidates: &[&Candidate]) {
    let ids: HashSet<&str> = candidates.iter().map(|c| c.id()).collect();
    assert_eq!(ids.len(), candidates.len(), "duplicate candidate ids");
}

fn assert_stances_bounded(candidates: &[&Candidate]) {
    for candidate in candidates {
        assert!(!candidate.policy_stances.is_empty());
        for (question, stance) in &candidate.policy_stances {
            assert!(
                (0.0..=100.0).contains(stance),
                "{} has stance {stance} on {question}",
                candidate.id()
            );
        }
    }
}

fn assert_parties_in_scope(candidates: &[&Candidate], scope: &[Party]) {
    for candidate in candidates {
        if candidate.is_independent() {
            continue;
        }
        let party_id = candidate.party_id.as_deref().unwrap_or_default();
        assert!(
            scope.iter().any(|p| p.id == party_id),
            "{party_id} is not in scope"
        );
    }
}

#[test]
fn every_system_emits_unique_bounded_candidates() {
    let systems = [
        "FPTP",
        "TwoRoundSystem",
        "ElectoralCollege",
        "PartyListPR",
        "MMP",
        "MMD",
        "SNTV",
        "BlockVote",
        "PluralityMMD",
    ];
    for seed in 0..8 {
        let mut engine = engine(seed);
        for system in systems {
            let scope = parties(4);
            let request = GenerationRequest::new(system, "USA", scope.clone(), 7)
                .with_incumbents(vec![incumbent("inc-1", "civic_union", true)]);
            let output = engine.generate(&request).unwrap();
            let candidates = output.all_candidates();
            assert!(!candidates.is_empty(), "{system} produced nobody");
            assert_eq!(candidates.len(), output.candidate_count());
            assert_ids_unique(&candidates);
            assert_stances_bounded(&candidates);
            assert_parties_in_scope(&candidates, &scope);
        }
    }
}

#[test]
fn single_party_fptp_stays_within_bounds() {
    let (min, max) = single_winner_bounds(0, 1);
    for seed in 0..40 {
        let mut engine = engine(seed);
        let request = GenerationRequest::new("FPTP", "GBR", parties(1), 1);
        let output = engine.generate(&request).unwrap();
        let count = output.candidate_count();
        assert!(count >= 1, "seed {seed} produced no candidates");
        assert!(count <= max, "seed {seed}: {count} > {max}");
        assert!(min <= max);
    }
}

#[test]
fn fptp_keeps_running_incumbents_and_polls_to_one_hundred() {
    let mut engine = engine(5);
    let request = GenerationRequest::new("FPTP", "USA", parties(3), 1).with_incumbents(vec![
        incumbent("inc-1", "civic_union", true),
        incumbent("inc-2", "labour_front", false),
    ]);
    let GenerationOutput::IndividualCandidates { system, data } = engine.generate(&request).unwrap()
    else {
        panic!("expected individual candidates");
    };
    assert_eq!(system.as_str(), "FPTP");
    let sitting = &data["inc-1"];
    assert!(sitting.is_incumbent);
    assert!(!data.contains_key("inc-2"));
    assert!((50..=85).contains(&sitting.name_recognition));

    let total: f64 = data.values().map(|c| c.polling).sum();
    assert!((total - 100.0).abs() <= 0.1 * data.len() as f64);
}

#[test]
fn electoral_college_marks_presidential_candidates() {
    for seed in 0..10 {
        let mut engine = engine(seed);
        let request = GenerationRequest::new("ElectoralCollege", "USA", parties(2), 1);
        let GenerationOutput::ElectoralCollegeCandidates { data, metadata } =
            engine.generate(&request).unwrap()
        else {
            panic!("expected electoral college candidates");
        };
        assert_eq!(metadata.total_electoral_votes, 538);
        assert_eq!(metadata.needed_to_win, 270);
        let (_, upper) = college_bounds(0, 2);
        assert!(data.len() <= upper);
        for candidate in data.values() {
            assert!(candidate.is_presidential_candidate);
            assert!(candidate.electoral_strategy.is_some());
            assert!(candidate.campaign_funds >= 500_000);
        }
    }
}

#[test]
fn party_lists_are_numbered_per_party() {
    let mut engine = engine(11);
    let scope = parties(3);
    let request = GenerationRequest::new("PartyListPR", "DEU", scope.clone(), 12);
    let GenerationOutput::PartyLists { data } = engine.generate(&request).unwrap() else {
        panic!("expected party lists");
    };
    assert_eq!(data.len(), scope.len());
    for (party_id, list) in &data {
        assert!((7..=27).contains(&list.len()), "{party_id} has {}", list.len());
        for (index, member) in list.iter().enumerate() {
            assert_eq!(member.party_id.as_deref(), Some(party_id.as_str()));
            assert_eq!(member.list_position, Some(u32::try_from(index + 1).unwrap()));
        }
    }
}

#[test]
fn mmp_with_ten_seats_and_three_parties() {
    for seed in 0..20 {
        let mut engine = engine(seed);
        let request = GenerationRequest::new("MMP", "NZL", parties(3), 10);
        let GenerationOutput::MmpParticipants { data } = engine.generate(&request).unwrap() else {
            panic!("expected MMP participants");
        };
        assert_eq!(data.constituency_seats, 5);
        assert_eq!(data.list_seats, 5);
        assert_eq!(data.constituency_seats + data.list_seats, 10);
        assert_eq!(data.party_lists.len(), 3);
        for list in data.party_lists.values() {
            assert!((3..=8).contains(&list.len()));
        }
        for locals in data.constituency_candidates_by_party.values() {
            assert!(locals.iter().all(|c| c.is_constituency_candidate));
        }
        assert!(!data.independent_constituency_candidates.is_empty());
        assert!(data
            .independent_constituency_candidates
            .iter()
            .all(Candidate::is_independent));

        let everyone: Vec<&Candidate> = data.iter().collect();
        assert_ids_unique(&everyone);
    }
}

#[test]
fn multi_member_districts_relabel_over_quota() {
    for seed in 0..10 {
        let mut engine = engine(seed);
        let request = GenerationRequest::new("SNTV", "JPN", parties(2), 3);
        let GenerationOutput::IndividualCandidates { data, .. } = engine.generate(&request).unwrap()
        else {
            panic!("expected individual candidates");
        };
        let (lower, upper) = multi_member_bounds(3);
        assert!((lower..=upper).contains(&data.len()));
        // quota = 3 / 2 + 1
        for party in parties(2) {
            let fielded = data
                .values()
                .filter(|c| c.party_id.as_deref() == Some(party.id.as_str()))
                .count();
            assert!(fielded <= 2, "{} fielded {fielded}", party.id);
        }
        assert!(data.values().all(|c| c.is_mmd_candidate));
    }
}

#[test]
fn dispatcher_reports_fallback_and_invalid_input() {
    let mut engine = engine(1);
    let unknown = GenerationRequest::new("UnknownSystem", "USA", parties(2), 1);
    let err = engine.generate(&unknown).unwrap_err();
    assert!(err.is_fallback());

    let empty = GenerationRequest::new("FPTP", "USA", Vec::new(), 1);
    assert_eq!(engine.generate(&empty).unwrap_err(), GenerationError::EmptyPartyScope);

    let mut missing = GenerationRequest::new("FPTP", "USA", parties(2), 1);
    missing.election_type = None;
    assert_eq!(
        engine.generate(&missing).unwrap_err(),
        GenerationError::MissingElectionType
    );
}

#[test]
fn player_candidate_id_is_never_reissued() {
    let mut issued = 0u32;
    let factory = move |_: &hustings_engine::FactoryRequest<'_>,
                        _: &mut dyn hustings_engine::RandomSource| {
        issued += 1;
        let id = if issued == 1 { "player-1".to_string() } else { format!("npc-{issued}") };
        hustings_engine::BaseCandidate::new(id, format!("Npc {issued}"))
    };
    let mut engine = ParticipantEngine::new(
        factory,
        SeededRandom::new(3),
        ManualClock::starting_at(0),
    );
    let mut request = GenerationRequest::new("MMD", "USA", parties(3), 4);
    request.active_campaign = Some(ActiveCampaign {
        player_candidate_id: Some("player-1".to_string()),
    });
    let output = engine.generate(&request).unwrap();
    assert!(output.all_candidates().iter().all(|c| c.id() != "player-1"));
}

#[test]
fn cache_expires_after_ttl_on_manual_clock() {
    let clock = ManualClock::starting_at(0);
    let mut engine = ParticipantEngine::new(
        SyntheticPoliticianFactory::new(),
        SeededRandom::new(17),
        clock.clone(),
    );
    let request = GenerationRequest::new("PartyListPR", "FRA", parties(2), 4);

    engine.generate(&request).unwrap();
    let warm = engine.cache_stats();
    assert_eq!(warm.stance_templates, 2);
    assert_eq!(warm.misses, 2);
    assert_eq!(warm.clears, 0);

    clock.advance_secs(299);
    engine.generate(&request).unwrap();
    let reused = engine.cache_stats();
    assert_eq!(reused.clears, 0);
    assert_eq!(reused.misses, 2);
    assert!(reused.hits > warm.hits);

    clock.advance_secs(1);
    engine.generate(&request).unwrap();
    let refreshed = engine.cache_stats();
    assert_eq!(refreshed.clears, 1);
    assert_eq!(refreshed.stance_templates, 2);
    assert_eq!(refreshed.misses, 4);
}
