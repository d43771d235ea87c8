use std::collections::HashSet;

use hustings_engine::{
    BaseCandidate, Candidate, FactoryRequest, GenerationOutput, GenerationRequest, ManualClock,
    ParticipantEngine, PartyRoster, RandomSource, ScriptedRandom, SeededRandom,
    TableNameGenerator,
};

/// A factory that hands out the same id and name for every politician.
fn stuck_factory(_: &FactoryRequest<'_>, _: &mut dyn RandomSource) -> BaseCandidate {
    BaseCandidate::new("clone", "Pat Clone")
}

#[test]
fn constant_ids_are_disambiguated_across_sub_generations() {
    let mut engine = ParticipantEngine::new(
        stuck_factory,
        SeededRandom::new(21),
        ManualClock::starting_at(42_000),
    );
    let request = GenerationRequest::new("MMP", "USA", PartyRoster::default_roster().take(3), 10);
    let output = engine.generate(&request).unwrap();

    let ids: Vec<&str> = output.all_candidates().iter().map(|c| c.id()).collect();
    let unique: HashSet<&str> = ids.iter().copied().collect();
    assert_eq!(unique.len(), ids.len());
    assert!(ids.contains(&"clone"));
    assert!(ids.iter().filter(|id| **id != "clone").all(|id| id.starts_with("clone_42000_")));
}

#[test]
fn duplicate_names_are_rerolled_with_a_name_generator() {
    let mut engine = ParticipantEngine::new(
        stuck_factory,
        SeededRandom::new(5),
        ManualClock::starting_at(0),
    )
    .with_name_generator(TableNameGenerator);
    let request = GenerationRequest::new("MMD", "USA", PartyRoster::default_roster().take(2), 4);
    let GenerationOutput::IndividualCandidates { data, .. } = engine.generate(&request).unwrap()
    else {
        panic!("expected individual candidates");
    };
    let renamed = data.values().filter(|c| c.name() != "Pat Clone").count();
    assert!(renamed >= 1);
}

#[test]
fn scripted_randomness_makes_branches_predictable() {
    // 0.95 never hits the 10% independent or 15% variety branches
    let mut engine = ParticipantEngine::new(
        stuck_factory,
        ScriptedRandom::constant(0.95),
        ManualClock::starting_at(0),
    );
    let parties = PartyRoster::default_roster().take(3);
    let request = GenerationRequest::new("PluralityMMD", "USA", parties.clone(), 2);
    let GenerationOutput::IndividualCandidates { data, .. } = engine.generate(&request).unwrap()
    else {
        panic!("expected individual candidates");
    };
    // bounds for two seats are 6..=6
    assert_eq!(data.len(), 6);
    // quota 2 / 3 + 1 = 1: one nominee per party, the rest relabeled
    let affiliated: HashSet<&str> = data
        .values()
        .filter(|c| !c.is_independent())
        .filter_map(|c| c.party_id.as_deref())
        .collect();
    assert_eq!(affiliated.len(), parties.len());
    assert_eq!(data.values().filter(|c| c.is_independent()).count(), 3);
}

#[test]
fn factory_attributes_cannot_shadow_engine_fields() {
    let mut next = 0u32;
    let shadowing = move |_: &FactoryRequest<'_>, _: &mut dyn RandomSource| {
        next += 1;
        let mut base = BaseCandidate::new(format!("s-{next}"), format!("Sam Shadow {next}"));
        base.attributes
            .insert("partyId".to_string(), serde_json::json!("rogue"));
        base.attributes.insert("polling".to_string(), serde_json::json!(0));
        base.attributes
            .insert("constituency".to_string(), serde_json::json!("North"));
        base
    };
    let mut engine =
        ParticipantEngine::new(shadowing, SeededRandom::new(8), ManualClock::starting_at(0));
    let request = GenerationRequest::new("FPTP", "USA", PartyRoster::default_roster().take(3), 1);
    let output = engine.generate(&request).unwrap();

    for candidate in output.all_candidates() {
        let json = serde_json::to_string(candidate).unwrap();
        assert_eq!(json.matches("\"partyId\"").count(), 1, "{json}");
        assert_eq!(json.matches("\"polling\"").count(), 1, "{json}");
        assert!(!json.contains("rogue"));
        let back: Candidate = serde_json::from_str(&json).unwrap();
        assert_eq!(&back, candidate);
        assert_eq!(
            back.base.attributes.get("constituency"),
            Some(&serde_json::json!("North"))
        );
    }
}
