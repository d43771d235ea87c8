use hustings_engine::{ActiveCampaign, GenerationError, GenerationRequest, Incumbent, PartyRoster};

/// What a scenario's request should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expectation {
    /// A populated envelope for the named system.
    Generated,
    /// An unsupported-system error telling the caller to fall back.
    Fallback,
    /// A rejected request.
    InvalidInput,
}

impl Expectation {
    /// Whether `err` is the failure this expectation allows.
    #[must_use]
    pub const fn accepts(self, err: &GenerationError) -> bool {
        match self {
            Self::Generated => false,
            Self::Fallback => err.is_fallback(),
            Self::InvalidInput => err.is_invalid_input(),
        }
    }
}

/// A named request template exercised across seeds and iterations.
#[derive(Debug, Clone)]
pub struct TestScenario {
    pub key: &'static str,
    pub description: &'static str,
    pub expectation: Expectation,
    build: fn(&PartyRoster) -> GenerationRequest,
}

impl TestScenario {
    const fn new(
        key: &'static str,
        description: &'static str,
        expectation: Expectation,
        build: fn(&PartyRoster) -> GenerationRequest,
    ) -> Self {
        Self {
            key,
            description,
            expectation,
            build,
        }
    }

    #[must_use]
    pub fn request(&self, roster: &PartyRoster) -> GenerationRequest {
        (self.build)(roster)
    }
}

pub fn catalog_scenarios() -> Vec<TestScenario> {
    vec![
        TestScenario::new(
            "fptp",
            "First-past-the-post seat with a defending incumbent",
            Expectation::Generated,
            fptp_request,
        ),
        TestScenario::new(
            "two-round",
            "Two-round presidential-style single seat",
            Expectation::Generated,
            |roster| GenerationRequest::new("TwoRoundSystem", "FRA", roster.take(5), 1),
        ),
        TestScenario::new(
            "electoral-college",
            "Presidential race decided by an electoral college",
            Expectation::Generated,
            |roster| GenerationRequest::new("ElectoralCollege", "USA", roster.take(3), 1),
        ),
        TestScenario::new(
            "party-list",
            "Closed party-list proportional chamber",
            Expectation::Generated,
            |roster| GenerationRequest::new("PartyListPR", "NLD", roster.take(4), 12),
        ),
        TestScenario::new(
            "mmp",
            "Mixed-member proportional chamber of ten seats",
            Expectation::Generated,
            |roster| GenerationRequest::new("MMP", "DEU", roster.take(3), 10),
        ),
        TestScenario::new(
            "mmd",
            "Multi-member district with an incumbent and player campaign",
            Expectation::Generated,
            mmd_request,
        ),
        TestScenario::new(
            "sntv",
            "Single non-transferable vote district",
            Expectation::Generated,
            |roster| GenerationRequest::new("SNTV", "JPN", roster.take(3), 4),
        ),
        TestScenario::new(
            "block-vote",
            "Block vote district",
            Expectation::Generated,
            |roster| GenerationRequest::new("BlockVote", "GBR", roster.take(2), 3),
        ),
        TestScenario::new(
            "plurality-mmd",
            "Plurality-at-large district",
            Expectation::Generated,
            |roster| GenerationRequest::new("PluralityMMD", "USA", roster.take(4), 2),
        ),
        TestScenario::new(
            "single-party",
            "FPTP seat contested by a single party",
            Expectation::Generated,
            |roster| GenerationRequest::new("FPTP", "GBR", roster.take(1), 1),
        ),
        TestScenario::new(
            "stray-incumbent",
            "Incumbent whose party is outside the scope",
            Expectation::Generated,
            stray_incumbent_request,
        ),
        TestScenario::new(
            "unsupported-system",
            "Unknown electoral system hands off to the caller",
            Expectation::Fallback,
            |roster| GenerationRequest::new("UnknownSystem", "IRL", roster.take(3), 3),
        ),
        TestScenario::new(
            "empty-scope",
            "Request with no parties in scope is rejected",
            Expectation::InvalidInput,
            |_| GenerationRequest::new("FPTP", "GBR", Vec::new(), 1),
        ),
        TestScenario::new(
            "missing-type",
            "Request without an election type is rejected",
            Expectation::InvalidInput,
            |roster| GenerationRequest {
                parties_in_scope: roster.take(2),
                ..GenerationRequest::default()
            },
        ),
    ]
}

pub fn find_scenario(key: &str) -> Option<TestScenario> {
    catalog_scenarios()
        .into_iter()
        .find(|scenario| scenario.key == key)
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    catalog_scenarios()
        .iter()
        .map(|scenario| (scenario.key, scenario.description))
        .collect()
}

fn incumbent(id: &str, name: &str, party_id: Option<String>) -> Incumbent {
    Incumbent {
        id: id.to_string(),
        name: name.to_string(),
        party_id,
        is_actually_running: true,
        name_recognition: None,
    }
}

fn fptp_request(roster: &PartyRoster) -> GenerationRequest {
    let parties = roster.take(4);
    let holder = parties.first().map(|p| p.id.clone());
    GenerationRequest::new("FPTP", "GBR", parties, 1)
        .with_incumbents(vec![incumbent("inc-fptp", "Sitting Member", holder)])
}

fn mmd_request(roster: &PartyRoster) -> GenerationRequest {
    let parties = roster.take(3);
    let holder = parties.get(1).map(|p| p.id.clone());
    let mut request = GenerationRequest::new("MMD", "USA", parties, 3)
        .with_incumbents(vec![incumbent("inc-mmd", "Long Server", holder)]);
    request.entity_population = Some(2_500_000);
    request.active_campaign = Some(ActiveCampaign {
        player_candidate_id: Some("player-1".to_string()),
    });
    request
}

fn stray_incumbent_request(roster: &PartyRoster) -> GenerationRequest {
    GenerationRequest::new("FPTP", "CAN", roster.take(2), 1).with_incumbents(vec![incumbent(
        "inc-stray",
        "Floor Crosser",
        Some("dissolved-party".to_string()),
    )])
}

#[cfg(test)]
mod tests {
    use super::*;
    use hustings_engine::ElectoralSystem;

    #[test]
    fn every_system_has_a_scenario() {
        let roster = PartyRoster::default_roster();
        let covered: Vec<String> = catalog_scenarios()
            .iter()
            .filter(|s| s.expectation == Expectation::Generated)
            .filter_map(|s| s.request(&roster).election_type)
            .map(|t| t.electoral_system)
            .collect();
        for system in ElectoralSystem::ALL {
            assert!(covered.iter().any(|s| s == system.as_str()), "{system}");
        }
    }

    #[test]
    fn scenario_keys_are_unique() {
        let keys: Vec<_> = list_scenarios().into_iter().map(|(k, _)| k).collect();
        let mut deduped = keys.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(keys.len(), deduped.len());
    }

    #[test]
    fn lookup_by_key() {
        assert!(find_scenario("mmp").is_some());
        assert!(find_scenario("stv").is_none());
    }

    #[test]
    fn expectations_match_error_kinds() {
        let unsupported = GenerationError::UnsupportedSystem {
            system: "STV".to_string(),
        };
        assert!(Expectation::Fallback.accepts(&unsupported));
        assert!(!Expectation::InvalidInput.accepts(&unsupported));
        assert!(Expectation::InvalidInput.accepts(&GenerationError::EmptyPartyScope));
        assert!(!Expectation::Generated.accepts(&GenerationError::EmptyPartyScope));
    }
}
