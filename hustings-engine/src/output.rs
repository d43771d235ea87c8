//! Result envelopes returned by the engine.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::candidate::Candidate;
use crate::config::GenerationConfigError;
use crate::election::ElectoralSystem;

/// Candidates keyed by id.
pub type CandidateMap = BTreeMap<String, Candidate>;

/// Ordered candidate lists keyed by party id.
pub type PartyListMap = BTreeMap<String, Vec<Candidate>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectoralCollegeMetadata {
    pub total_electoral_votes: u32,
    pub needed_to_win: u32,
}

/// Participants of a mixed-member proportional election.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MmpParticipants {
    pub constituency_seats: usize,
    pub list_seats: usize,
    pub party_lists: PartyListMap,
    pub constituency_candidates_by_party: PartyListMap,
    pub independent_constituency_candidates: Vec<Candidate>,
}

impl MmpParticipants {
    /// Every participant across lists, constituencies and the independent pool.
    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.party_lists
            .values()
            .flatten()
            .chain(self.constituency_candidates_by_party.values().flatten())
            .chain(self.independent_constituency_candidates.iter())
    }
}

/// Participants generated for one election, shaped by its electoral system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GenerationOutput {
    /// Single- and multi-member district races.
    IndividualCandidates {
        system: ElectoralSystem,
        data: CandidateMap,
    },
    ElectoralCollegeCandidates {
        data: CandidateMap,
        metadata: ElectoralCollegeMetadata,
    },
    PartyLists {
        data: PartyListMap,
    },
    #[serde(rename = "MMPParticipants")]
    MmpParticipants {
        data: MmpParticipants,
    },
}

impl GenerationOutput {
    /// Short result label used by game code that predates the typed envelope.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::IndividualCandidates { system, .. } => system.as_str(),
            Self::ElectoralCollegeCandidates { .. } => ElectoralSystem::ElectoralCollege.as_str(),
            Self::PartyLists { .. } => ElectoralSystem::PartyListPr.as_str(),
            Self::MmpParticipants { .. } => ElectoralSystem::Mmp.as_str(),
        }
    }

    /// All candidates in the envelope, in output order.
    #[must_use]
    pub fn all_candidates(&self) -> Vec<&Candidate> {
        match self {
            Self::IndividualCandidates { data, .. }
            | Self::ElectoralCollegeCandidates { data, .. } => data.values().collect(),
            Self::PartyLists { data } => data.values().flatten().collect(),
            Self::MmpParticipants { data } => data.iter().collect(),
        }
    }

    #[must_use]
    pub fn candidate_count(&self) -> usize {
        match self {
            Self::IndividualCandidates { data, .. }
            | Self::ElectoralCollegeCandidates { data, .. } => data.len(),
            Self::PartyLists { data } => data.values().map(Vec::len).sum(),
            Self::MmpParticipants { data } => data.iter().count(),
        }
    }
}

/// Reasons the engine produced no participants.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GenerationError {
    #[error("election type is missing")]
    MissingElectionType,
    #[error("no parties in scope")]
    EmptyPartyScope,
    #[error("electoral system {system} is not handled by this engine")]
    UnsupportedSystem { system: String },
    #[error(transparent)]
    Config(#[from] GenerationConfigError),
}

impl GenerationError {
    /// `true` when the caller should hand the election to another generator.
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::UnsupportedSystem { .. })
    }

    /// `true` when the request itself cannot be populated.
    #[must_use]
    pub const fn is_invalid_input(&self) -> bool {
        matches!(self, Self::MissingElectionType | Self::EmptyPartyScope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::BaseCandidate;

    fn candidate(id: &str) -> Candidate {
        Candidate::from_base(BaseCandidate::new(id, id))
    }

    fn map(ids: &[&str]) -> CandidateMap {
        ids.iter().map(|id| ((*id).to_string(), candidate(id))).collect()
    }

    #[test]
    fn envelope_serializes_with_type_tag() {
        let output = GenerationOutput::ElectoralCollegeCandidates {
            data: map(&["a", "b"]),
            metadata: ElectoralCollegeMetadata {
                total_electoral_votes: 538,
                needed_to_win: 270,
            },
        };
        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value["type"], "ElectoralCollegeCandidates");
        assert_eq!(value["metadata"]["neededToWin"], 270);
        assert_eq!(value["data"]["a"]["id"], "a");
        assert_eq!(output.kind(), "ElectoralCollege");
    }

    #[test]
    fn counts_cover_every_shape() {
        let lists = GenerationOutput::PartyLists {
            data: PartyListMap::from([
                ("x".to_string(), vec![candidate("1"), candidate("2")]),
                ("y".to_string(), vec![candidate("3")]),
            ]),
        };
        assert_eq!(lists.candidate_count(), 3);
        assert_eq!(lists.all_candidates().len(), 3);

        let mmp = GenerationOutput::MmpParticipants {
            data: MmpParticipants {
                constituency_seats: 1,
                list_seats: 1,
                party_lists: PartyListMap::from([("x".to_string(), vec![candidate("1")])]),
                constituency_candidates_by_party: PartyListMap::from([(
                    "x".to_string(),
                    vec![candidate("2")],
                )]),
                independent_constituency_candidates: vec![candidate("3"), candidate("4")],
            },
        };
        assert_eq!(mmp.candidate_count(), 4);
        assert_eq!(mmp.kind(), "MMP");
        let value = serde_json::to_value(&mmp).unwrap();
        assert_eq!(value["type"], "MMPParticipants");
        assert!(value["data"]["independentConstituencyCandidates"].is_array());

        let fptp = GenerationOutput::IndividualCandidates {
            system: ElectoralSystem::TwoRoundSystem,
            data: map(&["a"]),
        };
        assert_eq!(fptp.kind(), "TwoRoundSystem");
    }

    #[test]
    fn only_unsupported_systems_fall_back() {
        let unsupported = GenerationError::UnsupportedSystem {
            system: "STV".to_string(),
        };
        assert!(unsupported.is_fallback());
        assert!(!unsupported.is_invalid_input());
        assert!(GenerationError::EmptyPartyScope.is_invalid_input());
        assert!(!GenerationError::MissingElectionType.is_fallback());
        assert_eq!(
            unsupported.to_string(),
            "electoral system STV is not handled by this engine"
        );
    }
}
