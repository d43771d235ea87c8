//! Election definitions consumed by the dispatcher.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants;
use crate::party::Party;

/// Electoral systems the engine knows how to populate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElectoralSystem {
    #[serde(rename = "FPTP")]
    Fptp,
    TwoRoundSystem,
    ElectoralCollege,
    #[serde(rename = "PartyListPR")]
    PartyListPr,
    #[serde(rename = "MMP")]
    Mmp,
    #[serde(rename = "MMD")]
    Mmd,
    #[serde(rename = "SNTV")]
    Sntv,
    BlockVote,
    #[serde(rename = "PluralityMMD")]
    PluralityMmd,
}

/// Allocation strategy shared by one or more electoral systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AllocatorKind {
    SingleWinner,
    ElectoralCollege,
    PartyList,
    MixedMember,
    MultiMember,
}

impl ElectoralSystem {
    pub const ALL: [Self; 9] = [
        Self::Fptp,
        Self::TwoRoundSystem,
        Self::ElectoralCollege,
        Self::PartyListPr,
        Self::Mmp,
        Self::Mmd,
        Self::Sntv,
        Self::BlockVote,
        Self::PluralityMmd,
    ];

    /// Identifier as it appears in election definitions.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fptp => "FPTP",
            Self::TwoRoundSystem => "TwoRoundSystem",
            Self::ElectoralCollege => "ElectoralCollege",
            Self::PartyListPr => "PartyListPR",
            Self::Mmp => "MMP",
            Self::Mmd => "MMD",
            Self::Sntv => "SNTV",
            Self::BlockVote => "BlockVote",
            Self::PluralityMmd => "PluralityMMD",
        }
    }

    #[must_use]
    pub const fn allocator(self) -> AllocatorKind {
        match self {
            Self::Fptp | Self::TwoRoundSystem => AllocatorKind::SingleWinner,
            Self::ElectoralCollege => AllocatorKind::ElectoralCollege,
            Self::PartyListPr => AllocatorKind::PartyList,
            Self::Mmp => AllocatorKind::MixedMember,
            Self::Mmd | Self::Sntv | Self::BlockVote | Self::PluralityMmd => {
                AllocatorKind::MultiMember
            }
        }
    }
}

impl fmt::Display for ElectoralSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElectoralSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|system| system.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectionType {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Raw identifier; unknown values are reported back as unsupported.
    pub electoral_system: String,
}

impl ElectionType {
    #[must_use]
    pub fn with_system(electoral_system: impl Into<String>) -> Self {
        let electoral_system = electoral_system.into();
        Self {
            id: electoral_system.to_ascii_lowercase(),
            name: electoral_system.clone(),
            electoral_system,
        }
    }
}

/// Sitting office holder who may defend the seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incumbent {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub party_id: Option<String>,
    #[serde(default)]
    pub is_actually_running: bool,
    #[serde(default)]
    pub name_recognition: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringProperties {
    /// Polling weight added to every running incumbent.
    #[serde(default = "ScoringProperties::default_incumbent_polling_bonus")]
    pub incumbent_polling_bonus: f64,
}

impl ScoringProperties {
    const fn default_incumbent_polling_bonus() -> f64 {
        constants::INCUMBENT_POLLING_BONUS
    }
}

impl Default for ScoringProperties {
    fn default() -> Self {
        Self {
            incumbent_polling_bonus: Self::default_incumbent_polling_bonus(),
        }
    }
}

/// The player's ongoing campaign, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ActiveCampaign {
    #[serde(default)]
    pub player_candidate_id: Option<String>,
}

/// Everything the engine needs to populate one election.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    #[serde(default)]
    pub election_type: Option<ElectionType>,
    #[serde(default)]
    pub parties_in_scope: Vec<Party>,
    #[serde(default)]
    pub incumbent_info: Vec<Incumbent>,
    #[serde(default)]
    pub number_of_seats_to_fill: u32,
    #[serde(default)]
    pub country_id: String,
    #[serde(default)]
    pub election_properties_for_scoring: ScoringProperties,
    #[serde(default)]
    pub entity_population: Option<u64>,
    #[serde(default)]
    pub active_campaign: Option<ActiveCampaign>,
}

impl GenerationRequest {
    /// Minimal request for a system, party scope and seat count.
    #[must_use]
    pub fn new(
        electoral_system: &str,
        country_id: &str,
        parties_in_scope: Vec<Party>,
        number_of_seats_to_fill: u32,
    ) -> Self {
        Self {
            election_type: Some(ElectionType::with_system(electoral_system)),
            parties_in_scope,
            number_of_seats_to_fill,
            country_id: country_id.to_string(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_incumbents(mut self, incumbents: Vec<Incumbent>) -> Self {
        self.incumbent_info = incumbents;
        self
    }

    /// Incumbents defending their seat.
    pub fn running_incumbents(&self) -> impl Iterator<Item = &Incumbent> {
        self.incumbent_info.iter().filter(|i| i.is_actually_running)
    }

    #[must_use]
    pub fn seats(&self) -> usize {
        usize::try_from(self.number_of_seats_to_fill).unwrap_or(usize::MAX)
    }

    #[must_use]
    pub fn player_candidate_id(&self) -> Option<&str> {
        self.active_campaign
            .as_ref()
            .and_then(|c| c.player_candidate_id.as_deref())
    }
}
