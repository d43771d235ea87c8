//! Candidate records: the factory's base record plus election-specific fields.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BTreeMap;

use crate::constants::{INDEPENDENT_MARKER, INDEPENDENT_NAME, NEUTRAL_COLOR};
use crate::party::{Party, is_independent_party_id};

/// Policy question id → stance in `[0, 100]`.
pub type StanceVector = BTreeMap<String, f64>;

/// Endorsements are rare at generation time; most lists stay inline.
pub type Endorsements = SmallVec<[String; 4]>;

/// Record returned by the politician factory.
///
/// Only `id` and `name` are relied upon; everything else the factory supplies
/// is carried through untouched in `attributes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BaseCandidate {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

impl BaseCandidate {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            attributes: serde_json::Map::new(),
        }
    }
}

/// Advertising posture a campaign starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AdStrategy {
    #[default]
    Positive,
    Contrast,
    Attack,
    Grassroots,
}

/// Placeholder campaign plan attached to presidential candidates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ElectoralStrategy {
    #[serde(default)]
    pub target_states: Vec<String>,
    #[serde(default)]
    pub battleground_focus: f64,
}

/// A generated election participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(flatten)]
    pub base: BaseCandidate,
    pub party_id: Option<String>,
    pub party_name: Option<String>,
    pub party_color: Option<String>,
    #[serde(default)]
    pub policy_stances: StanceVector,
    #[serde(default)]
    pub base_score: f64,
    #[serde(default)]
    pub name_recognition: u32,
    #[serde(default)]
    pub campaign_funds: i64,
    #[serde(default)]
    pub endorsements: Endorsements,
    #[serde(default)]
    pub working_hours: u32,
    #[serde(default)]
    pub max_working_hours: u32,
    #[serde(default)]
    pub campaign_hours_per_day: u32,
    #[serde(default)]
    pub campaign_hours_remaining_today: u32,
    #[serde(default)]
    pub volunteer_count: u32,
    #[serde(default)]
    pub current_ad_strategy: AdStrategy,
    #[serde(default)]
    pub is_incumbent: bool,
    #[serde(default)]
    pub is_presidential_candidate: bool,
    #[serde(default)]
    pub is_constituency_candidate: bool,
    #[serde(default, rename = "isMMDCandidate")]
    pub is_mmd_candidate: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_position: Option<u32>,
    #[serde(default)]
    pub polling: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub electoral_strategy: Option<ElectoralStrategy>,
}

/// Serialized names of the fields the engine owns. Factory attributes under
/// these keys would collide with them once flattened.
const ENGINE_OWNED_KEYS: [&str; 23] = [
    "id",
    "name",
    "partyId",
    "partyName",
    "partyColor",
    "policyStances",
    "baseScore",
    "nameRecognition",
    "campaignFunds",
    "endorsements",
    "workingHours",
    "maxWorkingHours",
    "campaignHoursPerDay",
    "campaignHoursRemainingToday",
    "volunteerCount",
    "currentAdStrategy",
    "isIncumbent",
    "isPresidentialCandidate",
    "isConstituencyCandidate",
    "isMMDCandidate",
    "listPosition",
    "polling",
    "electoralStrategy",
];

impl Candidate {
    /// Wrap a factory record with zeroed election fields. Attributes that
    /// shadow an engine-owned field are dropped.
    #[must_use]
    pub fn from_base(mut base: BaseCandidate) -> Self {
        for key in ENGINE_OWNED_KEYS {
            if base.attributes.remove(key).is_some() {
                log::debug!("dropping factory attribute {key} on {}", base.id);
            }
        }
        Self {
            base,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.base.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.base.name
    }

    #[must_use]
    pub fn is_independent(&self) -> bool {
        is_independent_party_id(self.party_id.as_deref())
    }

    /// Attach party labels.
    pub fn affiliate(&mut self, party: &Party) {
        self.party_id = Some(party.id.clone());
        self.party_name = Some(party.name.clone());
        self.party_color = Some(party.color.clone());
    }

    /// Relabel as a synthetic independent with its own unique party id.
    pub fn relabel_independent(&mut self) {
        self.party_id = Some(format!("{INDEPENDENT_MARKER}_{}", self.base.id));
        self.party_name = Some(INDEPENDENT_NAME.to_string());
        self.party_color = Some(NEUTRAL_COLOR.to_string());
    }
}
