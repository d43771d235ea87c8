//! Party records and the embedded sample roster.
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::constants::INDEPENDENT_MARKER;
use crate::ideology::IdeologyVector;

/// A party eligible to field candidates in an election.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Party {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub short_name: String,
    #[serde(default = "Party::default_color")]
    pub color: String,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub ideology_scores: IdeologyVector,
}

impl Party {
    fn default_color() -> String {
        crate::constants::NEUTRAL_COLOR.to_string()
    }
}

/// Whether a party id denotes an independent (absent or carrying the marker).
#[must_use]
pub fn is_independent_party_id(party_id: Option<&str>) -> bool {
    party_id.is_none_or(|id| id.contains(INDEPENDENT_MARKER))
}

/// Party scope ordered by descending popularity; ties keep input order.
#[must_use]
pub fn sort_by_popularity(parties: &[Party]) -> Vec<&Party> {
    let mut sorted: Vec<&Party> = parties.iter().collect();
    sorted.sort_by(|a, b| {
        b.popularity
            .partial_cmp(&a.popularity)
            .unwrap_or(Ordering::Equal)
    });
    sorted
}

/// Ordered collection of parties, loadable from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct PartyRoster(pub Vec<Party>);

impl PartyRoster {
    #[must_use]
    pub const fn empty() -> Self {
        Self(vec![])
    }

    /// Load a roster from a JSON array of parties.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into party data.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Sample roster embedded in the crate.
    #[must_use]
    pub fn default_roster() -> Self {
        Self::from_json(include_str!("../assets/parties.json")).unwrap_or_default()
    }

    /// First `count` parties in roster order.
    #[must_use]
    pub fn take(&self, count: usize) -> Vec<Party> {
        self.0.iter().take(count).cloned().collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Party> {
        self.0.iter()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a PartyRoster {
    type Item = &'a Party;
    type IntoIter = std::slice::Iter<'a, Party>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
