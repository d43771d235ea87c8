//! Ideology dimensions shared by parties and policy-option effects.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::numbers::usize_to_f64;

/// Named axis on which parties and policy options carry a signed position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdeologyDimension {
    Economic,
    SocialTraditionalism,
    Sovereignty,
    Ecology,
    Theocratic,
    Digitalization,
    PersonalLiberty,
    AuthorityStructure,
    StateInterventionScope,
    SocietalFocus,
    RuralPriority,
    GovernanceApproach,
}

impl IdeologyDimension {
    pub const ALL: [Self; 12] = [
        Self::Economic,
        Self::SocialTraditionalism,
        Self::Sovereignty,
        Self::Ecology,
        Self::Theocratic,
        Self::Digitalization,
        Self::PersonalLiberty,
        Self::AuthorityStructure,
        Self::StateInterventionScope,
        Self::SocietalFocus,
        Self::RuralPriority,
        Self::GovernanceApproach,
    ];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Economic => "economic",
            Self::SocialTraditionalism => "social_traditionalism",
            Self::Sovereignty => "sovereignty",
            Self::Ecology => "ecology",
            Self::Theocratic => "theocratic",
            Self::Digitalization => "digitalization",
            Self::PersonalLiberty => "personal_liberty",
            Self::AuthorityStructure => "authority_structure",
            Self::StateInterventionScope => "state_intervention_scope",
            Self::SocietalFocus => "societal_focus",
            Self::RuralPriority => "rural_priority",
            Self::GovernanceApproach => "governance_approach",
        }
    }
}

/// Sparse mapping from dimension to signed position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct IdeologyVector(BTreeMap<IdeologyDimension, f64>);

impl IdeologyVector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    #[must_use]
    pub fn with(mut self, dimension: IdeologyDimension, value: f64) -> Self {
        self.0.insert(dimension, value);
        self
    }

    #[must_use]
    pub fn get(&self, dimension: IdeologyDimension) -> Option<f64> {
        self.0.get(&dimension).copied()
    }

    /// Value on a dimension, treating absence as neutral.
    #[must_use]
    pub fn value_or_zero(&self, dimension: IdeologyDimension) -> f64 {
        self.get(dimension).unwrap_or(0.0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (IdeologyDimension, f64)> + '_ {
        self.0.iter().map(|(d, v)| (*d, *v))
    }

    /// Mean of per-dimension products over the dimensions both vectors carry.
    ///
    /// Dimensions missing from either side are skipped; with no overlap the
    /// alignment is neutral (0).
    #[must_use]
    pub fn alignment(&self, other: &Self) -> f64 {
        let mut total = 0.0;
        let mut shared = 0usize;
        for (dimension, value) in self.iter() {
            if let Some(theirs) = other.get(dimension) {
                total += value * theirs;
                shared += 1;
            }
        }
        if shared == 0 {
            0.0
        } else {
            total / usize_to_f64(shared)
        }
    }
}

impl FromIterator<(IdeologyDimension, f64)> for IdeologyVector {
    fn from_iter<T: IntoIterator<Item = (IdeologyDimension, f64)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alignment_averages_shared_dimensions_only() {
        let party = IdeologyVector::new()
            .with(IdeologyDimension::Economic, 2.0)
            .with(IdeologyDimension::Ecology, -1.0);
        let effect = IdeologyVector::new()
            .with(IdeologyDimension::Economic, 3.0)
            .with(IdeologyDimension::Ecology, 1.0)
            .with(IdeologyDimension::Theocratic, 9.0);
        // (2*3 + -1*1) / 2
        assert!((party.alignment(&effect) - 2.5).abs() < f64::EPSILON);
        assert!((effect.alignment(&party) - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn alignment_without_overlap_is_neutral() {
        let a = IdeologyVector::new().with(IdeologyDimension::Sovereignty, 4.0);
        let b = IdeologyVector::new().with(IdeologyDimension::Digitalization, 4.0);
        assert!(a.alignment(&b).abs() < f64::EPSILON);
        assert!(IdeologyVector::new().alignment(&a).abs() < f64::EPSILON);
    }

    #[test]
    fn vector_parses_snake_case_keys() {
        let json = r#"{"economic": 1.5, "state_intervention_scope": -2}"#;
        let vector: IdeologyVector = serde_json::from_str(json).unwrap();
        assert_eq!(vector.len(), 2);
        assert_eq!(vector.get(IdeologyDimension::StateInterventionScope), Some(-2.0));
        assert_eq!(IdeologyDimension::StateInterventionScope.key(), "state_intervention_scope");
    }
}
