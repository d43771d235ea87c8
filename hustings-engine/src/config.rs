//! Tuning configuration for participant generation.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants;
use crate::ideology::{IdeologyDimension, IdeologyVector};
use crate::numbers::i64_to_f64;

/// Top-level generation configuration; every field falls back to its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Chance a round-robin candidate runs unaffiliated.
    #[serde(default = "GenerationConfig::default_independent_rate")]
    pub independent_rate: f64,
    /// Chance a party-aligned stance swaps to a different option.
    #[serde(default = "GenerationConfig::default_stance_variety_rate")]
    pub stance_variety_rate: f64,
    /// Share of question keys perturbed when reusing a cached party template.
    #[serde(default = "GenerationConfig::default_minor_variation_rate")]
    pub minor_variation_rate: f64,
    #[serde(default = "GenerationConfig::default_minor_variation_magnitude")]
    pub minor_variation_magnitude: f64,
    /// Chance a surplus same-party nominee survives as an independent.
    #[serde(default = "GenerationConfig::default_independent_conversion_rate")]
    pub independent_conversion_rate: f64,
    #[serde(default)]
    pub stance_weights: StanceWeights,
    #[serde(default = "GenerationConfig::default_stance_baseline")]
    pub stance_baseline: f64,
    #[serde(default = "GenerationConfig::default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    #[serde(default = "GenerationConfig::default_max_id_retries")]
    pub max_id_retries: u32,
    #[serde(default = "GenerationConfig::default_max_name_retries")]
    pub max_name_retries: u32,
    #[serde(default)]
    pub ranges: CampaignRanges,
    #[serde(default)]
    pub electoral_college: ElectoralCollegeCfg,
}

impl GenerationConfig {
    const fn default_independent_rate() -> f64 {
        constants::INDEPENDENT_RATE
    }

    const fn default_stance_variety_rate() -> f64 {
        constants::STANCE_VARIETY_RATE
    }

    const fn default_minor_variation_rate() -> f64 {
        constants::MINOR_VARIATION_RATE
    }

    const fn default_minor_variation_magnitude() -> f64 {
        constants::MINOR_VARIATION_MAGNITUDE
    }

    const fn default_independent_conversion_rate() -> f64 {
        constants::INDEPENDENT_CONVERSION_RATE
    }

    const fn default_stance_baseline() -> f64 {
        constants::STANCE_BASELINE
    }

    const fn default_cache_ttl_secs() -> u64 {
        constants::CACHE_TTL_SECS
    }

    const fn default_max_id_retries() -> u32 {
        constants::MAX_ID_RETRIES
    }

    const fn default_max_name_retries() -> u32 {
        constants::MAX_NAME_RETRIES
    }

    /// Load and validate configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns `GenerationConfigError::Parse` for malformed JSON and the
    /// matching range error when a value is out of bounds.
    pub fn from_json(json: &str) -> Result<Self, GenerationConfigError> {
        let cfg: Self = serde_json::from_str(json)
            .map_err(|e| GenerationConfigError::Parse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validate configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns `GenerationConfigError` when any field violates its documented bounds.
    pub fn validate(&self) -> Result<(), GenerationConfigError> {
        for (field, value) in [
            ("independent_rate", self.independent_rate),
            ("stance_variety_rate", self.stance_variety_rate),
            ("minor_variation_rate", self.minor_variation_rate),
            ("independent_conversion_rate", self.independent_conversion_rate),
        ] {
            validate_probability(field, value)?;
        }
        if !(0.0..=constants::STANCE_MAX).contains(&self.minor_variation_magnitude) {
            return Err(GenerationConfigError::RangeViolation {
                field: "minor_variation_magnitude",
                min: 0.0,
                max: constants::STANCE_MAX,
                value: self.minor_variation_magnitude,
            });
        }
        if !(constants::STANCE_MIN..=constants::STANCE_MAX).contains(&self.stance_baseline) {
            return Err(GenerationConfigError::RangeViolation {
                field: "stance_baseline",
                min: constants::STANCE_MIN,
                max: constants::STANCE_MAX,
                value: self.stance_baseline,
            });
        }
        if self.cache_ttl_secs == 0 {
            return Err(GenerationConfigError::MinViolation {
                field: "cache_ttl_secs",
                min: 1.0,
                value: 0.0,
            });
        }
        self.ranges.validate()?;
        self.electoral_college.validate()?;
        Ok(())
    }

    /// Cache validity window in milliseconds.
    #[must_use]
    pub const fn cache_ttl_millis(&self) -> u64 {
        self.cache_ttl_secs.saturating_mul(1_000)
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            independent_rate: Self::default_independent_rate(),
            stance_variety_rate: Self::default_stance_variety_rate(),
            minor_variation_rate: Self::default_minor_variation_rate(),
            minor_variation_magnitude: Self::default_minor_variation_magnitude(),
            independent_conversion_rate: Self::default_independent_conversion_rate(),
            stance_weights: StanceWeights::default(),
            stance_baseline: Self::default_stance_baseline(),
            cache_ttl_secs: Self::default_cache_ttl_secs(),
            max_id_retries: Self::default_max_id_retries(),
            max_name_retries: Self::default_max_name_retries(),
            ranges: CampaignRanges::default(),
            electoral_college: ElectoralCollegeCfg::default(),
        }
    }
}

fn validate_probability(field: &'static str, value: f64) -> Result<(), GenerationConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(GenerationConfigError::RangeViolation {
            field,
            min: 0.0,
            max: 1.0,
            value,
        });
    }
    Ok(())
}

/// Weights mapping a chosen option's ideology effect onto a 0-100 stance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StanceWeights {
    #[serde(default = "StanceWeights::default_economic")]
    pub economic: f64,
    #[serde(default = "StanceWeights::default_personal_liberty")]
    pub personal_liberty: f64,
    #[serde(default = "StanceWeights::default_state_intervention_scope")]
    pub state_intervention_scope: f64,
    #[serde(default = "StanceWeights::default_societal_focus")]
    pub societal_focus: f64,
}

impl StanceWeights {
    const fn default_economic() -> f64 {
        constants::WEIGHT_ECONOMIC
    }

    const fn default_personal_liberty() -> f64 {
        constants::WEIGHT_PERSONAL_LIBERTY
    }

    const fn default_state_intervention_scope() -> f64 {
        constants::WEIGHT_STATE_INTERVENTION
    }

    const fn default_societal_focus() -> f64 {
        constants::WEIGHT_SOCIETAL_FOCUS
    }

    /// Weighted sum of the four stance-bearing dimensions of an effect.
    #[must_use]
    pub fn weigh(&self, effect: &IdeologyVector) -> f64 {
        self.economic * effect.value_or_zero(IdeologyDimension::Economic)
            + self.personal_liberty * effect.value_or_zero(IdeologyDimension::PersonalLiberty)
            + self.state_intervention_scope
                * effect.value_or_zero(IdeologyDimension::StateInterventionScope)
            + self.societal_focus * effect.value_or_zero(IdeologyDimension::SocietalFocus)
    }
}

impl Default for StanceWeights {
    fn default() -> Self {
        Self {
            economic: Self::default_economic(),
            personal_liberty: Self::default_personal_liberty(),
            state_intervention_scope: Self::default_state_intervention_scope(),
            societal_focus: Self::default_societal_focus(),
        }
    }
}

/// Inclusive integer range sampled uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntRange {
    pub min: i64,
    pub max: i64,
}

impl IntRange {
    #[must_use]
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn contains(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    fn validate(&self, field: &'static str) -> Result<(), GenerationConfigError> {
        if self.min < 0 {
            return Err(GenerationConfigError::MinViolation {
                field,
                min: 0.0,
                value: i64_to_f64(self.min),
            });
        }
        if self.min > self.max {
            return Err(GenerationConfigError::RangeInverted {
                field,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Ranges for the election-specific fields layered onto each candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignRanges {
    #[serde(default = "CampaignRanges::default_campaign_funds")]
    pub campaign_funds: IntRange,
    #[serde(default = "CampaignRanges::default_name_recognition")]
    pub name_recognition: IntRange,
    #[serde(default = "CampaignRanges::default_incumbent_name_recognition")]
    pub incumbent_name_recognition: IntRange,
    #[serde(default = "CampaignRanges::default_base_score")]
    pub base_score: IntRange,
    #[serde(default = "CampaignRanges::default_max_working_hours")]
    pub max_working_hours: IntRange,
    #[serde(default = "CampaignRanges::default_campaign_hours_per_day")]
    pub campaign_hours_per_day: IntRange,
    #[serde(default = "CampaignRanges::default_volunteers")]
    pub volunteers: IntRange,
}

impl CampaignRanges {
    const fn default_campaign_funds() -> IntRange {
        IntRange::new(5_000, 50_000)
    }

    const fn default_name_recognition() -> IntRange {
        IntRange::new(5, 40)
    }

    const fn default_incumbent_name_recognition() -> IntRange {
        IntRange::new(50, 85)
    }

    const fn default_base_score() -> IntRange {
        IntRange::new(30, 60)
    }

    const fn default_max_working_hours() -> IntRange {
        IntRange::new(40, 70)
    }

    const fn default_campaign_hours_per_day() -> IntRange {
        IntRange::new(6, 12)
    }

    const fn default_volunteers() -> IntRange {
        IntRange::new(5, 60)
    }

    fn validate(&self) -> Result<(), GenerationConfigError> {
        self.campaign_funds.validate("ranges.campaign_funds")?;
        self.name_recognition.validate("ranges.name_recognition")?;
        self.incumbent_name_recognition
            .validate("ranges.incumbent_name_recognition")?;
        self.base_score.validate("ranges.base_score")?;
        self.max_working_hours.validate("ranges.max_working_hours")?;
        self.campaign_hours_per_day
            .validate("ranges.campaign_hours_per_day")?;
        self.volunteers.validate("ranges.volunteers")?;
        Ok(())
    }
}

impl Default for CampaignRanges {
    fn default() -> Self {
        Self {
            campaign_funds: Self::default_campaign_funds(),
            name_recognition: Self::default_name_recognition(),
            incumbent_name_recognition: Self::default_incumbent_name_recognition(),
            base_score: Self::default_base_score(),
            max_working_hours: Self::default_max_working_hours(),
            campaign_hours_per_day: Self::default_campaign_hours_per_day(),
            volunteers: Self::default_volunteers(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectoralCollegeCfg {
    #[serde(default = "ElectoralCollegeCfg::default_total_votes")]
    pub total_electoral_votes: u32,
    #[serde(default = "ElectoralCollegeCfg::default_needed_to_win")]
    pub needed_to_win: u32,
    #[serde(default = "ElectoralCollegeCfg::default_funds_multiplier")]
    pub funds_multiplier: i64,
}

impl ElectoralCollegeCfg {
    const fn default_total_votes() -> u32 {
        constants::TOTAL_ELECTORAL_VOTES
    }

    const fn default_needed_to_win() -> u32 {
        constants::ELECTORAL_VOTES_TO_WIN
    }

    const fn default_funds_multiplier() -> i64 {
        constants::PRESIDENTIAL_FUNDS_MULTIPLIER
    }

    fn validate(&self) -> Result<(), GenerationConfigError> {
        if self.needed_to_win == 0 || self.needed_to_win > self.total_electoral_votes {
            return Err(GenerationConfigError::RangeViolation {
                field: "electoral_college.needed_to_win",
                min: 1.0,
                max: f64::from(self.total_electoral_votes),
                value: f64::from(self.needed_to_win),
            });
        }
        if self.funds_multiplier < 1 {
            return Err(GenerationConfigError::MinViolation {
                field: "electoral_college.funds_multiplier",
                min: 1.0,
                value: i64_to_f64(self.funds_multiplier),
            });
        }
        Ok(())
    }
}

impl Default for ElectoralCollegeCfg {
    fn default() -> Self {
        Self {
            total_electoral_votes: Self::default_total_votes(),
            needed_to_win: Self::default_needed_to_win(),
            funds_multiplier: Self::default_funds_multiplier(),
        }
    }
}

/// Errors raised when generation configuration invariants are violated.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GenerationConfigError {
    #[error("configuration JSON could not be parsed: {0}")]
    Parse(String),
    #[error("{field} must be at least {min:.2} (got {value:.2})")]
    MinViolation {
        field: &'static str,
        min: f64,
        value: f64,
    },
    #[error("{field} must be between {min:.2} and {max:.2} (got {value:.2})")]
    RangeViolation {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
    #[error("{field} range invalid (min {min} > max {max})")]
    RangeInverted { field: &'static str, min: i64, max: i64 },
}
