//! Centralized tuning constants for participant generation.
//!
//! These are the defaults behind [`crate::config::GenerationConfig`]; callers
//! override them through configuration rather than editing call sites.

// Independent labelling -----------------------------------------------------
pub const INDEPENDENT_MARKER: &str = "independent";
pub const INDEPENDENT_NAME: &str = "Independent";
pub const NEUTRAL_COLOR: &str = "#808080";

// Probabilities -------------------------------------------------------------
pub(crate) const INDEPENDENT_RATE: f64 = 0.10;
pub(crate) const STANCE_VARIETY_RATE: f64 = 0.15;
pub(crate) const MINOR_VARIATION_RATE: f64 = 0.05;
pub(crate) const INDEPENDENT_CONVERSION_RATE: f64 = 0.10;

// Stances -------------------------------------------------------------------
pub const STANCE_MIN: f64 = 0.0;
pub const STANCE_MAX: f64 = 100.0;
pub(crate) const STANCE_BASELINE: f64 = 50.0;
pub(crate) const MINOR_VARIATION_MAGNITUDE: f64 = 10.0;
pub(crate) const WEIGHT_ECONOMIC: f64 = 5.0;
pub(crate) const WEIGHT_PERSONAL_LIBERTY: f64 = 3.0;
pub(crate) const WEIGHT_STATE_INTERVENTION: f64 = 4.0;
pub(crate) const WEIGHT_SOCIETAL_FOCUS: f64 = 2.0;

// Cache and retries ---------------------------------------------------------
pub(crate) const CACHE_TTL_SECS: u64 = 300;
pub(crate) const MAX_ID_RETRIES: u32 = 10;
pub(crate) const MAX_NAME_RETRIES: u32 = 3;
pub const PARTY_STANCE_KEY_PREFIX: &str = "party_";

// Scoring -------------------------------------------------------------------
pub(crate) const PARTY_FIT_POPULARITY_WEIGHT: f64 = 0.3;
pub(crate) const INCUMBENT_POLLING_BONUS: f64 = 5.0;
pub(crate) const POLLING_POPULARITY_WEIGHT: f64 = 0.5;
pub(crate) const POLLING_RECOGNITION_WEIGHT: f64 = 0.2;
pub(crate) const RESIDENTS_PER_VOLUNTEER: u64 = 10_000;
pub(crate) const VOLUNTEER_CEILING: i64 = 500;

// Electoral college ---------------------------------------------------------
pub(crate) const TOTAL_ELECTORAL_VOTES: u32 = 538;
pub(crate) const ELECTORAL_VOTES_TO_WIN: u32 = 270;
pub(crate) const PRESIDENTIAL_FUNDS_MULTIPLIER: i64 = 100;

// Allocation shapes ---------------------------------------------------------
pub(crate) const FPTP_CAP_WITH_INCUMBENT: usize = 6;
pub(crate) const FPTP_CAP_OPEN_SEAT: usize = 5;
pub(crate) const COLLEGE_MIN_CANDIDATES: usize = 2;
pub(crate) const COLLEGE_MAX_CANDIDATES: usize = 5;
pub(crate) const LIST_EXTRA_MAX: usize = 15;
pub(crate) const MMP_LIST_SHARE: f64 = 0.8;
pub(crate) const MMP_LIST_MIN: usize = 3;
pub(crate) const MMP_CONSTITUENCY_SHARE: f64 = 0.6;
pub(crate) const MMP_INDEPENDENT_SHARE: f64 = 0.2;
pub(crate) const MMD_MIN_CANDIDATES: usize = 6;
pub(crate) const MMD_MAX_CANDIDATES: usize = 20;
