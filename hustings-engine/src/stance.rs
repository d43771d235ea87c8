//! Policy-stance synthesis for generated candidates.
use crate::cache::GenerationCache;
use crate::candidate::StanceVector;
use crate::config::GenerationConfig;
use crate::constants::{STANCE_MAX, STANCE_MIN};
use crate::ideology::IdeologyVector;
use crate::numbers::{floor_f64_to_usize, i64_to_f64, i64_to_usize, usize_to_f64, usize_to_i64};
use crate::party::Party;
use crate::policy::{PolicyCatalog, PolicyOption, PolicyQuestion};
use crate::rng::RandomSource;

/// Clamp a raw stance into `[0, 100]`, mapping non-finite input to the floor.
#[must_use]
pub fn clamp_stance(value: f64) -> f64 {
    if value.is_nan() {
        return STANCE_MIN;
    }
    value.clamp(STANCE_MIN, STANCE_MAX)
}

/// Produces per-question stances, either aligned to a party or random.
#[derive(Debug, Clone, Copy)]
pub struct StanceSynthesizer<'a> {
    catalog: &'a PolicyCatalog,
    config: &'a GenerationConfig,
}

impl<'a> StanceSynthesizer<'a> {
    #[must_use]
    pub const fn new(catalog: &'a PolicyCatalog, config: &'a GenerationConfig) -> Self {
        Self { catalog, config }
    }

    /// Stances for a party member.
    ///
    /// The first request per party in a cache window runs the full alignment
    /// search and stores the template; later requests copy the template and
    /// perturb a small share of keys.
    pub fn stances_for_party(
        &self,
        party: &Party,
        cache: &mut GenerationCache,
        rng: &mut dyn RandomSource,
    ) -> StanceVector {
        if let Some(template) = cache.stance_template(&party.id) {
            let mut stances = template.clone();
            self.apply_minor_variation(&mut stances, rng);
            return stances;
        }
        let ideology = cache.ideology_for(party).clone();
        let stances = self.align(&ideology, rng);
        cache.store_stance_template(&party.id, stances.clone());
        stances
    }

    /// Independent stances: every question drawn uniformly from `[0, 100]`.
    pub fn stances_random(&self, rng: &mut dyn RandomSource) -> StanceVector {
        self.catalog
            .iter()
            .map(|question| {
                let value = rng.next_int(0, 100);
                (question.id.clone(), clamp_stance(i64_to_f64(value)))
            })
            .collect()
    }

    /// Full alignment search against an ideology.
    pub fn align(&self, ideology: &IdeologyVector, rng: &mut dyn RandomSource) -> StanceVector {
        self.catalog
            .iter()
            .map(|question| {
                let stance = self
                    .choose_option(question, ideology, rng)
                    .map_or(self.config.stance_baseline, |option| {
                        self.stance_from_effect(&option.ideology_effect)
                    });
                (question.id.clone(), stance)
            })
            .collect()
    }

    /// Map an option's ideology effect onto the 0-100 stance scale.
    #[must_use]
    pub fn stance_from_effect(&self, effect: &IdeologyVector) -> f64 {
        clamp_stance(self.config.stance_baseline + self.config.stance_weights.weigh(effect))
    }

    fn choose_option<'q>(
        &self,
        question: &'q PolicyQuestion,
        ideology: &IdeologyVector,
        rng: &mut dyn RandomSource,
    ) -> Option<&'q PolicyOption> {
        let best = best_aligned_index(&question.options, ideology)?;
        let count = question.options.len();
        if count > 1 && rng.chance(self.config.stance_variety_rate) {
            let mut pick = i64_to_usize(rng.next_int(0, usize_to_i64(count - 2)));
            if pick >= best {
                pick += 1;
            }
            return question.options.get(pick);
        }
        question.options.get(best)
    }

    /// Perturb `floor(rate * keys)` distinct keys by up to the configured magnitude.
    fn apply_minor_variation(&self, stances: &mut StanceVector, rng: &mut dyn RandomSource) {
        let mut keys: Vec<String> = stances.keys().cloned().collect();
        let picks =
            floor_f64_to_usize(usize_to_f64(keys.len()) * self.config.minor_variation_rate)
                .min(keys.len());
        let magnitude = self.config.minor_variation_magnitude;
        for i in 0..picks {
            let j = i64_to_usize(rng.next_int(usize_to_i64(i), usize_to_i64(keys.len() - 1)));
            keys.swap(i, j);
            if let Some(value) = stances.get_mut(&keys[i]) {
                *value = clamp_stance(*value + rng.next_range(-magnitude, magnitude));
            }
        }
    }
}

/// Index of the option whose effect best aligns with the ideology; earliest wins ties.
fn best_aligned_index(options: &[PolicyOption], ideology: &IdeologyVector) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, option) in options.iter().enumerate() {
        let score = option.ideology_effect.alignment(ideology);
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((index, score)),
        }
    }
    best.map(|(index, _)| index)
}
