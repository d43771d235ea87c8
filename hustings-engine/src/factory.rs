//! Seams to the politician factory and name generator, plus built-in defaults.
use serde_json::json;

use crate::candidate::BaseCandidate;
use crate::party::Party;
use crate::rng::RandomSource;

/// Context handed to the politician factory for one candidate.
#[derive(Debug, Clone, Copy)]
pub struct FactoryRequest<'a> {
    pub country_id: &'a str,
    pub party_scope: &'a [Party],
    /// Party the politician must belong to; `None` requests an unaffiliated politician.
    pub force_party_id: Option<&'a str>,
    pub city_id: Option<&'a str>,
    pub region_id: Option<&'a str>,
}

/// Manufactures base politician records.
///
/// Implementations only need to return a record with an `id` and `name`; the
/// engine layers election fields on top and guarantees id uniqueness itself.
pub trait PoliticianFactory {
    fn generate_candidate(
        &mut self,
        request: &FactoryRequest<'_>,
        rng: &mut dyn RandomSource,
    ) -> BaseCandidate;
}

impl<F> PoliticianFactory for F
where
    F: FnMut(&FactoryRequest<'_>, &mut dyn RandomSource) -> BaseCandidate,
{
    fn generate_candidate(
        &mut self,
        request: &FactoryRequest<'_>,
        rng: &mut dyn RandomSource,
    ) -> BaseCandidate {
        self(request, rng)
    }
}

/// Produces country-appropriate display names.
pub trait NameGenerator {
    fn display_name(&mut self, country_id: &str, rng: &mut dyn RandomSource) -> String;
}

struct NameTable {
    given: &'static [&'static str],
    family: &'static [&'static str],
}

const ANGLO_NAMES: NameTable = NameTable {
    given: &[
        "James", "Mary", "Robert", "Patricia", "Michael", "Linda", "David", "Susan", "Thomas",
        "Karen", "Daniel", "Nancy", "Andrew", "Emily", "Kevin", "Rachel",
    ],
    family: &[
        "Smith", "Johnson", "Carter", "Brooks", "Hughes", "Foster", "Bennett", "Sullivan",
        "Hayes", "Morgan", "Reed", "Price", "Ellison", "Whitaker", "Doyle", "Garner",
    ],
};

const GERMAN_NAMES: NameTable = NameTable {
    given: &[
        "Lukas", "Anna", "Felix", "Lea", "Jonas", "Marie", "Paul", "Sophie", "Niklas", "Lena",
        "Tobias", "Katrin",
    ],
    family: &[
        "Müller", "Schmidt", "Schneider", "Fischer", "Weber", "Wagner", "Becker", "Hoffmann",
        "Koch", "Richter", "Klein", "Wolf",
    ],
};

const FRENCH_NAMES: NameTable = NameTable {
    given: &[
        "Louis", "Camille", "Hugo", "Chloé", "Jules", "Manon", "Arthur", "Léa", "Mathis",
        "Inès", "Théo", "Juliette",
    ],
    family: &[
        "Martin", "Bernard", "Dubois", "Durand", "Lefebvre", "Moreau", "Laurent", "Simon",
        "Michel", "Garnier", "Rousseau", "Fontaine",
    ],
};

const GENERIC_NAMES: NameTable = NameTable {
    given: &[
        "Alex", "Sam", "Noor", "Mika", "Ari", "Jordan", "Rin", "Tala", "Kai", "Ines", "Omar",
        "Yara",
    ],
    family: &[
        "Moreau", "Park", "Silva", "Novak", "Haddad", "Okafor", "Lind", "Costa", "Ivanov",
        "Tanaka", "Reyes", "Nakamura",
    ],
};

fn table_for(country_id: &str) -> &'static NameTable {
    match country_id.to_ascii_uppercase().as_str() {
        "USA" | "US" | "GBR" | "UK" | "GB" | "CAN" | "AUS" | "NZL" | "IRL" => &ANGLO_NAMES,
        "DEU" | "DE" | "AUT" | "AT" | "CHE" => &GERMAN_NAMES,
        "FRA" | "FR" | "BEL" => &FRENCH_NAMES,
        _ => &GENERIC_NAMES,
    }
}

fn pick<'t>(items: &'t [&'t str], rng: &mut dyn RandomSource) -> &'t str {
    rng.pick_index(items.len())
        .and_then(|i| items.get(i))
        .copied()
        .unwrap_or_default()
}

/// Name generator drawing given and family names from per-country tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableNameGenerator;

impl NameGenerator for TableNameGenerator {
    fn display_name(&mut self, country_id: &str, rng: &mut dyn RandomSource) -> String {
        let table = table_for(country_id);
        let given = pick(table.given, rng);
        let family = pick(table.family, rng);
        format!("{given} {family}")
    }
}

const PROFESSIONS: [&str; 10] = [
    "attorney",
    "schoolteacher",
    "small business owner",
    "physician",
    "union organizer",
    "farmer",
    "software engineer",
    "city councillor",
    "journalist",
    "veteran",
];

/// Self-contained politician factory used when no game store is available.
#[derive(Debug, Clone, Default)]
pub struct SyntheticPoliticianFactory {
    names: TableNameGenerator,
}

impl SyntheticPoliticianFactory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PoliticianFactory for SyntheticPoliticianFactory {
    fn generate_candidate(
        &mut self,
        request: &FactoryRequest<'_>,
        rng: &mut dyn RandomSource,
    ) -> BaseCandidate {
        let token = rng.next_int(0, 0xFFFF_FFFF);
        let id = format!("{}-{token:08x}", request.country_id.to_ascii_lowercase());
        let name = self.names.display_name(request.country_id, rng);
        let age = rng.next_int(30, 75);
        let years_in_politics = rng.next_int(0, (age - 25).max(0));
        let profession = pick(&PROFESSIONS, rng);

        let mut base = BaseCandidate::new(id, name);
        base.attributes.insert("age".to_string(), json!(age));
        base.attributes
            .insert("profession".to_string(), json!(profession));
        base.attributes
            .insert("yearsInPolitics".to_string(), json!(years_in_politics));
        base.attributes
            .insert("countryId".to_string(), json!(request.country_id));
        if let Some(city) = request.city_id {
            base.attributes.insert("cityId".to_string(), json!(city));
        }
        if let Some(region) = request.region_id {
            base.attributes.insert("regionId".to_string(), json!(region));
        }
        base
    }
}
