//! Read-only policy-question reference data.
use serde::{Deserialize, Serialize};

use crate::ideology::IdeologyVector;

/// One answer to a policy question, with its pull on each ideology dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyOption {
    pub value: String,
    #[serde(default)]
    pub ideology_effect: IdeologyVector,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyQuestion {
    pub id: String,
    #[serde(default)]
    pub options: Vec<PolicyOption>,
}

/// Ordered policy catalog shared across generation calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct PolicyCatalog(Vec<PolicyQuestion>);

impl PolicyCatalog {
    #[must_use]
    pub const fn empty() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub fn from_questions(questions: Vec<PolicyQuestion>) -> Self {
        Self(questions)
    }

    /// Load a catalog from a JSON array of questions.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into policy questions.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Catalog embedded in the crate.
    #[must_use]
    pub fn default_catalog() -> Self {
        Self::from_json(include_str!("../assets/policy_questions.json")).unwrap_or_default()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PolicyQuestion> {
        self.0.iter()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&PolicyQuestion> {
        self.0.iter().find(|q| q.id == id)
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

impl<'a> IntoIterator for &'a PolicyCatalog {
    type Item = &'a PolicyQuestion;
    type IntoIter = std::slice::Iter<'a, PolicyQuestion>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
