//! Category catalog data types

use serde::{Deserialize, Serialize};

/// Key of an interest category (e.g. `technology`, `creativeArts`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryKey(String);

impl CategoryKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CategoryKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl PartialEq<str> for CategoryKey {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for CategoryKey {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A career path offered within a category
///
/// Serialized in camelCase; content files may also use snake_case keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerPath {
    pub name: String,
    pub description: String,
    #[serde(default, alias = "required_skills")]
    pub required_skills: Vec<String>,
    #[serde(default, alias = "education_options")]
    pub education_options: Vec<String>,
}

impl CareerPath {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required_skills: Vec::new(),
            education_options: Vec::new(),
        }
    }

    pub fn with_skills(mut self, skills: &[&str]) -> Self {
        self.required_skills = skills.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_education(mut self, education: &[&str]) -> Self {
        self.education_options = education.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Description cut to at most `max_chars` characters, with an ellipsis when cut
    pub fn truncated_description(&self, max_chars: usize) -> String {
        if self.description.chars().count() <= max_chars {
            return self.description.clone();
        }
        let cut: String = self.description.chars().take(max_chars).collect();
        format!("{}...", cut.trim_end())
    }
}

/// Everything the engine knows about one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryData {
    /// Human-readable name, also matched literally by the classifier
    #[serde(alias = "display_name")]
    pub display_name: String,
    /// Extra literal names that resolve directly to this category
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Keywords counted by the frequency fallback
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default, alias = "canonical_paths")]
    pub canonical_paths: Vec<CareerPath>,
    /// Category-specific questions asked during the skills stage
    #[serde(default, alias = "stage_questions")]
    pub stage_questions: Vec<String>,
}

impl CategoryData {
    /// Names of the first `limit` canonical paths
    pub fn path_names(&self, limit: usize) -> Vec<String> {
        self.canonical_paths
            .iter()
            .take(limit)
            .map(|p| p.name.clone())
            .collect()
    }

    pub fn find_path(&self, name: &str) -> Option<&CareerPath> {
        self.canonical_paths
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }
}
