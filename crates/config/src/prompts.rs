//! Prompt templates
//!
//! Canned replies for every assessment stage. Templates use `{name}` style
//! placeholders filled by [`render`].

use std::path::Path;

use career_guide_core::{AssessmentStage, CategoryKey};
use serde::{Deserialize, Serialize};

use crate::catalog::CategoryCatalog;
use crate::ConfigError;

/// All reply templates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptTemplates {
    #[serde(default)]
    pub greeting: GreetingTemplates,
    #[serde(default)]
    pub interests: InterestTemplates,
    #[serde(default)]
    pub skills: SkillTemplates,
    #[serde(default = "default_values")]
    pub values: StageTemplates,
    #[serde(default = "default_priorities")]
    pub priorities: StageTemplates,
    #[serde(default)]
    pub recommendation: RecommendationTemplates,
    #[serde(default = "default_extended")]
    pub extended: StageTemplates,
    #[serde(default = "default_personalization")]
    pub personalization: Vec<PersonalizationRule>,
    #[serde(default)]
    pub fallback: FallbackTemplates,
}

/// Seed message of a new conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GreetingTemplates {
    pub message: String,
    #[serde(default)]
    pub options: Vec<String>,
}

impl Default for GreetingTemplates {
    fn default() -> Self {
        Self {
            message: "Hi! I'm your career guide. Let's find a path that fits you. \
                      To start, what subjects or activities do you enjoy most?"
                .to_string(),
            options: top_level_categories(),
        }
    }
}

/// Stage 1 templates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterestTemplates {
    /// Acknowledgments for a recognised interest; must contain `{category}`
    pub acknowledgments: Vec<String>,
    /// Prompts used when no category was recognised
    pub generic_prompts: Vec<String>,
    /// Top-level category names offered when no category was recognised
    pub category_options: Vec<String>,
}

impl Default for InterestTemplates {
    fn default() -> Self {
        Self {
            acknowledgments: strings(&[
                "It sounds like you're interested in {category}! That's a field with a lot of \
                 room to grow. Here are a few paths people take. Do any of these stand out?",
                "Great, {category} is an exciting area. Let's look at some of the careers in it. \
                 Which of these sounds closest to what you'd enjoy?",
                "I can see {category} really interests you. Here are some directions you could \
                 explore. Tell me which one catches your eye.",
            ]),
            generic_prompts: strings(&[
                "Tell me a bit more about what you enjoy. Which of these areas feels closest?",
                "What kinds of activities make you lose track of time? Pick an area to start with.",
                "Let's narrow it down. Which of these fields are you most curious about?",
            ]),
            category_options: top_level_categories(),
        }
    }
}

/// Stage 2 templates for messages without a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillTemplates {
    pub generic_prompts: Vec<String>,
    pub generic_options: Vec<String>,
}

impl Default for SkillTemplates {
    fn default() -> Self {
        Self {
            generic_prompts: strings(&[
                "Now let's talk about your strengths. What skills do people usually come to you for?",
                "What are you naturally good at? Think about school, hobbies or work.",
                "Which of these skills describes you best?",
            ]),
            generic_options: strings(&[
                "Problem solving",
                "Communication",
                "Creativity",
                "Working with numbers",
                "Helping others",
            ]),
        }
    }
}

/// A prompt list with a fixed option set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageTemplates {
    pub prompts: Vec<String>,
    pub options: Vec<String>,
}

fn default_values() -> StageTemplates {
    StageTemplates {
        prompts: strings(&[
            "Let's think about the kind of work environment where you'd thrive. What matters most to you?",
            "What do you value in a job? For example stability, creativity, or making a difference?",
            "Picture your ideal workday. What does the environment look like?",
        ]),
        options: strings(&[
            "Working in a team",
            "Working independently",
            "Making a difference",
            "Work-life balance",
            "High earning potential",
        ]),
    }
}

fn default_priorities() -> StageTemplates {
    StageTemplates {
        prompts: strings(&[
            "Almost there! What are your top priorities when choosing a career?",
            "When you imagine your career in ten years, what would make it feel successful?",
            "Which of these would you put first when deciding on a career?",
        ]),
        options: strings(&[
            "Job security",
            "Salary",
            "Personal fulfilment",
            "Flexibility",
            "Growth opportunities",
        ]),
    }
}

fn default_extended() -> StageTemplates {
    StageTemplates {
        prompts: strings(&[
            "Is there anything else about this career you'd like to explore?",
            "Would you like to talk about next steps, like courses or first jobs?",
            "What questions do you still have about your options?",
        ]),
        options: strings(&[
            "How do I get started?",
            "What education do I need?",
            "Show me salary information",
            "Start over",
        ]),
    }
}

/// Stage 5 templates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationTemplates {
    /// Recommendation text; placeholders `{name}`, `{description}`,
    /// `{skills}`, `{education}`
    pub template: String,
    /// Options after a specific recommendation
    pub options: Vec<String>,
    /// Message when no category is known
    pub generic_message: String,
    /// Categories whose first path is offered when no category is known
    pub fallback_categories: Vec<CategoryKey>,
}

impl Default for RecommendationTemplates {
    fn default() -> Self {
        Self {
            template: "Based on everything you've told me, I'd recommend looking into becoming a \
                       {name}. {description}\n\nKey skills: {skills}.\n\nWays to get there: \
                       {education}."
                .to_string(),
            options: strings(&[
                "Tell me more about this career",
                "Show me other options",
                "How do I get started?",
            ]),
            generic_message: "Based on our conversation, here are a few careers that could \
                              suit you. Pick one to learn more."
                .to_string(),
            fallback_categories: vec![
                CategoryKey::new("technology"),
                CategoryKey::new("healthcare"),
                CategoryKey::new("business"),
                CategoryKey::new("creativeArts"),
                CategoryKey::new("science"),
            ],
        }
    }
}

/// Overrides the reply message when the user mentions one of `keywords`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalizationRule {
    pub stage: AssessmentStage,
    pub keywords: Vec<String>,
    pub message: String,
}

impl PersonalizationRule {
    fn new(stage: AssessmentStage, keywords: &[&str], message: &str) -> Self {
        Self {
            stage,
            keywords: strings(keywords),
            message: message.to_string(),
        }
    }

    /// Whether any keyword occurs in the already-lowercased text
    pub fn matches(&self, lowered: &str) -> bool {
        self.keywords
            .iter()
            .any(|k| lowered.contains(&k.to_lowercase()))
    }
}

fn default_personalization() -> Vec<PersonalizationRule> {
    vec![
        PersonalizationRule::new(
            AssessmentStage::Interests,
            &["math", "numbers"],
            "I notice you enjoy working with numbers! That opens doors in fields like data, \
             finance, engineering and research.",
        ),
        PersonalizationRule::new(
            AssessmentStage::Interests,
            &["people", "helping"],
            "It's great that you enjoy helping people! Many rewarding careers are built \
             around supporting others.",
        ),
        PersonalizationRule::new(
            AssessmentStage::Skills,
            &["communication", "writing"],
            "Strong communication skills open doors in almost every field. They'll serve \
             you well wherever you go.",
        ),
        PersonalizationRule::new(
            AssessmentStage::Skills,
            &["problem", "solving"],
            "Problem-solving is one of the most sought-after skills. Employers everywhere \
             look for it.",
        ),
        PersonalizationRule::new(
            AssessmentStage::Values,
            &["team", "collaborate"],
            "Collaboration matters to you. Team-oriented workplaces could be a great fit.",
        ),
        PersonalizationRule::new(
            AssessmentStage::Values,
            &["independent", "alone"],
            "You value independence. Roles with autonomy and self-directed work might suit you best.",
        ),
    ]
}

/// Reply used by adapters when a turn cannot be processed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackTemplates {
    pub message: String,
    pub options: Vec<String>,
}

impl Default for FallbackTemplates {
    fn default() -> Self {
        Self {
            message: "I'm sorry, I had trouble processing that. Could you try again?".to_string(),
            options: strings(&["Try again", "Start over", "Explore careers"]),
        }
    }
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self::builtin()
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn top_level_categories() -> Vec<String> {
    strings(&[
        "Technology",
        "Creative Arts",
        "Business",
        "Science",
        "Healthcare",
    ])
}

/// Replace `{key}` placeholders with values
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    vars.iter().fold(template.to_string(), |acc, (key, value)| {
        acc.replace(&format!("{{{}}}", key), value)
    })
}

impl PromptTemplates {
    /// Templates shipped with the application
    pub fn builtin() -> Self {
        Self {
            greeting: GreetingTemplates::default(),
            interests: InterestTemplates::default(),
            skills: SkillTemplates::default(),
            values: default_values(),
            priorities: default_priorities(),
            recommendation: RecommendationTemplates::default(),
            extended: default_extended(),
            personalization: default_personalization(),
            fallback: FallbackTemplates::default(),
        }
    }

    /// Load from YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Personalisation rules for a stage, in declaration order
    pub fn personalization_for(
        &self,
        stage: AssessmentStage,
    ) -> impl Iterator<Item = &PersonalizationRule> {
        self.personalization.iter().filter(move |r| r.stage == stage)
    }

    /// Check every list the engine picks from is non-empty and every
    /// referenced category exists
    pub fn validate(&self, catalog: &CategoryCatalog) -> Result<(), ConfigError> {
        let lists: [(&str, usize); 14] = [
            ("interests.acknowledgments", self.interests.acknowledgments.len()),
            ("interests.generic_prompts", self.interests.generic_prompts.len()),
            ("interests.category_options", self.interests.category_options.len()),
            ("skills.generic_prompts", self.skills.generic_prompts.len()),
            ("skills.generic_options", self.skills.generic_options.len()),
            ("values.prompts", self.values.prompts.len()),
            ("values.options", self.values.options.len()),
            ("priorities.prompts", self.priorities.prompts.len()),
            ("priorities.options", self.priorities.options.len()),
            ("recommendation.options", self.recommendation.options.len()),
            (
                "recommendation.fallback_categories",
                self.recommendation.fallback_categories.len(),
            ),
            ("extended.prompts", self.extended.prompts.len()),
            ("extended.options", self.extended.options.len()),
            ("fallback.options", self.fallback.options.len()),
        ];
        if let Some((name, _)) = lists.iter().find(|(_, len)| *len == 0) {
            return Err(ConfigError::InvalidValue {
                field: format!("prompts.{}", name),
                message: "Template list cannot be empty".to_string(),
            });
        }

        if let Some(t) = self
            .interests
            .acknowledgments
            .iter()
            .find(|t| !t.contains("{category}"))
        {
            return Err(ConfigError::InvalidValue {
                field: "prompts.interests.acknowledgments".to_string(),
                message: format!("Template must name the category: {}", t),
            });
        }

        if !self.recommendation.template.contains("{name}") {
            return Err(ConfigError::InvalidValue {
                field: "prompts.recommendation.template".to_string(),
                message: "Template must contain {name}".to_string(),
            });
        }

        if let Some(key) = self
            .recommendation
            .fallback_categories
            .iter()
            .find(|k| !catalog.contains(k))
        {
            return Err(ConfigError::InvalidCatalog(format!(
                "Fallback category {} is not in the catalog",
                key
            )));
        }

        let empty_text = [
            ("greeting.message", &self.greeting.message),
            ("recommendation.generic_message", &self.recommendation.generic_message),
            ("fallback.message", &self.fallback.message),
        ];
        if let Some((name, _)) = empty_text.iter().find(|(_, text)| text.trim().is_empty()) {
            return Err(ConfigError::MissingField(format!("prompts.{}", name)));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_templates_validate() {
        let prompts = PromptTemplates::builtin();
        assert!(prompts.validate(&CategoryCatalog::builtin()).is_ok());
        assert_eq!(prompts.recommendation.fallback_categories.len(), 5);
    }

    #[test]
    fn test_default_matches_builtin() {
        // serde defaults and builtin() must agree so partial YAML files stay complete
        assert_eq!(PromptTemplates::default().values, PromptTemplates::builtin().values);
        let parsed: PromptTemplates = serde_yaml::from_str("{}").unwrap();
        assert_eq!(parsed, PromptTemplates::builtin());
    }

    #[test]
    fn test_render_placeholders() {
        let out = render(
            "Become a {name}: {description}",
            &[("name", "Chemist"), ("description", "works with substances")],
        );
        assert_eq!(out, "Become a Chemist: works with substances");
        assert_eq!(render("{unknown}", &[]), "{unknown}");
    }

    #[test]
    fn test_validate_rejects_empty_lists() {
        let catalog = CategoryCatalog::builtin();
        let mut prompts = PromptTemplates::builtin();
        prompts.values.prompts.clear();
        let err = prompts.validate(&catalog).unwrap_err();
        assert!(err.to_string().contains("values.prompts"));
    }

    #[test]
    fn test_validate_rejects_unknown_fallback_category() {
        let catalog = CategoryCatalog::builtin();
        let mut prompts = PromptTemplates::builtin();
        prompts.recommendation.fallback_categories[0] = CategoryKey::new("astrology");
        assert!(matches!(
            prompts.validate(&catalog),
            Err(ConfigError::InvalidCatalog(_))
        ));
    }

    #[test]
    fn test_personalization_rules_per_stage() {
        let prompts = PromptTemplates::builtin();
        assert_eq!(prompts.personalization_for(AssessmentStage::Interests).count(), 2);
        assert_eq!(prompts.personalization_for(AssessmentStage::Priorities).count(), 0);
        let rule = prompts
            .personalization_for(AssessmentStage::Skills)
            .next()
            .unwrap();
        assert!(rule.matches("my writing is strong"));
        assert!(!rule.matches("i like to paint"));
    }
}
