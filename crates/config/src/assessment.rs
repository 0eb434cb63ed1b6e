//! Assessment tuning

use career_guide_core::AssessmentStage;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Knobs for the dialogue engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentConfig {
    /// Probability that a categorised skills-stage reply advises advancing
    #[serde(default = "default_skills_advance_probability")]
    pub skills_advance_probability: f64,

    /// Messages stamped with the current stage needed to advance
    #[serde(default = "default_stage_message_threshold")]
    pub stage_message_threshold: usize,

    /// Word that lets the user jump ahead
    #[serde(default = "default_skip_keyword")]
    pub skip_keyword: String,

    /// Stage the skip keyword jumps to (only from earlier stages)
    #[serde(default = "default_skip_target_stage")]
    pub skip_target_stage: u8,

    /// How many career paths are offered as options
    #[serde(default = "default_options_per_category")]
    pub options_per_category: usize,

    /// Let the selector's advance flag count as a transition trigger
    #[serde(default = "default_true")]
    pub honor_advisory_advance: bool,

    /// Reuse the last classified category when a message has none
    #[serde(default = "default_true")]
    pub carry_over_category: bool,

    /// Description length in generic recommendation options
    #[serde(default = "default_recommendation_preview_chars")]
    pub recommendation_preview_chars: usize,

    /// Seed for reproducible template selection
    #[serde(default)]
    pub random_seed: Option<u64>,

    /// Phrases that advance each exploration stage
    #[serde(default)]
    pub triggers: StageTriggers,
}

fn default_skills_advance_probability() -> f64 {
    0.5
}
fn default_stage_message_threshold() -> usize {
    4
}
fn default_skip_keyword() -> String {
    "skip".to_string()
}
fn default_skip_target_stage() -> u8 {
    4
}
fn default_options_per_category() -> usize {
    4
}
fn default_recommendation_preview_chars() -> usize {
    60
}
fn default_true() -> bool {
    true
}

impl Default for AssessmentConfig {
    fn default() -> Self {
        Self {
            skills_advance_probability: default_skills_advance_probability(),
            stage_message_threshold: default_stage_message_threshold(),
            skip_keyword: default_skip_keyword(),
            skip_target_stage: default_skip_target_stage(),
            options_per_category: default_options_per_category(),
            honor_advisory_advance: true,
            carry_over_category: true,
            recommendation_preview_chars: default_recommendation_preview_chars(),
            random_seed: None,
            triggers: StageTriggers::default(),
        }
    }
}

impl AssessmentConfig {
    /// Stage targeted by the skip keyword
    pub fn skip_target(&self) -> AssessmentStage {
        AssessmentStage::from_number(i64::from(self.skip_target_stage))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.skills_advance_probability) {
            return Err(ConfigError::InvalidValue {
                field: "assessment.skills_advance_probability".to_string(),
                message: format!(
                    "Must be between 0.0 and 1.0, got {}",
                    self.skills_advance_probability
                ),
            });
        }

        if self.stage_message_threshold == 0 {
            return Err(ConfigError::InvalidValue {
                field: "assessment.stage_message_threshold".to_string(),
                message: "Must be at least 1".to_string(),
            });
        }

        if self.skip_keyword.trim().is_empty() {
            return Err(ConfigError::MissingField(
                "assessment.skip_keyword".to_string(),
            ));
        }

        if !(2..=5).contains(&self.skip_target_stage) {
            return Err(ConfigError::InvalidValue {
                field: "assessment.skip_target_stage".to_string(),
                message: format!("Must be between 2 and 5, got {}", self.skip_target_stage),
            });
        }

        if self.options_per_category == 0 {
            return Err(ConfigError::InvalidValue {
                field: "assessment.options_per_category".to_string(),
                message: "Must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}

/// Trigger phrases per exploration stage, matched against the lowercased
/// last exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageTriggers {
    #[serde(default = "default_interests_triggers")]
    pub interests: Vec<String>,
    #[serde(default = "default_skills_triggers")]
    pub skills: Vec<String>,
    #[serde(default = "default_values_triggers")]
    pub values: Vec<String>,
    #[serde(default = "default_priorities_triggers")]
    pub priorities: Vec<String>,
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_interests_triggers() -> Vec<String> {
    to_strings(&["skill", "good at", "experience"])
}
fn default_skills_triggers() -> Vec<String> {
    to_strings(&[
        "value",
        "important to me",
        "care about",
        "work environment",
        "work-life",
    ])
}
fn default_values_triggers() -> Vec<String> {
    to_strings(&["career", "job", "recommendation", "suggest"])
}
fn default_priorities_triggers() -> Vec<String> {
    to_strings(&["how do i", "steps", "plan", "roadmap", "get started"])
}

impl Default for StageTriggers {
    fn default() -> Self {
        Self {
            interests: default_interests_triggers(),
            skills: default_skills_triggers(),
            values: default_values_triggers(),
            priorities: default_priorities_triggers(),
        }
    }
}

impl StageTriggers {
    /// Phrases for `stage`; terminal stages have none
    pub fn for_stage(&self, stage: AssessmentStage) -> &[String] {
        match stage {
            AssessmentStage::Interests => &self.interests,
            AssessmentStage::Skills => &self.skills,
            AssessmentStage::Values => &self.values,
            AssessmentStage::Priorities => &self.priorities,
            AssessmentStage::Recommendation | AssessmentStage::ExtendedGuidance => &[],
        }
    }
}
