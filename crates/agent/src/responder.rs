//! Response Selection
//!
//! Picks the reply message and suggested options for a turn from the prompt
//! templates, given the stage and the classified category. The
//! `advance_stage` flag on the result is advice for the transition policy.

use std::sync::Arc;

use career_guide_config::{render, AssessmentConfig, CategoryCatalog, PromptTemplates};
use career_guide_core::{pick, AssessmentStage, CategoryData, CategoryKey, Error, TemplatePicker};
use serde::{Deserialize, Serialize};

use crate::Result;

/// Reply produced for one user message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentReply {
    pub message: String,
    pub options: Vec<String>,
    /// Advisory: whether this reply suggests moving to the next stage
    pub advance_stage: bool,
}

impl AssessmentReply {
    fn new(message: impl Into<String>, options: Vec<String>, advance_stage: bool) -> Self {
        Self {
            message: message.into(),
            options,
            advance_stage,
        }
    }
}

/// Stage-aware template selector
pub struct ResponseSelector {
    catalog: Arc<CategoryCatalog>,
    prompts: Arc<PromptTemplates>,
    config: AssessmentConfig,
    picker: Arc<dyn TemplatePicker>,
}

impl ResponseSelector {
    pub fn new(
        catalog: Arc<CategoryCatalog>,
        prompts: Arc<PromptTemplates>,
        config: AssessmentConfig,
        picker: Arc<dyn TemplatePicker>,
    ) -> Self {
        Self {
            catalog,
            prompts,
            config,
            picker,
        }
    }

    pub fn prompts(&self) -> &Arc<PromptTemplates> {
        &self.prompts
    }

    /// Select the reply for `text` at `stage`.
    ///
    /// Fails only on malformed content: an unknown category key, a category
    /// without paths, or an empty template list.
    pub fn select(
        &self,
        text: &str,
        stage: AssessmentStage,
        category: Option<&CategoryKey>,
    ) -> Result<AssessmentReply> {
        let category = match category {
            Some(key) => Some((key, self.catalog.require(key)?)),
            None => None,
        };

        let mut reply = match stage {
            AssessmentStage::Interests => self.interests(category)?,
            AssessmentStage::Skills => self.skills(category)?,
            AssessmentStage::Values => {
                let t = &self.prompts.values;
                AssessmentReply::new(
                    pick(self.picker.as_ref(), &t.prompts, "values.prompts")?.clone(),
                    t.options.clone(),
                    true,
                )
            }
            AssessmentStage::Priorities => {
                let t = &self.prompts.priorities;
                AssessmentReply::new(
                    pick(self.picker.as_ref(), &t.prompts, "priorities.prompts")?.clone(),
                    t.options.clone(),
                    true,
                )
            }
            AssessmentStage::Recommendation => self.recommendation(category)?,
            AssessmentStage::ExtendedGuidance => {
                let t = &self.prompts.extended;
                AssessmentReply::new(
                    pick(self.picker.as_ref(), &t.prompts, "extended.prompts")?.clone(),
                    t.options.clone(),
                    false,
                )
            }
        };

        if let Some(message) = self.personalize(text, stage) {
            tracing::debug!(stage = %stage, "Personalised reply message");
            reply.message = message;
        }

        tracing::debug!(
            stage = %stage,
            category = category.map(|(k, _)| k.as_str()).unwrap_or("none"),
            options = reply.options.len(),
            advance = reply.advance_stage,
            "Selected reply"
        );

        Ok(reply)
    }

    fn interests(&self, category: Option<(&CategoryKey, &CategoryData)>) -> Result<AssessmentReply> {
        let t = &self.prompts.interests;
        match category {
            Some((key, data)) => {
                let template = pick(
                    self.picker.as_ref(),
                    &t.acknowledgments,
                    "interests.acknowledgments",
                )?;
                let name = data.display_name.to_lowercase();
                Ok(AssessmentReply::new(
                    render(template, &[("category", name.as_str())]),
                    self.path_options(key, data)?,
                    true,
                ))
            }
            None => Ok(AssessmentReply::new(
                pick(self.picker.as_ref(), &t.generic_prompts, "interests.generic_prompts")?.clone(),
                t.category_options.clone(),
                false,
            )),
        }
    }

    fn skills(&self, category: Option<(&CategoryKey, &CategoryData)>) -> Result<AssessmentReply> {
        match category {
            Some((key, data)) => {
                let question = pick(
                    self.picker.as_ref(),
                    &data.stage_questions,
                    &format!("{}.stage_questions", key),
                )?;
                let advance = self.picker.chance(self.config.skills_advance_probability);
                Ok(AssessmentReply::new(
                    question.clone(),
                    self.path_options(key, data)?,
                    advance,
                ))
            }
            None => {
                let t = &self.prompts.skills;
                Ok(AssessmentReply::new(
                    pick(self.picker.as_ref(), &t.generic_prompts, "skills.generic_prompts")?.clone(),
                    t.generic_options.clone(),
                    false,
                ))
            }
        }
    }

    fn recommendation(
        &self,
        category: Option<(&CategoryKey, &CategoryData)>,
    ) -> Result<AssessmentReply> {
        let t = &self.prompts.recommendation;
        match category {
            Some((key, data)) => {
                let path = pick(self.picker.as_ref(), &data.canonical_paths, key.as_str())
                    .map_err(|_| Error::EmptyCategory(key.to_string()))?;
                let skills = path.required_skills.join(", ");
                let education = path.education_options.join(", ");
                let message = render(
                    &t.template,
                    &[
                        ("name", path.name.as_str()),
                        ("description", path.description.as_str()),
                        ("skills", skills.as_str()),
                        ("education", education.as_str()),
                    ],
                );
                Ok(AssessmentReply::new(message, t.options.clone(), false))
            }
            None => {
                let options = t
                    .fallback_categories
                    .iter()
                    .map(|key| -> std::result::Result<String, Error> {
                        let data = self.catalog.require(key)?;
                        let path = data
                            .canonical_paths
                            .first()
                            .ok_or_else(|| Error::EmptyCategory(key.to_string()))?;
                        Ok(format!(
                            "{}: {}",
                            path.name,
                            path.truncated_description(self.config.recommendation_preview_chars)
                        ))
                    })
                    .collect::<std::result::Result<Vec<_>, Error>>()?;
                Ok(AssessmentReply::new(t.generic_message.clone(), options, false))
            }
        }
    }

    /// First configured number of path names; a category without paths is a data error
    fn path_options(&self, key: &CategoryKey, data: &CategoryData) -> Result<Vec<String>> {
        let options = data.path_names(self.config.options_per_category);
        if options.is_empty() {
            return Err(Error::EmptyCategory(key.to_string()).into());
        }
        Ok(options)
    }

    fn personalize(&self, text: &str, stage: AssessmentStage) -> Option<String> {
        let lowered = text.to_lowercase();
        self.prompts
            .personalization_for(stage)
            .find(|rule| rule.matches(&lowered))
            .map(|rule| rule.message.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use career_guide_core::{FixedPicker, RandomPicker};

    fn selector_with(picker: Arc<dyn TemplatePicker>) -> ResponseSelector {
        ResponseSelector::new(
            Arc::new(CategoryCatalog::builtin()),
            Arc::new(PromptTemplates::builtin()),
            AssessmentConfig::default(),
            picker,
        )
    }

    fn selector() -> ResponseSelector {
        selector_with(Arc::new(RandomPicker))
    }

    fn key(s: &str) -> CategoryKey {
        CategoryKey::new(s)
    }

    fn assert_well_formed(reply: &AssessmentReply) {
        assert!(!reply.message.trim().is_empty());
        assert!(!reply.options.is_empty());
        assert!(reply.options.iter().all(|o| !o.trim().is_empty()));
    }

    #[test]
    fn test_interests_with_category() {
        let s = selector();
        let tech = key("technology");
        let reply = s
            .select("I enjoy working with technology", AssessmentStage::Interests, Some(&tech))
            .unwrap();
        assert!(reply.message.contains("technology"));
        assert_eq!(
            reply.options,
            vec!["Software Developer", "Data Scientist", "Cybersecurity Analyst", "UX Designer"]
        );
        assert!(reply.advance_stage);
    }

    #[test]
    fn test_interests_names_multiword_category() {
        let s = selector_with(Arc::new(FixedPicker::first()));
        let reply = s
            .select("arts", AssessmentStage::Interests, Some(&key("creativeArts")))
            .unwrap();
        assert!(reply.message.contains("creative arts"));
    }

    #[test]
    fn test_interests_without_category() {
        let s = selector();
        let prompts = PromptTemplates::builtin();
        let reply = s.select("hmm", AssessmentStage::Interests, None).unwrap();
        assert!(prompts.interests.generic_prompts.contains(&reply.message));
        assert_eq!(reply.options, prompts.interests.category_options);
        assert!(!reply.advance_stage);
    }

    #[test]
    fn test_skills_coin_flip_follows_picker() {
        let science = key("science");
        let heads = selector_with(Arc::new(FixedPicker::new(0, true)));
        let tails = selector_with(Arc::new(FixedPicker::new(0, false)));
        let a = heads.select("x", AssessmentStage::Skills, Some(&science)).unwrap();
        let b = tails.select("x", AssessmentStage::Skills, Some(&science)).unwrap();
        assert!(a.advance_stage);
        assert!(!b.advance_stage);

        let data = CategoryCatalog::builtin().get(&science).cloned().unwrap();
        assert_eq!(a.message, data.stage_questions[0]);
        assert_eq!(a.options.len(), 4);
    }

    #[test]
    fn test_skills_without_category() {
        let s = selector();
        let prompts = PromptTemplates::builtin();
        let reply = s.select("not sure", AssessmentStage::Skills, None).unwrap();
        assert!(prompts.skills.generic_prompts.contains(&reply.message));
        assert_eq!(reply.options, prompts.skills.generic_options);
        assert!(!reply.advance_stage);
    }

    #[test]
    fn test_values_and_priorities_always_advise_advance() {
        let s = selector();
        let tech = key("technology");
        for stage in [AssessmentStage::Values, AssessmentStage::Priorities] {
            for category in [None, Some(&tech)] {
                let reply = s.select("something", stage, category).unwrap();
                assert!(reply.advance_stage);
                assert_well_formed(&reply);
            }
        }
    }

    #[test]
    fn test_recommendation_names_path() {
        let s = selector();
        let catalog = CategoryCatalog::builtin();
        let healthcare = key("healthcare");
        let names: Vec<String> = catalog
            .get(&healthcare)
            .unwrap()
            .canonical_paths
            .iter()
            .map(|p| p.name.clone())
            .collect();

        for _ in 0..50 {
            let reply = s
                .select("ok", AssessmentStage::Recommendation, Some(&healthcare))
                .unwrap();
            assert!(names.iter().any(|n| reply.message.contains(n.as_str())));
            assert!(!reply.advance_stage);
            assert_eq!(reply.options, PromptTemplates::builtin().recommendation.options);
        }
    }

    #[test]
    fn test_recommendation_without_category_offers_fallbacks() {
        let s = selector();
        let reply = s.select("ok", AssessmentStage::Recommendation, None).unwrap();
        assert_eq!(reply.options.len(), 5);
        assert!(reply.options[0].starts_with("Software Developer: "));
        assert!(reply.options.iter().all(|o| o.contains(": ")));
        assert!(!reply.advance_stage);
    }

    #[test]
    fn test_extended_guidance_is_terminal() {
        let s = selector();
        let prompts = PromptTemplates::builtin();
        let reply = s.select("thanks", AssessmentStage::ExtendedGuidance, None).unwrap();
        assert!(prompts.extended.prompts.contains(&reply.message));
        assert_eq!(reply.options, prompts.extended.options);
        assert!(!reply.advance_stage);
    }

    #[test]
    fn test_personalization_overrides_message_only() {
        let s = selector();
        let reply = s
            .select("I love math and numbers", AssessmentStage::Interests, Some(&key("science")))
            .unwrap();
        assert!(reply.message.contains("numbers"));
        assert_eq!(reply.options.len(), 4);
        assert!(reply.advance_stage);

        let reply = s
            .select("I prefer working alone", AssessmentStage::Values, None)
            .unwrap();
        assert!(reply.message.contains("independence"));
        assert_eq!(reply.options, PromptTemplates::builtin().values.options);
    }

    #[test]
    fn test_random_pick_membership_over_many_calls() {
        let s = selector();
        let prompts = PromptTemplates::builtin();
        for _ in 0..100 {
            let reply = s.select("hello", AssessmentStage::Values, None).unwrap();
            assert!(prompts.values.prompts.contains(&reply.message));
            let reply = s.select("hello", AssessmentStage::Priorities, None).unwrap();
            assert!(prompts.priorities.prompts.contains(&reply.message));
        }
    }

    #[test]
    fn test_unknown_category_is_data_error() {
        let s = selector();
        let err = s
            .select("x", AssessmentStage::Interests, Some(&key("astrology")))
            .unwrap_err();
        assert!(err.is_data_error());
    }

    #[test]
    fn test_empty_template_list_is_data_error() {
        let mut prompts = PromptTemplates::builtin();
        prompts.values.prompts.clear();
        let s = ResponseSelector::new(
            Arc::new(CategoryCatalog::builtin()),
            Arc::new(prompts),
            AssessmentConfig::default(),
            Arc::new(RandomPicker),
        );
        let err = s.select("x", AssessmentStage::Values, None).unwrap_err();
        assert!(matches!(
            err,
            crate::AgentError::Data(Error::EmptyTemplates(ref what)) if what == "values.prompts"
        ));
    }
}
