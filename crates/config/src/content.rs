//! Content bundle
//!
//! Everything the dialogue engine reads at runtime: categories, prompt
//! templates and roadmaps, validated together.

use std::sync::Arc;

use career_guide_core::{CategoryData, CategoryKey, ContentCatalog, RoadmapData};

use crate::catalog::CategoryCatalog;
use crate::prompts::PromptTemplates;
use crate::roadmaps::RoadmapLibrary;
use crate::settings::Settings;
use crate::ConfigError;

/// Validated, shareable assessment content
#[derive(Debug, Clone)]
pub struct ContentLibrary {
    catalog: Arc<CategoryCatalog>,
    prompts: Arc<PromptTemplates>,
    roadmaps: Arc<RoadmapLibrary>,
}

impl Default for ContentLibrary {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ContentLibrary {
    /// Bundle and validate content
    pub fn new(
        catalog: CategoryCatalog,
        prompts: PromptTemplates,
        roadmaps: RoadmapLibrary,
    ) -> Result<Self, ConfigError> {
        catalog.validate()?;
        prompts.validate(&catalog)?;
        Ok(Self {
            catalog: Arc::new(catalog),
            prompts: Arc::new(prompts),
            roadmaps: Arc::new(roadmaps),
        })
    }

    /// Built-in content, known to be valid
    pub fn builtin() -> Self {
        Self {
            catalog: Arc::new(CategoryCatalog::builtin()),
            prompts: Arc::new(PromptTemplates::builtin()),
            roadmaps: Arc::new(RoadmapLibrary::builtin()),
        }
    }

    /// Load content files named in settings, using built-ins for the rest
    pub fn load(settings: &Settings) -> Result<Self, ConfigError> {
        let catalog = match &settings.content.catalog_path {
            Some(path) => {
                tracing::info!(path = %path, "Loading category catalog");
                CategoryCatalog::from_file(path)?
            }
            None => CategoryCatalog::builtin(),
        };

        let prompts = match &settings.content.prompts_path {
            Some(path) => {
                tracing::info!(path = %path, "Loading prompt templates");
                PromptTemplates::from_yaml_file(path)?
            }
            None => PromptTemplates::builtin(),
        };

        let roadmaps = match &settings.content.roadmaps_path {
            Some(path) => {
                tracing::info!(path = %path, "Loading roadmaps");
                RoadmapLibrary::from_yaml_file(path)?
            }
            None => RoadmapLibrary::builtin(),
        };

        let library = Self::new(catalog, prompts, roadmaps)?;
        tracing::info!(
            categories = library.catalog.len(),
            roadmaps = library.roadmaps.len(),
            "Content loaded"
        );
        Ok(library)
    }

    pub fn catalog(&self) -> &Arc<CategoryCatalog> {
        &self.catalog
    }

    pub fn prompts(&self) -> &Arc<PromptTemplates> {
        &self.prompts
    }

    pub fn roadmaps(&self) -> &Arc<RoadmapLibrary> {
        &self.roadmaps
    }
}

impl ContentCatalog for ContentLibrary {
    fn get_category(&self, key: &CategoryKey) -> Option<&CategoryData> {
        self.catalog.get(key)
    }

    fn category_keys(&self) -> Vec<CategoryKey> {
        self.catalog.keys()
    }

    fn get_roadmap(&self, path_name: &str) -> RoadmapData {
        self.roadmaps.get_or_default(path_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_content_catalog() {
        let content = ContentLibrary::builtin();
        let keys = content.category_keys();
        assert_eq!(keys.len(), 7);
        assert!(content.get_category(&CategoryKey::new("science")).is_some());
        assert!(content.get_category(&CategoryKey::new("cooking")).is_none());
        assert_eq!(content.get_roadmap("Data Scientist").title, "Data Scientist");
        assert!(content.get_roadmap("Astronomer").title.contains("Astronomer"));
    }

    #[test]
    fn test_new_rejects_inconsistent_content() {
        let mut prompts = PromptTemplates::builtin();
        prompts.extended.options.clear();
        let result = ContentLibrary::new(
            CategoryCatalog::builtin(),
            prompts,
            RoadmapLibrary::builtin(),
        );
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_load_with_default_settings_uses_builtins() {
        let content = ContentLibrary::load(&Settings::default()).unwrap();
        assert_eq!(content.catalog().len(), 7);
    }

    #[test]
    fn test_load_reports_missing_file() {
        let mut settings = Settings::default();
        settings.content.catalog_path = Some("/nonexistent/catalog.yaml".to_string());
        assert!(matches!(
            ContentLibrary::load(&settings),
            Err(ConfigError::FileNotFound(_))
        ));
    }
}
