//! Configuration management for the career guide
//!
//! Supports loading configuration from:
//! - YAML files under `config/` (`default`, then the environment file)
//! - Environment variables (CAREER_GUIDE__ prefix, `__` separator)
//!
//! # Content
//!
//! The assessment content is data, not code:
//! - [`CategoryCatalog`] - career categories, keywords, paths, questions
//! - [`PromptTemplates`] - canned replies per stage
//! - [`RoadmapLibrary`] - learning roadmaps per career path
//!
//! All three ship with built-in defaults and can be replaced by YAML files.
//! [`ContentLibrary`] bundles them behind the `ContentCatalog` trait.

pub mod assessment;
pub mod catalog;
pub mod content;
pub mod prompts;
pub mod roadmaps;
pub mod settings;

pub use assessment::{AssessmentConfig, StageTriggers};
pub use catalog::{CatalogEntry, CategoryCatalog};
pub use content::ContentLibrary;
pub use prompts::{
    render, FallbackTemplates, GreetingTemplates, InterestTemplates, PersonalizationRule,
    PromptTemplates, RecommendationTemplates, SkillTemplates, StageTemplates,
};
pub use roadmaps::RoadmapLibrary;
pub use settings::{
    load_settings, ContentPaths, ObservabilityConfig, RuntimeEnvironment, ServerConfig, Settings,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
