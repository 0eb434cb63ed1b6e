//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::{AssessmentConfig, ConfigError};

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    /// Development mode - relaxed validation, warnings only
    #[default]
    Development,
    /// Staging mode - stricter validation
    Staging,
    /// Production mode - all validations enforced
    Production,
}

impl RuntimeEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    pub fn is_strict(&self) -> bool {
        matches!(self, Self::Production | Self::Staging)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    #[serde(default)]
    pub server: ServerConfig,

    /// Dialogue engine tuning
    #[serde(default)]
    pub assessment: AssessmentConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,

    /// Optional content files replacing the built-in content
    #[serde(default)]
    pub content: ContentPaths,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.assessment.validate()?;
        self.validate_observability()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        let server = &self.server;

        if server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                message: "Port cannot be 0".to_string(),
            });
        }

        if server.max_sessions == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.max_sessions".to_string(),
                message: "Max sessions must be at least 1".to_string(),
            });
        }

        if server.session_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.session_timeout_secs".to_string(),
                message: "Session timeout must be at least 1 second".to_string(),
            });
        }

        if server.cleanup_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.cleanup_interval_secs".to_string(),
                message: "Cleanup interval must be at least 1 second".to_string(),
            });
        }

        if self.environment.is_production() && server.cors_enabled && server.cors_origins.is_empty()
        {
            tracing::warn!(
                "CORS is enabled in production but no origins are configured. \
                 Only localhost origins will be allowed."
            );
        }

        Ok(())
    }

    fn validate_observability(&self) -> Result<(), ConfigError> {
        const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
        let level = self.observability.log_level.to_lowercase();
        if !LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "observability.log_level".to_string(),
                message: format!(
                    "Must be one of {}, got {}",
                    LEVELS.join(", "),
                    self.observability.log_level
                ),
            });
        }

        if self.environment.is_strict() && self.assessment.random_seed.is_some() {
            tracing::warn!("assessment.random_seed is set outside development; replies are predictable");
        }

        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Maximum live chat sessions
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,

    /// Idle time after which a session expires
    #[serde(default = "default_session_timeout")]
    pub session_timeout_secs: u64,

    /// How often expired sessions are swept
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_secs: u64,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// CORS allowed origins
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_sessions() -> usize {
    1000
}

fn default_session_timeout() -> u64 {
    3600
}

fn default_cleanup_interval() -> u64 {
    60
}

fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_sessions: default_max_sessions(),
            session_timeout_secs: default_session_timeout(),
            cleanup_interval_secs: default_cleanup_interval(),
            cors_enabled: true,
            cors_origins: Vec::new(),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub log_json: bool,

    /// Enable the Prometheus endpoint
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
            metrics_enabled: true,
        }
    }
}

/// Content file locations; `None` selects the built-in content
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentPaths {
    /// Category catalog (YAML or JSON)
    #[serde(default)]
    pub catalog_path: Option<String>,

    /// Prompt templates (YAML)
    #[serde(default)]
    pub prompts_path: Option<String>,

    /// Roadmaps (YAML)
    #[serde(default)]
    pub roadmaps_path: Option<String>,
}

/// Load settings from files and environment
///
/// Order: `config/default`, `config/{env}`, then `CAREER_GUIDE__*`
/// environment variables.
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(File::with_name("config/default").required(false));

    if let Some(env) = env {
        builder = builder.add_source(File::with_name(&format!("config/{}", env)).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("CAREER_GUIDE")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.server.max_sessions, 1000);
        assert_eq!(settings.assessment.stage_message_threshold, 4);
        assert!(settings.content.catalog_path.is_none());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_invalid_server_values() {
        let mut settings = Settings::default();
        settings.server.port = 0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.server.max_sessions = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_invalid_assessment_values_fail_settings() {
        let mut settings = Settings::default();
        settings.assessment.skills_advance_probability = -0.1;
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_invalid_log_level() {
        let mut settings = Settings::default();
        settings.observability.log_level = "loud".to_string();
        assert!(settings.validate().is_err());
        settings.observability.log_level = "DEBUG".to_string();
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
server:
  port: 9000
assessment:
  skip_keyword: next
  triggers:
    skills: ["what matters"]
"#;
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.server.session_timeout_secs, 3600);
        assert_eq!(settings.assessment.skip_keyword, "next");
        assert_eq!(settings.assessment.triggers.skills, vec!["what matters"]);
        assert!(!settings.assessment.triggers.interests.is_empty());
    }

    #[test]
    fn test_environment_flags() {
        assert!(RuntimeEnvironment::Production.is_production());
        assert!(RuntimeEnvironment::Staging.is_strict());
        assert!(!RuntimeEnvironment::Development.is_strict());
    }
}
