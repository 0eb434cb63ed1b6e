//! Roadmap library
//!
//! Learning roadmaps keyed by career path name. Lookups are
//! case-insensitive; unknown paths get [`RoadmapData::generic`].

use std::collections::HashMap;
use std::path::Path;

use career_guide_core::{RoadmapData, RoadmapPhase};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

static BUILTIN_ROADMAPS: Lazy<Vec<RoadmapData>> = Lazy::new(|| {
    vec![
        roadmap(
            "Software Developer",
            "Go from first lines of code to a junior developer role.",
            vec![
                phase("Learn a first language", "2-4 months", &[
                    "Pick Python or JavaScript and finish a beginner course",
                    "Write small programs every day",
                ]),
                phase("Build projects", "3-6 months", &[
                    "Build and publish two or three complete projects",
                    "Learn Git and put your work on a public profile",
                ]),
                phase("Get job-ready", "2-4 months", &[
                    "Practise data structures and interview questions",
                    "Contribute to an open source project",
                    "Apply for internships and junior roles",
                ]),
            ],
            &["freeCodeCamp", "The Odin Project", "CS50"],
        ),
        roadmap(
            "Data Scientist",
            "Build the statistics and programming skills to turn data into decisions.",
            vec![
                phase("Foundations", "3-6 months", &[
                    "Review statistics and linear algebra",
                    "Learn Python with pandas and notebooks",
                ]),
                phase("Machine learning", "4-6 months", &[
                    "Study supervised and unsupervised learning",
                    "Complete two end-to-end analysis projects",
                ]),
                phase("Portfolio and first role", "3-6 months", &[
                    "Publish write-ups of your projects",
                    "Apply for analyst or junior data scientist roles",
                ]),
            ],
            &["Kaggle", "An Introduction to Statistical Learning"],
        ),
        roadmap(
            "Registered Nurse",
            "Qualify and register as a nurse.",
            vec![
                phase("Prepare", "6-12 months", &[
                    "Complete prerequisite science courses",
                    "Volunteer or shadow in a care setting",
                ]),
                phase("Nursing degree", "2-4 years", &[
                    "Complete an accredited nursing programme",
                    "Finish supervised clinical placements",
                ]),
                phase("Register and specialise", "6-12 months", &[
                    "Pass the licensing exam",
                    "Choose a specialty such as paediatrics or critical care",
                ]),
            ],
            &["National nursing council", "Nursing student associations"],
        ),
        roadmap(
            "Graphic Designer",
            "Develop a visual style and a portfolio that wins clients.",
            vec![
                phase("Design basics", "2-4 months", &[
                    "Study typography, colour and layout",
                    "Learn a design tool such as Figma or Illustrator",
                ]),
                phase("Portfolio", "4-8 months", &[
                    "Create branding and poster projects",
                    "Redesign real products and explain your choices",
                ]),
                phase("Work", "ongoing", &[
                    "Take freelance briefs or apply to studios",
                    "Ask for feedback and keep iterating",
                ]),
            ],
            &["Behance", "Design community critiques"],
        ),
        roadmap(
            "School Teacher",
            "Earn a teaching qualification and start in the classroom.",
            vec![
                phase("Subject knowledge", "3-4 years", &[
                    "Complete a degree in the subject you want to teach",
                    "Tutor or coach young people",
                ]),
                phase("Teacher training", "1-2 years", &[
                    "Complete a teacher education programme",
                    "Finish a supervised teaching placement",
                ]),
                phase("First classroom", "1 year", &[
                    "Obtain your teaching licence",
                    "Join a mentoring scheme for new teachers",
                ]),
            ],
            &["Teacher training agencies", "Subject teaching associations"],
        ),
    ]
});

fn phase(title: &str, duration: &str, steps: &[&str]) -> RoadmapPhase {
    RoadmapPhase {
        title: title.to_string(),
        duration: duration.to_string(),
        steps: steps.iter().map(|s| s.to_string()).collect(),
    }
}

fn roadmap(title: &str, overview: &str, phases: Vec<RoadmapPhase>, resources: &[&str]) -> RoadmapData {
    RoadmapData {
        title: title.to_string(),
        overview: overview.to_string(),
        phases,
        resources: resources.iter().map(|s| s.to_string()).collect(),
    }
}

/// Serialized form: a list of roadmaps, each keyed by its title
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RoadmapFile {
    #[serde(default)]
    roadmaps: Vec<RoadmapData>,
}

/// Roadmaps keyed by lowercased career path name
#[derive(Debug, Clone, Default)]
pub struct RoadmapLibrary {
    roadmaps: HashMap<String, RoadmapData>,
}

impl RoadmapLibrary {
    pub fn new(roadmaps: Vec<RoadmapData>) -> Self {
        Self {
            roadmaps: roadmaps
                .into_iter()
                .map(|r| (r.title.to_lowercase(), r))
                .collect(),
        }
    }

    /// Roadmaps shipped with the application
    pub fn builtin() -> Self {
        Self::new(BUILTIN_ROADMAPS.clone())
    }

    /// Load from YAML file with a top-level `roadmaps` list
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        let file: RoadmapFile =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        Ok(Self::new(file.roadmaps))
    }

    /// Dedicated roadmap for a path, if one exists
    pub fn find(&self, path_name: &str) -> Option<&RoadmapData> {
        self.roadmaps.get(&path_name.trim().to_lowercase())
    }

    /// Roadmap for a path, falling back to the generic roadmap
    pub fn get_or_default(&self, path_name: &str) -> RoadmapData {
        match self.find(path_name) {
            Some(roadmap) => roadmap.clone(),
            None => {
                tracing::debug!(path = %path_name, "No dedicated roadmap, using generic");
                RoadmapData::generic(path_name.trim())
            }
        }
    }

    pub fn len(&self) -> usize {
        self.roadmaps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roadmaps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let library = RoadmapLibrary::builtin();
        let roadmap = library.find("software developer").unwrap();
        assert_eq!(roadmap.title, "Software Developer");
        assert_eq!(roadmap.phases.len(), 3);
    }

    #[test]
    fn test_unknown_path_gets_generic_roadmap() {
        let library = RoadmapLibrary::builtin();
        assert!(library.find("Astronomer").is_none());
        let roadmap = library.get_or_default("Astronomer");
        assert_eq!(roadmap, RoadmapData::generic("Astronomer"));
    }

    #[test]
    fn test_load_from_yaml() {
        let yaml = r#"
roadmaps:
  - title: Chemist
    overview: Work in a lab.
    phases:
      - title: Degree
        duration: 3 years
        steps: [Study chemistry]
"#;
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        let library = RoadmapLibrary::from_yaml_file(file.path()).unwrap();
        assert_eq!(library.len(), 1);
        assert_eq!(library.find("CHEMIST").unwrap().phases[0].steps, vec!["Study chemistry"]);
    }
}
