//! Roadmap content types

use serde::{Deserialize, Serialize};

/// One phase of a career roadmap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapPhase {
    pub title: String,
    /// Rough duration, e.g. "3-6 months"
    pub duration: String,
    #[serde(default)]
    pub steps: Vec<String>,
}

/// Detailed roadmap for a career path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapData {
    pub title: String,
    pub overview: String,
    #[serde(default)]
    pub phases: Vec<RoadmapPhase>,
    #[serde(default)]
    pub resources: Vec<String>,
}

impl RoadmapData {
    /// Generic roadmap returned for paths without dedicated content
    pub fn generic(path_name: &str) -> Self {
        Self {
            title: format!("{} Roadmap", path_name),
            overview: format!(
                "A general plan for building a career as a {}. Adapt each phase to your own pace.",
                path_name
            ),
            phases: vec![
                RoadmapPhase {
                    title: "Explore the field".to_string(),
                    duration: "1-2 months".to_string(),
                    steps: vec![
                        "Talk to people already working in the role".to_string(),
                        "Read about day-to-day responsibilities".to_string(),
                    ],
                },
                RoadmapPhase {
                    title: "Build foundations".to_string(),
                    duration: "6-12 months".to_string(),
                    steps: vec![
                        "Complete an introductory course or certificate".to_string(),
                        "Practise core skills on small projects".to_string(),
                    ],
                },
                RoadmapPhase {
                    title: "Gain experience".to_string(),
                    duration: "6-18 months".to_string(),
                    steps: vec![
                        "Look for internships, volunteering or entry-level roles".to_string(),
                        "Collect work samples and references".to_string(),
                    ],
                },
            ],
            resources: vec!["Professional associations in the field".to_string()],
        }
    }
}
