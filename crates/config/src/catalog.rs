//! Category catalog
//!
//! The ordered set of interest categories the classifier and selector work
//! from. Declaration order matters: it breaks classification ties.

use std::collections::HashSet;
use std::path::Path;

use career_guide_core::{CareerPath, CategoryData, CategoryKey};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// One catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub key: CategoryKey,
    #[serde(flatten)]
    pub data: CategoryData,
}

/// Immutable, ordered category catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCatalog {
    categories: Vec<CatalogEntry>,
}

impl Default for CategoryCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CategoryCatalog {
    pub fn new(categories: Vec<CatalogEntry>) -> Self {
        Self { categories }
    }

    /// Load from YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = read_file(path.as_ref())?;
        let catalog: Self =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load from JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = read_file(path.as_ref())?;
        let catalog: Self =
            serde_json::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load by file extension, `.json` or YAML otherwise
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_file(path),
            _ => Self::from_yaml_file(path),
        }
    }

    pub fn get(&self, key: &CategoryKey) -> Option<&CategoryData> {
        self.categories
            .iter()
            .find(|entry| &entry.key == key)
            .map(|entry| &entry.data)
    }

    /// Category data, or a data error when the key is not in the catalog
    pub fn require(&self, key: &CategoryKey) -> career_guide_core::Result<&CategoryData> {
        self.get(key)
            .ok_or_else(|| career_guide_core::Error::MissingCategory(key.to_string()))
    }

    pub fn contains(&self, key: &CategoryKey) -> bool {
        self.get(key).is_some()
    }

    /// Entries in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&CategoryKey, &CategoryData)> {
        self.categories.iter().map(|entry| (&entry.key, &entry.data))
    }

    pub fn keys(&self) -> Vec<CategoryKey> {
        self.categories.iter().map(|entry| entry.key.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Find the career path with this name in any category
    pub fn find_path(&self, name: &str) -> Option<(&CategoryKey, &CareerPath)> {
        self.iter()
            .find_map(|(key, data)| data.find_path(name).map(|path| (key, path)))
    }

    /// Check the catalog is usable by the engine
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.categories.is_empty() {
            return Err(ConfigError::InvalidCatalog(
                "Catalog has no categories".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for entry in &self.categories {
            let key = entry.key.as_str();
            if key.trim().is_empty() {
                return Err(ConfigError::InvalidCatalog(
                    "Category key cannot be empty".to_string(),
                ));
            }
            if !seen.insert(key) {
                return Err(ConfigError::InvalidCatalog(format!(
                    "Duplicate category key: {}",
                    key
                )));
            }
            if entry.data.display_name.trim().is_empty() {
                return Err(ConfigError::InvalidCatalog(format!(
                    "Category {} has no display name",
                    key
                )));
            }
            if entry.data.canonical_paths.is_empty() {
                return Err(ConfigError::InvalidCatalog(format!(
                    "Category {} has no career paths",
                    key
                )));
            }
            if entry.data.stage_questions.is_empty() {
                return Err(ConfigError::InvalidCatalog(format!(
                    "Category {} has no stage questions",
                    key
                )));
            }
            if let Some(path) = entry
                .data
                .canonical_paths
                .iter()
                .find(|p| p.name.trim().is_empty())
            {
                return Err(ConfigError::InvalidCatalog(format!(
                    "Category {} has a career path with an empty name ({})",
                    key, path.description
                )));
            }
        }

        Ok(())
    }

    /// Catalog shipped with the application
    pub fn builtin() -> Self {
        Self::new(vec![
            technology(),
            creative_arts(),
            business(),
            science(),
            healthcare(),
            education(),
            social_services(),
        ])
    }
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }
    std::fs::read_to_string(path).map_err(|e| ConfigError::ParseError(e.to_string()))
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn entry(
    key: &str,
    display_name: &str,
    aliases: &[&str],
    keywords: &[&str],
    canonical_paths: Vec<CareerPath>,
    stage_questions: &[&str],
) -> CatalogEntry {
    CatalogEntry {
        key: CategoryKey::new(key),
        data: CategoryData {
            display_name: display_name.to_string(),
            aliases: strings(aliases),
            keywords: strings(keywords),
            canonical_paths,
            stage_questions: strings(stage_questions),
        },
    }
}

fn technology() -> CatalogEntry {
    entry(
        "technology",
        "Technology",
        &["tech", "software", "computers"],
        &[
            "computer",
            "coding",
            "programming",
            "developer",
            "data",
            "artificial intelligence",
            "machine learning",
            "website",
            "mobile app",
            "cyber",
            "network",
            "gadget",
            "engineering",
        ],
        vec![
            CareerPath::new(
                "Software Developer",
                "Designs, builds and maintains applications and systems that people use every day.",
            )
            .with_skills(&["Programming", "Problem solving", "Version control", "Testing"])
            .with_education(&[
                "Bachelor's in Computer Science",
                "Coding bootcamp",
                "Self-taught with a project portfolio",
            ]),
            CareerPath::new(
                "Data Scientist",
                "Turns raw data into insight using statistics, machine learning and clear communication.",
            )
            .with_skills(&["Statistics", "Python or R", "Machine learning", "Data visualisation"])
            .with_education(&[
                "Bachelor's in Statistics, Mathematics or Computer Science",
                "Master's in Data Science",
                "Online data science certificates",
            ]),
            CareerPath::new(
                "Cybersecurity Analyst",
                "Protects organisations from digital threats by monitoring, testing and hardening systems.",
            )
            .with_skills(&["Networking", "Threat analysis", "Attention to detail", "Scripting"])
            .with_education(&[
                "Bachelor's in Information Security",
                "Security certifications such as Security+",
                "IT support experience",
            ]),
            CareerPath::new(
                "UX Designer",
                "Researches how people use products and designs experiences that are simple and pleasant.",
            )
            .with_skills(&["User research", "Prototyping", "Empathy", "Visual design"])
            .with_education(&[
                "Bachelor's in Design or Human-Computer Interaction",
                "UX certificate programme",
                "Portfolio of design projects",
            ]),
            CareerPath::new(
                "Cloud Engineer",
                "Builds and runs the infrastructure that keeps online services available and scalable.",
            )
            .with_skills(&["Linux", "Cloud platforms", "Automation", "Networking"])
            .with_education(&[
                "Bachelor's in Computer Engineering",
                "Cloud provider certifications",
            ]),
        ],
        &[
            "Which part of technology excites you most: building things, analysing data, or keeping systems safe?",
            "Have you tried writing code or building a project of your own?",
            "Do you prefer working on what users see or on what runs behind the scenes?",
        ],
    )
}

fn creative_arts() -> CatalogEntry {
    entry(
        "creativeArts",
        "Creative Arts",
        &["creative", "artistic"],
        &[
            "artist",
            "artwork",
            "drawing",
            "painting",
            "music",
            "design",
            "film",
            "photograph",
            "theater",
            "theatre",
            "dance",
            "fashion",
            "animation",
        ],
        vec![
            CareerPath::new(
                "Graphic Designer",
                "Creates visual concepts that communicate ideas for brands, products and campaigns.",
            )
            .with_skills(&["Typography", "Layout", "Design software", "Visual storytelling"])
            .with_education(&[
                "Bachelor's in Graphic Design",
                "Design diploma",
                "Self-taught with a strong portfolio",
            ]),
            CareerPath::new(
                "Animator",
                "Brings characters and stories to life through 2D or 3D motion for film, games and ads.",
            )
            .with_skills(&["Drawing", "Animation software", "Timing", "Storytelling"])
            .with_education(&["Bachelor's in Animation", "Animation school certificate"]),
            CareerPath::new(
                "Musician",
                "Performs, composes or produces music for audiences, recordings and media.",
            )
            .with_skills(&["Instrument or voice mastery", "Music theory", "Performance", "Discipline"])
            .with_education(&[
                "Conservatory or music degree",
                "Private instruction",
                "Performance experience",
            ]),
            CareerPath::new(
                "Content Creator",
                "Produces videos, writing or audio for online audiences and builds a community around it.",
            )
            .with_skills(&["Video editing", "Writing", "Audience building", "Consistency"])
            .with_education(&["Media studies degree", "Online courses in video and marketing"]),
            CareerPath::new(
                "Art Director",
                "Leads the visual style of magazines, campaigns, films or games and guides creative teams.",
            )
            .with_skills(&["Creative leadership", "Visual design", "Communication", "Project management"])
            .with_education(&["Bachelor's in Fine Arts or Design", "Years of design experience"]),
        ],
        &[
            "What kind of creative work do you enjoy most: visual, musical, written or performed?",
            "Do you already have pieces you've made that you're proud of?",
            "Would you rather create on your own or as part of a creative team?",
        ],
    )
}

fn business() -> CatalogEntry {
    entry(
        "business",
        "Business",
        &["entrepreneurship", "commerce"],
        &[
            "management",
            "marketing",
            "sales",
            "finance",
            "money",
            "entrepreneur",
            "startup",
            "leadership",
            "economics",
            "accounting",
            "investing",
            "strategy",
        ],
        vec![
            CareerPath::new(
                "Marketing Manager",
                "Plans campaigns that connect products with the people who need them.",
            )
            .with_skills(&["Market research", "Communication", "Analytics", "Creativity"])
            .with_education(&["Bachelor's in Marketing or Business", "Digital marketing certificate"]),
            CareerPath::new(
                "Financial Analyst",
                "Studies financial data to guide investment and business decisions.",
            )
            .with_skills(&["Financial modelling", "Spreadsheets", "Attention to detail", "Economics"])
            .with_education(&["Bachelor's in Finance or Economics", "CFA programme"]),
            CareerPath::new(
                "Entrepreneur",
                "Starts and grows a business, taking ideas from first sketch to a working company.",
            )
            .with_skills(&["Resilience", "Sales", "Planning", "Leadership"])
            .with_education(&[
                "Business degree (optional)",
                "Startup incubator programmes",
                "Hands-on experience",
            ]),
            CareerPath::new(
                "Project Manager",
                "Keeps teams, timelines and budgets on track so projects get delivered.",
            )
            .with_skills(&["Organisation", "Communication", "Risk management", "Leadership"])
            .with_education(&["Bachelor's in any field", "PMP or PRINCE2 certification"]),
            CareerPath::new(
                "Accountant",
                "Prepares and checks financial records and helps people and companies stay compliant.",
            )
            .with_skills(&["Accounting principles", "Accuracy", "Tax rules", "Spreadsheets"])
            .with_education(&["Bachelor's in Accounting", "CPA or ACCA qualification"]),
        ],
        &[
            "Are you more drawn to numbers and analysis, or to people and persuasion?",
            "Have you ever sold something, organised an event or led a group?",
            "Would you like to run your own venture one day or grow inside an organisation?",
        ],
    )
}

fn science() -> CatalogEntry {
    entry(
        "science",
        "Science",
        &["scientific", "scientist"],
        &[
            "research",
            "experiment",
            "biology",
            "chemistry",
            "physics",
            "laboratory",
            "math",
            "numbers",
            "ecology",
            "astronomy",
            "geology",
            "discovery",
        ],
        vec![
            CareerPath::new(
                "Research Scientist",
                "Designs and runs experiments to answer open questions and publish new findings.",
            )
            .with_skills(&["Experimental design", "Data analysis", "Scientific writing", "Curiosity"])
            .with_education(&["Bachelor's in a science field", "PhD for independent research roles"]),
            CareerPath::new(
                "Environmental Scientist",
                "Studies the natural world to protect ecosystems and public health.",
            )
            .with_skills(&["Field work", "Data collection", "Report writing", "GIS"])
            .with_education(&["Bachelor's in Environmental Science", "Master's for specialist roles"]),
            CareerPath::new(
                "Chemist",
                "Analyses and creates substances for medicine, materials, food and energy.",
            )
            .with_skills(&["Laboratory technique", "Safety practice", "Analytical thinking", "Chemistry"])
            .with_education(&["Bachelor's in Chemistry", "Master's or PhD for research positions"]),
            CareerPath::new(
                "Statistician",
                "Applies mathematics to data to find patterns and measure uncertainty.",
            )
            .with_skills(&["Mathematics", "Statistical software", "Critical thinking", "Communication"])
            .with_education(&["Bachelor's in Statistics or Mathematics", "Master's in Statistics"]),
            CareerPath::new(
                "Astronomer",
                "Observes and models stars, planets and galaxies to understand the universe.",
            )
            .with_skills(&["Physics", "Mathematics", "Programming", "Patience"])
            .with_education(&["Bachelor's in Physics or Astronomy", "PhD in Astrophysics"]),
        ],
        &[
            "Which science subject have you enjoyed the most so far?",
            "Do you like hands-on experiments or working with theories and numbers?",
            "Would you prefer working in a laboratory, outdoors in the field, or at a computer?",
        ],
    )
}

fn healthcare() -> CatalogEntry {
    entry(
        "healthcare",
        "Healthcare",
        &["health care", "medical", "medicine"],
        &[
            "health",
            "doctor",
            "nurse",
            "patient",
            "hospital",
            "care for",
            "therapy",
            "wellness",
            "clinic",
            "pharmacy",
            "fitness",
        ],
        vec![
            CareerPath::new(
                "Registered Nurse",
                "Provides and coordinates patient care in hospitals, clinics and communities.",
            )
            .with_skills(&["Patient care", "Empathy", "Clinical knowledge", "Calm under pressure"])
            .with_education(&["Bachelor of Science in Nursing", "Associate degree in Nursing"]),
            CareerPath::new(
                "Physician",
                "Diagnoses and treats illness and helps patients stay healthy.",
            )
            .with_skills(&["Medical knowledge", "Decision making", "Communication", "Stamina"])
            .with_education(&["Pre-med undergraduate degree", "Medical school", "Residency"]),
            CareerPath::new(
                "Physical Therapist",
                "Helps people recover movement and manage pain after injury or illness.",
            )
            .with_skills(&["Anatomy", "Motivation", "Hands-on treatment", "Patience"])
            .with_education(&["Doctor of Physical Therapy", "Licensing exam"]),
            CareerPath::new(
                "Pharmacist",
                "Dispenses medicines safely and advises patients and doctors on their use.",
            )
            .with_skills(&["Pharmacology", "Accuracy", "Counselling", "Chemistry"])
            .with_education(&["Doctor of Pharmacy", "Pharmacy licence"]),
            CareerPath::new(
                "Medical Laboratory Scientist",
                "Runs the tests that help doctors diagnose and monitor disease.",
            )
            .with_skills(&["Laboratory technique", "Attention to detail", "Biology", "Quality control"])
            .with_education(&["Bachelor's in Medical Laboratory Science", "Certification exam"]),
        ],
        &[
            "Would you rather work directly with patients or behind the scenes in a lab or pharmacy?",
            "How do you handle stressful or emotional situations?",
            "Are you prepared for several years of study and clinical training?",
        ],
    )
}

fn education() -> CatalogEntry {
    entry(
        "education",
        "Education",
        &["teaching", "teacher"],
        &[
            "teach",
            "school",
            "student",
            "tutor",
            "learning",
            "classroom",
            "mentor",
            "training",
            "curriculum",
            "coach",
            "lecture",
        ],
        vec![
            CareerPath::new(
                "School Teacher",
                "Plans lessons and helps students learn, grow and find their strengths.",
            )
            .with_skills(&["Lesson planning", "Classroom management", "Patience", "Communication"])
            .with_education(&["Bachelor's in Education", "Teaching certification"]),
            CareerPath::new(
                "Instructional Designer",
                "Builds courses and training materials that make learning effective.",
            )
            .with_skills(&["Learning theory", "Writing", "E-learning tools", "Project management"])
            .with_education(&["Bachelor's in Education or Communication", "Master's in Instructional Design"]),
            CareerPath::new(
                "School Counselor",
                "Supports students with academic planning, careers and personal challenges.",
            )
            .with_skills(&["Active listening", "Counselling techniques", "Empathy", "Confidentiality"])
            .with_education(&["Master's in School Counseling", "State licensure"]),
            CareerPath::new(
                "Corporate Trainer",
                "Teaches professional skills to employees in companies and organisations.",
            )
            .with_skills(&["Public speaking", "Workshop design", "Subject expertise", "Feedback"])
            .with_education(&["Bachelor's in any field", "Training and facilitation certificates"]),
            CareerPath::new(
                "Education Administrator",
                "Leads schools or programmes, managing staff, budgets and policy.",
            )
            .with_skills(&["Leadership", "Budgeting", "Policy knowledge", "Communication"])
            .with_education(&["Teaching experience", "Master's in Educational Leadership"]),
        ],
        &[
            "Which age group or audience would you most like to teach?",
            "Have you ever tutored, coached or explained something to others?",
            "Do you see yourself in a classroom or designing how others learn?",
        ],
    )
}

fn social_services() -> CatalogEntry {
    entry(
        "socialServices",
        "Social Services",
        &["social work", "community service"],
        &[
            "helping",
            "people",
            "community",
            "counsel",
            "support",
            "volunteer",
            "nonprofit",
            "social",
            "advocacy",
            "welfare",
            "family",
        ],
        vec![
            CareerPath::new(
                "Social Worker",
                "Helps individuals and families cope with challenges and access support.",
            )
            .with_skills(&["Case management", "Empathy", "Advocacy", "Resilience"])
            .with_education(&["Bachelor's in Social Work", "Master's in Social Work for clinical roles"]),
            CareerPath::new(
                "Mental Health Counselor",
                "Supports clients through emotional and mental health difficulties.",
            )
            .with_skills(&["Active listening", "Therapeutic techniques", "Ethics", "Patience"])
            .with_education(&["Master's in Counseling", "Supervised clinical hours", "Licensure"]),
            CareerPath::new(
                "Nonprofit Program Manager",
                "Runs programmes that serve communities and measures their impact.",
            )
            .with_skills(&["Programme design", "Fundraising", "Volunteer coordination", "Reporting"])
            .with_education(&["Bachelor's in any field", "Nonprofit management certificate"]),
            CareerPath::new(
                "Community Outreach Coordinator",
                "Connects organisations with the communities they serve through events and partnerships.",
            )
            .with_skills(&["Networking", "Public speaking", "Event planning", "Cultural awareness"])
            .with_education(&["Bachelor's in Communications or Sociology"]),
            CareerPath::new(
                "Youth Worker",
                "Mentors young people and runs activities that help them build confidence.",
            )
            .with_skills(&["Mentoring", "Activity planning", "Safeguarding", "Patience"])
            .with_education(&["Youth work qualification", "Volunteering experience"]),
        ],
        &[
            "Which groups of people would you most like to help?",
            "Have you volunteered or supported someone through a hard time?",
            "Would you prefer one-to-one support or organising programmes for many people?",
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_catalog_is_valid() {
        let catalog = CategoryCatalog::builtin();
        assert!(catalog.validate().is_ok());
        assert_eq!(catalog.len(), 7);
        assert_eq!(catalog.keys()[0], "technology");
        assert!(catalog.iter().all(|(_, data)| data.canonical_paths.len() >= 4));
    }

    #[test]
    fn test_require_missing_category() {
        let catalog = CategoryCatalog::builtin();
        let err = catalog.require(&CategoryKey::new("astrology")).unwrap_err();
        assert!(err.is_data_error());
        assert!(catalog.require(&CategoryKey::new("healthcare")).is_ok());
    }

    #[test]
    fn test_find_path_across_categories() {
        let catalog = CategoryCatalog::builtin();
        let (key, path) = catalog.find_path("data scientist").unwrap();
        assert_eq!(*key, "technology");
        assert_eq!(path.name, "Data Scientist");
    }

    #[test]
    fn test_validation_rejects_duplicates_and_empty_paths() {
        let mut entries = vec![technology(), technology()];
        assert!(CategoryCatalog::new(entries.clone()).validate().is_err());

        entries.truncate(1);
        entries[0].data.canonical_paths.clear();
        assert!(CategoryCatalog::new(entries).validate().is_err());

        assert!(CategoryCatalog::new(vec![]).validate().is_err());
    }

    #[test]
    fn test_yaml_roundtrip_through_file() {
        let catalog = CategoryCatalog::new(vec![science(), healthcare()]);
        let yaml = serde_yaml::to_string(&catalog).unwrap();

        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        let loaded = CategoryCatalog::from_file(file.path()).unwrap();
        assert_eq!(loaded, catalog);
        assert_eq!(loaded.keys()[1], "healthcare");
    }

    #[test]
    fn test_missing_file() {
        let result = CategoryCatalog::from_yaml_file("/nonexistent/catalog.yaml");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }
}
