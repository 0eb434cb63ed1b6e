//! Static content lookup

use crate::catalog::{CategoryData, CategoryKey};
use crate::roadmap::RoadmapData;

/// Read-only lookup of categories and roadmaps
pub trait ContentCatalog: Send + Sync {
    /// Category data by key, `None` when the key is unknown
    fn get_category(&self, key: &CategoryKey) -> Option<&CategoryData>;

    /// All category keys in declaration order
    fn category_keys(&self) -> Vec<CategoryKey>;

    /// Roadmap for a career path, falling back to a default roadmap
    fn get_roadmap(&self, path_name: &str) -> RoadmapData;
}
