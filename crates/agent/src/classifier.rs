//! Category Classification
//!
//! Maps free text to an interest category in two tiers:
//! 1. Direct name match: the category key, display name or an alias appears
//!    in the text. First category in catalog order wins.
//! 2. Keyword frequency: the category with the strictly highest number of
//!    matching keywords wins; ties go to the earlier category.
//!
//! Text that matches nothing classifies to `None`, which is not an error.

use std::sync::Arc;

use career_guide_config::CategoryCatalog;
use career_guide_core::{CategoryData, CategoryKey, HistoryEntry};

/// Keyword classifier over an immutable catalog
#[derive(Debug, Clone)]
pub struct CategoryClassifier {
    catalog: Arc<CategoryCatalog>,
}

impl CategoryClassifier {
    pub fn new(catalog: Arc<CategoryCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Arc<CategoryCatalog> {
        &self.catalog
    }

    /// Classify text, `None` when no category matches
    pub fn classify(&self, text: &str) -> Option<CategoryKey> {
        let lowered = text.trim().to_lowercase();
        if lowered.is_empty() {
            return None;
        }

        if let Some(key) = self.direct_match(&lowered) {
            tracing::debug!(category = %key, "Direct category match");
            return Some(key);
        }

        let key = self.keyword_match(&lowered);
        if let Some(key) = &key {
            tracing::debug!(category = %key, "Keyword category match");
        }
        key
    }

    /// Classify the latest message, falling back to the most recent
    /// classifiable non-bot history entry
    pub fn classify_with_history(
        &self,
        text: &str,
        history: &[HistoryEntry],
    ) -> Option<CategoryKey> {
        self.classify(text).or_else(|| {
            let carried = history
                .iter()
                .rev()
                .filter(|entry| !entry.is_bot())
                .find_map(|entry| self.classify(&entry.message));
            if let Some(key) = &carried {
                tracing::debug!(category = %key, "Category carried over from history");
            }
            carried
        })
    }

    fn direct_match(&self, lowered: &str) -> Option<CategoryKey> {
        self.catalog
            .iter()
            .find(|(key, data)| names(key, data).any(|name| lowered.contains(&name)))
            .map(|(key, _)| key.clone())
    }

    fn keyword_match(&self, lowered: &str) -> Option<CategoryKey> {
        let mut best: Option<(&CategoryKey, usize)> = None;

        for (key, data) in self.catalog.iter() {
            let score = data
                .keywords
                .iter()
                .filter(|keyword| !keyword.is_empty() && lowered.contains(&keyword.to_lowercase()))
                .count();

            // Strictly greater keeps the first-declared category on ties
            if score > 0 && best.map_or(true, |(_, top)| score > top) {
                best = Some((key, score));
            }
        }

        best.map(|(key, _)| key.clone())
    }
}

/// Lowercased direct-match names: key, display name and aliases
fn names<'a>(key: &'a CategoryKey, data: &'a CategoryData) -> impl Iterator<Item = String> + 'a {
    std::iter::once(key.as_str())
        .chain(std::iter::once(data.display_name.as_str()))
        .chain(data.aliases.iter().map(String::as_str))
        .filter(|name| !name.trim().is_empty())
        .map(str::to_lowercase)
}
