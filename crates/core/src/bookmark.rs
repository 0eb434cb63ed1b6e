//! Bookmarked career roadmaps

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request to bookmark a career roadmap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBookmark {
    pub user_id: String,
    pub career_name: String,
    pub category: String,
    pub roadmap_key: String,
}

/// A stored bookmark. At most one bookmark per user is primary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub user_id: String,
    pub career_name: String,
    pub category: String,
    pub roadmap_key: String,
    pub is_primary: bool,
    pub created_at: DateTime<Utc>,
}

impl Bookmark {
    pub fn from_request(request: NewBookmark) -> Self {
        Self {
            user_id: request.user_id,
            career_name: request.career_name,
            category: request.category,
            roadmap_key: request.roadmap_key,
            is_primary: false,
            created_at: Utc::now(),
        }
    }

    /// Whether this bookmark refers to the same career as `career_name`
    pub fn matches(&self, career_name: &str) -> bool {
        self.career_name.eq_ignore_ascii_case(career_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bookmark_wire_shape() {
        let bookmark = Bookmark::from_request(NewBookmark {
            user_id: "u1".into(),
            career_name: "Data Scientist".into(),
            category: "technology".into(),
            roadmap_key: "Data Scientist".into(),
        });
        let value = serde_json::to_value(&bookmark).unwrap();
        assert_eq!(value["userId"], "u1");
        assert_eq!(value["careerName"], "Data Scientist");
        assert_eq!(value["roadmapKey"], "Data Scientist");
        assert_eq!(value["isPrimary"], false);
        assert!(value.get("is_primary").is_none());
        assert!(bookmark.matches("data scientist"));
    }
}
