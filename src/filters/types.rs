//! Filter data structures and types
//!
//! This module defines the data the filter managers work with:
//! - `FilterCriteria`: active category tags and base-model tags for one context
//! - `TagKind`: which of the two criteria fields a tag belongs to
//! - `TagCount` / `BaseModelCount`: candidate tags as reported by the server

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Which criteria field a tag toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    /// Free-form category tag ("sci-fi", "character", ...)
    Category,
    /// Base-model attribute ("SDXL 1.0", "Flux.1 D", ...)
    Attribute,
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Category => f.write_str("tag"),
            Self::Attribute => f.write_str("base model"),
        }
    }
}

/// Active filter criteria for one listing context
///
/// Both fields are always present and never hold the same tag twice; all
/// mutation goes through methods that keep that true. The serialized form
/// matches what the browser front end stores: `{"tags": [...], "baseModel": [...]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Category tags
    #[serde(rename = "tags", default, deserialize_with = "null_as_empty")]
    category: Vec<String>,

    /// Base-model tags
    #[serde(rename = "baseModel", default, deserialize_with = "null_as_empty")]
    attribute: Vec<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl FilterCriteria {
    /// Create a new filter criteria builder
    #[must_use]
    pub fn builder() -> FilterCriteriaBuilder {
        FilterCriteriaBuilder::default()
    }

    /// Create empty criteria (same as `builder().build()`)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse persisted criteria, dropping duplicate tags
    ///
    /// # Errors
    ///
    /// Returns the JSON error if `raw` is not a criteria object.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let parsed: Self = serde_json::from_str(raw)?;
        let mut criteria = Self::new();
        for tag in parsed.category {
            criteria.insert(TagKind::Category, &tag);
        }
        for tag in parsed.attribute {
            criteria.insert(TagKind::Attribute, &tag);
        }
        Ok(criteria)
    }

    /// Serialize for durable storage
    ///
    /// # Errors
    ///
    /// Returns the JSON error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Category tags
    #[must_use]
    pub fn category(&self) -> &[String] {
        &self.category
    }

    /// Base-model tags
    #[must_use]
    pub fn attribute(&self) -> &[String] {
        &self.attribute
    }

    /// Tags of the given kind
    #[must_use]
    pub fn tags(&self, kind: TagKind) -> &[String] {
        match kind {
            TagKind::Category => &self.category,
            TagKind::Attribute => &self.attribute,
        }
    }

    fn field_mut(&mut self, kind: TagKind) -> &mut Vec<String> {
        match kind {
            TagKind::Category => &mut self.category,
            TagKind::Attribute => &mut self.attribute,
        }
    }

    /// Whether `tag` is active in the given field
    #[must_use]
    pub fn contains(&self, kind: TagKind, tag: &str) -> bool {
        self.tags(kind).iter().any(|t| t == tag)
    }

    /// Add `tag`; returns `false` if it was already present
    pub fn insert(&mut self, kind: TagKind, tag: &str) -> bool {
        if self.contains(kind, tag) {
            return false;
        }
        self.field_mut(kind).push(tag.to_string());
        true
    }

    /// Remove `tag`; returns `false` if it was not present
    pub fn remove(&mut self, kind: TagKind, tag: &str) -> bool {
        let field = self.field_mut(kind);
        let before = field.len();
        field.retain(|t| t != tag);
        field.len() != before
    }

    /// Flip `tag`; returns whether it is active afterwards
    pub fn toggle(&mut self, kind: TagKind, tag: &str) -> bool {
        if self.remove(kind, tag) {
            false
        } else {
            self.insert(kind, tag)
        }
    }

    /// Drop every tag from both fields
    pub fn clear(&mut self) {
        self.category.clear();
        self.attribute.clear();
    }

    /// Total number of active tags across both fields
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.category.len() + self.attribute.len()
    }

    /// Whether any tag is active
    #[must_use]
    pub fn has_active(&self) -> bool {
        self.active_count() > 0
    }

    /// Human-readable summary used for the "filters applied" notification
    ///
    /// Returns `None` when nothing is active.
    #[must_use]
    pub fn summary(&self) -> Option<String> {
        let parts: Vec<String> = [
            (self.attribute.len(), "base model"),
            (self.category.len(), "tag"),
        ]
        .into_iter()
        .filter(|(count, _)| *count > 0)
        .map(|(count, noun)| {
            if count == 1 {
                format!("{count} {noun}")
            } else {
                format!("{count} {noun}s")
            }
        })
        .collect();

        if parts.is_empty() {
            None
        } else {
            Some(format!("Filtering by {}", parts.join(" and ")))
        }
    }
}

/// Builder for `FilterCriteria`
#[derive(Debug, Clone, Default)]
pub struct FilterCriteriaBuilder {
    criteria: FilterCriteria,
}

impl FilterCriteriaBuilder {
    /// Add a category tag
    #[must_use]
    pub fn category(mut self, tag: &str) -> Self {
        self.criteria.insert(TagKind::Category, tag);
        self
    }

    /// Add a base-model tag
    #[must_use]
    pub fn attribute(mut self, tag: &str) -> Self {
        self.criteria.insert(TagKind::Attribute, tag);
        self
    }

    /// Build the criteria
    #[must_use]
    pub fn build(self) -> FilterCriteria {
        self.criteria
    }
}

/// A candidate category tag with its usage count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
    pub tag: String,
    #[serde(default)]
    pub count: u64,
}

/// A candidate base model with its usage count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseModelCount {
    pub name: String,
    #[serde(default)]
    pub count: u64,
}

/// Payload of the top-tags endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct TagListResponse {
    pub success: bool,
    #[serde(default)]
    pub tags: Vec<TagCount>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Payload of the base-models endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct BaseModelListResponse {
    pub success: bool,
    #[serde(default)]
    pub base_models: Vec<BaseModelCount>,
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_adds_then_removes() {
        let mut criteria = FilterCriteria::new();

        assert!(criteria.toggle(TagKind::Category, "sci-fi"));
        assert_eq!(criteria.category(), ["sci-fi".to_string()]);

        assert!(!criteria.toggle(TagKind::Category, "sci-fi"));
        assert!(criteria.category().is_empty());
    }

    #[test]
    fn test_insert_rejects_duplicates() {
        let mut criteria = FilterCriteria::new();
        assert!(criteria.insert(TagKind::Attribute, "SDXL 1.0"));
        assert!(!criteria.insert(TagKind::Attribute, "SDXL 1.0"));
        assert_eq!(criteria.attribute().len(), 1);
    }

    #[test]
    fn test_fields_are_independent() {
        let criteria = FilterCriteria::builder()
            .category("anime")
            .attribute("anime")
            .build();

        assert!(criteria.contains(TagKind::Category, "anime"));
        assert!(criteria.contains(TagKind::Attribute, "anime"));
        assert_eq!(criteria.active_count(), 2);
    }

    #[test]
    fn test_serialized_field_names() {
        let criteria = FilterCriteria::builder()
            .category("style")
            .attribute("Pony")
            .build();

        let json = criteria.to_json().unwrap();
        assert_eq!(json, r#"{"tags":["style"],"baseModel":["Pony"]}"#);
    }

    #[test]
    fn test_from_json_tolerates_null_and_missing_fields() {
        let criteria = FilterCriteria::from_json(r#"{"tags": null}"#).unwrap();
        assert!(criteria.category().is_empty());
        assert!(criteria.attribute().is_empty());
    }

    #[test]
    fn test_from_json_drops_duplicates() {
        let criteria =
            FilterCriteria::from_json(r#"{"tags": ["a", "a", "b"], "baseModel": ["x", "x"]}"#)
                .unwrap();
        assert_eq!(criteria.category(), ["a".to_string(), "b".to_string()]);
        assert_eq!(criteria.attribute(), ["x".to_string()]);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(FilterCriteria::from_json("not json").is_err());
        assert!(FilterCriteria::from_json(r#"{"tags": "oops"}"#).is_err());
    }

    #[test]
    fn test_summary() {
        assert_eq!(FilterCriteria::new().summary(), None);

        let tags_only = FilterCriteria::builder().category("a").category("b").build();
        assert_eq!(tags_only.summary().as_deref(), Some("Filtering by 2 tags"));

        let both = FilterCriteria::builder()
            .category("a")
            .attribute("SD 1.5")
            .build();
        assert_eq!(
            both.summary().as_deref(),
            Some("Filtering by 1 base model and 1 tag")
        );
    }

    #[test]
    fn test_clear() {
        let mut criteria = FilterCriteria::builder().category("a").attribute("b").build();
        criteria.clear();
        assert!(!criteria.has_active());
    }

    #[test]
    fn test_tag_list_response_parsing() {
        let raw = r#"{"success": true, "tags": [{"tag": "sci-fi", "count": 12}]}"#;
        let response: TagListResponse = serde_json::from_str(raw).unwrap();
        assert!(response.success);
        assert_eq!(response.tags[0].tag, "sci-fi");
        assert_eq!(response.tags[0].count, 12);

        let failed: BaseModelListResponse =
            serde_json::from_str(r#"{"success": false, "error": "boom"}"#).unwrap();
        assert!(!failed.success);
        assert!(failed.base_models.is_empty());
        assert_eq!(failed.error.as_deref(), Some("boom"));
    }
}
