use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::slug::slugify;

/// Tag entity - a shared label attached to posts via a many-to-many link.
///
/// Tags have no lifecycle of their own: they are get-or-created by name when
/// a post references them, and deleting one only detaches it from its posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

impl Tag {
    /// Create a tag with a slug derived from its display name.
    pub fn new(name: String) -> Self {
        let slug = slugify(&name);
        Self {
            id: Uuid::new_v4(),
            name,
            slug,
        }
    }
}

/// Normalize a list of tag labels as supplied by a client: trim whitespace,
/// drop empties and anything that slugifies to nothing, and deduplicate by
/// slug, keeping the first spelling.
pub fn normalize_labels(labels: &[String]) -> Vec<String> {
    let mut seen = Vec::new();
    let mut out = Vec::new();
    for label in labels {
        let trimmed = label.trim();
        let slug = slugify(trimmed);
        if slug.is_empty() || seen.contains(&slug) {
            continue;
        }
        seen.push(slug);
        out.push(trimmed.to_owned());
    }
    out
}
