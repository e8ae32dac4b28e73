use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Comment entity - a visitor comment attached to exactly one post.
///
/// `active` is a soft-moderation flag: inactive comments are hidden from the
/// detail view but kept in the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub name: String,
    pub email: String,
    pub body: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub active: bool,
}

impl Comment {
    /// Create a new active comment with generated id and current timestamps.
    pub fn new(post_id: Uuid, name: String, email: String, body: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            post_id,
            name,
            email,
            body,
            created: now,
            updated: now,
            active: true,
        }
    }

    /// Refresh the `updated` timestamp. Call before persisting a mutation.
    pub fn touch(&mut self) {
        self.updated = Utc::now();
    }
}
