use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Publication status of a post. `Published` is the only status visible to
/// public listing, detail, comment, and share operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Published,
}

impl PostStatus {
    /// Wire name used in JSON payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
        }
    }

    /// Parse the wire name. Returns `None` for anything else.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "draft" => Some(PostStatus::Draft),
            "published" => Some(PostStatus::Published),
            _ => None,
        }
    }
}

impl std::fmt::Display for PostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Post entity - a blog post with a draft/published lifecycle.
///
/// `tags` holds the display labels of the post's tags; the store keeps the
/// actual tag entities and the many-to-many links.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    /// Reference to an externally-owned author identity.
    pub author_id: Uuid,
    pub title: String,
    pub slug: String,
    pub body: String,
    /// Publication timestamp; also scopes slug/title uniqueness to its day.
    pub publish: DateTime<Utc>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub status: PostStatus,
    pub tags: Vec<String>,
}

impl Post {
    /// Create a new draft with generated id and current timestamps.
    pub fn new(author_id: Uuid, title: String, slug: String, body: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author_id,
            title,
            slug,
            body,
            publish: now,
            created: now,
            updated: now,
            status: PostStatus::Draft,
            tags: Vec::new(),
        }
    }

    /// Refresh the `updated` timestamp. Call before persisting a mutation.
    pub fn touch(&mut self) {
        self.updated = Utc::now();
    }

    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }

    /// The UTC day the post was (or will be) published on.
    pub fn publish_day(&self) -> PublishDay {
        PublishDay::of(self.publish)
    }

    /// Canonical path of the post: `/{year}/{month}/{day}/{slug}`, unpadded,
    /// from the UTC publish date.
    pub fn canonical_path(&self) -> String {
        let date = self.publish.date_naive();
        format!(
            "/{}/{}/{}/{}",
            date.year(),
            date.month(),
            date.day(),
            self.slug
        )
    }
}

/// A calendar day (UTC) scoping post lookups and per-day uniqueness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishDay(NaiveDate);

impl PublishDay {
    /// Validate a (year, month, day) triple. `None` for impossible dates.
    pub fn new(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn of(ts: DateTime<Utc>) -> Self {
        Self(ts.date_naive())
    }

    /// Half-open UTC window `[start, end)` covering this day. `None` only at
    /// the edge of the representable calendar.
    pub fn bounds(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let start = self.0.and_time(NaiveTime::MIN).and_utc();
        let next = self.0.checked_add_days(Days::new(1))?;
        Some((start, next.and_time(NaiveTime::MIN).and_utc()))
    }

    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        ts.date_naive() == self.0
    }
}
