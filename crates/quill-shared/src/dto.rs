//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to submit a comment on a published post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitCommentRequest {
    pub name: String,
    pub email: String,
    pub body: String,
}

/// Request to share a published post by email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharePostRequest {
    /// Sender's display name.
    pub name: String,
    /// Sender's email; replies to the notification go here.
    pub email: String,
    /// Recipient email address.
    pub to: String,
    /// Optional note included in the notification.
    #[serde(default)]
    pub comments: Option<String>,
}

/// Request to create a post. Omitted slug is derived from the title;
/// omitted status defaults to draft; omitted publish defaults to now.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub author_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    pub body: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub publish: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Request to update a post; only supplied fields change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub publish: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// Request to show or hide a comment (moderation).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModerateCommentRequest {
    pub active: bool,
}

/// A post as it appears in listings and similar-post recommendations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostSummary {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    /// Canonical path: `/{year}/{month}/{day}/{slug}`.
    pub url: String,
    pub publish: DateTime<Utc>,
    pub tags: Vec<String>,
}

/// A post with its full content, as returned by detail and authoring
/// endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetail {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub slug: String,
    pub url: String,
    pub body: String,
    pub status: String,
    pub publish: DateTime<Utc>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub tags: Vec<String>,
}

/// A comment as exposed publicly. The submitter's email is deliberately
/// not part of the wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: Uuid,
    pub post_id: Uuid,
    pub name: String,
    pub body: String,
    pub active: bool,
    pub created: DateTime<Utc>,
}

/// Tag descriptor used when a listing is filtered by tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagInfo {
    pub name: String,
    pub slug: String,
}

/// Pagination metadata accompanying a listing page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageMeta {
    pub number: u64,
    pub per_page: u64,
    pub total_items: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

/// Response for the published-post listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostListResponse {
    pub posts: Vec<PostSummary>,
    pub page: PageMeta,
    /// Present when the listing was filtered by tag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<TagInfo>,
}

/// Response for the post detail view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetailResponse {
    pub post: PostDetail,
    pub comments: Vec<CommentResponse>,
    pub similar_posts: Vec<PostSummary>,
}

/// Response after an email share was handed to the transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareResponse {
    pub sent: bool,
}
