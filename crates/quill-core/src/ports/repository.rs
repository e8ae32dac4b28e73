use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Comment, Page, Post, PublishDay, Tag};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Post repository. Besides plain CRUD it exposes the published-only
/// retrieval scope used by every public operation.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// One page of published posts, newest first, optionally restricted to
    /// posts carrying the tag with the given slug. The requested page number
    /// is clamped to the available range and is never an error.
    async fn list_published(
        &self,
        tag_slug: Option<&str>,
        page: u64,
        per_page: u64,
    ) -> Result<Page<Post>, RepoError>;

    /// A published post by id. Drafts resolve to `None`.
    async fn find_published_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError>;

    /// A published post by its publish day and slug. Drafts resolve to `None`.
    async fn find_published_by_day_and_slug(
        &self,
        day: PublishDay,
        slug: &str,
    ) -> Result<Option<Post>, RepoError>;

    /// Published posts sharing at least one tag with `post`, excluding the
    /// post itself, ranked by shared-tag count then recency, truncated to
    /// `limit`.
    async fn find_similar(&self, post: &Post, limit: u64) -> Result<Vec<Post>, RepoError>;

    /// Whether a different post already occupies `slug` on the given
    /// publish day.
    async fn slug_exists_on_day(
        &self,
        slug: &str,
        day: PublishDay,
        exclude: Option<Uuid>,
    ) -> Result<bool, RepoError>;

    /// Whether a different post already occupies `title` on the given
    /// publish day.
    async fn title_exists_on_day(
        &self,
        title: &str,
        day: PublishDay,
        exclude: Option<Uuid>,
    ) -> Result<bool, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// Active comments of a post, oldest first.
    async fn find_active_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError>;
}

/// Tag repository.
#[async_trait]
pub trait TagRepository: BaseRepository<Tag, Uuid> {
    /// Find a tag by its URL slug.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError>;
}
