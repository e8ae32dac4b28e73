//! In-memory store implementation - used as fallback when PostgreSQL is not
//! configured.
//!
//! Entities live in plain maps behind one async RwLock, with an explicit
//! post-to-comments index; cascades are delete-time fan-outs over that index.
//! Query semantics match the PostgreSQL repositories so handlers behave the
//! same against either backend.
//! Note: Data is lost on process restart.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{Comment, Page, Paginator, Post, PublishDay, Tag, slugify};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, CommentRepository, PostRepository, TagRepository};

#[derive(Default)]
struct StoreInner {
    posts: HashMap<Uuid, Post>,
    comments: HashMap<Uuid, Comment>,
    /// Post id to comment ids, in insertion order.
    comments_by_post: HashMap<Uuid, Vec<Uuid>>,
    tags: HashMap<Uuid, Tag>,
}

impl StoreInner {
    fn published(&self) -> impl Iterator<Item = &Post> {
        self.posts.values().filter(|post| post.is_published())
    }

    fn has_tag(post: &Post, slug: &str) -> bool {
        post.tags.iter().any(|label| slugify(label) == slug)
    }

    /// Get-or-create tag entities for the given labels.
    fn ensure_tags(&mut self, labels: &[String]) {
        for label in labels {
            let slug = slugify(label);
            if !self.tags.values().any(|tag| tag.slug == slug) {
                let tag = Tag::new(label.clone());
                self.tags.insert(tag.id, tag);
            }
        }
    }
}

/// In-memory store implementing every repository port over shared maps.
pub struct MemoryStore {
    inner: RwLock<StoreInner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(StoreInner::default()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let inner = self.inner.read().await;
        Ok(inner.posts.get(&id).cloned())
    }

    async fn save(&self, entity: Post) -> Result<Post, RepoError> {
        let mut inner = self.inner.write().await;
        inner.ensure_tags(&entity.tags);
        inner.posts.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut inner = self.inner.write().await;
        if inner.posts.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        // Fan out the cascade to the post's comments.
        if let Some(comment_ids) = inner.comments_by_post.remove(&id) {
            for comment_id in comment_ids {
                inner.comments.remove(&comment_id);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn list_published(
        &self,
        tag_slug: Option<&str>,
        page: u64,
        per_page: u64,
    ) -> Result<Page<Post>, RepoError> {
        let inner = self.inner.read().await;
        let mut posts: Vec<Post> = inner
            .published()
            .filter(|post| tag_slug.is_none_or(|slug| StoreInner::has_tag(post, slug)))
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.publish.cmp(&a.publish));

        let pager = Paginator::new(posts.len() as u64, per_page);
        let number = pager.clamp(page);
        let offset = pager.offset(number) as usize;
        let items: Vec<Post> = posts
            .into_iter()
            .skip(offset)
            .take(per_page as usize)
            .collect();

        Ok(pager.page(number, items))
    }

    async fn find_published_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let inner = self.inner.read().await;
        Ok(inner
            .posts
            .get(&id)
            .filter(|post| post.is_published())
            .cloned())
    }

    async fn find_published_by_day_and_slug(
        &self,
        day: PublishDay,
        slug: &str,
    ) -> Result<Option<Post>, RepoError> {
        let inner = self.inner.read().await;
        Ok(inner
            .published()
            .find(|post| post.slug == slug && day.contains(post.publish))
            .cloned())
    }

    async fn find_similar(&self, post: &Post, limit: u64) -> Result<Vec<Post>, RepoError> {
        let reference: Vec<String> = post.tags.iter().map(|label| slugify(label)).collect();
        if reference.is_empty() {
            return Ok(Vec::new());
        }

        let inner = self.inner.read().await;
        let mut ranked: Vec<(usize, Post)> = inner
            .published()
            .filter(|candidate| candidate.id != post.id)
            .filter_map(|candidate| {
                let shared = candidate
                    .tags
                    .iter()
                    .filter(|label| reference.contains(&slugify(label)))
                    .count();
                (shared > 0).then(|| (shared, candidate.clone()))
            })
            .collect();

        // Most shared tags first, then most recently published.
        ranked.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| b.1.publish.cmp(&a.1.publish)));

        Ok(ranked
            .into_iter()
            .take(limit as usize)
            .map(|(_, post)| post)
            .collect())
    }

    async fn slug_exists_on_day(
        &self,
        slug: &str,
        day: PublishDay,
        exclude: Option<Uuid>,
    ) -> Result<bool, RepoError> {
        let inner = self.inner.read().await;
        Ok(inner.posts.values().any(|post| {
            post.slug == slug
                && day.contains(post.publish)
                && exclude.is_none_or(|id| post.id != id)
        }))
    }

    async fn title_exists_on_day(
        &self,
        title: &str,
        day: PublishDay,
        exclude: Option<Uuid>,
    ) -> Result<bool, RepoError> {
        let inner = self.inner.read().await;
        Ok(inner.posts.values().any(|post| {
            post.title == title
                && day.contains(post.publish)
                && exclude.is_none_or(|id| post.id != id)
        }))
    }
}

#[async_trait]
impl BaseRepository<Comment, Uuid> for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        let inner = self.inner.read().await;
        Ok(inner.comments.get(&id).cloned())
    }

    async fn save(&self, entity: Comment) -> Result<Comment, RepoError> {
        let mut inner = self.inner.write().await;
        let index = inner.comments_by_post.entry(entity.post_id).or_default();
        if !index.contains(&entity.id) {
            index.push(entity.id);
        }
        inner.comments.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut inner = self.inner.write().await;
        let Some(comment) = inner.comments.remove(&id) else {
            return Err(RepoError::NotFound);
        };
        if let Some(index) = inner.comments_by_post.get_mut(&comment.post_id) {
            index.retain(|comment_id| *comment_id != id);
        }
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn find_active_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let inner = self.inner.read().await;
        let mut comments: Vec<Comment> = inner
            .comments_by_post
            .get(&post_id)
            .into_iter()
            .flatten()
            .filter_map(|comment_id| inner.comments.get(comment_id))
            .filter(|comment| comment.active)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created.cmp(&b.created));
        Ok(comments)
    }
}

#[async_trait]
impl BaseRepository<Tag, Uuid> for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tag>, RepoError> {
        let inner = self.inner.read().await;
        Ok(inner.tags.get(&id).cloned())
    }

    async fn save(&self, entity: Tag) -> Result<Tag, RepoError> {
        let mut inner = self.inner.write().await;
        inner.tags.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut inner = self.inner.write().await;
        let Some(tag) = inner.tags.remove(&id) else {
            return Err(RepoError::NotFound);
        };
        // Detach the label from posts; the posts themselves survive.
        for post in inner.posts.values_mut() {
            post.tags.retain(|label| slugify(label) != tag.slug);
        }
        Ok(())
    }
}

#[async_trait]
impl TagRepository for MemoryStore {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError> {
        let inner = self.inner.read().await;
        Ok(inner.tags.values().find(|tag| tag.slug == slug).cloned())
    }
}
