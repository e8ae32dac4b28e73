//! PostgreSQL repository implementations.
//!
//! Posts are upserted together with their tag links in one transaction, so a
//! saved post's labels and the `post_tags` rows never drift apart. All reads
//! hydrate tag labels through the join table.

use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, JoinType, LoaderTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use uuid::Uuid;

use quill_core::domain::{Comment, Page, Paginator, Post, PublishDay, Tag, slugify};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, CommentRepository, PostRepository, TagRepository};

use super::entity::post::PostStatus;
use super::entity::{comment, post, post_tag, tag};

/// Mask an email address for log output, keeping the first character of the
/// local part and the full domain.
pub(crate) fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let head: String = local.chars().take(1).collect();
            format!("{head}***@{domain}")
        }
        None => "***".to_owned(),
    }
}

fn constraint_or_query(err: sea_orm::DbErr, what: &str) -> RepoError {
    let message = err.to_string();
    if message.contains("duplicate") || message.contains("unique") {
        RepoError::Constraint(format!("{what} violates a uniqueness constraint"))
    } else {
        RepoError::Query(message)
    }
}

/// Post repository backed by PostgreSQL.
pub struct PostgresPostRepository {
    db: DatabaseConnection,
}

impl PostgresPostRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Attach tag labels to a batch of post rows, preserving row order.
    async fn hydrate_all(&self, models: Vec<post::Model>) -> Result<Vec<Post>, RepoError> {
        let tags = models
            .load_many_to_many(tag::Entity, post_tag::Entity, &self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(models
            .into_iter()
            .zip(tags)
            .map(|(model, tags)| model.into_domain(tags.into_iter().map(|t| t.name).collect()))
            .collect())
    }

    async fn hydrate_one(&self, model: post::Model) -> Result<Post, RepoError> {
        let mut posts = self.hydrate_all(vec![model]).await?;
        posts.pop().ok_or(RepoError::NotFound)
    }

    /// Replace the post's tag links, get-or-creating tags by slug.
    async fn sync_tags<C: ConnectionTrait>(
        &self,
        conn: &C,
        post_id: Uuid,
        labels: &[String],
    ) -> Result<(), RepoError> {
        post_tag::Entity::delete_many()
            .filter(post_tag::Column::PostId.eq(post_id))
            .exec(conn)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        for label in labels {
            let slug = slugify(label);
            let existing = tag::Entity::find()
                .filter(tag::Column::Slug.eq(&slug))
                .one(conn)
                .await
                .map_err(|e| RepoError::Query(e.to_string()))?;

            let tag_id = match existing {
                Some(found) => found.id,
                None => {
                    let fresh = Tag::new(label.clone());
                    let id = fresh.id;
                    tag::Entity::insert(tag::ActiveModel::from(fresh))
                        .exec(conn)
                        .await
                        .map_err(|e| constraint_or_query(e, "Tag"))?;
                    id
                }
            };

            post_tag::Entity::insert(post_tag::ActiveModel {
                post_id: Set(post_id),
                tag_id: Set(tag_id),
            })
            .exec(conn)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;
        }

        Ok(())
    }

    async fn value_exists_on_day(
        &self,
        column: post::Column,
        value: &str,
        day: PublishDay,
        exclude: Option<Uuid>,
    ) -> Result<bool, RepoError> {
        let Some((start, end)) = day.bounds() else {
            return Ok(false);
        };

        let mut query = post::Entity::find()
            .filter(column.eq(value))
            .filter(post::Column::Publish.gte(start))
            .filter(post::Column::Publish.lt(end));
        if let Some(id) = exclude {
            query = query.filter(post::Column::Id.ne(id));
        }

        let count = query
            .count(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;
        Ok(count > 0)
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for PostgresPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let model = post::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        match model {
            Some(found) => Ok(Some(self.hydrate_one(found).await?)),
            None => Ok(None),
        }
    }

    async fn save(&self, entity: Post) -> Result<Post, RepoError> {
        tracing::debug!(post_id = %entity.id, "Upserting post");

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| RepoError::Connection(e.to_string()))?;

        post::Entity::insert(post::ActiveModel::from(entity.clone()))
            .on_conflict(
                OnConflict::column(post::Column::Id)
                    .update_columns([
                        post::Column::AuthorId,
                        post::Column::Title,
                        post::Column::Slug,
                        post::Column::Body,
                        post::Column::Publish,
                        post::Column::Updated,
                        post::Column::Status,
                    ])
                    .to_owned(),
            )
            .exec(&txn)
            .await
            .map_err(|e| constraint_or_query(e, "Post"))?;

        self.sync_tags(&txn, entity.id, &entity.tags).await?;

        txn.commit()
            .await
            .map_err(|e| RepoError::Connection(e.to_string()))?;

        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        // Comments and tag links go with the post via ON DELETE CASCADE.
        let result = post::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn list_published(
        &self,
        tag_slug: Option<&str>,
        page: u64,
        per_page: u64,
    ) -> Result<Page<Post>, RepoError> {
        let mut query = post::Entity::find().filter(post::Column::Status.eq(PostStatus::Published));
        if let Some(slug) = tag_slug {
            query = query
                .join(JoinType::InnerJoin, post::Relation::PostTags.def())
                .join(JoinType::InnerJoin, post_tag::Relation::Tag.def())
                .filter(tag::Column::Slug.eq(slug));
        }

        let total = query
            .clone()
            .count(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;
        let pager = Paginator::new(total, per_page);
        let number = pager.clamp(page);

        let models = query
            .order_by_desc(post::Column::Publish)
            .offset(pager.offset(number))
            .limit(per_page)
            .all(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        let posts = self.hydrate_all(models).await?;
        Ok(pager.page(number, posts))
    }

    async fn find_published_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let model = post::Entity::find_by_id(id)
            .filter(post::Column::Status.eq(PostStatus::Published))
            .one(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        match model {
            Some(found) => Ok(Some(self.hydrate_one(found).await?)),
            None => Ok(None),
        }
    }

    async fn find_published_by_day_and_slug(
        &self,
        day: PublishDay,
        slug: &str,
    ) -> Result<Option<Post>, RepoError> {
        let Some((start, end)) = day.bounds() else {
            return Ok(None);
        };

        let model = post::Entity::find()
            .filter(post::Column::Status.eq(PostStatus::Published))
            .filter(post::Column::Slug.eq(slug))
            .filter(post::Column::Publish.gte(start))
            .filter(post::Column::Publish.lt(end))
            .one(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        match model {
            Some(found) => Ok(Some(self.hydrate_one(found).await?)),
            None => Ok(None),
        }
    }

    async fn find_similar(&self, post: &Post, limit: u64) -> Result<Vec<Post>, RepoError> {
        let tag_ids: Vec<Uuid> = post_tag::Entity::find()
            .filter(post_tag::Column::PostId.eq(post.id))
            .all(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?
            .into_iter()
            .map(|link| link.tag_id)
            .collect();

        if tag_ids.is_empty() {
            return Ok(Vec::new());
        }

        // Rank by shared tag count, break ties by recency. Ordering by the
        // aggregate is valid under GROUP BY id because every other post
        // column is functionally dependent on the primary key.
        let models = post::Entity::find()
            .join(JoinType::InnerJoin, post::Relation::PostTags.def())
            .filter(post_tag::Column::TagId.is_in(tag_ids))
            .filter(post::Column::Id.ne(post.id))
            .filter(post::Column::Status.eq(PostStatus::Published))
            .group_by(post::Column::Id)
            .order_by_desc(post_tag::Column::TagId.count())
            .order_by_desc(post::Column::Publish)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        self.hydrate_all(models).await
    }

    async fn slug_exists_on_day(
        &self,
        slug: &str,
        day: PublishDay,
        exclude: Option<Uuid>,
    ) -> Result<bool, RepoError> {
        self.value_exists_on_day(post::Column::Slug, slug, day, exclude)
            .await
    }

    async fn title_exists_on_day(
        &self,
        title: &str,
        day: PublishDay,
        exclude: Option<Uuid>,
    ) -> Result<bool, RepoError> {
        self.value_exists_on_day(post::Column::Title, title, day, exclude)
            .await
    }
}

/// Comment repository backed by PostgreSQL.
pub struct PostgresCommentRepository {
    db: DatabaseConnection,
}

impl PostgresCommentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BaseRepository<Comment, Uuid> for PostgresCommentRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        comment::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map(|model| model.map(Comment::from))
            .map_err(|e| RepoError::Query(e.to_string()))
    }

    async fn save(&self, entity: Comment) -> Result<Comment, RepoError> {
        tracing::debug!(
            post_id = %entity.post_id,
            email = %mask_email(&entity.email),
            "Saving comment"
        );

        comment::Entity::insert(comment::ActiveModel::from(entity.clone()))
            .on_conflict(
                OnConflict::column(comment::Column::Id)
                    .update_columns([
                        comment::Column::Name,
                        comment::Column::Email,
                        comment::Column::Body,
                        comment::Column::Updated,
                        comment::Column::Active,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(|e| constraint_or_query(e, "Comment"))?;

        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = comment::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn find_active_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let models = comment::Entity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .filter(comment::Column::Active.eq(true))
            .order_by_asc(comment::Column::Created)
            .all(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(models.into_iter().map(Comment::from).collect())
    }
}

/// Tag repository backed by PostgreSQL.
pub struct PostgresTagRepository {
    db: DatabaseConnection,
}

impl PostgresTagRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BaseRepository<Tag, Uuid> for PostgresTagRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tag>, RepoError> {
        tag::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map(|model| model.map(Tag::from))
            .map_err(|e| RepoError::Query(e.to_string()))
    }

    async fn save(&self, entity: Tag) -> Result<Tag, RepoError> {
        tag::Entity::insert(tag::ActiveModel::from(entity.clone()))
            .on_conflict(
                OnConflict::column(tag::Column::Id)
                    .update_columns([tag::Column::Name, tag::Column::Slug])
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(|e| constraint_or_query(e, "Tag"))?;

        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        // Links in post_tags cascade; the posts themselves are untouched.
        let result = tag::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl TagRepository for PostgresTagRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError> {
        tag::Entity::find()
            .filter(tag::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map(|model| model.map(Tag::from))
            .map_err(|e| RepoError::Query(e.to_string()))
    }
}
