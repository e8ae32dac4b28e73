//! Authoring endpoints: post CRUD and comment moderation.
//!
//! These sit under `/api` and are meant for a trusted author frontend;
//! authentication is handled upstream of this service.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::domain::{Post, PostStatus, normalize_labels, slugify};
use quill_shared::FieldError;
use quill_shared::dto::{CreatePostRequest, ModerateCommentRequest, UpdatePostRequest};

use crate::handlers::posts::{comment_dto, detail_dto};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Storage limit shared by post titles and slugs.
const TITLE_MAX: usize = 250;

/// POST /api/posts - create a post.
///
/// An omitted slug is derived from the title, an omitted status means
/// draft, and an omitted publish timestamp means now.
pub async fn create_post(
    state: web::Data<AppState>,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let title = req.title.trim().to_string();
    if title.is_empty() {
        return Err(field_error("title", "This field is required"));
    }
    check_length("title", &title)?;

    let slug = match req.slug.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(explicit) => slugify(explicit),
        None => slugify(&title),
    };
    if slug.is_empty() {
        return Err(field_error(
            "slug",
            "Could not derive a slug; provide one explicitly",
        ));
    }
    check_length("slug", &slug)?;

    let status = parse_status(req.status.as_deref())?;

    let mut post = Post::new(req.author_id, title, slug, req.body);
    if let Some(publish) = req.publish {
        post.publish = publish;
    }
    post.status = status;
    post.tags = normalize_labels(&req.tags);

    ensure_unique_for_day(&state, &post, None).await?;

    let saved = state.posts.save(post).await?;
    tracing::info!(post_id = %saved.id, status = %saved.status, "Post created");

    Ok(HttpResponse::Created().json(detail_dto(&state, &saved)))
}

/// PUT /api/posts/{post_id} - partial update; only supplied fields change.
pub async fn update_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let Some(mut post) = state.posts.find_by_id(post_id).await? else {
        return Err(AppError::NotFound(format!(
            "Post with id {} not found",
            post_id
        )));
    };

    let req = body.into_inner();

    if let Some(title) = req.title {
        let title = title.trim().to_string();
        if title.is_empty() {
            return Err(field_error("title", "This field is required"));
        }
        check_length("title", &title)?;
        post.title = title;
    }
    if let Some(raw) = req.slug {
        let slug = slugify(raw.trim());
        if slug.is_empty() {
            return Err(field_error(
                "slug",
                "Could not derive a slug; provide one explicitly",
            ));
        }
        check_length("slug", &slug)?;
        post.slug = slug;
    }
    if let Some(body_text) = req.body {
        post.body = body_text;
    }
    if let Some(publish) = req.publish {
        post.publish = publish;
    }
    if let Some(raw) = req.status.as_deref() {
        post.status = parse_status(Some(raw))?;
    }
    if let Some(labels) = req.tags {
        post.tags = normalize_labels(&labels);
    }

    ensure_unique_for_day(&state, &post, Some(post.id)).await?;

    post.touch();
    let saved = state.posts.save(post).await?;

    Ok(HttpResponse::Ok().json(detail_dto(&state, &saved)))
}

/// DELETE /api/posts/{post_id} - remove a post and, with it, its comments.
pub async fn delete_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    state.posts.delete(post_id).await?;

    tracing::info!(post_id = %post_id, "Post deleted");

    Ok(HttpResponse::NoContent().finish())
}

/// PATCH /api/comments/{comment_id} - flip a comment's moderation flag.
pub async fn moderate_comment(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<ModerateCommentRequest>,
) -> AppResult<HttpResponse> {
    let comment_id = path.into_inner();
    let Some(mut comment) = state.comments.find_by_id(comment_id).await? else {
        return Err(AppError::NotFound(format!(
            "Comment with id {} not found",
            comment_id
        )));
    };

    comment.active = body.active;
    comment.touch();
    let saved = state.comments.save(comment).await?;

    Ok(HttpResponse::Ok().json(comment_dto(saved)))
}

fn field_error(field: &str, message: &str) -> AppError {
    AppError::Validation(vec![FieldError::new(field, message)])
}

fn check_length(field: &str, value: &str) -> Result<(), AppError> {
    if value.chars().count() > TITLE_MAX {
        return Err(field_error(
            field,
            &format!("Ensure this value has at most {TITLE_MAX} characters"),
        ));
    }
    Ok(())
}

fn parse_status(raw: Option<&str>) -> Result<PostStatus, AppError> {
    match raw {
        None => Ok(PostStatus::Draft),
        Some(value) => PostStatus::parse(value)
            .ok_or_else(|| field_error("status", "Expected one of: draft, published")),
    }
}

/// Slug and title are unique per publish day; the probe runs at write time
/// against the current store contents, excluding the post itself on update.
async fn ensure_unique_for_day(
    state: &AppState,
    post: &Post,
    exclude: Option<Uuid>,
) -> Result<(), AppError> {
    let day = post.publish_day();

    if state
        .posts
        .slug_exists_on_day(&post.slug, day, exclude)
        .await?
    {
        return Err(AppError::Conflict(
            "Slug must be unique for the publish date".to_string(),
        ));
    }
    if state
        .posts
        .title_exists_on_day(&post.title, day, exclude)
        .await?
    {
        return Err(AppError::Conflict(
            "Title must be unique for the publish date".to_string(),
        ));
    }

    Ok(())
}
