//! Comment submission handler.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::domain::Comment;
use quill_shared::dto::SubmitCommentRequest;

use crate::handlers::{forms, posts::comment_dto};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /{post_id}/comment/ - attach a visitor comment to a published post.
///
/// The target is resolved before the payload is validated: commenting on a
/// draft or unknown post is a 404 no matter what the body says.
pub async fn submit_comment(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<SubmitCommentRequest>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let Some(post) = state.posts.find_published_by_id(post_id).await? else {
        return Err(AppError::NotFound(format!(
            "Post with id {} not found",
            post_id
        )));
    };

    let form = body.into_inner();
    forms::validate_comment(&form)?;

    let comment = Comment::new(
        post.id,
        form.name.trim().to_string(),
        form.email.trim().to_string(),
        form.body.trim().to_string(),
    );
    let saved = state.comments.save(comment).await?;

    tracing::info!(post_id = %post.id, comment_id = %saved.id, "Comment accepted");

    Ok(HttpResponse::Created().json(comment_dto(saved)))
}
