//! Share-by-email handler.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::ports::OutboundEmail;
use quill_shared::dto::{SharePostRequest, ShareResponse};

use crate::handlers::forms;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /{post_id}/share/ - email a published post's link to a recipient.
///
/// A failed handoff to the mail transport is the caller's problem too: it
/// surfaces as 502 rather than a silent success.
pub async fn share_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<SharePostRequest>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let Some(post) = state.posts.find_published_by_id(post_id).await? else {
        return Err(AppError::NotFound(format!(
            "Post with id {} not found",
            post_id
        )));
    };

    let form = body.into_inner();
    forms::validate_share(&form)?;

    let url = format!("{}{}", state.base_url, post.canonical_path());
    let name = form.name.trim();
    let subject = format!("{} recommends you read {}", name, post.title);
    let note = form.comments.unwrap_or_default();
    let text = format!(
        "Read {} at {}\n\n{}'s comments: {}",
        post.title, url, name, note
    );

    state
        .mailer
        .send(OutboundEmail {
            to: form.to.trim().to_string(),
            reply_to: Some(form.email.trim().to_string()),
            subject,
            body: text,
        })
        .await
        .map_err(|e| {
            tracing::error!(post_id = %post.id, "Share email handoff failed: {}", e);
            AppError::Delivery("Could not hand the message to the mail transport".to_string())
        })?;

    tracing::info!(post_id = %post.id, "Post shared by email");

    Ok(HttpResponse::Ok().json(ShareResponse { sent: true }))
}
