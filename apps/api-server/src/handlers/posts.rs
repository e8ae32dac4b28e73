//! Public listing and detail handlers for published posts.

use actix_web::{HttpResponse, web};
use serde::Deserialize;

use quill_core::domain::{Comment, POSTS_PER_PAGE, Page, PageToken, Post, PublishDay, Tag};
use quill_shared::dto::{
    CommentResponse, PageMeta, PostDetail, PostDetailResponse, PostListResponse, PostSummary,
    TagInfo,
};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Number of similar posts suggested on the detail view.
const SIMILAR_POSTS: u64 = 4;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Raw page token. Anything that is not a positive integer selects
    /// page 1; numbers past the end select the last page.
    pub page: Option<String>,
}

/// GET / - published posts, newest first, three per page.
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    let token = PageToken::parse(query.page.as_deref());
    let page = state
        .posts
        .list_published(None, token.number(), POSTS_PER_PAGE)
        .await?;

    Ok(HttpResponse::Ok().json(list_response(&state, page, None)))
}

/// GET /tag/{tag_slug}/ - the same listing, filtered to one tag.
pub async fn list_posts_by_tag(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    let tag_slug = path.into_inner();
    let Some(tag) = state.tags.find_by_slug(&tag_slug).await? else {
        return Err(AppError::NotFound(format!(
            "Tag with slug {} not found",
            tag_slug
        )));
    };

    let token = PageToken::parse(query.page.as_deref());
    let page = state
        .posts
        .list_published(Some(&tag.slug), token.number(), POSTS_PER_PAGE)
        .await?;

    Ok(HttpResponse::Ok().json(list_response(&state, page, Some(tag))))
}

/// GET /{year}/{month}/{day}/{slug} - one published post with its active
/// comments and similar-post suggestions.
pub async fn post_detail(
    state: web::Data<AppState>,
    path: web::Path<(i32, u32, u32, String)>,
) -> AppResult<HttpResponse> {
    let (year, month, day, slug) = path.into_inner();
    let Some(day) = PublishDay::new(year, month, day) else {
        return Err(AppError::NotFound("No post at this address".to_string()));
    };

    let Some(post) = state.posts.find_published_by_day_and_slug(day, &slug).await? else {
        return Err(AppError::NotFound(format!(
            "Post with slug {} not found",
            slug
        )));
    };

    let comments = state.comments.find_active_for_post(post.id).await?;
    let similar = state.posts.find_similar(&post, SIMILAR_POSTS).await?;

    let response = PostDetailResponse {
        post: detail_dto(&state, &post),
        comments: comments.into_iter().map(comment_dto).collect(),
        similar_posts: similar
            .iter()
            .map(|similar_post| summary_dto(&state, similar_post))
            .collect(),
    };

    Ok(HttpResponse::Ok().json(response))
}

fn list_response(state: &AppState, page: Page<Post>, tag: Option<Tag>) -> PostListResponse {
    let meta = PageMeta {
        number: page.number,
        per_page: page.per_page,
        total_items: page.total_items,
        total_pages: page.total_pages,
        has_next: page.has_next(),
        has_previous: page.has_previous(),
    };

    PostListResponse {
        posts: page
            .items
            .iter()
            .map(|post| summary_dto(state, post))
            .collect(),
        page: meta,
        tag: tag.map(|tag| TagInfo {
            name: tag.name,
            slug: tag.slug,
        }),
    }
}

pub(super) fn summary_dto(state: &AppState, post: &Post) -> PostSummary {
    PostSummary {
        id: post.id,
        title: post.title.clone(),
        slug: post.slug.clone(),
        url: format!("{}{}", state.base_url, post.canonical_path()),
        publish: post.publish,
        tags: post.tags.clone(),
    }
}

pub(super) fn detail_dto(state: &AppState, post: &Post) -> PostDetail {
    PostDetail {
        id: post.id,
        author_id: post.author_id,
        title: post.title.clone(),
        slug: post.slug.clone(),
        url: format!("{}{}", state.base_url, post.canonical_path()),
        body: post.body.clone(),
        status: post.status.as_str().to_string(),
        publish: post.publish,
        created: post.created,
        updated: post.updated,
        tags: post.tags.clone(),
    }
}

pub(super) fn comment_dto(comment: Comment) -> CommentResponse {
    CommentResponse {
        id: comment.id,
        post_id: comment.post_id,
        name: comment.name,
        body: comment.body,
        active: comment.active,
        created: comment.created,
    }
}
