#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, http::StatusCode, test, web};
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    use quill_core::domain::{Comment, Post, PostStatus};
    use quill_core::ports::BaseRepository;
    use quill_infra::{InMemoryMailer, MemoryStore};
    use quill_shared::dto::{PostDetailResponse, PostListResponse};

    use crate::handlers::configure_routes;
    use crate::state::AppState;

    fn published_post(title: &str, slug: &str, day: u32, tags: &[&str]) -> Post {
        let mut post = Post::new(
            Uuid::new_v4(),
            title.to_string(),
            slug.to_string(),
            format!("Body of {title}"),
        );
        post.status = PostStatus::Published;
        post.publish = Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap();
        post.tags = tags.iter().map(|label| (*label).to_string()).collect();
        post
    }

    async fn seed_posts(store: &MemoryStore, posts: Vec<Post>) {
        for post in posts {
            BaseRepository::<Post, Uuid>::save(store, post)
                .await
                .unwrap();
        }
    }

    async fn seed_comment(store: &MemoryStore, post_id: Uuid, name: &str, active: bool) -> Uuid {
        let mut comment = Comment::new(
            post_id,
            name.to_string(),
            format!("{}@example.com", name.to_lowercase()),
            format!("{name} says hi"),
        );
        comment.active = active;
        let id = comment.id;
        BaseRepository::<Comment, Uuid>::save(store, comment)
            .await
            .unwrap();
        id
    }

    #[actix_web::test]
    async fn test_listing_paginates_and_hides_drafts() {
        let store = Arc::new(MemoryStore::new());
        let mailer = Arc::new(InMemoryMailer::new());
        let mut posts: Vec<Post> = (1..=7)
            .map(|day| published_post(&format!("Post {day}"), &format!("post-{day}"), day, &[]))
            .collect();
        let mut draft = published_post("Secret", "secret", 8, &[]);
        draft.status = PostStatus::Draft;
        posts.push(draft);
        seed_posts(&store, posts).await;

        let state = AppState::for_tests(store, mailer);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure_routes),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: PostListResponse = test::read_body_json(resp).await;
        assert_eq!(body.page.number, 1);
        assert_eq!(body.page.total_items, 7);
        assert_eq!(body.page.total_pages, 3);
        assert!(body.page.has_next);
        assert!(!body.page.has_previous);
        assert!(body.tag.is_none());
        let slugs: Vec<&str> = body.posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["post-7", "post-6", "post-5"]);
        assert_eq!(body.posts[0].url, "http://testserver/2024/3/7/post-7");

        // A non-numeric token falls back to the first page.
        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/?page=abc").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: PostListResponse = test::read_body_json(resp).await;
        assert_eq!(body.page.number, 1);

        // A token past the end clamps to the last page.
        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/?page=99").to_request(),
        )
        .await;
        let body: PostListResponse = test::read_body_json(resp).await;
        assert_eq!(body.page.number, 3);
        let slugs: Vec<&str> = body.posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["post-1"]);

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/?page=2").to_request(),
        )
        .await;
        let body: PostListResponse = test::read_body_json(resp).await;
        let slugs: Vec<&str> = body.posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["post-4", "post-3", "post-2"]);
    }

    #[actix_web::test]
    async fn test_tag_listing_filters_and_unknown_tag_is_404() {
        let store = Arc::new(MemoryStore::new());
        let mailer = Arc::new(InMemoryMailer::new());
        seed_posts(
            &store,
            vec![
                published_post("Rusty", "rusty", 1, &["Rust Lang"]),
                published_post("Snaky", "snaky", 2, &["Python"]),
            ],
        )
        .await;

        let state = AppState::for_tests(store, mailer);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure_routes),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/tag/rust-lang/").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: PostListResponse = test::read_body_json(resp).await;
        assert_eq!(body.page.total_items, 1);
        assert_eq!(body.posts[0].slug, "rusty");
        let tag = body.tag.unwrap();
        assert_eq!(tag.name, "Rust Lang");
        assert_eq!(tag.slug, "rust-lang");

        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/tag/go/").to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_detail_shows_active_comments_and_ranked_similar() {
        let store = Arc::new(MemoryStore::new());
        let mailer = Arc::new(InMemoryMailer::new());

        let reference = published_post("Reference", "reference", 10, &["a", "b"]);
        let reference_id = reference.id;
        let mut hidden_draft = published_post("Hidden", "hidden", 5, &["a", "b"]);
        hidden_draft.status = PostStatus::Draft;
        seed_posts(
            &store,
            vec![
                reference,
                published_post("Two", "two", 2, &["a", "b", "c"]),
                published_post("Newer", "newer", 8, &["a"]),
                published_post("Older", "older", 1, &["b"]),
                published_post("Unrelated", "unrelated", 9, &["z"]),
                hidden_draft,
            ],
        )
        .await;

        seed_comment(&store, reference_id, "Ana", true).await;
        seed_comment(&store, reference_id, "Cal", false).await;
        seed_comment(&store, reference_id, "Ben", true).await;

        let state = AppState::for_tests(store, mailer);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure_routes),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/2024/3/10/reference")
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: PostDetailResponse = test::read_body_json(resp).await;
        assert_eq!(body.post.title, "Reference");
        assert_eq!(body.post.url, "http://testserver/2024/3/10/reference");

        // The inactive comment is hidden; the rest are oldest first.
        let names: Vec<&str> = body.comments.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Ana", "Ben"]);

        // Ranked by shared tags, then recency; the draft never appears.
        let similar: Vec<&str> = body
            .similar_posts
            .iter()
            .map(|p| p.slug.as_str())
            .collect();
        assert_eq!(similar, vec!["two", "newer", "older"]);

        // Draft posts are invisible at their canonical path.
        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/2024/3/5/hidden").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        // Impossible dates and non-numeric segments are plain 404s.
        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/2024/2/30/reference")
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/xxxx/3/10/reference")
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_comment_submission_flow() {
        let store = Arc::new(MemoryStore::new());
        let mailer = Arc::new(InMemoryMailer::new());

        let post = published_post("Open Thread", "open-thread", 4, &[]);
        let post_id = post.id;
        let mut draft = published_post("Draft Thread", "draft-thread", 4, &[]);
        draft.status = PostStatus::Draft;
        let draft_id = draft.id;
        seed_posts(&store, vec![post, draft]).await;

        let state = AppState::for_tests(store, mailer);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure_routes),
        )
        .await;

        let valid = serde_json::json!({
            "name": "Ana",
            "email": "ana@example.com",
            "body": "First!"
        });

        // A draft target is a 404 even with a valid payload.
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("/{draft_id}/comment/"))
                .set_json(&valid)
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        // Invalid fields are rejected without persisting anything.
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("/{post_id}/comment/"))
                .set_json(serde_json::json!({
                    "name": "Ana",
                    "email": "not-an-email",
                    "body": ""
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: serde_json::Value = test::read_body_json(resp).await;
        let fields: Vec<&str> = body["errors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["field"].as_str().unwrap())
            .collect();
        assert_eq!(fields, vec!["email", "body"]);

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/2024/3/4/open-thread")
                .to_request(),
        )
        .await;
        let detail: PostDetailResponse = test::read_body_json(resp).await;
        assert!(detail.comments.is_empty());

        // A valid submission comes back as 201, without the email.
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("/{post_id}/comment/"))
                .set_json(&valid)
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["name"], "Ana");
        assert_eq!(body["active"], true);
        assert!(body.get("email").is_none());

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/2024/3/4/open-thread")
                .to_request(),
        )
        .await;
        let detail: PostDetailResponse = test::read_body_json(resp).await;
        assert_eq!(detail.comments.len(), 1);

        // The comment route accepts POST only.
        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/{post_id}/comment/"))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[actix_web::test]
    async fn test_share_hands_email_to_outbox() {
        let store = Arc::new(MemoryStore::new());
        let mailer = Arc::new(InMemoryMailer::new());

        let post = published_post("Hello World", "hello-world", 5, &[]);
        let post_id = post.id;
        seed_posts(&store, vec![post]).await;

        let state = AppState::for_tests(store, mailer.clone());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure_routes),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("/{post_id}/share/"))
                .set_json(serde_json::json!({
                    "name": "Ana",
                    "email": "ana@example.com",
                    "to": "ben@example.com",
                    "comments": "check it"
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["sent"], true);

        let sent = mailer.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "ben@example.com");
        assert_eq!(sent[0].reply_to.as_deref(), Some("ana@example.com"));
        assert_eq!(sent[0].subject, "Ana recommends you read Hello World");
        assert_eq!(
            sent[0].body,
            "Read Hello World at http://testserver/2024/3/5/hello-world\n\n\
             Ana's comments: check it"
        );

        // Validation failures do not reach the outbox.
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("/{post_id}/share/"))
                .set_json(serde_json::json!({
                    "name": "Ana",
                    "email": "ana@example.com",
                    "to": ""
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(mailer.sent().await.len(), 1);

        // Unknown targets are 404s.
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("/{}/share/", Uuid::new_v4()))
                .set_json(serde_json::json!({
                    "name": "Ana",
                    "email": "ana@example.com",
                    "to": "ben@example.com"
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_create_post_defaults_and_day_scoped_conflicts() {
        let store = Arc::new(MemoryStore::new());
        let mailer = Arc::new(InMemoryMailer::new());
        let state = AppState::for_tests(store, mailer);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure_routes),
        )
        .await;

        let author_id = Uuid::new_v4();

        // Title-only create: derived slug, draft status.
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/posts")
                .set_json(serde_json::json!({
                    "author_id": author_id,
                    "title": "My First Post",
                    "body": "Hello."
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["slug"], "my-first-post");
        assert_eq!(body["status"], "draft");
        assert_eq!(body["tags"], serde_json::json!([]));

        // Same title on the same (default) publish day conflicts.
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/posts")
                .set_json(serde_json::json!({
                    "author_id": author_id,
                    "title": "My First Post",
                    "body": "Again."
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        // The same slug is fine on a different day.
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/posts")
                .set_json(serde_json::json!({
                    "author_id": author_id,
                    "title": "My First Post",
                    "body": "Elsewhere.",
                    "publish": "2020-01-01T09:00:00Z"
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        // Unknown status values are rejected.
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/posts")
                .set_json(serde_json::json!({
                    "author_id": author_id,
                    "title": "Another",
                    "body": "x",
                    "status": "archived"
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        // A published create with tags is immediately visible in listings.
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/posts")
                .set_json(serde_json::json!({
                    "author_id": author_id,
                    "title": "Going Live",
                    "body": "x",
                    "status": "published",
                    "publish": "2024-03-05T10:00:00Z",
                    "tags": ["Rust", " rust ", ""]
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["tags"], serde_json::json!(["Rust"]));
        assert_eq!(body["url"], "http://testserver/2024/3/5/going-live");

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/tag/rust/").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let listing: PostListResponse = test::read_body_json(resp).await;
        assert_eq!(listing.posts.len(), 1);
        assert_eq!(listing.posts[0].slug, "going-live");
    }

    #[actix_web::test]
    async fn test_create_post_caps_title_and_slug_at_250() {
        let store = Arc::new(MemoryStore::new());
        let mailer = Arc::new(InMemoryMailer::new());
        let state = AppState::for_tests(store, mailer);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure_routes),
        )
        .await;

        let author_id = Uuid::new_v4();

        // An over-long title never reaches the store.
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/posts")
                .set_json(serde_json::json!({
                    "author_id": author_id,
                    "title": "x".repeat(251),
                    "body": "Hello."
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["errors"][0]["field"], "title");

        // Same for an explicit over-long slug.
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/posts")
                .set_json(serde_json::json!({
                    "author_id": author_id,
                    "title": "Fine Title",
                    "slug": "y".repeat(251),
                    "body": "Hello."
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["errors"][0]["field"], "slug");

        // Exactly 250 characters is still accepted.
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/posts")
                .set_json(serde_json::json!({
                    "author_id": author_id,
                    "title": "x".repeat(250),
                    "body": "Hello."
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        // Updates are held to the same limit.
        let body: serde_json::Value = test::read_body_json(resp).await;
        let post_id = body["id"].as_str().unwrap().to_string();
        let resp = test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&format!("/api/posts/{post_id}"))
                .set_json(serde_json::json!({ "title": "z".repeat(251) }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[actix_web::test]
    async fn test_update_moderate_and_delete_flow() {
        let store = Arc::new(MemoryStore::new());
        let mailer = Arc::new(InMemoryMailer::new());

        let post = published_post("Keeper", "keeper", 6, &[]);
        let post_id = post.id;
        let other = published_post("Other", "other", 6, &[]);
        seed_posts(&store, vec![post, other]).await;
        let comment_id = seed_comment(&store, post_id, "Ana", true).await;

        let state = AppState::for_tests(store, mailer);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure_routes),
        )
        .await;

        // Hide the comment, then show it again.
        let resp = test::call_service(
            &app,
            test::TestRequest::patch()
                .uri(&format!("/api/comments/{comment_id}"))
                .set_json(serde_json::json!({ "active": false }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/2024/3/6/keeper").to_request(),
        )
        .await;
        let detail: PostDetailResponse = test::read_body_json(resp).await;
        assert!(detail.comments.is_empty());

        let resp = test::call_service(
            &app,
            test::TestRequest::patch()
                .uri(&format!("/api/comments/{comment_id}"))
                .set_json(serde_json::json!({ "active": true }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);

        // Renaming the slug moves the canonical path.
        let resp = test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&format!("/api/posts/{post_id}"))
                .set_json(serde_json::json!({ "slug": "Renamed Slug!" }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["slug"], "renamed-slug");

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/2024/3/6/renamed-slug")
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);

        // Stealing another post's slug on the same day conflicts.
        let resp = test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&format!("/api/posts/{post_id}"))
                .set_json(serde_json::json!({ "slug": "other" }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        // Unpublishing removes the post from public view.
        let resp = test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&format!("/api/posts/{post_id}"))
                .set_json(serde_json::json!({ "status": "draft" }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/2024/3/6/renamed-slug")
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        // Deleting the post takes its comments with it.
        let resp = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri(&format!("/api/posts/{post_id}"))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let resp = test::call_service(
            &app,
            test::TestRequest::patch()
                .uri(&format!("/api/comments/{comment_id}"))
                .set_json(serde_json::json!({ "active": false }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri(&format!("/api/posts/{post_id}"))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_health_reports_backend() {
        let store = Arc::new(MemoryStore::new());
        let mailer = Arc::new(InMemoryMailer::new());
        let state = AppState::for_tests(store, mailer);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure_routes),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/health").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["storage"], "memory");
    }
}
