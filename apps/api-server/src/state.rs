//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ports::{CommentRepository, Mailer, PostRepository, TagRepository};
use quill_infra::database::{
    DatabaseConnections, PostgresCommentRepository, PostgresPostRepository, PostgresTagRepository,
};
use quill_infra::{InMemoryMailer, MemoryStore, SmtpMailer};

use crate::config::AppConfig;

type Backends = (
    Option<Arc<DatabaseConnections>>,
    Arc<dyn PostRepository>,
    Arc<dyn CommentRepository>,
    Arc<dyn TagRepository>,
);

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub tags: Arc<dyn TagRepository>,
    pub mailer: Arc<dyn Mailer>,
    /// Base prepended to canonical post paths, without a trailing slash.
    pub base_url: String,
    pub db: Option<Arc<DatabaseConnections>>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let (db, posts, comments, tags) = match config.database.as_ref() {
            Some(db_config) => match DatabaseConnections::init(db_config).await {
                Ok(connections) => {
                    let conn = Arc::new(connections);
                    (
                        Some(conn.clone()),
                        Arc::new(PostgresPostRepository::new(conn.main.clone()))
                            as Arc<dyn PostRepository>,
                        Arc::new(PostgresCommentRepository::new(conn.main.clone()))
                            as Arc<dyn CommentRepository>,
                        Arc::new(PostgresTagRepository::new(conn.main.clone()))
                            as Arc<dyn TagRepository>,
                    )
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory store.",
                        e
                    );
                    Self::memory_backends()
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running with the in-memory store.");
                Self::memory_backends()
            }
        };

        let mailer: Arc<dyn Mailer> = match config.smtp.as_ref() {
            Some(smtp_config) => match SmtpMailer::new(smtp_config) {
                Ok(mailer) => Arc::new(mailer),
                Err(e) => {
                    tracing::error!(
                        "Failed to configure SMTP mailer: {}. Recording emails in-memory.",
                        e
                    );
                    Arc::new(InMemoryMailer::new())
                }
            },
            None => {
                tracing::warn!("SMTP_HOST not set. Recording emails in the in-memory outbox.");
                Arc::new(InMemoryMailer::new())
            }
        };

        tracing::info!("Application state initialized");

        Self {
            posts,
            comments,
            tags,
            mailer,
            base_url: config.base_url.clone(),
            db,
        }
    }

    /// One shared in-memory store backs all three repository ports, so
    /// cascades and tag lookups see the same data.
    fn memory_backends() -> Backends {
        let store = Arc::new(MemoryStore::new());
        (None, store.clone(), store.clone(), store)
    }

    /// State over a caller-supplied store and outbox, for handler tests.
    #[cfg(test)]
    pub fn for_tests(store: Arc<MemoryStore>, mailer: Arc<InMemoryMailer>) -> Self {
        Self {
            posts: store.clone(),
            comments: store.clone(),
            tags: store,
            mailer,
            base_url: "http://testserver".to_string(),
            db: None,
        }
    }
}
