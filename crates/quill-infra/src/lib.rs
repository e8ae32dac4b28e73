//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`:
//! PostgreSQL repositories on top of SeaORM, an in-memory store for
//! development and tests, and the outbound mail transports.

pub mod database;
pub mod mailer;
pub mod memory;

pub use database::{DatabaseConfig, DatabaseConnections};
pub use mailer::{InMemoryMailer, SmtpConfig, SmtpMailer};
pub use memory::MemoryStore;
