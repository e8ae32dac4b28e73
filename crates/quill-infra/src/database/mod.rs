//! Database connection management and SeaORM repositories.

mod connections;
pub mod entity;
pub mod postgres_repo;

pub use connections::{DatabaseConfig, DatabaseConnections};
pub use postgres_repo::{
    PostgresCommentRepository, PostgresPostRepository, PostgresTagRepository,
};
