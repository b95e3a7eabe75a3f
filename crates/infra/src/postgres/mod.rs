pub mod blocking;
pub mod postgres_connection;
pub mod queries;
pub mod repositories;
