//! Catalog ingestion and read views.

pub mod ingest;
pub mod query_handlers;
