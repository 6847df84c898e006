pub mod analysis;
pub mod config;
pub mod export;
pub mod ingest;
pub mod reindex;
pub mod table;
