//! CLI command handlers

pub mod ask;
pub mod chat;
pub mod collection;
pub mod ingest;
pub mod search;
pub mod status;
