//! Application layer - Services composed from ports and adapters.

pub mod catalog;
pub mod ingest;
pub mod packager;
