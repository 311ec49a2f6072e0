//! Domain layer - Pure business logic.

pub mod format;
pub mod identity;
pub mod upload;
