//! Ports - Trait definitions the application layer depends on.

pub mod process;
