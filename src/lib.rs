pub mod commands;
pub mod manifest;
pub mod package_manager;
pub mod preset;
pub mod runtime;
pub mod setup;
