pub mod config;
mod detect;
mod init;
mod presets;

pub use config::Config;
pub use detect::detect;
pub use init::{InitOptions, init};
pub use presets::{presets, show};
