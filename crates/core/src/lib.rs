//! droidkit core - shared types
//!
//! This crate provides the pieces every other droidkit crate builds on:
//! the nested block composer used to emit Gradle build scripts, the project
//! descriptor, configuration loading and the source tree walker.

pub mod composer;
pub mod config;
pub mod error;
pub mod project;
pub mod sources;

pub use composer::{BlockComposer, ComposeError, LineStyle};
pub use config::{DroidKitConfig, ToolchainSettings};
pub use error::{CoreError, Result};
pub use project::ProjectDescriptor;
pub use sources::collect_files_with_suffix;

/// droidkit version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "droidkit";
