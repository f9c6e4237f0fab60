//! droidkit - Gradle fetcher and Android project scaffolder
//!
//! droidkit downloads a Gradle distribution, generates a minimal Android
//! project from a small descriptor and assembles a debug APK with it.
//!
//! ## Architecture
//!
//! - `droidkit-core`: block composer, project descriptor, configuration, source walker
//! - `droidkit-android-toolchain`: Gradle download, extraction and environment
//! - `droidkit-build-engine`: project scaffolding and the Gradle build pipeline

#![warn(clippy::all)]

pub mod commands;
pub mod project;

// Re-export main components for library usage
pub use droidkit_core as core;
pub use droidkit_android_toolchain as toolchain;
pub use droidkit_build_engine as build;

/// Prelude module for convenient imports
pub mod prelude {
    pub use droidkit_core::{BlockComposer, DroidKitConfig, ProjectDescriptor};
    pub use droidkit_android_toolchain::GradleDownloader;
    pub use droidkit_build_engine::{BuildPipeline, GradleBuild, ProjectScaffolder};
    pub use crate::project::ProjectContext;
}
