//! Android Toolchain Management
//!
//! Handles the Gradle side of an Android build:
//! - downloading and extracting the Gradle distribution
//! - the environment Gradle runs in

pub mod downloader;
pub mod env;

pub use downloader::{
    format_progress, gradle_properties, DownloadError, GradleDownloader, ProgressCallback,
};
pub use env::{EnvManager, EnvironmentConfig};

/// Gradle release the generated projects are written for
pub const GRADLE_VERSION: &str = droidkit_core::config::DEFAULT_GRADLE_VERSION;

/// Android Gradle plugin compatible with [`GRADLE_VERSION`]
pub const ANDROID_GRADLE_PLUGIN: &str = "7.0.4";

/// Kotlin Gradle plugin compatible with [`GRADLE_VERSION`]
pub const KOTLIN_VERSION: &str = "1.6.10";
