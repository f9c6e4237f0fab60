//! Project Descriptor
//!
//! The flat description of the Android project droidkit scaffolds.

use std::path::PathBuf;
use serde::{Deserialize, Serialize};

/// Subpackage every generated project places its sources in
pub const WORKER_SEGMENT: &str = "worker";

/// Project descriptor (`[project]` in droidkit.toml)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDescriptor {
    /// Application name
    #[serde(default = "default_app_name")]
    pub app_name: String,
    /// Reverse-domain package identifier (e.g., com.example)
    #[serde(default = "default_package")]
    pub package: String,
    /// Compile SDK version
    #[serde(default = "default_compile_sdk")]
    pub compile_sdk: u32,
    /// Target SDK version
    #[serde(default = "default_target_sdk")]
    pub target_sdk: u32,
    /// Minimum SDK version
    #[serde(default = "default_min_sdk")]
    pub min_sdk: u32,
    /// Gradle daemon heap in MiB
    #[serde(default = "default_heap_size")]
    pub heap_size_mb: u32,
    /// Regenerate gradle.properties on every run
    #[serde(default)]
    pub debug: bool,
}

fn default_app_name() -> String { "worker".to_string() }
fn default_package() -> String { "com.example".to_string() }
fn default_compile_sdk() -> u32 { 31 }
fn default_target_sdk() -> u32 { 31 }
fn default_min_sdk() -> u32 { 19 }
fn default_heap_size() -> u32 { 2048 }

impl Default for ProjectDescriptor {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            package: default_package(),
            compile_sdk: default_compile_sdk(),
            target_sdk: default_target_sdk(),
            min_sdk: default_min_sdk(),
            heap_size_mb: default_heap_size(),
            debug: false,
        }
    }
}

impl ProjectDescriptor {
    /// Create a descriptor with default SDK settings
    pub fn new(app_name: impl Into<String>, package: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            package: package.into(),
            ..Default::default()
        }
    }

    /// Package segments, one directory level each
    pub fn package_segments(&self) -> impl Iterator<Item = &str> {
        self.package.split('.').filter(|s| !s.is_empty())
    }

    /// `com.example` -> `com/example`
    pub fn package_path(&self) -> PathBuf {
        self.package_segments().collect()
    }

    /// Package the generated manifest and application id use
    pub fn worker_package(&self) -> String {
        format!("{}.{}", self.package, WORKER_SEGMENT)
    }
}
