//! Project context for droidkit
//!
//! Resolves the working directory and configuration once, then hands out
//! the downloader, scaffolder and build pipeline wired to them.

use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use tracing::debug;

use droidkit_android_toolchain::GradleDownloader;
use droidkit_build_engine::{BuildPipeline, GradleBuild, ProjectScaffolder, TokioProcessRunner};
use droidkit_core::DroidKitConfig;

/// Everything a command needs to know about where it runs
#[derive(Debug, Clone)]
pub struct ProjectContext {
    base_dir: PathBuf,
    config: DroidKitConfig,
}

impl ProjectContext {
    /// Create a context from an already loaded configuration
    pub fn new(base_dir: impl Into<PathBuf>, config: DroidKitConfig) -> Self {
        Self {
            base_dir: base_dir.into(),
            config,
        }
    }

    /// Resolve the base directory (default: current directory) and load
    /// droidkit.toml
    pub async fn load(dir: Option<&Path>, config_path: Option<&Path>) -> Result<Self> {
        let base_dir = match dir {
            Some(dir) => dir.to_path_buf(),
            None => std::env::current_dir().context("Failed to read current directory")?,
        };
        debug!("Base directory: {:?}", base_dir);

        let config = DroidKitConfig::load(config_path, &base_dir)
            .await
            .map_err(|e| anyhow::anyhow!(e.user_message()))
            .context("Failed to load droidkit configuration")?;

        Ok(Self::new(base_dir, config))
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn config(&self) -> &DroidKitConfig {
        &self.config
    }

    /// Extracted Gradle distribution
    pub fn gradle_home(&self) -> PathBuf {
        self.config.toolchain.gradle_home(&self.base_dir)
    }

    /// Directory the Android project is generated in
    pub fn build_root(&self) -> PathBuf {
        self.config.toolchain.build_root(&self.base_dir)
    }

    pub fn downloader(&self) -> Result<GradleDownloader> {
        GradleDownloader::new(self.config.toolchain.clone(), self.base_dir.clone())
            .context("Failed to create HTTP client")
    }

    pub fn scaffolder(&self) -> ProjectScaffolder {
        ProjectScaffolder::new(self.build_root(), self.config.project.clone())
    }

    pub fn gradle_build(&self) -> GradleBuild<TokioProcessRunner> {
        GradleBuild::new(self.build_root(), self.gradle_home())
    }

    pub fn pipeline(&self) -> BuildPipeline<TokioProcessRunner> {
        BuildPipeline::new(self.scaffolder(), self.gradle_build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let context = ProjectContext::load(Some(dir.path()), None).await.unwrap();

        assert_eq!(context.build_root(), dir.path().join("android"));
        assert_eq!(context.gradle_home(), dir.path().join("dist").join("gradle-7.3.3"));
        assert_eq!(context.scaffolder().root(), dir.path().join("android"));
    }

    #[tokio::test]
    async fn test_load_local_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("droidkit.toml"),
            "[project]\napp_name = \"test\"\npackage = \"com.test\"\n\n[toolchain]\nbuild_root = \"out\"\n",
        )
        .unwrap();

        let context = ProjectContext::load(Some(dir.path()), None).await.unwrap();
        assert_eq!(context.config().project.package, "com.test");
        assert_eq!(context.build_root(), dir.path().join("out"));
        assert_eq!(
            context.scaffolder().worker_dir(),
            dir.path().join("out/app/src/main/java/com/test/worker")
        );
    }
}
