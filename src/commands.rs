//! CLI commands for droidkit
//!
//! Each command works against a resolved [`ProjectContext`].

use std::path::PathBuf;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{info, trace};

use droidkit_android_toolchain::format_progress;
use droidkit_build_engine::BuildOutput;
use droidkit_core::collect_files_with_suffix;

use crate::project::ProjectContext;

/// Suffix `--vue` collects
pub const VUE_SUFFIX: &str = ".vue";

/// Fetch and extract the Gradle distribution
pub struct FetchGradleCommand {
    pub show_progress: bool,
}

impl FetchGradleCommand {
    fn progress_bar(&self) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(0);
        if let Ok(style) = ProgressStyle::with_template(
            "{msg} [{bar:40}] {bytes}/{total_bytes} ({eta})",
        ) {
            bar.set_style(style.progress_chars("=> "));
        }
        bar
    }

    /// Execute the fetch command, returning the Gradle home
    pub async fn execute(&self, context: &ProjectContext) -> Result<PathBuf> {
        let downloader = context.downloader()?;
        let archive = downloader.archive_path();

        let bar = self.progress_bar();
        bar.set_message(format!("gradle {}", context.config().toolchain.gradle_version));
        let bar_cb = bar.clone();
        let home = downloader
            .install(Some(Box::new(move |received, total| {
                if total > 0 {
                    bar_cb.set_length(total);
                }
                bar_cb.set_position(received);
                trace!("{}", format_progress(&archive, received, total));
            })))
            .await
            .context("Failed to install Gradle")?;
        bar.finish_and_clear();

        info!("Completed! Gradle available at {:?}", home);
        Ok(home)
    }
}

/// Result of a source walk
#[derive(Debug, Clone, Serialize)]
pub struct SourceReport {
    pub root: PathBuf,
    pub suffix: String,
    pub files: Vec<PathBuf>,
}

impl SourceReport {
    /// Plain text rendering: one path per line, then a count
    pub fn render(&self) -> String {
        let mut out = String::new();
        for file in &self.files {
            out.push_str(&file.display().to_string());
            out.push('\n');
        }
        out.push_str(&format!(
            "{} *{} file(s) under {}\n",
            self.files.len(),
            self.suffix,
            self.root.display()
        ));
        out
    }
}

/// Walk the base directory collecting files by suffix
pub struct CollectSourcesCommand {
    pub suffix: String,
    pub json: bool,
}

impl CollectSourcesCommand {
    /// Collect `.vue` files
    pub fn vue(json: bool) -> Self {
        Self {
            suffix: VUE_SUFFIX.to_string(),
            json,
        }
    }

    /// Build the report without printing it
    pub fn collect(&self, context: &ProjectContext) -> Result<SourceReport> {
        let root = context.base_dir().to_path_buf();
        let files = collect_files_with_suffix(&root, &self.suffix)
            .with_context(|| format!("Failed to walk {:?}", root))?;
        Ok(SourceReport {
            root,
            suffix: self.suffix.clone(),
            files,
        })
    }

    /// Execute the collect command and print the report
    pub fn execute(&self, context: &ProjectContext) -> Result<SourceReport> {
        let report = self.collect(context)?;
        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print!("{}", report.render());
        }
        Ok(report)
    }
}

/// Scaffold the Android project and assemble a debug APK
pub struct BuildApkCommand;

impl BuildApkCommand {
    /// Execute the build command
    pub async fn execute(&self, context: &ProjectContext) -> Result<BuildOutput> {
        info!("Building project in {:?}", context.build_root());

        let mut pipeline = context.pipeline();
        let output = match pipeline.run().await {
            Ok(output) => output,
            Err(err) => {
                if let Some(stderr) = err.source.stderr().filter(|s| !s.trim().is_empty()) {
                    eprintln!("{}", stderr.trim_end());
                }
                return Err(err).context("APK build failed");
            }
        };

        match &output.apk {
            Some(apk) => info!("Build successful: {:?}", apk),
            None => info!("Build successful"),
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use droidkit_core::DroidKitConfig;

    #[test]
    fn test_collect_vue_sources() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("src/views")).unwrap();
        std::fs::write(dir.path().join("src/views/Home.vue"), "<template/>").unwrap();
        std::fs::write(dir.path().join("src/main.js"), "").unwrap();

        let context = ProjectContext::new(dir.path(), DroidKitConfig::default());
        let report = CollectSourcesCommand::vue(false).collect(&context).unwrap();

        assert_eq!(report.files.len(), 1);
        let summary = format!("1 *.vue file(s) under {}\n", dir.path().display());
        assert!(report.render().ends_with(&summary));
    }

    #[test]
    fn test_report_json() {
        let report = SourceReport {
            root: PathBuf::from("/src"),
            suffix: VUE_SUFFIX.to_string(),
            files: vec![PathBuf::from("/src/App.vue")],
        };
        let json: serde_json::Value = serde_json::to_value(&report).unwrap();
        assert_eq!(json["files"][0], "/src/App.vue");
        assert_eq!(json["suffix"], ".vue");
    }

    #[tokio::test]
    async fn test_build_without_gradle_fails() {
        let dir = tempfile::tempdir().unwrap();
        let context = ProjectContext::new(dir.path(), DroidKitConfig::default());

        let err = BuildApkCommand.execute(&context).await.unwrap_err();
        assert!(err.to_string().contains("APK build failed"));
        // scaffolding ran before the missing launcher was hit
        assert!(dir.path().join("android/app/build.gradle").exists());
    }
}
