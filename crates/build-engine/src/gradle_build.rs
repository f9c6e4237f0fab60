//! Gradle Build
//!
//! Runs the extracted Gradle distribution against a scaffolded project.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, warn};

use droidkit_android_toolchain::{EnvManager, EnvironmentConfig};

use crate::config::GradleConfig;
use crate::BuildError;

/// A fully resolved external command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub current_dir: PathBuf,
    pub env: HashMap<String, String>,
}

impl CommandSpec {
    /// `program arg1 arg2 ...`, for logs and errors
    pub fn display(&self) -> String {
        let mut line = self.program.display().to_string();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// Captured result of an external process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit status was success
    pub success: bool,
    /// Exit code, if the process exited normally
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Runs external commands to completion
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn run(&self, spec: &CommandSpec) -> Result<ProcessOutput, BuildError>;
}

/// [`ProcessRunner`] backed by `tokio::process`
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioProcessRunner;

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<ProcessOutput, BuildError> {
        let output = Command::new(&spec.program)
            .args(&spec.args)
            .current_dir(&spec.current_dir)
            .envs(&spec.env)
            .output()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => {
                    BuildError::ToolchainNotFound(format!("{:?}", spec.program))
                }
                _ => BuildError::Io(e),
            })?;

        Ok(ProcessOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// Gradle build for Android
pub struct GradleBuild<R = TokioProcessRunner> {
    project_dir: PathBuf,
    gradle_home: PathBuf,
    gradle_config: GradleConfig,
    env: EnvironmentConfig,
    runner: R,
}

impl GradleBuild<TokioProcessRunner> {
    /// Create a new Gradle builder for `project_dir` using the distribution
    /// extracted at `gradle_home`
    pub fn new(project_dir: impl Into<PathBuf>, gradle_home: impl Into<PathBuf>) -> Self {
        let gradle_home = gradle_home.into();
        Self {
            project_dir: project_dir.into(),
            env: EnvironmentConfig::for_gradle_home(&gradle_home).with_inherited_homes(),
            gradle_home,
            gradle_config: GradleConfig::default(),
            runner: TokioProcessRunner,
        }
    }
}

impl<R: ProcessRunner> GradleBuild<R> {
    /// Swap the process runner
    pub fn with_runner<T: ProcessRunner>(self, runner: T) -> GradleBuild<T> {
        GradleBuild {
            project_dir: self.project_dir,
            gradle_home: self.gradle_home,
            gradle_config: self.gradle_config,
            env: self.env,
            runner,
        }
    }

    /// Set Gradle-specific config
    pub fn with_gradle_config(mut self, config: GradleConfig) -> Self {
        self.gradle_config = config;
        self
    }

    /// Set the child environment
    pub fn with_environment(mut self, env: EnvironmentConfig) -> Self {
        self.env = env;
        self
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    pub fn gradle_config(&self) -> &GradleConfig {
        &self.gradle_config
    }

    /// Path to the Gradle launcher inside the distribution
    pub fn gradle_path(&self) -> PathBuf {
        let launcher = if cfg!(windows) { "gradle.bat" } else { "gradle" };
        self.gradle_home.join("bin").join(launcher)
    }

    /// The command `assemble` runs
    pub fn command(&self) -> CommandSpec {
        CommandSpec {
            program: self.gradle_path(),
            args: self.gradle_config.args(),
            current_dir: self.project_dir.clone(),
            env: EnvManager::new(self.env.clone()).command_env(),
        }
    }

    /// Assemble the configured variant.
    ///
    /// A non-zero exit fails the build; so does any stderr output when
    /// `fail_on_stderr` is set.
    pub async fn assemble(&self) -> Result<ProcessOutput, BuildError> {
        let spec = self.command();
        info!("Running {}", spec.display());

        let output = self.runner.run(&spec).await?;
        debug!("Gradle stdout:\n{}", output.stdout);

        let stderr_failure = self.gradle_config.fail_on_stderr && !output.stderr.trim().is_empty();
        if !output.success || stderr_failure {
            if output.success {
                warn!("Gradle exited successfully but wrote to stderr");
            }
            return Err(BuildError::ProcessFailed {
                command: spec.display(),
                code: output.code,
                stdout: output.stdout,
                stderr: output.stderr,
            });
        }

        info!("Gradle build completed successfully");
        Ok(output)
    }

    /// Locate the assembled APK, if any
    pub fn find_output(&self) -> Option<PathBuf> {
        let dir = self.project_dir
            .join(&self.gradle_config.module)
            .join("build")
            .join("outputs")
            .join("apk")
            .join(self.gradle_config.variant.as_str());

        if !dir.exists() {
            return None;
        }

        walkdir::WalkDir::new(&dir)
            .max_depth(2)
            .into_iter()
            .filter_map(|e| e.ok())
            .find(|e| {
                e.path().extension()
                    .map(|ext| ext == "apk")
                    .unwrap_or(false)
            })
            .map(|e| e.path().to_path_buf())
    }
}
