//! Android Build Engine
//!
//! Scaffolds a minimal Gradle Android project from a
//! [`ProjectDescriptor`](droidkit_core::ProjectDescriptor) and assembles it
//! with an extracted Gradle distribution.

pub mod config;
pub mod gradle_build;
pub mod runner;
pub mod scaffold;
pub mod templates;

pub use config::{BuildVariant, GradleConfig};
pub use gradle_build::{CommandSpec, GradleBuild, ProcessOutput, ProcessRunner, TokioProcessRunner};
pub use runner::{BuildOutput, BuildPipeline, BuildStage, PipelineError};
pub use scaffold::ProjectScaffolder;

use std::path::PathBuf;
use droidkit_core::ComposeError;

/// Build errors
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Filesystem error at {path:?}: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invariant violation: {0}")]
    Compose(#[from] ComposeError),
    #[error("{command} failed (exit code {code:?})")]
    ProcessFailed {
        command: String,
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },
    #[error("Toolchain not found: {0}")]
    ToolchainNotFound(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BuildError {
    pub(crate) fn fs(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BuildError::Filesystem { path: path.into(), source }
    }

    /// Captured stderr of a failed external process
    pub fn stderr(&self) -> Option<&str> {
        match self {
            BuildError::ProcessFailed { stderr, .. } => Some(stderr),
            _ => None,
        }
    }
}
