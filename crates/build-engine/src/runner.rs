//! Build Runner
//!
//! Coordinates the scaffold-and-assemble pipeline. Steps run strictly in
//! order and the first failure stops everything after it.

use std::fmt;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, info};

use crate::gradle_build::{GradleBuild, ProcessOutput, ProcessRunner};
use crate::scaffold::ProjectScaffolder;
use crate::BuildError;

/// Pipeline state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStage {
    Idle,
    GeneratingProperties,
    GeneratingAppModule,
    Building,
    Done,
    Failed,
}

impl BuildStage {
    /// 1-based step number of a working stage
    pub fn step(&self) -> Option<usize> {
        match self {
            BuildStage::GeneratingProperties => Some(1),
            BuildStage::GeneratingAppModule => Some(2),
            BuildStage::Building => Some(3),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BuildStage::Idle => "idle",
            BuildStage::GeneratingProperties => "generating root project",
            BuildStage::GeneratingAppModule => "generating app module",
            BuildStage::Building => "assembling",
            BuildStage::Done => "done",
            BuildStage::Failed => "failed",
        }
    }
}

impl fmt::Display for BuildStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The first failure of a pipeline run
#[derive(Debug, thiserror::Error)]
#[error("build failed at step {step} ({stage}): {source}")]
pub struct PipelineError {
    /// Stage that was running
    pub stage: BuildStage,
    /// 1-based step number
    pub step: usize,
    #[source]
    pub source: BuildError,
}

/// Build output
#[derive(Debug, Clone)]
pub struct BuildOutput {
    /// Path to the assembled APK, if Gradle put one where expected
    pub apk: Option<PathBuf>,
    /// Pipeline duration in seconds
    pub duration_secs: f64,
    /// Gradle's captured output
    pub process: ProcessOutput,
}

/// Scaffold-then-assemble pipeline
pub struct BuildPipeline<R: ProcessRunner> {
    scaffolder: ProjectScaffolder,
    gradle: GradleBuild<R>,
    stage: BuildStage,
}

impl<R: ProcessRunner> BuildPipeline<R> {
    /// Create a new pipeline
    pub fn new(scaffolder: ProjectScaffolder, gradle: GradleBuild<R>) -> Self {
        Self {
            scaffolder,
            gradle,
            stage: BuildStage::Idle,
        }
    }

    /// Current state
    pub fn stage(&self) -> BuildStage {
        self.stage
    }

    pub fn scaffolder(&self) -> &ProjectScaffolder {
        &self.scaffolder
    }

    fn enter(&mut self, stage: BuildStage) {
        info!("[{}/3] {}", stage.step().unwrap_or(0), stage);
        self.stage = stage;
    }

    fn fail(&mut self, source: BuildError) -> PipelineError {
        let stage = self.stage;
        self.stage = BuildStage::Failed;
        let err = PipelineError {
            stage,
            step: stage.step().unwrap_or(0),
            source,
        };
        error!("{}", err);
        err
    }

    /// Run every step. A finished pipeline may be run again.
    pub async fn run(&mut self) -> Result<BuildOutput, PipelineError> {
        let start = Instant::now();
        self.stage = BuildStage::Idle;

        self.enter(BuildStage::GeneratingProperties);
        if let Err(e) = self.scaffolder.generate_root_properties().await {
            return Err(self.fail(e));
        }

        self.enter(BuildStage::GeneratingAppModule);
        if let Err(e) = self.scaffolder.generate_app_module().await {
            return Err(self.fail(e));
        }

        self.enter(BuildStage::Building);
        let process = match self.gradle.assemble().await {
            Ok(output) => output,
            Err(e) => return Err(self.fail(e)),
        };

        self.stage = BuildStage::Done;
        let output = BuildOutput {
            apk: self.gradle.find_output(),
            duration_secs: start.elapsed().as_secs_f64(),
            process,
        };

        info!("Build completed in {:.2}s", output.duration_secs);
        Ok(output)
    }
}
