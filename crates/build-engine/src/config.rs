//! Build Configuration
//!
//! Gradle invocation settings.

use std::collections::BTreeMap;

/// Build variant (debug/release)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildVariant {
    #[default]
    Debug,
    Release,
}

impl BuildVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildVariant::Debug => "debug",
            BuildVariant::Release => "release",
        }
    }

    pub fn gradle_task_suffix(&self) -> &'static str {
        match self {
            BuildVariant::Debug => "Debug",
            BuildVariant::Release => "Release",
        }
    }
}

/// Gradle project configuration
#[derive(Debug, Clone)]
pub struct GradleConfig {
    /// Module to build (default: app)
    pub module: String,

    /// Variant to assemble
    pub variant: BuildVariant,

    /// Gradle properties passed as `-Pkey=value`
    pub properties: BTreeMap<String, String>,

    /// Extra command line arguments
    pub extra_args: Vec<String>,

    /// Treat any stderr output as a failed build
    pub fail_on_stderr: bool,
}

impl Default for GradleConfig {
    fn default() -> Self {
        Self {
            module: "app".to_string(),
            variant: BuildVariant::Debug,
            properties: BTreeMap::new(),
            extra_args: Vec::new(),
            fail_on_stderr: true,
        }
    }
}

impl GradleConfig {
    /// Get the full task name, e.g. `:app:assembleDebug`
    pub fn task_name(&self) -> String {
        format!(":{}:assemble{}", self.module, self.variant.gradle_task_suffix())
    }

    /// Arguments passed to the Gradle launcher
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![self.task_name(), "--console=plain".to_string()];

        for (key, value) in &self.properties {
            args.push(format!("-P{}={}", key, value));
        }

        args.extend(self.extra_args.iter().cloned());
        args
    }
}
