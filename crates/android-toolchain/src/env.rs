//! Environment Manager
//!
//! Builds the environment Gradle is launched with: the distribution's `bin`
//! directory goes in front of `PATH`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment configuration
#[derive(Debug, Clone, Default)]
pub struct EnvironmentConfig {
    /// GRADLE_HOME
    pub gradle_home: Option<PathBuf>,
    /// JAVA_HOME
    pub java_home: Option<PathBuf>,
    /// ANDROID_HOME / ANDROID_SDK_ROOT
    pub android_home: Option<PathBuf>,
    /// Entries prepended to PATH, in order
    pub path_additions: Vec<PathBuf>,
    /// Custom environment variables
    pub custom_vars: HashMap<String, String>,
}

impl EnvironmentConfig {
    /// Environment for an extracted Gradle distribution
    pub fn for_gradle_home(gradle_home: &Path) -> Self {
        Self {
            gradle_home: Some(gradle_home.to_path_buf()),
            path_additions: vec![gradle_home.join("bin")],
            ..Default::default()
        }
    }

    /// Pick up JAVA_HOME and ANDROID_HOME from the current process
    pub fn with_inherited_homes(mut self) -> Self {
        if self.java_home.is_none() {
            self.java_home = std::env::var_os("JAVA_HOME").map(PathBuf::from);
        }
        if self.android_home.is_none() {
            self.android_home = std::env::var_os("ANDROID_HOME")
                .or_else(|| std::env::var_os("ANDROID_SDK_ROOT"))
                .map(PathBuf::from);
        }
        self
    }
}

/// Environment Manager
pub struct EnvManager {
    config: EnvironmentConfig,
    original_path: String,
}

impl EnvManager {
    /// Create a manager on top of the current process PATH
    pub fn new(config: EnvironmentConfig) -> Self {
        let original_path = std::env::var("PATH")
            .or_else(|_| std::env::var("Path"))
            .unwrap_or_default();
        Self::with_base_path(config, original_path)
    }

    /// Create a manager on top of an explicit PATH value
    pub fn with_base_path(config: EnvironmentConfig, original_path: impl Into<String>) -> Self {
        Self {
            config,
            original_path: original_path.into(),
        }
    }

    /// Get environment variables to set
    pub fn get_env_vars(&self) -> HashMap<String, String> {
        let mut vars = HashMap::new();

        if let Some(ref path) = self.config.gradle_home {
            vars.insert("GRADLE_HOME".to_string(), path.to_string_lossy().to_string());
        }

        if let Some(ref path) = self.config.java_home {
            vars.insert("JAVA_HOME".to_string(), path.to_string_lossy().to_string());
        }

        if let Some(ref path) = self.config.android_home {
            let path_str = path.to_string_lossy().to_string();
            vars.insert("ANDROID_HOME".to_string(), path_str.clone());
            vars.insert("ANDROID_SDK_ROOT".to_string(), path_str);
        }

        for (key, value) in &self.config.custom_vars {
            vars.insert(key.clone(), value.clone());
        }

        vars
    }

    /// Get PATH value including additions
    pub fn get_path(&self) -> String {
        let path_sep = if cfg!(windows) { ";" } else { ":" };

        if self.config.path_additions.is_empty() {
            return self.original_path.clone();
        }

        let additions: Vec<String> = self.config.path_additions
            .iter()
            .map(|p| p.to_string_lossy().to_string())
            .collect();

        if self.original_path.is_empty() {
            return additions.join(path_sep);
        }
        format!("{}{}{}", additions.join(path_sep), path_sep, self.original_path)
    }

    /// Full environment for a child process
    pub fn command_env(&self) -> HashMap<String, String> {
        let mut env = self.get_env_vars();
        let path_key = if cfg!(windows) { "Path" } else { "PATH" };
        env.insert(path_key.to_string(), self.get_path());
        debug!("Child PATH: {}", env[path_key]);
        env
    }
}
