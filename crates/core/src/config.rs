//! droidkit Configuration
//!
//! `droidkit.toml` carries two sections:
//! - `[project]`: the descriptor of the app to scaffold
//! - `[toolchain]`: which Gradle distribution to fetch and where things live

use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{CoreError, Result};
use crate::project::ProjectDescriptor;

/// Configuration file name
pub const CONFIG_FILE: &str = "droidkit.toml";

/// Default Gradle distribution version
pub const DEFAULT_GRADLE_VERSION: &str = "7.3.3";

/// Toolchain settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolchainSettings {
    /// Gradle version to download
    #[serde(default = "default_gradle_version")]
    pub gradle_version: String,
    /// Distribution URL override; derived from the version when unset
    #[serde(default)]
    pub distribution_url: Option<String>,
    /// Directory distributions are extracted into
    #[serde(default = "default_dist_dir")]
    pub dist_dir: PathBuf,
    /// Directory the Android project is generated in
    #[serde(default = "default_build_root")]
    pub build_root: PathBuf,
}

fn default_gradle_version() -> String { DEFAULT_GRADLE_VERSION.to_string() }
fn default_dist_dir() -> PathBuf { PathBuf::from("dist") }
fn default_build_root() -> PathBuf { PathBuf::from("android") }

impl Default for ToolchainSettings {
    fn default() -> Self {
        Self {
            gradle_version: default_gradle_version(),
            distribution_url: None,
            dist_dir: default_dist_dir(),
            build_root: default_build_root(),
        }
    }
}

impl ToolchainSettings {
    /// Where the distribution zip is fetched from
    pub fn distribution_url(&self) -> String {
        self.distribution_url.clone().unwrap_or_else(|| {
            format!(
                "http://downloads.gradle-dn.com/distributions/gradle-{}-bin.zip",
                self.gradle_version
            )
        })
    }

    /// Archive file name, e.g. `gradle-7.3.3-bin.zip`
    pub fn archive_name(&self) -> String {
        format!("gradle-{}-bin.zip", self.gradle_version)
    }

    /// Extracted distribution home, e.g. `<dist>/gradle-7.3.3`
    pub fn gradle_home(&self, base: &Path) -> PathBuf {
        base.join(&self.dist_dir)
            .join(format!("gradle-{}", self.gradle_version))
    }

    /// The distribution's `bin` directory
    pub fn gradle_bin_dir(&self, base: &Path) -> PathBuf {
        self.gradle_home(base).join("bin")
    }

    /// Absolute build root
    pub fn build_root(&self, base: &Path) -> PathBuf {
        base.join(&self.build_root)
    }
}

/// Whole configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DroidKitConfig {
    #[serde(default)]
    pub project: ProjectDescriptor,
    #[serde(default)]
    pub toolchain: ToolchainSettings,
}

impl DroidKitConfig {
    /// User-level configuration file
    pub fn user_config_file() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("droidkit").join(CONFIG_FILE))
    }

    /// Resolve which configuration file applies.
    ///
    /// An explicit path wins, then `droidkit.toml` in `dir`, then the user
    /// config dir.
    pub fn locate(explicit: Option<&Path>, dir: &Path) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }
        let local = dir.join(CONFIG_FILE);
        if local.exists() {
            return Some(local);
        }
        Self::user_config_file().filter(|p| p.exists())
    }

    /// Load configuration, falling back to defaults when no file exists
    pub async fn load(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        match Self::locate(explicit, dir) {
            Some(path) => Self::load_from(&path).await,
            None => {
                info!("No {} found, using defaults", CONFIG_FILE);
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from a specific file
    pub async fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::NotFound(format!("{:?}", path)));
        }
        debug!("Loading config from {:?}", path);
        let contents = tokio::fs::read_to_string(path).await?;
        let config: DroidKitConfig = toml::from_str(&contents)?;
        if config.project.package_segments().next().is_none() {
            return Err(CoreError::Config("project.package must not be empty".into()));
        }
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let contents = toml::to_string_pretty(self)?;
        tokio::fs::write(path, contents).await?;

        debug!("Config saved to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_urls() {
        let toolchain = ToolchainSettings::default();
        assert_eq!(
            toolchain.distribution_url(),
            "http://downloads.gradle-dn.com/distributions/gradle-7.3.3-bin.zip"
        );
        assert_eq!(toolchain.archive_name(), "gradle-7.3.3-bin.zip");
        assert_eq!(
            toolchain.gradle_bin_dir(Path::new("/work")),
            PathBuf::from("/work/dist/gradle-7.3.3/bin")
        );
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);

        let mut config = DroidKitConfig::default();
        config.project = ProjectDescriptor::new("test", "com.test");
        config.toolchain.distribution_url = Some("http://localhost/gradle.zip".into());
        config.save(&path).await.unwrap();

        let loaded = DroidKitConfig::load(None, dir.path()).await.unwrap();
        assert_eq!(loaded, config);
    }

    #[tokio::test]
    async fn test_explicit_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = DroidKitConfig::load(Some(&missing), dir.path()).await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_empty_package_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        tokio::fs::write(&path, "[project]\npackage = \"\"\n").await.unwrap();

        let err = DroidKitConfig::load_from(&path).await.unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }
}
