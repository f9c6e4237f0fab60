//! Project Scaffolder
//!
//! Turns a [`ProjectDescriptor`] into an on-disk Gradle project:
//!
//! ```text
//! <root>/build.gradle          always regenerated
//! <root>/gradle.properties     written once, or every run in debug mode
//! <root>/settings.gradle       always regenerated
//! <root>/app/build.gradle      always regenerated
//! <root>/app/.gitignore
//! <root>/app/libs/
//! <root>/app/src/main/AndroidManifest.xml
//! <root>/app/src/main/java/<package path>/worker/
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use droidkit_android_toolchain::gradle_properties;
use droidkit_core::project::WORKER_SEGMENT;
use droidkit_core::ProjectDescriptor;

use crate::templates;
use crate::BuildError;

/// Scaffolds one project tree for one descriptor
#[derive(Debug, Clone)]
pub struct ProjectScaffolder {
    root: PathBuf,
    descriptor: ProjectDescriptor,
}

impl ProjectScaffolder {
    /// Create a scaffolder rooted at `root`
    pub fn new(root: impl Into<PathBuf>, descriptor: ProjectDescriptor) -> Self {
        Self {
            root: root.into(),
            descriptor,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn descriptor(&self) -> &ProjectDescriptor {
        &self.descriptor
    }

    pub fn app_dir(&self) -> PathBuf {
        self.root.join("app")
    }

    pub fn main_dir(&self) -> PathBuf {
        self.app_dir().join("src").join("main")
    }

    /// `app/src/main/java/<package path>/worker`
    pub fn worker_dir(&self) -> PathBuf {
        self.main_dir()
            .join("java")
            .join(self.descriptor.package_path())
            .join(WORKER_SEGMENT)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.main_dir().join("AndroidManifest.xml")
    }

    /// Every directory of the layout, parents before children
    pub fn layout(&self) -> Vec<PathBuf> {
        let mut dirs = vec![self.root.clone()];
        let mut current = self.root.clone();
        for segment in ["app", "src", "main", "java"] {
            current.push(segment);
            dirs.push(current.clone());
        }
        for segment in self.descriptor.package_segments() {
            current.push(segment);
            dirs.push(current.clone());
        }
        current.push(WORKER_SEGMENT);
        dirs.push(current);
        dirs.push(self.app_dir().join("libs"));
        dirs
    }

    /// Create `path` unless it already exists
    pub async fn ensure_directory(path: &Path) -> Result<(), BuildError> {
        match tokio::fs::create_dir(path).await {
            Ok(()) => {
                debug!("Created {:?}", path);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists && path.is_dir() => Ok(()),
            Err(e) => Err(BuildError::fs(path, e)),
        }
    }

    /// Create the build root; its parents may be missing
    async fn ensure_root(&self) -> Result<(), BuildError> {
        if let Some(parent) = self.root.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| BuildError::fs(parent, e))?;
        }
        Self::ensure_directory(&self.root).await
    }

    /// Create the whole directory layout
    pub async fn ensure_layout(&self) -> Result<(), BuildError> {
        self.ensure_root().await?;
        for dir in self.layout().iter().skip(1) {
            Self::ensure_directory(dir).await?;
        }
        Ok(())
    }

    async fn write_file(path: &Path, contents: &str) -> Result<(), BuildError> {
        tokio::fs::write(path, contents)
            .await
            .map_err(|e| BuildError::fs(path, e))?;
        debug!("Wrote {:?}", path);
        Ok(())
    }

    /// Delete `path` if present, then write it fresh
    async fn replace_file(path: &Path, contents: &str) -> Result<(), BuildError> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => debug!("Removed stale {:?}", path),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(BuildError::fs(path, e)),
        }
        Self::write_file(path, contents).await
    }

    /// Root `build.gradle` (always) and `gradle.properties` (when missing,
    /// or every run when the descriptor's debug flag is set)
    pub async fn generate_root_properties(&self) -> Result<(), BuildError> {
        self.ensure_root().await?;

        let script = templates::root_build_script()?;
        Self::replace_file(&self.root.join("build.gradle"), &script).await?;

        let properties = self.root.join("gradle.properties");
        if self.descriptor.debug || !properties.exists() {
            Self::write_file(&properties, &gradle_properties(self.descriptor.heap_size_mb)).await?;
        } else {
            debug!("Keeping existing {:?}", properties);
        }

        info!("Generated root project in {:?}", self.root);
        Ok(())
    }

    /// App module tree, manifest, settings, module script and ignore file
    pub async fn generate_app_module(&self) -> Result<(), BuildError> {
        self.ensure_layout().await?;

        let manifest = templates::android_manifest(&self.descriptor);
        Self::write_file(&self.manifest_path(), &manifest).await?;

        let settings = templates::settings_script(&self.descriptor);
        Self::replace_file(&self.root.join("settings.gradle"), &settings).await?;

        let script = templates::app_build_script(&self.descriptor)?;
        Self::replace_file(&self.app_dir().join("build.gradle"), &script).await?;

        let gitignore = templates::module_gitignore();
        Self::write_file(&self.app_dir().join(".gitignore"), &gitignore).await?;

        info!("Generated app module for {}", self.descriptor.worker_package());
        Ok(())
    }
}
