//! Gradle Downloader
//!
//! Downloads and extracts the Gradle distribution droidkit builds with.

use std::path::{Path, PathBuf};
use std::time::Duration;
use futures::StreamExt;
use reqwest::Client;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use droidkit_core::config::ToolchainSettings;

/// Download progress callback, called with (bytes received, total size)
pub type ProgressCallback = Box<dyn Fn(u64, u64) + Send + Sync>;

/// Heap written into the distribution's own gradle.properties
pub const DISTRIBUTION_HEAP_MB: u32 = 2048;

const BYTES_PER_MB: f64 = 1_048_576.0;

/// Download error types
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Extraction failed: {0}")]
    Extraction(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Human readable progress line, e.g.
/// `Downloading gradle.zip - 50.00% (1.00 MB) of total size: 2.00 MB`
pub fn format_progress(file: &Path, received: u64, total: u64) -> String {
    let percent = if total == 0 {
        0.0
    } else {
        100.0 * received as f64 / total as f64
    };
    format!(
        "Downloading {} - {:.2}% ({:.2} MB) of total size: {:.2} MB",
        file.display(),
        percent,
        received as f64 / BYTES_PER_MB,
        total as f64 / BYTES_PER_MB,
    )
}

/// The `gradle.properties` text shipped next to the Gradle launcher
pub fn gradle_properties(heap_mb: u32) -> String {
    format!(
        "org.gradle.jvmargs=-Xmx{}m -Dfile.encoding=UTF-8\r\n\
         android.useAndroidX=true\r\n\
         kotlin.code.style=official\r\n",
        heap_mb
    )
}

/// Gradle distribution downloader
pub struct GradleDownloader {
    client: Client,
    settings: ToolchainSettings,
    base_dir: PathBuf,
}

impl GradleDownloader {
    /// Create a new downloader working relative to `base_dir`
    pub fn new(settings: ToolchainSettings, base_dir: PathBuf) -> Result<Self, DownloadError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self { client, settings, base_dir })
    }

    /// Where the archive is downloaded to
    pub fn archive_path(&self) -> PathBuf {
        self.base_dir.join(self.settings.archive_name())
    }

    /// Where the distribution ends up
    pub fn gradle_home(&self) -> PathBuf {
        self.settings.gradle_home(&self.base_dir)
    }

    /// Download a file with progress reporting, returning the byte count
    pub async fn download_file(
        &self,
        url: &str,
        target: &Path,
        progress: Option<ProgressCallback>,
    ) -> Result<u64, DownloadError> {
        info!("Downloading {} to {:?}", url, target);

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(DownloadError::InvalidResponse(
                format!("HTTP {}", response.status())
            ));
        }

        let total_size = response.content_length().unwrap_or(0);
        let mut downloaded: u64 = 0;

        let mut file = tokio::fs::File::create(target).await?;
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;

            if let Some(ref callback) = progress {
                callback(downloaded, total_size);
            }
        }

        file.flush().await?;

        info!("Download complete: {:?} ({} bytes)", target, downloaded);
        Ok(downloaded)
    }

    /// Extract a ZIP file
    pub async fn extract_zip(archive: &Path, target_dir: &Path) -> Result<(), DownloadError> {
        info!("Extracting {:?} to {:?}", archive, target_dir);

        let archive = archive.to_path_buf();
        let target_dir = target_dir.to_path_buf();

        // zip is synchronous
        tokio::task::spawn_blocking(move || -> Result<(), DownloadError> {
            let file = std::fs::File::open(&archive)?;
            let mut zip = zip::ZipArchive::new(file)
                .map_err(|e| DownloadError::Extraction(e.to_string()))?;

            for i in 0..zip.len() {
                let mut entry = zip.by_index(i)
                    .map_err(|e| DownloadError::Extraction(e.to_string()))?;

                let Some(relative) = entry.enclosed_name().map(Path::to_path_buf) else {
                    return Err(DownloadError::Extraction(
                        format!("unsafe entry path: {}", entry.name())
                    ));
                };
                let outpath = target_dir.join(relative);

                if entry.is_dir() {
                    std::fs::create_dir_all(&outpath)?;
                } else {
                    if let Some(parent) = outpath.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    let mut outfile = std::fs::File::create(&outpath)?;
                    std::io::copy(&mut entry, &mut outfile)?;
                }

                #[cfg(unix)]
                {
                    use std::os::unix::fs::PermissionsExt;
                    if let Some(mode) = entry.unix_mode() {
                        std::fs::set_permissions(&outpath, std::fs::Permissions::from_mode(mode))
                            .ok();
                    }
                }
            }

            Ok(())
        }).await.map_err(|e| DownloadError::Extraction(e.to_string()))?
    }

    /// Download, extract and configure the Gradle distribution.
    ///
    /// The zip is removed once extraction succeeds. Returns the Gradle home.
    pub async fn install(
        &self,
        progress: Option<ProgressCallback>,
    ) -> Result<PathBuf, DownloadError> {
        let url = self.settings.distribution_url();
        let archive_path = self.archive_path();
        let dist_dir = self.base_dir.join(&self.settings.dist_dir);

        self.download_file(&url, &archive_path, progress).await?;
        Self::extract_zip(&archive_path, &dist_dir).await?;
        tokio::fs::remove_file(&archive_path).await?;

        let gradle_home = self.gradle_home();
        let bin_dir = gradle_home.join("bin");
        tokio::fs::create_dir_all(&bin_dir).await?;
        let properties = bin_dir.join("gradle.properties");
        tokio::fs::write(&properties, gradle_properties(DISTRIBUTION_HEAP_MB)).await?;
        debug!("Wrote {:?}", properties);

        info!("Gradle {} installed to {:?}", self.settings.gradle_version, gradle_home);
        Ok(gradle_home)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn distribution_zip(version: &str) -> Vec<u8> {
        let mut cursor = std::io::Cursor::new(Vec::new());
        {
            let mut zip = zip::ZipWriter::new(&mut cursor);
            let options = zip::write::FileOptions::default();
            zip.add_directory(format!("gradle-{}/bin/", version), options).unwrap();
            zip.start_file(format!("gradle-{}/bin/gradle", version), options).unwrap();
            zip.write_all(b"#!/bin/sh\necho gradle\n").unwrap();
            zip.finish().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn test_format_progress() {
        let line = format_progress(Path::new("gradle.zip"), 1_048_576, 2_097_152);
        assert_eq!(line, "Downloading gradle.zip - 50.00% (1.00 MB) of total size: 2.00 MB");
        assert!(format_progress(Path::new("x"), 10, 0).contains("0.00%"));
    }

    #[test]
    fn test_gradle_properties_crlf() {
        let text = gradle_properties(1024);
        assert!(text.starts_with("org.gradle.jvmargs=-Xmx1024m -Dfile.encoding=UTF-8\r\n"));
        assert_eq!(text.matches("\r\n").count(), 3);
    }

    #[tokio::test]
    async fn test_install_extracts_and_removes_zip() {
        let server = MockServer::start().await;
        let body = distribution_zip("7.3.3");
        let size = body.len() as u64;
        Mock::given(method("GET"))
            .and(path("/gradle-7.3.3-bin.zip"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let settings = ToolchainSettings {
            distribution_url: Some(format!("{}/gradle-7.3.3-bin.zip", server.uri())),
            ..Default::default()
        };
        let downloader = GradleDownloader::new(settings, dir.path().to_path_buf()).unwrap();

        let seen = Arc::new(AtomicU64::new(0));
        let seen_cb = seen.clone();
        let home = downloader
            .install(Some(Box::new(move |received, _total| {
                seen_cb.store(received, Ordering::SeqCst);
            })))
            .await
            .unwrap();

        assert_eq!(seen.load(Ordering::SeqCst), size);
        assert!(home.join("bin").join("gradle").exists());
        assert!(home.join("bin").join("gradle.properties").exists());
        assert!(!downloader.archive_path().exists());
    }

    #[tokio::test]
    async fn test_http_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let downloader =
            GradleDownloader::new(ToolchainSettings::default(), dir.path().to_path_buf()).unwrap();
        let err = downloader
            .download_file(
                &format!("{}/missing.zip", server.uri()),
                &dir.path().join("x.zip"),
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DownloadError::InvalidResponse(_)));
    }
}
