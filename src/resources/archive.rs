//! Release tarball download and extraction.
use anyhow::{Context as _, Result};
use std::path::Path;
use std::sync::Arc;

use crate::error::ResourceError;
use crate::exec::Executor;

/// Downloads a URL to a local file.
#[cfg_attr(test, mockall::automock)]
pub trait Fetch: Send + Sync {
    /// Write the body of `url` to `dest`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NoDownloader`] or [`ResourceError::Download`].
    fn fetch(&self, url: &str, dest: &Path) -> Result<(), ResourceError>;
}

/// [`Fetch`] implementation using `curl`, or `wget` when curl is absent.
#[derive(Debug, Clone)]
pub struct CommandFetcher {
    executor: Arc<dyn Executor>,
}

impl CommandFetcher {
    /// Create a fetcher running its tools through `executor`.
    #[must_use]
    pub fn new(executor: Arc<dyn Executor>) -> Self {
        Self { executor }
    }
}

impl Fetch for CommandFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Result<(), ResourceError> {
        let dest_str = dest.to_string_lossy();
        let result = if self.executor.which("curl") {
            self.executor
                .run("curl", &["-fsSL", "-o", &dest_str, url])
        } else if self.executor.which("wget") {
            self.executor.run("wget", &["-q", "-O", &dest_str, url])
        } else {
            return Err(ResourceError::NoDownloader {
                url: url.to_string(),
            });
        };
        result.map(|_| ()).map_err(|e| ResourceError::Download {
            url: url.to_string(),
            reason: format!("{e:#}"),
        })
    }
}

/// Extract a gzip tarball into `dest`, dropping the top-level directory.
///
/// # Errors
///
/// Returns an error if `dest` cannot be created or `tar` fails.
pub fn extract_tarball(executor: &dyn Executor, archive: &Path, dest: &Path) -> Result<()> {
    std::fs::create_dir_all(dest)
        .with_context(|| format!("create directory: {}", dest.display()))?;
    let archive_str = archive.to_string_lossy();
    let dest_str = dest.to_string_lossy();
    executor
        .run(
            "tar",
            &["-xzf", &archive_str, "-C", &dest_str, "--strip-components=1"],
        )
        .with_context(|| format!("extracting {}", archive.display()))?;
    Ok(())
}

/// Download `url` to a temporary file and unpack it into `dest`.
///
/// The temporary file is removed on return.
///
/// # Errors
///
/// Returns an error if the download or extraction fails.
pub fn install_release(
    fetcher: &dyn Fetch,
    executor: &dyn Executor,
    url: &str,
    dest: &Path,
) -> Result<()> {
    let tmp = tempfile::Builder::new()
        .prefix("mango-installer-")
        .suffix(".tar.gz")
        .tempfile()
        .context("creating download file")?;
    fetcher.fetch(url, tmp.path())?;
    extract_tarball(executor, tmp.path(), dest)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::resources::test_helpers::RecordingExecutor;

    const URL: &str = "https://example.invalid/release.tar.gz";

    #[test]
    fn fetch_prefers_curl() {
        let executor = Arc::new(RecordingExecutor::new().with_programs(&["curl", "wget"]));
        let fetcher = CommandFetcher::new(Arc::clone(&executor) as Arc<dyn Executor>);
        fetcher.fetch(URL, Path::new("/tmp/out.tar.gz")).unwrap();
        assert_eq!(
            executor.calls(),
            vec![format!("curl -fsSL -o /tmp/out.tar.gz {URL}")]
        );
    }

    #[test]
    fn fetch_falls_back_to_wget() {
        let executor = Arc::new(RecordingExecutor::new().with_programs(&["wget"]));
        let fetcher = CommandFetcher::new(Arc::clone(&executor) as Arc<dyn Executor>);
        fetcher.fetch(URL, Path::new("/tmp/out.tar.gz")).unwrap();
        assert_eq!(
            executor.calls(),
            vec![format!("wget -q -O /tmp/out.tar.gz {URL}")]
        );
    }

    #[test]
    fn fetch_without_any_tool_fails() {
        let executor = Arc::new(RecordingExecutor::new());
        let fetcher = CommandFetcher::new(executor);
        let err = fetcher.fetch(URL, Path::new("/tmp/out")).unwrap_err();
        assert!(matches!(err, ResourceError::NoDownloader { .. }));
    }

    #[test]
    fn fetch_failure_is_download_error() {
        let executor = Arc::new(RecordingExecutor::new().with_programs(&["curl"]).failing("curl"));
        let fetcher = CommandFetcher::new(executor);
        let err = fetcher.fetch(URL, Path::new("/tmp/out")).unwrap_err();
        assert!(matches!(err, ResourceError::Download { ref url, .. } if url == URL));
    }

    #[test]
    fn install_release_downloads_then_extracts() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("noctalia-shell");

        let mut fetcher = MockFetch::new();
        fetcher
            .expect_fetch()
            .withf(|url, _| url == URL)
            .times(1)
            .returning(|_, _| Ok(()));
        let executor = RecordingExecutor::new();

        install_release(&fetcher, &executor, URL, &dest).unwrap();

        assert!(dest.is_dir());
        let calls = executor.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].starts_with("tar -xzf "));
        assert!(calls[0].ends_with(&format!("-C {} --strip-components=1", dest.display())));
    }

    #[test]
    fn install_release_stops_when_download_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut fetcher = MockFetch::new();
        fetcher.expect_fetch().times(1).returning(|url, _| {
            Err(ResourceError::Download {
                url: url.to_string(),
                reason: "404".to_string(),
            })
        });
        let executor = RecordingExecutor::new();

        let err = install_release(&fetcher, &executor, URL, dir.path()).unwrap_err();
        assert!(err.to_string().contains("404"));
        assert!(executor.calls().is_empty(), "nothing extracted after a failed download");
    }
}
