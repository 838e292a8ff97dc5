//! Domain-specific error types for the installer.
//!
//! Internal modules return typed errors (e.g., [`PackageError`], [`TaskError`])
//! while command handlers at the CLI boundary convert them to [`anyhow::Error`]
//! via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! InstallerError
//! ├── Platform(PlatformError) — package-manager detection and parsing
//! ├── Package(PackageError)   — refresh and install commands
//! ├── Task(TaskError)         — fallback exhaustion, verification
//! └── Resource(ResourceError) — files, downloads, clones
//! ```

use thiserror::Error;

/// Top-level error type for the installer.
#[derive(Error, Debug)]
pub enum InstallerError {
    /// Platform detection error.
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    /// Package-manager command error.
    #[error("Package error: {0}")]
    Package(#[from] PackageError),

    /// Install step error.
    #[error("Task execution error: {0}")]
    Task(#[from] TaskError),

    /// Filesystem or network resource error.
    #[error("Resource error: {0}")]
    Resource(#[from] ResourceError),
}

/// Errors that arise while determining the host package manager.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// None of the supported package managers was found on `PATH`.
    #[error("no supported package manager found (looked for: {searched})")]
    NoPackageManager {
        /// Comma-separated list of the programs that were probed.
        searched: String,
    },

    /// A package-manager tag outside the supported set was supplied.
    #[error("unsupported package manager '{0}': must be one of apt, dnf, pacman, zypper")]
    UnsupportedManager(String),
}

/// Errors from package-manager commands that must abort the run.
#[derive(Error, Debug)]
pub enum PackageError {
    /// The repository metadata refresh command failed.
    #[error("{manager} metadata refresh failed: {reason}")]
    RefreshFailed {
        /// Package manager name.
        manager: String,
        /// Underlying command failure.
        reason: String,
    },

    /// The install command failed.
    #[error("{manager} failed to install {packages}: {reason}")]
    InstallFailed {
        /// Package manager name.
        manager: String,
        /// Space-separated package names passed to the command.
        packages: String,
        /// Underlying command failure.
        reason: String,
    },
}

/// Errors that arise while running install steps.
#[derive(Error, Debug)]
pub enum TaskError {
    /// Every install strategy for a component was tried and none succeeded.
    #[error("all install methods for {component} failed: {attempts}")]
    FallbacksExhausted {
        /// Component being installed (e.g. `"compositor"`).
        component: String,
        /// Semicolon-separated reasons, one per attempted strategy.
        attempts: String,
    },

    /// The last-resort source build needs a repository URL that was not supplied.
    #[error("{component} could not be installed from any package source; set {var} to a git URL to build it from source")]
    SourceRepoRequired {
        /// Component being installed.
        component: String,
        /// Environment variable that must be set.
        var: String,
    },

    /// One or more post-install checks failed.
    #[error("verification failed: {count} check(s) did not pass")]
    VerificationFailed {
        /// Number of failed checks.
        count: usize,
    },
}

/// Errors that arise from file, download and clone operations.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// A required file was not found.
    #[error("File not found: {0}")]
    NotFound(String),

    /// Neither `curl` nor `wget` is available.
    #[error("curl or wget is required to download {url}")]
    NoDownloader {
        /// URL that could not be fetched.
        url: String,
    },

    /// The download command ran but failed.
    #[error("download of {url} failed: {reason}")]
    Download {
        /// URL that could not be fetched.
        url: String,
        /// Underlying command failure.
        reason: String,
    },
}
