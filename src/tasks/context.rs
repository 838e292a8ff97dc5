//! Shared state threaded through every install step.
use std::sync::Arc;

use crate::config::Config;
use crate::config::packages::PackageLists;
use crate::config::settings::Settings;
use crate::exec::Executor;
use crate::logging::Log;
use crate::platform::Platform;
use crate::resources::package::PackageAdapter;

/// Shared context for step execution.
pub struct Context {
    /// Paths and repository overrides.
    pub settings: Settings,
    /// Dependency lists for every manager.
    pub packages: PackageLists,
    /// Detected package manager and privilege mode.
    pub platform: Platform,
    /// Package-manager front end; owns the refresh-once flag.
    pub adapter: Arc<PackageAdapter>,
    /// Logger for output and step recording.
    pub log: Arc<dyn Log>,
    /// Command executor (for testing or real system calls).
    pub executor: Arc<dyn Executor>,
    /// Log intended changes instead of making them.
    pub dry_run: bool,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("settings", &self.settings)
            .field("platform", &self.platform)
            .field("adapter", &self.adapter)
            .field("log", &"<dyn Log>")
            .field("executor", &"<dyn Executor>")
            .field("dry_run", &self.dry_run)
            .finish_non_exhaustive()
    }
}

impl Context {
    /// Create a context, building the package adapter for `platform`.
    #[must_use]
    pub fn new(
        config: Config,
        platform: Platform,
        log: Arc<dyn Log>,
        executor: Arc<dyn Executor>,
        dry_run: bool,
    ) -> Self {
        let adapter = Arc::new(PackageAdapter::new(
            platform.manager,
            platform.privilege,
            Arc::clone(&executor),
        ));
        Self {
            settings: config.settings,
            packages: config.packages,
            platform,
            adapter,
            log,
            executor,
            dry_run,
        }
    }
}
