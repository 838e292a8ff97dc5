//! Package-manager adapter: refresh, existence, installed and install queries.
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{PackageError, PlatformError};
use crate::exec::Executor;
use crate::platform::Privilege;

/// Supported package managers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageManager {
    /// Debian/Ubuntu (apt).
    Apt,
    /// Fedora/RHEL (dnf).
    Dnf,
    /// Arch Linux (pacman).
    Pacman,
    /// openSUSE (zypper).
    Zypper,
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Apt => write!(f, "apt"),
            Self::Dnf => write!(f, "dnf"),
            Self::Pacman => write!(f, "pacman"),
            Self::Zypper => write!(f, "zypper"),
        }
    }
}

impl FromStr for PackageManager {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "apt" | "apt-get" => Ok(Self::Apt),
            "dnf" => Ok(Self::Dnf),
            "pacman" => Ok(Self::Pacman),
            "zypper" => Ok(Self::Zypper),
            _ => Err(PlatformError::UnsupportedManager(s.to_string())),
        }
    }
}

impl PackageManager {
    /// Detection order used when probing `PATH`.
    pub const ALL: [Self; 4] = [Self::Pacman, Self::Apt, Self::Dnf, Self::Zypper];

    /// Program whose presence on `PATH` identifies this manager.
    #[must_use]
    pub const fn binary(self) -> &'static str {
        match self {
            Self::Apt => "apt-get",
            Self::Dnf => "dnf",
            Self::Pacman => "pacman",
            Self::Zypper => "zypper",
        }
    }

    /// Whether community (AUR-style) helpers apply to this manager.
    #[must_use]
    pub const fn supports_aur(self) -> bool {
        matches!(self, Self::Pacman)
    }

    /// Repository metadata refresh command.
    #[must_use]
    pub const fn refresh_command(self) -> (&'static str, &'static [&'static str]) {
        match self {
            Self::Apt => ("apt-get", &["update"]),
            Self::Dnf => ("dnf", &["makecache"]),
            Self::Pacman => ("pacman", &["-Sy"]),
            Self::Zypper => ("zypper", &["--non-interactive", "refresh"]),
        }
    }

    /// Repository query that succeeds iff `name` is available to install.
    #[must_use]
    pub fn exists_command(self, name: &str) -> (&'static str, Vec<&str>) {
        match self {
            Self::Apt => ("apt-cache", vec!["show", name]),
            Self::Dnf => ("dnf", vec!["info", name]),
            Self::Pacman => ("pacman", vec!["-Si", name]),
            Self::Zypper => (
                "zypper",
                vec!["--non-interactive", "search", "--match-exact", name],
            ),
        }
    }

    /// Local database query that succeeds iff `name` is installed.
    #[must_use]
    pub fn installed_command(self, name: &str) -> (&'static str, Vec<&str>) {
        match self {
            Self::Apt => ("dpkg-query", vec!["-W", "-f=${Status}", name]),
            Self::Dnf | Self::Zypper => ("rpm", vec!["-q", name]),
            Self::Pacman => ("pacman", vec!["-Q", name]),
        }
    }

    /// Whether the output of a successful installed query really means
    /// installed. dpkg keeps removed-but-not-purged packages in its database.
    #[must_use]
    pub fn confirms_installed(self, stdout: &str) -> bool {
        match self {
            Self::Apt => stdout.trim_end().ends_with(" ok installed"),
            Self::Dnf | Self::Pacman | Self::Zypper => true,
        }
    }

    /// Install command prefix; package names are appended.
    #[must_use]
    pub const fn install_command(self) -> (&'static str, &'static [&'static str]) {
        match self {
            Self::Apt => ("apt-get", &["install", "-y"]),
            Self::Dnf => ("dnf", &["install", "-y"]),
            Self::Pacman => ("pacman", &["-S", "--needed", "--noconfirm"]),
            Self::Zypper => ("zypper", &["--non-interactive", "install"]),
        }
    }
}

/// Uniform front end over the detected package manager.
///
/// Owns the metadata-refresh flag so the refresh command runs at most once
/// for the lifetime of the adapter, however many installs request it.
#[derive(Debug)]
pub struct PackageAdapter {
    manager: PackageManager,
    privilege: Privilege,
    executor: Arc<dyn Executor>,
    refreshed: AtomicBool,
}

impl PackageAdapter {
    /// Create an adapter for `manager`.
    #[must_use]
    pub const fn new(
        manager: PackageManager,
        privilege: Privilege,
        executor: Arc<dyn Executor>,
    ) -> Self {
        Self {
            manager,
            privilege,
            executor,
            refreshed: AtomicBool::new(false),
        }
    }

    /// The package manager this adapter drives.
    #[must_use]
    pub const fn manager(&self) -> PackageManager {
        self.manager
    }

    /// Whether a refresh has already succeeded.
    #[must_use]
    pub fn is_refreshed(&self) -> bool {
        self.refreshed.load(Ordering::SeqCst)
    }

    /// Refresh repository metadata unless that already happened.
    ///
    /// # Errors
    ///
    /// Returns [`PackageError::RefreshFailed`] if the refresh command fails.
    pub fn refresh_metadata(&self) -> Result<(), PackageError> {
        if self.is_refreshed() {
            return Ok(());
        }
        let (program, args) = self.manager.refresh_command();
        let (program, args) = self.privilege.wrap(program, args);
        self.executor
            .run(program, &args)
            .map_err(|e| PackageError::RefreshFailed {
                manager: self.manager.to_string(),
                reason: format!("{e:#}"),
            })?;
        self.refreshed.store(true, Ordering::SeqCst);
        Ok(())
    }

    /// Whether `name` is available in the configured repositories.
    ///
    /// Any failure, including a missing binary, reads as "does not exist".
    #[must_use]
    pub fn package_exists(&self, name: &str) -> bool {
        let (program, args) = self.manager.exists_command(name);
        self.query(program, &args)
    }

    /// Whether `name` is recorded in the local install database.
    #[must_use]
    pub fn package_installed(&self, name: &str) -> bool {
        let (program, args) = self.manager.installed_command(name);
        self.executor
            .run_unchecked(program, &args)
            .is_ok_and(|r| r.success && self.manager.confirms_installed(&r.stdout))
    }

    fn query(&self, program: &str, args: &[&str]) -> bool {
        self.executor
            .run_unchecked(program, args)
            .is_ok_and(|r| r.success)
    }

    /// Refresh metadata (once) and install every name in a single command.
    ///
    /// # Errors
    ///
    /// Returns [`PackageError::RefreshFailed`] or
    /// [`PackageError::InstallFailed`] if either command fails.
    pub fn install(&self, names: &[&str]) -> Result<(), PackageError> {
        if names.is_empty() {
            return Ok(());
        }
        self.refresh_metadata()?;

        let (program, base) = self.manager.install_command();
        let mut install_args: Vec<&str> = base.to_vec();
        install_args.extend_from_slice(names);
        let (program, args) = self.privilege.wrap(program, &install_args);

        self.executor
            .run(program, &args)
            .map_err(|e| PackageError::InstallFailed {
                manager: self.manager.to_string(),
                packages: names.join(" "),
                reason: format!("{e:#}"),
            })?;
        Ok(())
    }

    /// Split `names` into those present in the repositories and those missing.
    #[must_use]
    pub fn partition_available<'n>(&self, names: &[&'n str]) -> (Vec<&'n str>, Vec<&'n str>) {
        names
            .iter()
            .copied()
            .partition(|name| self.package_exists(name))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::resources::test_helpers::RecordingExecutor;

    fn adapter_for(
        manager: PackageManager,
        privilege: Privilege,
        executor: &Arc<RecordingExecutor>,
    ) -> PackageAdapter {
        PackageAdapter::new(
            manager,
            privilege,
            Arc::clone(executor) as Arc<dyn Executor>,
        )
    }

    /// Run all four adapter operations and return the captured command lines.
    fn captured_commands(manager: PackageManager) -> Vec<String> {
        let executor = Arc::new(RecordingExecutor::new());
        let adapter = adapter_for(manager, Privilege::Sudo, &executor);
        adapter.refresh_metadata().unwrap();
        let _ = adapter.package_exists("foo");
        let _ = adapter.package_installed("foo");
        adapter.install(&["foo", "bar"]).unwrap();
        executor.calls()
    }

    // ------------------------------------------------------------------
    // Command forms
    // ------------------------------------------------------------------

    #[test]
    fn apt_command_forms() {
        assert_eq!(
            captured_commands(PackageManager::Apt),
            vec![
                "sudo apt-get update",
                "apt-cache show foo",
                "dpkg-query -W -f=${Status} foo",
                "sudo apt-get install -y foo bar",
            ]
        );
    }

    #[test]
    fn apt_config_files_only_is_not_installed() {
        let executor = Arc::new(
            RecordingExecutor::new()
                .with_output("dpkg-query -W -f=${Status} gone", "deinstall ok config-files")
                .with_output("dpkg-query -W -f=${Status} held", "hold ok installed")
                .with_output("dpkg-query -W -f=${Status} here", "install ok installed"),
        );
        let adapter = adapter_for(PackageManager::Apt, Privilege::Root, &executor);
        assert!(!adapter.package_installed("gone"));
        assert!(adapter.package_installed("held"));
        assert!(adapter.package_installed("here"));
        assert!(!adapter.package_installed("unknown"));
    }

    #[test]
    fn dnf_command_forms() {
        assert_eq!(
            captured_commands(PackageManager::Dnf),
            vec![
                "sudo dnf makecache",
                "dnf info foo",
                "rpm -q foo",
                "sudo dnf install -y foo bar",
            ]
        );
    }

    #[test]
    fn pacman_command_forms() {
        assert_eq!(
            captured_commands(PackageManager::Pacman),
            vec![
                "sudo pacman -Sy",
                "pacman -Si foo",
                "pacman -Q foo",
                "sudo pacman -S --needed --noconfirm foo bar",
            ]
        );
    }

    #[test]
    fn zypper_command_forms() {
        assert_eq!(
            captured_commands(PackageManager::Zypper),
            vec![
                "sudo zypper --non-interactive refresh",
                "zypper --non-interactive search --match-exact foo",
                "rpm -q foo",
                "sudo zypper --non-interactive install foo bar",
            ]
        );
    }

    #[test]
    fn root_runs_privileged_commands_directly() {
        let executor = Arc::new(RecordingExecutor::new());
        let adapter = adapter_for(PackageManager::Pacman, Privilege::Root, &executor);
        adapter.install(&["git"]).unwrap();
        assert_eq!(
            executor.calls(),
            vec!["pacman -Sy", "pacman -S --needed --noconfirm git"]
        );
    }

    // ------------------------------------------------------------------
    // Refresh-once invariant
    // ------------------------------------------------------------------

    #[test]
    fn refresh_runs_at_most_once() {
        let executor = Arc::new(RecordingExecutor::new());
        let adapter = adapter_for(PackageManager::Apt, Privilege::Root, &executor);
        adapter.install(&["git"]).unwrap();
        adapter.install(&["meson"]).unwrap();
        adapter.refresh_metadata().unwrap();
        assert_eq!(executor.count_matching("apt-get update"), 1);
        assert!(adapter.is_refreshed());
    }

    #[test]
    fn failed_refresh_is_fatal_and_not_marked_done() {
        let executor = Arc::new(RecordingExecutor::new().failing("apt-get update"));
        let adapter = adapter_for(PackageManager::Apt, Privilege::Root, &executor);
        let err = adapter.install(&["git"]).unwrap_err();
        assert!(matches!(err, PackageError::RefreshFailed { .. }));
        assert!(!adapter.is_refreshed());
        assert_eq!(
            executor.count_matching("apt-get install"),
            0,
            "install must not run after a failed refresh"
        );
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    #[test]
    fn exists_false_on_non_zero_exit() {
        let executor = Arc::new(RecordingExecutor::new().failing("pacman -Si missing"));
        let adapter = adapter_for(PackageManager::Pacman, Privilege::Root, &executor);
        assert!(!adapter.package_exists("missing"));
        assert!(adapter.package_exists("present"));
    }

    #[test]
    fn installed_false_on_non_zero_exit() {
        let executor = Arc::new(RecordingExecutor::new().failing("rpm -q"));
        let adapter = adapter_for(PackageManager::Dnf, Privilege::Root, &executor);
        assert!(!adapter.package_installed("anything"));
    }

    #[test]
    fn partition_available_splits_by_existence() {
        let executor = Arc::new(
            RecordingExecutor::new()
                .failing("apt-cache show cliphist")
                .failing("apt-cache show quickshell"),
        );
        let adapter = adapter_for(PackageManager::Apt, Privilege::Root, &executor);
        let (present, missing) =
            adapter.partition_available(&["grim", "cliphist", "slurp", "quickshell"]);
        assert_eq!(present, vec!["grim", "slurp"]);
        assert_eq!(missing, vec!["cliphist", "quickshell"]);
    }

    // ------------------------------------------------------------------
    // Install
    // ------------------------------------------------------------------

    #[test]
    fn install_failure_names_packages() {
        let executor = Arc::new(RecordingExecutor::new().failing("pacman -S --needed"));
        let adapter = adapter_for(PackageManager::Pacman, Privilege::Root, &executor);
        let err = adapter.install(&["git", "meson"]).unwrap_err();
        assert!(matches!(err, PackageError::InstallFailed { .. }));
        assert!(err.to_string().contains("git meson"));
    }

    #[test]
    fn install_empty_list_is_noop() {
        let executor = Arc::new(RecordingExecutor::new());
        let adapter = adapter_for(PackageManager::Dnf, Privilege::Root, &executor);
        adapter.install(&[]).unwrap();
        assert!(executor.calls().is_empty(), "no command for an empty batch");
        assert!(!adapter.is_refreshed());
    }

    // ------------------------------------------------------------------
    // Manager tags
    // ------------------------------------------------------------------

    #[test]
    fn parse_supported_tags() {
        assert_eq!("apt".parse::<PackageManager>().unwrap(), PackageManager::Apt);
        assert_eq!(
            "apt-get".parse::<PackageManager>().unwrap(),
            PackageManager::Apt
        );
        assert_eq!("DNF".parse::<PackageManager>().unwrap(), PackageManager::Dnf);
        assert_eq!(
            "pacman".parse::<PackageManager>().unwrap(),
            PackageManager::Pacman
        );
        assert_eq!(
            "zypper".parse::<PackageManager>().unwrap(),
            PackageManager::Zypper
        );
    }

    #[test]
    fn parse_unsupported_tag_is_error() {
        let err = "brew".parse::<PackageManager>().unwrap_err();
        assert!(matches!(err, PlatformError::UnsupportedManager(_)));
    }

    #[test]
    fn display_round_trips_through_parse() {
        for manager in PackageManager::ALL {
            assert_eq!(
                manager.to_string().parse::<PackageManager>().unwrap(),
                manager
            );
        }
    }

    #[test]
    fn only_pacman_supports_aur() {
        assert!(PackageManager::Pacman.supports_aur());
        assert!(!PackageManager::Apt.supports_aur());
        assert!(!PackageManager::Dnf.supports_aur());
        assert!(!PackageManager::Zypper.supports_aur());
    }
}
