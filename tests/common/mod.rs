//! Shared helpers for integration tests.
//!
//! Provides a scripted [`Executor`] and an isolated home/root layout so each
//! integration test can drive whole commands without touching the host.
#![allow(dead_code, clippy::expect_used, clippy::unwrap_used)]

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use mango_installer::config::settings::Settings;
use mango_installer::exec::{ExecResult, Executor};
use mango_installer::logging::Logger;

/// An executor driven by prefix rules instead of real processes.
///
/// Every command line is recorded as `"program arg1 arg2"`. Lines matching a
/// failing prefix exit 1; everything else succeeds. A `provides` rule puts a
/// program on `PATH` once a matching command has run, which models a package
/// install adding a binary.
#[derive(Debug, Default)]
pub struct ScriptedExecutor {
    calls: Mutex<Vec<String>>,
    on_path: Mutex<HashSet<String>>,
    failing: Vec<String>,
    failing_exact: Vec<String>,
    outputs: Vec<(String, String)>,
    provides: Vec<(String, String)>,
}

impl ScriptedExecutor {
    /// Root user, nothing on `PATH`, every command succeeds.
    pub fn new() -> Self {
        Self::default().output("id -u", "0\n")
    }

    /// Put `programs` on `PATH`.
    pub fn on_path(self, programs: &[&str]) -> Self {
        self.on_path
            .lock()
            .unwrap()
            .extend(programs.iter().map(|p| (*p).to_string()));
        self
    }

    /// Fail command lines starting with `prefix`.
    pub fn fail(mut self, prefix: &str) -> Self {
        self.failing.push(prefix.to_string());
        self
    }

    /// Fail exactly the command line `line`.
    pub fn fail_exact(mut self, line: &str) -> Self {
        self.failing_exact.push(line.to_string());
        self
    }

    /// Answer command lines starting with `prefix` with `stdout`.
    pub fn output(mut self, prefix: &str, stdout: &str) -> Self {
        self.outputs.push((prefix.to_string(), stdout.to_string()));
        self
    }

    /// Add `program` to `PATH` after a successful line starting with `prefix`.
    pub fn provides(mut self, prefix: &str, program: &str) -> Self {
        self.provides.push((prefix.to_string(), program.to_string()));
        self
    }

    /// Every recorded command line, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of recorded lines starting with `prefix`.
    pub fn count(&self, prefix: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    fn exec(&self, program: &str, args: &[&str]) -> ExecResult {
        let line = std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        let success = !self.failing.iter().any(|p| line.starts_with(p.as_str()))
            && !self.failing_exact.contains(&line);
        if success {
            let mut path = self.on_path.lock().unwrap();
            for (prefix, provided) in &self.provides {
                if line.starts_with(prefix.as_str()) {
                    path.insert(provided.clone());
                }
            }
        }
        let stdout = self
            .outputs
            .iter()
            .find(|(p, _)| line.starts_with(p.as_str()))
            .map(|(_, out)| out.clone())
            .unwrap_or_default();
        self.calls.lock().unwrap().push(line);
        ExecResult {
            stdout,
            stderr: String::new(),
            success,
            code: Some(i32::from(!success)),
        }
    }

    fn checked(&self, program: &str, args: &[&str]) -> anyhow::Result<ExecResult> {
        let result = self.exec(program, args);
        if result.success {
            Ok(result)
        } else {
            anyhow::bail!("{program} failed (exit 1)")
        }
    }
}

impl Executor for ScriptedExecutor {
    fn run(&self, program: &str, args: &[&str]) -> anyhow::Result<ExecResult> {
        self.checked(program, args)
    }

    fn run_in(&self, _dir: &Path, program: &str, args: &[&str]) -> anyhow::Result<ExecResult> {
        self.checked(program, args)
    }

    fn run_unchecked(&self, program: &str, args: &[&str]) -> anyhow::Result<ExecResult> {
        Ok(self.exec(program, args))
    }

    fn which(&self, program: &str) -> bool {
        self.on_path.lock().unwrap().contains(program)
    }
}

/// A throwaway home directory and installer root.
pub struct Sandbox {
    /// Backing directory, removed on drop.
    pub dir: tempfile::TempDir,
}

impl Sandbox {
    /// Empty sandbox with the installer root created but no `config.conf`.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        std::fs::create_dir_all(dir.path().join("root")).expect("create root");
        std::fs::create_dir_all(dir.path().join("home")).expect("create home");
        Self { dir }
    }

    /// Sandbox whose root ships a `config.conf`.
    pub fn with_config() -> Self {
        let sandbox = Self::new();
        std::fs::write(sandbox.root().join("config.conf"), "borderpx=2\n")
            .expect("write config.conf");
        sandbox
    }

    /// Installer root.
    pub fn root(&self) -> PathBuf {
        self.dir.path().join("root")
    }

    /// Settings for this sandbox, with extra environment variables.
    pub fn settings(&self, env: &[(&str, &str)]) -> Settings {
        let home = self.dir.path().join("home").display().to_string();
        let env: Vec<(String, String)> = env
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Settings::from_lookup(
            |key| {
                if key == "HOME" {
                    return Some(home.clone());
                }
                env.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
            },
            self.root(),
        )
        .expect("settings")
    }
}

/// Logger that writes no file.
pub fn quiet_logger() -> Arc<Logger> {
    Arc::new(Logger::with_log_file(None))
}
