//! Command: print version information.

/// Version baked in by `build.rs`, or the crate version.
#[must_use]
pub fn string() -> &'static str {
    option_env!("MANGO_INSTALLER_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Print the installer version to stdout.
pub fn run() {
    println!("mango-installer {}", string());
}
