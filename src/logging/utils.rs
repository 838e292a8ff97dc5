//! Run-log location, ANSI stripping, and timestamps.
use std::path::{Path, PathBuf};

/// Remove CSI escape sequences (`ESC [ ... final-byte`) from `s`.
pub(super) fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some((before, after)) = rest.split_once('\x1b') {
        out.push_str(before);
        rest = after.strip_prefix('[').map_or(after, |csi| {
            csi.find(|c: char| ('@'..='~').contains(&c))
                .and_then(|end| csi.get(end + 1..))
                .unwrap_or("")
        });
    }
    out.push_str(rest);
    out
}

/// `$XDG_CACHE_HOME`, else `$HOME/.cache`, else `./.cache`.
fn cache_root() -> PathBuf {
    let non_empty = |key: &str| std::env::var_os(key).filter(|v| !v.is_empty());
    non_empty("XDG_CACHE_HOME").map_or_else(
        || {
            non_empty("HOME")
                .map_or_else(|| PathBuf::from("."), PathBuf::from)
                .join(".cache")
        },
        PathBuf::from,
    )
}

/// `<cache_root>/mango-installer/<command>.log`, creating the directory.
pub(super) fn log_file_path_in(cache_root: &Path, command: &str) -> Option<PathBuf> {
    let dir = cache_root.join("mango-installer");
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir.join(command).with_extension("log"))
}

/// Run log for `command` under the user cache directory.
pub(super) fn log_file_path(command: &str) -> Option<PathBuf> {
    log_file_path_in(&cache_root(), command)
}

/// Current UTC time as `YYYY-MM-DD HH:MM:SS`.
pub(super) fn format_utc_datetime() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Current UTC time as `HH:MM:SS`.
pub(super) fn format_utc_time() -> String {
    chrono::Utc::now().format("%H:%M:%S").to_string()
}
