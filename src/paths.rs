//! Location of the configuration file

use std::ffi::OsString;
use std::path::PathBuf;

/// Platform-specific configuration locations
pub struct PlatformPaths;

impl PlatformPaths {
    /// Base configuration directory: `%APPDATA%` on Windows,
    /// `~/Library/Application Support` on macOS, `$XDG_CONFIG_HOME` or
    /// `~/.config` elsewhere. Falls back to `.` when none is set.
    pub fn config_dir() -> PathBuf {
        Self::config_dir_from(|key| std::env::var_os(key))
    }

    fn config_dir_from(var: impl Fn(&str) -> Option<OsString>) -> PathBuf {
        let home = || var("HOME").filter(|v| !v.is_empty()).map(PathBuf::from);
        let base = if cfg!(target_os = "windows") {
            var("APPDATA").map(PathBuf::from)
        } else if cfg!(target_os = "macos") {
            home().map(|h| h.join("Library").join("Application Support"))
        } else {
            var("XDG_CONFIG_HOME")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .or_else(|| home().map(|h| h.join(".config")))
        };
        base.unwrap_or_else(|| PathBuf::from("."))
    }

    /// `{config_dir}/microannotate`
    pub fn project_config_dir() -> PathBuf {
        Self::config_dir().join("microannotate")
    }

    /// `{config_dir}/microannotate/config.toml`
    pub fn default_config_path() -> PathBuf {
        Self::project_config_dir().join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_path_layout() {
        let path = PlatformPaths::default_config_path();
        assert!(path.ends_with("microannotate/config.toml"));
        assert!(path.starts_with(PlatformPaths::config_dir()));
    }

    #[test]
    fn test_nothing_set_falls_back_to_current_dir() {
        assert_eq!(PlatformPaths::config_dir_from(|_| None), PathBuf::from("."));
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    #[test]
    fn test_xdg_config_home_wins_over_home() {
        let dir = PlatformPaths::config_dir_from(|key| match key {
            "XDG_CONFIG_HOME" => Some("/xdg".into()),
            "HOME" => Some("/home/u".into()),
            _ => None,
        });
        assert_eq!(dir, PathBuf::from("/xdg"));
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    #[test]
    fn test_empty_xdg_config_home_uses_home() {
        let dir = PlatformPaths::config_dir_from(|key| match key {
            "XDG_CONFIG_HOME" => Some("".into()),
            "HOME" => Some("/home/u".into()),
            _ => None,
        });
        assert_eq!(dir, PathBuf::from("/home/u/.config"));
    }
}
