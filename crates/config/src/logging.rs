//! Log multiplexer configuration

use std::path::PathBuf;

use logmux_protocol::LogLevel;
use serde::Deserialize;

/// File-logging mode
///
/// Exactly one of the three modes is active for a session; it is resolved
/// once when the sink set is built.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileLogMode {
    /// No file sink (default)
    #[default]
    Off,
    /// One shared file, interleaved and labeled
    File,
    /// One file per container identity, unlabeled
    Container,
}

/// Console color override
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Follow the terminal's color capability (default)
    #[default]
    Auto,
    /// Force colors on even when piped
    Always,
    /// Disable colors unconditionally
    Never,
}

impl ColorMode {
    /// Resolve the effective color flag
    ///
    /// `terminal_supports_color` is the externally detected capability of
    /// the output stream; detection itself lives with the caller.
    pub fn color_enabled(&self, terminal_supports_color: bool) -> bool {
        match self {
            Self::Auto => terminal_supports_color,
            Self::Always => true,
            Self::Never => false,
        }
    }
}

/// Configuration for one logging session
///
/// # Example
///
/// ```toml
/// level = "debug"
/// file = "file"
/// path = "logs/pipeline.log"
/// color = "never"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Verbosity level handed to the process-wide logger
    /// Default: info
    pub level: LogLevel,

    /// File-logging mode (off, file, container)
    /// Default: off
    pub file: FileLogMode,

    /// Output path: the file path in `file` mode, the directory in
    /// `container` mode
    /// Default: logs
    pub path: PathBuf,

    /// Console color override (auto, always, never)
    /// Default: auto
    pub color: ColorMode,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            file: FileLogMode::Off,
            path: PathBuf::from("logs"),
            color: ColorMode::Auto,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert_eq!(config.level, LogLevel::Info);
        assert_eq!(config.file, FileLogMode::Off);
        assert_eq!(config.path, PathBuf::from("logs"));
        assert_eq!(config.color, ColorMode::Auto);
    }

    #[test]
    fn test_deserialize_empty() {
        let config: LogConfig = toml::from_str("").unwrap();
        assert_eq!(config.file, FileLogMode::Off);
        assert_eq!(config.color, ColorMode::Auto);
    }

    #[test]
    fn test_deserialize_full() {
        let toml = r#"
level = "debug"
file = "container"
path = "out/logs"
color = "never"
"#;
        let config: LogConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(config.file, FileLogMode::Container);
        assert_eq!(config.path, PathBuf::from("out/logs"));
        assert_eq!(config.color, ColorMode::Never);
    }

    #[test]
    fn test_deserialize_all_file_modes() {
        for (s, expected) in [
            ("off", FileLogMode::Off),
            ("file", FileLogMode::File),
            ("container", FileLogMode::Container),
        ] {
            let toml = format!("file = \"{}\"", s);
            let config: LogConfig = toml::from_str(&toml).unwrap();
            assert_eq!(config.file, expected);
        }
    }

    #[test]
    fn test_color_mode_resolution() {
        assert!(ColorMode::Auto.color_enabled(true));
        assert!(!ColorMode::Auto.color_enabled(false));
        assert!(ColorMode::Always.color_enabled(false));
        assert!(!ColorMode::Never.color_enabled(true));
    }
}
