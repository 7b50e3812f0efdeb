//! Configuration settings for the confab parser.

use crate::error::{ConfigError, Result};
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub timezone: TimezoneConfig,
    pub parser: ParserConfig,
    pub directory: DirectoryConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: TimezoneConfig::default(),
            parser: ParserConfig::default(),
            directory: DirectoryConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::ReadFile)?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default locations or use defaults.
    pub fn load() -> Result<Self> {
        // Try standard config locations
        let config_paths = [
            // Current directory
            PathBuf::from("confab.toml"),
            PathBuf::from("config.toml"),
            // User config directory
            dirs::config_dir()
                .map(|p| p.join("confab/config.toml"))
                .unwrap_or_default(),
            // Home directory
            dirs::home_dir()
                .map(|p| p.join(".confab/config.toml"))
                .unwrap_or_default(),
        ];

        for path in &config_paths {
            if path.exists() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Config::default())
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<()> {
        parse_utc_offset(&self.timezone.utc_offset).ok_or_else(|| {
            ConfigError::Invalid(format!(
                "timezone.utc_offset '{}' is not a +HH:MM offset",
                self.timezone.utc_offset
            ))
        })?;

        if self.parser.default_duration_min <= 0 {
            return Err(ConfigError::Invalid("default_duration_min must be > 0".to_string()).into());
        }
        if self.parser.default_start_hour >= 24 {
            return Err(ConfigError::Invalid("default_start_hour must be < 24".to_string()).into());
        }
        if self.parser.placeholder_domain.is_empty() {
            return Err(ConfigError::MissingField("parser.placeholder_domain".to_string()).into());
        }

        Ok(())
    }

    /// The fixed offset all resolved instants are expressed in.
    pub fn timezone(&self) -> FixedOffset {
        // validate() guarantees the offset parses
        parse_utc_offset(&self.timezone.utc_offset)
            .unwrap_or_else(|| FixedOffset::east_opt(0).expect("zero offset"))
    }

    /// Expand the attendee-directory path, if configured.
    pub fn directory_path(&self) -> Option<PathBuf> {
        self.directory
            .path
            .as_ref()
            .map(|p| PathBuf::from(shellexpand::tilde(p).as_ref()))
    }
}

fn parse_utc_offset(text: &str) -> Option<FixedOffset> {
    let text = text.trim();
    let (sign, rest) = match text.as_bytes().first()? {
        b'+' => (1, &text[1..]),
        b'-' => (-1, &text[1..]),
        _ => (1, text),
    };
    let (hours, minutes) = rest.split_once(':')?;
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 14 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Timezone configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimezoneConfig {
    /// Fixed deployment offset as "+HH:MM" or "-HH:MM"
    pub utc_offset: String,
}

impl Default for TimezoneConfig {
    fn default() -> Self {
        Self {
            utc_offset: "+05:30".to_string(),
        }
    }
}

/// Parser behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Meeting length applied when no duration phrase matches, in minutes
    pub default_duration_min: i64,
    /// Hour of day applied when no time expression matches
    pub default_start_hour: u32,
    /// What to do when the resolved date is in the past
    pub past_date_policy: PastDatePolicy,
    /// When true, unresolved attendee names are dropped instead of getting
    /// a synthesized placeholder email
    pub strict_directory_lookup: bool,
    /// Domain used for synthesized placeholder emails
    pub placeholder_domain: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            default_duration_min: 30,
            default_start_hour: 9,
            past_date_policy: PastDatePolicy::Ask,
            strict_directory_lookup: false,
            placeholder_domain: "example.com".to_string(),
        }
    }
}

/// Policy for requests that resolve to a past date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PastDatePolicy {
    /// Raise a clarification turn asking for a future date
    Ask,
    /// Silently roll the date forward one day
    AutoCorrect,
}

/// Attendee-directory configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    /// Path to the directory file (JSON or TOML); None means empty directory
    pub path: Option<String>,
    /// Extra words to strip from candidate attendee names
    pub extra_exclusion_words: Vec<String>,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            path: None,
            extra_exclusion_words: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.timezone.utc_offset, "+05:30");
        assert_eq!(config.parser.default_duration_min, 30);
        assert_eq!(config.parser.past_date_policy, PastDatePolicy::Ask);
        assert!(!config.parser.strict_directory_lookup);
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
            [timezone]
            utc_offset = "-08:00"

            [parser]
            default_duration_min = 45
            past_date_policy = "auto_correct"
            strict_directory_lookup = true

            [directory]
            path = "~/.confab/directory.json"
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.timezone().local_minus_utc(), -8 * 3600);
        assert_eq!(config.parser.default_duration_min, 45);
        assert_eq!(config.parser.past_date_policy, PastDatePolicy::AutoCorrect);
        assert!(config.parser.strict_directory_lookup);
        assert!(config.directory_path().is_some());
    }

    #[test]
    fn test_timezone_offset() {
        let config = Config::default();
        assert_eq!(config.timezone().local_minus_utc(), 5 * 3600 + 30 * 60);
    }

    #[test]
    fn test_validate_bad_offset() {
        let toml = r#"
            [timezone]
            utc_offset = "Asia/Kolkata"
        "#;

        let result = Config::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_zero_duration() {
        let toml = r#"
            [parser]
            default_duration_min = 0
        "#;

        let result = Config::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_file() {
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("confab.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[parser]\ndefault_start_hour = 10").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.parser.default_start_hour, 10);
    }
}
