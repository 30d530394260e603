//!
//! This module defines configuration structures, loading and discovery for marklint.
//! Configuration is TOML: a `[global]` table and a `[rules]` table mapping rule ids
//! to their setting.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Configuration file names, in order of precedence
pub const CONFIG_FILES: &[&str] = &[".marklint.toml", "marklint.toml", ".config/marklint.toml"];

/// Normalizes rule ids and option names to lowercase kebab-case.
pub fn normalize_key(key: &str) -> String {
    key.trim().replace('_', "-").to_ascii_lowercase()
}

/// Represents the complete configuration loaded from marklint.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Global configuration options
    #[serde(default)]
    pub global: GlobalConfig,

    /// Rule settings keyed by rule id, e.g. `emphasis-marker = "*"`
    #[serde(default)]
    pub rules: BTreeMap<String, toml::Value>,

    /// File the configuration was read from, if any
    #[serde(skip)]
    pub source: Option<PathBuf>,

    /// Keys that were present in the file but are not understood
    #[serde(skip)]
    pub unknown_keys: Vec<String>,
}

/// Global configuration options
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub struct GlobalConfig {
    /// Rules are off unless configured explicitly
    pub reset: bool,

    /// Name used in comment markers: `<!--lint disable rule-->`
    #[serde(alias = "marker_name")]
    pub marker_name: String,

    /// Files to exclude
    pub exclude: Vec<String>,

    /// Respect .gitignore files when scanning directories
    #[serde(alias = "respect_gitignore")]
    pub respect_gitignore: bool,

    /// Output format for linting results ("text" or "json")
    #[serde(skip_serializing_if = "Option::is_none", alias = "output_format")]
    pub output_format: Option<String>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            reset: false,
            marker_name: crate::inline_config::DEFAULT_MARKER_NAME.to_string(),
            exclude: Vec::new(),
            respect_gitignore: true,
            output_format: None,
        }
    }
}

/// How a rule's diagnostics are reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleLevel {
    Off,
    Warn,
    /// Diagnostics are marked fatal
    Error,
}

impl RuleLevel {
    /// `off|on|warn|error` or `0|1|2`
    fn from_value(value: &toml::Value) -> Option<Self> {
        match value {
            toml::Value::String(s) => match s.as_str() {
                "off" => Some(RuleLevel::Off),
                "on" | "warn" => Some(RuleLevel::Warn),
                "error" => Some(RuleLevel::Error),
                _ => None,
            },
            toml::Value::Integer(0) => Some(RuleLevel::Off),
            toml::Value::Integer(1) => Some(RuleLevel::Warn),
            toml::Value::Integer(2) => Some(RuleLevel::Error),
            _ => None,
        }
    }
}

impl fmt::Display for RuleLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleLevel::Off => write!(f, "off"),
            RuleLevel::Warn => write!(f, "warn"),
            RuleLevel::Error => write!(f, "error"),
        }
    }
}

/// A resolved `[rules]` entry
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSetting {
    pub level: RuleLevel,
    /// Passed to the rule verbatim; `None` means the rule's default
    pub option: Option<toml::Value>,
}

impl RuleSetting {
    pub fn off() -> Self {
        Self {
            level: RuleLevel::Off,
            option: None,
        }
    }

    pub fn is_off(&self) -> bool {
        self.level == RuleLevel::Off
    }

    /// Interpret a configured value:
    /// - `false`, `"off"` and `0` turn the rule off
    /// - `true` turns it on with its default option
    /// - `[level]` / `[level, option]` set a level and an option
    /// - anything else is the rule's option
    pub fn from_value(rule: &str, value: &toml::Value) -> Result<Self, ConfigError> {
        match value {
            toml::Value::Boolean(false) | toml::Value::Integer(0) => Ok(Self::off()),
            toml::Value::String(s) if s == "off" => Ok(Self::off()),
            toml::Value::Boolean(true) => Ok(Self {
                level: RuleLevel::Warn,
                option: None,
            }),
            toml::Value::Array(items) => match items.first().and_then(RuleLevel::from_value) {
                Some(level) => {
                    if items.len() > 2 {
                        return Err(ConfigError::InvalidRuleSetting {
                            rule: rule.to_string(),
                            message: format!("expected `[level]` or `[level, option]`, found {} values", items.len()),
                        });
                    }
                    Ok(Self {
                        level,
                        option: if level == RuleLevel::Off { None } else { items.get(1).cloned() },
                    })
                }
                None => Ok(Self {
                    level: RuleLevel::Warn,
                    option: Some(value.clone()),
                }),
            },
            other => Ok(Self {
                level: RuleLevel::Warn,
                option: Some(other.clone()),
            }),
        }
    }
}

impl Config {
    /// Parse configuration text; `path` is only used in error messages
    pub fn from_toml_str(content: &str, path: &str) -> Result<Self, ConfigError> {
        let table: toml::Table =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(format!("{path}: {}", e.message())))?;
        let unknown_keys = unknown_keys(&table);

        let mut config: Config = toml::Value::Table(table)
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::ParseError(format!("{path}: {}", e.message())))?;
        config.rules = std::mem::take(&mut config.rules)
            .into_iter()
            .map(|(rule, value)| (normalize_key(&rule), value))
            .collect();
        config.unknown_keys = unknown_keys;

        for (rule, value) in &config.rules {
            RuleSetting::from_value(rule, value)?;
        }
        Ok(config)
    }

    /// Read and parse a configuration file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::IoError {
            source,
            path: display.clone(),
        })?;
        let mut config = Self::from_toml_str(&content, &display)?;
        config.source = Some(path.to_path_buf());
        log::debug!("[marklint-config] Loaded configuration from {display}");
        Ok(config)
    }

    /// Load an explicit file, or discover one upward from the current
    /// directory. Falls back to defaults when nothing is found or
    /// `skip_discovery` is set.
    pub fn load(config_path: Option<&str>, skip_discovery: bool) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(Path::new(path));
        }
        if skip_discovery {
            return Ok(Self::default());
        }
        let start_dir = match std::env::current_dir() {
            Ok(dir) => dir,
            Err(e) => {
                log::debug!("[marklint-config] Failed to get current directory: {e}");
                return Ok(Self::default());
            }
        };
        match discover_config_upward(&start_dir) {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Resolved setting of a rule, `None` when it is not configured
    pub fn rule_setting(&self, rule: &str) -> Result<Option<RuleSetting>, ConfigError> {
        self.rules
            .get(&normalize_key(rule))
            .map(|value| RuleSetting::from_value(rule, value))
            .transpose()
    }

    /// Turn rules on, keeping any configured option
    pub fn enable_rules<S: AsRef<str>>(&mut self, rules: &[S]) {
        for rule in rules {
            let key = normalize_key(rule.as_ref());
            let is_off = self
                .rules
                .get(&key)
                .and_then(|value| RuleSetting::from_value(&key, value).ok())
                .is_none_or(|setting| setting.is_off());
            if is_off {
                self.rules.insert(key, toml::Value::Boolean(true));
            }
        }
    }

    /// Turn rules off
    pub fn disable_rules<S: AsRef<str>>(&mut self, rules: &[S]) {
        for rule in rules {
            self.rules.insert(normalize_key(rule.as_ref()), toml::Value::Boolean(false));
        }
    }
}

fn unknown_keys(table: &toml::Table) -> Vec<String> {
    const GLOBAL_KEYS: &[&str] = &["reset", "marker-name", "exclude", "respect-gitignore", "output-format"];

    let mut unknown = Vec::new();
    for (key, value) in table {
        match key.as_str() {
            "rules" => {}
            "global" => {
                if let Some(global) = value.as_table() {
                    unknown.extend(
                        global
                            .keys()
                            .filter(|k| !GLOBAL_KEYS.contains(&normalize_key(k).as_str()))
                            .map(|k| format!("global.{k}")),
                    );
                }
            }
            other => unknown.push(other.to_string()),
        }
    }
    unknown
}

/// Discover a configuration file by walking up from `start_dir`.
/// Stops at the first directory containing `.git`.
pub fn discover_config_upward(start_dir: &Path) -> Option<PathBuf> {
    const MAX_DEPTH: usize = 100;

    let mut current_dir = start_dir.to_path_buf();
    for _ in 0..MAX_DEPTH {
        log::debug!("[marklint-config] Searching for config in: {}", current_dir.display());

        for config_name in CONFIG_FILES {
            let config_path = current_dir.join(config_name);
            if config_path.is_file() {
                log::debug!("[marklint-config] Found config file: {}", config_path.display());
                return Some(config_path);
            }
        }

        if current_dir.join(".git").exists() {
            log::debug!("[marklint-config] Stopping at .git directory");
            return None;
        }

        match current_dir.parent() {
            Some(parent) => current_dir = parent.to_path_buf(),
            None => {
                log::debug!("[marklint-config] Reached filesystem root");
                return None;
            }
        }
    }
    None
}

/// Create a default configuration file at the specified path
pub fn create_default_config(path: &str) -> Result<(), ConfigError> {
    if Path::new(path).exists() {
        return Err(ConfigError::FileExists { path: path.to_string() });
    }

    let default_config = r#"# marklint configuration file

[global]
# Turn every rule off unless it is configured below
# reset = false

# Name used in comment markers, e.g. <!--lint disable no-literal-urls-->
# marker-name = "lint"

# List of file/directory patterns to exclude from linting
exclude = [
    ".git",
    "node_modules",
    "vendor",
    "target",
]

# Respect .gitignore files when scanning directories (default: true)
respect-gitignore = true

# Output format: "text" or "json"
# output-format = "text"

# Rule settings: `false` turns a rule off, `true` uses its defaults, a plain
# value is the rule's option and `[level, option]` also sets the level
# ("off", "warn" or "error").
[rules]
# emphasis-marker = "*"
# strong-marker = "consistent"
# heading-style = "atx"
# unordered-list-marker-style = ["error", "-"]
# no-multiple-toplevel-headings = 1
# no-literal-urls = false
"#;

    fs::write(path, default_config).map_err(|err| ConfigError::IoError {
        source: err,
        path: path.to_string(),
    })
}

/// Errors that can occur when loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to read config file at {path}: {source}")]
    IoError { source: io::Error, path: String },

    /// Failed to parse the configuration content
    #[error("Failed to parse config: {0}")]
    ParseError(String),

    /// A `[rules]` entry has an unusable shape
    #[error("Invalid setting for rule `{rule}`: {message}")]
    InvalidRuleSetting { rule: String, message: String },

    /// Configuration file already exists
    #[error("Configuration file already exists at {path}")]
    FileExists { path: String },
}

/// Represents a config validation warning
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigValidationWarning {
    pub message: String,
    pub rule: Option<String>,
}

/// Report configured rule ids that are not registered and keys that are not understood
pub fn validate_config(config: &Config, known_rules: &[&str]) -> Vec<ConfigValidationWarning> {
    let known: Vec<String> = known_rules.iter().map(|r| r.to_string()).collect();
    let mut warnings = Vec::new();

    for rule in config.rules.keys() {
        if known.iter().any(|k| k == rule) {
            continue;
        }
        let message = match suggest_similar_key(rule, &known) {
            Some(suggestion) => format!("Unknown rule in config: {rule} (did you mean {suggestion}?)"),
            None => format!("Unknown rule in config: {rule}"),
        };
        warnings.push(ConfigValidationWarning {
            message,
            rule: Some(rule.clone()),
        });
    }

    for key in &config.unknown_keys {
        warnings.push(ConfigValidationWarning {
            message: format!("Unknown key in config: {key}"),
            rule: None,
        });
    }

    warnings
}

/// Calculate Levenshtein distance between two strings (simple implementation)
fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let a: Vec<char> = s1.chars().collect();
    let b: Vec<char> = s2.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev_row: Vec<usize> = (0..=b.len()).collect();
    let mut curr_row = vec![0; b.len() + 1];
    for i in 1..=a.len() {
        curr_row[0] = i;
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            curr_row[j] = (prev_row[j] + 1).min(curr_row[j - 1] + 1).min(prev_row[j - 1] + cost);
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }
    prev_row[b.len()]
}

/// Suggest the closest known key, allowing up to 2 edits or a third of its length
fn suggest_similar_key(unknown: &str, valid_keys: &[String]) -> Option<String> {
    let max_distance = 2.max(unknown.len() / 3);
    valid_keys
        .iter()
        .map(|valid| (valid, levenshtein_distance(unknown, valid)))
        .filter(|(_, distance)| *distance <= max_distance)
        .min_by_key(|(_, distance)| *distance)
        .map(|(valid, _)| valid.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn value(toml_src: &str) -> toml::Value {
        let table: toml::Table = toml::from_str(&format!("v = {toml_src}")).unwrap();
        table["v"].clone()
    }

    #[test]
    fn test_rule_setting_shapes() {
        assert!(RuleSetting::from_value("r", &value("false")).unwrap().is_off());
        assert!(RuleSetting::from_value("r", &value("\"off\"")).unwrap().is_off());
        assert!(RuleSetting::from_value("r", &value("0")).unwrap().is_off());

        let on = RuleSetting::from_value("r", &value("true")).unwrap();
        assert_eq!(on.level, RuleLevel::Warn);
        assert_eq!(on.option, None);

        let plain = RuleSetting::from_value("r", &value("\"*\"")).unwrap();
        assert_eq!(plain.level, RuleLevel::Warn);
        assert_eq!(plain.option, Some(value("\"*\"")));

        let leveled = RuleSetting::from_value("r", &value("[\"error\", \"-\"]")).unwrap();
        assert_eq!(leveled.level, RuleLevel::Error);
        assert_eq!(leveled.option, Some(value("\"-\"")));

        let numeric = RuleSetting::from_value("r", &value("[2]")).unwrap();
        assert_eq!(numeric.level, RuleLevel::Error);
        assert_eq!(numeric.option, None);

        let off = RuleSetting::from_value("r", &value("[\"off\", \"*\"]")).unwrap();
        assert!(off.is_off());
        assert_eq!(off.option, None);
    }

    #[test]
    fn test_array_option_without_level() {
        let setting = RuleSetting::from_value("r", &value("[\"a\", \"b\", \"c\"]")).unwrap();
        assert_eq!(setting.level, RuleLevel::Warn);
        assert_eq!(setting.option, Some(value("[\"a\", \"b\", \"c\"]")));
    }

    #[test]
    fn test_too_many_values_after_level() {
        let err = RuleSetting::from_value("r", &value("[\"warn\", 1, 2]")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRuleSetting { ref rule, .. } if rule == "r"));
    }

    #[test]
    fn test_parse_config() {
        let config = Config::from_toml_str(
            r#"
[global]
reset = true
marker-name = "marklint"
exclude = ["vendor"]

[rules]
emphasis_marker = "*"
no-literal-urls = false
"#,
            "test.toml",
        )
        .unwrap();

        assert!(config.global.reset);
        assert_eq!(config.global.marker_name, "marklint");
        assert_eq!(config.global.exclude, vec!["vendor"]);
        assert!(config.global.respect_gitignore);
        assert!(config.rules.contains_key("emphasis-marker"));
        assert!(config.rule_setting("no-literal-urls").unwrap().unwrap().is_off());
        assert_eq!(config.rule_setting("heading-style").unwrap(), None);
        assert!(config.unknown_keys.is_empty());
    }

    #[test]
    fn test_parse_errors() {
        let err = Config::from_toml_str("[global\nreset = 1", "bad.toml").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(ref msg) if msg.starts_with("bad.toml")));

        let err = Config::from_toml_str("[global]\nreset = \"yes\"", "bad.toml").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));

        let err = Config::from_toml_str("[rules]\nx = [\"warn\", 1, 2]", "bad.toml").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRuleSetting { .. }));
    }

    #[test]
    fn test_enable_and_disable_overrides() {
        let mut config = Config::from_toml_str("[rules]\na = \"*\"\nb = false\n", "t.toml").unwrap();
        config.enable_rules(&["a", "b", "c"]);
        config.disable_rules(&["d"]);

        assert_eq!(config.rules["a"], value("\"*\""));
        assert_eq!(config.rules["b"], value("true"));
        assert_eq!(config.rules["c"], value("true"));
        assert_eq!(config.rules["d"], value("false"));
    }

    #[test]
    fn test_validate_config_reports_unknown_entries() {
        let config = Config::from_toml_str(
            "[global]\nflavor = \"gfm\"\n\n[rules]\nemphasis-markr = \"*\"\ntotally-unknown = true\n",
            "t.toml",
        )
        .unwrap();
        let warnings = validate_config(&config, &["emphasis-marker", "strong-marker"]);
        let messages: Vec<_> = warnings.iter().map(|w| w.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Unknown rule in config: emphasis-markr (did you mean emphasis-marker?)",
                "Unknown rule in config: totally-unknown",
                "Unknown key in config: global.flavor",
            ]
        );
    }

    #[test]
    fn test_discovery_stops_at_git_root() {
        let temp = tempdir().unwrap();
        let outer = temp.path();
        fs::write(outer.join(".marklint.toml"), "[global]\nreset = true\n").unwrap();

        let repo = outer.join("repo");
        let nested = repo.join("docs/guide");
        fs::create_dir_all(&nested).unwrap();
        fs::create_dir(repo.join(".git")).unwrap();

        assert_eq!(discover_config_upward(&nested), None);

        fs::write(repo.join("marklint.toml"), "").unwrap();
        assert_eq!(discover_config_upward(&nested), Some(repo.join("marklint.toml")));
    }

    #[test]
    fn test_create_default_config() {
        let temp = tempdir().unwrap();
        let path = temp.path().join(".marklint.toml");
        let path_str = path.to_str().unwrap();

        create_default_config(path_str).unwrap();
        let config = Config::load(Some(path_str), false).unwrap();
        assert_eq!(config.global.marker_name, "lint");
        assert_eq!(config.source.as_deref(), Some(path.as_path()));
        assert!(config.unknown_keys.is_empty());

        let err = create_default_config(path_str).unwrap_err();
        assert!(matches!(err, ConfigError::FileExists { .. }));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Config::load(Some("/definitely/not/here.toml"), false).unwrap_err();
        assert!(matches!(err, ConfigError::IoError { .. }));
    }
}
