// AccentFlow Configuration
// Loading, default locations and the starter file

mod parser;

use std::fs;
use std::path::{Path, PathBuf};

pub use parser::{ConfigToml, GeneralConfig, UnicodeConfig};

use crate::compose::DEFAULT_TRIGGER;
use crate::feedback::DisplayMode;
use crate::mapping::MappingTable;
use crate::output::UnicodeEntryKeys;
use crate::Key;

/// System-wide fallback location.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/accentflow/config.toml";

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Invalid base character {0:?}: mapping keys must be a single character")]
    InvalidBase(String),

    #[error("Invalid display mode {0:?} (expected terminal, log or none)")]
    InvalidDisplayMode(String),
}

/// Validated runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub input_device: Option<String>,
    pub display_mode: DisplayMode,
    pub trigger: Key,
    pub grab: bool,
    pub unicode: UnicodeEntryKeys,
    pub mappings: MappingTable,
    /// File this was loaded from, if any.
    pub source_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_device: None,
            display_mode: DisplayMode::default(),
            trigger: DEFAULT_TRIGGER,
            grab: true,
            unicode: UnicodeEntryKeys::default(),
            mappings: MappingTable::new(),
            source_path: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_toml_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&content)?;
        config.source_path = Some(path.to_path_buf());
        log::info!(
            "Loaded {} mapping(s) from {}",
            config.mappings.len(),
            path.display()
        );
        Ok(config)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        ConfigToml::parse(content)?.to_config()
    }

    /// Per-user location (~/.config/accentflow/config.toml)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("accentflow").join("config.toml"))
    }

    /// `explicit` if given, else the per-user file if it exists, else the
    /// system file.
    pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
        if let Some(path) = explicit {
            return path.to_path_buf();
        }
        Self::default_path()
            .filter(|path| path.exists())
            .unwrap_or_else(|| PathBuf::from(SYSTEM_CONFIG_PATH))
    }
}

/// Starter configuration with French accents.
pub fn default_config_content() -> &'static str {
    r#"# AccentFlow configuration
#
# Hold the trigger key, tap a letter to cycle through its variants,
# release the trigger to type the selected one.

[general]
# input_device = "/dev/input/event3"   # path or device name; autodetected if unset
display_mode = "terminal"              # terminal | log | none
trigger_key = "RIGHT_ALT"
grab = true

# Key chord used to type a code point (Ctrl+Shift+U, hex digits, Enter).
[unicode]
modifiers = ["LEFT_CTRL", "LEFT_SHIFT"]
combinator = "U"
confirm = "ENTER"

[mappings]
a = ["à", "â", "æ", "á", "ä"]
c = ["ç"]
e = ["é", "è", "ê", "ë"]
i = ["î", "ï"]
o = ["ô", "œ", "ö", "ó"]
u = ["ù", "û", "ü"]
y = ["ÿ"]
A = ["À", "Â", "Æ", "Á", "Ä"]
C = ["Ç"]
E = ["É", "È", "Ê", "Ë"]
I = ["Î", "Ï"]
O = ["Ô", "Œ", "Ö", "Ó"]
U = ["Ù", "Û", "Ü"]
Y = ["Ÿ"]
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_content_parses() {
        let config = Config::from_toml_str(default_config_content()).unwrap();
        assert_eq!(config.mappings.len(), 14);
        assert_eq!(config.display_mode, DisplayMode::Terminal);
        assert_eq!(config.trigger, Key::RIGHT_ALT);
        assert!(config.grab);
        assert_eq!(config.unicode, UnicodeEntryKeys::default());
        assert_eq!(config.mappings.variants_for('e').map(|v| v.len()), Some(4));
        assert_eq!(config.mappings.variants_for('Y').map(|v| v[0].as_str()), Some("Ÿ"));
    }

    #[test]
    fn test_minimal_config_defaults() {
        let config = Config::from_toml_str("[mappings]\ne = [\"é\"]\n").unwrap();
        assert_eq!(config.input_device, None);
        assert_eq!(config.trigger, DEFAULT_TRIGGER);
        assert!(config.grab);
        assert_eq!(config.display_mode, DisplayMode::Terminal);
    }

    #[test]
    fn test_general_settings() {
        let config = Config::from_toml_str(
            r#"
[general]
input_device = "/dev/input/event7"
display_mode = "none"
trigger_key = "LEFT_ALT"
grab = false
"#,
        )
        .unwrap();
        assert_eq!(config.input_device.as_deref(), Some("/dev/input/event7"));
        assert_eq!(config.display_mode, DisplayMode::Disabled);
        assert_eq!(config.trigger, Key::LEFT_ALT);
        assert!(!config.grab);
        assert!(config.mappings.is_empty());
    }

    #[test]
    fn test_empty_input_device_is_unset() {
        let config = Config::from_toml_str("[general]\ninput_device = \"\"\n").unwrap();
        assert_eq!(config.input_device, None);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            Config::from_toml_str("[general]\ndisplay_mode = \"gui\"\n"),
            Err(ConfigError::InvalidDisplayMode(_))
        ));
        assert!(matches!(
            Config::from_toml_str("[general]\ntrigger_key = \"HYPER_BUTTON\"\n"),
            Err(ConfigError::InvalidKey(_))
        ));
        assert!(matches!(
            Config::from_toml_str("[mappings]\nae = [\"æ\"]\n"),
            Err(ConfigError::InvalidBase(_))
        ));
        assert!(matches!(
            Config::from_toml_str("[mappings\n"),
            Err(ConfigError::TomlParse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = Config::from_toml_path("/nonexistent/accentflow/config.toml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_resolve_path() {
        let explicit = Path::new("/tmp/custom.toml");
        assert_eq!(Config::resolve_path(Some(explicit)), explicit.to_path_buf());
        let resolved = Config::resolve_path(None);
        assert!(resolved.ends_with("accentflow/config.toml"));
    }

    #[test]
    fn test_from_toml_path_records_source() {
        let path = std::env::temp_dir().join(format!("accentflow-test-{}.toml", std::process::id()));
        fs::write(&path, "[mappings]\na = [\"à\"]\n").unwrap();
        let config = Config::from_toml_path(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(config.source_path, Some(path));
        assert_eq!(config.mappings.len(), 1);
    }
}
