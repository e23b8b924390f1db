// AccentFlow Config Parser - TOML with Serde
// Raw file layout and its conversion into a validated Config

use indexmap::IndexMap;
use serde::Deserialize;
use std::str::FromStr;

use super::{Config, ConfigError};
use crate::compose::DEFAULT_TRIGGER;
use crate::feedback::DisplayMode;
use crate::key::{base_to_key, key_from_name};
use crate::mapping::MappingTable;
use crate::output::UnicodeEntryKeys;
use crate::Key;

/// Main configuration structure (root TOML table)
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigToml {
    #[serde(default)]
    pub general: GeneralConfig,

    /// Unicode entry chord override
    #[serde(default)]
    pub unicode: Option<UnicodeConfig>,

    /// Base character to variants, in cycling order
    #[serde(default)]
    pub mappings: IndexMap<String, Vec<String>>,
}

/// General settings
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct GeneralConfig {
    /// Device path or name to read from
    pub input_device: Option<String>,
    /// terminal, log or none
    pub display_mode: Option<String>,
    /// Key name that arms accent mode
    pub trigger_key: Option<String>,
    /// Grab the input device exclusively
    pub grab: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnicodeConfig {
    pub modifiers: Option<Vec<String>>,
    pub combinator: Option<String>,
    pub confirm: Option<String>,
}

fn parse_key(name: &str) -> Result<Key, ConfigError> {
    key_from_name(name).ok_or_else(|| ConfigError::InvalidKey(name.to_string()))
}

fn parse_base(raw: &str) -> Result<char, ConfigError> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(base), None) => Ok(base),
        _ => Err(ConfigError::InvalidBase(raw.to_string())),
    }
}

impl UnicodeConfig {
    fn to_entry_keys(&self) -> Result<UnicodeEntryKeys, ConfigError> {
        let mut keys = UnicodeEntryKeys::default();
        if let Some(modifiers) = &self.modifiers {
            let [first, second] = modifiers.as_slice() else {
                return Err(ConfigError::InvalidKey(format!(
                    "unicode.modifiers needs exactly 2 keys, got {}",
                    modifiers.len()
                )));
            };
            keys.modifiers = [parse_key(first)?, parse_key(second)?];
        }
        if let Some(combinator) = &self.combinator {
            keys.combinator = parse_key(combinator)?;
        }
        if let Some(confirm) = &self.confirm {
            keys.confirm = parse_key(confirm)?;
        }
        Ok(keys)
    }
}

impl ConfigToml {
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::TomlParse(e.to_string()))
    }

    /// Validate names and build the runtime configuration.
    pub fn to_config(&self) -> Result<Config, ConfigError> {
        let general = &self.general;

        let display_mode = match &general.display_mode {
            Some(mode) => DisplayMode::from_str(mode)
                .map_err(|_| ConfigError::InvalidDisplayMode(mode.clone()))?,
            None => DisplayMode::default(),
        };

        let trigger = match &general.trigger_key {
            Some(name) => parse_key(name)?,
            None => DEFAULT_TRIGGER,
        };

        let unicode = match &self.unicode {
            Some(unicode) => unicode.to_entry_keys()?,
            None => UnicodeEntryKeys::default(),
        };

        let mut mappings = MappingTable::new();
        for (raw, variants) in &self.mappings {
            let base = parse_base(raw)?;
            if base_to_key(base).is_none() {
                log::warn!("No physical key produces '{}'; its mapping is unreachable", base);
            }
            mappings.insert(base, variants.clone());
        }

        Ok(Config {
            input_device: general.input_device.clone().filter(|d| !d.is_empty()),
            display_mode,
            trigger,
            grab: general.grab.unwrap_or(true),
            unicode,
            mappings,
            source_path: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document() {
        let toml = ConfigToml::parse("").unwrap();
        assert!(toml.mappings.is_empty());
        assert!(toml.unicode.is_none());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = ConfigToml::parse("[general]\nfoo = 1\n");
        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn test_mappings_keep_file_order() {
        let toml = ConfigToml::parse("[mappings]\nu = [\"ù\"]\na = [\"à\"]\n").unwrap();
        let keys: Vec<&str> = toml.mappings.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["u", "a"]);
    }

    #[test]
    fn test_parse_base() {
        assert_eq!(parse_base("e").unwrap(), 'e');
        assert_eq!(parse_base("`").unwrap(), '`');
        assert!(matches!(parse_base("ee"), Err(ConfigError::InvalidBase(_))));
        assert!(matches!(parse_base(""), Err(ConfigError::InvalidBase(_))));
    }

    #[test]
    fn test_unicode_modifier_count() {
        let unicode = UnicodeConfig {
            modifiers: Some(vec!["LEFT_CTRL".to_string()]),
            combinator: None,
            confirm: None,
        };
        assert!(matches!(unicode.to_entry_keys(), Err(ConfigError::InvalidKey(_))));
    }

    #[test]
    fn test_unicode_override() {
        let unicode = UnicodeConfig {
            modifiers: Some(vec!["RIGHT_CTRL".to_string(), "RIGHT_SHIFT".to_string()]),
            combinator: Some("U".to_string()),
            confirm: Some("SPACE".to_string()),
        };
        let keys = unicode.to_entry_keys().unwrap();
        assert_eq!(keys.modifiers[1], Key::RIGHT_SHIFT);
        assert_eq!(keys.confirm, Key::SPACE);
    }
}
