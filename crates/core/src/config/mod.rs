use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    emission::{DEFAULT_SOUND_STYLE, DEFAULT_SPREAD},
    note::Note,
    weapon::WeaponStats,
    Result,
};

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub sequencer: SequencerConfig,
    pub weapon: WeaponConfig,
}

impl AppConfig {
    /// Parses a JSON document; missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }
}

/// Configuration specific to the note sequencer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SequencerConfig {
    /// Note played when no song is attached.
    pub default_note: Note,
}

/// Configuration for the held weapon and its emissions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponConfig {
    pub stats: WeaponStats,
    pub spread: f32,
    pub sound_style: u32,
}

impl Default for WeaponConfig {
    fn default() -> Self {
        Self {
            stats: WeaponStats::default(),
            spread: DEFAULT_SPREAD,
            sound_style: DEFAULT_SOUND_STYLE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = AppConfig::from_json_str("{}").unwrap();
        assert_eq!(config.sequencer.default_note, Note::DEFAULT);
        assert_eq!(config.weapon.stats.damage, 17);
        assert_eq!(config.weapon.sound_style, DEFAULT_SOUND_STYLE);
    }

    #[test]
    fn partial_document_overrides_fields() {
        let json = r#"{ "weapon": { "stats": { "damage": 40 }, "spread": 1.0 } }"#;
        let config = AppConfig::from_json_str(json).unwrap();
        assert_eq!(config.weapon.stats.damage, 40);
        assert_eq!(config.weapon.stats.use_animation, 17);
        assert_eq!(config.weapon.spread, 1.0);
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bard.json");
        std::fs::write(&path, r#"{ "weapon": { "stats": { "knockback": 4.5 } } }"#).unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.weapon.stats.knockback, 4.5);
        assert_eq!(config.weapon.stats.damage, 17);
    }

    #[test]
    fn loading_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, crate::BardError::Io(_)), "unexpected error {err:?}");
    }

    #[test]
    fn malformed_document_is_an_error() {
        let err = AppConfig::from_json_str("{ weapon").unwrap_err();
        assert!(format!("{err}").contains("invalid json"));
    }
}
