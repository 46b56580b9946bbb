//! Saved weapon records.
//!
//! Only the identity of the attached song is written. Sequencer run-time state
//! (index, countdown, trigger and restart flags) starts fresh on every load.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    note::Note,
    sequencer::NoteSequencer,
    song::{SlotItem, SongLibrary},
    Result,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponSave {
    /// Key of the attached song, if any.
    #[serde(default, rename = "musicSheet")]
    pub music_sheet: Option<String>,
}

impl WeaponSave {
    pub fn capture(sequencer: &NoteSequencer) -> Self {
        Self {
            music_sheet: sequencer.attached_song().map(|song| song.key().to_string()),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses a saved record. Anything unreadable counts as an empty slot.
    pub fn from_json(json: &str) -> Self {
        serde_json::from_str(json).unwrap_or_else(|err| {
            tracing::warn!(%err, "discarding malformed weapon save");
            Self::default()
        })
    }

    /// Builds a fresh sequencer with the saved song attached.
    pub fn restore(&self, library: &SongLibrary, default_note: Note) -> NoteSequencer {
        let mut sequencer = NoteSequencer::with_default_note(default_note);
        if let Some(key) = &self.music_sheet {
            match library.get(key) {
                Some(song) => {
                    sequencer.attach_song(SlotItem::Song(song));
                }
                None => tracing::warn!(song = %key, "saved song is not registered"),
            }
        }
        sequencer
    }

    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        emission::{EmissionContext, EmissionRequest, HolderId, Vec2},
        song::ExampleSong,
        BardError,
    };

    #[test]
    fn saves_song_identity_only() {
        let mut sequencer = NoteSequencer::new();
        sequencer.attach_song(SlotItem::song(ExampleSong));
        let ctx = EmissionContext {
            position: Vec2::ZERO,
            aim_velocity: Vec2::new(6.0, 0.0),
            base_damage: 17,
            knockback: 0.0,
            holder: HolderId(0),
        };
        let mut sink = |_: &Note, _: &EmissionRequest| {};
        sequencer.try_emit(true, &ctx, &mut sink);
        assert_eq!(sequencer.current_index(), 1);

        let json = WeaponSave::capture(&sequencer).to_json().unwrap();
        assert!(json.contains("\"musicSheet\": \"example\""));

        let restored = WeaponSave::from_json(&json).restore(&SongLibrary::builtin(), Note::DEFAULT);
        assert_eq!(restored.current_song_display_name(), "Example Song");
        assert_eq!(restored.current_index(), 0);
        assert_eq!(restored.countdown(), 0);
        assert!(!restored.pending_restart());
    }

    #[test]
    fn empty_slot_round_trips_as_none() {
        let save = WeaponSave::capture(&NoteSequencer::new());
        assert_eq!(save.music_sheet, None);
        let json = save.to_json().unwrap();
        assert_eq!(WeaponSave::from_json(&json), save);
    }

    #[test]
    fn malformed_records_mean_no_song() {
        let library = SongLibrary::builtin();
        for json in ["not json", "{\"musicSheet\": 12}", "{\"musicSheet\": \"lost_song\"}"] {
            let restored = WeaponSave::from_json(json).restore(&library, Note::DEFAULT);
            assert!(restored.attached_song().is_none(), "{json}");
        }
    }

    #[test]
    fn writes_into_new_directories_and_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("players").join("bard").join("weapon.json");
        let mut sequencer = NoteSequencer::new();
        sequencer.attach_song(SlotItem::song(ExampleSong));

        WeaponSave::capture(&sequencer).write(&path).unwrap();
        assert!(path.exists());

        let loaded = WeaponSave::read(&path).unwrap();
        assert_eq!(loaded.music_sheet.as_deref(), Some("example"));
    }

    #[test]
    fn reading_garbage_file_yields_empty_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weapon.json");
        std::fs::write(&path, b"\x00 not a save").unwrap();

        assert_eq!(WeaponSave::read(&path).unwrap(), WeaponSave::default());
    }

    #[test]
    fn reading_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = WeaponSave::read(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, BardError::Io(_)), "unexpected error {err:?}");
    }

    #[test]
    fn missing_key_means_no_song() {
        assert_eq!(WeaponSave::from_json("{}"), WeaponSave::default());
    }
}
