//! Song sources: pure `index -> Note` generators that can be slotted into a
//! weapon at any time.

use std::{collections::BTreeMap, fmt, sync::Arc};

use crate::note::Note;

/// A song is a total function from a sequence index to the note to play.
///
/// Implementations hold no mutable state. The index is owned by the caller,
/// and every index must produce a note, wrapping or extrapolating when it
/// runs past the written pattern.
pub trait SongSource: Send + Sync {
    /// Stable identifier used when the song is persisted.
    fn key(&self) -> &str;

    /// Name shown to players.
    fn display_name(&self) -> &str;

    fn next_note(&self, index: u32) -> Note;
}

impl fmt::Debug for dyn SongSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SongSource")
            .field("key", &self.key())
            .finish()
    }
}

/// Cycles three note kinds with a fan that widens by one projectile per note.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProofOfConceptSong;

impl SongSource for ProofOfConceptSong {
    fn key(&self) -> &str {
        "proof_of_concept"
    }

    fn display_name(&self) -> &str {
        "Proof of Concept Song"
    }

    fn next_note(&self, index: u32) -> Note {
        Note::new(index % 3, 45).with_extra_count(index)
    }
}

/// Eleven step phrase whose damage grows by one multiple per completed lap.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExampleSong;

impl ExampleSong {
    pub const PHRASE_LEN: u32 = 11;
}

impl SongSource for ExampleSong {
    fn key(&self) -> &str {
        "example"
    }

    fn display_name(&self) -> &str {
        "Example Song"
    }

    fn next_note(&self, index: u32) -> Note {
        let lap = (index / Self::PHRASE_LEN) as f32 + 1.0;
        let note = match index % Self::PHRASE_LEN {
            0 | 3 | 6 => Note::new(0, 25).with_pitch(0.5),
            1 | 4 | 7 => Note::new(1, 25).with_pitch(0.25),
            2 | 5 | 10 => Note::new(2, 60).with_pitch(0.1),
            8 => Note::new(2, 40).with_pitch(0.1),
            _ => Note::new(1, 40).with_pitch(0.25),
        };
        note.with_damage_multiplier(lap)
    }
}

/// Anything a player can offer to a weapon's song slot.
#[derive(Clone, Default)]
pub enum SlotItem {
    /// Nothing held.
    #[default]
    Empty,
    Song(Arc<dyn SongSource>),
    /// An item that is not a song sheet.
    Other { name: String },
}

impl SlotItem {
    pub fn song<S: SongSource + 'static>(song: S) -> Self {
        Self::Song(Arc::new(song))
    }

    pub fn display_name(&self) -> Option<&str> {
        match self {
            Self::Empty => None,
            Self::Song(song) => Some(song.display_name()),
            Self::Other { name } => Some(name),
        }
    }
}

impl From<Option<Arc<dyn SongSource>>> for SlotItem {
    fn from(value: Option<Arc<dyn SongSource>>) -> Self {
        value.map_or(Self::Empty, Self::Song)
    }
}

impl fmt::Debug for SlotItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("Empty"),
            Self::Song(song) => f.debug_tuple("Song").field(&song.key()).finish(),
            Self::Other { name } => f.debug_struct("Other").field("name", name).finish(),
        }
    }
}

/// Registry that resolves persisted song keys back into song sources.
#[derive(Clone, Default)]
pub struct SongLibrary {
    songs: BTreeMap<String, Arc<dyn SongSource>>,
}

impl SongLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Library holding every song shipped with the crate.
    pub fn builtin() -> Self {
        let mut library = Self::new();
        library.register(Arc::new(ProofOfConceptSong));
        library.register(Arc::new(ExampleSong));
        library
    }

    /// Registers a song under its key, replacing any previous entry.
    pub fn register(&mut self, song: Arc<dyn SongSource>) {
        self.songs.insert(song.key().to_string(), song);
    }

    pub fn get(&self, key: &str) -> Option<Arc<dyn SongSource>> {
        self.songs.get(key).cloned()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.songs.keys().map(String::as_str)
    }

    pub fn songs(&self) -> impl Iterator<Item = &Arc<dyn SongSource>> {
        self.songs.values()
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }
}

impl fmt::Debug for SongLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.songs.keys()).finish()
    }
}
