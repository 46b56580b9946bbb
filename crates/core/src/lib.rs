//! Core library for the bard weapon.
//!
//! A [`NoteSequencer`] walks a [`SongSource`] one trigger press at a time and
//! hands each note to an [`EmissionSink`]. The host drives everything by
//! calling into the sequencer once per game tick; nothing here blocks or
//! spawns threads.

pub mod config;
pub mod emission;
pub mod error;
pub mod note;
pub mod persistence;
pub mod sequencer;
pub mod song;
pub mod tooltip;
pub mod weapon;

pub use config::{AppConfig, SequencerConfig, WeaponConfig};
pub use emission::{
    fan_out, Emission, EmissionContext, EmissionRequest, EmissionSink, HolderId, Projectile,
    ProjectileKind, ProjectileSink, SoundCue, Vec2,
};
pub use error::{BardError, Result};
pub use note::{AttackMode, Note};
pub use persistence::WeaponSave;
pub use sequencer::{GateState, NoteSequencer, TickOutcome, TriggerInput, PRECISION};
pub use song::{ExampleSong, ProofOfConceptSong, SlotItem, SongLibrary, SongSource};
pub use weapon::{BardWeapon, WeaponStats};
