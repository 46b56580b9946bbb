use serde::{Deserialize, Serialize};

/// Pattern used to lay out the projectiles of a single note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub enum AttackMode {
    /// Fan of parallel projectiles centred on the aim line.
    #[default]
    Normal,
}

/// Parameters of one emission event produced by a song.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Note {
    /// Emission variant selector. Unknown values resolve to the default
    /// projectile kind at the sink.
    pub kind: u32,
    /// Ticks to wait before the next note may fire.
    pub delay: i32,
    pub pitch: f32,
    pub damage_multiplier: f32,
    /// Projectiles fired in addition to the primary one.
    pub extra_count: u32,
    pub mode: AttackMode,
}

impl Note {
    /// Note played when no song is attached.
    pub const DEFAULT: Note = Note::new(0, 65);

    pub const fn new(kind: u32, delay: i32) -> Self {
        Self {
            kind,
            delay,
            pitch: 1.0,
            damage_multiplier: 1.0,
            extra_count: 0,
            mode: AttackMode::Normal,
        }
    }

    pub const fn with_pitch(mut self, pitch: f32) -> Self {
        self.pitch = pitch;
        self
    }

    pub const fn with_damage_multiplier(mut self, damage_multiplier: f32) -> Self {
        self.damage_multiplier = damage_multiplier;
        self
    }

    pub const fn with_extra_count(mut self, extra_count: u32) -> Self {
        self.extra_count = extra_count;
        self
    }

    /// Total number of projectiles this note fires.
    pub fn projectile_count(&self) -> u32 {
        self.extra_count.saturating_add(1)
    }

    /// Scales a base damage value, truncating toward zero.
    pub fn scaled_damage(&self, base_damage: i32) -> i32 {
        (base_damage as f32 * self.damage_multiplier) as i32
    }
}

impl Default for Note {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_note_matches_songless_values() {
        let note = Note::default();
        assert_eq!(note.kind, 0);
        assert_eq!(note.delay, 65);
        assert_eq!(note.pitch, 1.0);
        assert_eq!(note.damage_multiplier, 1.0);
        assert_eq!(note.extra_count, 0);
        assert_eq!(note.mode, AttackMode::Normal);
    }

    #[test]
    fn builders_only_touch_their_field() {
        let note = Note::new(2, 40).with_pitch(0.1).with_extra_count(3);
        assert_eq!(note.kind, 2);
        assert_eq!(note.delay, 40);
        assert!((note.pitch - 0.1).abs() <= f32::EPSILON);
        assert_eq!(note.damage_multiplier, 1.0);
        assert_eq!(note.projectile_count(), 4);
    }

    #[test]
    fn scaled_damage_truncates() {
        let note = Note::new(0, 25).with_damage_multiplier(1.5);
        assert_eq!(note.scaled_damage(17), 25);
        assert_eq!(Note::DEFAULT.scaled_damage(17), 17);
    }
}
