//! Turning resolved notes into projectiles and sound.

use std::ops::{Add, Mul};

use serde::{Deserialize, Serialize};

use crate::note::{AttackMode, Note};

/// Sound style played for every note.
pub const DEFAULT_SOUND_STYLE: u32 = 26;

/// Distance between neighbouring projectiles, in multiples of the aim speed.
pub const DEFAULT_SPREAD: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2::new(0.0, 0.0);

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Rotates counter-clockwise by 90 degrees.
    pub fn rotated_quarter_turn(self) -> Self {
        Self::new(-self.y, self.x)
    }

    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Unit vector in the same direction, or zero for a zero vector.
    pub fn normalized(self) -> Self {
        let len = self.length();
        if len <= f32::EPSILON {
            Self::ZERO
        } else {
            self * (1.0 / len)
        }
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Self) -> Self::Output {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Self::Output {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// Identity of the player holding the weapon. Owns the spawned projectiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct HolderId(pub u32);

/// Per-tick ambient parameters the host passes alongside the trigger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmissionContext {
    pub position: Vec2,
    pub aim_velocity: Vec2,
    pub base_damage: i32,
    pub knockback: f32,
    pub holder: HolderId,
}

impl EmissionContext {
    /// Resolves the context against a note, applying its damage multiplier.
    pub fn request_for(&self, note: &Note) -> EmissionRequest {
        EmissionRequest {
            position: self.position,
            velocity: self.aim_velocity,
            damage: note.scaled_damage(self.base_damage),
            knockback: self.knockback,
            holder: self.holder,
        }
    }
}

/// Fully resolved parameters handed to a sink together with the note.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmissionRequest {
    pub position: Vec2,
    pub velocity: Vec2,
    pub damage: i32,
    pub knockback: f32,
    pub holder: HolderId,
}

/// Receives every note the sequencer fires.
pub trait EmissionSink {
    fn emit(&mut self, note: &Note, request: &EmissionRequest);
}

impl<F> EmissionSink for F
where
    F: FnMut(&Note, &EmissionRequest),
{
    fn emit(&mut self, note: &Note, request: &EmissionRequest) {
        self(note, request)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectileKind {
    Amethyst,
    Emerald,
    Amber,
}

impl ProjectileKind {
    /// Maps a note kind to a projectile, falling back to [`ProjectileKind::Amethyst`].
    pub fn from_note_kind(kind: u32) -> Self {
        match kind {
            1 => Self::Emerald,
            2 => Self::Amber,
            _ => Self::Amethyst,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub kind: ProjectileKind,
    pub position: Vec2,
    pub velocity: Vec2,
    pub damage: i32,
    pub knockback: f32,
    pub owner: HolderId,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoundCue {
    pub style: u32,
    pub position: Vec2,
    pub pitch: f32,
}

/// Everything produced by one note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Emission {
    pub note: Note,
    pub projectiles: Vec<Projectile>,
    pub cue: SoundCue,
}

/// Offset of projectile `i` along the perpendicular, in spread units.
///
/// Offsets alternate sides and grow by one unit every two projectiles. An even
/// total count is shifted by half a unit so the fan stays centred.
pub fn fan_offset(i: u32, total: u32) -> f32 {
    let step = ((i + 1) >> 1) as f32;
    let side = if i & 1 == 0 { 1.0 } else { -1.0 };
    let bias = if total & 1 == 0 { 0.5 } else { 0.0 };
    step * side + bias
}

/// Lays out the projectiles for a note.
pub fn fan_out(note: &Note, request: &EmissionRequest, spread: f32) -> Vec<Projectile> {
    let kind = ProjectileKind::from_note_kind(note.kind);
    match note.mode {
        AttackMode::Normal => {
            let perp = request.velocity.rotated_quarter_turn() * spread;
            let total = note.projectile_count();
            (0..total)
                .map(|i| Projectile {
                    kind,
                    position: request.position + perp * fan_offset(i, total),
                    velocity: request.velocity,
                    damage: request.damage,
                    knockback: request.knockback,
                    owner: request.holder,
                })
                .collect()
        }
    }
}

/// Sink that resolves notes into projectile fans and keeps them in order.
#[derive(Debug, Clone)]
pub struct ProjectileSink {
    spread: f32,
    sound_style: u32,
    emissions: Vec<Emission>,
}

impl Default for ProjectileSink {
    fn default() -> Self {
        Self::new(DEFAULT_SPREAD, DEFAULT_SOUND_STYLE)
    }
}

impl ProjectileSink {
    pub fn new(spread: f32, sound_style: u32) -> Self {
        Self {
            spread,
            sound_style,
            emissions: Vec::new(),
        }
    }

    pub fn emissions(&self) -> &[Emission] {
        &self.emissions
    }

    pub fn last(&self) -> Option<&Emission> {
        self.emissions.last()
    }

    /// Hands the recorded emissions to the caller, leaving the log empty.
    pub fn drain(&mut self) -> Vec<Emission> {
        std::mem::take(&mut self.emissions)
    }
}

impl EmissionSink for ProjectileSink {
    fn emit(&mut self, note: &Note, request: &EmissionRequest) {
        let projectiles = fan_out(note, request, self.spread);
        tracing::debug!(
            kind = note.kind,
            count = projectiles.len(),
            damage = request.damage,
            pitch = note.pitch,
            "note emitted"
        );
        self.emissions.push(Emission {
            note: *note,
            projectiles,
            cue: SoundCue {
                style: self.sound_style,
                position: request.position,
                pitch: note.pitch,
            },
        });
    }
}
