//! A held bard weapon: stats, sequencer and sink wired to one holder.

use serde::{Deserialize, Serialize};

use crate::{
    config::AppConfig,
    emission::{Emission, EmissionContext, HolderId, ProjectileSink, Vec2},
    persistence::WeaponSave,
    sequencer::{NoteSequencer, TickOutcome, TriggerInput},
    tooltip,
};

/// Static item stats of the weapon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponStats {
    pub damage: i32,
    pub knockback: f32,
    /// Ticks one use animation lasts.
    pub use_animation: u32,
    pub shoot_speed: f32,
}

impl Default for WeaponStats {
    fn default() -> Self {
        Self {
            damage: 17,
            knockback: 0.0,
            use_animation: 17,
            shoot_speed: 6.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BardWeapon {
    stats: WeaponStats,
    sequencer: NoteSequencer,
    sink: ProjectileSink,
    animation: u32,
}

impl Default for BardWeapon {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

impl BardWeapon {
    pub fn from_config(config: &AppConfig) -> Self {
        let sequencer = NoteSequencer::with_default_note(config.sequencer.default_note);
        Self::with_sequencer(config, sequencer)
    }

    /// Builds a weapon around an existing sequencer, e.g. one restored from a save.
    pub fn with_sequencer(config: &AppConfig, sequencer: NoteSequencer) -> Self {
        Self {
            stats: config.weapon.stats,
            sequencer,
            sink: ProjectileSink::new(config.weapon.spread, config.weapon.sound_style),
            animation: 0,
        }
    }

    pub fn stats(&self) -> &WeaponStats {
        &self.stats
    }

    pub fn sequencer(&self) -> &NoteSequencer {
        &self.sequencer
    }

    pub fn sequencer_mut(&mut self) -> &mut NoteSequencer {
        &mut self.sequencer
    }

    pub fn emissions(&self) -> &[Emission] {
        self.sink.emissions()
    }

    pub fn take_emissions(&mut self) -> Vec<Emission> {
        self.sink.drain()
    }

    /// Ticks left in the holder's use animation.
    pub fn animation(&self) -> u32 {
        self.animation
    }

    pub fn animation_ended(&self) -> bool {
        self.animation == 0
    }

    /// Cuts the holder's use animation short, e.g. when the host interrupts
    /// the swing. Takes effect on the next [`BardWeapon::hold_tick`].
    pub fn end_animation(&mut self) {
        self.animation = 0;
    }

    /// Runs one host tick while the weapon is held.
    ///
    /// `aim_direction` does not need to be normalised; it is scaled to the
    /// weapon's shoot speed.
    pub fn hold_tick(
        &mut self,
        trigger_held: bool,
        position: Vec2,
        aim_direction: Vec2,
        holder: HolderId,
    ) -> TickOutcome {
        self.animation = self.animation.saturating_sub(1);
        let input = TriggerInput {
            trigger_held,
            animation_ended: self.animation_ended(),
        };
        let ctx = EmissionContext {
            position,
            aim_velocity: aim_direction.normalized() * self.stats.shoot_speed,
            base_damage: self.stats.damage,
            knockback: self.stats.knockback,
            holder,
        };

        let outcome = self.sequencer.tick(input, &ctx, &mut self.sink);
        if outcome.sustain_animation {
            self.animation = self.stats.use_animation.saturating_sub(1);
        }
        outcome
    }

    pub fn tooltip(&self) -> Vec<String> {
        tooltip::tooltip_lines(&self.sequencer)
    }

    pub fn save(&self) -> WeaponSave {
        WeaponSave::capture(&self.sequencer)
    }
}
