//! Per-holder state machine that walks a song one trigger press at a time.
//!
//! The host calls [`NoteSequencer::advance`] and [`NoteSequencer::try_emit`]
//! once per tick while the weapon is held. `advance` runs the countdown;
//! `try_emit` watches the trigger for rising edges and fires the next note
//! when the gate is open.

use std::sync::Arc;

use crate::{
    emission::{EmissionContext, EmissionSink},
    note::Note,
    song::{SlotItem, SongSource},
};

/// Half-width of the band around the gate boundary. The gate opens once the
/// countdown drops below this value and the countdown floors at its negation.
pub const PRECISION: i32 = 5;

/// Whether the next trigger press may fire a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// Countdown is below [`PRECISION`].
    Open,
    /// Still waiting out the previous note's delay.
    Closed,
    /// The holder stopped using the weapon; the next press restarts the song.
    AwaitingRestart,
}

/// Trigger inputs for one host tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TriggerInput {
    pub trigger_held: bool,
    pub animation_ended: bool,
}

impl TriggerInput {
    pub fn held() -> Self {
        Self {
            trigger_held: true,
            animation_ended: false,
        }
    }

    pub fn released() -> Self {
        Self::default()
    }
}

/// What happened during one call to [`NoteSequencer::try_emit`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickOutcome {
    /// The host should keep the holder's use animation running.
    pub sustain_animation: bool,
    pub emitted: Option<Note>,
}

#[derive(Debug, Clone)]
pub struct NoteSequencer {
    current_index: u32,
    countdown: i32,
    previous_trigger_held: bool,
    pending_restart: bool,
    attached_song: Option<Arc<dyn SongSource>>,
    default_note: Note,
}

impl Default for NoteSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl NoteSequencer {
    pub fn new() -> Self {
        Self::with_default_note(Note::DEFAULT)
    }

    /// Creates a sequencer that plays `default_note` while no song is attached.
    pub fn with_default_note(default_note: Note) -> Self {
        Self {
            current_index: 0,
            countdown: 0,
            previous_trigger_held: false,
            pending_restart: false,
            attached_song: None,
            default_note,
        }
    }

    /// Index of the next note requested from the song.
    pub fn current_index(&self) -> u32 {
        self.current_index
    }

    /// Ticks until the gate opens, floored at `-PRECISION`.
    pub fn countdown(&self) -> i32 {
        self.countdown
    }

    pub fn pending_restart(&self) -> bool {
        self.pending_restart
    }

    pub fn attached_song(&self) -> Option<&Arc<dyn SongSource>> {
        self.attached_song.as_ref()
    }

    pub fn gate_state(&self) -> GateState {
        if self.pending_restart {
            GateState::AwaitingRestart
        } else if self.gate_open() {
            GateState::Open
        } else {
            GateState::Closed
        }
    }

    /// True while the countdown sits in `[-PRECISION, PRECISION)`, the window a
    /// charge indicator animates across.
    pub fn in_hysteresis_band(&self) -> bool {
        (-PRECISION..PRECISION).contains(&self.countdown)
    }

    fn gate_open(&self) -> bool {
        self.countdown < PRECISION
    }

    /// Note the sequencer would play at `index` with the current song.
    pub fn note_at(&self, index: u32) -> Note {
        self.attached_song
            .as_ref()
            .map_or(self.default_note, |song| song.next_note(index))
    }

    /// Runs the countdown. Once it has bottomed out, an ended use animation
    /// arms a restart.
    pub fn advance(&mut self, input: TriggerInput) {
        if self.countdown > -PRECISION {
            self.countdown -= 1;
        } else if input.animation_ended && !self.pending_restart {
            tracing::trace!(index = self.current_index, "restart armed");
            self.pending_restart = true;
        }
    }

    /// Fires the next note on a rising trigger edge while the gate is open.
    pub fn try_emit(
        &mut self,
        trigger_held: bool,
        ctx: &EmissionContext,
        sink: &mut dyn EmissionSink,
    ) -> TickOutcome {
        let mut outcome = TickOutcome::default();
        let use_restart = self.pending_restart && trigger_held;
        if use_restart {
            self.current_index = 0;
            self.previous_trigger_held = false;
        }

        if self.countdown <= -PRECISION && !use_restart {
            return outcome;
        }
        outcome.sustain_animation = true;

        if !trigger_held {
            self.previous_trigger_held = false;
            return outcome;
        }

        if !self.previous_trigger_held || use_restart {
            if self.gate_open() {
                self.pending_restart = false;
                let note = self.note_at(self.current_index);
                self.current_index = self.current_index.saturating_add(1);
                self.countdown = note.delay;
                sink.emit(&note, &ctx.request_for(&note));
                outcome.emitted = Some(note);
            } else {
                // early press: drop to the floor, only a restart fires again
                self.countdown = -PRECISION;
            }
        }
        self.previous_trigger_held = true;
        outcome
    }

    /// One full host tick: countdown first, then the trigger check.
    pub fn tick(
        &mut self,
        input: TriggerInput,
        ctx: &EmissionContext,
        sink: &mut dyn EmissionSink,
    ) -> TickOutcome {
        self.advance(input);
        self.try_emit(input.trigger_held, ctx, sink)
    }

    /// Puts an item into the song slot.
    ///
    /// Returns `false` without touching any state when the item is not a song.
    /// Accepting a song keeps the current index and countdown, so the new song
    /// picks up where the old one left off.
    pub fn attach_song(&mut self, item: SlotItem) -> bool {
        match item {
            SlotItem::Empty => {
                self.attached_song = None;
                true
            }
            SlotItem::Song(song) => {
                tracing::debug!(song = song.key(), index = self.current_index, "song attached");
                self.attached_song = Some(song);
                true
            }
            SlotItem::Other { name } => {
                tracing::debug!(item = %name, "rejected non-song item");
                false
            }
        }
    }

    /// Exchanges the item on the cursor with the attached song.
    ///
    /// On success `cursor` holds whatever was in the slot before.
    pub fn swap_song(&mut self, cursor: &mut SlotItem) -> bool {
        let previous = SlotItem::from(self.attached_song.clone());
        if self.attach_song(cursor.clone()) {
            *cursor = previous;
            true
        } else {
            false
        }
    }

    pub fn current_song_display_name(&self) -> String {
        self.attached_song
            .as_ref()
            .map_or_else(|| "None".to_string(), |song| song.display_name().to_string())
    }
}
