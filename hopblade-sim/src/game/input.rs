//! Input Sampling and Recording
//!
//! The simulation never reads devices. A host turns held button levels into
//! one frozen [`InputSnapshot`] per tick through an [`InputSampler`], which
//! owns the only piece of input history (the previous jump level) needed to
//! detect the press edge.

use serde::{Serialize, Deserialize};

use crate::core::hash::{StateHash, StateHasher};

// =============================================================================
// SNAPSHOT
// =============================================================================

/// Input state for a single tick.
///
/// Packed into one byte so recordings stay small.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct InputSnapshot {
    /// Action flags (packed bits):
    /// - Bit 0: Move left held
    /// - Bit 1: Move right held
    /// - Bit 2: Jump held
    /// - Bit 3: Jump pressed this tick (released -> pressed edge)
    /// - Bit 4: Swing pressed
    /// - Bit 5: Confirm pressed
    /// - Bit 6-7: Reserved
    pub flags: u8,
}

impl InputSnapshot {
    /// Move left flag bit
    pub const MOVE_LEFT: u8 = 0x01;
    /// Move right flag bit
    pub const MOVE_RIGHT: u8 = 0x02;
    /// Jump held flag bit
    pub const JUMP_HELD: u8 = 0x04;
    /// Jump edge flag bit
    pub const JUMP_PRESSED: u8 = 0x08;
    /// Swing flag bit
    pub const SWING: u8 = 0x10;
    /// Confirm flag bit
    pub const CONFIRM: u8 = 0x20;

    /// Create an idle snapshot (nothing pressed).
    pub const fn new() -> Self {
        Self { flags: 0 }
    }

    /// Create a snapshot from raw flag bits.
    pub const fn from_flags(flags: u8) -> Self {
        Self { flags }
    }

    /// Return a copy with the given flag bits set.
    pub const fn with(self, flags: u8) -> Self {
        Self { flags: self.flags | flags }
    }

    /// Snapshot for the tick a jump begins: held and pressed.
    pub const fn jump_press() -> Self {
        Self::from_flags(Self::JUMP_HELD | Self::JUMP_PRESSED)
    }

    #[inline]
    fn has(&self, flag: u8) -> bool {
        self.flags & flag != 0
    }

    #[inline]
    fn set(&mut self, flag: u8, on: bool) {
        if on {
            self.flags |= flag;
        } else {
            self.flags &= !flag;
        }
    }

    /// Move left is held.
    #[inline]
    pub fn move_left(&self) -> bool {
        self.has(Self::MOVE_LEFT)
    }

    /// Move right is held.
    #[inline]
    pub fn move_right(&self) -> bool {
        self.has(Self::MOVE_RIGHT)
    }

    /// Jump is held (level).
    #[inline]
    pub fn jump_held(&self) -> bool {
        self.has(Self::JUMP_HELD)
    }

    /// Jump went from released to pressed on this tick (edge).
    #[inline]
    pub fn jump_pressed_this_tick(&self) -> bool {
        self.has(Self::JUMP_PRESSED)
    }

    /// Swing is pressed.
    #[inline]
    pub fn swing_pressed(&self) -> bool {
        self.has(Self::SWING)
    }

    /// Confirm is pressed.
    #[inline]
    pub fn confirm_pressed(&self) -> bool {
        self.has(Self::CONFIRM)
    }

    /// Set move left.
    #[inline]
    pub fn set_move_left(&mut self, on: bool) {
        self.set(Self::MOVE_LEFT, on);
    }

    /// Set move right.
    #[inline]
    pub fn set_move_right(&mut self, on: bool) {
        self.set(Self::MOVE_RIGHT, on);
    }

    /// Set jump held.
    #[inline]
    pub fn set_jump_held(&mut self, on: bool) {
        self.set(Self::JUMP_HELD, on);
    }

    /// Set jump edge.
    #[inline]
    pub fn set_jump_pressed(&mut self, on: bool) {
        self.set(Self::JUMP_PRESSED, on);
    }

    /// Set swing.
    #[inline]
    pub fn set_swing(&mut self, on: bool) {
        self.set(Self::SWING, on);
    }

    /// Set confirm.
    #[inline]
    pub fn set_confirm(&mut self, on: bool) {
        self.set(Self::CONFIRM, on);
    }

    /// No input at all.
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.flags == 0
    }
}

// =============================================================================
// SAMPLER
// =============================================================================

/// Held button levels as read from a device on one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RawButtons {
    /// Left is down
    pub left: bool,
    /// Right is down
    pub right: bool,
    /// Jump is down
    pub jump: bool,
    /// Swing is down
    pub swing: bool,
    /// Confirm is down
    pub confirm: bool,
}

/// Turns raw button levels into per-tick snapshots.
///
/// Call [`sample`](Self::sample) exactly once per tick; the jump edge is
/// relative to the previous call.
#[derive(Clone, Copy, Debug, Default)]
pub struct InputSampler {
    jump_was_held: bool,
}

impl InputSampler {
    /// Create a sampler that treats jump as previously released.
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce this tick's snapshot.
    pub fn sample(&mut self, raw: RawButtons) -> InputSnapshot {
        let mut snapshot = InputSnapshot::new();
        snapshot.set_move_left(raw.left);
        snapshot.set_move_right(raw.right);
        snapshot.set_jump_held(raw.jump);
        snapshot.set_jump_pressed(raw.jump && !self.jump_was_held);
        snapshot.set_swing(raw.swing);
        snapshot.set_confirm(raw.confirm);

        self.jump_was_held = raw.jump;
        snapshot
    }

    /// Forget the previous jump level.
    pub fn reset(&mut self) {
        self.jump_was_held = false;
    }
}

// =============================================================================
// RECORDING
// =============================================================================

/// A snapshot change at a given tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputDelta {
    /// Tick when this input state began
    pub tick: u32,
    /// The new input state
    pub snapshot: InputSnapshot,
}

impl InputDelta {
    /// Create new delta entry.
    pub fn new(tick: u32, snapshot: InputSnapshot) -> Self {
        Self { tick, snapshot }
    }
}

/// Input recording of one session, for replay.
///
/// Only ticks where the snapshot CHANGES are stored.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct InputRecording {
    /// First tick covered, set by the first [`record`](Self::record)
    pub start_tick: u32,

    /// Last tick covered; `None` while nothing has been recorded
    pub end_tick: Option<u32>,

    deltas: Vec<InputDelta>,

    #[serde(skip)]
    last_snapshot: InputSnapshot,
}

impl InputRecording {
    /// Create an empty recording.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the snapshot used on `tick`.
    pub fn record(&mut self, tick: u32, snapshot: InputSnapshot) {
        if self.end_tick.is_none() {
            self.start_tick = tick;
        }
        self.end_tick = Some(tick);

        if snapshot != self.last_snapshot {
            self.deltas.push(InputDelta::new(tick, snapshot));
            self.last_snapshot = snapshot;
        }
    }

    /// Snapshot in effect at `tick` (idle before the first change).
    pub fn get_input_at(&self, tick: u32) -> InputSnapshot {
        let idx = self.deltas.partition_point(|d| d.tick <= tick);

        if idx == 0 {
            InputSnapshot::new()
        } else {
            self.deltas[idx - 1].snapshot
        }
    }

    /// All stored changes.
    pub fn deltas(&self) -> &[InputDelta] {
        &self.deltas
    }

    /// Number of stored changes.
    pub fn delta_count(&self) -> usize {
        self.deltas.len()
    }

    /// Number of ticks covered.
    pub fn tick_count(&self) -> u32 {
        self.covered_ticks().min(u64::from(u32::MAX)) as u32
    }

    fn covered_ticks(&self) -> u64 {
        match self.end_tick {
            Some(end) => u64::from(end.saturating_sub(self.start_tick)) + 1,
            None => 0,
        }
    }

    /// Is nothing covered?
    pub fn is_empty(&self) -> bool {
        self.end_tick.is_none()
    }

    /// Mark the last covered tick (trailing idle ticks included).
    pub fn finalize(&mut self, end_tick: u32) {
        self.end_tick = Some(end_tick);
    }

    /// Iterate `(tick, snapshot)` for every covered tick.
    pub fn replay_iter(&self) -> ReplayIterator<'_> {
        ReplayIterator {
            recording: self,
            current_tick: self.start_tick,
            remaining: self.covered_ticks(),
            delta_idx: 0,
            current: InputSnapshot::new(),
        }
    }

    /// Expand to one snapshot per tick.
    pub fn to_frames(&self) -> Vec<InputSnapshot> {
        self.replay_iter().map(|(_, snapshot)| snapshot).collect()
    }

    /// Hash the stored changes, for comparing recordings.
    pub fn compute_hash(&self) -> StateHash {
        let mut hasher = StateHasher::for_input_recording();
        hasher.update_u32(self.start_tick);
        hasher.update_bool(self.end_tick.is_some());
        hasher.update_u32(self.end_tick.unwrap_or(0));
        for delta in &self.deltas {
            hasher.update_u32(delta.tick);
            hasher.update_u8(delta.snapshot.flags);
        }
        hasher.finalize()
    }
}

/// Iterator for replaying inputs tick-by-tick.
pub struct ReplayIterator<'a> {
    recording: &'a InputRecording,
    current_tick: u32,
    remaining: u64,
    delta_idx: usize,
    current: InputSnapshot,
}

impl<'a> Iterator for ReplayIterator<'a> {
    type Item = (u32, InputSnapshot);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        while let Some(delta) = self.recording.deltas.get(self.delta_idx) {
            if delta.tick > self.current_tick {
                break;
            }
            self.current = delta.snapshot;
            self.delta_idx += 1;
        }

        let item = (self.current_tick, self.current);
        self.current_tick = self.current_tick.wrapping_add(1);
        Some(item)
    }
}

// =============================================================================
// TESTS
// =============================================================================
