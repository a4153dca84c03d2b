//! Octave State
//!
//! Per-octave record holding the 5-slot ring of filtered values, the
//! decimation toggle, the warm-up flag, the last two amplitude estimates
//! and the quadrature phase.
//!
//! Ring slots are numbered 1..=5. `write_pointer` names the slot the next
//! update overwrites; once an update has advanced it, the slot under the
//! pointer holds the oldest value and the slot before it the newest.

use crate::phase::Quadrant;

/// Number of filtered values kept per octave (one measured cycle)
pub const RING_DEPTH: usize = 5;

//=============================================================================
// Ring indexing
//=============================================================================

/// Advance a ring pointer by one slot, wrapping 5 back to 1.
///
/// Any out-of-range pointer normalizes to slot 1.
#[inline]
pub fn next_slot(pointer: usize) -> usize {
    if (1..RING_DEPTH).contains(&pointer) {
        pointer + 1
    } else {
        1
    }
}

/// Step a ring pointer back by one slot, wrapping 1 back to 5.
#[inline]
pub fn prev_slot(pointer: usize) -> usize {
    if (2..=RING_DEPTH).contains(&pointer) {
        pointer - 1
    } else {
        RING_DEPTH
    }
}

/// Rotate the physical ring into chronological order `(s1..s5)`.
///
/// `ring[0]` is slot 1. With the pointer at slot `p`, `s1` is slot `p`
/// (next to be overwritten) and `s5` is the slot just before it.
#[inline]
pub fn reconstruct(ring: &[i64; RING_DEPTH], write_pointer: usize) -> [i64; RING_DEPTH] {
    let start = write_pointer.clamp(1, RING_DEPTH) - 1;
    let mut ordered = [0; RING_DEPTH];
    for (k, value) in ordered.iter_mut().enumerate() {
        *value = ring[(start + k) % RING_DEPTH];
    }
    ordered
}

//=============================================================================
// Octave State
//=============================================================================

/// State of one octave in one branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OctaveState {
    ring: [i64; RING_DEPTH],
    write_pointer: usize,
    ready: bool,
    started: bool,
    amplitude: i64,
    previous_amplitude: i64,
    phase: Quadrant,
    cumulative_phase_shift: i64,
    updates: u64,
}

impl Default for OctaveState {
    fn default() -> Self {
        Self {
            ring: [0; RING_DEPTH],
            write_pointer: 1,
            ready: false,
            started: false,
            amplitude: 0,
            previous_amplitude: 0,
            phase: Quadrant::First,
            cumulative_phase_shift: 0,
            updates: 0,
        }
    }
}

impl OctaveState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return to the zeroed start-of-run state
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Write a filtered value into the ring and advance the pointer.
    ///
    /// The update that fills the last empty slot marks the octave started.
    pub fn push(&mut self, value: i64) {
        if !self.started && self.write_pointer == RING_DEPTH {
            self.started = true;
        }
        self.ring[self.write_pointer - 1] = value;
        self.write_pointer = next_slot(self.write_pointer);
        self.updates += 1;
    }

    /// The 5 ring values, oldest first
    #[inline]
    pub fn chronological(&self) -> [i64; RING_DEPTH] {
        reconstruct(&self.ring, self.write_pointer)
    }

    /// Most recently written value
    #[inline]
    pub fn newest(&self) -> i64 {
        self.ring[prev_slot(self.write_pointer) - 1]
    }

    /// The two most recently written values as `(newest, one before)`
    #[inline]
    pub fn newest_pair(&self) -> (i64, i64) {
        let last = prev_slot(self.write_pointer);
        (self.ring[last - 1], self.ring[prev_slot(last) - 1])
    }

    /// Shift the current amplitude into `previous` and store a new one
    #[inline]
    pub fn record_amplitude(&mut self, amplitude: i64) {
        self.previous_amplitude = self.amplitude;
        self.amplitude = amplitude;
    }

    #[inline]
    pub(crate) fn set_phase(&mut self, phase: Quadrant, delta: i64) {
        self.phase = phase;
        self.cumulative_phase_shift += delta;
    }

    #[inline]
    pub(crate) fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    /// Physical ring contents, slot 1 first
    pub fn ring(&self) -> &[i64; RING_DEPTH] {
        &self.ring
    }

    pub fn write_pointer(&self) -> usize {
        self.write_pointer
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Whether the ring holds one full cycle
    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn amplitude(&self) -> i64 {
        self.amplitude
    }

    pub fn previous_amplitude(&self) -> i64 {
        self.previous_amplitude
    }

    pub fn phase(&self) -> Quadrant {
        self.phase
    }

    pub fn cumulative_phase_shift(&self) -> i64 {
        self.cumulative_phase_shift
    }

    /// Number of updates applied since start or last reset
    pub fn update_count(&self) -> u64 {
        self.updates
    }
}
