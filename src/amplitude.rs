//! Amplitude Estimator
//!
//! Instantaneous single-cycle amplitude from the 5 most recent filtered
//! values of one octave, oldest `s1` to newest `s5`:
//!
//!   amplitude = (3*(s1 + s5) - 4*s3 - s2 - s4) / 8
//!
//! The endpoints and the centre carry the weight, the quarter-cycle
//! samples are suppressed. The weights sum to zero so a constant input
//! yields zero. Division truncates toward zero.

use crate::octave::{OctaveState, RING_DEPTH};

/// Apply the single-cycle weighting to chronological values `s1..s5`
#[inline]
pub fn estimate(s: &[i64; RING_DEPTH]) -> i64 {
    (3 * (s[0] + s[4]) - 4 * s[2] - s[1] - s[3]) / 8
}

/// Amplitude of an octave's ring, zero until the ring holds a full cycle
#[inline]
pub fn estimate_octave(state: &OctaveState) -> i64 {
    if state.is_started() {
        estimate(&state.chronological())
    } else {
        0
    }
}

/// Estimate and store the amplitude, shifting the old one into `previous`
#[inline]
pub fn update(state: &mut OctaveState) -> i64 {
    let amplitude = estimate_octave(state);
    state.record_amplitude(amplitude);
    amplitude
}
