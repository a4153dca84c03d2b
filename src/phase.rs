//! Quadrature Phase Tracker
//!
//! Four-state cyclic automaton per octave, driven by the signs of the
//! current and previous amplitude. Every visit applies exactly one
//! transition: forward (clockwise, +1) when the state's sign condition
//! holds, backward (-1) otherwise. A zero amplitude never satisfies a
//! sign condition, so ties fall backward.
//!
//! | state | forward when          | forward | backward |
//! |-------|-----------------------|---------|----------|
//! | 1     | current > 0, prev > 0 | 2       | 4        |
//! | 2     | current < 0, prev > 0 | 3       | 1        |
//! | 3     | current < 0, prev < 0 | 4       | 2        |
//! | 4     | current > 0, prev < 0 | 1       | 3        |
//!
//! A rising cumulative shift means the wavelength followed at this octave
//! is lengthening; a falling one means it is shortening.

use std::fmt;

use crate::octave::OctaveState;

//=============================================================================
// Quadrant
//=============================================================================

/// One of the four quadrants of a measured cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Quadrant {
    #[default]
    First,
    Second,
    Third,
    Fourth,
}

impl Quadrant {
    /// Quadrant number, 1..=4
    pub const fn number(self) -> u8 {
        match self {
            Quadrant::First => 1,
            Quadrant::Second => 2,
            Quadrant::Third => 3,
            Quadrant::Fourth => 4,
        }
    }

    const fn index(self) -> usize {
        self.number() as usize - 1
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

//=============================================================================
// Transition table
//=============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sign {
    Positive,
    Negative,
}

impl Sign {
    #[inline]
    fn holds(self, value: i64) -> bool {
        match self {
            Sign::Positive => value > 0,
            Sign::Negative => value < 0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Transition {
    current: Sign,
    previous: Sign,
    forward: Quadrant,
    backward: Quadrant,
}

const TRANSITIONS: [Transition; 4] = [
    Transition {
        current: Sign::Positive,
        previous: Sign::Positive,
        forward: Quadrant::Second,
        backward: Quadrant::Fourth,
    },
    Transition {
        current: Sign::Negative,
        previous: Sign::Positive,
        forward: Quadrant::Third,
        backward: Quadrant::First,
    },
    Transition {
        current: Sign::Negative,
        previous: Sign::Negative,
        forward: Quadrant::Fourth,
        backward: Quadrant::Second,
    },
    Transition {
        current: Sign::Positive,
        previous: Sign::Negative,
        forward: Quadrant::First,
        backward: Quadrant::Third,
    },
];

/// Next quadrant and shift delta (+1 forward, -1 backward)
#[inline]
pub fn transition(state: Quadrant, current: i64, previous: i64) -> (Quadrant, i64) {
    let row = &TRANSITIONS[state.index()];
    if row.current.holds(current) && row.previous.holds(previous) {
        (row.forward, 1)
    } else {
        (row.backward, -1)
    }
}

/// Apply one transition from the octave's stored amplitudes
#[inline]
pub fn track(state: &mut OctaveState) -> i64 {
    let (next, delta) = transition(state.phase(), state.amplitude(), state.previous_amplitude());
    state.set_phase(next, delta);
    delta
}
