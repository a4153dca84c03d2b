//! Decimation Scheduler
//!
//! Each octave above a branch root carries a toggle. A visit from below
//! flips it; the octave only updates on every second visit, and when it
//! does not update the cascade stops there for the current sample. Octave
//! `o` therefore runs at half the rate of octave `o-1`.

use crate::octave::OctaveState;

/// Outcome of probing one octave's readiness toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    /// Update this octave and keep walking upward
    pub should_update: bool,
    /// Toggle value to store back into the octave
    pub new_ready: bool,
}

/// Pure toggle rule: `(ready) -> (should_update, new_ready)`.
#[inline]
pub const fn schedule(ready: bool) -> Schedule {
    Schedule {
        should_update: ready,
        new_ready: !ready,
    }
}

/// Probe an octave above the root and store its new toggle.
///
/// Returns `true` when the octave is due for an update this sample.
#[inline]
pub fn probe(state: &mut OctaveState) -> bool {
    let Schedule {
        should_update,
        new_ready,
    } = schedule(state.is_ready());
    state.set_ready(new_ready);
    should_update
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_rule() {
        assert_eq!(
            schedule(false),
            Schedule {
                should_update: false,
                new_ready: true
            }
        );
        assert_eq!(
            schedule(true),
            Schedule {
                should_update: true,
                new_ready: false
            }
        );
    }

    #[test]
    fn test_probe_alternates() {
        let mut state = OctaveState::new();
        let pattern: Vec<bool> = (0..6).map(|_| probe(&mut state)).collect();
        assert_eq!(pattern, vec![false, true, false, true, false, true]);
    }
}
