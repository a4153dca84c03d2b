//! Cascade Filter
//!
//! Recursive multi-rate averaging. A branch root takes its values from
//! the raw sample stream; every octave above it averages the two newest
//! values of the octave below, at half that octave's rate.
//!
//! Two branches exist:
//! - **Standard**: root value is the raw sample itself.
//! - **Tripled**: root value is the truncated mean of each group of three
//!   consecutive raw samples.
//!
//! Together they cover strides 1, 2, 3, 4, 6, 8, 12, 16, ...

use log::trace;

use crate::amplitude;
use crate::octave::OctaveState;
use crate::phase;
use crate::scheduler;

//=============================================================================
// Branch descriptor
//=============================================================================

/// How a branch root derives its values from raw samples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootKind {
    /// Root value is the raw sample
    RawSample,
    /// Root value is the mean of three consecutive raw samples
    TripleOfRaw,
}

impl RootKind {
    /// Raw samples folded into one root value
    pub const fn group_len(self) -> u32 {
        match self {
            RootKind::RawSample => 1,
            RootKind::TripleOfRaw => 3,
        }
    }
}

/// Which octave sequence a branch follows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BranchKind {
    Standard,
    Tripled,
}

impl BranchKind {
    pub const fn root(self) -> RootKind {
        match self {
            BranchKind::Standard => RootKind::RawSample,
            BranchKind::Tripled => RootKind::TripleOfRaw,
        }
    }

    /// Raw samples per filtered value at `octave` (1-based)
    pub const fn stride(self, octave: usize) -> u64 {
        (self.root().group_len() as u64) << (octave - 1)
    }

    pub const fn name(self) -> &'static str {
        match self {
            BranchKind::Standard => "standard",
            BranchKind::Tripled => "tripled",
        }
    }
}

//=============================================================================
// Root feed
// Groups raw samples into root values
//=============================================================================

/// Accumulator turning raw samples into branch-root values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootFeed {
    kind: RootKind,
    sum: i64,
    count: u32,
}

impl RootFeed {
    pub fn new(kind: RootKind) -> Self {
        Self {
            kind,
            sum: 0,
            count: 0,
        }
    }

    pub fn reset(&mut self) {
        self.sum = 0;
        self.count = 0;
    }

    /// Add one raw sample; yields a root value once a group is complete
    #[inline]
    pub fn feed(&mut self, sample: i64) -> Option<i64> {
        let group = self.kind.group_len();
        if group == 1 {
            return Some(sample);
        }
        self.sum += sample;
        self.count += 1;
        if self.count < group {
            return None;
        }
        let value = self.sum / group as i64;
        self.reset();
        Some(value)
    }

    /// Samples currently held toward the next group
    pub fn pending(&self) -> u32 {
        self.count
    }
}

/// Next value for an octave above the root: truncated mean of the two
/// newest values of the octave below
#[inline]
pub fn pair_average(below: &OctaveState) -> i64 {
    let (newest, prior) = below.newest_pair();
    (newest + prior) / 2
}

//=============================================================================
// Branch
// One octave sequence driven from its root
//=============================================================================

/// An octave cascade: root feed plus one state per octave
#[derive(Debug, Clone)]
pub struct Branch {
    kind: BranchKind,
    feed: RootFeed,
    octaves: Vec<OctaveState>,
    visited: usize,
}

impl Branch {
    pub fn new(kind: BranchKind, num_octaves: usize) -> Self {
        Self {
            kind,
            feed: RootFeed::new(kind.root()),
            octaves: vec![OctaveState::new(); num_octaves],
            visited: 0,
        }
    }

    pub fn reset(&mut self) {
        self.feed.reset();
        for octave in &mut self.octaves {
            octave.reset();
        }
        self.visited = 0;
    }

    /// Process one raw sample. Returns the number of octaves updated.
    pub fn process(&mut self, sample: i64) -> usize {
        self.visited = 0;
        let Some(root_value) = self.feed.feed(sample) else {
            return 0;
        };
        if self.octaves.is_empty() {
            return 0;
        }

        self.update(0, root_value);
        for index in 1..self.octaves.len() {
            if !scheduler::probe(&mut self.octaves[index]) {
                break;
            }
            let value = pair_average(&self.octaves[index - 1]);
            self.update(index, value);
        }
        self.visited
    }

    #[inline]
    fn update(&mut self, index: usize, value: i64) {
        let state = &mut self.octaves[index];
        state.push(value);
        let amplitude = amplitude::update(state);
        let delta = phase::track(state);
        self.visited = index + 1;
        trace!(
            "{} octave {}: value={} amplitude={} phase={} ({:+})",
            self.kind.name(),
            index + 1,
            value,
            amplitude,
            state.phase(),
            delta
        );
    }

    pub fn kind(&self) -> BranchKind {
        self.kind
    }

    pub fn num_octaves(&self) -> usize {
        self.octaves.len()
    }

    /// Octave states, octave 1 first
    pub fn octaves(&self) -> &[OctaveState] {
        &self.octaves
    }

    /// State of a 1-based octave
    pub fn octave(&self, octave: usize) -> Option<&OctaveState> {
        octave.checked_sub(1).and_then(|i| self.octaves.get(i))
    }

    /// Octaves updated by the last processed sample
    pub fn visited(&self) -> usize {
        self.visited
    }

    pub fn feed(&self) -> &RootFeed {
        &self.feed
    }
}
