//! Band Catalogue
//!
//! Maps (branch, octave) pairs to strides, nominal periods and labels.
//!
//! The stride is the number of raw samples behind one filtered value.
//! Interleaving both branches gives the progression
//!
//!   1, 2, 3, 4, 6, 8, 12, 16, 24, 32, ...
//!
//! where, past the start, every stride is double the one two places
//! earlier (analogous to alternating C and F# across piano octaves).
//! One measured cycle spans four transitions between five values, so the
//! nominal period of a band is four strides.

use crate::cascade::BranchKind;

/// Filtered values spanned by one measured cycle, minus one
pub const TRANSITIONS_PER_CYCLE: u64 = 4;

//=============================================================================
// Labels
//=============================================================================

/// One-character plot label for an octave.
///
/// Standard octaves use digits (`'1'..='9'`, then `'a'` onward); tripled
/// octaves use capitals from `'A'`.
pub fn label(kind: BranchKind, octave: usize) -> char {
    let octave = octave.max(1) as u8;
    match kind {
        BranchKind::Standard if octave <= 9 => (b'0' + octave) as char,
        BranchKind::Standard => (b'a' + (octave - 10)) as char,
        BranchKind::Tripled => (b'A' + (octave - 1)) as char,
    }
}

//=============================================================================
// Band Information
//=============================================================================

/// Information about one octave band
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandInfo {
    /// Branch the band belongs to
    pub kind: BranchKind,
    /// 1-based octave within its branch
    pub octave: usize,
    /// Raw samples per filtered value
    pub stride: u64,
    /// Raw samples per measured cycle
    pub period_samples: u64,
    /// Frequency of one measured cycle per period, in Hz
    pub center_hz: f32,
    /// Plot label
    pub label: char,
}

impl BandInfo {
    pub fn new(kind: BranchKind, octave: usize, sample_rate: f32) -> Self {
        let stride = kind.stride(octave);
        let period_samples = stride * TRANSITIONS_PER_CYCLE;
        Self {
            kind,
            octave,
            stride,
            period_samples,
            center_hz: sample_rate / period_samples as f32,
            label: label(kind, octave),
        }
    }
}

/// Generate all bands of both branches, sorted by ascending stride
pub fn generate_bands(num_octaves: usize, tripled: bool, sample_rate: f32) -> Vec<BandInfo> {
    let per_branch = if tripled { 2 } else { 1 };
    let mut bands = Vec::with_capacity(num_octaves * per_branch);

    for octave in 1..=num_octaves {
        bands.push(BandInfo::new(BranchKind::Standard, octave, sample_rate));
        if tripled {
            bands.push(BandInfo::new(BranchKind::Tripled, octave, sample_rate));
        }
    }

    bands.sort_by_key(|band| band.stride);
    bands
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interleaved_progression() {
        let strides: Vec<u64> = generate_bands(6, true, 44100.0)
            .iter()
            .map(|b| b.stride)
            .collect();
        assert_eq!(strides, vec![1, 2, 3, 4, 6, 8, 12, 16, 24, 32, 48, 96]);

        // Past the start, each stride doubles the one two places back
        for i in 3..10 {
            assert_eq!(strides[i], strides[i - 2] * 2);
        }
    }

    #[test]
    fn test_standard_only() {
        let bands = generate_bands(4, false, 48000.0);
        assert_eq!(bands.len(), 4);
        assert!(bands.iter().all(|b| b.kind == BranchKind::Standard));
        assert_eq!(bands[3].period_samples, 32);
        assert_eq!(bands[3].center_hz, 1500.0);
    }

    #[test]
    fn test_center_descends() {
        let bands = generate_bands(9, true, 44100.0);
        for pair in bands.windows(2) {
            assert!(pair[1].center_hz < pair[0].center_hz);
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!(label(BranchKind::Standard, 1), '1');
        assert_eq!(label(BranchKind::Standard, 9), '9');
        assert_eq!(label(BranchKind::Standard, 10), 'a');
        assert_eq!(label(BranchKind::Standard, 20), 'k');
        assert_eq!(label(BranchKind::Tripled, 1), 'A');
        assert_eq!(label(BranchKind::Tripled, 20), 'T');
    }
}
