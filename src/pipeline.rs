//! Octave Pipeline
//!
//! Orchestrates both branches per incoming sample:
//! - standard branch: root is the raw sample
//! - tripled branch (optional): root is the mean of each sample triplet
//!
//! Each visited octave runs scheduler, cascade filter, amplitude
//! estimator and phase tracker in that order. After every sample the
//! pipeline exposes a borrowed [`Frame`] for renderers and loggers.

use log::{debug, warn};

use crate::bands::{generate_bands, BandInfo};
use crate::cascade::{Branch, BranchKind};
use crate::error::{QrstError, QrstResult};
use crate::octave::OctaveState;

/// Upper bound on octaves per branch
pub const MAX_OCTAVES: usize = 20;

//=============================================================================
// Pipeline Configuration
//=============================================================================

/// Configuration for the octave pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Octaves per branch
    pub num_octaves: usize,
    /// Run the tripled branch alongside the standard one
    pub tripled: bool,
    /// Sample rate in Hz, only used to label bands
    pub sample_rate: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            num_octaves: 9,
            tripled: true,
            sample_rate: 44100.0,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> QrstResult<()> {
        if self.num_octaves == 0 || self.num_octaves > MAX_OCTAVES {
            return Err(QrstError::InvalidConfig(format!(
                "num_octaves must be within 1..={}, got {}",
                MAX_OCTAVES, self.num_octaves
            )));
        }
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            return Err(QrstError::InvalidConfig(format!(
                "sample_rate must be positive, got {}",
                self.sample_rate
            )));
        }
        Ok(())
    }
}

//=============================================================================
// Frame
// Borrowed view of all octaves after one sample
//=============================================================================

/// Snapshot of the pipeline after processing one sample
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    /// 0-based index of the sample just processed
    pub index: u64,
    /// The raw sample just processed
    pub sample: i64,
    standard: &'a Branch,
    tripled: Option<&'a Branch>,
}

impl<'a> Frame<'a> {
    /// Octave states of a branch, octave 1 first
    pub fn octaves(&self, kind: BranchKind) -> &'a [OctaveState] {
        match kind {
            BranchKind::Standard => self.standard.octaves(),
            BranchKind::Tripled => self.tripled.map(|b| b.octaves()).unwrap_or(&[]),
        }
    }

    /// `(octave, amplitude)` pairs for a branch
    pub fn amplitudes(&self, kind: BranchKind) -> impl Iterator<Item = (usize, i64)> + 'a {
        self.octaves(kind)
            .iter()
            .enumerate()
            .map(|(i, o)| (i + 1, o.amplitude()))
    }

    /// `(octave, cumulative_phase_shift)` pairs for a branch
    pub fn phase_shifts(&self, kind: BranchKind) -> impl Iterator<Item = (usize, i64)> + 'a {
        self.octaves(kind)
            .iter()
            .enumerate()
            .map(|(i, o)| (i + 1, o.cumulative_phase_shift()))
    }

    /// Amplitude of a 1-based octave, 0 if the octave does not exist
    pub fn amplitude(&self, kind: BranchKind, octave: usize) -> i64 {
        octave
            .checked_sub(1)
            .and_then(|i| self.octaves(kind).get(i))
            .map_or(0, |o| o.amplitude())
    }

    /// Octaves of a branch updated by this sample (1..=visited)
    pub fn visited(&self, kind: BranchKind) -> usize {
        match kind {
            BranchKind::Standard => self.standard.visited(),
            BranchKind::Tripled => self.tripled.map_or(0, |b| b.visited()),
        }
    }

    pub fn has_tripled(&self) -> bool {
        self.tripled.is_some()
    }
}

/// Consumer of per-sample frames (renderers, loggers)
pub trait FrameSink {
    fn frame(&mut self, frame: &Frame<'_>) -> QrstResult<()>;
}

//=============================================================================
// Octave Pipeline
//=============================================================================

/// Causal multi-resolution decomposition of a sample stream
#[derive(Debug, Clone)]
pub struct OctavePipeline {
    config: PipelineConfig,
    standard: Branch,
    tripled: Option<Branch>,
    bands: Vec<BandInfo>,
    samples: u64,
}

impl Default for OctavePipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl OctavePipeline {
    /// Create a pipeline with the default configuration
    pub fn new() -> Self {
        Self::build(PipelineConfig::default())
    }

    /// Create a pipeline with the given configuration
    pub fn with_config(config: PipelineConfig) -> QrstResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: PipelineConfig) -> Self {
        let standard = Branch::new(BranchKind::Standard, config.num_octaves);
        let tripled = config
            .tripled
            .then(|| Branch::new(BranchKind::Tripled, config.num_octaves));
        let bands = generate_bands(config.num_octaves, config.tripled, config.sample_rate);
        debug!(
            "pipeline: {} octaves per branch, tripled branch {}",
            config.num_octaves,
            if config.tripled { "on" } else { "off" }
        );
        Self {
            config,
            standard,
            tripled,
            bands,
            samples: 0,
        }
    }

    /// Reconfigure, discarding all octave state
    pub fn configure(&mut self, config: PipelineConfig) -> QrstResult<()> {
        if let Err(err) = config.validate() {
            warn!("rejected pipeline configuration: {}", err);
            return Err(err);
        }
        *self = Self::build(config);
        Ok(())
    }

    /// Reset all octaves to their start-of-run state
    pub fn reset(&mut self) {
        self.standard.reset();
        if let Some(tripled) = &mut self.tripled {
            tripled.reset();
        }
        self.samples = 0;
        debug!("pipeline reset");
    }

    /// Process a single sample and return the resulting frame
    #[inline]
    pub fn process(&mut self, sample: i64) -> Frame<'_> {
        self.standard.process(sample);
        if let Some(tripled) = &mut self.tripled {
            tripled.process(sample);
        }
        let index = self.samples;
        self.samples += 1;
        Frame {
            index,
            sample,
            standard: &self.standard,
            tripled: self.tripled.as_ref(),
        }
    }

    /// Process a single sample and hand the frame to a sink
    pub fn process_into<S: FrameSink + ?Sized>(&mut self, sample: i64, sink: &mut S) -> QrstResult<()> {
        let frame = self.process(sample);
        sink.frame(&frame)
    }

    /// Process a block of samples
    pub fn process_block(&mut self, input: &[i64]) {
        for &sample in input {
            self.process(sample);
        }
    }

    /// Process every sample of a block, feeding each frame to a sink
    pub fn process_block_into<S: FrameSink + ?Sized>(
        &mut self,
        input: &[i64],
        sink: &mut S,
    ) -> QrstResult<()> {
        for &sample in input {
            self.process_into(sample, sink)?;
        }
        Ok(())
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn num_octaves(&self) -> usize {
        self.config.num_octaves
    }

    /// Samples processed since creation or the last reset
    pub fn samples_processed(&self) -> u64 {
        self.samples
    }

    pub fn branch(&self, kind: BranchKind) -> Option<&Branch> {
        match kind {
            BranchKind::Standard => Some(&self.standard),
            BranchKind::Tripled => self.tripled.as_ref(),
        }
    }

    /// State of a 1-based octave in a branch
    pub fn octave(&self, kind: BranchKind, octave: usize) -> Option<&OctaveState> {
        self.branch(kind).and_then(|b| b.octave(octave))
    }

    /// Current amplitude of a 1-based octave, 0 if absent
    pub fn amplitude(&self, kind: BranchKind, octave: usize) -> i64 {
        self.octave(kind, octave).map_or(0, |o| o.amplitude())
    }

    /// Cumulative phase shift of a 1-based octave, 0 if absent
    pub fn phase_shift(&self, kind: BranchKind, octave: usize) -> i64 {
        self.octave(kind, octave)
            .map_or(0, |o| o.cumulative_phase_shift())
    }

    /// Copy a branch's amplitudes into an output buffer
    pub fn get_amplitudes(&self, kind: BranchKind, output: &mut [i64]) {
        if let Some(branch) = self.branch(kind) {
            for (out, state) in output.iter_mut().zip(branch.octaves()) {
                *out = state.amplitude();
            }
        }
    }

    /// Updates applied to each octave of a branch, octave 1 first
    pub fn update_counts(&self, kind: BranchKind) -> Vec<u64> {
        self.branch(kind)
            .map(|b| b.octaves().iter().map(|o| o.update_count()).collect())
            .unwrap_or_default()
    }

    /// All bands, ascending stride
    pub fn band_info(&self) -> &[BandInfo] {
        &self.bands
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amplitude::estimate;

    fn standard_only(num_octaves: usize) -> OctavePipeline {
        OctavePipeline::with_config(PipelineConfig {
            num_octaves,
            tripled: false,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_pipeline_default() {
        let pipeline = OctavePipeline::new();
        assert_eq!(pipeline.num_octaves(), 9);
        assert!(pipeline.branch(BranchKind::Tripled).is_some());
        assert_eq!(pipeline.band_info().len(), 18);
    }

    #[test]
    fn test_invalid_config() {
        for num_octaves in [0, MAX_OCTAVES + 1] {
            let config = PipelineConfig {
                num_octaves,
                ..Default::default()
            };
            assert!(matches!(
                OctavePipeline::with_config(config),
                Err(QrstError::InvalidConfig(_))
            ));
        }
        let config = PipelineConfig {
            sample_rate: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let mut pipeline = OctavePipeline::new();
        let bad = PipelineConfig {
            num_octaves: 0,
            ..Default::default()
        };
        assert!(pipeline.configure(bad).is_err());
        assert_eq!(pipeline.num_octaves(), 9);
    }

    #[test]
    fn test_configure_rebuilds() {
        let mut pipeline = OctavePipeline::new();
        pipeline.process_block(&[1, 2, 3, 4]);
        pipeline
            .configure(PipelineConfig {
                num_octaves: 4,
                tripled: false,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(pipeline.num_octaves(), 4);
        assert_eq!(pipeline.samples_processed(), 0);
        assert!(pipeline.branch(BranchKind::Tripled).is_none());
    }

    #[test]
    fn test_update_counts() {
        let mut pipeline = OctavePipeline::new();
        let n: u64 = 3000;
        for i in 0..n {
            pipeline.process((i % 17) as i64);
        }
        let standard = pipeline.update_counts(BranchKind::Standard);
        assert_eq!(standard[0], n);
        for (o, &count) in standard.iter().enumerate() {
            let expected = n >> o;
            assert!(count.abs_diff(expected) <= 1, "octave {}", o + 1);
        }
        let tripled = pipeline.update_counts(BranchKind::Tripled);
        for (o, &count) in tripled.iter().enumerate() {
            let expected = n / (3 << o);
            assert!(count.abs_diff(expected) <= 1, "tripled octave {}", o + 1);
        }
    }

    #[test]
    fn test_pointers_stay_in_range() {
        let mut pipeline = OctavePipeline::new();
        for i in 0..2000i64 {
            let frame = pipeline.process(i * 37 % 101 - 50);
            for kind in [BranchKind::Standard, BranchKind::Tripled] {
                for state in frame.octaves(kind) {
                    assert!((1..=5).contains(&state.write_pointer()));
                }
            }
        }
    }

    #[test]
    fn test_zero_input_stays_silent() {
        let mut pipeline = OctavePipeline::new();
        for _ in 0..1000 {
            let frame = pipeline.process(0);
            for kind in [BranchKind::Standard, BranchKind::Tripled] {
                assert!(frame.amplitudes(kind).all(|(_, a)| a == 0));
            }
        }
    }

    #[test]
    fn test_constant_input_converges_to_zero() {
        let mut pipeline = OctavePipeline::with_config(PipelineConfig {
            num_octaves: 5,
            ..Default::default()
        })
        .unwrap();
        // Longest ring to fill: tripled octave 5 needs 5 * 48 samples
        for _ in 0..(5 * 48) {
            pipeline.process(250);
        }
        for _ in 0..500 {
            let frame = pipeline.process(250);
            for kind in [BranchKind::Standard, BranchKind::Tripled] {
                assert!(frame.amplitudes(kind).all(|(_, a)| a == 0));
            }
        }
    }

    #[test]
    fn test_step_pattern_octave_one() {
        let mut pipeline = standard_only(3);
        let pattern = [10, 10, 10, 10, 20, 20, 20, 20];
        let input: Vec<i64> = pattern.iter().cycle().take(64).copied().collect();

        let mut amplitudes = Vec::new();
        for &sample in &input {
            let frame = pipeline.process(sample);
            amplitudes.push(frame.amplitude(BranchKind::Standard, 1));
        }

        // Warm-up: first four updates are silent
        assert_eq!(&amplitudes[..4], &[0, 0, 0, 0]);
        // Every later value follows the weighted formula over the last 5 inputs
        for i in 4..input.len() {
            let window = [input[i - 4], input[i - 3], input[i - 2], input[i - 1], input[i]];
            assert_eq!(amplitudes[i], estimate(&window), "sample {}", i);
        }
        // One full period of the step pattern after warm-up
        assert_eq!(&amplitudes[8..16], &[-3, -2, 2, 3, 3, 2, -2, -3]);
    }

    #[test]
    fn test_step_pattern_octave_two() {
        let mut pipeline = standard_only(3);
        let pattern = [10, 10, 10, 10, 20, 20, 20, 20];

        let mut octave_two = Vec::new();
        for (i, &sample) in pattern.iter().cycle().take(64).enumerate() {
            let frame = pipeline.process(sample);
            if frame.visited(BranchKind::Standard) >= 2 {
                octave_two.push((i, frame.amplitude(BranchKind::Standard, 2)));
            }
        }

        // Octave 2 updates on odd indices with pair means 10,10,20,20,...
        assert!(octave_two.iter().all(|(i, _)| i % 2 == 1));
        let values: Vec<i64> = octave_two.iter().map(|&(_, a)| a).collect();
        assert_eq!(&values[..4], &[0, 0, 0, 0]);
        // Octave 2 sees 10,10,20,20 repeating: the step period is exactly one
        // measured cycle at this octave
        assert_eq!(&values[4..12], &[-6, -6, 6, 6, -6, -6, 6, 6]);
    }

    #[test]
    fn test_reset_reproduces_output() {
        let input: Vec<i64> = (0..500).map(|i| (i * 7919 % 2003) - 1000).collect();
        let mut pipeline = OctavePipeline::new();

        let run = |p: &mut OctavePipeline| -> Vec<i64> {
            input
                .iter()
                .map(|&s| {
                    let frame = p.process(s);
                    frame.amplitudes(BranchKind::Standard).map(|(_, a)| a).sum::<i64>()
                        + frame.amplitudes(BranchKind::Tripled).map(|(_, a)| a).sum::<i64>()
                })
                .collect()
        };

        let first = run(&mut pipeline);
        pipeline.reset();
        assert_eq!(pipeline.samples_processed(), 0);
        let second = run(&mut pipeline);
        assert_eq!(first, second);
    }

    #[test]
    fn test_process_into_sink() {
        struct Collect(Vec<(u64, i64)>);
        impl FrameSink for Collect {
            fn frame(&mut self, frame: &Frame<'_>) -> QrstResult<()> {
                self.0.push((frame.index, frame.sample));
                Ok(())
            }
        }

        let mut pipeline = OctavePipeline::new();
        let mut sink = Collect(Vec::new());
        pipeline.process_block_into(&[5, 6, 7], &mut sink).unwrap();
        assert_eq!(sink.0, vec![(0, 5), (1, 6), (2, 7)]);
    }

    #[test]
    fn test_get_amplitudes() {
        let mut pipeline = standard_only(2);
        pipeline.process_block(&[0, 0, 0, 0, 80]);
        let mut out = [99i64; 3];
        pipeline.get_amplitudes(BranchKind::Standard, &mut out);
        // s = [0,0,0,0,80]: 240/8 = 30; octave 2 still warming up
        assert_eq!(out, [30, 0, 99]);
        assert_eq!(pipeline.amplitude(BranchKind::Tripled, 1), 0);
        assert_eq!(pipeline.phase_shift(BranchKind::Standard, 7), 0);
    }
}
