//! # QRST - Quick Rolling Spectral Transform
//!
//! A causal, per-sample octave decomposition. Instead of a windowed
//! Fourier transform, every octave keeps exactly one filtered cycle of
//! history (5 values) and reports an instantaneous amplitude from it,
//! plus a quadrature phase that tracks whether the wavelength at that
//! octave is lengthening or shortening.
//!
//! ## Quick Start
//!
//! ```rust
//! use qrst::{BranchKind, OctavePipeline, PipelineConfig};
//!
//! // 6 octaves per branch, standard and tripled
//! let config = PipelineConfig {
//!     num_octaves: 6,
//!     tripled: true,
//!     ..Default::default()
//! };
//! let mut pipeline = OctavePipeline::with_config(config).unwrap();
//!
//! for sample in [10, 10, 10, 10, 20, 20, 20, 20] {
//!     let frame = pipeline.process(sample);
//!     for (octave, amplitude) in frame.amplitudes(BranchKind::Standard) {
//!         let _ = (octave, amplitude);
//!     }
//! }
//!
//! assert_eq!(pipeline.amplitude(BranchKind::Standard, 1), -3);
//! ```
//!
//! ## Pipeline
//!
//! | Stage | Module | Role |
//! |-------|--------|------|
//! | Decimation | [`scheduler`] | Toggle per octave, halves the update rate |
//! | Filter | [`cascade`] | Pair (or triple, at the tripled root) averaging |
//! | Amplitude | [`amplitude`] | Weighted single-cycle estimate |
//! | Phase | [`phase`] | 4-quadrant sign automaton |
//!
//! ## Octave progression
//!
//! Standard octaves cover strides 1, 2, 4, 8, ... raw samples per value;
//! tripled octaves cover 3, 6, 12, 24, ... . See [`bands`].

pub mod amplitude;
pub mod bands;
pub mod cascade;
pub mod color_logger;
pub mod error;
pub mod octave;
pub mod phase;
pub mod pipeline;
pub mod render;
pub mod scheduler;
pub mod signal;

// Re-export main types at crate root
pub use bands::{generate_bands, label, BandInfo};
pub use cascade::{pair_average, Branch, BranchKind, RootFeed, RootKind};
pub use color_logger::ColorLogger;
pub use error::{QrstError, QrstResult, TermResult};
pub use octave::{reconstruct, OctaveState, RING_DEPTH};
pub use phase::{transition, Quadrant};
pub use pipeline::{Frame, FrameSink, OctavePipeline, PipelineConfig, MAX_OCTAVES};
pub use render::{plot_line, PlotConfig, TextRenderer};
pub use scheduler::{schedule, Schedule};
pub use signal::{read_raw_i16, write_raw_i16, Chirp};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
