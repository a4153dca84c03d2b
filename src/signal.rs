//! Sample Sources
//!
//! Debug signal generation and raw sample file access. Raw files are
//! headerless mono streams of little-endian signed 16-bit samples.

use std::f64::consts::PI;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::{debug, warn};

use crate::error::QrstResult;

//=============================================================================
// Chirp
// Sine sweeping from a 4-sample wavelength down toward 512 samples
//=============================================================================

/// Descending-frequency sine sweep used to exercise every octave
#[derive(Debug, Clone)]
pub struct Chirp {
    span: u64,
    position: u64,
    angle: f64,
    /// DC offset added to every sample
    pub offset: f64,
    /// Peak deviation from the offset
    pub amplitude: f64,
    /// Phase increment per sample at the start of the sweep
    pub start_increment: f64,
    /// Phase increment per sample at the end of the sweep
    pub end_increment: f64,
}

impl Chirp {
    pub fn new(span: u64) -> Self {
        Self {
            span,
            position: 0,
            angle: 0.0,
            offset: 2000.0,
            amplitude: 12000.0,
            start_increment: PI / 2.0,
            end_increment: PI / 256.0,
        }
    }

    /// Phase increment at the current position, linear across the span
    fn increment(&self) -> f64 {
        let segment = (self.span + 1) as f64;
        let t = self.position as f64;
        (t * self.end_increment + (segment - t) * self.start_increment) / segment
    }
}

impl Iterator for Chirp {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        if self.position >= self.span {
            return None;
        }
        self.angle += self.increment();
        self.position += 1;
        Some((self.offset + self.amplitude * self.angle.sin()) as i64)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.span - self.position) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Chirp {}

//=============================================================================
// Raw 16-bit files
//=============================================================================

/// Decode little-endian i16 samples; a trailing odd byte is ignored
pub fn decode_i16_le(bytes: &[u8]) -> Vec<i64> {
    if bytes.len() % 2 != 0 {
        warn!("ignoring trailing odd byte in raw sample data");
    }
    bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]) as i64)
        .collect()
}

/// Encode samples as little-endian i16, saturating out-of-range values
pub fn encode_i16_le(samples: &[i64]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(samples.len() * 2);
    for &sample in samples {
        let clamped = sample.clamp(i16::MIN as i64, i16::MAX as i64) as i16;
        bytes.extend_from_slice(&clamped.to_le_bytes());
    }
    bytes
}

/// Read a raw sample file
pub fn read_raw_i16(path: &Path) -> QrstResult<Vec<i64>> {
    let mut bytes = Vec::new();
    BufReader::new(File::open(path)?).read_to_end(&mut bytes)?;
    let samples = decode_i16_le(&bytes);
    debug!("read {} samples from {}", samples.len(), path.display());
    Ok(samples)
}

/// Write a raw sample file
pub fn write_raw_i16(path: &Path, samples: &[i64]) -> QrstResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(&encode_i16_le(samples))?;
    writer.flush()?;
    debug!("wrote {} samples to {}", samples.len(), path.display());
    Ok(())
}
