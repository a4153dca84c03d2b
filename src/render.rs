//! Text Renderer
//!
//! One line of text per sample with every band's label displaced
//! horizontally in proportion to its amplitude. Longer-wavelength bands
//! are drawn first, so shorter ones win where labels collide.

use std::io::Write;

use crate::bands::BandInfo;
use crate::cascade::BranchKind;
use crate::error::{QrstError, QrstResult};
use crate::pipeline::{Frame, FrameSink};

//=============================================================================
// Plot Configuration
//=============================================================================

/// Layout of a rendered frame
#[derive(Debug, Clone, PartialEq)]
pub struct PlotConfig {
    /// Width of the plot line in characters
    pub columns: usize,
    /// 1-based column of zero amplitude
    pub center: usize,
    /// Amplitude units per column
    pub divisor: i64,
    /// Draw the label plot line
    pub plot: bool,
    /// Print raw amplitudes per octave
    pub amplitudes: bool,
    /// Print cumulative phase shifts per octave
    pub phase_shifts: bool,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            columns: 70,
            center: 35,
            divisor: 30,
            plot: true,
            amplitudes: false,
            phase_shifts: false,
        }
    }
}

impl PlotConfig {
    pub fn validate(&self) -> QrstResult<()> {
        if self.columns == 0 {
            return Err(QrstError::InvalidConfig("columns must be at least 1".into()));
        }
        if self.divisor <= 0 {
            return Err(QrstError::InvalidConfig(format!(
                "divisor must be positive, got {}",
                self.divisor
            )));
        }
        Ok(())
    }

    /// 1-based column for an amplitude, clamped into the line
    #[inline]
    pub fn column(&self, amplitude: i64) -> usize {
        let column = self.center as i64 + amplitude / self.divisor;
        column.clamp(1, self.columns as i64) as usize
    }
}

/// Render the label plot line for one frame
pub fn plot_line(frame: &Frame<'_>, bands: &[BandInfo], config: &PlotConfig) -> String {
    let mut cells = vec![' '; config.columns];
    // Bands arrive in ascending stride; draw the longest first
    for band in bands.iter().rev() {
        let amplitude = frame.amplitude(band.kind, band.octave);
        cells[config.column(amplitude) - 1] = band.label;
    }
    cells.into_iter().collect()
}

fn join_values(values: impl Iterator<Item = (usize, i64)>) -> String {
    values
        .map(|(_, v)| v.to_string())
        .collect::<Vec<_>>()
        .join("  ")
}

/// Values of both branches: standard first, tripled after ` | `
fn branch_line<F, I>(frame: &Frame<'_>, values: F) -> String
where
    F: Fn(BranchKind) -> I,
    I: Iterator<Item = (usize, i64)>,
{
    let mut line = join_values(values(BranchKind::Standard));
    if frame.has_tripled() {
        line.push_str(" | ");
        line.push_str(&join_values(values(BranchKind::Tripled)));
    }
    line
}

//=============================================================================
// Text Renderer
//=============================================================================

/// Frame sink writing text lines to any writer
pub struct TextRenderer<W: Write> {
    out: W,
    bands: Vec<BandInfo>,
    config: PlotConfig,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W, bands: &[BandInfo], config: PlotConfig) -> QrstResult<Self> {
        config.validate()?;
        Ok(Self {
            out,
            bands: bands.to_vec(),
            config,
        })
    }

    pub fn config(&self) -> &PlotConfig {
        &self.config
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> FrameSink for TextRenderer<W> {
    fn frame(&mut self, frame: &Frame<'_>) -> QrstResult<()> {
        if self.config.amplitudes {
            let line = branch_line(frame, |kind| frame.amplitudes(kind));
            writeln!(self.out, "{}", line)?;
        }
        if self.config.phase_shifts {
            let line = branch_line(frame, |kind| frame.phase_shifts(kind));
            writeln!(self.out, "{}", line)?;
        }
        if self.config.plot {
            let line = plot_line(frame, &self.bands, &self.config);
            writeln!(self.out, "{}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{OctavePipeline, PipelineConfig};

    fn pipeline(num_octaves: usize, tripled: bool) -> OctavePipeline {
        OctavePipeline::with_config(PipelineConfig {
            num_octaves,
            tripled,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_column_clamps() {
        let config = PlotConfig::default();
        assert_eq!(config.column(0), 35);
        assert_eq!(config.column(59), 36);
        assert_eq!(config.column(-61), 33);
        assert_eq!(config.column(100_000), 70);
        assert_eq!(config.column(-100_000), 1);
    }

    #[test]
    fn test_invalid_plot_config() {
        let config = PlotConfig {
            divisor: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
        let config = PlotConfig {
            columns: 0,
            ..Default::default()
        };
        assert!(TextRenderer::new(Vec::new(), &[], config).is_err());
    }

    #[test]
    fn test_short_wavelength_drawn_last() {
        // All amplitudes zero: every label lands on the centre column and
        // octave 1 must be the one left visible
        let mut p = pipeline(4, true);
        let bands = p.band_info().to_vec();
        let frame = p.process(0);
        let line = plot_line(&frame, &bands, &PlotConfig::default());
        assert_eq!(line.chars().count(), 70);
        assert_eq!(line.chars().nth(34), Some('1'));
        assert_eq!(line.trim(), "1");
    }

    #[test]
    fn test_labels_displaced() {
        let mut p = pipeline(2, false);
        let bands = p.band_info().to_vec();
        p.process_block(&[0, 0, 0, 0]);
        // s = [0,0,0,0,800]: 2400/8 = 300 -> column 35 + 10
        let frame = p.process(800);
        let line = plot_line(&frame, &bands, &PlotConfig::default());
        assert_eq!(line.chars().nth(44), Some('1'));
        assert_eq!(line.chars().nth(34), Some('2'));
    }

    #[test]
    fn test_renderer_output() {
        let mut p = pipeline(2, true);
        let config = PlotConfig {
            columns: 10,
            center: 5,
            plot: true,
            amplitudes: true,
            phase_shifts: true,
            ..Default::default()
        };
        let mut renderer = TextRenderer::new(Vec::new(), p.band_info(), config).unwrap();
        p.process_into(0, &mut renderer).unwrap();

        let text = String::from_utf8(renderer.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "0  0 | 0  0");
        // Octave 1 took one backward tie transition, octave 2 not yet visited
        assert_eq!(lines[1], "-1  0 | 0  0");
        assert_eq!(lines[2], "    1     ");
    }
}
