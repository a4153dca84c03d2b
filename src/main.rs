use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use log::{debug, info};

use qrst::{
    read_raw_i16, write_raw_i16, BranchKind, Chirp, ColorLogger, OctavePipeline, PipelineConfig,
    PlotConfig, QrstError, QrstResult, TermResult, TextRenderer,
};

#[derive(Parser)]
#[command(name = "qrst", version)]
/// Quick rolling spectral transform: per-sample octave amplitudes
struct Cli {
    /// Raw input file of little-endian signed 16-bit mono samples.
    /// [default: a generated descending chirp]
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Number of samples in the generated chirp
    #[arg(short = 'n', long = "samples", default_value = "20000")]
    samples: u64,

    /// Octaves per branch (1 to 20)
    #[arg(short = 'o', long = "octaves", default_value = "9")]
    octaves: usize,

    /// Run only the standard branch
    #[arg(long = "no-tripled")]
    no_tripled: bool,

    /// Sample rate in Hz, used to label bands
    #[arg(short = 'r', long = "sample-rate", default_value = "44100")]
    sample_rate: f32,

    /// Print per-octave amplitudes for every sample
    #[arg(short = 'a', long = "amplitudes")]
    amplitudes: bool,

    /// Print per-octave cumulative phase shifts for every sample
    #[arg(short = 'p', long = "phase")]
    phase: bool,

    /// Do not draw the label plot line
    #[arg(long = "no-plot")]
    no_plot: bool,

    /// Amplitude units per plot column
    #[arg(short = 'd', long = "divisor", default_value = "30")]
    divisor: i64,

    /// Width of the plot line
    #[arg(short = 'c', long = "columns", default_value = "70")]
    columns: usize,

    /// Write rendered output to this file instead of stdout
    #[arg(short = 'w', long = "output")]
    output: Option<PathBuf>,

    /// Also save the generated chirp as a raw 16-bit file
    #[arg(long = "write-raw")]
    write_raw: Option<PathBuf>,

    /// Print diagnostic messages
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    /// Quiet mode: suppress all log output
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,
}

fn main() -> TermResult {
    let cli = Cli::parse();
    if let Err(e) = ColorLogger::new(cli.quiet, cli.verbose).init() {
        eprintln!("failed to initialize logger: {}", e);
    }
    TermResult(run(cli))
}

fn run(cli: Cli) -> QrstResult<()> {
    let config = PipelineConfig {
        num_octaves: cli.octaves,
        tripled: !cli.no_tripled,
        sample_rate: cli.sample_rate,
    };
    let mut pipeline = OctavePipeline::with_config(config)?;

    for band in pipeline.band_info() {
        debug!(
            "band '{}': {} octave {}, stride {}, period {} samples, {:.1} Hz",
            band.label,
            band.kind.name(),
            band.octave,
            band.stride,
            band.period_samples,
            band.center_hz
        );
    }

    let samples = match &cli.input {
        Some(path) => read_raw_i16(path)?,
        None => {
            let samples: Vec<i64> = Chirp::new(cli.samples).collect();
            info!("generated chirp of {} samples", samples.len());
            samples
        }
    };
    if samples.is_empty() {
        return Err(QrstError::Message("no samples to process".into()));
    }
    if let Some(path) = &cli.write_raw {
        write_raw_i16(path, &samples)?;
        info!("saved samples to {}", path.display());
    }

    let plot = PlotConfig {
        columns: cli.columns,
        center: cli.columns / 2,
        divisor: cli.divisor,
        plot: !cli.no_plot,
        amplitudes: cli.amplitudes,
        phase_shifts: cli.phase,
    };
    let out: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    let mut renderer = TextRenderer::new(out, pipeline.band_info(), plot)?;

    let start = Instant::now();
    pipeline.process_block_into(&samples, &mut renderer)?;
    renderer.into_inner().flush()?;

    info!(
        "processed {} samples in {:.2?}",
        pipeline.samples_processed(),
        start.elapsed()
    );
    for kind in [BranchKind::Standard, BranchKind::Tripled] {
        if pipeline.branch(kind).is_none() {
            continue;
        }
        info!(
            "{} updates per octave: {:?}",
            kind.name(),
            pipeline.update_counts(kind)
        );
        let shifts: Vec<i64> = (1..=pipeline.num_octaves())
            .map(|o| pipeline.phase_shift(kind, o))
            .collect();
        info!("{} cumulative phase shifts: {:?}", kind.name(), shifts);
    }
    Ok(())
}
