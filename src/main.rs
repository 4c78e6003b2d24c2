//! Speedometer viewer.
//!
//! ```bash
//! # Type values (or none/loading/ready/error/ok) on stdin
//! speedometer --thresholds zones.json
//!
//! # Random targets every second
//! speedometer --random
//!
//! # Print a settled frame as SVG and exit
//! speedometer --svg 64
//! ```

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use rand::Rng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use speedometer::{svg, GaugeCommand, GaugeConfig, Speedometer, ThresholdSet};

#[derive(Parser)]
#[command(name = "speedometer")]
#[command(about = "Animated segmented speedometer gauge")]
#[command(version)]
struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// JSON array of thresholds ({"start", "end", "length"?, "color"?})
    #[arg(short, long)]
    thresholds: Option<PathBuf>,

    #[arg(long, default_value_t = 3.0)]
    stroke_width: f64,

    #[arg(long, default_value_t = 2.0)]
    stroke_border: f64,

    /// Keep caller lengths even for three thresholds
    #[arg(long)]
    no_align: bool,

    /// Milliseconds between animation ticks
    #[arg(long, default_value_t = 10)]
    tick_ms: u64,

    /// Print the settled gauge at this value as SVG and exit
    #[arg(long, value_name = "VALUE")]
    svg: Option<f64>,

    /// Feed random targets instead of reading stdin
    #[arg(long)]
    random: bool,
}

fn init_tracing(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let thresholds = match &cli.thresholds {
        Some(path) => ThresholdSet::from_json_file(path)
            .with_context(|| format!("loading thresholds from {}", path.display()))?,
        None => ThresholdSet::default(),
    };

    let config = GaugeConfig::builder()
        .thresholds(thresholds.ascending().to_vec())
        .stroke_width(cli.stroke_width)
        .stroke_border(cli.stroke_border)
        .align_thresholds(!cli.no_align)
        .tick_interval(Duration::from_millis(cli.tick_ms))
        .build();
    let palette = config.palette;
    let mut gauge = Speedometer::new(config);

    if let Some(value) = cli.svg {
        gauge.set_target(Some(value), Instant::now());
        gauge.settle();
        print!("{}", svg::render_frame(&gauge.frame(), &palette));
        return Ok(());
    }

    let (sender, receiver) = mpsc::channel();

    if cli.random {
        thread::spawn(move || {
            let mut rng = rand::rng();
            loop {
                let command = GaugeCommand::SetTarget(Some(rng.random_range(0.0..100.0)));
                if sender.send(command).is_err() {
                    break;
                }
                thread::sleep(Duration::from_secs(1));
            }
        });
    } else {
        thread::spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<GaugeCommand>() {
                    Ok(command) => {
                        if sender.send(command).is_err() {
                            break;
                        }
                    }
                    Err(err) => warn!(%err, "ignoring input"),
                }
            }
        });
    }

    info!("opening viewer, close the window to exit");
    gauge
        .show_with_commands("Speedometer", receiver)
        .context("running viewer")
}
