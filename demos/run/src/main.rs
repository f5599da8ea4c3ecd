//! `tt-run` — reconstruct vehicle timetables from files named in a JSON config.
//!
//! Run with:
//!   cargo run -p run --release --features parallel,fx-hash -- run.json
//!
//! See `tt_pipeline::config` for the config format.  Log verbosity follows
//! `RUST_LOG` (default `info`).

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use memory_stats::memory_stats;
use tracing_subscriber::EnvFilter;

use tt_core::format_hms;
use tt_pipeline::{LoggingObserver, PipelineConfig, run_from_config};

fn mem_mb() -> f64 {
    memory_stats()
        .map(|s| s.physical_mem as f64 / (1024.0 * 1024.0))
        .unwrap_or(0.0)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args_os().skip(1);
    let Some(config_path) = args.next().map(PathBuf::from) else {
        bail!("usage: tt-run <config.json>");
    };
    if args.next().is_some() {
        bail!("usage: tt-run <config.json>");
    }

    let config = PipelineConfig::load(&config_path)
        .with_context(|| format!("loading config {}", config_path.display()))?;
    tracing::info!(
        events  = %config.events.display(),
        output  = %config.output_dir.display(),
        backend = ?config.backend,
        "starting run"
    );

    let t0 = Instant::now();
    let output = run_from_config(&config, &mut LoggingObserver)
        .with_context(|| format!("running {}", config_path.display()))?;
    let elapsed = t0.elapsed();

    let r = &output.reports.reduce;
    let m = &output.reports.matching;
    let last_end = output
        .timetable
        .iter()
        .map(|e| e.episode.t_end)
        .fold(f64::NEG_INFINITY, f64::max);

    println!("Run complete in {:.2} s  |  RSS {:.1} MB", elapsed.as_secs_f64(), mem_mb());
    println!("  events read       : {} ({} malformed skipped)", r.events_seen, r.malformed_skipped);
    println!("  trips             : {}", r.trips);
    println!("  activities        : {}", r.activities);
    println!("  episodes          : {}", output.timetable.len());
    println!(
        "  parked episodes   : {} ({} matched, {} fallback, {} unresolved, {} zero-length)",
        m.parked, m.matched, m.fallback, m.fallback_unresolved, m.zero_length
    );
    if last_end.is_finite() {
        println!("  last episode ends : {}", format_hms(last_end));
    }
    println!("  written to        : {}", config.output_dir.display());

    Ok(())
}
