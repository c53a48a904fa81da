mod app;
mod config;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};

use config::AppConfig;
use strata_world::worldgen::Mode;

#[derive(Debug, Parser)]
#[command(name = "strata", about = "Generates a voxel world and meshes it section by section")]
struct Args {
    /// Optional `strata.toml`; defaults apply when absent
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory holding atlas.toml and blocks.toml
    #[arg(long, default_value = "assets")]
    assets: PathBuf,
    /// Mesh worker threads, 0 for one per core
    #[arg(long)]
    workers: Option<usize>,
    #[arg(long)]
    seed: Option<i32>,
    /// Flat world instead of noise terrain
    #[arg(long)]
    flat: bool,
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    let _ = TermLogger::init(
        args.log_level.into(),
        ConfigBuilder::new()
            .set_target_level(LevelFilter::Off)
            .set_location_level(LevelFilter::Off)
            .build(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );

    let mut cfg = match &args.config {
        Some(path) => match AppConfig::from_path(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::error!("failed to load {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => AppConfig::default(),
    };
    if let Some(w) = args.workers {
        cfg.runtime.workers = w;
    }
    if let Some(seed) = args.seed {
        cfg.world.seed = seed;
    }
    if args.flat {
        cfg.worldgen.mode = Mode::Flat;
    }

    match app::run(&cfg, &args.assets) {
        Ok(s) => {
            log::info!(
                "sections={} published={} stale={} edits={} draws={} vertices={} failed_uploads={} peak_bytes={}",
                s.sections,
                s.published,
                s.stale_dropped,
                s.edit_rebuilds,
                s.frame.draw_calls,
                s.frame.vertices,
                s.failed_uploads,
                s.peak_bytes
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
