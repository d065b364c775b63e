use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

/// Log levels selectable on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Built-in scenes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SceneKind {
    /// Ground, three feature spheres and a field of small random spheres
    Cover,
    /// Ground and the three feature spheres only
    Quick,
}

#[derive(Parser, Debug)]
#[command(name = "prism")]
#[command(about = "Render a sphere scene with a CPU path tracer")]
pub struct Args {
    /// Scene to render
    #[arg(long, value_enum, default_value = "cover")]
    pub scene: SceneKind,

    /// Camera settings as JSON; command line options override it
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Image width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Image width over height
    #[arg(long)]
    pub aspect_ratio: Option<f64>,

    /// Number of samples per pixel
    #[arg(long, short = 's')]
    pub samples: Option<u32>,

    /// Maximum ray bounces
    #[arg(long)]
    pub max_depth: Option<u32>,

    /// Vertical field of view in degrees
    #[arg(long)]
    pub vfov: Option<f64>,

    /// Defocus angle in degrees (0 disables depth of field)
    #[arg(long)]
    pub defocus_angle: Option<f64>,

    /// Distance to the plane of perfect focus
    #[arg(long)]
    pub focus_dist: Option<f64>,

    /// Seed for scene construction and rendering
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Render threads (0 = one per core)
    #[arg(long, default_value_t = 0)]
    pub threads: usize,

    /// Render row by row on a single thread
    #[arg(long)]
    pub sequential: bool,

    /// Bucket edge length in pixels for parallel renders
    #[arg(long, default_value_t = prism_renderer::DEFAULT_BUCKET_SIZE)]
    pub bucket_size: u32,

    /// Output file (.ppm or .png); PPM goes to stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Set the logging level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}
