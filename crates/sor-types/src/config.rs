//! Command-line parsing and the validated runtime configuration.
//!
//! `CliArgs` is the raw `clap` surface; `Config` is what every worker
//! actually reads. The `TryFrom` conversion is where every cross-field
//! constraint is enforced once, before any thread is spawned.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;

/// Raw CLI surface, parsed by `clap`.
#[derive(Parser, Debug, Clone)]
#[command(name = "sor-sim", about = "Emergency department concurrency simulation")]
pub struct CliArgs {
    /// Number of waitroom seats.
    #[arg(short = 'n', long = "patients", default_value_t = 20)]
    pub n: u32,

    /// Registration window-2 open threshold. Defaults to ceil(N/2) if omitted.
    #[arg(short = 'k', long = "k")]
    pub k: Option<u32>,

    /// Simulation duration in seconds. 0 means run until interrupted.
    #[arg(short = 'd', long = "duration", default_value_t = 0)]
    pub duration: u64,

    /// Time-acceleration factor; sleeps are divided by this.
    #[arg(short = 's', long = "speed", default_value_t = 2.0)]
    pub speed: f64,

    /// RNG seed. Defaults to the current unix time if omitted.
    #[arg(long = "seed")]
    pub seed: Option<u64>,

    /// Mean inter-arrival interval in seconds, before speed scaling.
    #[arg(short = 'i', long = "interval", default_value_t = 3.0)]
    pub interval: f64,
}

/// Validated, derived configuration every worker is constructed from.
#[derive(Debug, Clone)]
pub struct Config {
    pub n: u32,
    pub k_open: u32,
    pub k_close: u32,
    pub duration: u64,
    pub speed: f64,
    pub seed: u64,
    pub interval: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    NTooSmall,
    NTooLarge(u32),
    KBelowHalfN { k: u32, min: u32 },
    SpeedNotPositive(f64),
    IntervalNotPositive(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NTooSmall => write!(f, "patients (N) must be at least 1"),
            ConfigError::NTooLarge(n) => write!(f, "patients (N) must be at most 1000, got {n}"),
            ConfigError::KBelowHalfN { k, min } => {
                write!(f, "K ({k}) must be at least ceil(N/2) ({min})")
            }
            ConfigError::SpeedNotPositive(s) => write!(f, "speed must be > 0, got {s}"),
            ConfigError::IntervalNotPositive(i) => write!(f, "interval must be > 0, got {i}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl TryFrom<CliArgs> for Config {
    type Error = ConfigError;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.n < 1 {
            return Err(ConfigError::NTooSmall);
        }
        if args.n > 1000 {
            return Err(ConfigError::NTooLarge(args.n));
        }
        if args.speed <= 0.0 {
            return Err(ConfigError::SpeedNotPositive(args.speed));
        }
        if args.interval <= 0.0 {
            return Err(ConfigError::IntervalNotPositive(args.interval));
        }

        let k_min = args.n.div_ceil(2);
        let k_open = args.k.unwrap_or(k_min);
        if k_open < k_min {
            return Err(ConfigError::KBelowHalfN { k: k_open, min: k_min });
        }
        let k_close = args.n / 3;

        let seed = args.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0)
        });

        Ok(Config {
            n: args.n,
            k_open,
            k_close,
            duration: args.duration,
            speed: args.speed,
            seed,
            interval: args.interval,
        })
    }
}

impl Config {
    /// Derives a reproducible per-worker RNG seed from the base seed.
    ///
    /// Keeps each worker's draw stream independent of thread interleaving:
    /// determinism is "same draws per stream", not "same global order".
    pub fn worker_seed(&self, tag: u64) -> u64 {
        self.seed ^ tag
    }

    /// Scales a duration in seconds by the configured speed factor.
    pub fn scaled_secs(&self, secs: f64) -> f64 {
        secs / self.speed
    }
}
