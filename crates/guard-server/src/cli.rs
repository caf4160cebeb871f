use std::path::PathBuf;

use clap::Parser;
use guard_config::GuardConfig;

/// Command-line flags for the `cloudguard` binary.
///
/// Flags override the matching settings loaded by [`GuardConfig`].
#[derive(Debug, Parser)]
#[command(name = "cloudguard", version, about = "Cloud Guard - compliance dashboard API server")]
pub struct Cli {
    /// Config file path (defaults to ./cloudguard.toml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Listen port (overrides PORT)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Skip demo data seeding even when DEMO_SEED is set
    #[arg(long)]
    pub no_seed: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Fold flag overrides into loaded settings.
    pub fn apply(&self, config: &mut GuardConfig) {
        if let Some(port) = self.port {
            config.port = port;
        }
        if self.no_seed {
            config.demo_seed = false;
        }
    }

    /// Default log filter when `CLOUDGUARD_LOG` is unset.
    #[must_use]
    pub const fn log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose {
            "debug"
        } else {
            "info"
        }
    }

    #[must_use]
    pub fn bind_addr(&self, port: u16) -> String {
        format!("{}:{port}", self.host)
    }
}
