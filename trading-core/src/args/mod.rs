//! Defines the command-line arguments shared by every service binary.
//!
//! Only the two knobs an operator changes by hand live here; everything else
//! comes from the layered configuration (see [`crate::config`]).

use clap::Parser;
use std::path::PathBuf;

/// Standard arguments parsed from the command line.
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
pub struct ServiceArgs {
    /// Path to a TOML configuration file (extension optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on, overrides the configuration
    #[arg(short, long)]
    port: Option<u16>,
}

impl ServiceArgs {
    pub fn new(config: Option<PathBuf>, port: Option<u16>) -> Self {
        Self { config, port }
    }

    /// The configuration file to load, falling back to `config/<service>`.
    pub fn config_path(&self, service: &str) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| PathBuf::from("config").join(service))
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }
}
