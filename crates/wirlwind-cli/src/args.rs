use std::path::PathBuf;

use clap::Parser;

/// Per-device operational console (§6 CLI surface).
#[derive(Parser, Debug)]
#[command(name = "wirlwind")]
#[command(about = "Poll a network device over SSH and publish structured telemetry", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Device address.
    #[arg(long)]
    pub host: String,

    /// Vendor identifier (e.g. `cisco_ios`, `arista_eos`).
    #[arg(long)]
    pub vendor: String,

    /// SSH username.
    #[arg(long)]
    pub user: String,

    /// Private key path. If omitted, the password is read from stdin.
    #[arg(long)]
    pub key: Option<PathBuf>,

    /// Elevate parse-trace verbosity (raw-output preview, resolution paths).
    #[arg(long)]
    pub debug: bool,

    /// Resolve all templates and print the resolution report; do not connect.
    #[arg(long)]
    pub preflight_only: bool,

    /// Disable legacy SSH cipher support (transport-level, passed through).
    #[arg(long)]
    pub no_legacy: bool,

    /// Override the workspace root that holds `collections/` and `templates/`
    /// (otherwise `WIRLWIND_HOME`, then the platform data dir, then `~/.wirlwind`).
    #[arg(long)]
    pub root: Option<String>,
}
