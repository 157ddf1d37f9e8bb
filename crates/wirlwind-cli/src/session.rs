//! Builds a `SessionConfig` from parsed CLI args (§6 "authentication
//! material: `--key <path>` OR password prompt").

use std::io::{self, Write};

use anyhow::{Context, Result};
use wirlwind_runtime::{resolve_workspace_root, Auth, SessionConfig};

use crate::args::Cli;

pub fn build_session_config(cli: &Cli) -> Result<SessionConfig> {
    let root = resolve_workspace_root(cli.root.as_deref());

    // `--preflight-only` never opens a connection (§6), so there is
    // nothing to authenticate and no reason to block on a password prompt.
    let auth = match (&cli.key, cli.preflight_only) {
        (Some(path), _) => Auth::KeyFile(path.clone()),
        (None, true) => Auth::Password(String::new()),
        (None, false) => Auth::Password(prompt_password(&cli.host, &cli.user)?),
    };

    Ok(SessionConfig {
        host: cli.host.clone(),
        vendor_id: cli.vendor.clone(),
        user: cli.user.clone(),
        auth,
        debug: cli.debug,
        preflight_only: cli.preflight_only,
        no_legacy: cli.no_legacy,
        root,
    })
}

fn prompt_password(host: &str, user: &str) -> Result<String> {
    print!("Password for {user}@{host}: ");
    io::stdout().flush().context("flushing password prompt")?;
    let mut line = String::new();
    io::stdin().read_line(&mut line).context("reading password from stdin")?;
    Ok(line.trim_end_matches(['\n', '\r']).to_string())
}
