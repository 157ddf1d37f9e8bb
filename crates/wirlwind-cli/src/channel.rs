//! A concrete `CommandChannel`. The SSH transport itself (cipher
//! negotiation, ANSI stripping, prompt detection) is named an external
//! collaborator (spec §1 Out of scope) — this channel runs commands
//! through the local shell instead of a real device, so the rest of the
//! pipeline (parsing, normalization, shaping, state store) can be
//! exercised end to end without a live session, the same role the
//! teacher's own `demo` handler plays for its pipeline.

use std::time::Duration;

use wirlwind_runtime::{CommandChannel, Error, Result};

pub struct LocalShellChannel {
    prompt: String,
}

impl LocalShellChannel {
    pub fn new(host: &str) -> Self {
        Self { prompt: format!("{host}#") }
    }
}

#[async_trait::async_trait]
impl CommandChannel for LocalShellChannel {
    async fn execute(&mut self, command: &str, timeout: Duration) -> Result<String> {
        let command = command.to_string();
        let run = tokio::process::Command::new("sh").arg("-c").arg(&command).output();

        match tokio::time::timeout(timeout, run).await {
            Ok(Ok(output)) => Ok(String::from_utf8_lossy(&output.stdout).into_owned()),
            Ok(Err(e)) => Err(Error::Transport { reason: e.to_string() }),
            Err(_) => Err(Error::Transport { reason: format!("command '{command}' timed out") }),
        }
    }

    fn prompt(&self) -> &str {
        &self.prompt
    }

    async fn close(&mut self) {}

    async fn reconnect(&mut self) -> Result<()> {
        Ok(())
    }
}
