//! The command-execution abstraction the Poll Engine drives (§1 "the core
//! requires a command-execution abstraction returning raw stdout"). The
//! concrete SSH transport — cipher negotiation, ANSI stripping, prompt
//! detection — is an external collaborator; this crate only depends on
//! the trait.

use std::time::Duration;

use crate::error::Result;

/// One authenticated command channel to a single device. A session owns
/// exactly one of these and never issues overlapping commands (§5 Shared
/// resources).
#[async_trait::async_trait]
pub trait CommandChannel: Send {
    /// Send `command` and return its raw, unsanitized stdout, bounded by
    /// `timeout` (§5 "A per-command read timeout (default: 15 seconds)
    /// bounds blocking on the channel").
    async fn execute(&mut self, command: &str, timeout: Duration) -> Result<String>;

    /// The session prompt string the Sanitizer strips from the last
    /// output line (§4.2).
    fn prompt(&self) -> &str;

    /// Tear the channel down. Called on cancellation during command
    /// execution (§5: "terminates the session... rather than attempting
    /// to abort a partially received response") and on normal shutdown.
    async fn close(&mut self);

    /// Re-establish the channel after a transport failure (§4.7 reconnect
    /// backoff). Returns once the new channel is ready to accept
    /// `execute` calls again.
    async fn reconnect(&mut self) -> Result<()>;
}
