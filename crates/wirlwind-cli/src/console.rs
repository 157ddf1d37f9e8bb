//! Terminal rendering of the session event stream: connection and
//! collection-update events, colored by severity via `owo-colors`.

use is_terminal::IsTerminal;
use owo_colors::OwoColorize;
use wirlwind_types::{ConnectionEvent, SessionEvent, UpdateEvent};

pub struct ConsoleRenderer {
    debug: bool,
    color: bool,
}

impl ConsoleRenderer {
    pub fn new(debug: bool) -> Self {
        Self { debug, color: std::io::stdout().is_terminal() }
    }

    /// Apply `f` only when stdout is a terminal; plain text otherwise
    /// (piped/redirected output shouldn't carry ANSI escapes).
    fn style(&self, text: &str, f: impl FnOnce(&str) -> String) -> String {
        if self.color {
            f(text)
        } else {
            text.to_string()
        }
    }

    pub fn render(&self, event: &SessionEvent) {
        match event {
            SessionEvent::Update(update) => self.render_update(update),
            SessionEvent::Connection(conn) => self.render_connection(conn),
        }
    }

    fn render_update(&self, update: &UpdateEvent) {
        let tag = self.style(&format!("[{}]", update.collection), |s| s.cyan().to_string());
        match &update.error {
            Some(reason) => {
                let label = self.style("error:", |s| s.red().bold().to_string());
                println!("{tag} {label} {reason}");
            }
            None => {
                let body = if self.debug {
                    serde_json::to_string(&update.envelope).unwrap_or_default()
                } else {
                    format!("seq={} parsed_by={}", update.sequence, update.parsed_by)
                };
                let label = self.style("update", |s| s.green().to_string());
                println!("{tag} {label} {body}");
            }
        }
    }

    fn render_connection(&self, event: &ConnectionEvent) {
        match event {
            ConnectionEvent::Connected => println!("{}", self.style("connected", |s| s.green().bold().to_string())),
            ConnectionEvent::Reconnecting { attempt, delay_secs } => {
                let label = self.style("reconnecting", |s| s.yellow().bold().to_string());
                println!("{label} attempt {attempt}, retrying in {delay_secs}s");
            }
            ConnectionEvent::Disconnected { reason } => {
                let label = self.style("disconnected", |s| s.red().bold().to_string());
                println!("{label} {reason}");
            }
        }
    }
}
