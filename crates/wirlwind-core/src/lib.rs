//! Device-facing parsing core: template resolver, sanitizer, parser chain
//! (TextFSM/TTP/regex), and the parse trace recorder (spec §2 items 1-3).
//!
//! Pure and non-suspending (spec §5): nothing here performs network I/O.

mod chain;
mod error;
mod regex_parser;
mod resolver;
mod sanitizer;
mod textfsm;
mod trace_recorder;
mod ttp;

pub use chain::{ChainOutcome, ParserChain};
pub use error::{Error, Result};
pub use resolver::TemplateResolver;
pub use sanitizer::sanitize;
pub use textfsm::TextFsmTemplate;
pub use trace_recorder::ParseTraceRecorder;
pub use ttp::TtpTemplate;
