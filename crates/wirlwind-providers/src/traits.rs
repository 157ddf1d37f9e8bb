use wirlwind_types::{Envelope, StateReader};

/// Per-vendor strategy object (§4.6, GLOSSARY "Vendor driver").
///
/// Implementations are `Send + Sync` so a single driver instance can be
/// shared behind an `Arc` across the poll engine's single worker and any
/// concurrent `post_process` calls for *different* collections (§5
/// Reentrancy: same-collection concurrent calls are forbidden by the
/// caller's scheduling, not by this trait).
pub trait VendorDriver: Send + Sync {
    /// Stable registration key (§4.6).
    fn vendor_id(&self) -> &'static str;

    /// Single CLI command to disable paging on first connect. Empty string
    /// if the vendor needs none (§4.6).
    fn pagination_command(&self) -> &'static str;

    /// Pure per-collection transform. May read prior state via `state`
    /// (e.g. for rate deltas) but must not mutate it (§4.6).
    fn post_process(&self, collection_name: &str, envelope: Envelope, state: &dyn StateReader) -> Envelope;

    /// Optional self-test hook surfaced by `--preflight-only`. Default:
    /// no warnings.
    fn self_check(&self) -> Vec<String> {
        Vec::new()
    }
}
