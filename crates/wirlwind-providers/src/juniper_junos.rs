use wirlwind_types::{Envelope, StateReader};

use crate::common;
use crate::traits::VendorDriver;

/// Junos's CLI uses `set cli screen-length 0` rather than `terminal
/// length 0`; its CPU counters are averaged like IOS's, so drop-zero
/// applies, keyed on the `five_sec` column Junos's process table template
/// produces.
pub struct JuniperJunos;

impl VendorDriver for JuniperJunos {
    fn vendor_id(&self) -> &'static str {
        "juniper_junos"
    }

    fn pagination_command(&self) -> &'static str {
        "set cli screen-length 0"
    }

    fn post_process(&self, collection_name: &str, envelope: Envelope, _state: &dyn StateReader) -> Envelope {
        match collection_name {
            "cpu" => common::cpu_drop_zero(envelope, "five_sec"),
            "memory" => common::memory_transform(envelope),
            "interface_detail" => common::interface_detail_rates(envelope, "input_rate", "output_rate"),
            "neighbors" => common::neighbors_infer_capabilities(envelope),
            "log" => common::log_transform(envelope),
            "bgp_summary" => common::bgp_transform(envelope),
            _ => envelope,
        }
    }

    fn self_check(&self) -> Vec<String> {
        // Junos LLDP neighbor output never carries an explicit
        // capabilities field; flag the heuristic so --preflight-only
        // surfaces it rather than leaving it a silent surprise.
        vec!["neighbors.capabilities is inferred from platform substring matching on this vendor".to_string()]
    }
}
