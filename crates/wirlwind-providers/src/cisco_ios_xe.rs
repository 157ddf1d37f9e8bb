use wirlwind_types::{Envelope, StateReader};

use crate::common;
use crate::traits::VendorDriver;

/// IOS-XE's CLI surface is the IOS surface for every collection Wirlwind
/// polls; this driver exists as its own registration so `vendor_id` lookup
/// never needs to fall back (§3), but its transforms are identical to
/// [`crate::cisco_ios::CiscoIos`].
pub struct CiscoIosXe;

impl VendorDriver for CiscoIosXe {
    fn vendor_id(&self) -> &'static str {
        "cisco_ios_xe"
    }

    fn pagination_command(&self) -> &'static str {
        "terminal length 0"
    }

    fn post_process(&self, collection_name: &str, envelope: Envelope, state: &dyn StateReader) -> Envelope {
        super::cisco_ios::CiscoIos.post_process(collection_name, envelope, state)
    }
}
