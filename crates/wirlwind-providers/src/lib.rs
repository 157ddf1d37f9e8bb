//! Vendor Driver framework (§4.6): the `VendorDriver` trait, the
//! explicit registration table, the shared per-collection transforms, and
//! the five built-in drivers.

mod arista_eos;
mod cisco_ios;
mod cisco_ios_xe;
mod cisco_nxos;
mod common;
mod error;
mod juniper_junos;
mod registry;
mod traits;
mod transforms;

pub use error::{Error, Result};
pub use registry::DriverRegistry;
pub use traits::VendorDriver;
pub use transforms as shared_transforms;

pub use arista_eos::AristaEos;
pub use cisco_ios::CiscoIos;
pub use cisco_ios_xe::CiscoIosXe;
pub use cisco_nxos::CiscoNxos;
pub use juniper_junos::JuniperJunos;
