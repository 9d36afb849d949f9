//! Host-level network introspection and address arithmetic: enumerating
//! network interfaces with their addresses and subnets, probing local port
//! availability, computing broadcast addresses and looking up the default
//! gateway.
//!
//! Every call re-queries the OS; nothing is cached, and repeated calls may
//! observe different results as interface state changes.

mod addr;
mod error;
mod gateway;
mod iface;
mod probe;
mod traits;
pub mod sys;

pub use ipnet;

pub use addr::{broadcast_from_ip, broadcast_from_ipnet, split_host, HostSplitError};
pub use error::Error;
pub use gateway::gateway_ip;
pub use hwaddr::MacAddr6;
pub use iface::{
    collect_all_addresses, enumerate_interfaces, interface_by_ip, subnet_for_interface,
    InterfaceFlags, NetworkInterface,
};
pub use probe::{can_bind_port, can_bind_privileged_ports, check_port, is_addr_in_use};
pub use traits::StaticIpProvider;

/// Checks if the interface is configured to have a static IP address.
///
/// When the platform cannot give a definitive answer, the error is
/// [`Error::NoStaticIpInfo`].
pub fn iface_has_static_ip(ifname: &str) -> Result<bool, Error> {
    sys::static_ip_provider().has_static_ip(ifname)
}

/// Pins the interface's current IP address in the platform's network
/// configuration.
pub fn iface_set_static_ip(ifname: &str) -> Result<(), Error> {
    sys::static_ip_provider().set_static_ip(ifname)
}
