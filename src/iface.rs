use crate::traits::InterfaceSource;
use crate::{sys, Error};
use hwaddr::MacAddr6;
use ipnet::IpNet;
use log::error;
use serde::{Serialize, Serializer};
use std::fmt;
use std::net::IpAddr;

/// A network interface eligible for DNS and web listening: its non-link-local
/// addresses and the subnets they belong to, plus link-layer metadata.
///
/// Constructed fresh from live OS state on every enumeration; two values from
/// different queries are related only by `name`.
#[derive(Debug, Clone, Serialize)]
pub struct NetworkInterface {
    pub name: String,
    /// Retained addresses in OS enumeration order.  Index-aligned with
    /// `subnets`.
    #[serde(rename = "ip_addresses", skip_serializing_if = "Vec::is_empty")]
    pub addresses: Vec<IpAddr>,
    /// The IP network each retained address belongs to.  Internal only, never
    /// serialized.
    #[serde(skip)]
    pub subnets: Vec<IpNet>,
    #[serde(rename = "hardware_address", serialize_with = "serialize_hwaddr")]
    pub hardware_addr: Option<MacAddr6>,
    #[serde(serialize_with = "serialize_string")]
    pub flags: InterfaceFlags,
    pub mtu: u32,
}

/// Interface state flags, rendered in the conventional `up|broadcast|...`
/// form (`"0"` when no flags are set).
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct InterfaceFlags(pub(crate) nix::net::if_::InterfaceFlags);

impl InterfaceFlags {
    pub fn empty() -> Self {
        Self(nix::net::if_::InterfaceFlags::empty())
    }
}

impl From<nix::net::if_::InterfaceFlags> for InterfaceFlags {
    fn from(flags: nix::net::if_::InterfaceFlags) -> Self {
        Self(flags)
    }
}

impl fmt::Display for InterfaceFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use nix::net::if_::InterfaceFlags as Iff;

        let names = [
            (Iff::IFF_UP, "up"),
            (Iff::IFF_BROADCAST, "broadcast"),
            (Iff::IFF_LOOPBACK, "loopback"),
            (Iff::IFF_POINTOPOINT, "pointtopoint"),
            (Iff::IFF_MULTICAST, "multicast"),
            (Iff::IFF_RUNNING, "running"),
        ];

        let mut first = true;
        for (flag, name) in names {
            if self.0.contains(flag) {
                if !first {
                    f.write_str("|")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        if first {
            f.write_str("0")?;
        }
        Ok(())
    }
}

fn serialize_hwaddr<S: Serializer>(
    hwaddr: &Option<MacAddr6>,
    s: S,
) -> Result<S::Ok, S::Error> {
    match hwaddr {
        Some(mac) => s.serialize_str(&mac.to_string()),
        None => s.serialize_str(""),
    }
}

fn serialize_string<S: Serializer>(v: &impl ToString, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&v.to_string())
}

/// Unfiltered per-interface data as reported by the OS, before the
/// enumeration policy is applied.
#[derive(Debug, Clone)]
pub(crate) struct RawInterface {
    pub(crate) name: String,
    pub(crate) hwaddr: Option<MacAddr6>,
    pub(crate) flags: InterfaceFlags,
    pub(crate) mtu: u32,
    /// All IP networks bound to the interface, link-local included.
    pub(crate) addrs: Vec<IpNet>,
}

pub(crate) struct SystemSource;

impl InterfaceSource for SystemSource {
    fn query(&self) -> Result<Vec<RawInterface>, Error> {
        sys::query_interfaces()
    }
}

/// Returns true for addresses valid only on their own network segment:
/// IPv4 169.254.0.0/16 and IPv6 fe80::/10.  These are excluded from the
/// canonical interface view.
pub(crate) fn is_link_local_unicast(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(addr) => addr.is_link_local(),
        IpAddr::V6(addr) => addr.segments()[0] & 0xffc0 == 0xfe80,
    }
}

/// Returns the interfaces eligible for DNS and web listening.  Link-local
/// addresses are dropped, and so is any interface left with no addresses.
pub fn enumerate_interfaces() -> Result<Vec<NetworkInterface>, Error> {
    enumerate_from(&SystemSource)
}

pub(crate) fn enumerate_from(
    source: &dyn InterfaceSource,
) -> Result<Vec<NetworkInterface>, Error> {
    let raw = source.query()?;
    if raw.is_empty() {
        return Err(Error::NoInterfaces);
    }

    let mut interfaces = Vec::new();
    for iface in raw {
        let mut netif = NetworkInterface {
            name: iface.name,
            addresses: Vec::new(),
            subnets: Vec::new(),
            hardware_addr: iface.hwaddr,
            flags: iface.flags,
            mtu: iface.mtu,
        };

        for subnet in iface.addrs {
            if is_link_local_unicast(subnet.addr()) {
                continue;
            }
            netif.addresses.push(subnet.addr());
            netif.subnets.push(subnet);
        }

        // Discard interfaces with no retained addresses.
        if !netif.addresses.is_empty() {
            interfaces.push(netif);
        }
    }

    Ok(interfaces)
}

/// Returns the name of the interface one of whose addresses equals `ip`
/// exactly, or `None` when there is no match or enumeration fails.  Best
/// effort: enumeration failure is deliberately indistinguishable from
/// not-found.
pub fn interface_by_ip(ip: IpAddr) -> Option<String> {
    let interfaces = enumerate_interfaces().ok()?;

    for iface in interfaces {
        if iface.addresses.iter().any(|addr| *addr == ip) {
            return Some(iface.name);
        }
    }

    None
}

/// Returns the first subnet of the named interface, or `None` when the
/// interface is unknown, has no subnets, or enumeration fails.
pub fn subnet_for_interface(ifname: &str) -> Option<IpNet> {
    let interfaces = match enumerate_interfaces() {
        Ok(interfaces) => interfaces,
        Err(err) => {
            error!("couldn't get network interfaces info: {err}");
            return None;
        }
    };

    interfaces
        .into_iter()
        .find(|iface| iface.name == ifname)
        .and_then(|iface| iface.subnets.into_iter().next())
}

/// Returns the addresses of all network interfaces as strings, without port
/// numbers or prefix lengths.  Unlike [`enumerate_interfaces`] this is an
/// unfiltered view: link-local addresses are included.
pub fn collect_all_addresses() -> Result<Vec<String>, Error> {
    let raw = sys::query_interfaces()?;

    Ok(raw
        .iter()
        .flat_map(|iface| iface.addrs.iter().map(|subnet| subnet.addr().to_string()))
        .collect())
}
