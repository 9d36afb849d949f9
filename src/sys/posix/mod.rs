mod ifacename;
pub mod ifreq;
pub use ifacename::InterfaceName;

use crate::iface::{InterfaceFlags, RawInterface};
use crate::Error;
use ipnet::IpNet;
use log::debug;
use nix::ifaddrs::getifaddrs;
use nix::sys::socket::AddressFamily::{Inet, Inet6};
use nix::sys::socket::{SockaddrLike, SockaddrStorage};
use std::io;
use std::net::{self, Ipv4Addr};
use std::os::unix::io::{AsRawFd, IntoRawFd};

mod ioctls {
    nix::ioctl_read_bad!(siocgifmtu, libc::SIOCGIFMTU, super::ifreq::ifreq);
}

/// Queries the OS for all interfaces and their bound addresses, grouped per
/// interface in kernel enumeration order.  IP entries must carry a
/// well-formed netmask; other address families are passed over.
pub(crate) fn query_interfaces() -> Result<Vec<RawInterface>, Error> {
    let entries =
        getifaddrs().map_err(|errno| Error::InterfaceQuery(io::Error::from_raw_os_error(errno as i32)))?;

    let mut interfaces: Vec<RawInterface> = Vec::new();
    for entry in entries {
        let idx = match interfaces
            .iter()
            .position(|iface| iface.name == entry.interface_name)
        {
            Some(idx) => idx,
            None => {
                let mtu = if_mtu(&entry.interface_name).unwrap_or_else(|err| {
                    debug!("mtu for {}: {err}", entry.interface_name);
                    0
                });
                interfaces.push(RawInterface {
                    name: entry.interface_name.clone(),
                    hwaddr: super::if_hwaddr(&entry.interface_name),
                    flags: InterfaceFlags(entry.flags),
                    mtu,
                    addrs: Vec::new(),
                });
                interfaces.len() - 1
            }
        };
        let iface = &mut interfaces[idx];

        let address = match entry.address {
            Some(address) => address,
            None => continue,
        };

        if let Some(network) = entry_network(&iface.name, &address, entry.netmask.as_ref())? {
            iface.addrs.push(network);
        }
    }

    Ok(interfaces)
}

/// Converts one getifaddrs entry into an IP network.  `Ok(None)` for address
/// families that cannot carry an IP network; a missing or malformed netmask
/// on an IP entry is an error.
fn entry_network(
    ifname: &str,
    address: &SockaddrStorage,
    netmask: Option<&SockaddrStorage>,
) -> Result<Option<IpNet>, Error> {
    let network = match address.family() {
        Some(Inet) => {
            let sin = address
                .as_sockaddr_in()
                .ok_or_else(|| shape_error(ifname, "truncated IPv4 sockaddr"))?;
            let addr = Ipv4Addr::from(sin.ip());

            let mask = netmask
                .and_then(|mask| mask.as_sockaddr_in())
                .ok_or_else(|| shape_error(ifname, "missing IPv4 netmask"))?;
            let prefix = ipnetwork::ipv4_mask_to_prefix(Ipv4Addr::from(mask.ip()))
                .map_err(|_| shape_error(ifname, "non-contiguous IPv4 netmask"))?;

            IpNet::new(addr.into(), prefix)
                .map_err(|_| shape_error(ifname, "invalid IPv4 prefix length"))?
        }
        Some(Inet6) => {
            let sin6 = address
                .as_sockaddr_in6()
                .ok_or_else(|| shape_error(ifname, "truncated IPv6 sockaddr"))?;

            let mask = netmask
                .and_then(|mask| mask.as_sockaddr_in6())
                .ok_or_else(|| shape_error(ifname, "missing IPv6 netmask"))?;
            let prefix = ipnetwork::ipv6_mask_to_prefix(mask.ip())
                .map_err(|_| shape_error(ifname, "non-contiguous IPv6 netmask"))?;

            IpNet::new(sin6.ip().into(), prefix)
                .map_err(|_| shape_error(ifname, "invalid IPv6 prefix length"))?
        }
        _ => return Ok(None),
    };

    Ok(Some(network))
}

fn shape_error(ifname: &str, what: &str) -> Error {
    Error::UnexpectedAddress {
        iface: ifname.to_string(),
        what: what.to_string(),
    }
}

pub(crate) fn if_mtu(name: &str) -> Result<u32, Error> {
    let mut req =
        ifreq::ifreq::new(name).map_err(|_| Error::InvalidName(name.to_string()))?;

    let socket = make_dummy_socket()?;

    unsafe { ioctls::siocgifmtu(socket.as_raw_fd(), &mut req) }
        .map_err(|errno| Error::Io(io::Error::from_raw_os_error(errno as i32)))?;
    Ok(unsafe { req.ifr_ifru.ifru_mtu } as u32)
}

/// Releases a probe socket through a real close(2) so that a failing close
/// surfaces instead of being swallowed by drop.
pub(crate) fn close_port_checker<T: IntoRawFd>(checker: T) -> Result<(), Error> {
    nix::unistd::close(checker.into_raw_fd())
        .map_err(|errno| Error::Close(io::Error::from_raw_os_error(errno as i32)))
}

fn make_dummy_socket() -> Result<net::UdpSocket, Error> {
    net::UdpSocket::bind("127.0.0.1:0").map_err(Error::Io)
}
