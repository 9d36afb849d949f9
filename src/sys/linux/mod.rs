use crate::traits::StaticIpProvider;
use crate::{gateway, iface, Error};
use hwaddr::MacAddr6;
use ipnet::{IpNet, Ipv4Net};
use nix::errno::Errno;
use nix::unistd::Uid;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::net::IpAddr;
use std::path::PathBuf;

const CAP_NET_BIND_SERVICE: u32 = 10;

pub(crate) fn is_addr_in_use(errno: Errno) -> bool {
    errno == Errno::EADDRINUSE
}

pub(crate) fn can_bind_privileged_ports() -> Result<bool, Error> {
    if Uid::effective().is_root() {
        return Ok(true);
    }

    let status = fs::read_to_string("/proc/self/status")?;
    Ok(has_effective_cap(&status, CAP_NET_BIND_SERVICE))
}

fn has_effective_cap(status: &str, cap: u32) -> bool {
    status
        .lines()
        .find_map(|line| line.strip_prefix("CapEff:"))
        .map(str::trim)
        .and_then(|hex| u64::from_str_radix(hex, 16).ok())
        .map_or(false, |mask| mask >> cap & 1 == 1)
}

/// Returns the link-layer address the kernel exposes through sysfs, or
/// `None` for interfaces without one (loopback, tunnels).
pub(crate) fn if_hwaddr(name: &str) -> Option<MacAddr6> {
    let raw = fs::read_to_string(format!("/sys/class/net/{name}/address")).ok()?;

    raw.trim().parse::<MacAddr6>().ok().filter(|mac| !mac.is_nil())
}

pub(crate) fn static_ip_provider() -> DhcpcdConf {
    DhcpcdConf::system()
}

/// Static-IP configuration backed by dhcpcd's configuration file.
#[derive(Debug, Clone)]
pub struct DhcpcdConf {
    path: PathBuf,
}

impl DhcpcdConf {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn system() -> Self {
        Self::new("/etc/dhcpcd.conf")
    }
}

impl StaticIpProvider for DhcpcdConf {
    fn has_static_ip(&self, ifname: &str) -> Result<bool, Error> {
        let conf = match fs::read_to_string(&self.path) {
            Ok(conf) => conf,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(Error::NoStaticIpInfo)
            }
            Err(err) => return Err(Error::Io(err)),
        };

        Ok(dhcpcd_conf_has_static_ip(&conf, ifname))
    }

    fn set_static_ip(&self, ifname: &str) -> Result<(), Error> {
        let subnet = first_ipv4_subnet(ifname)
            .ok_or_else(|| Error::NoIpv4Address(ifname.to_string()))?;
        let gateway = gateway::gateway_ip(ifname);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(dhcpcd_static_config(ifname, subnet, gateway).as_bytes())?;

        Ok(())
    }
}

fn first_ipv4_subnet(ifname: &str) -> Option<Ipv4Net> {
    let interfaces = iface::enumerate_interfaces().ok()?;

    interfaces
        .into_iter()
        .find(|iface| iface.name == ifname)?
        .subnets
        .into_iter()
        .find_map(|subnet| match subnet {
            IpNet::V4(subnet) => Some(subnet),
            IpNet::V6(_) => None,
        })
}

/// Checks whether the interface's block in dhcpcd.conf assigns a static
/// address.  Only lines between this interface's `interface` directive and
/// the next one count.
fn dhcpcd_conf_has_static_ip(conf: &str, ifname: &str) -> bool {
    let mut in_block = false;
    for line in conf.lines().map(str::trim) {
        if let Some(rest) = line.strip_prefix("interface ") {
            in_block = rest.trim() == ifname;
            continue;
        }
        if in_block && line.starts_with("static ip_address=") {
            return true;
        }
    }

    false
}

/// Builds the dhcpcd.conf block pinning the interface to its current
/// address.  DNS falls back to the address itself when no gateway is known.
fn dhcpcd_static_config(ifname: &str, subnet: Ipv4Net, gateway: Option<IpAddr>) -> String {
    let mut conf = format!("\ninterface {ifname}\nstatic ip_address={subnet}\n");
    if let Some(gateway) = gateway {
        conf += &format!("static routers={gateway}\n");
    }
    let dns = gateway.map_or_else(|| subnet.addr().to_string(), |gw| gw.to_string());
    conf += &format!("static domain_name_servers={dns}\n\n");

    conf
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_has_effective_cap() {
        let status = "Name:\ttest\nCapPrm:\t0000000000000000\nCapEff:\t0000000000000400\n";
        assert!(has_effective_cap(status, CAP_NET_BIND_SERVICE));

        let status = "CapEff:\t0000000000000000\n";
        assert!(!has_effective_cap(status, CAP_NET_BIND_SERVICE));

        assert!(!has_effective_cap("", CAP_NET_BIND_SERVICE));
        assert!(!has_effective_cap("CapEff:\tnot-hex\n", CAP_NET_BIND_SERVICE));
    }

    #[test]
    fn test_dhcpcd_conf_has_static_ip() {
        let conf = "#comment\n\
                    interface eth0\n\
                    static ip_address=192.168.0.2/24\n\
                    \n\
                    interface wlan0\n\
                    static routers=192.168.0.1\n";

        assert!(dhcpcd_conf_has_static_ip(conf, "eth0"));
        // wlan0 pins only the router, not the address.
        assert!(!dhcpcd_conf_has_static_ip(conf, "wlan0"));
        assert!(!dhcpcd_conf_has_static_ip(conf, "eth1"));
    }

    #[test]
    fn test_dhcpcd_conf_block_boundaries() {
        let conf = "static ip_address=10.0.0.2/24\n\
                    interface eth0\n\
                    option rapid_commit\n";

        // The assignment before any interface directive belongs to no block.
        assert!(!dhcpcd_conf_has_static_ip(conf, "eth0"));
    }

    #[test]
    fn test_dhcpcd_static_config() {
        let subnet: Ipv4Net = "192.168.0.2/24".parse().unwrap();
        let gateway: IpAddr = "192.168.0.1".parse().unwrap();

        assert_eq!(
            dhcpcd_static_config("eth0", subnet, Some(gateway)),
            "\ninterface eth0\n\
             static ip_address=192.168.0.2/24\n\
             static routers=192.168.0.1\n\
             static domain_name_servers=192.168.0.1\n\n"
        );

        assert_eq!(
            dhcpcd_static_config("eth0", subnet, None),
            "\ninterface eth0\n\
             static ip_address=192.168.0.2/24\n\
             static domain_name_servers=192.168.0.2\n\n"
        );
    }

    #[test]
    fn test_dhcpcd_conf_provider() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "interface eth0\nstatic ip_address=192.168.0.2/24\n").unwrap();

        let provider = DhcpcdConf::new(file.path());
        assert!(provider.has_static_ip("eth0").unwrap());
        assert!(!provider.has_static_ip("eth1").unwrap());
    }

    #[test]
    fn test_dhcpcd_conf_missing_file() {
        let provider = DhcpcdConf::new("/nonexistent/dhcpcd.conf");
        assert!(matches!(
            provider.has_static_ip("eth0"),
            Err(Error::NoStaticIpInfo)
        ));
    }
}
