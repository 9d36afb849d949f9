use crate::Error;
use ipnet::IpNet;
use std::net::{IpAddr, Ipv4Addr};
use thiserror::Error as ThisError;

/// Calculates the broadcast address for `network`: the base address with
/// every bit set wherever the mask bit is zero.
///
/// The computation works on a fresh octet buffer, so the caller's value is
/// never mutated.
pub fn broadcast_from_ipnet(network: IpNet) -> IpAddr {
    match network {
        IpNet::V4(n) => {
            let mut octets = n.addr().octets();
            for (b, m) in octets.iter_mut().zip(n.netmask().octets()) {
                *b |= !m;
            }
            IpAddr::from(octets)
        }
        IpNet::V6(n) => {
            let mut octets = n.addr().octets();
            for (b, m) in octets.iter_mut().zip(n.netmask().octets()) {
                *b |= !m;
            }
            IpAddr::from(octets)
        }
    }
}

/// Calculates the broadcast address for a bare address with no mask supplied.
///
/// IPv4 addresses use the classful default mask (first octet below 128 means
/// /8, below 192 means /16, below 224 means /24).  IPv6 addresses and IPv4
/// addresses outside those classes have no default mask and come back
/// unchanged.
pub fn broadcast_from_ip(ip: IpAddr) -> IpAddr {
    let addr = match ip {
        IpAddr::V4(addr) => addr,
        IpAddr::V6(_) => return ip,
    };

    let prefix = match default_ipv4_prefix(addr) {
        Some(prefix) => prefix,
        None => return ip,
    };

    let mask = !(u32::MAX >> prefix);
    IpAddr::V4(Ipv4Addr::from(u32::from(addr) | !mask))
}

fn default_ipv4_prefix(addr: Ipv4Addr) -> Option<u32> {
    match addr.octets()[0] {
        0..=0x7f => Some(8),
        0x80..=0xbf => Some(16),
        0xc0..=0xdf => Some(24),
        _ => None,
    }
}

#[derive(Debug, ThisError, Clone, Copy, Eq, PartialEq)]
pub enum HostSplitError {
    #[error("missing port in address")]
    MissingPort,
    #[error("too many colons in address")]
    TooManyColons,
    #[error("missing ']' in address")]
    MissingBracket,
    #[error("unexpected '[' in address")]
    UnexpectedOpenBracket,
    #[error("unexpected ']' in address")]
    UnexpectedCloseBracket,
}

/// Splits the host out of a `host:port` string for the cases when the input
/// does not necessarily contain a port.
///
/// A recognized missing-port condition falls back to the whole input as the
/// host, with brackets stripped for a fully bracketed IPv6 literal.  Any
/// other malformation is an error.
pub fn split_host(hostport: &str) -> Result<String, Error> {
    match split_host_port(hostport) {
        Ok((host, _)) => Ok(host.to_string()),
        Err(HostSplitError::MissingPort) => Ok(trim_host_brackets(hostport).to_string()),
        Err(source) => Err(Error::HostParse {
            input: hostport.to_string(),
            source,
        }),
    }
}

fn split_host_port(hostport: &str) -> Result<(&str, &str), HostSplitError> {
    if let Some(rest) = hostport.strip_prefix('[') {
        let end = rest.find(']').ok_or(HostSplitError::MissingBracket)?;
        let host = &rest[..end];
        let after = &rest[end + 1..];

        return match after.strip_prefix(':') {
            Some(port) if port.contains(|c| c == ':' || c == '[' || c == ']') => {
                Err(HostSplitError::TooManyColons)
            }
            Some(port) => Ok((host, port)),
            None if after.is_empty() => Err(HostSplitError::MissingPort),
            None => Err(HostSplitError::UnexpectedCloseBracket),
        };
    }

    let i = hostport.rfind(':').ok_or(HostSplitError::MissingPort)?;
    let (host, port) = (&hostport[..i], &hostport[i + 1..]);

    if host.contains(':') {
        Err(HostSplitError::TooManyColons)
    } else if host.contains(|c| c == '[' || c == ']') || port.contains(|c| c == '[' || c == ']') {
        Err(HostSplitError::UnexpectedOpenBracket)
    } else {
        Ok((host, port))
    }
}

fn trim_host_brackets(host: &str) -> &str {
    host.strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_broadcast_from_ipnet() {
        let network: IpNet = "192.0.2.10/24".parse().unwrap();
        assert_eq!(
            broadcast_from_ipnet(network),
            "192.0.2.255".parse::<IpAddr>().unwrap()
        );

        let network: IpNet = "10.20.30.40/19".parse().unwrap();
        assert_eq!(
            broadcast_from_ipnet(network),
            "10.20.31.255".parse::<IpAddr>().unwrap()
        );

        let network: IpNet = "2001:db8::1/112".parse().unwrap();
        assert_eq!(
            broadcast_from_ipnet(network),
            "2001:db8::ffff".parse::<IpAddr>().unwrap()
        );
    }

    #[test]
    fn test_broadcast_default_mask() {
        // Classful defaults: A is /8, B is /16, C is /24.
        let cases = [
            ("10.1.2.3", "10.255.255.255"),
            ("172.16.1.1", "172.16.255.255"),
            ("192.168.1.1", "192.168.1.255"),
        ];
        for (ip, want) in cases {
            assert_eq!(
                broadcast_from_ip(ip.parse().unwrap()),
                want.parse::<IpAddr>().unwrap(),
                "broadcasting {ip}",
            );
        }

        // Class D and IPv6 have no default mask.
        let multicast: IpAddr = "224.0.0.1".parse().unwrap();
        assert_eq!(broadcast_from_ip(multicast), multicast);
        let v6: IpAddr = "2001:db8::1".parse().unwrap();
        assert_eq!(broadcast_from_ip(v6), v6);
    }

    #[test]
    fn test_split_host() {
        assert_eq!(split_host("example.com:53").unwrap(), "example.com");
        assert_eq!(split_host("example.com").unwrap(), "example.com");
        assert_eq!(split_host("127.0.0.1:5353").unwrap(), "127.0.0.1");
        assert_eq!(split_host("[::1]:53").unwrap(), "::1");
        assert_eq!(split_host("[::1]").unwrap(), "::1");
        assert_eq!(split_host("").unwrap(), "");
    }

    #[test]
    fn test_split_host_malformed() {
        assert!(split_host("[::1").is_err());
        assert!(split_host("::1").is_err());
        assert!(split_host("a:b:c").is_err());
        assert!(split_host("[::1]extra:53").is_err());
        assert!(split_host("exa]mple.com:53").is_err());
    }

    #[test]
    fn test_split_host_port_errors() {
        assert_eq!(
            split_host_port("example.com"),
            Err(HostSplitError::MissingPort)
        );
        assert_eq!(split_host_port("[::1]"), Err(HostSplitError::MissingPort));
        assert_eq!(
            split_host_port("[::1"),
            Err(HostSplitError::MissingBracket)
        );
        assert_eq!(
            split_host_port("::1"),
            Err(HostSplitError::TooManyColons)
        );
        assert_eq!(
            split_host_port("[::1]:53:54"),
            Err(HostSplitError::TooManyColons)
        );
        assert_eq!(
            split_host_port("[::1]x:53"),
            Err(HostSplitError::UnexpectedCloseBracket)
        );
    }
}
