use crate::{sys, Error};
use nix::errno::Errno;
use std::error::Error as StdError;
use std::io;
use std::net::{IpAddr, SocketAddr, TcpListener, UdpSocket};

/// Checks that a TCP listener can be bound to `127.0.0.1:<port>`.  `Ok(())`
/// means the port is bindable; the listener is released before returning.
pub fn can_bind_port(port: u16) -> Result<(), Error> {
    let addr: SocketAddr = format!("127.0.0.1:{port}")
        .parse()
        .map_err(Error::Resolve)?;

    let listener = TcpListener::bind(addr).map_err(Error::Bind)?;
    drop(listener);
    Ok(())
}

/// Checks that `port` on `ip` is available for binding.  `network` is
/// expected to be one of `"tcp"` and `"udp"`; any other value succeeds
/// trivially, no probe is performed.
pub fn check_port(network: &str, ip: IpAddr, port: u16) -> Result<(), Error> {
    let addr = SocketAddr::new(ip, port);
    match network {
        "tcp" => {
            let listener = TcpListener::bind(addr).map_err(Error::Bind)?;
            sys::close_port_checker(listener)
        }
        "udp" => {
            let socket = UdpSocket::bind(addr).map_err(Error::Bind)?;
            sys::close_port_checker(socket)
        }
        _ => Ok(()),
    }
}

/// Checks if `err` is about unsuccessful address binding.
///
/// Pure classification: walks the error's source chain for an I/O error
/// carrying a raw OS code and asks the platform whether that code means
/// address-in-use.  Anything else is `false`.
pub fn is_addr_in_use(err: &(dyn StdError + 'static)) -> bool {
    let mut cause = Some(err);
    while let Some(err) = cause {
        if let Some(io_err) = err.downcast_ref::<io::Error>() {
            if let Some(code) = io_err.raw_os_error() {
                return sys::is_addr_in_use(Errno::from_i32(code));
            }
        }
        cause = err.source();
    }

    false
}

/// Checks if the current process can bind to privileged ports (below 1024)
/// without elevation.  An indeterminate answer is an error, not `false`.
pub fn can_bind_privileged_ports() -> Result<bool, Error> {
    sys::can_bind_privileged_ports()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_check_port_conflict() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let err = check_port("tcp", addr.ip(), addr.port()).unwrap_err();
        assert!(matches!(err, Error::Bind(_)));
        assert!(is_addr_in_use(&err));

        let err = can_bind_port(addr.port()).unwrap_err();
        assert!(is_addr_in_use(&err));
    }

    #[test]
    fn test_check_port_free() {
        // An OS-assigned ephemeral port, released before re-probing.
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        check_port("tcp", addr.ip(), addr.port()).unwrap();

        let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
        let addr = socket.local_addr().unwrap();
        drop(socket);

        check_port("udp", addr.ip(), addr.port()).unwrap();
    }

    #[test]
    fn test_check_port_unknown_network() {
        // Unknown protocols are intentionally permissive.
        check_port("sctp", "127.0.0.1".parse().unwrap(), 1).unwrap();
        check_port("", "127.0.0.1".parse().unwrap(), 1).unwrap();
    }

    #[test]
    fn test_can_bind_port_ephemeral() {
        can_bind_port(0).unwrap();
    }

    #[test]
    fn test_is_addr_in_use_other_errors() {
        assert!(!is_addr_in_use(&Error::NoInterfaces));
        assert!(!is_addr_in_use(&Error::Bind(io::Error::from_raw_os_error(
            libc::EACCES
        ))));
        assert!(!is_addr_in_use(&io::Error::new(
            io::ErrorKind::Other,
            "no os code here"
        )));
    }

    #[test]
    fn test_is_addr_in_use_eaddrinuse() {
        let err = Error::Bind(io::Error::from_raw_os_error(libc::EADDRINUSE));
        assert!(is_addr_in_use(&err));
    }
}
