use crate::traits::StaticIpProvider;
use crate::Error;
use hwaddr::MacAddr6;
use nix::errno::Errno;
use nix::unistd::Uid;

pub(crate) fn is_addr_in_use(errno: Errno) -> bool {
    errno == Errno::EADDRINUSE
}

pub(crate) fn can_bind_privileged_ports() -> Result<bool, Error> {
    Ok(Uid::effective().is_root())
}

pub(crate) fn if_hwaddr(_name: &str) -> Option<MacAddr6> {
    None
}

pub(crate) fn static_ip_provider() -> UnsupportedStaticIp {
    UnsupportedStaticIp
}

/// Platforms without a recognized network configuration layout cannot answer
/// static-IP questions.
pub struct UnsupportedStaticIp;

impl StaticIpProvider for UnsupportedStaticIp {
    fn has_static_ip(&self, _ifname: &str) -> Result<bool, Error> {
        Err(Error::NoStaticIpInfo)
    }

    fn set_static_ip(&self, _ifname: &str) -> Result<(), Error> {
        Err(Error::NoStaticIpInfo)
    }
}
