use crate::iface::RawInterface;
use crate::Error;

/// Source of raw, unfiltered interface data.  The live implementation asks
/// the OS; tests substitute synthetic interface sets.
pub(crate) trait InterfaceSource {
    fn query(&self) -> Result<Vec<RawInterface>, Error>;
}

/// Platform capability for querying and configuring a statically assigned
/// IP address on an interface.
///
/// An implementation that cannot give a definitive `has_static_ip` answer
/// returns [`Error::NoStaticIpInfo`], which is distinct from `Ok(false)`.
pub trait StaticIpProvider {
    fn has_static_ip(&self, ifname: &str) -> Result<bool, Error>;
    fn set_static_ip(&self, ifname: &str) -> Result<(), Error>;
}
