#![allow(non_camel_case_types)]
#![allow(dead_code)]

use super::ifacename::{InterfaceName, InterfaceNameError};
use std::mem;

#[repr(C)]
#[derive(Copy, Clone, Default)]
pub struct ifreq {
    pub ifr_ifrn: InterfaceName,
    pub ifr_ifru: ifreq_ifru,
}

#[repr(C)]
#[derive(Copy, Clone)]
pub union ifreq_ifru {
    pub ifru_addr: libc::sockaddr,
    pub ifru_netmask: libc::sockaddr,
    pub ifru_flags: libc::c_short,
    pub ifru_ivalue: libc::c_int,
    pub ifru_mtu: libc::c_int,
    align: [u64; 3usize],
}

impl Default for ifreq_ifru {
    fn default() -> Self {
        unsafe { mem::zeroed() }
    }
}

impl ifreq {
    pub fn new(name: &str) -> Result<Self, InterfaceNameError> {
        Ok(ifreq {
            ifr_ifrn: InterfaceName::try_from(name)?,
            ..Default::default()
        })
    }
}
