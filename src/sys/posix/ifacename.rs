use delegate::delegate;
use std::ffi::CString;
use std::iter::zip;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InterfaceNameError {
    #[error("interface name does not fit IFNAMSIZ (null-terminated): {0:?}")]
    NameTooLong(String),
    #[error("NUL byte inside interface name: {0:?}")]
    NulByte(String),
    #[error("interface name buffer is not null-terminated: {0:?}")]
    Unterminated(Vec<libc::c_char>),
    #[error("interface name is not valid Unicode: {0:?}")]
    InvalidUnicode(Vec<libc::c_char>),
}

/// Fixed-size null-terminated interface name buffer, as passed to ioctls in
/// `ifreq.ifr_name`.
#[repr(transparent)]
#[derive(Copy, Clone, Debug)]
pub struct InterfaceName([libc::c_char; libc::IFNAMSIZ as _]);

impl Default for InterfaceName {
    fn default() -> Self {
        Self(unsafe { std::mem::zeroed() })
    }
}

impl FromStr for InterfaceName {
    type Err = InterfaceNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

impl TryFrom<&str> for InterfaceName {
    type Error = InterfaceNameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        if value.len() >= libc::IFNAMSIZ {
            return Err(InterfaceNameError::NameTooLong(value.to_string()));
        }
        let cname =
            CString::new(value).map_err(|_| InterfaceNameError::NulByte(value.to_string()))?;

        let mut result = Self::default();
        for (x, y) in zip(result.0.iter_mut(), cname.as_bytes_with_nul().iter()) {
            *x = *y as libc::c_char;
        }
        Ok(result)
    }
}

impl TryFrom<&InterfaceName> for String {
    type Error = InterfaceNameError;

    fn try_from(value: &InterfaceName) -> Result<Self, Self::Error> {
        if !value.is_valid() {
            return Err(InterfaceNameError::Unterminated(value.0.to_vec()));
        }
        Ok(unsafe { std::ffi::CStr::from_ptr(value.as_ptr()) }
            .to_str()
            .map_err(|_| InterfaceNameError::InvalidUnicode(value.0.to_vec()))?
            .to_string())
    }
}

impl InterfaceName {
    pub fn is_valid(&self) -> bool {
        self.0[libc::IFNAMSIZ - 1] == 0
    }

    delegate! {
        to self.0 {
            pub fn as_ptr(&self) -> *const libc::c_char;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let name = InterfaceName::try_from("eth0").unwrap();
        assert_eq!(String::try_from(&name).unwrap(), "eth0");
    }

    #[test]
    fn test_too_long() {
        assert!(InterfaceName::try_from("a-name-way-beyond-ifnamsiz").is_err());
    }

    #[test]
    fn test_nul_byte() {
        assert!(InterfaceName::try_from("eth\0").is_err());
    }
}
