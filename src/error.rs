use crate::addr::HostSplitError;
use std::io;
use std::net::AddrParseError;
use thiserror::Error as ThisError;

#[non_exhaustive]
#[derive(Debug, ThisError)]
pub enum Error {
    #[error("couldn't get interfaces: {0}")]
    InterfaceQuery(#[source] io::Error),
    #[error("couldn't find any legible interface")]
    NoInterfaces,
    #[error("failed to get addresses for interface {iface}: {source}")]
    AddressQuery {
        iface: String,
        #[source]
        source: io::Error,
    },
    #[error("interface {iface} has a malformed address entry: {what}")]
    UnexpectedAddress { iface: String, what: String },
    #[error("invalid interface name: {0:?}")]
    InvalidName(String),
    #[error("splitting host and port from {input:?}: {source}")]
    HostParse {
        input: String,
        #[source]
        source: HostSplitError,
    },
    #[error("resolving address: {0}")]
    Resolve(#[source] AddrParseError),
    #[error("binding: {0}")]
    Bind(#[source] io::Error),
    #[error("closing port checker: {0}")]
    Close(#[source] io::Error),
    #[error("no information about static ip")]
    NoStaticIpInfo,
    #[error("can't get IPv4 address for interface {0}")]
    NoIpv4Address(String),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
