cfg_if::cfg_if! {
    if #[cfg(target_os = "linux")] {
        mod linux;
        pub(crate) use linux::*;
        pub use linux::DhcpcdConf;
    } else if #[cfg(unix)] {
        mod generic;
        pub(crate) use generic::*;
    }
}

cfg_if::cfg_if! {
    if #[cfg(unix)] {
        mod posix;
        pub(crate) use posix::{close_port_checker, query_interfaces};
    }
}
