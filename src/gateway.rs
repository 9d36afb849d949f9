use log::trace;
use std::net::IpAddr;
use std::process::Command;

/// Returns the IP address of the interface's default gateway by querying the
/// OS routing table, or `None` when there is no default route, the command
/// fails, or its output cannot be parsed.  Best effort, all failures are
/// silent.
pub fn gateway_ip(ifname: &str) -> Option<IpAddr> {
    let mut cmd = Command::new("ip");
    cmd.args(["route", "show", "dev", ifname]);
    trace!("executing {cmd:?}");

    let output = cmd.output().ok()?;
    if !output.status.success() {
        return None;
    }

    parse_default_route(&String::from_utf8_lossy(&output.stdout))
}

// A meaningful "ip route" answer starts with the word "default" and carries
// the gateway address in the third field.
fn parse_default_route(out: &str) -> Option<IpAddr> {
    let fields: Vec<&str> = out.split_whitespace().collect();
    if fields.len() < 3 || fields[0] != "default" {
        return None;
    }

    fields[2].parse().ok()
}
