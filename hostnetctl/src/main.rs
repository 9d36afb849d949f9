use clap::{Parser, Subcommand};
use hostnet::{check_port, collect_all_addresses, enumerate_interfaces, gateway_ip, is_addr_in_use};
use std::net::IpAddr;
use std::process::exit;

#[derive(Debug, Parser)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List interfaces eligible for listening, as JSON
    ListInterfaces,
    /// List every bound address, link-local included
    ListAddresses,
    /// Probe a local port for availability
    CheckPort {
        #[clap(long, default_value = "tcp")]
        network: String,
        ip: IpAddr,
        port: u16,
    },
    /// Print the default gateway of an interface
    Gateway { ifname: String },
}

fn main() {
    env_logger::init();

    let args = Cli::parse();

    match args.command {
        Commands::ListInterfaces => {
            let interfaces = enumerate_interfaces().unwrap();
            println!("{}", serde_json::to_string_pretty(&interfaces).unwrap());
        }
        Commands::ListAddresses => {
            for addr in collect_all_addresses().unwrap() {
                println!("{addr}");
            }
        }
        Commands::CheckPort { network, ip, port } => match check_port(&network, ip, port) {
            Ok(()) => println!("{network} {ip}:{port} is available"),
            Err(err) => {
                if is_addr_in_use(&err) {
                    eprintln!("{network} {ip}:{port} is already in use");
                } else {
                    eprintln!("checking {network} {ip}:{port}: {err}");
                }
                exit(1);
            }
        },
        Commands::Gateway { ifname } => match gateway_ip(&ifname) {
            Some(gateway) => println!("{gateway}"),
            None => {
                eprintln!("no default gateway for {ifname}");
                exit(1);
            }
        },
    }
}
