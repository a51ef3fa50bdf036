use clap::Parser;
use lanwake::packet::MagicPacket;
use lanwake::{Config, MacAddress, Outcome, Protocol, WakeOptions, Waker};
use log::{error, info};
use std::net::Ipv4Addr;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Target MAC addresses, in xx:xx:xx:xx:xx:xx, xx-xx-xx-xx-xx-xx or xxxxxxxxxxxx form.
    #[arg(required = true)]
    macs: Vec<String>,

    /// How to send the packet: discard (UDP) or echo (ICMP, needs raw socket access).
    #[arg(long, env = "LANWAKE_PROTOCOL", default_value = "discard")]
    protocol: Protocol,

    /// Send from this interface to its subnet broadcast address.
    #[arg(long, env = "LANWAKE_INTERFACE")]
    interface: Option<String>,

    /// UDP port for the discard protocol.
    #[arg(long, default_value_t = 9)]
    port: u16,

    /// Destination when no interface is given.
    #[arg(long, default_value = "255.255.255.255")]
    broadcast: Ipv4Addr,

    /// How long to wait for an echo reply, in milliseconds.
    #[arg(long, default_value_t = 2000, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_ms: u64,

    /// If true, print the destination and packet instead of sending.
    #[arg(long)]
    dry_run: bool,
}

fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<String>>()
        .join(" ")
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("INFO"))
        .format_timestamp(Some(env_logger::fmt::TimestampPrecision::Millis))
        .init();

    let config = Config {
        discard_port: args.port,
        broadcast: args.broadcast,
        echo_timeout: Duration::from_millis(args.timeout_ms),
    };
    let waker = Waker::new(config);
    let mut options = WakeOptions::default().protocol(args.protocol);
    if let Some(name) = &args.interface {
        options = options.interface(name.as_str());
    }

    if args.dry_run {
        let route = waker.route(&options)?;
        for mac in &args.macs {
            let packet = MagicPacket::new(MacAddress::parse(mac)?);
            println!(
                "{} via {} to {} from {}",
                packet.target(),
                args.protocol,
                route.destination,
                route
                    .source
                    .map_or_else(|| "any".to_string(), |s| s.to_string()),
            );
            println!("{}", hex(packet.as_bytes()));
        }
        return Ok(());
    }

    let mut failures = 0;
    for mac in &args.macs {
        match waker.wake(mac, &options) {
            Ok(Outcome::Sent) => info!("woke {}", mac),
            Ok(Outcome::Echoed(reply)) => info!("woke {}, {} bytes echoed", mac, reply.len()),
            Err(e) => {
                let mut msg = e.to_string();
                let mut source = std::error::Error::source(&e);
                while let Some(cause) = source {
                    msg.push_str(&format!(": {}", cause));
                    source = cause.source();
                }
                error!("{}: {}", mac, msg);
                failures += 1;
            }
        }
    }
    if failures > 0 {
        return Err(format!("{} of {} targets failed", failures, args.macs.len()).into());
    }
    Ok(())
}
