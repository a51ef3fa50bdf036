pub mod discard;
pub mod echo;

pub use discard::Discard;
pub use echo::Echo;

use crate::error::WakeError;
use crate::packet::MagicPacket;
use crate::wol::Config;
use num_enum::TryFromPrimitive;
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, TryFromPrimitive)]
pub enum Protocol {
    /// UDP datagram to the discard service.
    Discard = 0,
    /// Raw ICMP send that waits for the payload to come back.
    Echo = 1,
}

impl Protocol {
    pub fn from_u8(value: u8) -> Result<Protocol, WakeError> {
        Protocol::try_from(value).map_err(|e| WakeError::UnsupportedProtocol {
            value: e.number.to_string(),
        })
    }

    pub fn transport(&self, config: &Config) -> Box<dyn Transport> {
        match self {
            Protocol::Discard => Box::new(Discard::new(config.discard_port)),
            Protocol::Echo => Box::new(Echo::new(config.echo_timeout)),
        }
    }
}

impl Default for Protocol {
    fn default() -> Self {
        Protocol::Discard
    }
}

impl FromStr for Protocol {
    type Err = WakeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "discard" => Ok(Protocol::Discard),
            "echo" => Ok(Protocol::Echo),
            other => match other.parse::<u8>() {
                Ok(n) => Protocol::from_u8(n),
                Err(_) => Err(WakeError::UnsupportedProtocol {
                    value: s.to_string(),
                }),
            },
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Protocol::Discard => write!(f, "discard"),
            Protocol::Echo => write!(f, "echo"),
        }
    }
}

/// Where a packet goes and, optionally, which local address it leaves from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Route {
    pub destination: Ipv4Addr,
    pub source: Option<Ipv4Addr>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Sent,
    /// Bytes the target sent back, identical to the packet.
    Echoed(Vec<u8>),
}

pub trait Transport {
    fn send(&self, packet: &MagicPacket, route: &Route) -> Result<Outcome, WakeError>;
}
