pub mod ifaddrs;

pub use ifaddrs::SystemInterfaces;

use crate::error::WakeError;
use log::debug;
use std::net::{IpAddr, Ipv4Addr};

/// An IP address bound to an interface, as reported by the OS.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BoundAddress {
    pub ip: IpAddr,
    pub netmask: Option<IpAddr>,
}

/// The IPv4 attachment point chosen for sending.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct InterfaceAddress {
    pub address: Ipv4Addr,
    pub netmask: Ipv4Addr,
}

impl InterfaceAddress {
    pub fn broadcast(&self) -> Ipv4Addr {
        subnet_broadcast(self.address, self.netmask)
    }
}

pub trait InterfaceTable {
    /// Every IP address bound to `name`, in the order the OS lists them.
    /// Fails with `InterfaceNotFound` when no interface has that name.
    fn addresses(&self, name: &str) -> Result<Vec<BoundAddress>, WakeError>;
}

/// Picks the first non-loopback IPv4 address of `name`.
///
/// When several addresses qualify the OS listing order decides; no further
/// tie-break is applied.
pub fn resolve<T: InterfaceTable + ?Sized>(
    table: &T,
    name: &str,
) -> Result<InterfaceAddress, WakeError> {
    let addrs = table.addresses(name)?;
    if addrs.is_empty() {
        return Err(WakeError::NoAddressForInterface {
            name: name.to_string(),
            source: None,
        });
    }
    for addr in &addrs {
        if let (IpAddr::V4(address), Some(IpAddr::V4(netmask))) = (addr.ip, addr.netmask) {
            if !address.is_loopback() {
                debug!("using {}/{} on {}", address, netmask, name);
                return Ok(InterfaceAddress { address, netmask });
            }
        }
    }
    Err(WakeError::NoIPv4Address {
        name: name.to_string(),
    })
}

pub fn subnet_broadcast(address: Ipv4Addr, mask: Ipv4Addr) -> Ipv4Addr {
    let (address, mask) = (u32::from(address), u32::from(mask));
    Ipv4Addr::from(address & mask | !mask)
}
