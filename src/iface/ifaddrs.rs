// Interface table backed by getifaddrs(3).

use crate::error::WakeError;
use crate::iface::{BoundAddress, InterfaceTable};
use log::{debug, warn};
use nix::ifaddrs::getifaddrs;
use nix::net::if_::if_nametoindex;
use nix::sys::socket::SockaddrStorage;
use std::net::{IpAddr, SocketAddrV4, SocketAddrV6};

pub struct SystemInterfaces;

fn ip_of(addr: &SockaddrStorage) -> Option<IpAddr> {
    if let Some(sin) = addr.as_sockaddr_in() {
        Some(IpAddr::V4(*SocketAddrV4::from(*sin).ip()))
    } else if let Some(sin6) = addr.as_sockaddr_in6() {
        Some(IpAddr::V6(*SocketAddrV6::from(*sin6).ip()))
    } else {
        None
    }
}

fn listing_failed(name: &str, source: nix::Error) -> WakeError {
    warn!("getifaddrs failed while looking up {}: {}", name, source);
    WakeError::NoAddressForInterface {
        name: name.to_string(),
        source: Some(source),
    }
}

impl InterfaceTable for SystemInterfaces {
    fn addresses(&self, name: &str) -> Result<Vec<BoundAddress>, WakeError> {
        let index = if_nametoindex(name).map_err(|source| WakeError::InterfaceNotFound {
            name: name.to_string(),
            source,
        })?;
        debug!("interface {} has index {}", name, index);

        let ifaddrs = getifaddrs().map_err(|e| listing_failed(name, e))?;
        let addrs = ifaddrs
            .filter(|ifaddr| ifaddr.interface_name == name)
            .filter_map(|ifaddr| {
                let ip = ifaddr.address.as_ref().and_then(ip_of)?;
                let netmask = ifaddr.netmask.as_ref().and_then(ip_of);
                Some(BoundAddress { ip, netmask })
            })
            .collect();
        Ok(addrs)
    }
}
