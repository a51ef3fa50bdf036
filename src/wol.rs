use crate::error::WakeError;
use crate::iface;
use crate::iface::{InterfaceTable, SystemInterfaces};
use crate::mac::MacAddress;
use crate::packet::MagicPacket;
use crate::transport::discard::DISCARD_PORT;
use crate::transport::echo::ECHO_TIMEOUT;
use crate::transport::{Outcome, Protocol, Route, Transport};
use log::debug;
use std::net::Ipv4Addr;
use std::time::Duration;

/// Fixed parameters shared by every send made through a [`Waker`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub discard_port: u16,
    /// Destination used when no interface is named.
    pub broadcast: Ipv4Addr,
    /// How long an echo send waits for the reply.
    pub echo_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            discard_port: DISCARD_PORT,
            broadcast: Ipv4Addr::BROADCAST,
            echo_timeout: ECHO_TIMEOUT,
        }
    }
}

/// Per-call choices. Defaults to the discard protocol on the global broadcast address.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WakeOptions {
    protocol: Protocol,
    interface: Option<String>,
}

impl WakeOptions {
    pub fn protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    /// Send from `name` to its subnet broadcast address.
    pub fn interface(mut self, name: impl Into<String>) -> Self {
        self.interface = Some(name.into());
        self
    }
}

pub struct Waker<T: InterfaceTable = SystemInterfaces> {
    config: Config,
    interfaces: T,
}

impl Waker<SystemInterfaces> {
    pub fn new(config: Config) -> Self {
        Waker {
            config,
            interfaces: SystemInterfaces,
        }
    }
}

impl<T: InterfaceTable> Waker<T> {
    pub fn with_interfaces(config: Config, interfaces: T) -> Self {
        Waker { config, interfaces }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Works out where a packet would be sent without sending anything.
    pub fn route(&self, options: &WakeOptions) -> Result<Route, WakeError> {
        let route = match &options.interface {
            Some(name) => {
                let addr = iface::resolve(&self.interfaces, name)?;
                Route {
                    destination: addr.broadcast(),
                    source: Some(addr.address),
                }
            }
            None => Route {
                destination: self.config.broadcast,
                source: None,
            },
        };
        if route.destination.is_unspecified() {
            return Err(WakeError::DestinationResolutionFailed {
                address: route.destination,
            });
        }
        Ok(route)
    }

    pub fn wake(&self, mac: &str, options: &WakeOptions) -> Result<Outcome, WakeError> {
        let mac = MacAddress::parse(mac)?;
        let route = self.route(options)?;
        let packet = MagicPacket::new(mac);
        debug!(
            "waking {} via {} to {}",
            mac, options.protocol, route.destination
        );
        options
            .protocol
            .transport(&self.config)
            .send(&packet, &route)
    }
}

/// Sends a magic packet for `mac` using the default configuration.
///
/// With [`Protocol::Echo`] this blocks for up to two seconds waiting for the
/// target to echo the payload back.
pub fn wake(mac: &str, options: &WakeOptions) -> Result<Outcome, WakeError> {
    Waker::new(Config::default()).wake(mac, options)
}

#[cfg(test)]
mod tests {
    use crate::error::ErrorKind;
    use crate::iface::tests::{table, FakeTable};
    use crate::packet::MAGIC_PACKET_LEN;
    use crate::wol::*;
    use std::net::UdpSocket;

    fn waker() -> Waker<FakeTable> {
        Waker::with_interfaces(Config::default(), table())
    }

    #[test]
    fn no_interface_uses_global_broadcast() {
        let route = waker().route(&WakeOptions::default()).unwrap();
        assert_eq!(route.destination, Ipv4Addr::new(255, 255, 255, 255));
        assert_eq!(route.source, None);
    }

    #[test]
    fn interface_uses_subnet_broadcast() {
        let route = waker()
            .route(&WakeOptions::default().interface("eth0"))
            .unwrap();
        assert_eq!(route.destination, Ipv4Addr::new(192, 168, 1, 255));
        assert_eq!(route.source, Some(Ipv4Addr::new(192, 168, 1, 42)));
    }

    #[test]
    fn missing_interface_never_falls_back() {
        let err = waker()
            .wake("AA:BB:CC:DD:EE:FF", &WakeOptions::default().interface("eth9"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InterfaceNotFound);
    }

    #[test]
    fn bad_mac_fails_before_resolving() {
        let err = waker()
            .wake("not-a-mac", &WakeOptions::default().interface("eth9"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidAddressFormat);
    }

    #[test]
    fn unspecified_destination_is_rejected() {
        let config = Config {
            broadcast: Ipv4Addr::UNSPECIFIED,
            ..Config::default()
        };
        let err = Waker::with_interfaces(config, table())
            .wake("AA:BB:CC:DD:EE:FF", &WakeOptions::default())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DestinationResolutionFailed);
    }

    #[test]
    fn discard_send_end_to_end() {
        let listener = UdpSocket::bind("127.0.0.1:0").unwrap();
        listener
            .set_read_timeout(Some(Duration::from_secs(2)))
            .unwrap();
        let config = Config {
            discard_port: listener.local_addr().unwrap().port(),
            broadcast: Ipv4Addr::LOCALHOST,
            ..Config::default()
        };

        let outcome = Waker::new(config)
            .wake("AA:BB:CC:DD:EE:FF", &WakeOptions::default())
            .unwrap();
        assert_eq!(outcome, Outcome::Sent);

        let mut buf = [0u8; 256];
        let n = listener.recv(&mut buf).unwrap();
        assert_eq!(n, MAGIC_PACKET_LEN);
        assert_eq!(&buf[..6], &[0xff; 6]);
        for rep in buf[6..n].chunks(6) {
            assert_eq!(rep, &[0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]);
        }
    }

    #[test]
    fn defaults_match_wake_on_lan_convention() {
        let config = Config::default();
        assert_eq!(config.discard_port, 9);
        assert_eq!(config.broadcast, Ipv4Addr::BROADCAST);
        assert_eq!(config.echo_timeout, Duration::from_secs(2));
        assert_eq!(WakeOptions::default().protocol, Protocol::Discard);
    }
}
