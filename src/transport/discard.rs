use crate::error::WakeError;
use crate::packet::{MagicPacket, MAGIC_PACKET_LEN};
use crate::transport::{Outcome, Route, Transport};
use log::{debug, info};
use std::net::{Ipv4Addr, SocketAddrV4, UdpSocket};

pub const DISCARD_PORT: u16 = 9;

/// Fire-and-forget UDP send. The discard service never answers.
pub struct Discard {
    port: u16,
}

impl Discard {
    pub fn new(port: u16) -> Self {
        Discard { port }
    }
}

impl Default for Discard {
    fn default() -> Self {
        Discard::new(DISCARD_PORT)
    }
}

fn check_written(written: usize) -> Result<(), WakeError> {
    if written != MAGIC_PACKET_LEN {
        return Err(WakeError::ShortWrite {
            written,
            expected: MAGIC_PACKET_LEN,
        });
    }
    Ok(())
}

impl Transport for Discard {
    fn send(&self, packet: &MagicPacket, route: &Route) -> Result<Outcome, WakeError> {
        let local = SocketAddrV4::new(route.source.unwrap_or(Ipv4Addr::UNSPECIFIED), 0);
        let remote = SocketAddrV4::new(route.destination, self.port);

        let socket = UdpSocket::bind(local).map_err(WakeError::socket("bind"))?;
        socket
            .set_broadcast(true)
            .map_err(WakeError::socket("configure"))?;
        socket.connect(remote).map_err(WakeError::socket("connect"))?;
        debug!("udp {} -> {}", local, remote);

        let written = socket
            .send(packet.as_bytes())
            .map_err(WakeError::socket("write"))?;
        check_written(written)?;
        info!("sent magic packet for {} to {}", packet.target(), remote);
        Ok(Outcome::Sent)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ErrorKind;
    use crate::mac::MacAddress;
    use crate::transport::discard::*;
    use std::time::Duration;

    #[test]
    fn short_write_is_rejected() {
        let err = check_written(60).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ShortWrite);
        assert!(check_written(MAGIC_PACKET_LEN).is_ok());
    }

    #[test]
    fn delivers_payload_over_loopback() {
        let listener = UdpSocket::bind("127.0.0.1:0").unwrap();
        listener
            .set_read_timeout(Some(Duration::from_secs(2)))
            .unwrap();
        let port = listener.local_addr().unwrap().port();

        let packet = MagicPacket::new(MacAddress::new([0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]));
        let route = Route {
            destination: Ipv4Addr::LOCALHOST,
            source: Some(Ipv4Addr::LOCALHOST),
        };
        let outcome = Discard::new(port).send(&packet, &route).unwrap();
        assert_eq!(outcome, Outcome::Sent);

        let mut buf = [0u8; 512];
        let (n, from) = listener.recv_from(&mut buf).unwrap();
        assert_eq!(n, MAGIC_PACKET_LEN);
        assert_eq!(&buf[..n], packet.as_bytes());
        assert_eq!(from.ip(), std::net::IpAddr::V4(Ipv4Addr::LOCALHOST));
    }

    #[test]
    fn unbindable_source_is_a_socket_error() {
        // TEST-NET-1 is never assigned to a local interface.
        let route = Route {
            destination: Ipv4Addr::LOCALHOST,
            source: Some(Ipv4Addr::new(192, 0, 2, 1)),
        };
        let packet = MagicPacket::new(MacAddress::new([1, 2, 3, 4, 5, 6]));
        let err = Discard::default().send(&packet, &route).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SocketError);
    }
}
