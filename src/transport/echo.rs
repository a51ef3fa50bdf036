use crate::error::WakeError;
use crate::packet::MagicPacket;
use crate::transport::{Outcome, Route, Transport};
use log::{debug, info};
use socket2::{Domain, Protocol, SockAddr, Socket, Type};
use std::io;
use std::io::{Read, Write};
use std::net::SocketAddrV4;
use std::time::Duration;

pub const ECHO_TIMEOUT: Duration = Duration::from_secs(2);
const MIN_TIMEOUT: Duration = Duration::from_micros(1);
const REPLY_BUFFER_SIZE: usize = 1024;
const IPV4_MIN_HEADER_LEN: usize = 20;
const IPV4_MAX_HEADER_LEN: usize = 60;

/// Raw ICMP send that expects the target to hand the payload straight back.
pub struct Echo {
    timeout: Duration,
}

impl Echo {
    pub fn new(timeout: Duration) -> Self {
        Echo { timeout }
    }
}

impl Default for Echo {
    fn default() -> Self {
        Echo::new(ECHO_TIMEOUT)
    }
}

// Linux hands raw IPv4 reads back with the IP header attached.
fn strip_ipv4_header(data: &[u8]) -> &[u8] {
    if data.len() >= IPV4_MIN_HEADER_LEN && data[0] >> 4 == 4 {
        let ihl = (data[0] & 0x0f) as usize * 4;
        if ihl >= IPV4_MIN_HEADER_LEN && ihl <= data.len() {
            return &data[ihl..];
        }
    }
    data
}

struct IcmpConn(Socket);

impl IcmpConn {
    fn open(route: &Route, timeout: Duration) -> Result<IcmpConn, WakeError> {
        // A timeval of zero disables the read deadline entirely.
        if timeout < MIN_TIMEOUT {
            return Err(WakeError::socket("configure")(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("echo timeout {:?} is below {:?}", timeout, MIN_TIMEOUT),
            )));
        }
        let socket = Socket::new(Domain::IPV4, Type::RAW, Some(Protocol::ICMPV4))
            .map_err(WakeError::socket("open"))?;
        socket
            .set_broadcast(true)
            .map_err(WakeError::socket("configure"))?;
        if let Some(source) = route.source {
            socket
                .bind(&SockAddr::from(SocketAddrV4::new(source, 0)))
                .map_err(WakeError::socket("bind"))?;
        }
        socket
            .connect(&SockAddr::from(SocketAddrV4::new(route.destination, 0)))
            .map_err(WakeError::socket("connect"))?;
        socket
            .set_read_timeout(Some(timeout))
            .map_err(WakeError::socket("configure"))?;
        Ok(IcmpConn(socket))
    }
}

impl Read for IcmpConn {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut raw = [0u8; REPLY_BUFFER_SIZE + IPV4_MAX_HEADER_LEN];
        let n = (&self.0).read(&mut raw)?;
        Ok(copy_payload(&raw[..n], buf))
    }
}

fn copy_payload(datagram: &[u8], buf: &mut [u8]) -> usize {
    let payload = strip_ipv4_header(datagram);
    let len = payload.len().min(buf.len());
    buf[..len].copy_from_slice(&payload[..len]);
    len
}

impl Write for IcmpConn {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        (&self.0).write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Writes `sent` once and waits for one read. The read deadline must already
/// be configured on `conn`; `timeout` is only reported back on failure.
fn exchange<C: Read + Write>(
    conn: &mut C,
    sent: &[u8],
    timeout: Duration,
) -> Result<Vec<u8>, WakeError> {
    conn.write_all(sent).map_err(WakeError::socket("write"))?;

    let mut reply = [0u8; REPLY_BUFFER_SIZE];
    let n = conn
        .read(&mut reply)
        .map_err(|source| WakeError::NoEchoResponse { timeout, source })?;
    if reply[..n] != *sent {
        return Err(WakeError::EchoMismatch {
            sent: sent.len(),
            received: n,
        });
    }
    Ok(reply[..n].to_vec())
}

impl Transport for Echo {
    fn send(&self, packet: &MagicPacket, route: &Route) -> Result<Outcome, WakeError> {
        let mut conn = IcmpConn::open(route, self.timeout)?;
        debug!(
            "icmp -> {} (waiting up to {:?})",
            route.destination, self.timeout
        );
        let reply = exchange(&mut conn, packet.as_bytes(), self.timeout)?;
        info!(
            "magic packet for {} echoed by {}",
            packet.target(),
            route.destination
        );
        Ok(Outcome::Echoed(reply))
    }
}
