use crate::mac::{MacAddress, MAC_LEN};

pub const SYNC_STREAM: [u8; 6] = [0xff; 6];
pub const MAC_REPETITIONS: usize = 16;
pub const MAGIC_PACKET_LEN: usize = SYNC_STREAM.len() + MAC_LEN * MAC_REPETITIONS;

/// Wake-on-LAN payload: the synchronization stream followed by the target
/// address repeated sixteen times.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MagicPacket {
    target: MacAddress,
    data: [u8; MAGIC_PACKET_LEN],
}

impl MagicPacket {
    pub fn new(target: MacAddress) -> Self {
        let mut data = [0u8; MAGIC_PACKET_LEN];
        data[..SYNC_STREAM.len()].copy_from_slice(&SYNC_STREAM);
        for chunk in data[SYNC_STREAM.len()..].chunks_exact_mut(MAC_LEN) {
            chunk.copy_from_slice(target.as_bytes());
        }
        MagicPacket { target, data }
    }

    pub fn target(&self) -> MacAddress {
        self.target
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}
