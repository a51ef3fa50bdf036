use crate::error::WakeError;
use std::fmt;
use std::str::FromStr;

pub const MAC_LEN: usize = 6;

/// A 48-bit hardware address in transmission order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct MacAddress([u8; MAC_LEN]);

impl MacAddress {
    pub const fn new(octets: [u8; MAC_LEN]) -> Self {
        MacAddress(octets)
    }

    /// Accepts `aa:bb:cc:dd:ee:ff`, `aa-bb-cc-dd-ee-ff` or `aabbccddeeff`, in any case.
    /// A separated form must use the same separator between every pair.
    pub fn parse(input: &str) -> Result<MacAddress, WakeError> {
        let invalid = || WakeError::InvalidAddressFormat {
            input: input.to_string(),
        };
        let bytes = input.as_bytes();
        let pairs: Vec<&[u8]> = match bytes.len() {
            12 => bytes.chunks(2).collect(),
            17 => {
                let sep = bytes[2];
                if sep != b':' && sep != b'-' {
                    return Err(invalid());
                }
                let pairs: Vec<&[u8]> = bytes.split(|&b| b == sep).collect();
                if pairs.iter().any(|p| p.len() != 2) {
                    return Err(invalid());
                }
                pairs
            }
            _ => return Err(invalid()),
        };
        if pairs.len() != MAC_LEN {
            return Err(invalid());
        }

        let mut octets = [0u8; MAC_LEN];
        for (octet, pair) in octets.iter_mut().zip(pairs) {
            *octet = match (hex_value(pair[0]), hex_value(pair[1])) {
                (Some(hi), Some(lo)) => hi << 4 | lo,
                _ => return Err(invalid()),
            };
        }
        Ok(MacAddress(octets))
    }

    pub fn octets(&self) -> [u8; MAC_LEN] {
        self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

fn hex_value(c: u8) -> Option<u8> {
    (c as char).to_digit(16).map(|d| d as u8)
}

impl FromStr for MacAddress {
    type Err = WakeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MacAddress::parse(s)
    }
}

impl From<[u8; MAC_LEN]> for MacAddress {
    fn from(octets: [u8; MAC_LEN]) -> Self {
        MacAddress(octets)
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            a, b, c, d, e, g
        )
    }
}
