pub mod error;
pub mod iface;
pub mod mac;
pub mod packet;
pub mod transport;
pub mod wol;

pub use error::{ErrorKind, WakeError};
pub use mac::MacAddress;
pub use packet::MagicPacket;
pub use transport::{Outcome, Protocol, Route};
pub use wol::{wake, Config, WakeOptions, Waker};
