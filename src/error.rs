use std::io;
use std::net::Ipv4Addr;
use std::time::Duration;

/// Fieldless view of a [`WakeError`], for callers that only branch on what failed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidAddressFormat,
    InterfaceNotFound,
    NoAddressForInterface,
    NoIPv4Address,
    DestinationResolutionFailed,
    SocketError,
    ShortWrite,
    NoEchoResponse,
    EchoMismatch,
    UnsupportedProtocol,
}

#[derive(thiserror::Error, Debug)]
pub enum WakeError {
    #[error("invalid MAC address {input:?}")]
    InvalidAddressFormat { input: String },
    #[error("network interface {name} not found")]
    InterfaceNotFound {
        name: String,
        #[source]
        source: nix::Error,
    },
    #[error("no address associated with interface {name}")]
    NoAddressForInterface {
        name: String,
        #[source]
        source: Option<nix::Error>,
    },
    #[error("no suitable IPv4 address found for interface {name}")]
    NoIPv4Address { name: String },
    #[error("destination {address} is not a usable transport address")]
    DestinationResolutionFailed { address: Ipv4Addr },
    #[error("socket {stage} failed")]
    SocketError {
        stage: &'static str,
        #[source]
        source: io::Error,
    },
    #[error("magic packet sent was {written} bytes (expected {expected} bytes)")]
    ShortWrite { written: usize, expected: usize },
    #[error("no echo response received within {timeout:?}")]
    NoEchoResponse {
        timeout: Duration,
        #[source]
        source: io::Error,
    },
    #[error("echo response of {received} bytes does not match the {sent} bytes sent")]
    EchoMismatch { sent: usize, received: usize },
    #[error("unsupported protocol {value:?}")]
    UnsupportedProtocol { value: String },
}

impl WakeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidAddressFormat { .. } => ErrorKind::InvalidAddressFormat,
            Self::InterfaceNotFound { .. } => ErrorKind::InterfaceNotFound,
            Self::NoAddressForInterface { .. } => ErrorKind::NoAddressForInterface,
            Self::NoIPv4Address { .. } => ErrorKind::NoIPv4Address,
            Self::DestinationResolutionFailed { .. } => ErrorKind::DestinationResolutionFailed,
            Self::SocketError { .. } => ErrorKind::SocketError,
            Self::ShortWrite { .. } => ErrorKind::ShortWrite,
            Self::NoEchoResponse { .. } => ErrorKind::NoEchoResponse,
            Self::EchoMismatch { .. } => ErrorKind::EchoMismatch,
            Self::UnsupportedProtocol { .. } => ErrorKind::UnsupportedProtocol,
        }
    }

    pub(crate) fn socket(stage: &'static str) -> impl FnOnce(io::Error) -> Self {
        move |source| Self::SocketError { stage, source }
    }
}
