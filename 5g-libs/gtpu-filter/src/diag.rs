//! diag - optional observability hook for the classifier

use crate::ipv4::InnerIpv4Check;
use core::fmt;
use core::net::Ipv4Addr;

/// Something worth tracing that happened while classifying a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    L2Truncated,
    VlanTagTruncated,
    L3Unhandled { ether_type: u16, l3_offset: usize },
    Ipv4Truncated,
    Ipv4 { daddr: Ipv4Addr, protocol: u8 },
    UdpTruncated,
    UdpNotGtpu { dst_port: u16 },
    GtpuTruncated,
    Gtpu { message_type: u8, teid: u32 },
    UnexpectedMessageType { message_type: u8 },
    InnerIpv4(InnerIpv4Check),
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::L2Truncated => write!(f, "Cannot parse L2"),
            Event::VlanTagTruncated => write!(f, "VLAN tag truncated"),
            Event::L3Unhandled {
                ether_type,
                l3_offset,
            } => write!(f, "Cannot parse L2: L3off:{l3_offset} proto:{ether_type:#x}"),
            Event::Ipv4Truncated => write!(f, "Invalid IPv4 packet"),
            Event::Ipv4 { daddr, protocol } => {
                write!(f, "Valid IPv4 packet: daddr:{daddr} protocol:{protocol}")
            }
            Event::UdpTruncated => write!(f, "Invalid UDP packet"),
            Event::UdpNotGtpu { dst_port } => write!(f, "GTP port {dst_port} not valid"),
            Event::GtpuTruncated => write!(f, "Invalid GTPU packet"),
            Event::Gtpu {
                message_type,
                teid,
            } => write!(f, "GTPU message type {message_type:#x} teid {teid:#x}"),
            Event::UnexpectedMessageType { message_type } => write!(
                f,
                "Message type {message_type:#x} is not GTPU GPDU({:#x})",
                crate::gtpu::GTPU_G_PDU
            ),
            Event::InnerIpv4(InnerIpv4Check::Ok) => {
                write!(f, "GTP GPDU with IPv4 payload received")
            }
            Event::InnerIpv4(InnerIpv4Check::BoundsFailed) => write!(f, "Invalid inner IPv4 packet"),
            Event::InnerIpv4(InnerIpv4Check::VersionMismatch { version }) => {
                write!(f, "Inner packet is IP version {version}, not 4")
            }
        }
    }
}

/// Receives classifier events.  Injected by the caller; the verdict never depends on it.
///
/// Implementations run on the per-frame hot path and must not block.
pub trait Diagnostics {
    fn record(&self, event: Event);
}

/// Diagnostics disabled.
impl Diagnostics for () {
    #[inline]
    fn record(&self, _event: Event) {}
}

impl<D: Diagnostics + ?Sized> Diagnostics for &D {
    #[inline]
    fn record(&self, event: Event) {
        (**self).record(event)
    }
}
