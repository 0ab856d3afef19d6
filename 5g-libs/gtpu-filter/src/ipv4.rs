//! ipv4 - outer IPv4 dispatch and inner (decapsulated) IPv4 validation
//!
//! The header is always treated as exactly 20 bytes.  The IHL nibble is exposed but never used
//! to find the next header, so a packet carrying IP options is misparsed rather than rejected.

use crate::{BoundedView, Diagnostics, Event, Verdict, udp};
use core::net::Ipv4Addr;
use num_enum::{IntoPrimitive, TryFromPrimitive};

pub const IPV4_LEN: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum IpProto {
    Tcp = 6,
    Udp = 17,
}

pub struct Ipv4Hdr<'a>(&'a [u8; IPV4_LEN]);

impl<'a> Ipv4Hdr<'a> {
    pub fn new(bytes: &'a [u8; IPV4_LEN]) -> Self {
        Self(bytes)
    }

    pub fn version(&self) -> u8 {
        self.0[0] >> 4
    }

    /// Header length in 32-bit words, as carried on the wire.
    pub fn ihl(&self) -> u8 {
        self.0[0] & 0x0f
    }

    pub fn total_len(&self) -> u16 {
        u16::from_be_bytes([self.0[2], self.0[3]])
    }

    pub fn protocol(&self) -> u8 {
        self.0[9]
    }

    pub fn saddr(&self) -> Ipv4Addr {
        Ipv4Addr::new(self.0[12], self.0[13], self.0[14], self.0[15])
    }

    pub fn daddr(&self) -> Ipv4Addr {
        Ipv4Addr::new(self.0[16], self.0[17], self.0[18], self.0[19])
    }
}

/// Dispatch an outer IPv4 packet found at `offset`.  Once L2 has said IPv4, a truncated header is
/// an error rather than a pass-through.
pub fn handle<D: Diagnostics + ?Sized>(
    view: &BoundedView,
    offset: usize,
    diagnostics: &D,
) -> Verdict {
    let Ok(ip) = view.check_header::<IPV4_LEN>(offset).map(Ipv4Hdr::new) else {
        diagnostics.record(Event::Ipv4Truncated);
        return Verdict::Abort;
    };
    diagnostics.record(Event::Ipv4 {
        daddr: ip.daddr(),
        protocol: ip.protocol(),
    });

    match IpProto::try_from(ip.protocol()) {
        Ok(IpProto::Udp) => udp::handle(view, offset + IPV4_LEN, diagnostics),
        Ok(IpProto::Tcp) | Err(_) => Verdict::Forward,
    }
}

/// Result of checking the packet carried inside a tunnel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InnerIpv4Check {
    /// No room for a full IPv4 header.
    BoundsFailed,
    VersionMismatch { version: u8 },
    Ok,
}

impl InnerIpv4Check {
    /// Only a well-formed IPv4 payload is forwarded.
    pub fn verdict(self) -> Verdict {
        match self {
            InnerIpv4Check::Ok => Verdict::Forward,
            InnerIpv4Check::BoundsFailed | InnerIpv4Check::VersionMismatch { .. } => Verdict::Drop,
        }
    }
}

/// Check the decapsulated packet at `offset`.  Only the version nibble is validated.
pub fn check_inner(view: &BoundedView, offset: usize) -> InnerIpv4Check {
    match view.check_header::<IPV4_LEN>(offset).map(Ipv4Hdr::new) {
        Err(_) => InnerIpv4Check::BoundsFailed,
        Ok(ip) if ip.version() != 4 => InnerIpv4Check::VersionMismatch {
            version: ip.version(),
        },
        Ok(_) => InnerIpv4Check::Ok,
    }
}
