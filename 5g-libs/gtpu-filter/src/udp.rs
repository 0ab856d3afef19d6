//! udp - UDP header and GTP-U port dispatch
//!
//!   0                   1                   2                   3
//!   0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//!  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//!  |          Source Port          |       Destination Port        |
//!  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//!  |            Length             |           Checksum            |
//!  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+

use crate::{BoundedView, Diagnostics, Event, Verdict, gtpu};

pub const UDP_LEN: usize = 8;
pub const GTPU_PORT: u16 = 2152; // TS29.281

pub struct UdpHdr<'a>(&'a [u8; UDP_LEN]);

impl<'a> UdpHdr<'a> {
    pub fn new(bytes: &'a [u8; UDP_LEN]) -> Self {
        Self(bytes)
    }

    pub fn src_port(&self) -> u16 {
        u16::from_be_bytes([self.0[0], self.0[1]])
    }

    pub fn dst_port(&self) -> u16 {
        u16::from_be_bytes([self.0[2], self.0[3]])
    }

    pub fn len(&self) -> u16 {
        u16::from_be_bytes([self.0[4], self.0[5]])
    }

    pub fn checksum(&self) -> u16 {
        u16::from_be_bytes([self.0[6], self.0[7]])
    }
}

pub fn handle<D: Diagnostics + ?Sized>(
    view: &BoundedView,
    offset: usize,
    diagnostics: &D,
) -> Verdict {
    let Ok(udp) = view.check_header::<UDP_LEN>(offset).map(UdpHdr::new) else {
        diagnostics.record(Event::UdpTruncated);
        return Verdict::Abort;
    };

    match udp.dst_port() {
        GTPU_PORT => gtpu::handle(view, offset + UDP_LEN, diagnostics),
        dst_port => {
            diagnostics.record(Event::UdpNotGtpu { dst_port });
            Verdict::Forward
        }
    }
}
