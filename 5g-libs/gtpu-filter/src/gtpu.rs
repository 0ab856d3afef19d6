//! gtpu - GTP-U header and one layer of decapsulation
//!
//! TS29.281, 5.1.  Only the mandatory 8 bytes are read.  The optional sequence number, N-PDU
//! number and extension header chain are never consumed, so the inner packet is always looked
//! for straight after the mandatory part.
//!
//!   0                   1                   2                   3
//!   0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//!  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//!  |Ver  |P|R|E|S|N| Message Type  |            Length             |
//!  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//!  |                 Tunnel Endpoint Identifier                    |
//!  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+

use crate::{BoundedView, Diagnostics, Event, Verdict, ipv4};

pub const GTPU_LEN: usize = 8;
pub const GTPU_G_PDU: u8 = 0xff; // TS29.281, table 6.1-1

pub struct GtpuHdr<'a>(&'a [u8; GTPU_LEN]);

impl<'a> GtpuHdr<'a> {
    pub fn new(bytes: &'a [u8; GTPU_LEN]) -> Self {
        Self(bytes)
    }

    pub fn flags(&self) -> u8 {
        self.0[0]
    }

    pub fn version(&self) -> u8 {
        self.flags() >> 5
    }

    pub fn has_extension_header(&self) -> bool {
        self.flags() & 0x04 != 0
    }

    pub fn has_sequence_number(&self) -> bool {
        self.flags() & 0x02 != 0
    }

    pub fn has_n_pdu_number(&self) -> bool {
        self.flags() & 0x01 != 0
    }

    pub fn message_type(&self) -> u8 {
        self.0[1]
    }

    /// Length of everything after the mandatory header.
    pub fn length(&self) -> u16 {
        u16::from_be_bytes([self.0[2], self.0[3]])
    }

    pub fn teid(&self) -> u32 {
        u32::from_be_bytes([self.0[4], self.0[5], self.0[6], self.0[7]])
    }
}

/// Decapsulate the tunnel packet at `offset` and validate what it carries.
///
/// The message type check is advisory: a non G-PDU message is reported and then handled exactly
/// like a G-PDU.
pub fn handle<D: Diagnostics + ?Sized>(
    view: &BoundedView,
    offset: usize,
    diagnostics: &D,
) -> Verdict {
    let Ok(gtpu) = view.check_header::<GTPU_LEN>(offset).map(GtpuHdr::new) else {
        diagnostics.record(Event::GtpuTruncated);
        return Verdict::Drop;
    };
    if gtpu.message_type() != GTPU_G_PDU {
        diagnostics.record(Event::UnexpectedMessageType {
            message_type: gtpu.message_type(),
        });
    }
    diagnostics.record(Event::Gtpu {
        message_type: gtpu.message_type(),
        teid: gtpu.teid(),
    });

    let inner = ipv4::check_inner(view, offset + GTPU_LEN);
    diagnostics.record(Event::InnerIpv4(inner));
    inner.verdict()
}
