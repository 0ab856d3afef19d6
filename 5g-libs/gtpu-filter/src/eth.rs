//! eth - Ethernet II header with at most one 802.1Q / 802.1AD tag
//!
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//!  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//!  |                     destination mac addr                      |
//!  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//!  | destination mac (con't)       |        source mac addr        |
//!  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//!  |                    source mac addr (con't)                    |
//!  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//!  |           ether type          |   tag control info (if VLAN)  |
//!  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//!  | encapsulated type (if VLAN)   |
//!  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+

use crate::{BoundedView, Diagnostics, Event, Truncated, Verdict, ipv4};
use num_enum::{IntoPrimitive, TryFromPrimitive};

pub const ETH_LEN: usize = 14;
pub const VLAN_LEN: usize = 4;

/// The ether types the classifier distinguishes.  Anything else is passed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u16)]
pub enum EtherType {
    Ipv4 = 0x0800,
    Arp = 0x0806,
    Ieee8021q = 0x8100,
    Ipv6 = 0x86DD,
    Ieee8021ad = 0x88A8,
}

impl EtherType {
    pub fn is_vlan(ether_type: u16) -> bool {
        matches!(
            EtherType::try_from(ether_type),
            Ok(EtherType::Ieee8021q | EtherType::Ieee8021ad)
        )
    }
}

pub struct EthHdr<'a>(&'a [u8; ETH_LEN]);

impl<'a> EthHdr<'a> {
    pub fn new(bytes: &'a [u8; ETH_LEN]) -> Self {
        Self(bytes)
    }

    pub fn dst_mac(&self) -> [u8; 6] {
        core::array::from_fn(|i| self.0[i])
    }

    pub fn src_mac(&self) -> [u8; 6] {
        core::array::from_fn(|i| self.0[6 + i])
    }

    pub fn ether_type(&self) -> u16 {
        u16::from_be_bytes([self.0[12], self.0[13]])
    }
}

pub struct VlanHdr<'a>(&'a [u8; VLAN_LEN]);

impl<'a> VlanHdr<'a> {
    pub fn new(bytes: &'a [u8; VLAN_LEN]) -> Self {
        Self(bytes)
    }

    pub fn tci(&self) -> u16 {
        u16::from_be_bytes([self.0[0], self.0[1]])
    }

    pub fn vlan_id(&self) -> u16 {
        self.tci() & 0x0fff
    }

    pub fn encapsulated_ether_type(&self) -> u16 {
        u16::from_be_bytes([self.0[2], self.0[3]])
    }
}

/// The network layer protocol and where it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct L3 {
    pub ether_type: u16,
    pub offset: usize,
    /// A VLAN tag was announced but did not fit in the frame.
    pub tag_cut_off: bool,
}

/// Work out the L3 ether type and offset, unwrapping at most one VLAN tag.
///
/// A tagged frame whose tag is cut off keeps the tag's ether type and the untagged offset.  A
/// second tag is left in place, so Q-in-Q frames resolve to a VLAN ether type.
pub fn locate_l3<D: Diagnostics + ?Sized>(
    view: &BoundedView,
    diagnostics: &D,
) -> Result<L3, Truncated> {
    let eth = view.check_header::<ETH_LEN>(0).map(EthHdr::new)?;
    let untagged = L3 {
        ether_type: eth.ether_type(),
        offset: ETH_LEN,
        tag_cut_off: false,
    };
    if !EtherType::is_vlan(untagged.ether_type) {
        return Ok(untagged);
    }
    match view.check_header::<VLAN_LEN>(ETH_LEN).map(VlanHdr::new) {
        Ok(tag) => Ok(L3 {
            ether_type: tag.encapsulated_ether_type(),
            offset: ETH_LEN + VLAN_LEN,
            tag_cut_off: false,
        }),
        Err(_) => {
            diagnostics.record(Event::VlanTagTruncated);
            Ok(L3 {
                tag_cut_off: true,
                ..untagged
            })
        }
    }
}

/// Classify from the start of the frame.  Frames that cannot be understood at L2 are passed
/// through untouched.
///
/// A frame whose VLAN tag is cut off is handed to the IPv4 path at the untagged offset, where it
/// fails the IPv4 bounds check and aborts.
pub fn handle<D: Diagnostics + ?Sized>(view: &BoundedView, diagnostics: &D) -> Verdict {
    let Ok(l3) = locate_l3(view, diagnostics) else {
        diagnostics.record(Event::L2Truncated);
        return Verdict::Forward;
    };
    if l3.tag_cut_off {
        return ipv4::handle(view, l3.offset, diagnostics);
    }

    match EtherType::try_from(l3.ether_type) {
        Ok(EtherType::Ipv4) => ipv4::handle(view, l3.offset, diagnostics),
        _ => {
            diagnostics.record(Event::L3Unhandled {
                ether_type: l3.ether_type,
                l3_offset: l3.offset,
            });
            Verdict::Forward
        }
    }
}
