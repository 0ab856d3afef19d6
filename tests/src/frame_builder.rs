#![allow(clippy::unusual_byte_groupings)]
use pnet_packet::ethernet::{EtherType, EtherTypes, MutableEthernetPacket};
use pnet_packet::ip::{IpNextHeaderProtocol, IpNextHeaderProtocols};
use pnet_packet::ipv4::{self, MutableIpv4Packet};
use pnet_packet::udp::MutableUdpPacket;
use pnet_packet::vlan::MutableVlanPacket;
use std::net::Ipv4Addr;

pub const GTPU_PORT: u16 = 2152; // TS29.281
pub const GTP_MESSAGE_TYPE_GPU: u8 = 255; // TS29.281, table 6.1-1

const ETH_HEADER_LEN: usize = 14;
const VLAN_TAG_LEN: usize = 4;
const IPV4_HEADER_LEN: usize = 20;
const UDP_HEADER_LEN: usize = 8;
const GTP_HEADER_LEN: usize = 8;

const DST_MAC: [u8; 6] = [0xff; 6];
const SRC_MAC: [u8; 6] = [0x02, 0x00, 0x00, 0x00, 0x00, 0x01];
const GNB_ADDR: Ipv4Addr = Ipv4Addr::new(192, 168, 0, 1);
const UPF_ADDR: Ipv4Addr = Ipv4Addr::new(192, 168, 0, 2);
const UE_ADDR: Ipv4Addr = Ipv4Addr::new(10, 255, 0, 1);
const DN_ADDR: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 100);
const TEST_UDP_PORT: u16 = 23215;

/// Builds Ethernet / IPv4 / UDP / GTP-U / IPv4 / UDP frames as an uplink gNB would send them,
/// with knobs for the fields the classifier looks at.
#[derive(Clone, Debug)]
pub struct FrameBuilder {
    vlan_tpid: Option<EtherType>,
    outer_protocol: IpNextHeaderProtocol,
    dst_port: u16,
    message_type: u8,
    teid: u32,
    inner_version: u8,
}

impl Default for FrameBuilder {
    fn default() -> Self {
        Self {
            vlan_tpid: None,
            outer_protocol: IpNextHeaderProtocols::Udp,
            dst_port: GTPU_PORT,
            message_type: GTP_MESSAGE_TYPE_GPU,
            teid: 0x3c2b_1a01,
            inner_version: 4,
        }
    }
}

impl FrameBuilder {
    pub fn gtpu() -> Self {
        Self::default()
    }

    /// Add one VLAN tag with the given TPID (0x8100 or 0x88a8).
    pub fn vlan(mut self, tpid: EtherType) -> Self {
        self.vlan_tpid = Some(tpid);
        self
    }

    pub fn outer_protocol(mut self, protocol: IpNextHeaderProtocol) -> Self {
        self.outer_protocol = protocol;
        self
    }

    pub fn dst_port(mut self, port: u16) -> Self {
        self.dst_port = port;
        self
    }

    pub fn message_type(mut self, message_type: u8) -> Self {
        self.message_type = message_type;
        self
    }

    pub fn inner_version(mut self, version: u8) -> Self {
        self.inner_version = version;
        self
    }

    /// Offset of the GTP-U header in built frames.
    pub fn gtp_offset(&self) -> usize {
        self.l2_len() + IPV4_HEADER_LEN + UDP_HEADER_LEN
    }

    fn l2_len(&self) -> usize {
        match self.vlan_tpid {
            Some(_) => ETH_HEADER_LEN + VLAN_TAG_LEN,
            None => ETH_HEADER_LEN,
        }
    }

    pub fn build(&self) -> Vec<u8> {
        // A 1-byte inner UDP packet.
        let inner_len = IPV4_HEADER_LEN + UDP_HEADER_LEN + 1;
        let gtp_payload_len = inner_len;
        let udp_len = UDP_HEADER_LEN + GTP_HEADER_LEN + gtp_payload_len;
        let ip_len = IPV4_HEADER_LEN + udp_len;
        let l2_len = self.l2_len();
        let mut frame = vec![0u8; l2_len + ip_len];

        // ---- Ethernet header, optionally tagged ----
        frame[0..6].copy_from_slice(&DST_MAC);
        frame[6..12].copy_from_slice(&SRC_MAC);
        {
            let mut eth = MutableEthernetPacket::new(&mut frame[..]).unwrap();
            eth.set_ethertype(self.vlan_tpid.unwrap_or(EtherTypes::Ipv4));
        }
        if self.vlan_tpid.is_some() {
            let mut tag = MutableVlanPacket::new(&mut frame[ETH_HEADER_LEN..]).unwrap();
            tag.set_vlan_identifier(100);
            tag.set_ethertype(EtherTypes::Ipv4);
        }

        // ---- Outer IP + UDP ----
        let ip_offset = l2_len;
        write_ipv4_header(
            &mut frame[ip_offset..],
            4,
            self.outer_protocol,
            ip_len,
            GNB_ADDR,
            UPF_ADDR,
        );
        write_udp_header(
            &mut frame[ip_offset + IPV4_HEADER_LEN..],
            GTPU_PORT,
            self.dst_port,
            udp_len,
        );

        // ---- GTP header, TS29.281, 5.1 ----
        let gtp_offset = self.gtp_offset();
        let length = (gtp_payload_len as u16).to_be_bytes();
        let teid = self.teid.to_be_bytes();
        frame[gtp_offset..gtp_offset + GTP_HEADER_LEN].copy_from_slice(&[
            0b001_1_0_0_0_0, // version, PT, R, E, S, PN
            self.message_type,
            length[0],
            length[1],
            teid[0],
            teid[1],
            teid[2],
            teid[3],
        ]);

        // ---- Inner IP + UDP + 1 byte of data ----
        let inner_offset = gtp_offset + GTP_HEADER_LEN;
        write_ipv4_header(
            &mut frame[inner_offset..],
            self.inner_version,
            IpNextHeaderProtocols::Udp,
            inner_len,
            UE_ADDR,
            DN_ADDR,
        );
        write_udp_header(
            &mut frame[inner_offset + IPV4_HEADER_LEN..],
            TEST_UDP_PORT,
            TEST_UDP_PORT,
            UDP_HEADER_LEN + 1,
        );
        frame[inner_offset + IPV4_HEADER_LEN + UDP_HEADER_LEN] = 0x42;

        frame
    }
}

/// An Ethernet frame of the given ether type with a minimum size zero payload.
pub fn non_ip_frame(ether_type: EtherType) -> Vec<u8> {
    let mut frame = vec![0u8; 60];
    frame[0..6].copy_from_slice(&DST_MAC);
    frame[6..12].copy_from_slice(&SRC_MAC);
    let mut eth = MutableEthernetPacket::new(&mut frame[..]).unwrap();
    eth.set_ethertype(ether_type);
    frame
}

fn write_ipv4_header(
    buf: &mut [u8],
    version: u8,
    protocol: IpNextHeaderProtocol,
    total_len: usize,
    src: Ipv4Addr,
    dst: Ipv4Addr,
) {
    let mut ip = MutableIpv4Packet::new(&mut buf[..IPV4_HEADER_LEN]).unwrap();
    ip.set_version(version);
    ip.set_header_length(5);
    ip.set_total_length(total_len as u16);
    ip.set_ttl(64);
    ip.set_next_level_protocol(protocol);
    ip.set_source(src);
    ip.set_destination(dst);
    let checksum = ipv4::checksum(&ip.to_immutable());
    ip.set_checksum(checksum);
}

// The UDP checksum is optional over IPv4 and left at zero.
fn write_udp_header(buf: &mut [u8], src_port: u16, dst_port: u16, len: usize) {
    let mut udp = MutableUdpPacket::new(&mut buf[..UDP_HEADER_LEN]).unwrap();
    udp.set_source(src_port);
    udp.set_destination(dst_port);
    udp.set_length(len as u16);
}
